//! Explicit time-based caching for territory directories

use crate::ports::TerritoryDirectory;
use async_trait::async_trait;
use radar_core::{BoundingBox, Organization, Result};
use std::sync::Mutex;
use std::time::{Duration, Instant};

type Snapshot = Option<(Instant, Vec<Organization>)>;

/// TTL cache decorator over a [`TerritoryDirectory`].
///
/// The cache is explicit and injected: resolution paths use the plain
/// uncached directory so territory edits are immediately visible, and
/// read-heavy surfaces (map rendering, dashboards) opt in with a TTL they
/// can justify. Listing serves a cached snapshot until the TTL lapses;
/// single-organization reads always pass through. A bounds update through
/// this wrapper invalidates the snapshot.
pub struct CachedDirectory<D> {
    inner: D,
    ttl: Duration,
    snapshot: Mutex<Snapshot>,
}

impl<D> CachedDirectory<D> {
    /// Wrap a directory with the given time-to-live
    pub fn new(inner: D, ttl: Duration) -> Self {
        Self {
            inner,
            ttl,
            snapshot: Mutex::new(None),
        }
    }

    /// Drop the cached snapshot; the next listing refetches
    pub fn invalidate(&self) {
        *lock(&self.snapshot) = None;
    }
}

fn lock(snapshot: &Mutex<Snapshot>) -> std::sync::MutexGuard<'_, Snapshot> {
    snapshot
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[async_trait]
impl<D: TerritoryDirectory> TerritoryDirectory for CachedDirectory<D> {
    async fn list_organizations(&self) -> Result<Vec<Organization>> {
        if let Some((fetched_at, orgs)) = lock(&self.snapshot).as_ref() {
            if fetched_at.elapsed() < self.ttl {
                return Ok(orgs.clone());
            }
        }

        let orgs = self.inner.list_organizations().await?;
        *lock(&self.snapshot) = Some((Instant::now(), orgs.clone()));
        Ok(orgs)
    }

    async fn get_organization(&self, owner_id: &str) -> Result<Option<Organization>> {
        self.inner.get_organization(owner_id).await
    }

    async fn update_bounds(&self, owner_id: &str, bounds: BoundingBox) -> Result<()> {
        self.inner.update_bounds(owner_id, bounds).await?;
        self.invalidate();
        Ok(())
    }
}
