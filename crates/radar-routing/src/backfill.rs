//! Backfill of unrouted tickets

use crate::router::route_existing;
use radar_core::Result;
use radar_store::{TerritoryDirectory, TicketStore};
use serde::Serialize;
use tracing::{info, warn};

/// Outcome counters for one backfill run
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BackfillSummary {
    /// Tickets examined
    pub scanned: u64,
    /// Tickets that already carried an org code
    pub skipped: u64,
    /// Tickets whose org code was persisted by this run
    pub updated: u64,
    /// Tickets matching no territory, left unrouted
    pub unrouted: u64,
    /// Tickets whose update failed; the next run retries them
    pub failed: u64,
}

/// Batch job that routes tickets created before routing existed, or whose
/// synchronous routing failed.
pub struct BackfillJob<D, T> {
    directory: D,
    tickets: T,
}

impl<D: TerritoryDirectory, T: TicketStore> BackfillJob<D, T> {
    /// Create a backfill job over the given stores
    pub fn new(directory: D, tickets: T) -> Self {
        Self {
            directory,
            tickets,
        }
    }

    /// Route every unrouted ticket and report what happened.
    ///
    /// The organization snapshot is fetched and sorted once up front, not
    /// per ticket. Tickets that already carry an org code are never
    /// touched. A failed per-ticket update is logged and counted but never
    /// aborts the batch; each update is a single-field write, so the job
    /// can be interrupted at any ticket boundary and re-run safely — a
    /// re-run only considers tickets still missing a code.
    pub async fn run(&self) -> Result<BackfillSummary> {
        let mut orgs = self.directory.list_organizations().await?;
        orgs.sort_by(|a, b| a.org_code.cmp(&b.org_code));
        let tickets = self.tickets.list().await?;

        let mut summary = BackfillSummary::default();
        for ticket in &tickets {
            summary.scanned += 1;
            if ticket.is_routed() {
                summary.skipped += 1;
                continue;
            }

            match route_existing(&orgs, ticket) {
                Some(org_code) => {
                    match self.tickets.set_org_code(&ticket.id, &org_code).await {
                        Ok(()) => summary.updated += 1,
                        Err(err) => {
                            warn!(ticket = %ticket.id, error = %err, "failed to persist org code");
                            summary.failed += 1;
                        }
                    }
                }
                None => summary.unrouted += 1,
            }
        }

        info!(
            scanned = summary.scanned,
            updated = summary.updated,
            unrouted = summary.unrouted,
            failed = summary.failed,
            "backfill complete"
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use radar_core::{
        Coordinate, Error, OrgCode, Organization, Ticket, TicketDraft, TicketId,
    };
    use radar_store::MemoryStore;

    fn org_with_square(
        owner: &str,
        code: &str,
        base_lat: f64,
        base_lng: f64,
        size: f64,
    ) -> Organization {
        Organization::new(owner, code, code).with_territory(vec![
            Coordinate::new(base_lat, base_lng),
            Coordinate::new(base_lat, base_lng + size),
            Coordinate::new(base_lat + size, base_lng + size),
            Coordinate::new(base_lat + size, base_lng),
        ])
    }

    async fn seeded_store() -> (MemoryStore, TicketId, TicketId, TicketId) {
        let store = MemoryStore::new();
        store.add_organization(org_with_square("owner-1", "ORG1", 49.0, -97.2, 0.2));

        // Unrouted, inside ORG1.
        let inside = Ticket::from_draft(TicketDraft::new(49.1, -97.1, "u1"), None);
        // Unrouted, outside every territory.
        let outside = Ticket::from_draft(TicketDraft::new(50.0, -97.1, "u2"), None);
        // Already routed elsewhere, even though it sits inside ORG1.
        let routed = Ticket::from_draft(
            TicketDraft::new(49.05, -97.15, "u3"),
            Some(OrgCode::new("OTHER")),
        );

        store.create(&inside).await.expect("create");
        store.create(&outside).await.expect("create");
        store.create(&routed).await.expect("create");
        (store, inside.id, outside.id, routed.id)
    }

    #[tokio::test]
    async fn test_backfill_routes_unrouted_tickets() {
        let (store, inside, outside, routed) = seeded_store().await;
        let job = BackfillJob::new(store.clone(), store.clone());

        let summary = job.run().await.expect("run");
        assert_eq!(summary.scanned, 3);
        assert_eq!(summary.updated, 1);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.unrouted, 1);
        assert_eq!(summary.failed, 0);

        let inside = store.get(&inside).await.expect("get").expect("present");
        assert_eq!(inside.org_code, Some(OrgCode::new("ORG1")));

        let outside = store.get(&outside).await.expect("get").expect("present");
        assert_eq!(outside.org_code, None);

        let routed = store.get(&routed).await.expect("get").expect("present");
        assert_eq!(routed.org_code, Some(OrgCode::new("OTHER")));
    }

    #[tokio::test]
    async fn test_backfill_is_idempotent() {
        let (store, _, _, _) = seeded_store().await;
        let job = BackfillJob::new(store.clone(), store.clone());

        let first = job.run().await.expect("first run");
        assert_eq!(first.updated, 1);

        let second = job.run().await.expect("second run");
        assert_eq!(second.updated, 0);
        assert_eq!(second.skipped, 2);
        assert_eq!(second.unrouted, 1);
    }

    /// Ticket store whose updates fail for one chosen ticket.
    #[derive(Clone)]
    struct FlakyTicketStore {
        inner: MemoryStore,
        fail_for: TicketId,
    }

    #[async_trait]
    impl radar_store::TicketStore for FlakyTicketStore {
        async fn create(&self, ticket: &Ticket) -> Result<()> {
            self.inner.create(ticket).await
        }

        async fn get(&self, id: &TicketId) -> Result<Option<Ticket>> {
            self.inner.get(id).await
        }

        async fn list(&self) -> Result<Vec<Ticket>> {
            self.inner.list().await
        }

        async fn set_org_code(&self, id: &TicketId, org_code: &OrgCode) -> Result<()> {
            if *id == self.fail_for {
                return Err(Error::Store("write timed out".into()));
            }
            self.inner.set_org_code(id, org_code).await
        }
    }

    #[tokio::test]
    async fn test_one_failed_update_does_not_abort_the_batch() {
        let store = MemoryStore::new();
        store.add_organization(org_with_square("owner-1", "ORG1", 0.0, 0.0, 10.0));

        let doomed = Ticket::from_draft(TicketDraft::new(1.0, 1.0, "u1"), None);
        let fine = Ticket::from_draft(TicketDraft::new(2.0, 2.0, "u2"), None);
        store.create(&doomed).await.expect("create");
        store.create(&fine).await.expect("create");

        let flaky = FlakyTicketStore {
            inner: store.clone(),
            fail_for: doomed.id,
        };
        let job = BackfillJob::new(store.clone(), flaky);

        let summary = job.run().await.expect("run");
        assert_eq!(summary.updated, 1);
        assert_eq!(summary.failed, 1);

        // The ticket the flaky store let through was persisted.
        let fine = store.get(&fine.id).await.expect("get").expect("present");
        assert_eq!(fine.org_code, Some(OrgCode::new("ORG1")));
        // The doomed one stays unrouted, picked up again by the next run.
        let doomed = store.get(&doomed.id).await.expect("get").expect("present");
        assert_eq!(doomed.org_code, None);
    }

    #[tokio::test]
    async fn test_directory_failure_aborts_before_any_write() {
        struct DownDirectory;

        #[async_trait]
        impl radar_store::TerritoryDirectory for DownDirectory {
            async fn list_organizations(&self) -> Result<Vec<Organization>> {
                Err(Error::DirectoryUnavailable("connection refused".into()))
            }

            async fn get_organization(&self, _: &str) -> Result<Option<Organization>> {
                Err(Error::DirectoryUnavailable("connection refused".into()))
            }

            async fn update_bounds(
                &self,
                _: &str,
                _: radar_core::BoundingBox,
            ) -> Result<()> {
                Err(Error::DirectoryUnavailable("connection refused".into()))
            }
        }

        let store = MemoryStore::new();
        let ticket = Ticket::from_draft(TicketDraft::new(1.0, 1.0, "u1"), None);
        store.create(&ticket).await.expect("create");

        let job = BackfillJob::new(DownDirectory, store.clone());
        let err = job.run().await.expect_err("directory down");
        assert!(matches!(err, Error::DirectoryUnavailable(_)));

        let untouched = store.get(&ticket.id).await.expect("get").expect("present");
        assert_eq!(untouched.org_code, None);
    }
}
