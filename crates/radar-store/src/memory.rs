//! In-memory store for tests and embedded use

use crate::ports::{TerritoryDirectory, TicketStore};
use async_trait::async_trait;
use chrono::Utc;
use radar_core::{BoundingBox, Error, OrgCode, Organization, Result, Ticket, TicketId};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Default)]
struct Inner {
    organizations: RwLock<Vec<Organization>>,
    tickets: RwLock<Vec<Ticket>>,
}

/// In-memory implementation of both persistence ports.
///
/// Clones share state, so a test can hand a clone to a job and assert
/// against the original. Insertion order is preserved for both collections.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Inner>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an organization (insert or replace by owner id)
    pub fn add_organization(&self, org: Organization) {
        let mut orgs = write_lock(&self.inner.organizations);
        if let Some(existing) = orgs.iter_mut().find(|o| o.owner_id == org.owner_id) {
            *existing = org;
        } else {
            orgs.push(org);
        }
    }
}

fn read_lock<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn write_lock<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[async_trait]
impl TerritoryDirectory for MemoryStore {
    async fn list_organizations(&self) -> Result<Vec<Organization>> {
        Ok(read_lock(&self.inner.organizations).clone())
    }

    async fn get_organization(&self, owner_id: &str) -> Result<Option<Organization>> {
        Ok(read_lock(&self.inner.organizations)
            .iter()
            .find(|o| o.owner_id == owner_id)
            .cloned())
    }

    async fn update_bounds(&self, owner_id: &str, bounds: BoundingBox) -> Result<()> {
        let mut orgs = write_lock(&self.inner.organizations);
        let org = orgs
            .iter_mut()
            .find(|o| o.owner_id == owner_id)
            .ok_or_else(|| Error::NotFound(format!("organization {owner_id}")))?;
        org.bounds = Some(bounds);
        org.updated_at = Utc::now();
        Ok(())
    }
}

#[async_trait]
impl TicketStore for MemoryStore {
    async fn create(&self, ticket: &Ticket) -> Result<()> {
        write_lock(&self.inner.tickets).push(ticket.clone());
        Ok(())
    }

    async fn get(&self, id: &TicketId) -> Result<Option<Ticket>> {
        Ok(read_lock(&self.inner.tickets)
            .iter()
            .find(|t| t.id == *id)
            .cloned())
    }

    async fn list(&self) -> Result<Vec<Ticket>> {
        Ok(read_lock(&self.inner.tickets).clone())
    }

    async fn set_org_code(&self, id: &TicketId, org_code: &OrgCode) -> Result<()> {
        let mut tickets = write_lock(&self.inner.tickets);
        let ticket = tickets
            .iter_mut()
            .find(|t| t.id == *id)
            .ok_or_else(|| Error::NotFound(format!("ticket {id}")))?;
        ticket.org_code = Some(org_code.clone());
        Ok(())
    }
}
