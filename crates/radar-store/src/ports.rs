//! Persistence ports consumed by the routing layer

use async_trait::async_trait;
use radar_core::{BoundingBox, OrgCode, Organization, Result, Ticket, TicketId};

/// Read-side view of organizations and their territories.
///
/// Implementations are read-through: every call reflects current persisted
/// state, so a territory edit is visible to the next resolution. Wrap with
/// [`crate::CachedDirectory`] only where a bounded staleness window is
/// acceptable.
#[async_trait]
pub trait TerritoryDirectory: Send + Sync {
    /// All organizations with their territories.
    ///
    /// Fails with [`radar_core::Error::DirectoryUnavailable`] when the
    /// backing store cannot be reached or returns malformed documents;
    /// callers may treat that as retryable.
    async fn list_organizations(&self) -> Result<Vec<Organization>>;

    /// Single organization by the account that owns it, or `None`.
    async fn get_organization(&self, owner_id: &str) -> Result<Option<Organization>>;

    /// Persist recomputed territory bounds. Partial update: touches only
    /// the bounds fields and the modification timestamp.
    async fn update_bounds(&self, owner_id: &str, bounds: BoundingBox) -> Result<()>;
}

/// Ticket documents keyed by id.
#[async_trait]
pub trait TicketStore: Send + Sync {
    /// Persist a new ticket.
    async fn create(&self, ticket: &Ticket) -> Result<()>;

    /// Fetch one ticket, or `None`.
    async fn get(&self, id: &TicketId) -> Result<Option<Ticket>>;

    /// All tickets in creation order. The order is stable within a run;
    /// nothing is guaranteed across runs.
    async fn list(&self) -> Result<Vec<Ticket>>;

    /// Attach the routed organization to a ticket.
    ///
    /// Single-field partial update: must not touch any other ticket field.
    /// The write-once guard (never overwrite an existing code) lives in the
    /// callers that drive routing, not here.
    async fn set_org_code(&self, id: &TicketId, org_code: &OrgCode) -> Result<()>;
}
