//! Routing decisions at ticket creation and during backfill

use crate::resolver::{resolve_against, AssignmentResolver};
use radar_core::{OrgCode, Organization, Result, Ticket, TicketDraft};
use radar_store::TerritoryDirectory;

/// Attaches routing decisions to tickets. Pure decision-making: the
/// creation flow owns the write, keeping a single write path for new
/// tickets.
pub struct TicketRouter<D> {
    resolver: AssignmentResolver<D>,
}

impl<D: TerritoryDirectory> TicketRouter<D> {
    /// Create a router over the given directory
    pub fn new(directory: D) -> Self {
        Self {
            resolver: AssignmentResolver::new(directory),
        }
    }

    /// Routing decision for a draft about to be persisted.
    ///
    /// Returns the org code the caller should store on the new ticket,
    /// `None` when the report lands in nobody's territory. Routing is
    /// best-effort enrichment: a failure here should not block accepting
    /// the report, so callers typically log the error and persist the
    /// ticket unrouted.
    pub async fn route_on_create(&self, draft: &TicketDraft) -> Result<Option<OrgCode>> {
        self.resolver.resolve(draft.coordinate()).await
    }
}

/// Snapshot-based routing for an existing ticket during backfill.
///
/// Precondition: only called for unrouted tickets; the idempotence guard
/// (skip tickets that already carry a code) lives in the backfill loop so
/// this stays pure and testable. `None` means still unrouted, nothing to
/// persist.
pub fn route_existing(orgs: &[Organization], ticket: &Ticket) -> Option<OrgCode> {
    resolve_against(orgs, ticket.coordinate()).cloned()
}
