//! # Radar Routing
//!
//! The assignment engine: resolves a reported coordinate to the owning
//! organization, routes new tickets at creation time, and backfills
//! tickets that predate routing or missed it.

pub mod backfill;
pub mod bounds;
pub mod resolver;
pub mod router;

pub use backfill::{BackfillJob, BackfillSummary};
pub use bounds::refresh_bounds;
pub use resolver::{resolve_against, AssignmentResolver};
pub use router::{route_existing, TicketRouter};

/// Routing version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
