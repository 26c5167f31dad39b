//! # Radar Core
//!
//! Domain model for Issue Radar: coordinates, territory polygons,
//! organizations, and tickets, plus the point-in-polygon kernel that
//! decides which organization owns a reported location.

pub mod error;
pub mod geo;
pub mod org;
pub mod ticket;

pub use error::{Error, Result};
pub use geo::{point_in_polygon, BoundingBox, Coordinate};
pub use org::{OrgCode, Organization, MIN_TERRITORY_VERTICES};
pub use ticket::{Ticket, TicketDraft, TicketId, TicketPriority, TicketStatus};

/// Core version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
