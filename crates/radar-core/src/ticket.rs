//! Reported tickets and their lifecycle

use crate::error::Error;
use crate::geo::Coordinate;
use crate::org::OrgCode;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

/// Unique ticket identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TicketId(Uuid);

impl TicketId {
    /// Create a new random ticket ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create from UUID
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Default for TicketId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for TicketId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TicketId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|e| Error::Store(format!("invalid ticket id {s:?}: {e}")))
    }
}

/// Ticket triage status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    /// Reported, not yet picked up
    Open,
    /// An organization is working on it
    InProgress,
    /// Fixed or closed out
    Resolved,
}

impl TicketStatus {
    /// Storage form
    pub fn as_str(self) -> &'static str {
        match self {
            TicketStatus::Open => "open",
            TicketStatus::InProgress => "in_progress",
            TicketStatus::Resolved => "resolved",
        }
    }
}

impl FromStr for TicketStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "open" => Ok(TicketStatus::Open),
            "in_progress" => Ok(TicketStatus::InProgress),
            "resolved" => Ok(TicketStatus::Resolved),
            other => Err(Error::Store(format!("unknown ticket status: {other}"))),
        }
    }
}

/// Ticket priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketPriority {
    Low,
    Medium,
    High,
}

impl TicketPriority {
    /// Storage form
    pub fn as_str(self) -> &'static str {
        match self {
            TicketPriority::Low => "low",
            TicketPriority::Medium => "medium",
            TicketPriority::High => "high",
        }
    }
}

impl FromStr for TicketPriority {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(TicketPriority::Low),
            "medium" => Ok(TicketPriority::Medium),
            "high" => Ok(TicketPriority::High),
            other => Err(Error::Store(format!("unknown ticket priority: {other}"))),
        }
    }
}

/// The pre-persistence shape of a report, handed to routing before the
/// creation flow writes the ticket document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TicketDraft {
    /// Reported latitude
    pub latitude: f64,

    /// Reported longitude
    pub longitude: f64,

    /// Free-text description of the issue
    pub description: String,

    /// Reference to an uploaded photo, if any
    pub photo_ref: Option<String>,

    /// Reporter-chosen priority
    pub priority: TicketPriority,

    /// Reporting user identifier
    pub created_by: String,
}

impl TicketDraft {
    /// Create a draft at the dropped pin
    pub fn new(latitude: f64, longitude: f64, created_by: impl Into<String>) -> Self {
        Self {
            latitude,
            longitude,
            description: String::new(),
            photo_ref: None,
            priority: TicketPriority::Medium,
            created_by: created_by.into(),
        }
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Attach a photo reference
    pub fn with_photo_ref(mut self, photo_ref: impl Into<String>) -> Self {
        self.photo_ref = Some(photo_ref.into());
        self
    }

    /// Set the priority
    pub fn with_priority(mut self, priority: TicketPriority) -> Self {
        self.priority = priority;
        self
    }

    /// The reported location
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude)
    }
}

/// A reported issue ticket.
///
/// `org_code` is write-once: `None` means unrouted (invisible to
/// organization-scoped views); once set, later resolutions must not
/// overwrite it unless it is explicitly cleared first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ticket {
    /// Unique ticket identifier
    pub id: TicketId,

    /// Reported latitude
    pub latitude: f64,

    /// Reported longitude
    pub longitude: f64,

    /// Free-text description of the issue
    pub description: String,

    /// Reference to an uploaded photo, if any
    pub photo_ref: Option<String>,

    /// Current triage status
    pub status: TicketStatus,

    /// Priority
    pub priority: TicketPriority,

    /// Reporting user identifier
    pub created_by: String,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Owning organization, once resolved
    pub org_code: Option<OrgCode>,
}

impl Ticket {
    /// Materialize a draft into a ticket, carrying the routing decision
    /// made at creation time (possibly none).
    pub fn from_draft(draft: TicketDraft, org_code: Option<OrgCode>) -> Self {
        Self {
            id: TicketId::new(),
            latitude: draft.latitude,
            longitude: draft.longitude,
            description: draft.description,
            photo_ref: draft.photo_ref,
            status: TicketStatus::Open,
            priority: draft.priority,
            created_by: draft.created_by,
            created_at: Utc::now(),
            org_code,
        }
    }

    /// The reported location
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude)
    }

    /// Whether an organization already owns this ticket
    pub fn is_routed(&self) -> bool {
        self.org_code.is_some()
    }

    /// Mark the ticket as being worked on
    pub fn mark_in_progress(&mut self) {
        self.status = TicketStatus::InProgress;
    }

    /// Mark the ticket as resolved
    pub fn mark_resolved(&mut self) {
        self.status = TicketStatus::Resolved;
    }
}
