//! Organizations and their service territories

use crate::geo::{point_in_polygon, BoundingBox, Coordinate};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Minimum vertex count for a territory to form a region.
///
/// Anything smaller is "no territory drawn yet": a policy decision, not an
/// error, so such organizations simply never match a point.
pub const MIN_TERRITORY_VERTICES: usize = 3;

/// Opaque organization identifier attached to routed tickets.
///
/// Ordering is lexicographic and is what makes overlap resolution
/// deterministic: resolvers sort organizations by code before matching.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrgCode(String);

impl OrgCode {
    /// Create a new org code
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// Code as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for OrgCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for OrgCode {
    fn from(code: &str) -> Self {
        Self(code.to_string())
    }
}

/// An organization with its (possibly empty) service territory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Organization {
    /// Document key: the account that owns this organization
    pub owner_id: String,

    /// Routing code stored on tickets that fall inside the territory
    pub org_code: OrgCode,

    /// Display name
    pub name: String,

    /// Territory polygon vertices, implicitly closed
    #[serde(default)]
    pub territory: Vec<Coordinate>,

    /// Denormalized territory bounds, refreshed after territory edits
    #[serde(default)]
    pub bounds: Option<BoundingBox>,

    /// Last modification timestamp
    pub updated_at: DateTime<Utc>,
}

impl Organization {
    /// Create an organization with no territory drawn
    pub fn new(
        owner_id: impl Into<String>,
        org_code: impl Into<OrgCode>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            owner_id: owner_id.into(),
            org_code: org_code.into(),
            name: name.into(),
            territory: Vec::new(),
            bounds: None,
            updated_at: Utc::now(),
        }
    }

    /// Set the territory polygon
    pub fn with_territory(mut self, territory: Vec<Coordinate>) -> Self {
        self.territory = territory;
        self
    }

    /// Whether enough vertices exist to form a region
    pub fn has_territory(&self) -> bool {
        self.territory.len() >= MIN_TERRITORY_VERTICES
    }

    /// Whether the territory contains the point
    pub fn contains(&self, point: Coordinate) -> bool {
        self.has_territory() && point_in_polygon(point, &self.territory)
    }

    /// Current bounds of the territory vertices
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        BoundingBox::of(&self.territory)
    }
}

impl From<String> for OrgCode {
    fn from(code: String) -> Self {
        Self(code)
    }
}
