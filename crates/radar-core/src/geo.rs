//! Geometry kernel: coordinates, polygons, and containment

use serde::{Deserialize, Serialize};

/// A WGS-84 coordinate pair in degrees.
///
/// Accepts both `{latitude, longitude}` and the abbreviated `{lat, lng}`
/// field spellings on deserialization; territory documents in the wild use
/// either. No range validation is performed here, callers supply sane values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    /// Latitude in degrees
    #[serde(alias = "lat")]
    pub latitude: f64,

    /// Longitude in degrees
    #[serde(alias = "lng")]
    pub longitude: f64,
}

impl Coordinate {
    /// Create a new coordinate
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Even-odd (ray casting) point-in-polygon test.
///
/// Casts a horizontal ray from the point along the longitude axis and counts
/// boundary crossings; an odd count means inside. The vertex sequence is
/// implicitly closed (last vertex connects back to first) and traversal
/// direction does not matter.
///
/// Defined edge behavior, pinned by tests:
/// - fewer than three vertices never contains anything and never panics;
/// - edges parallel to the ray (equal longitudes) never register as
///   crossings, so points on such an edge can report either side;
/// - no antimeridian handling: polygons must not cross ±180° longitude.
///
/// Total over well-typed inputs, no shared state, safe to call concurrently.
pub fn point_in_polygon(point: Coordinate, polygon: &[Coordinate]) -> bool {
    if polygon.len() < 3 {
        return false;
    }

    let lat = point.latitude;
    let lng = point.longitude;
    let mut inside = false;

    let mut j = polygon.len() - 1;
    for i in 0..polygon.len() {
        let xi = polygon[i].latitude;
        let yi = polygon[i].longitude;
        let xj = polygon[j].latitude;
        let yj = polygon[j].longitude;

        let crosses = (yi > lng) != (yj > lng) && lat < (xj - xi) * (lng - yi) / (yj - yi) + xi;
        if crosses {
            inside = !inside;
        }
        j = i;
    }

    inside
}

/// Axis-aligned bounds of a territory polygon.
///
/// Organizations keep a denormalized copy of this next to their territory so
/// map views can fit the service area without re-scanning the polygon.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lng: f64,
    pub max_lng: f64,
}

impl BoundingBox {
    /// Bounds of a vertex set, or `None` when it is empty.
    pub fn of(points: &[Coordinate]) -> Option<Self> {
        let first = points.first()?;
        let mut bounds = Self {
            min_lat: first.latitude,
            max_lat: first.latitude,
            min_lng: first.longitude,
            max_lng: first.longitude,
        };
        for p in &points[1..] {
            bounds.min_lat = bounds.min_lat.min(p.latitude);
            bounds.max_lat = bounds.max_lat.max(p.latitude);
            bounds.min_lng = bounds.min_lng.min(p.longitude);
            bounds.max_lng = bounds.max_lng.max(p.longitude);
        }
        Some(bounds)
    }
}
