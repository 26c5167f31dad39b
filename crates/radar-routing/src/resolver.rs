//! Point-to-organization assignment

use radar_core::{Coordinate, OrgCode, Organization, Result};
use radar_store::TerritoryDirectory;
use tracing::debug;

/// Resolves which organization's territory contains a point.
pub struct AssignmentResolver<D> {
    directory: D,
}

impl<D: TerritoryDirectory> AssignmentResolver<D> {
    /// Create a resolver over the given directory
    pub fn new(directory: D) -> Self {
        Self {
            directory,
        }
    }

    /// Zero-or-one owning organization for a point.
    ///
    /// Organizations are sorted by `org_code` before matching, so a point
    /// inside overlapping territories always resolves to the
    /// lexicographically smallest code, independent of store enumeration
    /// order. `Ok(None)` means no territory contains the point; the ticket
    /// stays unrouted. Directory failures propagate untouched: an
    /// unreachable directory is retryable infrastructure trouble, not a
    /// "no match", and retrying is the caller's call.
    pub async fn resolve(&self, point: Coordinate) -> Result<Option<OrgCode>> {
        let mut orgs = self.directory.list_organizations().await?;
        orgs.sort_by(|a, b| a.org_code.cmp(&b.org_code));
        Ok(resolve_against(&orgs, point).cloned())
    }
}

/// First organization, in the given order, whose territory contains the
/// point. Organizations without a drawn territory (fewer than three
/// vertices) never match.
///
/// Pure snapshot form used by the backfill, which fetches and sorts the
/// organization list once for the whole batch.
pub fn resolve_against(orgs: &[Organization], point: Coordinate) -> Option<&OrgCode> {
    for org in orgs {
        if org.contains(point) {
            debug!(org_code = %org.org_code, "point resolved to territory");
            return Some(&org.org_code);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use radar_core::Error;
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

    #[tokio::test]
    async fn test_resolves_containing_territory() {
        let store = MemoryStore::new();
        store.add_organization(org_with_square("owner-1", "ORG1", 49.0, -97.2, 0.2));
        let resolver = AssignmentResolver::new(store);

        let resolved = resolver
            .resolve(Coordinate::new(49.1, -97.1))
            .await
            .expect("resolve");
        assert_eq!(resolved, Some(OrgCode::new("ORG1")));
    }

    #[tokio::test]
    async fn test_no_match_is_none_not_error() {
        let store = MemoryStore::new();
        store.add_organization(org_with_square("owner-1", "ORG1", 49.0, -97.2, 0.2));
        let resolver = AssignmentResolver::new(store);

        let resolved = resolver
            .resolve(Coordinate::new(50.0, -97.1))
            .await
            .expect("resolve");
        assert_eq!(resolved, None);
    }

    #[tokio::test]
    async fn test_empty_territory_never_matches() {
        let store = MemoryStore::new();
        // Two vertices only: "no territory drawn yet".
        store.add_organization(Organization::new("owner-1", "ORG1", "ORG1").with_territory(
            vec![Coordinate::new(0.0, 0.0), Coordinate::new(0.0, 2.0)],
        ));
        let resolver = AssignmentResolver::new(store);

        let resolved = resolver
            .resolve(Coordinate::new(0.0, 1.0))
            .await
            .expect("resolve");
        assert_eq!(resolved, None);
    }

    #[tokio::test]
    async fn test_overlap_resolves_to_smallest_code() {
        let store = MemoryStore::new();
        // Inserted in reverse lexicographic order on purpose: the resolver
        // must not depend on store enumeration order.
        store.add_organization(org_with_square("owner-b", "ORG-B", 0.0, 0.0, 2.0));
        store.add_organization(org_with_square("owner-a", "ORG-A", 0.0, 0.0, 2.0));
        let resolver = AssignmentResolver::new(store);

        let resolved = resolver
            .resolve(Coordinate::new(1.0, 1.0))
            .await
            .expect("resolve");
        assert_eq!(resolved, Some(OrgCode::new("ORG-A")));
    }

    #[tokio::test]
    async fn test_deterministic_for_fixed_snapshot() {
        let store = MemoryStore::new();
        store.add_organization(org_with_square("owner-b", "ORG-B", 0.0, 0.0, 2.0));
        store.add_organization(org_with_square("owner-a", "ORG-A", 0.0, 0.0, 2.0));
        let resolver = AssignmentResolver::new(store);

        let first = resolver
            .resolve(Coordinate::new(1.0, 1.0))
            .await
            .expect("resolve");
        for _ in 0..5 {
            let again = resolver
                .resolve(Coordinate::new(1.0, 1.0))
                .await
                .expect("resolve");
            assert_eq!(again, first);
        }
    }

    #[tokio::test]
    async fn test_directory_failure_propagates() {
        struct DownDirectory;

        #[async_trait::async_trait]
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

        let resolver = AssignmentResolver::new(DownDirectory);
        let err = resolver
            .resolve(Coordinate::new(0.0, 0.0))
            .await
            .expect_err("directory down");
        assert!(matches!(err, Error::DirectoryUnavailable(_)));
    }
}
