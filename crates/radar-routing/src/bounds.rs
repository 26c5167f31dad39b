//! Territory bounds maintenance

use radar_core::{BoundingBox, Error, Result};
use radar_store::TerritoryDirectory;
use tracing::info;

/// Recompute and persist the bounding box of an organization's territory.
///
/// Called after a territory edit so map views can fit the service area
/// without re-scanning the polygon. Returns the new bounds, or `None`
/// without writing anything when no territory vertices exist yet. Errors
/// when the organization itself is missing.
pub async fn refresh_bounds<D: TerritoryDirectory>(
    directory: &D,
    owner_id: &str,
) -> Result<Option<BoundingBox>> {
    let org = directory
        .get_organization(owner_id)
        .await?
        .ok_or_else(|| Error::NotFound(format!("organization {owner_id}")))?;

    let Some(bounds) = BoundingBox::of(&org.territory) else {
        return Ok(None);
    };

    directory.update_bounds(owner_id, bounds).await?;
    info!(org_code = %org.org_code, "territory bounds refreshed");
    Ok(Some(bounds))
}
