//! Per-asset annotation results.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::SessionError;
use crate::model::asset::{Asset, AssetState};
use crate::model::region::{Region, RegionId};
use crate::model::version;

/// Regions and state of one asset, fetched and persisted as a unit.
///
/// Region identifiers are unique within one instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetMetadata {
    pub asset: Asset,
    #[serde(default)]
    pub regions: Vec<Region>,
    /// Schema version for forward compatibility.
    pub version: String,
}

impl AssetMetadata {
    /// Empty metadata for an asset that was never saved.
    pub fn empty(asset: Asset) -> Self {
        Self {
            asset,
            regions: Vec::new(),
            version: version::current_version(),
        }
    }

    /// Encode as pretty JSON.
    pub fn to_json(&self) -> Result<String, SessionError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Decode from JSON, rejecting malformed regions.
    ///
    /// Duplicate tag names within a region are collapsed.
    pub fn from_json(json: &str) -> Result<Self, SessionError> {
        let mut metadata: Self = serde_json::from_str(json)?;
        version::warn_if_incompatible("Asset metadata", &metadata.version);

        let mut seen = HashSet::new();
        for region in &mut metadata.regions {
            region.validate()?;
            region.dedup_tags();
            if !seen.insert(region.id.clone()) {
                return Err(SessionError::DuplicateRegion(region.id.clone()));
            }
        }
        Ok(metadata)
    }

    pub fn region(&self, id: &RegionId) -> Option<&Region> {
        self.regions.iter().find(|r| &r.id == id)
    }

    pub fn region_mut(&mut self, id: &RegionId) -> Option<&mut Region> {
        self.regions.iter_mut().find(|r| &r.id == id)
    }

    /// Append a region. Returns false (and leaves the list untouched) if a
    /// region with the same id exists.
    pub fn push_region(&mut self, region: Region) -> bool {
        if self.region(&region.id).is_some() {
            return false;
        }
        self.regions.push(region);
        true
    }

    /// Remove a region by id.
    pub fn remove_region(&mut self, id: &RegionId) -> Option<Region> {
        let index = self.regions.iter().position(|r| &r.id == id)?;
        Some(self.regions.remove(index))
    }

    /// Whether any region carries at least one tag.
    pub fn has_tagged_regions(&self) -> bool {
        self.regions.iter().any(Region::is_tagged)
    }

    /// State this asset reaches once it has been viewed with these regions.
    pub fn derived_state(&self) -> AssetState {
        if self.has_tagged_regions() {
            AssetState::Tagged
        } else {
            AssetState::Visited
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::asset::AssetKind;
    use crate::model::region::RegionData;

    fn region(id: &str) -> Region {
        Region::from_data(RegionId::from(id), RegionData::rectangle(0.0, 0.0, 10.0, 10.0)).unwrap()
    }

    fn metadata() -> AssetMetadata {
        AssetMetadata::empty(Asset::new("a1", "a1.png", AssetKind::Image))
    }

    #[test]
    fn test_empty_metadata() {
        let md = metadata();
        assert!(md.regions.is_empty());
        assert_eq!(md.version, version::FORMAT_VERSION);
        assert_eq!(md.derived_state(), AssetState::Visited);
    }

    #[test]
    fn test_push_rejects_duplicate_ids() {
        let mut md = metadata();
        assert!(md.push_region(region("r1")));
        assert!(!md.push_region(region("r1")));
        assert_eq!(md.regions.len(), 1);
    }

    #[test]
    fn test_derived_state_requires_a_tag() {
        let mut md = metadata();
        md.push_region(region("r1"));
        assert_eq!(md.derived_state(), AssetState::Visited);

        md.region_mut(&RegionId::from("r1")).unwrap().add_tag("car");
        assert_eq!(md.derived_state(), AssetState::Tagged);
    }

    #[test]
    fn test_decode_rejects_invalid_geometry() {
        let mut md = metadata();
        let mut bad = region("r1");
        bad.points.truncate(2);
        md.regions.push(bad);
        let json = serde_json::to_string(&md).unwrap();

        assert!(matches!(
            AssetMetadata::from_json(&json),
            Err(SessionError::InvalidGeometry { .. })
        ));
    }

    #[test]
    fn test_decode_rejects_duplicate_region_ids() {
        let mut md = metadata();
        md.regions.push(region("r1"));
        md.regions.push(region("r1"));
        let json = serde_json::to_string(&md).unwrap();
        assert!(matches!(
            AssetMetadata::from_json(&json),
            Err(SessionError::DuplicateRegion(_))
        ));
    }

    #[test]
    fn test_decode_collapses_duplicate_tags() {
        let json = r#"{
            "asset": {
                "id": "a1", "name": "a1.png", "path": "a1.png", "kind": "image", "state": "tagged"
            },
            "regions": [{
                "id": "r1",
                "type": "polygon",
                "points": [{"x": 0, "y": 0}, {"x": 4, "y": 0}, {"x": 0, "y": 4}],
                "tags": ["car", "car", "bus"]
            }],
            "version": "0.1.0"
        }"#;
        let md = AssetMetadata::from_json(json).unwrap();
        assert_eq!(md.asset.state, AssetState::Tagged);
        assert_eq!(md.regions[0].tags, vec!["car".to_string(), "bus".to_string()]);
    }
}
