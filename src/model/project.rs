//! Project data model: tag vocabulary and declared asset membership.
//!
//! # File Format
//!
//! Projects are stored as JSON:
//!
//! ```json
//! {
//!   "id": "p1",
//!   "name": "Traffic",
//!   "version": "0.1.0",
//!   "sourceFolder": "/data/traffic",
//!   "tags": [{ "name": "car", "color": [128, 128, 0] }],
//!   "assets": [{ "id": "a1", "kind": "image", ... }]
//! }
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::SessionError;
use crate::model::asset::{Asset, AssetId};
use crate::model::tag::Tag;
use crate::model::version;

/// A project: its tag vocabulary and the assets it has recorded.
///
/// `assets` records membership and tagging state only, in the order the assets
/// were first seen; regions live in the per-asset metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub name: String,
    /// Format version for forward compatibility.
    pub version: String,
    /// Folder the asset provider scans for media.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_folder: Option<PathBuf>,
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(default)]
    pub assets: Vec<Asset>,
}

impl Project {
    /// Create a new empty project.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            version: version::current_version(),
            source_folder: None,
            tags: Vec::new(),
            assets: Vec::new(),
        }
    }

    pub fn with_source_folder(mut self, folder: impl Into<PathBuf>) -> Self {
        self.source_folder = Some(folder.into());
        self
    }

    pub fn with_tags(mut self, tags: Vec<Tag>) -> Self {
        self.tags = tags;
        self
    }

    /// Add a declared asset at the end, or replace it where it already is.
    pub fn upsert_asset(&mut self, asset: Asset) {
        match self.assets.iter_mut().find(|a| a.id == asset.id) {
            Some(existing) => *existing = asset,
            None => self.assets.push(asset),
        }
    }

    pub fn asset(&self, id: &AssetId) -> Option<&Asset> {
        self.assets.iter().find(|a| &a.id == id)
    }

    pub fn tag(&self, name: &str) -> Option<&Tag> {
        self.tags.iter().find(|t| t.name == name)
    }

    pub fn has_tag(&self, name: &str) -> bool {
        self.tag(name).is_some()
    }

    /// Save the project to a JSON string.
    pub fn to_json(&self) -> Result<String, SessionError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load a project from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, SessionError> {
        let project: Self = serde_json::from_str(json)?;
        version::warn_if_incompatible("Project", &project.version);
        Ok(project)
    }
}
