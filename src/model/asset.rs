//! Asset data model: images, videos and extracted video frames.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable identifier of an asset within a project.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetId(pub String);

impl AssetId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AssetId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Media kind of an asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AssetKind {
    Image,
    Video,
    /// A single frame extracted from a video; always has a root asset.
    VideoFrame,
}

impl AssetKind {
    /// Whether regions drawn on this kind of asset decide its tagging state.
    ///
    /// Videos are containers: their state is rolled up from their frames.
    pub fn is_taggable(&self) -> bool {
        !matches!(self, AssetKind::Video)
    }
}

/// Tagging progress of an asset.
///
/// The ordering is meaningful: `Unvisited < Visited < Tagged`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub enum AssetState {
    #[default]
    Unvisited,
    Visited,
    Tagged,
}

/// Native pixel dimensions of an asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetSize {
    pub width: u32,
    pub height: u32,
}

/// A unit of tagging work.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    pub id: AssetId,
    /// Display name (usually the file name)
    pub name: String,
    /// Source reference: a path or URL
    pub path: String,
    pub kind: AssetKind,
    #[serde(default)]
    pub state: AssetState,
    /// Root video of a frame asset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root_asset_id: Option<AssetId>,
    /// Position of a frame asset inside its root video, in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<AssetSize>,
}

impl Asset {
    /// Create a new unvisited asset.
    pub fn new(id: impl Into<AssetId>, path: impl Into<String>, kind: AssetKind) -> Self {
        let path = path.into();
        let name = path
            .rsplit(['/', '\\'])
            .next()
            .filter(|n| !n.is_empty())
            .unwrap_or("unknown")
            .to_string();

        Self {
            id: id.into(),
            name,
            path,
            kind,
            state: AssetState::Unvisited,
            root_asset_id: None,
            timestamp: None,
            size: None,
        }
    }

    /// Create a frame asset belonging to `root` at `timestamp` seconds.
    pub fn video_frame(id: impl Into<AssetId>, root: &Asset, timestamp: f64) -> Self {
        let path = format!("{}#t={}", root.path, timestamp);
        let mut frame = Self::new(id, path, AssetKind::VideoFrame);
        frame.name = format!("{}#t={}", root.name, timestamp);
        frame.root_asset_id = Some(root.id.clone());
        frame.timestamp = Some(timestamp);
        frame.size = root.size;
        frame
    }

    /// Set the native dimensions.
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.size = Some(AssetSize { width, height });
        self
    }

    /// Set the state.
    pub fn with_state(mut self, state: AssetState) -> Self {
        self.state = state;
        self
    }

    /// Whether this asset is a frame that rolls up into a root video.
    pub fn is_child(&self) -> bool {
        self.root_asset_id.is_some()
    }
}

impl From<String> for AssetId {
    fn from(id: String) -> Self {
        Self(id)
    }
}
