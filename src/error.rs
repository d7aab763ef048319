//! Error types for the annotation session engine.

use thiserror::Error;

use crate::model::{AssetId, RegionId, RegionType};
use crate::store::StoreError;

/// Errors surfaced by the session engine.
///
/// None of these terminate a session: the worst outcome is a disabled drawing
/// surface until the user re-selects an asset.
#[derive(Error, Debug)]
pub enum SessionError {
    /// No persisted metadata exists for the asset.
    #[error("No metadata found for asset {asset_id}")]
    NotFound {
        /// The asset that had no metadata
        asset_id: AssetId,
    },

    /// Region geometry is malformed and was rejected before entering the model.
    #[error("Invalid {region_type:?} geometry: {points} points, at least {required} required")]
    InvalidGeometry {
        /// Shape type of the rejected region
        region_type: RegionType,
        /// Number of points supplied
        points: usize,
        /// Minimum number of points for this shape type
        required: usize,
    },

    /// A coordinate was NaN or infinite.
    #[error("Invalid region coordinates: {message}")]
    InvalidCoordinates {
        /// Description of the coordinate error
        message: String,
    },

    /// An asynchronous result arrived for an asset that is no longer selected.
    #[error("Discarded stale response for asset {asset_id}")]
    StaleResponse {
        /// The asset the stale result belonged to
        asset_id: AssetId,
    },

    /// Loading or saving through a persistence collaborator failed.
    #[error("Failed to {operation} {target}: {source}")]
    PersistenceFailure {
        /// What was attempted ("load", "save", ...)
        operation: &'static str,
        /// What was being persisted
        target: String,
        /// Underlying storage error
        #[source]
        source: StoreError,
    },

    /// Asset discovery failed; the session continues with declared assets only.
    #[error("Asset discovery failed, using project assets only: {source}")]
    DiscoveryFailure {
        /// Underlying provider error
        #[source]
        source: StoreError,
    },

    /// The asset id is not part of the project or the discovered collection.
    #[error("Unknown asset: {0}")]
    UnknownAsset(AssetId),

    /// Two regions of one asset share an id.
    #[error("Duplicate region id: {0}")]
    DuplicateRegion(RegionId),

    /// The region id is not part of the active asset.
    #[error("Unknown region: {0}")]
    UnknownRegion(RegionId),

    /// No project tag exists at the requested position or under the name.
    #[error("Unknown tag: {0}")]
    UnknownTag(String),

    /// An operation needs an active asset but none is loaded.
    #[error("No asset is active")]
    NoActiveAsset,

    /// The drawing surface is disabled while an asset is in transition.
    #[error("Drawing surface is disabled")]
    SurfaceDisabled,

    /// A metadata document could not be encoded or decoded.
    #[error("Metadata codec error: {0}")]
    Codec(#[from] serde_json::Error),
}

impl SessionError {
    /// Wrap a storage error raised while performing `operation` on `target`.
    pub fn persistence(
        operation: &'static str,
        target: impl Into<String>,
        source: StoreError,
    ) -> Self {
        Self::PersistenceFailure {
            operation,
            target: target.into(),
            source,
        }
    }

    /// Map a failed metadata load of `asset_id`.
    ///
    /// A missing record becomes [`SessionError::NotFound`], which callers
    /// recover from with empty metadata; anything else is a persistence failure.
    pub fn load_failure(asset_id: &AssetId, source: StoreError) -> Self {
        if source.is_not_found() {
            Self::NotFound {
                asset_id: asset_id.clone(),
            }
        } else {
            Self::persistence("load", format!("metadata of {}", asset_id), source)
        }
    }

    /// Create an invalid coordinates error.
    pub fn invalid_coordinates(message: impl Into<String>) -> Self {
        Self::InvalidCoordinates {
            message: message.into(),
        }
    }

    /// Whether this error should be shown to the user.
    ///
    /// Stale responses are dropped silently.
    pub fn is_user_visible(&self) -> bool {
        !matches!(self, SessionError::StaleResponse { .. })
    }
}
