//! Persistence contracts for asset metadata, projects and asset discovery.
//!
//! The session engine only talks to these traits. [`fs`] provides JSON-file
//! implementations; tests substitute in-memory doubles.

pub mod fs;
mod locks;

use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;

use crate::model::{Asset, AssetId, AssetMetadata, Project};

pub use locks::AssetLocks;

/// Errors raised by storage collaborators.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Nothing has been stored under this key yet.
    #[error("Not found: {0}")]
    NotFound(String),

    /// I/O error during file operations
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing or serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Any other backend failure
    #[error("Storage backend error: {0}")]
    Backend(String),
}

impl StoreError {
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend(message.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound(_))
    }
}

/// Per-asset annotation storage.
///
/// `save` overwrites the whole record; there is no partial region patching
/// and no optimistic locking (last writer wins).
#[async_trait]
pub trait MetadataStore: Send + Sync {
    /// Load the metadata of `asset`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if nothing was saved for the asset.
    async fn load(&self, asset: &Asset) -> Result<AssetMetadata, StoreError>;

    /// Persist the full metadata and echo the saved value.
    async fn save(&self, metadata: &AssetMetadata) -> Result<AssetMetadata, StoreError>;
}

/// Discovers the physical assets at a project's source location.
#[async_trait]
pub trait AssetProvider: Send + Sync {
    /// List assets in a stable order.
    async fn discover(&self, project: &Project) -> Result<Vec<Asset>, StoreError>;
}

/// Reference to a stored project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectRef {
    /// A project file on disk
    Path(PathBuf),
    /// A project known by id to the store
    Id(String),
}

/// Project-level persistence.
#[async_trait]
pub trait ProjectStore: Send + Sync {
    /// Persist the project and echo the saved value.
    async fn save(&self, project: &Project) -> Result<Project, StoreError>;

    /// Load a project.
    async fn load(&self, reference: &ProjectRef) -> Result<Project, StoreError>;
}

/// Key used by stores to name an asset's record.
pub(crate) fn metadata_key(asset_id: &AssetId) -> String {
    format!("{}-asset.json", asset_id)
}
