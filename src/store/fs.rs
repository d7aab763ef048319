//! JSON-file implementations of the storage contracts.
//!
//! Layout of a project folder:
//!
//! ```text
//! <folder>/
//!   photos/cat.jpg               discovered media (any depth)
//!   .mvat/
//!     <project-id>.mvat.json     project record
//!     <asset-id>-asset.json      one metadata record per asset
//! ```

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::model::{Asset, AssetKind, AssetMetadata, Project};
use crate::store::{
    AssetProvider, MetadataStore, ProjectRef, ProjectStore, StoreError, metadata_key,
};

/// Supported image extensions
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp", "tiff", "tif", "webp"];

/// Supported video extensions
pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "mov", "avi", "mkv", "webm"];

/// Project file extension (appended to the project id).
pub const PROJECT_FILE_SUFFIX: &str = ".mvat.json";

/// Name of the folder holding project and metadata records.
pub const DEFAULT_METADATA_DIR: &str = ".mvat";

/// Classify a path by its extension.
pub fn media_kind(path: &Path) -> Option<AssetKind> {
    let ext = path.extension()?.to_str()?.to_lowercase();
    if IMAGE_EXTENSIONS.contains(&ext.as_str()) {
        Some(AssetKind::Image)
    } else if VIDEO_EXTENSIONS.contains(&ext.as_str()) {
        Some(AssetKind::Video)
    } else {
        None
    }
}

/// Deterministic asset id for a source path.
pub fn asset_id_for_path(path: &str) -> String {
    uuid::Uuid::new_v5(&uuid::Uuid::NAMESPACE_URL, path.as_bytes()).to_string()
}

/// Write `contents` to `path` through a temporary sibling and rename, so a
/// failed write never leaves a truncated record behind.
async fn write_atomic(path: &Path, contents: String) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    let tmp = path.with_extension("tmp");
    tokio::fs::write(&tmp, contents).await?;
    tokio::fs::rename(&tmp, path).await?;
    Ok(())
}

async fn read_record(path: &Path) -> Result<String, StoreError> {
    match tokio::fs::read_to_string(path).await {
        Ok(json) => Ok(json),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(StoreError::NotFound(path.display().to_string()))
        }
        Err(e) => Err(StoreError::Io(e)),
    }
}

// ============================================================================
// Metadata
// ============================================================================

/// Stores each asset's metadata as `<asset-id>-asset.json` in one directory.
#[derive(Debug, Clone)]
pub struct FsMetadataStore {
    dir: PathBuf,
}

impl FsMetadataStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[async_trait]
impl MetadataStore for FsMetadataStore {
    async fn load(&self, asset: &Asset) -> Result<AssetMetadata, StoreError> {
        let path = self.dir.join(metadata_key(&asset.id));
        let json = read_record(&path).await?;
        let metadata = AssetMetadata::from_json(&json)
            .map_err(|e| StoreError::backend(format!("{}: {}", path.display(), e)))?;
        log::debug!("Loaded {} regions from {:?}", metadata.regions.len(), path);
        Ok(metadata)
    }

    async fn save(&self, metadata: &AssetMetadata) -> Result<AssetMetadata, StoreError> {
        let path = self.dir.join(metadata_key(&metadata.asset.id));
        let json = serde_json::to_string_pretty(metadata)?;
        write_atomic(&path, json).await?;
        log::debug!("Saved {} regions to {:?}", metadata.regions.len(), path);
        Ok(metadata.clone())
    }
}

// ============================================================================
// Projects
// ============================================================================

/// Stores projects as `<project-id>.mvat.json` in one directory.
#[derive(Debug, Clone)]
pub struct FsProjectStore {
    dir: PathBuf,
}

impl FsProjectStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// File a project with `id` is saved to.
    pub fn project_path(&self, id: &str) -> PathBuf {
        self.dir.join(format!("{}{}", id, PROJECT_FILE_SUFFIX))
    }
}

#[async_trait]
impl ProjectStore for FsProjectStore {
    async fn save(&self, project: &Project) -> Result<Project, StoreError> {
        let path = self.project_path(&project.id);
        let json = serde_json::to_string_pretty(project)?;
        write_atomic(&path, json).await?;
        log::info!("Saved project '{}' to {:?}", project.name, path);
        Ok(project.clone())
    }

    async fn load(&self, reference: &ProjectRef) -> Result<Project, StoreError> {
        let path = match reference {
            ProjectRef::Path(path) => path.clone(),
            ProjectRef::Id(id) => self.project_path(id),
        };
        let json = read_record(&path).await?;
        Project::from_json(&json)
            .map_err(|e| StoreError::backend(format!("{}: {}", path.display(), e)))
    }
}

// ============================================================================
// Discovery
// ============================================================================

/// Discovers images and videos under the project's source folder.
#[derive(Debug, Clone, Default)]
pub struct FsAssetProvider {
    /// Folder to scan when the project does not name one.
    fallback_folder: Option<PathBuf>,
}

impl FsAssetProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_folder(folder: impl Into<PathBuf>) -> Self {
        Self {
            fallback_folder: Some(folder.into()),
        }
    }

    /// Recursively scan a folder for media files.
    fn scan_folder_recursive(folder: &Path, found: &mut Vec<PathBuf>) -> std::io::Result<()> {
        for entry in std::fs::read_dir(folder)?.filter_map(|e| e.ok()) {
            let path = entry.path();
            let hidden = path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with('.'));
            if hidden {
                continue;
            }

            if path.is_file() && media_kind(&path).is_some() {
                found.push(path);
            } else if path.is_dir() {
                if let Err(e) = Self::scan_folder_recursive(&path, found) {
                    // Continue scanning other directories
                    log::warn!("Failed to scan subdirectory {:?}: {}", path, e);
                }
            }
        }
        Ok(())
    }

    /// Scan `folder` and build assets, sorted by path for a stable order.
    pub fn scan(folder: &Path) -> Result<Vec<Asset>, StoreError> {
        let mut paths = Vec::new();
        Self::scan_folder_recursive(folder, &mut paths)?;
        paths.sort();

        let assets: Vec<Asset> = paths
            .iter()
            .filter_map(|path| {
                let kind = media_kind(path)?;
                let source = path.to_string_lossy().to_string();
                Some(Asset::new(asset_id_for_path(&source), source, kind))
            })
            .collect();

        log::info!("Scanned folder {:?}: found {} assets", folder, assets.len());
        Ok(assets)
    }
}

#[async_trait]
impl AssetProvider for FsAssetProvider {
    async fn discover(&self, project: &Project) -> Result<Vec<Asset>, StoreError> {
        let folder = project
            .source_folder
            .clone()
            .or_else(|| self.fallback_folder.clone())
            .ok_or_else(|| {
                StoreError::backend(format!("project '{}' has no source folder", project.name))
            })?;

        tokio::task::spawn_blocking(move || Self::scan(&folder))
            .await
            .map_err(|e| StoreError::backend(format!("discovery task failed: {}", e)))?
    }
}
