//! Asset collection reconciliation.
//!
//! Merges the assets a project has recorded with the assets a provider finds
//! at the project's source location, and derives the list the editor shows.

use std::collections::HashSet;

use crate::error::SessionError;
use crate::model::{Asset, AssetId, AssetState, Project};
use crate::store::{AssetProvider, StoreError};

/// Result of merging declared and discovered assets.
#[derive(Debug, Default)]
pub struct ReconciledAssets {
    /// Every known asset in arrival order, frames included.
    pub all: Vec<Asset>,
    /// Navigable assets in arrival order; never contains frame assets.
    pub visible: Vec<Asset>,
    /// Asset to select by default.
    pub selection: Option<AssetId>,
    /// Non-fatal problem encountered while reconciling.
    pub warning: Option<SessionError>,
}

impl ReconciledAssets {
    pub fn find(&self, id: &AssetId) -> Option<&Asset> {
        self.all.iter().find(|a| &a.id == id)
    }

    /// Frames of a root video, ordered by timestamp.
    pub fn child_assets(&self, root: &AssetId) -> Vec<Asset> {
        child_assets(&self.all, root)
    }

    /// Position of an asset in the visible list.
    pub fn visible_index(&self, id: &AssetId) -> Option<usize> {
        self.visible.iter().position(|a| &a.id == id)
    }
}

/// Frames of `root` among `assets`, ordered by timestamp.
pub fn child_assets(assets: &[Asset], root: &AssetId) -> Vec<Asset> {
    let mut children: Vec<Asset> = assets
        .iter()
        .filter(|a| a.root_asset_id.as_ref() == Some(root))
        .cloned()
        .collect();
    children.sort_by(|a, b| {
        a.timestamp
            .unwrap_or(0.0)
            .total_cmp(&b.timestamp.unwrap_or(0.0))
    });
    children
}

/// Merge a project's declared assets with a discovery result.
///
/// Declared assets come first (in the order the project recorded them), then
/// discovered assets in provider order; the first occurrence of an id wins, so recorded tagging
/// state survives rediscovery. A failed discovery degrades to declared
/// assets only and is reported through [`ReconciledAssets::warning`].
pub fn reconcile(
    project: &Project,
    discovered: Result<Vec<Asset>, StoreError>,
    previous_selection: Option<&AssetId>,
) -> ReconciledAssets {
    let (discovered, warning) = match discovered {
        Ok(assets) => (assets, None),
        Err(source) => {
            log::warn!(
                "Asset discovery failed for project '{}', using {} declared assets: {}",
                project.name,
                project.assets.len(),
                source
            );
            (Vec::new(), Some(SessionError::DiscoveryFailure { source }))
        }
    };

    let mut seen = HashSet::new();
    let mut all = Vec::with_capacity(project.assets.len() + discovered.len());

    for asset in &project.assets {
        if seen.insert(asset.id.clone()) {
            all.push(asset.clone());
        }
    }

    let mut new_assets = 0;
    for mut asset in discovered {
        if seen.insert(asset.id.clone()) {
            asset.state = AssetState::Unvisited;
            all.push(asset);
            new_assets += 1;
        }
    }

    let visible: Vec<Asset> = all.iter().filter(|a| !a.is_child()).cloned().collect();

    let selection = previous_selection
        .filter(|id| visible.iter().any(|a| &a.id == *id))
        .cloned()
        .or_else(|| visible.first().map(|a| a.id.clone()));

    log::info!(
        "Reconciled project '{}': {} assets ({} new, {} visible)",
        project.name,
        all.len(),
        new_assets,
        visible.len()
    );

    ReconciledAssets {
        all,
        visible,
        selection,
        warning,
    }
}

/// Discover assets through `provider` and reconcile them with the project.
pub async fn discover_and_reconcile(
    provider: &dyn AssetProvider,
    project: &Project,
    previous_selection: Option<&AssetId>,
) -> ReconciledAssets {
    let discovered = provider.discover(project).await;
    reconcile(project, discovered, previous_selection)
}
