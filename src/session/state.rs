//! Volatile session state guarded by the controller.

use crate::model::{Asset, AssetId, AssetMetadata, EditorMode, Project, RegionId};
use crate::surface::{DrawingSurface, SurfaceBinding};

/// Lifecycle of the active asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionPhase {
    /// No asset loaded
    #[default]
    Idle,
    /// Metadata fetch or final commit in flight; the drawing surface is disabled
    Loading,
    /// Metadata loaded and rendered
    Active,
}

/// Read-only copy of the session state.
#[derive(Debug, Clone)]
pub struct SessionSnapshot {
    pub phase: SessionPhase,
    pub selected: Option<AssetId>,
    pub active: Option<AssetMetadata>,
    pub selection: Vec<RegionId>,
    pub mode: EditorMode,
    pub surface_enabled: bool,
    pub pending_edit: bool,
    pub visible: Vec<Asset>,
    pub project: Project,
    /// Assets whose edits are held in memory after a failed commit.
    pub unsaved: Vec<AssetId>,
}

pub(crate) struct SessionInner {
    pub phase: SessionPhase,
    /// Bumped on every selection and deactivation; stamps surface bindings.
    pub generation: u64,
    pub selected: Option<AssetId>,
    pub active: Option<AssetMetadata>,
    /// Selected region ids in selection order, always a subset of the active regions.
    pub selection: Vec<RegionId>,
    pub mode: EditorMode,
    pub surface_enabled: bool,
    pub pending_edit: bool,
    pub project: Project,
    /// Every known asset, frames included.
    pub assets: Vec<Asset>,
    /// Navigable assets.
    pub visible: Vec<Asset>,
    /// Metadata whose commit failed after the session had moved on.
    pub unsaved: Vec<AssetMetadata>,
    pub surface: Box<dyn DrawingSurface>,
}

impl SessionInner {
    pub fn new(project: Project, mode: EditorMode, surface: Box<dyn DrawingSurface>) -> Self {
        let assets = project.assets.clone();
        let visible = assets.iter().filter(|a| !a.is_child()).cloned().collect();
        Self {
            phase: SessionPhase::Idle,
            generation: 0,
            selected: None,
            active: None,
            selection: Vec::new(),
            mode,
            surface_enabled: false,
            pending_edit: false,
            project,
            assets,
            visible,
            unsaved: Vec::new(),
            surface,
        }
    }

    pub fn binding(&self) -> SurfaceBinding {
        SurfaceBinding(self.generation)
    }

    /// Start a new activation, invalidating every outstanding binding.
    pub fn next_generation(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }

    pub fn is_current(&self, generation: u64) -> bool {
        self.generation == generation
    }

    pub fn find_asset(&self, id: &AssetId) -> Option<&Asset> {
        self.assets
            .iter()
            .find(|a| &a.id == id)
            .or_else(|| self.project.asset(id))
    }

    pub fn visible_index(&self, id: &AssetId) -> Option<usize> {
        self.visible.iter().position(|a| &a.id == id)
    }

    pub fn set_surface_enabled(&mut self, enabled: bool) {
        self.surface_enabled = enabled;
        self.surface.set_enabled(enabled);
    }

    /// Push the active regions to the surface.
    pub fn render_regions(&mut self) {
        if let Some(active) = &self.active {
            self.surface.set_regions(&active.regions);
        }
    }

    /// Record a committed asset everywhere it is listed.
    pub fn record_asset(&mut self, asset: &Asset) {
        for entry in self.assets.iter_mut().chain(self.visible.iter_mut()) {
            if entry.id == asset.id {
                entry.state = asset.state;
            }
        }
        if !self.assets.iter().any(|a| a.id == asset.id) {
            self.assets.push(asset.clone());
        }
        if let Some(active) = self.active.as_mut().filter(|m| m.asset.id == asset.id) {
            active.asset.state = asset.state;
        }
        self.project.upsert_asset(asset.clone());
    }

    /// Hold `metadata` until a later commit succeeds, replacing an older copy.
    pub fn stash_unsaved(&mut self, metadata: AssetMetadata) {
        self.unsaved.retain(|m| m.asset.id != metadata.asset.id);
        self.unsaved.push(metadata);
    }

    pub fn take_unsaved(&mut self, id: &AssetId) -> Option<AssetMetadata> {
        let index = self.unsaved.iter().position(|m| &m.asset.id == id)?;
        Some(self.unsaved.remove(index))
    }

    /// Select a single region, dropping any previous selection.
    pub fn select_only(&mut self, id: RegionId) {
        self.selection.clear();
        self.selection.push(id);
    }

    /// Add a region to the selection. Already selected regions stay selected.
    pub fn select_additive(&mut self, id: RegionId) {
        if !self.selection.contains(&id) {
            self.selection.push(id);
        }
    }

    pub fn deselect(&mut self, id: &RegionId) {
        self.selection.retain(|s| s != id);
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            phase: self.phase,
            selected: self.selected.clone(),
            active: self.active.clone(),
            selection: self.selection.clone(),
            mode: self.mode,
            surface_enabled: self.surface_enabled,
            pending_edit: self.pending_edit,
            visible: self.visible.clone(),
            project: self.project.clone(),
            unsaved: self.unsaved.iter().map(|m| m.asset.id.clone()).collect(),
        }
    }
}
