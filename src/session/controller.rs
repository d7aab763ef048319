//! The editing session controller.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::error::SessionError;
use crate::model::{
    Asset, AssetId, AssetMetadata, AssetState, EditorMode, Project, Region, RegionId, Tag,
};
use crate::reconcile::discover_and_reconcile;
use crate::session::rollup;
use crate::session::state::{SessionInner, SessionPhase, SessionSnapshot};
use crate::store::{AssetLocks, AssetProvider, MetadataStore, ProjectStore};
use crate::surface::{DrawingSurface, SurfaceBinding, SurfaceEvent};
use crate::toolbar::{Toolbar, ToolbarAction};
use crate::vocabulary::TagVocabulary;

/// Storage collaborators used by a session.
#[derive(Clone)]
pub struct SessionStores {
    pub metadata: Arc<dyn MetadataStore>,
    pub projects: Arc<dyn ProjectStore>,
    pub provider: Arc<dyn AssetProvider>,
}

impl SessionStores {
    #[must_use]
    pub fn new(
        metadata: Arc<dyn MetadataStore>,
        projects: Arc<dyn ProjectStore>,
        provider: Arc<dyn AssetProvider>,
    ) -> Self {
        Self {
            metadata,
            projects,
            provider,
        }
    }
}

/// Result of selecting an asset.
#[derive(Debug)]
pub enum Activation {
    /// The asset is active; surface events must carry `binding`.
    Activated {
        asset_id: AssetId,
        binding: SurfaceBinding,
        /// Non-fatal problems (vocabulary save, roll-up of the outgoing asset)
        warnings: Vec<SessionError>,
    },
    /// The asset was already active; the surface was re-enabled.
    Unchanged { binding: SurfaceBinding },
    /// A newer selection started while this one was loading; its result was dropped.
    Superseded { asset_id: AssetId },
}

impl Activation {
    pub fn binding(&self) -> Option<SurfaceBinding> {
        match self {
            Activation::Activated { binding, .. } | Activation::Unchanged { binding } => {
                Some(*binding)
            }
            Activation::Superseded { .. } => None,
        }
    }

    pub fn warnings(&self) -> &[SessionError] {
        match self {
            Activation::Activated { warnings, .. } => warnings.as_slice(),
            Activation::Unchanged { .. } | Activation::Superseded { .. } => &[],
        }
    }
}

/// Result of persisting the active asset.
#[derive(Debug)]
pub struct CommitOutcome {
    pub asset_id: AssetId,
    pub state: AssetState,
    /// New state of the root video, when the asset is a frame and roll-up succeeded
    pub root_state: Option<AssetState>,
    /// Roll-up or project save failures; the asset's own save stands
    pub warnings: Vec<SessionError>,
}

/// Result of opening a project.
#[derive(Debug)]
pub struct ProjectOpened {
    pub visible: usize,
    /// Activation of the default asset, if there was one
    pub activation: Option<Activation>,
    /// Discovery failure, when the project fell back to its declared assets
    pub warning: Option<SessionError>,
}

/// What a toolbar action or accelerator did.
#[derive(Debug)]
pub enum DispatchOutcome {
    ModeChanged(EditorMode),
    Navigated(Activation),
    Saved(CommitOutcome),
    Tagged { tag: String, regions: usize },
}

/// Handle to one annotation session.
///
/// Cloning is cheap and every clone drives the same session. State lives
/// behind a mutex that is never held across an `.await`; loads and saves of
/// the same asset are ordered through [`AssetLocks`].
#[derive(Clone)]
pub struct EditorSession {
    inner: Arc<Mutex<SessionInner>>,
    stores: SessionStores,
    locks: AssetLocks,
    vocabulary: Arc<TagVocabulary>,
    toolbar: Arc<Toolbar>,
}

impl EditorSession {
    #[must_use]
    pub fn new(project: Project, stores: SessionStores, surface: Box<dyn DrawingSurface>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(SessionInner::new(project, EditorMode::default(), surface))),
            stores,
            locks: AssetLocks::new(),
            vocabulary: Arc::new(TagVocabulary::default()),
            toolbar: Arc::new(Toolbar::default()),
        }
    }

    #[must_use]
    pub fn with_vocabulary(mut self, vocabulary: TagVocabulary) -> Self {
        self.vocabulary = Arc::new(vocabulary);
        self
    }

    #[must_use]
    pub fn with_toolbar(mut self, toolbar: Toolbar) -> Self {
        self.toolbar = Arc::new(toolbar);
        self
    }

    #[must_use]
    pub fn with_mode(self, mode: EditorMode) -> Self {
        self.state().mode = mode;
        self
    }

    fn state(&self) -> MutexGuard<'_, SessionInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub fn snapshot(&self) -> SessionSnapshot {
        self.state().snapshot()
    }

    pub fn phase(&self) -> SessionPhase {
        self.state().phase
    }

    pub fn selected_asset(&self) -> Option<AssetId> {
        self.state().selected.clone()
    }

    pub fn active_metadata(&self) -> Option<AssetMetadata> {
        self.state().active.clone()
    }

    pub fn selection(&self) -> Vec<RegionId> {
        self.state().selection.clone()
    }

    pub fn mode(&self) -> EditorMode {
        self.state().mode
    }

    pub fn project(&self) -> Project {
        self.state().project.clone()
    }

    pub fn visible_assets(&self) -> Vec<Asset> {
        self.state().visible.clone()
    }

    /// Binding of the current activation, if an asset is active.
    pub fn binding(&self) -> Option<SurfaceBinding> {
        let inner = self.state();
        (inner.phase == SessionPhase::Active).then(|| inner.binding())
    }

    pub fn toolbar(&self) -> &Toolbar {
        &self.toolbar
    }

    #[cfg(test)]
    pub(crate) fn tracked_locks(&self) -> usize {
        self.locks.len()
    }

    // ========================================================================
    // Project
    // ========================================================================

    /// Reconcile the project's assets with the provider and select the default asset.
    pub async fn open_project(&self) -> Result<ProjectOpened, SessionError> {
        let (project, previous) = {
            let inner = self.state();
            (inner.project.clone(), inner.selected.clone())
        };

        let provider = self.stores.provider.as_ref();
        let reconciled = discover_and_reconcile(provider, &project, previous.as_ref()).await;
        let visible = reconciled.visible.len();
        {
            let mut inner = self.state();
            // Record discovered assets in arrival order so later commits keep it.
            for asset in &reconciled.all {
                if inner.project.asset(&asset.id).is_none() {
                    inner.project.upsert_asset(asset.clone());
                }
            }
            inner.assets = reconciled.all;
            inner.visible = reconciled.visible;
        }

        let activation = match reconciled.selection {
            Some(id) => Some(self.select_asset(&id).await?),
            None => {
                log::info!("Project '{}' has no assets to show", project.name);
                None
            }
        };

        Ok(ProjectOpened {
            visible,
            activation,
            warning: reconciled.warning,
        })
    }

    /// Add a tag to the project vocabulary and save the project.
    ///
    /// Returns None if the name is blank or already taken.
    pub async fn add_project_tag(&self, name: &str) -> Result<Option<Tag>, SessionError> {
        let added = {
            let mut inner = self.state();
            self.vocabulary.add_tag(&mut inner.project.tags, name)
        };
        if let Some(tag) = &added {
            log::info!("Added tag '{}' ({})", tag.name, tag.hex_color());
            self.persist_project().await?;
        }
        Ok(added)
    }

    /// Remove a tag from the project vocabulary and save the project.
    ///
    /// Regions keep the name; it is merged back when their asset is loaded again.
    pub async fn remove_project_tag(&self, name: &str) -> Result<Tag, SessionError> {
        let removed = {
            let mut inner = self.state();
            self.vocabulary.remove_tag(&mut inner.project.tags, name)
        }
        .ok_or_else(|| SessionError::UnknownTag(name.to_string()))?;
        log::info!("Removed tag '{}'", removed.name);
        self.persist_project().await?;
        Ok(removed)
    }

    async fn persist_project(&self) -> Result<(), SessionError> {
        let project = self.state().project.clone();
        self.stores.projects.save(&project).await.map_err(|e| {
            log::error!("Failed to save project '{}': {}", project.name, e);
            SessionError::persistence("save", format!("project {}", project.id), e)
        })?;
        Ok(())
    }

    // ========================================================================
    // Asset lifecycle
    // ========================================================================

    /// Make `asset_id` the active asset.
    ///
    /// The outgoing asset is committed first; if that fails the navigation is
    /// aborted and the outgoing asset stays selected with the surface disabled.
    /// When a newer selection has taken over by the time the commit fails, the
    /// outgoing edits are held in memory and committed again by the next
    /// navigation, save or deactivation. Only the most recent selection is ever
    /// applied.
    pub async fn select_asset(&self, asset_id: &AssetId) -> Result<Activation, SessionError> {
        let (generation, target, outgoing, previous) = {
            let mut inner = self.state();
            if inner.phase == SessionPhase::Active && inner.selected.as_ref() == Some(asset_id) {
                inner.set_surface_enabled(true);
                return Ok(Activation::Unchanged {
                    binding: inner.binding(),
                });
            }

            let target = inner
                .find_asset(asset_id)
                .cloned()
                .ok_or_else(|| SessionError::UnknownAsset(asset_id.clone()))?;
            let outgoing = match inner.phase {
                SessionPhase::Active => inner.active.clone(),
                SessionPhase::Idle | SessionPhase::Loading => None,
            };
            let previous = inner.selected.replace(asset_id.clone());
            let generation = inner.next_generation();
            inner.phase = SessionPhase::Loading;
            inner.selection.clear();
            inner.set_surface_enabled(false);
            log::debug!("Selecting asset {} (generation {})", asset_id, generation);
            (generation, target, outgoing, previous)
        };

        let mut warnings = Vec::new();
        let mut committed = false;

        if let Some(outgoing) = outgoing {
            match self.commit(outgoing.clone()).await {
                Ok(outcome) => {
                    warnings.extend(outcome.warnings);
                    committed = true;
                }
                Err(e) => {
                    let mut inner = self.state();
                    if inner.is_current(generation) {
                        inner.selected = previous;
                        inner.phase = SessionPhase::Active;
                        log::warn!("Navigation to {} aborted, previous asset kept", asset_id);
                    } else {
                        log::warn!("Holding edits of {} until the next commit", outgoing.asset.id);
                        inner.stash_unsaved(outgoing);
                    }
                    return Err(e);
                }
            }
        }

        if self.retry_unsaved(&mut warnings).await > 0 {
            committed = true;
        }
        if committed {
            if let Err(e) = self.persist_project().await {
                warnings.push(e);
            }
        }

        let loaded = self.load_metadata(&target).await;

        let added_tags = {
            let mut inner = self.state();
            if !inner.is_current(generation) {
                log::debug!("Dropping superseded load of {}", asset_id);
                return Ok(Activation::Superseded {
                    asset_id: asset_id.clone(),
                });
            }

            // Held edits are newer than anything the store returned.
            let (metadata, held) = match (inner.take_unsaved(asset_id), loaded) {
                (Some(metadata), _) => (metadata, true),
                (None, Ok(metadata)) => (metadata, false),
                (None, Err(e)) => {
                    // Back to the last good state, still disabled.
                    if inner.active.is_some() {
                        inner.selected = inner.active.as_ref().map(|m| m.asset.id.clone());
                        inner.phase = SessionPhase::Active;
                    } else {
                        inner.selected = None;
                        inner.phase = SessionPhase::Idle;
                    }
                    return Err(e);
                }
            };

            let added = self
                .vocabulary
                .merge_from_regions(&mut inner.project.tags, &metadata.regions);

            let mode = inner.mode;
            inner.surface.render_content_source(&metadata.asset);
            inner.surface.set_regions(&metadata.regions);
            inner.surface.set_mode(mode);
            inner.active = Some(metadata);
            inner.pending_edit = held;
            inner.phase = SessionPhase::Active;
            inner.set_surface_enabled(true);
            log::info!("Activated asset {}", asset_id);
            added
        };

        if !added_tags.is_empty() {
            log::info!("Merged {} new tags into the project", added_tags.len());
            if let Err(e) = self.persist_project().await {
                warnings.push(e);
            }
        }

        Ok(Activation::Activated {
            asset_id: asset_id.clone(),
            binding: SurfaceBinding(generation),
            warnings,
        })
    }

    /// Load an asset's metadata, synthesizing empty metadata when none was saved.
    async fn load_metadata(&self, asset: &Asset) -> Result<AssetMetadata, SessionError> {
        match self.fetch_metadata(asset).await {
            Ok(mut metadata) => {
                // The collection's view of the asset is authoritative for state.
                metadata.asset.state = asset.state;
                log::info!("Loaded {} regions for {}", metadata.regions.len(), asset.id);
                Ok(metadata)
            }
            Err(SessionError::NotFound { .. }) => {
                log::debug!("No metadata for {}, starting empty", asset.id);
                Ok(AssetMetadata::empty(asset.clone()))
            }
            Err(e) => {
                log::error!("Failed to load metadata for {}: {}", asset.id, e);
                Err(e)
            }
        }
    }

    async fn fetch_metadata(&self, asset: &Asset) -> Result<AssetMetadata, SessionError> {
        let guard = self.locks.acquire(&asset.id).await;
        let loaded = self.stores.metadata.load(asset).await;
        self.locks.release(guard);
        loaded.map_err(|e| SessionError::load_failure(&asset.id, e))
    }

    /// Persist `metadata` and roll a frame up into its root.
    ///
    /// The project record is left to the caller.
    async fn commit(&self, mut metadata: AssetMetadata) -> Result<CommitOutcome, SessionError> {
        let asset_id = metadata.asset.id.clone();
        metadata.asset.state = rollup::committed_state(&metadata);

        let guard = self.locks.acquire(&asset_id).await;
        let saved = self.stores.metadata.save(&metadata).await;
        self.locks.release(guard);
        if let Err(e) = saved {
            log::error!("Failed to save metadata for {}: {}", asset_id, e);
            let target = format!("metadata of {}", asset_id);
            return Err(SessionError::persistence("save", target, e));
        }
        log::info!(
            "Committed {} with {} regions as {:?}",
            asset_id,
            metadata.regions.len(),
            metadata.asset.state
        );

        let mut warnings = Vec::new();
        let mut root_state = None;
        let mut root_asset = None;
        if let Some(root_id) = metadata.asset.root_asset_id.clone() {
            match self.roll_up(&root_id, &metadata.asset).await {
                Ok(root) => {
                    root_state = Some(root.state);
                    root_asset = Some(root);
                }
                Err(e) => {
                    log::warn!("Roll-up of {} into {} failed: {}", asset_id, root_id, e);
                    warnings.push(e);
                }
            }
        }

        {
            let mut inner = self.state();
            inner.record_asset(&metadata.asset);
            if let Some(root) = &root_asset {
                inner.record_asset(root);
            }
            // Edits made while the save was in flight are still pending.
            let unchanged = inner
                .active
                .as_ref()
                .is_some_and(|m| m.asset.id == asset_id && m.regions == metadata.regions);
            if unchanged {
                inner.pending_edit = false;
            }
        }

        Ok(CommitOutcome {
            asset_id,
            state: metadata.asset.state,
            root_state,
            warnings,
        })
    }

    /// Promote the root video of a committed frame and save it.
    async fn roll_up(&self, root_id: &AssetId, frame: &Asset) -> Result<Asset, SessionError> {
        let root = self
            .state()
            .find_asset(root_id)
            .cloned()
            .ok_or_else(|| SessionError::UnknownAsset(root_id.clone()))?;

        let guard = self.locks.acquire(root_id).await;
        let rolled = self.roll_up_locked(root, frame).await;
        self.locks.release(guard);
        rolled
    }

    async fn roll_up_locked(&self, root: Asset, frame: &Asset) -> Result<Asset, SessionError> {
        let loaded = self.stores.metadata.load(&root).await;
        let stored = match loaded {
            Ok(mut metadata) => {
                metadata.asset.state = metadata.asset.state.max(root.state);
                metadata
            }
            Err(e) => match SessionError::load_failure(&root.id, e) {
                SessionError::NotFound { .. } => AssetMetadata::empty(root),
                other => return Err(other),
            },
        };

        let updated = rollup::roll_up(stored, frame);
        self.stores.metadata.save(&updated).await.map_err(|e| {
            SessionError::persistence("save", format!("metadata of {}", updated.asset.id), e)
        })?;
        Ok(updated.asset)
    }

    /// Commit metadata held back by an earlier failed commit.
    ///
    /// Returns how many assets were saved. Failures stay held and are added
    /// to `warnings`.
    async fn retry_unsaved(&self, warnings: &mut Vec<SessionError>) -> usize {
        let held = std::mem::take(&mut self.state().unsaved);
        let mut saved = 0;
        for metadata in held {
            match self.commit(metadata.clone()).await {
                Ok(outcome) => {
                    warnings.extend(outcome.warnings);
                    saved += 1;
                }
                Err(e) => {
                    let mut inner = self.state();
                    // A copy held while this commit ran is newer.
                    if inner.unsaved.iter().all(|m| m.asset.id != metadata.asset.id) {
                        inner.unsaved.push(metadata);
                    }
                    warnings.push(e);
                }
            }
        }
        saved
    }

    /// Commit the active asset without leaving it.
    ///
    /// The surface stays enabled while the save runs; edits made meanwhile
    /// remain pending.
    pub async fn save(&self) -> Result<CommitOutcome, SessionError> {
        let (generation, active) = {
            let inner = self.state();
            let active = match inner.phase {
                SessionPhase::Active => inner.active.clone(),
                SessionPhase::Idle | SessionPhase::Loading => None,
            };
            (inner.generation, active)
        };
        let metadata = active.ok_or(SessionError::NoActiveAsset)?;
        let mut outcome = match self.commit(metadata).await {
            Ok(outcome) => outcome,
            Err(e) => {
                let mut inner = self.state();
                if inner.is_current(generation) {
                    inner.set_surface_enabled(false);
                }
                return Err(e);
            }
        };
        self.retry_unsaved(&mut outcome.warnings).await;
        self.persist_project().await?;
        Ok(outcome)
    }

    /// Commit the active asset and return to `Idle`.
    ///
    /// The surface is disabled and outstanding bindings go stale before the
    /// commit starts. A pending load is abandoned. On a commit failure the
    /// asset stays active with the surface disabled.
    pub async fn deactivate(&self) -> Result<Option<CommitOutcome>, SessionError> {
        let (generation, active) = {
            let mut inner = self.state();
            let active = match inner.phase {
                SessionPhase::Active => inner.active.clone(),
                SessionPhase::Idle | SessionPhase::Loading => None,
            };
            let generation = inner.next_generation();
            if active.is_some() {
                inner.phase = SessionPhase::Loading;
            }
            inner.set_surface_enabled(false);
            (generation, active)
        };

        let outcome = match active {
            Some(metadata) => match self.commit(metadata.clone()).await {
                Ok(outcome) => Some(outcome),
                Err(e) => {
                    let mut inner = self.state();
                    if inner.is_current(generation) {
                        inner.phase = SessionPhase::Active;
                        log::warn!("Deactivation aborted, asset kept");
                    } else {
                        log::warn!("Holding edits of {} until the next commit", metadata.asset.id);
                        inner.stash_unsaved(metadata);
                    }
                    return Err(e);
                }
            },
            None => None,
        };

        let mut warnings = Vec::new();
        let retried = self.retry_unsaved(&mut warnings).await;
        if outcome.is_some() || retried > 0 {
            if let Err(e) = self.persist_project().await {
                warnings.push(e);
            }
        }
        let outcome = match outcome {
            Some(mut outcome) => {
                outcome.warnings.append(&mut warnings);
                Some(outcome)
            }
            None => {
                for warning in &warnings {
                    log::warn!("{}", warning);
                }
                None
            }
        };

        let mut inner = self.state();
        if inner.is_current(generation) {
            inner.phase = SessionPhase::Idle;
            inner.selected = None;
            inner.active = None;
            inner.selection.clear();
            inner.pending_edit = false;
            log::debug!("Session idle");
        }
        Ok(outcome)
    }

    /// Select the next visible asset. Stays on the last asset at the end.
    pub async fn next_asset(&self) -> Result<Activation, SessionError> {
        self.navigate(1).await
    }

    /// Select the previous visible asset. Stays on the first asset at the start.
    pub async fn previous_asset(&self) -> Result<Activation, SessionError> {
        self.navigate(-1).await
    }

    async fn navigate(&self, step: isize) -> Result<Activation, SessionError> {
        let target = {
            let inner = self.state();
            if inner.visible.is_empty() {
                return Err(SessionError::NoActiveAsset);
            }
            let last = inner.visible.len() - 1;
            let index = match inner.selected.as_ref().and_then(|id| inner.visible_index(id)) {
                Some(current) => current.saturating_add_signed(step).min(last),
                None => 0,
            };
            inner.visible[index].id.clone()
        };
        self.select_asset(&target).await
    }

    // ========================================================================
    // Editing
    // ========================================================================

    /// Apply an event reported by the drawing surface.
    ///
    /// Events from an earlier activation are dropped with
    /// [`SessionError::StaleResponse`].
    pub fn handle_event(
        &self,
        binding: SurfaceBinding,
        event: SurfaceEvent,
    ) -> Result<(), SessionError> {
        let mut guard = self.state();
        let inner = &mut *guard;

        if !inner.is_current(binding.0) || inner.phase != SessionPhase::Active {
            log::debug!("Dropping stale surface event {:?}", event);
            return Err(match inner.selected.clone() {
                Some(asset_id) => SessionError::StaleResponse { asset_id },
                None => SessionError::NoActiveAsset,
            });
        }
        if !inner.surface_enabled {
            return Err(SessionError::SurfaceDisabled);
        }
        let active = inner.active.as_mut().ok_or(SessionError::NoActiveAsset)?;

        match event {
            SurfaceEvent::SelectionEnd(raw) => {
                let data = inner.surface.scale_to_source(raw);
                let region = Region::from_data(RegionId::generate(), data)?;
                let id = region.id.clone();
                if !active.push_region(region) {
                    return Err(SessionError::DuplicateRegion(id));
                }
                log::debug!("Region {} added to {}", id, active.asset.id);
                inner.select_only(id);
            }
            SurfaceEvent::RegionMoveEnd(id, raw) => {
                let data = inner.surface.scale_to_source(raw);
                active
                    .region_mut(&id)
                    .ok_or_else(|| SessionError::UnknownRegion(id.clone()))?
                    .set_geometry(data)?;
                log::debug!("Region {} moved", id);
            }
            SurfaceEvent::RegionDelete(id) => {
                active
                    .remove_region(&id)
                    .ok_or_else(|| SessionError::UnknownRegion(id.clone()))?;
                log::debug!("Region {} deleted", id);
                inner.deselect(&id);
            }
            SurfaceEvent::RegionSelected { id, additive } => {
                if active.region(&id).is_none() {
                    return Err(SessionError::UnknownRegion(id));
                }
                if additive {
                    inner.select_additive(id);
                } else {
                    inner.select_only(id);
                }
                return Ok(());
            }
        }

        inner.pending_edit = true;
        inner.render_regions();
        Ok(())
    }

    /// Add `tag` to every selected region. Returns how many regions changed.
    ///
    /// A tag missing from the project vocabulary is added to it and saved with
    /// the next commit.
    pub fn apply_tag(&self, tag: &str) -> Result<usize, SessionError> {
        let mut guard = self.state();
        let inner = &mut *guard;
        if inner.phase != SessionPhase::Active {
            return Err(SessionError::NoActiveAsset);
        }
        if !inner.surface_enabled {
            return Err(SessionError::SurfaceDisabled);
        }
        let active = inner.active.as_mut().ok_or(SessionError::NoActiveAsset)?;

        let mut changed = 0;
        for id in &inner.selection {
            if let Some(region) = active.region_mut(id) {
                if region.add_tag(tag) {
                    changed += 1;
                }
            }
        }

        if changed > 0 {
            self.vocabulary
                .merge_from_regions(&mut inner.project.tags, &active.regions);
            inner.pending_edit = true;
            inner.render_regions();
            log::debug!("Tag '{}' applied to {} regions", tag, changed);
        }
        Ok(changed)
    }

    /// Apply the project tag at `index` of the vocabulary.
    pub fn apply_tag_at(&self, index: usize) -> Result<(String, usize), SessionError> {
        let name = self
            .state()
            .project
            .tags
            .get(index)
            .map(|t| t.name.clone())
            .ok_or_else(|| SessionError::UnknownTag(format!("#{}", index + 1)))?;
        let changed = self.apply_tag(&name)?;
        Ok((name, changed))
    }

    /// Switch the editor mode and arm the surface for it.
    pub fn set_mode(&self, mode: EditorMode) {
        let mut inner = self.state();
        if inner.mode != mode {
            log::debug!("Editor mode: {}", mode.name());
        }
        inner.mode = mode;
        inner.surface.set_mode(mode);
    }

    // ========================================================================
    // Toolbar
    // ========================================================================

    /// Run a toolbar action.
    pub async fn dispatch(&self, action: ToolbarAction) -> Result<DispatchOutcome, SessionError> {
        match action {
            ToolbarAction::SetMode(mode) => {
                self.set_mode(mode);
                Ok(DispatchOutcome::ModeChanged(mode))
            }
            ToolbarAction::PreviousAsset => {
                Ok(DispatchOutcome::Navigated(self.previous_asset().await?))
            }
            ToolbarAction::NextAsset => Ok(DispatchOutcome::Navigated(self.next_asset().await?)),
            ToolbarAction::SaveProject => Ok(DispatchOutcome::Saved(self.save().await?)),
        }
    }

    /// Run whatever is bound to `key`. Returns None for unbound keys.
    pub async fn dispatch_accelerator(
        &self,
        key: &str,
    ) -> Result<Option<DispatchOutcome>, SessionError> {
        if let Some(action) = self.toolbar.action_for_accelerator(key) {
            return self.dispatch(action).await.map(Some);
        }
        if let Some(index) = self.toolbar.tag_index_for_key(key) {
            let (tag, regions) = self.apply_tag_at(index)?;
            return Ok(Some(DispatchOutcome::Tagged { tag, regions }));
        }
        Ok(None)
    }
}
