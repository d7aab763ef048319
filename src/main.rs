//! Headless MVAT entry point.
//!
//! Opens the project stored in `<folder>/.mvat`, or creates one, reconciles it
//! with the media found in the folder, activates the default asset and logs a
//! summary of the project's tagging state.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use mvat::model::{Asset, AssetState, EditorMode, Project, Region, RegionData};
use mvat::store::fs::{FsAssetProvider, FsMetadataStore, FsProjectStore};
use mvat::store::{ProjectRef, ProjectStore};
use mvat::surface::DrawingSurface;
use mvat::{AppConfig, EditorSession, SessionError, SessionStores, StoreError};

/// Drawing surface without a display; logs the commands it receives.
struct LogSurface;

impl DrawingSurface for LogSurface {
    fn render_content_source(&mut self, asset: &Asset) {
        log::debug!("Render {} ({})", asset.name, asset.path);
    }

    fn set_regions(&mut self, regions: &[Region]) {
        log::debug!("Show {} regions", regions.len());
    }

    fn set_mode(&mut self, mode: EditorMode) {
        log::debug!("Mode {}", mode.name());
    }

    fn set_enabled(&mut self, enabled: bool) {
        log::trace!("Surface enabled: {}", enabled);
    }

    fn scale_to_source(&self, region: RegionData) -> RegionData {
        region
    }
}

fn project_id_for(folder: &Path) -> String {
    folder
        .file_name()
        .and_then(|n| n.to_str())
        .filter(|n| !n.is_empty())
        .unwrap_or("project")
        .to_string()
}

async fn load_or_create_project(
    store: &FsProjectStore,
    folder: &Path,
) -> Result<Project, StoreError> {
    let id = project_id_for(folder);
    match store.load(&ProjectRef::Id(id.clone())).await {
        Ok(project) => {
            log::info!(
                "Opened project '{}' ({} declared assets)",
                project.name,
                project.assets.len()
            );
            Ok(project)
        }
        Err(e) if e.is_not_found() => {
            log::info!("Creating project '{}' for {:?}", id, folder);
            Ok(Project::new(id.clone(), id).with_source_folder(folder))
        }
        Err(e) => Err(e),
    }
}

async fn run(config: AppConfig, folder: PathBuf) -> Result<(), SessionError> {
    let data_dir = folder.join(&config.preferences.metadata_dir_name);
    let projects = Arc::new(FsProjectStore::new(&data_dir));
    let project = load_or_create_project(&projects, &folder)
        .await
        .map_err(|e| SessionError::persistence("load", format!("project in {:?}", folder), e))?;

    let stores = SessionStores::new(
        Arc::new(FsMetadataStore::new(&data_dir)),
        projects,
        Arc::new(FsAssetProvider::with_folder(&folder)),
    );
    let session = EditorSession::new(project, stores, Box::new(LogSurface))
        .with_vocabulary(config.vocabulary())
        .with_toolbar(config.toolbar())
        .with_mode(config.preferences.default_mode);

    let opened = session.open_project().await?;
    if let Some(warning) = &opened.warning {
        log::warn!("{}", warning);
    }
    for warning in opened.activation.iter().flat_map(|a| a.warnings()) {
        log::warn!("{}", warning);
    }

    let visible = session.visible_assets();
    let count = |state: AssetState| visible.iter().filter(|a| a.state == state).count();
    log::info!(
        "{} assets: {} tagged, {} visited, {} unvisited",
        visible.len(),
        count(AssetState::Tagged),
        count(AssetState::Visited),
        count(AssetState::Unvisited)
    );
    if let Some(active) = session.active_metadata() {
        log::info!("Active asset {} has {} regions", active.asset.name, active.regions.len());
    }
    let tags: Vec<String> = session.project().tags.iter().map(|t| t.name.clone()).collect();
    log::info!("Project tags: [{}]", tags.join(", "));

    if let Some(outcome) = session.deactivate().await? {
        for warning in &outcome.warnings {
            log::warn!("{}", warning);
        }
    }
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let config = AppConfig::load_from_default_path().unwrap_or_default();

    // RUST_LOG overrides the configured level
    env_logger::Builder::new()
        .filter_level(config.preferences.log_level.to_level_filter())
        .parse_default_env()
        .init();

    let Some(folder) = std::env::args_os().nth(1).map(PathBuf::from) else {
        eprintln!("Usage: mvat <project-folder>");
        return ExitCode::FAILURE;
    };

    match run(config, folder).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
