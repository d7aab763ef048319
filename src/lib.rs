//! MVAT - Media Annotation Tool
//!
//! The annotation session engine of a media tagging tool: projects of images
//! and video frames, regions drawn over the active asset, tags applied to
//! regions, and per-asset persistence that keeps project-level state (tag
//! vocabulary, tagging status, video roll-up) consistent while the user
//! navigates.
//!
//! The rendering surface and storage backends are collaborators behind traits
//! ([`surface::DrawingSurface`], [`store::MetadataStore`], [`store::ProjectStore`],
//! [`store::AssetProvider`]); [`store::fs`] implements the storage side with
//! JSON files.

pub mod color_utils;
pub mod config;
pub mod error;
pub mod model;
pub mod reconcile;
pub mod session;
pub mod store;
pub mod surface;
pub mod toolbar;
pub mod vocabulary;

pub use config::AppConfig;
pub use error::SessionError;
pub use session::{Activation, EditorSession, SessionPhase, SessionStores};
pub use store::StoreError;
