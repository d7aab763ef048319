//! Annotation session synchronization.
//!
//! An [`EditorSession`] keeps the active asset's regions, the region selection
//! and the editor mode consistent with the asset collection while the user
//! navigates and edits. Asset switches go `Idle -> Loading -> Active`:
//!
//! 1. The outgoing asset is committed (frame saves roll up into their root video)
//! 2. The new asset's metadata is loaded, or started empty
//! 3. Unseen tag names are merged into the project vocabulary
//! 4. Regions are pushed to the drawing surface and a fresh [`SurfaceBinding`] is issued
//!
//! Loads that finish after a newer selection started are dropped, and surface
//! events carrying an old binding are rejected.
//!
//! [`SurfaceBinding`]: crate::surface::SurfaceBinding

mod controller;
pub mod rollup;
mod state;

#[cfg(test)]
mod tests;

pub use controller::{
    Activation, CommitOutcome, DispatchOutcome, EditorSession, ProjectOpened, SessionStores,
};
pub use state::{SessionPhase, SessionSnapshot};
