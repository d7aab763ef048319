//! Asset state rules applied when an asset is committed.
//!
//! A committed asset is `Tagged` when any region carries a tag and `Visited`
//! otherwise. Video roots aggregate their frames: one tagged frame marks the
//! whole video, and a root never moves back to a lower state.

use crate::model::{Asset, AssetKind, AssetMetadata, AssetState};

/// State an asset reaches when `metadata` is committed.
pub fn committed_state(metadata: &AssetMetadata) -> AssetState {
    let derived = metadata.derived_state();
    match metadata.asset.kind {
        AssetKind::Video => metadata.asset.state.max(derived),
        AssetKind::Image | AssetKind::VideoFrame => derived,
    }
}

/// Root state after one of its frames was committed with `frame_state`.
pub fn promote(root_state: AssetState, frame_state: AssetState) -> AssetState {
    root_state.max(frame_state).max(AssetState::Visited)
}

/// Apply a frame outcome to the root's metadata, returning the updated root.
pub fn roll_up(mut root: AssetMetadata, frame: &Asset) -> AssetMetadata {
    let before = root.asset.state;
    root.asset.state = promote(before, frame.state);
    if root.asset.state != before {
        log::debug!(
            "Rolled up frame {} into {}: {:?} -> {:?}",
            frame.id,
            root.asset.id,
            before,
            root.asset.state
        );
    }
    root
}
