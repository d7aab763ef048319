//! Data models for the annotation session.

mod asset;
mod metadata;
mod mode;
mod project;
mod region;
mod tag;
pub mod version;

pub use asset::{Asset, AssetId, AssetKind, AssetSize, AssetState};
pub use metadata::AssetMetadata;
pub use mode::EditorMode;
pub use project::Project;
pub use region::{
    BoundingBox, MIN_POLYGON_POINTS, MIN_RECTANGLE_POINTS, Point, Region, RegionData, RegionId,
    RegionType,
};
pub use tag::Tag;
