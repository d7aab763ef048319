//! Boundary between the session controller and the drawing surface.
//!
//! The surface renders media and regions and turns pointer gestures into
//! geometry. It never owns annotation data: the controller drives it with
//! commands and it reports intent through [`SurfaceEvent`]s.

use crate::model::{Asset, AssetSize, EditorMode, Point, Region, RegionData, RegionId};

/// Commands the controller sends to the rendering capability.
pub trait DrawingSurface: Send {
    /// Show the asset's media.
    fn render_content_source(&mut self, asset: &Asset);

    /// Replace every drawn region with `regions`.
    fn set_regions(&mut self, regions: &[Region]);

    /// Arm the gesture handler for `mode`.
    fn set_mode(&mut self, mode: EditorMode);

    /// Enable or disable user interaction.
    fn set_enabled(&mut self, enabled: bool);

    /// Map geometry from surface coordinates to the asset's native resolution.
    fn scale_to_source(&self, region: RegionData) -> RegionData;
}

/// User intent reported by the drawing surface.
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceEvent {
    /// A draw gesture completed
    SelectionEnd(RegionData),
    /// A region was moved or resized
    RegionMoveEnd(RegionId, RegionData),
    /// A region was deleted
    RegionDelete(RegionId),
    /// A region was clicked; `additive` when a modifier was held
    RegionSelected { id: RegionId, additive: bool },
}

/// Identifies one asset activation.
///
/// Issued by the controller each time an asset becomes active. Events carrying
/// an older binding belong to a previous asset and are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SurfaceBinding(pub(crate) u64);

impl SurfaceBinding {
    pub fn generation(&self) -> u64 {
        self.0
    }
}

/// Linear mapping from surface pixels to source pixels.
///
/// Reference implementation of [`DrawingSurface::scale_to_source`] for
/// adapters that display the media scaled without rotation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleTransform {
    pub scale_x: f32,
    pub scale_y: f32,
}

impl ScaleTransform {
    /// Create an identity transform (no scaling).
    pub fn identity() -> Self {
        Self {
            scale_x: 1.0,
            scale_y: 1.0,
        }
    }

    /// Transform for media of `source` size displayed at `display_width` x
    /// `display_height` surface pixels.
    pub fn between(display_width: f32, display_height: f32, source: AssetSize) -> Self {
        if display_width <= 0.0 || display_height <= 0.0 {
            return Self::identity();
        }
        Self {
            scale_x: source.width as f32 / display_width,
            scale_y: source.height as f32 / display_height,
        }
    }

    /// Scale every point of `region`.
    pub fn apply(&self, region: RegionData) -> RegionData {
        RegionData {
            region_type: region.region_type,
            points: region
                .points
                .iter()
                .map(|p| Point::new(p.x * self.scale_x, p.y * self.scale_y))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_to_native_resolution() {
        let transform = ScaleTransform::between(
            960.0,
            540.0,
            AssetSize {
                width: 1920,
                height: 1080,
            },
        );
        let scaled = transform.apply(RegionData::rectangle(10.0, 20.0, 100.0, 50.0));
        assert_eq!(scaled.points[0], Point::new(20.0, 40.0));
        assert_eq!(scaled.points[2], Point::new(220.0, 140.0));
    }

    #[test]
    fn test_degenerate_display_is_identity() {
        let transform = ScaleTransform::between(
            0.0,
            540.0,
            AssetSize {
                width: 1920,
                height: 1080,
            },
        );
        assert_eq!(transform, ScaleTransform::identity());
    }
}
