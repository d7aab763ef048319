//! Editor modes armed on the drawing surface.

use serde::{Deserialize, Serialize};

/// Input mode of the drawing surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EditorMode {
    /// Select and move existing regions
    #[default]
    Select,
    /// Draw axis-aligned rectangles
    Rectangle,
    /// Draw polygons vertex by vertex
    Polygon,
}

impl EditorMode {
    /// Get the display name for this mode.
    pub fn name(&self) -> &'static str {
        match self {
            EditorMode::Select => "Select",
            EditorMode::Rectangle => "Draw Rectangle",
            EditorMode::Polygon => "Draw Polygon",
        }
    }

    /// Get all editor modes.
    pub fn all() -> &'static [EditorMode] {
        &[EditorMode::Select, EditorMode::Rectangle, EditorMode::Polygon]
    }

    /// Check if this mode draws new regions (not Select).
    pub fn is_drawing_mode(&self) -> bool {
        !matches!(self, EditorMode::Select)
    }
}
