//! Tag data model for the project vocabulary.
//!
//! Tags are applied to regions by name; the project keeps one entry per name
//! with the color used to draw regions carrying it.

use serde::{Deserialize, Serialize};

use crate::color_utils::to_hex;

/// A project tag with a name and color.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Tag {
    /// Display name, unique within a project
    pub name: String,
    /// RGB color for the tag
    pub color: [u8; 3],
}

impl Tag {
    /// Create a new tag with the given name and color.
    pub fn new(name: &str, color: [u8; 3]) -> Self {
        Self {
            name: name.to_string(),
            color,
        }
    }

    /// Color as a `#rrggbb` string.
    pub fn hex_color(&self) -> String {
        to_hex(self.color)
    }
}
