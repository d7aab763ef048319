//! Project tag vocabulary.
//!
//! Keeps the project's tag list in step with the tag names that actually
//! appear in loaded regions.

use std::collections::HashSet;

use crate::color_utils::{DEFAULT_TAG_PALETTE, palette_color, parse_palette};
use crate::model::{Region, Tag};

/// Assigns colors to new tags and merges unseen names into a tag list.
#[derive(Debug, Clone)]
pub struct TagVocabulary {
    palette: Vec<[u8; 3]>,
}

impl Default for TagVocabulary {
    fn default() -> Self {
        Self::with_palette(DEFAULT_TAG_PALETTE)
    }
}

impl TagVocabulary {
    /// Create a vocabulary manager that cycles through `palette` (hex colors).
    pub fn with_palette<S: AsRef<str>>(palette: &[S]) -> Self {
        Self {
            palette: parse_palette(palette),
        }
    }

    /// Color for a tag appended at position `index` of the tag list.
    pub fn color_for_index(&self, index: usize) -> [u8; 3] {
        palette_color(&self.palette, index)
    }

    /// Append every tag name used by `regions` but missing from `tags`.
    ///
    /// Returns the appended tags in first-seen order; an empty result means
    /// the vocabulary was already complete and nothing needs saving.
    pub fn merge_from_regions(&self, tags: &mut Vec<Tag>, regions: &[Region]) -> Vec<Tag> {
        let mut known: HashSet<String> = tags.iter().map(|t| t.name.clone()).collect();
        let mut added = Vec::new();

        for name in regions.iter().flat_map(|r| r.tags.iter()) {
            if known.insert(name.clone()) {
                let tag = Tag::new(name, self.color_for_index(tags.len()));
                log::info!("Discovered new tag '{}' ({})", tag.name, tag.hex_color());
                tags.push(tag.clone());
                added.push(tag);
            }
        }

        added
    }

    /// Add a tag by name. Returns None if the name is blank or already present.
    pub fn add_tag(&self, tags: &mut Vec<Tag>, name: &str) -> Option<Tag> {
        let name = name.trim();
        if name.is_empty() || tags.iter().any(|t| t.name == name) {
            return None;
        }
        let tag = Tag::new(name, self.color_for_index(tags.len()));
        tags.push(tag.clone());
        Some(tag)
    }

    /// Remove a tag by name from the vocabulary.
    pub fn remove_tag(&self, tags: &mut Vec<Tag>, name: &str) -> Option<Tag> {
        let index = tags.iter().position(|t| t.name == name)?;
        Some(tags.remove(index))
    }
}
