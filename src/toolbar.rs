//! Toolbar items and their accelerators.
//!
//! The toolbar is an explicit list handed to the session at construction, so
//! embedders can reorder, rebind or drop items. Accelerators are key strings
//! as reported by the shell (`"v"`, `"ArrowUp"`, `"Ctrl+s"`) and match exactly.

use serde::{Deserialize, Serialize};

use crate::model::EditorMode;

/// Maximum number of tags that can have hotkeys (1-9 then 0).
pub const MAX_TAG_HOTKEYS: usize = 10;

/// Whether an item toggles a persistent state or fires once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ToolbarItemKind {
    State,
    Action,
}

/// What activating a toolbar item does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "type", content = "mode")]
pub enum ToolbarAction {
    /// Switch the editor mode
    SetMode(EditorMode),
    /// Navigate to the previous visible asset
    PreviousAsset,
    /// Navigate to the next visible asset
    NextAsset,
    /// Commit the active asset and save the project
    SaveProject,
}

/// A single toolbar entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolbarItem {
    pub name: String,
    pub tooltip: String,
    /// Items sharing a group are displayed together
    pub group: String,
    pub kind: ToolbarItemKind,
    pub action: ToolbarAction,
    #[serde(default)]
    pub accelerators: Vec<String>,
}

impl ToolbarItem {
    pub fn new(
        name: &str,
        tooltip: &str,
        group: &str,
        kind: ToolbarItemKind,
        action: ToolbarAction,
        accelerators: &[&str],
    ) -> Self {
        Self {
            name: name.to_string(),
            tooltip: tooltip.to_string(),
            group: group.to_string(),
            kind,
            action,
            accelerators: accelerators.iter().map(|a| a.to_string()).collect(),
        }
    }
}

/// Default toolbar layout.
pub fn default_items() -> Vec<ToolbarItem> {
    use ToolbarItemKind::{Action, State};

    vec![
        ToolbarItem::new(
            "selectCanvas",
            "Select (V)",
            "canvas",
            State,
            ToolbarAction::SetMode(EditorMode::Select),
            &["v", "V"],
        ),
        ToolbarItem::new(
            "drawRectangle",
            "Draw Rectangle (R)",
            "canvas",
            State,
            ToolbarAction::SetMode(EditorMode::Rectangle),
            &["r", "R"],
        ),
        ToolbarItem::new(
            "drawPolygon",
            "Draw Polygon (P)",
            "canvas",
            State,
            ToolbarAction::SetMode(EditorMode::Polygon),
            &["p", "P"],
        ),
        ToolbarItem::new(
            "navigatePreviousAsset",
            "Previous Asset (W)",
            "navigation",
            Action,
            ToolbarAction::PreviousAsset,
            &["ArrowUp", "w", "W"],
        ),
        ToolbarItem::new(
            "navigateNextAsset",
            "Next Asset (S)",
            "navigation",
            Action,
            ToolbarAction::NextAsset,
            &["ArrowDown", "s", "S"],
        ),
        ToolbarItem::new(
            "saveProject",
            "Save Project (Ctrl+S)",
            "project",
            Action,
            ToolbarAction::SaveProject,
            &["Ctrl+s", "Ctrl+S"],
        ),
    ]
}

/// Default tag hotkeys: 1-9, then 0 for the tenth tag.
pub fn default_tag_hotkeys() -> Vec<String> {
    ["1", "2", "3", "4", "5", "6", "7", "8", "9", "0"]
        .iter()
        .map(|k| k.to_string())
        .collect()
}

/// The toolbar configuration used by a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toolbar {
    items: Vec<ToolbarItem>,
    /// Hotkeys applying the tag at the same index of the project vocabulary
    tag_hotkeys: Vec<String>,
}

impl Default for Toolbar {
    fn default() -> Self {
        Self::new(default_items(), default_tag_hotkeys())
    }
}

impl Toolbar {
    pub fn new(items: Vec<ToolbarItem>, tag_hotkeys: Vec<String>) -> Self {
        let mut tag_hotkeys = tag_hotkeys;
        tag_hotkeys.truncate(MAX_TAG_HOTKEYS);
        Self { items, tag_hotkeys }
    }

    pub fn items(&self) -> &[ToolbarItem] {
        &self.items
    }

    /// Items of one group, in configured order.
    pub fn group<'a>(&'a self, group: &'a str) -> impl Iterator<Item = &'a ToolbarItem> + 'a {
        self.items.iter().filter(move |item| item.group == group)
    }

    pub fn item(&self, name: &str) -> Option<&ToolbarItem> {
        self.items.iter().find(|item| item.name == name)
    }

    /// Get the action bound to a key, if any.
    pub fn action_for_accelerator(&self, key: &str) -> Option<ToolbarAction> {
        self.items
            .iter()
            .find(|item| item.accelerators.iter().any(|a| a == key))
            .map(|item| item.action)
    }

    /// Get the tag index (0-based) bound to a key, if any.
    pub fn tag_index_for_key(&self, key: &str) -> Option<usize> {
        self.tag_hotkeys.iter().position(|hotkey| hotkey == key)
    }

    /// Check if a key is already bound.
    /// Returns a description of what it's used for, if anything.
    pub fn key_conflict(&self, key: &str) -> Option<String> {
        if let Some(item) = self
            .items
            .iter()
            .find(|item| item.accelerators.iter().any(|a| a == key))
        {
            return Some(item.name.clone());
        }
        self.tag_index_for_key(key)
            .map(|index| format!("Tag {}", index + 1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_accelerators() {
        let toolbar = Toolbar::default();
        assert_eq!(
            toolbar.action_for_accelerator("p"),
            Some(ToolbarAction::SetMode(EditorMode::Polygon))
        );
        assert_eq!(
            toolbar.action_for_accelerator("R"),
            Some(ToolbarAction::SetMode(EditorMode::Rectangle))
        );
        assert_eq!(toolbar.action_for_accelerator("ArrowDown"), Some(ToolbarAction::NextAsset));
        assert_eq!(toolbar.action_for_accelerator("Ctrl+s"), Some(ToolbarAction::SaveProject));
        assert_eq!(toolbar.action_for_accelerator("x"), None);
    }

    #[test]
    fn test_tag_hotkeys() {
        let toolbar = Toolbar::default();
        assert_eq!(toolbar.tag_index_for_key("1"), Some(0));
        assert_eq!(toolbar.tag_index_for_key("0"), Some(9));
        assert_eq!(toolbar.tag_index_for_key("a"), None);
    }

    #[test]
    fn test_groups_keep_order() {
        let toolbar = Toolbar::default();
        let canvas: Vec<&str> = toolbar.group("canvas").map(|i| i.name.as_str()).collect();
        assert_eq!(canvas, vec!["selectCanvas", "drawRectangle", "drawPolygon"]);
    }

    #[test]
    fn test_custom_items_replace_defaults() {
        let items = vec![ToolbarItem::new(
            "select",
            "Select",
            "canvas",
            ToolbarItemKind::State,
            ToolbarAction::SetMode(EditorMode::Select),
            &["g"],
        )];
        let toolbar = Toolbar::new(items, Vec::new());
        assert_eq!(toolbar.action_for_accelerator("v"), None);
        assert_eq!(
            toolbar.action_for_accelerator("g"),
            Some(ToolbarAction::SetMode(EditorMode::Select))
        );
        assert_eq!(toolbar.tag_index_for_key("1"), None);
    }

    #[test]
    fn test_key_conflict() {
        let toolbar = Toolbar::default();
        assert_eq!(toolbar.key_conflict("v"), Some("selectCanvas".to_string()));
        assert_eq!(toolbar.key_conflict("3"), Some("Tag 3".to_string()));
        assert_eq!(toolbar.key_conflict("q"), None);
    }

    #[test]
    fn test_action_serialization() {
        let json = serde_json::to_string(&ToolbarAction::SetMode(EditorMode::Polygon)).unwrap();
        assert_eq!(json, r#"{"type":"setMode","mode":"polygon"}"#);
        let json = serde_json::to_string(&ToolbarAction::NextAsset).unwrap();
        assert_eq!(json, r#"{"type":"nextAsset"}"#);
    }
}
