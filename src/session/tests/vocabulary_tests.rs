//! Tag vocabulary merging on load and project tag management.

use super::mocks::*;
use crate::error::SessionError;
use crate::model::{AssetId, Tag};
use crate::vocabulary::TagVocabulary;

#[tokio::test]
async fn test_unknown_tag_is_merged_once() {
    let h = Harness::new(vec![image("a")]);
    h.metadata.insert(metadata_with(image("a"), &[&["car"], &["car"]]));

    h.session.select_asset(&AssetId::from("a")).await.unwrap();

    let project = h.session.project();
    assert_eq!(project.tags, vec![Tag::new("car", [128, 128, 0])]);
    assert_eq!(h.projects.save_count(), 1);
}

#[tokio::test]
async fn test_many_new_tags_trigger_one_save() {
    let h = Harness::new(vec![image("a")]);
    h.metadata
        .insert(metadata_with(image("a"), &[&["car", "bus"], &["tree"], &["bus"]]));

    h.session.select_asset(&AssetId::from("a")).await.unwrap();

    let names: Vec<String> = h.session.project().tags.iter().map(|t| t.name.clone()).collect();
    assert_eq!(names, vec!["car", "bus", "tree"]);
    assert_eq!(h.projects.save_count(), 1);
}

#[tokio::test]
async fn test_known_tags_do_not_save() {
    let project = project_with(vec![image("a")]).with_tags(vec![Tag::new("car", [1, 2, 3])]);
    let h = Harness::with_provider(project, MockProvider::default(), RecordingSurface::new());
    h.metadata.insert(metadata_with(image("a"), &[&["car"]]));

    h.session.select_asset(&AssetId::from("a")).await.unwrap();

    assert_eq!(h.session.project().tags, vec![Tag::new("car", [1, 2, 3])]);
    assert_eq!(h.projects.save_count(), 0);
}

#[tokio::test]
async fn test_merge_colors_follow_configured_palette() {
    let h = Harness::new(vec![image("a")]);
    let session = h
        .session
        .clone()
        .with_vocabulary(TagVocabulary::with_palette(&["#ff0000", "#00ff00"]));
    h.metadata.insert(metadata_with(image("a"), &[&["x", "y", "z"]]));

    session.select_asset(&AssetId::from("a")).await.unwrap();

    let colors: Vec<[u8; 3]> = session.project().tags.iter().map(|t| t.color).collect();
    assert_eq!(colors, vec![[255, 0, 0], [0, 255, 0], [255, 0, 0]]);
}

#[tokio::test]
async fn test_vocabulary_save_failure_is_a_warning() {
    let h = Harness::new(vec![image("a")]);
    h.metadata.insert(metadata_with(image("a"), &[&["car"]]));
    h.projects.set_failing(true);

    let activation = h.session.select_asset(&AssetId::from("a")).await.unwrap();

    assert_eq!(activation.warnings().len(), 1);
    assert!(h.session.project().has_tag("car"));
    assert!(h.session.binding().is_some());
}

#[tokio::test]
async fn test_add_and_remove_project_tags() {
    let h = Harness::new(vec![image("a")]);

    let added = h.session.add_project_tag("  car ").await.unwrap().unwrap();
    assert_eq!(added.name, "car");
    assert!(h.session.add_project_tag("car").await.unwrap().is_none());
    assert!(h.session.add_project_tag("   ").await.unwrap().is_none());
    assert_eq!(h.projects.save_count(), 1);

    let removed = h.session.remove_project_tag("car").await.unwrap();
    assert_eq!(removed.name, "car");
    assert!(h.session.project().tags.is_empty());
    assert_eq!(h.projects.save_count(), 2);

    assert!(matches!(
        h.session.remove_project_tag("car").await,
        Err(SessionError::UnknownTag(_))
    ));
}
