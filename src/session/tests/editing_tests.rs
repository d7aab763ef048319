//! Surface events, region selection and tag application.

use super::mocks::*;
use crate::error::SessionError;
use crate::model::{AssetId, AssetState, EditorMode, Point, RegionData, RegionId, RegionType};
use crate::surface::{SurfaceBinding, SurfaceEvent};

/// Harness with asset "a" (and "b") active on "a", plus its binding.
async fn active_harness() -> (Harness, SurfaceBinding) {
    let h = Harness::new(vec![image("a"), image("b")]);
    let binding = h
        .session
        .select_asset(&AssetId::from("a"))
        .await
        .unwrap()
        .binding()
        .unwrap();
    (h, binding)
}

fn draw(h: &Harness, binding: SurfaceBinding, x: f32) -> RegionId {
    h.session
        .handle_event(
            binding,
            SurfaceEvent::SelectionEnd(RegionData::rectangle(x, 0.0, 10.0, 10.0)),
        )
        .unwrap();
    h.session.selection()[0].clone()
}

#[tokio::test]
async fn test_draw_rectangle_on_empty_asset() {
    let (h, binding) = active_harness().await;

    let id = draw(&h, binding, 5.0);

    let snapshot = h.session.snapshot();
    let active = snapshot.active.unwrap();
    assert_eq!(active.regions.len(), 1);
    assert_eq!(active.regions[0].id, id);
    assert_eq!(active.regions[0].points.len(), 4);
    assert_eq!(snapshot.selection, vec![id.clone()]);
    assert!(snapshot.pending_edit);
    assert_eq!(h.surface.last_regions(), Some(vec![id]));

    let outcome = h.session.deactivate().await.unwrap().unwrap();
    assert_eq!(outcome.state, AssetState::Visited);
}

#[tokio::test]
async fn test_tagged_rectangle_commits_as_tagged() {
    let (h, binding) = active_harness().await;
    draw(&h, binding, 5.0);
    h.session.apply_tag("car").unwrap();

    h.session.select_asset(&AssetId::from("b")).await.unwrap();

    assert_eq!(h.metadata.record("a").unwrap().asset.state, AssetState::Tagged);
    let visible = h.session.visible_assets();
    assert_eq!(visible[0].state, AssetState::Tagged);
}

#[tokio::test]
async fn test_drawn_geometry_is_scaled_to_source() {
    let h = Harness::with_provider(
        project_with(vec![image("a")]),
        MockProvider::default(),
        RecordingSurface::scaled(2.0),
    );
    let binding = h
        .session
        .select_asset(&AssetId::from("a"))
        .await
        .unwrap()
        .binding()
        .unwrap();

    draw(&h, binding, 5.0);

    let region = &h.session.active_metadata().unwrap().regions[0];
    assert_eq!(region.points[0], Point::new(10.0, 0.0));
    assert_eq!(region.points[2], Point::new(30.0, 20.0));
}

#[tokio::test]
async fn test_invalid_geometry_never_enters_model() {
    let (h, binding) = active_harness().await;
    let polygon = RegionData::new(
        RegionType::Polygon,
        vec![Point::new(0.0, 0.0), Point::new(1.0, 1.0)],
    );

    let err = h
        .session
        .handle_event(binding, SurfaceEvent::SelectionEnd(polygon))
        .unwrap_err();

    assert!(matches!(err, SessionError::InvalidGeometry { required: 3, .. }));
    assert!(h.session.active_metadata().unwrap().regions.is_empty());
    assert!(!h.session.snapshot().pending_edit);
}

#[tokio::test]
async fn test_move_keeps_tags() {
    let (h, binding) = active_harness().await;
    let id = draw(&h, binding, 0.0);
    h.session.apply_tag("car").unwrap();

    h.session
        .handle_event(
            binding,
            SurfaceEvent::RegionMoveEnd(id.clone(), RegionData::rectangle(50.0, 50.0, 20.0, 20.0)),
        )
        .unwrap();

    let active = h.session.active_metadata().unwrap();
    let region = active.region(&id).unwrap();
    assert_eq!(region.points[0], Point::new(50.0, 50.0));
    assert_eq!(region.tags, vec!["car".to_string()]);
}

#[tokio::test]
async fn test_move_unknown_region() {
    let (h, binding) = active_harness().await;
    let err = h
        .session
        .handle_event(
            binding,
            SurfaceEvent::RegionMoveEnd(
                RegionId::from("ghost"),
                RegionData::rectangle(0.0, 0.0, 1.0, 1.0),
            ),
        )
        .unwrap_err();
    assert!(matches!(err, SessionError::UnknownRegion(_)));
}

#[tokio::test]
async fn test_delete_removes_from_selection_and_store() {
    let (h, binding) = active_harness().await;
    let first = draw(&h, binding, 0.0);
    let second = draw(&h, binding, 20.0);
    h.session
        .handle_event(binding, SurfaceEvent::RegionSelected { id: first.clone(), additive: true })
        .unwrap();
    assert_eq!(h.session.selection(), vec![second.clone(), first.clone()]);

    h.session.handle_event(binding, SurfaceEvent::RegionDelete(first.clone())).unwrap();

    assert_eq!(h.session.selection(), vec![second.clone()]);
    h.session.save().await.unwrap();
    let saved = h.metadata.record("a").unwrap();
    assert_eq!(saved.regions.len(), 1);
    assert!(saved.region(&first).is_none());

    // Same geometry again gets a new id.
    let redrawn = draw(&h, binding, 0.0);
    assert_ne!(redrawn, first);
}

#[tokio::test]
async fn test_additive_selection_never_toggles_off() {
    let (h, binding) = active_harness().await;
    let first = draw(&h, binding, 0.0);
    let second = draw(&h, binding, 20.0);

    for _ in 0..2 {
        h.session
            .handle_event(
                binding,
                SurfaceEvent::RegionSelected {
                    id: first.clone(),
                    additive: true,
                },
            )
            .unwrap();
    }
    assert_eq!(h.session.selection(), vec![second.clone(), first.clone()]);

    h.session
        .handle_event(binding, SurfaceEvent::RegionSelected { id: first.clone(), additive: false })
        .unwrap();
    assert_eq!(h.session.selection(), vec![first]);
}

#[tokio::test]
async fn test_selection_change_is_not_an_edit() {
    let h = Harness::new(vec![image("a")]);
    h.metadata.insert(metadata_with(image("a"), &[&[]]));
    let binding = h
        .session
        .select_asset(&AssetId::from("a"))
        .await
        .unwrap()
        .binding()
        .unwrap();

    h.session
        .handle_event(
            binding,
            SurfaceEvent::RegionSelected {
                id: RegionId::from("a-r0"),
                additive: false,
            },
        )
        .unwrap();

    assert!(!h.session.snapshot().pending_edit);
}

#[tokio::test]
async fn test_apply_tag_is_idempotent() {
    let (h, binding) = active_harness().await;
    let id = draw(&h, binding, 0.0);

    assert_eq!(h.session.apply_tag("car").unwrap(), 1);
    assert_eq!(h.session.apply_tag("car").unwrap(), 0);

    let active = h.session.active_metadata().unwrap();
    assert_eq!(active.region(&id).unwrap().tags, vec!["car".to_string()]);
    assert_eq!(h.session.project().tags.len(), 1);
}

#[tokio::test]
async fn test_apply_tag_to_every_selected_region() {
    let (h, binding) = active_harness().await;
    let first = draw(&h, binding, 0.0);
    let second = draw(&h, binding, 20.0);
    let third = draw(&h, binding, 40.0);
    h.session
        .handle_event(binding, SurfaceEvent::RegionSelected { id: first.clone(), additive: true })
        .unwrap();

    assert_eq!(h.session.apply_tag("tree").unwrap(), 2);

    let active = h.session.active_metadata().unwrap();
    assert!(active.region(&first).unwrap().has_tag("tree"));
    assert!(!active.region(&second).unwrap().has_tag("tree"));
    assert!(active.region(&third).unwrap().has_tag("tree"));
}

#[tokio::test]
async fn test_apply_tag_at_index() {
    let (h, binding) = active_harness().await;
    h.session.add_project_tag("car").await.unwrap();
    h.session.add_project_tag("bus").await.unwrap();
    let id = draw(&h, binding, 0.0);

    let (tag, changed) = h.session.apply_tag_at(1).unwrap();

    assert_eq!((tag.as_str(), changed), ("bus", 1));
    assert!(h.session.active_metadata().unwrap().region(&id).unwrap().has_tag("bus"));
    assert!(matches!(h.session.apply_tag_at(5), Err(SessionError::UnknownTag(_))));
}

#[tokio::test]
async fn test_apply_tag_without_active_asset() {
    let h = Harness::new(vec![image("a")]);
    assert!(matches!(h.session.apply_tag("car"), Err(SessionError::NoActiveAsset)));
}

#[tokio::test]
async fn test_events_from_previous_activation_are_dropped() {
    let (h, old_binding) = active_harness().await;
    h.session.select_asset(&AssetId::from("b")).await.unwrap();

    let err = h
        .session
        .handle_event(
            old_binding,
            SurfaceEvent::SelectionEnd(RegionData::rectangle(0.0, 0.0, 5.0, 5.0)),
        )
        .unwrap_err();

    assert!(matches!(err, SessionError::StaleResponse { .. }));
    assert!(!err.is_user_visible());
    assert!(h.session.active_metadata().unwrap().regions.is_empty());
}

#[tokio::test]
async fn test_events_rejected_while_surface_disabled() {
    let (h, binding) = active_harness().await;
    h.metadata.fail_saves("a");
    assert!(h.session.save().await.is_err());

    let err = h
        .session
        .handle_event(
            binding,
            SurfaceEvent::SelectionEnd(RegionData::rectangle(0.0, 0.0, 5.0, 5.0)),
        )
        .unwrap_err();
    assert!(matches!(err, SessionError::SurfaceDisabled));
}

#[tokio::test]
async fn test_mode_change_forwards_to_surface_only() {
    let (h, binding) = active_harness().await;
    let id = draw(&h, binding, 0.0);

    h.session.set_mode(EditorMode::Polygon);

    assert_eq!(h.session.mode(), EditorMode::Polygon);
    assert_eq!(
        h.surface.commands().last(),
        Some(&SurfaceCommand::SetMode(EditorMode::Polygon))
    );
    assert_eq!(h.session.selection(), vec![id]);
    assert_eq!(h.session.active_metadata().unwrap().regions.len(), 1);
}

#[tokio::test]
async fn test_edit_during_save_stays_pending() {
    let (h, binding) = active_harness().await;
    draw(&h, binding, 0.0);
    let release = h.metadata.gate_save("a");

    let session = h.session.clone();
    let (saved, ()) = tokio::join!(h.session.save(), async move {
        session
            .handle_event(
                binding,
                SurfaceEvent::SelectionEnd(RegionData::rectangle(30.0, 0.0, 5.0, 5.0)),
            )
            .unwrap();
        release.send(()).unwrap();
    });

    saved.unwrap();
    assert!(h.session.snapshot().pending_edit);
    assert_eq!(h.metadata.record("a").unwrap().regions.len(), 1);
    assert_eq!(h.session.active_metadata().unwrap().regions.len(), 2);

    h.session.save().await.unwrap();
    assert!(!h.session.snapshot().pending_edit);
    assert_eq!(h.metadata.record("a").unwrap().regions.len(), 2);
}
