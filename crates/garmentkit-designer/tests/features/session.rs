//! Element lifecycle through the session API

use crate::support::{session, upload, MockRenderer, PANEL};
use garmentkit_core::{CustomizerError, Zone};
use garmentkit_designer::{
    CustomizerSession, DesignId, ElementProperty, ImageRef, ImageStatus, PointerEvent,
    PreviewItem, UploadedImage,
};
use garmentkit_settings::Config;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

#[test]
fn test_delete_selected_clears_selection_first() {
    let (mut session, _) = session();
    let id = session.image_uploaded(upload(100, 100)).unwrap();
    let changes = Rc::new(RefCell::new(Vec::new()));
    session.on_selection_changed({
        let changes = Rc::clone(&changes);
        move |c| changes.borrow_mut().push(c)
    });

    assert!(session.delete_element(id));
    assert_eq!(session.selected_id(), None);
    assert!(session.store().list_by_zone(Zone::Front).is_empty());
    assert_eq!(changes.borrow().len(), 1);
    assert_eq!(changes.borrow()[0].previous, Some(id));
    // second delete is a stale no-op
    assert!(!session.delete_element(id));
}

#[test]
fn test_same_upload_twice_selects_existing() {
    let (mut session, _) = session();
    let first = upload(100, 100);
    let a = session.image_uploaded(first.clone()).unwrap();
    session.select(None);
    let b = session.image_uploaded(first).unwrap();
    assert_eq!(a, b);
    assert_eq!(session.selected_id(), Some(a));
    assert_eq!(session.store().len(), 1);
}

#[test]
fn test_same_image_in_another_zone_is_a_new_element() {
    let (mut session, _) = session();
    let image = upload(100, 100);
    let a = session.image_uploaded(image.clone()).unwrap();
    session.switch_zone("back").unwrap();
    let b = session.image_uploaded(image).unwrap();
    assert_ne!(a, b);
    assert_eq!(session.store().zone_of(b), Some(Zone::Back));
}

#[test]
fn test_duplicate_is_offset_and_selected() {
    let (mut session, _) = session();
    let id = session.image_uploaded(upload(100, 100)).unwrap();
    let copy = session.duplicate_element(id).unwrap();

    assert_eq!(session.selected_id(), Some(copy));
    let (src, dup) = (
        session.store().get(id).unwrap(),
        session.store().get(copy).unwrap(),
    );
    assert_eq!(dup.name, "art.png (copy)");
    assert!(dup.image.ptr_eq(&src.image));
    assert!((dup.position.x - src.position.x - 0.04).abs() < 1e-12);
    let order: Vec<_> = session.summaries(Zone::Front).iter().map(|s| s.id).collect();
    assert_eq!(order, vec![id, copy]);
}

#[test]
fn test_switch_zone_deselects_foreign_element() {
    let (mut session, _) = session();
    let id = session.image_uploaded(upload(100, 100)).unwrap();
    session.switch_zone("left").unwrap();
    assert_eq!(session.current_zone(), Zone::Left);
    assert_eq!(session.selected_id(), None);
    assert!(session.store().contains(id));

    let err = session.switch_zone("collar").unwrap_err();
    assert!(matches!(err, CustomizerError::UnknownZone(_)));
    assert_eq!(session.current_zone(), Zone::Left);
}

#[test]
fn test_switch_zone_mid_gesture_resets_interaction() {
    let (mut session, _) = session();
    session.image_uploaded(upload(100, 100)).unwrap();
    session.pointer_down(PointerEvent::new(1, 200.0, 350.0));
    assert!(session.interaction().is_dragging());
    session.switch_zone("back").unwrap();
    assert!(!session.interaction().is_dragging());
    assert!(!session.scheduler().gesture_active());
}

#[test]
fn test_clear_zone_leaves_other_zones() {
    let (mut session, _) = session();
    session.image_uploaded(upload(100, 100)).unwrap();
    session.image_uploaded(upload(50, 80)).unwrap();
    session.switch_zone("right").unwrap();
    let kept = session.image_uploaded(upload(20, 20)).unwrap();

    assert_eq!(session.clear_zone("front").unwrap(), 2);
    assert_eq!(session.store().len(), 1);
    assert_eq!(session.selected_id(), Some(kept));
    assert!(session.clear_zone("hood").is_err());
}

#[test]
fn test_list_elements_reports_state() {
    let (mut session, _) = session();
    let a = session.image_uploaded(upload(100, 100)).unwrap();
    let b = session.image_uploaded(upload(60, 30)).unwrap();
    session.set_element_property(a, "opacity", "45.6").unwrap();

    let list = session.list_elements("front").unwrap();
    assert_eq!(list.len(), 2);
    assert_eq!(list[0].id, a);
    assert_eq!(list[0].opacity, 46);
    assert!(!list[0].selected);
    assert_eq!(list[1].id, b);
    assert!(list[1].selected);
    assert_eq!(list[1].image_status, ImageStatus::Ready);
    assert!(session.list_elements("back").unwrap().is_empty());
}

#[test]
fn test_property_edits_are_validated() {
    let (mut session, _) = session();
    let id = session.image_uploaded(upload(100, 100)).unwrap();

    assert!(matches!(
        session.set_element_property(id, "glitter", "1"),
        Err(CustomizerError::UnknownProperty(_))
    ));
    assert!(session.set_element_property(id, "scale", "big").is_err());
    assert!(session.set_element_property(id, "rotation", "NaN").is_err());

    session.set_element_property(id, "rotation", "-90").unwrap();
    session.set_element_property(id, "scale", "12").unwrap();
    session.set_element_property(id, "blend", "on").unwrap();
    session.set_element_property(id, "name", "  Logo ").unwrap();
    let e = session.store().get(id).unwrap();
    assert_eq!(e.rotation, 270.0);
    // 100px art in the front zone fits up to 2.5x, below the configured 3.0
    assert!((e.scale - 2.5).abs() < 1e-9, "{}", e.scale);
    assert!(e.flags.fabric_blend);
    assert_eq!(e.name, "Logo");

    assert!(!session.apply_property(DesignId(404), ElementProperty::Opacity(5)));
}

#[test]
fn test_position_edit_is_clamped() {
    let (mut session, _) = session();
    let id = session.image_uploaded(upload(100, 100)).unwrap();
    session.set_element_property(id, "x", "-5").unwrap();
    let e = session.store().get(id).unwrap();
    let rect = session.store().rules().layout.printable(Zone::Front);
    assert!((e.position.x - (rect.min_u + e.half_extent.0)).abs() < 1e-12);
}

#[test]
fn test_scale_edit_keeps_element_inside_zone() {
    let (mut session, _) = session();
    let id = session.image_uploaded(upload(100, 100)).unwrap();
    session.set_element_property(id, "scale", "3.0").unwrap();

    let e = session.store().get(id).unwrap();
    let rect = session.store().rules().layout.printable(Zone::Front);
    let (hu, hv) = e.half_extent;
    assert!((e.scale - 2.5).abs() < 1e-9, "{}", e.scale);
    assert!(e.position.x - hu >= rect.min_u - 1e-9);
    assert!(e.position.x + hu <= rect.max_u + 1e-9);
    assert!(e.position.y - hv >= rect.min_v - 1e-9);
    assert!(e.position.y + hv <= rect.max_v + 1e-9);
}

#[test]
fn test_preview_sink_receives_projection() {
    let (mut session, _) = session();
    let seen: Rc<RefCell<Vec<(Zone, Vec<PreviewItem>)>>> = Rc::default();
    session.set_preview_sink(Box::new({
        let seen = Rc::clone(&seen);
        move |zone: Zone, items: &[PreviewItem]| seen.borrow_mut().push((zone, items.to_vec()))
    }));
    let id = session.image_uploaded(upload(100, 100)).unwrap();
    session.tick(Instant::now());

    let seen = seen.borrow();
    let (zone, items) = seen.last().unwrap();
    assert_eq!(*zone, Zone::Front);
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].id, id);
    assert!(items[0].selected);
    assert!((items[0].center.x - 200.0).abs() < 1e-9);
    assert!((items[0].center.y - 350.0).abs() < 1e-9);
    assert!((items[0].width - items[0].height).abs() < 1e-9);
}

#[test]
fn test_preview_requires_panel() {
    let (renderer, _) = MockRenderer::new();
    let session = CustomizerSession::new(Box::new(renderer));
    assert!(session.preview(Zone::Front).is_err());
}

#[test]
fn test_invalid_config_falls_back_to_defaults() {
    let mut config = Config::default();
    config.interaction.min_scale = -1.0;
    let (renderer, _) = MockRenderer::new();
    let session = CustomizerSession::from_config(&config, Box::new(renderer));
    assert_eq!(session.store().rules().min_scale, 0.1);
}

#[test]
fn test_config_debounce_is_honoured() {
    let mut config = Config::default();
    config.scheduling.bake_debounce_ms = 50;
    let (renderer, _) = MockRenderer::new();
    let mut session = CustomizerSession::from_config(&config, Box::new(renderer));
    session.set_panel_rect(PANEL);
    assert_eq!(session.scheduler().debounce(), Duration::from_millis(50));

    let id = session.image_uploaded(upload(100, 100)).unwrap();
    let t0 = Instant::now();
    session.tick(t0).unwrap();
    let center = session.preview(Zone::Front).unwrap()[0].center;
    session.wheel(center, 1.0, t0);
    assert!(session.tick(t0 + Duration::from_millis(49)).is_none());
    assert!(session.tick(t0 + Duration::from_millis(50)).is_some());
    assert!(session.store().get(id).unwrap().scale < 1.5);
}

#[test]
fn test_upload_without_dimensions_is_rejected() {
    let (mut session, _) = session();
    let upload = UploadedImage {
        image: ImageRef::pending(),
        natural_width: 0,
        natural_height: 10,
        file_name: Some("empty.png".into()),
    };
    assert_eq!(session.image_uploaded(upload), None);
    assert!(session.store().is_empty());
}
