//! Bake scheduling and publishing through the session

use crate::support::{session, solid_image, upload, MockRenderer, RenderCall, PANEL};
use garmentkit_core::{Point, TextureTarget, Zone};
use garmentkit_designer::{
    zone_uv_to_panel_pixels, CustomizerSession, DesignId, ImageRef, PointerEvent, UploadedImage,
};
use std::time::{Duration, Instant};

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

fn center_px(session: &CustomizerSession, id: DesignId) -> Point {
    let e = session.store().get(id).unwrap();
    let zone = session.store().rules().layout.printable(e.zone);
    zone_uv_to_panel_pixels(e.position.x, e.position.y, &PANEL, &zone).unwrap()
}

#[test]
fn test_upload_bakes_on_next_tick() {
    let (mut session, log) = session();
    session.image_uploaded(upload(100, 100)).unwrap();
    let report = session.tick(Instant::now()).expect("immediate bake");

    assert_eq!(report.targets_published, vec![TextureTarget::Body]);
    assert_eq!(
        report.targets_cleared,
        vec![TextureTarget::LeftSleeve, TextureTarget::RightSleeve]
    );
    assert_eq!(report.elements_drawn, 1);
    let log = log.borrow();
    assert_eq!(log.publishes(), 1);
    assert_eq!(log.renders(), 1);
    assert_eq!(log.calls.last(), Some(&RenderCall::Render));
}

#[test]
fn test_wheel_burst_coalesces_into_one_bake() {
    let (mut session, log) = session();
    let id = session.image_uploaded(upload(100, 100)).unwrap();
    let t0 = Instant::now();
    session.tick(t0).unwrap();
    let before = log.borrow().publishes();
    let start_extent = session.store().get(id).unwrap().half_extent.0;

    let mut bakes = Vec::new();
    for i in 1..=10 {
        let now = t0 + ms(i * 5);
        let c = center_px(&session, id);
        session.wheel(c, -1.0, now);
        if session.tick(now).is_some() {
            bakes.push(now);
        }
    }
    assert!(bakes.is_empty());

    for step in 0..40 {
        let now = t0 + ms(60 + step * 10);
        if session.tick(now).is_some() {
            bakes.push(now);
        }
    }
    assert_eq!(bakes.len(), 1);
    assert!(bakes[0] >= t0 + ms(250));
    assert_eq!(log.borrow().publishes(), before + 1);

    // the single bake drew the final extent: a texel past the starting edge
    // but inside the grown one carries the image color
    let e = session.store().get(id).unwrap();
    assert!(e.half_extent.0 > start_extent);
    let log = log.borrow();
    let (target, raster) = log.last_raster.as_ref().unwrap();
    assert_eq!(*target, TextureTarget::Body);
    let u = e.position.x + (start_extent + e.half_extent.0) / 2.0;
    let x = (u * raster.width() as f64) as u32;
    let y = (e.position.y * raster.height() as f64) as u32;
    let px = raster.pixel(x, y).unwrap();
    assert!(px.red().abs_diff(20) <= 1, "{px:?}");
    assert!(px.green().abs_diff(40) <= 1 && px.blue().abs_diff(60) <= 1, "{px:?}");
}

#[test]
fn test_long_drag_bakes_periodically_then_once_at_end() {
    let (mut session, _) = session();
    let id = session.image_uploaded(upload(100, 100)).unwrap();
    let t0 = Instant::now();
    session.tick(t0).unwrap();

    let c = center_px(&session, id);
    session.pointer_down(PointerEvent::new(1, c.x, c.y));
    let mut during = 0;
    for k in 1..=75u64 {
        let now = t0 + ms(k * 16);
        session.pointer_move(PointerEvent::new(1, c.x + k as f64 * 0.5, c.y), now);
        if session.tick(now).is_some() {
            during += 1;
        }
    }
    assert_eq!(during, 2);

    session.pointer_up(PointerEvent::new(1, c.x + 40.0, c.y));
    assert!(session.tick(t0 + ms(1216)).is_some());
    assert!(session.tick(t0 + ms(2000)).is_none());
}

#[test]
fn test_partial_opacity_publishes_with_alpha() {
    let (mut session, log) = session();
    let id = session.image_uploaded(upload(100, 100)).unwrap();
    let t0 = Instant::now();
    session.tick(t0).unwrap();
    assert!(matches!(
        log.borrow().calls[0],
        RenderCall::Publish {
            needs_alpha: false,
            ..
        }
    ));

    session.set_element_property(id, "opacity", "60").unwrap();
    session.tick(t0 + ms(1)).unwrap();
    let log = log.borrow();
    let last_publish = log
        .calls
        .iter()
        .rev()
        .find(|c| matches!(c, RenderCall::Publish { .. }))
        .cloned();
    assert_eq!(
        last_publish,
        Some(RenderCall::Publish {
            target: TextureTarget::Body,
            width: 64,
            needs_alpha: true,
        })
    );
}

#[test]
fn test_clearing_zone_clears_texture() {
    let (mut session, log) = session();
    session.image_uploaded(upload(100, 100)).unwrap();
    let t0 = Instant::now();
    session.tick(t0).unwrap();
    log.borrow_mut().calls.clear();

    assert_eq!(session.clear(Zone::Front), 1);
    let report = session.tick(t0 + ms(1)).unwrap();
    assert!(report.targets_published.is_empty());
    assert_eq!(report.targets_cleared.len(), 3);
    let log = log.borrow();
    assert!(log.calls.contains(&RenderCall::Clear(TextureTarget::Body)));
    assert_eq!(log.renders(), 1);
}

#[test]
fn test_raster_shows_design_at_its_position() {
    let (mut session, log) = session();
    let image = solid_image(10, 10, [200, 10, 10, 255]);
    let id = session
        .image_uploaded(UploadedImage::ready(image, None).unwrap())
        .unwrap();
    session.tick(Instant::now()).unwrap();

    let e = session.store().get(id).unwrap();
    let log = log.borrow();
    let (target, raster) = log.last_raster.as_ref().unwrap();
    assert_eq!(*target, TextureTarget::Body);
    let x = (e.position.x * raster.width() as f64) as u32;
    let y = (e.position.y * raster.height() as f64) as u32;
    let px = raster.pixel(x, y).unwrap();
    assert!(px.red().abs_diff(200) <= 1, "{px:?}");
    assert!(px.green().abs_diff(10) <= 1 && px.blue().abs_diff(10) <= 1);
    assert_eq!(px.alpha(), 255);
}

#[test]
fn test_pending_image_is_skipped_then_baked_when_ready() {
    let (mut session, _) = session();
    let image = ImageRef::pending();
    let id = session
        .image_uploaded(UploadedImage {
            image: image.clone(),
            natural_width: 8,
            natural_height: 8,
            file_name: None,
        })
        .unwrap();
    assert_eq!(session.store().get(id).unwrap().name, "Untitled design");

    let t0 = Instant::now();
    let first = session.tick(t0).unwrap();
    assert_eq!(first.elements_skipped, vec![id]);
    assert_eq!(first.elements_drawn, 0);
    // base color is still published for the target
    assert_eq!(first.targets_published, vec![TextureTarget::Body]);

    image.resolve(tiny_skia::Pixmap::new(8, 8).unwrap());
    session.image_ready(&image);
    let second = session.tick(t0 + ms(1)).unwrap();
    assert!(second.elements_skipped.is_empty());
    assert_eq!(second.elements_drawn, 1);
}

#[test]
fn test_unavailable_renderer_skips_targets() {
    let (renderer, log) = MockRenderer::unavailable();
    let mut session = CustomizerSession::new(Box::new(renderer));
    session.set_panel_rect(PANEL);
    session.image_uploaded(upload(100, 100)).unwrap();

    let report = session.tick(Instant::now()).unwrap();
    assert_eq!(report.unavailable_targets, vec![TextureTarget::Body]);
    assert_eq!(log.borrow().publishes(), 0);
    assert_eq!(session.last_bake_report(), Some(&report));
}

#[test]
fn test_deadline_after_drag_release_is_now() {
    let (mut session, _) = session();
    let id = session.image_uploaded(upload(100, 100)).unwrap();
    let t0 = Instant::now();
    session.tick(t0).unwrap();

    let c = center_px(&session, id);
    session.pointer_down(PointerEvent::new(1, c.x, c.y));
    session.pointer_move(PointerEvent::new(1, c.x + 5.0, c.y), t0 + ms(10));
    session.pointer_up(PointerEvent::new(1, c.x + 5.0, c.y));

    let now = t0 + ms(11);
    assert_eq!(session.next_deadline(now), Some(now));
    assert!(session.tick(now).is_some());
    assert_eq!(session.next_deadline(now), None);
}

#[test]
fn test_cancel_drops_pending_bake() {
    let (mut session, _) = session();
    session.image_uploaded(upload(100, 100)).unwrap();
    let t0 = Instant::now();
    assert_eq!(session.next_deadline(t0), Some(t0));
    session.cancel_pending();
    assert!(session.tick(t0 + ms(1000)).is_none());
    assert_eq!(session.next_deadline(t0), None);
}
