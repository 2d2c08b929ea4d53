//! Coordinate transform properties

use garmentkit_core::{PixelRect, UvRect};
use garmentkit_designer::{
    clamp_to_printable, normalize_rotation, panel_pixels_to_zone_uv, zone_uv_to_panel_pixels,
};
use proptest::prelude::*;

fn zone_rect() -> impl Strategy<Value = UvRect> {
    (0.0..0.8f64, 0.0..0.8f64, 0.05..0.2f64, 0.05..0.2f64)
        .prop_map(|(u, v, w, h)| UvRect::new(u, v, u + w, v + h))
}

fn panel_rect() -> impl Strategy<Value = PixelRect> {
    (-500.0..500.0f64, -500.0..500.0f64, 1.0..4000.0f64, 1.0..4000.0f64)
        .prop_map(|(x, y, w, h)| PixelRect::new(x, y, w, h))
}

proptest! {
    #[test]
    fn prop_panel_uv_round_trip(
        zone in zone_rect(),
        panel in panel_rect(),
        fu in 0.0..=1.0f64,
        fv in 0.0..=1.0f64,
    ) {
        let u = zone.min_u + fu * zone.width();
        let v = zone.min_v + fv * zone.height();
        let px = zone_uv_to_panel_pixels(u, v, &panel, &zone).unwrap();
        let back = panel_pixels_to_zone_uv(px.x, px.y, &panel, &zone).unwrap();
        prop_assert!((back.x - u).abs() < 1e-9);
        prop_assert!((back.y - v).abs() < 1e-9);
    }

    #[test]
    fn prop_clamp_is_idempotent(
        zone in zone_rect(),
        u in -2.0..3.0f64,
        v in -2.0..3.0f64,
        hu in 0.0..0.3f64,
        hv in 0.0..0.3f64,
    ) {
        let once = clamp_to_printable(u, v, hu, hv, &zone);
        let twice = clamp_to_printable(once.x, once.y, hu, hv, &zone);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn prop_clamp_keeps_extent_inside(
        zone in zone_rect(),
        u in -2.0..3.0f64,
        v in -2.0..3.0f64,
        fu in 0.0..=0.5f64,
        fv in 0.0..=0.5f64,
    ) {
        let (hu, hv) = (fu * zone.width(), fv * zone.height());
        let p = clamp_to_printable(u, v, hu, hv, &zone);
        prop_assert!(p.x - hu >= zone.min_u - 1e-9 && p.x + hu <= zone.max_u + 1e-9);
        prop_assert!(p.y - hv >= zone.min_v - 1e-9 && p.y + hv <= zone.max_v + 1e-9);
    }

    #[test]
    fn prop_rotation_stays_in_range(deltas in prop::collection::vec(-1000.0..1000.0f64, 1..40)) {
        let mut r = 0.0;
        for d in deltas {
            r = normalize_rotation(r + d);
            prop_assert!((0.0..360.0).contains(&r));
        }
    }
}

#[test]
fn test_rotation_accumulation_matches_direct() {
    let stepwise = normalize_rotation(normalize_rotation(0.0 + 370.0) - 20.0);
    assert_eq!(stepwise, normalize_rotation(350.0));
    assert_eq!(stepwise, 350.0);
}

#[test]
fn test_degenerate_panel_never_divides() {
    let zone = UvRect::new(0.2, 0.1, 0.8, 0.9);
    for panel in [
        PixelRect::new(0.0, 0.0, 0.0, 0.0),
        PixelRect::new(0.0, 0.0, -10.0, 50.0),
        PixelRect::new(0.0, 0.0, f64::NAN, 50.0),
    ] {
        assert!(panel_pixels_to_zone_uv(1.0, 1.0, &panel, &zone).is_err());
        assert!(zone_uv_to_panel_pixels(0.5, 0.5, &panel, &zone).is_err());
    }
}
