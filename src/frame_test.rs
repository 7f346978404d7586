#![allow(clippy::float_cmp)]

use super::*;

const EPSILON: f64 = 1e-9;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

fn loaded_frame(w: f64, h: f64, natural: Size) -> FrameState {
    let mut f = FrameState::new(0.0, 0.0, w, h).with_source("img");
    f.set_natural(natural);
    f
}

// =============================================================
// Corner
// =============================================================

#[test]
fn opposite_corner_is_diagonal() {
    assert_eq!(Corner::Nw.opposite(), Corner::Se);
    assert_eq!(Corner::Ne.opposite(), Corner::Sw);
    for c in Corner::ALL {
        assert_eq!(c.opposite().opposite(), c);
        assert_ne!(c.is_west(), c.opposite().is_west());
        assert_ne!(c.is_north(), c.opposite().is_north());
    }
}

#[test]
fn rect_corner_positions() {
    let r = Rect { x: 10.0, y: 20.0, width: 100.0, height: 50.0 };
    assert_eq!(r.corner(Corner::Nw), Point::new(10.0, 20.0));
    assert_eq!(r.corner(Corner::Se), Point::new(110.0, 70.0));
    assert_eq!(r.corner(Corner::Ne), Point::new(110.0, 20.0));
    assert_eq!(r.corner(Corner::Sw), Point::new(10.0, 70.0));
}

// =============================================================
// Cover fit
// =============================================================

#[test]
fn wide_image_fits_height() {
    let s = cover_scale(Size::new(400.0, 100.0), 100.0, 100.0);
    assert_eq!(s, 1.0);
}

#[test]
fn tall_image_fits_width() {
    let s = cover_scale(Size::new(100.0, 400.0), 200.0, 100.0);
    assert_eq!(s, 2.0);
}

#[test]
fn equal_aspect_fills_exactly() {
    let s = cover_scale(Size::new(50.0, 25.0), 200.0, 100.0);
    assert_eq!(s, 4.0);
}

#[test]
fn cover_fit_always_covers_frame() {
    for (nw, nh) in [(300.0, 200.0), (200.0, 300.0), (1.0, 1.0), (4000.0, 10.0)] {
        let f = loaded_frame(120.0, 80.0, Size::new(nw, nh));
        let c = f.content_rect().unwrap();
        assert!(c.width >= 120.0 - EPSILON);
        assert!(c.height >= 80.0 - EPSILON);
    }
}

#[test]
fn default_fit_centres_content() {
    let f = loaded_frame(100.0, 100.0, Size::new(200.0, 100.0));
    assert_eq!(f.content_scale, 1.0);
    assert_eq!(f.content_x, -50.0);
    assert_eq!(f.content_y, 0.0);
    assert!(!f.fit_pending);
}

#[test]
fn fit_waits_for_natural_size() {
    let mut f = FrameState::new(0.0, 0.0, 100.0, 100.0).with_source("img");
    assert!(f.fit_pending);
    assert!(!f.apply_cover_fit());
    assert!(f.content_rect().is_none());
    assert!(f.set_natural(Size::new(50.0, 50.0)));
    assert_eq!(f.content_scale, 2.0);
}

#[test]
fn natural_without_pending_fit_preserves_placement() {
    let mut f = FrameState::new(0.0, 0.0, 100.0, 100.0).with_source("img");
    f.fit_pending = false;
    f.content_x = 7.0;
    f.content_scale = 0.5;
    assert!(!f.set_natural(Size::new(50.0, 50.0)));
    assert_eq!(f.content_x, 7.0);
    assert_eq!(f.content_scale, 0.5);
}

#[test]
fn unusable_natural_size_is_ignored() {
    let mut f = FrameState::new(0.0, 0.0, 100.0, 100.0).with_source("img");
    assert!(!f.set_natural(Size::new(0.0, 50.0)));
    assert!(f.natural().is_none());
    assert!(f.fit_pending);
}

#[test]
fn swap_source_resets_and_refits() {
    let mut f = loaded_frame(100.0, 100.0, Size::new(200.0, 100.0));
    f.swap_source("other");
    assert_eq!(f.content_x, 0.0);
    assert!(f.natural().is_none());
    assert!(f.set_natural(Size::new(100.0, 400.0)));
    assert_eq!(f.content_scale, 1.0);
    assert_eq!(f.content_y, -150.0);
}

// =============================================================
// Mode
// =============================================================

#[test]
fn content_edit_requires_selection() {
    let mut f = FrameState::new(0.0, 0.0, 10.0, 10.0);
    assert!(!f.enter_content_edit());
    f.is_selected = true;
    assert!(f.enter_content_edit());
    assert_eq!(f.mode, FrameMode::ContentEdit);
}

#[test]
fn deselect_forces_normal_mode() {
    let mut f = FrameState::new(0.0, 0.0, 10.0, 10.0);
    f.is_selected = true;
    f.enter_content_edit();
    assert!(f.deselect());
    assert_eq!(f.mode, FrameMode::Normal);
    assert!(!f.is_selected);
    assert!(!f.deselect());
}

// =============================================================
// Construction
// =============================================================

#[test]
fn media_frame_uses_base_size_on_long_side() {
    assert_eq!(media_frame_size(Size::new(600.0, 300.0)), Size::new(300.0, 150.0));
    assert_eq!(media_frame_size(Size::new(300.0, 600.0)), Size::new(150.0, 300.0));
    assert_eq!(media_frame_size(Size::new(0.0, 0.0)), Size::new(300.0, 300.0));
}

#[test]
fn from_media_centres_on_drop_point() {
    let f = FrameState::from_media(Point::new(100.0, 100.0), Size::new(600.0, 300.0), "a.png");
    assert_eq!(f.x, -50.0);
    assert_eq!(f.y, 25.0);
    assert!(approx_eq(f.content_scale, 0.5));
    assert!(f.is_well_formed());
}

#[test]
fn batch_positions_form_centred_grid() {
    let pts = batch_positions(5);
    assert_eq!(pts.len(), 5);
    // 3 columns on a 350 pitch: row width 1050.
    assert_eq!(pts[0], Point::new(-525.0, 0.0));
    assert_eq!(pts[2], Point::new(175.0, 0.0));
    assert_eq!(pts[3], Point::new(-525.0, 350.0));
}

#[test]
fn batch_positions_single_image() {
    assert_eq!(batch_positions(1), vec![Point::new(-175.0, 0.0)]);
    assert!(batch_positions(0).is_empty());
}

#[test]
fn well_formed_rejects_non_finite() {
    let mut f = FrameState::new(0.0, 0.0, 10.0, 10.0);
    assert!(f.is_well_formed());
    f.x = f64::NAN;
    assert!(!f.is_well_formed());
}
