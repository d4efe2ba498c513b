use super::*;
use crate::{foundation::core::Canvas, render::surface::DrawState};

const HIDDEN_INK: &str = "rgba(0, 0, 0, 0)";

fn plate_element(text: &str) -> TextElement {
    let mut el = TextElement::default_with(text, 64.0);
    el.color = HIDDEN_INK.to_owned();
    el.background_enabled = true;
    el.background_color = Some("#ff0000".to_owned());
    el
}

fn render(el: &TextElement, w: u32, h: u32) -> ThumbResult<Surface> {
    render_with(el, w, h, &RenderConfig::default())
}

fn render_with(el: &TextElement, w: u32, h: u32, config: &RenderConfig) -> ThumbResult<Surface> {
    let canvas = Canvas::new(w, h).unwrap();
    let mut surface = Surface::new(canvas);
    let mut fonts = FontBook::new();
    render_text_element(
        &mut surface,
        &mut fonts,
        el,
        f64::from(w),
        f64::from(h),
        canvas.scale_factor(config.scale_divisor),
        config,
    )?;
    Ok(surface)
}

#[test]
fn font_size_scales_with_canvas_width() {
    let config = RenderConfig::default();
    assert_eq!(scaled_font_size(72.0, 1280.0, &config), 72.0);
    assert_eq!(scaled_font_size(72.0, 640.0, &config), 36.0);
}

#[test]
fn curve_radius_has_a_floor() {
    let config = RenderConfig::default();
    assert_eq!(curve_radius(10.0, &config), 80.0);
    assert_eq!(curve_radius(64.0, &config), 128.0);
}

#[test]
fn curve_placements_are_mirror_symmetric() {
    let places = curve_placements(6, 100.0);
    assert_eq!(places.len(), 6);
    for i in 0..3 {
        let a = places[i].position;
        let b = places[5 - i].position;
        assert!((a.x + b.x).abs() < 1e-9, "x not mirrored at {i}");
        assert!((a.y - b.y).abs() < 1e-9, "y differs at {i}");
        assert!(a.y < 0.0, "glyphs sit on the upper arc");
    }
}

#[test]
fn odd_curve_puts_middle_character_straight_up() {
    let places = curve_placements(3, 50.0);
    let mid = places[1];
    assert!((mid.angle + FRAC_PI_2).abs() < 1e-12);
    assert!(mid.position.x.abs() < 1e-9);
    assert!((mid.position.y + 50.0).abs() < 1e-9);
    assert!(mid.rotation.abs() < 1e-12);
    assert!(curve_placements(0, 50.0).is_empty());
}

#[test]
fn plate_rect_follows_alignment_and_clamps_width() {
    let r = background_plate(TextAlign::Center, 64.0, 1000.0, 76.8, 0.0);
    assert_eq!(r, Rect::new(-32.0, -38.4, 32.0, 38.4));

    let r = background_plate(TextAlign::Right, 500.0, 200.0, 10.0, 2.0);
    assert_eq!(r, Rect::new(-202.0, -7.0, 2.0, 7.0));

    let r = background_plate(TextAlign::Left, 30.0, 200.0, 10.0, 0.0);
    assert_eq!(r.x0, 0.0);
    assert_eq!(r.x1, 30.0);
}

#[test]
fn plate_is_centered_on_pivot_with_measured_width() {
    let s = render(&plate_element("AB"), 1280, 720).unwrap();
    let red = [255, 0, 0, 255];
    let clear = [0, 0, 0, 0];
    assert_eq!(s.pixel(610, 324), Some(red));
    assert_eq!(s.pixel(670, 396), Some(red));
    assert_eq!(s.pixel(605, 324), Some(clear));
    assert_eq!(s.pixel(675, 360), Some(clear));
    assert_eq!(s.pixel(610, 318), Some(clear));
    assert_eq!(s.pixel(640, 401), Some(clear));
}

#[test]
fn rotated_plate_spins_around_its_pivot() {
    let red = [255, 0, 0, 255];
    let clear = [0, 0, 0, 0];

    let upright = render(&plate_element("AB"), 1280, 720).unwrap();
    assert_eq!(upright.pixel(605, 360), Some(clear));
    assert_eq!(upright.pixel(640, 325), Some(red));

    let mut el = plate_element("AB");
    el.rotation = 90.0;
    let s = render(&el, 1280, 720).unwrap();
    assert_eq!(s.pixel(605, 360), Some(red));
    assert_eq!(s.pixel(675, 360), Some(red));
    assert_eq!(s.pixel(640, 330), Some(red));
    assert_eq!(s.pixel(640, 389), Some(red));
    assert_eq!(s.pixel(600, 360), Some(clear));
    assert_eq!(s.pixel(640, 325), Some(clear));
    assert_eq!(s.pixel(640, 394), Some(clear));
}

#[test]
fn plate_casts_no_shadow() {
    let config = RenderConfig {
        shadow_offset_factor: 100.0,
        ..RenderConfig::default()
    };
    let plain = render_with(&plate_element("AB"), 1280, 720, &config).unwrap();

    let mut el = plate_element("AB");
    el.shadow = true;
    el.shadow_color = "#000000".to_owned();
    el.shadow_blur = 0.0;
    let s = render_with(&el, 1280, 720, &config).unwrap();

    assert_eq!(s.pixel(710, 430), Some([0, 0, 0, 0]));
    assert_eq!(s.pixel(640, 360), Some([255, 0, 0, 255]));
    assert_eq!(s.data(), plain.data());
}

#[test]
fn transparent_text_casts_no_shadow() {
    let mut el = TextElement::default_with("HHHH", 64.0);
    el.color = "rgba(255, 255, 255, 0)".to_owned();
    el.shadow = true;
    el.shadow_color = "#000000".to_owned();
    el.shadow_blur = 0.0;
    let s = render(&el, 1280, 720).unwrap();
    assert!(s.data().iter().all(|b| *b == 0));
}

/// Last inked row and column.
fn ink_extent(s: &Surface) -> (u32, u32) {
    let c = s.canvas();
    let mut extent = (0, 0);
    for y in 0..c.height {
        for x in 0..c.width {
            if s.pixel(x, y).is_some_and(|p| p[3] > 0) {
                extent = (extent.0.max(x), extent.1.max(y));
            }
        }
    }
    extent
}

#[test]
fn shadow_offset_follows_scale_factor() {
    let mut el = TextElement::default_with("H", 64.0);
    el.color = "#ffffff".to_owned();
    let config = RenderConfig::default();
    let canvas = Canvas::new(2000, 2000).unwrap();
    assert_eq!(canvas.scale_factor(config.scale_divisor), 2.0);

    let bare = render(&el, 2000, 2000).unwrap();
    el.shadow = true;
    el.shadow_color = "#000000".to_owned();
    el.shadow_blur = 0.0;
    let shaded = render(&el, 2000, 2000).unwrap();

    let (bx, by) = ink_extent(&bare);
    let (sx, sy) = ink_extent(&shaded);
    assert!((3..=5).contains(&(sx - bx)), "x offset {}", sx - bx);
    assert!((3..=5).contains(&(sy - by)), "y offset {}", sy - by);

    let shadow_px = shaded.pixel(sx, sy).unwrap();
    assert_eq!(&shadow_px[..3], &[0, 0, 0]);
}

#[test]
fn underline_is_centered_on_the_pivot() {
    let mut el = TextElement::default_with("HHHH", 64.0);
    el.color = "#00ff00".to_owned();
    el.text_align = TextAlign::Left;
    el.underline = true;
    let s = render(&el, 1280, 720).unwrap();

    // 128px of text: the line runs 576..704 at y 366.9, 2.3px thick.
    let green = [0, 255, 0, 255];
    assert_eq!(s.pixel(580, 366), Some(green));
    assert_eq!(s.pixel(600, 367), Some(green));
    assert_eq!(s.pixel(570, 366), Some([0, 0, 0, 0]));
    assert_eq!(s.pixel(600, 363), Some([0, 0, 0, 0]));
    assert_eq!(s.pixel(600, 370), Some([0, 0, 0, 0]));

    let solid_rows = (350..385)
        .filter(|&y| s.pixel(600, y).is_some_and(|p| p[3] >= 128))
        .count();
    assert_eq!(solid_rows, 2);

    el.underline = false;
    let plain = render(&el, 1280, 720).unwrap();
    assert_eq!(plain.pixel(600, 367), Some([0, 0, 0, 0]));
}

#[test]
fn multi_line_plate_spans_the_block() {
    let s = render(&plate_element("A\nB"), 1280, 720).unwrap();
    let red = [255, 0, 0, 255];
    assert_eq!(s.pixel(640, 290), Some(red));
    assert_eq!(s.pixel(640, 430), Some(red));
    assert_eq!(s.pixel(640, 280), Some([0, 0, 0, 0]));
    assert_eq!(s.pixel(620, 360), Some([0, 0, 0, 0]));
}

#[test]
fn text_ink_lands_near_the_pivot() {
    let mut el = TextElement::default_with("HI", 64.0);
    el.color = "#00ff00".to_owned();
    let s = render(&el, 1280, 720).unwrap();
    let inked = (600..680)
        .flat_map(|x| (320..400).map(move |y| (x, y)))
        .filter(|&(x, y)| s.pixel(x, y).is_some_and(|p| p[3] > 0))
        .count();
    assert!(inked > 0);
    assert_eq!(s.pixel(100, 100), Some([0, 0, 0, 0]));
}

#[test]
fn bad_color_fails_and_leaves_state_untouched() {
    let mut el = TextElement::new("oops");
    el.color = "not-a-color".to_owned();
    let canvas = Canvas::new(64, 64).unwrap();
    let config = RenderConfig::default();
    let mut surface = Surface::new(canvas);
    let mut fonts = FontBook::new();
    let err = render_text_element(
        &mut surface,
        &mut fonts,
        &el,
        64.0,
        64.0,
        canvas.scale_factor(config.scale_divisor),
        &config,
    )
    .unwrap_err();
    assert!(matches!(err, ThumbError::RenderElement(_)));
    assert_eq!(surface.save_depth(), 0);
    assert_eq!(surface.state(), &DrawState::default());
    assert!(surface.data().iter().all(|b| *b == 0));
}

#[test]
fn zero_font_size_is_rejected() {
    let el = TextElement::default_with("x", 0.0);
    assert!(matches!(
        render(&el, 64, 64),
        Err(ThumbError::RenderElement(_))
    ));
}

#[test]
fn transparent_element_draws_nothing() {
    let mut el = plate_element("AB");
    el.opacity = 0.0;
    let s = render(&el, 320, 180).unwrap();
    assert!(s.data().iter().all(|b| *b == 0));
}
