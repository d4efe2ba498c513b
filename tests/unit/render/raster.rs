use super::*;

fn square(x0: f64, y0: f64, x1: f64, y1: f64) -> Vec<Placed> {
    vec![Placed::new(
        Affine::IDENTITY,
        Shape::Rect(vello_cpu::kurbo::Rect::new(x0, y0, x1, y1)),
    )]
}

fn px(buf: &[u8], canvas: Canvas, x: u32, y: u32) -> [u8; 4] {
    let i = (y as usize * canvas.width as usize + x as usize) * 4;
    [buf[i], buf[i + 1], buf[i + 2], buf[i + 3]]
}

#[test]
fn local_transform_composes_with_surface_transform() {
    let canvas = Canvas::new(32, 32).unwrap();
    let mut dst = vec![0u8; canvas.byte_len()];
    let shapes = vec![Placed::new(
        Affine::translate((10.0, 0.0)),
        Shape::Rect(vello_cpu::kurbo::Rect::new(0.0, 0.0, 4.0, 4.0)),
    )];
    fill_shapes(
        &mut dst,
        canvas,
        Affine::translate((0.0, 10.0)),
        Rgba8::new(0, 255, 0, 255),
        1.0,
        None,
        &shapes,
    )
    .unwrap();
    assert_eq!(px(&dst, canvas, 12, 12), [0, 255, 0, 255]);
    assert_eq!(px(&dst, canvas, 2, 2), [0, 0, 0, 0]);
}

#[test]
fn blurred_shadow_spreads_beyond_the_shape() {
    let canvas = Canvas::new(40, 40).unwrap();
    let mut dst = vec![0u8; canvas.byte_len()];
    let shadow = Shadow {
        color: Rgba8::BLACK,
        blur: 6.0,
        offset: Vec2::ZERO,
    };
    fill_shapes(
        &mut dst,
        canvas,
        Affine::IDENTITY,
        Rgba8::new(255, 255, 255, 255),
        1.0,
        Some(&shadow),
        &square(15.0, 15.0, 25.0, 25.0),
    )
    .unwrap();
    let outside = px(&dst, canvas, 13, 20);
    assert!(outside[3] > 0, "shadow bleeds past the edge");
    assert!(outside[3] < 255);
    assert_eq!(px(&dst, canvas, 0, 0)[3], 0);
}

#[test]
fn transparent_shadow_color_is_skipped() {
    let canvas = Canvas::new(8, 8).unwrap();
    let mut dst = vec![0u8; canvas.byte_len()];
    let shadow = Shadow {
        color: Rgba8::TRANSPARENT,
        blur: 2.0,
        offset: Vec2::new(3.0, 3.0),
    };
    fill_shapes(
        &mut dst,
        canvas,
        Affine::IDENTITY,
        Rgba8::new(255, 255, 255, 255),
        1.0,
        Some(&shadow),
        &square(0.0, 0.0, 2.0, 2.0),
    )
    .unwrap();
    assert_eq!(px(&dst, canvas, 4, 4), [0, 0, 0, 0]);
    assert_eq!(px(&dst, canvas, 1, 1), [255, 255, 255, 255]);
}

fn offset_shadow() -> Shadow {
    Shadow {
        color: Rgba8::BLACK,
        blur: 0.0,
        offset: Vec2::new(10.0, 0.0),
    }
}

#[test]
fn transparent_fill_casts_no_shadow() {
    let canvas = Canvas::new(20, 8).unwrap();
    let mut dst = vec![0u8; canvas.byte_len()];
    fill_shapes(
        &mut dst,
        canvas,
        Affine::IDENTITY,
        Rgba8::new(255, 255, 255, 0),
        1.0,
        Some(&offset_shadow()),
        &square(0.0, 0.0, 4.0, 4.0),
    )
    .unwrap();
    assert!(dst.iter().all(|b| *b == 0));
}

#[test]
fn shadow_alpha_follows_fill_alpha() {
    let canvas = Canvas::new(20, 8).unwrap();
    let mut dst = vec![0u8; canvas.byte_len()];
    fill_shapes(
        &mut dst,
        canvas,
        Affine::IDENTITY,
        Rgba8::new(255, 255, 255, 128),
        1.0,
        Some(&offset_shadow()),
        &square(0.0, 0.0, 4.0, 4.0),
    )
    .unwrap();
    let shadow = px(&dst, canvas, 12, 2);
    assert_eq!(&shadow[..3], &[0, 0, 0]);
    assert!(shadow[3].abs_diff(128) <= 1, "shadow alpha {}", shadow[3]);
    assert!(px(&dst, canvas, 2, 2)[3].abs_diff(128) <= 1);
}
