use super::*;

#[test]
fn canvas_rejects_empty_and_oversized() {
    assert!(Canvas::new(0, 10).is_err());
    assert!(Canvas::new(10, 0).is_err());
    assert!(Canvas::new(70_000, 10).is_err());
    assert_eq!(
        Canvas::new(1280, 720).unwrap(),
        Canvas {
            width: 1280,
            height: 720
        }
    );
}

#[test]
fn scale_factor_uses_shorter_edge() {
    let c = Canvas::new(2000, 500).unwrap();
    assert_eq!(c.scale_factor(1000.0), 0.5);
    assert_eq!(c.scale_factor(250.0), 2.0);
}

#[test]
fn premul_roundtrip_is_close() {
    let mut px = vec![200u8, 100, 50, 128, 10, 20, 30, 0, 1, 2, 3, 255];
    premultiply_rgba8_in_place(&mut px);
    assert_eq!(&px[4..8], &[0, 0, 0, 0]);
    assert_eq!(&px[8..12], &[1, 2, 3, 255]);
    unpremultiply_rgba8_in_place(&mut px);
    for (got, want) in px[..3].iter().zip([200u8, 100, 50]) {
        assert!((i16::from(*got) - i16::from(want)).abs() <= 1);
    }
}

#[test]
fn with_alpha_mul_scales_alpha_only() {
    let c = Rgba8::new(10, 20, 30, 200).with_alpha_mul(0.5);
    assert_eq!(c, Rgba8::new(10, 20, 30, 100));
    assert_eq!(Rgba8::new(255, 0, 0, 255).to_premul(), [255, 0, 0, 255]);
}
