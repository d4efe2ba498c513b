use super::*;
use crate::foundation::core::Rgba8;

const BLUE: Rgba8 = Rgba8::new(0, 0, 255, 255);

fn inputs(w: u32, h: u32) -> (PreparedImage, PreparedImage) {
    (
        PreparedImage::solid(w, h, BLUE),
        PreparedImage::solid(w, h, Rgba8::TRANSPARENT),
    )
}

#[test]
fn broken_element_is_skipped_and_reported() {
    let (base, cutout) = inputs(64, 32);
    let good = TextElement::new("ok");
    let mut bad = TextElement::new("bad");
    bad.color = "chartreuse-ish".to_owned();

    let mut compositor = Compositor::default();
    let out = compositor
        .composite(
            &base,
            &cutout,
            &[bad.clone(), good],
            &ImageFilter::default(),
            None,
        )
        .unwrap();
    assert_eq!(out.report.drawn, 1);
    assert!(!out.report.is_complete());
    assert_eq!(out.report.skipped.len(), 1);
    assert_eq!(out.report.skipped[0].id, bad.id);
    assert!(out.report.skipped[0].reason.contains("render element error"));
    assert_eq!(out.surface.save_depth(), 0);
}

#[test]
fn empty_base_is_an_image_load_error() {
    let (_, cutout) = inputs(4, 4);
    let empty = PreparedImage::solid(0, 0, BLUE);
    let err = Compositor::default()
        .composite(&empty, &cutout, &[], &ImageFilter::default(), None)
        .unwrap_err();
    assert!(matches!(err, ThumbError::ImageLoad(_)));
}

#[test]
fn invalid_filters_are_rejected_before_drawing() {
    let (base, cutout) = inputs(4, 4);
    let filters = ImageFilter {
        blur: -1.0,
        ..ImageFilter::default()
    };
    let err = Compositor::default()
        .composite(&base, &cutout, &[], &filters, None)
        .unwrap_err();
    assert!(matches!(err, ThumbError::Validation(_)));
}

#[test]
fn explicit_target_resizes_output() {
    let (base, cutout) = inputs(4, 4);
    let target = Canvas::new(16, 8).unwrap();
    let out = Compositor::default()
        .composite(&base, &cutout, &[], &ImageFilter::default(), Some(target))
        .unwrap();
    assert_eq!(out.surface.canvas(), target);
    assert_eq!(out.surface.pixel(15, 7), Some([0, 0, 255, 255]));
}

#[test]
fn filter_applies_to_base_only() {
    let base = PreparedImage::solid(8, 8, Rgba8::new(255, 0, 0, 255));
    let cutout = PreparedImage::solid(8, 8, Rgba8::TRANSPARENT);
    let filters = ImageFilter {
        grayscale: 100.0,
        ..ImageFilter::default()
    };
    let out = Compositor::default()
        .composite(&base, &cutout, &[], &filters, None)
        .unwrap();
    let px = out.surface.pixel(3, 3).unwrap();
    assert_eq!(px[0], px[1]);
    assert_eq!(out.surface.state().filter, NO_FILTER);
}

#[test]
fn one_shot_png_has_signature() {
    let (base, cutout) = inputs(10, 10);
    let png = composite_png(&base, &cutout, &[], &ImageFilter::default(), None).unwrap();
    assert_eq!(&png[1..4], b"PNG");
}
