use super::*;

fn at(position: Anchor, x: f64, y: f64) -> TextElement {
    let mut el = TextElement::new("t");
    el.position = position;
    el.x = x;
    el.y = y;
    el
}

#[test]
fn corner_and_center_anchors() {
    let p = resolve_position(&at(Anchor::TopLeft, 50.0, 50.0), 1000.0, 500.0);
    assert_eq!(p, Point::new(20.0, 20.0));

    let p = resolve_position(&at(Anchor::BottomRight, 50.0, 50.0), 1000.0, 500.0);
    assert_eq!(p, Point::new(980.0, 480.0));

    let p = resolve_position(&at(Anchor::Center, 50.0, 50.0), 1000.0, 500.0);
    assert_eq!(p, Point::new(500.0, 250.0));
}

#[test]
fn edge_anchors_keep_parallel_percentage() {
    let p = resolve_position(&at(Anchor::Left, 10.0, 30.0), 1000.0, 500.0);
    assert_eq!(p, Point::new(20.0, 150.0));
    let p = resolve_position(&at(Anchor::Right, 10.0, 30.0), 1000.0, 500.0);
    assert_eq!(p, Point::new(980.0, 150.0));
    let p = resolve_position(&at(Anchor::Top, 10.0, 30.0), 1000.0, 500.0);
    assert_eq!(p, Point::new(100.0, 20.0));
    let p = resolve_position(&at(Anchor::Bottom, 10.0, 30.0), 1000.0, 500.0);
    assert_eq!(p, Point::new(100.0, 480.0));
}

#[test]
fn compound_center_anchors_use_midline() {
    let p = resolve_position(&at(Anchor::TopCenter, 10.0, 30.0), 1000.0, 500.0);
    assert_eq!(p, Point::new(500.0, 20.0));
    let p = resolve_position(&at(Anchor::BottomCenter, 10.0, 30.0), 1000.0, 500.0);
    assert_eq!(p, Point::new(500.0, 480.0));
    let p = resolve_position(&at(Anchor::CenterLeft, 10.0, 30.0), 1000.0, 500.0);
    assert_eq!(p, Point::new(20.0, 250.0));
    let p = resolve_position(&at(Anchor::CenterRight, 10.0, 30.0), 1000.0, 500.0);
    assert_eq!(p, Point::new(980.0, 250.0));
    let p = resolve_position(&at(Anchor::TopRight, 10.0, 30.0), 1000.0, 500.0);
    assert_eq!(p, Point::new(980.0, 20.0));
    let p = resolve_position(&at(Anchor::BottomLeft, 10.0, 30.0), 1000.0, 500.0);
    assert_eq!(p, Point::new(20.0, 480.0));
}

#[test]
fn unrecognized_anchor_places_by_percentage() {
    let p = resolve_position(&at(Anchor::Free, 25.0, 75.0), 200.0, 100.0);
    assert_eq!(p, Point::new(50.0, 75.0));
}

#[test]
fn custom_margin_is_honored() {
    let p = resolve_position_with_margin(&at(Anchor::TopLeft, 0.0, 0.0), 100.0, 100.0, 5.0);
    assert_eq!(p, Point::new(5.0, 5.0));
}

#[test]
fn rotation_spins_around_pivot() {
    let t = pivot_transform(Point::new(100.0, 50.0), 90.0);
    let origin = t * Point::ORIGIN;
    assert!((origin.x - 100.0).abs() < 1e-9);
    assert!((origin.y - 50.0).abs() < 1e-9);

    let right = t * Point::new(10.0, 0.0);
    assert!((right.x - 100.0).abs() < 1e-9);
    assert!((right.y - 60.0).abs() < 1e-9);

    assert_eq!(
        pivot_transform(Point::new(3.0, 4.0), 0.0),
        Affine::translate((3.0, 4.0))
    );
}

#[test]
fn resolve_pivot_combines_anchor_and_rotation() {
    let mut el = at(Anchor::TopLeft, 0.0, 0.0);
    el.rotation = 180.0;
    let t = resolve_pivot(&el, 1000.0, 500.0);
    let p = t * Point::new(5.0, 0.0);
    assert!((p.x - 15.0).abs() < 1e-9);
    assert!((p.y - 20.0).abs() < 1e-9);
}
