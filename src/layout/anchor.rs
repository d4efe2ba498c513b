use crate::{
    composition::model::{Anchor, TextElement},
    foundation::core::{Affine, Point, Vec2},
};

/// Default distance from the canvas edge used by named anchors.
pub const ANCHOR_MARGIN_PX: f64 = 20.0;

/// Pivot of `element` in raster pixel space, using the default 20 px margin.
pub fn resolve_position(element: &TextElement, canvas_width: f64, canvas_height: f64) -> Point {
    resolve_position_with_margin(element, canvas_width, canvas_height, ANCHOR_MARGIN_PX)
}

/// Pivot of `element` with an explicit anchor margin.
///
/// `center` and unrecognized anchors place by percentage. Edge anchors pin only the
/// perpendicular axis; corners pin both; `-center` compounds use the canvas midline on
/// the parallel axis.
pub fn resolve_position_with_margin(
    element: &TextElement,
    canvas_width: f64,
    canvas_height: f64,
    margin: f64,
) -> Point {
    let (w, h, m) = (canvas_width, canvas_height, margin);
    let px = w * element.x / 100.0;
    let py = h * element.y / 100.0;

    let (x, y) = match element.position {
        Anchor::Center | Anchor::Free => (px, py),
        Anchor::Left => (m, py),
        Anchor::Right => (w - m, py),
        Anchor::Top => (px, m),
        Anchor::Bottom => (px, h - m),
        Anchor::TopLeft => (m, m),
        Anchor::TopCenter => (w / 2.0, m),
        Anchor::TopRight => (w - m, m),
        Anchor::CenterLeft => (m, h / 2.0),
        Anchor::CenterRight => (w - m, h / 2.0),
        Anchor::BottomLeft => (m, h - m),
        Anchor::BottomCenter => (w / 2.0, h - m),
        Anchor::BottomRight => (w - m, h - m),
    };
    Point::new(x, y)
}

/// Pivot of `element` combined with its rotation, as a single transform.
pub fn resolve_pivot(element: &TextElement, canvas_width: f64, canvas_height: f64) -> Affine {
    pivot_transform(
        resolve_position(element, canvas_width, canvas_height),
        element.rotation,
    )
}

/// Translate-then-rotate transform for an element pivoted at `pivot`.
///
/// Rotation spins around the pivot, not the canvas origin.
pub fn pivot_transform(pivot: Point, rotation_deg: f64) -> Affine {
    let translate = Affine::translate(Vec2::new(pivot.x, pivot.y));
    if rotation_deg == 0.0 || !rotation_deg.is_finite() {
        return translate;
    }
    translate * Affine::rotate(rotation_deg.to_radians())
}

#[cfg(test)]
#[path = "../../tests/unit/layout/anchor.rs"]
mod tests;
