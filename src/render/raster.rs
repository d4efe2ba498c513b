use crate::{
    effects::blur::{blur_rgba8_premul, radius_for_sigma},
    foundation::{
        core::{Affine, Canvas, Rgba8, Vec2},
        error::{ThumbError, ThumbResult},
    },
    render::composite::over_in_place,
};

/// Fillable geometry in the rasterizer's own kurbo types.
#[derive(Clone, Debug)]
pub(crate) enum Shape {
    Rect(vello_cpu::kurbo::Rect),
    Path(vello_cpu::kurbo::BezPath),
    Glyphs {
        font: vello_cpu::peniko::FontData,
        size: f32,
        glyphs: Vec<vello_cpu::Glyph>,
    },
}

/// A shape with a transform relative to the surface's current transform.
#[derive(Clone, Debug)]
pub(crate) struct Placed {
    pub(crate) local: Affine,
    pub(crate) shape: Shape,
}

impl Placed {
    pub(crate) fn new(local: Affine, shape: Shape) -> Self {
        Self { local, shape }
    }
}

/// Drop shadow attached to fills.
#[derive(Clone, Debug, PartialEq)]
pub struct Shadow {
    /// Shadow color; a fully transparent color disables the shadow.
    pub color: Rgba8,
    /// Blur amount in device pixels (Gaussian sigma is half of it).
    pub blur: f64,
    /// Device-space offset, unaffected by the current transform.
    pub offset: Vec2,
}

/// Paint `shapes` onto `dst` (premultiplied RGBA8 covering `canvas`).
///
/// Each fill is rasterized into its own transparent layer and composited with source-over,
/// so `opacity` applies once to the whole fill and the shadow (if any) lands underneath.
/// The shadow's alpha is scaled by the fill alpha; a transparent fill casts nothing.
pub(crate) fn fill_shapes(
    dst: &mut [u8],
    canvas: Canvas,
    transform: Affine,
    color: Rgba8,
    opacity: f32,
    shadow: Option<&Shadow>,
    shapes: &[Placed],
) -> ThumbResult<()> {
    if shapes.is_empty() || opacity <= 0.0 || color.a == 0 {
        return Ok(());
    }

    if let Some(shadow) = shadow.filter(|s| s.color.a > 0) {
        let shifted = Affine::translate(shadow.offset) * transform;
        let tint = shadow.color.with_alpha_mul(f32::from(color.a) / 255.0);
        let mut layer = rasterize(canvas, shifted, tint, shapes)?;
        let sigma = shadow.blur / 2.0;
        if sigma.is_finite() && sigma > 0.0 {
            let radius = radius_for_sigma(sigma);
            if radius > 0 {
                layer =
                    blur_rgba8_premul(&layer, canvas.width, canvas.height, radius, sigma as f32)?;
            }
        }
        over_in_place(dst, &layer, opacity)?;
    }

    let layer = rasterize(canvas, transform, color, shapes)?;
    over_in_place(dst, &layer, opacity)
}

fn rasterize(
    canvas: Canvas,
    transform: Affine,
    color: Rgba8,
    shapes: &[Placed],
) -> ThumbResult<Vec<u8>> {
    let (w, h) = pixmap_dims(canvas)?;
    let mut ctx = vello_cpu::RenderContext::new(w, h);
    ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
        color.r, color.g, color.b, color.a,
    ));

    for placed in shapes {
        ctx.set_transform(affine_to_cpu(transform * placed.local));
        match &placed.shape {
            Shape::Rect(rect) => ctx.fill_rect(rect),
            Shape::Path(path) => ctx.fill_path(path),
            Shape::Glyphs { font, size, glyphs } => {
                ctx.glyph_run(font)
                    .font_size(*size)
                    .fill_glyphs(glyphs.iter().cloned());
            }
        }
    }

    ctx.flush();
    let mut pixmap = vello_cpu::Pixmap::new(w, h);
    ctx.render_to_pixmap(&mut pixmap);
    Ok(pixmap.data_as_u8_slice().to_vec())
}

fn pixmap_dims(canvas: Canvas) -> ThumbResult<(u16, u16)> {
    let w = u16::try_from(canvas.width)
        .map_err(|_| ThumbError::render_element("canvas width exceeds rasterizer limits"))?;
    let h = u16::try_from(canvas.height)
        .map_err(|_| ThumbError::render_element("canvas height exceeds rasterizer limits"))?;
    Ok((w, h))
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

#[cfg(test)]
#[path = "../../tests/unit/render/raster.rs"]
mod tests;
