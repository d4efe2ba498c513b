use std::ops::{Deref, DerefMut};

use crate::{
    assets::image::PreparedImage,
    composition::model::TextAlign,
    effects::filter::{FilterChain, NO_FILTER},
    foundation::{
        core::{Affine, Canvas, Rect, Rgba8},
        error::ThumbResult,
    },
    render::{
        composite::over_in_place,
        raster::{Placed, Shadow, Shape, fill_shapes},
    },
    text::fonts::{FontBook, FontSpec},
};

/// Drawing state saved and restored by [`Surface::save`] / [`Surface::restore`].
#[derive(Clone, Debug, PartialEq)]
pub struct DrawState {
    /// Current transform from user space to device pixels.
    pub transform: Affine,
    /// Opacity applied to every draw, in `[0, 1]`.
    pub global_alpha: f32,
    /// Fill color for rects and text.
    pub fill: Rgba8,
    /// Shadow applied to rect and text fills.
    pub shadow: Option<Shadow>,
    /// CSS filter string applied to drawn images.
    pub filter: String,
    /// Horizontal alignment of text relative to the draw point.
    pub text_align: TextAlign,
    /// Font used by text draws.
    pub font: FontSpec,
}

impl Default for DrawState {
    fn default() -> Self {
        Self {
            transform: Affine::IDENTITY,
            global_alpha: 1.0,
            fill: Rgba8::BLACK,
            shadow: None,
            filter: NO_FILTER.to_owned(),
            text_align: TextAlign::Left,
            font: FontSpec::default(),
        }
    }
}

/// Premultiplied RGBA8 raster with a canvas-style drawing state stack.
///
/// Text is drawn with a middle baseline: the `y` passed to [`Surface::fill_text`] is the
/// vertical center of the line.
#[derive(Debug)]
pub struct Surface {
    canvas: Canvas,
    data: Vec<u8>,
    origin_clean: bool,
    state: DrawState,
    stack: Vec<DrawState>,
}

impl Surface {
    /// Transparent surface of the given size.
    pub fn new(canvas: Canvas) -> Self {
        Self {
            canvas,
            data: vec![0u8; canvas.byte_len()],
            origin_clean: true,
            state: DrawState::default(),
            stack: Vec::new(),
        }
    }

    /// Surface dimensions.
    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// Premultiplied RGBA8 pixels, row-major.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Consume the surface, returning its premultiplied pixels.
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// Premultiplied pixel at `(x, y)`, or `None` when out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.canvas.width || y >= self.canvas.height {
            return None;
        }
        let i = (y as usize * self.canvas.width as usize + x as usize) * 4;
        Some([
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ])
    }

    /// False once an image without read permission has been drawn.
    pub fn is_origin_clean(&self) -> bool {
        self.origin_clean
    }

    /// Current drawing state.
    pub fn state(&self) -> &DrawState {
        &self.state
    }

    /// Number of saved states.
    pub fn save_depth(&self) -> usize {
        self.stack.len()
    }

    /// Push a copy of the current state.
    pub fn save(&mut self) {
        self.stack.push(self.state.clone());
    }

    /// Pop the last saved state. Unbalanced restores are ignored.
    pub fn restore(&mut self) {
        if let Some(state) = self.stack.pop() {
            self.state = state;
        }
    }

    /// Save now and restore when the returned guard drops, on every exit path.
    pub fn scope(&mut self) -> SurfaceScope<'_> {
        let depth = self.stack.len();
        self.save();
        SurfaceScope {
            surface: self,
            depth,
        }
    }

    /// Translate user space.
    pub fn translate(&mut self, x: f64, y: f64) {
        self.state.transform *= Affine::translate((x, y));
    }

    /// Rotate user space (radians, clockwise in y-down space).
    pub fn rotate(&mut self, radians: f64) {
        self.state.transform *= Affine::rotate(radians);
    }

    /// Scale user space.
    pub fn scale(&mut self, sx: f64, sy: f64) {
        self.state.transform *= Affine::scale_non_uniform(sx, sy);
    }

    /// Multiply the current transform by `t`.
    pub fn transform(&mut self, t: Affine) {
        self.state.transform *= t;
    }

    /// Replace the current transform.
    pub fn set_transform(&mut self, t: Affine) {
        self.state.transform = t;
    }

    /// Set the global alpha (clamped to `[0, 1]`; non-finite values are ignored).
    pub fn set_global_alpha(&mut self, alpha: f32) {
        if alpha.is_finite() {
            self.state.global_alpha = alpha.clamp(0.0, 1.0);
        }
    }

    /// Set the fill color.
    pub fn set_fill(&mut self, color: Rgba8) {
        self.state.fill = color;
    }

    /// Set or clear the shadow.
    pub fn set_shadow(&mut self, shadow: Option<Shadow>) {
        self.state.shadow = shadow;
    }

    /// Set the CSS filter string applied to subsequent image draws.
    pub fn set_filter(&mut self, filter: impl Into<String>) {
        self.state.filter = filter.into();
    }

    /// Set text alignment.
    pub fn set_text_align(&mut self, align: TextAlign) {
        self.state.text_align = align.effective();
    }

    /// Set the font.
    pub fn set_font(&mut self, font: FontSpec) {
        self.state.font = font;
    }

    /// Reset every pixel to transparent.
    pub fn clear(&mut self) {
        self.data.fill(0);
    }

    /// Draw `image` stretched over the whole surface, through the current filter and global alpha.
    pub fn draw_image(&mut self, image: &PreparedImage) -> ThumbResult<()> {
        image.ensure_loaded("drawn")?;
        let chain = FilterChain::parse(&self.state.filter)?;

        let pixels = image.pixels_for(self.canvas);
        let alpha = self.state.global_alpha;
        if chain.is_identity() {
            over_in_place(&mut self.data, &pixels, alpha)?;
        } else {
            let mut layer = pixels.into_owned();
            chain.apply(&mut layer, self.canvas.width, self.canvas.height)?;
            over_in_place(&mut self.data, &layer, alpha)?;
        }

        if !image.origin_clean {
            if self.origin_clean {
                tracing::debug!("surface tainted by image without read access");
            }
            self.origin_clean = false;
        }
        Ok(())
    }

    /// Fill `rect` (user space) with the current fill, shadow and alpha.
    pub fn fill_rect(&mut self, rect: Rect) -> ThumbResult<()> {
        let cpu = vello_cpu::kurbo::Rect::new(rect.x0, rect.y0, rect.x1, rect.y1);
        self.fill_placed(&[Placed::new(Affine::IDENTITY, Shape::Rect(cpu))])
    }

    /// Draw one line of text at `(x, y)` honoring alignment.
    ///
    /// When `max_width` is given and the text is wider, it is condensed horizontally to fit.
    pub fn fill_text(
        &mut self,
        fonts: &mut FontBook,
        text: &str,
        x: f64,
        y: f64,
        max_width: Option<f64>,
    ) -> ThumbResult<()> {
        if text.is_empty() {
            return Ok(());
        }
        let shaped = fonts.shape(&self.state.font, text)?;
        if shaped.width <= 0.0 {
            return Ok(());
        }

        let condense = match max_width {
            Some(max) if max.is_finite() && max > 0.0 && shaped.width > max => max / shaped.width,
            _ => 1.0,
        };
        let drawn = shaped.width * condense;
        let start = x + self.state.text_align.start_offset(drawn);
        let line = Affine::translate((start, y)) * Affine::scale_non_uniform(condense, 1.0);

        let placed: Vec<Placed> = shaped
            .shapes
            .into_iter()
            .map(|p| Placed::new(line * p.local, p.shape))
            .collect();
        self.fill_placed(&placed)
    }

    /// Width `text` would occupy with the current font.
    pub fn measure_text(&self, fonts: &mut FontBook, text: &str) -> ThumbResult<f64> {
        fonts.measure(&self.state.font, text)
    }

    fn fill_placed(&mut self, shapes: &[Placed]) -> ThumbResult<()> {
        fill_shapes(
            &mut self.data,
            self.canvas,
            self.state.transform,
            self.state.fill,
            self.state.global_alpha,
            self.state.shadow.as_ref(),
            shapes,
        )
    }
}

/// Guard returned by [`Surface::scope`]; restores the saved state on drop.
pub struct SurfaceScope<'a> {
    surface: &'a mut Surface,
    depth: usize,
}

impl Deref for SurfaceScope<'_> {
    type Target = Surface;

    fn deref(&self) -> &Surface {
        self.surface
    }
}

impl DerefMut for SurfaceScope<'_> {
    fn deref_mut(&mut self) -> &mut Surface {
        self.surface
    }
}

impl Drop for SurfaceScope<'_> {
    fn drop(&mut self) {
        while self.surface.stack.len() > self.depth {
            self.surface.restore();
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/surface.rs"]
mod tests;
