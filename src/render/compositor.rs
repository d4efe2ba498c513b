use std::time::Duration;

use crate::{
    assets::{
        image::PreparedImage,
        removal::{BackgroundRemover, ProgressFn},
        source::{ImageSource, load_inputs},
    },
    composition::model::{ImageFilter, LayerOrder, TextElement},
    effects::filter::{NO_FILTER, build_filter_string},
    encode::png::{encode_png, to_data_uri},
    foundation::{
        config::RenderConfig,
        core::Canvas,
        error::{ThumbError, ThumbResult},
    },
    render::{surface::Surface, text::render_text_element},
    text::fonts::FontBook,
};

/// A text element that failed to draw and was left out of the image.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SkippedElement {
    /// Id of the failing element.
    pub id: String,
    /// Error message.
    pub reason: String,
}

/// What happened during a composite beyond the pixels.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RenderReport {
    /// Elements skipped because they failed to render, in paint order.
    pub skipped: Vec<SkippedElement>,
    /// Number of text elements drawn.
    pub drawn: usize,
}

impl RenderReport {
    /// True when every visible element was drawn.
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }
}

/// Finished surface plus its render report.
#[derive(Debug)]
pub struct CompositeOutput {
    /// The composited pixels.
    pub surface: Surface,
    /// Per-element outcome.
    pub report: RenderReport,
}

impl CompositeOutput {
    /// Encode as PNG bytes.
    pub fn to_png(&self) -> ThumbResult<Vec<u8>> {
        encode_png(&self.surface)
    }

    /// Encode as a `data:image/png;base64,...` URI.
    pub fn to_data_uri(&self) -> ThumbResult<String> {
        to_data_uri(&self.surface)
    }
}

/// Layers base image, text and foreground cutout into one thumbnail.
///
/// Paint order: filtered base, visible `back` elements, cutout, visible `front` elements.
/// Each call owns its surface; the compositor only keeps fonts and configuration.
#[derive(Debug, Default)]
pub struct Compositor {
    config: RenderConfig,
    fonts: FontBook,
}

impl Compositor {
    /// Compositor with the built-in font only.
    pub fn new(config: RenderConfig) -> Self {
        Self::with_fonts(config, FontBook::new())
    }

    /// Compositor using a prepared font book.
    pub fn with_fonts(config: RenderConfig, fonts: FontBook) -> Self {
        Self { config, fonts }
    }

    /// Active configuration.
    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Fonts, for registering families.
    pub fn fonts_mut(&mut self) -> &mut FontBook {
        &mut self.fonts
    }

    /// Composite onto a fresh surface.
    ///
    /// The surface takes the base image's size unless `target` is given; both images are
    /// resampled to cover it. Image problems and invalid filters abort; a failing text element
    /// is logged, skipped and listed in the report.
    #[tracing::instrument(
        skip_all,
        fields(elements = elements.len(), base_w = base.width, base_h = base.height)
    )]
    pub fn composite(
        &mut self,
        base: &PreparedImage,
        cutout: &PreparedImage,
        elements: &[TextElement],
        filters: &ImageFilter,
        target: Option<Canvas>,
    ) -> ThumbResult<CompositeOutput> {
        base.ensure_loaded("base")?;
        cutout.ensure_loaded("cutout")?;
        filters.validate()?;

        let canvas = match target {
            Some(c) => c,
            None => base.canvas()?,
        };
        let (w, h) = (f64::from(canvas.width), f64::from(canvas.height));
        let scale_factor = canvas.scale_factor(self.config.scale_divisor);

        let mut surface = Surface::new(canvas);
        surface.clear();

        let filter = build_filter_string(filters);
        tracing::debug!(%filter, "drawing base image");
        surface.set_filter(filter);
        surface.draw_image(base)?;
        surface.set_filter(NO_FILTER);

        let (back, front): (Vec<&TextElement>, Vec<&TextElement>) = elements
            .iter()
            .filter(|el| el.visible)
            .partition(|el| el.layer_order == LayerOrder::Back);

        let mut report = RenderReport::default();
        tracing::debug!(count = back.len(), "back text pass");
        self.draw_pass(&mut surface, &back, w, h, scale_factor, &mut report);

        tracing::debug!("drawing foreground cutout");
        surface.draw_image(cutout)?;

        tracing::debug!(count = front.len(), "front text pass");
        self.draw_pass(&mut surface, &front, w, h, scale_factor, &mut report);

        Ok(CompositeOutput { surface, report })
    }

    /// [`Compositor::composite`] followed by PNG encoding.
    pub fn composite_png(
        &mut self,
        base: &PreparedImage,
        cutout: &PreparedImage,
        elements: &[TextElement],
        filters: &ImageFilter,
        target: Option<Canvas>,
    ) -> ThumbResult<Vec<u8>> {
        self.composite(base, cutout, elements, filters, target)?
            .to_png()
    }

    /// Load both images (bounded by `timeout`) and composite them.
    pub async fn composite_sources<B, C>(
        &mut self,
        base: &B,
        cutout: &C,
        elements: &[TextElement],
        filters: &ImageFilter,
        target: Option<Canvas>,
        timeout: Duration,
    ) -> ThumbResult<CompositeOutput>
    where
        B: ImageSource,
        C: ImageSource,
    {
        let (base, cutout) = load_inputs(base, cutout, timeout).await?;
        self.composite(&base, &cutout, elements, filters, target)
    }

    /// Load the frame, cut out its foreground with `remover`, then composite.
    #[allow(clippy::too_many_arguments)]
    pub async fn remove_and_composite<S, R>(
        &mut self,
        frame: &S,
        remover: &R,
        progress: Option<ProgressFn<'_>>,
        elements: &[TextElement],
        filters: &ImageFilter,
        target: Option<Canvas>,
        timeout: Duration,
    ) -> ThumbResult<CompositeOutput>
    where
        S: ImageSource,
        R: BackgroundRemover,
    {
        let base = tokio::time::timeout(timeout, frame.load())
            .await
            .map_err(|_| {
                ThumbError::image_load(format!(
                    "frame ({}) did not load within {} ms",
                    frame.describe(),
                    timeout.as_millis()
                ))
            })??;
        let cutout = remover.remove_background(&base, progress).await?;
        self.composite(&base, &cutout, elements, filters, target)
    }

    fn draw_pass(
        &mut self,
        surface: &mut Surface,
        elements: &[&TextElement],
        w: f64,
        h: f64,
        scale_factor: f64,
        report: &mut RenderReport,
    ) {
        for el in elements {
            match render_text_element(
                surface,
                &mut self.fonts,
                el,
                w,
                h,
                scale_factor,
                &self.config,
            ) {
                Ok(()) => report.drawn += 1,
                Err(err) => {
                    tracing::warn!(element = %el.id, error = %err, "skipping text element");
                    report.skipped.push(SkippedElement {
                        id: el.id.clone(),
                        reason: err.to_string(),
                    });
                }
            }
        }
    }
}

/// One-shot composite to PNG bytes with the default configuration and built-in font.
pub fn composite_png(
    base: &PreparedImage,
    cutout: &PreparedImage,
    elements: &[TextElement],
    filters: &ImageFilter,
    target: Option<Canvas>,
) -> ThumbResult<Vec<u8>> {
    Compositor::default().composite_png(base, cutout, elements, filters, target)
}

#[cfg(test)]
#[path = "../../tests/unit/render/compositor.rs"]
mod tests;
