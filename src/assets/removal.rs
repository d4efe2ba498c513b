use std::future::Future;

use crate::{
    assets::image::PreparedImage,
    foundation::error::{ThumbError, ThumbResult},
};

/// Progress callback: receives a fraction in `[0, 1]`.
pub type ProgressFn<'a> = &'a (dyn Fn(f32) + Send + Sync);

/// External segmentation step that turns a frame into a foreground cutout.
///
/// Implementations return an image of the same size as the input whose background pixels
/// are fully transparent. Failures should be [`ThumbError::Processing`].
pub trait BackgroundRemover {
    /// Produce the foreground cutout of `image`.
    fn remove_background(
        &self,
        image: &PreparedImage,
        progress: Option<ProgressFn<'_>>,
    ) -> impl Future<Output = ThumbResult<PreparedImage>> + Send;
}

/// Remover keyed on a single color: pixels close to `key` become transparent.
///
/// Useful for green-screen footage and for tests; real segmentation lives behind the trait.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChromaKeyRemover {
    /// Straight RGB of the backdrop.
    pub key: [u8; 3],
    /// Largest per-channel distance still treated as backdrop.
    pub tolerance: u8,
}

impl ChromaKeyRemover {
    fn cut(
        &self,
        image: &PreparedImage,
        progress: Option<ProgressFn<'_>>,
    ) -> ThumbResult<PreparedImage> {
        image
            .ensure_loaded("source")
            .map_err(|e| ThumbError::processing(e.to_string()))?;
        let rows = image.height as usize;
        let stride = image.width as usize * 4;
        let mut out = image.rgba8_premul.as_ref().clone();
        for (y, row) in out.chunks_exact_mut(stride).enumerate() {
            for px in row.chunks_exact_mut(4) {
                if px[3] == 0 {
                    continue;
                }
                let a = u16::from(px[3]);
                let straight = |c: u8| ((u16::from(c) * 255 + a / 2) / a).min(255) as u8;
                let near = (0..3).all(|i| {
                    straight(px[i]).abs_diff(self.key[i]) <= self.tolerance
                });
                if near {
                    px.fill(0);
                }
            }
            if let Some(report) = progress
                && (y + 1) % 64 == 0
            {
                report((y + 1) as f32 / rows as f32);
            }
        }
        if let Some(report) = progress {
            report(1.0);
        }
        PreparedImage::from_premul(image.width, image.height, out)
            .map(|img| if image.origin_clean { img } else { img.tainted() })
            .map_err(|e| ThumbError::processing(e.to_string()))
    }
}

impl BackgroundRemover for ChromaKeyRemover {
    fn remove_background(
        &self,
        image: &PreparedImage,
        progress: Option<ProgressFn<'_>>,
    ) -> impl Future<Output = ThumbResult<PreparedImage>> + Send {
        let result = self.cut(image, progress);
        async move { result }
    }
}
