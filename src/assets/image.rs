use std::sync::Arc;

use crate::foundation::{
    core::{Canvas, Rgba8, premultiply_rgba8_in_place},
    error::{ThumbError, ThumbResult},
};

#[derive(Clone, Debug, PartialEq)]
/// Decoded raster image in premultiplied RGBA8 form.
pub struct PreparedImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel bytes in row-major premultiplied RGBA8.
    pub rgba8_premul: Arc<Vec<u8>>,
    /// Whether the pixels may be read back. Drawing an image that is not origin-clean
    /// taints the surface and makes serialization fail.
    pub origin_clean: bool,
}

impl PreparedImage {
    /// Wrap premultiplied pixels, checking the buffer length.
    pub fn from_premul(width: u32, height: u32, rgba8_premul: Vec<u8>) -> ThumbResult<Self> {
        if rgba8_premul.len() != width as usize * height as usize * 4 {
            return Err(ThumbError::image_load(format!(
                "pixel buffer of {} bytes does not match {width}x{height}",
                rgba8_premul.len()
            )));
        }
        Ok(Self {
            width,
            height,
            rgba8_premul: Arc::new(rgba8_premul),
            origin_clean: true,
        })
    }

    /// Wrap straight-alpha RGBA8 pixels.
    pub fn from_straight(width: u32, height: u32, mut rgba8: Vec<u8>) -> ThumbResult<Self> {
        premultiply_rgba8_in_place(&mut rgba8);
        Self::from_premul(width, height, rgba8)
    }

    /// Single-color image.
    pub fn solid(width: u32, height: u32, color: Rgba8) -> Self {
        let px = color.to_premul();
        Self {
            width,
            height,
            rgba8_premul: Arc::new(px.repeat(width as usize * height as usize)),
            origin_clean: true,
        }
    }

    /// Mark the image as coming from an origin that did not grant read access.
    pub fn tainted(self) -> Self {
        Self {
            origin_clean: false,
            ..self
        }
    }

    /// Dimensions as a [`Canvas`].
    pub fn canvas(&self) -> ThumbResult<Canvas> {
        Canvas::new(self.width, self.height)
            .map_err(|e| ThumbError::image_load(format!("image has unusable size: {e}")))
    }

    /// Check the image is non-empty and its buffer is consistent.
    pub fn ensure_loaded(&self, what: &str) -> ThumbResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(ThumbError::image_load(format!("{what} image is empty")));
        }
        if self.rgba8_premul.len() != self.width as usize * self.height as usize * 4 {
            return Err(ThumbError::image_load(format!(
                "{what} image buffer does not match its dimensions"
            )));
        }
        Ok(())
    }

    /// Premultiplied pixels resampled to `canvas`, borrowing when no resize is needed.
    pub(crate) fn pixels_for(&self, canvas: Canvas) -> std::borrow::Cow<'_, [u8]> {
        if self.width == canvas.width && self.height == canvas.height {
            return std::borrow::Cow::Borrowed(self.rgba8_premul.as_slice());
        }
        let src = image::ImageBuffer::<image::Rgba<u8>, &[u8]>::from_raw(
            self.width,
            self.height,
            self.rgba8_premul.as_slice(),
        );
        match src {
            Some(src) => std::borrow::Cow::Owned(
                image::imageops::resize(
                    &src,
                    canvas.width,
                    canvas.height,
                    image::imageops::FilterType::Triangle,
                )
                .into_raw(),
            ),
            None => std::borrow::Cow::Owned(vec![0u8; canvas.byte_len()]),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/image.rs"]
mod tests;
