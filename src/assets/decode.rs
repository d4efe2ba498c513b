use anyhow::Context;

use crate::{
    assets::image::PreparedImage,
    foundation::error::{ThumbError, ThumbResult},
};

/// Decode PNG/JPEG/WebP/etc. bytes into a premultiplied [`PreparedImage`].
pub fn decode_image(bytes: &[u8]) -> ThumbResult<PreparedImage> {
    if bytes.is_empty() {
        return Err(ThumbError::image_load("image bytes are empty"));
    }
    let dyn_img = image::load_from_memory(bytes)
        .context("decode image from memory")
        .map_err(|e| ThumbError::image_load(format!("{e:#}")))?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();
    PreparedImage::from_straight(width, height, rgba.into_raw())
}
