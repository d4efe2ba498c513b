use std::io::Cursor;

use base64::Engine as _;

use crate::{
    foundation::{
        core::unpremultiply_rgba8_in_place,
        error::{ThumbError, ThumbResult},
    },
    render::surface::Surface,
};

/// Prefix of every data URI produced by [`to_data_uri`].
pub const PNG_DATA_URI_PREFIX: &str = "data:image/png;base64,";

/// Encode the surface as a straight-alpha RGBA PNG.
///
/// Fails with [`ThumbError::Serialization`] when the surface is tainted by an image that was
/// not granted read access.
pub fn encode_png(surface: &Surface) -> ThumbResult<Vec<u8>> {
    if !surface.is_origin_clean() {
        return Err(ThumbError::serialization(
            "surface is tainted by a cross-origin image; serve the image with CORS \
             permission or load it as bytes",
        ));
    }

    let canvas = surface.canvas();
    let mut rgba = surface.data().to_vec();
    unpremultiply_rgba8_in_place(&mut rgba);
    let img = image::RgbaImage::from_raw(canvas.width, canvas.height, rgba)
        .ok_or_else(|| ThumbError::serialization("surface buffer does not match its size"))?;

    let mut out = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut out), image::ImageFormat::Png)
        .map_err(|e| ThumbError::serialization(format!("png encode failed: {e}")))?;
    tracing::debug!(
        width = canvas.width,
        height = canvas.height,
        bytes = out.len(),
        "encoded png"
    );
    Ok(out)
}

/// Encode the surface as a `data:image/png;base64,...` URI.
pub fn to_data_uri(surface: &Surface) -> ThumbResult<String> {
    let png = encode_png(surface)?;
    Ok(png_data_uri(&png))
}

/// Wrap already-encoded PNG bytes in a data URI.
pub fn png_data_uri(png: &[u8]) -> String {
    let mut out = String::with_capacity(PNG_DATA_URI_PREFIX.len() + png.len().div_ceil(3) * 4);
    out.push_str(PNG_DATA_URI_PREFIX);
    base64::engine::general_purpose::STANDARD.encode_string(png, &mut out);
    out
}

#[cfg(test)]
#[path = "../../tests/unit/encode/png.rs"]
mod tests;
