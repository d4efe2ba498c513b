use rayon::prelude::*;

use crate::foundation::error::{ThumbError, ThumbResult};

/// Source-over `layer` onto `dst` (both premultiplied RGBA8), scaling the layer by `opacity`.
///
/// Fully transparent layer pixels leave `dst` untouched, so sparse text layers only touch
/// the pixels they cover.
pub fn over_in_place(dst: &mut [u8], layer: &[u8], opacity: f32) -> ThumbResult<()> {
    if dst.len() != layer.len() || !dst.len().is_multiple_of(4) {
        return Err(ThumbError::render_element(format!(
            "layer of {} bytes cannot be composited onto {} bytes",
            layer.len(),
            dst.len()
        )));
    }
    let weight = opacity_weight(opacity);
    if weight == 0 {
        return Ok(());
    }
    dst.par_chunks_exact_mut(4)
        .zip(layer.par_chunks_exact(4))
        .filter(|(_, src)| src[3] != 0)
        .for_each(|(d, src)| blend_px(d, src, weight));
    Ok(())
}

/// Opacity as an 8-bit weight; non-finite values count as fully transparent.
fn opacity_weight(opacity: f32) -> u32 {
    if !opacity.is_finite() {
        return 0;
    }
    (opacity.clamp(0.0, 1.0) * 255.0).round() as u32
}

fn blend_px(d: &mut [u8], src: &[u8], weight: u32) {
    let src_a = scale(u32::from(src[3]), weight);
    if src_a == 0 {
        return;
    }
    let keep = 255 - src_a;
    for (dc, sc) in d.iter_mut().zip(src) {
        let v = scale(u32::from(*sc), weight) + scale(u32::from(*dc), keep);
        *dc = v.min(255) as u8;
    }
}

/// `a * b / 255`, rounded.
fn scale(a: u32, b: u32) -> u32 {
    (a * b + 127) / 255
}

#[cfg(test)]
#[path = "../../tests/unit/render/composite.rs"]
mod tests;
