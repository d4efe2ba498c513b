use crate::foundation::error::{ThumbError, ThumbResult};

pub use kurbo::{Affine, Point, Rect, Vec2};

/// Output raster dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Canvas {
    /// Largest edge the CPU rasterizer accepts.
    pub const MAX_EDGE: u32 = u16::MAX as u32;

    /// Build a canvas, rejecting empty or oversized dimensions.
    pub fn new(width: u32, height: u32) -> ThumbResult<Self> {
        if width == 0 || height == 0 {
            return Err(ThumbError::validation("canvas dimensions must be > 0"));
        }
        if width > Self::MAX_EDGE || height > Self::MAX_EDGE {
            return Err(ThumbError::validation(format!(
                "canvas {width}x{height} exceeds {} px per edge",
                Self::MAX_EDGE
            )));
        }
        Ok(Self { width, height })
    }

    /// `min(width, height) / divisor`, the factor used for shadow, underline and curve scaling.
    pub fn scale_factor(self, divisor: f64) -> f64 {
        f64::from(self.width.min(self.height)) / divisor
    }

    pub(crate) fn byte_len(self) -> usize {
        self.width as usize * self.height as usize * 4
    }
}

/// Straight (non-premultiplied) RGBA8 color.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgba8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Rgba8 {
    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);
    /// Opaque black.
    pub const BLACK: Self = Self::new(0, 0, 0, 255);

    /// Build a color from straight channels.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Copy of this color with its alpha multiplied by `factor` (clamped to `[0, 1]`).
    pub fn with_alpha_mul(self, factor: f32) -> Self {
        let f = factor.clamp(0.0, 1.0);
        Self {
            a: ((f32::from(self.a) * f).round()).clamp(0.0, 255.0) as u8,
            ..self
        }
    }

    /// Premultiplied byte quadruple.
    pub fn to_premul(self) -> [u8; 4] {
        let a = u16::from(self.a);
        let premul = |c: u8| -> u8 { ((u16::from(c) * a + 127) / 255) as u8 };
        [premul(self.r), premul(self.g), premul(self.b), self.a]
    }
}

pub(crate) fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}

pub(crate) fn unpremultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 || a == 255 {
            continue;
        }
        for c in &mut px[..3] {
            *c = ((u16::from(*c) * 255 + a / 2) / a).min(255) as u8;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
