use rayon::prelude::*;

use crate::{
    composition::model::ImageFilter,
    effects::blur::{blur_rgba8_premul, radius_for_sigma},
    foundation::error::{ThumbError, ThumbResult},
};

/// The no-op filter value. Equivalent to an empty chain.
pub const NO_FILTER: &str = "none";

/// One CSS filter function.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FilterOp {
    /// `brightness(N%)`
    Brightness(f64),
    /// `contrast(N%)`
    Contrast(f64),
    /// `saturate(N%)`
    Saturate(f64),
    /// `blur(Npx)`
    Blur(f64),
    /// `hue-rotate(Ndeg)`
    HueRotate(f64),
    /// `grayscale(N%)`
    Grayscale(f64),
    /// `sepia(N%)`
    Sepia(f64),
}

impl FilterOp {
    /// CSS function name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Brightness(_) => "brightness",
            Self::Contrast(_) => "contrast",
            Self::Saturate(_) => "saturate",
            Self::Blur(_) => "blur",
            Self::HueRotate(_) => "hue-rotate",
            Self::Grayscale(_) => "grayscale",
            Self::Sepia(_) => "sepia",
        }
    }

    fn unit(self) -> &'static str {
        match self {
            Self::Blur(_) => "px",
            Self::HueRotate(_) => "deg",
            _ => "%",
        }
    }

    fn value(self) -> f64 {
        match self {
            Self::Brightness(v)
            | Self::Contrast(v)
            | Self::Saturate(v)
            | Self::Blur(v)
            | Self::HueRotate(v)
            | Self::Grayscale(v)
            | Self::Sepia(v) => v,
        }
    }

    /// `name(value<unit>)`, with the value printed the way a JavaScript template literal would.
    pub fn to_css(self) -> String {
        format!("{}({}{})", self.name(), self.value(), self.unit())
    }
}

/// Build the CSS filter string for `filters`.
///
/// Fields at their neutral value are omitted; the remaining ones are emitted in the fixed
/// order brightness, contrast, saturate, blur, hue-rotate, grayscale, sepia. All-neutral
/// settings yield [`NO_FILTER`]. The live preview and the compositor both consume this
/// string, so it is the single source of truth for what gets applied.
pub fn build_filter_string(filters: &ImageFilter) -> String {
    let ops = FilterChain::from_settings(filters);
    if ops.is_identity() {
        return NO_FILTER.to_string();
    }
    ops.to_css()
}

/// Parse a filter string produced by [`build_filter_string`] back into settings.
///
/// Accepts `none`, the empty string, and any order of the seven functions; unitless
/// values in percentage functions are read as fractions (`brightness(1.1)` is 110%).
/// Each function may appear at most once.
pub fn parse_filter_string(s: &str) -> ThumbResult<ImageFilter> {
    let chain = FilterChain::parse(s)?;
    let mut out = ImageFilter::NEUTRAL;
    let mut seen = Vec::<&'static str>::new();
    for op in chain.ops() {
        if seen.contains(&op.name()) {
            return Err(ThumbError::validation(format!(
                "filter function '{}' appears more than once",
                op.name()
            )));
        }
        seen.push(op.name());
        match *op {
            FilterOp::Brightness(v) => out.brightness = v,
            FilterOp::Contrast(v) => out.contrast = v,
            FilterOp::Saturate(v) => out.saturation = v,
            FilterOp::Blur(v) => out.blur = v,
            FilterOp::HueRotate(v) => out.hue_rotate = v,
            FilterOp::Grayscale(v) => out.grayscale = v,
            FilterOp::Sepia(v) => out.sepia = v,
        }
    }
    Ok(out)
}

/// Ordered list of filter operations, ready to run over pixels.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FilterChain {
    ops: Vec<FilterOp>,
}

impl FilterChain {
    /// Chain for `filters`, skipping neutral fields.
    pub fn from_settings(filters: &ImageFilter) -> Self {
        let n = ImageFilter::NEUTRAL;
        let candidates = [
            (filters.brightness != n.brightness, FilterOp::Brightness(filters.brightness)),
            (filters.contrast != n.contrast, FilterOp::Contrast(filters.contrast)),
            (filters.saturation != n.saturation, FilterOp::Saturate(filters.saturation)),
            (filters.blur != n.blur, FilterOp::Blur(filters.blur)),
            (filters.hue_rotate != n.hue_rotate, FilterOp::HueRotate(filters.hue_rotate)),
            (filters.grayscale != n.grayscale, FilterOp::Grayscale(filters.grayscale)),
            (filters.sepia != n.sepia, FilterOp::Sepia(filters.sepia)),
        ];
        Self {
            ops: candidates
                .into_iter()
                .filter_map(|(keep, op)| keep.then_some(op))
                .collect(),
        }
    }

    /// Parse a CSS filter function list.
    pub fn parse(s: &str) -> ThumbResult<Self> {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case(NO_FILTER) {
            return Ok(Self::default());
        }

        let mut ops = Vec::new();
        let mut rest = s;
        while !rest.is_empty() {
            let open = rest
                .find('(')
                .ok_or_else(|| ThumbError::validation(format!("malformed filter \"{s}\"")))?;
            let close = rest[open..]
                .find(')')
                .map(|i| open + i)
                .ok_or_else(|| ThumbError::validation(format!("unclosed filter \"{s}\"")))?;
            let name = rest[..open].trim().to_ascii_lowercase();
            let arg = rest[open + 1..close].trim();
            ops.push(parse_op(&name, arg)?);
            rest = rest[close + 1..].trim_start();
        }
        Ok(Self { ops })
    }

    /// The operations, in application order.
    pub fn ops(&self) -> &[FilterOp] {
        &self.ops
    }

    /// Whether applying this chain leaves pixels untouched.
    pub fn is_identity(&self) -> bool {
        self.ops.is_empty()
    }

    /// Space-separated CSS functions, or [`NO_FILTER`] for an empty chain.
    pub fn to_css(&self) -> String {
        if self.ops.is_empty() {
            return NO_FILTER.to_string();
        }
        self.ops
            .iter()
            .map(|op| op.to_css())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Run the chain over a premultiplied RGBA8 buffer in place.
    ///
    /// Color functions follow the Filter Effects Level 1 matrices and clamp after each
    /// function; `blur(Npx)` is a gaussian with standard deviation `N`.
    pub fn apply(&self, rgba8_premul: &mut [u8], width: u32, height: u32) -> ThumbResult<()> {
        if rgba8_premul.len() != width as usize * height as usize * 4 {
            return Err(ThumbError::validation(
                "filter buffer does not match width*height*4",
            ));
        }

        let mut pending = Vec::<ColorTransform>::new();
        for op in &self.ops {
            match *op {
                FilterOp::Blur(px) => {
                    apply_color_transforms(rgba8_premul, &pending);
                    pending.clear();
                    let radius = radius_for_sigma(px);
                    if radius > 0 {
                        let blurred =
                            blur_rgba8_premul(rgba8_premul, width, height, radius, px as f32)?;
                        rgba8_premul.copy_from_slice(&blurred);
                    }
                }
                other => pending.push(ColorTransform::for_op(other)),
            }
        }
        apply_color_transforms(rgba8_premul, &pending);
        Ok(())
    }
}

fn parse_op(name: &str, arg: &str) -> ThumbResult<FilterOp> {
    let percent = || parse_amount(arg, name);
    let op = match name {
        "brightness" => FilterOp::Brightness(percent()?),
        "contrast" => FilterOp::Contrast(percent()?),
        "saturate" => FilterOp::Saturate(percent()?),
        "grayscale" => FilterOp::Grayscale(percent()?),
        "sepia" => FilterOp::Sepia(percent()?),
        "blur" => FilterOp::Blur(parse_length(arg)?),
        "hue-rotate" => FilterOp::HueRotate(parse_angle(arg)?),
        other => {
            return Err(ThumbError::validation(format!(
                "unsupported filter function '{other}'"
            )));
        }
    };
    Ok(op)
}

fn parse_number(s: &str) -> ThumbResult<f64> {
    let v: f64 = s
        .trim()
        .parse()
        .map_err(|_| ThumbError::validation(format!("invalid filter value \"{s}\"")))?;
    if !v.is_finite() {
        return Err(ThumbError::validation("filter value must be finite"));
    }
    Ok(v)
}

fn parse_amount(arg: &str, name: &str) -> ThumbResult<f64> {
    let v = match arg.strip_suffix('%') {
        Some(p) => parse_number(p)?,
        None => parse_number(arg)? * 100.0,
    };
    if v < 0.0 {
        return Err(ThumbError::validation(format!("{name}() must be >= 0")));
    }
    Ok(v)
}

fn parse_length(arg: &str) -> ThumbResult<f64> {
    let v = match arg.strip_suffix("px") {
        Some(p) => parse_number(p)?,
        None => unitless_zero(arg, "blur() needs a px length")?,
    };
    if v < 0.0 {
        return Err(ThumbError::validation("blur() must be >= 0"));
    }
    Ok(v)
}

fn parse_angle(arg: &str) -> ThumbResult<f64> {
    if let Some(p) = arg.strip_suffix("deg") {
        return parse_number(p);
    }
    if let Some(p) = arg.strip_suffix("grad") {
        return Ok(parse_number(p)? * 0.9);
    }
    if let Some(p) = arg.strip_suffix("rad") {
        return Ok(parse_number(p)?.to_degrees());
    }
    if let Some(p) = arg.strip_suffix("turn") {
        return Ok(parse_number(p)? * 360.0);
    }
    unitless_zero(arg, "hue-rotate() needs an angle unit")
}

fn unitless_zero(arg: &str, msg: &str) -> ThumbResult<f64> {
    if parse_number(arg)? == 0.0 {
        Ok(0.0)
    } else {
        Err(ThumbError::validation(msg))
    }
}

/// 3x3 color matrix plus per-channel offset over straight-alpha RGB in `[0, 1]`.
#[derive(Clone, Copy, Debug)]
struct ColorTransform {
    m: [[f32; 3]; 3],
    offset: f32,
}

impl ColorTransform {
    fn linear(slope: f32, intercept: f32) -> Self {
        Self {
            m: [[slope, 0.0, 0.0], [0.0, slope, 0.0], [0.0, 0.0, slope]],
            offset: intercept,
        }
    }

    fn matrix(m: [[f32; 3]; 3]) -> Self {
        Self { m, offset: 0.0 }
    }

    fn for_op(op: FilterOp) -> Self {
        match op {
            FilterOp::Brightness(v) => Self::linear((v / 100.0) as f32, 0.0),
            FilterOp::Contrast(v) => {
                let c = (v / 100.0) as f32;
                Self::linear(c, 0.5 - 0.5 * c)
            }
            FilterOp::Saturate(v) => {
                let s = (v / 100.0) as f32;
                Self::matrix([
                    [0.213 + 0.787 * s, 0.715 - 0.715 * s, 0.072 - 0.072 * s],
                    [0.213 - 0.213 * s, 0.715 + 0.285 * s, 0.072 - 0.072 * s],
                    [0.213 - 0.213 * s, 0.715 - 0.715 * s, 0.072 + 0.928 * s],
                ])
            }
            FilterOp::HueRotate(deg) => {
                let (sin, cos) = deg.to_radians().sin_cos();
                let (s, c) = (sin as f32, cos as f32);
                Self::matrix([
                    [
                        0.213 + c * 0.787 - s * 0.213,
                        0.715 - c * 0.715 - s * 0.715,
                        0.072 - c * 0.072 + s * 0.928,
                    ],
                    [
                        0.213 - c * 0.213 + s * 0.143,
                        0.715 + c * 0.285 + s * 0.140,
                        0.072 - c * 0.072 - s * 0.283,
                    ],
                    [
                        0.213 - c * 0.213 - s * 0.787,
                        0.715 - c * 0.715 + s * 0.715,
                        0.072 + c * 0.928 + s * 0.072,
                    ],
                ])
            }
            FilterOp::Grayscale(v) => {
                let g = 1.0 - (v / 100.0).clamp(0.0, 1.0) as f32;
                Self::matrix([
                    [0.2126 + 0.7874 * g, 0.7152 - 0.7152 * g, 0.0722 - 0.0722 * g],
                    [0.2126 - 0.2126 * g, 0.7152 + 0.2848 * g, 0.0722 - 0.0722 * g],
                    [0.2126 - 0.2126 * g, 0.7152 - 0.7152 * g, 0.0722 + 0.9278 * g],
                ])
            }
            FilterOp::Sepia(v) => {
                let s = 1.0 - (v / 100.0).clamp(0.0, 1.0) as f32;
                Self::matrix([
                    [0.393 + 0.607 * s, 0.769 - 0.769 * s, 0.189 - 0.189 * s],
                    [0.349 - 0.349 * s, 0.686 + 0.314 * s, 0.168 - 0.168 * s],
                    [0.272 - 0.272 * s, 0.534 - 0.534 * s, 0.131 + 0.869 * s],
                ])
            }
            FilterOp::Blur(_) => Self::linear(1.0, 0.0),
        }
    }

    fn apply(&self, rgb: [f32; 3]) -> [f32; 3] {
        let mut out = [0.0f32; 3];
        for (o, row) in out.iter_mut().zip(self.m.iter()) {
            let v = row[0] * rgb[0] + row[1] * rgb[1] + row[2] * rgb[2] + self.offset;
            *o = v.clamp(0.0, 1.0);
        }
        out
    }
}

fn apply_color_transforms(rgba8_premul: &mut [u8], transforms: &[ColorTransform]) {
    if transforms.is_empty() {
        return;
    }
    rgba8_premul.par_chunks_exact_mut(4).for_each(|px| {
        let a = px[3];
        if a == 0 {
            return;
        }
        let af = f32::from(a) / 255.0;
        let mut rgb = [
            f32::from(px[0]) / 255.0 / af,
            f32::from(px[1]) / 255.0 / af,
            f32::from(px[2]) / 255.0 / af,
        ];
        for t in transforms {
            rgb = t.apply(rgb);
        }
        for (c, v) in px[..3].iter_mut().zip(rgb) {
            *c = (v * af * 255.0).round().clamp(0.0, 255.0) as u8;
        }
    });
}

#[cfg(test)]
#[path = "../../tests/unit/effects/filter.rs"]
mod tests;
