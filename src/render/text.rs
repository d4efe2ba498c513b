use std::f64::consts::{FRAC_PI_2, PI};

use crate::{
    composition::model::{TextAlign, TextElement},
    foundation::{
        color::parse_css_color,
        config::RenderConfig,
        core::{Point, Rect, Rgba8, Vec2},
        error::{ThumbError, ThumbResult},
    },
    layout::anchor::{pivot_transform, resolve_position_with_margin},
    render::{raster::Shadow, surface::Surface},
    text::fonts::{FontBook, FontSpec},
};

/// Placement of one character of curved text, relative to the element pivot.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CurvePlacement {
    /// Angle on the circle, `-pi/2` being straight up.
    pub angle: f64,
    /// Glyph center.
    pub position: Point,
    /// Glyph rotation so it stands upright along the arc.
    pub rotation: f64,
}

/// `font_size` scaled from the reference width to the actual canvas width.
pub fn scaled_font_size(font_size: f64, canvas_width: f64, config: &RenderConfig) -> f64 {
    font_size * canvas_width / config.reference_width
}

/// Radius of the circle curved text sits on.
pub fn curve_radius(scaled_font_size: f64, config: &RenderConfig) -> f64 {
    config
        .curve_min_radius
        .max(scaled_font_size * config.curve_radius_factor)
}

/// Spread `len` characters over the upper half circle, centered on straight up.
pub fn curve_placements(len: usize, radius: f64) -> Vec<CurvePlacement> {
    if len == 0 {
        return Vec::new();
    }
    let n = len as f64;
    let step = PI / (n + 1.0);
    let start = -FRAC_PI_2 - step * (n - 1.0) / 2.0;
    (0..len)
        .map(|i| {
            let angle = start + i as f64 * step;
            CurvePlacement {
                angle,
                position: Point::new(radius * angle.cos(), radius * angle.sin()),
                rotation: angle + FRAC_PI_2,
            }
        })
        .collect()
}

/// Background plate rectangle in pivot space.
///
/// Width is the measured text clamped to `max_width_px`, placed like the text under
/// `align`; the plate is vertically centered on the pivot.
pub fn background_plate(
    align: TextAlign,
    text_width: f64,
    max_width_px: f64,
    height: f64,
    padding: f64,
) -> Rect {
    let w = text_width.min(max_width_px);
    let x0 = align.start_offset(w);
    Rect::new(
        x0 - padding,
        -height / 2.0 - padding,
        x0 + w + padding,
        height / 2.0 + padding,
    )
}

/// Draw one text element onto `surface`.
///
/// All state changes are scoped; the surface state is the same afterwards whether the
/// element drew or failed. Failures are [`ThumbError::RenderElement`].
pub fn render_text_element(
    surface: &mut Surface,
    fonts: &mut FontBook,
    element: &TextElement,
    canvas_width: f64,
    canvas_height: f64,
    scale_factor: f64,
    config: &RenderConfig,
) -> ThumbResult<()> {
    let size = scaled_font_size(element.font_size, canvas_width, config);
    if !size.is_finite() || size <= 0.0 {
        return Err(ThumbError::render_element(format!(
            "element {} has unusable font size {}",
            element.id, element.font_size
        )));
    }
    let fill = element_color(&element.color, "color")?;
    let plate = if element.has_plate() {
        let bg = element.background_color.as_deref().unwrap_or_default();
        Some(element_color(bg, "backgroundColor")?)
    } else {
        None
    };
    let shadow = if element.shadow {
        let offset = config.shadow_offset_factor * scale_factor;
        Some(Shadow {
            color: element_color(&element.shadow_color, "shadowColor")?,
            blur: element.shadow_blur.max(0.0) * scale_factor,
            offset: Vec2::new(offset, offset),
        })
    } else {
        None
    };

    let mut s = surface.scope();
    let pivot = resolve_position_with_margin(
        element,
        canvas_width,
        canvas_height,
        config.anchor_margin_px,
    );
    s.transform(pivot_transform(pivot, element.rotation));

    s.set_font(FontSpec {
        family: element.font_family.clone(),
        size_px: size,
        bold: element.bold,
        italic: element.italic,
        letter_spacing_px: element.letter_spacing * canvas_width / config.reference_width,
    });
    let align = element.text_align.effective();
    s.set_text_align(align);
    s.set_global_alpha(element.alpha());

    let max_width_px = element.max_width_percent() / 100.0 * canvas_width;
    let lines: Vec<&str> = if element.curve {
        vec![element.text.as_str()]
    } else {
        element.text.split('\n').collect()
    };
    let line_height_px = size
        * element
            .line_height
            .filter(|lh| lh.is_finite() && *lh > 0.0)
            .unwrap_or(config.default_line_height);

    if let Some(color) = plate {
        let mut widest = 0.0_f64;
        for line in &lines {
            widest = widest.max(s.measure_text(fonts, line)?);
        }
        let height =
            size * config.plate_height_factor + (lines.len() - 1) as f64 * line_height_px;
        let rect = background_plate(align, widest, max_width_px, height, config.plate_padding_px);

        let mut p = s.scope();
        p.set_shadow(None);
        p.set_fill(color);
        p.fill_rect(rect)?;
    }

    s.set_shadow(shadow);
    s.set_fill(fill);

    if element.curve {
        let chars: Vec<char> = element.text.chars().filter(|c| *c != '\n').collect();
        s.set_text_align(TextAlign::Center);
        let placements = curve_placements(chars.len(), curve_radius(size, config));
        let mut buf = [0u8; 4];
        for (ch, place) in chars.iter().zip(placements) {
            let mut g = s.scope();
            g.translate(place.position.x, place.position.y);
            g.rotate(place.rotation);
            g.fill_text(fonts, ch.encode_utf8(&mut buf), 0.0, 0.0, None)?;
        }
        return Ok(());
    }

    let start_y = -(lines.len() as f64 * line_height_px) / 2.0 + line_height_px / 2.0;
    let underline_dy = element.font_size * config.underline_offset_factor * scale_factor;
    let underline_h = element.font_size * config.underline_width_factor * scale_factor;
    for (i, line) in lines.iter().enumerate() {
        let y = start_y + i as f64 * line_height_px;
        s.fill_text(fonts, line, 0.0, y, Some(max_width_px))?;
        if element.underline && !line.is_empty() {
            let half = s.measure_text(fonts, line)?.min(max_width_px) / 2.0;
            let uy = y + underline_dy;
            s.fill_rect(Rect::new(
                -half,
                uy - underline_h / 2.0,
                half,
                uy + underline_h / 2.0,
            ))?;
        }
    }
    Ok(())
}

fn element_color(value: &str, field: &str) -> ThumbResult<Rgba8> {
    parse_css_color(value)
        .map_err(|e| ThumbError::render_element(format!("invalid {field} \"{value}\": {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/render/text.rs"]
mod tests;
