use std::{borrow::Cow, collections::HashMap, path::Path, sync::Arc};

use anyhow::Context;
use spleen_font::{FONT_12X24, PSF2Font};
use vello_cpu::kurbo::{BezPath, Rect as CpuRect};

use crate::{
    foundation::{
        core::{Affine, Rgba8},
        error::{ThumbError, ThumbResult},
    },
    render::raster::{Placed, Shape},
};

const CELL_W: f64 = 12.0;
const CELL_H: f64 = 24.0;
const ITALIC_SKEW: f64 = -0.2;
const OUTLINE_EMBOLDEN: f64 = 0.04;

/// Font selection for a draw call, the equivalent of a CSS `font` shorthand.
#[derive(Clone, Debug, PartialEq)]
pub struct FontSpec {
    /// CSS family list, e.g. `"'Bebas Neue', Impact, sans-serif"`.
    pub family: String,
    /// Size in device pixels.
    pub size_px: f64,
    /// Heavy weight.
    pub bold: bool,
    /// Slanted style.
    pub italic: bool,
    /// Extra advance after every character, in device pixels.
    pub letter_spacing_px: f64,
}

impl Default for FontSpec {
    fn default() -> Self {
        Self {
            family: "sans-serif".to_owned(),
            size_px: 10.0,
            bold: false,
            italic: false,
            letter_spacing_px: 0.0,
        }
    }
}

impl FontSpec {
    /// CSS font shorthand, e.g. `"bold italic 64px Arial"`.
    pub fn css(&self) -> String {
        let mut out = String::new();
        if self.bold {
            out.push_str("bold ");
        }
        if self.italic {
            out.push_str("italic ");
        }
        out.push_str(&format!("{}px {}", self.size_px, self.family));
        out
    }

    fn validate(&self) -> ThumbResult<()> {
        if !self.size_px.is_finite() || self.size_px <= 0.0 {
            return Err(ThumbError::render_element(format!(
                "font size must be finite and > 0 (got {})",
                self.size_px
            )));
        }
        if !self.letter_spacing_px.is_finite() {
            return Err(ThumbError::render_element("letter spacing must be finite"));
        }
        Ok(())
    }
}

/// Run of set pixels in one row of the built-in bitmap face.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct BitmapSpan {
    row: u8,
    start: u8,
    end: u8,
}

#[derive(Clone)]
struct RegisteredFace {
    name: String,
    data: vello_cpu::peniko::FontData,
}

/// Face chosen for a family list.
#[derive(Clone)]
pub(crate) enum Face {
    /// The embedded 12x24 bitmap face, used when no listed family is registered.
    Builtin,
    Outline {
        name: String,
        data: vello_cpu::peniko::FontData,
    },
}

/// Text shaped into drawable geometry, laid out from `x = 0` with a middle baseline at `y = 0`.
pub(crate) struct ShapedText {
    pub(crate) width: f64,
    pub(crate) shapes: Vec<Placed>,
}

/// Registry of fonts available to text layers.
///
/// Families are registered from raw font bytes and looked up by the CSS family list of a
/// [`FontSpec`]. Lookups that match nothing fall back to a built-in monospace bitmap face
/// (advance of half the font size per character), so rendering never depends on system fonts.
pub struct FontBook {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<Rgba8>,
    faces: HashMap<String, RegisteredFace>,
    builtin: HashMap<char, Arc<[BitmapSpan]>>,
}

impl Default for FontBook {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for FontBook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut families: Vec<&str> = self.families().collect();
        families.sort_unstable();
        f.debug_struct("FontBook")
            .field("families", &families)
            .finish()
    }
}

impl FontBook {
    /// Empty font book: only the built-in face is available.
    pub fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
            faces: HashMap::new(),
            builtin: HashMap::new(),
        }
    }

    /// Register TTF/OTF bytes, returning the family names they provide.
    pub fn register_font(&mut self, bytes: Vec<u8>) -> ThumbResult<Vec<String>> {
        let blob = parley::fontique::Blob::from(bytes.clone());
        let families = self.font_ctx.collection.register_fonts(blob, None);
        if families.is_empty() {
            return Err(ThumbError::validation(
                "no font families registered from font bytes",
            ));
        }

        let data = vello_cpu::peniko::FontData::new(vello_cpu::peniko::Blob::from(bytes), 0);
        let mut names = Vec::with_capacity(families.len());
        for (id, _) in families {
            let Some(name) = self.font_ctx.collection.family_name(id) else {
                continue;
            };
            let name = name.to_string();
            tracing::debug!(family = %name, "registered font family");
            self.faces.insert(
                name.to_lowercase(),
                RegisteredFace {
                    name: name.clone(),
                    data: data.clone(),
                },
            );
            names.push(name);
        }
        if names.is_empty() {
            return Err(ThumbError::validation("registered font family has no name"));
        }
        Ok(names)
    }

    /// Read and register a font file.
    pub fn register_font_file(&mut self, path: &Path) -> ThumbResult<Vec<String>> {
        let bytes =
            std::fs::read(path).with_context(|| format!("read font file {}", path.display()))?;
        self.register_font(bytes)
    }

    /// Whether `family` (case-insensitive, without quotes) has been registered.
    pub fn has_family(&self, family: &str) -> bool {
        self.faces.contains_key(&normalize_family(family))
    }

    /// Registered family names.
    pub fn families(&self) -> impl Iterator<Item = &str> {
        self.faces.values().map(|f| f.name.as_str())
    }

    pub(crate) fn resolve_face(&self, family_list: &str) -> Face {
        family_list
            .split(',')
            .map(normalize_family)
            .find_map(|key| self.faces.get(&key))
            .map_or(Face::Builtin, |f| Face::Outline {
                name: f.name.clone(),
                data: f.data.clone(),
            })
    }

    /// Advance width of `text` in device pixels, letter spacing included.
    pub fn measure(&mut self, spec: &FontSpec, text: &str) -> ThumbResult<f64> {
        spec.validate()?;
        match self.resolve_face(&spec.family) {
            Face::Builtin => Ok(builtin_width(spec, text)),
            Face::Outline { name, .. } => Ok(self.layout_outline(spec, &name, text)?.0),
        }
    }

    pub(crate) fn shape(&mut self, spec: &FontSpec, text: &str) -> ThumbResult<ShapedText> {
        spec.validate()?;
        let mut shaped = match self.resolve_face(&spec.family) {
            Face::Builtin => self.shape_builtin(spec, text)?,
            Face::Outline { name, data } => {
                let (width, glyphs) = self.layout_outline(spec, &name, text)?;
                let size = spec.size_px as f32;
                let mut shapes = Vec::with_capacity(2);
                if spec.bold {
                    shapes.push(Placed::new(
                        Affine::translate((spec.size_px * OUTLINE_EMBOLDEN, 0.0)),
                        Shape::Glyphs {
                            font: data.clone(),
                            size,
                            glyphs: glyphs.clone(),
                        },
                    ));
                }
                shapes.push(Placed::new(
                    Affine::IDENTITY,
                    Shape::Glyphs {
                        font: data,
                        size,
                        glyphs,
                    },
                ));
                ShapedText { width, shapes }
            }
        };
        if spec.italic {
            for placed in &mut shaped.shapes {
                placed.local = Affine::skew(ITALIC_SKEW, 0.0) * placed.local;
            }
        }
        Ok(shaped)
    }

    fn layout_outline(
        &mut self,
        spec: &FontSpec,
        family: &str,
        text: &str,
    ) -> ThumbResult<(f64, Vec<vello_cpu::Glyph>)> {
        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(Cow::Owned(family.to_owned())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(spec.size_px as f32));
        builder.push_default(parley::style::StyleProperty::LetterSpacing(
            spec.letter_spacing_px as f32,
        ));

        let mut layout: parley::Layout<Rgba8> = builder.build(text);
        layout.break_all_lines(None);

        let mid = f64::from(layout.height()) / 2.0;
        let mut glyphs = Vec::new();
        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                glyphs.extend(run.glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: (f64::from(g.y) - mid) as f32,
                }));
            }
        }
        Ok((f64::from(layout.width()), glyphs))
    }

    fn shape_builtin(&mut self, spec: &FontSpec, text: &str) -> ThumbResult<ShapedText> {
        let px = spec.size_px / CELL_H;
        let top = -CELL_H * px / 2.0;
        let advance = CELL_W * px + spec.letter_spacing_px;
        let widen = u8::from(spec.bold);

        let mut path = BezPath::new();
        let mut pen_x = 0.0;
        for ch in text.chars() {
            let spans = self.builtin_glyph(ch)?;
            for span in spans.iter() {
                let x0 = pen_x + f64::from(span.start) * px;
                let x1 = pen_x + f64::from(span.end + widen) * px;
                let y0 = top + f64::from(span.row) * px;
                let y1 = y0 + px;
                push_rect(&mut path, CpuRect::new(x0, y0, x1, y1));
            }
            pen_x += advance;
        }

        Ok(ShapedText {
            width: builtin_width(spec, text),
            shapes: vec![Placed::new(Affine::IDENTITY, Shape::Path(path))],
        })
    }

    fn builtin_glyph(&mut self, ch: char) -> ThumbResult<Arc<[BitmapSpan]>> {
        if let Some(spans) = self.builtin.get(&ch) {
            return Ok(spans.clone());
        }
        let mut font = PSF2Font::new(FONT_12X24)
            .map_err(|_| ThumbError::render_element("built-in bitmap font failed to load"))?;

        let mut buf = [0u8; 4];
        let mut rows = font
            .glyph_for_utf8(ch.encode_utf8(&mut buf).as_bytes())
            .map(collect_rows);
        if rows.is_none() && !ch.is_whitespace() {
            rows = font.glyph_for_utf8(b"?").map(collect_rows);
        }

        let mut spans = Vec::new();
        for (row, bits) in rows.unwrap_or_default().iter().enumerate() {
            let mut start = None;
            for (col, on) in bits.iter().copied().chain(std::iter::once(false)).enumerate() {
                match (on, start) {
                    (true, None) => start = Some(col),
                    (false, Some(s)) => {
                        spans.push(BitmapSpan {
                            row: row as u8,
                            start: s as u8,
                            end: col as u8,
                        });
                        start = None;
                    }
                    _ => {}
                }
            }
        }
        let spans: Arc<[BitmapSpan]> = spans.into();
        self.builtin.insert(ch, spans.clone());
        Ok(spans)
    }
}

fn collect_rows<G, R>(glyph: G) -> Vec<Vec<bool>>
where
    G: Iterator<Item = R>,
    R: Iterator<Item = bool>,
{
    glyph.map(|row| row.collect()).collect()
}

fn builtin_width(spec: &FontSpec, text: &str) -> f64 {
    let advance = CELL_W * spec.size_px / CELL_H + spec.letter_spacing_px;
    text.chars().count() as f64 * advance
}

fn push_rect(path: &mut BezPath, r: CpuRect) {
    path.move_to((r.x0, r.y0));
    path.line_to((r.x1, r.y0));
    path.line_to((r.x1, r.y1));
    path.line_to((r.x0, r.y1));
    path.close_path();
}

fn normalize_family(name: &str) -> String {
    name.trim()
        .trim_matches(|c| c == '"' || c == '\'')
        .trim()
        .to_lowercase()
}

#[cfg(test)]
#[path = "../../tests/unit/text/fonts.rs"]
mod tests;
