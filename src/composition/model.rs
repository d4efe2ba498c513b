use crate::foundation::error::{ThumbError, ThumbResult};

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// One styled, positioned text layer.
///
/// The JSON shape matches the editor's element records (camelCase keys). Everything but
/// `id` and `text` may be omitted and falls back to [`TextElement::default_with`] values.
pub struct TextElement {
    /// Stable identifier, generated on creation and never reused.
    #[serde(default = "new_element_id")]
    pub id: String,
    /// Content; embedded newlines select the multi-line layout.
    pub text: String,
    /// Horizontal pivot as a percentage of canvas width.
    #[serde(default = "fifty")]
    pub x: f64,
    /// Vertical pivot as a percentage of canvas height.
    #[serde(default = "fifty")]
    pub y: f64,
    /// Named anchor; anything but `center` overrides `x`/`y` on one or both axes.
    #[serde(default)]
    pub position: Anchor,
    /// Font size in logical px at the reference canvas width.
    #[serde(default = "default_font_size")]
    pub font_size: f64,
    /// Fill color (CSS color string).
    #[serde(default = "white")]
    pub color: String,
    /// Rotation in degrees around the resolved pivot.
    #[serde(default)]
    pub rotation: f64,
    /// CSS-style font family list.
    #[serde(default = "default_family")]
    pub font_family: String,
    /// Wrap/condense bound as a percentage of canvas width, within `[10, 100]`.
    #[serde(default = "default_max_width")]
    pub max_width: f64,
    /// Lay the characters out along a circular arc.
    #[serde(default)]
    pub curve: bool,
    /// Plate color behind the text.
    #[serde(default)]
    pub background_color: Option<String>,
    /// Whether the plate is drawn.
    #[serde(default)]
    pub background_enabled: bool,
    /// Whether the text casts a drop shadow.
    #[serde(default)]
    pub shadow: bool,
    /// Shadow blur, scaled by the canvas scale factor.
    #[serde(default = "default_shadow_blur")]
    pub shadow_blur: f64,
    /// Shadow color (CSS color string).
    #[serde(default = "default_shadow_color")]
    pub shadow_color: String,
    /// Horizontal alignment around the pivot.
    #[serde(default)]
    pub text_align: TextAlign,
    /// Bold style flag.
    #[serde(default)]
    pub bold: bool,
    /// Italic style flag.
    #[serde(default)]
    pub italic: bool,
    /// Underline style flag.
    #[serde(default)]
    pub underline: bool,
    /// Extra advance after each character, in logical px.
    #[serde(default)]
    pub letter_spacing: f64,
    /// Line height multiplier for multi-line text.
    #[serde(default)]
    pub line_height: Option<f64>,
    /// Opacity in `[0, 100]`.
    #[serde(default = "hundred")]
    pub opacity: f64,
    /// Invisible elements are skipped entirely.
    #[serde(default = "yes")]
    pub visible: bool,
    /// Whether the element paints before or after the foreground cutout.
    #[serde(default)]
    pub layer_order: LayerOrder,
}

fn new_element_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

fn fifty() -> f64 {
    50.0
}

fn hundred() -> f64 {
    100.0
}

fn yes() -> bool {
    true
}

fn default_font_size() -> f64 {
    72.0
}

fn white() -> String {
    "#ffffff".to_string()
}

fn default_family() -> String {
    "Arial".to_string()
}

fn default_max_width() -> f64 {
    80.0
}

fn default_shadow_blur() -> f64 {
    4.0
}

fn default_shadow_color() -> String {
    "#000000".to_string()
}

impl TextElement {
    /// New centered element with a fresh id and default styling.
    pub fn new(text: impl Into<String>) -> Self {
        Self::default_with(text, default_font_size())
    }

    /// New centered element with a fresh id at the given font size.
    pub fn default_with(text: impl Into<String>, font_size: f64) -> Self {
        Self {
            id: new_element_id(),
            text: text.into(),
            x: fifty(),
            y: fifty(),
            position: Anchor::Center,
            font_size,
            color: white(),
            rotation: 0.0,
            font_family: default_family(),
            max_width: default_max_width(),
            curve: false,
            background_color: None,
            background_enabled: false,
            shadow: false,
            shadow_blur: default_shadow_blur(),
            shadow_color: default_shadow_color(),
            text_align: TextAlign::Center,
            bold: false,
            italic: false,
            underline: false,
            letter_spacing: 0.0,
            line_height: None,
            opacity: hundred(),
            visible: true,
            layer_order: LayerOrder::Front,
        }
    }

    /// Copy with a fresh id.
    pub fn duplicate(&self) -> Self {
        Self {
            id: new_element_id(),
            ..self.clone()
        }
    }

    /// `max_width` clamped to `[10, 100]` percent.
    pub fn max_width_percent(&self) -> f64 {
        if self.max_width.is_finite() {
            self.max_width.clamp(10.0, 100.0)
        } else {
            default_max_width()
        }
    }

    /// Opacity as a `[0, 1]` alpha.
    pub fn alpha(&self) -> f32 {
        if self.opacity.is_finite() {
            (self.opacity / 100.0).clamp(0.0, 1.0) as f32
        } else {
            1.0
        }
    }

    /// Whether this element has a drawable background plate.
    pub fn has_plate(&self) -> bool {
        self.background_enabled
            && self
                .background_color
                .as_deref()
                .is_some_and(|c| !c.trim().is_empty())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
/// Named placement anchors.
pub enum Anchor {
    /// Place by the element's `x`/`y` percentages.
    #[default]
    Center,
    /// Left margin, vertical percentage.
    Left,
    /// Right margin, vertical percentage.
    Right,
    /// Top margin, horizontal percentage.
    Top,
    /// Bottom margin, horizontal percentage.
    Bottom,
    /// Top-left corner.
    TopLeft,
    /// Top margin, horizontal midline.
    TopCenter,
    /// Top-right corner.
    TopRight,
    /// Left margin, vertical midline.
    CenterLeft,
    /// Right margin, vertical midline.
    CenterRight,
    /// Bottom-left corner.
    BottomLeft,
    /// Bottom margin, horizontal midline.
    BottomCenter,
    /// Bottom-right corner.
    BottomRight,
    /// Any unrecognized anchor name; placed like [`Anchor::Center`].
    #[serde(other)]
    Free,
}

impl std::str::FromStr for Anchor {
    type Err = ThumbError;

    fn from_str(s: &str) -> ThumbResult<Self> {
        serde_json::from_value(serde_json::Value::String(s.trim().to_ascii_lowercase()))
            .map_err(|e| ThumbError::validation(format!("anchor '{s}': {e}")))
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
/// Horizontal text alignment around the pivot.
pub enum TextAlign {
    /// Text starts at the pivot.
    Left,
    /// Text is centered on the pivot.
    #[default]
    Center,
    /// Text ends at the pivot.
    Right,
    /// Accepted for compatibility; rendered as [`TextAlign::Left`].
    Justify,
}

impl TextAlign {
    /// Alignment actually used for drawing.
    pub fn effective(self) -> Self {
        match self {
            Self::Justify => Self::Left,
            other => other,
        }
    }

    /// Start x of a run of `width` px aligned at x = 0.
    pub fn start_offset(self, width: f64) -> f64 {
        match self.effective() {
            Self::Left | Self::Justify => 0.0,
            Self::Center => -width / 2.0,
            Self::Right => -width,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
/// Paint order of a text element relative to the foreground cutout.
pub enum LayerOrder {
    /// Painted after the cutout.
    #[default]
    Front,
    /// Painted before the cutout.
    Back,
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
/// Photographic filter settings applied to the base image.
pub struct ImageFilter {
    /// Percent; neutral 100.
    pub brightness: f64,
    /// Percent; neutral 100.
    pub contrast: f64,
    /// Percent; neutral 100.
    pub saturation: f64,
    /// Pixels; neutral 0.
    pub blur: f64,
    /// Degrees; neutral 0.
    pub hue_rotate: f64,
    /// Percent; neutral 0.
    pub grayscale: f64,
    /// Percent; neutral 0.
    pub sepia: f64,
}

impl ImageFilter {
    /// All-neutral settings.
    pub const NEUTRAL: Self = Self {
        brightness: 100.0,
        contrast: 100.0,
        saturation: 100.0,
        blur: 0.0,
        hue_rotate: 0.0,
        grayscale: 0.0,
        sepia: 0.0,
    };

    /// Whether every field sits at its neutral value.
    pub fn is_neutral(&self) -> bool {
        *self == Self::NEUTRAL
    }

    /// Reject negative or non-finite settings.
    pub fn validate(&self) -> ThumbResult<()> {
        let fields = [
            ("brightness", self.brightness),
            ("contrast", self.contrast),
            ("saturation", self.saturation),
            ("blur", self.blur),
            ("hueRotate", self.hue_rotate),
            ("grayscale", self.grayscale),
            ("sepia", self.sepia),
        ];
        for (name, v) in fields {
            if !v.is_finite() || v < 0.0 {
                return Err(ThumbError::validation(format!(
                    "filter {name} must be finite and >= 0"
                )));
            }
        }
        Ok(())
    }
}

impl Default for ImageFilter {
    fn default() -> Self {
        Self::NEUTRAL
    }
}

#[cfg(test)]
#[path = "../../tests/unit/composition/model.rs"]
mod tests;
