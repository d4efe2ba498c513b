use std::path::Path;

use anyhow::Context as _;

use crate::foundation::error::{ThumbError, ThumbResult};

/// Numeric constants that parameterize layout and text rendering.
///
/// The editor this engine serves shipped several copies of its renderer with slightly
/// different constants; each copy is reproducible by configuration. [`RenderConfig::default`]
/// is the canonical variant (1280 px reference width, `min(w, h) / 1000` shadow scale) and
/// [`RenderConfig::compact_editor`] reproduces the `/ 250` variant.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Design-time canvas width that `fontSize` is expressed against.
    pub reference_width: f64,
    /// Divisor applied to `min(width, height)` to obtain the shadow/underline scale factor.
    pub scale_divisor: f64,
    /// Distance from the canvas edge used by named anchors.
    pub anchor_margin_px: f64,
    /// Shadow offset along both axes, in units of the scale factor.
    pub shadow_offset_factor: f64,
    /// Smallest radius used for curved text.
    pub curve_min_radius: f64,
    /// Curved text radius as a multiple of the scaled font size.
    pub curve_radius_factor: f64,
    /// Background plate height as a multiple of the scaled font size.
    pub plate_height_factor: f64,
    /// Extra padding added around the background plate on every side.
    pub plate_padding_px: f64,
    /// Underline distance below the middle baseline, in `fontSize * scale_factor` units.
    pub underline_offset_factor: f64,
    /// Underline thickness, in `fontSize * scale_factor` units.
    pub underline_width_factor: f64,
    /// Line height multiplier used when an element leaves `lineHeight` unset.
    pub default_line_height: f64,
    /// Font size given to freshly created elements.
    pub default_font_size: f64,
    /// Maximum number of undo snapshots kept by an edit session.
    pub history_limit: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            reference_width: 1280.0,
            scale_divisor: 1000.0,
            anchor_margin_px: 20.0,
            shadow_offset_factor: 2.0,
            curve_min_radius: 80.0,
            curve_radius_factor: 2.0,
            plate_height_factor: 1.2,
            plate_padding_px: 0.0,
            underline_offset_factor: 0.15,
            underline_width_factor: 0.05,
            default_line_height: 1.2,
            default_font_size: 72.0,
            history_limit: 50,
        }
    }
}

impl RenderConfig {
    /// The editor variant that scales shadows by `min(w, h) / 250` and seeds 120 px text.
    pub fn compact_editor() -> Self {
        Self {
            scale_divisor: 250.0,
            default_font_size: 120.0,
            ..Self::default()
        }
    }

    /// Load a config from a JSON file; missing keys keep their defaults.
    pub fn from_path(path: &Path) -> ThumbResult<Self> {
        let bytes =
            std::fs::read(path).with_context(|| format!("read config '{}'", path.display()))?;
        let cfg: Self = serde_json::from_slice(&bytes)
            .map_err(|e| ThumbError::validation(format!("config '{}': {e}", path.display())))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Apply `THUMBFORGE_REFERENCE_WIDTH` and `THUMBFORGE_SCALE_DIVISOR` when set and valid.
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(v) = env_f64("THUMBFORGE_REFERENCE_WIDTH") {
            self.reference_width = v;
        }
        if let Some(v) = env_f64("THUMBFORGE_SCALE_DIVISOR") {
            self.scale_divisor = v;
        }
        self
    }

    /// Reject values that would make scaling degenerate.
    pub fn validate(&self) -> ThumbResult<()> {
        let positive = [
            ("reference_width", self.reference_width),
            ("scale_divisor", self.scale_divisor),
            ("plate_height_factor", self.plate_height_factor),
            ("default_line_height", self.default_line_height),
            ("default_font_size", self.default_font_size),
        ];
        for (name, v) in positive {
            if !v.is_finite() || v <= 0.0 {
                return Err(ThumbError::validation(format!(
                    "{name} must be finite and > 0"
                )));
            }
        }
        let non_negative = [
            ("anchor_margin_px", self.anchor_margin_px),
            ("shadow_offset_factor", self.shadow_offset_factor),
            ("curve_min_radius", self.curve_min_radius),
            ("curve_radius_factor", self.curve_radius_factor),
            ("plate_padding_px", self.plate_padding_px),
            ("underline_offset_factor", self.underline_offset_factor),
            ("underline_width_factor", self.underline_width_factor),
        ];
        for (name, v) in non_negative {
            if !v.is_finite() || v < 0.0 {
                return Err(ThumbError::validation(format!(
                    "{name} must be finite and >= 0"
                )));
            }
        }
        Ok(())
    }
}

fn env_f64(key: &str) -> Option<f64> {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<f64>().ok())
        .filter(|v| v.is_finite() && *v > 0.0)
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/config.rs"]
mod tests;
