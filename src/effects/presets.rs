use crate::{
    composition::model::ImageFilter,
    foundation::error::{ThumbError, ThumbResult},
};

/// Names accepted by [`filter_preset`], in display order.
pub const PRESET_NAMES: &[&str] = &[
    "none", "vivid", "warm", "cool", "vintage", "noir", "dramatic", "fade",
];

/// Full filter settings for a named preset.
pub fn filter_preset(name: &str) -> ThumbResult<ImageFilter> {
    let n = ImageFilter::NEUTRAL;
    let f = match name.trim().to_ascii_lowercase().as_str() {
        "none" => n,
        "vivid" => ImageFilter {
            contrast: 115.0,
            saturation: 140.0,
            ..n
        },
        "warm" => ImageFilter {
            brightness: 105.0,
            saturation: 110.0,
            sepia: 20.0,
            ..n
        },
        "cool" => ImageFilter {
            saturation: 90.0,
            hue_rotate: 190.0,
            ..n
        },
        "vintage" => ImageFilter {
            contrast: 90.0,
            saturation: 80.0,
            sepia: 45.0,
            ..n
        },
        "noir" => ImageFilter {
            contrast: 130.0,
            grayscale: 100.0,
            ..n
        },
        "dramatic" => ImageFilter {
            brightness: 90.0,
            contrast: 140.0,
            saturation: 120.0,
            ..n
        },
        "fade" => ImageFilter {
            brightness: 110.0,
            contrast: 80.0,
            saturation: 70.0,
            ..n
        },
        other => {
            return Err(ThumbError::validation(format!(
                "unknown filter preset '{other}' (expected one of: {})",
                PRESET_NAMES.join(", ")
            )));
        }
    };
    Ok(f)
}
