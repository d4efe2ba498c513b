use crate::foundation::{
    core::Rgba8,
    error::{ThumbError, ThumbResult},
};

/// Parse a CSS color string as used by the editor UI.
///
/// Accepts `#rgb`, `#rgba`, `#rrggbb`, `#rrggbbaa`, `rgb()`/`rgba()`, `hsl()`/`hsla()`,
/// `transparent` and the common named colors. Matching is case-insensitive.
pub fn parse_css_color(input: &str) -> ThumbResult<Rgba8> {
    let s = input.trim().to_ascii_lowercase();
    if s.is_empty() {
        return Err(ThumbError::validation("color must be non-empty"));
    }
    if let Some(hex) = s.strip_prefix('#') {
        return parse_hex(hex);
    }
    if let Some(args) = function_args(&s, "rgba").or_else(|| function_args(&s, "rgb")) {
        return parse_rgb_args(args);
    }
    if let Some(args) = function_args(&s, "hsla").or_else(|| function_args(&s, "hsl")) {
        return parse_hsl_args(args);
    }
    named(&s).ok_or_else(|| ThumbError::validation(format!("unrecognized color \"{input}\"")))
}

fn function_args<'a>(s: &'a str, name: &str) -> Option<&'a str> {
    s.strip_prefix(name)?
        .trim_start()
        .strip_prefix('(')?
        .strip_suffix(')')
}

fn parse_hex(s: &str) -> ThumbResult<Rgba8> {
    fn nibble(c: u8) -> ThumbResult<u8> {
        (c as char)
            .to_digit(16)
            .map(|d| d as u8)
            .ok_or_else(|| ThumbError::validation(format!("invalid hex digit '{}'", c as char)))
    }

    let b = s.as_bytes();
    let expand = |i: usize| -> ThumbResult<u8> { Ok(nibble(b[i])? * 17) };
    let pair = |i: usize| -> ThumbResult<u8> { Ok(nibble(b[i])? * 16 + nibble(b[i + 1])?) };

    match b.len() {
        3 => Ok(Rgba8::new(expand(0)?, expand(1)?, expand(2)?, 255)),
        4 => Ok(Rgba8::new(expand(0)?, expand(1)?, expand(2)?, expand(3)?)),
        6 => Ok(Rgba8::new(pair(0)?, pair(2)?, pair(4)?, 255)),
        8 => Ok(Rgba8::new(pair(0)?, pair(2)?, pair(4)?, pair(6)?)),
        _ => Err(ThumbError::validation(
            "hex color must be #rgb, #rgba, #rrggbb or #rrggbbaa",
        )),
    }
}

fn split_args(args: &str) -> Vec<&str> {
    args.split([',', ' ', '/'])
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect()
}

fn parse_number(part: &str) -> ThumbResult<f64> {
    let v: f64 = part
        .trim_end_matches(['%', 'd', 'e', 'g'])
        .parse()
        .map_err(|_| ThumbError::validation(format!("invalid color component \"{part}\"")))?;
    if !v.is_finite() {
        return Err(ThumbError::validation("color component must be finite"));
    }
    Ok(v)
}

fn parse_alpha(part: Option<&&str>) -> ThumbResult<f64> {
    match part {
        None => Ok(1.0),
        Some(p) if p.ends_with('%') => Ok(parse_number(p)? / 100.0),
        Some(p) => parse_number(p),
    }
}

fn parse_rgb_args(args: &str) -> ThumbResult<Rgba8> {
    let parts = split_args(args);
    if parts.len() != 3 && parts.len() != 4 {
        return Err(ThumbError::validation("rgb() expects 3 or 4 components"));
    }
    let channel = |p: &str| -> ThumbResult<u8> {
        let v = parse_number(p)?;
        let v = if p.ends_with('%') { v * 2.55 } else { v };
        Ok(v.round().clamp(0.0, 255.0) as u8)
    };
    let a = parse_alpha(parts.get(3))?;
    Ok(Rgba8::new(
        channel(parts[0])?,
        channel(parts[1])?,
        channel(parts[2])?,
        unit_to_u8(a),
    ))
}

fn parse_hsl_args(args: &str) -> ThumbResult<Rgba8> {
    let parts = split_args(args);
    if parts.len() != 3 && parts.len() != 4 {
        return Err(ThumbError::validation("hsl() expects 3 or 4 components"));
    }
    let h = parse_number(parts[0])?;
    let s = parse_number(parts[1])? / 100.0;
    let l = parse_number(parts[2])? / 100.0;
    let a = parse_alpha(parts.get(3))?;
    let (r, g, b) = hsl_to_rgb(h, s, l);
    Ok(Rgba8::new(
        unit_to_u8(r),
        unit_to_u8(g),
        unit_to_u8(b),
        unit_to_u8(a),
    ))
}

fn unit_to_u8(x: f64) -> u8 {
    (x.clamp(0.0, 1.0) * 255.0).round() as u8
}

fn hsl_to_rgb(h: f64, s: f64, l: f64) -> (f64, f64, f64) {
    let h = (h % 360.0 + 360.0) % 360.0 / 360.0;
    let s = s.clamp(0.0, 1.0);
    let l = l.clamp(0.0, 1.0);

    if s == 0.0 {
        return (l, l, l);
    }

    fn hue_to_rgb(p: f64, q: f64, mut t: f64) -> f64 {
        if t < 0.0 {
            t += 1.0;
        }
        if t > 1.0 {
            t -= 1.0;
        }
        if t < 1.0 / 6.0 {
            return p + (q - p) * 6.0 * t;
        }
        if t < 1.0 / 2.0 {
            return q;
        }
        if t < 2.0 / 3.0 {
            return p + (q - p) * (2.0 / 3.0 - t) * 6.0;
        }
        p
    }

    let q = if l < 0.5 {
        l * (1.0 + s)
    } else {
        l + s - l * s
    };
    let p = 2.0 * l - q;

    (
        hue_to_rgb(p, q, h + 1.0 / 3.0),
        hue_to_rgb(p, q, h),
        hue_to_rgb(p, q, h - 1.0 / 3.0),
    )
}

fn named(s: &str) -> Option<Rgba8> {
    let c = match s {
        "transparent" => Rgba8::TRANSPARENT,
        "black" => Rgba8::new(0, 0, 0, 255),
        "white" => Rgba8::new(255, 255, 255, 255),
        "red" => Rgba8::new(255, 0, 0, 255),
        "lime" => Rgba8::new(0, 255, 0, 255),
        "green" => Rgba8::new(0, 128, 0, 255),
        "blue" => Rgba8::new(0, 0, 255, 255),
        "yellow" => Rgba8::new(255, 255, 0, 255),
        "cyan" | "aqua" => Rgba8::new(0, 255, 255, 255),
        "magenta" | "fuchsia" => Rgba8::new(255, 0, 255, 255),
        "orange" => Rgba8::new(255, 165, 0, 255),
        "purple" => Rgba8::new(128, 0, 128, 255),
        "pink" => Rgba8::new(255, 192, 203, 255),
        "gray" | "grey" => Rgba8::new(128, 128, 128, 255),
        "silver" => Rgba8::new(192, 192, 192, 255),
        "maroon" => Rgba8::new(128, 0, 0, 255),
        "navy" => Rgba8::new(0, 0, 128, 255),
        "teal" => Rgba8::new(0, 128, 128, 255),
        "olive" => Rgba8::new(128, 128, 0, 255),
        "gold" => Rgba8::new(255, 215, 0, 255),
        _ => return None,
    };
    Some(c)
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/color.rs"]
mod tests;
