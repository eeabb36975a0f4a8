//! Color token parsing for the color form.
//!
//! Accepts `#RRGGBB`, `#RGB`, `0xRRGGBB`, `0x#RRGGBB`, `rgb(r, g, b)` (numbers or
//! percentages) and the named colors of the Discord palette.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::draft::Rgb;
use crate::error::ValidationError;

static RGB_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^rgb\(\s*([0-9]{1,3}%?)\s*,\s*([0-9]{1,3}%?)\s*,\s*([0-9]{1,3}%?)\s*\)$")
        .expect("rgb pattern is valid")
});

const NAMED: &[(&str, u32)] = &[
    ("default", 0x000000),
    ("teal", 0x1ABC9C),
    ("dark_teal", 0x11806A),
    ("brand_green", 0x57F287),
    ("green", 0x2ECC71),
    ("dark_green", 0x1F8B4C),
    ("blue", 0x3498DB),
    ("dark_blue", 0x206694),
    ("purple", 0x9B59B6),
    ("dark_purple", 0x71368A),
    ("magenta", 0xE91E63),
    ("dark_magenta", 0xAD1457),
    ("gold", 0xF1C40F),
    ("dark_gold", 0xC27C0E),
    ("orange", 0xE67E22),
    ("dark_orange", 0xA84300),
    ("brand_red", 0xED4245),
    ("red", 0xE74C3C),
    ("dark_red", 0x992D22),
    ("lighter_grey", 0x95A5A6),
    ("lighter_gray", 0x95A5A6),
    ("dark_grey", 0x607D8B),
    ("dark_gray", 0x607D8B),
    ("light_grey", 0x979C9F),
    ("light_gray", 0x979C9F),
    ("darker_grey", 0x546E7A),
    ("darker_gray", 0x546E7A),
    ("og_blurple", 0x7289DA),
    ("blurple", 0x5865F2),
    ("greyple", 0x99AAB5),
    ("dark_theme", 0x36393F),
    ("fuchsia", 0xEB459E),
    ("yellow", 0xFEE75C),
    ("nitro_pink", 0xF47FFF),
    ("embed_background", 0x2B2D31),
];

/// Parse a color token typed by the user.
pub fn parse_color(raw: &str) -> Result<Rgb, ValidationError> {
    let invalid = || ValidationError::InvalidColor {
        input: raw.to_string(),
    };
    let token = raw.trim().to_ascii_lowercase();
    if token.is_empty() {
        return Err(invalid());
    }

    if let Some(hex) = token.strip_prefix('#') {
        return parse_hex(hex).ok_or_else(invalid);
    }
    if let Some(rest) = token.strip_prefix("0x") {
        let hex = rest.strip_prefix('#').unwrap_or(rest);
        return parse_hex(hex).ok_or_else(invalid);
    }
    if token.starts_with("rgb") {
        return parse_rgb(&token).ok_or_else(invalid);
    }

    let name = token.replace(' ', "_");
    NAMED
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, v)| Rgb::new(*v))
        .ok_or_else(invalid)
}

fn parse_hex(hex: &str) -> Option<Rgb> {
    let expanded: String = match hex.len() {
        3 => hex.chars().flat_map(|c| [c, c]).collect(),
        1..=6 => hex.to_string(),
        _ => return None,
    };
    if !expanded.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    u32::from_str_radix(&expanded, 16).ok().map(Rgb::new)
}

fn parse_rgb(token: &str) -> Option<Rgb> {
    let caps = RGB_PATTERN.captures(token)?;
    let r = component(&caps[1])?;
    let g = component(&caps[2])?;
    let b = component(&caps[3])?;
    Some(Rgb::from_rgb(r, g, b))
}

fn component(raw: &str) -> Option<u8> {
    if let Some(pct) = raw.strip_suffix('%') {
        let pct: u32 = pct.parse().ok()?;
        if pct > 100 {
            return None;
        }
        return Some(((pct as f64 / 100.0) * 255.0).round() as u8);
    }
    let value: u32 = raw.parse().ok()?;
    u8::try_from(value).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_sets_color_exactly() {
        assert_eq!(parse_color("#00FF00"), Ok(Rgb::new(0x00FF00)));
        assert_eq!(parse_color("0x123abc"), Ok(Rgb::new(0x123ABC)));
        assert_eq!(parse_color("0x#ffffff"), Ok(Rgb::new(0xFFFFFF)));
    }

    #[test]
    fn shorthand_hex_is_doubled() {
        assert_eq!(parse_color("#fa0"), Ok(Rgb::new(0xFFAA00)));
    }

    #[test]
    fn rgb_function() {
        assert_eq!(parse_color("rgb(255, 0, 10)"), Ok(Rgb::from_rgb(255, 0, 10)));
        assert_eq!(parse_color("rgb(100%,0%,50%)"), Ok(Rgb::from_rgb(255, 0, 128)));
        assert!(parse_color("rgb(256, 0, 0)").is_err());
    }

    #[test]
    fn named_colors() {
        assert_eq!(parse_color("Blurple"), Ok(Rgb::new(0x5865F2)));
        assert_eq!(parse_color("dark gray"), Ok(Rgb::new(0x607D8B)));
        assert_eq!(parse_color("red"), Ok(Rgb::new(0xE74C3C)));
    }

    #[test]
    fn invalid_tokens() {
        for raw in ["#zzz", "notacolor", "", "#1234567", "from_rgb"] {
            assert_eq!(
                parse_color(raw),
                Err(ValidationError::InvalidColor { input: raw.into() }),
                "{raw:?} should be rejected"
            );
        }
    }
}
