//! Font colour representation and CSS colour parsing.

use serde::{Deserialize, Serialize};

/// An opaque RGB colour used for box text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FontColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl FontColor {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const fn black() -> Self {
        Self::new(0, 0, 0)
    }

    /// Parse a CSS colour value.
    ///
    /// Accepts `#rgb`, `#rrggbb` and the functional `rgb()`/`rgba()` forms
    /// that computed styles report. Channels above 255 saturate.
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        if let Some(hex) = value.strip_prefix('#') {
            return Self::parse_hex(hex);
        }
        Self::parse_channels(value)
    }

    /// Parse a CSS colour value, falling back to black.
    pub fn parse_or_black(value: &str) -> Self {
        Self::parse(value).unwrap_or_else(Self::black)
    }

    fn parse_hex(hex: &str) -> Option<Self> {
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        match hex.len() {
            3 => {
                let mut channels = hex.chars().map(|c| {
                    // Single digit shorthand: `f` expands to `ff`
                    let v = c.to_digit(16).unwrap_or(0) as u8;
                    v * 17
                });
                Some(Self::new(channels.next()?, channels.next()?, channels.next()?))
            }
            6 => {
                let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
                Some(Self::new(channel(0)?, channel(2)?, channel(4)?))
            }
            _ => None,
        }
    }

    /// Takes the first three digit runs of the value as channels.
    fn parse_channels(value: &str) -> Option<Self> {
        let mut channels = value
            .split(|c: char| !c.is_ascii_digit())
            .filter(|run| !run.is_empty())
            .map(|run| run.parse::<u32>().map(|v| v.min(255) as u8).unwrap_or(u8::MAX));
        let r = channels.next()?;
        let g = channels.next()?;
        let b = channels.next()?;
        Some(Self::new(r, g, b))
    }

    /// Six-digit lowercase hex form, e.g. `#ff0000`.
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Convert any CSS colour string to six-digit hex, defaulting to black.
pub fn css_color_to_hex(value: &str) -> String {
    FontColor::parse_or_black(value).to_hex()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_forms() {
        assert_eq!(FontColor::parse("#ff0000"), Some(FontColor::new(255, 0, 0)));
        assert_eq!(FontColor::parse("#000"), Some(FontColor::black()));
        assert_eq!(FontColor::parse("#1aF"), Some(FontColor::new(0x11, 0xaa, 0xff)));
        assert_eq!(FontColor::parse("#12345"), None);
        assert_eq!(FontColor::parse("#zzzzzz"), None);
    }

    #[test]
    fn test_parse_computed_rgb() {
        assert_eq!(
            FontColor::parse("rgb(255, 128, 0)"),
            Some(FontColor::new(255, 128, 0))
        );
        assert_eq!(
            FontColor::parse("rgba(10, 20, 30, 0.5)"),
            Some(FontColor::new(10, 20, 30))
        );
    }

    #[test]
    fn test_unparseable_defaults_to_black() {
        assert_eq!(css_color_to_hex(""), "#000000");
        assert_eq!(css_color_to_hex("rgb(12)"), "#000000");
        assert_eq!(css_color_to_hex("transparent"), "#000000");
    }

    #[test]
    fn test_channels_saturate() {
        assert_eq!(css_color_to_hex("rgb(300, 0, 0)"), "#ff0000");
    }

    #[test]
    fn test_to_hex_is_lowercase() {
        assert_eq!(FontColor::new(0xAB, 0xCD, 0xEF).to_hex(), "#abcdef");
    }
}
