//! Control panel fields mirrored to and from the selected box.

use crate::color::{FontColor, css_color_to_hex};
use crate::text_box::{BoxStyle, DEFAULT_FONT_FAMILY, DEFAULT_FONT_SIZE, TextBox};
use serde::{Deserialize, Serialize};

/// Raw values of the control-panel inputs.
///
/// Fields hold exactly what the inputs hold, so an empty string means
/// the user cleared the field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlPanel {
    pub text: String,
    pub font_size: String,
    pub color: String,
    pub font_family: String,
}

impl Default for ControlPanel {
    fn default() -> Self {
        Self {
            text: String::new(),
            font_size: format_font_size(DEFAULT_FONT_SIZE),
            color: FontColor::black().to_hex(),
            font_family: DEFAULT_FONT_FAMILY.to_string(),
        }
    }
}

impl ControlPanel {
    /// Load a box's attributes into the fields.
    pub fn load_from(&mut self, text_box: &TextBox) {
        self.text = text_box.content().to_string();
        self.font_size = format_font_size(text_box.style.font_size);
        self.color = text_box.style.color.to_hex();
        self.font_family = primary_font_family(&text_box.style.font_family);
    }

    /// Resolve the style fields, substituting defaults for empty inputs.
    ///
    /// A size of 0 is kept. Sizes that do not parse, and negative sizes,
    /// which CSS rejects, fall back to the default.
    pub fn style(&self) -> BoxStyle {
        let font_size = self
            .font_size
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|size| size.is_finite() && *size >= 0.0)
            .unwrap_or(DEFAULT_FONT_SIZE);
        let color = if self.color.trim().is_empty() {
            FontColor::black()
        } else {
            FontColor::parse_or_black(&self.color)
        };
        let font_family = match self.font_family.trim() {
            "" => DEFAULT_FONT_FAMILY.to_string(),
            family => family.to_string(),
        };
        BoxStyle::new(font_size, color, font_family)
    }
}

/// Leading integer of a CSS pixel length such as `"24px"`.
///
/// Returns the default size when no positive integer leads the value.
pub fn parse_font_size(css: &str) -> u32 {
    let css = css.trim();
    let digits = css
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map_or(css, |(end, _)| &css[..end]);
    digits
        .parse::<u32>()
        .ok()
        .filter(|size| *size > 0)
        .unwrap_or(DEFAULT_FONT_SIZE as u32)
}

/// Size field text for a pixel size.
pub fn format_font_size(size: f64) -> String {
    parse_font_size(&format!("{size}px")).to_string()
}

/// First name of a CSS font-family list, quotes stripped.
pub fn primary_font_family(css: &str) -> String {
    let first = css.split(',').next().unwrap_or_default();
    let name: String = first.chars().filter(|c| *c != '"' && *c != '\'').collect();
    match name.trim() {
        "" => DEFAULT_FONT_FAMILY.to_string(),
        name => name.to_string(),
    }
}

/// Hex field text for a computed CSS colour.
pub fn color_field(css: &str) -> String {
    css_color_to_hex(css)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slide_host::SlideId;

    #[test]
    fn test_parse_font_size() {
        assert_eq!(parse_font_size("24px"), 24);
        assert_eq!(parse_font_size("31.5px"), 31);
        assert_eq!(parse_font_size("px"), 24);
        assert_eq!(parse_font_size(""), 24);
        assert_eq!(parse_font_size("0px"), 24);
        assert_eq!(parse_font_size("48"), 48);
    }

    #[test]
    fn test_format_font_size_truncates() {
        assert_eq!(format_font_size(24.0), "24");
        assert_eq!(format_font_size(18.7), "18");
        assert_eq!(format_font_size(f64::NAN), "24");
    }

    #[test]
    fn test_primary_font_family() {
        assert_eq!(primary_font_family("\"Times New Roman\", serif"), "Times New Roman");
        assert_eq!(primary_font_family("'Fira Code'"), "Fira Code");
        assert_eq!(primary_font_family("Georgia"), "Georgia");
        assert_eq!(primary_font_family(""), "Arial");
    }

    #[test]
    fn test_style_defaults_for_empty_fields() {
        let panel = ControlPanel {
            text: "x".to_string(),
            font_size: String::new(),
            color: String::new(),
            font_family: "  ".to_string(),
        };
        assert_eq!(panel.style(), BoxStyle::default());
    }

    #[test]
    fn test_style_from_fields() {
        let panel = ControlPanel {
            text: String::new(),
            font_size: "36".to_string(),
            color: "#00ff00".to_string(),
            font_family: "Georgia".to_string(),
        };
        let style = panel.style();
        assert!((style.font_size - 36.0).abs() < f64::EPSILON);
        assert_eq!(style.color, FontColor::new(0, 255, 0));
        assert_eq!(style.font_family, "Georgia");
    }

    #[test]
    fn test_style_keeps_zero_size() {
        let mut panel = ControlPanel {
            font_size: "0".to_string(),
            ..ControlPanel::default()
        };
        assert_eq!(panel.style().font_size, 0.0);

        panel.font_size = "-5".to_string();
        assert_eq!(panel.style().font_size, DEFAULT_FONT_SIZE);
        panel.font_size = "big".to_string();
        assert_eq!(panel.style().font_size, DEFAULT_FONT_SIZE);
    }

    #[test]
    fn test_load_from_box() {
        let text_box = TextBox::new(
            SlideId(0),
            "Hello",
            BoxStyle::new(32.0, FontColor::new(255, 0, 0), "\"Open Sans\", sans-serif"),
        );
        let mut panel = ControlPanel::default();
        panel.load_from(&text_box);
        assert_eq!(panel.text, "Hello");
        assert_eq!(panel.font_size, "32");
        assert_eq!(panel.color, "#ff0000");
        assert_eq!(panel.font_family, "Open Sans");
    }
}
