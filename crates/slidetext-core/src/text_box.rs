//! Overlay text box records.

use crate::color::FontColor;
use crate::slide_host::SlideId;
use kurbo::{Point, Rect, Size};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a text box.
pub type BoxId = Uuid;

/// Font size used when a size field is empty or unparseable.
pub const DEFAULT_FONT_SIZE: f64 = 24.0;
/// Font family used when a family field is empty.
pub const DEFAULT_FONT_FAMILY: &str = "Arial";

/// Font styling of a box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxStyle {
    /// Font size in pixels.
    pub font_size: f64,
    /// Text colour.
    pub color: FontColor,
    /// CSS font-family value. May be a comma-separated list.
    pub font_family: String,
}

impl Default for BoxStyle {
    fn default() -> Self {
        Self {
            font_size: DEFAULT_FONT_SIZE,
            color: FontColor::black(),
            font_family: DEFAULT_FONT_FAMILY.to_string(),
        }
    }
}

impl BoxStyle {
    pub fn new(font_size: f64, color: FontColor, font_family: impl Into<String>) -> Self {
        Self {
            font_size,
            color,
            font_family: font_family.into(),
        }
    }
}

/// A positioned, styled text node living on one slide.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextBox {
    pub(crate) id: BoxId,
    /// Slide container that owns this box.
    pub(crate) slide: SlideId,
    /// Offset of the top-left corner from the slide container, in pixels.
    pub position: Point,
    /// The text content.
    pub content: String,
    /// Font styling.
    pub style: BoxStyle,
    /// Rendered size reported by the renderer. Approximated when absent.
    #[serde(skip)]
    measured_size: Option<Size>,
}

impl TextBox {
    /// Where new boxes are placed on their slide.
    pub const DEFAULT_POSITION: Point = Point::new(40.0, 40.0);

    /// Create a box at the default position.
    pub fn new(slide: SlideId, content: impl Into<String>, style: BoxStyle) -> Self {
        Self {
            id: Uuid::new_v4(),
            slide,
            position: Self::DEFAULT_POSITION,
            content: content.into(),
            style,
            measured_size: None,
        }
    }

    /// Place the box at a specific offset.
    pub fn with_position(mut self, position: Point) -> Self {
        self.position = position;
        self
    }

    pub fn id(&self) -> BoxId {
        self.id
    }

    pub fn slide(&self) -> SlideId {
        self.slide
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// Replace the text content.
    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
        self.measured_size = None;
    }

    /// Replace the font styling.
    pub fn set_style(&mut self, style: BoxStyle) {
        self.style = style;
        self.measured_size = None;
    }

    /// Record the size the renderer laid the box out at.
    pub fn set_measured_size(&mut self, size: Size) {
        self.measured_size = Some(size);
    }

    pub fn measured_size(&self) -> Option<Size> {
        self.measured_size
    }

    /// Rendered footprint, measured when known and approximated otherwise.
    pub fn size(&self) -> Size {
        self.measured_size
            .unwrap_or_else(|| Size::new(self.approximate_width(), self.approximate_height()))
    }

    /// Footprint in slide coordinates.
    pub fn bounds(&self) -> Rect {
        Rect::from_origin_size(self.position, self.size())
    }

    /// Rough width from the longest line; real widths depend on the font.
    fn approximate_width(&self) -> f64 {
        let max_line_len = self
            .content
            .lines()
            .map(|line| line.chars().count())
            .max()
            .unwrap_or(0);
        max_line_len as f64 * self.style.font_size * 0.55
    }

    fn approximate_height(&self) -> f64 {
        let line_count = self.content.lines().count().max(1);
        line_count as f64 * self.style.font_size * 1.2
    }
}
