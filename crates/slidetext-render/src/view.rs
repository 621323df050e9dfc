//! Projection of a box record onto CSS declarations.

use slidetext_core::{BoxId, OverlayEditor, SlideId, TextBox};

/// Everything a renderer needs to draw one box.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxView {
    pub id: BoxId,
    pub slide: SlideId,
    pub text: String,
    pub left: f64,
    pub top: f64,
    pub font_size: f64,
    pub color: String,
    pub font_family: String,
    /// Whether the selection marker is shown.
    pub active: bool,
}

impl BoxView {
    pub fn new(text_box: &TextBox, active: bool) -> Self {
        Self {
            id: text_box.id(),
            slide: text_box.slide(),
            text: text_box.content().to_string(),
            left: text_box.position.x,
            top: text_box.position.y,
            font_size: text_box.style.font_size,
            color: text_box.style.color.to_hex(),
            font_family: text_box.style.font_family.clone(),
            active,
        }
    }

    /// View of a box as the editor currently sees it.
    pub fn of(editor: &OverlayEditor, id: BoxId) -> Option<Self> {
        let text_box = editor.document().get(id)?;
        Some(Self::new(text_box, editor.selected() == Some(id)))
    }

    /// CSS property/value pairs for the element's inline style.
    pub fn declarations(&self) -> [(&'static str, String); 5] {
        [
            ("left", format!("{}px", self.left)),
            ("top", format!("{}px", self.top)),
            ("font-size", format!("{}px", self.font_size)),
            ("color", self.color.clone()),
            ("font-family", self.font_family.clone()),
        ]
    }

    /// The declarations joined into an inline `style` attribute.
    pub fn style_attribute(&self) -> String {
        self.declarations()
            .iter()
            .map(|(property, value)| format!("{property}: {value};"))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slidetext_core::{BoxStyle, FontColor};

    #[test]
    fn test_declarations() {
        let text_box = TextBox::new(
            SlideId(2),
            "Hello",
            BoxStyle::new(24.0, FontColor::new(255, 0, 0), "Arial"),
        );
        let view = BoxView::new(&text_box, true);
        assert_eq!(view.slide, SlideId(2));
        assert!(view.active);
        assert_eq!(
            view.style_attribute(),
            "left: 40px; top: 40px; font-size: 24px; color: #ff0000; font-family: Arial;"
        );
    }

    #[test]
    fn test_view_of_tracks_selection() {
        let mut editor = OverlayEditor::new();
        let a = editor.create("a", BoxStyle::default(), SlideId(0)).unwrap();
        let b = editor.create("b", BoxStyle::default(), SlideId(0)).unwrap();
        assert!(!BoxView::of(&editor, a).unwrap().active);
        assert!(BoxView::of(&editor, b).unwrap().active);
        assert!(BoxView::of(&editor, BoxId::nil()).is_none());
    }
}
