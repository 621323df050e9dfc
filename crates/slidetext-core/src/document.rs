//! Overlay document: every box record and the slide containers they live on.

use crate::slide_host::SlideId;
use crate::text_box::{BoxId, TextBox};
use kurbo::Size;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// Serializable view of a document, boxes grouped by slide in insertion order.
#[derive(Debug, Serialize)]
pub struct DocumentSnapshot<'a> {
    pub boxes: Vec<&'a TextBox>,
}

/// All overlay boxes, keyed by ID.
#[derive(Debug, Clone, Default)]
pub struct OverlayDocument {
    boxes: HashMap<BoxId, TextBox>,
    /// Boxes of each slide in the order they were appended.
    slide_order: BTreeMap<SlideId, Vec<BoxId>>,
    /// Content-box size of each slide container, as last measured.
    slide_sizes: HashMap<SlideId, Size>,
}

impl OverlayDocument {
    /// Create an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a box to its slide.
    pub fn add_box(&mut self, text_box: TextBox) -> BoxId {
        let id = text_box.id();
        self.slide_order.entry(text_box.slide()).or_default().push(id);
        self.boxes.insert(id, text_box);
        id
    }

    pub fn get(&self, id: BoxId) -> Option<&TextBox> {
        self.boxes.get(&id)
    }

    pub fn get_mut(&mut self, id: BoxId) -> Option<&mut TextBox> {
        self.boxes.get_mut(&id)
    }

    pub fn contains(&self, id: BoxId) -> bool {
        self.boxes.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    /// Boxes of one slide, in insertion order.
    pub fn boxes_on(&self, slide: SlideId) -> impl Iterator<Item = &TextBox> {
        self.slide_order
            .get(&slide)
            .into_iter()
            .flatten()
            .filter_map(|id| self.boxes.get(id))
    }

    /// Every box, slide by slide.
    pub fn boxes_ordered(&self) -> impl Iterator<Item = &TextBox> {
        self.slide_order
            .values()
            .flatten()
            .filter_map(|id| self.boxes.get(id))
    }

    /// Record the measured content-box size of a slide container.
    pub fn set_slide_size(&mut self, slide: SlideId, size: Size) {
        self.slide_sizes.insert(slide, size);
    }

    pub fn slide_size(&self, slide: SlideId) -> Option<Size> {
        self.slide_sizes.get(&slide).copied()
    }

    pub fn snapshot(&self) -> DocumentSnapshot<'_> {
        DocumentSnapshot {
            boxes: self.boxes_ordered().collect(),
        }
    }

    /// Serialize the current boxes to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.snapshot())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text_box::BoxStyle;

    #[test]
    fn test_add_and_lookup() {
        let mut doc = OverlayDocument::new();
        let id = doc.add_box(TextBox::new(SlideId(0), "Hello", BoxStyle::default()));
        assert!(doc.contains(id));
        assert_eq!(doc.get(id).map(TextBox::content), Some("Hello"));
        assert_eq!(doc.len(), 1);
    }

    #[test]
    fn test_boxes_grouped_by_slide() {
        let mut doc = OverlayDocument::new();
        let a = doc.add_box(TextBox::new(SlideId(1), "a", BoxStyle::default()));
        let b = doc.add_box(TextBox::new(SlideId(0), "b", BoxStyle::default()));
        let c = doc.add_box(TextBox::new(SlideId(1), "c", BoxStyle::default()));

        let on_one: Vec<_> = doc.boxes_on(SlideId(1)).map(TextBox::id).collect();
        assert_eq!(on_one, vec![a, c]);
        let all: Vec<_> = doc.boxes_ordered().map(TextBox::id).collect();
        assert_eq!(all, vec![b, a, c]);
        assert_eq!(doc.boxes_on(SlideId(5)).count(), 0);
    }

    #[test]
    fn test_slide_sizes() {
        let mut doc = OverlayDocument::new();
        assert_eq!(doc.slide_size(SlideId(0)), None);
        doc.set_slide_size(SlideId(0), Size::new(800.0, 600.0));
        assert_eq!(doc.slide_size(SlideId(0)), Some(Size::new(800.0, 600.0)));
    }

    #[test]
    fn test_json_snapshot() {
        let mut doc = OverlayDocument::new();
        doc.add_box(TextBox::new(SlideId(0), "Hello", BoxStyle::default()));
        let json = doc.to_json().unwrap();
        assert!(json.contains("\"content\": \"Hello\""));
        assert!(!json.contains("measured_size"));
    }
}
