//! In-memory renderer that records element state instead of drawing.

use crate::renderer::{RenderResult, Renderer, RendererError};
use crate::view::BoxView;
use kurbo::Size;
use serde::Serialize;
use slidetext_core::{BoxId, ControlPanel, PointerId};
use std::collections::HashMap;

/// Recorded state of one box element.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ElementSnapshot {
    pub slide: usize,
    pub text: String,
    /// Inline style attribute.
    pub style: String,
    /// Whether the selection marker is applied.
    pub active: bool,
    pub editable: bool,
    pub focused: bool,
    pub captured_pointer: Option<PointerId>,
}

impl ElementSnapshot {
    fn from_view(view: &BoxView) -> Self {
        Self {
            slide: view.slide.0,
            text: view.text.clone(),
            style: view.style_attribute(),
            active: view.active,
            editable: false,
            focused: false,
            captured_pointer: None,
        }
    }
}

/// Renderer keeping element state in memory, for native shells and tests.
#[derive(Debug, Default)]
pub struct SnapshotRenderer {
    elements: HashMap<BoxId, ElementSnapshot>,
    controls: ControlPanel,
    /// Size every element measures at; unmeasured when `None`.
    element_size: Option<Size>,
    reject_capture: bool,
}

impl SnapshotRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report a fixed rendered size for every element.
    pub fn with_element_size(mut self, size: Size) -> Self {
        self.element_size = Some(size);
        self
    }

    /// Fail every pointer-capture request, as a detached element would.
    pub fn rejecting_pointer_capture(mut self) -> Self {
        self.reject_capture = true;
        self
    }

    pub fn element(&self, id: BoxId) -> Option<&ElementSnapshot> {
        self.elements.get(&id)
    }

    /// Last control-panel values written by the editor.
    pub fn controls(&self) -> &ControlPanel {
        &self.controls
    }

    fn element_mut(&mut self, id: BoxId) -> RenderResult<&mut ElementSnapshot> {
        self.elements
            .get_mut(&id)
            .ok_or(RendererError::MissingElement(id))
    }
}

impl Renderer for SnapshotRenderer {
    fn mount(&mut self, view: &BoxView) -> RenderResult<()> {
        self.elements.insert(view.id, ElementSnapshot::from_view(view));
        Ok(())
    }

    fn project(&mut self, view: &BoxView) -> RenderResult<()> {
        let element = self.element_mut(view.id)?;
        element.slide = view.slide.0;
        element.text = view.text.clone();
        element.style = view.style_attribute();
        element.active = view.active;
        Ok(())
    }

    fn measure(&self, id: BoxId) -> Option<Size> {
        self.elements.contains_key(&id).then_some(self.element_size?)
    }

    fn set_editing(&mut self, id: BoxId, editing: bool) -> RenderResult<()> {
        let element = self.element_mut(id)?;
        element.editable = editing;
        if editing {
            element.focused = true;
        }
        Ok(())
    }

    fn blur(&mut self, id: BoxId) -> RenderResult<()> {
        self.element_mut(id)?.focused = false;
        Ok(())
    }

    fn capture_pointer(&mut self, id: BoxId, pointer_id: PointerId) -> RenderResult<()> {
        if self.reject_capture {
            return Err(RendererError::Dom("pointer capture rejected".to_string()));
        }
        self.element_mut(id)?.captured_pointer = Some(pointer_id);
        Ok(())
    }

    fn release_pointer(&mut self, id: BoxId, pointer_id: PointerId) -> RenderResult<()> {
        let element = self.element_mut(id)?;
        if element.captured_pointer == Some(pointer_id) {
            element.captured_pointer = None;
        }
        Ok(())
    }

    fn sync_controls(&mut self, controls: &ControlPanel) -> RenderResult<()> {
        self.controls = controls.clone();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slidetext_core::{BoxStyle, SlideId, TextBox};

    #[test]
    fn test_project_requires_mount() {
        let mut renderer = SnapshotRenderer::new();
        let view = BoxView::new(&TextBox::new(SlideId(0), "x", BoxStyle::default()), false);
        assert!(renderer.project(&view).is_err());
        renderer.mount(&view).unwrap();
        assert!(renderer.project(&view).is_ok());
    }

    #[test]
    fn test_capture_and_release() {
        let mut renderer = SnapshotRenderer::new();
        let view = BoxView::new(&TextBox::new(SlideId(0), "x", BoxStyle::default()), false);
        renderer.mount(&view).unwrap();
        renderer.capture_pointer(view.id, 4).unwrap();
        assert_eq!(renderer.element(view.id).unwrap().captured_pointer, Some(4));
        renderer.release_pointer(view.id, 9).unwrap();
        assert_eq!(renderer.element(view.id).unwrap().captured_pointer, Some(4));
        renderer.release_pointer(view.id, 4).unwrap();
        assert_eq!(renderer.element(view.id).unwrap().captured_pointer, None);
    }

    #[test]
    fn test_measure_only_mounted() {
        let mut renderer = SnapshotRenderer::new().with_element_size(Size::new(10.0, 10.0));
        let view = BoxView::new(&TextBox::new(SlideId(0), "x", BoxStyle::default()), false);
        assert_eq!(renderer.measure(view.id), None);
        renderer.mount(&view).unwrap();
        assert_eq!(renderer.measure(view.id), Some(Size::new(10.0, 10.0)));
    }

    #[test]
    fn test_snapshot_serializes() {
        let mut renderer = SnapshotRenderer::new();
        let view = BoxView::new(&TextBox::new(SlideId(1), "x", BoxStyle::default()), true);
        renderer.mount(&view).unwrap();
        let json = serde_json::to_string(renderer.element(view.id).unwrap()).unwrap();
        assert!(json.contains("\"active\":true"));
        assert!(json.contains("\"slide\":1"));
    }
}
