//! Renderer trait abstraction and effect dispatch.

use crate::view::BoxView;
use kurbo::Size;
use slidetext_core::{BoxId, ControlPanel, Effect, OverlayEditor, PointerId};
use std::collections::BTreeSet;
use thiserror::Error;

/// Renderer errors.
#[derive(Debug, Error)]
pub enum RendererError {
    #[error("No element for box {0}")]
    MissingElement(BoxId),
    #[error("No container for slide {0}")]
    MissingSlide(usize),
    #[error("DOM error: {0}")]
    Dom(String),
}

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RendererError>;

/// Visual layer that box records are projected onto.
pub trait Renderer {
    /// Create the element for a new box inside its slide container.
    fn mount(&mut self, view: &BoxView) -> RenderResult<()>;

    /// Update an existing element from its view.
    fn project(&mut self, view: &BoxView) -> RenderResult<()>;

    /// Rendered size of a box element, if it can be measured.
    fn measure(&self, id: BoxId) -> Option<Size>;

    /// Toggle inline editing. Entering focuses the element with the caret
    /// at the end of its text.
    fn set_editing(&mut self, id: BoxId, editing: bool) -> RenderResult<()>;

    /// Move focus away from the element.
    fn blur(&mut self, id: BoxId) -> RenderResult<()>;

    /// Route every event of `pointer_id` to the element.
    fn capture_pointer(&mut self, id: BoxId, pointer_id: PointerId) -> RenderResult<()>;

    /// Stop routing `pointer_id` to the element.
    fn release_pointer(&mut self, id: BoxId, pointer_id: PointerId) -> RenderResult<()>;

    /// Write the control-panel values into the panel inputs.
    fn sync_controls(&mut self, controls: &ControlPanel) -> RenderResult<()>;
}

/// What a call to [`present`] did.
#[derive(Debug, Default)]
pub struct Presented {
    /// Boxes whose elements were created.
    pub mounted: Vec<BoxId>,
    /// Failures other than pointer capture, which is best-effort.
    pub errors: Vec<RendererError>,
}

/// Drain the editor's effects into a renderer.
///
/// Re-measures every box whose element changed and feeds the sizes back
/// so drag clamping sees the rendered footprint.
pub fn present(editor: &mut OverlayEditor, renderer: &mut dyn Renderer) -> Presented {
    let mut presented = Presented::default();
    let mut touched = BTreeSet::new();
    let mut controls_dirty = false;

    for effect in editor.take_effects() {
        let result = match effect {
            Effect::Mounted(id) => {
                touched.insert(id);
                with_view(editor, id, |view| renderer.mount(view))
                    .map(|()| presented.mounted.push(id))
            }
            Effect::Restyled(id) | Effect::MarkerChanged { id, .. } => {
                touched.insert(id);
                with_view(editor, id, |view| renderer.project(view))
            }
            Effect::EditingStarted(id) => renderer.set_editing(id, true),
            Effect::EditingEnded(id) => renderer.set_editing(id, false),
            Effect::BlurRequested(id) => renderer.blur(id),
            Effect::PointerCaptured { id, pointer_id } => {
                if let Err(err) = renderer.capture_pointer(id, pointer_id) {
                    log::debug!("Pointer capture failed: {}", err);
                    editor.pointer_capture_lost(id, pointer_id);
                }
                Ok(())
            }
            Effect::PointerReleased { id, pointer_id } => {
                if let Err(err) = renderer.release_pointer(id, pointer_id) {
                    log::debug!("Pointer release failed: {}", err);
                }
                Ok(())
            }
            Effect::ControlsChanged => {
                controls_dirty = true;
                Ok(())
            }
        };
        if let Err(err) = result {
            log::warn!("Render failed: {}", err);
            presented.errors.push(err);
        }
    }

    if controls_dirty {
        if let Err(err) = renderer.sync_controls(editor.controls()) {
            log::warn!("Control sync failed: {}", err);
            presented.errors.push(err);
        }
    }

    for id in touched {
        if let Some(size) = renderer.measure(id) {
            if let Err(err) = editor.set_box_size(id, size) {
                log::debug!("Measured size not stored: {}", err);
            }
        }
    }

    presented
}

fn with_view(
    editor: &OverlayEditor,
    id: BoxId,
    f: impl FnOnce(&BoxView) -> RenderResult<()>,
) -> RenderResult<()> {
    let view = BoxView::of(editor, id).ok_or(RendererError::MissingElement(id))?;
    f(&view)
}
