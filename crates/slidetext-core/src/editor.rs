//! The overlay editor: box factory, selection, drag and inline edit wired together.

use crate::color::FontColor;
use crate::controls::{ControlPanel, parse_font_size};
use crate::document::OverlayDocument;
use crate::drag::{DragController, DragState};
use crate::edit::{EditController, EditState, TextEditResult};
use crate::effect::{Effect, EffectQueue};
use crate::error::{EditorError, EditorResult};
use crate::input::{PointerId, PointerSample, TextKey};
use crate::selection::SelectionManager;
use crate::slide_host::{SlideHost, SlideId};
use crate::text_box::{BoxId, BoxStyle, DEFAULT_FONT_FAMILY, TextBox};
use kurbo::{Point, Size};

/// A box element that already existed before the editor started.
///
/// Style fields hold computed CSS strings and are parsed leniently.
#[derive(Debug, Clone, Default)]
pub struct AdoptedBox {
    pub content: String,
    /// Inline `left`, when the element had one.
    pub left: Option<f64>,
    /// Inline `top`, when the element had one.
    pub top: Option<f64>,
    /// Offset measured from the element's bounding box relative to its slide.
    pub measured_offset: Point,
    pub font_size: String,
    pub color: String,
    pub font_family: String,
}

impl AdoptedBox {
    /// Resolve the computed style strings, defaulting what does not parse.
    pub fn style(&self) -> BoxStyle {
        // Keep the full family list; only the control panel shows the first name.
        let font_family = match self.font_family.trim() {
            "" => DEFAULT_FONT_FAMILY.to_string(),
            family => family.to_string(),
        };
        BoxStyle::new(
            f64::from(parse_font_size(&self.font_size)),
            FontColor::parse_or_black(&self.color),
            font_family,
        )
    }

    /// Starting offset: inline offsets when set and non-zero, measured otherwise.
    pub fn position(&self) -> Point {
        let pick = |inline: Option<f64>, measured: f64| {
            inline.filter(|v| v.is_finite() && *v != 0.0).unwrap_or(measured)
        };
        Point::new(
            pick(self.left, self.measured_offset.x),
            pick(self.top, self.measured_offset.y),
        )
    }
}

/// Interaction controller for overlay text boxes.
///
/// Operations mutate the box records and queue [`Effect`]s; shells drain
/// them with [`OverlayEditor::take_effects`] and project them.
#[derive(Debug, Clone, Default)]
pub struct OverlayEditor {
    document: OverlayDocument,
    controls: ControlPanel,
    selection: SelectionManager,
    drag: DragController,
    edit: EditController,
    effects: EffectQueue,
}

impl OverlayEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn document(&self) -> &OverlayDocument {
        &self.document
    }

    pub fn controls(&self) -> &ControlPanel {
        &self.controls
    }

    /// Control-panel fields, for shells mirroring user input into them.
    pub fn controls_mut(&mut self) -> &mut ControlPanel {
        &mut self.controls
    }

    pub fn selected(&self) -> Option<BoxId> {
        self.selection.selected()
    }

    pub fn drag_state(&self, id: BoxId) -> DragState {
        self.drag.state(id)
    }

    pub fn edit_state(&self, id: BoxId) -> EditState {
        self.edit.state(id)
    }

    pub fn is_editing(&self, id: BoxId) -> bool {
        self.edit.is_editing(id)
    }

    /// Drain queued effects, oldest first.
    pub fn take_effects(&mut self) -> Vec<Effect> {
        self.effects.take()
    }

    pub fn has_pending_effects(&self) -> bool {
        !self.effects.is_empty()
    }

    /// Record a slide container's content-box size.
    pub fn set_slide_size(&mut self, slide: SlideId, size: Size) {
        self.document.set_slide_size(slide, size);
    }

    /// Record the rendered size of a box.
    pub fn set_box_size(&mut self, id: BoxId, size: Size) -> EditorResult<()> {
        let text_box = self.document.get_mut(id).ok_or(EditorError::UnknownBox(id))?;
        text_box.set_measured_size(size);
        Ok(())
    }

    fn box_mut(&mut self, id: BoxId) -> EditorResult<&mut TextBox> {
        self.document.get_mut(id).ok_or(EditorError::UnknownBox(id))
    }

    // --- Box factory ---

    /// Create a box on `slide` at the default position and select it.
    ///
    /// Returns `None` when `text` is blank.
    pub fn create(&mut self, text: &str, style: BoxStyle, slide: SlideId) -> Option<BoxId> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        let id = self.document.add_box(TextBox::new(slide, text, style));
        log::info!("Created box {} on slide {}", id, slide.0);
        self.effects.push(Effect::Mounted(id));
        if let Err(err) = self.select(id) {
            log::warn!("Could not select new box: {}", err);
        }
        Some(id)
    }

    /// Create a box on the active slide from the control panel, then blank
    /// the text field.
    pub fn add_text(&mut self, host: &dyn SlideHost) -> Option<BoxId> {
        if self.controls.text.trim().is_empty() {
            return None;
        }
        let Some(slide) = host.active_slide() else {
            log::debug!("No active slide, not adding text");
            return None;
        };
        let text = self.controls.text.clone();
        let style = self.controls.style();
        let id = self.create(&text, style, slide)?;
        self.controls.text.clear();
        self.effects.push(Effect::ControlsChanged);
        Some(id)
    }

    /// Take over a box element that exists outside the editor.
    pub fn adopt(&mut self, slide: SlideId, adopted: &AdoptedBox) -> BoxId {
        let text_box = TextBox::new(slide, adopted.content.clone(), adopted.style())
            .with_position(adopted.position());
        let id = self.document.add_box(text_box);
        log::info!("Adopted box {} on slide {}", id, slide.0);
        self.effects.push(Effect::Restyled(id));
        id
    }

    // --- Selection ---

    /// Make `id` the selected box and load it into the control panel.
    pub fn select(&mut self, id: BoxId) -> EditorResult<()> {
        self.selection
            .select(id, &self.document, &mut self.controls, &mut self.effects)
    }

    /// Drop the selection and blank the text field.
    pub fn clear_selection(&mut self) {
        self.selection.clear(&mut self.controls, &mut self.effects);
    }

    /// Explicit deselect action.
    pub fn deselect(&mut self) {
        self.clear_selection();
    }

    /// A click that landed outside every box.
    pub fn background_click(&mut self) {
        self.clear_selection();
    }

    /// The slide host reported a new active slide.
    pub fn slide_changed(&mut self) {
        log::debug!("Slide changed, clearing selection");
        self.clear_selection();
    }

    /// A click on a box selects it unless the box is being edited.
    pub fn box_clicked(&mut self, id: BoxId) -> EditorResult<()> {
        if self.edit.is_editing(id) {
            return Ok(());
        }
        self.select(id)
    }

    /// Push the control-panel fields onto the selected box.
    pub fn apply(&mut self) -> EditorResult<()> {
        let Some(id) = self.selection.selected() else {
            log::warn!("Apply requested with no box selected");
            return Err(EditorError::NothingSelected);
        };
        let text = self.controls.text.clone();
        let style = self.controls.style();
        let text_box = self.box_mut(id)?;
        text_box.set_content(text.clone());
        text_box.set_style(style);
        if let Some(buffer) = self.edit.buffer_mut(id) {
            buffer.replace(text);
        }
        self.effects.push(Effect::Restyled(id));
        Ok(())
    }

    // --- Drag ---

    /// Pointer pressed on a box. Returns whether a drag started.
    pub fn pointer_down(
        &mut self,
        id: BoxId,
        sample: &PointerSample,
        host: &mut dyn SlideHost,
    ) -> EditorResult<bool> {
        let start_offset = self
            .document
            .get(id)
            .ok_or(EditorError::UnknownBox(id))?
            .position;
        if self.edit.is_editing(id) || !self.drag.begin(id, sample, start_offset) {
            return Ok(false);
        }
        self.select(id)?;
        host.set_gesture_navigation_enabled(false);
        self.effects.push(Effect::PointerCaptured {
            id,
            pointer_id: sample.pointer_id,
        });
        log::debug!("Drag of box {} started", id);
        Ok(true)
    }

    /// Pointer moved over a box. Returns whether the box moved.
    pub fn pointer_move(&mut self, id: BoxId, sample: &PointerSample) -> EditorResult<bool> {
        if self.edit.is_editing(id) {
            return Ok(false);
        }
        let text_box = self.document.get(id).ok_or(EditorError::UnknownBox(id))?;
        let parent = self.document.slide_size(text_box.slide());
        let Some(target) = self.drag.drag_to(id, sample, text_box.size(), parent) else {
            return Ok(false);
        };
        if target == text_box.position {
            return Ok(false);
        }
        self.box_mut(id)?.position = target;
        self.effects.push(Effect::Restyled(id));
        Ok(true)
    }

    /// Pointer released over a box.
    pub fn pointer_up(&mut self, id: BoxId, sample: &PointerSample, host: &mut dyn SlideHost) -> bool {
        self.finish_drag(id, sample.pointer_id, host)
    }

    /// The platform cancelled the pointer sequence.
    pub fn pointer_cancel(
        &mut self,
        id: BoxId,
        sample: &PointerSample,
        host: &mut dyn SlideHost,
    ) -> bool {
        self.finish_drag(id, sample.pointer_id, host)
    }

    /// The box element lost capture of the pointer.
    pub fn pointer_capture_lost(&mut self, id: BoxId, pointer_id: PointerId) {
        self.drag.capture_lost(id, pointer_id);
    }

    fn finish_drag(&mut self, id: BoxId, pointer_id: PointerId, host: &mut dyn SlideHost) -> bool {
        let finished = self.drag.finish(id, pointer_id);
        if let Some(session) = &finished {
            self.effects.push(Effect::PointerReleased {
                id,
                pointer_id: session.pointer_id,
            });
            log::debug!("Drag of box {} finished", id);
        }
        if !self.drag.is_dragging() {
            host.set_gesture_navigation_enabled(true);
        }
        finished.is_some()
    }

    // --- Inline edit ---

    /// Enter inline editing of a box.
    pub fn double_click(&mut self, id: BoxId) -> EditorResult<()> {
        let content = self
            .document
            .get(id)
            .ok_or(EditorError::UnknownBox(id))?
            .content()
            .to_string();
        if self.edit.is_editing(id) {
            return Ok(());
        }
        if let Some(other) = self.edit.editing() {
            self.focus_lost(other);
        }
        self.edit.begin(id, &content);
        self.effects.push(Effect::EditingStarted(id));
        log::debug!("Editing box {}", id);
        Ok(())
    }

    /// Key pressed while a box has focus.
    ///
    /// `ExitEdit` for Enter means the shell must suppress the newline.
    pub fn key_down(&mut self, id: BoxId, key: &TextKey) -> TextEditResult {
        let result = self.edit.handle_key(id, key);
        match result {
            TextEditResult::Handled => self.write_back_buffer(id),
            TextEditResult::ExitEdit => {
                self.effects.push(Effect::BlurRequested(id));
                self.focus_lost(id);
            }
            TextEditResult::NotHandled => {}
        }
        result
    }

    /// Replace the edited text with the element's live content.
    pub fn sync_edit_text(&mut self, id: BoxId, text: &str) {
        if let Some(buffer) = self.edit.buffer_mut(id) {
            buffer.replace(text);
            self.write_back_buffer(id);
        }
    }

    fn write_back_buffer(&mut self, id: BoxId) {
        let Some(text) = self.edit.buffer().map(|b| b.text().to_string()) else {
            return;
        };
        if let Some(text_box) = self.document.get_mut(id) {
            if text_box.content() != text {
                text_box.set_content(text);
                self.effects.push(Effect::Restyled(id));
            }
        }
    }

    /// The box lost focus: leave editing and mirror its text into the
    /// panel if it is selected.
    pub fn focus_lost(&mut self, id: BoxId) {
        if !self.edit.end(id) {
            return;
        }
        self.effects.push(Effect::EditingEnded(id));
        if self.selection.is_selected(id) {
            if let Some(text_box) = self.document.get(id) {
                self.controls.text = text_box.content().to_string();
                self.effects.push(Effect::ControlsChanged);
            }
        }
        log::debug!("Finished editing box {}", id);
    }
}
