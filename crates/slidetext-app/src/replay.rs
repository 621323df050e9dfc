//! Replays a scripted UI session against an in-memory slide host.
//!
//! Scripts are JSON documents listing slide sizes and UI events. Boxes are
//! referred to by creation order, starting at 0.

use kurbo::{Point, Size};
use serde::{Deserialize, Serialize};
use slidetext_core::{
    BoxId, BoxStyle, ControlPanel, EditorError, FontColor, MemorySlideHost, OverlayEditor,
    PointerSample, SlideHost, SlideId, TextBox, TextKey,
};
use slidetext_render::{SnapshotRenderer, present};
use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;
use thiserror::Error;

/// Replay errors.
#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid session script: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Event {event} refers to box {index}, which does not exist")]
    UnknownBox { event: usize, index: usize },
    #[error("Event {event} refers to slide {index}, which does not exist")]
    UnknownSlide { event: usize, index: usize },
}

/// Result type for replay operations.
pub type ReplayResult<T> = Result<T, ReplayError>;

/// Width and height in CSS pixels.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: f64,
    pub height: f64,
}

/// Pointer fields shared by pointer events.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PointerInput {
    #[serde(rename = "box")]
    pub box_index: usize,
    #[serde(default = "default_pointer_id")]
    pub pointer_id: i32,
    pub x: f64,
    pub y: f64,
    #[serde(default = "default_primary")]
    pub primary: bool,
}

fn default_pointer_id() -> i32 {
    1
}

fn default_primary() -> bool {
    true
}

impl PointerInput {
    fn sample(&self) -> PointerSample {
        PointerSample {
            pointer_id: self.pointer_id,
            is_primary: self.primary,
            position: Point::new(self.x, self.y),
        }
    }
}

/// One scripted UI event.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScriptEvent {
    /// Overwrite control-panel fields; absent fields keep their value.
    SetControls {
        text: Option<String>,
        font_size: Option<String>,
        color: Option<String>,
        font_family: Option<String>,
    },
    /// Press the add-text button.
    AddText,
    /// Create a box directly on a slide.
    Create {
        text: String,
        slide: usize,
        #[serde(default)]
        font_size: Option<f64>,
        #[serde(default)]
        color: Option<String>,
        #[serde(default)]
        font_family: Option<String>,
    },
    Apply,
    Deselect,
    BackgroundClick,
    Click {
        #[serde(rename = "box")]
        box_index: usize,
    },
    PointerDown(PointerInput),
    PointerMove(PointerInput),
    PointerUp(PointerInput),
    PointerCancel(PointerInput),
    LostPointerCapture {
        #[serde(rename = "box")]
        box_index: usize,
        #[serde(default = "default_pointer_id")]
        pointer_id: i32,
    },
    DoubleClick {
        #[serde(rename = "box")]
        box_index: usize,
    },
    /// A DOM key name such as `"Enter"` or `"a"`.
    Key {
        #[serde(rename = "box")]
        box_index: usize,
        key: String,
    },
    /// Type each character of `text` in turn.
    TypeText {
        #[serde(rename = "box")]
        box_index: usize,
        text: String,
    },
    Blur {
        #[serde(rename = "box")]
        box_index: usize,
    },
    GoToSlide {
        index: usize,
    },
}

/// A session script.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Script {
    pub slides: Vec<Dimensions>,
    /// Rendered size reported for every box; approximated from the text
    /// when absent.
    #[serde(default)]
    pub box_size: Option<Dimensions>,
    pub events: Vec<ScriptEvent>,
}

impl Script {
    pub fn from_json(json: &str) -> ReplayResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// State after a replay.
#[derive(Debug, Serialize)]
pub struct ReplayOutcome {
    pub active_slide: Option<usize>,
    /// Creation index of the selected box.
    pub selected: Option<usize>,
    pub gesture_navigation: bool,
    pub controls: ControlPanel,
    /// Boxes in creation order.
    pub boxes: Vec<TextBox>,
    /// Messages that would have been shown to the user.
    pub alerts: Vec<String>,
}

/// Replay driver owning the editor, host and renderer.
pub struct Replay {
    editor: Rc<RefCell<OverlayEditor>>,
    host: MemorySlideHost,
    renderer: SnapshotRenderer,
    boxes: Vec<BoxId>,
    alerts: Vec<String>,
}

impl Replay {
    pub fn new(script: &Script) -> Self {
        let editor = Rc::new(RefCell::new(OverlayEditor::new()));
        for (index, slide) in script.slides.iter().enumerate() {
            editor
                .borrow_mut()
                .set_slide_size(SlideId(index), Size::new(slide.width, slide.height));
        }

        let mut host = MemorySlideHost::new(script.slides.len());
        let listener_editor = Rc::clone(&editor);
        host.subscribe_slide_change(Box::new(move || {
            listener_editor.borrow_mut().slide_changed();
        }));

        let mut renderer = SnapshotRenderer::new();
        if let Some(size) = script.box_size {
            renderer = renderer.with_element_size(Size::new(size.width, size.height));
        }

        Self {
            editor,
            host,
            renderer,
            boxes: Vec::new(),
            alerts: Vec::new(),
        }
    }

    fn box_id(&self, event: usize, index: usize) -> ReplayResult<BoxId> {
        self.boxes
            .get(index)
            .copied()
            .ok_or(ReplayError::UnknownBox { event, index })
    }

    /// Apply one event and render its effects.
    pub fn step(&mut self, event_index: usize, event: &ScriptEvent) -> ReplayResult<()> {
        log::debug!("Event {}: {:?}", event_index, event);
        match event {
            ScriptEvent::GoToSlide { index } => {
                // Listeners borrow the editor, so no borrow may be held here
                if !self.host.go_to(*index) {
                    return Err(ReplayError::UnknownSlide {
                        event: event_index,
                        index: *index,
                    });
                }
            }
            _ => self.step_editor(event_index, event)?,
        }
        let presented = present(&mut self.editor.borrow_mut(), &mut self.renderer);
        for err in presented.errors {
            log::warn!("Event {}: {}", event_index, err);
        }
        Ok(())
    }

    fn step_editor(&mut self, event_index: usize, event: &ScriptEvent) -> ReplayResult<()> {
        let editor = Rc::clone(&self.editor);
        let mut editor = editor.borrow_mut();
        let result: Result<(), EditorError> = match event {
            ScriptEvent::SetControls {
                text,
                font_size,
                color,
                font_family,
            } => {
                let controls = editor.controls_mut();
                let fields = [
                    (text, &mut controls.text),
                    (font_size, &mut controls.font_size),
                    (color, &mut controls.color),
                    (font_family, &mut controls.font_family),
                ];
                for (value, field) in fields {
                    if let Some(value) = value {
                        field.clone_from(value);
                    }
                }
                Ok(())
            }
            ScriptEvent::AddText => {
                if let Some(id) = editor.add_text(&self.host) {
                    self.boxes.push(id);
                }
                Ok(())
            }
            ScriptEvent::Create {
                text,
                slide,
                font_size,
                color,
                font_family,
            } => {
                if *slide >= self.host.slide_count() {
                    return Err(ReplayError::UnknownSlide {
                        event: event_index,
                        index: *slide,
                    });
                }
                let defaults = BoxStyle::default();
                let style = BoxStyle::new(
                    font_size.unwrap_or(defaults.font_size),
                    color
                        .as_deref()
                        .map_or(defaults.color, FontColor::parse_or_black),
                    font_family.clone().unwrap_or(defaults.font_family),
                );
                if let Some(id) = editor.create(text, style, SlideId(*slide)) {
                    self.boxes.push(id);
                }
                Ok(())
            }
            ScriptEvent::Apply => match editor.apply() {
                Err(EditorError::NothingSelected) => {
                    self.alerts.push(EditorError::NothingSelected.to_string());
                    Ok(())
                }
                other => other,
            },
            ScriptEvent::Deselect => {
                editor.deselect();
                Ok(())
            }
            ScriptEvent::BackgroundClick => {
                editor.background_click();
                Ok(())
            }
            ScriptEvent::Click { box_index } => {
                editor.box_clicked(self.box_id(event_index, *box_index)?)
            }
            ScriptEvent::PointerDown(pointer) => {
                let id = self.box_id(event_index, pointer.box_index)?;
                editor
                    .pointer_down(id, &pointer.sample(), &mut self.host)
                    .map(drop)
            }
            ScriptEvent::PointerMove(pointer) => {
                let id = self.box_id(event_index, pointer.box_index)?;
                editor.pointer_move(id, &pointer.sample()).map(drop)
            }
            ScriptEvent::PointerUp(pointer) => {
                let id = self.box_id(event_index, pointer.box_index)?;
                editor.pointer_up(id, &pointer.sample(), &mut self.host);
                Ok(())
            }
            ScriptEvent::PointerCancel(pointer) => {
                let id = self.box_id(event_index, pointer.box_index)?;
                editor.pointer_cancel(id, &pointer.sample(), &mut self.host);
                Ok(())
            }
            ScriptEvent::LostPointerCapture {
                box_index,
                pointer_id,
            } => {
                let id = self.box_id(event_index, *box_index)?;
                editor.pointer_capture_lost(id, *pointer_id);
                Ok(())
            }
            ScriptEvent::DoubleClick { box_index } => {
                editor.double_click(self.box_id(event_index, *box_index)?)
            }
            ScriptEvent::Key { box_index, key } => {
                let id = self.box_id(event_index, *box_index)?;
                match TextKey::from_key_name(key) {
                    Some(key) => {
                        editor.key_down(id, &key);
                    }
                    None => log::debug!("Ignoring key {:?}", key),
                }
                Ok(())
            }
            ScriptEvent::TypeText { box_index, text } => {
                let id = self.box_id(event_index, *box_index)?;
                for c in text.chars() {
                    editor.key_down(id, &TextKey::Character(c.to_string()));
                }
                Ok(())
            }
            ScriptEvent::Blur { box_index } => {
                editor.focus_lost(self.box_id(event_index, *box_index)?);
                Ok(())
            }
            ScriptEvent::GoToSlide { .. } => Ok(()),
        };
        if let Err(err) = result {
            log::warn!("Event {} rejected: {}", event_index, err);
        }
        Ok(())
    }

    pub fn renderer(&self) -> &SnapshotRenderer {
        &self.renderer
    }

    /// Snapshot of the session state.
    pub fn outcome(&self) -> ReplayOutcome {
        let editor = self.editor.borrow();
        let selected = editor
            .selected()
            .and_then(|id| self.boxes.iter().position(|b| *b == id));
        ReplayOutcome {
            active_slide: self.host.active_slide().map(|s| s.0),
            selected,
            gesture_navigation: self.host.gesture_navigation_enabled(),
            controls: editor.controls().clone(),
            boxes: self
                .boxes
                .iter()
                .filter_map(|id| editor.document().get(*id).cloned())
                .collect(),
            alerts: self.alerts.clone(),
        }
    }
}

/// Replay a whole script.
pub fn run(script: &Script) -> ReplayResult<ReplayOutcome> {
    let mut replay = Replay::new(script);
    for (index, event) in script.events.iter().enumerate() {
        replay.step(index, event)?;
    }
    Ok(replay.outcome())
}

/// Read a script file and replay it.
pub fn run_file(path: impl AsRef<Path>) -> ReplayResult<ReplayOutcome> {
    let json = std::fs::read_to_string(path)?;
    run(&Script::from_json(&json)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn replay(json: &str) -> ReplayOutcome {
        run(&Script::from_json(json).unwrap()).unwrap()
    }

    #[test]
    fn test_add_and_drag() {
        let outcome = replay(
            r##"{
                "slides": [{"width": 800, "height": 600}],
                "box_size": {"width": 100, "height": 30},
                "events": [
                    {"type": "set_controls", "text": "Hello", "font_size": "24", "color": "#ff0000", "font_family": "Arial"},
                    {"type": "add_text"},
                    {"type": "pointer_down", "box": 0, "x": 100, "y": 100},
                    {"type": "pointer_move", "box": 0, "x": 2000, "y": 130},
                    {"type": "pointer_up", "box": 0, "x": 2000, "y": 130}
                ]
            }"##,
        );
        assert_eq!(outcome.boxes.len(), 1);
        let text_box = &outcome.boxes[0];
        assert_eq!(text_box.content(), "Hello");
        assert_eq!(text_box.position, Point::new(700.0, 70.0));
        assert_eq!(text_box.style.color.to_hex(), "#ff0000");
        assert_eq!(outcome.selected, Some(0));
        assert_eq!(outcome.controls.text, "Hello");
        assert!(outcome.gesture_navigation);
    }

    #[test]
    fn test_edit_scenario() {
        let outcome = replay(
            r#"{
                "slides": [{"width": 800, "height": 600}],
                "events": [
                    {"type": "create", "text": "Hello", "slide": 0},
                    {"type": "double_click", "box": 0},
                    {"type": "key", "box": 0, "key": "Home"},
                    {"type": "key", "box": 0, "key": "Delete"},
                    {"type": "key", "box": 0, "key": "Delete"},
                    {"type": "key", "box": 0, "key": "Delete"},
                    {"type": "key", "box": 0, "key": "Delete"},
                    {"type": "key", "box": 0, "key": "Delete"},
                    {"type": "type_text", "box": 0, "text": "Goodbye"},
                    {"type": "key", "box": 0, "key": "Enter"}
                ]
            }"#,
        );
        assert_eq!(outcome.boxes[0].content(), "Goodbye");
        assert_eq!(outcome.controls.text, "Goodbye");
    }

    #[test]
    fn test_slide_change_clears_selection() {
        let outcome = replay(
            r#"{
                "slides": [{"width": 800, "height": 600}, {"width": 800, "height": 600}],
                "events": [
                    {"type": "create", "text": "Hello", "slide": 0},
                    {"type": "go_to_slide", "index": 1}
                ]
            }"#,
        );
        assert_eq!(outcome.active_slide, Some(1));
        assert_eq!(outcome.selected, None);
        assert_eq!(outcome.controls.text, "");
    }

    #[test]
    fn test_apply_without_selection_alerts() {
        let outcome = replay(
            r#"{
                "slides": [{"width": 800, "height": 600}],
                "events": [
                    {"type": "create", "text": "Hello", "slide": 0},
                    {"type": "background_click"},
                    {"type": "set_controls", "text": "Changed"},
                    {"type": "apply"}
                ]
            }"#,
        );
        assert_eq!(outcome.alerts, vec!["Select a text box first.".to_string()]);
        assert_eq!(outcome.boxes[0].content(), "Hello");
    }

    #[test]
    fn test_unknown_box_is_an_error() {
        let script = Script::from_json(
            r#"{"slides": [{"width": 10, "height": 10}], "events": [{"type": "click", "box": 3}]}"#,
        )
        .unwrap();
        assert!(matches!(
            run(&script),
            Err(ReplayError::UnknownBox { event: 0, index: 3 })
        ));
    }

    #[test]
    fn test_unknown_slide_is_an_error() {
        let script = Script::from_json(
            r#"{"slides": [{"width": 10, "height": 10}], "events": [{"type": "go_to_slide", "index": 4}]}"#,
        )
        .unwrap();
        assert!(matches!(
            run(&script),
            Err(ReplayError::UnknownSlide { event: 0, index: 4 })
        ));
    }

    #[test]
    fn test_rendered_elements_track_selection() {
        let script = Script::from_json(
            r#"{
                "slides": [{"width": 800, "height": 600}],
                "events": [
                    {"type": "create", "text": "one", "slide": 0},
                    {"type": "create", "text": "two", "slide": 0},
                    {"type": "click", "box": 0}
                ]
            }"#,
        )
        .unwrap();
        let mut replay = Replay::new(&script);
        for (index, event) in script.events.iter().enumerate() {
            replay.step(index, event).unwrap();
        }
        let ids: Vec<_> = replay.outcome().boxes.iter().map(TextBox::id).collect();
        assert!(replay.renderer().element(ids[0]).unwrap().active);
        assert!(!replay.renderer().element(ids[1]).unwrap().active);
    }
}
