//! Slidetext Core Library
//!
//! Platform-agnostic records and interaction logic for text boxes laid
//! over carousel slides: creation, selection, dragging and inline editing.

pub mod color;
pub mod controls;
pub mod document;
pub mod drag;
pub mod edit;
pub mod editor;
pub mod effect;
pub mod error;
pub mod input;
pub mod selection;
pub mod slide_host;
pub mod text_box;

pub use color::FontColor;
pub use controls::ControlPanel;
pub use document::OverlayDocument;
pub use drag::{DragController, DragState, clamp_offset};
pub use edit::{EditBuffer, EditController, EditState, TextEditResult};
pub use editor::{AdoptedBox, OverlayEditor};
pub use effect::Effect;
pub use error::{EditorError, EditorResult};
pub use input::{PointerId, PointerSample, TextKey};
pub use selection::SelectionManager;
pub use slide_host::{MemorySlideHost, SlideChangeListener, SlideHost, SlideId};
pub use text_box::{BoxId, BoxStyle, TextBox};
