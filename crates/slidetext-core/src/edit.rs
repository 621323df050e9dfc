//! Inline text editing of a single box.

use crate::input::TextKey;
use crate::text_box::BoxId;

/// Edit state of a single box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditState {
    #[default]
    Display,
    Editing,
}

/// Result of handling a key while editing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEditResult {
    /// Key was handled, text may have changed.
    Handled,
    /// Key ended editing.
    ExitEdit,
    /// Box is not being edited; pass the key on.
    NotHandled,
}

/// Text being edited with a caret measured in characters.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EditBuffer {
    text: String,
    cursor_chars: usize,
}

impl EditBuffer {
    /// Start editing `text` with the caret at its end.
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let cursor_chars = text.chars().count();
        Self { text, cursor_chars }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn cursor_chars(&self) -> usize {
        self.cursor_chars.min(self.char_count())
    }

    fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    fn byte_index(&self, chars: usize) -> usize {
        self.text
            .char_indices()
            .nth(chars)
            .map_or(self.text.len(), |(index, _)| index)
    }

    pub fn insert_str(&mut self, s: &str) {
        let at = self.byte_index(self.cursor_chars());
        self.text.insert_str(at, s);
        self.cursor_chars = self.cursor_chars() + s.chars().count();
    }

    pub fn delete_backward(&mut self) -> bool {
        let cursor = self.cursor_chars();
        if cursor == 0 {
            return false;
        }
        let start = self.byte_index(cursor - 1);
        let end = self.byte_index(cursor);
        self.text.drain(start..end);
        self.cursor_chars = cursor - 1;
        true
    }

    pub fn delete_forward(&mut self) -> bool {
        let cursor = self.cursor_chars();
        if cursor >= self.char_count() {
            return false;
        }
        let start = self.byte_index(cursor);
        let end = self.byte_index(cursor + 1);
        self.text.drain(start..end);
        true
    }

    pub fn move_left(&mut self) {
        self.cursor_chars = self.cursor_chars().saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        self.cursor_chars = (self.cursor_chars() + 1).min(self.char_count());
    }

    pub fn move_home(&mut self) {
        self.cursor_chars = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor_chars = self.char_count();
    }

    /// Replace the whole text, as when a DOM shell reports the element's
    /// live content. The caret moves to the end.
    pub fn replace(&mut self, text: impl Into<String>) {
        *self = Self::new(text);
    }
}

/// The box currently being edited and its buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditSession {
    pub box_id: BoxId,
    pub buffer: EditBuffer,
}

/// Drives the `Display -> Editing -> Display` machine of every box.
///
/// Only one box can hold focus, so at most one session exists.
#[derive(Debug, Clone, Default)]
pub struct EditController {
    session: Option<EditSession>,
}

impl EditController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self, id: BoxId) -> EditState {
        if self.is_editing(id) {
            EditState::Editing
        } else {
            EditState::Display
        }
    }

    pub fn is_editing(&self, id: BoxId) -> bool {
        self.session.as_ref().is_some_and(|s| s.box_id == id)
    }

    pub fn editing(&self) -> Option<BoxId> {
        self.session.as_ref().map(|s| s.box_id)
    }

    pub fn buffer(&self) -> Option<&EditBuffer> {
        self.session.as_ref().map(|s| &s.buffer)
    }

    /// Enter editing mode with the caret after the last character.
    pub fn begin(&mut self, id: BoxId, text: &str) {
        self.session = Some(EditSession {
            box_id: id,
            buffer: EditBuffer::new(text),
        });
    }

    /// Leave editing mode for `id`. Returns false if it was not editing.
    pub fn end(&mut self, id: BoxId) -> bool {
        if self.is_editing(id) {
            self.session = None;
            true
        } else {
            false
        }
    }

    /// Mutable buffer of `id`, if it is the box being edited.
    pub fn buffer_mut(&mut self, id: BoxId) -> Option<&mut EditBuffer> {
        self.session
            .as_mut()
            .filter(|s| s.box_id == id)
            .map(|s| &mut s.buffer)
    }

    /// Apply a key to the buffer of `id`.
    ///
    /// Enter and Escape report `ExitEdit` without touching the text; the
    /// caller ends the session so focus-loss handling runs once.
    pub fn handle_key(&mut self, id: BoxId, key: &TextKey) -> TextEditResult {
        let Some(buffer) = self.buffer_mut(id) else {
            return TextEditResult::NotHandled;
        };
        match key {
            TextKey::Enter | TextKey::Escape => return TextEditResult::ExitEdit,
            TextKey::Character(c) => buffer.insert_str(c),
            TextKey::Backspace => {
                buffer.delete_backward();
            }
            TextKey::Delete => {
                buffer.delete_forward();
            }
            TextKey::Left => buffer.move_left(),
            TextKey::Right => buffer.move_right(),
            TextKey::Home => buffer.move_home(),
            TextKey::End => buffer.move_end(),
        }
        TextEditResult::Handled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_buffer_caret_starts_at_end() {
        let mut buffer = EditBuffer::new("Hi");
        assert_eq!(buffer.cursor_chars(), 2);
        buffer.insert_str("!");
        assert_eq!(buffer.text(), "Hi!");
    }

    #[test]
    fn test_buffer_multibyte_editing() {
        let mut buffer = EditBuffer::new("héllo");
        buffer.move_home();
        buffer.move_right();
        buffer.move_right();
        assert!(buffer.delete_backward());
        assert_eq!(buffer.text(), "hllo");
        buffer.insert_str("ë");
        assert_eq!(buffer.text(), "hëllo");
        assert!(buffer.delete_forward());
        assert_eq!(buffer.text(), "hëlo");
    }

    #[test]
    fn test_buffer_bounds() {
        let mut buffer = EditBuffer::new("");
        assert!(!buffer.delete_backward());
        assert!(!buffer.delete_forward());
        buffer.move_left();
        buffer.move_right();
        assert_eq!(buffer.cursor_chars(), 0);
    }

    #[test]
    fn test_controller_keys() {
        let mut edit = EditController::new();
        let id = Uuid::new_v4();
        assert_eq!(
            edit.handle_key(id, &TextKey::Character("a".into())),
            TextEditResult::NotHandled
        );

        edit.begin(id, "ab");
        assert_eq!(edit.state(id), EditState::Editing);
        assert_eq!(edit.handle_key(id, &TextKey::Backspace), TextEditResult::Handled);
        assert_eq!(edit.handle_key(id, &TextKey::Character("c".into())), TextEditResult::Handled);
        assert_eq!(edit.buffer().map(EditBuffer::text), Some("ac"));
        assert_eq!(edit.handle_key(id, &TextKey::Enter), TextEditResult::ExitEdit);
        assert_eq!(edit.buffer().map(EditBuffer::text), Some("ac"));

        assert!(edit.end(id));
        assert!(!edit.end(id));
        assert_eq!(edit.state(id), EditState::Display);
    }

    #[test]
    fn test_keys_for_other_box_not_handled() {
        let mut edit = EditController::new();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        edit.begin(a, "x");
        assert_eq!(edit.handle_key(b, &TextKey::Backspace), TextEditResult::NotHandled);
        assert_eq!(edit.buffer().map(EditBuffer::text), Some("x"));
    }
}
