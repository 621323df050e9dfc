//! Input event types shared by the browser and native shells.

use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Identifier assigned to a pointer by the platform.
pub type PointerId = i32;

/// A single pointer event sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerSample {
    pub pointer_id: PointerId,
    /// Whether this is the primary pointer of its device type.
    #[serde(default = "default_primary")]
    pub is_primary: bool,
    /// Position in screen (client) coordinates.
    pub position: Point,
}

fn default_primary() -> bool {
    true
}

impl PointerSample {
    /// A primary pointer at the given client coordinates.
    pub fn primary(pointer_id: PointerId, x: f64, y: f64) -> Self {
        Self {
            pointer_id,
            is_primary: true,
            position: Point::new(x, y),
        }
    }

    /// Mark the sample as coming from a secondary pointer.
    pub fn secondary(mut self) -> Self {
        self.is_primary = false;
        self
    }
}

/// Keyboard key for inline text editing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextKey {
    Character(String),
    Backspace,
    Delete,
    Enter,
    Left,
    Right,
    Home,
    End,
    Escape,
}

impl TextKey {
    /// Map a DOM `KeyboardEvent.key` value.
    ///
    /// Returns `None` for keys inline editing does not react to, such as
    /// modifiers and function keys.
    pub fn from_key_name(key: &str) -> Option<Self> {
        let key = match key {
            "Enter" => Self::Enter,
            "Escape" | "Esc" => Self::Escape,
            "Backspace" => Self::Backspace,
            "Delete" => Self::Delete,
            "ArrowLeft" => Self::Left,
            "ArrowRight" => Self::Right,
            "Home" => Self::Home,
            "End" => Self::End,
            other if other.chars().count() == 1 => Self::Character(other.to_string()),
            _ => return None,
        };
        Some(key)
    }

    /// Whether the key ends an inline edit.
    pub fn ends_edit(&self) -> bool {
        matches!(self, Self::Enter | Self::Escape)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_names() {
        assert_eq!(TextKey::from_key_name("Enter"), Some(TextKey::Enter));
        assert_eq!(TextKey::from_key_name("Escape"), Some(TextKey::Escape));
        assert_eq!(TextKey::from_key_name("ArrowLeft"), Some(TextKey::Left));
        assert_eq!(
            TextKey::from_key_name("é"),
            Some(TextKey::Character("é".to_string()))
        );
        assert_eq!(TextKey::from_key_name("Shift"), None);
        assert_eq!(TextKey::from_key_name("F5"), None);
    }

    #[test]
    fn test_ends_edit() {
        assert!(TextKey::Enter.ends_edit());
        assert!(TextKey::Escape.ends_edit());
        assert!(!TextKey::Backspace.ends_edit());
    }

    #[test]
    fn test_pointer_sample_defaults_primary() {
        let sample: PointerSample =
            serde_json::from_str(r#"{"pointer_id": 3, "position": {"x": 1.0, "y": 2.0}}"#).unwrap();
        assert!(sample.is_primary);
        assert!(!PointerSample::primary(1, 0.0, 0.0).secondary().is_primary);
    }
}
