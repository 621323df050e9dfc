//! Effects queued by editor operations for the renderer to carry out.

use crate::input::PointerId;
use crate::text_box::BoxId;

/// A change the visual layer has to reflect.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// A new box needs an element on its slide.
    Mounted(BoxId),
    /// Position, text or style of a box changed.
    Restyled(BoxId),
    /// The selection marker was added to or removed from a box.
    MarkerChanged { id: BoxId, active: bool },
    /// Make the box editable, focus it and put the caret at the end.
    EditingStarted(BoxId),
    /// Make the box non-editable again.
    EditingEnded(BoxId),
    /// Move focus away from a box that finished editing.
    BlurRequested(BoxId),
    /// Route every event of this pointer to the box.
    PointerCaptured { id: BoxId, pointer_id: PointerId },
    /// Stop routing the pointer to the box.
    PointerReleased { id: BoxId, pointer_id: PointerId },
    /// Control-panel fields changed and the inputs must be refreshed.
    ControlsChanged,
}

/// FIFO of pending effects.
#[derive(Debug, Clone, Default)]
pub struct EffectQueue {
    effects: Vec<Effect>,
}

impl EffectQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, effect: Effect) {
        self.effects.push(effect);
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    /// Take every pending effect, oldest first.
    pub fn take(&mut self) -> Vec<Effect> {
        std::mem::take(&mut self.effects)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Effect> {
        self.effects.iter()
    }
}
