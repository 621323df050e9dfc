//! Slide host abstraction over the external carousel.

use serde::{Deserialize, Serialize};

/// Index of a slide container within the carousel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SlideId(pub usize);

/// Callback invoked each time the active slide changes.
pub type SlideChangeListener = Box<dyn FnMut()>;

/// Contract the editor needs from the carousel component.
///
/// Implementations wrap whatever navigation widget hosts the slides.
/// The editor never navigates; it only reads the active slide and
/// suspends swipe gestures while a box is dragged.
pub trait SlideHost {
    /// Current slide container, or `None` when the carousel has none.
    fn active_slide(&self) -> Option<SlideId>;

    /// Enable or disable swipe-driven slide changes.
    fn set_gesture_navigation_enabled(&mut self, enabled: bool);

    /// Register a listener for active-slide changes.
    fn subscribe_slide_change(&mut self, listener: SlideChangeListener);
}

/// In-memory slide host for native shells and tests.
pub struct MemorySlideHost {
    slide_count: usize,
    active: usize,
    gesture_navigation: bool,
    listeners: Vec<SlideChangeListener>,
}

impl MemorySlideHost {
    /// Create a host with `slide_count` slides, the first one active.
    pub fn new(slide_count: usize) -> Self {
        Self {
            slide_count,
            active: 0,
            gesture_navigation: true,
            listeners: Vec::new(),
        }
    }

    pub fn slide_count(&self) -> usize {
        self.slide_count
    }

    /// Whether swipe navigation is currently allowed.
    pub fn gesture_navigation_enabled(&self) -> bool {
        self.gesture_navigation
    }

    /// Navigate to a slide, notifying listeners when the slide changes.
    /// Returns false if the index is out of range.
    pub fn go_to(&mut self, index: usize) -> bool {
        if index >= self.slide_count {
            return false;
        }
        if index != self.active {
            self.active = index;
            log::debug!("Active slide changed to {}", index);
            for listener in &mut self.listeners {
                listener();
            }
        }
        true
    }
}

impl SlideHost for MemorySlideHost {
    fn active_slide(&self) -> Option<SlideId> {
        (self.active < self.slide_count).then_some(SlideId(self.active))
    }

    fn set_gesture_navigation_enabled(&mut self, enabled: bool) {
        self.gesture_navigation = enabled;
    }

    fn subscribe_slide_change(&mut self, listener: SlideChangeListener) {
        self.listeners.push(listener);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn test_active_slide() {
        let host = MemorySlideHost::new(3);
        assert_eq!(host.active_slide(), Some(SlideId(0)));

        let empty = MemorySlideHost::new(0);
        assert_eq!(empty.active_slide(), None);
    }

    #[test]
    fn test_listeners_fire_on_change_only() {
        let mut host = MemorySlideHost::new(3);
        let fired = Rc::new(Cell::new(0));
        let counter = fired.clone();
        host.subscribe_slide_change(Box::new(move || counter.set(counter.get() + 1)));

        assert!(host.go_to(1));
        assert!(host.go_to(1));
        assert!(!host.go_to(7));
        assert_eq!(fired.get(), 1);
        assert_eq!(host.active_slide(), Some(SlideId(1)));
    }

    #[test]
    fn test_gesture_toggle() {
        let mut host = MemorySlideHost::new(1);
        host.set_gesture_navigation_enabled(false);
        assert!(!host.gesture_navigation_enabled());
        host.set_gesture_navigation_enabled(true);
        assert!(host.gesture_navigation_enabled());
    }
}
