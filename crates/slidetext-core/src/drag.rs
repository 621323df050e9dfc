//! Pointer-capture based dragging of boxes within their slide.

use crate::input::{PointerId, PointerSample};
use crate::text_box::BoxId;
use kurbo::{Point, Size, Vec2};

/// Drag state of a single box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging,
}

/// An in-progress drag of one box.
#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    pub box_id: BoxId,
    pub pointer_id: PointerId,
    /// Pointer position (client coordinates) when the drag began.
    pub start_pointer: Point,
    /// Box offset within its slide when the drag began.
    pub start_offset: Point,
    /// Whether the box still holds capture of the pointer.
    pub capture_held: bool,
}

impl DragSession {
    /// Pointer movement since the drag began.
    pub fn delta(&self, pointer: Point) -> Vec2 {
        pointer - self.start_pointer
    }
}

/// Drives the `Idle -> Dragging -> Idle` machine of every box.
///
/// At most one box drags at a time; a second pointer-down while a
/// session is active is ignored.
#[derive(Debug, Clone, Default)]
pub struct DragController {
    session: Option<DragSession>,
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self, id: BoxId) -> DragState {
        match &self.session {
            Some(session) if session.box_id == id => DragState::Dragging,
            _ => DragState::Idle,
        }
    }

    pub fn session(&self) -> Option<&DragSession> {
        self.session.as_ref()
    }

    pub fn is_dragging(&self) -> bool {
        self.session.is_some()
    }

    /// Start dragging `id` from `start_offset`.
    ///
    /// Returns false when the sample is not from a primary pointer or
    /// another drag is already running.
    pub fn begin(&mut self, id: BoxId, sample: &PointerSample, start_offset: Point) -> bool {
        if !sample.is_primary || self.session.is_some() {
            return false;
        }
        self.session = Some(DragSession {
            box_id: id,
            pointer_id: sample.pointer_id,
            start_pointer: sample.position,
            start_offset,
            capture_held: true,
        });
        true
    }

    /// Offset the box should move to for a pointer-move sample.
    ///
    /// `None` when the sample does not belong to the running drag of `id`
    /// or the box no longer holds capture of the pointer.
    pub fn drag_to(
        &self,
        id: BoxId,
        sample: &PointerSample,
        box_size: Size,
        parent_size: Option<Size>,
    ) -> Option<Point> {
        let session = self.session.as_ref()?;
        if !sample.is_primary
            || session.box_id != id
            || session.pointer_id != sample.pointer_id
            || !session.capture_held
        {
            return None;
        }
        let target = session.start_offset + session.delta(sample.position);
        Some(clamp_offset(target, box_size, parent_size))
    }

    /// The box lost capture of the pointer; later moves are ignored.
    pub fn capture_lost(&mut self, id: BoxId, pointer_id: PointerId) {
        if let Some(session) = self.session.as_mut() {
            if session.box_id == id && session.pointer_id == pointer_id {
                session.capture_held = false;
            }
        }
    }

    /// End the drag of `id` on pointer-up or pointer-cancel.
    pub fn finish(&mut self, id: BoxId, pointer_id: PointerId) -> Option<DragSession> {
        match &self.session {
            Some(session) if session.box_id == id && session.pointer_id == pointer_id => {
                self.session.take()
            }
            _ => None,
        }
    }
}

/// Keep a box's footprint inside its parent and snap to whole pixels.
///
/// Each axis is limited to `[0, parent - box]`; a box larger than its
/// parent pins to 0. Without a known parent size only the lower bound
/// applies.
pub fn clamp_offset(offset: Point, box_size: Size, parent_size: Option<Size>) -> Point {
    let clamp_axis = |value: f64, extent: f64, parent: Option<f64>| {
        let upper = parent.map_or(value, |parent| value.min(parent - extent));
        upper.max(0.0).round()
    };
    Point::new(
        clamp_axis(offset.x, box_size.width, parent_size.map(|s| s.width)),
        clamp_axis(offset.y, box_size.height, parent_size.map(|s| s.height)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    const PARENT: Size = Size::new(800.0, 600.0);
    const BOX: Size = Size::new(100.0, 30.0);

    #[test]
    fn test_begin_requires_primary_pointer() {
        let mut drag = DragController::new();
        let id = Uuid::new_v4();
        let secondary = PointerSample::primary(2, 10.0, 10.0).secondary();
        assert!(!drag.begin(id, &secondary, Point::new(40.0, 40.0)));
        assert_eq!(drag.state(id), DragState::Idle);

        assert!(drag.begin(id, &PointerSample::primary(1, 10.0, 10.0), Point::new(40.0, 40.0)));
        assert_eq!(drag.state(id), DragState::Dragging);
    }

    #[test]
    fn test_single_session() {
        let mut drag = DragController::new();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        assert!(drag.begin(a, &PointerSample::primary(1, 0.0, 0.0), Point::ZERO));
        assert!(!drag.begin(b, &PointerSample::primary(2, 0.0, 0.0), Point::ZERO));
        assert_eq!(drag.state(b), DragState::Idle);
    }

    #[test]
    fn test_drag_applies_delta() {
        let mut drag = DragController::new();
        let id = Uuid::new_v4();
        drag.begin(id, &PointerSample::primary(1, 100.0, 100.0), Point::new(40.0, 40.0));

        let moved = drag.drag_to(id, &PointerSample::primary(1, 150.4, 119.6), BOX, Some(PARENT));
        assert_eq!(moved, Some(Point::new(90.0, 60.0)));
    }

    #[test]
    fn test_drag_clamps_to_parent() {
        let mut drag = DragController::new();
        let id = Uuid::new_v4();
        drag.begin(id, &PointerSample::primary(1, 0.0, 0.0), Point::new(40.0, 40.0));

        for (dx, dy) in [(-1000.0, -1000.0), (5000.0, 5000.0), (-50.0, 9000.0), (760.0, -41.0)] {
            let p = drag
                .drag_to(id, &PointerSample::primary(1, dx, dy), BOX, Some(PARENT))
                .unwrap();
            assert!(p.x >= 0.0 && p.x <= PARENT.width - BOX.width);
            assert!(p.y >= 0.0 && p.y <= PARENT.height - BOX.height);
        }
    }

    #[test]
    fn test_oversized_box_pins_to_origin() {
        let p = clamp_offset(Point::new(30.0, 30.0), Size::new(900.0, 700.0), Some(PARENT));
        assert_eq!(p, Point::ZERO);
    }

    #[test]
    fn test_unknown_parent_only_clamps_lower_bound() {
        let p = clamp_offset(Point::new(-5.0, 5000.2), BOX, None);
        assert_eq!(p, Point::new(0.0, 5000.0));
    }

    #[test]
    fn test_moves_ignored_after_capture_lost() {
        let mut drag = DragController::new();
        let id = Uuid::new_v4();
        drag.begin(id, &PointerSample::primary(1, 0.0, 0.0), Point::ZERO);
        drag.capture_lost(id, 1);
        assert_eq!(drag.drag_to(id, &PointerSample::primary(1, 5.0, 5.0), BOX, Some(PARENT)), None);
        assert_eq!(drag.state(id), DragState::Dragging);
    }

    #[test]
    fn test_foreign_pointer_does_not_finish() {
        let mut drag = DragController::new();
        let id = Uuid::new_v4();
        drag.begin(id, &PointerSample::primary(1, 0.0, 0.0), Point::ZERO);
        assert!(drag.finish(id, 7).is_none());
        assert!(drag.finish(id, 1).is_some());
        assert!(!drag.is_dragging());
    }
}
