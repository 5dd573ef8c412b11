use crate::geometry::{Point, Rect};

/// State of one drag gesture.
///
/// The live rectangle is always derived from the two points, never stored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DragSession {
    start_point: Option<Point>,
    current_point: Option<Point>,
    is_selecting: bool,
}

impl DragSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one "changed" event. The start point is fixed by the first event
    /// of a drag; later events only move the current point.
    pub fn drag_changed(&mut self, start: Point, location: Point) {
        if !self.is_selecting {
            self.start_point = Some(start);
            self.is_selecting = true;
        }
        self.current_point = Some(location);
    }

    /// Finish the drag at `location`, returning the normalized rectangle.
    /// The session is cleared whatever the result.
    pub fn drag_ended(&mut self, start: Point, location: Point) -> Rect {
        let start = self.start_point.unwrap_or(start);
        self.reset();
        Rect::from_corners(start, location)
    }

    pub fn reset(&mut self) {
        self.start_point = None;
        self.current_point = None;
        self.is_selecting = false;
    }

    pub fn rect(&self) -> Option<Rect> {
        match (self.start_point, self.current_point) {
            (Some(start), Some(current)) => Some(Rect::from_corners(start, current)),
            _ => None,
        }
    }

    pub fn start_point(&self) -> Option<Point> {
        self.start_point
    }

    pub fn current_point(&self) -> Option<Point> {
        self.current_point
    }

    pub fn is_selecting(&self) -> bool {
        self.is_selecting
    }

    pub fn is_idle(&self) -> bool {
        self.start_point.is_none() && self.current_point.is_none() && !self.is_selecting
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_point_is_fixed_by_first_event() {
        let mut session = DragSession::new();
        session.drag_changed(Point::new(10.0, 10.0), Point::new(12.0, 12.0));
        session.drag_changed(Point::new(99.0, 99.0), Point::new(40.0, 30.0));

        assert_eq!(session.start_point(), Some(Point::new(10.0, 10.0)));
        assert_eq!(session.current_point(), Some(Point::new(40.0, 30.0)));
        assert_eq!(session.rect(), Some(Rect::new(10.0, 10.0, 30.0, 20.0)));
    }

    #[test]
    fn drag_ended_normalizes_and_resets() {
        let mut session = DragSession::new();
        session.drag_changed(Point::new(200.0, 150.0), Point::new(200.0, 150.0));
        let rect = session.drag_ended(Point::new(200.0, 150.0), Point::new(120.0, 90.0));

        assert_eq!(rect, Rect::new(120.0, 90.0, 80.0, 60.0));
        assert!(session.is_idle());
        assert_eq!(session.rect(), None);
    }

    #[test]
    fn drag_ended_without_changes_uses_gesture_start() {
        let mut session = DragSession::new();
        let rect = session.drag_ended(Point::new(5.0, 5.0), Point::new(25.0, 45.0));
        assert_eq!(rect, Rect::new(5.0, 5.0, 20.0, 40.0));
        assert!(session.is_idle());
    }
}
