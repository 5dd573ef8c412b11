use crate::geometry::{Point, Rect};

/// Where a resize-handle marker sits on the selection. Markers are drawn
/// only; the selection cannot be resized after the drag ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandlePosition {
    TopLeft,
    Top,
    TopRight,
    Right,
    BottomRight,
    Bottom,
    BottomLeft,
    Left,
}

impl HandlePosition {
    pub const ALL: [HandlePosition; 8] = [
        HandlePosition::TopLeft,
        HandlePosition::Top,
        HandlePosition::TopRight,
        HandlePosition::Right,
        HandlePosition::BottomRight,
        HandlePosition::Bottom,
        HandlePosition::BottomLeft,
        HandlePosition::Left,
    ];

    /// Anchor point on `rect`, in view space (y grows downward).
    pub fn anchor(self, rect: Rect) -> Point {
        let (x, y) = match self {
            HandlePosition::TopLeft => (rect.min_x(), rect.min_y()),
            HandlePosition::Top => (rect.mid_x(), rect.min_y()),
            HandlePosition::TopRight => (rect.max_x(), rect.min_y()),
            HandlePosition::Right => (rect.max_x(), rect.mid_y()),
            HandlePosition::BottomRight => (rect.max_x(), rect.max_y()),
            HandlePosition::Bottom => (rect.mid_x(), rect.max_y()),
            HandlePosition::BottomLeft => (rect.min_x(), rect.max_y()),
            HandlePosition::Left => (rect.min_x(), rect.mid_y()),
        };
        Point::new(x, y)
    }

    /// Square marker of side `size` centered on the anchor.
    pub fn marker(self, rect: Rect, size: f64) -> Rect {
        let anchor = self.anchor(rect);
        let hs = size / 2.0;
        Rect::new(anchor.x - hs, anchor.y - hs, size, size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anchors_cover_corners_and_midpoints() {
        let rect = Rect::new(10.0, 20.0, 100.0, 50.0);
        assert_eq!(HandlePosition::TopLeft.anchor(rect), Point::new(10.0, 20.0));
        assert_eq!(HandlePosition::Bottom.anchor(rect), Point::new(60.0, 70.0));
        assert_eq!(HandlePosition::Right.anchor(rect), Point::new(110.0, 45.0));
    }

    #[test]
    fn marker_is_centered() {
        let rect = Rect::new(0.0, 0.0, 40.0, 40.0);
        let marker = HandlePosition::BottomRight.marker(rect, 8.0);
        assert_eq!(marker, Rect::new(36.0, 36.0, 8.0, 8.0));
    }
}
