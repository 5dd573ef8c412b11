use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }

    /// Convert a point in overlay view space (top-left origin, y down) into
    /// screen space (bottom-left origin of `frame`, y up).
    pub fn view_to_screen(self, frame: Rect) -> Point {
        Point::new(frame.min_x() + self.x, frame.max_y() - self.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const ZERO: Size = Size { width: 0.0, height: 0.0 };

    pub const fn new(width: f64, height: f64) -> Self {
        Size { width, height }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub origin: Point,
    pub size: Size,
}

impl Rect {
    pub const ZERO: Rect = Rect { origin: Point::ZERO, size: Size::ZERO };

    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Rect {
            origin: Point::new(x, y),
            size: Size::new(width, height),
        }
    }

    pub const fn from_origin_size(origin: Point, size: Size) -> Self {
        Rect { origin, size }
    }

    /// The rectangle spanned by two arbitrary corners, with its origin at the
    /// minimum corner and a non-negative size.
    pub fn from_corners(a: Point, b: Point) -> Self {
        Rect::new(
            a.x.min(b.x),
            a.y.min(b.y),
            (b.x - a.x).abs(),
            (b.y - a.y).abs(),
        )
    }

    pub fn width(&self) -> f64 {
        self.size.width
    }

    pub fn height(&self) -> f64 {
        self.size.height
    }

    pub fn min_x(&self) -> f64 {
        self.origin.x
    }

    pub fn min_y(&self) -> f64 {
        self.origin.y
    }

    pub fn max_x(&self) -> f64 {
        self.origin.x + self.size.width
    }

    pub fn max_y(&self) -> f64 {
        self.origin.y + self.size.height
    }

    pub fn mid_x(&self) -> f64 {
        self.origin.x + self.size.width / 2.0
    }

    pub fn mid_y(&self) -> f64 {
        self.origin.y + self.size.height / 2.0
    }

    pub fn area(&self) -> f64 {
        self.size.width * self.size.height
    }

    pub fn is_empty(&self) -> bool {
        self.size.width <= 0.0 || self.size.height <= 0.0
    }

    /// True when both sides are strictly larger than `threshold`.
    pub fn exceeds(&self, threshold: f64) -> bool {
        self.size.width > threshold && self.size.height > threshold
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.min_x() && p.x <= self.max_x() && p.y >= self.min_y() && p.y <= self.max_y()
    }

    pub fn inset(&self, dx: f64, dy: f64) -> Rect {
        Rect::new(
            self.origin.x + dx,
            self.origin.y + dy,
            (self.size.width - dx * 2.0).max(0.0),
            (self.size.height - dy * 2.0).max(0.0),
        )
    }

    /// Shift this rect so it lies inside `bounds`. A rect larger than the
    /// bounds is pinned to the bounds' origin on that axis.
    pub fn clamped_within(&self, bounds: Rect) -> Rect {
        let x = self
            .origin
            .x
            .min(bounds.max_x() - self.size.width)
            .max(bounds.min_x());
        let y = self
            .origin
            .y
            .min(bounds.max_y() - self.size.height)
            .max(bounds.min_y());
        Rect::from_origin_size(Point::new(x, y), self.size)
    }

    /// Convert a rect in overlay view space into screen space for `frame`.
    ///
    /// `screen_x = frame.min_x + x`, `screen_y = frame.max_y - y - height`.
    /// Width and height are copied unchanged.
    pub fn view_to_screen(self, frame: Rect) -> Rect {
        Rect::from_origin_size(
            Point::new(
                frame.min_x() + self.origin.x,
                frame.max_y() - self.origin.y - self.size.height,
            ),
            self.size,
        )
    }
}

#[cfg(target_os = "macos")]
mod cg {
    use objc2_core_foundation::{CGPoint, CGRect, CGSize};

    use super::{Point, Rect, Size};

    impl From<CGPoint> for Point {
        fn from(p: CGPoint) -> Self {
            Point::new(p.x, p.y)
        }
    }

    impl From<Point> for CGPoint {
        fn from(p: Point) -> Self {
            CGPoint::new(p.x, p.y)
        }
    }

    impl From<CGSize> for Size {
        fn from(s: CGSize) -> Self {
            Size::new(s.width, s.height)
        }
    }

    impl From<Size> for CGSize {
        fn from(s: Size) -> Self {
            CGSize::new(s.width, s.height)
        }
    }

    impl From<CGRect> for Rect {
        fn from(r: CGRect) -> Self {
            Rect::from_origin_size(r.origin.into(), r.size.into())
        }
    }

    impl From<Rect> for CGRect {
        fn from(r: Rect) -> Self {
            CGRect::new(r.origin.into(), r.size.into())
        }
    }
}
