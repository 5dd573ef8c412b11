//! Geometry of the quick-access card.
//!
//! Card-local coordinates are flipped (top-left origin, y down), matching the
//! AppKit view that draws the card. Placement on screen uses screen space.

use crate::config::QuickAccessStyle;
use crate::geometry::{Point, Rect, Size};

use super::QuickAction;

const COLUMNS: usize = 4;

#[derive(Debug, Clone, PartialEq)]
pub struct CardLayout {
    pub size: Size,
    pub thumbnail: Rect,
    pub buttons: Vec<(QuickAction, Rect)>,
    /// One line under the buttons for progress text.
    pub status: Rect,
}

impl CardLayout {
    pub fn new(style: &QuickAccessStyle) -> Self {
        let p = style.padding;
        let inner_width = style.card_width - p * 2.0;
        let thumbnail = Rect::new(p, p, inner_width, style.thumbnail_height);

        let columns = COLUMNS as f64;
        let button_width = (inner_width - style.spacing * (columns - 1.0)) / columns;
        let grid_top = thumbnail.max_y() + style.spacing;
        let buttons = QuickAction::ALL
            .iter()
            .enumerate()
            .map(|(i, &action)| {
                let (row, col) = ((i / COLUMNS) as f64, (i % COLUMNS) as f64);
                let frame = Rect::new(
                    p + col * (button_width + style.spacing),
                    grid_top + row * (style.button_height + style.spacing),
                    button_width,
                    style.button_height,
                );
                (action, frame)
            })
            .collect::<Vec<_>>();

        let rows = QuickAction::ALL.len().div_ceil(COLUMNS) as f64;
        let grid_bottom = grid_top + rows * style.button_height + (rows - 1.0) * style.spacing;
        let status = Rect::new(p, grid_bottom + style.spacing, inner_width, style.font_size * 1.6);

        CardLayout {
            size: Size::new(style.card_width, status.max_y() + p),
            thumbnail,
            buttons,
            status,
        }
    }

    pub fn button_at(&self, point: Point) -> Option<QuickAction> {
        self.buttons
            .iter()
            .find(|(_, frame)| frame.contains(point))
            .map(|&(action, _)| action)
    }

    pub fn frame_of(&self, action: QuickAction) -> Option<Rect> {
        self.buttons
            .iter()
            .find(|(a, _)| *a == action)
            .map(|&(_, frame)| frame)
    }
}

/// Screen-space origin for a card of `size` near `anchor`.
///
/// The card hangs below the capture, right-aligned with it; above when there
/// is no room below; otherwise inside its bottom edge. Without an anchor it
/// goes to the bottom-right corner of `screen`. Always clamped to `screen`.
pub fn card_origin(anchor: Option<Rect>, screen: Rect, size: Size, margin: f64) -> Point {
    let Some(a) = anchor else {
        return Point::new(
            screen.max_x() - margin - size.width,
            screen.min_y() + margin,
        );
    };

    let x = a.max_x() - size.width;
    let below = a.min_y() - margin - size.height;
    let above = a.max_y() + margin;
    let y = if below >= screen.min_y() {
        below
    } else if above + size.height <= screen.max_y() {
        above
    } else {
        a.min_y() + margin
    };

    Rect::from_origin_size(Point::new(x, y), size)
        .clamped_within(screen)
        .origin
}
