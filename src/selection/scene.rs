//! What the selection overlay draws, as plain data.
//!
//! The AppKit view turns a [`SelectionScene`] into CoreGraphics calls; keeping
//! the layout here means it can be checked without a window server.

use crate::config::SelectionStyle;
use crate::geometry::{Point, Rect, Size};

use super::handles::HandlePosition;

const LABEL_PADDING_H: f64 = 6.0;
const LABEL_PADDING_V: f64 = 3.0;
const LINE_HEIGHT: f64 = 1.3;
/// Average advance of a system-font glyph relative to the font size.
const GLYPH_ADVANCE: f64 = 0.6;
const BADGE_GAP: f64 = 6.0;
const READOUT_OFFSET: f64 = 16.0;
const INFO_PANEL_TOP: f64 = 24.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub lines: Vec<String>,
    pub frame: Rect,
    pub font_size: f64,
}

impl Label {
    fn new(lines: Vec<String>, font_size: f64, origin: Point) -> Self {
        let size = measure(&lines, font_size);
        Label {
            lines,
            frame: Rect::from_origin_size(origin, size),
            font_size,
        }
    }

    /// Top-left of the first line of text inside the frame.
    pub fn text_origin(&self) -> Point {
        Point::new(
            self.frame.min_x() + LABEL_PADDING_H,
            self.frame.min_y() + LABEL_PADDING_V,
        )
    }

    pub fn line_height(&self) -> f64 {
        self.font_size * LINE_HEIGHT
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Crosshair {
    pub horizontal: (Point, Point),
    pub vertical: (Point, Point),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SelectionScene {
    pub bounds: Rect,
    /// Regions covered by the dimming mask.
    pub mask: Vec<Rect>,
    pub dim_alpha: f64,
    pub selection: Option<Rect>,
    pub border_width: f64,
    pub handles: Vec<Rect>,
    /// "W × H" next to the selection.
    pub badge: Option<Label>,
    pub crosshair: Option<Crosshair>,
    /// Pointer position in screen coordinates, next to the pointer.
    pub readout: Option<Label>,
    pub info_panel: Option<Label>,
}

/// Lay out everything for one frame.
///
/// `bounds` is the overlay in view space, `frame` the same surface in screen
/// space; `selection` is the live drag rectangle in view space.
pub fn build(
    bounds: Rect,
    frame: Rect,
    selection: Option<Rect>,
    pointer: Option<Point>,
    style: &SelectionStyle,
) -> SelectionScene {
    let selection = selection.filter(|r| !r.is_empty());

    let handles = selection
        .map(|sel| {
            HandlePosition::ALL
                .iter()
                .map(|h| h.marker(sel, style.handle_size))
                .collect()
        })
        .unwrap_or_default();

    SelectionScene {
        bounds,
        mask: mask_bands(bounds, selection),
        dim_alpha: style.dim_alpha,
        selection,
        border_width: style.border_width,
        handles,
        badge: selection.map(|sel| dimension_badge(bounds, sel, style.badge_font_size)),
        crosshair: pointer
            .filter(|_| style.show_crosshair)
            .map(|p| crosshair(bounds, p)),
        readout: pointer.map(|p| coordinate_readout(bounds, frame, p, style.readout_font_size)),
        info_panel: style
            .show_info_panel
            .then(|| info_panel(bounds, frame, selection, style.readout_font_size)),
    }
}

/// The dimmed area: the whole surface, or the four bands around a selection.
fn mask_bands(bounds: Rect, selection: Option<Rect>) -> Vec<Rect> {
    let Some(sel) = selection else {
        return vec![bounds];
    };
    let top = Rect::new(bounds.min_x(), bounds.min_y(), bounds.width(), sel.min_y() - bounds.min_y());
    let bottom = Rect::new(bounds.min_x(), sel.max_y(), bounds.width(), bounds.max_y() - sel.max_y());
    let left = Rect::new(bounds.min_x(), sel.min_y(), sel.min_x() - bounds.min_x(), sel.height());
    let right = Rect::new(sel.max_x(), sel.min_y(), bounds.max_x() - sel.max_x(), sel.height());
    [top, bottom, left, right]
        .into_iter()
        .filter(|band| !band.is_empty())
        .collect()
}

fn dimension_badge(bounds: Rect, sel: Rect, font_size: f64) -> Label {
    let text = format!("{} \u{00D7} {}", sel.width().round() as i64, sel.height().round() as i64);
    let size = measure(std::slice::from_ref(&text), font_size);

    let above = sel.min_y() - BADGE_GAP - size.height;
    let y = if above < bounds.min_y() { sel.min_y() + BADGE_GAP } else { above };
    let mut label = Label::new(vec![text], font_size, Point::new(sel.min_x(), y));
    label.frame = label.frame.clamped_within(bounds);
    label
}

fn crosshair(bounds: Rect, p: Point) -> Crosshair {
    Crosshair {
        horizontal: (Point::new(bounds.min_x(), p.y), Point::new(bounds.max_x(), p.y)),
        vertical: (Point::new(p.x, bounds.min_y()), Point::new(p.x, bounds.max_y())),
    }
}

fn coordinate_readout(bounds: Rect, frame: Rect, p: Point, font_size: f64) -> Label {
    let screen = p.view_to_screen(frame);
    let text = format!("{}, {}", screen.x.round() as i64, screen.y.round() as i64);
    let size = measure(std::slice::from_ref(&text), font_size);

    // Below-right of the pointer, flipped to the other side near an edge.
    let mut x = p.x + READOUT_OFFSET;
    if x + size.width > bounds.max_x() {
        x = p.x - READOUT_OFFSET - size.width;
    }
    let mut y = p.y + READOUT_OFFSET;
    if y + size.height > bounds.max_y() {
        y = p.y - READOUT_OFFSET - size.height;
    }
    let mut label = Label::new(vec![text], font_size, Point::new(x, y));
    label.frame = label.frame.clamped_within(bounds);
    label
}

fn info_panel(bounds: Rect, frame: Rect, selection: Option<Rect>, font_size: f64) -> Label {
    let lines = match selection {
        Some(sel) => {
            let screen = sel.view_to_screen(frame);
            vec![
                format!(
                    "X {}  Y {}",
                    screen.min_x().round() as i64,
                    screen.min_y().round() as i64
                ),
                format!(
                    "W {}  H {}",
                    screen.width().round() as i64,
                    screen.height().round() as i64
                ),
            ]
        }
        None => vec![
            "Drag to select an area".to_string(),
            "Esc to cancel".to_string(),
        ],
    };
    let size = measure(&lines, font_size);
    let origin = Point::new(bounds.mid_x() - size.width / 2.0, bounds.min_y() + INFO_PANEL_TOP);
    Label::new(lines, font_size, origin)
}

/// Estimated box for `lines` in the system font.
fn measure(lines: &[String], font_size: f64) -> Size {
    let widest = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
    Size::new(
        widest as f64 * font_size * GLYPH_ADVANCE + LABEL_PADDING_H * 2.0,
        lines.len() as f64 * font_size * LINE_HEIGHT + LABEL_PADDING_V * 2.0,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOUNDS: Rect = Rect::new(0.0, 0.0, 1920.0, 1080.0);

    fn scene(selection: Option<Rect>, pointer: Option<Point>) -> SelectionScene {
        build(BOUNDS, BOUNDS, selection, pointer, &SelectionStyle::default())
    }

    #[test]
    fn idle_scene_dims_everything() {
        let s = scene(None, None);
        assert_eq!(s.mask, vec![BOUNDS]);
        assert!(s.handles.is_empty());
        assert!(s.badge.is_none());
        assert!(s.crosshair.is_none());
        assert_eq!(s.info_panel.unwrap().lines[1], "Esc to cancel");
    }

    #[test]
    fn mask_leaves_selection_clear() {
        let sel = Rect::new(100.0, 200.0, 300.0, 150.0);
        let s = scene(Some(sel), None);
        let masked: f64 = s.mask.iter().map(Rect::area).sum();
        assert_eq!(masked + sel.area(), BOUNDS.area());
        for band in &s.mask {
            assert!(!band.contains(Point::new(sel.mid_x(), sel.mid_y())));
        }
    }

    #[test]
    fn full_surface_selection_has_no_mask() {
        let s = scene(Some(BOUNDS), None);
        assert!(s.mask.is_empty());
    }

    #[test]
    fn zero_size_selection_is_not_drawn() {
        let s = scene(Some(Rect::new(50.0, 50.0, 0.0, 20.0)), None);
        assert!(s.selection.is_none());
        assert_eq!(s.mask, vec![BOUNDS]);
    }

    #[test]
    fn eight_handles_for_a_selection() {
        let s = scene(Some(Rect::new(10.0, 10.0, 50.0, 50.0)), None);
        assert_eq!(s.handles.len(), 8);
    }

    #[test]
    fn badge_sits_above_selection_with_rounded_size() {
        let sel = Rect::new(100.0, 200.0, 49.6, 30.2);
        let badge = scene(Some(sel), None).badge.unwrap();
        assert_eq!(badge.lines, vec!["50 \u{00D7} 30".to_string()]);
        assert!(badge.frame.max_y() <= sel.min_y());
    }

    #[test]
    fn badge_moves_inside_at_top_edge() {
        let sel = Rect::new(100.0, 0.0, 200.0, 100.0);
        let badge = scene(Some(sel), None).badge.unwrap();
        assert!(badge.frame.min_y() >= sel.min_y());
        assert!(sel.contains(badge.frame.origin));
    }

    #[test]
    fn readout_reports_screen_coordinates() {
        let readout = scene(None, Some(Point::new(100.0, 200.0))).readout.unwrap();
        assert_eq!(readout.lines, vec!["100, 880".to_string()]);
    }

    #[test]
    fn readout_flips_near_bottom_right() {
        let p = Point::new(1915.0, 1075.0);
        let readout = scene(None, Some(p)).readout.unwrap();
        assert!(readout.frame.max_x() <= p.x);
        assert!(readout.frame.max_y() <= p.y);
    }

    #[test]
    fn crosshair_spans_the_surface() {
        let c = scene(None, Some(Point::new(300.0, 400.0))).crosshair.unwrap();
        assert_eq!(c.horizontal, (Point::new(0.0, 400.0), Point::new(1920.0, 400.0)));
        assert_eq!(c.vertical, (Point::new(300.0, 0.0), Point::new(300.0, 1080.0)));
    }

    #[test]
    fn info_panel_shows_screen_space_selection() {
        let sel = Rect::new(100.0, 200.0, 50.0, 30.0);
        let panel = scene(Some(sel), None).info_panel.unwrap();
        assert_eq!(panel.lines, vec!["X 100  Y 850".to_string(), "W 50  H 30".to_string()]);
    }

    #[test]
    fn info_panel_lines_stack_inside_their_frame() {
        let panel = scene(Some(Rect::new(100.0, 200.0, 50.0, 30.0)), None).info_panel.unwrap();
        let origin = panel.text_origin();
        let bottom = origin.y + panel.lines.len() as f64 * panel.line_height();
        assert!(panel.frame.contains(origin));
        assert!((panel.frame.max_y() - LABEL_PADDING_V - bottom).abs() < 1e-9);
    }

    #[test]
    fn toggles_hide_crosshair_and_panel() {
        let style = SelectionStyle {
            show_crosshair: false,
            show_info_panel: false,
            ..SelectionStyle::default()
        };
        let s = build(BOUNDS, BOUNDS, None, Some(Point::new(1.0, 1.0)), &style);
        assert!(s.crosshair.is_none());
        assert!(s.info_panel.is_none());
        assert!(s.readout.is_some());
    }
}
