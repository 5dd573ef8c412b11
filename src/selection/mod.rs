//! Full-screen drag-to-select overlay.

pub mod handles;
pub mod scene;
pub mod session;

#[cfg(target_os = "macos")]
pub mod view;
#[cfg(target_os = "macos")]
pub mod window;

use crate::config::SelectionStyle;
use crate::geometry::{Point, Rect};

use scene::SelectionScene;
use session::DragSession;

/// Input to the overlay, in view space (top-left origin, y down).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SelectionEvent {
    DragChanged { start: Point, location: Point },
    DragEnded { start: Point, location: Point },
    /// Hover tracking, independent of any drag.
    PointerMoved(Point),
    /// Escape or equivalent.
    Exit,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SelectionOutcome {
    /// The chosen area in screen space.
    Selected(Rect),
    Cancelled,
}

pub struct SelectionOverlay {
    frame: Rect,
    style: SelectionStyle,
    session: DragSession,
    pointer: Option<Point>,
}

impl SelectionOverlay {
    /// `frame` overrides the surface's screen frame; without it the overlay
    /// covers `primary_frame`.
    pub fn new(frame: Option<Rect>, primary_frame: Rect, style: SelectionStyle) -> Self {
        SelectionOverlay {
            frame: frame.unwrap_or(primary_frame),
            style,
            session: DragSession::new(),
            pointer: None,
        }
    }

    pub fn frame(&self) -> Rect {
        self.frame
    }

    /// The surface in its own view space.
    pub fn bounds(&self) -> Rect {
        Rect::from_origin_size(Point::ZERO, self.frame.size)
    }

    pub fn session(&self) -> &DragSession {
        &self.session
    }

    pub fn pointer(&self) -> Option<Point> {
        self.pointer
    }

    /// Apply one event. Returns the terminal outcome when the event ends the
    /// overlay: a large-enough drag or an exit.
    pub fn handle(&mut self, event: SelectionEvent) -> Option<SelectionOutcome> {
        match event {
            SelectionEvent::DragChanged { start, location } => {
                self.session.drag_changed(start, location);
                self.pointer = Some(location);
                None
            }
            SelectionEvent::DragEnded { start, location } => {
                let local = self.session.drag_ended(start, location);
                self.pointer = Some(location);
                if !local.exceeds(self.style.min_selection_size) {
                    log::debug!(
                        "discarding {}x{} selection below threshold",
                        local.width(),
                        local.height()
                    );
                    return None;
                }
                let screen = local.view_to_screen(self.frame);
                log::debug!("selected {:?} (view {:?})", screen, local);
                Some(SelectionOutcome::Selected(screen))
            }
            SelectionEvent::PointerMoved(p) => {
                self.pointer = Some(p);
                None
            }
            SelectionEvent::Exit => {
                log::debug!("selection cancelled");
                Some(SelectionOutcome::Cancelled)
            }
        }
    }

    pub fn scene(&self) -> SelectionScene {
        scene::build(
            self.bounds(),
            self.frame,
            self.session.rect(),
            self.pointer,
            &self.style,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME: Rect = Rect::new(0.0, 0.0, 1920.0, 1080.0);

    fn overlay() -> SelectionOverlay {
        SelectionOverlay::new(None, FRAME, SelectionStyle::default())
    }

    fn drag(o: &mut SelectionOverlay, from: Point, to: Point) -> Option<SelectionOutcome> {
        o.handle(SelectionEvent::DragChanged { start: from, location: from });
        o.handle(SelectionEvent::DragChanged { start: from, location: to });
        o.handle(SelectionEvent::DragEnded { start: from, location: to })
    }

    #[test]
    fn frame_override_wins_over_primary() {
        let custom = Rect::new(1920.0, 0.0, 1280.0, 720.0);
        let o = SelectionOverlay::new(Some(custom), FRAME, SelectionStyle::default());
        assert_eq!(o.frame(), custom);
        assert_eq!(o.bounds(), Rect::new(0.0, 0.0, 1280.0, 720.0));
    }

    #[test]
    fn drag_delivers_screen_rect() {
        let mut o = overlay();
        let outcome = drag(&mut o, Point::new(150.0, 230.0), Point::new(100.0, 200.0));
        assert_eq!(
            outcome,
            Some(SelectionOutcome::Selected(Rect::new(100.0, 850.0, 50.0, 30.0)))
        );
        assert!(o.session().is_idle());
    }

    #[test]
    fn threshold_is_exclusive() {
        let mut o = overlay();
        assert_eq!(drag(&mut o, Point::new(0.0, 0.0), Point::new(5.0, 50.0)), None);
        assert!(o.session().is_idle());
        assert!(drag(&mut o, Point::new(0.0, 0.0), Point::new(5.5, 5.5)).is_some());
    }

    #[test]
    fn live_rect_tracks_current_point() {
        let mut o = overlay();
        let start = Point::new(10.0, 10.0);
        o.handle(SelectionEvent::DragChanged { start, location: Point::new(60.0, 40.0) });
        assert_eq!(o.scene().selection, Some(Rect::new(10.0, 10.0, 50.0, 30.0)));
    }

    #[test]
    fn pointer_motion_does_not_start_a_drag() {
        let mut o = overlay();
        assert_eq!(o.handle(SelectionEvent::PointerMoved(Point::new(5.0, 5.0))), None);
        assert!(o.session().is_idle());
        assert_eq!(o.pointer(), Some(Point::new(5.0, 5.0)));
        assert!(o.scene().selection.is_none());
    }

    #[test]
    fn exit_leaves_session_untouched() {
        let mut o = overlay();
        let start = Point::new(10.0, 10.0);
        o.handle(SelectionEvent::DragChanged { start, location: Point::new(80.0, 90.0) });
        let before = o.session().clone();

        assert_eq!(o.handle(SelectionEvent::Exit), Some(SelectionOutcome::Cancelled));
        assert_eq!(o.session(), &before);
    }
}
