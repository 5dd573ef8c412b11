use std::cell::{Cell, RefCell};

use objc2::rc::Retained;
use objc2::{define_class, msg_send, DefinedClass, MainThreadOnly};
use objc2_app_kit::{NSCursor, NSEvent, NSGraphicsContext, NSTrackingArea, NSTrackingAreaOptions, NSView};
use objc2_core_graphics::CGContext;
use objc2_foundation::{MainThreadMarker, NSRect};

use crate::config::SelectionStyle;
use crate::drawing::{self, ACCENT, LABEL_BACKGROUND, WHITE};
use crate::geometry::{Point, Rect};

use super::scene::SelectionScene;
use super::{SelectionEvent, SelectionOutcome, SelectionOverlay};

const KEY_ESCAPE: u16 = 53;
const CROSSHAIR: drawing::Rgba = (1.0, 1.0, 1.0, 0.55);

pub struct SelectionViewIvars {
    pub overlay: RefCell<SelectionOverlay>,
    /// Where the current mouse press started, in view coordinates.
    press: Cell<Option<Point>>,
    outcome: Cell<Option<SelectionOutcome>>,
    tracking_area: RefCell<Option<Retained<NSTrackingArea>>>,
}

define_class!(
    #[unsafe(super(NSView))]
    #[thread_kind = MainThreadOnly]
    #[name = "SelectionView"]
    #[ivars = SelectionViewIvars]
    pub struct SelectionView;

    impl SelectionView {
        #[unsafe(method(isFlipped))]
        fn is_flipped(&self) -> bool {
            true
        }

        #[unsafe(method(acceptsFirstResponder))]
        fn accepts_first_responder(&self) -> bool {
            true
        }

        #[unsafe(method(acceptsFirstMouse:))]
        fn accepts_first_mouse(&self, _event: Option<&NSEvent>) -> bool {
            true
        }

        #[unsafe(method(drawRect:))]
        fn draw_rect(&self, _dirty_rect: NSRect) {
            let Some(context) = NSGraphicsContext::currentContext() else {
                return;
            };
            let cg = context.CGContext();
            let scene = self.ivars().overlay.borrow().scene();
            draw_scene(&cg, &scene);
        }

        #[unsafe(method(mouseDown:))]
        fn mouse_down(&self, event: &NSEvent) {
            let point = self.event_point(event);
            self.ivars().press.set(Some(point));
            self.send(SelectionEvent::DragChanged { start: point, location: point });
        }

        #[unsafe(method(mouseDragged:))]
        fn mouse_dragged(&self, event: &NSEvent) {
            let location = self.event_point(event);
            let start = self.ivars().press.get().unwrap_or(location);
            self.send(SelectionEvent::DragChanged { start, location });
        }

        #[unsafe(method(mouseUp:))]
        fn mouse_up(&self, event: &NSEvent) {
            let location = self.event_point(event);
            let start = self.ivars().press.take().unwrap_or(location);
            self.send(SelectionEvent::DragEnded { start, location });
        }

        #[unsafe(method(mouseMoved:))]
        fn mouse_moved(&self, event: &NSEvent) {
            let point = self.event_point(event);
            self.send(SelectionEvent::PointerMoved(point));
        }

        #[unsafe(method(keyDown:))]
        fn key_down(&self, event: &NSEvent) {
            if event.keyCode() == KEY_ESCAPE {
                self.send(SelectionEvent::Exit);
            }
        }

        #[unsafe(method(cancelOperation:))]
        fn cancel_operation(&self, _sender: Option<&objc2::runtime::AnyObject>) {
            self.send(SelectionEvent::Exit);
        }

        #[unsafe(method(resetCursorRects))]
        fn reset_cursor_rects(&self) {
            let bounds = self.bounds();
            self.addCursorRect_cursor(bounds, &NSCursor::crosshairCursor());
        }

        #[unsafe(method(updateTrackingAreas))]
        fn update_tracking_areas(&self) {
            if let Some(old_area) = self.ivars().tracking_area.borrow_mut().take() {
                self.removeTrackingArea(&old_area);
            }

            let options = NSTrackingAreaOptions::MouseMoved
                | NSTrackingAreaOptions::ActiveAlways
                | NSTrackingAreaOptions::InVisibleRect;
            let area = unsafe {
                NSTrackingArea::initWithRect_options_owner_userInfo(
                    MainThreadMarker::from(self).alloc(),
                    self.bounds(),
                    options,
                    Some(self),
                    None,
                )
            };
            self.addTrackingArea(&area);
            *self.ivars().tracking_area.borrow_mut() = Some(area);
        }
    }
);

impl SelectionView {
    pub fn new(mtm: MainThreadMarker, frame: Rect, style: SelectionStyle) -> Retained<Self> {
        let this = mtm.alloc().set_ivars(SelectionViewIvars {
            overlay: RefCell::new(SelectionOverlay::new(Some(frame), frame, style)),
            press: Cell::new(None),
            outcome: Cell::new(None),
            tracking_area: RefCell::new(None),
        });
        let local = Rect::from_origin_size(Point::ZERO, frame.size);
        let view: Retained<Self> = unsafe { msg_send![super(this), initWithFrame: NSRect::from(local)] };
        view
    }

    /// Start a fresh session over `frame`.
    pub fn reset(&self, frame: Rect, style: SelectionStyle) {
        *self.ivars().overlay.borrow_mut() = SelectionOverlay::new(Some(frame), frame, style);
        self.ivars().press.set(None);
        self.ivars().outcome.set(None);
        self.setNeedsDisplay(true);
    }

    pub fn take_outcome(&self) -> Option<SelectionOutcome> {
        self.ivars().outcome.take()
    }

    fn event_point(&self, event: &NSEvent) -> Point {
        let window_point = event.locationInWindow();
        self.convertPoint_fromView(window_point, None).into()
    }

    fn send(&self, event: SelectionEvent) {
        let outcome = self.ivars().overlay.borrow_mut().handle(event);
        self.setNeedsDisplay(true);
        if let Some(outcome) = outcome {
            self.ivars().outcome.set(Some(outcome));
            self.notify_finished();
        }
    }

    /// Tell the app delegate an outcome is waiting in `take_outcome`.
    fn notify_finished(&self) {
        let mtm = MainThreadMarker::from(self);
        let app = objc2_app_kit::NSApplication::sharedApplication(mtm);
        if let Some(delegate) = app.delegate() {
            let _: () = unsafe { msg_send![&*delegate, selectionFinished: self] };
        }
    }
}

fn draw_scene(cg: &CGContext, scene: &SelectionScene) {
    for band in &scene.mask {
        drawing::fill_rect(cg, *band, (0.0, 0.0, 0.0, scene.dim_alpha));
    }

    if let Some(crosshair) = scene.crosshair {
        CGContext::save_g_state(Some(cg));
        let dash: [f64; 2] = [4.0, 4.0];
        unsafe { CGContext::set_line_dash(Some(cg), 0.0, dash.as_ptr(), dash.len()) };
        let (a, b) = crosshair.horizontal;
        drawing::line(cg, a, b, CROSSHAIR, 1.0);
        let (a, b) = crosshair.vertical;
        drawing::line(cg, a, b, CROSSHAIR, 1.0);
        CGContext::restore_g_state(Some(cg));
    }

    if let Some(selection) = scene.selection {
        drawing::stroke_rect(cg, selection, ACCENT, scene.border_width);
        for handle in &scene.handles {
            drawing::fill_rect(cg, *handle, WHITE);
            drawing::stroke_rect(cg, *handle, ACCENT, 1.0);
        }
    }

    if let Some(ref badge) = scene.badge {
        drawing::draw_label(cg, badge, ACCENT, WHITE);
    }
    if let Some(ref readout) = scene.readout {
        drawing::draw_label(cg, readout, LABEL_BACKGROUND, WHITE);
    }
    if let Some(ref panel) = scene.info_panel {
        drawing::draw_label(cg, panel, LABEL_BACKGROUND, WHITE);
    }
}
