use std::cell::{Cell, RefCell};

use objc2::rc::Retained;
use objc2::{define_class, msg_send, DefinedClass, MainThreadOnly};
use objc2_app_kit::{
    NSApplication, NSEvent, NSGraphicsContext, NSImage, NSTrackingArea, NSTrackingAreaOptions,
    NSView,
};
use objc2_core_graphics::CGContext;
use objc2_foundation::{MainThreadMarker, NSRect};

use crate::drawing::{self, Rgba, ACCENT, WHITE};
use crate::geometry::{Point, Rect};

use super::thumbnail::{self, Thumbnail};
use super::{AfterDismiss, Dispatch, QuickAccessController, QuickAction};

const KEY_ESCAPE: u16 = 53;

const CARD_BACKGROUND: Rgba = (0.12, 0.12, 0.13, 0.96);
const THUMBNAIL_BACKGROUND: Rgba = (0.2, 0.2, 0.22, 1.0);
const BUTTON_BACKGROUND: Rgba = (1.0, 1.0, 1.0, 0.08);
const STATUS_TEXT: Rgba = (1.0, 1.0, 1.0, 0.7);
const GLYPH_ADVANCE: f64 = 0.6;
const THUMBNAIL_INSET: f64 = 2.0;

pub struct QuickAccessViewIvars {
    controller: RefCell<QuickAccessController>,
    image: RefCell<Option<Retained<NSImage>>>,
    font_size: f64,
    /// Set once the controller dismisses; read by the app delegate.
    dismissal: Cell<Option<AfterDismiss>>,
    tracking_area: RefCell<Option<Retained<NSTrackingArea>>>,
}

define_class!(
    #[unsafe(super(NSView))]
    #[thread_kind = MainThreadOnly]
    #[name = "QuickAccessView"]
    #[ivars = QuickAccessViewIvars]
    pub struct QuickAccessView;

    impl QuickAccessView {
        #[unsafe(method(isFlipped))]
        fn is_flipped(&self) -> bool {
            true
        }

        #[unsafe(method(acceptsFirstMouse:))]
        fn accepts_first_mouse(&self, _event: Option<&NSEvent>) -> bool {
            true
        }

        #[unsafe(method(acceptsFirstResponder))]
        fn accepts_first_responder(&self) -> bool {
            true
        }

        #[unsafe(method(drawRect:))]
        fn draw_rect(&self, _dirty_rect: NSRect) {
            let Some(context) = NSGraphicsContext::currentContext() else {
                return;
            };
            let cg = context.CGContext();
            self.draw_card(&cg);
        }

        #[unsafe(method(mouseMoved:))]
        fn mouse_moved(&self, event: &NSEvent) {
            let point = self.event_point(event);
            if self.ivars().controller.borrow_mut().hover(Some(point)) {
                self.setNeedsDisplay(true);
            }
        }

        #[unsafe(method(mouseExited:))]
        fn mouse_exited(&self, _event: &NSEvent) {
            if self.ivars().controller.borrow_mut().hover(None) {
                self.setNeedsDisplay(true);
            }
        }

        #[unsafe(method(mouseDown:))]
        fn mouse_down(&self, event: &NSEvent) {
            let point = self.event_point(event);
            let dispatch = self.ivars().controller.borrow_mut().click(point);
            self.apply(dispatch);
        }

        #[unsafe(method(keyDown:))]
        fn key_down(&self, event: &NSEvent) {
            if event.keyCode() == KEY_ESCAPE {
                let dispatch = self.ivars().controller.borrow_mut().perform(QuickAction::Close);
                self.apply(dispatch);
            }
        }

        #[unsafe(method(updateTrackingAreas))]
        fn update_tracking_areas(&self) {
            if let Some(old_area) = self.ivars().tracking_area.borrow_mut().take() {
                self.removeTrackingArea(&old_area);
            }

            let options = NSTrackingAreaOptions::MouseMoved
                | NSTrackingAreaOptions::MouseEnteredAndExited
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

impl QuickAccessView {
    pub fn new(mtm: MainThreadMarker, mut controller: QuickAccessController, font_size: f64) -> Retained<Self> {
        let size = controller.layout().size;
        let image = match controller.appear() {
            // Only the aspect ratio matters; the view fits it to the thumbnail frame.
            Thumbnail::Image(bitmap) => drawing::ns_image(bitmap, 1.0, mtm),
            Thumbnail::Placeholder(_) => None,
        };

        let this = mtm.alloc().set_ivars(QuickAccessViewIvars {
            controller: RefCell::new(controller),
            image: RefCell::new(image),
            font_size,
            dismissal: Cell::new(None),
            tracking_area: RefCell::new(None),
        });
        let frame = Rect::from_origin_size(Point::ZERO, size);
        let view: Retained<Self> = unsafe { msg_send![super(this), initWithFrame: NSRect::from(frame)] };
        view
    }

    /// Drain a finished OCR job, if any. Called from the app's poll timer.
    pub fn poll(&self) {
        let dispatch = self.ivars().controller.borrow_mut().poll();
        if let Some(dispatch) = dispatch {
            self.apply(dispatch);
        }
    }

    pub fn take_dismissal(&self) -> Option<AfterDismiss> {
        self.ivars().dismissal.take()
    }

    fn event_point(&self, event: &NSEvent) -> Point {
        let window_point = event.locationInWindow();
        self.convertPoint_fromView(window_point, None).into()
    }

    fn apply(&self, dispatch: Dispatch) {
        self.setNeedsDisplay(true);
        if let Dispatch::Dismiss(after) = dispatch {
            self.ivars().dismissal.set(Some(after));
            let app = NSApplication::sharedApplication(MainThreadMarker::from(self));
            if let Some(delegate) = app.delegate() {
                let _: () = unsafe { msg_send![&*delegate, quickAccessFinished: self] };
            }
        }
    }

    fn draw_card(&self, cg: &CGContext) {
        let controller = self.ivars().controller.borrow();
        let layout = controller.layout();
        let font_size = self.ivars().font_size;

        drawing::fill_rect(cg, Rect::from_origin_size(Point::ZERO, layout.size), CARD_BACKGROUND);
        drawing::fill_rect(cg, layout.thumbnail, THUMBNAIL_BACKGROUND);

        match (self.ivars().image.borrow().as_ref(), controller.thumbnail()) {
            (Some(image), _) => {
                let area = layout.thumbnail.inset(THUMBNAIL_INSET, THUMBNAIL_INSET);
                let fitted = thumbnail::fit_within(image.size().into(), area);
                image.drawInRect(fitted.into());
            }
            (None, Some(Thumbnail::Placeholder(glyph))) => {
                let glyph_size = layout.thumbnail.height() / 3.0;
                draw_centered(cg, layout.thumbnail, glyph, WHITE, glyph_size);
            }
            _ => {}
        }

        let busy = controller.is_busy();
        for &(action, frame) in &layout.buttons {
            let background = if controller.hovered() == Some(action) && !busy {
                ACCENT
            } else {
                BUTTON_BACKGROUND
            };
            drawing::fill_rect(cg, frame, background);
            let text = format!("{} {}", action.glyph(), action.label());
            let color = if busy { STATUS_TEXT } else { WHITE };
            draw_centered(cg, frame, &text, color, font_size);
        }

        if let Some(status) = controller.status() {
            draw_centered(cg, layout.status, status, STATUS_TEXT, font_size);
        }
    }
}

fn draw_centered(cg: &CGContext, frame: Rect, text: &str, color: Rgba, font_size: f64) {
    let width = text.chars().count() as f64 * font_size * GLYPH_ADVANCE;
    let at = Point::new(
        frame.mid_x() - width / 2.0,
        frame.mid_y() - font_size * 0.65,
    );
    drawing::draw_lines(cg, at, &[text], font_size, color, font_size);
}
