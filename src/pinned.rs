use std::cell::RefCell;

use image::RgbaImage;
use objc2::rc::Retained;
use objc2::{define_class, msg_send, DefinedClass, MainThreadOnly};
use objc2_app_kit::{
    NSBackingStoreType, NSEvent, NSImage, NSScreen, NSView, NSWindow, NSWindowStyleMask,
};
use objc2_core_graphics::kCGFloatingWindowLevel;
use objc2_foundation::{MainThreadMarker, NSObjectProtocol, NSRect, NSString};

use crate::drawing;
use crate::geometry::{Point, Rect, Size};
use crate::services::Pinboard;

const KEY_ESCAPE: u16 = 53;
/// Pins never open larger than this share of the screen.
const MAX_SCREEN_FRACTION: f64 = 0.6;

// --- View that draws the pinned image scaled to its bounds ---

pub struct PinnedViewIvars {
    image: Retained<NSImage>,
}

define_class!(
    #[unsafe(super(NSView))]
    #[thread_kind = MainThreadOnly]
    #[name = "PinnedImageView"]
    #[ivars = PinnedViewIvars]
    pub struct PinnedView;

    unsafe impl NSObjectProtocol for PinnedView {}

    impl PinnedView {
        #[unsafe(method(drawRect:))]
        fn draw_rect(&self, _dirty_rect: NSRect) {
            self.ivars().image.drawInRect(self.bounds());
        }

        #[unsafe(method(acceptsFirstResponder))]
        fn accepts_first_responder(&self) -> bool {
            true
        }

        #[unsafe(method(keyDown:))]
        fn key_down(&self, event: &NSEvent) {
            if event.keyCode() == KEY_ESCAPE {
                if let Some(window) = self.window() {
                    window.close();
                }
            }
        }
    }
);

impl PinnedView {
    fn new(mtm: MainThreadMarker, frame: NSRect, image: Retained<NSImage>) -> Retained<Self> {
        let this = mtm.alloc().set_ivars(PinnedViewIvars { image });
        let view: Retained<Self> = unsafe { msg_send![super(this), initWithFrame: frame] };
        view
    }
}

// --- Floating windows, one per pin ---

pub struct PinnedWindows {
    mtm: MainThreadMarker,
    windows: RefCell<Vec<Retained<NSWindow>>>,
}

impl PinnedWindows {
    pub fn new(mtm: MainThreadMarker) -> Self {
        PinnedWindows {
            mtm,
            windows: RefCell::new(Vec::new()),
        }
    }

    /// Forget windows the user has closed.
    fn prune(&self) {
        self.windows.borrow_mut().retain(|w| w.isVisible());
    }

    fn open(&self, image: &RgbaImage, title: &str) -> Option<Retained<NSWindow>> {
        let mtm = self.mtm;
        let main_screen = NSScreen::mainScreen(mtm)?;
        let screen: Rect = main_screen.visibleFrame().into();
        // Captures are taken at backing resolution, so one point spans `scale` pixels.
        let scale = main_screen.backingScaleFactor();
        let ns_image = drawing::ns_image(image, scale, mtm)?;

        let size = initial_size(drawing::point_size(image, scale), screen.size);
        let origin = Point::new(
            screen.mid_x() - size.width / 2.0,
            screen.mid_y() - size.height / 2.0,
        );
        let frame: NSRect = Rect::from_origin_size(origin, size).into();

        let window = unsafe {
            NSWindow::initWithContentRect_styleMask_backing_defer(
                mtm.alloc(),
                frame,
                NSWindowStyleMask::Titled
                    | NSWindowStyleMask::Closable
                    | NSWindowStyleMask::Resizable,
                NSBackingStoreType::Buffered,
                false,
            )
        };
        window.setLevel(kCGFloatingWindowLevel as _);
        window.setTitle(&NSString::from_str(title));
        window.setContentAspectRatio(frame.size);
        unsafe { window.setReleasedWhenClosed(false) };

        let local = Rect::from_origin_size(Point::ZERO, size);
        let view = PinnedView::new(mtm, local.into(), ns_image);
        window.setContentView(Some(&view));
        window.makeKeyAndOrderFront(None);
        window.makeFirstResponder(Some(&view));
        Some(window)
    }
}

impl Pinboard for PinnedWindows {
    fn pin(&self, image: RgbaImage, title: &str) {
        self.prune();
        match self.open(&image, title) {
            Some(window) => {
                log::info!("pinned {} ({}x{})", title, image.width(), image.height());
                self.windows.borrow_mut().push(window);
            }
            None => log::warn!("could not pin {}", title),
        }
    }
}

/// Natural point size of the image, shrunk to fit within a share of the screen.
fn initial_size(image: Size, screen: Size) -> Size {
    let max_w = screen.width * MAX_SCREEN_FRACTION;
    let max_h = screen.height * MAX_SCREEN_FRACTION;
    let scale = (max_w / image.width).min(max_h / image.height).min(1.0);
    Size::new(image.width * scale, image.height * scale)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retina_capture_opens_at_selected_point_size() {
        let pixels = RgbaImage::new(800, 600);
        let size = initial_size(drawing::point_size(&pixels, 2.0), Size::new(1440.0, 900.0));
        assert_eq!(size, Size::new(400.0, 300.0));
    }

    #[test]
    fn oversized_pin_shrinks_to_screen_share() {
        let size = initial_size(Size::new(2000.0, 1000.0), Size::new(1000.0, 1000.0));
        assert_eq!(size, Size::new(600.0, 300.0));
    }
}
