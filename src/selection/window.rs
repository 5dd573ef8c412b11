use objc2::rc::Retained;
use objc2::{define_class, msg_send, MainThreadOnly};
use objc2_app_kit::{NSApplication, NSBackingStoreType, NSColor, NSScreen, NSWindow, NSWindowStyleMask};
use objc2_core_graphics::kCGOverlayWindowLevel;
use objc2_foundation::MainThreadMarker;

use crate::config::SelectionStyle;
use crate::error::{Error, Result};
use crate::geometry::Rect;

use super::view::SelectionView;
use super::SelectionOutcome;

// Borderless windows refuse key status unless asked.
pub struct KeyableWindowIvars {}

define_class!(
    #[unsafe(super(NSWindow))]
    #[thread_kind = MainThreadOnly]
    #[name = "QuickshotKeyableWindow"]
    #[ivars = KeyableWindowIvars]
    pub struct KeyableWindow;

    impl KeyableWindow {
        #[unsafe(method(canBecomeKeyWindow))]
        fn can_become_key_window(&self) -> bool {
            true
        }

        #[unsafe(method(canBecomeMainWindow))]
        fn can_become_main_window(&self) -> bool {
            true
        }
    }
);

pub struct SelectionWindow {
    pub window: Retained<KeyableWindow>,
    pub view: Retained<SelectionView>,
}

impl SelectionWindow {
    pub fn new(mtm: MainThreadMarker, style: SelectionStyle) -> Result<Self> {
        let frame: Rect = NSScreen::mainScreen(mtm)
            .ok_or_else(|| Error::Capture("no main screen".into()))?
            .frame()
            .into();

        let this = mtm.alloc().set_ivars(KeyableWindowIvars {});
        let window: Retained<KeyableWindow> = unsafe {
            msg_send![
                super(this),
                initWithContentRect: objc2_foundation::NSRect::from(frame),
                styleMask: NSWindowStyleMask::Borderless,
                backing: NSBackingStoreType::Buffered,
                defer: false
            ]
        };

        window.setLevel(kCGOverlayWindowLevel as _);
        window.setOpaque(false);
        window.setBackgroundColor(Some(&NSColor::clearColor()));
        window.setHasShadow(false);
        window.setIgnoresMouseEvents(false);
        window.setAcceptsMouseMovedEvents(true);
        unsafe { window.setReleasedWhenClosed(false) };

        let view = SelectionView::new(mtm, frame, style);
        window.setContentView(Some(&view));

        Ok(SelectionWindow { window, view })
    }

    /// Cover `frame` (screen space) and start a fresh selection.
    pub fn show(&self, frame: Rect, style: SelectionStyle, mtm: MainThreadMarker) {
        self.view.reset(frame, style);
        self.window.setFrame_display(frame.into(), true);

        // Activate first so the opening click reaches the view.
        #[allow(deprecated)]
        NSApplication::sharedApplication(mtm).activateIgnoringOtherApps(true);

        self.window.makeKeyAndOrderFront(None);
        self.window.makeFirstResponder(Some(&*self.view));
        self.window.invalidateCursorRectsForView(&self.view);
    }

    pub fn hide(&self) {
        self.window.orderOut(None);
    }

    pub fn take_outcome(&self) -> Option<SelectionOutcome> {
        self.view.take_outcome()
    }

    pub fn window_number(&self) -> u32 {
        self.window.windowNumber() as u32
    }
}
