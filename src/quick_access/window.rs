use objc2::rc::Retained;
use objc2_app_kit::{NSBackingStoreType, NSColor, NSPanel, NSScreen, NSWindowStyleMask};
use objc2_core_graphics::kCGOverlayWindowLevel;
use objc2_foundation::MainThreadMarker;

use crate::config::QuickAccessStyle;
use crate::geometry::Rect;

use super::layout::card_origin;
use super::view::QuickAccessView;
use super::{AfterDismiss, QuickAccessController};

pub struct QuickAccessWindow {
    pub panel: Retained<NSPanel>,
    pub view: Retained<QuickAccessView>,
}

impl QuickAccessWindow {
    pub fn new(mtm: MainThreadMarker, controller: QuickAccessController, style: &QuickAccessStyle) -> Self {
        let view = QuickAccessView::new(mtm, controller, style.font_size);
        let view_frame = view.frame();

        let panel = NSPanel::initWithContentRect_styleMask_backing_defer(
            mtm.alloc(),
            view_frame,
            NSWindowStyleMask::Borderless | NSWindowStyleMask::NonactivatingPanel,
            NSBackingStoreType::Buffered,
            false,
        );

        panel.setLevel((kCGOverlayWindowLevel + 1) as _);
        panel.setOpaque(false);
        panel.setBackgroundColor(Some(&NSColor::clearColor()));
        panel.setHasShadow(true);
        panel.setHidesOnDeactivate(false);
        panel.setFloatingPanel(true);
        panel.setAcceptsMouseMovedEvents(true);
        unsafe { panel.setReleasedWhenClosed(false) };

        panel.setContentView(Some(&view));

        QuickAccessWindow { panel, view }
    }

    /// Show the card next to `anchor` (the captured area, screen space) on
    /// the main screen.
    pub fn show_near(&self, anchor: Option<Rect>, style: &QuickAccessStyle, mtm: MainThreadMarker) {
        let screen: Option<Rect> = NSScreen::mainScreen(mtm).map(|s| s.visibleFrame().into());
        let size = self.view.frame().size.into();
        if let Some(screen) = screen {
            let origin = card_origin(anchor, screen, size, style.margin);
            self.panel.setFrameOrigin(origin.into());
        }
        // Accessory apps need orderFrontRegardless to get above other apps.
        self.panel.orderFrontRegardless();
    }

    /// Tear the card down, then run `on_closed` with whatever the dismissing
    /// action asked for.
    pub fn dismiss(&self, on_closed: impl FnOnce(AfterDismiss)) {
        let after = self.view.take_dismissal().unwrap_or(AfterDismiss::Nothing);
        self.panel.orderOut(None);
        on_closed(after);
    }
}
