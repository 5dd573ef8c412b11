use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use objc2::rc::Retained;
use objc2::runtime::AnyObject;
use objc2::{define_class, msg_send, sel, DefinedClass, MainThreadOnly};
use objc2_app_kit::{NSApplication, NSApplicationDelegate, NSScreen};
use objc2_foundation::{MainThreadMarker, NSNotification, NSObject, NSObjectProtocol, NSTimer};

use crate::capture;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::geometry::Rect;
use crate::hotkey::HotkeyManager;
use crate::pinned::PinnedWindows;
use crate::quick_access::window::QuickAccessWindow;
use crate::quick_access::{AfterDismiss, QuickAccessController};
use crate::selection::window::SelectionWindow;
use crate::selection::SelectionOutcome;
use crate::services::clipboard::SystemClipboard;
use crate::services::ocr::TesseractRecognizer;
use crate::services::workspace::{self, SystemWorkspace};
use crate::services::Services;
use crate::statusbar::StatusBar;
use crate::storage::model::CaptureItem;
use crate::storage::StorageManager;

pub struct AppDelegateIvars {
    config: Config,
    status_bar: RefCell<Option<StatusBar>>,
    hotkey_manager: RefCell<Option<HotkeyManager>>,
    storage: RefCell<Option<Rc<StorageManager>>>,
    services: RefCell<Option<Services>>,
    selection: RefCell<Option<SelectionWindow>>,
    quick_access: RefCell<Option<QuickAccessWindow>>,
    /// A dismissed card, kept alive until the next timer tick so its view is
    /// not freed while still on the call stack.
    retired: RefCell<Option<QuickAccessWindow>>,
}

define_class!(
    #[unsafe(super(NSObject))]
    #[thread_kind = MainThreadOnly]
    #[name = "QuickshotAppDelegate"]
    #[ivars = AppDelegateIvars]
    pub struct AppDelegate;

    unsafe impl NSObjectProtocol for AppDelegate {}

    unsafe impl NSApplicationDelegate for AppDelegate {
        #[unsafe(method(applicationDidFinishLaunching:))]
        fn application_did_finish_launching(&self, _notification: &NSNotification) {
            let mtm = MainThreadMarker::from(self);
            let config = &self.ivars().config;

            *self.ivars().status_bar.borrow_mut() = Some(StatusBar::new(mtm));

            match HotkeyManager::new(&config.capture_hotkey) {
                Ok(manager) => *self.ivars().hotkey_manager.borrow_mut() = Some(manager),
                Err(e) => log::error!("{}; capture stays available from the menu", e),
            }

            match StorageManager::open(&config.storage_location) {
                Ok(storage) => {
                    let storage = Rc::new(storage);
                    *self.ivars().services.borrow_mut() = Some(Services {
                        store: storage.clone(),
                        clipboard: Rc::new(SystemClipboard),
                        workspace: Rc::new(SystemWorkspace),
                        pinboard: Rc::new(PinnedWindows::new(mtm)),
                        recognizer: Arc::new(TesseractRecognizer::new(config.ocr_language.clone())),
                    });
                    *self.ivars().storage.borrow_mut() = Some(storage);
                }
                Err(e) => log::error!("capture storage unavailable: {}", e),
            }

            match SelectionWindow::new(mtm, config.selection.clone()) {
                Ok(window) => *self.ivars().selection.borrow_mut() = Some(window),
                Err(e) => log::error!("cannot create selection overlay: {}", e),
            }

            // Hotkey events and OCR results are both picked up here (100ms interval)
            let target: &AnyObject = unsafe { &*(self as *const Self as *const AnyObject) };
            unsafe {
                NSTimer::scheduledTimerWithTimeInterval_target_selector_userInfo_repeats(
                    0.1,
                    target,
                    sel!(pollEvents:),
                    None,
                    true,
                );
            }

            log::info!("quickshot started, press {} to capture", config.capture_hotkey);
        }
    }

    // --- Polling (called by NSTimer) ---
    impl AppDelegate {
        #[unsafe(method(pollEvents:))]
        fn poll_events(&self, _timer: &NSObject) {
            self.ivars().retired.borrow_mut().take();

            let requested = self
                .ivars()
                .hotkey_manager
                .borrow()
                .as_ref()
                .is_some_and(HotkeyManager::capture_requested);
            if requested {
                log::debug!("capture hotkey pressed");
                self.start_selection();
            }

            // The view may call back into `quickAccessFinished:`, so no borrow
            // of `quick_access` can be held across the poll.
            let view = self.ivars().quick_access.borrow().as_ref().map(|w| w.view.clone());
            if let Some(view) = view {
                view.poll();
            }
        }
    }

    // --- Menu actions ---
    impl AppDelegate {
        #[unsafe(method(captureArea:))]
        fn capture_area(&self, _sender: &AnyObject) {
            self.start_selection();
        }

        #[unsafe(method(showLastCapture:))]
        fn show_last_capture(&self, _sender: &AnyObject) {
            let latest = self.ivars().storage.borrow().as_ref().and_then(|s| s.latest());
            match latest {
                Some(item) => self.show_quick_access(item, None),
                None => log::info!("no captures yet"),
            }
        }

        #[unsafe(method(openCapturesFolder:))]
        fn open_captures_folder(&self, _sender: &AnyObject) {
            let dir = self.ivars().storage.borrow().as_ref().map(|s| s.dir().to_path_buf());
            if let Some(dir) = dir {
                if let Err(e) = workspace::open_dir(&dir) {
                    log::warn!("failed to open {}: {}", dir.display(), e);
                }
            }
        }
    }

    // --- Overlay notifications ---
    impl AppDelegate {
        #[unsafe(method(selectionFinished:))]
        fn selection_finished(&self, _sender: &AnyObject) {
            let outcome = {
                let selection = self.ivars().selection.borrow();
                let Some(window) = selection.as_ref() else {
                    return;
                };
                let outcome = window.take_outcome();
                let captured = match outcome {
                    Some(SelectionOutcome::Selected(area)) => {
                        // Grab before hiding so the exclusion window id is still on screen.
                        Some((area, self.capture_and_save(area, window.window_number())))
                    }
                    _ => None,
                };
                window.hide();
                captured
            };

            match outcome {
                Some((area, Ok(item))) => self.show_quick_access(item, Some(area)),
                Some((_, Err(e))) => log::error!("capture failed: {}", e),
                None => log::debug!("selection cancelled"),
            }
        }

        #[unsafe(method(quickAccessFinished:))]
        fn quick_access_finished(&self, _sender: &AnyObject) {
            let Some(window) = self.ivars().quick_access.borrow_mut().take() else {
                return;
            };
            let mtm = MainThreadMarker::from(self);
            window.dismiss(|after| {
                if after == AfterDismiss::ActivateHost {
                    #[allow(deprecated)]
                    NSApplication::sharedApplication(mtm).activateIgnoringOtherApps(true);
                }
            });
            *self.ivars().retired.borrow_mut() = Some(window);
        }
    }
);

impl AppDelegate {
    pub fn new(mtm: MainThreadMarker, config: Config) -> Retained<Self> {
        let this = mtm.alloc().set_ivars(AppDelegateIvars {
            config,
            status_bar: RefCell::new(None),
            hotkey_manager: RefCell::new(None),
            storage: RefCell::new(None),
            services: RefCell::new(None),
            selection: RefCell::new(None),
            quick_access: RefCell::new(None),
            retired: RefCell::new(None),
        });
        unsafe { msg_send![super(this), init] }
    }

    fn start_selection(&self) {
        let mtm = MainThreadMarker::from(self);
        self.close_quick_access();

        let Some(frame) = NSScreen::mainScreen(mtm).map(|s| Rect::from(s.frame())) else {
            log::error!("no main screen to select on");
            return;
        };
        if let Some(window) = self.ivars().selection.borrow().as_ref() {
            window.show(frame, self.ivars().config.selection.clone(), mtm);
        }
    }

    fn capture_and_save(&self, area: Rect, overlay_window: u32) -> Result<CaptureItem> {
        let storage = self.ivars().storage.borrow();
        let storage = storage
            .as_ref()
            .ok_or_else(|| Error::Storage("no capture directory".into()))?;
        let image = capture::capture_area(area, capture::primary_display_height(), Some(overlay_window))?;
        storage.save_screenshot(&image)
    }

    fn show_quick_access(&self, item: CaptureItem, anchor: Option<Rect>) {
        let mtm = MainThreadMarker::from(self);
        self.close_quick_access();

        let Some(services) = self.ivars().services.borrow().clone() else {
            return;
        };
        let style = &self.ivars().config.quick_access;
        let controller = QuickAccessController::new(item, services, style);
        let window = QuickAccessWindow::new(mtm, controller, style);
        window.show_near(anchor, style, mtm);
        *self.ivars().quick_access.borrow_mut() = Some(window);
    }

    /// Replace an open card without running any of its actions.
    fn close_quick_access(&self) {
        if let Some(window) = self.ivars().quick_access.borrow_mut().take() {
            window.dismiss(|_| {});
            *self.ivars().retired.borrow_mut() = Some(window);
        }
    }
}
