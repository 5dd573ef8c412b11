use objc2::rc::Retained;
use objc2::runtime::Sel;
use objc2_app_kit::{NSMenu, NSMenuItem, NSStatusBar, NSStatusItem, NSVariableStatusItemLength};
use objc2_foundation::{MainThreadMarker, NSString};

/// Menu entries; actions route through the responder chain to the app delegate.
const MENU_ITEMS: &[(&str, &std::ffi::CStr, &str)] = &[
    ("Capture Area", c"captureArea:", ""),
    ("Show Last Capture", c"showLastCapture:", ""),
    ("Open Captures Folder", c"openCapturesFolder:", ""),
];

pub struct StatusBar {
    _status_item: Retained<NSStatusItem>,
}

impl StatusBar {
    pub fn new(mtm: MainThreadMarker) -> Self {
        let status_bar = NSStatusBar::systemStatusBar();
        let status_item = status_bar.statusItemWithLength(NSVariableStatusItemLength);

        if let Some(button) = status_item.button(mtm) {
            button.setTitle(&NSString::from_str("\u{1F4F7}"));
        }

        let menu = NSMenu::new(mtm);
        for &(title, action, key) in MENU_ITEMS {
            let item = unsafe {
                NSMenuItem::initWithTitle_action_keyEquivalent(
                    mtm.alloc(),
                    &NSString::from_str(title),
                    Some(Sel::register(action)),
                    &NSString::from_str(key),
                )
            };
            menu.addItem(&item);
        }

        menu.addItem(&NSMenuItem::separatorItem(mtm));

        let quit_item = unsafe {
            NSMenuItem::initWithTitle_action_keyEquivalent(
                mtm.alloc(),
                &NSString::from_str("Quit"),
                Some(Sel::register(c"terminate:")),
                &NSString::from_str("q"),
            )
        };
        menu.addItem(&quit_item);

        status_item.setMenu(Some(&menu));

        StatusBar {
            _status_item: status_item,
        }
    }
}
