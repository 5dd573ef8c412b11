use global_hotkey::hotkey::HotKey;
use global_hotkey::{GlobalHotKeyEvent, GlobalHotKeyManager, HotKeyState};

use crate::error::{Error, Result};

pub struct HotkeyManager {
    _manager: GlobalHotKeyManager,
    pub capture_hotkey_id: u32,
}

impl HotkeyManager {
    /// Register the capture shortcut given in `global-hotkey` syntax.
    pub fn new(capture: &str) -> Result<Self> {
        let manager = GlobalHotKeyManager::new()
            .map_err(|e| Error::Hotkey(format!("failed to create hotkey manager: {e}")))?;

        let capture_hotkey = parse(capture)?;
        manager
            .register(capture_hotkey)
            .map_err(|e| Error::Hotkey(format!("failed to register {capture}: {e}")))?;

        log::info!("capture hotkey {} registered (id={})", capture, capture_hotkey.id());

        Ok(HotkeyManager {
            _manager: manager,
            capture_hotkey_id: capture_hotkey.id(),
        })
    }

    /// Drain pending hotkey events; true when the capture shortcut was pressed.
    pub fn capture_requested(&self) -> bool {
        let mut requested = false;
        while let Ok(event) = GlobalHotKeyEvent::receiver().try_recv() {
            if event.id() == self.capture_hotkey_id && event.state() == HotKeyState::Pressed {
                requested = true;
            }
        }
        requested
    }
}

pub fn parse(spec: &str) -> Result<HotKey> {
    spec.parse::<HotKey>()
        .map_err(|e| Error::Hotkey(format!("invalid hotkey {spec:?}: {e}")))
}
