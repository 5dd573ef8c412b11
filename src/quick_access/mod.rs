//! Floating card with post-capture actions.

pub mod layout;
pub mod thumbnail;

#[cfg(target_os = "macos")]
pub mod view;
#[cfg(target_os = "macos")]
pub mod window;

use std::path::{Path, PathBuf};
use std::thread;

use crossbeam_channel::{Receiver, TryRecvError};
use image::RgbaImage;

use crate::config::QuickAccessStyle;
use crate::error::{Error, Result};
use crate::geometry::Point;
use crate::services::Services;
use crate::storage;
use crate::storage::model::CaptureItem;

use layout::CardLayout;
use thumbnail::Thumbnail;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuickAction {
    Copy,
    Save,
    Annotate,
    Pin,
    Ocr,
    Delete,
    Reveal,
    Close,
}

impl QuickAction {
    /// Button order, row by row.
    pub const ALL: [QuickAction; 8] = [
        QuickAction::Copy,
        QuickAction::Save,
        QuickAction::Annotate,
        QuickAction::Pin,
        QuickAction::Ocr,
        QuickAction::Delete,
        QuickAction::Reveal,
        QuickAction::Close,
    ];

    pub fn label(self) -> &'static str {
        match self {
            QuickAction::Copy => "Copy",
            QuickAction::Save => "Save",
            QuickAction::Annotate => "Annotate",
            QuickAction::Pin => "Pin",
            QuickAction::Ocr => "Text",
            QuickAction::Delete => "Delete",
            QuickAction::Reveal => "Show",
            QuickAction::Close => "Close",
        }
    }

    pub fn glyph(self) -> &'static str {
        match self {
            QuickAction::Copy => "\u{2398}",
            QuickAction::Save => "\u{2B07}",
            QuickAction::Annotate => "\u{270E}",
            QuickAction::Pin => "\u{1F4CC}",
            QuickAction::Ocr => "\u{1F524}",
            QuickAction::Delete => "\u{1F5D1}",
            QuickAction::Reveal => "\u{1F4C2}",
            QuickAction::Close => "\u{2715}",
        }
    }
}

/// What the host must do once the card is gone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AfterDismiss {
    Nothing,
    /// Bring the host application forward once teardown has finished.
    ActivateHost,
}

/// Result of feeding an action to the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// The action continues in the background; [`QuickAccessController::poll`]
    /// yields its dismissal.
    Pending,
    Dismiss(AfterDismiss),
    /// Already dismissed, or another action is still running.
    Ignored,
}

pub struct QuickAccessController {
    capture: CaptureItem,
    image_path: PathBuf,
    services: Services,
    layout: CardLayout,
    thumbnail: Option<Thumbnail>,
    hovered: Option<QuickAction>,
    ocr: Option<Receiver<Result<String>>>,
    dismissed: bool,
}

impl QuickAccessController {
    pub fn new(capture: CaptureItem, services: Services, style: &QuickAccessStyle) -> Self {
        let image_path = services.store.image_path(&capture);
        QuickAccessController {
            capture,
            image_path,
            services,
            layout: CardLayout::new(style),
            thumbnail: None,
            hovered: None,
            ocr: None,
            dismissed: false,
        }
    }

    pub fn capture(&self) -> &CaptureItem {
        &self.capture
    }

    pub fn layout(&self) -> &CardLayout {
        &self.layout
    }

    pub fn hovered(&self) -> Option<QuickAction> {
        self.hovered
    }

    pub fn is_busy(&self) -> bool {
        self.ocr.is_some()
    }

    pub fn is_dismissed(&self) -> bool {
        self.dismissed
    }

    /// Progress text for the status line.
    pub fn status(&self) -> Option<&'static str> {
        self.is_busy().then_some("Recognizing text\u{2026}")
    }

    /// Load the thumbnail on first appearance; later calls reuse it.
    pub fn appear(&mut self) -> &Thumbnail {
        let path = &self.image_path;
        let capture_type = self.capture.capture_type;
        let max = self.layout.thumbnail.size;
        self.thumbnail
            .get_or_insert_with(|| Thumbnail::load(path, capture_type, max))
    }

    pub fn thumbnail(&self) -> Option<&Thumbnail> {
        self.thumbnail.as_ref()
    }

    /// Track the pointer for hover highlighting. Returns true when the
    /// highlighted button changed.
    pub fn hover(&mut self, point: Option<Point>) -> bool {
        let hovered = point.and_then(|p| self.layout.button_at(p));
        let changed = hovered != self.hovered;
        self.hovered = hovered;
        changed
    }

    /// A click at `point` in card coordinates.
    pub fn click(&mut self, point: Point) -> Dispatch {
        match self.layout.button_at(point) {
            Some(action) => self.perform(action),
            None => Dispatch::Ignored,
        }
    }

    pub fn perform(&mut self, action: QuickAction) -> Dispatch {
        if self.dismissed || self.is_busy() {
            log::debug!("ignoring {:?}, card is no longer interactive", action);
            return Dispatch::Ignored;
        }
        log::debug!("quick action {:?} on {}", action, self.capture.filename);

        let after = match action {
            QuickAction::Copy => {
                self.copy();
                AfterDismiss::Nothing
            }
            QuickAction::Save => {
                self.save_to_desktop();
                AfterDismiss::Nothing
            }
            QuickAction::Annotate => AfterDismiss::ActivateHost,
            QuickAction::Pin => {
                self.pin();
                AfterDismiss::Nothing
            }
            QuickAction::Ocr => {
                return match self.start_ocr() {
                    Some(rx) => {
                        self.ocr = Some(rx);
                        Dispatch::Pending
                    }
                    None => self.dismiss(AfterDismiss::Nothing),
                };
            }
            QuickAction::Delete => {
                if let Err(e) = self.services.store.delete(&self.capture) {
                    log::warn!("failed to delete {}: {}", self.capture.filename, e);
                }
                AfterDismiss::Nothing
            }
            QuickAction::Reveal => {
                if let Err(e) = self.services.workspace.reveal(&self.image_path) {
                    log::warn!("failed to reveal {}: {}", self.image_path.display(), e);
                }
                AfterDismiss::Nothing
            }
            QuickAction::Close => AfterDismiss::Nothing,
        };
        self.dismiss(after)
    }

    /// Check for a finished OCR job. Must be called on the UI thread; the
    /// clipboard write and the dismissal both happen here.
    pub fn poll(&mut self) -> Option<Dispatch> {
        let rx = self.ocr.as_ref()?;
        let result = match rx.try_recv() {
            Ok(result) => result,
            Err(TryRecvError::Empty) => return None,
            Err(TryRecvError::Disconnected) => Err(Error::Ocr("recognizer went away".into())),
        };
        self.ocr = None;

        match result {
            Ok(text) => {
                if let Err(e) = self.services.clipboard.set_text(&text) {
                    log::warn!("failed to copy recognized text: {}", e);
                }
            }
            Err(e) => log::warn!("{}", e),
        }
        Some(self.dismiss(AfterDismiss::Nothing))
    }

    fn dismiss(&mut self, after: AfterDismiss) -> Dispatch {
        self.dismissed = true;
        self.hovered = None;
        Dispatch::Dismiss(after)
    }

    fn load_image(&self) -> Option<RgbaImage> {
        match image::open(&self.image_path) {
            Ok(image) => Some(image.to_rgba8()),
            Err(e) => {
                log::debug!("cannot load {}: {}", self.image_path.display(), e);
                None
            }
        }
    }

    fn copy(&self) {
        let Some(image) = self.load_image() else {
            return;
        };
        if let Err(e) = self.services.clipboard.set_image(&image) {
            log::warn!("failed to copy image: {}", e);
        }
    }

    fn save_to_desktop(&self) {
        let Some(desktop) = self.services.workspace.desktop_dir() else {
            log::error!("failed to save {}: no desktop directory", self.capture.filename);
            return;
        };
        if same_file(&self.image_path, &desktop.join(&self.capture.filename)) {
            log::info!("{} is already on the desktop", self.capture.filename);
            return;
        }
        let dest = desktop.join(storage::available_name(&desktop, &self.capture.filename));
        match std::fs::copy(&self.image_path, &dest) {
            Ok(_) => log::info!("saved to {}", dest.display()),
            Err(e) => log::error!("failed to save to {}: {}", dest.display(), e),
        }
    }

    fn pin(&self) {
        let Some(image) = self.load_image() else {
            return;
        };
        self.services.pinboard.pin(image, &self.capture.filename);
    }

    /// Decode the capture and hand it to the recognizer on a worker thread.
    /// `None` when there is nothing to recognize.
    fn start_ocr(&self) -> Option<Receiver<Result<String>>> {
        let bitmap = self.load_image()?;
        let recognizer = self.services.recognizer.clone();
        let (tx, rx) = crossbeam_channel::bounded(1);
        let spawned = thread::Builder::new()
            .name("quickshot-ocr".into())
            .spawn(move || {
                let _ = tx.send(recognizer.recognize(bitmap));
            });
        match spawned {
            Ok(_) => Some(rx),
            Err(e) => {
                log::warn!("failed to start OCR: {}", e);
                None
            }
        }
    }
}

/// Both paths name one existing file.
fn same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
