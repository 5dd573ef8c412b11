//! Seams between the overlays and the outside world.
//!
//! The overlays only ever talk to these traits; the system-backed
//! implementations live next to them and the app wires them together.

pub mod clipboard;
pub mod ocr;
pub mod workspace;

use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::Arc;

use image::RgbaImage;

use crate::error::Result;
use crate::storage::CaptureStore;

/// Both writes fully replace whatever the clipboard held before.
pub trait Clipboard {
    fn set_image(&self, image: &RgbaImage) -> Result<()>;
    fn set_text(&self, text: &str) -> Result<()>;
}

/// Text recognition. Called off the UI thread.
pub trait TextRecognizer: Send + Sync {
    fn recognize(&self, bitmap: RgbaImage) -> Result<String>;
}

pub trait Workspace {
    fn desktop_dir(&self) -> Option<PathBuf>;
    /// Select `path` in the OS file browser.
    fn reveal(&self, path: &Path) -> Result<()>;
}

/// Opens floating always-on-top windows showing an image.
pub trait Pinboard {
    fn pin(&self, image: RgbaImage, title: &str);
}

/// The collaborators handed to every quick-access overlay.
#[derive(Clone)]
pub struct Services {
    pub store: Rc<dyn CaptureStore>,
    pub clipboard: Rc<dyn Clipboard>,
    pub workspace: Rc<dyn Workspace>,
    pub pinboard: Rc<dyn Pinboard>,
    pub recognizer: Arc<dyn TextRecognizer>,
}
