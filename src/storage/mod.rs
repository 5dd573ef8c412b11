pub mod model;

use std::cell::RefCell;
use std::path::{Path, PathBuf};

use image::RgbaImage;

use crate::error::{Error, Result};
use model::{CaptureHistory, CaptureItem, CaptureType, StorageLocation};

const HISTORY_FILE: &str = "history.json";

/// `filename` if nothing in `dir` has that name yet, otherwise the first free
/// `"<stem> (n).<ext>"` counting from 2.
pub fn available_name(dir: &Path, filename: &str) -> String {
    if !dir.join(filename).exists() {
        return filename.to_string();
    }
    let path = Path::new(filename);
    let stem = path.file_stem().map_or_else(|| filename.into(), |s| s.to_string_lossy());
    let extension = path.extension().map(|e| e.to_string_lossy());
    (2..)
        .map(|n| match &extension {
            Some(ext) => format!("{stem} ({n}).{ext}"),
            None => format!("{stem} ({n})"),
        })
        .find(|candidate| !dir.join(candidate).exists())
        .unwrap_or_else(|| filename.to_string())
}

/// What the overlays need from the capture store.
///
/// Reads go straight to the file system through [`CaptureStore::image_path`].
pub trait CaptureStore {
    fn base_dir(&self) -> PathBuf;

    fn delete(&self, item: &CaptureItem) -> Result<()>;

    fn image_path(&self, item: &CaptureItem) -> PathBuf {
        self.base_dir().join(&item.filename)
    }
}

/// Owns the capture directory and the history file inside it.
pub struct StorageManager {
    dir: PathBuf,
    history: RefCell<CaptureHistory>,
}

impl StorageManager {
    /// Open the store at `location`, reading any existing history.
    pub fn open(location: &StorageLocation) -> Result<Self> {
        Self::open_dir(screenshots_dir(location))
    }

    pub fn open_dir(dir: PathBuf) -> Result<Self> {
        std::fs::create_dir_all(&dir)?;
        let history = load_history(&dir.join(HISTORY_FILE))?;
        log::debug!(
            "storage at {} ({} captures)",
            dir.display(),
            history.items.len()
        );
        Ok(StorageManager {
            dir,
            history: RefCell::new(history),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Generate a filename for a new capture
    pub fn generate_filename(&self, capture_type: CaptureType, extension: &str) -> String {
        let now = chrono::Local::now();
        format!(
            "{} {}.{}",
            capture_type.filename_prefix(),
            now.format("%Y-%m-%d at %H.%M.%S"),
            extension
        )
    }

    /// Encode `image` as PNG into the store and record it.
    pub fn save_screenshot(&self, image: &RgbaImage) -> Result<CaptureItem> {
        let filename = self.unique_filename(CaptureType::Screenshot, "png");
        let path = self.dir.join(&filename);
        image.save(&path)?;

        let item = CaptureItem::new_screenshot(filename);
        self.history.borrow_mut().add(item.clone());
        self.persist()?;
        log::info!(
            "saved {}x{} capture to {}",
            image.width(),
            image.height(),
            path.display()
        );
        Ok(item)
    }

    pub fn latest(&self) -> Option<CaptureItem> {
        self.history.borrow().latest().cloned()
    }

    fn unique_filename(&self, capture_type: CaptureType, extension: &str) -> String {
        available_name(&self.dir, &self.generate_filename(capture_type, extension))
    }

    fn persist(&self) -> Result<()> {
        let json = serde_json::to_string_pretty(&*self.history.borrow())?;
        std::fs::write(self.dir.join(HISTORY_FILE), json)?;
        Ok(())
    }
}

impl CaptureStore for StorageManager {
    fn base_dir(&self) -> PathBuf {
        self.dir.clone()
    }

    /// Remove both the file and its history record. A file that is already
    /// gone still drops the record.
    fn delete(&self, item: &CaptureItem) -> Result<()> {
        let path = self.image_path(item);
        match std::fs::remove_file(&path) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::warn!("capture file {} was already gone", path.display());
            }
            Err(e) => return Err(e.into()),
        }
        if !self.history.borrow_mut().remove(&item.id) {
            return Err(Error::CaptureNotFound(item.id.clone()));
        }
        self.persist()
    }
}

/// Get the screenshots directory path
pub fn screenshots_dir(location: &StorageLocation) -> PathBuf {
    match location {
        StorageLocation::Default => {
            let mut path = dirs::data_dir().unwrap_or_default();
            path.push("Quickshot");
            path.push("Screenshots");
            path
        }
        StorageLocation::Desktop => dirs::desktop_dir().unwrap_or_default(),
        StorageLocation::Custom { path } => PathBuf::from(path),
    }
}

fn load_history(path: &Path) -> Result<CaptureHistory> {
    match std::fs::read_to_string(path) {
        Ok(json) => Ok(serde_json::from_str(&json)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(CaptureHistory::new()),
        Err(e) => Err(Error::Storage(format!("reading {}: {}", path.display(), e))),
    }
}
