/// Every failure the overlays and their collaborators can report.
///
/// Nothing here crosses the overlay boundary: controllers log the error and
/// carry on with the terminal step of the action that hit it.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("storage error: {0}")]
    Storage(String),

    #[error("capture not found: {0}")]
    CaptureNotFound(String),

    #[error("OCR failed: {0}")]
    Ocr(String),

    #[error("clipboard error: {0}")]
    Clipboard(#[from] arboard::Error),

    #[error("screen capture failed: {0}")]
    Capture(String),

    #[error("hotkey error: {0}")]
    Hotkey(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}

pub type Result<T> = std::result::Result<T, Error>;
