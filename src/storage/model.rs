use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaptureType {
    Screenshot,
    Recording,
    Gif,
}

impl CaptureType {
    /// Glyph drawn in place of the thumbnail when the image cannot be loaded.
    pub fn placeholder_glyph(self) -> &'static str {
        match self {
            CaptureType::Screenshot => "\u{1F5BC}", // framed picture
            CaptureType::Recording => "\u{1F3A5}",  // movie camera
            CaptureType::Gif => "\u{1F39E}",        // film frames
        }
    }

    pub fn filename_prefix(self) -> &'static str {
        match self {
            CaptureType::Screenshot => "Screenshot",
            CaptureType::Recording => "Recording",
            CaptureType::Gif => "GIF",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptureItem {
    pub id: String,
    pub capture_type: CaptureType,
    pub filename: String,
    pub created_at: String,
}

impl CaptureItem {
    pub fn new(capture_type: CaptureType, filename: String) -> Self {
        CaptureItem {
            id: Uuid::new_v4().to_string(),
            capture_type,
            filename,
            created_at: Utc::now().to_rfc3339(),
        }
    }

    pub fn new_screenshot(filename: String) -> Self {
        Self::new(CaptureType::Screenshot, filename)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CaptureHistory {
    pub items: Vec<CaptureItem>,
}

impl CaptureHistory {
    pub fn new() -> Self {
        Self { items: vec![] }
    }

    pub fn add(&mut self, item: CaptureItem) {
        self.items.push(item);
    }

    pub fn remove(&mut self, id: &str) -> bool {
        let len_before = self.items.len();
        self.items.retain(|i| i.id != id);
        self.items.len() < len_before
    }

    pub fn latest(&self) -> Option<&CaptureItem> {
        self.items.last()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageLocation {
    #[default]
    Default,
    Desktop,
    Custom { path: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn history_remove_reports_whether_anything_went() {
        let mut history = CaptureHistory::new();
        let item = CaptureItem::new_screenshot("a.png".into());
        let id = item.id.clone();
        history.add(item);

        assert!(history.remove(&id));
        assert!(!history.remove(&id));
        assert!(history.latest().is_none());
    }

    #[test]
    fn history_written_with_favorites_still_loads() {
        let json = r#"{"items":[{"id":"1","capture_type":"screenshot","filename":"a.png",
            "created_at":"2026-10-14T09:30:00Z","is_favorite":true}]}"#;
        let history: CaptureHistory = serde_json::from_str(json).unwrap();
        assert_eq!(history.latest().unwrap().filename, "a.png");
    }

    #[test]
    fn capture_type_serializes_lowercase() {
        let json = serde_json::to_string(&CaptureType::Gif).unwrap();
        assert_eq!(json, "\"gif\"");
    }
}
