use std::path::Path;

use image::RgbaImage;

use crate::geometry::{Rect, Size};
use crate::storage::model::CaptureType;

#[derive(Debug, Clone, PartialEq)]
pub enum Thumbnail {
    Image(RgbaImage),
    /// Glyph for the capture type, shown when the file cannot be decoded.
    Placeholder(&'static str),
}

impl Thumbnail {
    /// Decode `path` and shrink it to fit `max`, or fall back to the
    /// placeholder for `capture_type`.
    pub fn load(path: &Path, capture_type: CaptureType, max: Size) -> Self {
        match image::open(path) {
            Ok(image) => {
                let thumb = image.thumbnail(max.width.max(1.0) as u32, max.height.max(1.0) as u32);
                Thumbnail::Image(thumb.to_rgba8())
            }
            Err(e) => {
                log::debug!("no thumbnail for {}: {}", path.display(), e);
                Thumbnail::Placeholder(capture_type.placeholder_glyph())
            }
        }
    }
}

/// Largest rect with `image`'s aspect ratio centered inside `bounds`.
pub fn fit_within(image: Size, bounds: Rect) -> Rect {
    if image.width <= 0.0 || image.height <= 0.0 {
        return Rect::from_origin_size(bounds.origin, Size::ZERO);
    }
    let scale = (bounds.width() / image.width).min(bounds.height() / image.height);
    let (w, h) = (image.width * scale, image.height * scale);
    Rect::new(
        bounds.mid_x() - w / 2.0,
        bounds.mid_y() - h / 2.0,
        w,
        h,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_type_placeholder() {
        let thumb = Thumbnail::load(
            Path::new("/definitely/not/here.png"),
            CaptureType::Recording,
            Size::new(100.0, 100.0),
        );
        assert_eq!(thumb, Thumbnail::Placeholder(CaptureType::Recording.placeholder_glyph()));
    }

    #[test]
    fn decoded_image_is_shrunk_to_fit() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wide.png");
        RgbaImage::new(400, 100).save(&path).unwrap();

        match Thumbnail::load(&path, CaptureType::Screenshot, Size::new(200.0, 200.0)) {
            Thumbnail::Image(img) => assert_eq!((img.width(), img.height()), (200, 50)),
            other => panic!("expected image, got {other:?}"),
        }
    }

    #[test]
    fn fit_within_letterboxes_wide_images() {
        let r = fit_within(Size::new(400.0, 100.0), Rect::new(0.0, 0.0, 200.0, 200.0));
        assert_eq!(r, Rect::new(0.0, 75.0, 200.0, 50.0));
    }
}
