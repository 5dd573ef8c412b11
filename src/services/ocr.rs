//! Text recognition backed by the system `tesseract` binary.

use std::collections::HashMap;

use image::{DynamicImage, RgbaImage};
use rusty_tesseract::{Args, Image};

use super::TextRecognizer;
use crate::error::{Error, Result};

pub struct TesseractRecognizer {
    language: String,
}

impl TesseractRecognizer {
    pub fn new(language: impl Into<String>) -> Self {
        TesseractRecognizer {
            language: language.into(),
        }
    }
}

impl TextRecognizer for TesseractRecognizer {
    fn recognize(&self, bitmap: RgbaImage) -> Result<String> {
        log::info!(
            "running OCR on {}x{} image",
            bitmap.width(),
            bitmap.height()
        );
        let (prepared, min_dimension) = prepare(bitmap);

        let tess_img = Image::from_dynamic_image(&prepared)
            .map_err(|e| Error::Ocr(format!("failed to create tesseract image: {e}")))?;

        let args = Args {
            lang: self.language.clone(),
            config_variables: HashMap::new(),
            dpi: Some(if min_dimension < 200 { 300 } else { 150 }),
            psm: Some(3),
            oem: Some(3),
        };

        let text = rusty_tesseract::image_to_string(&tess_img, &args)
            .map_err(|e| Error::Ocr(e.to_string()))?;
        let text = text.trim().to_string();
        if text.is_empty() {
            return Err(Error::Ocr("no text found".into()));
        }
        Ok(text)
    }
}

/// Tesseract wants glyphs at least 10-12 px tall, so small captures are
/// upscaled before recognition. Returns the image and its original min side.
fn prepare(bitmap: RgbaImage) -> (DynamicImage, u32) {
    let min_dimension = bitmap.width().min(bitmap.height());
    let factor = upscale_factor(min_dimension);
    let (w, h) = (bitmap.width() * factor, bitmap.height() * factor);
    let image = DynamicImage::ImageRgba8(bitmap);
    if factor == 1 {
        return (image, min_dimension);
    }
    log::debug!("upscaling OCR input {factor}x to {w}x{h}");
    (
        image.resize(w, h, image::imageops::FilterType::Lanczos3),
        min_dimension,
    )
}

fn upscale_factor(min_dimension: u32) -> u32 {
    match min_dimension {
        0..100 => 4,
        100..200 => 2,
        _ => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_captures_are_upscaled() {
        assert_eq!(upscale_factor(40), 4);
        assert_eq!(upscale_factor(150), 2);
        assert_eq!(upscale_factor(800), 1);
    }

    #[test]
    fn prepare_scales_both_axes() {
        let (image, min) = prepare(RgbaImage::new(120, 60));
        assert_eq!(min, 60);
        assert_eq!((image.width(), image.height()), (480, 240));
    }
}
