use std::borrow::Cow;

use image::RgbaImage;

use super::Clipboard;
use crate::error::Result;

/// The system clipboard, through `arboard`.
#[derive(Default)]
pub struct SystemClipboard;

impl Clipboard for SystemClipboard {
    fn set_image(&self, image: &RgbaImage) -> Result<()> {
        let mut clipboard = arboard::Clipboard::new()?;
        clipboard.clear()?;
        clipboard.set_image(arboard::ImageData {
            width: image.width() as usize,
            height: image.height() as usize,
            bytes: Cow::Borrowed(image.as_raw()),
        })?;
        log::info!(
            "image copied to clipboard ({}x{})",
            image.width(),
            image.height()
        );
        Ok(())
    }

    fn set_text(&self, text: &str) -> Result<()> {
        let mut clipboard = arboard::Clipboard::new()?;
        clipboard.clear()?;
        clipboard.set_text(text)?;
        log::info!("{} characters copied to clipboard", text.chars().count());
        Ok(())
    }
}
