use image::RgbaImage;
use objc2_core_foundation::CGRect;
use objc2_core_graphics::{
    CGDisplayBounds, CGImage, CGMainDisplayID, CGWindowID, CGWindowImageOption, CGWindowListOption,
};
#[allow(deprecated)]
use objc2_core_graphics::CGWindowListCreateImage;

use crate::drawing;
use crate::error::{Error, Result};
use crate::geometry::Rect;

/// Grab `area` (AppKit screen space, bottom-left origin) from everything on
/// screen below `exclude_window_id`, so the selection overlay stays out of
/// the picture.
#[allow(deprecated)] // CGWindowListCreateImage deprecated in favor of ScreenCaptureKit
pub fn capture_area(area: Rect, primary_height: f64, exclude_window_id: Option<u32>) -> Result<RgbaImage> {
    let bounds: CGRect = to_display_space(area, primary_height).into();

    let (list_option, window_id) = match exclude_window_id {
        Some(wid) => (CGWindowListOption::OptionOnScreenBelowWindow, wid as CGWindowID),
        None => (CGWindowListOption::OptionOnScreenOnly, 0 as CGWindowID),
    };

    let image = CGWindowListCreateImage(
        bounds,
        list_option,
        window_id,
        CGWindowImageOption::BestResolution,
    )
    .ok_or_else(|| Error::Capture("no image; check Screen Recording permission".into()))?;

    log::debug!(
        "captured {}x{} pixels for {:?}",
        CGImage::width(Some(&image)),
        CGImage::height(Some(&image)),
        area
    );
    drawing::cgimage_to_rgba(&image)
}

/// Height of the display at the origin of the global display space.
pub fn primary_display_height() -> f64 {
    CGDisplayBounds(CGMainDisplayID()).size.height
}

/// AppKit screen space to CoreGraphics display space (top-left origin of
/// the primary display).
pub fn to_display_space(area: Rect, primary_height: f64) -> Rect {
    Rect::new(
        area.min_x(),
        primary_height - area.max_y(),
        area.width(),
        area.height(),
    )
}
