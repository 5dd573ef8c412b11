//! CoreGraphics helpers shared by the overlay views.

use image::RgbaImage;
use objc2::msg_send;
use objc2::rc::Retained;
use objc2::runtime::AnyObject;
use objc2_app_kit::{NSColor, NSFont, NSGraphicsContext, NSImage};
use objc2_core_foundation::{CFRetained, CGFloat, CGPoint, CGRect, CGSize};
use objc2_core_graphics::{
    CGBitmapContextCreate, CGBitmapContextCreateImage, CGColorSpace, CGContext, CGImage,
    CGImageAlphaInfo,
};
use objc2_foundation::{MainThreadMarker, NSString};

use crate::error::{Error, Result};
use crate::geometry::{Point, Rect, Size};
use crate::pixels;
use crate::selection::scene::Label;

pub type Rgba = (CGFloat, CGFloat, CGFloat, CGFloat);

pub const ACCENT: Rgba = (0.04, 0.52, 1.0, 1.0);
pub const WHITE: Rgba = (1.0, 1.0, 1.0, 1.0);
pub const LABEL_BACKGROUND: Rgba = (0.0, 0.0, 0.0, 0.72);

pub fn fill_rect(cg: &CGContext, rect: Rect, (r, g, b, a): Rgba) {
    CGContext::set_rgb_fill_color(Some(cg), r, g, b, a);
    CGContext::fill_rect(Some(cg), rect.into());
}

pub fn stroke_rect(cg: &CGContext, rect: Rect, (r, g, b, a): Rgba, width: CGFloat) {
    CGContext::set_rgb_stroke_color(Some(cg), r, g, b, a);
    CGContext::set_line_width(Some(cg), width);
    CGContext::stroke_rect(Some(cg), rect.into());
}

pub fn line(cg: &CGContext, from: Point, to: Point, (r, g, b, a): Rgba, width: CGFloat) {
    CGContext::set_rgb_stroke_color(Some(cg), r, g, b, a);
    CGContext::set_line_width(Some(cg), width);
    CGContext::move_to_point(Some(cg), from.x, from.y);
    CGContext::add_line_to_point(Some(cg), to.x, to.y);
    CGContext::stroke_path(Some(cg));
}

/// Draw a label's background box and its lines of text.
pub fn draw_label(cg: &CGContext, label: &Label, background: Rgba, color: Rgba) {
    fill_rect(cg, label.frame, background);
    draw_lines(cg, label.text_origin(), &label.lines, label.line_height(), color, label.font_size);
}

/// Draw `lines` top to bottom starting at `origin`, one `line_height` apart,
/// in a flipped context.
pub fn draw_lines<S: AsRef<str>>(
    cg: &CGContext,
    origin: Point,
    lines: &[S],
    line_height: CGFloat,
    color: Rgba,
    font_size: CGFloat,
) {
    CGContext::save_g_state(Some(cg));

    let previous = NSGraphicsContext::currentContext();
    let flipped = NSGraphicsContext::graphicsContextWithCGContext_flipped(cg, true);
    NSGraphicsContext::setCurrentContext(Some(&flipped));

    let attributes = text_attributes(color, font_size);
    for (i, line) in lines.iter().enumerate() {
        let at = Point::new(origin.x, origin.y + i as CGFloat * line_height);
        let text = NSString::from_str(line.as_ref());
        unsafe {
            let _: () = msg_send![
                &*text,
                drawAtPoint: CGPoint::from(at),
                withAttributes: &*attributes
            ];
        }
    }

    NSGraphicsContext::setCurrentContext(previous.as_deref());
    CGContext::restore_g_state(Some(cg));
}

/// `NSFont`/`NSColor` attribute dictionary for `drawAtPoint:withAttributes:`.
fn text_attributes(color: Rgba, font_size: CGFloat) -> Retained<AnyObject> {
    let font = NSFont::systemFontOfSize(font_size);
    let ns_color = NSColor::colorWithRed_green_blue_alpha(color.0, color.1, color.2, color.3);
    let font_key = NSString::from_str("NSFont");
    let color_key = NSString::from_str("NSColor");

    let keys: [*const AnyObject; 2] = [object_ptr(&*font_key), object_ptr(&*color_key)];
    let values: [*const AnyObject; 2] = [object_ptr(&*font), object_ptr(&*ns_color)];
    unsafe {
        msg_send![
            objc2::class!(NSDictionary),
            dictionaryWithObjects: values.as_ptr(),
            forKeys: keys.as_ptr(),
            count: 2usize
        ]
    }
}

fn object_ptr<T>(object: &T) -> *const AnyObject {
    object as *const T as *const AnyObject
}

/// Copy an RGBA buffer into a new CGImage.
pub fn rgba_to_cgimage(image: &RgbaImage) -> Option<CFRetained<CGImage>> {
    let (width, height) = (image.width() as usize, image.height() as usize);
    if width == 0 || height == 0 {
        return None;
    }
    let mut buffer = image.as_raw().clone();
    pixels::premultiply(&mut buffer);
    let color_space = CGColorSpace::new_device_rgb()?;
    let ctx = unsafe {
        CGBitmapContextCreate(
            buffer.as_mut_ptr() as *mut _,
            width,
            height,
            8,
            width * 4,
            Some(&color_space),
            CGImageAlphaInfo::PremultipliedLast.0,
        )
    }?;
    // The context renders straight into `buffer`; the image copies it out.
    CGBitmapContextCreateImage(Some(&ctx))
}

/// Render a CGImage into an RGBA byte buffer.
pub fn cgimage_to_rgba(image: &CGImage) -> Result<RgbaImage> {
    let width = CGImage::width(Some(image));
    let height = CGImage::height(Some(image));
    let bytes_per_row = width * 4;

    let color_space = CGColorSpace::new_device_rgb()
        .ok_or_else(|| Error::Capture("failed to create color space".into()))?;

    let mut buffer = vec![0u8; bytes_per_row * height];
    let ctx = unsafe {
        CGBitmapContextCreate(
            buffer.as_mut_ptr() as *mut _,
            width,
            height,
            8,
            bytes_per_row,
            Some(&color_space),
            CGImageAlphaInfo::PremultipliedLast.0,
        )
    }
    .ok_or_else(|| Error::Capture("failed to create bitmap context".into()))?;

    let draw_rect = CGRect::new(
        CGPoint::ZERO,
        CGSize::new(width as CGFloat, height as CGFloat),
    );
    CGContext::draw_image(Some(&ctx), draw_rect, Some(image));
    drop(ctx);
    pixels::unpremultiply(&mut buffer);

    RgbaImage::from_raw(width as u32, height as u32, buffer)
        .ok_or_else(|| Error::Capture("bitmap size mismatch".into()))
}

/// Point size of a pixel buffer shown at `scale` pixels per point.
pub fn point_size(image: &RgbaImage, scale: CGFloat) -> Size {
    let scale = if scale > 0.0 { scale } else { 1.0 };
    Size::new(image.width() as CGFloat / scale, image.height() as CGFloat / scale)
}

/// Wrap an RGBA buffer in an NSImage, `scale` pixels per point.
pub fn ns_image(image: &RgbaImage, scale: CGFloat, mtm: MainThreadMarker) -> Option<Retained<NSImage>> {
    let cg_image = rgba_to_cgimage(image)?;
    Some(NSImage::initWithCGImage_size(
        mtm.alloc(),
        &cg_image,
        point_size(image, scale).into(),
    ))
}
