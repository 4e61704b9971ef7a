//! Downscaled preview with the reference box and selection drawn on top.
//!
//! Used by the CLI so a user without a canvas can read off display-space
//! coordinates for the selection.

use image::imageops::FilterType;
use image::{Rgb, RgbImage};
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::rect::Rect as PixelRect;

use crate::geometry::{DisplayGeometry, Rect};
use crate::source::{SourceError, SourceImage};

/// Reference box outline color.
pub const REFERENCE_COLOR: Rgb<u8> = Rgb([231, 76, 60]);

/// Selection outline color.
pub const SELECTION_COLOR: Rgb<u8> = Rgb([52, 152, 219]);

/// Render the source image at display size with optional overlays.
///
/// Both overlay rectangles are in display space.
pub fn render_preview(
    image: &SourceImage,
    geometry: &DisplayGeometry,
    reference: Option<Rect>,
    selection: Option<Rect>,
) -> Result<RgbImage, SourceError> {
    let decoded = image::load_from_memory(image.bytes())?;
    let width = (geometry.display_width.round() as u32).max(1);
    let height = (geometry.display_height.round() as u32).max(1);
    let mut canvas = decoded
        .resize_exact(width, height, FilterType::Triangle)
        .to_rgb8();

    if let Some(rect) = reference {
        draw_outline(&mut canvas, rect, REFERENCE_COLOR, 3);
    }
    if let Some(rect) = selection {
        draw_outline(&mut canvas, rect, SELECTION_COLOR, 2);
    }
    Ok(canvas)
}

fn draw_outline(canvas: &mut RgbImage, rect: Rect, color: Rgb<u8>, thickness: u32) {
    for inset in 0..thickness {
        let inset = inset as f64;
        let width = (rect.width - 2.0 * inset).round();
        let height = (rect.height - 2.0 * inset).round();
        if width < 1.0 || height < 1.0 {
            break;
        }
        let outline = PixelRect::at((rect.x + inset).round() as i32, (rect.y + inset).round() as i32)
            .of_size(width as u32, height as u32);
        draw_hollow_rect_mut(canvas, outline, color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::compute_display_geometry;
    use image::DynamicImage;
    use std::io::Cursor;

    fn white_png(width: u32, height: u32) -> Vec<u8> {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([255, 255, 255])));
        let mut buffer = Cursor::new(Vec::new());
        img.write_to(&mut buffer, image::ImageFormat::Png).unwrap();
        buffer.into_inner()
    }

    #[test]
    fn test_preview_is_display_sized_with_overlays() {
        let source = SourceImage::from_bytes(white_png(160, 120)).unwrap();
        let geometry = compute_display_geometry(160.0, 120.0, 80.0, 60.0).unwrap();
        let preview = render_preview(
            &source,
            &geometry,
            Some(Rect::new(10.0, 10.0, 20.0, 20.0)),
            Some(Rect::new(40.0, 30.0, 10.0, 10.0)),
        )
        .unwrap();

        assert_eq!(preview.dimensions(), (80, 60));
        assert_eq!(*preview.get_pixel(10, 10), REFERENCE_COLOR);
        assert_eq!(*preview.get_pixel(12, 12), REFERENCE_COLOR);
        assert_eq!(*preview.get_pixel(40, 30), SELECTION_COLOR);
        assert_eq!(*preview.get_pixel(70, 5), Rgb([255, 255, 255]));
    }

    #[test]
    fn test_degenerate_overlay_is_skipped() {
        let source = SourceImage::from_bytes(white_png(20, 20)).unwrap();
        let geometry = DisplayGeometry::identity(20.0, 20.0);
        let preview =
            render_preview(&source, &geometry, Some(Rect::new(5.0, 5.0, 0.0, 0.0)), None).unwrap();
        assert_eq!(*preview.get_pixel(5, 5), Rgb([255, 255, 255]));
    }
}
