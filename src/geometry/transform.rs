//! Mapping between original-image pixels and display-canvas pixels.
//!
//! A source photo is usually larger than the preview surface it is shown on,
//! so every coordinate the user produces lives in a downscaled "display"
//! space while the detector and the calibration work in "original" space.
//! A single scalar converts between the two; both axes always share it.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default maximum width of the display canvas in pixels.
pub const DEFAULT_MAX_DISPLAY_WIDTH: f64 = 800.0;

/// Default maximum height of the display canvas in pixels.
pub const DEFAULT_MAX_DISPLAY_HEIGHT: f64 = 600.0;

/// Geometry errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    #[error("Image dimensions must be positive, got {0}x{1}")]
    InvalidImageSize(f64, f64),
    #[error("Display bounds must be positive, got {0}x{1}")]
    InvalidBounds(f64, f64),
}

/// A point in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned rectangle in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Zero-size rectangle located at `p`.
    pub fn at(p: Point) -> Self {
        Self::new(p.x, p.y, 0.0, 0.0)
    }

    /// Normalized rectangle spanned by two opposite corners, in any drag direction.
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self {
            x: a.x.min(b.x),
            y: a.y.min(b.y),
            width: (b.x - a.x).abs(),
            height: (b.y - a.y).abs(),
        }
    }

    /// Whether both sides are strictly larger than `min_side`.
    pub fn exceeds(&self, min_side: f64) -> bool {
        self.width > min_side && self.height > min_side
    }
}

/// Size and scale of the display canvas for one source image.
///
/// `scale` is `original_width / display_width` and is applied to both axes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DisplayGeometry {
    pub display_width: f64,
    pub display_height: f64,
    pub scale: f64,
}

impl DisplayGeometry {
    /// Geometry for an image shown at its native size.
    pub fn identity(width: f64, height: f64) -> Self {
        Self {
            display_width: width,
            display_height: height,
            scale: 1.0,
        }
    }

    /// Whether the image had to be shrunk to fit the bounds.
    pub fn is_downscaled(&self) -> bool {
        self.scale > 1.0
    }

    /// Convert a display-space point to original-image space.
    pub fn point_to_original(&self, p: Point) -> Point {
        Point::new(p.x * self.scale, p.y * self.scale)
    }

    /// Convert an original-image point to display space.
    pub fn point_to_display(&self, p: Point) -> Point {
        Point::new(p.x / self.scale, p.y / self.scale)
    }

    /// Convert a display-space rectangle to original-image space.
    pub fn to_original(&self, r: Rect) -> Rect {
        Rect::new(
            r.x * self.scale,
            r.y * self.scale,
            r.width * self.scale,
            r.height * self.scale,
        )
    }

    /// Convert an original-image rectangle to display space.
    pub fn to_display(&self, r: Rect) -> Rect {
        Rect::new(
            r.x / self.scale,
            r.y / self.scale,
            r.width / self.scale,
            r.height / self.scale,
        )
    }
}

/// Fit an image into the display bounds, preserving aspect ratio.
///
/// Only ever shrinks. Width is fitted first; the (possibly reduced) height is
/// then fitted, which may shrink the width again. The resulting scale is
/// always derived from the width so both axes share one factor.
pub fn compute_display_geometry(
    original_width: f64,
    original_height: f64,
    max_width: f64,
    max_height: f64,
) -> Result<DisplayGeometry, GeometryError> {
    if !(original_width.is_finite() && original_height.is_finite())
        || original_width <= 0.0
        || original_height <= 0.0
    {
        return Err(GeometryError::InvalidImageSize(original_width, original_height));
    }
    if !(max_width.is_finite() && max_height.is_finite()) || max_width <= 0.0 || max_height <= 0.0 {
        return Err(GeometryError::InvalidBounds(max_width, max_height));
    }

    let mut display_width = original_width;
    let mut display_height = original_height;

    if display_width > max_width {
        display_height = display_height * max_width / display_width;
        display_width = max_width;
    }
    if display_height > max_height {
        display_width = display_width * max_height / display_height;
        display_height = max_height;
    }

    Ok(DisplayGeometry {
        display_width,
        display_height,
        scale: original_width / display_width,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_geometry_fits_wide_image() {
        let geometry = compute_display_geometry(1600.0, 1200.0, 800.0, 600.0).unwrap();
        assert_eq!(geometry.display_width, 800.0);
        assert_eq!(geometry.display_height, 600.0);
        assert_eq!(geometry.scale, 2.0);
        assert!(geometry.is_downscaled());
    }

    #[test]
    fn test_geometry_constrained_by_height() {
        // Width fits, height does not: second pass shrinks the width too.
        let geometry = compute_display_geometry(600.0, 1200.0, 800.0, 600.0).unwrap();
        assert!((geometry.display_height - 600.0).abs() < EPS);
        assert!((geometry.display_width - 300.0).abs() < EPS);
        assert!((geometry.scale - 2.0).abs() < EPS);
    }

    #[test]
    fn test_geometry_both_passes() {
        let geometry = compute_display_geometry(4000.0, 4000.0, 800.0, 600.0).unwrap();
        assert!((geometry.display_width - 600.0).abs() < EPS);
        assert!((geometry.display_height - 600.0).abs() < EPS);
        assert!((geometry.scale - 4000.0 / 600.0).abs() < EPS);
    }

    #[test]
    fn test_geometry_never_upscales() {
        let geometry = compute_display_geometry(320.0, 240.0, 800.0, 600.0).unwrap();
        assert_eq!(geometry, DisplayGeometry::identity(320.0, 240.0));
        assert!(!geometry.is_downscaled());
    }

    #[test]
    fn test_geometry_bounds_and_aspect_over_grid() {
        let sizes = [1.0, 37.0, 599.0, 600.0, 601.0, 800.0, 801.0, 1234.0, 5000.0];
        for &w in &sizes {
            for &h in &sizes {
                let g = compute_display_geometry(w, h, 800.0, 600.0).unwrap();
                assert!(g.display_width <= 800.0 + EPS, "{}x{}", w, h);
                assert!(g.display_height <= 600.0 + EPS, "{}x{}", w, h);
                let original_aspect = w / h;
                let display_aspect = g.display_width / g.display_height;
                assert!((original_aspect - display_aspect).abs() / original_aspect < 1e-9);
                let fits = w <= 800.0 && h <= 600.0;
                assert_eq!(g.scale == 1.0, fits, "{}x{}", w, h);
                assert!(g.scale >= 1.0);
            }
        }
    }

    #[test]
    fn test_geometry_rejects_invalid_input() {
        assert_eq!(
            compute_display_geometry(0.0, 10.0, 800.0, 600.0),
            Err(GeometryError::InvalidImageSize(0.0, 10.0))
        );
        assert!(compute_display_geometry(10.0, 10.0, -1.0, 600.0).is_err());
        assert!(compute_display_geometry(f64::NAN, 10.0, 800.0, 600.0).is_err());
    }

    #[test]
    fn test_round_trip() {
        for scale in [0.25, 1.0, 1.5, 2.0, 4000.0 / 600.0, 17.3] {
            let geometry = DisplayGeometry {
                display_width: 100.0,
                display_height: 100.0,
                scale,
            };
            let p = Point::new(123.456, 78.9);
            let back = geometry.point_to_display(geometry.point_to_original(p));
            assert!((back.x - p.x).abs() < 1e-9);
            assert!((back.y - p.y).abs() < 1e-9);

            let r = Rect::new(10.5, 20.25, 50.0, 30.0);
            let back = geometry.to_display(geometry.to_original(r));
            assert!((back.width - r.width).abs() < 1e-9);
            assert!((back.height - r.height).abs() < 1e-9);
        }
    }

    #[test]
    fn test_rect_from_corners_any_direction() {
        let r = Rect::from_corners(Point::new(50.0, 40.0), Point::new(10.0, 100.0));
        assert_eq!(r, Rect::new(10.0, 40.0, 40.0, 60.0));
        assert!(r.exceeds(5.0));
        assert!(!Rect::new(0.0, 0.0, 5.0, 60.0).exceeds(5.0));
    }
}
