//! Measurement of a finalized selection.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::calibration::CalibrationData;
use crate::geometry::{DisplayGeometry, Rect};

/// Measurement errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MeasurementError {
    #[error("Measurement unavailable: reference has not been calibrated")]
    Unavailable,
}

/// Physical size of a selected region.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MeasurementResult {
    /// Width in millimeters, rounded to one decimal.
    pub width_mm: f64,
    /// Height in millimeters, rounded to one decimal.
    pub height_mm: f64,
    /// Width over height, rounded to one decimal. `None` when the height is zero.
    pub aspect_ratio: Option<f64>,
    /// The selection converted to original-image pixels.
    pub original_rect: Rect,
}

impl MeasurementResult {
    /// Aspect ratio label such as `"1.7 : 1.0"`.
    pub fn aspect_label(&self) -> Option<String> {
        self.aspect_ratio.map(|ratio| format!("{:.1} : 1.0", ratio))
    }
}

impl fmt::Display for MeasurementResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}mm x {:.1}mm", self.width_mm, self.height_mm)?;
        match self.aspect_label() {
            Some(label) => write!(f, " ({})", label),
            None => write!(f, " (aspect undefined)"),
        }
    }
}

/// Round to one decimal place, halves away from zero.
pub fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Measure a display-space selection.
///
/// The selection is first brought back to original-image pixels with the
/// display scale, then converted with the calibration factor. Both steps use
/// one factor for both axes.
pub fn measure(
    selection: Rect,
    geometry: &DisplayGeometry,
    calibration: Option<&CalibrationData>,
) -> Result<MeasurementResult, MeasurementError> {
    let calibration = calibration.ok_or(MeasurementError::Unavailable)?;
    let mm_per_pixel = calibration.mm_per_pixel();

    let original_rect = geometry.to_original(selection);
    let width_mm = original_rect.width * mm_per_pixel;
    let height_mm = original_rect.height * mm_per_pixel;

    let aspect_ratio = if height_mm == 0.0 {
        None
    } else {
        Some(round_to_tenth(width_mm / height_mm))
    };

    let result = MeasurementResult {
        width_mm: round_to_tenth(width_mm),
        height_mm: round_to_tenth(height_mm),
        aspect_ratio,
        original_rect,
    };
    tracing::info!("Measured {}", result);
    Ok(result)
}
