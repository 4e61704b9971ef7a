//! Derivation of the millimeter-per-pixel factor.
//!
//! The factor comes from the reference object's bounding-box width alone.
//! The declared height is recorded but never feeds the factor, so every
//! measurement assumes the photo has the same scale on both axes. Any
//! perspective skew or a loose vertical box edge shows up as vertical error;
//! [`CalibrationData::height_deviation`] quantifies that disagreement.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::reference::{ReferenceObject, ReferenceSize};
use crate::geometry::Rect;

/// Calibration input errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Reference width must be a positive number, got {0}")]
    InvalidWidth(f64),
    #[error("Reference height must be a positive number, got {0}")]
    InvalidHeight(f64),
    #[error("Reference bounding box has no usable width ({0}px)")]
    DegenerateReferenceBox(f64),
    #[error("No reference object has been detected")]
    MissingReference,
}

/// Calibration derived from a confirmed reference object.
///
/// Immutable once built; a new source image starts a new calibration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationData {
    reference_width_mm: f64,
    reference_height_mm: f64,
    mm_per_pixel: f64,
    reference_box: Rect,
}

impl CalibrationData {
    /// Calibrate from a reference object and its declared physical size.
    pub fn from_reference(
        reference: &ReferenceObject,
        size: ReferenceSize,
    ) -> Result<Self, ValidationError> {
        let ReferenceSize {
            width_mm,
            height_mm,
        } = size;

        if !width_mm.is_finite() || width_mm <= 0.0 {
            return Err(ValidationError::InvalidWidth(width_mm));
        }
        if !height_mm.is_finite() || height_mm <= 0.0 {
            return Err(ValidationError::InvalidHeight(height_mm));
        }

        let box_width = reference.bounding_box.width;
        if !box_width.is_finite() || box_width <= 0.0 {
            return Err(ValidationError::DegenerateReferenceBox(box_width));
        }

        let mm_per_pixel = width_mm / box_width;
        tracing::info!(
            "Calibrated {}: {}mm x {}mm over {}px wide box -> {} mm/px",
            reference.kind,
            width_mm,
            height_mm,
            box_width,
            mm_per_pixel
        );

        Ok(Self {
            reference_width_mm: width_mm,
            reference_height_mm: height_mm,
            mm_per_pixel,
            reference_box: reference.bounding_box,
        })
    }

    pub fn reference_width_mm(&self) -> f64 {
        self.reference_width_mm
    }

    pub fn reference_height_mm(&self) -> f64 {
        self.reference_height_mm
    }

    /// Millimeters per original-image pixel.
    pub fn mm_per_pixel(&self) -> f64 {
        self.mm_per_pixel
    }

    /// Bounding box the factor was derived from, in original-image pixels.
    pub fn reference_box(&self) -> Rect {
        self.reference_box
    }

    /// Relative disagreement between the declared height and the height the
    /// width-derived factor predicts for the reference box.
    ///
    /// `0.0` means the box aspect matches the declared size exactly; `0.1`
    /// means vertical measurements are likely about 10% too large.
    pub fn height_deviation(&self) -> f64 {
        let predicted = self.reference_box.height * self.mm_per_pixel;
        (predicted - self.reference_height_mm) / self.reference_height_mm
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calibration::ReferenceKind;

    fn postbox(width: f64, height: f64) -> ReferenceObject {
        ReferenceObject::new(
            ReferenceKind::Postbox,
            Rect::new(10.0, 20.0, width, height),
            0.94,
        )
    }

    #[test]
    fn test_mm_per_pixel_from_width() {
        let calibration =
            CalibrationData::from_reference(&postbox(100.0, 44.0), ReferenceSize::new(340.0, 150.0))
                .unwrap();
        assert!((calibration.mm_per_pixel() - 3.4).abs() < 1e-12);
        assert_eq!(calibration.reference_height_mm(), 150.0);
    }

    #[test]
    fn test_height_does_not_affect_factor() {
        let a = CalibrationData::from_reference(&postbox(200.0, 50.0), ReferenceSize::new(340.0, 10.0))
            .unwrap();
        let b = CalibrationData::from_reference(&postbox(200.0, 50.0), ReferenceSize::new(340.0, 900.0))
            .unwrap();
        assert_eq!(a.mm_per_pixel(), b.mm_per_pixel());
        assert!((a.mm_per_pixel() - 1.7).abs() < 1e-12);
    }

    #[test]
    fn test_rejects_invalid_sizes() {
        let reference = postbox(100.0, 40.0);
        assert_eq!(
            CalibrationData::from_reference(&reference, ReferenceSize::new(0.0, 150.0)),
            Err(ValidationError::InvalidWidth(0.0))
        );
        assert_eq!(
            CalibrationData::from_reference(&reference, ReferenceSize::new(340.0, -1.0)),
            Err(ValidationError::InvalidHeight(-1.0))
        );
        assert!(
            CalibrationData::from_reference(&reference, ReferenceSize::new(f64::NAN, 150.0)).is_err()
        );
        assert!(CalibrationData::from_reference(
            &reference,
            ReferenceSize::new(f64::INFINITY, 150.0)
        )
        .is_err());
    }

    #[test]
    fn test_rejects_degenerate_box() {
        assert_eq!(
            CalibrationData::from_reference(&postbox(0.0, 40.0), ReferenceSize::new(340.0, 150.0)),
            Err(ValidationError::DegenerateReferenceBox(0.0))
        );
    }

    #[test]
    fn test_height_deviation() {
        // 100px -> 340mm gives 3.4 mm/px; a 50px tall box predicts 170mm vs 150mm declared.
        let calibration =
            CalibrationData::from_reference(&postbox(100.0, 50.0), ReferenceSize::new(340.0, 150.0))
                .unwrap();
        assert!((calibration.height_deviation() - 20.0 / 150.0).abs() < 1e-12);
    }
}
