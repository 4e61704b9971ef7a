//! Reference objects and pixel-to-millimeter calibration.

mod calibrator;
mod reference;

pub use calibrator::{CalibrationData, ValidationError};
pub use reference::{ReferenceKind, ReferenceObject, ReferenceSize, FALLBACK_REFERENCE_SIZE};
