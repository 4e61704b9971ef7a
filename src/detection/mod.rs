//! Reference detection collaborators.
//!
//! The measurement core never detects anything itself; it consumes whatever
//! a [`ReferenceDetector`] reports for the current image.

mod client;
mod detector;
mod mock;

pub use client::{
    DetectorConfig, HealthReport, HttpDetector, ServiceInfo, ANALYZE_PATH, DEFAULT_BASE_URL,
    DEFAULT_MAX_RETRIES, DEFAULT_RETRY_DELAY_SECS, IMAGE_FIELD,
};
pub use detector::{DetectionError, ReferenceDetector};
pub use mock::MockDetector;
