//! The detector seam.

use std::future::Future;
use thiserror::Error;

use crate::calibration::ReferenceObject;
use crate::source::SourceImage;

/// Detection errors.
///
/// "Nothing found" is not an error: detectors report it as `Ok(None)`.
#[derive(Error, Debug)]
pub enum DetectionError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),
    #[error("Detection service returned HTTP {status}: {body}")]
    Api { status: u16, body: String },
    #[error("Failed to parse response: {0}")]
    ParseError(String),
    #[error("Max retries exceeded after {0} attempts: {1}")]
    MaxRetriesExceeded(u32, String),
}

impl DetectionError {
    /// Whether the same request may succeed if sent again.
    pub fn is_retryable(&self) -> bool {
        match self {
            DetectionError::RequestFailed(_) => true,
            DetectionError::Api { status, .. } => *status >= 500 || *status == 429,
            DetectionError::ParseError(_) => false,
            DetectionError::MaxRetriesExceeded(_, _) => false,
        }
    }
}

/// Something that can locate a reference object in a source image.
pub trait ReferenceDetector {
    /// Detect the reference object, in original-image pixels.
    fn detect(
        &self,
        image: &SourceImage,
    ) -> impl Future<Output = Result<Option<ReferenceObject>, DetectionError>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_statuses() {
        let api = |status| DetectionError::Api {
            status,
            body: String::new(),
        };
        assert!(api(500).is_retryable());
        assert!(api(503).is_retryable());
        assert!(api(429).is_retryable());
        assert!(!api(400).is_retryable());
        assert!(!api(422).is_retryable());
        assert!(!DetectionError::ParseError("bad".into()).is_retryable());
    }
}
