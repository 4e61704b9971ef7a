//! Detected reference objects and their canonical physical sizes.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::geometry::Rect;

/// Kind of reference object the detector can report.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ReferenceKind {
    /// Mailbox / post box
    Postbox,
    /// Door intercom panel
    Intercom,
    /// Concrete wall block
    Block,
    /// Any label the detector returns that is not known here
    Other(String),
}

impl ReferenceKind {
    /// Wire label used by the detection service.
    pub fn as_str(&self) -> &str {
        match self {
            ReferenceKind::Postbox => "postbox",
            ReferenceKind::Intercom => "intercom",
            ReferenceKind::Block => "block",
            ReferenceKind::Other(label) => label,
        }
    }

    /// Canonical physical size, if this kind has one.
    pub fn canonical_size(&self) -> Option<ReferenceSize> {
        match self {
            ReferenceKind::Postbox => Some(ReferenceSize::new(340.0, 150.0)),
            ReferenceKind::Intercom => Some(ReferenceSize::new(90.0, 140.0)),
            ReferenceKind::Block => Some(ReferenceSize::new(390.0, 190.0)),
            ReferenceKind::Other(_) => None,
        }
    }

    /// Size used to prefill the user's size input.
    ///
    /// Only a suggestion: the confirmed size always goes through validation.
    pub fn suggested_size(&self) -> ReferenceSize {
        self.canonical_size().unwrap_or(FALLBACK_REFERENCE_SIZE)
    }
}

impl From<&str> for ReferenceKind {
    fn from(label: &str) -> Self {
        match label {
            "postbox" => ReferenceKind::Postbox,
            "intercom" => ReferenceKind::Intercom,
            "block" => ReferenceKind::Block,
            other => ReferenceKind::Other(other.to_string()),
        }
    }
}

impl From<String> for ReferenceKind {
    fn from(label: String) -> Self {
        ReferenceKind::from(label.as_str())
    }
}

impl From<ReferenceKind> for String {
    fn from(kind: ReferenceKind) -> Self {
        kind.as_str().to_string()
    }
}

impl fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Physical size of a reference object in millimeters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReferenceSize {
    pub width_mm: f64,
    pub height_mm: f64,
}

impl ReferenceSize {
    pub fn new(width_mm: f64, height_mm: f64) -> Self {
        Self {
            width_mm,
            height_mm,
        }
    }
}

/// Prefill size for reference kinds without a canonical size.
pub const FALLBACK_REFERENCE_SIZE: ReferenceSize = ReferenceSize {
    width_mm: 100.0,
    height_mm: 100.0,
};

/// A reference object found by the detector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceObject {
    pub kind: ReferenceKind,
    /// Bounding box in original-image pixels.
    pub bounding_box: Rect,
    /// Detector confidence in `0.0..=1.0`.
    pub confidence: f64,
}

impl ReferenceObject {
    pub fn new(kind: ReferenceKind, bounding_box: Rect, confidence: f64) -> Self {
        Self {
            kind,
            bounding_box,
            confidence,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suggested_sizes() {
        assert_eq!(
            ReferenceKind::Postbox.suggested_size(),
            ReferenceSize::new(340.0, 150.0)
        );
        assert_eq!(
            ReferenceKind::Intercom.suggested_size(),
            ReferenceSize::new(90.0, 140.0)
        );
        assert_eq!(
            ReferenceKind::Block.suggested_size(),
            ReferenceSize::new(390.0, 190.0)
        );
        assert_eq!(
            ReferenceKind::from("nameplate").suggested_size(),
            FALLBACK_REFERENCE_SIZE
        );
    }

    #[test]
    fn test_kind_labels() {
        assert_eq!(ReferenceKind::from("intercom"), ReferenceKind::Intercom);
        assert_eq!(
            ReferenceKind::from("gate"),
            ReferenceKind::Other("gate".to_string())
        );
        assert_eq!(ReferenceKind::Block.to_string(), "block");
    }

    #[test]
    fn test_kind_serde() {
        let kind: ReferenceKind = serde_json::from_str("\"postbox\"").unwrap();
        assert_eq!(kind, ReferenceKind::Postbox);
        assert_eq!(
            serde_json::to_string(&ReferenceKind::Other("gate".into())).unwrap(),
            "\"gate\""
        );
    }
}
