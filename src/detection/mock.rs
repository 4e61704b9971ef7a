//! Placeholder detector that places a postbox at a fixed relative position.
//!
//! Mirrors the detection service's stand-in model, so the whole workflow can
//! run without the service.

use super::detector::{DetectionError, ReferenceDetector};
use crate::calibration::{ReferenceKind, ReferenceObject};
use crate::geometry::Rect;
use crate::source::SourceImage;

/// Detector returning a postbox at 20%/30% of the image, 20% wide and 15% tall.
#[derive(Debug, Clone)]
pub struct MockDetector {
    kind: ReferenceKind,
    confidence: f64,
}

impl Default for MockDetector {
    fn default() -> Self {
        Self {
            kind: ReferenceKind::Postbox,
            confidence: 0.94,
        }
    }
}

impl MockDetector {
    /// Report a different reference kind.
    pub fn with_kind(mut self, kind: ReferenceKind) -> Self {
        self.kind = kind;
        self
    }

    /// Bounding box for an image of the given size.
    pub fn locate(&self, width: u32, height: u32) -> ReferenceObject {
        let w = width as f64;
        let h = height as f64;
        let bounding_box = Rect::new(
            (w * 0.2).floor(),
            (h * 0.3).floor(),
            (w * 0.2).floor(),
            (h * 0.15).floor(),
        );
        ReferenceObject::new(self.kind.clone(), bounding_box, self.confidence)
    }
}

impl ReferenceDetector for MockDetector {
    async fn detect(
        &self,
        image: &SourceImage,
    ) -> Result<Option<ReferenceObject>, DetectionError> {
        Ok(Some(self.locate(image.width(), image.height())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_box_position() {
        let reference = MockDetector::default().locate(1600, 1200);
        assert_eq!(reference.kind, ReferenceKind::Postbox);
        assert_eq!(reference.bounding_box, Rect::new(320.0, 360.0, 320.0, 180.0));
        assert_eq!(reference.confidence, 0.94);
    }

    #[test]
    fn test_mock_box_truncates() {
        let reference = MockDetector::default()
            .with_kind(ReferenceKind::Intercom)
            .locate(333, 101);
        assert_eq!(reference.kind, ReferenceKind::Intercom);
        assert_eq!(reference.bounding_box, Rect::new(66.0, 30.0, 66.0, 15.0));
    }

    #[tokio::test]
    async fn test_mock_detect() {
        let image = SourceImage::from_parts(1000, 500, vec![0u8; 4]).unwrap();
        let reference = MockDetector::default().detect(&image).await.unwrap().unwrap();
        assert_eq!(reference.bounding_box.width, 200.0);
    }
}
