//! HTTP client for the reference detection service.

use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;
use std::time::{Duration, Instant};
use tokio::time::sleep;

use super::detector::{DetectionError, ReferenceDetector};
use crate::calibration::{ReferenceKind, ReferenceObject};
use crate::geometry::Rect;
use crate::source::SourceImage;

/// Default detection service address.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";

/// Path of the analyze endpoint.
pub const ANALYZE_PATH: &str = "/api/v1/pillar/analyze";

/// Multipart field carrying the uploaded photo.
pub const IMAGE_FIELD: &str = "pillar_image";

/// Default number of retry attempts for failed requests.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Default delay between retry attempts in seconds.
pub const DEFAULT_RETRY_DELAY_SECS: u64 = 2;

/// Configuration for the detection service client.
#[derive(Debug, Clone)]
pub struct DetectorConfig {
    pub base_url: String,
    /// Maximum number of retry attempts for failed requests.
    pub max_retries: u32,
    /// Delay between retry attempts in seconds.
    pub retry_delay_secs: u64,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            max_retries: DEFAULT_MAX_RETRIES,
            retry_delay_secs: DEFAULT_RETRY_DELAY_SECS,
            timeout_secs: 30,
        }
    }
}

impl DetectorConfig {
    /// Set the service base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the maximum number of retry attempts for failed requests.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Set the delay between retry attempts in seconds.
    pub fn with_retry_delay(mut self, delay_secs: u64) -> Self {
        self.retry_delay_secs = delay_secs;
        self
    }

    /// Set the per-request timeout in seconds.
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }
}

/// Analyze endpoint response.
#[derive(Debug, Deserialize)]
struct AnalyzeResponse {
    reference_object: Option<WireReference>,
    pillar_image_width: u32,
    pillar_image_height: u32,
}

#[derive(Debug, Deserialize)]
struct WireReference {
    #[serde(rename = "type")]
    kind: String,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    confidence: f64,
}

impl From<WireReference> for ReferenceObject {
    fn from(wire: WireReference) -> Self {
        ReferenceObject::new(
            ReferenceKind::from(wire.kind),
            Rect::new(wire.x, wire.y, wire.width, wire.height),
            wire.confidence,
        )
    }
}

/// Health endpoint response.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ServiceInfo {
    pub message: String,
    pub version: String,
    pub status: String,
}

/// Result of a health check.
#[derive(Debug, Clone)]
pub struct HealthReport {
    pub info: ServiceInfo,
    pub latency: Duration,
}

/// Client for the reference detection service.
pub struct HttpDetector {
    config: DetectorConfig,
    client: Client,
}

impl HttpDetector {
    /// Create a new detector client with the given configuration.
    pub fn new(config: DetectorConfig) -> Result<Self, DetectionError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { config, client })
    }

    /// Create a new detector client with default configuration.
    pub fn with_defaults() -> Result<Self, DetectionError> {
        Self::new(DetectorConfig::default())
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Check that the service is reachable.
    pub async fn health(&self) -> Result<HealthReport, DetectionError> {
        let started = Instant::now();
        let response = self
            .client
            .get(self.config.url("/"))
            .header("Accept", "application/json")
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(DetectionError::Api { status, body });
        }

        let info: ServiceInfo = response
            .json()
            .await
            .map_err(|e| DetectionError::ParseError(e.to_string()))?;
        let latency = started.elapsed();
        tracing::info!(
            "Detection service {} reachable in {}ms (version {})",
            self.config.base_url,
            latency.as_millis(),
            info.version
        );
        Ok(HealthReport { info, latency })
    }

    /// Upload the image and return the detected reference, retrying
    /// transient failures.
    pub async fn analyze(
        &self,
        image: &SourceImage,
    ) -> Result<Option<ReferenceObject>, DetectionError> {
        let url = self.config.url(ANALYZE_PATH);
        let mut last_error: Option<DetectionError> = None;
        let max_attempts = self.config.max_retries + 1; // +1 for the initial attempt

        for attempt in 1..=max_attempts {
            match self.send_request(&url, image).await {
                Ok(reference) => return Ok(reference),
                Err(e) => {
                    if !e.is_retryable() {
                        return Err(e);
                    }
                    if attempt < max_attempts {
                        tracing::warn!(
                            "Detection request failed (attempt {}/{}): {}, retrying in {}s",
                            attempt,
                            max_attempts,
                            e,
                            self.config.retry_delay_secs
                        );
                        sleep(Duration::from_secs(self.config.retry_delay_secs)).await;
                    }
                    last_error = Some(e);
                }
            }
        }

        Err(DetectionError::MaxRetriesExceeded(
            self.config.max_retries,
            last_error
                .map(|e| e.to_string())
                .unwrap_or_else(|| "Unknown error".to_string()),
        ))
    }

    /// Send a single analyze request.
    async fn send_request(
        &self,
        url: &str,
        image: &SourceImage,
    ) -> Result<Option<ReferenceObject>, DetectionError> {
        let bytes = image.bytes().to_vec();
        let mime = image::guess_format(&bytes)
            .map(|format| format.to_mime_type())
            .unwrap_or("application/octet-stream");
        let part = Part::bytes(bytes).file_name("image").mime_str(mime)?;
        let form = Form::new().part(IMAGE_FIELD, part);

        let response = self.client.post(url).multipart(form).send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(DetectionError::Api { status, body });
        }

        let text = response.text().await?;
        Self::parse_response(&text, image)
    }

    fn parse_response(
        text: &str,
        image: &SourceImage,
    ) -> Result<Option<ReferenceObject>, DetectionError> {
        let parsed: AnalyzeResponse =
            serde_json::from_str(text).map_err(|e| DetectionError::ParseError(e.to_string()))?;

        if parsed.pillar_image_width != image.width() || parsed.pillar_image_height != image.height()
        {
            tracing::warn!(
                "Service saw a {}x{} image but {}x{} was loaded",
                parsed.pillar_image_width,
                parsed.pillar_image_height,
                image.width(),
                image.height()
            );
        }

        Ok(parsed.reference_object.map(ReferenceObject::from))
    }
}

impl ReferenceDetector for HttpDetector {
    async fn detect(
        &self,
        image: &SourceImage,
    ) -> Result<Option<ReferenceObject>, DetectionError> {
        self.analyze(image).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image() -> SourceImage {
        SourceImage::from_parts(1600, 1200, vec![0u8; 8]).unwrap()
    }

    #[test]
    fn test_detector_config_default() {
        let config = DetectorConfig::default();
        assert_eq!(config.base_url, "http://127.0.0.1:8000");
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.retry_delay_secs, 2);
    }

    #[test]
    fn test_detector_config_builder() {
        let config = DetectorConfig::default()
            .with_base_url("http://detector.local:9000/")
            .with_max_retries(0)
            .with_retry_delay(1)
            .with_timeout(5);
        assert_eq!(config.max_retries, 0);
        assert_eq!(config.timeout_secs, 5);
        assert_eq!(
            config.url(ANALYZE_PATH),
            "http://detector.local:9000/api/v1/pillar/analyze"
        );
    }

    #[test]
    fn test_parse_response_with_reference() {
        let text = r#"{
            "reference_object": {"type": "postbox", "x": 320, "y": 360, "width": 200, "height": 180, "confidence": 0.94},
            "pillar_image_width": 1600,
            "pillar_image_height": 1200
        }"#;
        let reference = HttpDetector::parse_response(text, &image()).unwrap().unwrap();
        assert_eq!(reference.kind, ReferenceKind::Postbox);
        assert_eq!(reference.bounding_box, Rect::new(320.0, 360.0, 200.0, 180.0));
        assert_eq!(reference.confidence, 0.94);
    }

    #[test]
    fn test_parse_response_without_reference() {
        let text = r#"{"reference_object": null, "pillar_image_width": 1600, "pillar_image_height": 1200}"#;
        assert!(HttpDetector::parse_response(text, &image()).unwrap().is_none());
    }

    #[test]
    fn test_parse_response_malformed() {
        let result = HttpDetector::parse_response("{\"detail\": \"oops\"}", &image());
        assert!(matches!(result, Err(DetectionError::ParseError(_))));
    }

    #[test]
    fn test_service_info_tolerates_missing_fields() {
        let info: ServiceInfo = serde_json::from_str(r#"{"version": "1.0.0"}"#).unwrap();
        assert_eq!(info.version, "1.0.0");
        assert!(info.status.is_empty());
    }
}
