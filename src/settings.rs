//! Persisted user settings for the ref-measure CLI.
//! Stored in the platform-specific config directory via `directories::ProjectDirs`.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::config::MeasureConfig;
use crate::detection::{DetectorConfig, DEFAULT_BASE_URL, DEFAULT_MAX_RETRIES, DEFAULT_RETRY_DELAY_SECS};
use crate::geometry::{DEFAULT_MAX_DISPLAY_HEIGHT, DEFAULT_MAX_DISPLAY_WIDTH};
use crate::selection::DEFAULT_MIN_SELECTION_SIZE;

/// Application settings that can be saved and loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// Detection service base URL
    pub base_url: String,
    /// Language code ("ja" or "en")
    pub lang: String,
    /// Maximum retries for detection requests
    pub max_retries: u32,
    /// Retry delay in seconds
    pub retry_delay: u64,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Maximum display canvas width
    pub max_display_width: f64,
    /// Maximum display canvas height
    pub max_display_height: f64,
    /// Minimum selection side in display pixels
    pub min_selection_size: f64,
    /// Use the built-in placeholder detector instead of the service
    pub use_mock_detector: bool,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            lang: "ja".to_string(),
            max_retries: DEFAULT_MAX_RETRIES,
            retry_delay: DEFAULT_RETRY_DELAY_SECS,
            timeout_secs: 30,
            max_display_width: DEFAULT_MAX_DISPLAY_WIDTH,
            max_display_height: DEFAULT_MAX_DISPLAY_HEIGHT,
            min_selection_size: DEFAULT_MIN_SELECTION_SIZE,
            use_mock_detector: false,
        }
    }
}

impl AppSettings {
    /// Get the config directory path.
    pub fn config_dir() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "ref-measure", "ref-measure")
            .map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Get the settings file path.
    pub fn settings_path() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join("settings.json"))
    }

    /// Load settings from the config file, falling back to defaults.
    pub fn load() -> Self {
        let loaded: Self = Self::settings_path()
            .and_then(|path| fs::read_to_string(&path).ok())
            .and_then(|content| serde_json::from_str(&content).ok())
            .unwrap_or_default();
        loaded.backfilled()
    }

    /// Replace empty or non-positive values left by older or hand-edited files.
    fn backfilled(mut self) -> Self {
        let defaults = Self::default();
        if self.base_url.is_empty() {
            self.base_url = defaults.base_url;
        }
        if self.lang.is_empty() {
            self.lang = defaults.lang;
        }
        if self.timeout_secs == 0 {
            self.timeout_secs = defaults.timeout_secs;
        }
        if self.max_display_width.is_nan() || self.max_display_width <= 0.0 {
            self.max_display_width = defaults.max_display_width;
        }
        if self.max_display_height.is_nan() || self.max_display_height <= 0.0 {
            self.max_display_height = defaults.max_display_height;
        }
        if self.min_selection_size.is_nan() || self.min_selection_size < 0.0 {
            self.min_selection_size = defaults.min_selection_size;
        }
        self
    }

    /// Save settings to the config file.
    pub fn save(&self) -> Result<(), String> {
        let dir = Self::config_dir().ok_or("Cannot determine config directory")?;

        fs::create_dir_all(&dir)
            .map_err(|e| format!("Failed to create config directory: {}", e))?;

        let path = dir.join("settings.json");
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| format!("Failed to serialize settings: {}", e))?;

        fs::write(&path, content).map_err(|e| format!("Failed to write settings file: {}", e))?;

        Ok(())
    }

    /// Session configuration from these settings.
    pub fn measure_config(&self) -> MeasureConfig {
        MeasureConfig::default()
            .with_display_bounds(self.max_display_width, self.max_display_height)
            .with_min_selection_size(self.min_selection_size)
    }

    /// Detection client configuration from these settings.
    pub fn detector_config(&self) -> DetectorConfig {
        DetectorConfig::default()
            .with_base_url(&self.base_url)
            .with_max_retries(self.max_retries)
            .with_retry_delay(self.retry_delay)
            .with_timeout(self.timeout_secs)
    }
}
