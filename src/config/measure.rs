//! Measurement session configuration.

use crate::geometry::{DEFAULT_MAX_DISPLAY_HEIGHT, DEFAULT_MAX_DISPLAY_WIDTH};
use crate::selection::DEFAULT_MIN_SELECTION_SIZE;

/// Configuration for a measurement session.
#[derive(Debug, Clone, PartialEq)]
pub struct MeasureConfig {
    /// Maximum display canvas width in pixels.
    pub max_display_width: f64,
    /// Maximum display canvas height in pixels.
    pub max_display_height: f64,
    /// Minimum selection side in display pixels (exclusive).
    pub min_selection_size: f64,
}

impl Default for MeasureConfig {
    fn default() -> Self {
        Self {
            max_display_width: DEFAULT_MAX_DISPLAY_WIDTH,
            max_display_height: DEFAULT_MAX_DISPLAY_HEIGHT,
            min_selection_size: DEFAULT_MIN_SELECTION_SIZE,
        }
    }
}

impl MeasureConfig {
    /// Set the display canvas bounds.
    pub fn with_display_bounds(mut self, max_width: f64, max_height: f64) -> Self {
        self.max_display_width = max_width;
        self.max_display_height = max_height;
        self
    }

    /// Set the minimum selection size.
    pub fn with_min_selection_size(mut self, size: f64) -> Self {
        self.min_selection_size = size;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_measure_config_default() {
        let config = MeasureConfig::default();
        assert_eq!(config.max_display_width, 800.0);
        assert_eq!(config.max_display_height, 600.0);
        assert_eq!(config.min_selection_size, 5.0);
    }

    #[test]
    fn test_measure_config_builder() {
        let config = MeasureConfig::default()
            .with_display_bounds(1024.0, 768.0)
            .with_min_selection_size(8.0);
        assert_eq!(config.max_display_width, 1024.0);
        assert_eq!(config.max_display_height, 768.0);
        assert_eq!(config.min_selection_size, 8.0);
    }
}
