//! Configuration for the layout engine

/// Configuration options for layout computation
#[derive(Debug, Clone)]
pub struct LayoutConfig {
    /// Device density used to convert millimetre insets to pixels
    pub pixels_per_mm: f32,

    /// Fail the layout pass when an anchor cycle is found instead of
    /// resolving it with unresolved geometry
    pub reject_cycles: bool,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            pixels_per_mm: 10.0,
            reject_cycles: false,
        }
    }
}

impl LayoutConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the pixel density
    pub fn with_pixels_per_mm(mut self, pixels_per_mm: f32) -> Self {
        self.pixels_per_mm = pixels_per_mm;
        self
    }

    /// Reject anchor cycles with an error
    pub fn with_reject_cycles(mut self, reject: bool) -> Self {
        self.reject_cycles = reject;
        self
    }

    /// Convert a physical length to whole device pixels
    pub fn mm_to_px(&self, mm: f32) -> i32 {
        (mm * self.pixels_per_mm).round() as i32
    }

    /// Convert device pixels to a physical length
    pub fn px_to_mm(&self, px: f32) -> f32 {
        px / self.pixels_per_mm
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LayoutConfig::default();
        assert_eq!(config.pixels_per_mm, 10.0);
        assert!(!config.reject_cycles);
    }

    #[test]
    fn test_builder_pattern() {
        let config = LayoutConfig::new()
            .with_pixels_per_mm(4.0)
            .with_reject_cycles(true);

        assert_eq!(config.pixels_per_mm, 4.0);
        assert!(config.reject_cycles);
    }

    #[test]
    fn test_mm_conversion() {
        let config = LayoutConfig::new().with_pixels_per_mm(4.0);
        assert_eq!(config.mm_to_px(2.5), 10);
        assert_eq!(config.mm_to_px(0.1), 0);
        assert_eq!(config.px_to_mm(10.0), 2.5);
    }
}
