//! Reference values and tuning constants for skin tone analysis
//!
//! Compile-time defaults for face detection, skin sampling and color
//! scoring. Runtime overrides live in [`crate::config::AnalysisConfig`].

/// Color distance normalization
pub mod distance {
    /// Maximum Euclidean distance between two 8-bit RGB colors, sqrt(3 * 255^2)
    pub const MAX_RGB_DISTANCE: f64 = 441.67;

    /// Distance per score point, `MAX_RGB_DISTANCE / 100`
    pub const SCORE_DIVISOR: f64 = 4.41;
}

/// Haar cascade face detection parameters
pub mod detection {
    /// Cascade file shipped with OpenCV for frontal faces
    pub const CASCADE_FILE_NAME: &str = "haarcascade_frontalface_default.xml";

    /// Environment variable overriding the cascade location
    pub const CASCADE_PATH_ENV: &str = "SKINTONE_CASCADE_PATH";

    /// Directories searched for the cascade file, in order
    pub const CASCADE_SEARCH_DIRS: &[&str] = &[
        "/usr/share/opencv4/haarcascades",
        "/usr/local/share/opencv4/haarcascades",
        "/usr/share/opencv/haarcascades",
        "/usr/local/share/opencv/haarcascades",
        "/opt/homebrew/share/opencv4/haarcascades",
    ];

    /// Strict pass
    pub const STRICT_SCALE_FACTOR: f64 = 1.05;
    pub const STRICT_MIN_NEIGHBORS: i32 = 3;
    pub const STRICT_MIN_SIZE: i32 = 50;

    /// Relaxed pass, used only when the strict pass finds nothing
    pub const RELAXED_SCALE_FACTOR: f64 = 1.1;
    pub const RELAXED_MIN_NEIGHBORS: i32 = 2;
    pub const RELAXED_MIN_SIZE: i32 = 30;
}

/// Cheek sub-region as fractions of the face box
pub mod region {
    pub const CHEEK_TOP: f64 = 0.35;
    pub const CHEEK_BOTTOM: f64 = 0.65;
    pub const CHEEK_LEFT: f64 = 0.15;
    pub const CHEEK_RIGHT: f64 = 0.85;
}

/// Empirical skin band in OpenCV 8-bit HSV (hue 0-179)
pub mod skin_mask {
    pub const HSV_LOWER: [u8; 3] = [0, 20, 70];
    pub const HSV_UPPER: [u8; 3] = [50, 255, 255];

    /// Below this many masked pixels the whole crop is averaged instead
    pub const MIN_SKIN_PIXELS: usize = 100;
}

/// Undertone rule thresholds
pub mod undertone {
    /// Minimum red/blue channel gap for a warm or cool cast
    pub const CHANNEL_GAP: i32 = 15;

    /// Green must fall strictly inside avg(r, b) * (1 -/+ this)
    pub const OLIVE_GREEN_BAND: f64 = 0.10;

    /// HSL saturation must be strictly below this for olive
    pub const OLIVE_MAX_SATURATION: u8 = 50;
}

/// Lightness and saturation bucket thresholds (inclusive lower bounds)
pub mod descriptor {
    pub const VERY_LIGHT: u8 = 80;
    pub const LIGHT: u8 = 65;
    pub const MEDIUM: u8 = 50;
    pub const MEDIUM_DARK: u8 = 35;
    pub const DARK: u8 = 20;

    pub const HIGH_SATURATION: u8 = 60;
    pub const MEDIUM_SATURATION: u8 = 35;
}

/// Recommendation defaults
pub mod recommendations {
    /// Products kept per category
    pub const DEFAULT_TOP_K: usize = 5;

    /// Shortest accepted custom makeup prompt
    pub const MIN_PROMPT_CHARS: usize = 10;

    /// Prompt preview length echoed back to callers
    pub const PROMPT_PREVIEW_CHARS: usize = 200;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_constants() {
        let exact = (3.0_f64 * 255.0 * 255.0).sqrt();
        assert!((distance::MAX_RGB_DISTANCE - exact).abs() < 0.01);
        assert!((distance::MAX_RGB_DISTANCE / 100.0 - distance::SCORE_DIVISOR).abs() < 0.001);
    }

    #[test]
    fn test_detection_passes_relax() {
        assert!(detection::RELAXED_MIN_SIZE < detection::STRICT_MIN_SIZE);
        assert!(detection::RELAXED_MIN_NEIGHBORS < detection::STRICT_MIN_NEIGHBORS);
        assert!(detection::RELAXED_SCALE_FACTOR > detection::STRICT_SCALE_FACTOR);
    }

    #[test]
    fn test_region_ranges() {
        assert!(region::CHEEK_TOP < region::CHEEK_BOTTOM);
        assert!(region::CHEEK_LEFT < region::CHEEK_RIGHT);
    }

    #[test]
    fn test_descriptor_thresholds_descend() {
        assert!(descriptor::VERY_LIGHT > descriptor::LIGHT);
        assert!(descriptor::LIGHT > descriptor::MEDIUM);
        assert!(descriptor::MEDIUM > descriptor::MEDIUM_DARK);
        assert!(descriptor::MEDIUM_DARK > descriptor::DARK);
    }
}
