//! Configuration structures for the skin analysis pipeline.
//!
//! All tunable parameters for detection, cheek sampling and recommendation
//! output, organized by stage. Defaults reproduce the reference behaviour.
//!
//! # Configuration Loading
//!
//! ```no_run
//! use skintone_match::AnalysisConfig;
//! use std::path::Path;
//!
//! // Load from file
//! let config = AnalysisConfig::from_json_file(Path::new("config.json"))?;
//!
//! // Or use defaults
//! let config = AnalysisConfig::default();
//! # Ok::<(), skintone_match::AnalysisError>(())
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::constants::{detection, recommendations, region, skin_mask};
use crate::{AnalysisError, Result};

/// Complete pipeline configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Face detector passes
    pub detection: DetectionConfig,

    /// Cheek crop relative to the face box
    pub region: RegionConfig,

    /// Skin pixel selection
    pub skin_mask: SkinMaskConfig,

    /// Explicit cascade XML location; searched for when absent
    #[serde(default)]
    pub cascade_path: Option<PathBuf>,

    /// Apply EXIF orientation before detection
    #[serde(default = "default_true")]
    pub exif_correction: bool,

    /// Products returned per category
    #[serde(default = "default_top_k")]
    pub recommendations_per_category: usize,
}

/// Strict and relaxed detector passes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionConfig {
    pub strict: DetectionParams,
    pub relaxed: DetectionParams,
}

/// Parameters for one multi-scale detection pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DetectionParams {
    /// Image pyramid step, must be > 1
    pub scale_factor: f64,

    /// Overlapping hits required to keep a candidate
    pub min_neighbors: i32,

    /// Smallest accepted square window, in pixels
    pub min_size: i32,
}

/// Cheek crop as fractions of the face box, measured from its top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegionConfig {
    pub top: f64,
    pub bottom: f64,
    pub left: f64,
    pub right: f64,
}

/// HSV skin band (OpenCV 8-bit convention) and fallback threshold.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SkinMaskConfig {
    pub lower: [u8; 3],
    pub upper: [u8; 3],
    pub min_skin_pixels: usize,
}

fn default_true() -> bool {
    true
}

fn default_top_k() -> usize {
    recommendations::DEFAULT_TOP_K
}

impl DetectionParams {
    pub fn strict() -> Self {
        Self {
            scale_factor: detection::STRICT_SCALE_FACTOR,
            min_neighbors: detection::STRICT_MIN_NEIGHBORS,
            min_size: detection::STRICT_MIN_SIZE,
        }
    }

    pub fn relaxed() -> Self {
        Self {
            scale_factor: detection::RELAXED_SCALE_FACTOR,
            min_neighbors: detection::RELAXED_MIN_NEIGHBORS,
            min_size: detection::RELAXED_MIN_SIZE,
        }
    }

    fn validate(&self, pass: &str) -> Result<()> {
        if self.scale_factor.is_nan() || self.scale_factor <= 1.0 {
            return Err(AnalysisError::ConfigError {
                message: format!("{} pass scale_factor must be > 1, got {}", pass, self.scale_factor),
            });
        }
        if self.min_neighbors < 0 || self.min_size < 1 {
            return Err(AnalysisError::ConfigError {
                message: format!(
                    "{} pass needs min_neighbors >= 0 and min_size >= 1, got {} / {}",
                    pass, self.min_neighbors, self.min_size
                ),
            });
        }
        Ok(())
    }
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            strict: DetectionParams::strict(),
            relaxed: DetectionParams::relaxed(),
        }
    }
}

impl Default for RegionConfig {
    fn default() -> Self {
        Self {
            top: region::CHEEK_TOP,
            bottom: region::CHEEK_BOTTOM,
            left: region::CHEEK_LEFT,
            right: region::CHEEK_RIGHT,
        }
    }
}

impl Default for SkinMaskConfig {
    fn default() -> Self {
        Self {
            lower: skin_mask::HSV_LOWER,
            upper: skin_mask::HSV_UPPER,
            min_skin_pixels: skin_mask::MIN_SKIN_PIXELS,
        }
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            detection: DetectionConfig::default(),
            region: RegionConfig::default(),
            skin_mask: SkinMaskConfig::default(),
            cascade_path: None,
            exif_correction: true,
            recommendations_per_category: recommendations::DEFAULT_TOP_K,
        }
    }
}

impl AnalysisConfig {
    /// Load configuration from JSON file
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| AnalysisError::ConfigError {
            message: format!("cannot read {}: {}", path.display(), e),
        })?;
        let config: Self = serde_json::from_str(&content).map_err(|e| AnalysisError::ConfigError {
            message: format!("cannot parse {}: {}", path.display(), e),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to JSON file
    pub fn to_json_file(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).map_err(|e| AnalysisError::ConfigError {
            message: format!("cannot serialize configuration: {}", e),
        })?;
        std::fs::write(path, json).map_err(|e| AnalysisError::ConfigError {
            message: format!("cannot write {}: {}", path.display(), e),
        })
    }

    /// Check parameter ranges
    pub fn validate(&self) -> Result<()> {
        self.detection.strict.validate("strict")?;
        self.detection.relaxed.validate("relaxed")?;

        let r = &self.region;
        let in_unit = |v: f64| (0.0..=1.0).contains(&v);
        if !(in_unit(r.top) && in_unit(r.bottom) && in_unit(r.left) && in_unit(r.right)) {
            return Err(AnalysisError::ConfigError {
                message: format!("cheek region fractions must lie in [0, 1]: {:?}", r),
            });
        }
        if r.top >= r.bottom || r.left >= r.right {
            return Err(AnalysisError::ConfigError {
                message: format!("cheek region is inverted or empty: {:?}", r),
            });
        }

        let m = &self.skin_mask;
        if m.lower.iter().zip(m.upper.iter()).any(|(lo, hi)| lo > hi) {
            return Err(AnalysisError::ConfigError {
                message: format!("skin mask lower bound exceeds upper: {:?} > {:?}", m.lower, m.upper),
            });
        }
        Ok(())
    }
}
