//! # Skintone Match
//!
//! A Rust crate for classifying skin tone from a face photograph and
//! matching it against a cosmetics catalog.
//!
//! This library provides:
//! - Face detection with a two-pass Haar cascade search
//! - Skin color sampling from the cheek band using an HSV skin mask
//! - Classification onto the 10-step Monk skin tone scale
//! - Undertone, depth and saturation descriptors
//! - Ranking of catalog products by color proximity
//! - Makeup try-on prompts for an external image generator
//!
//! ## Example
//!
//! ```rust,no_run
//! use skintone_match::{analyze_image, AnalysisConfig};
//! use std::path::Path;
//!
//! let result = analyze_image(Path::new("selfie.jpg"), &AnalysisConfig::default())?;
//! println!("{} -> {} ({})", result.skin_tone.hex, result.monk_tone.tone.name, result.skin_tone.undertone);
//! # Ok::<(), skintone_match::AnalysisError>(())
//! ```

use std::path::Path;

pub mod catalog;
pub mod classification;
pub mod color;
pub mod config;
pub mod constants;
pub mod detection;
pub mod error;
pub mod exif;
pub mod image_loader;
pub mod makeup;
pub mod pipeline;

pub use catalog::{
    match_by_category, match_catalog, CatalogEntry, CatalogFilter, CatalogSource,
    CategorizedMatches, ProductCategory, ScoredEntry, StaticCatalog,
};
pub use classification::{
    classify_tone, classify_undertone, describe_skin, reference_scale, reference_tones,
    SkinDescriptor, ToneClassification, Undertone, UndertoneResult,
};
pub use color::{hex_to_rgb, rgb_to_hex, rgb_to_hsl, Rgb};
pub use config::AnalysisConfig;
pub use detection::{locate_skin_color, FaceDetector, FaceRegion, HaarCascadeDetector, SkinRegionLocator};
pub use error::{AnalysisError, Result};
pub use image_loader::{decode_image, load_image};
pub use makeup::{build_makeup_prompt, ImageGenerator};
pub use pipeline::{CompleteAnalysis, SkinAnalysis, SkinAnalyzer};

/// Analyze a photo file with the shared Haar cascade and no catalog
///
/// # Errors
///
/// Returns `AnalysisError` if:
/// - The configuration is invalid or the cascade file cannot be found
/// - The image cannot be read or decoded
/// - No face is detected, or its cheek region is empty
pub fn analyze_image(image_path: &Path, config: &AnalysisConfig) -> Result<SkinAnalysis> {
    let bytes = std::fs::read(image_path).map_err(|e| {
        AnalysisError::image_load(format!("Failed to open image file: {}", image_path.display()), e)
    })?;
    SkinAnalyzer::from_config(config.clone())?.analyze(&bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analysis_serialization() {
        let analyzer = SkinAnalyzer::new(std::sync::Arc::new(NoDetector));
        let analysis = analyzer.analyze_sample(Rgb::new(234, 218, 186));

        let json = serde_json::to_value(&analysis).unwrap();
        assert_eq!(json["skin_tone"]["hex"], "#eadaba");
        assert_eq!(json["skin_tone"]["rgb"]["r"], 234);
        assert_eq!(json["monk_tone"]["code"], "MST04");
        assert_eq!(json["monk_tone"]["confidence"], 100.0);
        assert!(json["recommendations"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_missing_image_file() {
        let result = analyze_image(Path::new("/nonexistent/selfie.jpg"), &AnalysisConfig::default());
        assert!(result.is_err());
    }

    struct NoDetector;

    impl FaceDetector for NoDetector {
        fn detect(
            &self,
            _gray: &opencv::core::Mat,
            _params: &config::DetectionParams,
        ) -> Result<Vec<FaceRegion>> {
            Ok(Vec::new())
        }
    }
}
