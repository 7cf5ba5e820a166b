//! End-to-end analysis of an uploaded photo
//!
//! [`SkinAnalyzer`] ties the stages together: decode, locate the skin
//! sample, classify it, then rank catalog products. The catalog and the
//! makeup generator are optional collaborators; when they are missing or
//! fail the analysis is still returned, with empty recommendations or no
//! generated image.

use std::sync::Arc;

use opencv::core::Mat;
use serde::Serialize;
use tracing::{info, warn};

use crate::catalog::{
    match_by_category, match_catalog, CatalogEntry, CatalogFilter, CatalogSource,
    CategorizedMatches, ScoredEntry,
};
use crate::classification::{
    classify_tone, classify_undertone, describe_skin, SkinDescriptor, ToneClassification,
    UndertoneResult,
};
use crate::color::Rgb;
use crate::config::AnalysisConfig;
use crate::detection::{FaceDetector, HaarCascadeDetector, SkinRegionLocator, SkinSample};
use crate::image_loader::decode_upright;
use crate::makeup::{build_makeup_prompt, prompt_preview, validate_custom_prompt, ImageGenerator};
use crate::{AnalysisError, Result};

/// Sampled skin color in display forms
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkinColor {
    pub hex: String,
    pub rgb: Rgb,
    /// Undertone code (`quente`, `frio`, `neutro`, `oliva`)
    pub undertone: &'static str,
}

/// Quick analysis: tone plus the closest foundations
#[derive(Debug, Clone, Serialize)]
pub struct SkinAnalysis {
    pub skin_tone: SkinColor,
    pub monk_tone: ToneClassification,
    pub recommendations: Vec<ScoredEntry>,
}

/// Full analysis with every product group and a makeup try-on
#[derive(Debug, Clone, Serialize)]
pub struct CompleteAnalysis {
    pub skin_tone: SkinColor,
    pub monk_tone: ToneClassification,
    pub undertone: UndertoneResult,
    pub descriptor: SkinDescriptor,
    pub recommendations: CategorizedMatches,
    pub tips: &'static [&'static str],
    pub makeup_prompt: String,
    /// Base64 image from the generator, if one is configured and succeeded
    pub makeup_image: Option<String>,
}

/// Result of a try-on with a user-written prompt
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomMakeup {
    pub image: String,
    pub prompt_preview: String,
}

/// Photo analyzer with its detector and optional collaborators
pub struct SkinAnalyzer {
    locator: SkinRegionLocator,
    config: AnalysisConfig,
    catalog: Option<Arc<dyn CatalogSource>>,
    generator: Option<Arc<dyn ImageGenerator>>,
}

impl SkinAnalyzer {
    /// Analyzer around a given detector with default settings
    pub fn new(detector: Arc<dyn FaceDetector>) -> Self {
        Self::with_config(detector, AnalysisConfig::default())
    }

    pub fn with_config(detector: Arc<dyn FaceDetector>, config: AnalysisConfig) -> Self {
        Self {
            locator: SkinRegionLocator::with_config(detector, &config),
            config,
            catalog: None,
            generator: None,
        }
    }

    /// Analyzer using the shared Haar cascade named by the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the cascade
    /// file cannot be found or loaded
    pub fn from_config(config: AnalysisConfig) -> Result<Self> {
        config.validate()?;
        let detector = HaarCascadeDetector::shared(config.cascade_path.as_deref())?;
        Ok(Self::with_config(Arc::new(detector), config))
    }

    pub fn with_catalog(mut self, catalog: Arc<dyn CatalogSource>) -> Self {
        self.catalog = Some(catalog);
        self
    }

    pub fn with_generator(mut self, generator: Arc<dyn ImageGenerator>) -> Self {
        self.generator = Some(generator);
        self
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Decode an upload and sample its skin color
    pub fn sample_bytes(&self, image: &[u8]) -> Result<SkinSample> {
        let mat = decode_upright(image, self.config.exif_correction)?;
        self.sample_mat(&mat)
    }

    /// Sample the skin color of an already decoded BGR image
    pub fn sample_mat(&self, image: &Mat) -> Result<SkinSample> {
        self.locator.sample(image)
    }

    /// Quick analysis of an encoded photo
    ///
    /// # Errors
    ///
    /// Returns `ImageLoadError`, `NoFaceDetected` or
    /// `RegionExtractionFailed` when no sample can be taken. Catalog
    /// failures only empty the recommendations.
    pub fn analyze(&self, image: &[u8]) -> Result<SkinAnalysis> {
        let sample = self.sample_bytes(image)?.color;
        Ok(self.analyze_sample(sample))
    }

    /// Quick analysis of a color that was already sampled
    pub fn analyze_sample(&self, sample: Rgb) -> SkinAnalysis {
        let undertone = classify_undertone(sample);
        let monk_tone = classify_tone(sample);

        let bases = self.fetch_catalog(&CatalogFilter::active_of_type("base"));
        let recommendations =
            match_catalog(sample, &bases, self.config.recommendations_per_category);

        info!(
            color = %sample,
            tone = monk_tone.tone.code,
            undertone = undertone.code,
            matches = recommendations.len(),
            "analysis complete"
        );

        SkinAnalysis {
            skin_tone: skin_color(sample, &undertone),
            monk_tone,
            recommendations,
        }
    }

    /// Full analysis of an encoded photo, including a makeup try-on when a
    /// generator is configured
    pub fn analyze_complete(&self, image: &[u8]) -> Result<CompleteAnalysis> {
        let sample = self.sample_bytes(image)?.color;
        let mut analysis = self.analyze_sample_complete(sample);
        analysis.makeup_image = self.try_generate(image, &analysis.makeup_prompt);
        Ok(analysis)
    }

    /// Full analysis of a sampled color, without image generation
    pub fn analyze_sample_complete(&self, sample: Rgb) -> CompleteAnalysis {
        let undertone = classify_undertone(sample);
        let monk_tone = classify_tone(sample);
        let descriptor = describe_skin(sample);

        let products = self.fetch_catalog(&CatalogFilter::active());
        let recommendations =
            match_by_category(sample, &products, self.config.recommendations_per_category);
        let makeup_prompt = build_makeup_prompt(&monk_tone, recommendations.best_base());

        info!(
            color = %sample,
            tone = monk_tone.tone.code,
            undertone = undertone.code,
            depth = descriptor.depth.label(),
            "complete analysis ready"
        );

        CompleteAnalysis {
            skin_tone: skin_color(sample, &undertone),
            monk_tone,
            undertone,
            descriptor,
            recommendations,
            tips: monk_tone.tone.tips,
            makeup_prompt,
            makeup_image: None,
        }
    }

    /// Apply makeup from a user-written prompt
    ///
    /// # Errors
    ///
    /// - `InvalidParameter` for a prompt under 10 characters
    /// - `GenerationError` when no generator is configured, it fails, or it
    ///   returns no image
    pub fn generate_custom(&self, image: &[u8], prompt: &str) -> Result<CustomMakeup> {
        validate_custom_prompt(prompt)?;
        let generator = self.generator.as_ref().ok_or_else(|| AnalysisError::GenerationError {
            message: "no image generator configured".into(),
        })?;

        let image = generator
            .generate(image, prompt)?
            .ok_or_else(|| AnalysisError::GenerationError {
                message: "generator returned no image".into(),
            })?;

        Ok(CustomMakeup {
            image,
            prompt_preview: prompt_preview(prompt),
        })
    }

    /// Catalog rows for a filter; failures degrade to no rows
    fn fetch_catalog(&self, filter: &CatalogFilter) -> Vec<CatalogEntry> {
        let Some(catalog) = &self.catalog else {
            return Vec::new();
        };
        match catalog.fetch(filter) {
            Ok(rows) => rows,
            Err(err) => {
                warn!(error = %err, "catalog unavailable, continuing without recommendations");
                Vec::new()
            }
        }
    }

    fn try_generate(&self, image: &[u8], prompt: &str) -> Option<String> {
        let generator = self.generator.as_ref()?;
        match generator.generate(image, prompt) {
            Ok(result) => result,
            Err(err) => {
                warn!(error = %err, "makeup generation failed, continuing without image");
                None
            }
        }
    }
}

fn skin_color(sample: Rgb, undertone: &UndertoneResult) -> SkinColor {
    SkinColor {
        hex: sample.hex(),
        rgb: sample,
        undertone: undertone.code,
    }
}
