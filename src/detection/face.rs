//! Frontal face detection with a strict-then-relaxed fallback
//!
//! Detection runs at most two passes over the grayscale image: a strict
//! parameter set, then a relaxed one only when the strict pass found
//! nothing. Among several candidates the largest box wins; equal areas keep
//! the candidate the detector reported first.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock};

use opencv::{
    core::{Mat, Rect, Size, Vector},
    objdetect::{CascadeClassifier, CASCADE_SCALE_IMAGE},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::{DetectionConfig, DetectionParams};
use crate::constants::detection::{CASCADE_FILE_NAME, CASCADE_PATH_ENV, CASCADE_SEARCH_DIRS};
use crate::{AnalysisError, Result};

/// Axis-aligned face box in image pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaceRegion {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl FaceRegion {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    pub fn area(&self) -> i64 {
        self.width as i64 * self.height as i64
    }
}

impl From<Rect> for FaceRegion {
    fn from(rect: Rect) -> Self {
        Self::new(rect.x, rect.y, rect.width, rect.height)
    }
}

/// Pluggable face detection backend.
///
/// `gray` is a single-channel 8-bit image. Implementations must return
/// candidates in a deterministic order for identical input.
pub trait FaceDetector: Send + Sync {
    fn detect(&self, gray: &Mat, params: &DetectionParams) -> Result<Vec<FaceRegion>>;
}

impl<T: FaceDetector + ?Sized> FaceDetector for &T {
    fn detect(&self, gray: &Mat, params: &DetectionParams) -> Result<Vec<FaceRegion>> {
        (**self).detect(gray, params)
    }
}

/// Largest candidate by area, first one on ties
pub fn select_largest(candidates: &[FaceRegion]) -> Option<FaceRegion> {
    candidates.iter().copied().fold(None, |best, face| match best {
        Some(current) if face.area() <= current.area() => Some(current),
        _ => Some(face),
    })
}

/// Run the strict pass, then the relaxed pass, and pick one face
///
/// # Errors
///
/// Returns `AnalysisError::NoFaceDetected` when both passes come back empty
pub fn find_face(
    detector: &dyn FaceDetector,
    gray: &Mat,
    config: &DetectionConfig,
) -> Result<FaceRegion> {
    let mut faces = detector.detect(gray, &config.strict)?;
    debug!(count = faces.len(), "strict detection pass");

    if faces.is_empty() {
        faces = detector.detect(gray, &config.relaxed)?;
        info!(count = faces.len(), "strict pass found no face, relaxed pass");
    }

    let face = select_largest(&faces).ok_or(AnalysisError::NoFaceDetected)?;
    debug!(?face, candidates = faces.len(), "selected face region");
    Ok(face)
}

/// Haar cascade backend built on OpenCV's `CascadeClassifier`.
///
/// OpenCV needs mutable access to the classifier while detecting, so
/// detections through one instance are serialized.
pub struct HaarCascadeDetector {
    classifier: Mutex<CascadeClassifier>,
    path: PathBuf,
}

static SHARED_CASCADE: OnceLock<HaarCascadeDetector> = OnceLock::new();

impl HaarCascadeDetector {
    /// Load a cascade from an XML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let path_str = path.to_str().ok_or_else(|| AnalysisError::ConfigError {
            message: format!("cascade path is not valid UTF-8: {}", path.display()),
        })?;

        let classifier = CascadeClassifier::new(path_str)
            .map_err(|e| AnalysisError::opencv("load face cascade", e))?;
        if classifier
            .empty()
            .map_err(|e| AnalysisError::opencv("inspect face cascade", e))?
        {
            return Err(AnalysisError::ConfigError {
                message: format!("face cascade could not be loaded from {}", path.display()),
            });
        }

        info!(path = %path.display(), "loaded face cascade");
        Ok(Self {
            classifier: Mutex::new(classifier),
            path: path.to_path_buf(),
        })
    }

    /// Process-wide detector, built on first use and reused afterwards.
    ///
    /// The path argument is only consulted by the first successful call.
    pub fn shared(explicit: Option<&Path>) -> Result<&'static HaarCascadeDetector> {
        if let Some(detector) = SHARED_CASCADE.get() {
            return Ok(detector);
        }

        let path = resolve_cascade_path(explicit)?;
        let detector = Self::from_file(&path)?;
        // A concurrent initializer may have won; its instance is equivalent.
        let _ = SHARED_CASCADE.set(detector);
        SHARED_CASCADE
            .get()
            .ok_or_else(|| AnalysisError::processing("face cascade initialization failed"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl FaceDetector for HaarCascadeDetector {
    fn detect(&self, gray: &Mat, params: &DetectionParams) -> Result<Vec<FaceRegion>> {
        let mut classifier = self
            .classifier
            .lock()
            .map_err(|_| AnalysisError::processing("face cascade lock poisoned"))?;

        let mut faces = Vector::<Rect>::new();
        classifier
            .detect_multi_scale(
                gray,
                &mut faces,
                params.scale_factor,
                params.min_neighbors,
                CASCADE_SCALE_IMAGE,
                Size::new(params.min_size, params.min_size),
                Size::default(),
            )
            .map_err(|e| AnalysisError::opencv("detect faces", e))?;

        Ok(faces.iter().map(FaceRegion::from).collect())
    }
}

/// Find the frontal face cascade file
///
/// Order: explicit path, `SKINTONE_CASCADE_PATH`, common OpenCV install
/// directories.
pub fn resolve_cascade_path(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }

    if let Ok(from_env) = std::env::var(CASCADE_PATH_ENV) {
        if !from_env.is_empty() {
            return Ok(PathBuf::from(from_env));
        }
    }

    CASCADE_SEARCH_DIRS
        .iter()
        .map(|dir| Path::new(dir).join(CASCADE_FILE_NAME))
        .find(|candidate| candidate.is_file())
        .ok_or_else(|| AnalysisError::ConfigError {
            message: format!(
                "{} not found; set {} or AnalysisConfig::cascade_path",
                CASCADE_FILE_NAME, CASCADE_PATH_ENV
            ),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedDetector {
        strict: Vec<FaceRegion>,
        relaxed: Vec<FaceRegion>,
        calls: Mutex<Vec<DetectionParams>>,
    }

    impl FixedDetector {
        fn new(strict: Vec<FaceRegion>, relaxed: Vec<FaceRegion>) -> Self {
            Self {
                strict,
                relaxed,
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    impl FaceDetector for FixedDetector {
        fn detect(&self, _gray: &Mat, params: &DetectionParams) -> Result<Vec<FaceRegion>> {
            self.calls.lock().unwrap().push(*params);
            if *params == DetectionParams::strict() {
                Ok(self.strict.clone())
            } else {
                Ok(self.relaxed.clone())
            }
        }
    }

    #[test]
    fn test_select_largest() {
        let small = FaceRegion::new(10, 10, 200, 200);
        let large = FaceRegion::new(50, 50, 300, 300);
        assert_eq!(small.area(), 40_000);
        assert_eq!(large.area(), 90_000);
        assert_eq!(select_largest(&[small, large]), Some(large));
        assert_eq!(select_largest(&[large, small]), Some(large));
        assert_eq!(select_largest(&[]), None);
    }

    #[test]
    fn test_select_largest_tie_keeps_first() {
        let first = FaceRegion::new(0, 0, 100, 50);
        let second = FaceRegion::new(200, 0, 50, 100);
        assert_eq!(select_largest(&[first, second]), Some(first));
        assert_eq!(select_largest(&[second, first]), Some(second));
    }

    #[test]
    fn test_strict_pass_wins() {
        let face = FaceRegion::new(0, 0, 120, 120);
        let detector = FixedDetector::new(vec![face], vec![FaceRegion::new(0, 0, 500, 500)]);
        let found = find_face(&detector, &Mat::default(), &DetectionConfig::default()).unwrap();
        assert_eq!(found, face);
        assert_eq!(detector.calls.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_relaxed_pass_fallback() {
        let face = FaceRegion::new(5, 5, 40, 40);
        let detector = FixedDetector::new(vec![], vec![face]);
        let found = find_face(&detector, &Mat::default(), &DetectionConfig::default()).unwrap();
        assert_eq!(found, face);

        let calls = detector.calls.lock().unwrap();
        assert_eq!(*calls, vec![DetectionParams::strict(), DetectionParams::relaxed()]);
    }

    #[test]
    fn test_no_face_after_both_passes() {
        let detector = FixedDetector::new(vec![], vec![]);
        let result = find_face(&detector, &Mat::default(), &DetectionConfig::default());
        assert!(matches!(result, Err(AnalysisError::NoFaceDetected)));
        assert_eq!(detector.calls.lock().unwrap().len(), 2);
    }

    #[test]
    fn test_explicit_cascade_path() {
        let path = resolve_cascade_path(Some(Path::new("/tmp/cascade.xml"))).unwrap();
        assert_eq!(path, PathBuf::from("/tmp/cascade.xml"));
    }

    #[test]
    fn test_missing_cascade_file() {
        let result = HaarCascadeDetector::from_file(Path::new("/nonexistent/cascade.xml"));
        assert!(result.is_err());
    }
}
