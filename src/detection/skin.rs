//! Skin color sampling from the cheek area of a detected face
//!
//! Implements the locator that:
//! - Finds one face region (strict pass, then relaxed pass)
//! - Crops the cheek band of the face box
//! - Masks pixels inside an empirical HSV skin band
//! - Averages the surviving pixels into one RGB sample
//!
//! When too few pixels pass the mask (unusual lighting, very light or very
//! deep skin) the whole crop is averaged instead.

use std::sync::Arc;

use opencv::{
    core::{Mat, Rect, Vec3b, CV_8UC3},
    imgproc::{cvt_color_def, COLOR_BGR2GRAY, COLOR_BGR2HSV},
    prelude::*,
};
use tracing::{debug, info};

use crate::color::Rgb;
use crate::config::{AnalysisConfig, DetectionConfig, RegionConfig, SkinMaskConfig};
use crate::detection::face::{find_face, FaceDetector, FaceRegion, HaarCascadeDetector};
use crate::{AnalysisError, Result};

/// Outcome of sampling, with the evidence behind it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SkinSample {
    pub color: Rgb,
    pub face: FaceRegion,
    pub cheek: Rect,
    /// Pixels that passed the skin mask
    pub skin_pixels: usize,
    /// Pixels averaged into `color`
    pub sampled_pixels: usize,
    /// True when the mask was discarded for the whole crop
    pub used_fallback: bool,
}

/// Locates a face and extracts its representative skin color
pub struct SkinRegionLocator {
    detector: Arc<dyn FaceDetector>,
    detection: DetectionConfig,
    region: RegionConfig,
    mask: SkinMaskConfig,
}

impl SkinRegionLocator {
    /// Create a locator with default parameters around a detector
    pub fn new(detector: Arc<dyn FaceDetector>) -> Self {
        Self::with_config(detector, &AnalysisConfig::default())
    }

    /// Create a locator with parameters taken from a configuration
    pub fn with_config(detector: Arc<dyn FaceDetector>, config: &AnalysisConfig) -> Self {
        Self {
            detector,
            detection: config.detection.clone(),
            region: config.region,
            mask: config.skin_mask,
        }
    }

    /// Sample the skin color of the largest face
    ///
    /// # Arguments
    ///
    /// * `image` - 8-bit, 3-channel BGR image
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError` if:
    /// - The image is not 8-bit BGR (`InvalidParameter`)
    /// - No face is found by either pass (`NoFaceDetected`)
    /// - The cheek crop is empty (`RegionExtractionFailed`)
    pub fn locate(&self, image: &Mat) -> Result<Rgb> {
        self.sample(image).map(|sample| sample.color)
    }

    /// Like [`locate`](Self::locate) but also returns the regions used
    pub fn sample(&self, image: &Mat) -> Result<SkinSample> {
        if image.empty() || image.typ() != CV_8UC3 {
            return Err(AnalysisError::InvalidParameter {
                parameter: "image".into(),
                value: format!(
                    "{}x{} type {} (expected non-empty 8-bit BGR)",
                    image.cols(),
                    image.rows(),
                    image.typ()
                ),
            });
        }

        let mut gray = Mat::default();
        cvt_color_def(image, &mut gray, COLOR_BGR2GRAY)
            .map_err(|e| AnalysisError::opencv("convert to grayscale", e))?;

        let face = find_face(self.detector.as_ref(), &gray, &self.detection)?;
        let cheek = cheek_rect(&face, &self.region, image.cols(), image.rows()).ok_or(
            AnalysisError::RegionExtractionFailed {
                x: face.x,
                y: face.y,
                width: face.width,
                height: face.height,
            },
        )?;

        let crop = Mat::roi(image, cheek)
            .and_then(|roi| roi.try_clone())
            .map_err(|e| AnalysisError::opencv("crop cheek region", e))?;
        let mut hsv = Mat::default();
        cvt_color_def(&crop, &mut hsv, COLOR_BGR2HSV)
            .map_err(|e| AnalysisError::opencv("convert cheek to HSV", e))?;

        let bgr_pixels = mat_pixels(&crop)?;
        let hsv_pixels = mat_pixels(&hsv)?;
        let mut sample = sample_skin(&bgr_pixels, &hsv_pixels, &self.mask)?;
        sample.face = face;
        sample.cheek = cheek;

        debug!(
            color = %sample.color,
            skin_pixels = sample.skin_pixels,
            sampled_pixels = sample.sampled_pixels,
            "sampled skin color"
        );
        Ok(sample)
    }
}

/// Sample skin color with the process-wide Haar cascade and default settings
pub fn locate_skin_color(image: &Mat) -> Result<Rgb> {
    let detector = HaarCascadeDetector::shared(None)?;
    SkinRegionLocator::new(Arc::new(detector)).locate(image)
}

/// Cheek sub-rectangle of a face box, clipped to the image
///
/// Offsets are truncated toward zero from the face box's top-left corner.
/// Returns `None` when the clipped rectangle has no area.
pub fn cheek_rect(face: &FaceRegion, region: &RegionConfig, cols: i32, rows: i32) -> Option<Rect> {
    let h = face.height as f64;
    let w = face.width as f64;

    let top = (face.y + (h * region.top) as i32).clamp(0, rows);
    let bottom = (face.y + (h * region.bottom) as i32).clamp(0, rows);
    let left = (face.x + (w * region.left) as i32).clamp(0, cols);
    let right = (face.x + (w * region.right) as i32).clamp(0, cols);

    if bottom <= top || right <= left {
        return None;
    }
    Some(Rect::new(left, top, right - left, bottom - top))
}

/// True when an HSV pixel lies inside the inclusive skin band
pub fn in_skin_band(hsv: [u8; 3], mask: &SkinMaskConfig) -> bool {
    (0..3).all(|c| hsv[c] >= mask.lower[c] && hsv[c] <= mask.upper[c])
}

/// Average BGR pixels selected by the HSV skin band, emitted as RGB
///
/// `bgr` and `hsv` must describe the same pixels in the same order. The
/// returned sample's `face` and `cheek` are left empty for the caller.
pub fn sample_skin(bgr: &[[u8; 3]], hsv: &[[u8; 3]], mask: &SkinMaskConfig) -> Result<SkinSample> {
    if bgr.is_empty() || bgr.len() != hsv.len() {
        return Err(AnalysisError::processing(format!(
            "pixel buffers differ or are empty: {} BGR vs {} HSV",
            bgr.len(),
            hsv.len()
        )));
    }

    let skin: Vec<[u8; 3]> = bgr
        .iter()
        .zip(hsv)
        .filter(|(_, hsv)| in_skin_band(**hsv, mask))
        .map(|(bgr, _)| *bgr)
        .collect();

    let used_fallback = skin.len() < mask.min_skin_pixels;
    if used_fallback {
        info!(
            skin_pixels = skin.len(),
            threshold = mask.min_skin_pixels,
            "too few skin pixels, averaging whole cheek region"
        );
    }
    let selected: &[[u8; 3]] = if used_fallback { bgr } else { &skin };

    let [b, g, r] = mean_pixel(selected);
    Ok(SkinSample {
        color: Rgb::new(r, g, b),
        face: FaceRegion::new(0, 0, 0, 0),
        cheek: Rect::default(),
        skin_pixels: skin.len(),
        sampled_pixels: selected.len(),
        used_fallback,
    })
}

/// Per-channel mean truncated toward zero; caller guarantees non-empty input
fn mean_pixel(pixels: &[[u8; 3]]) -> [u8; 3] {
    let mut sums = [0u64; 3];
    for pixel in pixels {
        for c in 0..3 {
            sums[c] += pixel[c] as u64;
        }
    }
    let n = pixels.len().max(1) as u64;
    [(sums[0] / n) as u8, (sums[1] / n) as u8, (sums[2] / n) as u8]
}

/// Copy a 3-channel 8-bit image into a row-major pixel list
fn mat_pixels(mat: &Mat) -> Result<Vec<[u8; 3]>> {
    let mut pixels = Vec::with_capacity((mat.rows() * mat.cols()).max(0) as usize);
    for row in 0..mat.rows() {
        for col in 0..mat.cols() {
            let p = mat
                .at_2d::<Vec3b>(row, col)
                .map_err(|e| AnalysisError::opencv("read pixel", e))?;
            pixels.push([p[0], p[1], p[2]]);
        }
    }
    Ok(pixels)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cheek_rect_fractions() {
        let face = FaceRegion::new(100, 50, 200, 200);
        let rect = cheek_rect(&face, &RegionConfig::default(), 1000, 1000).unwrap();
        // rows 50+70 .. 50+130, cols 100+30 .. 100+170
        assert_eq!(rect, Rect::new(130, 120, 140, 60));
    }

    #[test]
    fn test_cheek_rect_truncates() {
        let face = FaceRegion::new(0, 0, 11, 11);
        // 11*0.35 = 3.85 -> 3, 11*0.65 = 7.15 -> 7, 11*0.15 = 1.65 -> 1, 11*0.85 = 9.35 -> 9
        let rect = cheek_rect(&face, &RegionConfig::default(), 100, 100).unwrap();
        assert_eq!(rect, Rect::new(1, 3, 8, 4));
    }

    #[test]
    fn test_cheek_rect_degenerate() {
        let tiny = FaceRegion::new(10, 10, 1, 1);
        assert!(cheek_rect(&tiny, &RegionConfig::default(), 100, 100).is_none());
    }

    #[test]
    fn test_cheek_rect_clipped_to_image() {
        let outside = FaceRegion::new(500, 500, 100, 100);
        assert!(cheek_rect(&outside, &RegionConfig::default(), 100, 100).is_none());

        let partial = FaceRegion::new(80, 0, 100, 100);
        let rect = cheek_rect(&partial, &RegionConfig::default(), 100, 100).unwrap();
        assert_eq!(rect, Rect::new(95, 35, 5, 30));
    }

    #[test]
    fn test_skin_band_inclusive() {
        let mask = SkinMaskConfig::default();
        assert!(in_skin_band([0, 20, 70], &mask));
        assert!(in_skin_band([50, 255, 255], &mask));
        assert!(!in_skin_band([51, 100, 100], &mask));
        assert!(!in_skin_band([10, 19, 100], &mask));
        assert!(!in_skin_band([10, 100, 69], &mask));
    }

    #[test]
    fn test_sample_masked_pixels() {
        let mask = SkinMaskConfig::default();
        let mut bgr = vec![[150, 189, 215]; 150];
        let mut hsv = vec![[18, 77, 215]; 150];
        bgr.extend(vec![[255, 0, 0]; 50]);
        hsv.extend(vec![[120, 255, 255]; 50]);

        let sample = sample_skin(&bgr, &hsv, &mask).unwrap();
        assert_eq!(sample.color, Rgb::new(215, 189, 150));
        assert_eq!(sample.skin_pixels, 150);
        assert!(!sample.used_fallback);
    }

    #[test]
    fn test_sample_falls_back_below_threshold() {
        let mask = SkinMaskConfig::default();
        let mut bgr = vec![[150, 189, 215]; 99];
        let mut hsv = vec![[18, 77, 215]; 99];
        bgr.push([0, 0, 0]);
        hsv.push([0, 0, 0]);

        let sample = sample_skin(&bgr, &hsv, &mask).unwrap();
        assert!(sample.used_fallback);
        assert_eq!(sample.sampled_pixels, 100);
        // 215 * 99 / 100 = 212.85 -> 212
        assert_eq!(sample.color, Rgb::new(212, 187, 148));
    }

    #[test]
    fn test_mean_truncates() {
        assert_eq!(mean_pixel(&[[1, 2, 3], [2, 3, 3]]), [1, 2, 3]);
    }

    #[test]
    fn test_sample_rejects_mismatched_buffers() {
        let mask = SkinMaskConfig::default();
        assert!(sample_skin(&[], &[], &mask).is_err());
        assert!(sample_skin(&[[0, 0, 0]], &[], &mask).is_err());
    }
}
