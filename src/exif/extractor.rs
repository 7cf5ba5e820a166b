//! EXIF orientation extraction
//!
//! Phone cameras store portraits sideways and record the intended rotation
//! in the EXIF `Orientation` tag. The face detector only finds upright
//! faces, so the tag is read here and applied by the image loader.

use std::io::Cursor;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, Result};

/// EXIF orientation values 1-8
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Orientation {
    /// 1: stored upright
    Normal,
    /// 2: mirrored left-right
    FlipHorizontal,
    /// 3: upside down
    Rotate180,
    /// 4: mirrored top-bottom
    FlipVertical,
    /// 5: mirrored across the main diagonal
    Transpose,
    /// 6: needs a 90 degree clockwise turn
    Rotate90,
    /// 7: mirrored across the anti-diagonal
    Transverse,
    /// 8: needs a 90 degree counter-clockwise turn
    Rotate270,
}

impl Orientation {
    /// Map the raw tag value; out-of-range values are treated as upright
    pub fn from_exif(value: u32) -> Self {
        match value {
            2 => Orientation::FlipHorizontal,
            3 => Orientation::Rotate180,
            4 => Orientation::FlipVertical,
            5 => Orientation::Transpose,
            6 => Orientation::Rotate90,
            7 => Orientation::Transverse,
            8 => Orientation::Rotate270,
            _ => Orientation::Normal,
        }
    }

    /// True when width and height trade places after correction
    pub fn swaps_dimensions(&self) -> bool {
        matches!(
            self,
            Orientation::Transpose
                | Orientation::Rotate90
                | Orientation::Transverse
                | Orientation::Rotate270
        )
    }
}

/// EXIF metadata extractor
pub struct ExifExtractor;

impl ExifExtractor {
    /// Read the orientation from an encoded image
    ///
    /// Images without EXIF data are reported as `Orientation::Normal`.
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::ExifError` when EXIF data is present but corrupt
    pub fn orientation_from_bytes(bytes: &[u8]) -> Result<Orientation> {
        let reader = exif::Reader::new();
        let exif = match reader.read_from_container(&mut Cursor::new(bytes)) {
            Ok(exif) => exif,
            Err(exif::Error::NotFound(_)) => return Ok(Orientation::Normal),
            Err(exif::Error::NotSupported(_)) => return Ok(Orientation::Normal),
            Err(e) => return Err(AnalysisError::exif("failed to parse EXIF block", e)),
        };

        let orientation = exif
            .get_field(exif::Tag::Orientation, exif::In::PRIMARY)
            .and_then(|field| field.value.get_uint(0))
            .map(Orientation::from_exif)
            .unwrap_or(Orientation::Normal);
        Ok(orientation)
    }

    /// Read the orientation from an image file
    pub fn orientation_from_path(path: &Path) -> Result<Orientation> {
        let bytes = std::fs::read(path)
            .map_err(|e| AnalysisError::exif(format!("cannot read {}", path.display()), e))?;
        Self::orientation_from_bytes(&bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_orientation_mapping() {
        assert_eq!(Orientation::from_exif(1), Orientation::Normal);
        assert_eq!(Orientation::from_exif(3), Orientation::Rotate180);
        assert_eq!(Orientation::from_exif(6), Orientation::Rotate90);
        assert_eq!(Orientation::from_exif(8), Orientation::Rotate270);
        assert_eq!(Orientation::from_exif(0), Orientation::Normal);
        assert_eq!(Orientation::from_exif(42), Orientation::Normal);
    }

    #[test]
    fn test_dimension_swaps() {
        assert!(Orientation::Rotate90.swaps_dimensions());
        assert!(Orientation::Transverse.swaps_dimensions());
        assert!(!Orientation::Rotate180.swaps_dimensions());
        assert!(!Orientation::FlipHorizontal.swaps_dimensions());
    }

    #[test]
    fn test_no_exif_is_normal() {
        // PNG signature with nothing after it carries no EXIF
        let png = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
        let orientation = ExifExtractor::orientation_from_bytes(&png).unwrap_or(Orientation::Normal);
        assert_eq!(orientation, Orientation::Normal);
    }

    #[test]
    fn test_missing_file() {
        let result = ExifExtractor::orientation_from_path(Path::new("/nonexistent/photo.jpg"));
        assert!(matches!(result, Err(AnalysisError::ExifError { .. })));
    }
}
