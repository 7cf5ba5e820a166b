//! Image decoding into OpenCV matrices
//!
//! Photos arrive as encoded bytes (upload body) or files. All of them are
//! decoded to an 8-bit BGR `Mat`, the channel order the detection stage
//! expects, and optionally turned upright using the EXIF orientation tag.
//!
//! ## Supported Formats
//!
//! Standard formats (via `image` crate):
//! - JPEG, PNG, GIF, WebP, TIFF, BMP
//!
//! Apple formats (via `libheif-rs`, `heic` feature):
//! - HEIC, HEIF

use std::path::Path;

use opencv::{
    core::{flip, rotate, transpose, Mat, Scalar, Vec3b, CV_8UC3, ROTATE_180, ROTATE_90_CLOCKWISE,
           ROTATE_90_COUNTERCLOCKWISE},
    prelude::*,
};
use tracing::{debug, warn};

use crate::error::{AnalysisError, Result};
use crate::exif::{ExifExtractor, Orientation};

/// Supported image formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Jpeg,
    Png,
    /// First frame only
    Gif,
    WebP,
    Tiff,
    Bmp,
    /// HEIC/HEIF image (Apple)
    Heic,
}

impl ImageFormat {
    /// Detect format from file extension
    pub fn from_extension(path: &Path) -> Option<ImageFormat> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "jpg" | "jpeg" => Some(ImageFormat::Jpeg),
            "png" => Some(ImageFormat::Png),
            "gif" => Some(ImageFormat::Gif),
            "webp" => Some(ImageFormat::WebP),
            "tiff" | "tif" => Some(ImageFormat::Tiff),
            "bmp" => Some(ImageFormat::Bmp),
            "heic" | "heif" => Some(ImageFormat::Heic),
            _ => None,
        }
    }

    /// Detect format from the leading bytes of an encoded image
    pub fn sniff(bytes: &[u8]) -> Option<ImageFormat> {
        if is_heif_container(bytes) {
            return Some(ImageFormat::Heic);
        }
        match image::guess_format(bytes).ok()? {
            image::ImageFormat::Jpeg => Some(ImageFormat::Jpeg),
            image::ImageFormat::Png => Some(ImageFormat::Png),
            image::ImageFormat::Gif => Some(ImageFormat::Gif),
            image::ImageFormat::WebP => Some(ImageFormat::WebP),
            image::ImageFormat::Tiff => Some(ImageFormat::Tiff),
            image::ImageFormat::Bmp => Some(ImageFormat::Bmp),
            _ => None,
        }
    }

    /// Check if format requires libheif
    pub fn requires_heif(&self) -> bool {
        matches!(self, ImageFormat::Heic)
    }
}

/// ISO-BMFF `ftyp` box with a HEIF brand
fn is_heif_container(bytes: &[u8]) -> bool {
    if bytes.len() < 12 || &bytes[4..8] != b"ftyp" {
        return false;
    }
    matches!(
        &bytes[8..12],
        b"heic" | b"heix" | b"hevc" | b"hevx" | b"heim" | b"heis" | b"mif1" | b"msf1"
    )
}

/// Decode an encoded image into a BGR Mat
///
/// # Errors
///
/// Returns `AnalysisError::ImageLoadError` if the bytes are not a supported
/// image or fail to decode
pub fn decode_image(bytes: &[u8]) -> Result<Mat> {
    let format = ImageFormat::sniff(bytes).ok_or_else(|| AnalysisError::ImageLoadError {
        message: "unrecognized image format".to_string(),
        source: None,
    })?;
    debug!(?format, size = bytes.len(), "decoding image");

    if format.requires_heif() {
        decode_heic(bytes)
    } else {
        decode_standard(bytes)
    }
}

/// Decode and, when requested, apply the EXIF orientation
///
/// Corrupt EXIF data is logged and ignored; the image is used as stored.
pub fn decode_upright(bytes: &[u8], exif_correction: bool) -> Result<Mat> {
    let mat = decode_image(bytes)?;
    if !exif_correction {
        return Ok(mat);
    }

    match ExifExtractor::orientation_from_bytes(bytes) {
        Ok(Orientation::Normal) => Ok(mat),
        Ok(orientation) => {
            debug!(?orientation, "applying EXIF orientation");
            apply_orientation(&mat, orientation)
        }
        Err(err) => {
            warn!(error = %err, "ignoring unreadable EXIF orientation");
            Ok(mat)
        }
    }
}

/// Load an image from disk and convert to an upright BGR Mat
///
/// # Example
///
/// ```rust,no_run
/// use skintone_match::image_loader::load_image;
/// use std::path::Path;
///
/// let mat = load_image(Path::new("selfie.jpg"))?;
/// # Ok::<(), skintone_match::AnalysisError>(())
/// ```
pub fn load_image(path: &Path) -> Result<Mat> {
    let bytes = std::fs::read(path).map_err(|e| {
        AnalysisError::image_load(format!("Failed to open image file: {}", path.display()), e)
    })?;
    decode_upright(&bytes, true)
}

/// Decode using the `image` crate (standard formats)
fn decode_standard(bytes: &[u8]) -> Result<Mat> {
    let img = image::load_from_memory(bytes)
        .map_err(|e| AnalysisError::image_load("Failed to decode image", e))?;

    let rgb_img = img.to_rgb8();
    let (width, height) = rgb_img.dimensions();
    rgb_to_bgr_mat(rgb_img.as_raw(), width as i32, height as i32)
}

/// Decode HEIC/HEIF using libheif
#[cfg(feature = "heic")]
fn decode_heic(bytes: &[u8]) -> Result<Mat> {
    use libheif_rs::{ColorSpace, HeifContext, LibHeif, RgbChroma};

    let lib_heif = LibHeif::new();
    let ctx = HeifContext::read_from_bytes(bytes)
        .map_err(|e| AnalysisError::image_load("Failed to read HEIC container", e))?;
    let handle = ctx
        .primary_image_handle()
        .map_err(|e| AnalysisError::image_load("Failed to get primary image handle", e))?;
    let image = lib_heif
        .decode(&handle, ColorSpace::Rgb(RgbChroma::Rgb), None)
        .map_err(|e| AnalysisError::image_load("Failed to decode HEIC image", e))?;

    let planes = image.planes();
    let plane = planes.interleaved.ok_or_else(|| AnalysisError::ImageLoadError {
        message: "HEIC image has no interleaved RGB data".to_string(),
        source: None,
    })?;

    let width = handle.width() as i32;
    let height = handle.height() as i32;
    let row_bytes = width as usize * 3;

    // Rows may carry stride padding
    let mut rgb = Vec::with_capacity(row_bytes * height as usize);
    for row in plane.data.chunks(plane.stride).take(height as usize) {
        rgb.extend_from_slice(&row[..row_bytes]);
    }
    rgb_to_bgr_mat(&rgb, width, height)
}

#[cfg(not(feature = "heic"))]
fn decode_heic(_bytes: &[u8]) -> Result<Mat> {
    Err(AnalysisError::ImageLoadError {
        message: "HEIC support is disabled (enable the `heic` feature)".to_string(),
        source: None,
    })
}

/// Convert a packed RGB buffer to an OpenCV BGR Mat
pub fn rgb_to_bgr_mat(rgb_data: &[u8], width: i32, height: i32) -> Result<Mat> {
    let expected = width.max(0) as usize * height.max(0) as usize * 3;
    if width <= 0 || height <= 0 || rgb_data.len() < expected {
        return Err(AnalysisError::ImageLoadError {
            message: format!(
                "pixel buffer of {} bytes does not hold a {}x{} RGB image",
                rgb_data.len(),
                width,
                height
            ),
            source: None,
        });
    }

    let mut mat = Mat::new_rows_cols_with_default(height, width, CV_8UC3, Scalar::all(0.0))
        .map_err(|e| AnalysisError::opencv("allocate image", e))?;
    let pixels = mat
        .data_typed_mut::<Vec3b>()
        .map_err(|e| AnalysisError::opencv("access image buffer", e))?;

    for (pixel, rgb) in pixels.iter_mut().zip(rgb_data.chunks_exact(3)) {
        pixel[0] = rgb[2];
        pixel[1] = rgb[1];
        pixel[2] = rgb[0];
    }
    Ok(mat)
}

/// Turn a stored image upright according to its EXIF orientation
pub fn apply_orientation(mat: &Mat, orientation: Orientation) -> Result<Mat> {
    let rotated = |code: i32| -> Result<Mat> {
        let mut out = Mat::default();
        rotate(mat, &mut out, code).map_err(|e| AnalysisError::opencv("rotate image", e))?;
        Ok(out)
    };
    let flipped = |src: &Mat, code: i32| -> Result<Mat> {
        let mut out = Mat::default();
        flip(src, &mut out, code).map_err(|e| AnalysisError::opencv("flip image", e))?;
        Ok(out)
    };

    match orientation {
        Orientation::Normal => mat
            .try_clone()
            .map_err(|e| AnalysisError::opencv("copy image", e)),
        Orientation::FlipHorizontal => flipped(mat, 1),
        Orientation::Rotate180 => rotated(ROTATE_180),
        Orientation::FlipVertical => flipped(mat, 0),
        Orientation::Transpose => {
            let mut out = Mat::default();
            transpose(mat, &mut out).map_err(|e| AnalysisError::opencv("transpose image", e))?;
            Ok(out)
        }
        Orientation::Rotate90 => rotated(ROTATE_90_CLOCKWISE),
        Orientation::Transverse => flipped(&rotated(ROTATE_90_CLOCKWISE)?, 0),
        Orientation::Rotate270 => rotated(ROTATE_90_COUNTERCLOCKWISE),
    }
}

/// Get list of all supported file extensions
pub fn supported_extensions() -> &'static [&'static str] {
    &["jpg", "jpeg", "png", "gif", "webp", "tiff", "tif", "bmp", "heic", "heif"]
}

/// Check if a file extension is supported
pub fn is_supported_extension(ext: &str) -> bool {
    let ext_lower = ext.to_lowercase();
    supported_extensions().contains(&ext_lower.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn pixel(mat: &Mat, row: i32, col: i32) -> [u8; 3] {
        let p = mat.at_2d::<Vec3b>(row, col).unwrap();
        [p[0], p[1], p[2]]
    }

    /// 2 rows x 3 cols, each pixel's blue channel is its index
    fn indexed_mat() -> Mat {
        let rgb: Vec<u8> = (0..6u8).flat_map(|i| [0, 0, i]).collect();
        rgb_to_bgr_mat(&rgb, 3, 2).unwrap()
    }

    #[test]
    fn test_format_detection() {
        assert_eq!(ImageFormat::from_extension(Path::new("selfie.JPG")), Some(ImageFormat::Jpeg));
        assert_eq!(ImageFormat::from_extension(Path::new("selfie.heif")), Some(ImageFormat::Heic));
        assert_eq!(ImageFormat::from_extension(Path::new("selfie.xyz")), None);
        assert!(ImageFormat::Heic.requires_heif());
        assert!(!ImageFormat::Png.requires_heif());
    }

    #[test]
    fn test_sniff_heif_brand() {
        let mut header = vec![0, 0, 0, 24];
        header.extend_from_slice(b"ftypheic");
        header.extend_from_slice(&[0; 12]);
        assert_eq!(ImageFormat::sniff(&header), Some(ImageFormat::Heic));
        assert_eq!(ImageFormat::sniff(b"definitely not an image"), None);
    }

    #[test]
    fn test_supported_extensions() {
        assert!(is_supported_extension("PNG"));
        assert!(is_supported_extension("heic"));
        assert!(!is_supported_extension("doc"));
    }

    #[test]
    fn test_rgb_to_bgr_conversion() {
        let rgb_data = vec![
            255, 0, 0, // Red
            0, 255, 0, // Green
            0, 0, 255, // Blue
            255, 255, 255, // White
        ];
        let mat = rgb_to_bgr_mat(&rgb_data, 2, 2).unwrap();
        assert_eq!(pixel(&mat, 0, 0), [0, 0, 255]);
        assert_eq!(pixel(&mat, 0, 1), [0, 255, 0]);
        assert_eq!(pixel(&mat, 1, 0), [255, 0, 0]);
        assert_eq!(pixel(&mat, 1, 1), [255, 255, 255]);
    }

    #[test]
    fn test_rgb_buffer_too_small() {
        assert!(rgb_to_bgr_mat(&[0; 5], 2, 1).is_err());
        assert!(rgb_to_bgr_mat(&[], 0, 0).is_err());
    }

    #[test]
    fn test_decode_png_roundtrip() {
        let mut img = image::RgbImage::new(4, 2);
        img.put_pixel(3, 1, image::Rgb([215, 189, 150]));
        let mut encoded = Vec::new();
        img.write_to(&mut Cursor::new(&mut encoded), image::ImageFormat::Png)
            .unwrap();

        let mat = decode_upright(&encoded, true).unwrap();
        assert_eq!((mat.cols(), mat.rows()), (4, 2));
        assert_eq!(pixel(&mat, 1, 3), [150, 189, 215]);
    }

    #[test]
    fn test_decode_garbage() {
        let result = decode_image(b"not an image at all");
        assert!(matches!(result, Err(AnalysisError::ImageLoadError { .. })));
    }

    #[test]
    fn test_orientation_rotate90() {
        // stored 2x3; upright is 3 rows x 2 cols with the bottom-left first
        let upright = apply_orientation(&indexed_mat(), Orientation::Rotate90).unwrap();
        assert_eq!((upright.rows(), upright.cols()), (3, 2));
        assert_eq!(pixel(&upright, 0, 0)[0], 3);
        assert_eq!(pixel(&upright, 0, 1)[0], 0);
    }

    #[test]
    fn test_orientation_flips() {
        let mirrored = apply_orientation(&indexed_mat(), Orientation::FlipHorizontal).unwrap();
        assert_eq!(pixel(&mirrored, 0, 0)[0], 2);

        let flipped = apply_orientation(&indexed_mat(), Orientation::FlipVertical).unwrap();
        assert_eq!(pixel(&flipped, 0, 0)[0], 3);

        let turned = apply_orientation(&indexed_mat(), Orientation::Rotate180).unwrap();
        assert_eq!(pixel(&turned, 0, 0)[0], 5);
    }

    #[test]
    fn test_orientation_diagonals() {
        let transposed = apply_orientation(&indexed_mat(), Orientation::Transpose).unwrap();
        assert_eq!((transposed.rows(), transposed.cols()), (3, 2));
        assert_eq!(pixel(&transposed, 0, 1)[0], 3);
        assert_eq!(pixel(&transposed, 2, 0)[0], 2);

        // anti-diagonal mirror puts the last pixel first
        let transverse = apply_orientation(&indexed_mat(), Orientation::Transverse).unwrap();
        assert_eq!((transverse.rows(), transverse.cols()), (3, 2));
        assert_eq!(pixel(&transverse, 0, 0)[0], 5);
        assert_eq!(pixel(&transverse, 2, 1)[0], 0);
    }
}
