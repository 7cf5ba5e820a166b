//! EXIF metadata module
//!
//! Reads the orientation tag so sideways phone photos can be turned upright
//! before face detection.

pub mod extractor;

pub use extractor::{ExifExtractor, Orientation};
