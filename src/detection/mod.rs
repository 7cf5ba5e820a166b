//! Face and skin region detection module
//!
//! This module handles the computer vision side of the pipeline: finding a
//! face in the photograph and sampling a representative skin color from
//! its cheek area.

pub mod face;
pub mod skin;

pub use face::{find_face, select_largest, FaceDetector, FaceRegion, HaarCascadeDetector};
pub use skin::{locate_skin_color, SkinRegionLocator, SkinSample};
