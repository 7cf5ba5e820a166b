//! Color arithmetic module
//!
//! Hex parsing and formatting, HSL conversion and RGB distance used by
//! the classifiers and the catalog matcher.

pub mod conversion;

pub use conversion::{
    closeness, distance, hex_to_rgb, match_score, rgb_to_hex, rgb_to_hsl, round1, Hsl8, Rgb,
};
