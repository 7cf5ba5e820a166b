//! Color space conversion utilities
//!
//! Provides the color arithmetic shared by every classification stage:
//! - Hex <-> 8-bit RGB
//! - RGB to truncated integer HSL
//! - Euclidean RGB distance and its normalized forms

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::distance::{MAX_RGB_DISTANCE, SCORE_DIVISOR};
use crate::{AnalysisError, Result};

/// 8-bit RGB color, the sampled skin color and every reference color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// HSL triple truncated to integers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hsl8 {
    /// Hue in degrees, 0-360
    pub h: u16,
    /// Saturation percent, 0-100
    pub s: u8,
    /// Lightness percent, 0-100
    pub l: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Lowercase `#rrggbb`
    pub fn hex(&self) -> String {
        rgb_to_hex(*self)
    }

    pub fn hsl(&self) -> Hsl8 {
        rgb_to_hsl(*self)
    }

    pub fn distance_to(&self, other: &Rgb) -> f64 {
        distance(*self, *other)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb({}, {}, {})", self.r, self.g, self.b)
    }
}

impl From<(u8, u8, u8)> for Rgb {
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Self { r, g, b }
    }
}

/// Parse hexadecimal color string to RGB
///
/// Accepts exactly six hex digits with or without a leading `#`.
///
/// # Errors
///
/// Returns `AnalysisError::InvalidColorFormat` for any other input
pub fn hex_to_rgb(hex: &str) -> Result<Rgb> {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(AnalysisError::InvalidColorFormat {
            value: hex.to_string(),
        });
    }

    let channel = |range: std::ops::Range<usize>| {
        u8::from_str_radix(&digits[range], 16).map_err(|_| AnalysisError::InvalidColorFormat {
            value: hex.to_string(),
        })
    };

    Ok(Rgb {
        r: channel(0..2)?,
        g: channel(2..4)?,
        b: channel(4..6)?,
    })
}

/// Convert RGB to lowercase hexadecimal string (e.g. "#d7bd96")
pub fn rgb_to_hex(rgb: Rgb) -> String {
    format!("#{:02x}{:02x}{:02x}", rgb.r, rgb.g, rgb.b)
}

/// Convert RGB to HSL with every component truncated toward zero
///
/// Uses the max/min formulation on channels scaled by 1/255. The float
/// results sit exactly on integer boundaries for many skin colors, so the
/// operation order below is fixed: `(198, 130, 84)` must give s = 49.
pub fn rgb_to_hsl(rgb: Rgb) -> Hsl8 {
    let r = rgb.r as f64 / 255.0;
    let g = rgb.g as f64 / 255.0;
    let b = rgb.b as f64 / 255.0;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let sum = max + min;
    let range = max - min;
    let l = sum / 2.0;

    if max == min {
        return Hsl8 {
            h: 0,
            s: 0,
            l: (l * 100.0) as u8,
        };
    }

    let s = if l <= 0.5 {
        range / sum
    } else {
        range / (2.0 - max - min)
    };

    let rc = (max - r) / range;
    let gc = (max - g) / range;
    let bc = (max - b) / range;
    let h = if r == max {
        bc - gc
    } else if g == max {
        2.0 + rc - bc
    } else {
        4.0 + gc - rc
    };
    let h = (h / 6.0).rem_euclid(1.0);

    Hsl8 {
        h: (h * 360.0) as u16,
        s: (s * 100.0) as u8,
        l: (l * 100.0) as u8,
    }
}

/// Euclidean distance between two colors in RGB space, in [0, 441.67]
pub fn distance(a: Rgb, b: Rgb) -> f64 {
    let dr = a.r as f64 - b.r as f64;
    let dg = a.g as f64 - b.g as f64;
    let db = a.b as f64 - b.b as f64;
    (dr * dr + dg * dg + db * db).sqrt()
}

/// Map a distance to a 0-100 closeness value, clamped at 0
pub fn closeness(distance: f64) -> f64 {
    (100.0 - distance / MAX_RGB_DISTANCE * 100.0).max(0.0)
}

/// Catalog match score for a distance, clamped at 0
pub fn match_score(distance: f64) -> f64 {
    (100.0 - distance / SCORE_DIVISOR).max(0.0)
}

/// Round half away from zero to one decimal place
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
