//! Depth and saturation descriptors for a sampled skin color

use serde::{Deserialize, Serialize};

use crate::color::{rgb_to_hsl, Rgb};
use crate::constants::descriptor as thresholds;

/// Six ordered depth buckets derived from HSL lightness
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DepthBucket {
    #[serde(rename = "very light")]
    VeryLight,
    #[serde(rename = "light")]
    Light,
    #[serde(rename = "medium")]
    Medium,
    #[serde(rename = "medium-dark")]
    MediumDark,
    #[serde(rename = "dark")]
    Dark,
    #[serde(rename = "very dark")]
    VeryDark,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SaturationBucket {
    Low,
    Medium,
    High,
}

impl DepthBucket {
    pub fn from_lightness(lightness: u8) -> Self {
        match lightness {
            l if l >= thresholds::VERY_LIGHT => DepthBucket::VeryLight,
            l if l >= thresholds::LIGHT => DepthBucket::Light,
            l if l >= thresholds::MEDIUM => DepthBucket::Medium,
            l if l >= thresholds::MEDIUM_DARK => DepthBucket::MediumDark,
            l if l >= thresholds::DARK => DepthBucket::Dark,
            _ => DepthBucket::VeryDark,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DepthBucket::VeryLight => "very light",
            DepthBucket::Light => "light",
            DepthBucket::Medium => "medium",
            DepthBucket::MediumDark => "medium-dark",
            DepthBucket::Dark => "dark",
            DepthBucket::VeryDark => "very dark",
        }
    }
}

impl SaturationBucket {
    pub fn from_saturation(saturation: u8) -> Self {
        if saturation >= thresholds::HIGH_SATURATION {
            SaturationBucket::High
        } else if saturation >= thresholds::MEDIUM_SATURATION {
            SaturationBucket::Medium
        } else {
            SaturationBucket::Low
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SaturationBucket::Low => "low",
            SaturationBucket::Medium => "medium",
            SaturationBucket::High => "high",
        }
    }
}

/// Human-readable summary of a sample's HSL position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkinDescriptor {
    pub lightness: u8,
    pub saturation: u8,
    pub hue: u16,
    pub depth: DepthBucket,
    pub saturation_level: SaturationBucket,
}

pub fn describe_skin(sample: Rgb) -> SkinDescriptor {
    let hsl = rgb_to_hsl(sample);
    SkinDescriptor {
        lightness: hsl.l,
        saturation: hsl.s,
        hue: hsl.h,
        depth: DepthBucket::from_lightness(hsl.l),
        saturation_level: SaturationBucket::from_saturation(hsl.s),
    }
}
