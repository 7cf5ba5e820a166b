//! Undertone inference from a sampled skin color
//!
//! A short rule cascade over the red/blue channel gap decides warm, cool or
//! neutral; a final override turns warm or neutral samples with a balanced
//! green channel and low saturation into olive.

use serde::{Deserialize, Serialize};

use crate::color::{rgb_to_hsl, Rgb};
use crate::constants::undertone::{CHANNEL_GAP, OLIVE_GREEN_BAND, OLIVE_MAX_SATURATION};

/// Undertone category, exactly one per sample
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Undertone {
    Warm,
    Cool,
    Neutral,
    Olive,
}

impl Undertone {
    /// Internal code as stored in the product catalog's `subtom` column
    pub fn code(&self) -> &'static str {
        match self {
            Undertone::Warm => "quente",
            Undertone::Cool => "frio",
            Undertone::Neutral => "neutro",
            Undertone::Olive => "oliva",
        }
    }

    pub fn english(&self) -> &'static str {
        match self {
            Undertone::Warm => "warm",
            Undertone::Cool => "cool",
            Undertone::Neutral => "neutral",
            Undertone::Olive => "olive",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Undertone::Warm => "Tons dourados, amarelados ou pessego. Veias esverdeadas no pulso.",
            Undertone::Cool => "Tons rosados ou azulados. Veias azuladas ou roxas no pulso.",
            Undertone::Neutral => "Equilibrio entre tons quentes e frios.",
            Undertone::Olive => "Tom esverdeado sob a pele. Comum em brasileiros.",
        }
    }

    /// Color families that flatter this undertone
    pub fn recommended_colors(&self) -> &'static [&'static str] {
        match self {
            Undertone::Warm => &["dourado", "caramelo", "pessego", "coral", "bronze"],
            Undertone::Cool => &["rosa", "vinho", "ameixa", "prata", "berry"],
            Undertone::Neutral => &["nude", "rose", "terracota suave", "champagne"],
            Undertone::Olive => &["terracota", "mostarda", "verde oliva", "bronze", "cobre"],
        }
    }

    /// Parse either the internal code or the English name
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "quente" | "warm" => Some(Undertone::Warm),
            "frio" | "cool" => Some(Undertone::Cool),
            "neutro" | "neutral" => Some(Undertone::Neutral),
            "oliva" | "olive" => Some(Undertone::Olive),
            _ => None,
        }
    }
}

/// Undertone with its display metadata
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UndertoneResult {
    pub undertone: Undertone,
    pub code: &'static str,
    pub label: &'static str,
    pub description: &'static str,
    pub recommended_colors: &'static [&'static str],
}

impl From<Undertone> for UndertoneResult {
    fn from(undertone: Undertone) -> Self {
        Self {
            undertone,
            code: undertone.code(),
            label: undertone.english(),
            description: undertone.description(),
            recommended_colors: undertone.recommended_colors(),
        }
    }
}

/// Classify the undertone of a sampled color
pub fn classify_undertone(sample: Rgb) -> UndertoneResult {
    let r = sample.r as i32;
    let g = sample.g as f64;
    let b = sample.b as i32;

    let base = if r - b > CHANNEL_GAP {
        Undertone::Warm
    } else if b - r > CHANNEL_GAP {
        Undertone::Cool
    } else {
        Undertone::Neutral
    };

    let avg = (r + b) as f64 / 2.0;
    let green_balanced = g > avg * (1.0 - OLIVE_GREEN_BAND) && g < avg * (1.0 + OLIVE_GREEN_BAND);
    let muted = rgb_to_hsl(sample).s < OLIVE_MAX_SATURATION;

    let undertone = match base {
        Undertone::Warm | Undertone::Neutral if green_balanced && muted => Undertone::Olive,
        other => other,
    };

    undertone.into()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(r: u8, g: u8, b: u8) -> Undertone {
        classify_undertone(Rgb::new(r, g, b)).undertone
    }

    #[test]
    fn test_warm() {
        // green inside the band but saturation 58
        assert_eq!(classify(220, 160, 120), Undertone::Warm);
        // green outside the band
        assert_eq!(classify(200, 120, 100), Undertone::Warm);
    }

    #[test]
    fn test_cool() {
        assert_eq!(classify(150, 140, 200), Undertone::Cool);
    }

    #[test]
    fn test_cool_never_becomes_olive() {
        // balanced green, saturation 16, but base is cool
        assert_eq!(classify(150, 170, 180), Undertone::Cool);
    }

    #[test]
    fn test_neutral() {
        assert_eq!(classify(150, 100, 140), Undertone::Neutral);
    }

    #[test]
    fn test_gap_of_exactly_15_is_neutral() {
        assert_eq!(classify(165, 100, 150), Undertone::Neutral);
        assert_eq!(classify(150, 100, 165), Undertone::Neutral);
    }

    #[test]
    fn test_olive_from_neutral() {
        assert_eq!(classify(150, 150, 145), Undertone::Olive);
    }

    #[test]
    fn test_olive_from_warm() {
        // r - b = 80 but green balanced and saturation 42
        assert_eq!(classify(200, 150, 120), Undertone::Olive);
    }

    #[test]
    fn test_olive_saturation_just_below_50() {
        // raw saturation 0.49999999999999994 truncates to 49
        assert_eq!(rgb_to_hsl(Rgb::new(198, 130, 84)).s, 49);
        assert_eq!(classify(198, 130, 84), Undertone::Olive);
    }

    #[test]
    fn test_lightest_reference_stays_warm() {
        // raw saturation 0.5000000000000004 truncates to 50, not muted
        assert_eq!(rgb_to_hsl(Rgb::new(246, 237, 228)).s, 50);
        assert_eq!(classify(246, 237, 228), Undertone::Warm);
    }

    #[test]
    fn test_olive_needs_balanced_green() {
        // muted, but green well below avg(r, b) * 0.9
        assert_eq!(classify(120, 90, 115), Undertone::Neutral);
    }

    #[test]
    fn test_total_and_deterministic() {
        for r in (0..=255u8).step_by(17) {
            for g in (0..=255u8).step_by(17) {
                for b in (0..=255u8).step_by(17) {
                    let first = classify_undertone(Rgb::new(r, g, b));
                    let second = classify_undertone(Rgb::new(r, g, b));
                    assert_eq!(first, second);
                }
            }
        }
    }

    #[test]
    fn test_metadata() {
        let result = classify_undertone(Rgb::new(200, 120, 100));
        assert_eq!(result.code, "quente");
        assert_eq!(result.label, "warm");
        assert_eq!(result.recommended_colors.len(), 5);
        assert_eq!(Undertone::from_label("Oliva"), Some(Undertone::Olive));
        assert_eq!(Undertone::from_label("vermelho"), None);
    }
}
