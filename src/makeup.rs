//! Makeup try-on prompts
//!
//! Builds the instruction text sent to an external image generator and
//! validates user-written prompts. The generator itself is supplied by the
//! host application through [`ImageGenerator`].

use crate::catalog::ScoredEntry;
use crate::classification::ToneClassification;
use crate::constants::recommendations::{MIN_PROMPT_CHARS, PROMPT_PREVIEW_CHARS};
use crate::{AnalysisError, Result};

/// Generative image service that applies makeup to a photo
pub trait ImageGenerator: Send + Sync {
    /// Returns the edited image as base64, or `None` when the service
    /// answered without an image
    fn generate(&self, image: &[u8], prompt: &str) -> Result<Option<String>>;
}

/// Color families chosen by skin depth
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MakeupPalette {
    pub blush: &'static str,
    pub eyeshadow: &'static str,
    pub lipstick: &'static str,
}

impl MakeupPalette {
    /// Palette for a scale rank: 1-3, 4-6, then 7-10
    pub fn for_rank(rank: u8) -> Self {
        match rank {
            0..=3 => Self {
                blush: "rosa pessego suave",
                eyeshadow: "neutros claros (bege, champagne)",
                lipstick: "nude rosado ou coral claro",
            },
            4..=6 => Self {
                blush: "coral ou terracota",
                eyeshadow: "bronze, cobre, marrom",
                lipstick: "nude caramelo ou coral",
            },
            _ => Self {
                blush: "ameixa ou berry",
                eyeshadow: "bronze, cobre, dourado intenso",
                lipstick: "vinho ou nude escuro",
            },
        }
    }
}

/// Build the try-on prompt for a classified sample
///
/// The foundation shade is the best matching base product when one exists,
/// otherwise the reference color of the assigned tone.
pub fn build_makeup_prompt(tone: &ToneClassification, best_base: Option<&ScoredEntry>) -> String {
    let palette = MakeupPalette::for_rank(tone.tone.rank);
    let base_hex = best_base
        .and_then(|base| base.entry.hex_code.as_deref())
        .unwrap_or(tone.tone.hex);

    format!(
        "Aplique maquiagem profissional nesta foto mantendo EXATAMENTE o rosto, expressao e todas as caracteristicas faciais originais da pessoa. NAO altere o formato do rosto, olhos, nariz, boca ou qualquer outra caracteristica.

MAQUIAGEM A APLICAR:

PELE:
- Base uniforme tom {base_hex}, cobertura media, acabamento natural
- Corretivo nas olheiras (1-2 tons mais claro)
- Po translucido na zona T

CONTORNO E ILUMINACAO:
- Contorno suave nas temporas, laterais do nariz e maxilar
- Blush {blush} nas macas do rosto
- Iluminador no osso da bochecha, ponta do nariz e arco do cupido

OLHOS:
- Sombras em tons {eyeshadow}
- Delineado fino e elegante
- Mascara de cilios com volume natural

SOBRANCELHAS:
- Preenchidas naturalmente, penteadas

LABIOS:
- Batom {lipstick}, acabamento cremoso

ESTILO: Maquiagem profissional brasileira, pele luminosa e saudavel, acabamento glow natural. A maquiagem deve parecer feita por uma maquiadora profissional.

CRITICO: Mantenha 100% da identidade facial da pessoa - apenas adicione a maquiagem de forma hiper-realista.",
        blush = palette.blush,
        eyeshadow = palette.eyeshadow,
        lipstick = palette.lipstick,
    )
}

/// Reject prompts too short to describe a look
///
/// # Errors
///
/// Returns `AnalysisError::InvalidParameter` for prompts under 10 characters
pub fn validate_custom_prompt(prompt: &str) -> Result<()> {
    let chars = prompt.chars().count();
    if chars < MIN_PROMPT_CHARS {
        return Err(AnalysisError::InvalidParameter {
            parameter: "prompt".into(),
            value: format!("{} characters (minimum {})", chars, MIN_PROMPT_CHARS),
        });
    }
    Ok(())
}

/// Shortened prompt for echoing back to the caller
pub fn prompt_preview(prompt: &str) -> String {
    match prompt.char_indices().nth(PROMPT_PREVIEW_CHARS) {
        Some((cut, _)) => format!("{}...", &prompt[..cut]),
        None => prompt.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogEntry;
    use crate::classification::classify_tone;
    use crate::color::Rgb;

    #[test]
    fn test_palette_by_rank() {
        assert_eq!(MakeupPalette::for_rank(1).blush, "rosa pessego suave");
        assert_eq!(MakeupPalette::for_rank(3).blush, "rosa pessego suave");
        assert_eq!(MakeupPalette::for_rank(4).lipstick, "nude caramelo ou coral");
        assert_eq!(MakeupPalette::for_rank(6).eyeshadow, "bronze, cobre, marrom");
        assert_eq!(MakeupPalette::for_rank(7).blush, "ameixa ou berry");
        assert_eq!(MakeupPalette::for_rank(10).lipstick, "vinho ou nude escuro");
    }

    #[test]
    fn test_prompt_uses_best_base() {
        let tone = classify_tone(Rgb::new(215, 189, 150));
        let base = ScoredEntry {
            entry: CatalogEntry::new("#c8a882", "base"),
            match_score: 93.0,
        };
        let prompt = build_makeup_prompt(&tone, Some(&base));
        assert!(prompt.contains("Base uniforme tom #c8a882"));
        assert!(prompt.contains(MakeupPalette::for_rank(tone.tone.rank).blush));
    }

    #[test]
    fn test_prompt_falls_back_to_reference() {
        let tone = classify_tone(Rgb::new(41, 36, 32));
        let prompt = build_makeup_prompt(&tone, None);
        assert!(prompt.contains(&format!(
            "- Base uniforme tom {}, cobertura media, acabamento natural\n",
            tone.tone.hex
        )));
        assert!(prompt.contains("Batom vinho ou nude escuro"));
        assert!(!prompt.contains("subtom"));
    }

    #[test]
    fn test_validate_custom_prompt() {
        assert!(validate_custom_prompt("").is_err());
        assert!(validate_custom_prompt("batom red").is_err());
        assert!(validate_custom_prompt("batom rosa").is_ok());
        // counted in characters, not bytes
        assert!(validate_custom_prompt("maquiagém").is_err());
    }

    #[test]
    fn test_prompt_preview() {
        let short = "olhos esfumados";
        assert_eq!(prompt_preview(short), short);

        let exact = "a".repeat(200);
        assert_eq!(prompt_preview(&exact), exact);

        let long = "é".repeat(250);
        let preview = prompt_preview(&long);
        assert!(preview.ends_with("..."));
        assert_eq!(preview.chars().count(), 203);
    }
}
