//! Monk skin tone scale and nearest-reference classification
//!
//! The scale is a fixed, ordered table of ten reference colors, lightest
//! (rank 1) to darkest (rank 10). A sample is assigned to the reference at
//! the smallest RGB distance; ties keep the lower rank.

use serde::Serialize;

use crate::color::{closeness, distance, round1, Rgb};

/// One entry of the reference scale
#[derive(Debug, PartialEq, Serialize)]
pub struct ReferenceTone {
    /// Stable identifier, `MST01`..`MST10`
    pub code: &'static str,
    /// 1 (lightest) to 10 (darkest)
    pub rank: u8,
    pub name: &'static str,
    pub hex: &'static str,
    pub rgb: Rgb,
    pub fitzpatrick: &'static str,
    pub description: &'static str,
    /// Undertones commonly seen at this depth
    pub undertones: &'static [&'static str],
    /// Styling tips, most important first
    pub tips: &'static [&'static str],
}

/// Scale metadata exposed alongside the table for discovery endpoints
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ReferenceScale {
    pub name: &'static str,
    pub source: &'static str,
    pub version: &'static str,
    pub tones: &'static [ReferenceTone],
}

/// Result of classifying a sample against the scale
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ToneClassification {
    #[serde(flatten)]
    pub tone: &'static ReferenceTone,
    /// RGB distance to the selected reference
    pub distance: f64,
    /// 0-100, one decimal; 100 only for an exact reference match
    pub confidence: f64,
}

pub static MONK_SCALE: [ReferenceTone; 10] = [
    ReferenceTone {
        code: "MST01",
        rank: 1,
        name: "Tom 1 - Muito Claro",
        hex: "#f6ede4",
        rgb: Rgb::new(246, 237, 228),
        fitzpatrick: "I",
        description: "Pele muito clara. Queima facilmente ao sol.",
        undertones: &["frio", "neutro"],
        tips: &[
            "Use bases com subtom rosado ou neutro",
            "Protetor solar e essencial",
            "Blush em tons rosados ou pessego suave",
        ],
    },
    ReferenceTone {
        code: "MST02",
        rank: 2,
        name: "Tom 2 - Claro",
        hex: "#f3e7db",
        rgb: Rgb::new(243, 231, 219),
        fitzpatrick: "I-II",
        description: "Pele clara com leve tonalidade. Queima com facilidade.",
        undertones: &["frio", "neutro", "quente"],
        tips: &[
            "Bases com subtom amarelo suave ou rosado",
            "Iluminadores champagne funcionam bem",
            "Bronzer leve para dar vida",
        ],
    },
    ReferenceTone {
        code: "MST03",
        rank: 3,
        name: "Tom 3 - Claro Medio",
        hex: "#f7ead0",
        rgb: Rgb::new(247, 234, 208),
        fitzpatrick: "II",
        description: "Pele clara com fundo dourado. Bronzeia levemente.",
        undertones: &["quente", "neutro"],
        tips: &[
            "Bases com subtom dourado ou pessego",
            "Contorno em tons de caramelo",
            "Blush coral ou pessego",
        ],
    },
    ReferenceTone {
        code: "MST04",
        rank: 4,
        name: "Tom 4 - Medio Claro",
        hex: "#eadaba",
        rgb: Rgb::new(234, 218, 186),
        fitzpatrick: "II-III",
        description: "Pele media clara, comum em latinas. Bronzeia gradualmente.",
        undertones: &["quente", "neutro", "oliva"],
        tips: &[
            "Bases com subtom amarelo ou oliva",
            "Evite bases muito rosadas",
            "Iluminadores dourados",
        ],
    },
    ReferenceTone {
        code: "MST05",
        rank: 5,
        name: "Tom 5 - Medio",
        hex: "#d7bd96",
        rgb: Rgb::new(215, 189, 150),
        fitzpatrick: "III",
        description: "Pele media, muito comum em brasileiros.",
        undertones: &["quente", "neutro", "oliva"],
        tips: &[
            "Ampla gama de subtons funciona",
            "Contorno em tons de chocolate ao leite",
            "Blush em tons terrosos ou coral",
        ],
    },
    ReferenceTone {
        code: "MST06",
        rank: 6,
        name: "Tom 6 - Medio Escuro",
        hex: "#a07e56",
        rgb: Rgb::new(160, 126, 86),
        fitzpatrick: "III-IV",
        description: "Pele media escura com fundo dourado.",
        undertones: &["quente", "neutro"],
        tips: &[
            "Bases com subtom dourado ou caramelo",
            "Iluminadores bronze ou cobre",
            "Blush em tons de ameixa ou terracota",
        ],
    },
    ReferenceTone {
        code: "MST07",
        rank: 7,
        name: "Tom 7 - Escuro Claro",
        hex: "#825c43",
        rgb: Rgb::new(130, 92, 67),
        fitzpatrick: "IV-V",
        description: "Pele escura clara.",
        undertones: &["quente", "neutro", "vermelho"],
        tips: &[
            "Bases com subtom vermelho ou dourado",
            "Evite bases acinzentadas",
            "Iluminadores dourados ou bronze",
        ],
    },
    ReferenceTone {
        code: "MST08",
        rank: 8,
        name: "Tom 8 - Escuro",
        hex: "#604134",
        rgb: Rgb::new(96, 65, 52),
        fitzpatrick: "V",
        description: "Pele escura com tons ricos.",
        undertones: &["quente", "vermelho", "neutro"],
        tips: &[
            "Bases com subtom vermelho ou mogno",
            "Contorno em tons de chocolate amargo",
            "Iluminadores dourados intensos",
        ],
    },
    ReferenceTone {
        code: "MST09",
        rank: 9,
        name: "Tom 9 - Muito Escuro",
        hex: "#3a312a",
        rgb: Rgb::new(58, 49, 42),
        fitzpatrick: "V-VI",
        description: "Pele muito escura com reflexos.",
        undertones: &["vermelho", "neutro", "azul"],
        tips: &[
            "Bases com subtom vermelho ou neutro",
            "Evite bases com fundo cinza",
            "Iluminadores dourados ou rose gold",
        ],
    },
    ReferenceTone {
        code: "MST10",
        rank: 10,
        name: "Tom 10 - Escuro Profundo",
        hex: "#2d2926",
        rgb: Rgb::new(45, 41, 38),
        fitzpatrick: "VI",
        description: "Pele escura profunda, rica em melanina.",
        undertones: &["vermelho", "neutro"],
        tips: &[
            "Bases com bastante pigmento vermelho",
            "Iluminadores cobre ou bronze",
            "Blush em tons de vinho ou berry",
        ],
    },
];

/// All reference tones in rank order
pub fn reference_tones() -> &'static [ReferenceTone] {
    &MONK_SCALE
}

/// The scale with its provenance
pub fn reference_scale() -> ReferenceScale {
    ReferenceScale {
        name: "Monk Skin Tone Scale",
        source: "Google / Dr. Ellis Monk",
        version: "1",
        tones: &MONK_SCALE,
    }
}

/// Look up a reference tone by rank (1-10)
pub fn tone_by_rank(rank: u8) -> Option<&'static ReferenceTone> {
    MONK_SCALE.iter().find(|tone| tone.rank == rank)
}

/// Classify a sampled color against the reference scale
pub fn classify_tone(sample: Rgb) -> ToneClassification {
    let mut best = &MONK_SCALE[0];
    let mut best_distance = distance(sample, best.rgb);

    for tone in &MONK_SCALE[1..] {
        let d = distance(sample, tone.rgb);
        // Strict comparison keeps the lower rank on ties
        if d < best_distance {
            best = tone;
            best_distance = d;
        }
    }

    ToneClassification {
        tone: best,
        distance: best_distance,
        confidence: round1(closeness(best_distance)),
    }
}
