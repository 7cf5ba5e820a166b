//! Ranking catalog products by color proximity to a skin sample
//!
//! Score = max(0, 100 - distance / 4.41), rounded to one decimal, so it
//! spans 0-100 linearly over the full RGB distance range. Rows whose color
//! is missing or malformed are left out rather than failing the ranking.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::catalog::entry::{CatalogEntry, ProductCategory};
use crate::color::{distance, hex_to_rgb, match_score, round1, Rgb};
use crate::{AnalysisError, Result};

/// Catalog row with its match score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredEntry {
    #[serde(flatten)]
    pub entry: CatalogEntry,
    pub match_score: f64,
}

/// Top matches per recommendation group
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategorizedMatches {
    #[serde(rename = "bases")]
    pub foundations: Vec<ScoredEntry>,
    #[serde(rename = "corretivos")]
    pub concealers: Vec<ScoredEntry>,
    #[serde(rename = "pos")]
    pub powders: Vec<ScoredEntry>,
    #[serde(rename = "contornos")]
    pub contours: Vec<ScoredEntry>,
    #[serde(rename = "iluminadores")]
    pub highlighters: Vec<ScoredEntry>,
}

impl CategorizedMatches {
    pub fn get(&self, category: ProductCategory) -> &[ScoredEntry] {
        match category {
            ProductCategory::Base => &self.foundations,
            ProductCategory::Concealer => &self.concealers,
            ProductCategory::Powder => &self.powders,
            ProductCategory::Contour => &self.contours,
            ProductCategory::Highlighter => &self.highlighters,
        }
    }

    fn get_mut(&mut self, category: ProductCategory) -> &mut Vec<ScoredEntry> {
        match category {
            ProductCategory::Base => &mut self.foundations,
            ProductCategory::Concealer => &mut self.concealers,
            ProductCategory::Powder => &mut self.powders,
            ProductCategory::Contour => &mut self.contours,
            ProductCategory::Highlighter => &mut self.highlighters,
        }
    }

    /// Closest foundation, if any was scored
    pub fn best_base(&self) -> Option<&ScoredEntry> {
        self.foundations.first()
    }

    pub fn is_empty(&self) -> bool {
        ProductCategory::ALL.iter().all(|c| self.get(*c).is_empty())
    }
}

/// Score one row against the sample
///
/// # Errors
///
/// Returns `AnalysisError::InvalidColorFormat` when the row has no usable hex color
pub fn score_entry(sample: Rgb, entry: &CatalogEntry) -> Result<f64> {
    let hex = entry
        .hex_code
        .as_deref()
        .filter(|hex| !hex.trim().is_empty())
        .ok_or_else(|| AnalysisError::InvalidColorFormat {
            value: String::new(),
        })?;
    let color = hex_to_rgb(hex.trim())?;
    Ok(round1(match_score(distance(sample, color))))
}

/// Score every usable row, keeping input order
fn score_all<'a>(
    sample: Rgb,
    entries: impl IntoIterator<Item = &'a CatalogEntry>,
) -> Vec<ScoredEntry> {
    entries
        .into_iter()
        .filter(|entry| entry.is_active())
        .filter_map(|entry| match score_entry(sample, entry) {
            Ok(match_score) => Some(ScoredEntry {
                entry: entry.clone(),
                match_score,
            }),
            Err(err) => {
                debug!(id = ?entry.id, error = %err, "skipping catalog row without usable color");
                None
            }
        })
        .collect()
}

/// Stable descending sort by score, then keep at most `top_k`
fn rank(mut scored: Vec<ScoredEntry>, top_k: usize) -> Vec<ScoredEntry> {
    scored.sort_by(|a, b| b.match_score.total_cmp(&a.match_score));
    scored.truncate(top_k);
    scored
}

/// Rank catalog rows by closeness to the sample
///
/// Rows are treated as one group; ties keep catalog order. Returns at most
/// `top_k` rows.
pub fn match_catalog(sample: Rgb, entries: &[CatalogEntry], top_k: usize) -> Vec<ScoredEntry> {
    rank(score_all(sample, entries), top_k)
}

/// Rank rows within each product group, at most `top_k` per group
///
/// Rows whose `tipo` maps to no group are ignored.
pub fn match_by_category(sample: Rgb, entries: &[CatalogEntry], top_k: usize) -> CategorizedMatches {
    let mut grouped = CategorizedMatches::default();
    for scored in score_all(sample, entries) {
        if let Some(category) = scored.entry.category() {
            grouped.get_mut(category).push(scored);
        }
    }

    for category in ProductCategory::ALL {
        let group = std::mem::take(grouped.get_mut(category));
        *grouped.get_mut(category) = rank(group, top_k);
    }
    grouped
}
