//! Product catalog rows and the catalog source capability
//!
//! Rows are owned by an external product database. The analysis only reads
//! `hex_code`, `tipo` and `ativo`; every other column is carried through
//! unchanged so callers can render it.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{AnalysisError, Result};

/// Product identifier as stored upstream (integer or text key)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntryId {
    Number(i64),
    Text(String),
}

/// One product row, using the catalog's column names on the wire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    #[serde(default)]
    pub id: Option<EntryId>,
    #[serde(rename = "marca", default)]
    pub brand: Option<String>,
    #[serde(rename = "linha", default)]
    pub line: Option<String>,
    #[serde(rename = "cor_nome", default)]
    pub color_name: Option<String>,
    #[serde(default)]
    pub hex_code: Option<String>,
    #[serde(rename = "acabamento", default)]
    pub finish: Option<String>,
    #[serde(rename = "cobertura", default)]
    pub coverage: Option<String>,
    #[serde(rename = "subtom", default)]
    pub undertone: Option<String>,
    #[serde(rename = "preco", default)]
    pub price: Option<f64>,
    #[serde(rename = "onde_comprar", default)]
    pub purchase_link: Option<String>,
    /// A missing `tipo` column reads as `base`; an explicit null stays `None`
    #[serde(rename = "tipo", default = "default_product_type")]
    pub product_type: Option<String>,
    #[serde(rename = "ativo", default)]
    pub active: Option<bool>,
}

fn default_product_type() -> Option<String> {
    Some("base".to_string())
}

impl CatalogEntry {
    /// Minimal row with a color and type, everything else empty
    pub fn new(hex_code: impl Into<String>, product_type: impl Into<String>) -> Self {
        Self {
            id: None,
            brand: None,
            line: None,
            color_name: None,
            hex_code: Some(hex_code.into()),
            finish: None,
            coverage: None,
            undertone: None,
            price: None,
            purchase_link: None,
            product_type: Some(product_type.into()),
            active: Some(true),
        }
    }

    pub fn with_id(mut self, id: i64) -> Self {
        self.id = Some(EntryId::Number(id));
        self
    }

    /// Category this row is grouped under, if any
    pub fn category(&self) -> Option<ProductCategory> {
        self.product_type.as_deref().and_then(ProductCategory::from_type)
    }

    /// Inactive rows are those explicitly flagged `ativo = false`
    pub fn is_active(&self) -> bool {
        self.active != Some(false)
    }
}

/// Recommendation groups
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductCategory {
    Base,
    Concealer,
    Powder,
    Contour,
    Highlighter,
}

impl ProductCategory {
    pub const ALL: [ProductCategory; 5] = [
        ProductCategory::Base,
        ProductCategory::Concealer,
        ProductCategory::Powder,
        ProductCategory::Contour,
        ProductCategory::Highlighter,
    ];

    /// Map a catalog `tipo` value; unknown types have no group
    pub fn from_type(tipo: &str) -> Option<Self> {
        match tipo {
            "base" => Some(ProductCategory::Base),
            "corretivo" => Some(ProductCategory::Concealer),
            "po_compacto" | "po_solto" => Some(ProductCategory::Powder),
            "contorno" => Some(ProductCategory::Contour),
            "iluminador" => Some(ProductCategory::Highlighter),
            _ => None,
        }
    }

    /// Catalog `tipo` values belonging to this group
    pub fn type_codes(&self) -> &'static [&'static str] {
        match self {
            ProductCategory::Base => &["base"],
            ProductCategory::Concealer => &["corretivo"],
            ProductCategory::Powder => &["po_compacto", "po_solto"],
            ProductCategory::Contour => &["contorno"],
            ProductCategory::Highlighter => &["iluminador"],
        }
    }
}

/// Query passed to a catalog source
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogFilter {
    /// Exact `tipo` match; all types when absent
    pub product_type: Option<String>,
    /// Drop rows flagged inactive
    pub active_only: bool,
}

impl CatalogFilter {
    pub fn active() -> Self {
        Self {
            product_type: None,
            active_only: true,
        }
    }

    pub fn active_of_type(product_type: impl Into<String>) -> Self {
        Self {
            product_type: Some(product_type.into()),
            active_only: true,
        }
    }

    pub fn matches(&self, entry: &CatalogEntry) -> bool {
        if self.active_only && !entry.is_active() {
            return false;
        }
        match &self.product_type {
            Some(wanted) => entry.product_type.as_deref() == Some(wanted.as_str()),
            None => true,
        }
    }
}

/// Read-only product catalog supplied by the host application
pub trait CatalogSource: Send + Sync {
    fn fetch(&self, filter: &CatalogFilter) -> Result<Vec<CatalogEntry>>;
}

/// In-memory catalog snapshot, typically loaded from a JSON export
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    entries: Vec<CatalogEntry>,
}

impl StaticCatalog {
    pub fn new(entries: Vec<CatalogEntry>) -> Self {
        Self { entries }
    }

    /// Parse a JSON array of catalog rows
    pub fn from_json_str(json: &str) -> Result<Self> {
        let entries: Vec<CatalogEntry> =
            serde_json::from_str(json).map_err(|e| AnalysisError::CatalogError {
                message: format!("invalid catalog JSON: {}", e),
            })?;
        Ok(Self::new(entries))
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| AnalysisError::CatalogError {
            message: format!("cannot read {}: {}", path.display(), e),
        })?;
        Self::from_json_str(&content)
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }
}

impl CatalogSource for StaticCatalog {
    fn fetch(&self, filter: &CatalogFilter) -> Result<Vec<CatalogEntry>> {
        Ok(self
            .entries
            .iter()
            .filter(|entry| filter.matches(entry))
            .cloned()
            .collect())
    }
}
