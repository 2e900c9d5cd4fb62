// src/config.rs
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    path::{Path, PathBuf},
};

/// How absent values in the price column are filled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FillPolicy {
    /// Fill with `0`.
    #[default]
    Zero,
    /// Fill with the mean of the column's present values (`0` if there are none).
    Mean,
}

/// Which columns each cleaning rule applies to, and the literals it fills with.
///
/// Every field has a default, so a YAML rules file only needs the keys it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CleaningRules {
    pub numeric_columns: Vec<String>,
    pub date_columns: Vec<String>,
    pub price_column: String,
    pub price_fill: FillPolicy,
    pub identifier_columns: Vec<String>,
    pub identifier_sentinels: Vec<String>,
    pub unknown_identifier: String,
    pub categorical_columns: Vec<String>,
    pub unknown_category: String,
    pub stock_columns: Vec<String>,
    pub table_name: String,
}

impl Default for CleaningRules {
    fn default() -> Self {
        let owned = |xs: &[&str]| xs.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        Self {
            numeric_columns: owned(&["price", "quantity", "stockqty"]),
            date_columns: owned(&["date_added", "expire_date", "dateadded"]),
            price_column: "price".into(),
            price_fill: FillPolicy::Zero,
            identifier_columns: owned(&["barcode"]),
            identifier_sentinels: owned(&["nan", "None", "UNKNOWN"]),
            unknown_identifier: "UNKNOWN".into(),
            categorical_columns: owned(&["category", "supplier", "brand"]),
            unknown_category: "Unknown".into(),
            stock_columns: owned(&["quantity", "stockqty"]),
            table_name: "products".into(),
        }
    }
}

impl CleaningRules {
    /// Load rules from a YAML file; missing keys keep their defaults.
    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        let f = File::open(path)
            .with_context(|| format!("opening rules file {}", path.display()))?;
        serde_yaml::from_reader(f)
            .with_context(|| format!("parsing rules file {}", path.display()))
    }
}

/// Where the sink writes its three outputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub cleaned: PathBuf,
    pub csv: PathBuf,
    pub db: PathBuf,
}

impl Default for OutputPaths {
    fn default() -> Self {
        Self {
            cleaned: PathBuf::from("data/cleaned_products.parquet"),
            csv: PathBuf::from("data/powerbi_products.csv"),
            db: PathBuf::from("db/spaza_shop.duckdb"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub input: PathBuf,
    pub outputs: OutputPaths,
    pub rules: CleaningRules,
}
