// src/pipeline.rs
use std::fmt;
use tracing::info;

use crate::config::{CleaningRules, PipelineConfig};
use crate::error::CleanError;
use crate::process::{self, CoercionReport, DedupStats, ResolutionReport};
use crate::sink::{self, SinkReport};
use crate::table::RecordTable;

/// Everything the operator sees after a run.
#[derive(Debug, Clone)]
pub struct CleaningSummary {
    pub total_products: usize,
    pub dedup: DedupStats,
    pub coercion: CoercionReport,
    pub resolution: ResolutionReport,
    pub sink: SinkReport,
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

impl fmt::Display for CleaningSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Data Cleaning Summary")?;
        writeln!(f, "Total products: {}", self.total_products)?;
        for (flag, count) in &self.resolution.flags {
            let column = flag.strip_prefix("missing_").unwrap_or(flag);
            match column {
                "price" | "barcode" => {
                    writeln!(f, "Products with missing {}: {}", column, count)?
                }
                _ => writeln!(f, "{} missing: {}", capitalize(column), count)?,
            }
        }
        for (column, failed) in &self.coercion.failures {
            if *failed > 0 {
                writeln!(f, "Unparseable {} values: {}", column, failed)?;
            }
        }
        writeln!(
            f,
            "Rows dropped without product name: {}",
            self.resolution.dropped_rows
        )?;
        write!(
            f,
            "Product name column used: {}",
            self.resolution.identity_column
        )
    }
}

/// Stages 2–5: everything between loading and writing.
pub fn clean(
    table: RecordTable,
    rules: &CleaningRules,
) -> Result<(RecordTable, DedupStats, CoercionReport, ResolutionReport), CleanError> {
    let table = process::normalize_columns(table);
    let (table, dedup) = process::dedup_rows(table);
    let (table, coercion) = process::coerce_types(table, rules);
    let (table, resolution) = process::resolve_missing(table, rules)?;
    Ok((table, dedup, coercion, resolution))
}

/// Run the whole pipeline: load, clean, write.
///
/// `on_loaded` sees the raw table before any cleaning (used for the console preview).
pub fn run<F>(config: &PipelineConfig, on_loaded: F) -> Result<CleaningSummary, CleanError>
where
    F: FnOnce(&RecordTable),
{
    let raw = process::load_table(&config.input)?;
    on_loaded(&raw);

    let (table, dedup, coercion, resolution) = clean(raw, &config.rules)?;
    info!(
        rows = table.num_rows(),
        columns = table.num_columns(),
        "cleaning finished"
    );

    let sink = sink::write_outputs(&table, &config.outputs, &config.rules.table_name)?;

    Ok(CleaningSummary {
        total_products: table.num_rows(),
        dedup,
        coercion,
        resolution,
        sink,
    })
}
