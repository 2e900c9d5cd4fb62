use anyhow::{Context, Result};
use clap::Parser;
use spazaclean::{
    config::{CleaningRules, FillPolicy, OutputPaths, PipelineConfig},
    pipeline,
    table::render::render_grid,
};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

/// Clean a messy product spreadsheet and load it into the shop database.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Source spreadsheet (.xlsx, .xls, .ods or .csv)
    #[arg(long, env = "SPAZA_INPUT", default_value = "data/Spaza_products_messy.xlsx")]
    input: PathBuf,

    /// Cleaned table as Parquet
    #[arg(long, env = "SPAZA_CLEANED", default_value = "data/cleaned_products.parquet")]
    cleaned: PathBuf,

    /// Flat CSV export for dashboards
    #[arg(long, env = "SPAZA_CSV", default_value = "data/powerbi_products.csv")]
    csv: PathBuf,

    /// DuckDB database file
    #[arg(long, env = "SPAZA_DB", default_value = "db/spaza_shop.duckdb")]
    db: PathBuf,

    /// YAML file overriding the default cleaning rules
    #[arg(long, env = "SPAZA_RULES")]
    rules: Option<PathBuf>,

    /// How to fill missing prices (overrides the rules file)
    #[arg(long, env = "SPAZA_PRICE_FILL", value_enum)]
    price_fill: Option<FillPolicy>,

    /// Rows of the raw table to print after loading
    #[arg(long, default_value_t = 5)]
    preview: usize,
}

fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_target(false)
        .init();

    // ─── 2) configuration ────────────────────────────────────────────
    let args = Args::parse();
    let mut rules = match &args.rules {
        Some(path) => CleaningRules::from_yaml_file(path)?,
        None => CleaningRules::default(),
    };
    if let Some(policy) = args.price_fill {
        rules.price_fill = policy;
    }
    info!(input = %args.input.display(), price_fill = ?rules.price_fill, "startup");

    let config = PipelineConfig {
        input: args.input,
        outputs: OutputPaths {
            cleaned: args.cleaned,
            csv: args.csv,
            db: args.db,
        },
        rules,
    };

    // ─── 3) run ──────────────────────────────────────────────────────
    let preview = args.preview;
    let summary = pipeline::run(&config, |raw| {
        if preview > 0 {
            println!("\nFirst few rows of messy data:");
            println!("{}\n", render_grid(raw, Some(preview)));
        }
    })
    .with_context(|| format!("cleaning {}", config.input.display()))?;

    println!("\n{}", summary);
    Ok(())
}
