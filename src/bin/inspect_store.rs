use anyhow::{Context, Result};
use clap::Parser;
use spazaclean::{duck, inspect, table::render::render_grid};
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};

/// List the tables in the shop database and dump the first one.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// DuckDB database file
    #[arg(long, env = "SPAZA_DB", default_value = "db/spaza_shop.duckdb")]
    db: PathBuf,
}

fn main() -> Result<()> {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_target(false)
        .init();

    let args = Args::parse();
    let conn = duck::open_read_only_db(&args.db)
        .with_context(|| format!("opening {}", args.db.display()))?;

    let (tables, first) = inspect::first_table(&conn).context("reading catalog")?;
    println!("Tables:");
    for name in &tables {
        println!("  {}", name);
    }
    println!();

    match first {
        Some((name, table)) => {
            println!("Data from table '{}':", name);
            println!("{}", render_grid(&table, None));
        }
        None => println!("No tables found in the database, Sorry!"),
    }
    Ok(())
}
