//! RDL ETL - raw data landing loader

use anyhow::{Context, Result};
use clap::Parser;
use rdl_common::logging::{init_logging, LogConfig, LogLevel};
use rdl_etl::{
    catalog::SchemaCatalog,
    config::Config,
    discover,
    load::{self, LoadOutcome},
    session::{self, Session},
};
use std::path::PathBuf;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(name = "rdl-etl")]
#[command(author, version, about = "Load delimited raw data files into the warehouse")]
struct Cli {
    /// Data root to walk instead of the configured one
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Schema source to read instead of the configured one
    #[arg(long)]
    schemas: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

/// Per-run tallies, logged once at the end
#[derive(Debug, Default)]
struct RunSummary {
    loaded: usize,
    skipped: usize,
    failed: usize,
    rows: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Environment configures logging; the verbose flag only raises the level
    let mut log_config = LogConfig::from_env().context("invalid logging configuration")?;
    if cli.verbose {
        log_config.level = LogLevel::Debug;
    }

    init_logging(&log_config)?;

    info!("run started");

    let mut config = Config::load().context("failed to load configuration")?;
    if let Some(data_dir) = cli.data_dir {
        config.pipeline.data_dir = data_dir;
    }
    if let Some(schemas) = cli.schemas {
        config.pipeline.schema_source = schemas;
    }

    info!(path = %config.pipeline.schema_source.display(), "loading schema catalog");
    let catalog = SchemaCatalog::load(&config.pipeline.schema_source)
        .context("failed to load schema catalog")?;
    info!(tables = catalog.len(), "schema catalog loaded");

    // Session acquisition failure is fatal; everything after this point is
    // isolated per file
    let session = Session::start(&config)
        .await
        .context("failed to start execution session")?;

    let mut summary = RunSummary::default();

    for routed in discover::discover(&config.pipeline.data_dir) {
        info!(file = %routed.path.display(), "discovered data file");

        match load::process(&session, &config, &catalog, &routed).await {
            Ok(LoadOutcome::Loaded { rows }) => {
                summary.loaded += 1;
                summary.rows += rows;
            }
            Ok(LoadOutcome::SkippedNoSchema) => {
                summary.skipped += 1;
            }
            Err(err) => {
                error!(
                    table = %routed.table,
                    file = %routed.path.display(),
                    error = %err,
                    "file load failed, continuing with next file"
                );
                summary.failed += 1;
            }
        }
    }

    session.stop().await;

    let stats = session::cleanup_scratch(&config.pipeline.scratch_dir);
    info!(
        removed = stats.removed,
        failed = stats.failed,
        "scratch cleanup finished"
    );

    info!(
        loaded = summary.loaded,
        skipped = summary.skipped,
        failed = summary.failed,
        rows = summary.rows,
        "run finished"
    );

    // Partial per-file failure is a normal completed run; only run-level
    // failures above return a nonzero exit code
    Ok(())
}
