//! Storyline TUI entry point.

use std::{
    fs::File,
    path::PathBuf,
    sync::{Arc, Mutex},
};

use clap::Parser;
use rand::{SeedableRng, rngs::StdRng};
use storyline_app::{Runtime, RuntimeConfig, Viewer, ViewerConfig};
use storyline_tui::{
    DemoCatalog, SystemEnv, TerminalDriver,
    catalog::{DEFAULT_DURATION_MS, DEFAULT_MAX_ITEMS, DEFAULT_USERS},
    load_catalog,
};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Storyline terminal story viewer
#[derive(Parser, Debug)]
#[command(name = "storyline-tui")]
#[command(about = "Terminal viewer for ephemeral stories")]
#[command(version)]
struct Args {
    /// Play a CBOR catalog file instead of a generated one
    #[arg(short, long)]
    catalog: Option<PathBuf>,

    /// Users in the generated catalog
    #[arg(long, default_value_t = DEFAULT_USERS)]
    users: usize,

    /// Maximum items per generated user
    #[arg(long, default_value_t = DEFAULT_MAX_ITEMS)]
    max_items: usize,

    /// Base item duration in milliseconds
    #[arg(short, long, default_value_t = DEFAULT_DURATION_MS)]
    duration_ms: u64,

    /// Random extra duration per item in milliseconds
    #[arg(long, default_value_t = 0)]
    jitter_ms: u64,

    /// Seed for the generated catalog
    #[arg(long)]
    seed: Option<u64>,

    /// Page to open on
    #[arg(short, long, default_value_t = 0)]
    start_page: usize,

    /// Write logs to this file (the terminal itself is taken by the UI)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    if let Some(path) = &args.log_file {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
        let writer = Mutex::new(File::create(path)?);
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(writer).with_ansi(false))
            .with(filter)
            .init();
    }

    let catalog = match &args.catalog {
        Some(path) => load_catalog(path)?,
        None => {
            let shape = DemoCatalog {
                users: args.users,
                max_items: args.max_items,
                duration_ms: args.duration_ms,
                jitter_ms: args.jitter_ms,
            };
            let mut rng = args.seed.map_or_else(StdRng::from_os_rng, StdRng::seed_from_u64);
            shape.build(&mut rng)?
        },
    };
    let catalog = Arc::new(catalog);
    tracing::info!(users = catalog.len(), start_page = args.start_page, "opening viewer");

    // Validate the start page before the terminal is taken over
    let viewer = Viewer::new(Arc::clone(&catalog), args.start_page, ViewerConfig::default())?;
    let driver = TerminalDriver::new(catalog.len(), args.start_page)?;

    Runtime::new(driver, SystemEnv::new(), viewer, RuntimeConfig::default()).run().await?;

    tracing::info!("viewer finished");
    Ok(())
}
