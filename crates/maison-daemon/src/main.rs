//! Maison Daemon - Main entry point
//!
//! Serves the furniture model catalog, the model assets, and the dashboard
//! frontend.

mod api;
mod config;
mod scan;
mod server;
mod state;

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "maison")]
#[command(about = "Maison interior-design dashboard daemon")]
#[command(version)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "maison.toml")]
    config: PathBuf,

    /// Bind address for web server
    #[arg(short, long)]
    bind: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Scan the models directory, print the catalog, and exit
    #[arg(long)]
    scan_models: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!("Maison v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let mut config = config::load_config(&args.config)?;

    // Override bind address if specified
    if let Some(bind) = args.bind {
        config.daemon.bind = bind;
    }

    info!(
        models = %config.models.path,
        library = %config.library.path,
        "Configuration loaded"
    );

    if args.scan_models {
        // Single scan mode
        info!("Scanning models directory");
        let models = scan::scan_models_dir(std::path::Path::new(&config.models.path))?;
        println!("Found {} models:", models.len());
        for model in models {
            println!("  - {} [{}] at {}", model.filename, model.category, model.url);
        }
    } else {
        // Daemon mode
        let state = state::AppState::new(config.clone())?;
        server::run(state, &config.daemon.bind, config.daemon.tls.as_ref()).await?;
    }

    Ok(())
}
