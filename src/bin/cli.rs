//! dripfeed CLI
//!
//! Background ingestion job: sweeps the marketplace's priority categories
//! and upserts normalized product records into local storage.
//!
//! Exit status: 0 on a normal sweep, 1 when the run aborts (expired session
//! cookie or a startup error).

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use rand::SeedableRng;
use rand::rngs::StdRng;

use dripfeed::{
    config,
    error::Result,
    models::catalog,
    pipeline,
    services::FetchClient,
    storage::{LocalStore, ProductStore},
};

/// dripfeed - Marketplace catalog crawler
#[derive(Parser, Debug)]
#[command(name = "dripfeed", version, about = "Marketplace catalog crawler")]
struct Cli {
    /// Path to storage directory containing config and data files
    #[arg(short, long, default_value = "storage")]
    storage_dir: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sweep all priority categories and upsert products
    Crawl {
        /// Seed for the category shuffle and sleep jitter (debugging aid;
        /// omitted = entropy-seeded)
        #[arg(long)]
        seed: Option<u64>,
    },

    /// List the priority categories with their verticals
    Categories,

    /// Validate configuration files
    Validate,

    /// Show current store info
    Info,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config_path = cli.storage_dir.join("config.toml");

    match cli.command {
        Command::Crawl { seed } => {
            let config = Arc::new(config::load_validated(&config_path)?);
            log::info!("Loaded configuration from {}", cli.storage_dir.display());

            if config.session.cookie.is_empty() {
                log::warn!(
                    "No session cookie configured; the first request will abort the run"
                );
            }

            let mut rng = match seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            };

            let client = FetchClient::new(Arc::clone(&config))?;
            let store = LocalStore::new(&cli.storage_dir);

            let stats = pipeline::run_crawler(&config, &client, &store, &mut rng).await?;

            log::info!(
                "Store now holds {} products ({} new this run)",
                store.count().await?,
                stats.inserted
            );
        }

        Command::Categories => {
            let verticals = catalog::parent_categories();
            for slug in catalog::priority_slugs() {
                let vertical = verticals.get(&slug).map(String::as_str).unwrap_or("Other");
                println!("{vertical}\t{slug}");
            }
        }

        Command::Validate => {
            log::info!("Validating configuration...");
            let config = config::load_config(&config_path);
            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            log::info!("All validations passed!");
        }

        Command::Info => {
            log::info!("Storage directory: {}", cli.storage_dir.display());
            let store = LocalStore::new(&cli.storage_dir);
            let count = store.count().await?;
            log::info!("Stored products: {count}");
            log::info!(
                "Priority categories: {}",
                catalog::priority_slugs().len()
            );
        }
    }

    Ok(())
}
