//! Replbox app cli definition and entrypoint.
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use replbox_core::config::{Config, get_config};
use replbox_core::get_data_dir;
use replbox_core::offline::{FsAssetStore, HttpNetwork, OfflineWorker, ServeOrigin};
use replbox_core::session::ReplSession;

use crate::log::setup_logging;
use crate::repl;
use crate::ux;

/// Replbox - a sandboxed expression REPL with offline assets.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Show verbose logs.
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Start an interactive session.
    Repl,
    /// Evaluate one submission and print its entries.
    Eval {
        /// Code to evaluate.
        code: Vec<String>,
    },
    /// Manage the offline asset cache.
    Cache {
        #[command(subcommand)]
        command: CacheCommands,
    },
}

#[derive(Subcommand, Debug)]
enum CacheCommands {
    /// Fetch and store every manifest asset.
    Install,
    /// Show the install state and the cache generations on disk.
    Status,
    /// Serve one asset, from the cache when possible.
    Fetch {
        /// Asset path relative to the configured base URL.
        path: String,
    },
}

/// Runs the main CLI application.
pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        setup_logging().context("Failed to set up logging")?;
    }

    // Load configuration
    let config = get_config(None).context("Failed to load configuration")?;

    match cli.command {
        Commands::Repl => repl::run(&config).await,
        Commands::Eval { code } => execute_eval(&code.join(" ")),
        Commands::Cache { command } => execute_cache(command, &config).await,
    }
}

fn execute_eval(code: &str) -> Result<()> {
    let mut session = ReplSession::new();
    for entry in session.submit_and_collect(code) {
        ux::render_entry(entry);
    }
    Ok(())
}

fn offline_worker(config: &Config) -> Result<OfflineWorker> {
    let data_dir = get_data_dir().context("Failed to get data directory")?;
    let store = FsAssetStore::new(data_dir.join("offline"));
    let network =
        HttpNetwork::new(&config.offline.base_url).context("Invalid offline base URL")?;
    Ok(OfflineWorker::new(
        Box::new(store),
        Box::new(network),
        config.offline.manifest.clone(),
    ))
}

async fn execute_cache(command: CacheCommands, config: &Config) -> Result<()> {
    let worker = offline_worker(config)?;

    match command {
        CacheCommands::Install => {
            let count = worker
                .install()
                .await
                .context("Offline cache install failed")?;
            println!(
                "Installed {count} assets into cache '{}'",
                worker.manifest().version
            );
        }
        CacheCommands::Status => {
            let installed = worker.is_installed().await?;
            println!(
                "Cache '{}': {}",
                worker.manifest().version,
                if installed { "installed" } else { "not installed" }
            );
            let generations = worker.generations().await?;
            if !generations.is_empty() {
                println!("Generations on disk: {}", generations.join(", "));
            }
        }
        CacheCommands::Fetch { path } => {
            let (asset, origin) = worker
                .serve(&path)
                .await
                .with_context(|| format!("Failed to serve '{path}'"))?;
            let origin = match origin {
                ServeOrigin::Cache => "cache",
                ServeOrigin::Network => "network",
            };
            println!(
                "{} ({} bytes, from {origin})",
                asset.path,
                asset.body.len()
            );
        }
    }
    Ok(())
}
