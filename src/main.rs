//! Replica Connector host
//!
//! Usage:
//!   # Open pb_data/data.db and pb_data/auxiliary.db, wait for Ctrl-C
//!   replica-connector serve
//!
//!   # Custom data directory
//!   replica-connector serve --dir /var/lib/app
//!
//!   # Self-update (always disabled in this build)
//!   replica-connector update
//!
//! Configuration comes from the environment (and a `.env` file if present):
//! `LIBSQL_DATABASE_URL`, `LIBSQL_AUTH_TOKEN`, `LIBSQL_SYNC_INTERVAL`, ...

use anyhow::Context;
use clap::{Parser, Subcommand};
use replica_connector::{ConnectionFactory, ConnectorSettings, LibsqlDriver, ReplicationSupport};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const RELEASES_URL: &str = "https://github.com/fadlee/pocketbase-libsql/releases";

#[derive(Parser)]
#[command(name = "replica-connector")]
#[command(about = "libSQL connection host with embedded replica support")]
struct Cli {
    /// Log level when RUST_LOG is unset
    #[arg(long, default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the primary and auxiliary databases and hold them until Ctrl-C
    Serve {
        /// Data directory containing data.db and auxiliary.db
        #[arg(long, default_value = "pb_data")]
        dir: PathBuf,
    },
    /// Update the current app executable (disabled in this build)
    Update,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| cli.log_level.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    match cli.command {
        Commands::Serve { dir } => serve(dir).await,
        Commands::Update => {
            println!("Self-update is disabled in this build.");
            println!("Please download the latest release from: {}", RELEASES_URL);
            Ok(())
        }
    }
}

async fn serve(dir: PathBuf) -> anyhow::Result<()> {
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create data directory {}", dir.display()))?;

    let factory = ConnectionFactory::new(
        LibsqlDriver::new(),
        ConnectorSettings::from_env(),
        ReplicationSupport::detect(),
    );

    let primary_path = dir.join("data.db");
    let auxiliary_path = dir.join("auxiliary.db");

    let _primary = factory
        .connect(&primary_path.to_string_lossy())
        .await
        .context("Failed to open primary database")?;
    let _auxiliary = factory
        .connect(&auxiliary_path.to_string_lossy())
        .await
        .context("Failed to open auxiliary database")?;

    info!(dir = %dir.display(), "Databases ready, press Ctrl-C to stop");
    tokio::signal::ctrl_c().await?;

    info!("Shutting down");
    let summary = factory.on_terminate().await;
    info!(closed = summary.closed, failed = summary.failed, "Shutdown complete");
    Ok(())
}
