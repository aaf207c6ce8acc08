//! Database backup - Main entry point
//!
//! Exports a hosted relational database either through its REST data API
//! (JSON + CSV artifacts) or through a native `pg_dump` invocation (SQL
//! artifact).

use anyhow::Result;
use clap::{Parser, Subcommand};
use db_backup::{api, config::Config, dump, utils};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, value_name = "FILE", default_value = "db-backup.toml")]
    config: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Back up every configured resource through the REST data API
    Api,
    /// Produce a full SQL dump with pg_dump
    Dump,
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    let args = Args::parse();
    let config = Config::load(&args.config)?;

    // Initialize logging
    let log_level = args.log_level.as_deref().unwrap_or(&config.log.level);
    utils::logger::init(log_level)?;

    tracing::info!("Starting db-backup v{}", env!("CARGO_PKG_VERSION"));

    let run_timestamp = chrono::Local::now().format("%Y-%m-%d_%H-%M-%S").to_string();

    let path = match args.command {
        Command::Api => api::run(&config, &run_timestamp).await?,
        Command::Dump => {
            dump::run(&config, &dump::password::PromptPasswordSource, &run_timestamp).await?
        }
    };

    tracing::info!("Backup complete: {}", path.display());

    Ok(())
}
