mod guard;
mod stores;
mod update;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use lotto_scraper::{extract_round, retry_with_backoff, LottoClient, RetryPolicy};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "lotto-cli")]
#[command(about = "Lotto 6/45 winning-retailer region snapshots and winner-store lists")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Refresh the rolling-window region snapshot
    Update {
        /// Number of trailing rounds to keep (defaults to LOTTO_WINDOW)
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        range: Option<u32>,
        /// Snapshot file to update (defaults to LOTTO_SNAPSHOT_PATH)
        #[arg(long)]
        out: Option<PathBuf>,
        /// Use this as the latest round instead of probing the site
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        latest: Option<u32>,
        /// Re-fetch rounds already present in the snapshot
        #[arg(long)]
        refresh: bool,
    },
    /// Rewrite the rank-1 winner-stores file for the trailing rounds
    UpdateStores {
        /// Number of trailing rounds to list (defaults to LOTTO_WINNER_STORES_WINDOW)
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        range: Option<u32>,
        /// File to write (defaults to LOTTO_WINNER_STORES_PATH)
        #[arg(long)]
        out: Option<PathBuf>,
        /// Use this as the latest round instead of asking the site
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        latest: Option<u32>,
    },
    /// Decide whether an update run is needed, without touching the network
    Check {
        /// Snapshot files to read the local latest round from
        #[arg(long, num_args = 0..)]
        data_files: Vec<PathBuf>,
    },
    /// Fetch one round and print its region summary as JSON
    Round {
        #[arg(value_parser = clap::value_parser!(u32).range(1..))]
        round: u32,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = lotto_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Update {
            range,
            out,
            latest,
            refresh,
        } => {
            let options = update::UpdateOptions {
                range: range.unwrap_or(config.window),
                out: out.unwrap_or_else(|| config.snapshot_path.clone()),
                latest,
                refresh,
            };
            let client = LottoClient::from_config(&config)?;
            let report =
                update::run_update(&config, &client, &options, lotto_core::now_kst()).await?;
            report.log_summary();
        }
        Commands::UpdateStores { range, out, latest } => {
            let options = stores::StoresOptions {
                range: range.unwrap_or(config.winner_stores_window),
                out: out.unwrap_or_else(|| config.winner_stores_path.clone()),
                latest,
            };
            let client = LottoClient::from_config(&config)?;
            let report =
                stores::run_update_stores(&config, &client, &options, lotto_core::now_kst())
                    .await?;
            report.log_summary();
        }
        Commands::Check { data_files } => {
            let decision = guard::evaluate(
                &data_files,
                lotto_core::estimate_latest_round(&lotto_core::now_kst()),
                guard::is_force_update(std::env::var("FORCE_UPDATE").ok().as_deref()),
            );
            println!("{}", decision.message());
            if let Some(path) = std::env::var_os("GITHUB_OUTPUT") {
                let path = PathBuf::from(path);
                guard::write_github_output(&path, &decision)
                    .with_context(|| format!("failed to append to {}", path.display()))?;
            }
        }
        Commands::Round { round } => {
            let client = LottoClient::from_config(&config)?;
            let policy = RetryPolicy::from_config(&config);
            let result = retry_with_backoff(policy, || extract_round(&client, round)).await?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests;
