//! The `update-stores` run: find latest → list rank-1 stores of each round
//! in the window → rewrite the winner-stores file.
//!
//! Unlike the region snapshot, the file is rebuilt from scratch every run.
//! Rounds that fail are recorded in `meta.failures` and the run carries on.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use chrono::{DateTime, FixedOffset};
use lotto_core::{AppConfig, WinnerStore};
use lotto_scraper::{extract_winner_stores, retry_with_backoff, LottoClient, RetryPolicy};
use lotto_store::{
    save_winner_stores, RoundFailureNote, RoundWindow, SourceUrls, WinnerStoresFile,
    WinnerStoresMeta,
};

use crate::update::resolve_latest;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct StoresOptions {
    pub range: u32,
    pub out: PathBuf,
    /// Skips discovery when set.
    pub latest: Option<u32>,
}

/// What an `update-stores` run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct StoresReport {
    pub latest_round: u32,
    pub window: RoundWindow,
    /// Rounds that produced at least one store, ascending.
    pub listed: Vec<u32>,
    pub stores: usize,
    pub failed: Vec<RoundFailureNote>,
}

impl StoresReport {
    pub(crate) fn log_summary(&self) {
        tracing::info!(
            latest = self.latest_round,
            window_start = self.window.start(),
            rounds = self.listed.len(),
            stores = self.stores,
            failed = self.failed.len(),
            "winner-stores run complete"
        );
        for failure in &self.failed {
            tracing::warn!(round = failure.round, reason = %failure.reason, "round has no stores listed");
        }
    }
}

/// Rebuilds the winner-stores file at `options.out`.
///
/// `meta.latestRound` is the newest round that produced stores, so a failed
/// newest round is retried by the next run the guard lets through.
///
/// # Errors
///
/// Fails only if the latest round cannot be determined or the file cannot
/// be written.
pub(crate) async fn run_update_stores(
    config: &AppConfig,
    client: &LottoClient,
    options: &StoresOptions,
    now: DateTime<FixedOffset>,
) -> anyhow::Result<StoresReport> {
    let latest = resolve_latest(config, client, options.latest, &now).await?;
    let window = RoundWindow::new(latest, options.range);
    tracing::info!(latest, window_start = window.start(), "starting winner-stores run");

    let policy = RetryPolicy::from_config(config);
    let delay = Duration::from_millis(config.inter_request_delay_ms);
    let mut stores: Vec<WinnerStore> = Vec::new();
    let mut listed = Vec::new();
    let mut failed = Vec::new();

    for (i, round) in window.rounds().enumerate() {
        if i > 0 && !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        match retry_with_backoff(policy, || extract_winner_stores(client, round)).await {
            Ok(rows) => {
                tracing::info!(round, stores = rows.len(), "round listed");
                listed.push(round);
                stores.extend(rows);
            }
            Err(e) => {
                tracing::warn!(round, kind = e.kind(), error = %e, "round skipped");
                failed.push(RoundFailureNote {
                    round,
                    reason: e.to_string(),
                });
            }
        }
    }

    let source = SourceUrls {
        top_store_url_template: client.store_page_url_template(),
        by_win_url: client.results_page_url().to_string(),
        lotto_api_url_template: client.round_api_url_template(),
    };
    let covered = listed.last().copied().unwrap_or(0);
    let meta = WinnerStoresMeta::new(covered, options.range, &now, source, failed.clone());
    let file = WinnerStoresFile::build(meta, &stores);
    save_winner_stores(&options.out, &file)
        .with_context(|| format!("failed to write winner stores {}", options.out.display()))?;

    Ok(StoresReport {
        latest_round: latest,
        window,
        listed,
        stores: stores.len(),
        failed,
    })
}

#[cfg(test)]
#[path = "stores_test.rs"]
mod tests;
