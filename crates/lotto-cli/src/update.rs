//! The `update` run: load → find latest → window → fetch pending → save.
//!
//! Per-round failures are logged and recorded in the [`RunReport`] rather
//! than propagated, so one bad page never costs the whole run. The snapshot
//! is read once at the start and written once at the end.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use chrono::{DateTime, FixedOffset};
use lotto_core::{estimate_latest_round, AppConfig};
use lotto_scraper::{
    discover_latest_round, extract_round, retry_with_backoff, LottoClient, RetryPolicy,
};
use lotto_store::{load_snapshot, save_snapshot, RoundWindow, Snapshot};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct UpdateOptions {
    pub range: u32,
    pub out: PathBuf,
    /// Skips discovery when set.
    pub latest: Option<u32>,
    pub refresh: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RoundFailure {
    pub round: u32,
    pub kind: &'static str,
    pub reason: String,
}

/// What an update run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RunReport {
    pub latest_round: u32,
    pub window: RoundWindow,
    pub pruned: usize,
    pub already_present: usize,
    pub stored: Vec<u32>,
    pub failed: Vec<RoundFailure>,
}

impl RunReport {
    fn new(latest_round: u32, window: RoundWindow) -> Self {
        Self {
            latest_round,
            window,
            pruned: 0,
            already_present: 0,
            stored: Vec::new(),
            failed: Vec::new(),
        }
    }

    pub(crate) fn log_summary(&self) {
        tracing::info!(
            latest = self.latest_round,
            window_start = self.window.start(),
            window_end = self.window.end(),
            pruned = self.pruned,
            already_present = self.already_present,
            stored = self.stored.len(),
            failed = self.failed.len(),
            "update run complete"
        );
        for failure in &self.failed {
            tracing::warn!(
                round = failure.round,
                kind = failure.kind,
                reason = %failure.reason,
                "round left out of snapshot"
            );
        }
    }
}

/// Runs one full update against the snapshot at `options.out`.
///
/// # Errors
///
/// Fails only if the latest round cannot be determined or the snapshot
/// cannot be written. Individual round failures are reported, not raised.
pub(crate) async fn run_update(
    config: &AppConfig,
    client: &LottoClient,
    options: &UpdateOptions,
    now: DateTime<FixedOffset>,
) -> anyhow::Result<RunReport> {
    let policy = RetryPolicy::from_config(config);
    let mut snapshot = load_snapshot(&options.out);

    let latest = resolve_latest(config, client, options.latest, &now).await?;

    let window = RoundWindow::new(latest, options.range);
    let mut report = RunReport::new(latest, window);
    report.pruned = snapshot.retain_window(&window);

    let pending = snapshot.pending_rounds(&window, options.refresh);
    report.already_present = window.rounds().count().saturating_sub(pending.len());
    tracing::info!(
        latest,
        window_start = window.start(),
        pending = pending.len(),
        "starting update"
    );

    fetch_rounds(
        client,
        &mut snapshot,
        &pending,
        policy,
        Duration::from_millis(config.inter_request_delay_ms),
        &mut report,
    )
    .await;

    snapshot.stamp(latest, options.range, &now);
    save_snapshot(&options.out, &snapshot)
        .with_context(|| format!("failed to write snapshot {}", options.out.display()))?;

    Ok(report)
}

/// `explicit` when given, otherwise the discovered latest published round.
///
/// # Errors
///
/// Fails if discovery cannot determine the latest round.
pub(crate) async fn resolve_latest(
    config: &AppConfig,
    client: &LottoClient,
    explicit: Option<u32>,
    now: &DateTime<FixedOffset>,
) -> anyhow::Result<u32> {
    if let Some(latest) = explicit {
        return Ok(latest);
    }
    let hint = estimate_latest_round(now);
    let latest = discover_latest_round(
        client,
        hint,
        config.discovery_max_probes,
        RetryPolicy::from_config(config),
    )
    .await
    .context("could not determine the latest published round")?;
    Ok(latest)
}

/// Fetches `rounds` in order, one at a time, with `delay` between requests.
async fn fetch_rounds(
    client: &LottoClient,
    snapshot: &mut Snapshot,
    rounds: &[u32],
    policy: RetryPolicy,
    delay: Duration,
    report: &mut RunReport,
) {
    for (i, &round) in rounds.iter().enumerate() {
        if i > 0 && !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        match retry_with_backoff(policy, || extract_round(client, round)).await {
            Ok(result) => {
                tracing::info!(
                    round,
                    rank1 = result.rank1.total_stores(),
                    rank2 = result.rank2.total_stores(),
                    "round stored"
                );
                snapshot.insert(round, result);
                report.stored.push(round);
            }
            Err(e) => {
                tracing::warn!(round, kind = e.kind(), error = %e, "round skipped");
                report.failed.push(RoundFailure {
                    round,
                    kind: e.kind(),
                    reason: e.to_string(),
                });
            }
        }
    }
}

#[cfg(test)]
#[path = "update_test.rs"]
mod tests;
