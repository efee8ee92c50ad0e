//! Finds the latest published round: read off the results page when it
//! names one, otherwise by stepping through the draw-lookup endpoint.

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use crate::client::LottoClient;
use crate::error::ScraperError;
use crate::retry::{retry_with_backoff, RetryPolicy};

#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("no published round found from hint {hint} within {probes} probes")]
    Exhausted { hint: u32, probes: u32 },

    #[error(transparent)]
    Scraper(#[from] ScraperError),
}

/// Ways the results page names its round, tried in order.
static RESULTS_ROUND_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"lottoDrwNo\s*=\s*(\d+)",
        r#"id=["']lottoDrwNo["'][^>]*value=["'](\d+)["']"#,
        r"(\d+)\s*회\s*당첨결과",
    ]
    .into_iter()
    .map(|pattern| Regex::new(pattern).expect("valid results-page round regex"))
    .collect()
});

/// Round number announced by the results page, if any pattern finds one.
#[must_use]
pub fn parse_results_page_round(html: &str) -> Option<u32> {
    RESULTS_ROUND_PATTERNS.iter().find_map(|pattern| {
        pattern
            .captures(html)?
            .get(1)?
            .as_str()
            .parse::<u32>()
            .ok()
            .filter(|round| *round > 0)
    })
}

/// Returns the latest published round.
///
/// Reads it off the results page first. When that page cannot be fetched
/// or names no round, falls back to [`find_latest_round`] from `hint`.
///
/// # Errors
///
/// Only what [`find_latest_round`] returns; a results-page failure is
/// logged and never surfaced.
pub async fn discover_latest_round(
    client: &LottoClient,
    hint: u32,
    max_probes: u32,
    policy: RetryPolicy,
) -> Result<u32, DiscoveryError> {
    match retry_with_backoff(policy, || client.fetch_results_page()).await {
        Ok(html) => {
            if let Some(latest) = parse_results_page_round(&html) {
                tracing::info!(latest, source = "results_page", "latest published round discovered");
                return Ok(latest);
            }
            tracing::warn!("results page names no round, falling back to the draw lookup");
        }
        Err(e) => tracing::warn!(error = %e, "results page unavailable, falling back to the draw lookup"),
    }
    find_latest_round(client, hint, max_probes, policy).await
}

/// Returns the latest published round, starting from `hint`.
///
/// Steps back from `hint` until a published round is found, then steps
/// forward while the next round is also published. A good hint (the round
/// clock's estimate) resolves in two probes.
///
/// # Errors
///
/// - [`DiscoveryError::Exhausted`] if `max_probes` probes find nothing
///   published, or the walk back reaches round 1 without a hit.
/// - [`DiscoveryError::Scraper`] if a probe fails after retries.
pub async fn find_latest_round(
    client: &LottoClient,
    hint: u32,
    max_probes: u32,
    policy: RetryPolicy,
) -> Result<u32, DiscoveryError> {
    let hint = hint.max(1);
    let mut probes = 0u32;
    let mut round = hint;

    loop {
        if probes >= max_probes {
            return Err(DiscoveryError::Exhausted { hint, probes });
        }
        probes += 1;
        if is_published(client, round, policy).await? {
            break;
        }
        if round == 1 {
            return Err(DiscoveryError::Exhausted { hint, probes });
        }
        round -= 1;
    }

    loop {
        if probes >= max_probes {
            tracing::warn!(round, probes, "probe budget spent while stepping forward");
            break;
        }
        probes += 1;
        let next = round.saturating_add(1);
        if next == round || !is_published(client, next, policy).await? {
            break;
        }
        round = next;
    }

    tracing::info!(hint, latest = round, probes, "latest published round discovered");
    Ok(round)
}

async fn is_published(
    client: &LottoClient,
    round: u32,
    policy: RetryPolicy,
) -> Result<bool, ScraperError> {
    retry_with_backoff(policy, || client.round_exists(round)).await
}
