//! One round, end to end: fetch → decode → parse → locate → aggregate → check.

use lotto_core::{Rank, RankSummary, RoundResult};
use scraper::Html;
use thiserror::Error;

use crate::aggregate::{aggregate, TableError};
use crate::client::LottoClient;
use crate::document::HtmlPage;
use crate::error::ScraperError;
use crate::locate::locate;

/// Why a round could not be extracted. Every variant is scoped to a single
/// round; none of them should abort a multi-round run.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("round {round}: fetch failed: {source}")]
    Fetch {
        round: u32,
        #[source]
        source: ScraperError,
    },

    #[error("round {round}: page could not be parsed: {reason}")]
    Parse { round: u32, reason: String },

    #[error("round {round}: {rank}: {source}")]
    Table {
        round: u32,
        rank: Rank,
        #[source]
        source: TableError,
    },

    #[error("round {round}: {rank}: all {total} rows classified as other, refusing to trust the parse")]
    SuspectedFailure { round: u32, rank: Rank, total: u32 },
}

impl ExtractError {
    #[must_use]
    pub fn round(&self) -> u32 {
        match self {
            ExtractError::Fetch { round, .. }
            | ExtractError::Parse { round, .. }
            | ExtractError::Table { round, .. }
            | ExtractError::SuspectedFailure { round, .. } => *round,
        }
    }

    /// Short machine-friendly label, used as a log field.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            ExtractError::Fetch { .. } => "fetch",
            ExtractError::Parse { .. } => "parse",
            ExtractError::Table {
                source: TableError::MissingTable,
                ..
            } => "missing_table",
            ExtractError::Table {
                source: TableError::MissingHeader,
                ..
            } => "missing_header",
            ExtractError::Table {
                source: TableError::EmptyBody,
                ..
            } => "empty_body",
            ExtractError::SuspectedFailure { .. } => "suspected_failure",
        }
    }
}

/// Fetches and extracts `round`.
///
/// Makes exactly one request; retrying is up to the caller.
///
/// # Errors
///
/// [`ExtractError::Fetch`] on network or HTTP failure, otherwise anything
/// [`extract_round_from_html`] returns.
pub async fn extract_round(client: &LottoClient, round: u32) -> Result<RoundResult, ExtractError> {
    let html = client
        .fetch_store_page(round)
        .await
        .map_err(|source| ExtractError::Fetch { round, source })?;
    extract_round_from_html(round, &html)
}

/// Extracts both rank summaries from an already decoded page.
///
/// # Errors
///
/// - [`ExtractError::Parse`] if the page is empty or has no markup.
/// - [`ExtractError::Table`] if either rank's table is missing or malformed.
/// - [`ExtractError::SuspectedFailure`] if every row of a non-empty table
///   was classified as `other`.
pub fn extract_round_from_html(round: u32, html: &str) -> Result<RoundResult, ExtractError> {
    let document = parse_page(round, html)?;
    let page = HtmlPage::new(&document);

    let tables = locate(&page);
    let rank1 = summarize(&page, tables.get(Rank::First), round, Rank::First);
    let rank2 = summarize(&page, tables.get(Rank::Second), round, Rank::Second);

    let result = RoundResult {
        rank1: rank1?,
        rank2: rank2?,
    };
    tracing::debug!(
        round,
        rank1_total = result.rank1.total_stores(),
        rank2_total = result.rank2.total_stores(),
        "round extracted"
    );
    Ok(result)
}

/// Parses `html`, rejecting bodies that are empty or carry no markup.
pub(crate) fn parse_page(round: u32, html: &str) -> Result<Html, ExtractError> {
    if html.trim().is_empty() {
        return Err(ExtractError::Parse {
            round,
            reason: "empty response body".to_owned(),
        });
    }

    let document = Html::parse_document(html);
    if !HtmlPage::new(&document).has_markup() {
        return Err(ExtractError::Parse {
            round,
            reason: "response contains no HTML elements".to_owned(),
        });
    }
    Ok(document)
}

fn summarize<'a>(
    page: &HtmlPage<'a>,
    table: Option<crate::document::DomNode<'a>>,
    round: u32,
    rank: Rank,
) -> Result<RankSummary, ExtractError> {
    let summary =
        aggregate(page, table).map_err(|source| ExtractError::Table { round, rank, source })?;
    if summary.is_all_other() {
        return Err(ExtractError::SuspectedFailure {
            round,
            rank,
            total: summary.total_stores(),
        });
    }
    Ok(summary)
}
