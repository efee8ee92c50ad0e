//! Region-aggregation extractor for the Lotto 6/45 winning-retailer page.
//!
//! Leaf-first: [`classify`] maps an address to a region, [`locate`] finds the
//! rank-1 and rank-2 tables in a [`document::Document`], [`aggregate`] counts
//! one table, and [`extract`] ties them together for one round.
//! [`winners`] lists the individual rank-1 stores of the same page.

pub mod aggregate;
pub mod classify;
pub mod client;
pub mod decode;
pub mod discovery;
pub mod document;
pub mod error;
pub mod extract;
pub mod locate;
pub mod retry;
mod table;
pub mod winners;

pub use aggregate::{aggregate, TableError};
pub use classify::{classify, classify_opt};
pub use client::LottoClient;
pub use discovery::{
    discover_latest_round, find_latest_round, parse_results_page_round, DiscoveryError,
};
pub use document::{Document, HtmlPage};
pub use error::ScraperError;
pub use extract::{extract_round, extract_round_from_html, ExtractError};
pub use locate::{locate, LocatedTables};
pub use retry::{retry_with_backoff, RetryPolicy, Transient};
pub use table::TableHandle;
pub use winners::{extract_winner_stores, split_region, winner_stores_from_html};
