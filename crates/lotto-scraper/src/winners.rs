//! Per-store rows of the rank-1 table: name, purchase method, address and
//! the region split out of the address.

use lotto_core::{Rank, RegionTag, Sido, WinnerStore, LEGAL_NAMES, ONLINE_REGION};

use crate::aggregate::TableError;
use crate::classify::classify;
use crate::client::LottoClient;
use crate::document::{Document, HtmlPage};
use crate::extract::{parse_page, ExtractError};
use crate::locate::near_label_where;
use crate::table::{address_column, data_rows, header_cells, row_cells};

/// Header token of the purchase-method column. Only the rank-1 table has it.
const METHOD_HEADER_TOKEN: &str = "구분";

/// Header token of the store-name column.
const NAME_HEADER_TOKEN: &str = "상호";

/// Colloquial spelling of Seoul that is not a short tag or legal name.
const SEOUL_COLLOQUIAL: &str = "서울시";

/// Column positions of the operator's layout: 번호 | 상호명 | 구분 | 소재지.
const DEFAULT_COLUMNS: WinnerColumns = WinnerColumns {
    name: 1,
    method: 2,
    address: 3,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct WinnerColumns {
    name: usize,
    method: usize,
    address: usize,
}

impl WinnerColumns {
    /// Columns named by the header, each falling back to its default
    /// position when no header cell mentions it.
    fn resolve<D: Document>(doc: &D, table: D::Node) -> Self {
        let headers: Vec<String> = header_cells(doc, table)
            .into_iter()
            .map(|cell| doc.text(cell))
            .collect();
        let find = |token: &str| headers.iter().position(|text| text.contains(token));

        Self {
            name: find(NAME_HEADER_TOKEN).unwrap_or(DEFAULT_COLUMNS.name),
            method: find(METHOD_HEADER_TOKEN).unwrap_or(DEFAULT_COLUMNS.method),
            address: address_column(doc, table).unwrap_or(DEFAULT_COLUMNS.address),
        }
    }

    fn widest(self) -> usize {
        self.name.max(self.method).max(self.address)
    }
}

fn has_method_header<D: Document>(doc: &D, table: D::Node) -> bool {
    header_cells(doc, table)
        .into_iter()
        .any(|cell| doc.text(cell).contains(METHOD_HEADER_TOKEN))
}

/// The rank-1 table: the first table with a 구분 header near the rank-1
/// label, else the first such table anywhere on the page.
fn locate_winner_table<D: Document>(doc: &D) -> Option<D::Node> {
    near_label_where(doc, Rank::First, has_method_header).or_else(|| {
        let fallback = doc
            .elements_by_tag("table")
            .into_iter()
            .find(|table| has_method_header(doc, *table));
        if fallback.is_some() {
            tracing::debug!(strategy = "first_method_table", "winner table assigned by fallback");
        }
        fallback
    })
}

/// Splits `address` into `(sido, sigungu)`.
///
/// - empty → both empty;
/// - online sales → ([`ONLINE_REGION`], empty);
/// - otherwise the first token, mapped to its short tag when it is a legal
///   name, a short tag or 서울시, and kept verbatim when it is none of
///   those. `sigungu` is the second token, or empty.
#[must_use]
pub fn split_region(address: &str) -> (String, String) {
    let address = address.trim();
    if address.is_empty() {
        return (String::new(), String::new());
    }
    if classify(address) == RegionTag::Internet {
        return (ONLINE_REGION.to_owned(), String::new());
    }

    let mut tokens = address.split_whitespace();
    let first = tokens.next().unwrap_or_default();
    let sido = region_alias(first).map_or_else(|| first.to_owned(), |sido| sido.as_str().to_owned());
    let sigungu = tokens.next().unwrap_or_default().to_owned();
    (sido, sigungu)
}

fn region_alias(token: &str) -> Option<Sido> {
    LEGAL_NAMES
        .iter()
        .find(|(name, _)| *name == token)
        .map(|(_, sido)| *sido)
        .or_else(|| Sido::from_tag(token))
        .or_else(|| (token == SEOUL_COLLOQUIAL).then_some(Sido::Seoul))
}

/// Fetches the page for `round` and lists its rank-1 stores.
///
/// # Errors
///
/// [`ExtractError::Fetch`] on network or HTTP failure, otherwise anything
/// [`winner_stores_from_html`] returns.
pub async fn extract_winner_stores(
    client: &LottoClient,
    round: u32,
) -> Result<Vec<WinnerStore>, ExtractError> {
    let html = client
        .fetch_store_page(round)
        .await
        .map_err(|source| ExtractError::Fetch { round, source })?;
    winner_stores_from_html(round, &html)
}

/// Lists the rank-1 stores of an already decoded page, in table order.
///
/// # Errors
///
/// - [`ExtractError::Parse`] if the page is empty or has no markup.
/// - [`ExtractError::Table`] with [`TableError::MissingTable`] if no table
///   carries a 구분 header, or [`TableError::EmptyBody`] if the table has
///   no complete row.
pub fn winner_stores_from_html(round: u32, html: &str) -> Result<Vec<WinnerStore>, ExtractError> {
    let document = parse_page(round, html)?;
    let page = HtmlPage::new(&document);
    let table_error = |source| ExtractError::Table {
        round,
        rank: Rank::First,
        source,
    };

    let table = locate_winner_table(&page).ok_or_else(|| table_error(TableError::MissingTable))?;
    let columns = WinnerColumns::resolve(&page, table);

    let mut stores = Vec::new();
    let mut skipped = 0usize;
    for row in data_rows(&page, table) {
        let cells = row_cells(&page, row);
        if cells.len() <= columns.widest() {
            skipped += 1;
            continue;
        }
        let address = page.text(cells[columns.address]);
        let (sido, sigungu) = split_region(&address);
        stores.push(WinnerStore {
            round,
            rank: 1,
            store_name: page.text(cells[columns.name]),
            method: page.text(cells[columns.method]),
            address,
            sido,
            sigungu,
        });
    }

    if skipped > 0 {
        tracing::debug!(round, skipped, kept = stores.len(), "skipped incomplete winner rows");
    }
    if stores.is_empty() {
        return Err(table_error(TableError::EmptyBody));
    }

    tracing::debug!(round, stores = stores.len(), "winner stores extracted");
    Ok(stores)
}
