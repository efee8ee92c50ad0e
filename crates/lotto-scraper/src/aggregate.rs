//! Per-table retailer counting.

use lotto_core::RankSummary;
use thiserror::Error;

use crate::classify::classify;
use crate::document::Document;
use crate::table::{data_rows, row_cells, TableHandle};

/// Structural mismatch between a table and the expected retailer layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TableError {
    #[error("retailer table not found")]
    MissingTable,
    #[error("no header cell mentions a location/address column")]
    MissingHeader,
    #[error("table has a header but no data rows")]
    EmptyBody,
}

/// Counts the retailers of one table by region.
///
/// Every data row whose address cell exists is classified and counted;
/// rows with fewer cells than the address column are skipped.
///
/// # Errors
///
/// - [`TableError::MissingTable`] if `table` is `None`.
/// - [`TableError::MissingHeader`] if the address column cannot be resolved.
/// - [`TableError::EmptyBody`] if the table has no data rows at all.
pub fn aggregate<D: Document>(doc: &D, table: Option<D::Node>) -> Result<RankSummary, TableError> {
    let node = table.ok_or(TableError::MissingTable)?;
    let handle = TableHandle::resolve(doc, node)?;

    let rows = data_rows(doc, handle.node);
    if rows.is_empty() {
        return Err(TableError::EmptyBody);
    }

    let mut summary = RankSummary::default();
    let mut skipped = 0usize;
    for row in rows {
        let cells = row_cells(doc, row);
        let Some(cell) = cells.get(handle.address_column) else {
            skipped += 1;
            continue;
        };
        summary.record(classify(&doc.text(*cell)));
    }

    if skipped > 0 {
        tracing::debug!(
            skipped,
            counted = summary.total_stores(),
            column = handle.address_column,
            "skipped rows shorter than the address column"
        );
    }

    Ok(summary)
}
