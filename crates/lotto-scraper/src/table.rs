//! Header and row access for retailer tables.

use crate::aggregate::TableError;
use crate::document::Document;

/// Header tokens that mark the address column ("location", "address").
pub(crate) const ADDRESS_HEADER_TOKENS: [&str; 2] = ["소재지", "주소"];

/// A located retailer table plus its resolved address column.
///
/// Only meaningful together with the document the node came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableHandle<N> {
    pub node: N,
    pub address_column: usize,
}

impl<N: Copy> TableHandle<N> {
    /// Resolves the address column of `node`.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::MissingHeader`] if no header cell mentions a
    /// location/address token.
    pub fn resolve<D>(doc: &D, node: N) -> Result<Self, TableError>
    where
        D: Document<Node = N>,
    {
        address_column(doc, node)
            .map(|address_column| Self {
                node,
                address_column,
            })
            .ok_or(TableError::MissingHeader)
    }
}

/// Header cells of `table`: `<thead>` cells when present, else the cells of
/// the first row that contains a `<th>`.
pub(crate) fn header_cells<D: Document>(doc: &D, table: D::Node) -> Vec<D::Node> {
    let thead = doc.select_within(table, "thead th, thead td");
    if !thead.is_empty() {
        return thead;
    }
    doc.select_within(table, "tr")
        .into_iter()
        .find(|row| !doc.select_within(*row, "th").is_empty())
        .map(|row| doc.select_within(row, "th, td"))
        .unwrap_or_default()
}

/// Index of the first header cell mentioning a location/address token.
pub(crate) fn address_column<D: Document>(doc: &D, table: D::Node) -> Option<usize> {
    header_cells(doc, table).into_iter().position(|cell| {
        let text = doc.text(cell);
        ADDRESS_HEADER_TOKENS.iter().any(|token| text.contains(token))
    })
}

pub(crate) fn is_candidate<D: Document>(doc: &D, table: D::Node) -> bool {
    address_column(doc, table).is_some()
}

/// Body rows of `table`: rows with at least one `<td>`, preferring `<tbody>`.
pub(crate) fn data_rows<D: Document>(doc: &D, table: D::Node) -> Vec<D::Node> {
    let mut rows = doc.select_within(table, "tbody tr");
    if rows.is_empty() {
        rows = doc.select_within(table, "tr");
    }
    rows.retain(|row| !doc.select_within(*row, "td").is_empty());
    rows
}

/// Cells of one row, header-style cells included so indices line up with
/// the header.
pub(crate) fn row_cells<D: Document>(doc: &D, row: D::Node) -> Vec<D::Node> {
    doc.select_within(row, "th, td")
}

#[cfg(test)]
mod tests {
    use scraper::Html;

    use super::*;
    use crate::document::HtmlPage;

    fn first_table(html: &Html) -> (HtmlPage<'_>, crate::document::DomNode<'_>) {
        let page = HtmlPage::new(html);
        let table = page.elements_by_tag("table")[0];
        (page, table)
    }

    #[test]
    fn resolves_column_from_thead() {
        let html = Html::parse_document(
            "<table><thead><tr><th>번호</th><th>상호명</th><th>구분</th><th>소재지</th></tr></thead>
             <tbody><tr><td>1</td><td>a</td><td>자동</td><td>서울</td></tr></tbody></table>",
        );
        let (page, table) = first_table(&html);
        let handle = TableHandle::resolve(&page, table).unwrap();
        assert_eq!(handle.address_column, 3);
        assert_eq!(data_rows(&page, table).len(), 1);
    }

    #[test]
    fn resolves_column_from_first_th_row_without_thead() {
        let html = Html::parse_document(
            "<table><tr><th>상호</th><th>주소</th></tr><tr><td>a</td><td>경기도</td></tr></table>",
        );
        let (page, table) = first_table(&html);
        assert_eq!(address_column(&page, table), Some(1));
        // The header row has no <td>, so only one data row remains.
        assert_eq!(data_rows(&page, table).len(), 1);
    }

    #[test]
    fn table_without_address_header_is_not_a_candidate() {
        let html = Html::parse_document(
            "<table><tr><th>회차</th><th>당첨금</th></tr><tr><td>1</td><td>2</td></tr></table>",
        );
        let (page, table) = first_table(&html);
        assert!(!is_candidate(&page, table));
        assert!(matches!(
            TableHandle::resolve(&page, table),
            Err(TableError::MissingHeader)
        ));
    }

    #[test]
    fn address_token_only_in_body_does_not_count() {
        let html = Html::parse_document(
            "<table><tr><td>소재지</td><td>x</td></tr></table>",
        );
        let (page, table) = first_table(&html);
        assert!(!is_candidate(&page, table));
    }
}
