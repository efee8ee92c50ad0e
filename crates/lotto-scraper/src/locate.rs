//! Finds the rank-1 and rank-2 retailer tables on a result page.

use std::sync::LazyLock;

use lotto_core::Rank;
use regex::Regex;

use crate::document::Document;
use crate::table::is_candidate;

/// How many `<table>` elements after a rank label are inspected before the
/// proximity search gives up.
pub const MAX_TABLES_AFTER_LABEL: usize = 6;

static RANK1_LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"1\s*등\s*배출점").expect("valid rank-1 label regex"));
static RANK2_LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"2\s*등\s*배출점").expect("valid rank-2 label regex"));

fn label_for(rank: Rank) -> &'static Regex {
    match rank {
        Rank::First => &RANK1_LABEL,
        Rank::Second => &RANK2_LABEL,
    }
}

/// Tables resolved for each rank. Either may be missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocatedTables<N> {
    pub rank1: Option<N>,
    pub rank2: Option<N>,
}

impl<N: Copy> LocatedTables<N> {
    #[must_use]
    pub fn get(&self, rank: Rank) -> Option<N> {
        match rank {
            Rank::First => self.rank1,
            Rank::Second => self.rank2,
        }
    }
}

/// Locates the retailer tables for both ranks.
///
/// A table qualifies only if its header names a location/address column.
/// Each rank is first searched near its label text; when that fails for
/// either rank and the page has at least two qualifying tables, the first
/// two in document order fill the gaps. The same table is never returned
/// for both ranks.
///
/// The positional fallback cannot tell a genuine retailer table from an
/// unrelated one that happens to carry an address header, so a page with
/// one real table plus such a lookalike yields a wrong but plausible rank.
pub fn locate<D: Document>(doc: &D) -> LocatedTables<D::Node> {
    let mut rank1 = near_label(doc, Rank::First);
    let mut rank2 = near_label(doc, Rank::Second);

    if rank1.is_some() && rank2.is_some() {
        return LocatedTables { rank1, rank2 };
    }

    let candidates: Vec<D::Node> = doc
        .elements_by_tag("table")
        .into_iter()
        .filter(|table| is_candidate(doc, *table))
        .collect();

    if candidates.len() < 2 {
        tracing::debug!(
            candidates = candidates.len(),
            rank1_found = rank1.is_some(),
            rank2_found = rank2.is_some(),
            "too few candidate tables for positional fallback"
        );
        return LocatedTables { rank1, rank2 };
    }

    if rank1.is_none() {
        rank1 = positional(&candidates, 0, rank2);
        tracing::debug!(rank = %Rank::First, strategy = "positional", "rank table assigned by fallback");
    }
    if rank2.is_none() {
        rank2 = positional(&candidates, 1, rank1);
        tracing::debug!(rank = %Rank::Second, strategy = "positional", "rank table assigned by fallback");
    }

    LocatedTables { rank1, rank2 }
}

/// Walks forward from the label of `rank` through at most
/// [`MAX_TABLES_AFTER_LABEL`] tables, returning the first candidate.
fn near_label<D: Document>(doc: &D, rank: Rank) -> Option<D::Node> {
    near_label_where(doc, rank, is_candidate)
}

/// [`near_label`] with a caller-chosen test for which tables qualify.
pub(crate) fn near_label_where<D, F>(doc: &D, rank: Rank, qualifies: F) -> Option<D::Node>
where
    D: Document,
    F: Fn(&D, D::Node) -> bool,
{
    let Some(text) = doc.find_text(label_for(rank)) else {
        tracing::debug!(%rank, "rank label not found");
        return None;
    };
    let mut cursor = doc.parent(text).unwrap_or(text);

    for step in 1..=MAX_TABLES_AFTER_LABEL {
        let table = doc.find_next_by_tag(cursor, "table")?;
        if qualifies(doc, table) {
            tracing::debug!(%rank, strategy = "label", step, "rank table found near label");
            return Some(table);
        }
        cursor = table;
    }

    tracing::debug!(%rank, "no qualifying table within label search bound");
    None
}

/// Candidate at `preferred`, or the next one (wrapping) that is not `taken`.
fn positional<N: Copy + PartialEq>(candidates: &[N], preferred: usize, taken: Option<N>) -> Option<N> {
    candidates
        .iter()
        .cycle()
        .skip(preferred)
        .take(candidates.len())
        .copied()
        .find(|candidate| Some(*candidate) != taken)
}
