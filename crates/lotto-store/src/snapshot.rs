//! In-memory snapshot and the sliding round window.

use std::collections::BTreeMap;
use std::ops::RangeInclusive;

use chrono::{DateTime, FixedOffset, SecondsFormat};
use lotto_core::RoundResult;
use serde::{Deserialize, Serialize};

/// The trailing `range` rounds ending at `latest`, clamped at round 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundWindow {
    start: u32,
    end: u32,
}

impl RoundWindow {
    /// A window of zero rounds is widened to one.
    #[must_use]
    pub fn new(latest: u32, range: u32) -> Self {
        let end = latest.max(1);
        let start = end.saturating_sub(range.max(1) - 1).max(1);
        Self { start, end }
    }

    #[must_use]
    pub fn start(&self) -> u32 {
        self.start
    }

    #[must_use]
    pub fn end(&self) -> u32 {
        self.end
    }

    #[must_use]
    pub fn contains(&self, round: u32) -> bool {
        (self.start..=self.end).contains(&round)
    }

    /// Rounds in ascending order.
    #[must_use]
    pub fn rounds(&self) -> RangeInclusive<u32> {
        self.start..=self.end
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotMeta {
    pub latest_round: u32,
    pub range: u32,
    /// ISO-8601, seconds precision, KST offset.
    pub updated_at: String,
}

/// The persisted document: run metadata plus one entry per round.
///
/// Rounds are keyed numerically so they serialize in ascending order as
/// string keys (`"1211"`, `"1212"`, ...).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub meta: Option<SnapshotMeta>,
    #[serde(default)]
    pub rounds: BTreeMap<u32, RoundResult>,
}

impl Snapshot {
    /// Drops every round outside `window`, returning how many were removed.
    pub fn retain_window(&mut self, window: &RoundWindow) -> usize {
        let before = self.rounds.len();
        self.rounds.retain(|round, _| window.contains(*round));
        before - self.rounds.len()
    }

    /// Rounds of `window` that still need fetching, ascending. With
    /// `refresh`, every round in the window is returned.
    #[must_use]
    pub fn pending_rounds(&self, window: &RoundWindow, refresh: bool) -> Vec<u32> {
        window
            .rounds()
            .filter(|round| refresh || !self.rounds.contains_key(round))
            .collect()
    }

    /// Stores `result` for `round`, returning the previous value.
    pub fn insert(&mut self, round: u32, result: RoundResult) -> Option<RoundResult> {
        self.rounds.insert(round, result)
    }

    /// Records the run's window and timestamp.
    ///
    /// `latestRound` is the newest stored round at or below `latest_round`,
    /// so a failed fetch of the newest round leaves the snapshot behind the
    /// remote and the next run retries it.
    pub fn stamp(&mut self, latest_round: u32, range: u32, now: &DateTime<FixedOffset>) {
        let covered = self
            .rounds
            .range(..=latest_round)
            .next_back()
            .map_or(0, |(&round, _)| round);
        self.meta = Some(SnapshotMeta {
            latest_round: covered,
            range,
            updated_at: now.to_rfc3339_opts(SecondsFormat::Secs, false),
        });
    }

    /// Latest round this snapshot actually covers: the lower of
    /// `meta.latestRound` and the highest stored round, or whichever of the
    /// two exists.
    #[must_use]
    pub fn latest_local(&self) -> Option<u32> {
        let claimed = self.meta.as_ref().map(|meta| meta.latest_round);
        let stored = self.rounds.keys().next_back().copied();
        match (claimed, stored) {
            (Some(claimed), Some(stored)) => Some(claimed.min(stored)),
            (claimed, stored) => claimed.or(stored),
        }
    }
}
