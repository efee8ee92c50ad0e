//! Per-rank retailer counts and the per-round pair of them.

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

use crate::region::{RegionTag, Sido};

/// Retailer counts keyed by region.
///
/// Serializes as a JSON object with all 17 short tags present, in canonical
/// order, regardless of which counts are non-zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SidoCounts([u32; 17]);

impl SidoCounts {
    #[must_use]
    pub fn get(&self, sido: Sido) -> u32 {
        self.0[sido.index()]
    }

    pub fn set(&mut self, sido: Sido, count: u32) {
        self.0[sido.index()] = count;
    }

    pub fn increment(&mut self, sido: Sido) {
        let slot = &mut self.0[sido.index()];
        *slot = slot.saturating_add(1);
    }

    /// Sum over all regions.
    #[must_use]
    pub fn total(&self) -> u32 {
        self.0.iter().fold(0u32, |acc, n| acc.saturating_add(*n))
    }

    pub fn iter(&self) -> impl Iterator<Item = (Sido, u32)> + '_ {
        Sido::ALL.into_iter().map(|s| (s, self.get(s)))
    }
}

impl Serialize for SidoCounts {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(Sido::ALL.len()))?;
        for (sido, count) in self.iter() {
            map.serialize_entry(sido.as_str(), &count)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for SidoCounts {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct CountsVisitor;

        impl<'de> Visitor<'de> for CountsVisitor {
            type Value = SidoCounts;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of region tag to count")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<SidoCounts, A::Error> {
                let mut counts = SidoCounts::default();
                while let Some((key, count)) = access.next_entry::<String, u32>()? {
                    let sido = Sido::from_tag(&key).ok_or_else(|| {
                        serde::de::Error::custom(format!("unknown region tag \"{key}\""))
                    })?;
                    counts.set(sido, count);
                }
                Ok(counts)
            }
        }

        deserializer.deserialize_map(CountsVisitor)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("totalStores {total} does not match region {regions} + internet {internet} + other {other}")]
pub struct SummaryError {
    pub total: u32,
    pub regions: u32,
    pub internet: u32,
    pub other: u32,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawRankSummary {
    total_stores: u32,
    #[serde(default)]
    by_sido: SidoCounts,
    #[serde(default)]
    internet: u32,
    #[serde(default)]
    other: u32,
}

/// Winning-retailer counts for one rank of one round.
///
/// `total_stores` always equals the region sum plus `internet` plus `other`;
/// the only way to grow a summary is [`RankSummary::record`], and
/// deserialization rejects documents that break the equality.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawRankSummary")]
pub struct RankSummary {
    total_stores: u32,
    by_sido: SidoCounts,
    internet: u32,
    other: u32,
}

impl TryFrom<RawRankSummary> for RankSummary {
    type Error = SummaryError;

    fn try_from(raw: RawRankSummary) -> Result<Self, Self::Error> {
        let regions = raw.by_sido.total();
        let expected = regions
            .saturating_add(raw.internet)
            .saturating_add(raw.other);
        if expected != raw.total_stores {
            return Err(SummaryError {
                total: raw.total_stores,
                regions,
                internet: raw.internet,
                other: raw.other,
            });
        }
        Ok(Self {
            total_stores: raw.total_stores,
            by_sido: raw.by_sido,
            internet: raw.internet,
            other: raw.other,
        })
    }
}

impl RankSummary {
    /// Counts one retailer under `tag`.
    pub fn record(&mut self, tag: RegionTag) {
        self.total_stores = self.total_stores.saturating_add(1);
        match tag {
            RegionTag::Sido(sido) => self.by_sido.increment(sido),
            RegionTag::Internet => self.internet = self.internet.saturating_add(1),
            RegionTag::Other => self.other = self.other.saturating_add(1),
        }
    }

    #[must_use]
    pub fn total_stores(&self) -> u32 {
        self.total_stores
    }

    #[must_use]
    pub fn by_sido(&self) -> &SidoCounts {
        &self.by_sido
    }

    #[must_use]
    pub fn internet(&self) -> u32 {
        self.internet
    }

    #[must_use]
    pub fn other(&self) -> u32 {
        self.other
    }

    #[must_use]
    pub fn count(&self, tag: RegionTag) -> u32 {
        match tag {
            RegionTag::Sido(sido) => self.by_sido.get(sido),
            RegionTag::Internet => self.internet,
            RegionTag::Other => self.other,
        }
    }

    /// `true` when at least one row was counted and every row fell into
    /// `other`: no named region and no online sale.
    #[must_use]
    pub fn is_all_other(&self) -> bool {
        self.total_stores > 0 && self.by_sido.total() == 0 && self.other == self.total_stores
    }
}

/// Prize rank covered by the retailer listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rank {
    First,
    Second,
}

impl Rank {
    /// Snapshot field name (`rank1` / `rank2`).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Rank::First => "rank1",
            Rank::Second => "rank2",
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rank-1 and rank-2 summaries for one round.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundResult {
    pub rank1: RankSummary,
    pub rank2: RankSummary,
}

impl RoundResult {
    #[must_use]
    pub fn get(&self, rank: Rank) -> &RankSummary {
        match rank {
            Rank::First => &self.rank1,
            Rank::Second => &self.rank2,
        }
    }
}
