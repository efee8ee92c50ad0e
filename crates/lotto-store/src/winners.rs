//! The winner-stores document: every rank-1 store of the trailing rounds,
//! listed by round and by region.

use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset, SecondsFormat};
use lotto_core::{RegionWinner, WinnerStore};
use serde::{Deserialize, Serialize};

/// Where the data came from, recorded for readers of the file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceUrls {
    /// Retailer page URL with a `{drwNo}` placeholder.
    pub top_store_url_template: String,
    pub by_win_url: String,
    /// Draw-lookup URL with a `{drwNo}` placeholder.
    pub lotto_api_url_template: String,
}

/// A round that produced no rows, with the reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundFailureNote {
    pub round: u32,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WinnerStoresMeta {
    /// ISO-8601, seconds precision, KST offset.
    pub updated_at: String,
    pub range: u32,
    pub latest_round: u32,
    pub source: SourceUrls,
    #[serde(default)]
    pub failures: Vec<RoundFailureNote>,
}

impl WinnerStoresMeta {
    #[must_use]
    pub fn new(
        latest_round: u32,
        range: u32,
        now: &DateTime<FixedOffset>,
        source: SourceUrls,
        failures: Vec<RoundFailureNote>,
    ) -> Self {
        Self {
            updated_at: now.to_rfc3339_opts(SecondsFormat::Secs, false),
            range,
            latest_round,
            source,
            failures,
        }
    }
}

/// The persisted document. It is rebuilt from scratch on every run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WinnerStoresFile {
    pub meta: WinnerStoresMeta,
    /// Stores per round, in table order. Rounds without rows are absent.
    pub by_round: BTreeMap<u32, Vec<WinnerStore>>,
    /// Stores per region key, newest round first.
    pub by_region: BTreeMap<String, Vec<RegionWinner>>,
}

impl WinnerStoresFile {
    /// Groups `stores` by round and by [`WinnerStore::region_key`].
    #[must_use]
    pub fn build(meta: WinnerStoresMeta, stores: &[WinnerStore]) -> Self {
        let mut by_round: BTreeMap<u32, Vec<WinnerStore>> = BTreeMap::new();
        let mut by_region: BTreeMap<String, Vec<RegionWinner>> = BTreeMap::new();

        for store in stores {
            by_round.entry(store.round).or_default().push(store.clone());
            by_region
                .entry(store.region_key().to_owned())
                .or_default()
                .push(RegionWinner::from(store));
        }
        // Stable, so stores of one round keep their table order.
        for listed in by_region.values_mut() {
            listed.sort_by(|a, b| b.round.cmp(&a.round));
        }

        Self {
            meta,
            by_round,
            by_region,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use lotto_core::{kst, UNKNOWN_REGION};

    use super::*;

    fn store(round: u32, name: &str, sido: &str) -> WinnerStore {
        WinnerStore {
            round,
            rank: 1,
            store_name: name.to_owned(),
            method: "자동".to_owned(),
            address: format!("{sido} 어딘가"),
            sido: sido.to_owned(),
            sigungu: "어딘가".to_owned(),
        }
    }

    fn meta() -> WinnerStoresMeta {
        let now = kst().with_ymd_and_hms(2025, 1, 4, 21, 30, 0).single().unwrap();
        let source = SourceUrls {
            top_store_url_template: "t".to_owned(),
            by_win_url: "b".to_owned(),
            lotto_api_url_template: "a".to_owned(),
        };
        WinnerStoresMeta::new(12, 3, &now, source, vec![RoundFailureNote {
            round: 11,
            reason: "timeout".to_owned(),
        }])
    }

    #[test]
    fn groups_by_round_and_region_newest_first() {
        let stores = [
            store(10, "a", "서울"),
            store(10, "b", "부산"),
            store(12, "c", "서울"),
            store(12, "d", "서울"),
            store(12, "e", ""),
        ];
        let file = WinnerStoresFile::build(meta(), &stores);

        assert_eq!(file.by_round.keys().copied().collect::<Vec<_>>(), vec![10, 12]);
        assert_eq!(file.by_round[&12].len(), 3);

        let seoul: Vec<(u32, &str)> = file.by_region["서울"]
            .iter()
            .map(|w| (w.round, w.store_name.as_str()))
            .collect();
        assert_eq!(seoul, vec![(12, "c"), (12, "d"), (10, "a")]);
        assert_eq!(file.by_region[UNKNOWN_REGION].len(), 1);
        assert_eq!(file.by_region["부산"][0].store_name, "b");
    }

    #[test]
    fn serializes_with_string_round_keys() {
        let file = WinnerStoresFile::build(meta(), &[store(12, "c", "서울")]);
        let value = serde_json::to_value(&file).unwrap();

        assert_eq!(value["meta"]["updatedAt"], "2025-01-04T21:30:00+09:00");
        assert_eq!(value["meta"]["latestRound"], 12);
        assert_eq!(value["meta"]["source"]["byWinUrl"], "b");
        assert_eq!(value["meta"]["failures"][0]["reason"], "timeout");
        assert_eq!(value["byRound"]["12"][0]["storeName"], "c");
        assert_eq!(value["byRegion"]["서울"][0]["round"], 12);

        let back: WinnerStoresFile = serde_json::from_value(value).unwrap();
        assert_eq!(back, file);
    }
}
