//! Individual rank-1 winning stores, as listed on the retailer page.

use serde::{Deserialize, Serialize};

/// `sido` value recorded for wins through the operator's website.
pub const ONLINE_REGION: &str = "온라인";

/// Region key for rows whose address yields no region at all.
pub const UNKNOWN_REGION: &str = "기타";

/// One row of the rank-1 table.
///
/// `sido` is the short region tag when the address starts with a known
/// region name, [`ONLINE_REGION`] for online sales, the address's first
/// token verbatim otherwise, and empty for an empty address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WinnerStore {
    pub round: u32,
    pub rank: u8,
    pub store_name: String,
    /// Purchase method column (자동, 수동, 반자동).
    pub method: String,
    pub address: String,
    pub sido: String,
    pub sigungu: String,
}

impl WinnerStore {
    /// Key this row is grouped under when listed by region.
    #[must_use]
    pub fn region_key(&self) -> &str {
        if self.sido.is_empty() {
            UNKNOWN_REGION
        } else {
            &self.sido
        }
    }
}

/// A [`WinnerStore`] listed under its region, so the region is implied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionWinner {
    pub round: u32,
    pub rank: u8,
    pub store_name: String,
    pub method: String,
    pub address: String,
    pub sigungu: String,
}

impl From<&WinnerStore> for RegionWinner {
    fn from(store: &WinnerStore) -> Self {
        Self {
            round: store.round,
            rank: store.rank,
            store_name: store.store_name.clone(),
            method: store.method.clone(),
            address: store.address.clone(),
            sigungu: store.sigungu.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn store(sido: &str) -> WinnerStore {
        WinnerStore {
            round: 1150,
            rank: 1,
            store_name: "복권명당".to_owned(),
            method: "자동".to_owned(),
            address: "서울 강남구 테헤란로 1".to_owned(),
            sido: sido.to_owned(),
            sigungu: "강남구".to_owned(),
        }
    }

    #[test]
    fn empty_sido_groups_under_unknown_region() {
        assert_eq!(store("서울").region_key(), "서울");
        assert_eq!(store("").region_key(), UNKNOWN_REGION);
    }

    #[test]
    fn serializes_camel_case() {
        let value = serde_json::to_value(store("서울")).unwrap();
        assert_eq!(
            value,
            json!({
                "round": 1150,
                "rank": 1,
                "storeName": "복권명당",
                "method": "자동",
                "address": "서울 강남구 테헤란로 1",
                "sido": "서울",
                "sigungu": "강남구"
            })
        );

        let listed = serde_json::to_value(RegionWinner::from(&store("서울"))).unwrap();
        assert!(listed.get("sido").is_none());
        assert_eq!(listed["storeName"], "복권명당");
    }
}
