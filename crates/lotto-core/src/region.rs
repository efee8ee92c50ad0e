//! Region tags: the 17 first-level administrative regions plus the
//! `internet` and `other` sentinels.
//!
//! The short Korean tag strings (`서울`, `경기`, ...) and their order are part
//! of the snapshot format consumed downstream and must not change.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// A first-level administrative region (시/도), in canonical snapshot order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Sido {
    Seoul,
    Gyeonggi,
    Incheon,
    Busan,
    Daegu,
    Gwangju,
    Daejeon,
    Ulsan,
    Sejong,
    Gangwon,
    Chungbuk,
    Chungnam,
    Jeonbuk,
    Jeonnam,
    Gyeongbuk,
    Gyeongnam,
    Jeju,
}

impl Sido {
    /// Every region in canonical order.
    pub const ALL: [Sido; 17] = [
        Sido::Seoul,
        Sido::Gyeonggi,
        Sido::Incheon,
        Sido::Busan,
        Sido::Daegu,
        Sido::Gwangju,
        Sido::Daejeon,
        Sido::Ulsan,
        Sido::Sejong,
        Sido::Gangwon,
        Sido::Chungbuk,
        Sido::Chungnam,
        Sido::Jeonbuk,
        Sido::Jeonnam,
        Sido::Gyeongbuk,
        Sido::Gyeongnam,
        Sido::Jeju,
    ];

    /// The short tag written to snapshots.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Sido::Seoul => "서울",
            Sido::Gyeonggi => "경기",
            Sido::Incheon => "인천",
            Sido::Busan => "부산",
            Sido::Daegu => "대구",
            Sido::Gwangju => "광주",
            Sido::Daejeon => "대전",
            Sido::Ulsan => "울산",
            Sido::Sejong => "세종",
            Sido::Gangwon => "강원",
            Sido::Chungbuk => "충북",
            Sido::Chungnam => "충남",
            Sido::Jeonbuk => "전북",
            Sido::Jeonnam => "전남",
            Sido::Gyeongbuk => "경북",
            Sido::Gyeongnam => "경남",
            Sido::Jeju => "제주",
        }
    }

    /// Position of this region in [`Sido::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Exact match against the short tag.
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Sido> {
        Sido::ALL.into_iter().find(|s| s.as_str() == tag)
    }
}

impl fmt::Display for Sido {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Full legal region names and the region each resolves to, in match order.
///
/// Renamed provinces keep their legacy name as a separate entry so that both
/// spellings land on the same tag. Consumers must scan this slice in order.
pub const LEGAL_NAMES: [(&str, Sido); 20] = [
    ("서울특별시", Sido::Seoul),
    ("부산광역시", Sido::Busan),
    ("대구광역시", Sido::Daegu),
    ("인천광역시", Sido::Incheon),
    ("광주광역시", Sido::Gwangju),
    ("대전광역시", Sido::Daejeon),
    ("울산광역시", Sido::Ulsan),
    ("세종특별자치시", Sido::Sejong),
    ("경기도", Sido::Gyeonggi),
    ("강원특별자치도", Sido::Gangwon),
    ("강원도", Sido::Gangwon),
    ("충청북도", Sido::Chungbuk),
    ("충청남도", Sido::Chungnam),
    ("전북특별자치도", Sido::Jeonbuk),
    ("전라북도", Sido::Jeonbuk),
    ("전라남도", Sido::Jeonnam),
    ("경상북도", Sido::Gyeongbuk),
    ("경상남도", Sido::Gyeongnam),
    ("제주특별자치도", Sido::Jeju),
    ("제주도", Sido::Jeju),
];

/// Classification outcome for a single retailer address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegionTag {
    Sido(Sido),
    Internet,
    Other,
}

impl RegionTag {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            RegionTag::Sido(s) => s.as_str(),
            RegionTag::Internet => "internet",
            RegionTag::Other => "other",
        }
    }
}

impl fmt::Display for RegionTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Sido> for RegionTag {
    fn from(sido: Sido) -> Self {
        RegionTag::Sido(sido)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown region tag \"{0}\"")]
pub struct ParseRegionError(pub String);

impl FromStr for RegionTag {
    type Err = ParseRegionError;

    /// Accepts short tags, full legal names, and the sentinel spellings in
    /// either language, ignoring ASCII case and surrounding whitespace.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let lowered = trimmed.to_ascii_lowercase();
        match lowered.as_str() {
            "internet" | "online" | "인터넷" | "온라인" => return Ok(RegionTag::Internet),
            "other" | "기타" => return Ok(RegionTag::Other),
            _ => {}
        }
        if let Some(sido) = Sido::from_tag(trimmed) {
            return Ok(RegionTag::Sido(sido));
        }
        LEGAL_NAMES
            .iter()
            .find(|(name, _)| *name == trimmed)
            .map(|(_, sido)| RegionTag::Sido(*sido))
            .ok_or_else(|| ParseRegionError(s.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_is_in_declaration_order() {
        for (i, sido) in Sido::ALL.iter().enumerate() {
            assert_eq!(sido.index(), i, "{sido} out of order");
        }
    }

    #[test]
    fn tags_are_unique() {
        let mut tags: Vec<&str> = Sido::ALL.iter().map(|s| s.as_str()).collect();
        tags.sort_unstable();
        tags.dedup();
        assert_eq!(tags.len(), 17);
    }

    #[test]
    fn every_region_has_a_legal_name() {
        for sido in Sido::ALL {
            assert!(
                LEGAL_NAMES.iter().any(|(_, s)| *s == sido),
                "{sido} has no legal name entry"
            );
        }
    }

    #[test]
    fn parses_sentinels_case_insensitively() {
        assert_eq!("INTERNET".parse::<RegionTag>().unwrap(), RegionTag::Internet);
        assert_eq!(" Other ".parse::<RegionTag>().unwrap(), RegionTag::Other);
        assert_eq!("인터넷".parse::<RegionTag>().unwrap(), RegionTag::Internet);
        assert_eq!("기타".parse::<RegionTag>().unwrap(), RegionTag::Other);
    }

    #[test]
    fn parses_short_and_legal_names() {
        assert_eq!(
            "서울".parse::<RegionTag>().unwrap(),
            RegionTag::Sido(Sido::Seoul)
        );
        assert_eq!(
            "강원도".parse::<RegionTag>().unwrap(),
            RegionTag::Sido(Sido::Gangwon)
        );
        assert_eq!(
            "강원특별자치도".parse::<RegionTag>().unwrap(),
            RegionTag::Sido(Sido::Gangwon)
        );
    }

    #[test]
    fn rejects_unknown_tag() {
        let err = "평양".parse::<RegionTag>().unwrap_err();
        assert_eq!(err, ParseRegionError("평양".to_owned()));
    }

    #[test]
    fn display_uses_snapshot_spelling() {
        assert_eq!(RegionTag::Sido(Sido::Jeju).to_string(), "제주");
        assert_eq!(RegionTag::Internet.to_string(), "internet");
        assert_eq!(RegionTag::Other.to_string(), "other");
    }
}
