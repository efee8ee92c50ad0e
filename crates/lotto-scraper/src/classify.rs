//! Address → region classification.

use lotto_core::{RegionTag, Sido, LEGAL_NAMES};

/// Substrings that mark a purchase through the operator's online channel.
const ONLINE_MARKERS: [&str; 3] = ["동행복권", "dhlottery.co.kr", "인터넷"];

/// Maps a free-text retailer address to a region tag.
///
/// First match wins:
/// 1. online-channel marker anywhere → [`RegionTag::Internet`];
/// 2. full legal name prefix, checked in [`LEGAL_NAMES`] order;
/// 3. the first short tag, in canonical order, that starts or appears in
///    the address;
/// 4. [`RegionTag::Other`].
///
/// Never panics; the empty string is `Other`.
#[must_use]
pub fn classify(address: &str) -> RegionTag {
    let address = address.trim();
    if address.is_empty() {
        return RegionTag::Other;
    }

    let lowered = address.to_ascii_lowercase();
    if ONLINE_MARKERS.iter().any(|marker| lowered.contains(marker)) {
        return RegionTag::Internet;
    }

    if let Some((_, sido)) = LEGAL_NAMES
        .iter()
        .find(|(prefix, _)| address.starts_with(prefix))
    {
        return RegionTag::Sido(*sido);
    }

    Sido::ALL
        .into_iter()
        .find(|sido| {
            let tag = sido.as_str();
            address.starts_with(tag) || address.contains(tag)
        })
        .map_or(RegionTag::Other, RegionTag::Sido)
}

/// [`classify`] for a cell that may be missing.
#[must_use]
pub fn classify_opt(address: Option<&str>) -> RegionTag {
    address.map_or(RegionTag::Other, classify)
}
