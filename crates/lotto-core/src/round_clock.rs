//! Offline estimate of the latest drawn round.
//!
//! Draws happen every Saturday evening KST, so the latest round number can be
//! computed from a known anchor draw without touching the network.

use chrono::{DateTime, Datelike, FixedOffset, TimeZone, Timelike, Utc, Weekday};

/// Round drawn on [`ANCHOR_DATE`].
pub const ANCHOR_ROUND: u32 = 1152;

/// 2024-12-28 20:00 KST, as `(year, month, day, hour)`.
const ANCHOR_DATE: (i32, u32, u32, u32) = (2024, 12, 28, 20);

/// Results are treated as published from this hour (KST) on draw day.
const RESULTS_PUBLISHED_HOUR: u32 = 21;

const KST_OFFSET_SECS: i32 = 9 * 3600;

/// The fixed +09:00 offset used for every timestamp the system writes.
///
/// # Panics
///
/// Never in practice: +09:00 is within chrono's valid offset range.
#[must_use]
pub fn kst() -> FixedOffset {
    FixedOffset::east_opt(KST_OFFSET_SECS).expect("+09:00 is a valid offset")
}

#[must_use]
pub fn now_kst() -> DateTime<FixedOffset> {
    Utc::now().with_timezone(&kst())
}

fn anchor() -> DateTime<FixedOffset> {
    let (y, m, d, h) = ANCHOR_DATE;
    kst()
        .with_ymd_and_hms(y, m, d, h, 0, 0)
        .single()
        .expect("anchor date is a valid KST instant")
}

/// Estimates the latest round whose results are published at `now`.
///
/// Counts whole weeks since the anchor draw; on a Saturday before 21:00 KST
/// the current week's draw is not yet out, so the estimate drops by one.
/// Never returns less than 1.
#[must_use]
pub fn estimate_latest_round<Tz: TimeZone>(now: &DateTime<Tz>) -> u32 {
    let now = now.with_timezone(&kst());
    let elapsed = now.signed_duration_since(anchor());
    let weeks = elapsed.num_seconds().div_euclid(86_400).div_euclid(7);

    let mut estimate = i64::from(ANCHOR_ROUND) + weeks;
    if now.weekday() == Weekday::Sat && now.hour() < RESULTS_PUBLISHED_HOUR {
        estimate -= 1;
    }

    u32::try_from(estimate.max(1)).unwrap_or(u32::MAX)
}
