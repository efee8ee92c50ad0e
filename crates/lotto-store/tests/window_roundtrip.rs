use chrono::TimeZone;
use lotto_core::{kst, RegionTag, RoundResult, Sido};
use lotto_store::{load_snapshot, save_snapshot, RoundWindow, Snapshot};

fn seoul_round() -> RoundResult {
    let mut result = RoundResult::default();
    result.rank1.record(RegionTag::Sido(Sido::Seoul));
    result.rank2.record(RegionTag::Sido(Sido::Busan));
    result
}

#[test]
fn window_slides_by_one_round_across_a_save_and_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data/region_1to2.json");

    let mut seeded = Snapshot::default();
    for round in 1210..=1249 {
        seeded.insert(round, seoul_round());
    }
    let then = kst().with_ymd_and_hms(2024, 11, 30, 22, 0, 0).single().unwrap();
    seeded.stamp(1249, 40, &then);
    save_snapshot(&path, &seeded).unwrap();

    let mut snapshot = load_snapshot(&path);
    assert_eq!(snapshot.rounds.len(), 40);

    let window = RoundWindow::new(1250, 40);
    snapshot.retain_window(&window);
    let pending = snapshot.pending_rounds(&window, false);
    assert_eq!(pending, vec![1250]);
    for round in pending {
        snapshot.insert(round, seoul_round());
    }
    let now = kst().with_ymd_and_hms(2024, 12, 7, 22, 0, 0).single().unwrap();
    snapshot.stamp(window.end(), 40, &now);
    save_snapshot(&path, &snapshot).unwrap();

    let reloaded = load_snapshot(&path);
    let rounds: Vec<u32> = reloaded.rounds.keys().copied().collect();
    assert_eq!(rounds, (1211..=1250).collect::<Vec<_>>());
    let meta = reloaded.meta.unwrap();
    assert_eq!(meta.latest_round, 1250);
    assert_eq!(meta.range, 40);
    assert_eq!(meta.updated_at, "2024-12-07T22:00:00+09:00");
}

#[test]
fn file_written_by_other_tools_with_string_keys_loads() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("legacy.json");
    let zero = serde_json::json!({ "totalStores": 0, "bySido": {}, "internet": 0, "other": 0 });
    let doc = serde_json::json!({
        "meta": { "latestRound": 3, "range": 40, "updatedAt": "2024-01-01T00:00:00+09:00" },
        "rounds": {
            "3": { "rank1": zero, "rank2": zero },
            "1": { "rank1": zero, "rank2": zero }
        }
    });
    std::fs::write(&path, serde_json::to_string_pretty(&doc).unwrap()).unwrap();

    let snapshot = load_snapshot(&path);
    assert_eq!(snapshot.rounds.keys().copied().collect::<Vec<_>>(), vec![1, 3]);
    assert_eq!(snapshot.latest_local(), Some(3));
}
