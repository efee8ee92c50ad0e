//! Reading and atomically writing the JSON data files.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use lotto_core::RoundResult;
use serde::Serialize;
use serde_json::Value;
use tempfile::NamedTempFile;

use crate::error::StoreError;
use crate::snapshot::{Snapshot, SnapshotMeta};
use crate::winners::WinnerStoresFile;

/// Reads a snapshot, keeping whatever rounds are individually valid.
///
/// Round keys that are not numbers, and round entries that fail to
/// deserialize (including ones whose totals do not add up), are skipped with
/// a warning so that one bad entry costs a single refetch rather than the
/// whole file.
///
/// # Errors
///
/// - [`StoreError::Io`] if the file cannot be read.
/// - [`StoreError::Json`] if it is not JSON at all.
/// - [`StoreError::NotAnObject`] if the top level is not an object.
pub fn read_snapshot(path: &Path) -> Result<Snapshot, StoreError> {
    let text = fs::read_to_string(path).map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let value: Value = serde_json::from_str(&text).map_err(|source| StoreError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    let Value::Object(mut root) = value else {
        return Err(StoreError::NotAnObject {
            path: path.to_path_buf(),
        });
    };

    let meta = root
        .remove("meta")
        .and_then(|meta| serde_json::from_value::<SnapshotMeta>(meta).ok());

    let mut snapshot = Snapshot {
        meta,
        ..Snapshot::default()
    };

    if let Some(Value::Object(rounds)) = root.remove("rounds") {
        for (key, entry) in rounds {
            let Ok(round) = key.trim().parse::<u32>() else {
                tracing::warn!(path = %path.display(), key, "skipping non-numeric round key");
                continue;
            };
            match serde_json::from_value::<RoundResult>(entry) {
                Ok(result) => {
                    snapshot.rounds.insert(round, result);
                }
                Err(e) => {
                    tracing::warn!(path = %path.display(), round, error = %e, "dropping invalid round entry");
                }
            }
        }
    }

    Ok(snapshot)
}

/// Loads the snapshot at `path`, treating a missing or unreadable file as
/// empty.
#[must_use]
pub fn load_snapshot(path: &Path) -> Snapshot {
    if !path.exists() {
        tracing::info!(path = %path.display(), "no existing snapshot, starting empty");
        return Snapshot::default();
    }
    match read_snapshot(path) {
        Ok(snapshot) => {
            tracing::debug!(path = %path.display(), rounds = snapshot.rounds.len(), "snapshot loaded");
            snapshot
        }
        Err(e) => {
            tracing::warn!(error = %e, "unreadable snapshot, starting empty");
            Snapshot::default()
        }
    }
}

/// Writes `snapshot` as pretty-printed JSON, replacing `path` atomically.
///
/// The document goes to a temporary file in the destination directory,
/// which is synced and then renamed over `path`. Parent directories are
/// created as needed. On error the previous file is left untouched.
///
/// # Errors
///
/// Returns [`StoreError::Io`] on any filesystem failure and
/// [`StoreError::Json`] if serialization fails.
pub fn save_snapshot(path: &Path, snapshot: &Snapshot) -> Result<(), StoreError> {
    write_json_atomic(path, snapshot)?;
    tracing::info!(path = %path.display(), rounds = snapshot.rounds.len(), "snapshot written");
    Ok(())
}

/// Writes `stores` the same way as [`save_snapshot`].
///
/// # Errors
///
/// Same as [`save_snapshot`].
pub fn save_winner_stores(path: &Path, stores: &WinnerStoresFile) -> Result<(), StoreError> {
    write_json_atomic(path, stores)?;
    tracing::info!(
        path = %path.display(),
        rounds = stores.by_round.len(),
        regions = stores.by_region.len(),
        failures = stores.meta.failures.len(),
        "winner stores written"
    );
    Ok(())
}

fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> Result<(), StoreError> {
    let io_err = |source: std::io::Error| StoreError::Io {
        path: path.to_path_buf(),
        source,
    };

    // `Path::parent` is `Some("")` for a bare file name.
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(dir).map_err(io_err)?;

    let mut tmp = NamedTempFile::new_in(dir).map_err(io_err)?;
    {
        let mut writer = BufWriter::new(tmp.as_file_mut());
        serde_json::to_writer_pretty(&mut writer, value).map_err(|source| StoreError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        writer.write_all(b"\n").map_err(io_err)?;
        writer.flush().map_err(io_err)?;
    }
    tmp.as_file().sync_all().map_err(io_err)?;
    tmp.persist(path).map_err(|e| io_err(e.error))?;

    // Directory sync is best effort; the file is already in place.
    if let Ok(dir_handle) = File::open(dir) {
        let _ = dir_handle.sync_all();
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use lotto_core::{RegionTag, Sido};
    use serde_json::json;

    use super::*;

    #[test]
    fn missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let snapshot = load_snapshot(&dir.path().join("absent.json"));
        assert_eq!(snapshot, Snapshot::default());
    }

    #[test]
    fn corrupt_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(read_snapshot(&path), Err(StoreError::Json { .. })));
        assert_eq!(load_snapshot(&path), Snapshot::default());

        fs::write(&path, "[1, 2, 3]").unwrap();
        assert!(matches!(
            read_snapshot(&path),
            Err(StoreError::NotAnObject { .. })
        ));
    }

    #[test]
    fn invalid_entries_are_dropped_individually() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("partial.json");
        let good = json!({
            "rank1": { "totalStores": 1, "bySido": { "서울": 1 }, "internet": 0, "other": 0 },
            "rank2": { "totalStores": 0, "bySido": {}, "internet": 0, "other": 0 }
        });
        let broken = json!({
            "rank1": { "totalStores": 9, "bySido": {}, "internet": 0, "other": 0 },
            "rank2": { "totalStores": 0, "bySido": {}, "internet": 0, "other": 0 }
        });
        let doc = json!({
            "meta": { "latestRound": 12, "range": 40, "updatedAt": "2024-01-01T00:00:00+09:00" },
            "rounds": { "11": good, "12": broken, "latest": good }
        });
        fs::write(&path, doc.to_string()).unwrap();

        let snapshot = read_snapshot(&path).unwrap();
        assert_eq!(snapshot.rounds.keys().copied().collect::<Vec<_>>(), vec![11]);
        assert_eq!(snapshot.rounds[&11].rank1.by_sido().get(Sido::Seoul), 1);
        assert_eq!(snapshot.meta.unwrap().latest_round, 12);
    }

    #[test]
    fn save_creates_dirs_and_writes_readable_korean() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data").join("region_1to2.json");

        let mut snapshot = Snapshot::default();
        let mut result = RoundResult::default();
        result.rank1.record(RegionTag::Sido(Sido::Gyeonggi));
        result.rank2.record(RegionTag::Internet);
        snapshot.insert(1250, result);

        save_snapshot(&path, &snapshot).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("\"경기\": 1"), "non-ASCII must be written verbatim:\n{text}");
        assert!(text.contains("\n  \"rounds\": {"), "2-space indent expected:\n{text}");

        assert_eq!(read_snapshot(&path).unwrap(), snapshot);
    }

    #[test]
    fn winner_stores_are_written_atomically() {
        use chrono::TimeZone;
        use lotto_core::{kst, WinnerStore};

        use crate::winners::{SourceUrls, WinnerStoresMeta};

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data").join("winner_stores.json");
        let now = kst().with_ymd_and_hms(2025, 1, 4, 22, 0, 0).single().unwrap();
        let source = SourceUrls {
            top_store_url_template: "t".to_owned(),
            by_win_url: "b".to_owned(),
            lotto_api_url_template: "a".to_owned(),
        };
        let store = WinnerStore {
            round: 1153,
            rank: 1,
            store_name: "행운복권".to_owned(),
            method: "수동".to_owned(),
            address: "경기 수원시 팔달구".to_owned(),
            sido: "경기".to_owned(),
            sigungu: "수원시".to_owned(),
        };
        let file =
            WinnerStoresFile::build(WinnerStoresMeta::new(1153, 1, &now, source, Vec::new()), &[store]);

        save_winner_stores(&path, &file).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("\"storeName\": \"행운복권\""), "{text}");
        let reloaded: WinnerStoresFile = serde_json::from_str(&text).unwrap();
        assert_eq!(reloaded, file);
        assert_eq!(fs::read_dir(path.parent().unwrap()).unwrap().count(), 1);
    }

    #[test]
    fn save_replaces_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snap.json");
        fs::write(&path, "old contents").unwrap();

        save_snapshot(&path, &Snapshot::default()).unwrap();
        let reloaded = read_snapshot(&path).unwrap();
        assert_eq!(reloaded, Snapshot::default());
        let leftovers = fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(leftovers, 1, "temporary file must not be left behind");
    }
}
