//! Rolling-window JSON snapshot of per-round region counts, plus the
//! winner-stores document.

pub mod error;
pub mod io;
pub mod snapshot;
pub mod winners;

pub use error::StoreError;
pub use io::{load_snapshot, read_snapshot, save_snapshot, save_winner_stores};
pub use snapshot::{RoundWindow, Snapshot, SnapshotMeta};
pub use winners::{RoundFailureNote, SourceUrls, WinnerStoresFile, WinnerStoresMeta};
