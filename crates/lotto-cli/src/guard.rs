//! Offline freshness check: is there a newer round than the local snapshot?
//!
//! Used by CI to skip scraping when nothing new has been drawn. The remote
//! side comes from the round clock, so this never makes a request.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Values of `FORCE_UPDATE` that force an update.
const FORCE_VALUES: [&str; 5] = ["1", "true", "yes", "y", "on"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Reason {
    Forced,
    NoLocalData,
    Behind,
    UpToDate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct GuardDecision {
    pub needs_update: bool,
    pub latest_remote: u32,
    pub latest_local: Option<u32>,
    pub reason: Reason,
}

impl GuardDecision {
    pub(crate) fn message(&self) -> String {
        let remote = self.latest_remote;
        match (self.reason, self.latest_local) {
            (Reason::Forced, _) => "[GUARD] Force update enabled.".to_owned(),
            (Reason::NoLocalData, _) | (_, None) => {
                format!("[GUARD] No local data. Update needed (Target: {remote}).")
            }
            (Reason::Behind, Some(local)) => {
                format!("[GUARD] Update needed: Remote({remote}) > Local({local})")
            }
            (Reason::UpToDate, Some(local)) => {
                format!("[GUARD] Up to date: Remote({remote}) <= Local({local})")
            }
        }
    }
}

pub(crate) fn is_force_update(value: Option<&str>) -> bool {
    value.is_some_and(|v| FORCE_VALUES.contains(&v.trim().to_ascii_lowercase().as_str()))
}

/// Highest latest-round found across `paths`. Missing and unreadable files
/// are ignored.
pub(crate) fn read_local_latest(paths: &[PathBuf]) -> Option<u32> {
    paths
        .iter()
        .filter(|path| path.exists())
        .filter_map(|path| match lotto_store::read_snapshot(path) {
            Ok(snapshot) => snapshot.latest_local(),
            Err(e) => {
                tracing::warn!(error = %e, "ignoring unreadable data file");
                None
            }
        })
        .max()
}

pub(crate) fn evaluate(paths: &[PathBuf], latest_remote: u32, force: bool) -> GuardDecision {
    decide(read_local_latest(paths), latest_remote, force)
}

pub(crate) fn decide(latest_local: Option<u32>, latest_remote: u32, force: bool) -> GuardDecision {
    let (needs_update, reason) = if force {
        (true, Reason::Forced)
    } else {
        match latest_local {
            None => (true, Reason::NoLocalData),
            Some(local) if latest_remote > local => (true, Reason::Behind),
            Some(_) => (false, Reason::UpToDate),
        }
    };
    GuardDecision {
        needs_update,
        latest_remote,
        latest_local,
        reason,
    }
}

/// Appends `needs_update`, `latest_remote` and `latest_local` lines in the
/// GitHub Actions step-output format.
pub(crate) fn write_github_output(path: &Path, decision: &GuardDecision) -> std::io::Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    writeln!(file, "needs_update={}", decision.needs_update)?;
    writeln!(file, "latest_remote={}", decision.latest_remote)?;
    match decision.latest_local {
        Some(local) => writeln!(file, "latest_local={local}"),
        None => writeln!(file, "latest_local="),
    }
}
