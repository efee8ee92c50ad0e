pub mod app_config;
pub mod config;
pub mod region;
pub mod round_clock;
pub mod summary;
pub mod winner;

pub use app_config::AppConfig;
pub use config::{load_app_config, load_app_config_from_env};
pub use region::{ParseRegionError, RegionTag, Sido, LEGAL_NAMES};
pub use round_clock::{estimate_latest_round, kst, now_kst};
pub use summary::{Rank, RankSummary, RoundResult, SidoCounts, SummaryError};
pub use winner::{RegionWinner, WinnerStore, ONLINE_REGION, UNKNOWN_REGION};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for env var {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
