use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub log_level: String,
    pub snapshot_path: PathBuf,
    /// Number of trailing rounds kept in the snapshot.
    pub window: u32,
    pub winner_stores_path: PathBuf,
    /// Number of trailing rounds listed in the winner-stores file.
    pub winner_stores_window: u32,
    pub store_base_url: String,
    pub api_base_url: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub inter_request_delay_ms: u64,
    pub max_retries: u32,
    pub retry_backoff_base_ms: u64,
    pub discovery_max_probes: u32,
}
