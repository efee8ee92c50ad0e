use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::app_config::AppConfig;
use crate::ConfigError;

pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/122.0.0.0 Safari/537.36";

/// Reads configuration from the process environment after loading any `.env`
/// file in the working directory.
///
/// # Errors
///
/// Returns `ConfigError` if a variable is set to an invalid value.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Same as [`load_app_config`] without touching `.env`.
///
/// # Errors
///
/// Returns `ConfigError` if a variable is set to an invalid value.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

fn parse_number<T>(var: &str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    raw.trim().parse::<T>().map_err(|e| ConfigError::InvalidEnvVar {
        var: var.to_owned(),
        reason: e.to_string(),
    })
}

fn positive_count(var: &str, value: u32) -> Result<u32, ConfigError> {
    if value == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: var.to_owned(),
            reason: "window must be at least 1".to_owned(),
        });
    }
    Ok(value)
}

/// Every variable is optional. `lookup` stands in for `std::env::var`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let text = |var: &str, default: &str| lookup(var).unwrap_or_else(|_| default.to_owned());
    let number = |var: &str, default: &str| parse_number::<u64>(var, &text(var, default));
    let count = |var: &str, default: &str| parse_number::<u32>(var, &text(var, default));

    let window = positive_count("LOTTO_WINDOW", count("LOTTO_WINDOW", "40")?)?;
    let winner_stores_window = positive_count(
        "LOTTO_WINNER_STORES_WINDOW",
        count("LOTTO_WINNER_STORES_WINDOW", "10")?,
    )?;

    Ok(AppConfig {
        log_level: text("LOTTO_LOG_LEVEL", "info"),
        snapshot_path: PathBuf::from(text("LOTTO_SNAPSHOT_PATH", "data/region_1to2.json")),
        window,
        winner_stores_path: PathBuf::from(text(
            "LOTTO_WINNER_STORES_PATH",
            "data/winner_stores.json",
        )),
        winner_stores_window,
        store_base_url: text("LOTTO_STORE_BASE_URL", "https://dhlottery.co.kr"),
        api_base_url: text("LOTTO_API_BASE_URL", "https://www.dhlottery.co.kr"),
        request_timeout_secs: number("LOTTO_REQUEST_TIMEOUT_SECS", "25")?,
        user_agent: text("LOTTO_USER_AGENT", DEFAULT_USER_AGENT),
        inter_request_delay_ms: number("LOTTO_INTER_REQUEST_DELAY_MS", "250")?,
        max_retries: count("LOTTO_MAX_RETRIES", "2")?,
        retry_backoff_base_ms: number("LOTTO_RETRY_BACKOFF_BASE_MS", "600")?,
        discovery_max_probes: count("LOTTO_DISCOVERY_MAX_PROBES", "60")?,
    })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
