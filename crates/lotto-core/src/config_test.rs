use std::collections::HashMap;
use std::env::VarError;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

#[test]
fn build_app_config_uses_defaults_for_empty_env() {
    let map: HashMap<&str, &str> = HashMap::new();
    let result = build_app_config(lookup_from_map(&map));
    assert!(result.is_ok(), "expected Ok, got: {result:?}");
    let cfg = result.unwrap();
    assert_eq!(cfg.log_level, "info");
    assert_eq!(cfg.snapshot_path.to_str(), Some("data/region_1to2.json"));
    assert_eq!(cfg.window, 40);
    assert_eq!(cfg.winner_stores_path.to_str(), Some("data/winner_stores.json"));
    assert_eq!(cfg.winner_stores_window, 10);
    assert_eq!(cfg.store_base_url, "https://dhlottery.co.kr");
    assert_eq!(cfg.api_base_url, "https://www.dhlottery.co.kr");
    assert_eq!(cfg.request_timeout_secs, 25);
    assert_eq!(cfg.user_agent, DEFAULT_USER_AGENT);
    assert_eq!(cfg.inter_request_delay_ms, 250);
    assert_eq!(cfg.max_retries, 2);
    assert_eq!(cfg.retry_backoff_base_ms, 600);
    assert_eq!(cfg.discovery_max_probes, 60);
}

#[test]
fn window_override() {
    let mut map = HashMap::new();
    map.insert("LOTTO_WINDOW", "10");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.window, 10);
}

#[test]
fn window_zero_is_rejected() {
    let mut map = HashMap::new();
    map.insert("LOTTO_WINDOW", "0");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "LOTTO_WINDOW"),
        "expected InvalidEnvVar(LOTTO_WINDOW), got: {result:?}"
    );
}

#[test]
fn window_invalid() {
    let mut map = HashMap::new();
    map.insert("LOTTO_WINDOW", "forty");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "LOTTO_WINDOW"),
        "expected InvalidEnvVar(LOTTO_WINDOW), got: {result:?}"
    );
}

#[test]
fn winner_stores_overrides() {
    let mut map = HashMap::new();
    map.insert("LOTTO_WINNER_STORES_PATH", "/tmp/stores.json");
    map.insert("LOTTO_WINNER_STORES_WINDOW", "5");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.winner_stores_path.to_str(), Some("/tmp/stores.json"));
    assert_eq!(cfg.winner_stores_window, 5);
}

#[test]
fn winner_stores_window_zero_is_rejected() {
    let mut map = HashMap::new();
    map.insert("LOTTO_WINNER_STORES_WINDOW", "0");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "LOTTO_WINNER_STORES_WINDOW"),
        "expected InvalidEnvVar(LOTTO_WINNER_STORES_WINDOW), got: {result:?}"
    );
}

#[test]
fn snapshot_path_override() {
    let mut map = HashMap::new();
    map.insert("LOTTO_SNAPSHOT_PATH", "/tmp/out.json");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.snapshot_path.to_str(), Some("/tmp/out.json"));
}

#[test]
fn request_timeout_secs_override() {
    let mut map = HashMap::new();
    map.insert("LOTTO_REQUEST_TIMEOUT_SECS", "60");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.request_timeout_secs, 60);
}

#[test]
fn request_timeout_secs_invalid() {
    let mut map = HashMap::new();
    map.insert("LOTTO_REQUEST_TIMEOUT_SECS", "not-a-number");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "LOTTO_REQUEST_TIMEOUT_SECS"),
        "expected InvalidEnvVar(LOTTO_REQUEST_TIMEOUT_SECS), got: {result:?}"
    );
}

#[test]
fn user_agent_override() {
    let mut map = HashMap::new();
    map.insert("LOTTO_USER_AGENT", "custom-agent/2.0");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.user_agent, "custom-agent/2.0");
}

#[test]
fn inter_request_delay_ms_invalid() {
    let mut map = HashMap::new();
    map.insert("LOTTO_INTER_REQUEST_DELAY_MS", "-5");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "LOTTO_INTER_REQUEST_DELAY_MS"),
        "expected InvalidEnvVar(LOTTO_INTER_REQUEST_DELAY_MS), got: {result:?}"
    );
}

#[test]
fn max_retries_override() {
    let mut map = HashMap::new();
    map.insert("LOTTO_MAX_RETRIES", "0");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.max_retries, 0);
}

#[test]
fn discovery_max_probes_invalid() {
    let mut map = HashMap::new();
    map.insert("LOTTO_DISCOVERY_MAX_PROBES", "lots");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "LOTTO_DISCOVERY_MAX_PROBES"),
        "expected InvalidEnvVar(LOTTO_DISCOVERY_MAX_PROBES), got: {result:?}"
    );
}

#[test]
fn numeric_values_tolerate_surrounding_whitespace() {
    let mut map = HashMap::new();
    map.insert("LOTTO_WINDOW", " 12 ");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.window, 12);
}
