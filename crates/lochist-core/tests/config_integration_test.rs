//! Integration tests for layered configuration
//!
//! These tests verify that configuration loading follows the correct precedence:
//! CLI arguments > Environment variables > Config file > Defaults

use lochist_core::config::{CliConfigOverrides, ConfigSource, LayeredConfig};
use serial_test::serial;
use std::env;
use std::io::Write;
use tempfile::NamedTempFile;

const ENV_KEYS: &[&str] = &[
    "LOCHIST_MIN_GAP_HOURS",
    "LOCHIST_MIN_VISIT_MINUTES",
    "LOCHIST_ADJACENCY_HOURS",
    "LOCHIST_GEOCODER_URL",
    "LOCHIST_USER_AGENT",
    "LOCHIST_GEOCODER_TIMEOUT_SECS",
    "LOCHIST_GEOCODE_CACHE_SIZE",
    "LOCHIST_FALLBACK_LANGUAGE",
];

fn clear_env() {
    for key in ENV_KEYS {
        env::remove_var(key);
    }
}

fn config_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "{}", content).unwrap();
    file
}

#[test]
#[serial]
fn test_env_overrides_file() {
    clear_env();
    let file = config_file(
        r#"
min_gap_hours = 6
user_agent = "from-file"
"#,
    );

    env::set_var("LOCHIST_MIN_GAP_HOURS", "2");

    let config = LayeredConfig::with_defaults().load_from_file(file.path()).unwrap().load_from_env();

    assert_eq!(config.min_gap_hours.value, 2.0);
    assert_eq!(config.min_gap_hours.source, ConfigSource::Environment);
    assert_eq!(config.user_agent.value, "from-file");
    assert_eq!(config.user_agent.source, ConfigSource::File);

    clear_env();
}

#[test]
#[serial]
fn test_cli_overrides_env() {
    clear_env();
    env::set_var("LOCHIST_ADJACENCY_HOURS", "12");
    env::set_var("LOCHIST_GEOCODER_URL", "http://env:8080");

    let mut config = LayeredConfig::with_defaults().load_from_env();
    config.update_from_cli(CliConfigOverrides {
        adjacency_hours: Some(3.0),
        ..Default::default()
    });

    assert_eq!(config.adjacency_hours.value, 3.0);
    assert_eq!(config.adjacency_hours.source, ConfigSource::Cli);
    assert_eq!(config.geocoder_url.value, "http://env:8080");
    assert_eq!(config.geocoder_url.source, ConfigSource::Environment);

    clear_env();
}

#[test]
#[serial]
fn test_invalid_env_values_are_ignored() {
    clear_env();
    env::set_var("LOCHIST_MIN_GAP_HOURS", "a while");
    env::set_var("LOCHIST_MIN_VISIT_MINUTES", "-5");
    env::set_var("LOCHIST_GEOCODER_TIMEOUT_SECS", "0");

    let config = LayeredConfig::with_defaults().load_from_env();

    assert_eq!(config.min_gap_hours.value, 24.0);
    assert_eq!(config.min_gap_hours.source, ConfigSource::Default);
    assert_eq!(config.min_visit_minutes.source, ConfigSource::Default);
    assert_eq!(config.geocoder_timeout_secs.value, 10);

    clear_env();
}

#[test]
#[serial]
fn test_all_env_keys_are_read() {
    clear_env();
    env::set_var("LOCHIST_USER_AGENT", "lochist-test");
    env::set_var("LOCHIST_GEOCODE_CACHE_SIZE", "7");
    env::set_var("LOCHIST_FALLBACK_LANGUAGE", "sv");

    let config = LayeredConfig::with_defaults().load_from_env();

    assert_eq!(config.user_agent.value, "lochist-test");
    assert_eq!(config.geocode_cache_size.value, 7);
    assert_eq!(config.fallback_language.value, "sv");

    clear_env();
}

#[test]
fn test_missing_file_is_config_error() {
    let result = LayeredConfig::with_defaults().load_from_file("/nonexistent/lochist.toml");
    assert!(result.is_err());
}

#[test]
fn test_malformed_toml_is_config_error() {
    let file = config_file("min_gap_hours = [not toml");
    let result = LayeredConfig::with_defaults().load_from_file(file.path());
    assert!(result.is_err());
}
