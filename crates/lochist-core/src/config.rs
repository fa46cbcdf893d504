use crate::error::{LochistError, Result};
use crate::models::time::{hours, minutes};
use chrono::TimeDelta;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Configuration source for tracking where values come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Default value
    Default,
    /// Loaded from config file
    File,
    /// Loaded from environment variable
    Environment,
    /// Provided via CLI argument
    Cli,
}

impl ConfigSource {
    /// Returns the precedence level (higher = higher priority)
    pub fn precedence(&self) -> u8 {
        match self {
            ConfigSource::Default => 0,
            ConfigSource::File => 1,
            ConfigSource::Environment => 2,
            ConfigSource::Cli => 3,
        }
    }
}

/// A configuration value with its source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        Self { value, source }
    }

    /// Update the value if the new source has higher precedence
    pub fn update(&mut self, value: T, source: ConfigSource) {
        if source.precedence() > self.source.precedence() {
            self.value = value;
            self.source = source;
        }
    }
}

/// Layered configuration for Lochist
#[derive(Debug, Clone)]
pub struct LayeredConfig {
    pub min_gap_hours: ConfigValue<f64>,
    pub min_visit_minutes: ConfigValue<f64>,
    pub adjacency_hours: ConfigValue<f64>,
    pub geocoder_url: ConfigValue<String>,
    pub user_agent: ConfigValue<String>,
    pub geocoder_timeout_secs: ConfigValue<u64>,
    pub geocode_cache_size: ConfigValue<usize>,
    pub fallback_language: ConfigValue<String>,
}

impl LayeredConfig {
    /// Create a new configuration with default values
    pub fn with_defaults() -> Self {
        Self {
            min_gap_hours: ConfigValue::new(24.0, ConfigSource::Default),
            min_visit_minutes: ConfigValue::new(5.0, ConfigSource::Default),
            adjacency_hours: ConfigValue::new(24.0, ConfigSource::Default),
            geocoder_url: ConfigValue::new(
                "https://nominatim.openstreetmap.org".to_string(),
                ConfigSource::Default,
            ),
            user_agent: ConfigValue::new("lochist".to_string(), ConfigSource::Default),
            geocoder_timeout_secs: ConfigValue::new(10, ConfigSource::Default),
            geocode_cache_size: ConfigValue::new(100, ConfigSource::Default),
            fallback_language: ConfigValue::new("en".to_string(), ConfigSource::Default),
        }
    }

    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self> {
        let content =
            fs::read_to_string(path.as_ref()).map_err(|e| LochistError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to read config file: {}", e),
            })?;

        let file_config: FileConfig =
            toml::from_str(&content).map_err(|e| LochistError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to parse TOML: {}", e),
            })?;

        if let Some(h) = file_config.min_gap_hours {
            self.min_gap_hours.update(require_non_negative("min_gap_hours", h)?, ConfigSource::File);
        }

        if let Some(m) = file_config.min_visit_minutes {
            self.min_visit_minutes
                .update(require_non_negative("min_visit_minutes", m)?, ConfigSource::File);
        }

        if let Some(h) = file_config.adjacency_hours {
            self.adjacency_hours.update(require_non_negative("adjacency_hours", h)?, ConfigSource::File);
        }

        if let Some(url) = file_config.geocoder_url {
            self.geocoder_url.update(url, ConfigSource::File);
        }

        if let Some(agent) = file_config.user_agent {
            self.user_agent.update(agent, ConfigSource::File);
        }

        if let Some(secs) = file_config.geocoder_timeout_secs {
            self.geocoder_timeout_secs
                .update(require_positive_int("geocoder_timeout_secs", secs)?, ConfigSource::File);
        }

        if let Some(size) = file_config.geocode_cache_size {
            self.geocode_cache_size.update(size, ConfigSource::File);
        }

        if let Some(lang) = file_config.fallback_language {
            self.fallback_language.update(lang, ConfigSource::File);
        }

        Ok(self)
    }

    /// Load configuration from environment variables
    pub fn load_from_env(mut self) -> Self {
        // LOCHIST_MIN_GAP_HOURS
        if let Ok(s) = env::var("LOCHIST_MIN_GAP_HOURS") {
            match parse_non_negative("min_gap_hours", &s) {
                Ok(h) => self.min_gap_hours.update(h, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid LOCHIST_MIN_GAP_HOURS value '{}': expected a non-negative number",
                    s
                ),
            }
        }

        // LOCHIST_MIN_VISIT_MINUTES
        if let Ok(s) = env::var("LOCHIST_MIN_VISIT_MINUTES") {
            match parse_non_negative("min_visit_minutes", &s) {
                Ok(m) => self.min_visit_minutes.update(m, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid LOCHIST_MIN_VISIT_MINUTES value '{}': expected a non-negative number",
                    s
                ),
            }
        }

        // LOCHIST_ADJACENCY_HOURS
        if let Ok(s) = env::var("LOCHIST_ADJACENCY_HOURS") {
            match parse_non_negative("adjacency_hours", &s) {
                Ok(h) => self.adjacency_hours.update(h, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid LOCHIST_ADJACENCY_HOURS value '{}': expected a non-negative number",
                    s
                ),
            }
        }

        // LOCHIST_GEOCODER_URL
        if let Ok(url) = env::var("LOCHIST_GEOCODER_URL") {
            self.geocoder_url.update(url, ConfigSource::Environment);
        }

        // LOCHIST_USER_AGENT
        if let Ok(agent) = env::var("LOCHIST_USER_AGENT") {
            self.user_agent.update(agent, ConfigSource::Environment);
        }

        // LOCHIST_GEOCODER_TIMEOUT_SECS
        if let Ok(s) = env::var("LOCHIST_GEOCODER_TIMEOUT_SECS") {
            match s.parse::<u64>().ok().filter(|v| *v > 0) {
                Some(secs) => self.geocoder_timeout_secs.update(secs, ConfigSource::Environment),
                None => tracing::warn!(
                    "Invalid LOCHIST_GEOCODER_TIMEOUT_SECS value '{}': expected a positive integer",
                    s
                ),
            }
        }

        // LOCHIST_GEOCODE_CACHE_SIZE
        if let Ok(s) = env::var("LOCHIST_GEOCODE_CACHE_SIZE") {
            match s.parse::<usize>() {
                Ok(size) => self.geocode_cache_size.update(size, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid LOCHIST_GEOCODE_CACHE_SIZE value '{}': expected an integer",
                    s
                ),
            }
        }

        // LOCHIST_FALLBACK_LANGUAGE
        if let Ok(lang) = env::var("LOCHIST_FALLBACK_LANGUAGE") {
            self.fallback_language.update(lang, ConfigSource::Environment);
        }

        self
    }

    /// Update configuration from CLI arguments
    pub fn update_from_cli(&mut self, overrides: CliConfigOverrides) {
        if let Some(h) = overrides.min_gap_hours {
            self.min_gap_hours.update(h, ConfigSource::Cli);
        }

        if let Some(m) = overrides.min_visit_minutes {
            self.min_visit_minutes.update(m, ConfigSource::Cli);
        }

        if let Some(h) = overrides.adjacency_hours {
            self.adjacency_hours.update(h, ConfigSource::Cli);
        }

        if let Some(url) = overrides.geocoder_url {
            self.geocoder_url.update(url, ConfigSource::Cli);
        }
    }

    pub fn min_gap(&self) -> TimeDelta {
        hours(self.min_gap_hours.value)
    }

    pub fn min_visit_duration(&self) -> TimeDelta {
        minutes(self.min_visit_minutes.value)
    }

    pub fn adjacency_window(&self) -> TimeDelta {
        hours(self.adjacency_hours.value)
    }

    pub fn geocoder_timeout(&self) -> Duration {
        Duration::from_secs(self.geocoder_timeout_secs.value)
    }

    /// Get all configuration values as a map for inspection
    pub fn to_inspection_map(&self) -> BTreeMap<String, (String, ConfigSource)> {
        let mut map = BTreeMap::new();

        map.insert(
            "min_gap_hours".to_string(),
            (self.min_gap_hours.value.to_string(), self.min_gap_hours.source),
        );
        map.insert(
            "min_visit_minutes".to_string(),
            (self.min_visit_minutes.value.to_string(), self.min_visit_minutes.source),
        );
        map.insert(
            "adjacency_hours".to_string(),
            (self.adjacency_hours.value.to_string(), self.adjacency_hours.source),
        );
        map.insert(
            "geocoder_url".to_string(),
            (self.geocoder_url.value.clone(), self.geocoder_url.source),
        );
        map.insert("user_agent".to_string(), (self.user_agent.value.clone(), self.user_agent.source));
        map.insert(
            "geocoder_timeout_secs".to_string(),
            (self.geocoder_timeout_secs.value.to_string(), self.geocoder_timeout_secs.source),
        );
        map.insert(
            "geocode_cache_size".to_string(),
            (self.geocode_cache_size.value.to_string(), self.geocode_cache_size.source),
        );
        map.insert(
            "fallback_language".to_string(),
            (self.fallback_language.value.clone(), self.fallback_language.source),
        );

        map
    }
}

/// Configuration loaded from TOML file
#[derive(Debug, Deserialize, Serialize)]
struct FileConfig {
    min_gap_hours: Option<f64>,
    min_visit_minutes: Option<f64>,
    adjacency_hours: Option<f64>,
    geocoder_url: Option<String>,
    user_agent: Option<String>,
    geocoder_timeout_secs: Option<u64>,
    geocode_cache_size: Option<usize>,
    fallback_language: Option<String>,
}

/// CLI configuration overrides
#[derive(Debug, Default)]
pub struct CliConfigOverrides {
    pub min_gap_hours: Option<f64>,
    pub min_visit_minutes: Option<f64>,
    pub adjacency_hours: Option<f64>,
    pub geocoder_url: Option<String>,
}

/// Parse a non-negative, finite number
pub fn parse_non_negative(key: &str, s: &str) -> Result<f64> {
    let value = s.trim().parse::<f64>().map_err(|_| LochistError::ConfigInvalid {
        key: key.to_string(),
        reason: format!("'{}' is not a number", s),
    })?;
    require_non_negative(key, value)
}

/// Reject negative, NaN and infinite values
pub fn require_non_negative(key: &str, value: f64) -> Result<f64> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(LochistError::ConfigInvalid {
            key: key.to_string(),
            reason: format!("{} must be a non-negative number", value),
        })
    }
}

fn require_positive_int(key: &str, value: u64) -> Result<u64> {
    if value > 0 {
        Ok(value)
    } else {
        Err(LochistError::ConfigInvalid {
            key: key.to_string(),
            reason: "must be greater than zero".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = LayeredConfig::with_defaults();
        assert_eq!(config.min_gap_hours.value, 24.0);
        assert_eq!(config.min_gap_hours.source, ConfigSource::Default);
        assert_eq!(config.min_visit_duration(), TimeDelta::minutes(5));
        assert_eq!(config.adjacency_window(), TimeDelta::hours(24));
        assert_eq!(config.fallback_language.value, "en");
    }

    #[test]
    fn test_config_precedence() {
        let mut value = ConfigValue::new(100, ConfigSource::Default);

        // File should override default
        value.update(200, ConfigSource::File);
        assert_eq!(value.value, 200);
        assert_eq!(value.source, ConfigSource::File);

        // Environment should override file
        value.update(300, ConfigSource::Environment);
        assert_eq!(value.value, 300);
        assert_eq!(value.source, ConfigSource::Environment);

        // CLI should override environment
        value.update(400, ConfigSource::Cli);
        assert_eq!(value.value, 400);
        assert_eq!(value.source, ConfigSource::Cli);

        // Lower precedence should not override
        value.update(500, ConfigSource::File);
        assert_eq!(value.value, 400);
        assert_eq!(value.source, ConfigSource::Cli);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
min_gap_hours = 6.5
adjacency_hours = 3
geocoder_url = "http://localhost:8080"
geocode_cache_size = 10
"#
        )
        .unwrap();

        let config = LayeredConfig::with_defaults().load_from_file(file.path()).unwrap();

        assert_eq!(config.min_gap_hours.value, 6.5);
        assert_eq!(config.min_gap_hours.source, ConfigSource::File);
        assert_eq!(config.adjacency_window(), TimeDelta::hours(3));
        assert_eq!(config.geocoder_url.value, "http://localhost:8080");
        assert_eq!(config.geocode_cache_size.value, 10);
        assert_eq!(config.user_agent.source, ConfigSource::Default);
    }

    #[test]
    fn test_file_rejects_negative_values() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "min_gap_hours = -1.0").unwrap();

        let err = LayeredConfig::with_defaults().load_from_file(file.path()).unwrap_err();
        assert!(matches!(err, LochistError::ConfigInvalid { ref key, .. } if key == "min_gap_hours"));
    }

    #[test]
    fn test_cli_overrides() {
        let mut config = LayeredConfig::with_defaults();

        config.update_from_cli(CliConfigOverrides {
            min_gap_hours: Some(2.0),
            adjacency_hours: Some(12.0),
            ..Default::default()
        });

        assert_eq!(config.min_gap(), TimeDelta::hours(2));
        assert_eq!(config.min_gap_hours.source, ConfigSource::Cli);
        assert_eq!(config.adjacency_hours.source, ConfigSource::Cli);
        assert_eq!(config.min_visit_minutes.source, ConfigSource::Default);
    }

    #[test]
    fn test_parse_non_negative() {
        assert_eq!(parse_non_negative("k", "1.5").unwrap(), 1.5);
        assert_eq!(parse_non_negative("k", " 0 ").unwrap(), 0.0);
        assert!(parse_non_negative("k", "-2").is_err());
        assert!(parse_non_negative("k", "NaN").is_err());
        assert!(parse_non_negative("k", "soon").is_err());
    }

    #[test]
    fn test_inspection_map() {
        let config = LayeredConfig::with_defaults();
        let map = config.to_inspection_map();

        assert_eq!(map.len(), 8);
        let (value, source) = &map["min_gap_hours"];
        assert_eq!(value, "24");
        assert_eq!(*source, ConfigSource::Default);
    }
}
