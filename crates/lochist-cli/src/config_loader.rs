//! Configuration loading utilities for CLI commands

use anyhow::{Context, Result};
use lochist_core::config::{require_non_negative, CliConfigOverrides, LayeredConfig};
use std::path::{Path, PathBuf};

/// Config file picked up from the working directory when `--config` is absent
pub const DEFAULT_CONFIG_FILE: &str = "lochist.toml";

/// Resolve which config file to read, if any
pub fn config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => {
            let default = PathBuf::from(DEFAULT_CONFIG_FILE);
            default.is_file().then_some(default)
        }
    }
}

/// Load layered configuration: defaults, then file, then environment
pub fn load_config(explicit: Option<&Path>) -> Result<LayeredConfig> {
    let mut config = LayeredConfig::with_defaults();

    if let Some(path) = config_path(explicit) {
        tracing::debug!(path = %path.display(), "Loading configuration file");
        config = config
            .load_from_file(&path)
            .with_context(|| format!("Failed to load configuration file {}", path.display()))?;
    }

    Ok(config.load_from_env())
}

/// Load layered configuration with CLI overrides
pub fn load_config_with_overrides(
    explicit: Option<&Path>,
    overrides: CliConfigOverrides,
) -> Result<LayeredConfig> {
    validate_overrides(&overrides)?;
    let mut config = load_config(explicit)?;
    config.update_from_cli(overrides);
    Ok(config)
}

fn validate_overrides(overrides: &CliConfigOverrides) -> Result<()> {
    let numeric = [
        ("min_gap_hours", overrides.min_gap_hours),
        ("min_visit_minutes", overrides.min_visit_minutes),
        ("adjacency_hours", overrides.adjacency_hours),
    ];
    for (key, value) in numeric {
        if let Some(value) = value {
            require_non_negative(key, value)?;
        }
    }
    Ok(())
}
