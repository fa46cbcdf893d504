//! Config command implementation

use crate::config_loader::{config_path, load_config};
use crate::errors::from_anyhow;
use crate::output::OutputWriter;
use crate::output_types::{ConfigEntry, ConfigOutput};
use anyhow::Result;
use lochist_core::config::ConfigSource;
use std::path::Path;

pub fn execute(config_file: Option<&Path>, output: &OutputWriter) -> Result<()> {
    let config = load_config(config_file).map_err(from_anyhow)?;
    let file = config_path(config_file).map(|p| p.display().to_string());

    let values: Vec<ConfigEntry> = config
        .to_inspection_map()
        .into_iter()
        .map(|(key, (value, source))| ConfigEntry {
            key,
            value,
            source: source_label(source).to_string(),
        })
        .collect();

    if output.is_json() {
        return output.result(ConfigOutput { config_file: file, values });
    }

    output.section("Configuration");
    output.kv("Config file", file.as_deref().unwrap_or("(none)"));
    output.table(values);

    Ok(())
}

fn source_label(source: ConfigSource) -> &'static str {
    match source {
        ConfigSource::Default => "default",
        ConfigSource::File => "file",
        ConfigSource::Environment => "environment",
        ConfigSource::Cli => "cli",
    }
}
