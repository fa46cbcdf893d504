use lochist_core::models::{EpisodeSummary, GapReport, SourceSummary};
use lochist_core::Diagnostic;
use serde::Serialize;
use tabled::Tabled;

/// Output for gaps command
#[derive(Debug, Serialize)]
pub struct GapsOutput {
    pub file: String,
    pub min_gap_hours: f64,
    pub report: GapReport,
}

/// Output for visits command
#[derive(Debug, Serialize)]
pub struct VisitsOutput {
    pub file: String,
    pub latitude: f64,
    pub longitude: f64,
    pub distance_meters: f64,
    pub adjacency_hours: f64,
    pub min_duration_minutes: f64,
    pub episodes: Vec<EpisodeSummary>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Output for merge command
#[derive(Debug, Serialize)]
pub struct MergeOutput {
    pub output_file: String,
    pub segment_count: usize,
    pub unkeyed_count: usize,
    pub sources: Vec<SourceSummary>,
    pub failed_inputs: Vec<FailedInput>,
    pub diagnostics: Vec<Diagnostic>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FailedInput {
    pub file: String,
    pub error: String,
}

/// Output for config command
#[derive(Debug, Serialize)]
pub struct ConfigOutput {
    pub config_file: Option<String>,
    pub values: Vec<ConfigEntry>,
}

#[derive(Debug, Serialize, Tabled)]
pub struct ConfigEntry {
    #[tabled(rename = "Key")]
    pub key: String,
    #[tabled(rename = "Value")]
    pub value: String,
    #[tabled(rename = "Source")]
    pub source: String,
}

/// Table row for per-source merge counts
#[derive(Debug, Tabled)]
pub struct SourceRow {
    #[tabled(rename = "Source")]
    pub source: String,
    #[tabled(rename = "Segments")]
    pub segments: usize,
}

impl From<&SourceSummary> for SourceRow {
    fn from(summary: &SourceSummary) -> Self {
        Self {
            source: summary.source_id.clone(),
            segments: summary.segment_count,
        }
    }
}
