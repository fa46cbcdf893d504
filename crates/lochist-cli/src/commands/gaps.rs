//! Gaps command implementation

use crate::cli::GapsArgs;
use crate::config_loader::load_config_with_overrides;
use crate::errors::{from_anyhow, from_lochist};
use crate::output::OutputWriter;
use crate::output_types::GapsOutput;
use anyhow::Result;
use lochist_core::analysis::find_gaps;
use lochist_core::config::CliConfigOverrides;
use lochist_core::formats::load_export;
use lochist_core::models::time::format_duration;
use lochist_core::models::GapRecord;
use std::path::Path;

pub fn execute(args: GapsArgs, config_file: Option<&Path>, output: &OutputWriter) -> Result<()> {
    let config = load_config_with_overrides(
        config_file,
        CliConfigOverrides { min_gap_hours: args.min_gap_hours, ..Default::default() },
    )
    .map_err(from_anyhow)?;

    let export = load_export(&args.file).map_err(from_lochist)?;
    let (streams, stream_diagnostics) = export.gap_streams();

    let mut report = find_gaps(&streams, config.min_gap());

    // Structural problems come first, then per-timestamp ones
    let mut diagnostics = export.diagnostics.clone();
    diagnostics.extend(stream_diagnostics);
    diagnostics.append(&mut report.diagnostics);
    report.diagnostics = diagnostics;

    for diagnostic in &report.diagnostics {
        output.warning(diagnostic);
    }

    if output.is_json() {
        return output.result(GapsOutput {
            file: args.file.display().to_string(),
            min_gap_hours: config.min_gap_hours.value,
            report,
        });
    }

    for gap in report.gaps() {
        output.line(gap_line(gap));
    }

    if let Some(span) = report.dataset_span {
        output.line("");
        output.kv("Dataset span", format!("{} days", span.num_days()));
    }

    output.line("");
    output.kv(
        "Total gap length",
        format!(
            "{} days, {} gaps found",
            report.total_gap_duration.num_days(),
            report.total_gap_count
        ),
    );

    Ok(())
}

/// `Gap detected (label): dd.mm.YYYY HH:MM - dd.mm.YYYY HH:MM  Gap:  d h m`
fn gap_line(gap: &GapRecord) -> String {
    format!(
        "Gap detected ({}): {} - {}  Gap: {}",
        gap.source_label,
        gap.start.format_report(),
        gap.end.format_report(),
        format_duration(gap.duration)
    )
}
