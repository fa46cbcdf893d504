//! Merge command implementation

use crate::cli::MergeArgs;
use crate::errors::{merge_inputs_failed, no_segments};
use crate::output::OutputWriter;
use crate::output_types::{FailedInput, MergeOutput, SourceRow};
use crate::progress::create_spinner;
use anyhow::{Context, Result};
use lochist_core::analysis::merge_collections;
use lochist_core::formats::load_export;
use lochist_core::models::{MergedCollection, SourceCollection};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

pub fn execute(args: MergeArgs, output: &OutputWriter) -> Result<()> {
    let spinner = (!output.is_json()).then(|| create_spinner("Reading exports..."));

    let mut collections = Vec::with_capacity(args.files.len());
    let mut failed = Vec::new();
    let mut diagnostics = Vec::new();

    for path in &args.files {
        tracing::info!(file = %path.display(), "Processing file");
        match load_export(path) {
            Ok(export) => {
                diagnostics.extend(export.diagnostics);
                collections.push(SourceCollection::new(path.display().to_string(), export.semantic_segments));
            }
            Err(e) => {
                tracing::error!(file = %path.display(), "Error reading file: {}", e);
                failed.push(FailedInput { file: path.display().to_string(), error: e.to_string() });
            }
        }
    }

    let mut merged = merge_collections(collections);
    diagnostics.append(&mut merged.diagnostics);

    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }

    for diagnostic in &diagnostics {
        output.warning(diagnostic);
    }
    for failure in &failed {
        output.warning(format!("{}: {}", failure.file, failure.error));
    }

    if merged.is_empty() {
        tracing::error!("No valid segments were found");
        return Err(no_segments(args.files.len()).into());
    }

    write_merged(&merged, &args.output)?;
    tracing::info!(file = %args.output.display(), segments = merged.len(), "Saved result");

    if output.is_json() {
        output.result(MergeOutput {
            output_file: args.output.display().to_string(),
            segment_count: merged.len(),
            unkeyed_count: merged.unkeyed_count,
            sources: merged.sources.clone(),
            failed_inputs: failed.clone(),
            diagnostics,
        })?;
    } else {
        output.table(merged.sources.iter().map(SourceRow::from).collect());
        output.success(format!("Merged {} segments into {}", merged.len(), args.output.display()));
        if merged.unkeyed_count > 0 {
            output.warning(format!("{} segments without a start time were placed last", merged.unkeyed_count));
        }
    }

    if !failed.is_empty() {
        let files: Vec<String> = failed.into_iter().map(|f| f.file).collect();
        return Err(merge_inputs_failed(&files, &args.output).into());
    }

    Ok(())
}

/// Write the merged document with 4-space indentation
fn write_merged(merged: &MergedCollection, path: &Path) -> Result<()> {
    let file = File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    let mut writer = BufWriter::new(file);

    let mut serializer = serde_json::Serializer::with_formatter(&mut writer, PrettyFormatter::with_indent(b"    "));
    merged
        .to_document()
        .serialize(&mut serializer)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    writer.flush().with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}
