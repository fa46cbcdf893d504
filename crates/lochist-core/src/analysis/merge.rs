//! Merging of segment collections from several exports into one timeline.

use crate::error::Diagnostic;
use crate::models::segment::{start_time, MergedCollection, SourceCollection, SourceSummary};
use crate::models::time::TimePoint;

/// Concatenate all sources and stable-sort the result by segment start time.
///
/// Segments without a usable `startTime` are kept and placed after every keyed
/// segment, in their original relative order, with one diagnostic each.
pub fn merge_collections(collections: Vec<SourceCollection>) -> MergedCollection {
    let mut sources = Vec::with_capacity(collections.len());
    let mut diagnostics = Vec::new();
    let mut keyed: Vec<(Option<TimePoint>, serde_json::Value)> = Vec::new();

    for collection in collections {
        tracing::info!(
            source = %collection.source_id,
            segments = collection.segments.len(),
            "Collected segments"
        );

        sources.push(SourceSummary {
            source_id: collection.source_id.clone(),
            segment_count: collection.segments.len(),
        });

        for (idx, segment) in collection.segments.into_iter().enumerate() {
            let key = match start_time(&segment) {
                Ok(t) => Some(t),
                Err(e) => {
                    tracing::warn!(source = %collection.source_id, index = idx, "Unsortable segment: {}", e);
                    diagnostics.extend(Diagnostic::at(
                        format!("{}: semanticSegments[{}]", collection.source_id, idx),
                        &e,
                    ));
                    None
                }
            };
            keyed.push((key, segment));
        }
    }

    // sort_by_key is stable; (false, t) sorts before (true, _)
    keyed.sort_by_key(|(key, _)| (key.is_none(), *key));

    let unkeyed_count = keyed.iter().filter(|(key, _)| key.is_none()).count();

    MergedCollection {
        segments: keyed.into_iter().map(|(_, segment)| segment).collect(),
        sources,
        unkeyed_count,
        diagnostics,
    }
}
