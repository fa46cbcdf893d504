//! Reader for location-history export documents.
//!
//! Only the fields the analyses need are interpreted:
//!
//! ```json
//! {
//!   "semanticSegments": [
//!     { "startTime": "...", "endTime": "...",
//!       "visit": { "topCandidate": { "placeLocation": { "latLng": "60.1699°, 24.9384°" } } } }
//!   ],
//!   "timelinePath": [ { "timestamps": ["...", "..."] } ]
//! }
//! ```

use crate::analysis::gaps::TimelineStream;
use crate::error::{Diagnostic, DiagnosticKind, LochistError, Result};
use crate::geo::parse_lat_lng;
use crate::models::segment::{text_field, time_field, END_TIME_FIELD, START_TIME_FIELD};
use crate::models::visit::VisitEvent;
use serde_json::Value;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

pub const SEMANTIC_SEGMENTS: &str = "semanticSegments";
pub const TIMELINE_PATH: &str = "timelinePath";

/// Pointer to the visit location string inside a segment
const VISIT_LAT_LNG_POINTER: &str = "/visit/topCandidate/placeLocation/latLng";

/// The parts of one export document the analyses read
#[derive(Debug, Clone)]
pub struct TimelineExport {
    pub source: PathBuf,
    pub semantic_segments: Vec<Value>,

    /// `timestamps` arrays of each `timelinePath` entry, in document order
    pub timeline_paths: Vec<Vec<String>>,

    /// Structural problems found while reading the document
    pub diagnostics: Vec<Diagnostic>,
}

/// Read and parse an export file
pub fn load_export(path: &Path) -> Result<TimelineExport> {
    let content = fs::read_to_string(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => LochistError::ResourceNotFound { path: path.to_path_buf() },
        _ => LochistError::Io(e),
    })?;

    let document: Value = serde_json::from_str(&content).map_err(|e| LochistError::MalformedInput {
        path: path.to_path_buf(),
        reason: format!("Invalid JSON: {}", e),
    })?;

    let export = TimelineExport::from_document(path, document)?;

    tracing::info!(
        file = %path.display(),
        segments = export.semantic_segments.len(),
        paths = export.timeline_paths.len(),
        "Loaded export"
    );

    Ok(export)
}

impl TimelineExport {
    /// Interpret an already parsed document
    pub fn from_document(source: &Path, document: Value) -> Result<Self> {
        let Value::Object(mut root) = document else {
            return Err(LochistError::MalformedInput {
                path: source.to_path_buf(),
                reason: "top-level value is not an object".to_string(),
            });
        };

        let mut diagnostics = Vec::new();
        let mut warn = |message: String| {
            tracing::warn!(file = %source.display(), "{}", message);
            diagnostics.push(Diagnostic::new(DiagnosticKind::MalformedInput, message));
        };

        let semantic_segments = match root.remove(SEMANTIC_SEGMENTS) {
            Some(Value::Array(items)) => items,
            None => Vec::new(),
            Some(_) => {
                warn(format!("'{}' in {} is not a list", SEMANTIC_SEGMENTS, source.display()));
                Vec::new()
            }
        };

        let timeline_paths = match root.remove(TIMELINE_PATH) {
            Some(Value::Array(entries)) => entries
                .iter()
                .enumerate()
                .map(|(idx, entry)| match entry.get("timestamps") {
                    Some(Value::Array(ts)) => ts
                        .iter()
                        .enumerate()
                        .filter_map(|(ts_idx, t)| match t.as_str() {
                            Some(s) => Some(s.to_string()),
                            None => {
                                warn(format!("{}[{}].timestamps[{}] is not a string", TIMELINE_PATH, idx, ts_idx));
                                None
                            }
                        })
                        .collect(),
                    None => Vec::new(),
                    Some(_) => {
                        warn(format!("{}[{}].timestamps is not a list", TIMELINE_PATH, idx));
                        Vec::new()
                    }
                })
                .collect(),
            None => Vec::new(),
            Some(_) => {
                warn(format!("'{}' in {} is not a list", TIMELINE_PATH, source.display()));
                Vec::new()
            }
        };

        Ok(Self {
            source: source.to_path_buf(),
            semantic_segments,
            timeline_paths,
            diagnostics,
        })
    }

    /// Ordered streams for gap analysis.
    ///
    /// The first stream holds segment start times sorted by their text; segments without
    /// a start time are left out and reported. One stream per `timelinePath` entry follows,
    /// each in document order.
    pub fn gap_streams(&self) -> (Vec<TimelineStream>, Vec<Diagnostic>) {
        let mut diagnostics = Vec::new();
        let mut starts = Vec::with_capacity(self.semantic_segments.len());

        for (idx, segment) in self.semantic_segments.iter().enumerate() {
            match text_field(segment, START_TIME_FIELD) {
                Ok(start) => starts.push(start.to_string()),
                Err(e) => {
                    tracing::warn!(index = idx, "Excluding segment from gap scan: {}", e);
                    diagnostics.extend(Diagnostic::at(format!("{}[{}]", SEMANTIC_SEGMENTS, idx), &e));
                }
            }
        }
        starts.sort();

        let mut streams = vec![TimelineStream::new(SEMANTIC_SEGMENTS, starts)];
        streams.extend(
            self.timeline_paths.iter().map(|timestamps| TimelineStream::new(TIMELINE_PATH, timestamps.clone())),
        );

        (streams, diagnostics)
    }

    /// Visit events from every segment that carries a `visit` object, in document order
    pub fn visit_events(&self) -> (Vec<VisitEvent>, Vec<Diagnostic>) {
        let mut events = Vec::new();
        let mut diagnostics = Vec::new();

        for (idx, segment) in self.semantic_segments.iter().enumerate() {
            if segment.get("visit").is_none() {
                continue;
            }

            match visit_event(segment) {
                Ok(event) => events.push(event),
                Err(e) => {
                    tracing::warn!(index = idx, "Skipping visit: {}", e);
                    diagnostics.extend(Diagnostic::at(format!("{}[{}]", SEMANTIC_SEGMENTS, idx), &e));
                }
            }
        }

        (events, diagnostics)
    }
}

/// Build a visit event from a visit segment
pub fn visit_event(segment: &Value) -> Result<VisitEvent> {
    let start = time_field(segment, START_TIME_FIELD)?;
    let end = time_field(segment, END_TIME_FIELD)?;

    let lat_lng = segment.pointer(VISIT_LAT_LNG_POINTER).and_then(Value::as_str).ok_or_else(|| {
        LochistError::MissingField {
            field: "visit.topCandidate.placeLocation.latLng".to_string(),
            context: "visit segment".to_string(),
        }
    })?;

    Ok(VisitEvent::new(start, end, parse_lat_lng(lat_lng)?))
}
