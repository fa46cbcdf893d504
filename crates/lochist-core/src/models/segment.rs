use crate::error::{Diagnostic, LochistError, Result};
use crate::models::time::TimePoint;
use serde::Serialize;
use serde_json::Value;

/// Field holding a segment's start time
pub const START_TIME_FIELD: &str = "startTime";

/// Field holding a segment's end time
pub const END_TIME_FIELD: &str = "endTime";

/// Raw segments read from one source, kept exactly as they appeared in the export
#[derive(Debug, Clone)]
pub struct SourceCollection {
    pub source_id: String,
    pub segments: Vec<Value>,
}

impl SourceCollection {
    pub fn new(source_id: impl Into<String>, segments: Vec<Value>) -> Self {
        Self { source_id: source_id.into(), segments }
    }
}

/// Per-source item count reported alongside a merge
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceSummary {
    pub source_id: String,
    pub segment_count: usize,
}

/// Segments from several sources in ascending start-time order
#[derive(Debug, Clone, Serialize)]
pub struct MergedCollection {
    pub segments: Vec<Value>,
    pub sources: Vec<SourceSummary>,

    /// Segments whose start time was missing or unparseable; they sit at the tail
    pub unkeyed_count: usize,

    pub diagnostics: Vec<Diagnostic>,
}

impl MergedCollection {
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// The export document written for a merge: `{"semanticSegments": [...]}`
    pub fn to_document(&self) -> Value {
        serde_json::json!({ "semanticSegments": self.segments })
    }
}

/// Read a string field from a raw segment
pub fn text_field<'a>(segment: &'a Value, field: &str) -> Result<&'a str> {
    segment.get(field).and_then(Value::as_str).ok_or_else(|| LochistError::MissingField {
        field: field.to_string(),
        context: "segment".to_string(),
    })
}

/// Parse a timestamp field of a raw segment
pub fn time_field(segment: &Value, field: &str) -> Result<TimePoint> {
    TimePoint::parse(text_field(segment, field)?)
}

/// Start time used to order segments
pub fn start_time(segment: &Value) -> Result<TimePoint> {
    time_field(segment, START_TIME_FIELD)
}
