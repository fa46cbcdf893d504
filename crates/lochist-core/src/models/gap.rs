use crate::error::Diagnostic;
use crate::models::time::{serialize_opt_seconds, serialize_seconds, TimePoint};
use chrono::TimeDelta;
use serde::Serialize;

/// One detected discontinuity between two consecutive valid timestamps
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GapRecord {
    pub start: TimePoint,
    pub end: TimePoint,

    /// Always `end - start`, strictly positive
    #[serde(rename = "duration_secs", serialize_with = "serialize_seconds")]
    pub duration: TimeDelta,

    /// Label of the stream the later timestamp came from
    pub source_label: String,
}

impl GapRecord {
    /// Build a record for a forward gap. Returns `None` unless `end > start`.
    pub fn forward(start: TimePoint, end: TimePoint, source_label: impl Into<String>) -> Option<Self> {
        (end > start).then(|| Self {
            start,
            end,
            duration: end - start,
            source_label: source_label.into(),
        })
    }
}

/// Gaps found in one labeled stream
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StreamGaps {
    pub label: String,
    pub gaps: Vec<GapRecord>,
}

/// Aggregate result of a gap analysis over one or more streams
#[derive(Debug, Clone, Serialize)]
pub struct GapReport {
    pub streams: Vec<StreamGaps>,
    pub total_gap_count: usize,

    #[serde(rename = "total_gap_duration_secs", serialize_with = "serialize_seconds")]
    pub total_gap_duration: TimeDelta,

    /// Earliest and latest valid timestamp over all streams
    pub first_timestamp: Option<TimePoint>,
    pub last_timestamp: Option<TimePoint>,

    #[serde(rename = "dataset_span_secs", serialize_with = "serialize_opt_seconds")]
    pub dataset_span: Option<TimeDelta>,

    pub diagnostics: Vec<Diagnostic>,
}

impl GapReport {
    /// All gaps in stream order
    pub fn gaps(&self) -> impl Iterator<Item = &GapRecord> {
        self.streams.iter().flat_map(|s| s.gaps.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tp(s: &str) -> TimePoint {
        TimePoint::parse(s).unwrap()
    }

    #[test]
    fn test_forward_gap() {
        let gap = GapRecord::forward(tp("2024-01-01T00:00:00"), tp("2024-01-01T06:00:00"), "a").unwrap();
        assert_eq!(gap.duration, TimeDelta::hours(6));
        assert_eq!(gap.source_label, "a");
    }

    #[test]
    fn test_non_forward_gap_rejected() {
        let t = tp("2024-01-01T00:00:00");
        assert!(GapRecord::forward(t, t, "a").is_none());
        assert!(GapRecord::forward(tp("2024-01-02T00:00:00"), t, "a").is_none());
    }

    #[test]
    fn test_gap_serializes_seconds() {
        let gap = GapRecord::forward(tp("2024-01-01T00:00:00"), tp("2024-01-01T01:00:00"), "a").unwrap();
        let json = serde_json::to_value(&gap).unwrap();
        assert_eq!(json["duration_secs"], 3600);
        assert_eq!(json["start"], "2024-01-01T00:00:00");
    }
}
