//! Gap detection over ordered timestamp streams.
//!
//! Streams are fragments of one subject's timeline. They are scanned in the order
//! given and the last valid timestamp of one stream is the anchor for the first
//! timestamp of the next, so a hole at a stream boundary is reported too.

use crate::error::Diagnostic;
use crate::models::gap::{GapRecord, GapReport, StreamGaps};
use crate::models::time::TimePoint;
use chrono::TimeDelta;
use serde::{Deserialize, Serialize};

/// A labeled sequence of raw timestamp strings, already in scan order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineStream {
    pub label: String,
    pub timestamps: Vec<String>,
}

impl TimelineStream {
    pub fn new(label: impl Into<String>, timestamps: Vec<String>) -> Self {
        Self { label: label.into(), timestamps }
    }
}

/// Result of scanning a single stream
#[derive(Debug, Clone)]
pub struct StreamScan {
    pub gaps: Vec<GapRecord>,

    /// Last valid timestamp seen, or the incoming anchor if the stream had none
    pub anchor: Option<TimePoint>,

    pub total_gap_duration: TimeDelta,

    /// Earliest and latest valid timestamps within this stream
    pub earliest: Option<TimePoint>,
    pub latest: Option<TimePoint>,

    pub diagnostics: Vec<Diagnostic>,
}

/// Scan one stream for gaps of at least `min_gap`.
///
/// Timestamps that fail to parse are reported and skipped; they do not move the anchor.
pub fn scan_stream<S: AsRef<str>>(
    label: &str,
    timestamps: &[S],
    min_gap: TimeDelta,
    anchor: Option<TimePoint>,
) -> StreamScan {
    let mut scan = StreamScan {
        gaps: Vec::new(),
        anchor,
        total_gap_duration: TimeDelta::zero(),
        earliest: None,
        latest: None,
        diagnostics: Vec::new(),
    };

    for (idx, raw) in timestamps.iter().enumerate() {
        let current = match TimePoint::parse(raw.as_ref()) {
            Ok(t) => t,
            Err(e) => {
                tracing::warn!(stream = label, index = idx, "Skipping timestamp: {}", e);
                scan.diagnostics.extend(Diagnostic::at(format!("{}[{}]", label, idx), &e));
                continue;
            }
        };

        if let Some(previous) = scan.anchor {
            let gap = current - previous;
            if gap >= min_gap {
                // min_gap <= 0 would otherwise admit zero or backward steps
                if let Some(record) = GapRecord::forward(previous, current, label) {
                    scan.total_gap_duration += record.duration;
                    scan.gaps.push(record);
                }
            }
        }

        scan.earliest = Some(scan.earliest.map_or(current, |e| e.min(current)));
        scan.latest = Some(scan.latest.map_or(current, |l| l.max(current)));
        scan.anchor = Some(current);
    }

    scan
}

/// Folds streams into a [`GapReport`], carrying the anchor across stream boundaries
#[derive(Debug, Clone)]
pub struct GapScanner {
    min_gap: TimeDelta,
    anchor: Option<TimePoint>,
    streams: Vec<StreamGaps>,
    total_gap_count: usize,
    total_gap_duration: TimeDelta,
    earliest: Option<TimePoint>,
    latest: Option<TimePoint>,
    diagnostics: Vec<Diagnostic>,
}

impl GapScanner {
    pub fn new(min_gap: TimeDelta) -> Self {
        Self {
            min_gap,
            anchor: None,
            streams: Vec::new(),
            total_gap_count: 0,
            total_gap_duration: TimeDelta::zero(),
            earliest: None,
            latest: None,
            diagnostics: Vec::new(),
        }
    }

    /// Scan the next stream in timeline order
    pub fn scan(&mut self, stream: &TimelineStream) -> &mut Self {
        let scan = scan_stream(&stream.label, &stream.timestamps, self.min_gap, self.anchor);

        tracing::debug!(
            stream = %stream.label,
            timestamps = stream.timestamps.len(),
            gaps = scan.gaps.len(),
            "Scanned stream"
        );

        self.anchor = scan.anchor;
        self.total_gap_count += scan.gaps.len();
        self.total_gap_duration += scan.total_gap_duration;
        self.earliest = min_opt(self.earliest, scan.earliest);
        self.latest = max_opt(self.latest, scan.latest);
        self.diagnostics.extend(scan.diagnostics);
        self.streams.push(StreamGaps { label: stream.label.clone(), gaps: scan.gaps });
        self
    }

    pub fn finish(self) -> GapReport {
        let dataset_span = match (self.earliest, self.latest) {
            (Some(first), Some(last)) => Some(last - first),
            _ => None,
        };

        GapReport {
            streams: self.streams,
            total_gap_count: self.total_gap_count,
            total_gap_duration: self.total_gap_duration,
            first_timestamp: self.earliest,
            last_timestamp: self.latest,
            dataset_span,
            diagnostics: self.diagnostics,
        }
    }
}

/// Scan `streams` in the given order and build the aggregate report
pub fn find_gaps(streams: &[TimelineStream], min_gap: TimeDelta) -> GapReport {
    let mut scanner = GapScanner::new(min_gap);
    for stream in streams {
        scanner.scan(stream);
    }
    scanner.finish()
}

fn min_opt(a: Option<TimePoint>, b: Option<TimePoint>) -> Option<TimePoint> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, b) => a.or(b),
    }
}

fn max_opt(a: Option<TimePoint>, b: Option<TimePoint>) -> Option<TimePoint> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.max(b)),
        (a, b) => a.or(b),
    }
}
