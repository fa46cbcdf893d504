use crate::geo::{centroid, GeoPoint};
use crate::models::time::{serialize_seconds, TimePoint};
use chrono::TimeDelta;
use serde::Serialize;

/// A single stay observation taken from a visit segment
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VisitEvent {
    pub start: TimePoint,
    pub end: TimePoint,
    pub location: GeoPoint,
}

impl VisitEvent {
    pub fn new(start: TimePoint, end: TimePoint, location: GeoPoint) -> Self {
        Self { start, end, location }
    }

    pub fn duration(&self) -> TimeDelta {
        self.end - self.start
    }
}

/// One or more visit events merged into a single continuous stay
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VisitEpisode {
    pub start: TimePoint,
    pub end: TimePoint,

    /// Member coordinates in the order the events were merged
    pub coordinates: Vec<GeoPoint>,
}

impl VisitEpisode {
    /// Open an episode from its first event
    pub fn from_event(event: &VisitEvent) -> Self {
        Self {
            start: event.start,
            end: event.end,
            coordinates: vec![event.location],
        }
    }

    /// Fold another event into this episode
    pub fn absorb(&mut self, event: &VisitEvent) {
        self.start = self.start.min(event.start);
        self.end = self.end.max(event.end);
        self.coordinates.push(event.location);
    }

    pub fn duration(&self) -> TimeDelta {
        self.end - self.start
    }

    pub fn event_count(&self) -> usize {
        self.coordinates.len()
    }

    /// Mean of the member coordinates, unweighted by duration
    pub fn centroid(&self) -> GeoPoint {
        // An episode always holds at least its opening event
        centroid(&self.coordinates).unwrap_or(GeoPoint::new(f64::NAN, f64::NAN))
    }
}

/// Report entry for one episode with its resolved address
#[derive(Debug, Clone, Serialize)]
pub struct EpisodeSummary {
    pub start: TimePoint,
    pub end: TimePoint,

    #[serde(rename = "duration_secs", serialize_with = "serialize_seconds")]
    pub duration: TimeDelta,

    pub centroid: GeoPoint,
    pub event_count: usize,
    pub address: String,
}

impl EpisodeSummary {
    pub fn new(episode: &VisitEpisode, address: impl Into<String>) -> Self {
        Self {
            start: episode.start,
            end: episode.end,
            duration: episode.duration(),
            centroid: episode.centroid(),
            event_count: episode.event_count(),
            address: address.into(),
        }
    }
}
