//! Clustering of visit events near a reference point into stay episodes.

use crate::geo::GeoPoint;
use crate::models::visit::{VisitEpisode, VisitEvent};
use chrono::TimeDelta;

/// Default shortest visit that is considered at all
pub const DEFAULT_MIN_DURATION_MINUTES: i64 = 5;

/// Default longest pause between two events of the same stay
pub const DEFAULT_ADJACENCY_HOURS: i64 = 24;

/// Parameters of a clustering run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClusterSettings {
    pub reference: GeoPoint,
    pub radius_meters: f64,
    pub min_duration: TimeDelta,
    pub adjacency_window: TimeDelta,
}

impl ClusterSettings {
    /// Settings with the default minimum duration and adjacency window
    pub fn new(reference: GeoPoint, radius_meters: f64) -> Self {
        Self {
            reference,
            radius_meters,
            min_duration: TimeDelta::minutes(DEFAULT_MIN_DURATION_MINUTES),
            adjacency_window: TimeDelta::hours(DEFAULT_ADJACENCY_HOURS),
        }
    }

    pub fn with_min_duration(mut self, min_duration: TimeDelta) -> Self {
        self.min_duration = min_duration;
        self
    }

    pub fn with_adjacency_window(mut self, adjacency_window: TimeDelta) -> Self {
        self.adjacency_window = adjacency_window;
        self
    }
}

/// Groups visit events into [`VisitEpisode`]s.
///
/// Events are expected in chronological order of their start time; the clusterer
/// does not reorder them.
#[derive(Debug, Clone)]
pub struct VisitClusterer {
    settings: ClusterSettings,
}

impl VisitClusterer {
    pub fn new(settings: ClusterSettings) -> Self {
        Self { settings }
    }

    /// Whether an event is long enough and close enough to take part
    pub fn accepts(&self, event: &VisitEvent) -> bool {
        if event.duration() < self.settings.min_duration {
            return false;
        }
        self.settings.reference.distance_to(&event.location) <= self.settings.radius_meters
    }

    pub fn cluster(&self, events: &[VisitEvent]) -> Vec<VisitEpisode> {
        let mut episodes = Vec::new();
        let mut current: Option<VisitEpisode> = None;

        for event in events.iter().filter(|e| self.accepts(e)) {
            match current.as_mut() {
                Some(open) if event.start - open.end <= self.settings.adjacency_window => {
                    open.absorb(event);
                }
                _ => {
                    if let Some(done) = current.replace(VisitEpisode::from_event(event)) {
                        episodes.push(done);
                    }
                }
            }
        }

        episodes.extend(current);

        tracing::debug!(
            events = events.len(),
            episodes = episodes.len(),
            radius_meters = self.settings.radius_meters,
            "Clustered visits"
        );

        episodes
    }
}
