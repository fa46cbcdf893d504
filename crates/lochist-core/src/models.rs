pub mod gap;
pub mod place;
pub mod segment;
pub mod time;
pub mod visit;

pub use gap::{GapRecord, GapReport, StreamGaps};
pub use place::Place;
pub use segment::{MergedCollection, SourceCollection, SourceSummary};
pub use time::{TimePoint, WeekdayLocale};
pub use visit::{EpisodeSummary, VisitEpisode, VisitEvent};
