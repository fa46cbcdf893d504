//! Analysis engine: gap scanning, visit clustering and segment merging

pub mod gaps;
pub mod merge;
pub mod visits;

pub use gaps::{find_gaps, scan_stream, GapScanner, StreamScan, TimelineStream};
pub use merge::merge_collections;
pub use visits::{ClusterSettings, VisitClusterer};
