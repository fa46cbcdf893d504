//! Input document readers

pub mod timeline;

pub use timeline::{load_export, visit_event, TimelineExport};
