//! Lochist Core - Timeline models, analysis engine, and configuration
//!
//! This crate contains the gap scanner, visit clusterer and segment merger for
//! location-history exports, together with the port definitions the adapters implement.

pub mod analysis;
pub mod config;
pub mod error;
pub mod formats;
pub mod geo;
pub mod models;
pub mod ports;

pub use error::{Diagnostic, DiagnosticKind, LochistError, Result};
