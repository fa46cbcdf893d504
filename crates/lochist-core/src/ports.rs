//! Port trait definitions
//!
//! These traits define the interfaces that adapters must implement.

pub mod geocoding;

pub use geocoding::ReverseGeocoder;
