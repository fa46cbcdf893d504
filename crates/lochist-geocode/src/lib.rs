//! Lochist Geocode - Reverse geocoding adapters
//!
//! This crate resolves visit centroids to human-readable addresses through the
//! [`ReverseGeocoder`](lochist_core::ports::ReverseGeocoder) port.

pub mod cache;
pub mod language;
pub mod nominatim;
pub mod resolver;

// Re-export main types
pub use cache::GeocodeCache;
pub use language::language_for_country;
pub use nominatim::NominatimGeocoder;
pub use resolver::AddressResolver;
