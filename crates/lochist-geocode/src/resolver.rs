//! Address resolution with local-language preference and memoization

use crate::cache::GeocodeCache;
use crate::language::language_for_country;
use lochist_core::geo::GeoPoint;
use lochist_core::ports::ReverseGeocoder;

/// Language used to discover the country of a location
const PROBE_LANGUAGE: &str = "en";

/// Resolves coordinates to addresses through a [`ReverseGeocoder`].
///
/// The local language of the location is tried first, then the fallback language.
/// Lookups never fail: when every attempt errors or comes back empty the address
/// is an empty string.
pub struct AddressResolver<G> {
    geocoder: G,
    fallback_language: String,
    languages: GeocodeCache<Option<String>>,
    addresses: GeocodeCache<String>,
}

impl<G: ReverseGeocoder> AddressResolver<G> {
    pub fn new(geocoder: G, fallback_language: impl Into<String>, cache_size: usize) -> Self {
        Self {
            geocoder,
            fallback_language: fallback_language.into(),
            languages: GeocodeCache::new(cache_size),
            addresses: GeocodeCache::new(cache_size),
        }
    }

    pub fn geocoder(&self) -> &G {
        &self.geocoder
    }

    /// Guess the primary local language at `point` from its country
    pub async fn guess_language(&self, point: GeoPoint) -> Option<String> {
        if let Some(cached) = self.languages.get(point) {
            return cached;
        }

        match self.geocoder.reverse(point, PROBE_LANGUAGE).await {
            Ok(place) => {
                let language = place
                    .and_then(|p| p.resolved_country_code())
                    .map(|code| language_for_country(&code));
                self.languages.insert(point, language.clone());
                language
            }
            Err(e) => {
                tracing::warn!(service = self.geocoder.service_name(), "Language lookup failed: {}", e);
                None
            }
        }
    }

    /// Human-readable address at `point`, or an empty string
    pub async fn resolve_address(&self, point: GeoPoint) -> String {
        if let Some(cached) = self.addresses.get(point) {
            return cached;
        }

        let mut candidates = Vec::with_capacity(2);
        if let Some(local) = self.guess_language(point).await {
            candidates.push(local);
        }
        if !candidates.contains(&self.fallback_language) {
            candidates.push(self.fallback_language.clone());
        }

        for language in &candidates {
            match self.geocoder.reverse(point, language).await {
                Ok(Some(place)) => {
                    let address = place.format_address();
                    if !address.is_empty() {
                        self.addresses.insert(point, address.clone());
                        return address;
                    }
                    tracing::debug!(language = %language, point = %point, "Empty address");
                }
                Ok(None) => {
                    tracing::debug!(language = %language, point = %point, "No place found");
                }
                Err(e) => {
                    tracing::warn!(language = %language, "Address lookup failed: {}", e);
                }
            }
        }

        String::new()
    }
}
