use async_trait::async_trait;
use lochist_core::error::{LochistError, Result};
use lochist_core::geo::GeoPoint;
use lochist_core::models::Place;
use lochist_core::ports::ReverseGeocoder;
use serde::Deserialize;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

/// Nominatim usage policy allows one request per second
const MIN_REQUEST_INTERVAL: Duration = Duration::from_secs(1);

/// Nominatim (OpenStreetMap) reverse geocoder
pub struct NominatimGeocoder {
    /// Base URL for the Nominatim API (e.g., "https://nominatim.openstreetmap.org")
    base_url: String,

    /// HTTP client
    client: reqwest::Client,

    /// Time of the previous request, for throttling
    last_request: Mutex<Option<Instant>>,
}

impl NominatimGeocoder {
    /// Create a new geocoder with a User-Agent and per-request timeout
    pub fn new(base_url: impl Into<String>, user_agent: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()
            .map_err(|e| LochistError::GeocodingUnavailable {
                reason: format!("Failed to create HTTP client: {}", e),
            })?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
            last_request: Mutex::new(None),
        })
    }

    fn reverse_url(&self, point: GeoPoint, language: &str) -> String {
        format!(
            "{}/reverse?format=jsonv2&lat={}&lon={}&accept-language={}",
            self.base_url, point.lat, point.lon, language
        )
    }

    async fn throttle(&self) {
        let mut last = self.last_request.lock().await;
        if let Some(previous) = *last {
            let elapsed = previous.elapsed();
            if elapsed < MIN_REQUEST_INTERVAL {
                tokio::time::sleep(MIN_REQUEST_INTERVAL - elapsed).await;
            }
        }
        *last = Some(Instant::now());
    }
}

#[async_trait]
impl ReverseGeocoder for NominatimGeocoder {
    async fn reverse(&self, point: GeoPoint, language: &str) -> Result<Option<Place>> {
        self.throttle().await;

        let url = self.reverse_url(point, language);
        tracing::debug!(url = %url, "Reverse geocoding");

        let response = self.client.get(&url).send().await.map_err(|e| {
            let reason = if e.is_timeout() {
                format!("Nominatim timed out for {}", point)
            } else {
                format!("Failed to connect to Nominatim at {}: {}", self.base_url, e)
            };
            LochistError::GeocodingUnavailable { reason }
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(LochistError::GeocodingUnavailable {
                reason: format!("Nominatim API error ({}): {}", status, error_text),
            });
        }

        let body: NominatimResponse =
            response.json().await.map_err(|e| LochistError::GeocodingUnavailable {
                reason: format!("Failed to parse Nominatim response: {}", e),
            })?;

        Ok(body.into_place())
    }

    fn service_name(&self) -> &str {
        "nominatim"
    }
}

/// Response from the Nominatim reverse endpoint
#[derive(Debug, Deserialize)]
struct NominatimResponse {
    #[serde(default)]
    address: Option<Place>,

    /// Present instead of an address when nothing is known at the location
    #[serde(default)]
    error: Option<String>,
}

impl NominatimResponse {
    fn into_place(self) -> Option<Place> {
        if let Some(error) = self.error {
            tracing::debug!(error = %error, "Nominatim returned no place");
            return None;
        }
        self.address
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reverse_url() {
        let geocoder =
            NominatimGeocoder::new("http://localhost:8080/", "lochist-test", Duration::from_secs(1))
                .unwrap();
        assert_eq!(
            geocoder.reverse_url(GeoPoint::new(60.1699, 24.9384), "fi"),
            "http://localhost:8080/reverse?format=jsonv2&lat=60.1699&lon=24.9384&accept-language=fi"
        );
        assert_eq!(geocoder.service_name(), "nominatim");
    }

    #[test]
    fn test_response_with_address() {
        let body: NominatimResponse = serde_json::from_str(
            r#"{
                "place_id": 1,
                "display_name": "13, Mannerheimintie, Kluuvi, Helsinki, Suomi / Finland",
                "address": {
                    "house_number": "13",
                    "road": "Mannerheimintie",
                    "neighbourhood": "Kluuvi",
                    "city": "Helsinki",
                    "country": "Suomi / Finland",
                    "country_code": "fi"
                }
            }"#,
        )
        .unwrap();

        let place = body.into_place().unwrap();
        assert_eq!(place.format_address(), "Mannerheimintie 13, Kluuvi, Helsinki");
        assert_eq!(place.resolved_country_code().as_deref(), Some("fi"));
    }

    #[test]
    fn test_response_with_error() {
        let body: NominatimResponse =
            serde_json::from_str(r#"{"error": "Unable to geocode"}"#).unwrap();
        assert!(body.into_place().is_none());
    }

    #[tokio::test]
    async fn test_unreachable_service_is_unavailable() {
        // Port 9 (discard) on localhost is expected to refuse connections
        let geocoder =
            NominatimGeocoder::new("http://127.0.0.1:9", "lochist-test", Duration::from_secs(2))
                .unwrap();
        let err = geocoder.reverse(GeoPoint::new(0.0, 0.0), "en").await.unwrap_err();
        assert!(matches!(err, LochistError::GeocodingUnavailable { .. }));
    }
}
