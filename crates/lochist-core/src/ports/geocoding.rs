use crate::error::Result;
use crate::geo::GeoPoint;
use crate::models::Place;
use async_trait::async_trait;

/// Port for reverse geocoding services
#[async_trait]
pub trait ReverseGeocoder: Send + Sync {
    /// Look up the place at `point`, with names in `language` where available.
    ///
    /// `Ok(None)` means the service answered but knows nothing at this location.
    async fn reverse(&self, point: GeoPoint, language: &str) -> Result<Option<Place>>;

    /// Name of the service, for logs
    fn service_name(&self) -> &str;
}
