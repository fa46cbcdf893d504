//! Coordinates and geodesic distance

use crate::error::{LochistError, Result};
use ::geo::{Distance, Geodesic, Point};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A WGS 84 latitude/longitude pair in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Create a point, rejecting out-of-range or non-finite degrees
    pub fn checked(lat: f64, lon: f64) -> Result<Self> {
        let invalid = |reason: &str| LochistError::InvalidCoordinate {
            value: format!("{}, {}", lat, lon),
            reason: reason.to_string(),
        };

        if !lat.is_finite() || !lon.is_finite() {
            return Err(invalid("coordinates must be finite"));
        }
        if !(-90.0..=90.0).contains(&lat) {
            return Err(invalid("latitude must be within [-90, 90]"));
        }
        if !(-180.0..=180.0).contains(&lon) {
            return Err(invalid("longitude must be within [-180, 180]"));
        }
        Ok(Self::new(lat, lon))
    }

    /// Geodesic (WGS 84 ellipsoid) distance in meters
    pub fn distance_to(&self, other: &GeoPoint) -> f64 {
        Geodesic.distance(self.to_point(), other.to_point())
    }

    fn to_point(self) -> Point {
        // geo points are (x = lon, y = lat)
        Point::new(self.lon, self.lat)
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}, {:.6}", self.lat, self.lon)
    }
}

/// Parse a `"lat, lon"` location string such as `"60.1699°, 24.9384°"`
pub fn parse_lat_lng(text: &str) -> Result<GeoPoint> {
    let invalid = |reason: &str| LochistError::InvalidCoordinate {
        value: text.to_string(),
        reason: reason.to_string(),
    };

    let cleaned = text.replace('°', "");
    let mut parts = cleaned.split(',').map(str::trim);

    let (lat, lon) = match (parts.next(), parts.next(), parts.next()) {
        (Some(lat), Some(lon), None) => (lat, lon),
        _ => return Err(invalid("expected two comma-separated values")),
    };

    let lat: f64 = lat.parse().map_err(|_| invalid("latitude is not a number"))?;
    let lon: f64 = lon.parse().map_err(|_| invalid("longitude is not a number"))?;

    GeoPoint::checked(lat, lon).map_err(|e| match e {
        LochistError::InvalidCoordinate { reason, .. } => invalid(&reason),
        other => other,
    })
}

/// Unweighted arithmetic mean of the given points
pub fn centroid(points: &[GeoPoint]) -> Option<GeoPoint> {
    if points.is_empty() {
        return None;
    }

    let n = points.len() as f64;
    let lat = points.iter().map(|p| p.lat).sum::<f64>() / n;
    let lon = points.iter().map(|p| p.lon).sum::<f64>() / n;
    Some(GeoPoint::new(lat, lon))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_with_degree_symbols() {
        let p = parse_lat_lng("60.1699°, 24.9384°").unwrap();
        assert_eq!(p, GeoPoint::new(60.1699, 24.9384));
    }

    #[test]
    fn test_parse_without_degree_symbols_or_space() {
        let p = parse_lat_lng("-8.5069,115.2625").unwrap();
        assert_eq!(p, GeoPoint::new(-8.5069, 115.2625));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_lat_lng("").is_err());
        assert!(parse_lat_lng("60.1").is_err());
        assert!(parse_lat_lng("60.1, 24.9, 3").is_err());
        assert!(parse_lat_lng("north, east").is_err());
        assert!(parse_lat_lng("95.0, 24.9").is_err());
        assert!(parse_lat_lng("45.0, 190.0").is_err());
    }

    #[test]
    fn test_geodesic_distance_accuracy() {
        // Paris to London is about 344 km
        let paris = GeoPoint::new(48.8566, 2.3522);
        let london = GeoPoint::new(51.5074, -0.1276);

        let distance = paris.distance_to(&london);
        assert!(
            distance > 339_000.0 && distance < 349_000.0,
            "Paris-London distance {} should be ~344km",
            distance
        );
    }

    #[test]
    fn test_geodesic_distance_same_point() {
        let p = GeoPoint::new(60.1699, 24.9384);
        assert!(p.distance_to(&p) < 0.001);
    }

    #[test]
    fn test_centroid_is_mean() {
        assert!(centroid(&[]).is_none());

        let single = [GeoPoint::new(60.0, 24.0)];
        assert_eq!(centroid(&single), Some(GeoPoint::new(60.0, 24.0)));

        let pair = [GeoPoint::new(60.0, 24.0), GeoPoint::new(62.0, 26.0)];
        assert_eq!(centroid(&pair), Some(GeoPoint::new(61.0, 25.0)));
    }
}
