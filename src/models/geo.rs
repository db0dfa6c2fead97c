//! Geolocation sample model.
//!
//! This module defines the [`GeoSample`] struct representing a single
//! timestamped location reading attached to a check-in or check-out event.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// A single timestamped location reading.
///
/// One sample is recorded per check-in and one per check-out; a sample is
/// immutable once attached to a time session.
///
/// # Example
///
/// ```
/// use fieldops_engine::models::GeoSample;
/// use chrono::Utc;
///
/// let sample = GeoSample::new(40.7128, -74.0060, 12.5, Utc::now()).unwrap();
/// assert_eq!(sample.accuracy_m, 12.5);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoSample {
    /// Latitude in decimal degrees, within [-90, 90].
    pub latitude: f64,
    /// Longitude in decimal degrees, within [-180, 180].
    pub longitude: f64,
    /// Reported accuracy radius in meters, non-negative.
    pub accuracy_m: f64,
    /// Reverse-geocoded street address, when available.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// When the reading was taken.
    pub recorded_at: DateTime<Utc>,
    /// Optional activity label reported alongside the reading.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activity: Option<String>,
}

impl GeoSample {
    /// Creates a validated geolocation sample.
    ///
    /// # Errors
    ///
    /// Returns a validation error when latitude, longitude or accuracy are
    /// outside their legal ranges.
    pub fn new(
        latitude: f64,
        longitude: f64,
        accuracy_m: f64,
        recorded_at: DateTime<Utc>,
    ) -> CoreResult<Self> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(CoreError::validation(
                "latitude",
                format!("{latitude} is outside [-90, 90]"),
            ));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(CoreError::validation(
                "longitude",
                format!("{longitude} is outside [-180, 180]"),
            ));
        }
        if !accuracy_m.is_finite() || accuracy_m < 0.0 {
            return Err(CoreError::validation(
                "accuracy_m",
                format!("{accuracy_m} must be a non-negative number of meters"),
            ));
        }

        Ok(Self {
            latitude,
            longitude,
            accuracy_m,
            address: None,
            recorded_at,
            activity: None,
        })
    }

    /// Attaches a reverse-geocoded address to the sample.
    ///
    /// Reverse geocoding is a best-effort external enrichment; a sample
    /// without an address is still valid.
    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    /// Attaches an activity label to the sample.
    pub fn with_activity(mut self, activity: impl Into<String>) -> Self {
        self.activity = Some(activity.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> DateTime<Utc> {
        "2026-03-02T09:00:00Z".parse().unwrap()
    }

    #[test]
    fn test_valid_sample() {
        let sample = GeoSample::new(40.7128, -74.0060, 12.5, now()).unwrap();
        assert_eq!(sample.latitude, 40.7128);
        assert_eq!(sample.longitude, -74.0060);
        assert!(sample.address.is_none());
    }

    #[test]
    fn test_boundary_coordinates_are_valid() {
        assert!(GeoSample::new(90.0, 180.0, 0.0, now()).is_ok());
        assert!(GeoSample::new(-90.0, -180.0, 0.0, now()).is_ok());
    }

    #[test]
    fn test_latitude_out_of_range() {
        let err = GeoSample::new(90.01, 0.0, 5.0, now()).unwrap_err();
        assert!(matches!(err, CoreError::Validation { ref field, .. } if field == "latitude"));
    }

    #[test]
    fn test_longitude_out_of_range() {
        let err = GeoSample::new(0.0, -180.5, 5.0, now()).unwrap_err();
        assert!(matches!(err, CoreError::Validation { ref field, .. } if field == "longitude"));
    }

    #[test]
    fn test_negative_accuracy_rejected() {
        let err = GeoSample::new(0.0, 0.0, -1.0, now()).unwrap_err();
        assert!(matches!(err, CoreError::Validation { ref field, .. } if field == "accuracy_m"));
    }

    #[test]
    fn test_nan_coordinates_rejected() {
        assert!(GeoSample::new(f64::NAN, 0.0, 5.0, now()).is_err());
        assert!(GeoSample::new(0.0, f64::NAN, 5.0, now()).is_err());
        assert!(GeoSample::new(0.0, 0.0, f64::NAN, now()).is_err());
    }

    #[test]
    fn test_with_address_and_activity() {
        let sample = GeoSample::new(40.0, -74.0, 8.0, now())
            .unwrap()
            .with_address("350 5th Ave, New York")
            .with_activity("check_in");
        assert_eq!(sample.address.as_deref(), Some("350 5th Ave, New York"));
        assert_eq!(sample.activity.as_deref(), Some("check_in"));
    }

    #[test]
    fn test_serialization_round_trip() {
        let sample = GeoSample::new(40.7128, -74.0060, 12.5, now())
            .unwrap()
            .with_address("350 5th Ave");
        let json = serde_json::to_string(&sample).unwrap();
        let deserialized: GeoSample = serde_json::from_str(&json).unwrap();
        assert_eq!(sample, deserialized);
    }

    #[test]
    fn test_optional_fields_skipped_when_none() {
        let sample = GeoSample::new(40.0, -74.0, 8.0, now()).unwrap();
        let json = serde_json::to_string(&sample).unwrap();
        assert!(!json.contains("address"));
        assert!(!json.contains("activity"));
    }
}
