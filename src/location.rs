//! Geolocation acquisition capability.
//!
//! Location readings come from an external provider (in production, the
//! worker's device). The core treats acquisition as a blocking dependency
//! with a caller-supplied timeout: check-in and check-out pass a
//! [`LocationProvider`] in explicitly, and a failed acquisition fails the
//! whole operation before any session or sample is created.

use std::time::Duration;

use thiserror::Error;

use crate::error::CoreError;
use crate::models::GeoSample;

/// Why a location reading could not be acquired.
///
/// All cases fold into [`CoreError::LocationUnavailable`] at the core
/// boundary; the split exists so providers can report what actually
/// happened.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocationError {
    /// The provider did not produce a fix within the allotted timeout.
    #[error("location acquisition timed out")]
    Timeout,
    /// The device refused access to location services.
    #[error("location permission denied")]
    PermissionDenied,
    /// The provider failed for another reason.
    #[error("{0}")]
    Unavailable(String),
}

impl From<LocationError> for CoreError {
    fn from(error: LocationError) -> Self {
        CoreError::LocationUnavailable {
            message: error.to_string(),
        }
    }
}

/// Parameters of one acquisition attempt.
#[derive(Debug, Clone)]
pub struct LocationRequest {
    /// The worker whose position is being read.
    pub worker_id: String,
    /// How long the provider may block before giving up.
    pub timeout: Duration,
}

/// Capability for acquiring a geolocation reading.
///
/// The core never retries a failed acquisition; retrying is the caller's
/// decision.
pub trait LocationProvider: Send + Sync {
    /// Acquires a single location reading, blocking up to
    /// `request.timeout`.
    fn acquire(&self, request: &LocationRequest) -> Result<GeoSample, LocationError>;
}

/// A provider wrapping a fix the client already acquired on-device.
///
/// The HTTP layer builds one of these from the coordinates in the request
/// body; a request without a fix reports [`LocationError::Unavailable`],
/// which keeps the no-sample-no-session contract in one place.
#[derive(Debug, Clone)]
pub struct ReportedLocation {
    sample: Option<GeoSample>,
}

impl ReportedLocation {
    /// Wraps an optional client-reported fix.
    pub fn new(sample: Option<GeoSample>) -> Self {
        Self { sample }
    }
}

impl LocationProvider for ReportedLocation {
    fn acquire(&self, _request: &LocationRequest) -> Result<GeoSample, LocationError> {
        self.sample
            .clone()
            .ok_or_else(|| LocationError::Unavailable("no location fix supplied".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> LocationRequest {
        LocationRequest {
            worker_id: "w_001".to_string(),
            timeout: Duration::from_secs(10),
        }
    }

    fn sample() -> GeoSample {
        GeoSample::new(40.7, -74.0, 10.0, "2026-03-02T09:00:00Z".parse().unwrap()).unwrap()
    }

    #[test]
    fn test_reported_location_returns_sample() {
        let provider = ReportedLocation::new(Some(sample()));
        let acquired = provider.acquire(&request()).unwrap();
        assert_eq!(acquired, sample());
    }

    #[test]
    fn test_reported_location_without_fix_is_unavailable() {
        let provider = ReportedLocation::new(None);
        let err = provider.acquire(&request()).unwrap_err();
        assert!(matches!(err, LocationError::Unavailable(_)));
    }

    #[test]
    fn test_location_error_folds_into_core_error() {
        let core: CoreError = LocationError::Timeout.into();
        assert_eq!(
            core.to_string(),
            "Location unavailable: location acquisition timed out"
        );

        let core: CoreError = LocationError::PermissionDenied.into();
        assert!(matches!(core, CoreError::LocationUnavailable { .. }));
    }
}
