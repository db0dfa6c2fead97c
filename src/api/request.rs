//! Request types for the Field Operations Engine API.
//!
//! This module defines the JSON bodies and query parameters accepted by the
//! schedule, session and report endpoints, plus their conversions into
//! domain types.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::CoreResult;
use crate::ledger::SessionCorrection;
use crate::models::{GeoSample, SessionStatus, SiteLocation};
use crate::schedule::{NewScheduleItem, SchedulePatch};

/// Request body for `POST /schedules`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateScheduleRequest {
    /// The work order being scheduled.
    pub work_order_id: String,
    /// The building the work order belongs to.
    pub building_id: String,
    /// The assigned worker.
    pub worker_id: String,
    /// The planned date.
    pub date: NaiveDate,
    /// Planned start time.
    pub start_time: NaiveTime,
    /// Planned end time.
    pub end_time: NaiveTime,
    /// Free-form scheduler notes.
    #[serde(default)]
    pub notes: Option<String>,
    /// Target job-site location.
    #[serde(default)]
    pub location: Option<SiteLocationRequest>,
}

impl CreateScheduleRequest {
    /// Converts the request into creation parameters, stamping the acting
    /// user.
    pub fn into_new_item(self, created_by: String) -> NewScheduleItem {
        NewScheduleItem {
            work_order_id: self.work_order_id,
            building_id: self.building_id,
            worker_id: self.worker_id,
            date: self.date,
            start_time: self.start_time,
            end_time: self.end_time,
            notes: self.notes,
            location: self.location.map(Into::into),
            created_by,
        }
    }
}

/// A job-site location in a request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteLocationRequest {
    /// Street address of the job site.
    pub address: String,
    /// Site latitude.
    pub latitude: f64,
    /// Site longitude.
    pub longitude: f64,
}

impl From<SiteLocationRequest> for SiteLocation {
    fn from(req: SiteLocationRequest) -> Self {
        SiteLocation {
            address: req.address,
            latitude: req.latitude,
            longitude: req.longitude,
        }
    }
}

/// Request body for `PATCH /schedules/{id}`. Unset fields keep their
/// current values.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EditScheduleRequest {
    /// New planned date.
    #[serde(default)]
    pub date: Option<NaiveDate>,
    /// New start time.
    #[serde(default)]
    pub start_time: Option<NaiveTime>,
    /// New end time.
    #[serde(default)]
    pub end_time: Option<NaiveTime>,
    /// Replacement worker.
    #[serde(default)]
    pub worker_id: Option<String>,
    /// Replacement notes.
    #[serde(default)]
    pub notes: Option<String>,
    /// Replacement site location.
    #[serde(default)]
    pub location: Option<SiteLocationRequest>,
}

impl From<EditScheduleRequest> for SchedulePatch {
    fn from(req: EditScheduleRequest) -> Self {
        SchedulePatch {
            date: req.date,
            start_time: req.start_time,
            end_time: req.end_time,
            worker_id: req.worker_id,
            notes: req.notes,
            location: req.location.map(Into::into),
        }
    }
}

/// A client-acquired location fix in a request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeoSampleRequest {
    /// Latitude in decimal degrees.
    pub latitude: f64,
    /// Longitude in decimal degrees.
    pub longitude: f64,
    /// Reported accuracy radius in meters.
    pub accuracy_m: f64,
    /// Reverse-geocoded address, when the client has one.
    #[serde(default)]
    pub address: Option<String>,
    /// When the fix was taken; defaults to the server clock.
    #[serde(default)]
    pub recorded_at: Option<DateTime<Utc>>,
}

impl GeoSampleRequest {
    /// Validates the fix into a [`GeoSample`], stamping `fallback_time`
    /// when the client supplied no timestamp.
    pub fn into_sample(self, fallback_time: DateTime<Utc>) -> CoreResult<GeoSample> {
        let sample = GeoSample::new(
            self.latitude,
            self.longitude,
            self.accuracy_m,
            self.recorded_at.unwrap_or(fallback_time),
        )?;
        Ok(match self.address {
            Some(address) => sample.with_address(address),
            None => sample,
        })
    }
}

/// Request body for `POST /schedules/{id}/check-in`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckInRequest {
    /// The client-acquired fix; absent when acquisition failed on-device.
    #[serde(default)]
    pub location: Option<GeoSampleRequest>,
}

/// Request body for `POST /schedules/{id}/check-out`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckOutRequest {
    /// The client-acquired fix; absent when acquisition failed on-device.
    #[serde(default)]
    pub location: Option<GeoSampleRequest>,
    /// Worker notes captured at check-out.
    #[serde(default)]
    pub notes: Option<String>,
}

/// Request body for `POST /sessions/{id}/reject`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RejectRequest {
    /// Why the session is being rejected; must not be blank.
    pub reason: String,
}

/// Request body for `POST /sessions/{id}/correct`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorrectionRequest {
    /// Hourly rate replacing the worker's profile rate.
    #[serde(default)]
    pub override_rate: Option<Decimal>,
    /// Hours replacing the computed duration.
    #[serde(default)]
    pub adjusted_hours: Option<Decimal>,
    /// Why the correction was made; must not be blank.
    pub reason: String,
}

impl From<CorrectionRequest> for SessionCorrection {
    fn from(req: CorrectionRequest) -> Self {
        SessionCorrection {
            override_rate: req.override_rate,
            adjusted_hours: req.adjusted_hours,
            reason: req.reason,
        }
    }
}

/// Query parameters for `GET /schedules`.
#[derive(Debug, Clone, Deserialize)]
pub struct ScheduleQuery {
    /// First day, inclusive.
    pub start: NaiveDate,
    /// Last day, inclusive.
    pub end: NaiveDate,
    /// Restrict to one worker.
    #[serde(default)]
    pub worker: Option<String>,
}

/// Query parameters for `GET /sessions`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SessionQuery {
    /// Restrict to one worker.
    #[serde(default)]
    pub worker: Option<String>,
    /// Restrict to one building.
    #[serde(default)]
    pub building: Option<String>,
    /// Sessions clocked in on or after this date.
    #[serde(default)]
    pub start: Option<NaiveDate>,
    /// Sessions clocked in on or before this date.
    #[serde(default)]
    pub end: Option<NaiveDate>,
    /// Restrict to one status.
    #[serde(default)]
    pub status: Option<SessionStatus>,
}

/// Query parameters for `GET /reports/payroll`.
#[derive(Debug, Clone, Deserialize)]
pub struct ReportQuery {
    /// First day, inclusive.
    pub start: NaiveDate,
    /// Last day, inclusive.
    pub end: NaiveDate,
    /// Restrict to one worker.
    #[serde(default)]
    pub worker: Option<String>,
}
