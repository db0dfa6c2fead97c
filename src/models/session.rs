//! Time session model and duration math.
//!
//! This module defines the [`TimeSession`] struct recording a worker's actual
//! clocked-in interval, independent from the schedule, plus the
//! [`SessionStatus`] lifecycle enum and [`SessionDuration`] type.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::GeoSample;

/// Lifecycle status of a time session.
///
/// Transitions: `active ⇄ paused → completed → approved | rejected`, where
/// `approved` and `rejected` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    /// Worker is on the clock.
    Active,
    /// Worker is on a break; break time accrues until resume.
    Paused,
    /// Worker has clocked out; awaiting review.
    Completed,
    /// Accepted by an administrator; counts toward payroll. Terminal.
    Approved,
    /// Rejected by an administrator with a reason; excluded from payroll.
    /// Terminal.
    Rejected,
}

impl SessionStatus {
    /// Returns true while the session is still on the clock
    /// (`active` or `paused`).
    pub fn is_open(&self) -> bool {
        matches!(self, Self::Active | Self::Paused)
    }

    /// Returns true once the session has reached a review decision.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Approved | Self::Rejected)
    }
}

/// The net worked duration of a session.
///
/// An open session reports [`SessionDuration::InProgress`] rather than zero
/// minutes, so callers can distinguish it from a genuinely zero-duration
/// completed session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "minutes")]
pub enum SessionDuration {
    /// The session has no clock-out time yet.
    InProgress,
    /// Net worked minutes: clock-out minus clock-in minus breaks, never
    /// negative.
    Minutes(i64),
}

/// A worker's actual clocked-in interval at a building.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSession {
    /// Unique identifier for the session.
    pub id: Uuid,
    /// The worker who clocked in.
    pub worker_id: String,
    /// The building the work took place at.
    pub building_id: String,
    /// The work order being fulfilled, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub work_order_id: Option<String>,
    /// The schedule item that triggered the check-in, when one exists.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule_id: Option<Uuid>,
    /// When the worker clocked in.
    pub clock_in_time: DateTime<Utc>,
    /// When the worker clocked out; `None` while the session is open.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clock_out_time: Option<DateTime<Utc>>,
    /// Accumulated break minutes across all pause/resume cycles.
    pub break_minutes: i64,
    /// When the current break started; set only while `paused`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paused_at: Option<DateTime<Utc>>,
    /// Current lifecycle status.
    pub status: SessionStatus,
    /// The location reading recorded at check-in.
    pub check_in: GeoSample,
    /// The location reading recorded at check-out; `None` while open.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub check_out: Option<GeoSample>,
    /// Free-form worker notes captured at check-out.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Opaque references to uploaded photos.
    #[serde(default)]
    pub photos: Vec<String>,
    /// The reviewer's reason; set only when `rejected`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<String>,
    /// Admin-supplied hourly rate replacing the worker's profile rate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub override_rate: Option<Decimal>,
    /// Admin-supplied hours replacing the computed duration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub adjusted_hours: Option<Decimal>,
    /// Why the session was corrected; set alongside an override or
    /// adjustment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correction_reason: Option<String>,
}

impl TimeSession {
    /// Computes the net worked duration of the session.
    ///
    /// `clock_out_time - clock_in_time - break_minutes`, clamped to zero.
    /// Open sessions report [`SessionDuration::InProgress`].
    ///
    /// # Example
    ///
    /// ```
    /// use fieldops_engine::models::{SessionDuration, SessionStatus, TimeSession, GeoSample};
    /// use chrono::Utc;
    /// use uuid::Uuid;
    ///
    /// let clock_in = "2026-03-02T09:00:00Z".parse().unwrap();
    /// let sample = GeoSample::new(40.7, -74.0, 10.0, clock_in).unwrap();
    /// let mut session = TimeSession {
    ///     id: Uuid::new_v4(),
    ///     worker_id: "w_001".to_string(),
    ///     building_id: "bld_7".to_string(),
    ///     work_order_id: None,
    ///     schedule_id: None,
    ///     clock_in_time: clock_in,
    ///     clock_out_time: None,
    ///     break_minutes: 30,
    ///     paused_at: None,
    ///     status: SessionStatus::Active,
    ///     check_in: sample,
    ///     check_out: None,
    ///     notes: None,
    ///     photos: vec![],
    ///     rejection_reason: None,
    ///     override_rate: None,
    ///     adjusted_hours: None,
    ///     correction_reason: None,
    /// };
    /// assert_eq!(session.duration(), SessionDuration::InProgress);
    ///
    /// session.clock_out_time = Some("2026-03-02T17:00:00Z".parse().unwrap());
    /// assert_eq!(session.duration(), SessionDuration::Minutes(450));
    /// ```
    pub fn duration(&self) -> SessionDuration {
        match self.clock_out_time {
            None => SessionDuration::InProgress,
            Some(out) => {
                let net = (out - self.clock_in_time).num_minutes() - self.break_minutes;
                SessionDuration::Minutes(net.max(0))
            }
        }
    }

    /// Net worked hours as a decimal, or `None` while the session is open.
    pub fn worked_hours(&self) -> Option<Decimal> {
        match self.duration() {
            SessionDuration::InProgress => None,
            SessionDuration::Minutes(m) => Some(Decimal::from(m) / Decimal::from(60)),
        }
    }
}
