//! Schedule item model and status enum.
//!
//! This module defines the [`ScheduleItem`] struct representing a planned
//! assignment of a worker to a work order within a time window, and the
//! [`ScheduleStatus`] lifecycle enum.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle status of a schedule item.
///
/// Transitions are monotonic: `scheduled → in_progress → completed`, with
/// `cancelled` reachable from `scheduled` or `in_progress` only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleStatus {
    /// Planned, no check-in has happened yet.
    Scheduled,
    /// Worker has checked in at the site.
    InProgress,
    /// Worker has checked out; terminal.
    Completed,
    /// Cancelled before completion; terminal.
    Cancelled,
}

impl ScheduleStatus {
    /// Returns true if no further transitions are allowed from this status.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    /// Returns true if the item may still be cancelled.
    pub fn can_cancel(&self) -> bool {
        matches!(self, Self::Scheduled | Self::InProgress)
    }
}

/// The target address and coordinates of a scheduled job site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteLocation {
    /// Street address of the job site.
    pub address: String,
    /// Site latitude in decimal degrees.
    pub latitude: f64,
    /// Site longitude in decimal degrees.
    pub longitude: f64,
}

/// A planned assignment of a worker to a work order within a time window.
///
/// The associated time session is linked explicitly via `session_id` once
/// check-in occurs, so callers never have to match sessions to plans by
/// worker and time-window heuristics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleItem {
    /// Unique identifier for the schedule item.
    pub id: Uuid,
    /// The work order this assignment fulfils.
    pub work_order_id: String,
    /// The building the work order belongs to.
    pub building_id: String,
    /// The assigned worker.
    pub worker_id: String,
    /// The planned date of the assignment.
    pub date: NaiveDate,
    /// Planned wall-clock start time.
    pub start_time: NaiveTime,
    /// Planned wall-clock end time; always after `start_time`.
    pub end_time: NaiveTime,
    /// Current lifecycle status.
    pub status: ScheduleStatus,
    /// Free-form scheduler notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Target job-site location, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<SiteLocation>,
    /// The time session created at check-in, once one exists.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<Uuid>,
    /// The user who created the item, for audit purposes.
    pub created_by: String,
}
