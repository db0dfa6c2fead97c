//! Payroll report models.
//!
//! This module contains the derived payment structures produced by the
//! payroll aggregation engine: per-worker [`PaymentRecord`]s with their
//! per-session [`PaymentLine`]s, the enclosing [`PayrollReport`], and the
//! flat [`ReportRow`] export form.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One session's contribution to a worker's pay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentLine {
    /// The session this line was computed from.
    pub session_id: Uuid,
    /// The date of the session (clock-in date).
    pub date: NaiveDate,
    /// Display name of the building worked at.
    pub building: String,
    /// Apartment or unit identifier, when the work order names one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub apartment: Option<String>,
    /// The type of work performed, when the work order names one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub work_type: Option<String>,
    /// Payable hours for the session.
    pub hours: Decimal,
    /// The hourly rate applied to this session.
    pub hourly_rate: Decimal,
    /// `hours * hourly_rate`.
    pub pay: Decimal,
    /// True when the rate or hours diverge from the worker's profile default.
    pub was_corrected: bool,
    /// Why the session was corrected; non-empty whenever `was_corrected`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correction_reason: Option<String>,
}

/// Per-worker payroll summary.
///
/// Totals are sums over the worker's lines: `total_hours = Σ hours`,
/// `total_pay = Σ pay`, and `avg_hourly_rate = total_pay / total_hours`
/// (zero when no hours were worked).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentRecord {
    /// The worker's directory id.
    pub worker_id: String,
    /// The worker's display name.
    pub worker_name: String,
    /// The worker's email address.
    pub worker_email: String,
    /// Sum of payable hours across all lines.
    pub total_hours: Decimal,
    /// Sum of pay across all lines.
    pub total_pay: Decimal,
    /// Number of sessions contributing to this record.
    pub sessions_count: usize,
    /// `total_pay / total_hours`, or zero when `total_hours` is zero.
    pub avg_hourly_rate: Decimal,
    /// Per-session lines, ordered by date ascending.
    pub lines: Vec<PaymentLine>,
}

/// A session excluded from aggregation because it has no clock-out time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncompleteSession {
    /// The open session's id.
    pub session_id: Uuid,
    /// The worker the session belongs to.
    pub worker_id: String,
    /// When the worker clocked in.
    pub clock_in_time: DateTime<Utc>,
}

/// The full output of a payroll computation.
///
/// Records are ordered by worker name ascending (ties broken by worker id)
/// so repeated runs over the same input produce identical output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollReport {
    /// First day covered by the report, inclusive.
    pub start_date: NaiveDate,
    /// Last day covered by the report, inclusive.
    pub end_date: NaiveDate,
    /// One record per worker with at least one payable session.
    pub records: Vec<PaymentRecord>,
    /// In-range sessions still missing a clock-out, excluded from all totals.
    pub incomplete: Vec<IncompleteSession>,
}

/// One row of the flat tabular export: a payment line with its worker-level
/// fields repeated, as consumed by the CSV presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRow {
    /// The worker's display name.
    pub worker_name: String,
    /// The worker's email address.
    pub worker_email: String,
    /// The date of the session.
    pub date: NaiveDate,
    /// Display name of the building worked at.
    pub building: String,
    /// Apartment or unit identifier, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub apartment: Option<String>,
    /// The type of work performed, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub work_type: Option<String>,
    /// Payable hours for the session.
    pub hours: Decimal,
    /// The hourly rate applied.
    pub hourly_rate: Decimal,
    /// `hours * hourly_rate`.
    pub pay: Decimal,
    /// True when the session was corrected.
    pub was_corrected: bool,
    /// The correction reason, when corrected.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correction_reason: Option<String>,
}

impl PayrollReport {
    /// Flattens the report into one row per session line, with worker-level
    /// fields repeated on every row.
    pub fn flatten(&self) -> Vec<ReportRow> {
        self.records
            .iter()
            .flat_map(|record| {
                record.lines.iter().map(|line| ReportRow {
                    worker_name: record.worker_name.clone(),
                    worker_email: record.worker_email.clone(),
                    date: line.date,
                    building: line.building.clone(),
                    apartment: line.apartment.clone(),
                    work_type: line.work_type.clone(),
                    hours: line.hours,
                    hourly_rate: line.hourly_rate,
                    pay: line.pay,
                    was_corrected: line.was_corrected,
                    correction_reason: line.correction_reason.clone(),
                })
            })
            .collect()
    }
}
