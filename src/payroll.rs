//! Payroll aggregation engine.
//!
//! [`compute_report`] is a pure fold over a snapshot of time sessions: it
//! filters to a date range and optional worker, groups by worker, prices
//! each session with the worker's profile rate or a recorded override, and
//! sums worker-level totals. It performs no writes and holds no state, so
//! it may run concurrently with unrelated mutations.

use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::config::Directory;
use crate::error::{CoreError, CoreResult};
use crate::models::{
    IncompleteSession, PaymentLine, PaymentRecord, PayrollReport, SessionStatus, TimeSession,
};

/// An inclusive date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    /// First day, inclusive.
    pub start: NaiveDate,
    /// Last day, inclusive.
    pub end: NaiveDate,
}

impl DateRange {
    /// Creates a range, rejecting an end before the start.
    pub fn new(start: NaiveDate, end: NaiveDate) -> CoreResult<Self> {
        if end < start {
            return Err(CoreError::validation(
                "end_date",
                "must not be before start_date",
            ));
        }
        Ok(Self { start, end })
    }

    /// Returns true when the date falls within the range.
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

/// Reason attached to a corrected line when the session carries none.
const DEFAULT_CORRECTION_REASON: &str = "rate differs from worker profile";

/// Computes the payroll report for a date range.
///
/// Sessions count toward pay when they fall in the range, match the worker
/// filter, and are `approved` (or, with `include_unapproved` set in the
/// directory settings, any non-rejected session with a clock-out time).
/// In-range open sessions are surfaced in the report's `incomplete` list
/// and excluded from every total. Workers with no payable session are
/// omitted entirely.
///
/// A session is corrected when its effective hourly rate differs from the
/// worker's profile rate at computation time, or when its hours were
/// adjusted post-hoc; corrected lines always carry a non-empty reason.
///
/// Output is deterministic: workers are ordered by name (ties by id) and a
/// worker's lines by clock-in time, so the result is independent of the
/// input ordering.
///
/// # Errors
///
/// Returns [`CoreError::NotFound`] when a payable session references a
/// worker the directory does not know.
pub fn compute_report(
    sessions: &[TimeSession],
    directory: &Directory,
    range: &DateRange,
    worker_filter: Option<&str>,
) -> CoreResult<PayrollReport> {
    let include_unapproved = directory.settings().include_unapproved;

    let mut incomplete: Vec<IncompleteSession> = Vec::new();
    let mut by_worker: HashMap<&str, Vec<&TimeSession>> = HashMap::new();

    for session in sessions {
        if !range.contains(session.clock_in_time.date_naive()) {
            continue;
        }
        if let Some(worker) = worker_filter {
            if session.worker_id != worker {
                continue;
            }
        }
        if session.status == SessionStatus::Rejected {
            continue;
        }
        if session.clock_out_time.is_none() {
            incomplete.push(IncompleteSession {
                session_id: session.id,
                worker_id: session.worker_id.clone(),
                clock_in_time: session.clock_in_time,
            });
            continue;
        }
        let payable = match session.status {
            SessionStatus::Approved => true,
            SessionStatus::Completed => include_unapproved,
            _ => false,
        };
        if payable {
            by_worker.entry(&session.worker_id).or_default().push(session);
        }
    }

    let mut records = Vec::with_capacity(by_worker.len());
    for (worker_id, mut worker_sessions) in by_worker {
        let profile = directory.worker(worker_id)?;
        worker_sessions.sort_by(|a, b| {
            a.clock_in_time
                .cmp(&b.clock_in_time)
                .then_with(|| a.id.cmp(&b.id))
        });

        let lines: Vec<PaymentLine> = worker_sessions
            .iter()
            .map(|session| price_session(session, profile.hourly_rate, directory))
            .collect();

        let total_hours: Decimal = lines.iter().map(|l| l.hours).sum();
        let total_pay: Decimal = lines.iter().map(|l| l.pay).sum();
        let avg_hourly_rate = if total_hours.is_zero() {
            Decimal::ZERO
        } else {
            total_pay / total_hours
        };

        records.push(PaymentRecord {
            worker_id: profile.id.clone(),
            worker_name: profile.name.clone(),
            worker_email: profile.email.clone(),
            total_hours,
            total_pay,
            sessions_count: lines.len(),
            avg_hourly_rate,
            lines,
        });
    }

    records.sort_by(|a, b| {
        a.worker_name
            .cmp(&b.worker_name)
            .then_with(|| a.worker_id.cmp(&b.worker_id))
    });
    incomplete.sort_by(|a, b| {
        a.clock_in_time
            .cmp(&b.clock_in_time)
            .then_with(|| a.session_id.cmp(&b.session_id))
    });

    Ok(PayrollReport {
        start_date: range.start,
        end_date: range.end,
        records,
        incomplete,
    })
}

/// Prices one closed session against the worker's profile rate.
fn price_session(
    session: &TimeSession,
    profile_rate: Decimal,
    directory: &Directory,
) -> PaymentLine {
    let raw_hours = session
        .worked_hours()
        .unwrap_or(Decimal::ZERO);
    let hours = session.adjusted_hours.unwrap_or(raw_hours);
    let hourly_rate = session.override_rate.unwrap_or(profile_rate);
    let pay = hours * hourly_rate;

    let rate_overridden = session
        .override_rate
        .is_some_and(|rate| rate != profile_rate);
    let was_corrected = rate_overridden || session.adjusted_hours.is_some();
    let correction_reason = if was_corrected {
        Some(
            session
                .correction_reason
                .clone()
                .unwrap_or_else(|| DEFAULT_CORRECTION_REASON.to_string()),
        )
    } else {
        None
    };

    let building = directory
        .building(&session.building_id)
        .map(|b| b.name.clone())
        .unwrap_or_else(|| session.building_id.clone());
    let work_order = session
        .work_order_id
        .as_deref()
        .and_then(|id| directory.work_order(id));

    PaymentLine {
        session_id: session.id,
        date: session.clock_in_time.date_naive(),
        building,
        apartment: work_order.and_then(|wo| wo.apartment.clone()),
        work_type: work_order.map(|wo| wo.work_type.clone()),
        hours,
        hourly_rate,
        pay,
        was_corrected,
        correction_reason,
    }
}
