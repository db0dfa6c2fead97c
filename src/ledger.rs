//! Time session ledger.
//!
//! This module owns the append-only record of clock-in/clock-out events.
//! The ledger enforces the one-open-session-per-worker invariant: a worker
//! can never hold two sessions in `active` or `paused` at the same time.
//!
//! Every mutation runs as a single critical section over the backing store,
//! so the uniqueness check on clock-in and each status transition are atomic
//! read-modify-writes.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::error::{CoreError, CoreResult};
use crate::models::{GeoSample, SessionStatus, TimeSession};

/// Entity name used in ledger error messages.
const ENTITY: &str = "time session";

/// Parameters for opening a new session.
#[derive(Debug, Clone)]
pub struct ClockIn {
    /// The worker clocking in.
    pub worker_id: String,
    /// The building the work takes place at.
    pub building_id: String,
    /// The work order being fulfilled, when known.
    pub work_order_id: Option<String>,
    /// The schedule item that triggered the check-in, when one exists.
    pub schedule_id: Option<Uuid>,
    /// The location reading recorded at check-in. Its timestamp becomes the
    /// clock-in time, so the clock event and its sample can never disagree.
    pub sample: GeoSample,
}

/// Filters for querying the ledger. Unset fields are wildcards; set fields
/// combine with AND semantics.
#[derive(Debug, Clone, Default)]
pub struct SessionFilter {
    /// Match sessions of this worker.
    pub worker_id: Option<String>,
    /// Match sessions at this building.
    pub building_id: Option<String>,
    /// Match sessions clocked in on or after this date.
    pub start_date: Option<NaiveDate>,
    /// Match sessions clocked in on or before this date.
    pub end_date: Option<NaiveDate>,
    /// Match sessions in this status.
    pub status: Option<SessionStatus>,
}

impl SessionFilter {
    fn matches(&self, session: &TimeSession) -> bool {
        if let Some(worker_id) = &self.worker_id {
            if &session.worker_id != worker_id {
                return false;
            }
        }
        if let Some(building_id) = &self.building_id {
            if &session.building_id != building_id {
                return false;
            }
        }
        let date = session.clock_in_time.date_naive();
        if let Some(start) = self.start_date {
            if date < start {
                return false;
            }
        }
        if let Some(end) = self.end_date {
            if date > end {
                return false;
            }
        }
        if let Some(status) = self.status {
            if session.status != status {
                return false;
            }
        }
        true
    }
}

/// A post-hoc adjustment applied to a closed session.
///
/// Corrections are how admins fix clock mistakes or apply a special rate;
/// the payroll engine surfaces them with their reason.
#[derive(Debug, Clone)]
pub struct SessionCorrection {
    /// Hourly rate replacing the worker's profile rate, when set.
    pub override_rate: Option<Decimal>,
    /// Hours replacing the computed duration, when set.
    pub adjusted_hours: Option<Decimal>,
    /// Why the correction was made; must not be blank.
    pub reason: String,
}

/// The time session ledger.
///
/// Backed by an in-memory store; durable persistence is an external
/// collaborator supplying the same conditional-write semantics.
#[derive(Debug, Default)]
pub struct TimeLedger {
    sessions: Mutex<HashMap<Uuid, TimeSession>>,
}

impl TimeLedger {
    /// Creates an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a new session for a worker.
    ///
    /// The uniqueness check and the insert happen under one lock, so two
    /// concurrent clock-ins for the same worker cannot both succeed.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Conflict`] when the worker already has a session
    /// in `active` or `paused`, and a validation error when the worker or
    /// building reference is blank.
    pub fn clock_in(&self, request: ClockIn) -> CoreResult<TimeSession> {
        if request.worker_id.trim().is_empty() {
            return Err(CoreError::validation("worker_id", "must not be blank"));
        }
        if request.building_id.trim().is_empty() {
            return Err(CoreError::validation("building_id", "must not be blank"));
        }

        let mut sessions = self.lock();
        if sessions
            .values()
            .any(|s| s.worker_id == request.worker_id && s.status.is_open())
        {
            return Err(CoreError::conflict(format!(
                "worker '{}' is already checked in",
                request.worker_id
            )));
        }

        let session = TimeSession {
            id: Uuid::new_v4(),
            worker_id: request.worker_id,
            building_id: request.building_id,
            work_order_id: request.work_order_id,
            schedule_id: request.schedule_id,
            clock_in_time: request.sample.recorded_at,
            clock_out_time: None,
            break_minutes: 0,
            paused_at: None,
            status: SessionStatus::Active,
            check_in: request.sample,
            check_out: None,
            notes: None,
            photos: vec![],
            rejection_reason: None,
            override_rate: None,
            adjusted_hours: None,
            correction_reason: None,
        };
        sessions.insert(session.id, session.clone());
        Ok(session)
    }

    /// Starts a break on an active session.
    pub fn pause(&self, id: Uuid, at: DateTime<Utc>) -> CoreResult<TimeSession> {
        self.update(id, |session| {
            if session.status != SessionStatus::Active {
                return Err(CoreError::invalid_state(
                    ENTITY,
                    id,
                    format!("only active sessions can be paused, status is {:?}", session.status),
                ));
            }
            session.status = SessionStatus::Paused;
            session.paused_at = Some(at);
            Ok(())
        })
    }

    /// Ends the current break, adding its duration to the accumulated break
    /// time. Break minutes accrue across pause/resume cycles; they are never
    /// reset.
    pub fn resume(&self, id: Uuid, at: DateTime<Utc>) -> CoreResult<TimeSession> {
        self.update(id, |session| {
            if session.status != SessionStatus::Paused {
                return Err(CoreError::invalid_state(
                    ENTITY,
                    id,
                    format!("only paused sessions can be resumed, status is {:?}", session.status),
                ));
            }
            if let Some(paused_at) = session.paused_at.take() {
                session.break_minutes += (at - paused_at).num_minutes().max(0);
            }
            session.status = SessionStatus::Active;
            Ok(())
        })
    }

    /// Closes a session with a check-out reading.
    ///
    /// A paused session is resumed implicitly: the open break is closed at
    /// the check-out timestamp before the session completes.
    ///
    /// # Errors
    ///
    /// Returns an invalid-state error when the session is already closed,
    /// and a validation error when the check-out reading predates the
    /// clock-in time.
    pub fn clock_out(
        &self,
        id: Uuid,
        sample: GeoSample,
        notes: Option<String>,
    ) -> CoreResult<TimeSession> {
        self.update(id, |session| {
            if !session.status.is_open() {
                return Err(CoreError::invalid_state(
                    ENTITY,
                    id,
                    format!("already closed, status is {:?}", session.status),
                ));
            }
            if sample.recorded_at < session.clock_in_time {
                return Err(CoreError::validation(
                    "clock_out_time",
                    "must not precede the clock-in time",
                ));
            }
            if let Some(paused_at) = session.paused_at.take() {
                session.break_minutes += (sample.recorded_at - paused_at).num_minutes().max(0);
            }
            session.clock_out_time = Some(sample.recorded_at);
            session.check_out = Some(sample.clone());
            if notes.is_some() {
                session.notes = notes.clone();
            }
            session.status = SessionStatus::Completed;
            Ok(())
        })
    }

    /// Records a post-hoc correction on a closed session.
    ///
    /// # Errors
    ///
    /// Returns a validation error when the reason is blank or the correction
    /// changes nothing, and an invalid-state error when the session is still
    /// open or was rejected.
    pub fn correct(&self, id: Uuid, correction: SessionCorrection) -> CoreResult<TimeSession> {
        if correction.reason.trim().is_empty() {
            return Err(CoreError::validation(
                "reason",
                "correction reason must not be blank",
            ));
        }
        if correction.override_rate.is_none() && correction.adjusted_hours.is_none() {
            return Err(CoreError::validation(
                "correction",
                "must set an override rate or adjusted hours",
            ));
        }
        self.update(id, |session| {
            match session.status {
                SessionStatus::Completed | SessionStatus::Approved => {}
                other => {
                    return Err(CoreError::invalid_state(
                        ENTITY,
                        id,
                        format!("corrections require a closed session, status is {other:?}"),
                    ));
                }
            }
            if let Some(rate) = correction.override_rate {
                session.override_rate = Some(rate);
            }
            if let Some(hours) = correction.adjusted_hours {
                session.adjusted_hours = Some(hours);
            }
            session.correction_reason = Some(correction.reason.clone());
            Ok(())
        })
    }

    /// Hard-deletes a session in any status. The audit trail lives outside
    /// the core.
    pub fn delete(&self, id: Uuid) -> CoreResult<TimeSession> {
        self.lock()
            .remove(&id)
            .ok_or_else(|| CoreError::not_found(ENTITY, id))
    }

    /// Looks up one session.
    pub fn get(&self, id: Uuid) -> CoreResult<TimeSession> {
        self.lock()
            .get(&id)
            .cloned()
            .ok_or_else(|| CoreError::not_found(ENTITY, id))
    }

    /// Returns sessions matching the filter, ordered by clock-in time
    /// ascending (ties broken by id).
    pub fn list(&self, filter: &SessionFilter) -> Vec<TimeSession> {
        let mut matched: Vec<TimeSession> = self
            .lock()
            .values()
            .filter(|s| filter.matches(s))
            .cloned()
            .collect();
        matched.sort_by(|a, b| {
            a.clock_in_time
                .cmp(&b.clock_in_time)
                .then_with(|| a.id.cmp(&b.id))
        });
        matched
    }

    /// Returns a snapshot of every session in the ledger.
    pub fn snapshot(&self) -> Vec<TimeSession> {
        self.list(&SessionFilter::default())
    }

    /// Applies a fallible mutation to one session as a single atomic
    /// read-modify-write, returning the updated session.
    pub(crate) fn update<F>(&self, id: Uuid, mutate: F) -> CoreResult<TimeSession>
    where
        F: FnOnce(&mut TimeSession) -> CoreResult<()>,
    {
        let mut sessions = self.lock();
        let session = sessions
            .get_mut(&id)
            .ok_or_else(|| CoreError::not_found(ENTITY, id))?;
        mutate(session)?;
        Ok(session.clone())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<Uuid, TimeSession>> {
        self.sessions.lock().expect("session store lock poisoned")
    }
}
