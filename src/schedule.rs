//! Schedule item state machine.
//!
//! The [`ScheduleBoard`] owns every planned assignment and drives its
//! lifecycle: `scheduled → in_progress → completed`, with cancellation from
//! the first two states. Check-in and check-out acquire a location reading
//! first and only then touch the ledger and the item, so a failed
//! acquisition creates nothing.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{NaiveDate, NaiveTime};
use tracing::info;
use uuid::Uuid;

use crate::error::{CoreError, CoreResult};
use crate::ledger::{ClockIn, TimeLedger};
use crate::location::{LocationProvider, LocationRequest};
use crate::models::{ScheduleItem, ScheduleStatus, SiteLocation};

/// Entity name used in board error messages.
const ENTITY: &str = "schedule item";

/// Parameters for creating a schedule item.
#[derive(Debug, Clone)]
pub struct NewScheduleItem {
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
    /// Planned end time; must be after `start_time`.
    pub end_time: NaiveTime,
    /// Free-form scheduler notes.
    pub notes: Option<String>,
    /// Target job-site location.
    pub location: Option<SiteLocation>,
    /// The user creating the item.
    pub created_by: String,
}

/// A partial update to a schedule item. Unset fields keep their current
/// value.
#[derive(Debug, Clone, Default)]
pub struct SchedulePatch {
    /// New planned date.
    pub date: Option<NaiveDate>,
    /// New start time.
    pub start_time: Option<NaiveTime>,
    /// New end time.
    pub end_time: Option<NaiveTime>,
    /// Replacement worker.
    pub worker_id: Option<String>,
    /// Replacement notes.
    pub notes: Option<String>,
    /// Replacement site location.
    pub location: Option<SiteLocation>,
}

/// The schedule board: the store and state machine for planned assignments.
///
/// Holds the ledger so check-in/check-out can open and close the associated
/// time session in the same operation.
#[derive(Debug)]
pub struct ScheduleBoard {
    items: Mutex<HashMap<Uuid, ScheduleItem>>,
    ledger: Arc<TimeLedger>,
}

impl ScheduleBoard {
    /// Creates an empty board backed by the given ledger.
    pub fn new(ledger: Arc<TimeLedger>) -> Self {
        Self {
            items: Mutex::new(HashMap::new()),
            ledger,
        }
    }

    /// Creates a new schedule item in `scheduled`.
    ///
    /// # Errors
    ///
    /// Returns a validation error when the time window is empty or inverted,
    /// or when the worker/work-order/building references are blank.
    pub fn create(&self, new: NewScheduleItem) -> CoreResult<ScheduleItem> {
        if new.worker_id.trim().is_empty() {
            return Err(CoreError::validation("worker_id", "must not be blank"));
        }
        if new.work_order_id.trim().is_empty() {
            return Err(CoreError::validation("work_order_id", "must not be blank"));
        }
        if new.building_id.trim().is_empty() {
            return Err(CoreError::validation("building_id", "must not be blank"));
        }
        if new.end_time <= new.start_time {
            return Err(CoreError::validation(
                "end_time",
                "must be after start_time",
            ));
        }

        let item = ScheduleItem {
            id: Uuid::new_v4(),
            work_order_id: new.work_order_id,
            building_id: new.building_id,
            worker_id: new.worker_id,
            date: new.date,
            start_time: new.start_time,
            end_time: new.end_time,
            status: ScheduleStatus::Scheduled,
            notes: new.notes,
            location: new.location,
            session_id: None,
            created_by: new.created_by,
        };
        self.lock().insert(item.id, item.clone());
        Ok(item)
    }

    /// Applies a partial update to an item.
    ///
    /// Allowed while the item is not cancelled; the time window is
    /// re-validated when either end changes.
    pub fn edit(&self, id: Uuid, patch: SchedulePatch) -> CoreResult<ScheduleItem> {
        let mut items = self.lock();
        let item = items
            .get_mut(&id)
            .ok_or_else(|| CoreError::not_found(ENTITY, id))?;
        if item.status == ScheduleStatus::Cancelled {
            return Err(CoreError::invalid_state(ENTITY, id, "item is cancelled"));
        }

        // Validate the whole patch before touching the item, so a failed
        // edit leaves it exactly as it was.
        let start_time = patch.start_time.unwrap_or(item.start_time);
        let end_time = patch.end_time.unwrap_or(item.end_time);
        if end_time <= start_time {
            return Err(CoreError::validation(
                "end_time",
                "must be after start_time",
            ));
        }
        if let Some(worker_id) = &patch.worker_id {
            if worker_id.trim().is_empty() {
                return Err(CoreError::validation("worker_id", "must not be blank"));
            }
        }

        if let Some(date) = patch.date {
            item.date = date;
        }
        item.start_time = start_time;
        item.end_time = end_time;
        if let Some(worker_id) = patch.worker_id {
            item.worker_id = worker_id;
        }
        if patch.notes.is_some() {
            item.notes = patch.notes;
        }
        if patch.location.is_some() {
            item.location = patch.location;
        }
        Ok(item.clone())
    }

    /// Checks a worker in at the job site.
    ///
    /// Acquires a location reading from the provider, opens a time session
    /// for the item's worker, links it to the item, and transitions the item
    /// to `in_progress`. Nothing is created when acquisition fails, and the
    /// item is untouched when the ledger refuses the clock-in.
    ///
    /// # Errors
    ///
    /// Returns an invalid-state error unless the item is `scheduled`, a
    /// location-unavailable error when acquisition fails, and a conflict
    /// error when the worker already holds an open session.
    pub fn check_in(
        &self,
        id: Uuid,
        provider: &dyn LocationProvider,
        timeout: Duration,
    ) -> CoreResult<ScheduleItem> {
        let mut items = self.lock();
        let item = items
            .get_mut(&id)
            .ok_or_else(|| CoreError::not_found(ENTITY, id))?;
        if item.status != ScheduleStatus::Scheduled {
            return Err(CoreError::invalid_state(
                ENTITY,
                id,
                format!("check-in requires a scheduled item, status is {:?}", item.status),
            ));
        }

        let sample = provider
            .acquire(&LocationRequest {
                worker_id: item.worker_id.clone(),
                timeout,
            })
            .map_err(CoreError::from)?;

        let session = self.ledger.clock_in(ClockIn {
            worker_id: item.worker_id.clone(),
            building_id: item.building_id.clone(),
            work_order_id: Some(item.work_order_id.clone()),
            schedule_id: Some(item.id),
            sample,
        })?;

        item.session_id = Some(session.id);
        item.status = ScheduleStatus::InProgress;
        info!(
            schedule_id = %item.id,
            session_id = %session.id,
            worker_id = %item.worker_id,
            "Worker checked in"
        );
        Ok(item.clone())
    }

    /// Checks a worker out of the job site.
    ///
    /// Acquires a location reading, closes the linked session and
    /// transitions the item to `completed`. The item is untouched when
    /// acquisition or the ledger close fails.
    pub fn check_out(
        &self,
        id: Uuid,
        provider: &dyn LocationProvider,
        timeout: Duration,
        notes: Option<String>,
    ) -> CoreResult<ScheduleItem> {
        let mut items = self.lock();
        let item = items
            .get_mut(&id)
            .ok_or_else(|| CoreError::not_found(ENTITY, id))?;
        if item.status != ScheduleStatus::InProgress {
            return Err(CoreError::invalid_state(
                ENTITY,
                id,
                format!("check-out requires an in-progress item, status is {:?}", item.status),
            ));
        }
        let session_id = item.session_id.ok_or_else(|| {
            CoreError::invalid_state(ENTITY, id, "no open time session is linked")
        })?;

        let sample = provider
            .acquire(&LocationRequest {
                worker_id: item.worker_id.clone(),
                timeout,
            })
            .map_err(CoreError::from)?;

        self.ledger.clock_out(session_id, sample, notes)?;

        item.status = ScheduleStatus::Completed;
        info!(
            schedule_id = %item.id,
            session_id = %session_id,
            worker_id = %item.worker_id,
            "Worker checked out"
        );
        Ok(item.clone())
    }

    /// Cancels a `scheduled` or `in_progress` item.
    ///
    /// An open time session is left open and linked for manual
    /// reconciliation; cancellation never fabricates a clock-out event.
    pub fn cancel(&self, id: Uuid) -> CoreResult<ScheduleItem> {
        let mut items = self.lock();
        let item = items
            .get_mut(&id)
            .ok_or_else(|| CoreError::not_found(ENTITY, id))?;
        if !item.status.can_cancel() {
            return Err(CoreError::invalid_state(
                ENTITY,
                id,
                format!("cannot cancel from {:?}", item.status),
            ));
        }
        item.status = ScheduleStatus::Cancelled;
        Ok(item.clone())
    }

    /// Hard-deletes an item in any state. The associated time session, if
    /// one exists, is not cascade-deleted.
    pub fn delete(&self, id: Uuid) -> CoreResult<ScheduleItem> {
        self.lock()
            .remove(&id)
            .ok_or_else(|| CoreError::not_found(ENTITY, id))
    }

    /// Looks up one item.
    pub fn get(&self, id: Uuid) -> CoreResult<ScheduleItem> {
        self.lock()
            .get(&id)
            .cloned()
            .ok_or_else(|| CoreError::not_found(ENTITY, id))
    }

    /// Returns items within the inclusive date range, optionally restricted
    /// to one worker, ordered by date then start time (ties broken by id).
    pub fn list(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        worker_id: Option<&str>,
    ) -> Vec<ScheduleItem> {
        let mut matched: Vec<ScheduleItem> = self
            .lock()
            .values()
            .filter(|item| {
                item.date >= start
                    && item.date <= end
                    && worker_id.is_none_or(|w| item.worker_id == w)
            })
            .cloned()
            .collect();
        matched.sort_by(|a, b| {
            a.date
                .cmp(&b.date)
                .then_with(|| a.start_time.cmp(&b.start_time))
                .then_with(|| a.id.cmp(&b.id))
        });
        matched
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<Uuid, ScheduleItem>> {
        self.items.lock().expect("schedule store lock poisoned")
    }
}
