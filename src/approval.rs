//! Approval workflow for completed time sessions.
//!
//! A session becomes eligible for review once it is `completed`. Approval is
//! idempotent so UI retries stay safe; rejection requires a reason and is
//! terminal. Rejected sessions never count toward payroll.

use uuid::Uuid;

use crate::error::{CoreError, CoreResult};
use crate::ledger::{SessionFilter, TimeLedger};
use crate::models::{SessionStatus, TimeSession};

impl TimeLedger {
    /// Approves a completed session.
    ///
    /// Calling approve on an already-approved session is a no-op, not an
    /// error; any other status fails with an invalid-state error. A failed
    /// approval never changes the session.
    pub fn approve(&self, id: Uuid) -> CoreResult<TimeSession> {
        self.update(id, |session| match session.status {
            SessionStatus::Approved => Ok(()),
            SessionStatus::Completed => {
                session.status = SessionStatus::Approved;
                Ok(())
            }
            other => Err(CoreError::invalid_state(
                "time session",
                id,
                format!("only completed sessions can be approved, status is {other:?}"),
            )),
        })
    }

    /// Rejects a completed session with a reason.
    ///
    /// # Errors
    ///
    /// Returns a validation error when the reason is blank, and an
    /// invalid-state error when the session is not `completed`. A failed
    /// rejection leaves the session `completed`, never partially rejected.
    pub fn reject(&self, id: Uuid, reason: impl Into<String>) -> CoreResult<TimeSession> {
        let reason = reason.into();
        if reason.trim().is_empty() {
            return Err(CoreError::validation(
                "reason",
                "rejection reason must not be blank",
            ));
        }
        self.update(id, |session| match session.status {
            SessionStatus::Completed => {
                session.status = SessionStatus::Rejected;
                session.rejection_reason = Some(reason.clone());
                Ok(())
            }
            other => Err(CoreError::invalid_state(
                "time session",
                id,
                format!("only completed sessions can be rejected, status is {other:?}"),
            )),
        })
    }

    /// Returns the sessions currently awaiting a review decision.
    pub fn list_pending(&self) -> Vec<TimeSession> {
        self.list(&SessionFilter {
            status: Some(SessionStatus::Completed),
            ..Default::default()
        })
    }
}
