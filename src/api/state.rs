//! Application state for the Field Operations Engine API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use crate::config::Directory;
use crate::ledger::TimeLedger;
use crate::schedule::ScheduleBoard;

/// Shared application state.
///
/// Holds the schedule board, the time session ledger and the resolved
/// directory. The board and ledger share one session store, so check-in and
/// clock-in go through the same uniqueness check.
#[derive(Clone)]
pub struct AppState {
    board: Arc<ScheduleBoard>,
    ledger: Arc<TimeLedger>,
    directory: Arc<Directory>,
}

impl AppState {
    /// Creates a fresh application state around the given directory.
    pub fn new(directory: Directory) -> Self {
        let ledger = Arc::new(TimeLedger::new());
        Self {
            board: Arc::new(ScheduleBoard::new(ledger.clone())),
            ledger,
            directory: Arc::new(directory),
        }
    }

    /// Returns the schedule board.
    pub fn board(&self) -> &ScheduleBoard {
        &self.board
    }

    /// Returns the time session ledger.
    pub fn ledger(&self) -> &TimeLedger {
        &self.ledger
    }

    /// Returns the resolved directory.
    pub fn directory(&self) -> &Directory {
        &self.directory
    }
}
