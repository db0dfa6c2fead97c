//! Directory and settings types.

use std::collections::HashMap;
use std::time::Duration;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// A worker known to the directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerProfile {
    /// Directory id, referenced by schedule items and sessions.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Default hourly rate applied when a session carries no override.
    pub hourly_rate: Decimal,
}

/// A building managed by the operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Building {
    /// Directory id.
    pub id: String,
    /// Display name.
    pub name: String,
}

/// A work order within a building.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkOrder {
    /// Directory id.
    pub id: String,
    /// The building the order belongs to.
    pub building_id: String,
    /// Apartment or unit identifier, when the order targets one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub apartment: Option<String>,
    /// The type of work (e.g. "plumbing", "painting").
    pub work_type: String,
    /// Free-form description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Engine settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// When true, the payroll report covers every non-rejected session with
    /// a clock-out time instead of approved sessions only.
    pub include_unapproved: bool,
    /// How long a location acquisition may block, in seconds.
    pub location_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            include_unapproved: false,
            location_timeout_secs: 10,
        }
    }
}

impl Settings {
    /// The location acquisition timeout as a [`Duration`].
    pub fn location_timeout(&self) -> Duration {
        Duration::from_secs(self.location_timeout_secs)
    }
}

/// File shape of `workers.yaml`.
#[derive(Debug, Deserialize)]
pub(crate) struct WorkersFile {
    pub workers: Vec<WorkerProfile>,
}

/// File shape of `sites.yaml`.
#[derive(Debug, Deserialize)]
pub(crate) struct SitesFile {
    pub buildings: Vec<Building>,
    #[serde(default)]
    pub work_orders: Vec<WorkOrder>,
}

/// The resolved directory: workers, buildings, work orders and settings.
#[derive(Debug, Clone)]
pub struct Directory {
    workers: HashMap<String, WorkerProfile>,
    buildings: HashMap<String, Building>,
    work_orders: HashMap<String, WorkOrder>,
    settings: Settings,
}

impl Directory {
    /// Builds a directory from already-resolved entries.
    pub fn new(
        workers: Vec<WorkerProfile>,
        buildings: Vec<Building>,
        work_orders: Vec<WorkOrder>,
        settings: Settings,
    ) -> Self {
        Self {
            workers: workers.into_iter().map(|w| (w.id.clone(), w)).collect(),
            buildings: buildings.into_iter().map(|b| (b.id.clone(), b)).collect(),
            work_orders: work_orders.into_iter().map(|w| (w.id.clone(), w)).collect(),
            settings,
        }
    }

    /// Resolves a worker id.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::NotFound`] for unknown workers, since a payable
    /// session must always resolve to a rate.
    pub fn worker(&self, id: &str) -> CoreResult<&WorkerProfile> {
        self.workers
            .get(id)
            .ok_or_else(|| CoreError::not_found("worker", id))
    }

    /// Resolves a building id. Buildings are display enrichment, so an
    /// unknown id is `None` rather than an error.
    pub fn building(&self, id: &str) -> Option<&Building> {
        self.buildings.get(id)
    }

    /// Resolves a work order id.
    pub fn work_order(&self, id: &str) -> Option<&WorkOrder> {
        self.work_orders.get(id)
    }

    /// The engine settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }
}
