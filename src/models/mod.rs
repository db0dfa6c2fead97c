//! Domain models for the Field Operations Engine.
//!
//! This module contains the core data types: geolocation samples, schedule
//! items, time sessions and the derived payroll report structures.

mod geo;
mod payment;
mod schedule_item;
mod session;

pub use geo::GeoSample;
pub use payment::{IncompleteSession, PaymentLine, PaymentRecord, PayrollReport, ReportRow};
pub use schedule_item::{ScheduleItem, ScheduleStatus, SiteLocation};
pub use session::{SessionDuration, SessionStatus, TimeSession};
