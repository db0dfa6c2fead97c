//! Field Operations Engine for property maintenance crews.
//!
//! This crate provides the scheduling, time-tracking and payroll core of a
//! property-maintenance operations tool: scheduled work assignments with
//! geolocated check-in/check-out, an append-only time-session ledger, an
//! approval workflow, and a payroll aggregation engine.

#![warn(missing_docs)]

pub mod api;
pub mod approval;
pub mod config;
pub mod error;
pub mod ledger;
pub mod location;
pub mod models;
pub mod payroll;
pub mod schedule;
