//! HTTP API for the Field Operations Engine.
//!
//! This module provides the axum router, the request/response DTOs and the
//! shared application state backing all handlers.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{
    CheckInRequest, CheckOutRequest, CorrectionRequest, CreateScheduleRequest,
    EditScheduleRequest, GeoSampleRequest, RejectRequest, ReportQuery, ScheduleQuery,
    SessionQuery, SiteLocationRequest,
};
pub use response::{ApiError, ApiErrorResponse};
pub use state::AppState;
