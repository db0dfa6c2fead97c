//! HTTP request handlers for the Field Operations Engine API.
//!
//! This module contains the handler functions for all API endpoints and the
//! router wiring them together.

use axum::{
    Json, Router,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
};
use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::CoreError;
use crate::ledger::SessionFilter;
use crate::location::ReportedLocation;
use crate::models::GeoSample;
use crate::payroll::{DateRange, compute_report};

use super::request::{
    CheckInRequest, CheckOutRequest, CorrectionRequest, CreateScheduleRequest,
    EditScheduleRequest, GeoSampleRequest, RejectRequest, ReportQuery, ScheduleQuery,
    SessionQuery,
};
use super::response::{ApiError, ApiErrorResponse};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/schedules",
            post(create_schedule_handler).get(list_schedules_handler),
        )
        .route(
            "/schedules/:id",
            axum::routing::patch(edit_schedule_handler).delete(delete_schedule_handler),
        )
        .route("/schedules/:id/cancel", post(cancel_schedule_handler))
        .route("/schedules/:id/check-in", post(check_in_handler))
        .route("/schedules/:id/check-out", post(check_out_handler))
        .route("/sessions", get(list_sessions_handler))
        .route("/sessions/pending", get(list_pending_handler))
        .route("/sessions/:id", delete(delete_session_handler))
        .route("/sessions/:id/pause", post(pause_session_handler))
        .route("/sessions/:id/resume", post(resume_session_handler))
        .route("/sessions/:id/approve", post(approve_session_handler))
        .route("/sessions/:id/reject", post(reject_session_handler))
        .route("/sessions/:id/correct", post(correct_session_handler))
        .route("/reports/payroll", get(payroll_report_handler))
        .with_state(state)
}

/// Resolves the acting user from the `x-acting-user` header.
fn acting_user(headers: &HeaderMap) -> String {
    headers
        .get("x-acting-user")
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.trim().is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| "system".to_string())
}

/// Unwraps a JSON body, converting axum rejections into 400 responses.
fn parse_json<T>(
    correlation_id: Uuid,
    payload: Result<Json<T>, JsonRejection>,
) -> Result<T, Response> {
    match payload {
        Ok(Json(request)) => Ok(request),
        Err(rejection) => {
            let error = match rejection {
                JsonRejection::JsonDataError(err) => {
                    let body_text = err.body_text();
                    warn!(
                        correlation_id = %correlation_id,
                        error = %body_text,
                        "JSON data error"
                    );
                    if body_text.contains("missing field") {
                        ApiError::new("VALIDATION_ERROR", body_text)
                    } else {
                        ApiError::malformed_json(body_text)
                    }
                }
                JsonRejection::JsonSyntaxError(err) => {
                    warn!(
                        correlation_id = %correlation_id,
                        error = %err,
                        "JSON syntax error"
                    );
                    ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
                }
                JsonRejection::MissingJsonContentType(_) => ApiError::new(
                    "MISSING_CONTENT_TYPE",
                    "Content-Type must be application/json",
                ),
                _ => ApiError::malformed_json("Failed to parse request body"),
            };
            Err((
                StatusCode::BAD_REQUEST,
                [(header::CONTENT_TYPE, "application/json")],
                Json(error),
            )
                .into_response())
        }
    }
}

/// Maps a core error to its HTTP response, logging it against the request.
fn core_error(correlation_id: Uuid, error: CoreError) -> Response {
    warn!(correlation_id = %correlation_id, error = %error, "Request failed");
    ApiErrorResponse::from(error).into_response()
}

/// Validates an optional client-supplied fix into a reading.
///
/// An absent fix still produces a provider; the board then reports the
/// acquisition failure without touching any state.
fn reported_location(
    correlation_id: Uuid,
    location: Option<GeoSampleRequest>,
) -> Result<ReportedLocation, Response> {
    let sample: Option<GeoSample> = match location {
        Some(request) => Some(
            request
                .into_sample(Utc::now())
                .map_err(|err| core_error(correlation_id, err))?,
        ),
        None => None,
    };
    Ok(ReportedLocation::new(sample))
}

/// Handler for POST /schedules.
async fn create_schedule_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<CreateScheduleRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let request = match parse_json(correlation_id, payload) {
        Ok(request) => request,
        Err(response) => return response,
    };

    // Unknown workers are rejected before anything is stored.
    if let Err(err) = state.directory().worker(&request.worker_id) {
        warn!(
            correlation_id = %correlation_id,
            worker_id = %request.worker_id,
            "Unknown worker on schedule create"
        );
        return core_error(correlation_id, err);
    }

    let created_by = acting_user(&headers);
    match state.board().create(request.into_new_item(created_by)) {
        Ok(item) => {
            info!(
                correlation_id = %correlation_id,
                schedule_id = %item.id,
                worker_id = %item.worker_id,
                "Schedule item created"
            );
            (StatusCode::CREATED, Json(item)).into_response()
        }
        Err(err) => core_error(correlation_id, err),
    }
}

/// Handler for GET /schedules.
async fn list_schedules_handler(
    State(state): State<AppState>,
    Query(query): Query<ScheduleQuery>,
) -> Response {
    let items = state
        .board()
        .list(query.start, query.end, query.worker.as_deref());
    Json(items).into_response()
}

/// Handler for PATCH /schedules/{id}.
async fn edit_schedule_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    payload: Result<Json<EditScheduleRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let request = match parse_json(correlation_id, payload) {
        Ok(request) => request,
        Err(response) => return response,
    };

    // A reassignment must name a known worker, like schedule creation does.
    // Blank ids fall through to the board's validation error.
    if let Some(worker_id) = request.worker_id.as_deref().filter(|w| !w.trim().is_empty()) {
        if let Err(err) = state.directory().worker(worker_id) {
            warn!(
                correlation_id = %correlation_id,
                worker_id = %worker_id,
                "Unknown worker on schedule edit"
            );
            return core_error(correlation_id, err);
        }
    }

    match state.board().edit(id, request.into()) {
        Ok(item) => Json(item).into_response(),
        Err(err) => core_error(correlation_id, err),
    }
}

/// Handler for DELETE /schedules/{id}.
async fn delete_schedule_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    match state.board().delete(id) {
        Ok(item) => {
            info!(correlation_id = %correlation_id, schedule_id = %item.id, "Schedule item deleted");
            StatusCode::NO_CONTENT.into_response()
        }
        Err(err) => core_error(correlation_id, err),
    }
}

/// Handler for POST /schedules/{id}/cancel.
async fn cancel_schedule_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    match state.board().cancel(id) {
        Ok(item) => {
            info!(correlation_id = %correlation_id, schedule_id = %item.id, "Schedule item cancelled");
            Json(item).into_response()
        }
        Err(err) => core_error(correlation_id, err),
    }
}

/// Handler for POST /schedules/{id}/check-in.
async fn check_in_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    payload: Result<Json<CheckInRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let request = match parse_json(correlation_id, payload) {
        Ok(request) => request,
        Err(response) => return response,
    };
    let provider = match reported_location(correlation_id, request.location) {
        Ok(provider) => provider,
        Err(response) => return response,
    };

    let timeout = state.directory().settings().location_timeout();
    match state.board().check_in(id, &provider, timeout) {
        Ok(item) => Json(item).into_response(),
        Err(err) => core_error(correlation_id, err),
    }
}

/// Handler for POST /schedules/{id}/check-out.
async fn check_out_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    payload: Result<Json<CheckOutRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let request = match parse_json(correlation_id, payload) {
        Ok(request) => request,
        Err(response) => return response,
    };
    let provider = match reported_location(correlation_id, request.location) {
        Ok(provider) => provider,
        Err(response) => return response,
    };

    let timeout = state.directory().settings().location_timeout();
    match state.board().check_out(id, &provider, timeout, request.notes) {
        Ok(item) => Json(item).into_response(),
        Err(err) => core_error(correlation_id, err),
    }
}

/// Handler for GET /sessions.
async fn list_sessions_handler(
    State(state): State<AppState>,
    Query(query): Query<SessionQuery>,
) -> Response {
    let filter = SessionFilter {
        worker_id: query.worker,
        building_id: query.building,
        start_date: query.start,
        end_date: query.end,
        status: query.status,
    };
    Json(state.ledger().list(&filter)).into_response()
}

/// Handler for GET /sessions/pending.
async fn list_pending_handler(State(state): State<AppState>) -> Response {
    Json(state.ledger().list_pending()).into_response()
}

/// Handler for DELETE /sessions/{id}.
async fn delete_session_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    match state.ledger().delete(id) {
        Ok(session) => {
            info!(correlation_id = %correlation_id, session_id = %session.id, "Session deleted");
            StatusCode::NO_CONTENT.into_response()
        }
        Err(err) => core_error(correlation_id, err),
    }
}

/// Handler for POST /sessions/{id}/pause.
async fn pause_session_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    match state.ledger().pause(id, Utc::now()) {
        Ok(session) => Json(session).into_response(),
        Err(err) => core_error(correlation_id, err),
    }
}

/// Handler for POST /sessions/{id}/resume.
async fn resume_session_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    match state.ledger().resume(id, Utc::now()) {
        Ok(session) => Json(session).into_response(),
        Err(err) => core_error(correlation_id, err),
    }
}

/// Handler for POST /sessions/{id}/approve.
async fn approve_session_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    match state.ledger().approve(id) {
        Ok(session) => {
            info!(
                correlation_id = %correlation_id,
                session_id = %session.id,
                worker_id = %session.worker_id,
                "Session approved"
            );
            Json(session).into_response()
        }
        Err(err) => core_error(correlation_id, err),
    }
}

/// Handler for POST /sessions/{id}/reject.
async fn reject_session_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    payload: Result<Json<RejectRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let request = match parse_json(correlation_id, payload) {
        Ok(request) => request,
        Err(response) => return response,
    };
    match state.ledger().reject(id, request.reason) {
        Ok(session) => {
            info!(
                correlation_id = %correlation_id,
                session_id = %session.id,
                worker_id = %session.worker_id,
                "Session rejected"
            );
            Json(session).into_response()
        }
        Err(err) => core_error(correlation_id, err),
    }
}

/// Handler for POST /sessions/{id}/correct.
async fn correct_session_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    payload: Result<Json<CorrectionRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let request = match parse_json(correlation_id, payload) {
        Ok(request) => request,
        Err(response) => return response,
    };
    match state.ledger().correct(id, request.into()) {
        Ok(session) => Json(session).into_response(),
        Err(err) => core_error(correlation_id, err),
    }
}

/// Handler for GET /reports/payroll.
async fn payroll_report_handler(
    State(state): State<AppState>,
    Query(query): Query<ReportQuery>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let range = match DateRange::new(query.start, query.end) {
        Ok(range) => range,
        Err(err) => return core_error(correlation_id, err),
    };

    let sessions = state.ledger().snapshot();
    match compute_report(&sessions, state.directory(), &range, query.worker.as_deref()) {
        Ok(report) => {
            info!(
                correlation_id = %correlation_id,
                start = %range.start,
                end = %range.end,
                workers = report.records.len(),
                incomplete = report.incomplete.len(),
                "Payroll report computed"
            );
            Json(report).into_response()
        }
        Err(err) => core_error(correlation_id, err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DirectoryLoader;
    use crate::models::{ScheduleItem, ScheduleStatus, TimeSession};
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use tower::ServiceExt;

    fn create_test_state() -> AppState {
        let directory =
            DirectoryLoader::load("./config/fieldops").expect("Failed to load directory");
        AppState::new(directory)
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn create_body(worker: &str, date: &str) -> String {
        format!(
            r#"{{
                "work_order_id": "wo_101",
                "building_id": "bld_7",
                "worker_id": "{worker}",
                "date": "{date}",
                "start_time": "09:00:00",
                "end_time": "17:00:00"
            }}"#
        )
    }

    fn check_in_body(ts: &str) -> String {
        format!(
            r#"{{"location": {{"latitude": 40.7, "longitude": -74.0, "accuracy_m": 8.0, "recorded_at": "{ts}"}}}}"#
        )
    }

    async fn read_json<T: serde::de::DeserializeOwned>(response: Response) -> T {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_create_schedule_returns_201() {
        let router = create_router(create_test_state());

        let response = router
            .oneshot(post_json("/schedules", &create_body("w_001", "2026-03-02")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let item: ScheduleItem = read_json(response).await;
        assert_eq!(item.status, ScheduleStatus::Scheduled);
        assert_eq!(item.created_by, "system");
    }

    #[tokio::test]
    async fn test_create_schedule_records_acting_user() {
        let router = create_router(create_test_state());

        let response = router
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/schedules")
                    .header("Content-Type", "application/json")
                    .header("x-acting-user", "admin_7")
                    .body(Body::from(create_body("w_001", "2026-03-02")))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let item: ScheduleItem = read_json(response).await;
        assert_eq!(item.created_by, "admin_7");
    }

    #[tokio::test]
    async fn test_create_schedule_unknown_worker_returns_404() {
        let router = create_router(create_test_state());

        let response = router
            .oneshot(post_json("/schedules", &create_body("w_999", "2026-03-02")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let error: ApiError = read_json(response).await;
        assert_eq!(error.code, "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_create_schedule_malformed_json_returns_400() {
        let router = create_router(create_test_state());

        let response = router
            .oneshot(post_json("/schedules", "{invalid json"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let error: ApiError = read_json(response).await;
        assert_eq!(error.code, "MALFORMED_JSON");
    }

    #[tokio::test]
    async fn test_create_schedule_inverted_window_returns_400() {
        let router = create_router(create_test_state());
        let body = r#"{
            "work_order_id": "wo_101",
            "building_id": "bld_7",
            "worker_id": "w_001",
            "date": "2026-03-02",
            "start_time": "17:00:00",
            "end_time": "09:00:00"
        }"#;

        let response = router.oneshot(post_json("/schedules", body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let error: ApiError = read_json(response).await;
        assert_eq!(error.code, "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_edit_schedule_unknown_replacement_worker_returns_404() {
        let router = create_router(create_test_state());

        let response = router
            .clone()
            .oneshot(post_json("/schedules", &create_body("w_001", "2026-03-02")))
            .await
            .unwrap();
        let item: ScheduleItem = read_json(response).await;

        let response = router
            .clone()
            .oneshot(
                Request::builder()
                    .method("PATCH")
                    .uri(format!("/schedules/{}", item.id))
                    .header("Content-Type", "application/json")
                    .body(Body::from(r#"{"worker_id": "w_999"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let error: ApiError = read_json(response).await;
        assert_eq!(error.code, "NOT_FOUND");

        // Reassigning to a known worker still works.
        let response = router
            .oneshot(
                Request::builder()
                    .method("PATCH")
                    .uri(format!("/schedules/{}", item.id))
                    .header("Content-Type", "application/json")
                    .body(Body::from(r#"{"worker_id": "w_002"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let item: ScheduleItem = read_json(response).await;
        assert_eq!(item.worker_id, "w_002");
    }

    #[tokio::test]
    async fn test_check_in_without_location_returns_503() {
        let state = create_test_state();
        let router = create_router(state.clone());

        let response = router
            .clone()
            .oneshot(post_json("/schedules", &create_body("w_001", "2026-03-02")))
            .await
            .unwrap();
        let item: ScheduleItem = read_json(response).await;

        let response = router
            .oneshot(post_json(
                &format!("/schedules/{}/check-in", item.id),
                "{}",
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let error: ApiError = read_json(response).await;
        assert_eq!(error.code, "LOCATION_UNAVAILABLE");
        // Nothing was created by the failed check-in.
        assert!(state.ledger().snapshot().is_empty());
    }

    #[tokio::test]
    async fn test_check_in_twice_for_one_worker_returns_409() {
        let router = create_router(create_test_state());

        let response = router
            .clone()
            .oneshot(post_json("/schedules", &create_body("w_001", "2026-03-02")))
            .await
            .unwrap();
        let first: ScheduleItem = read_json(response).await;
        let response = router
            .clone()
            .oneshot(post_json("/schedules", &create_body("w_001", "2026-03-02")))
            .await
            .unwrap();
        let second: ScheduleItem = read_json(response).await;

        let response = router
            .clone()
            .oneshot(post_json(
                &format!("/schedules/{}/check-in", first.id),
                &check_in_body("2026-03-02T09:00:00Z"),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = router
            .oneshot(post_json(
                &format!("/schedules/{}/check-in", second.id),
                &check_in_body("2026-03-02T09:05:00Z"),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CONFLICT);
        let error: ApiError = read_json(response).await;
        assert_eq!(error.code, "ALREADY_CHECKED_IN");
    }

    #[tokio::test]
    async fn test_check_out_closes_session_and_completes_item() {
        let router = create_router(create_test_state());

        let response = router
            .clone()
            .oneshot(post_json("/schedules", &create_body("w_001", "2026-03-02")))
            .await
            .unwrap();
        let item: ScheduleItem = read_json(response).await;

        let response = router
            .clone()
            .oneshot(post_json(
                &format!("/schedules/{}/check-in", item.id),
                &check_in_body("2026-03-02T09:00:00Z"),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = r#"{"location": {"latitude": 40.7, "longitude": -74.0, "accuracy_m": 8.0, "recorded_at": "2026-03-02T17:00:00Z"}, "notes": "done"}"#;
        let response = router
            .oneshot(post_json(&format!("/schedules/{}/check-out", item.id), body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let item: ScheduleItem = read_json(response).await;
        assert_eq!(item.status, ScheduleStatus::Completed);
    }

    #[tokio::test]
    async fn test_unknown_schedule_returns_404() {
        let router = create_router(create_test_state());

        let response = router
            .oneshot(post_json(
                &format!("/schedules/{}/cancel", Uuid::new_v4()),
                "",
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete_schedule_returns_204() {
        let router = create_router(create_test_state());

        let response = router
            .clone()
            .oneshot(post_json("/schedules", &create_body("w_001", "2026-03-02")))
            .await
            .unwrap();
        let item: ScheduleItem = read_json(response).await;

        let response = router
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri(format!("/schedules/{}", item.id))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn test_list_sessions_filters_by_status() {
        let state = create_test_state();
        let router = create_router(state.clone());

        let response = router
            .clone()
            .oneshot(post_json("/schedules", &create_body("w_001", "2026-03-02")))
            .await
            .unwrap();
        let item: ScheduleItem = read_json(response).await;
        router
            .clone()
            .oneshot(post_json(
                &format!("/schedules/{}/check-in", item.id),
                &check_in_body("2026-03-02T09:00:00Z"),
            ))
            .await
            .unwrap();

        let response = router
            .oneshot(
                Request::builder()
                    .uri("/sessions?status=active&worker=w_001")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let sessions: Vec<TimeSession> = read_json(response).await;
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].worker_id, "w_001");
    }

    #[tokio::test]
    async fn test_payroll_report_rejects_inverted_range() {
        let router = create_router(create_test_state());

        let response = router
            .oneshot(
                Request::builder()
                    .uri("/reports/payroll?start=2026-03-08&end=2026-03-02")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let error: ApiError = read_json(response).await;
        assert_eq!(error.code, "VALIDATION_ERROR");
    }
}
