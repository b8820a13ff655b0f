//! HTTP request handlers for the attendance API.
//!
//! This module contains the handler functions for all API endpoints. Each
//! handler is a thin adapter: parse the request, call the time clock
//! service, map the outcome to a status code.

use axum::{
    Json, Router,
    body::Bytes,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::{HeaderMap, StatusCode, header},
    response::IntoResponse,
    routing::{get, post},
};
use serde_json::json;
use tracing::{info, warn};
use uuid::Uuid;

use crate::models::TimeRecordFilter;

use super::request::{DateRangeQuery, ListTimeRecordsQuery, NotesRequest, StartPauseRequest};
use super::response::{ApiError, ApiErrorResponse};
use super::state::AppState;

type HandlerResult<T> = Result<T, ApiErrorResponse>;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/employees/:employee_id/clock-in", post(clock_in_handler))
        .route("/employees/:employee_id/open-state", get(open_state_handler))
        .route(
            "/employees/:employee_id/daily-summary",
            get(daily_summary_handler),
        )
        .route("/time-records", get(list_time_records_handler))
        .route("/time-records/:id", get(time_record_details_handler))
        .route("/time-records/:id/clock-out", post(clock_out_handler))
        .route(
            "/time-records/:id/pauses",
            get(list_pauses_handler).post(start_pause_handler),
        )
        .route("/pauses/:id/end", post(end_pause_handler))
        .with_state(state)
}

async fn health_handler() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

/// Handler for POST /employees/:employee_id/clock-in.
async fn clock_in_handler(
    State(state): State<AppState>,
    Path(employee_id): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> HandlerResult<impl IntoResponse> {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, employee_id = %employee_id, "Processing clock-in request");

    let request = notes_body(&headers, &body, correlation_id)?;
    let record = state
        .service()
        .clock_in(&employee_id, request.notes.as_deref())
        .await
        .map_err(|err| reject(correlation_id, err))?;

    Ok((StatusCode::CREATED, Json(record)))
}

/// Handler for POST /time-records/:id/clock-out.
async fn clock_out_handler(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
    headers: HeaderMap,
    body: Bytes,
) -> HandlerResult<impl IntoResponse> {
    let correlation_id = Uuid::new_v4();
    let time_record_id = path_id(path, correlation_id)?;
    info!(correlation_id = %correlation_id, time_record_id = %time_record_id, "Processing clock-out request");

    let request = notes_body(&headers, &body, correlation_id)?;
    let record = state
        .service()
        .clock_out(time_record_id, request.notes.as_deref())
        .await
        .map_err(|err| reject(correlation_id, err))?
        .ok_or_else(|| {
            reject(
                correlation_id,
                ApiErrorResponse::not_found("Time record", time_record_id),
            )
        })?;

    Ok(Json(record))
}

/// Handler for POST /time-records/:id/pauses.
async fn start_pause_handler(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<StartPauseRequest>, JsonRejection>,
) -> HandlerResult<impl IntoResponse> {
    let correlation_id = Uuid::new_v4();
    let time_record_id = path_id(path, correlation_id)?;
    info!(correlation_id = %correlation_id, time_record_id = %time_record_id, "Processing start-pause request");

    let request = json_body(payload, correlation_id)?;
    let pause = state
        .service()
        .start_pause(time_record_id, request.pause_type, request.notes.as_deref())
        .await
        .map_err(|err| reject(correlation_id, err))?;

    Ok((StatusCode::CREATED, Json(pause)))
}

/// Handler for POST /pauses/:id/end.
async fn end_pause_handler(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
    headers: HeaderMap,
    body: Bytes,
) -> HandlerResult<impl IntoResponse> {
    let correlation_id = Uuid::new_v4();
    let pause_record_id = path_id(path, correlation_id)?;
    info!(correlation_id = %correlation_id, pause_record_id = %pause_record_id, "Processing end-pause request");

    let request = notes_body(&headers, &body, correlation_id)?;
    let pause = state
        .service()
        .end_pause(pause_record_id, request.notes.as_deref())
        .await
        .map_err(|err| reject(correlation_id, err))?
        .ok_or_else(|| {
            reject(
                correlation_id,
                ApiErrorResponse::not_found("Open pause", pause_record_id),
            )
        })?;

    Ok(Json(pause))
}

/// Handler for GET /employees/:employee_id/open-state.
async fn open_state_handler(
    State(state): State<AppState>,
    Path(employee_id): Path<String>,
) -> HandlerResult<impl IntoResponse> {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, employee_id = %employee_id, "Processing open-state request");

    let open_state = state
        .service()
        .open_state(&employee_id)
        .await
        .map_err(|err| reject(correlation_id, err))?;

    Ok(Json(open_state))
}

/// Handler for GET /time-records.
async fn list_time_records_handler(
    State(state): State<AppState>,
    query: Result<Query<ListTimeRecordsQuery>, QueryRejection>,
) -> HandlerResult<impl IntoResponse> {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing list time records request");

    let filter: TimeRecordFilter = query_params(query, correlation_id)?.into();

    let records = state
        .service()
        .list_time_records(&filter)
        .await
        .map_err(|err| reject(correlation_id, err))?;

    info!(
        correlation_id = %correlation_id,
        records_count = records.len(),
        "Listed time records"
    );
    Ok(Json(records))
}

/// Handler for GET /time-records/:id.
async fn time_record_details_handler(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> HandlerResult<impl IntoResponse> {
    let correlation_id = Uuid::new_v4();
    let time_record_id = path_id(path, correlation_id)?;
    info!(correlation_id = %correlation_id, time_record_id = %time_record_id, "Processing time record details request");

    let details = state
        .service()
        .time_record_details(time_record_id)
        .await
        .map_err(|err| reject(correlation_id, err))?
        .ok_or_else(|| {
            reject(
                correlation_id,
                ApiErrorResponse::not_found("Time record", time_record_id),
            )
        })?;

    Ok(Json(details))
}

/// Handler for GET /time-records/:id/pauses.
async fn list_pauses_handler(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> HandlerResult<impl IntoResponse> {
    let correlation_id = Uuid::new_v4();
    let time_record_id = path_id(path, correlation_id)?;
    info!(correlation_id = %correlation_id, time_record_id = %time_record_id, "Processing list pauses request");

    let pauses = state
        .service()
        .list_pause_details(time_record_id)
        .await
        .map_err(|err| reject(correlation_id, err))?;

    Ok(Json(pauses))
}

/// Handler for GET /employees/:employee_id/daily-summary.
async fn daily_summary_handler(
    State(state): State<AppState>,
    Path(employee_id): Path<String>,
    query: Result<Query<DateRangeQuery>, QueryRejection>,
) -> HandlerResult<impl IntoResponse> {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, employee_id = %employee_id, "Processing daily summary request");

    let filter = query_params(query, correlation_id)?.for_employee(employee_id);

    let summaries = state
        .service()
        .daily_summary(&filter)
        .await
        .map_err(|err| reject(correlation_id, err))?;

    Ok(Json(summaries))
}

/// Logs a failed request and converts the failure into a response.
fn reject(correlation_id: Uuid, error: impl Into<ApiErrorResponse>) -> ApiErrorResponse {
    let response = error.into();
    warn!(
        correlation_id = %correlation_id,
        status = response.status.as_u16(),
        code = %response.error.code,
        error = %response.error.message,
        "Request failed"
    );
    response
}

fn json_body<T>(
    payload: Result<Json<T>, JsonRejection>,
    correlation_id: Uuid,
) -> HandlerResult<T> {
    match payload {
        Ok(Json(body)) => Ok(body),
        Err(rejection) => {
            let error = match rejection {
                JsonRejection::JsonDataError(err) => {
                    let body_text = err.body_text();
                    if body_text.contains("missing field") || body_text.contains("unknown variant")
                    {
                        ApiError::validation_error(body_text)
                    } else {
                        ApiError::malformed_json(body_text)
                    }
                }
                JsonRejection::JsonSyntaxError(err) => {
                    ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
                }
                JsonRejection::MissingJsonContentType(_) => missing_content_type(),
                _ => ApiError::malformed_json("Failed to parse request body"),
            };
            Err(reject(correlation_id, ApiErrorResponse::bad_request(error)))
        }
    }
}

/// Reads an optional `{notes}` body. An empty body means no notes.
fn notes_body(
    headers: &HeaderMap,
    body: &Bytes,
    correlation_id: Uuid,
) -> HandlerResult<NotesRequest> {
    if body.is_empty() {
        return Ok(NotesRequest::default());
    }
    if !has_json_content_type(headers) {
        return Err(reject(
            correlation_id,
            ApiErrorResponse::bad_request(missing_content_type()),
        ));
    }
    json_body(Json::from_bytes(body), correlation_id)
}

fn has_json_content_type(headers: &HeaderMap) -> bool {
    let Some(content_type) = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
    else {
        return false;
    };
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    essence == "application/json"
        || (essence.starts_with("application/") && essence.ends_with("+json"))
}

fn missing_content_type() -> ApiError {
    ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
}

fn path_id(path: Result<Path<Uuid>, PathRejection>, correlation_id: Uuid) -> HandlerResult<Uuid> {
    path.map(|Path(id)| id).map_err(|rejection| {
        reject(
            correlation_id,
            ApiErrorResponse::bad_request(ApiError::validation_error(format!(
                "Invalid identifier: {}",
                rejection.body_text()
            ))),
        )
    })
}

fn query_params<T>(
    query: Result<Query<T>, QueryRejection>,
    correlation_id: Uuid,
) -> HandlerResult<T> {
    query.map(|Query(params)| params).map_err(|rejection| {
        reject(
            correlation_id,
            ApiErrorResponse::bad_request(ApiError::validation_error(rejection.body_text())),
        )
    })
}
