use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    Extension,
};

use crate::database::models::{Appointment, NewAppointment};
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::AppState;

const TITLE_MAX_CHARS: usize = 50;
const DESCRIPTION_MAX_CHARS: usize = 255;

/// POST /appointments - create an appointment for the authenticated user
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<NewAppointment>,
) -> Result<Json<Appointment>, ApiError> {
    validate_payload(&payload)?;

    let appointment = state.store.insert(&user, payload).await?;
    Ok(Json(appointment))
}

/// GET /appointments/:id - fetch a single appointment by id
pub async fn show(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<Appointment>, ApiError> {
    let appointment = state.store.get(&user, &id).await?;
    Ok(Json(appointment))
}

/// DELETE /appointments/:id - cancel (soft-delete) an appointment
pub async fn destroy(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.store.cancel(&user, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /appointments/year/:year/week/:week - list the user's appointments
/// whose start date falls in the given week
pub async fn week(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path((year, week)): Path<(i32, u32)>,
) -> Result<Json<Vec<Appointment>>, ApiError> {
    let appointments = state.store.list_week(&user, year, week).await?;
    Ok(Json(appointments))
}

/// Field bounds mirror the column widths, so a too-long value fails here
/// with a 400 instead of surfacing as a storage fault. Date ordering is
/// deliberately not checked (end before start is allowed).
fn validate_payload(payload: &NewAppointment) -> Result<(), ApiError> {
    if payload.title.is_empty() || payload.title.chars().count() > TITLE_MAX_CHARS {
        return Err(ApiError::bad_request(format!(
            "title must be between 1 and {} characters",
            TITLE_MAX_CHARS
        )));
    }
    if payload.description.is_empty()
        || payload.description.chars().count() > DESCRIPTION_MAX_CHARS
    {
        return Err(ApiError::bad_request(format!(
            "description must be between 1 and {} characters",
            DESCRIPTION_MAX_CHARS
        )));
    }
    Ok(())
}
