use std::sync::Arc;
use std::time::Instant;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::Json;
use axum::Router;
use chrono::{Month, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::calendar::grid::{build_month_grid, CalendarDay};
use crate::calendar::state::{CalendarAction, CalendarState};
use crate::calendar::view::{render_calendar, CalendarPage};
use crate::error::AppError;
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/calendar/sessions", post(create_session))
        .route(
            "/calendar/sessions/:id",
            get(get_session).delete(delete_session),
        )
        .route("/calendar/sessions/:id/actions", post(apply_action))
        .route("/calendar/grid/:year/:month", get(month_grid))
}

#[derive(Deserialize, Default)]
pub struct CreateSessionRequest {
    pub today: Option<NaiveDate>,
}

#[derive(Serialize)]
pub struct SessionResponse {
    pub session_id: Uuid,
    pub state: CalendarState,
    pub page: CalendarPage,
}

async fn create_session(
    State(state): State<Arc<AppState>>,
    payload: Option<Json<CreateSessionRequest>>,
) -> Json<SessionResponse> {
    let Json(payload) = payload.unwrap_or_default();
    let today = payload.today.unwrap_or_else(|| state.today());

    let (session_id, calendar) = state.open_session(today);

    info!(session_id = %session_id, today = %today, "calendar session opened");

    Json(respond(&state, session_id, calendar))
}

async fn get_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionResponse>, AppError> {
    let calendar = state.session(id).ok_or_else(|| session_not_found(id))?;

    Ok(Json(respond(&state, id, calendar)))
}

async fn apply_action(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(action): Json<CalendarAction>,
) -> Result<Json<SessionResponse>, AppError> {
    let calendar = state
        .apply_session_action(id, action)
        .ok_or_else(|| session_not_found(id))?;

    Ok(Json(respond(&state, id, calendar)))
}

async fn delete_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if !state.close_session(id) {
        return Err(session_not_found(id));
    }

    Ok(StatusCode::NO_CONTENT)
}

async fn month_grid(Path((year, month)): Path<(i32, u8)>) -> Result<Json<Vec<CalendarDay>>, AppError> {
    let month = Month::try_from(month)
        .map_err(|_| AppError::BadRequest(format!("month must be 1..=12, got {month}")))?;

    Ok(Json(build_month_grid(year, month)))
}

fn respond(state: &AppState, session_id: Uuid, calendar: CalendarState) -> SessionResponse {
    let started = Instant::now();
    let snapshot = state.snapshot();
    let page = render_calendar(
        &snapshot.trips,
        &snapshot.drivers,
        &calendar,
        state.today(),
        &state.config.calendar_offset,
    );
    state
        .metrics
        .observe_render("calendar", started.elapsed().as_secs_f64());

    SessionResponse {
        session_id,
        state: calendar,
        page,
    }
}

fn session_not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("calendar session {} not found", id))
}
