use std::sync::Arc;

use axum::extract::{Path, State};
use axum::routing::get;
use axum::Json;
use axum::Router;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;
use crate::models::driver::Driver;
use crate::models::snapshot::Snapshot;
use crate::models::trip::Trip;
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/snapshot", get(get_snapshot).put(replace_snapshot))
        .route("/trips/:id", get(get_trip))
}

#[derive(Deserialize)]
pub struct ReplaceSnapshotRequest {
    #[serde(default)]
    pub trips: Vec<Trip>,
    #[serde(default)]
    pub drivers: Vec<Driver>,
}

#[derive(Serialize)]
pub struct SnapshotSummary {
    pub trips: usize,
    pub drivers: usize,
    pub fetched_at: DateTime<Utc>,
}

impl SnapshotSummary {
    fn of(snapshot: &Snapshot) -> Self {
        Self {
            trips: snapshot.trips.len(),
            drivers: snapshot.drivers.len(),
            fetched_at: snapshot.fetched_at,
        }
    }
}

async fn replace_snapshot(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ReplaceSnapshotRequest>,
) -> Json<SnapshotSummary> {
    let snapshot = state.replace_snapshot(Snapshot::new(payload.trips, payload.drivers));
    Json(SnapshotSummary::of(&snapshot))
}

async fn get_snapshot(State(state): State<Arc<AppState>>) -> Json<Snapshot> {
    Json(state.snapshot().as_ref().clone())
}

async fn get_trip(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Trip>, AppError> {
    let snapshot = state.snapshot();
    let trip = snapshot
        .trip(id)
        .ok_or_else(|| AppError::NotFound(format!("trip {} not found", id)))?;

    Ok(Json(trip.clone()))
}
