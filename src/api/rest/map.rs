use std::sync::Arc;

use axum::extract::State;
use axum::routing::{get, put};
use axum::Json;
use axum::Router;
use serde::{Deserialize, Serialize};

use crate::map::filter::{filter_by_status, MapFilter};
use crate::map::lifecycle::{MapPhase, RenderReport};
use crate::map::overlay::Overlay;
use crate::map::projection::{DriverPoint, PositionFallback, TripPoint};
use crate::map::surface::MapOptions;
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/map", get(get_scene))
        .route("/map/filter", put(set_filter))
        .route("/map/config", get(get_config))
}

#[derive(Deserialize)]
pub struct SetFilterRequest {
    pub filter: MapFilter,
}

#[derive(Serialize)]
pub struct MapScene {
    pub phase: MapPhase,
    pub filter: MapFilter,
    pub error: Option<String>,
    pub report: Option<RenderReport>,
    pub overlays: Vec<Overlay>,
    /// Drivers matching the filter, including ones with no known position.
    pub drivers: Vec<DriverPoint>,
    pub trips: Vec<TripPoint>,
}

#[derive(Serialize)]
pub struct MapClientConfig {
    pub script_src: String,
    pub options: MapOptions,
    pub position_fallback: PositionFallback,
}

async fn get_scene(State(state): State<Arc<AppState>>) -> Json<MapScene> {
    Json(scene(&state))
}

async fn set_filter(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<SetFilterRequest>,
) -> Json<MapScene> {
    state.set_map_filter(payload.filter);
    Json(scene(&state))
}

async fn get_config(State(state): State<Arc<AppState>>) -> Json<MapClientConfig> {
    Json(MapClientConfig {
        script_src: state.config.maps_script_src(),
        options: state.config.map_options,
        position_fallback: state.config.position_fallback,
    })
}

fn scene(state: &AppState) -> MapScene {
    let map = state.map();
    let selection = filter_by_status(map.drivers(), map.trips(), map.filter());

    MapScene {
        phase: map.phase(),
        filter: map.filter().clone(),
        error: map.last_error().map(str::to_string),
        report: map.last_report(),
        overlays: map.surface().overlays().to_vec(),
        drivers: selection.drivers.into_iter().cloned().collect(),
        trips: map.trips().to_vec(),
    }
}
