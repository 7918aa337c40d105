use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};
use std::time::{Duration, Instant};

use chrono::{DateTime, NaiveDate, Utc};
use dashmap::DashMap;
use serde::Serialize;
use tokio::sync::broadcast;
use tracing::{info, warn};
use uuid::Uuid;

use crate::calendar::state::{CalendarAction, CalendarState};
use crate::config::Config;
use crate::error::MapError;
use crate::map::filter::MapFilter;
use crate::map::lifecycle::{MapPhase, MapView, RenderReport};
use crate::map::overlay::Overlay;
use crate::map::projection::Projector;
use crate::map::surface::SceneSurface;
use crate::models::snapshot::Snapshot;
use crate::observability::metrics::Metrics;

/// Pushed to WebSocket subscribers.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ViewEvent {
    SnapshotReplaced {
        trips: usize,
        drivers: usize,
        fetched_at: DateTime<Utc>,
    },
    MapRendered {
        filter: MapFilter,
        report: RenderReport,
        overlays: Vec<Overlay>,
    },
}

/// A calendar session and when a client last touched it.
#[derive(Debug, Clone, Copy)]
pub struct CalendarSession {
    pub state: CalendarState,
    pub last_seen: Instant,
}

pub struct AppState {
    snapshot: RwLock<Arc<Snapshot>>,
    sessions: DashMap<Uuid, CalendarSession>,
    map: Mutex<MapView<SceneSurface>>,
    pub events_tx: broadcast::Sender<ViewEvent>,
    pub metrics: Metrics,
    pub config: Config,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let (events_tx, _unused_rx) = broadcast::channel(config.event_buffer_size.max(1));

        let map = MapView::new(
            SceneSurface::new(),
            config.map_options,
            Projector::new(config.position_fallback),
            config.calendar_offset,
        );

        Self {
            snapshot: RwLock::new(Arc::new(Snapshot::empty())),
            sessions: DashMap::new(),
            map: Mutex::new(map),
            events_tx,
            metrics: Metrics::new(),
            config,
        }
    }

    /// The current snapshot. Callers keep their own handle, so a concurrent
    /// replacement never changes what they are reading.
    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.snapshot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Swaps the snapshot and re-projects the map in one step. The map lock
    /// is held across the swap so the map never lags behind what
    /// [`AppState::snapshot`] hands out.
    pub fn replace_snapshot(&self, snapshot: Snapshot) -> Arc<Snapshot> {
        let snapshot = Arc::new(snapshot);
        let started = Instant::now();
        let mut map = self.map();

        *self.snapshot.write().unwrap_or_else(PoisonError::into_inner) = snapshot.clone();

        self.metrics.snapshot_refreshes_total.inc();
        info!(
            trips = snapshot.trips.len(),
            drivers = snapshot.drivers.len(),
            "snapshot replaced"
        );

        let _ = self.events_tx.send(ViewEvent::SnapshotReplaced {
            trips: snapshot.trips.len(),
            drivers: snapshot.drivers.len(),
            fetched_at: snapshot.fetched_at,
        });

        let report = map.set_data(&snapshot.drivers, &snapshot.trips);
        self.publish_render(&map, report, started);

        snapshot
    }

    /// Brings the shared map up. The scene surface needs no external script,
    /// so loading completes immediately.
    pub fn start_map(&self) -> Result<MapPhase, MapError> {
        let started = Instant::now();
        let mut map = self.map();
        map.begin_script_load()?;
        let phase = map.script_loaded()?;
        let report = map.last_report();
        self.publish_render(&map, report, started);
        Ok(phase)
    }

    pub fn set_map_filter(&self, filter: MapFilter) -> Option<RenderReport> {
        let started = Instant::now();
        let mut map = self.map();
        let report = map.set_filter(filter);
        self.publish_render(&map, report, started);
        report
    }

    pub fn open_session(&self, today: NaiveDate) -> (Uuid, CalendarState) {
        let id = Uuid::new_v4();
        let state = CalendarState::new(today);
        self.sessions.insert(
            id,
            CalendarSession {
                state,
                last_seen: Instant::now(),
            },
        );
        self.metrics.calendar_sessions.set(self.sessions.len() as i64);
        (id, state)
    }

    pub fn session(&self, id: Uuid) -> Option<CalendarState> {
        let mut entry = self.sessions.get_mut(&id)?;
        entry.last_seen = Instant::now();
        Some(entry.state)
    }

    pub fn apply_session_action(&self, id: Uuid, action: CalendarAction) -> Option<CalendarState> {
        let mut entry = self.sessions.get_mut(&id)?;
        entry.state = entry.state.apply(action);
        entry.last_seen = Instant::now();
        Some(entry.state)
    }

    pub fn close_session(&self, id: Uuid) -> bool {
        let removed = self.sessions.remove(&id).is_some();
        self.metrics.calendar_sessions.set(self.sessions.len() as i64);
        removed
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    /// Drops sessions untouched for longer than the configured idle limit,
    /// measured against `now`. Returns how many were dropped.
    pub fn expire_idle_sessions(&self, now: Instant) -> usize {
        let ttl = self.config.session_idle_timeout;
        let before = self.sessions.len();
        self.sessions
            .retain(|_, session| now.saturating_duration_since(session.last_seen) <= ttl);
        let expired = before.saturating_sub(self.sessions.len());

        self.metrics.calendar_sessions.set(self.sessions.len() as i64);
        if expired > 0 {
            info!(expired, remaining = self.sessions.len(), "expired idle calendar sessions");
        }
        expired
    }

    pub fn map(&self) -> MutexGuard<'_, MapView<SceneSurface>> {
        self.map.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn today(&self) -> NaiveDate {
        Utc::now()
            .with_timezone(&self.config.calendar_offset)
            .date_naive()
    }

    fn publish_render(
        &self,
        map: &MapView<SceneSurface>,
        report: Option<RenderReport>,
        started: Instant,
    ) {
        let Some(report) = report else {
            if let Some(err) = map.last_error() {
                warn!(phase = map.phase().as_str(), error = err, "map render skipped");
            }
            return;
        };

        self.metrics
            .observe_render("map", started.elapsed().as_secs_f64());
        self.metrics.map_overlays.set(report.overlays as i64);
        let _ = self.events_tx.send(ViewEvent::MapRendered {
            filter: map.filter().clone(),
            report,
            overlays: map.surface().overlays().to_vec(),
        });
    }
}

/// Periodically drops idle calendar sessions. Runs until the process exits.
pub async fn run_session_sweeper(state: Arc<AppState>, every: Duration) {
    let mut ticker = tokio::time::interval(every);
    loop {
        ticker.tick().await;
        state.expire_idle_sessions(Instant::now());
    }
}
