use chrono::FixedOffset;
use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::error::MapError;
use crate::map::filter::{filter_by_status, MapFilter};
use crate::map::overlay::{build_overlays, Overlay};
use crate::map::projection::{DriverPoint, Projector, TripPoint};
use crate::map::surface::{MapOptions, MapSurface};
use crate::models::driver::Driver;
use crate::models::trip::Trip;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MapPhase {
    Unloaded,
    ScriptLoading,
    ScriptLoaded,
    MapInitialized,
    MarkersRendered,
}

impl MapPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            MapPhase::Unloaded => "unloaded",
            MapPhase::ScriptLoading => "script_loading",
            MapPhase::ScriptLoaded => "script_loaded",
            MapPhase::MapInitialized => "map_initialized",
            MapPhase::MarkersRendered => "markers_rendered",
        }
    }

    fn can_render(&self) -> bool {
        matches!(self, MapPhase::MapInitialized | MapPhase::MarkersRendered)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RenderReport {
    pub drivers: usize,
    pub trips: usize,
    pub unplaced: usize,
    pub failed: usize,
    pub overlays: usize,
}

/// Drives a [`MapSurface`] from load through rendering.
///
/// Records and the active filter can be set in any phase; they are drawn
/// once the surface is initialized and redrawn from scratch on every change.
pub struct MapView<S> {
    surface: S,
    options: MapOptions,
    projector: Projector,
    display_offset: FixedOffset,
    phase: MapPhase,
    filter: MapFilter,
    drivers: Vec<DriverPoint>,
    trips: Vec<TripPoint>,
    last_error: Option<String>,
    last_report: Option<RenderReport>,
}

impl<S: MapSurface> MapView<S> {
    pub fn new(
        surface: S,
        options: MapOptions,
        projector: Projector,
        display_offset: FixedOffset,
    ) -> Self {
        Self {
            surface,
            options,
            projector,
            display_offset,
            phase: MapPhase::Unloaded,
            filter: MapFilter::All,
            drivers: Vec::new(),
            trips: Vec::new(),
            last_error: None,
            last_report: None,
        }
    }

    pub fn phase(&self) -> MapPhase {
        self.phase
    }

    pub fn filter(&self) -> &MapFilter {
        &self.filter
    }

    pub fn options(&self) -> &MapOptions {
        &self.options
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn drivers(&self) -> &[DriverPoint] {
        &self.drivers
    }

    pub fn trips(&self) -> &[TripPoint] {
        &self.trips
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn last_report(&self) -> Option<RenderReport> {
        self.last_report
    }

    pub fn begin_script_load(&mut self) -> Result<(), MapError> {
        self.transition(MapPhase::Unloaded, MapPhase::ScriptLoading)?;
        debug!("map script loading");
        Ok(())
    }

    /// Script is ready: build the map and draw whatever is already set.
    /// A construction failure is logged and leaves the view in
    /// `ScriptLoaded`.
    pub fn script_loaded(&mut self) -> Result<MapPhase, MapError> {
        self.transition(MapPhase::ScriptLoading, MapPhase::ScriptLoaded)?;

        if let Err(err) = self.surface.initialize(&self.options) {
            error!(error = %err, "map initialization failed");
            self.last_error = Some(err.to_string());
            return Ok(self.phase);
        }

        self.phase = MapPhase::MapInitialized;
        self.last_error = None;
        info!(
            lat = self.options.center.lat,
            lng = self.options.center.lng,
            zoom = self.options.zoom,
            "map initialized"
        );

        self.render();
        Ok(self.phase)
    }

    pub fn script_failed(&mut self, reason: impl Into<String>) -> Result<MapPhase, MapError> {
        self.transition(MapPhase::ScriptLoading, MapPhase::ScriptLoaded)?;

        let err = MapError::ScriptLoad(reason.into());
        error!(error = %err, "map script failed to load");
        self.last_error = Some(err.to_string());
        Ok(self.phase)
    }

    /// Replaces the records on the map. Returns the render report when the
    /// map was ready to draw.
    pub fn set_data(&mut self, drivers: &[Driver], trips: &[Trip]) -> Option<RenderReport> {
        let (drivers, trips) = self.projector.project_all(drivers, trips);
        self.drivers = drivers;
        self.trips = trips;
        self.render()
    }

    pub fn set_filter(&mut self, filter: MapFilter) -> Option<RenderReport> {
        self.filter = filter;
        self.render()
    }

    fn transition(&mut self, from: MapPhase, to: MapPhase) -> Result<(), MapError> {
        if self.phase != from {
            return Err(MapError::InvalidTransition {
                from: self.phase.as_str(),
                to: to.as_str(),
            });
        }
        self.phase = to;
        Ok(())
    }

    fn render(&mut self) -> Option<RenderReport> {
        if !self.phase.can_render() {
            debug!(phase = self.phase.as_str(), "map not ready; deferring render");
            return None;
        }

        let plan = {
            let selection = filter_by_status(&self.drivers, &self.trips, &self.filter);
            build_overlays(&selection, &self.display_offset)
        };

        self.surface.clear_all();

        let mut report = RenderReport {
            drivers: plan.drivers,
            trips: plan.trips,
            unplaced: plan.unplaced,
            ..RenderReport::default()
        };

        for overlay in &plan.overlays {
            let placed = match overlay {
                Overlay::Marker(marker) => self.surface.place_marker(marker),
                Overlay::Line(line) => self.surface.place_line(line),
            };

            match placed {
                Ok(()) => report.overlays += 1,
                Err(err) => {
                    warn!(error = %err, "failed to place overlay");
                    report.failed += 1;
                }
            }
        }

        self.phase = MapPhase::MarkersRendered;
        self.last_report = Some(report);

        debug!(
            filter = %self.filter,
            drivers = report.drivers,
            trips = report.trips,
            unplaced = report.unplaced,
            failed = report.failed,
            "map rendered"
        );

        Some(report)
    }
}

#[cfg(test)]
mod tests {
    use chrono::FixedOffset;
    use uuid::Uuid;

    use super::{MapPhase, MapView};
    use crate::error::MapError;
    use crate::map::filter::MapFilter;
    use crate::map::overlay::{LineSpec, MarkerKind, MarkerSpec};
    use crate::map::projection::tests::trip_at;
    use crate::map::projection::Projector;
    use crate::map::surface::{MapOptions, MapSurface};
    use crate::models::driver::{CoordinateInput, Driver, DriverStatus, GeoPoint};

    #[derive(Default)]
    struct RecordingSurface {
        fail_init: bool,
        fail_lines: bool,
        markers: Vec<MarkerSpec>,
        lines: Vec<LineSpec>,
        clears: usize,
    }

    impl MapSurface for RecordingSurface {
        fn initialize(&mut self, _options: &MapOptions) -> Result<(), MapError> {
            if self.fail_init {
                return Err(MapError::Construction("no container".to_string()));
            }
            Ok(())
        }

        fn place_marker(&mut self, marker: &MarkerSpec) -> Result<(), MapError> {
            self.markers.push(marker.clone());
            Ok(())
        }

        fn place_line(&mut self, line: &LineSpec) -> Result<(), MapError> {
            if self.fail_lines {
                return Err(MapError::Placement("polyline rejected".to_string()));
            }
            self.lines.push(line.clone());
            Ok(())
        }

        fn clear_all(&mut self) {
            self.markers.clear();
            self.lines.clear();
            self.clears += 1;
        }
    }

    fn view(surface: RecordingSurface) -> MapView<RecordingSurface> {
        MapView::new(
            surface,
            MapOptions::default(),
            Projector::default(),
            FixedOffset::east_opt(0).unwrap(),
        )
    }

    fn driver(seed: u128, status: DriverStatus) -> Driver {
        Driver {
            id: Uuid::from_u128(seed),
            full_name: Some(format!("Driver {seed}")),
            first_name: None,
            last_name: None,
            email: None,
            phone: None,
            status,
            current_position: Some(CoordinateInput::Pair(GeoPoint::new(37.77, -122.41))),
        }
    }

    fn loaded(surface: RecordingSurface) -> MapView<RecordingSurface> {
        let mut map = view(surface);
        map.begin_script_load().unwrap();
        map.script_loaded().unwrap();
        map
    }

    #[test]
    fn walks_through_every_phase() {
        let mut map = view(RecordingSurface::default());
        assert_eq!(map.phase(), MapPhase::Unloaded);

        map.begin_script_load().unwrap();
        assert_eq!(map.phase(), MapPhase::ScriptLoading);

        assert_eq!(map.script_loaded().unwrap(), MapPhase::MarkersRendered);
        assert!(map.last_report().is_some());
    }

    #[test]
    fn data_set_before_load_is_drawn_once_ready() {
        let mut map = view(RecordingSurface::default());
        let drivers = vec![driver(1, DriverStatus::Available)];

        assert!(map.set_data(&drivers, &[]).is_none());
        assert!(map.surface().markers.is_empty());

        map.begin_script_load().unwrap();
        map.script_loaded().unwrap();

        assert_eq!(map.surface().markers.len(), 1);
    }

    #[test]
    fn construction_failure_stays_in_script_loaded() {
        let mut map = view(RecordingSurface {
            fail_init: true,
            ..RecordingSurface::default()
        });
        map.begin_script_load().unwrap();

        assert_eq!(map.script_loaded().unwrap(), MapPhase::ScriptLoaded);
        assert!(map.last_error().unwrap().contains("no container"));

        let drivers = vec![driver(1, DriverStatus::Available)];
        assert!(map.set_data(&drivers, &[]).is_none());
        assert!(map.surface().markers.is_empty());
    }

    #[test]
    fn script_failure_is_reported_without_markers() {
        let mut map = view(RecordingSurface::default());
        map.begin_script_load().unwrap();

        assert_eq!(map.script_failed("network down").unwrap(), MapPhase::ScriptLoaded);
        assert!(map.last_error().unwrap().contains("network down"));
        assert_eq!(map.surface().clears, 0);
    }

    #[test]
    fn out_of_order_transitions_are_rejected() {
        let mut map = view(RecordingSurface::default());
        assert!(matches!(
            map.script_loaded(),
            Err(MapError::InvalidTransition { .. })
        ));

        map.begin_script_load().unwrap();
        assert!(map.begin_script_load().is_err());
    }

    #[test]
    fn refilter_by_available_drops_trip_overlays() {
        let mut map = loaded(RecordingSurface::default());
        let drivers = vec![
            driver(1, DriverStatus::Available),
            driver(2, DriverStatus::Offline),
            driver(3, DriverStatus::Available),
        ];
        let trips = vec![trip_at(10, Some("37.1,-122.2"), Some("37.2,-122.3"))];

        let report = map.set_data(&drivers, &trips).unwrap();
        assert_eq!(report.drivers, 3);
        assert_eq!(report.trips, 1);
        assert_eq!(map.surface().markers.len(), 5);
        assert_eq!(map.surface().lines.len(), 1);

        let clears_before = map.surface().clears;
        let report = map
            .set_filter(MapFilter::Drivers(DriverStatus::Available))
            .unwrap();

        assert_eq!(map.surface().clears, clears_before + 1);
        assert_eq!(report.trips, 0);
        assert!(map.surface().lines.is_empty());
        let ids: Vec<u128> = map
            .surface()
            .markers
            .iter()
            .map(|m| {
                assert_eq!(m.kind, MarkerKind::Driver);
                m.record_id.as_u128()
            })
            .collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn placement_failures_are_counted_not_fatal() {
        let mut map = loaded(RecordingSurface {
            fail_lines: true,
            ..RecordingSurface::default()
        });
        let trips = vec![trip_at(10, Some("37.1,-122.2"), Some("37.2,-122.3"))];

        let report = map.set_data(&[], &trips).unwrap();

        assert_eq!(report.failed, 1);
        assert_eq!(report.overlays, 2);
        assert_eq!(map.phase(), MapPhase::MarkersRendered);
    }
}
