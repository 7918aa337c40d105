use serde::{Deserialize, Serialize};

use crate::error::MapError;
use crate::map::overlay::{LineSpec, MarkerSpec, Overlay};
use crate::models::driver::GeoPoint;

pub const MAX_ZOOM: u8 = 22;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapOptions {
    pub center: GeoPoint,
    pub zoom: u8,
}

impl Default for MapOptions {
    fn default() -> Self {
        Self {
            center: GeoPoint::new(37.7749, -122.4194),
            zoom: 13,
        }
    }
}

/// The slice of a mapping SDK the map view drives.
pub trait MapSurface {
    fn initialize(&mut self, options: &MapOptions) -> Result<(), MapError>;

    fn place_marker(&mut self, marker: &MarkerSpec) -> Result<(), MapError>;

    fn place_line(&mut self, line: &LineSpec) -> Result<(), MapError>;

    /// Removes every marker and line placed so far.
    fn clear_all(&mut self);
}

/// Keeps placed overlays in memory so they can be shipped to a browser as
/// JSON and drawn there.
#[derive(Debug, Clone, Default)]
pub struct SceneSurface {
    options: Option<MapOptions>,
    overlays: Vec<Overlay>,
}

impl SceneSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn options(&self) -> Option<&MapOptions> {
        self.options.as_ref()
    }

    pub fn overlays(&self) -> &[Overlay] {
        &self.overlays
    }

    fn ensure_initialized(&self) -> Result<(), MapError> {
        match self.options {
            Some(_) => Ok(()),
            None => Err(MapError::Placement("map is not initialized".to_string())),
        }
    }
}

impl MapSurface for SceneSurface {
    fn initialize(&mut self, options: &MapOptions) -> Result<(), MapError> {
        if !options.center.is_valid() {
            return Err(MapError::Construction(format!(
                "center {},{} is out of range",
                options.center.lat, options.center.lng
            )));
        }

        if options.zoom > MAX_ZOOM {
            return Err(MapError::Construction(format!(
                "zoom {} exceeds {MAX_ZOOM}",
                options.zoom
            )));
        }

        self.options = Some(*options);
        Ok(())
    }

    fn place_marker(&mut self, marker: &MarkerSpec) -> Result<(), MapError> {
        self.ensure_initialized()?;
        self.overlays.push(Overlay::Marker(marker.clone()));
        Ok(())
    }

    fn place_line(&mut self, line: &LineSpec) -> Result<(), MapError> {
        self.ensure_initialized()?;
        self.overlays.push(Overlay::Line(line.clone()));
        Ok(())
    }

    fn clear_all(&mut self) {
        self.overlays.clear();
    }
}
