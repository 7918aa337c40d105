pub mod filter;
pub mod lifecycle;
pub mod overlay;
pub mod palette;
pub mod projection;
pub mod surface;

pub use filter::{filter_by_status, MapFilter, MapSelection};
pub use lifecycle::{MapPhase, MapView, RenderReport};
pub use projection::{
    project_driver, project_trip, DriverPoint, Position, PositionFallback, Projector, TripPoint,
};
pub use surface::{MapOptions, MapSurface, SceneSurface};
