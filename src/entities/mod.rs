mod camera;
mod coordinates;
mod place;
mod route;
mod selection;

pub use camera::{Camera, EdgePadding, Viewport};
pub use coordinates::Coordinates;
pub use place::{Endpoint, Geometry, Place, PlaceSuggestion, PlaceSuggestions};
pub use route::{Route, RouteMetrics};
pub use selection::{Action, SelectionState, Status};
