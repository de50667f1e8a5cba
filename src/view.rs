use serde::{Deserialize, Serialize};

use crate::entities::{Coordinates, Endpoint, SelectionState, Status};

pub const ROUTE_STROKE_WIDTH: f64 = 5.0;
pub const ROUTE_STROKE_COLOR: &str = "#260ba9";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub endpoint: Endpoint,
    pub label: String,
    pub coordinates: Coordinates,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RouteOverlay {
    pub path: Vec<Coordinates>,
    pub stroke_width: f64,
    pub stroke_color: String,
    pub stale: bool,
}

/// Everything the screen shows for one selection state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct View {
    pub status: Status,
    pub markers: Vec<Marker>,
    pub route: Option<RouteOverlay>,
    pub distance: Option<String>,
    pub duration: Option<String>,
    pub loading: bool,
    pub error: Option<String>,
}

impl From<&SelectionState> for View {
    fn from(state: &SelectionState) -> Self {
        let markers = [
            (Endpoint::Origin, state.origin),
            (Endpoint::Destination, state.destination),
        ]
        .into_iter()
        .filter_map(|(endpoint, coordinates)| {
            Some(Marker {
                endpoint,
                label: endpoint.label().into(),
                coordinates: coordinates?,
            })
        })
        .collect();

        let route = match (&state.route, state.route_requested) {
            (Some(route), true) => Some(RouteOverlay {
                path: route.path(),
                stroke_width: ROUTE_STROKE_WIDTH,
                stroke_color: ROUTE_STROKE_COLOR.into(),
                stale: state.is_route_stale(),
            }),
            _ => None,
        };

        let readout = state.metrics.filter(|metrics| metrics.is_displayable());

        Self {
            status: state.status(),
            markers,
            route,
            distance: readout.map(|metrics| metrics.distance_text()),
            duration: readout.map(|metrics| metrics.duration_text()),
            loading: state.pending_request.is_some(),
            error: state.route_error.clone(),
        }
    }
}

#[test]
fn empty_state_shows_nothing() {
    let view = View::from(&SelectionState::default());

    assert_eq!(view.status, Status::Idle);
    assert!(view.markers.is_empty());
    assert!(view.route.is_none());
    assert!(view.distance.is_none());
}

#[test]
fn shows_one_marker_per_selected_point() {
    let state = SelectionState {
        destination: Some(Coordinates::new(6.45, 3.40)),
        ..Default::default()
    };

    let view = View::from(&state);

    assert_eq!(view.markers.len(), 1);
    assert_eq!(view.markers[0].label, "To");
}

#[test]
fn shows_route_and_readout_after_completion() {
    use crate::entities::{Route, RouteMetrics};

    let origin = Coordinates::new(6.50, 3.38);
    let destination = Coordinates::new(6.45, 3.40);
    let route = Route::new(
        origin,
        destination,
        geo_types::LineString::new(vec![origin.into(), destination.into()]),
        RouteMetrics::new(12.3, 18.0),
    );
    let state = SelectionState {
        origin: Some(origin),
        destination: Some(destination),
        route_requested: true,
        metrics: Some(route.metrics),
        route: Some(route),
        ..Default::default()
    };

    let view = View::from(&state);

    assert_eq!(view.status, Status::RouteShown);
    assert_eq!(view.distance.as_deref(), Some("12.30 km"));
    assert_eq!(view.duration.as_deref(), Some("18 mins"));

    let overlay = view.route.unwrap();
    assert_eq!(overlay.path, vec![origin, destination]);
    assert_eq!(overlay.stroke_color, "#260ba9");
    assert!(!overlay.stale);
}
