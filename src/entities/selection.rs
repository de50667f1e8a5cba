use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::{Coordinates, Endpoint, Route, RouteMetrics};
use crate::error::{invalid_state_error, Error};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SelectionState {
    pub origin: Option<Coordinates>,
    pub destination: Option<Coordinates>,
    pub route_requested: bool,
    pub pending_request: Option<Uuid>,
    pub route: Option<Route>,
    pub metrics: Option<RouteMetrics>,
    pub route_error: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Idle,
    OriginSet,
    DestinationSet,
    BothSet,
    RouteShown,
    RouteFailed,
}

impl Status {
    pub fn name(&self) -> String {
        match self {
            Self::Idle => "idle".into(),
            Self::OriginSet => "origin_set".into(),
            Self::DestinationSet => "destination_set".into(),
            Self::BothSet => "both_set".into(),
            Self::RouteShown => "route_shown".into(),
            Self::RouteFailed => "route_failed".into(),
        }
    }
}

#[derive(Clone, Debug)]
pub enum Action {
    PlaceSelected {
        endpoint: Endpoint,
        coordinates: Coordinates,
    },
    TrackRequested {
        request_id: Uuid,
    },
    RouteCompleted {
        request_id: Uuid,
        route: Route,
    },
    RouteFailed {
        request_id: Uuid,
        message: String,
    },
}

impl SelectionState {
    pub fn status(&self) -> Status {
        match (&self.origin, &self.destination, self.route_requested) {
            (Some(_), Some(_), true) if self.route_error.is_some() => Status::RouteFailed,
            (Some(_), Some(_), true) => Status::RouteShown,
            (Some(_), Some(_), false) => Status::BothSet,
            (Some(_), None, _) => Status::OriginSet,
            (None, Some(_), _) => Status::DestinationSet,
            (None, None, _) => Status::Idle,
        }
    }

    pub fn endpoints(&self) -> Option<(Coordinates, Coordinates)> {
        Some((self.origin?, self.destination?))
    }

    /// True when the drawn route was computed for points that have since
    /// been replaced. The route stays on screen until the next track.
    pub fn is_route_stale(&self) -> bool {
        match (&self.route, self.endpoints()) {
            (Some(route), Some((origin, destination))) => !route.connects(&origin, &destination),
            _ => false,
        }
    }

    /// Produces the state that follows `action`. The current state is never
    /// modified.
    pub fn reduce(&self, action: &Action) -> Result<Self, Error> {
        let mut next = self.clone();

        match action {
            Action::PlaceSelected {
                endpoint,
                coordinates,
            } => match endpoint {
                Endpoint::Origin => next.origin = Some(*coordinates),
                Endpoint::Destination => next.destination = Some(*coordinates),
            },
            Action::TrackRequested { request_id } => {
                if self.endpoints().is_none() {
                    return Err(invalid_state_error());
                }

                next.route_requested = true;
                next.pending_request = Some(*request_id);
                next.route_error = None;
            }
            Action::RouteCompleted { request_id, route } => {
                if self.pending_request != Some(*request_id) {
                    tracing::debug!("dropping superseded route {:?}", request_id);
                    return Ok(next);
                }

                next.pending_request = None;
                next.metrics = Some(route.metrics);
                next.route = Some(route.clone());
                next.route_error = None;
            }
            Action::RouteFailed {
                request_id,
                message,
            } => {
                if self.pending_request != Some(*request_id) {
                    tracing::debug!("dropping superseded route failure {:?}", request_id);
                    return Ok(next);
                }

                next.pending_request = None;
                next.route = None;
                next.metrics = None;
                next.route_error = Some(message.clone());
            }
        }

        Ok(next)
    }
}

#[cfg(test)]
fn select(endpoint: Endpoint, latitude: f64, longitude: f64) -> Action {
    Action::PlaceSelected {
        endpoint,
        coordinates: Coordinates::new(latitude, longitude),
    }
}

#[cfg(test)]
fn completed_route(state: &SelectionState, request_id: Uuid, distance_km: f64) -> Action {
    let (origin, destination) = state.endpoints().unwrap();

    Action::RouteCompleted {
        request_id,
        route: Route::new(
            origin,
            destination,
            geo_types::LineString::new(vec![origin.into(), destination.into()]),
            RouteMetrics::new(distance_km, 18.0),
        ),
    }
}

#[test]
fn walks_through_every_status() {
    let state = SelectionState::default();
    assert_eq!(state.status(), Status::Idle);

    let state = state.reduce(&select(Endpoint::Origin, 6.50, 3.38)).unwrap();
    assert_eq!(state.status(), Status::OriginSet);

    let state = state.reduce(&select(Endpoint::Destination, 6.45, 3.40)).unwrap();
    assert_eq!(state.status(), Status::BothSet);

    let request_id = Uuid::new_v4();
    let state = state
        .reduce(&Action::TrackRequested { request_id })
        .unwrap();
    assert_eq!(state.status(), Status::RouteShown);
    assert_eq!(state.pending_request, Some(request_id));

    let state = state
        .reduce(&completed_route(&state, request_id, 12.3))
        .unwrap();
    assert_eq!(state.metrics, Some(RouteMetrics::new(12.3, 18.0)));
    assert!(state.pending_request.is_none());
}

#[test]
fn destination_first_is_symmetric() {
    let state = SelectionState::default()
        .reduce(&select(Endpoint::Destination, 6.45, 3.40))
        .unwrap();
    assert_eq!(state.status(), Status::DestinationSet);

    let state = state.reduce(&select(Endpoint::Origin, 6.50, 3.38)).unwrap();
    assert_eq!(state.status(), Status::BothSet);
}

#[test]
fn track_requires_both_endpoints() {
    let state = SelectionState::default()
        .reduce(&select(Endpoint::Origin, 6.50, 3.38))
        .unwrap();

    let err = state
        .reduce(&Action::TrackRequested {
            request_id: Uuid::new_v4(),
        })
        .unwrap_err();

    assert_eq!(err.code, 100);
    assert!(!state.route_requested);
}

#[test]
fn reselecting_the_same_origin_changes_nothing() {
    let state = SelectionState::default()
        .reduce(&select(Endpoint::Origin, 6.50, 3.38))
        .unwrap();

    let again = state.reduce(&select(Endpoint::Origin, 6.50, 3.38)).unwrap();

    assert_eq!(again, state);
}

#[test]
fn reduce_leaves_previous_state_untouched() {
    let state = SelectionState::default();
    let next = state.reduce(&select(Endpoint::Origin, 6.50, 3.38)).unwrap();

    assert!(state.origin.is_none());
    assert!(next.origin.is_some());
}

#[test]
fn superseded_completion_is_ignored() {
    let state = SelectionState::default()
        .reduce(&select(Endpoint::Origin, 6.50, 3.38))
        .unwrap()
        .reduce(&select(Endpoint::Destination, 6.45, 3.40))
        .unwrap();

    let first = Uuid::new_v4();
    let second = Uuid::new_v4();
    let state = state
        .reduce(&Action::TrackRequested { request_id: first })
        .unwrap()
        .reduce(&Action::TrackRequested { request_id: second })
        .unwrap();

    let state = state.reduce(&completed_route(&state, first, 99.0)).unwrap();
    assert!(state.metrics.is_none());

    let state = state.reduce(&completed_route(&state, second, 12.3)).unwrap();
    assert_eq!(state.metrics.map(|m| m.distance_km), Some(12.3));
}

#[test]
fn changed_point_keeps_route_but_marks_it_stale() {
    let request_id = Uuid::new_v4();
    let state = SelectionState::default()
        .reduce(&select(Endpoint::Origin, 6.50, 3.38))
        .unwrap()
        .reduce(&select(Endpoint::Destination, 6.45, 3.40))
        .unwrap()
        .reduce(&Action::TrackRequested { request_id })
        .unwrap();
    let state = state
        .reduce(&completed_route(&state, request_id, 12.3))
        .unwrap();
    assert!(!state.is_route_stale());

    let state = state
        .reduce(&select(Endpoint::Destination, 6.60, 3.35))
        .unwrap();

    assert_eq!(state.status(), Status::RouteShown);
    assert!(state.route.is_some());
    assert!(state.is_route_stale());
}

#[test]
fn failure_clears_previous_route() {
    let first = Uuid::new_v4();
    let state = SelectionState::default()
        .reduce(&select(Endpoint::Origin, 6.50, 3.38))
        .unwrap()
        .reduce(&select(Endpoint::Destination, 6.45, 3.40))
        .unwrap()
        .reduce(&Action::TrackRequested { request_id: first })
        .unwrap();
    let state = state.reduce(&completed_route(&state, first, 12.3)).unwrap();

    let second = Uuid::new_v4();
    let state = state
        .reduce(&Action::TrackRequested { request_id: second })
        .unwrap()
        .reduce(&Action::RouteFailed {
            request_id: second,
            message: "upstream error".into(),
        })
        .unwrap();

    assert!(state.route.is_none());
    assert!(state.metrics.is_none());
    assert_eq!(state.route_error.as_deref(), Some("upstream error"));
    assert_eq!(state.status(), Status::RouteFailed);

    let retry = state
        .reduce(&Action::TrackRequested {
            request_id: Uuid::new_v4(),
        })
        .unwrap();
    assert_eq!(retry.status(), Status::RouteShown);
    assert!(retry.route_error.is_none());
}
