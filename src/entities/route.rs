use chrono::{DateTime, Utc};
use geo_types::LineString;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::Coordinates;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RouteMetrics {
    pub distance_km: f64,
    pub duration_min: f64,
}

impl RouteMetrics {
    pub fn new(distance_km: f64, duration_min: f64) -> Self {
        Self {
            distance_km,
            duration_min,
        }
    }

    pub fn distance_text(&self) -> String {
        format!("{:.2} km", self.distance_km)
    }

    pub fn duration_text(&self) -> String {
        format!("{} mins", self.duration_min.ceil())
    }

    /// The readout stays hidden while either value is zero.
    pub fn is_displayable(&self) -> bool {
        self.distance_km != 0.0 && self.duration_min != 0.0
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub id: Uuid,
    pub origin: Coordinates,
    pub destination: Coordinates,
    pub geometry: LineString<f64>,
    pub metrics: RouteMetrics,
    pub completed_at: DateTime<Utc>,
}

impl Route {
    pub fn new(
        origin: Coordinates,
        destination: Coordinates,
        geometry: LineString<f64>,
        metrics: RouteMetrics,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            origin,
            destination,
            geometry,
            metrics,
            completed_at: Utc::now(),
        }
    }

    pub fn path(&self) -> Vec<Coordinates> {
        self.geometry.coords().map(|coord| (*coord).into()).collect()
    }

    pub fn connects(&self, origin: &Coordinates, destination: &Coordinates) -> bool {
        self.origin == *origin && self.destination == *destination
    }
}

#[test]
fn distance_and_duration_render_independently() {
    let metrics = RouteMetrics::new(12.3, 18.0);

    assert_eq!(metrics.distance_text(), "12.30 km");
    assert_eq!(metrics.duration_text(), "18 mins");
}

#[test]
fn duration_rounds_up_to_whole_minutes() {
    let metrics = RouteMetrics::new(3.456, 7.2);

    assert_eq!(metrics.distance_text(), "3.46 km");
    assert_eq!(metrics.duration_text(), "8 mins");
}

#[test]
fn zero_metrics_are_hidden() {
    assert!(!RouteMetrics::new(0.0, 18.0).is_displayable());
    assert!(!RouteMetrics::new(12.3, 0.0).is_displayable());
    assert!(RouteMetrics::new(12.3, 18.0).is_displayable());
}

#[test]
fn path_is_latitude_first() {
    let geometry = LineString::from(vec![(3.38, 6.5), (3.40, 6.45)]);
    let route = Route::new(
        Coordinates::new(6.5, 3.38),
        Coordinates::new(6.45, 3.40),
        geometry,
        RouteMetrics::new(1.0, 1.0),
    );

    assert_eq!(
        route.path(),
        vec![Coordinates::new(6.5, 3.38), Coordinates::new(6.45, 3.40)]
    );
}
