use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use geo_types::LineString;

use crate::entities::{Coordinates, Geometry, Place, PlaceSuggestion, PlaceSuggestions};
use crate::error::{invalid_input_error, upstream_error, Error};
use crate::external::{Directions, DirectionsService, PlacesService};

pub struct FakeDirections {
    metrics: Mutex<VecDeque<(f64, f64)>>,
    delays: Mutex<VecDeque<Duration>>,
    fail: bool,
    requests: Mutex<Vec<(Coordinates, Coordinates)>>,
}

impl FakeDirections {
    pub fn new(distance_km: f64, duration_min: f64) -> Self {
        Self::sequence(vec![(distance_km, duration_min)], vec![])
    }

    /// Answers each call with the next metrics, after the next delay.
    pub fn sequence(metrics: Vec<(f64, f64)>, delays: Vec<Duration>) -> Self {
        Self {
            metrics: Mutex::new(metrics.into()),
            delays: Mutex::new(delays.into()),
            fail: false,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new(0.0, 0.0)
        }
    }

    pub fn requests(&self) -> Vec<(Coordinates, Coordinates)> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl DirectionsService for FakeDirections {
    async fn find_directions(
        &self,
        origin: Coordinates,
        destination: Coordinates,
    ) -> Result<Directions, Error> {
        self.requests.lock().unwrap().push((origin, destination));

        let (distance_km, duration_min) = {
            let mut metrics = self.metrics.lock().unwrap();
            if metrics.len() > 1 {
                metrics.pop_front().unwrap()
            } else {
                *metrics.front().unwrap()
            }
        };

        let delay = self.delays.lock().unwrap().pop_front();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if self.fail {
            return Err(upstream_error());
        }

        Ok(Directions {
            geometry: LineString::new(vec![origin.into(), destination.into()]),
            distance_km,
            duration_min,
        })
    }
}

#[derive(Default)]
pub struct FakePlaces {
    places: HashMap<String, Place>,
}

impl FakePlaces {
    pub fn with_place(mut self, place_id: &str, location: Option<Coordinates>) -> Self {
        self.places.insert(
            place_id.into(),
            Place {
                place_id: place_id.into(),
                formatted_address: format!("{place_id} street"),
                geometry: location.map(|location| Geometry { location }),
            },
        );
        self
    }
}

#[async_trait]
impl PlacesService for FakePlaces {
    async fn find_place_suggestions(&self, input: String) -> Result<PlaceSuggestions, Error> {
        let mut suggestions: PlaceSuggestions = self
            .places
            .values()
            .filter(|place| place.place_id.starts_with(&input))
            .map(|place| PlaceSuggestion {
                place_id: place.place_id.clone(),
                description: place.formatted_address.clone(),
            })
            .collect();
        suggestions.sort_by(|a, b| a.place_id.cmp(&b.place_id));

        Ok(suggestions)
    }

    async fn find_place(&self, place_id: String) -> Result<Place, Error> {
        self.places
            .get(&place_id)
            .cloned()
            .ok_or_else(invalid_input_error)
    }
}
