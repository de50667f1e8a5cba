pub mod google_maps;

use std::sync::Arc;

use async_trait::async_trait;
use geo_types::LineString;

use crate::entities::{Coordinates, Place, PlaceSuggestions};
use crate::error::Error;

pub use google_maps::GoogleMaps;

#[async_trait]
pub trait PlacesService {
    async fn find_place_suggestions(&self, input: String) -> Result<PlaceSuggestions, Error>;
    async fn find_place(&self, place_id: String) -> Result<Place, Error>;
}

pub type DynPlaces = Arc<dyn PlacesService + Send + Sync>;

/// A driving route as returned by the directions service.
#[derive(Clone, Debug, PartialEq)]
pub struct Directions {
    pub geometry: LineString<f64>,
    pub distance_km: f64,
    pub duration_min: f64,
}

#[async_trait]
pub trait DirectionsService {
    async fn find_directions(
        &self,
        origin: Coordinates,
        destination: Coordinates,
    ) -> Result<Directions, Error>;
}

pub type DynDirections = Arc<dyn DirectionsService + Send + Sync>;
