use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::watch;

use crate::entities::{Endpoint, Place, PlaceSuggestions, SelectionState};
use crate::error::Error;
use crate::view::View;

#[async_trait]
pub trait PlaceAPI {
    async fn find_suggestions(&self, input: String) -> Result<PlaceSuggestions, Error>;
    async fn select_place(&self, endpoint: Endpoint, place: Place) -> Result<SelectionState, Error>;
    async fn select_place_by_id(
        &self,
        endpoint: Endpoint,
        place_id: String,
    ) -> Result<SelectionState, Error>;
}

#[async_trait]
pub trait RouteAPI {
    async fn track(&self) -> Result<SelectionState, Error>;
}

pub trait SessionAPI {
    fn session(&self) -> SelectionState;
    fn view(&self) -> View;
    fn subscribe(&self) -> watch::Receiver<SelectionState>;
}

pub trait API: PlaceAPI + RouteAPI + SessionAPI {}

pub type DynAPI = Arc<dyn API + Send + Sync>;
