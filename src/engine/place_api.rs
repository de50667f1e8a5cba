use super::Engine;

use async_trait::async_trait;

use crate::{
    api::PlaceAPI,
    entities::{Action, Endpoint, Place, PlaceSuggestions, SelectionState},
    error::Error,
};

#[async_trait]
impl PlaceAPI for Engine {
    #[tracing::instrument(skip(self))]
    async fn find_suggestions(&self, input: String) -> Result<PlaceSuggestions, Error> {
        self.places.find_place_suggestions(input).await
    }

    #[tracing::instrument(skip(self, place), fields(place_id = %place.place_id))]
    async fn select_place(&self, endpoint: Endpoint, place: Place) -> Result<SelectionState, Error> {
        let coordinates = self.resolver.resolve(&place)?;

        let state = self.store.dispatch(Action::PlaceSelected {
            endpoint,
            coordinates,
        })?;

        self.map.center_on(coordinates).await;

        Ok(state)
    }

    #[tracing::instrument(skip(self))]
    async fn select_place_by_id(
        &self,
        endpoint: Endpoint,
        place_id: String,
    ) -> Result<SelectionState, Error> {
        let place = self.places.find_place(place_id).await?;

        self.select_place(endpoint, place).await
    }
}

#[test]
fn selecting_origin_centers_the_camera() {
    use super::test_engine;
    use crate::config::Config;
    use crate::entities::{Coordinates, Status};
    use crate::testing::{FakeDirections, FakePlaces};
    use tokio_test::block_on;

    let places = FakePlaces::default().with_place("yaba", Some(Coordinates::new(6.50, 3.38)));
    let (engine, _, map) = test_engine(&Config::new("key"), places, FakeDirections::new(1.0, 1.0));

    let state = block_on(engine.select_place_by_id(Endpoint::Origin, "yaba".into())).unwrap();

    assert_eq!(state.status(), Status::OriginSet);
    assert_eq!(state.origin, Some(Coordinates::new(6.50, 3.38)));

    let snapshot = block_on(map.snapshot()).unwrap();
    assert_eq!(snapshot.camera.center, Coordinates::new(6.50, 3.38));
    assert_eq!(snapshot.last_animation.unwrap().duration_ms, 1000);
}

#[test]
fn missing_geometry_is_rejected_by_default() {
    use super::test_engine;
    use crate::config::Config;
    use crate::entities::Status;
    use crate::testing::{FakeDirections, FakePlaces};
    use tokio_test::block_on;

    let places = FakePlaces::default().with_place("nowhere", None);
    let (engine, _, map) = test_engine(&Config::new("key"), places, FakeDirections::new(1.0, 1.0));

    let err = block_on(engine.select_place_by_id(Endpoint::Origin, "nowhere".into())).unwrap_err();

    assert_eq!(err.code, 102);
    assert_eq!(engine.store.state().status(), Status::Idle);
    assert!(block_on(map.snapshot()).unwrap().last_animation.is_none());
}

#[test]
fn missing_geometry_can_fall_back_to_zero() {
    use super::test_engine;
    use crate::config::{Config, MissingGeometry};
    use crate::entities::Coordinates;
    use crate::testing::{FakeDirections, FakePlaces};
    use tokio_test::block_on;

    let mut config = Config::new("key");
    config.missing_geometry = MissingGeometry::ZeroCoordinates;
    let places = FakePlaces::default().with_place("nowhere", None);
    let (engine, _, _) = test_engine(&config, places, FakeDirections::new(1.0, 1.0));

    let state =
        block_on(engine.select_place_by_id(Endpoint::Destination, "nowhere".into())).unwrap();

    assert_eq!(state.destination, Some(Coordinates::zero()));
}

#[test]
fn unknown_place_id_is_invalid_input() {
    use super::test_engine;
    use crate::config::Config;
    use crate::testing::{FakeDirections, FakePlaces};
    use tokio_test::block_on;

    let (engine, _, _) = test_engine(
        &Config::new("key"),
        FakePlaces::default(),
        FakeDirections::new(1.0, 1.0),
    );

    let err = block_on(engine.select_place_by_id(Endpoint::Origin, "missing".into())).unwrap_err();

    assert_eq!(err.code, 101);
}

#[test]
fn suggestions_come_from_the_places_service() {
    use super::test_engine;
    use crate::config::Config;
    use crate::entities::Coordinates;
    use crate::testing::{FakeDirections, FakePlaces};
    use tokio_test::block_on;

    let places = FakePlaces::default()
        .with_place("ikeja", Some(Coordinates::new(6.60, 3.35)))
        .with_place("ikoyi", Some(Coordinates::new(6.45, 3.43)))
        .with_place("yaba", Some(Coordinates::new(6.50, 3.38)));
    let (engine, _, _) = test_engine(&Config::new("key"), places, FakeDirections::new(1.0, 1.0));

    let suggestions = block_on(engine.find_suggestions("ik".into())).unwrap();
    let ids: Vec<_> = suggestions.iter().map(|s| s.place_id.as_str()).collect();

    assert_eq!(ids, vec!["ikeja", "ikoyi"]);
}
