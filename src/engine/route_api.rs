use super::Engine;

use async_trait::async_trait;
use tracing::Instrument;
use uuid::Uuid;

use crate::{
    api::RouteAPI,
    entities::{Action, SelectionState},
    error::{invalid_state_error, Error},
};

#[async_trait]
impl RouteAPI for Engine {
    #[tracing::instrument(skip(self))]
    async fn track(&self) -> Result<SelectionState, Error> {
        let (origin, destination) = self
            .store
            .state()
            .endpoints()
            .ok_or_else(invalid_state_error)?;

        self.map
            .fit_to_points(&[origin, destination], self.padding)
            .await?;

        // held until the new task is recorded, so the pending id in the store
        // always belongs to the task that is still running
        let mut in_flight = self.in_flight.lock().await;

        let request_id = Uuid::new_v4();
        let state = self.store.dispatch(Action::TrackRequested { request_id })?;

        if let Some(previous) = in_flight.take() {
            previous.abort();
        }

        let requester = self.requester.clone();
        let store = self.store.clone();

        let request = async move {
            let action = match requester.request_route(origin, destination).await {
                Ok(route) => Action::RouteCompleted { request_id, route },
                Err(err) => {
                    tracing::warn!("route request failed: {}", err);
                    Action::RouteFailed {
                        request_id,
                        message: err.message,
                    }
                }
            };

            if let Err(err) = store.dispatch(action) {
                tracing::error!("could not record route result: {}", err);
            }
        };

        *in_flight = Some(tokio::spawn(
            request.instrument(tracing::info_span!("route_request", %request_id)),
        ));

        Ok(state)
    }
}

#[cfg(test)]
fn lagos_engine(
    directions: crate::testing::FakeDirections,
) -> (
    Engine,
    std::sync::Arc<crate::testing::FakeDirections>,
    std::sync::Arc<crate::map::VirtualMap>,
) {
    use crate::config::Config;
    use crate::entities::Coordinates;
    use crate::testing::FakePlaces;

    let places = FakePlaces::default()
        .with_place("origin", Some(Coordinates::new(6.50, 3.38)))
        .with_place("destination", Some(Coordinates::new(6.45, 3.40)));

    super::test_engine(&Config::new("key"), places, directions)
}

#[cfg(test)]
async fn select_both(engine: &Engine) {
    use crate::api::PlaceAPI;
    use crate::entities::Endpoint;

    engine
        .select_place_by_id(Endpoint::Origin, "origin".into())
        .await
        .unwrap();
    engine
        .select_place_by_id(Endpoint::Destination, "destination".into())
        .await
        .unwrap();
}

#[test]
fn track_fits_camera_and_requests_route() {
    use super::settled;
    use crate::entities::{Coordinates, EdgePadding, Status};
    use crate::testing::FakeDirections;
    use tokio_test::block_on;

    let (engine, directions, map) = lagos_engine(FakeDirections::new(12.3, 18.0));
    let origin = Coordinates::new(6.50, 3.38);
    let destination = Coordinates::new(6.45, 3.40);

    block_on(async {
        select_both(&engine).await;

        let state = engine.track().await.unwrap();
        assert_eq!(state.status(), Status::RouteShown);

        let state = settled(&engine).await;
        assert_eq!(state.status(), Status::RouteShown);
        let route = state.route.unwrap();
        assert!(route.connects(&origin, &destination));
    });

    let snapshot = block_on(map.snapshot()).unwrap();
    let fit = snapshot.last_fit.unwrap();
    assert_eq!(fit.points, vec![origin, destination]);
    assert_eq!(fit.padding, EdgePadding::uniform(100.0));
    assert!(snapshot.camera.contains(&origin));
    assert!(snapshot.camera.contains(&destination));

    assert_eq!(directions.requests(), vec![(origin, destination)]);
}

#[test]
fn readout_keeps_distance_and_duration_apart() {
    use super::settled;
    use crate::api::SessionAPI;
    use crate::testing::FakeDirections;
    use tokio_test::block_on;

    let (engine, _, _) = lagos_engine(FakeDirections::new(12.3, 18.0));

    block_on(async {
        select_both(&engine).await;
        engine.track().await.unwrap();
        settled(&engine).await;
    });

    let view = engine.view();
    assert_eq!(view.distance.as_deref(), Some("12.30 km"));
    assert_eq!(view.duration.as_deref(), Some("18 mins"));
}

#[test]
fn track_without_destination_is_rejected() {
    use crate::api::PlaceAPI;
    use crate::entities::Endpoint;
    use crate::testing::FakeDirections;
    use tokio_test::block_on;

    let (engine, directions, map) = lagos_engine(FakeDirections::new(12.3, 18.0));

    let err = block_on(async {
        engine
            .select_place_by_id(Endpoint::Origin, "origin".into())
            .await
            .unwrap();
        engine.track().await.unwrap_err()
    });

    assert_eq!(err.code, 100);
    assert!(directions.requests().is_empty());
    assert!(block_on(map.snapshot()).unwrap().last_fit.is_none());
}

#[test]
fn repeated_selection_does_not_request_a_route() {
    use crate::api::{PlaceAPI, SessionAPI};
    use crate::entities::Endpoint;
    use crate::testing::FakeDirections;
    use tokio_test::block_on;

    let (engine, directions, _) = lagos_engine(FakeDirections::new(12.3, 18.0));

    block_on(async {
        let first = engine
            .select_place_by_id(Endpoint::Origin, "origin".into())
            .await
            .unwrap();

        let mut rx = engine.subscribe();
        rx.borrow_and_update();

        let second = engine
            .select_place_by_id(Endpoint::Origin, "origin".into())
            .await
            .unwrap();

        assert_eq!(first, second);
        assert!(!rx.has_changed().unwrap());
    });

    assert!(directions.requests().is_empty());
}

#[test]
fn latest_track_wins() {
    use super::settled;
    use crate::entities::RouteMetrics;
    use crate::testing::FakeDirections;
    use std::time::Duration;
    use tokio_test::block_on;

    let directions = FakeDirections::sequence(
        vec![(99.0, 99.0), (12.3, 18.0)],
        vec![Duration::from_millis(200), Duration::ZERO],
    );
    let (engine, directions, _) = lagos_engine(directions);

    let state = block_on(async {
        select_both(&engine).await;

        engine.track().await.unwrap();
        while directions.requests().is_empty() {
            tokio::task::yield_now().await;
        }
        engine.track().await.unwrap();

        settled(&engine).await;
        tokio::time::sleep(Duration::from_millis(300)).await;

        engine.store.state()
    });

    assert_eq!(directions.requests().len(), 2);
    assert_eq!(state.metrics, Some(RouteMetrics::new(12.3, 18.0)));
}

#[test]
fn concurrent_tracks_settle_on_one_route() {
    use super::settled;
    use crate::entities::RouteMetrics;
    use crate::testing::FakeDirections;
    use std::sync::Arc;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(4)
        .enable_all()
        .build()
        .unwrap();

    runtime.block_on(async {
        for _ in 0..50 {
            let (engine, _, _) = lagos_engine(FakeDirections::new(12.3, 18.0));
            let engine = Arc::new(engine);
            select_both(&engine).await;

            let presses: Vec<_> = (0..4)
                .map(|_| {
                    let engine = engine.clone();
                    tokio::spawn(async move { engine.track().await })
                })
                .collect();
            for press in presses {
                press.await.unwrap().unwrap();
            }

            let state = settled(&engine).await;
            assert!(state.pending_request.is_none());
            assert_eq!(state.metrics, Some(RouteMetrics::new(12.3, 18.0)));
        }
    });
}

#[test]
fn failed_route_is_shown_to_the_user() {
    use super::settled;
    use crate::api::SessionAPI;
    use crate::entities::Status;
    use crate::testing::FakeDirections;
    use tokio_test::block_on;

    let (engine, _, _) = lagos_engine(FakeDirections::failing());

    block_on(async {
        select_both(&engine).await;
        engine.track().await.unwrap();
        settled(&engine).await;
    });

    let view = engine.view();
    assert_eq!(view.status, Status::RouteFailed);
    assert_eq!(view.error.as_deref(), Some("upstream error"));
    assert!(view.route.is_none());
    assert!(view.distance.is_none());
}

#[test]
fn new_selection_keeps_route_until_next_track() {
    use super::settled;
    use crate::api::{PlaceAPI, SessionAPI};
    use crate::entities::{Coordinates, Endpoint, Geometry, Place, Status};
    use crate::testing::FakeDirections;
    use tokio_test::block_on;

    let (engine, _, _) = lagos_engine(FakeDirections::new(12.3, 18.0));

    block_on(async {
        select_both(&engine).await;
        engine.track().await.unwrap();
        settled(&engine).await;

        engine
            .select_place(
                Endpoint::Destination,
                Place {
                    place_id: "lekki".into(),
                    formatted_address: "Lekki".into(),
                    geometry: Some(Geometry {
                        location: Coordinates::new(6.44, 3.47),
                    }),
                },
            )
            .await
            .unwrap();
    });

    let view = engine.view();
    assert_eq!(view.status, Status::RouteShown);
    assert!(view.route.unwrap().stale);
    assert_eq!(view.distance.as_deref(), Some("12.30 km"));
}
