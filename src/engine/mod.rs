mod place_api;
mod route_api;

use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;

use crate::{
    api::{SessionAPI, API},
    config::Config,
    entities::{EdgePadding, SelectionState},
    external::{DynDirections, DynPlaces},
    map::{DynMap, MapController},
    requester::RouteRequester,
    resolver::PlaceResolver,
    store::Store,
    view::View,
};

/// Coordinates one tracking session: place selections, camera moves and
/// route requests all go through here.
pub struct Engine {
    places: DynPlaces,
    resolver: PlaceResolver,
    requester: RouteRequester,
    map: MapController,
    store: Store,
    padding: EdgePadding,
    in_flight: Mutex<Option<JoinHandle<()>>>,
}

impl Engine {
    #[tracing::instrument(name = "Engine::new", skip_all)]
    pub fn new(config: &Config, places: DynPlaces, directions: DynDirections, map: DynMap) -> Self {
        Self {
            places,
            resolver: PlaceResolver::new(config.missing_geometry),
            requester: RouteRequester::new(directions),
            map: MapController::new(map),
            store: Store::new(),
            padding: EdgePadding::uniform(config.edge_padding),
            in_flight: Mutex::new(None),
        }
    }

    /// Pushes a fresh view to the map every time the selection changes.
    pub fn spawn_renderer(&self) -> JoinHandle<()> {
        let mut rx = self.store.subscribe();
        let map = self.map.clone();

        tokio::spawn(async move {
            loop {
                let view = View::from(&*rx.borrow_and_update());
                map.render(&view).await;

                if rx.changed().await.is_err() {
                    tracing::debug!("store dropped, renderer stopping");
                    break;
                }
            }
        })
    }
}

impl SessionAPI for Engine {
    fn session(&self) -> SelectionState {
        self.store.state()
    }

    fn view(&self) -> View {
        View::from(&self.store.state())
    }

    fn subscribe(&self) -> watch::Receiver<SelectionState> {
        self.store.subscribe()
    }
}

impl API for Engine {}

#[cfg(test)]
pub(crate) fn test_engine(
    config: &Config,
    places: crate::testing::FakePlaces,
    directions: crate::testing::FakeDirections,
) -> (
    Engine,
    std::sync::Arc<crate::testing::FakeDirections>,
    std::sync::Arc<crate::map::VirtualMap>,
) {
    use crate::entities::Viewport;
    use crate::map::VirtualMap;
    use std::sync::Arc;

    let directions = Arc::new(directions);
    let map = Arc::new(VirtualMap::mounted(Viewport {
        width: 400.0,
        height: 800.0,
    }));
    let engine = Engine::new(config, Arc::new(places), directions.clone(), map.clone());

    (engine, directions, map)
}

#[cfg(test)]
pub(crate) async fn settled(engine: &Engine) -> SelectionState {
    use std::time::Duration;

    let mut rx = engine.subscribe();
    let state = tokio::time::timeout(
        Duration::from_secs(5),
        rx.wait_for(|state| state.pending_request.is_none()),
    )
    .await
    .unwrap()
    .unwrap()
    .clone();

    state
}

#[test]
fn renderer_draws_markers_on_the_map() {
    use crate::api::PlaceAPI;
    use crate::entities::{Coordinates, Endpoint};
    use crate::testing::{FakeDirections, FakePlaces};
    use std::time::Duration;
    use tokio_test::block_on;

    let places = FakePlaces::default().with_place("ikeja", Some(Coordinates::new(6.60, 3.35)));
    let (engine, _, map) = test_engine(&Config::new("key"), places, FakeDirections::new(1.0, 1.0));

    block_on(async {
        let renderer = engine.spawn_renderer();
        engine
            .select_place_by_id(Endpoint::Origin, "ikeja".into())
            .await
            .unwrap();

        let mut rendered = None;
        for _ in 0..50 {
            tokio::task::yield_now().await;
            rendered = map.snapshot().await.and_then(|snapshot| snapshot.view);
            if rendered.as_ref().map_or(false, |view| !view.markers.is_empty()) {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }

        let view = rendered.unwrap();
        assert_eq!(view.markers.len(), 1);
        assert_eq!(view.markers[0].coordinates, Coordinates::new(6.60, 3.35));

        renderer.abort();
    });
}
