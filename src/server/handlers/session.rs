use axum::extract::{Extension, Json};
use serde::{Deserialize, Serialize};

use crate::{
    api::DynAPI,
    entities::Endpoint,
    error::Error,
    view::View,
};

#[derive(Serialize, Deserialize)]
pub struct SelectParams {
    place_id: String,
}

pub async fn find(Extension(api): Extension<DynAPI>) -> Json<View> {
    api.view().into()
}

pub async fn select_origin(
    Extension(api): Extension<DynAPI>,
    Json(params): Json<SelectParams>,
) -> Result<Json<View>, Error> {
    select(api, Endpoint::Origin, params.place_id).await
}

pub async fn select_destination(
    Extension(api): Extension<DynAPI>,
    Json(params): Json<SelectParams>,
) -> Result<Json<View>, Error> {
    select(api, Endpoint::Destination, params.place_id).await
}

async fn select(api: DynAPI, endpoint: Endpoint, place_id: String) -> Result<Json<View>, Error> {
    let state = api.select_place_by_id(endpoint, place_id).await?;

    Ok(View::from(&state).into())
}

pub async fn track(Extension(api): Extension<DynAPI>) -> Result<Json<View>, Error> {
    let state = api.track().await?;

    Ok(View::from(&state).into())
}

#[test]
fn selecting_both_ends_then_tracking() {
    use crate::config::Config;
    use crate::engine::Engine;
    use crate::entities::{Coordinates, Status};
    use crate::map::VirtualMap;
    use crate::testing::{FakeDirections, FakePlaces};
    use std::sync::Arc;
    use tokio_test::block_on;

    let places = FakePlaces::default()
        .with_place("origin", Some(Coordinates::new(6.50, 3.38)))
        .with_place("destination", Some(Coordinates::new(6.45, 3.40)));
    let engine = Engine::new(
        &Config::new("key"),
        Arc::new(places),
        Arc::new(FakeDirections::new(12.3, 18.0)),
        Arc::new(VirtualMap::new()),
    );
    let api = Arc::new(engine) as DynAPI;

    let view = block_on(async {
        select_origin(
            Extension(api.clone()),
            Json(SelectParams {
                place_id: "origin".into(),
            }),
        )
        .await
        .unwrap();
        select_destination(
            Extension(api.clone()),
            Json(SelectParams {
                place_id: "destination".into(),
            }),
        )
        .await
        .unwrap();

        let Json(view) = track(Extension(api.clone())).await.unwrap();
        view
    });

    assert_eq!(view.status, Status::RouteShown);
    assert_eq!(view.markers.len(), 2);
    assert!(view.loading);
}
