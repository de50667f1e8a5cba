mod handlers;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::Extension,
    routing::{get, post},
    Router,
};

use crate::api::{DynAPI, API};
use crate::error::{unexpected_error, Error};
use crate::map::VirtualMap;
use crate::server::handlers::{map, places, session};

pub fn router(api: DynAPI, virtual_map: Arc<VirtualMap>) -> Router {
    Router::new()
        .route("/places/suggestions", get(places::find_suggestions))
        .route("/session", get(session::find))
        .route("/session/origin", post(session::select_origin))
        .route("/session/destination", post(session::select_destination))
        .route("/session/track", post(session::track))
        .route("/map", get(map::snapshot))
        .layer(Extension(api))
        .layer(Extension(virtual_map))
}

pub async fn serve<T: API + Sync + Send + 'static>(
    api: T,
    virtual_map: Arc<VirtualMap>,
    addr: SocketAddr,
) -> Result<(), Error> {
    let api = Arc::new(api) as DynAPI;
    let app = router(api, virtual_map);

    tracing::info!("listening on {}", addr);

    axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .await
        .map_err(|err| {
            tracing::error!("server stopped: {}", err);
            unexpected_error()
        })
}
