use std::sync::Arc;

use axum::extract::{Extension, Json};

use crate::{
    error::{invalid_state_error, Error},
    map::{MapSnapshot, VirtualMap},
};

pub async fn snapshot(
    Extension(map): Extension<Arc<VirtualMap>>,
) -> Result<Json<MapSnapshot>, Error> {
    let snapshot = map.snapshot().await.ok_or_else(invalid_state_error)?;

    Ok(snapshot.into())
}
