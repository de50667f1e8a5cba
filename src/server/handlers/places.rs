use axum::extract::{Extension, Json, Query};
use serde::{Deserialize, Serialize};

use crate::{
    api::DynAPI,
    entities::PlaceSuggestions,
    error::{invalid_input_error, Error},
};

#[derive(Serialize, Deserialize)]
pub struct SuggestionParams {
    input: String,
}

pub async fn find_suggestions(
    Extension(api): Extension<DynAPI>,
    Query(params): Query<SuggestionParams>,
) -> Result<Json<PlaceSuggestions>, Error> {
    if params.input.trim().is_empty() {
        return Err(invalid_input_error());
    }

    let suggestions = api.find_suggestions(params.input).await?;

    Ok(suggestions.into())
}
