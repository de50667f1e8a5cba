use serde::{Deserialize, Serialize};

use crate::entities::Coordinates;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub place_id: String,
    #[serde(default)]
    pub formatted_address: String,
    pub geometry: Option<Geometry>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    pub location: Coordinates,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlaceSuggestion {
    pub place_id: String,
    pub description: String,
}

pub type PlaceSuggestions = Vec<PlaceSuggestion>;

/// Which end of the route a selected place fills.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Endpoint {
    Origin,
    Destination,
}

impl Endpoint {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Origin => "From",
            Self::Destination => "To",
        }
    }
}

#[test]
fn place_without_geometry_deserializes() {
    let place: Place =
        serde_json::from_str(r#"{"place_id": "abc", "formatted_address": "Ikeja"}"#).unwrap();

    assert!(place.geometry.is_none());
}
