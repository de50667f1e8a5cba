use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{
    config::Config,
    entities::{Coordinates, Place, PlaceSuggestions},
    error::{invalid_input_error, no_route_error, upstream_error, Error},
    external::{Directions, DirectionsService, PlacesService},
};

const POLYLINE_PRECISION: u32 = 5;

#[derive(Clone, Debug, Serialize, Deserialize)]
struct Response<T> {
    status: String,
    result: Option<T>,
    predictions: Option<T>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct DirectionsResponse {
    status: String,
    #[serde(default)]
    routes: Vec<DirectionsRoute>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct DirectionsRoute {
    overview_polyline: EncodedPolyline,
    legs: Vec<Leg>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct EncodedPolyline {
    points: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct Leg {
    distance: TextValue,
    duration: TextValue,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct TextValue {
    value: f64,
}

/// Client for the Places and Directions web services.
#[derive(Clone)]
pub struct GoogleMaps {
    client: reqwest::Client,
    api_base: String,
    key: String,
    language: String,
}

impl std::fmt::Debug for GoogleMaps {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoogleMaps")
            .field("api_base", &self.api_base)
            .field("language", &self.language)
            .finish()
    }
}

impl GoogleMaps {
    pub fn new(config: &Config) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_base: config.api_base.clone(),
            key: config.api_key.clone(),
            language: config.language.clone(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("https://{}/maps/api/{}/json", self.api_base, path)
    }
}

fn check_status(status_code: u16) -> Result<(), Error> {
    if (400..500).contains(&status_code) {
        return Err(invalid_input_error());
    } else if status_code != 200 {
        return Err(upstream_error());
    }

    Ok(())
}

#[async_trait]
impl PlacesService for GoogleMaps {
    #[tracing::instrument(skip(self))]
    async fn find_place_suggestions(&self, input: String) -> Result<PlaceSuggestions, Error> {
        let res = self
            .client
            .get(self.url("place/autocomplete"))
            .query(&[("key", &self.key)])
            .query(&[("input", &input)])
            .query(&[("language", &self.language)])
            .send()
            .await?;

        check_status(res.status().as_u16())?;

        let data: Response<PlaceSuggestions> = res.json().await?;

        if data.status == "ZERO_RESULTS" {
            return Ok(Vec::new());
        }
        if data.status != "OK" {
            tracing::warn!("autocomplete returned status {}", data.status);
            return Err(upstream_error());
        }

        data.predictions.ok_or_else(upstream_error)
    }

    #[tracing::instrument(skip(self))]
    async fn find_place(&self, place_id: String) -> Result<Place, Error> {
        let res = self
            .client
            .get(self.url("place/details"))
            .query(&[("key", &self.key)])
            .query(&[("place_id", &place_id)])
            .query(&[("language", &self.language)])
            .query(&[("fields", "place_id,geometry,formatted_address")])
            .send()
            .await?;

        check_status(res.status().as_u16())?;

        let data: Response<Place> = res.json().await?;

        if data.status != "OK" {
            tracing::warn!("place details returned status {}", data.status);
            return Err(upstream_error());
        }

        data.result.ok_or_else(upstream_error)
    }
}

#[async_trait]
impl DirectionsService for GoogleMaps {
    #[tracing::instrument(skip(self))]
    async fn find_directions(
        &self,
        origin: Coordinates,
        destination: Coordinates,
    ) -> Result<Directions, Error> {
        let origin: String = origin.into();
        let destination: String = destination.into();

        let res = self
            .client
            .get(self.url("directions"))
            .query(&[("key", &self.key)])
            .query(&[("origin", &origin)])
            .query(&[("destination", &destination)])
            .query(&[("mode", "driving")])
            .send()
            .await?;

        check_status(res.status().as_u16())?;

        let data: DirectionsResponse = res.json().await?;

        data.into_directions()
    }
}

impl DirectionsResponse {
    fn into_directions(self) -> Result<Directions, Error> {
        match self.status.as_str() {
            "OK" => {}
            "ZERO_RESULTS" | "NOT_FOUND" => return Err(no_route_error()),
            other => {
                tracing::warn!("directions returned status {}", other);
                return Err(upstream_error());
            }
        }

        let route = self.routes.into_iter().next().ok_or_else(no_route_error)?;

        let geometry = polyline::decode_polyline(&route.overview_polyline.points, POLYLINE_PRECISION)
            .map_err(|err| {
                tracing::warn!("undecodable overview polyline: {}", err);
                upstream_error()
            })?;

        // metres and seconds, summed over every leg
        let distance: f64 = route.legs.iter().map(|leg| leg.distance.value).sum();
        let duration: f64 = route.legs.iter().map(|leg| leg.duration.value).sum();

        Ok(Directions {
            geometry,
            distance_km: distance / 1000.0,
            duration_min: duration / 60.0,
        })
    }
}

#[cfg(test)]
fn directions_fixture(status: &str) -> DirectionsResponse {
    serde_json::from_value(serde_json::json!({
        "status": status,
        "routes": [{
            "overview_polyline": { "points": "_p~iF~ps|U_ulLnnqC_mqNvxq`@" },
            "legs": [
                {
                    "distance": { "text": "8.0 km", "value": 8000 },
                    "duration": { "text": "11 mins", "value": 660 }
                },
                {
                    "distance": { "text": "4.3 km", "value": 4300 },
                    "duration": { "text": "7 mins", "value": 420 }
                }
            ]
        }]
    }))
    .unwrap()
}

#[test]
fn directions_sum_legs_without_mixing_fields() {
    let directions = directions_fixture("OK").into_directions().unwrap();

    assert!((directions.distance_km - 12.3).abs() < 1e-9);
    assert!((directions.duration_min - 18.0).abs() < 1e-9);
}

#[test]
fn directions_decode_overview_polyline() {
    let directions = directions_fixture("OK").into_directions().unwrap();
    let path: Vec<Coordinates> = directions
        .geometry
        .coords()
        .map(|coord| (*coord).into())
        .collect();

    assert_eq!(path.len(), 3);
    assert!((path[0].latitude - 38.5).abs() < 1e-9);
    assert!((path[0].longitude + 120.2).abs() < 1e-9);
}

#[test]
fn directions_without_route_is_no_route_error() {
    let response: DirectionsResponse =
        serde_json::from_str(r#"{"status": "ZERO_RESULTS", "routes": []}"#).unwrap();

    assert_eq!(response.into_directions().unwrap_err().code, 103);
}

#[test]
fn directions_denied_is_upstream_error() {
    let err = directions_fixture("REQUEST_DENIED").into_directions().unwrap_err();

    assert_eq!(err.code, 4);
}

#[test]
fn client_errors_are_invalid_input() {
    assert_eq!(check_status(403).unwrap_err().code, 101);
    assert_eq!(check_status(502).unwrap_err().code, 4);
    assert!(check_status(200).is_ok());
}

#[test]
fn details_response_parses_geometry() {
    let data: Response<Place> = serde_json::from_value(serde_json::json!({
        "status": "OK",
        "result": {
            "place_id": "ChIJgT_rKAB_PzsRBttnRY6jpz8",
            "formatted_address": "Ikeja, Lagos, Nigeria",
            "geometry": { "location": { "lat": 6.601838, "lng": 3.3514863 } }
        }
    }))
    .unwrap();

    let place = data.result.unwrap();
    assert_eq!(
        place.geometry.map(|geometry| geometry.location),
        Some(Coordinates::new(6.601838, 3.3514863))
    );
}
