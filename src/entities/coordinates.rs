use geo_types::Coord;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    #[serde(alias = "lat")]
    pub latitude: f64,
    #[serde(alias = "lng")]
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// The `{0, 0}` point used when a place has no geometry and the
    /// zero-coordinates fallback is enabled.
    pub fn zero() -> Self {
        Self::new(0.0, 0.0)
    }
}

impl From<Coordinates> for String {
    fn from(coordinates: Coordinates) -> Self {
        format!("{},{}", coordinates.latitude, coordinates.longitude)
    }
}

// geo-types stores points as x = longitude, y = latitude
impl From<Coord<f64>> for Coordinates {
    fn from(coord: Coord<f64>) -> Self {
        Self::new(coord.y, coord.x)
    }
}

impl From<Coordinates> for Coord<f64> {
    fn from(coordinates: Coordinates) -> Self {
        Coord {
            x: coordinates.longitude,
            y: coordinates.latitude,
        }
    }
}

#[test]
fn deserializes_places_geometry() {
    let coordinates: Coordinates =
        serde_json::from_str(r#"{"lat": 6.5244, "lng": 3.3792}"#).unwrap();

    assert_eq!(coordinates, Coordinates::new(6.5244, 3.3792));
}

#[test]
fn formats_as_query_parameter() {
    let value: String = Coordinates::new(6.5, 3.38).into();
    assert_eq!(value, "6.5,3.38");
}
