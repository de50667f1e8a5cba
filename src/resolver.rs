use crate::{
    config::MissingGeometry,
    entities::{Coordinates, Place},
    error::{unresolved_place_error, Error},
};

/// Turns a place picked from the autocomplete list into a point on the map.
#[derive(Clone, Copy, Debug)]
pub struct PlaceResolver {
    missing_geometry: MissingGeometry,
}

impl PlaceResolver {
    pub fn new(missing_geometry: MissingGeometry) -> Self {
        Self { missing_geometry }
    }

    #[tracing::instrument(skip(self, place), fields(place_id = %place.place_id))]
    pub fn resolve(&self, place: &Place) -> Result<Coordinates, Error> {
        match (&place.geometry, self.missing_geometry) {
            (Some(geometry), _) => Ok(geometry.location),
            (None, MissingGeometry::ZeroCoordinates) => {
                tracing::warn!("place has no geometry, pinning it at 0,0");
                Ok(Coordinates::zero())
            }
            (None, MissingGeometry::Reject) => Err(unresolved_place_error()),
        }
    }
}

#[cfg(test)]
fn place(geometry: Option<Coordinates>) -> Place {
    use crate::entities::Geometry;

    Place {
        place_id: "ChIJgT_rKAB_PzsRBttnRY6jpz8".into(),
        formatted_address: "Ikeja, Lagos".into(),
        geometry: geometry.map(|location| Geometry { location }),
    }
}

#[test]
fn resolves_exact_location() {
    let resolver = PlaceResolver::new(MissingGeometry::Reject);
    let location = Coordinates::new(6.601838, 3.3514863);

    assert_eq!(resolver.resolve(&place(Some(location))), Ok(location));
}

// Pins unresolved places on the equator; kept behind MISSING_GEOMETRY=zero
// until every deployment has moved to reject.
#[test]
fn zero_policy_pins_missing_geometry_at_origin() {
    let resolver = PlaceResolver::new(MissingGeometry::ZeroCoordinates);

    assert_eq!(resolver.resolve(&place(None)), Ok(Coordinates::new(0.0, 0.0)));
}

#[test]
fn reject_policy_fails_missing_geometry() {
    let resolver = PlaceResolver::new(MissingGeometry::Reject);

    assert_eq!(resolver.resolve(&place(None)).unwrap_err().code, 102);
}
