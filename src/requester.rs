use crate::{
    entities::{Coordinates, Route, RouteMetrics},
    error::Error,
    external::DynDirections,
};

/// Requests a driving route between two selected points.
#[derive(Clone)]
pub struct RouteRequester {
    directions: DynDirections,
}

impl RouteRequester {
    pub fn new(directions: DynDirections) -> Self {
        Self { directions }
    }

    #[tracing::instrument(skip(self))]
    pub async fn request_route(
        &self,
        origin: Coordinates,
        destination: Coordinates,
    ) -> Result<Route, Error> {
        let directions = self.directions.find_directions(origin, destination).await?;

        let metrics = RouteMetrics::new(directions.distance_km, directions.duration_min);

        tracing::info!(
            distance_km = metrics.distance_km,
            duration_min = metrics.duration_min,
            "route ready"
        );

        Ok(Route::new(origin, destination, directions.geometry, metrics))
    }
}

#[test]
fn route_carries_distance_and_duration_separately() {
    use crate::testing::FakeDirections;
    use std::sync::Arc;
    use tokio_test::block_on;

    let directions = Arc::new(FakeDirections::new(12.3, 18.0));
    let requester = RouteRequester::new(directions.clone());

    let origin = Coordinates::new(6.50, 3.38);
    let destination = Coordinates::new(6.45, 3.40);
    let route = block_on(requester.request_route(origin, destination)).unwrap();

    assert_eq!(route.metrics, RouteMetrics::new(12.3, 18.0));
    assert_eq!(route.origin, origin);
    assert_eq!(route.destination, destination);
    assert_eq!(directions.requests(), vec![(origin, destination)]);
}

#[test]
fn service_failure_propagates() {
    use crate::testing::FakeDirections;
    use std::sync::Arc;
    use tokio_test::block_on;

    let requester = RouteRequester::new(Arc::new(FakeDirections::failing()));

    let result = block_on(requester.request_route(
        Coordinates::new(6.50, 3.38),
        Coordinates::new(6.45, 3.40),
    ));

    assert_eq!(result.unwrap_err().code, 4);
}
