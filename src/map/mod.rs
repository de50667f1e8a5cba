mod virtual_map;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::{
    entities::{Camera, Coordinates, EdgePadding},
    error::{invalid_input_error, Error},
    view::View,
};

pub use virtual_map::{Animation, Fit, MapSnapshot, VirtualMap};

pub const CAMERA_ANIMATION: Duration = Duration::from_millis(1000);

/// The rendering surface a map controller drives. A surface that has not
/// been mounted yet has no camera.
#[async_trait]
pub trait MapSurface {
    async fn camera(&self) -> Option<Camera>;
    async fn animate_camera(&self, camera: Camera, duration: Duration);
    async fn fit_to_coordinates(&self, points: &[Coordinates], padding: EdgePadding);
    async fn render(&self, view: &View);
}

pub type DynMap = Arc<dyn MapSurface + Send + Sync>;

#[derive(Clone)]
pub struct MapController {
    surface: DynMap,
}

impl MapController {
    pub fn new(surface: DynMap) -> Self {
        Self { surface }
    }

    #[tracing::instrument(skip(self))]
    pub async fn center_on(&self, point: Coordinates) {
        let Some(mut camera) = self.surface.camera().await else {
            tracing::debug!("map not mounted, skipping camera move");
            return;
        };

        camera.center = point;
        self.surface.animate_camera(camera, CAMERA_ANIMATION).await;
    }

    #[tracing::instrument(skip(self))]
    pub async fn fit_to_points(
        &self,
        points: &[Coordinates],
        padding: EdgePadding,
    ) -> Result<(), Error> {
        if points.len() < 2 {
            return Err(invalid_input_error());
        }

        if self.surface.camera().await.is_none() {
            tracing::debug!("map not mounted, skipping fit");
            return Ok(());
        }

        self.surface.fit_to_coordinates(points, padding).await;

        Ok(())
    }

    pub async fn render(&self, view: &View) {
        self.surface.render(view).await;
    }
}

#[test]
fn center_on_moves_only_the_center() {
    use crate::entities::Viewport;
    use tokio_test::block_on;

    let viewport = Viewport {
        width: 400.0,
        height: 800.0,
    };
    let map = Arc::new(VirtualMap::mounted(viewport));
    let controller = MapController::new(map.clone());

    let point = Coordinates::new(6.45, 3.40);
    block_on(controller.center_on(point));

    let snapshot = block_on(map.snapshot()).unwrap();
    let initial = Camera::initial(viewport);
    assert_eq!(snapshot.camera.center, point);
    assert_eq!(snapshot.camera.latitude_delta, initial.latitude_delta);
    assert_eq!(snapshot.camera.longitude_delta, initial.longitude_delta);

    let animation = snapshot.last_animation.unwrap();
    assert_eq!(animation.duration_ms, 1000);
}

#[test]
fn unmounted_map_ignores_camera_moves() {
    use tokio_test::block_on;

    let map = Arc::new(VirtualMap::new());
    let controller = MapController::new(map.clone());

    block_on(controller.center_on(Coordinates::new(6.45, 3.40)));
    let fitted = block_on(controller.fit_to_points(
        &[Coordinates::new(6.50, 3.38), Coordinates::new(6.45, 3.40)],
        EdgePadding::default(),
    ));

    assert!(fitted.is_ok());
    assert!(block_on(map.snapshot()).is_none());
}

#[test]
fn fit_needs_two_points() {
    use crate::entities::Viewport;
    use tokio_test::block_on;

    let map = Arc::new(VirtualMap::mounted(Viewport {
        width: 400.0,
        height: 800.0,
    }));
    let controller = MapController::new(map.clone());

    let result = block_on(controller.fit_to_points(
        &[Coordinates::new(6.50, 3.38)],
        EdgePadding::default(),
    ));

    assert_eq!(result.unwrap_err().code, 101);
    assert!(block_on(map.snapshot()).unwrap().last_fit.is_none());
}
