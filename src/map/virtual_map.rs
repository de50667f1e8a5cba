use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use super::MapSurface;
use crate::{
    entities::{Camera, Coordinates, EdgePadding, Viewport},
    view::View,
};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Animation {
    pub camera: Camera,
    pub duration_ms: u64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Fit {
    pub points: Vec<Coordinates>,
    pub padding: EdgePadding,
}

/// What the map currently shows.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MapSnapshot {
    pub viewport: Viewport,
    pub camera: Camera,
    pub last_animation: Option<Animation>,
    pub last_fit: Option<Fit>,
    pub view: Option<View>,
}

/// Headless map surface kept in memory.
#[derive(Debug, Default)]
pub struct VirtualMap {
    canvas: Mutex<Option<MapSnapshot>>,
}

impl VirtualMap {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn mounted(viewport: Viewport) -> Self {
        Self {
            canvas: Mutex::new(Some(blank(viewport))),
        }
    }

    #[tracing::instrument(skip(self))]
    pub async fn mount(&self, viewport: Viewport) {
        let mut canvas = self.canvas.lock().await;

        if canvas.is_none() {
            *canvas = Some(blank(viewport));
        }
    }

    pub async fn snapshot(&self) -> Option<MapSnapshot> {
        self.canvas.lock().await.clone()
    }
}

fn blank(viewport: Viewport) -> MapSnapshot {
    MapSnapshot {
        viewport,
        camera: Camera::initial(viewport),
        last_animation: None,
        last_fit: None,
        view: None,
    }
}

#[async_trait]
impl MapSurface for VirtualMap {
    async fn camera(&self) -> Option<Camera> {
        self.canvas.lock().await.as_ref().map(|canvas| canvas.camera)
    }

    async fn animate_camera(&self, camera: Camera, duration: Duration) {
        if let Some(canvas) = self.canvas.lock().await.as_mut() {
            canvas.camera = camera;
            canvas.last_animation = Some(Animation {
                camera,
                duration_ms: duration.as_millis() as u64,
            });
        }
    }

    async fn fit_to_coordinates(&self, points: &[Coordinates], padding: EdgePadding) {
        if let Some(canvas) = self.canvas.lock().await.as_mut() {
            if let Some(camera) = Camera::fit(points, padding, canvas.viewport) {
                canvas.camera = camera;
                canvas.last_fit = Some(Fit {
                    points: points.to_vec(),
                    padding,
                });
            }
        }
    }

    async fn render(&self, view: &View) {
        if let Some(canvas) = self.canvas.lock().await.as_mut() {
            canvas.view = Some(view.clone());
        }
    }
}

#[test]
fn mount_starts_at_initial_region() {
    use tokio_test::block_on;

    let map = VirtualMap::new();
    assert!(block_on(map.camera()).is_none());

    let viewport = Viewport {
        width: 390.0,
        height: 844.0,
    };
    block_on(map.mount(viewport));

    assert_eq!(block_on(map.camera()), Some(Camera::initial(viewport)));
}

#[test]
fn fit_records_points_and_padding() {
    use tokio_test::block_on;

    let map = VirtualMap::mounted(Viewport {
        width: 400.0,
        height: 800.0,
    });
    let points = [Coordinates::new(6.50, 3.38), Coordinates::new(6.45, 3.40)];

    block_on(map.fit_to_coordinates(&points, EdgePadding::uniform(100.0)));

    let snapshot = block_on(map.snapshot()).unwrap();
    assert!(points.iter().all(|point| snapshot.camera.contains(point)));
    assert_eq!(
        snapshot.last_fit,
        Some(Fit {
            points: points.to_vec(),
            padding: EdgePadding::uniform(100.0),
        })
    );
}
