use geo_types::{coord, Rect};
use serde::{Deserialize, Serialize};

use crate::entities::Coordinates;

pub const INITIAL_CENTER: Coordinates = Coordinates {
    latitude: 6.5166,
    longitude: 3.38479,
};
pub const INITIAL_LATITUDE_DELTA: f64 = 0.02;
pub const MIN_DELTA: f64 = 0.0001;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn aspect_ratio(&self) -> f64 {
        self.width / self.height
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EdgePadding {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl EdgePadding {
    pub fn uniform(value: f64) -> Self {
        Self {
            top: value,
            right: value,
            bottom: value,
            left: value,
        }
    }
}

impl Default for EdgePadding {
    fn default() -> Self {
        Self::uniform(100.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub center: Coordinates,
    pub latitude_delta: f64,
    pub longitude_delta: f64,
}

impl Camera {
    /// The region shown before anything is selected.
    pub fn initial(viewport: Viewport) -> Self {
        Self {
            center: INITIAL_CENTER,
            latitude_delta: INITIAL_LATITUDE_DELTA,
            longitude_delta: INITIAL_LATITUDE_DELTA * viewport.aspect_ratio(),
        }
    }

    /// Computes the camera whose region contains every point once the
    /// padding has been reserved along each edge of the viewport.
    pub fn fit(points: &[Coordinates], padding: EdgePadding, viewport: Viewport) -> Option<Self> {
        let bounds = bounding_rect(points)?;

        let usable_width = (viewport.width - padding.left - padding.right).max(1.0);
        let usable_height = (viewport.height - padding.top - padding.bottom).max(1.0);

        let longitude_delta = bounds.width().max(MIN_DELTA) * viewport.width / usable_width;
        let latitude_delta = bounds.height().max(MIN_DELTA) * viewport.height / usable_height;

        // shift the centre so asymmetric padding keeps the points inside the usable area
        let center = bounds.center();
        let lng_shift = (padding.right - padding.left) / 2.0 * longitude_delta / viewport.width;
        let lat_shift = (padding.top - padding.bottom) / 2.0 * latitude_delta / viewport.height;

        Some(Self {
            center: Coordinates::new(center.y + lat_shift, center.x + lng_shift),
            latitude_delta,
            longitude_delta,
        })
    }

    pub fn contains(&self, point: &Coordinates) -> bool {
        (point.latitude - self.center.latitude).abs() <= self.latitude_delta / 2.0
            && (point.longitude - self.center.longitude).abs() <= self.longitude_delta / 2.0
    }
}

fn bounding_rect(points: &[Coordinates]) -> Option<Rect<f64>> {
    let (first, rest) = points.split_first()?;

    let start = coord! { x: first.longitude, y: first.latitude };

    let rect = rest.iter().fold(Rect::new(start, start), |rect, point| {
        let (min, max) = (rect.min(), rect.max());

        Rect::new(
            coord! { x: min.x.min(point.longitude), y: min.y.min(point.latitude) },
            coord! { x: max.x.max(point.longitude), y: max.y.max(point.latitude) },
        )
    });

    Some(rect)
}

#[test]
fn initial_region_follows_aspect_ratio() {
    let camera = Camera::initial(Viewport {
        width: 400.0,
        height: 800.0,
    });

    assert_eq!(camera.center, INITIAL_CENTER);
    assert_eq!(camera.latitude_delta, 0.02);
    assert!((camera.longitude_delta - 0.01).abs() < 1e-12);
}

#[test]
fn fit_bounds_points_with_padding() {
    let viewport = Viewport {
        width: 400.0,
        height: 800.0,
    };
    let origin = Coordinates::new(6.50, 3.38);
    let destination = Coordinates::new(6.45, 3.40);

    let camera = Camera::fit(&[origin, destination], EdgePadding::default(), viewport).unwrap();

    assert!((camera.center.latitude - 6.475).abs() < 1e-9);
    assert!((camera.center.longitude - 3.39).abs() < 1e-9);
    // 0.05 degrees of latitude across 600 of 800 units
    assert!((camera.latitude_delta - 0.05 * 800.0 / 600.0).abs() < 1e-9);
    // 0.02 degrees of longitude across 200 of 400 units
    assert!((camera.longitude_delta - 0.04).abs() < 1e-9);
    assert!(camera.contains(&origin));
    assert!(camera.contains(&destination));
}

#[test]
fn fit_of_identical_points_uses_minimum_delta() {
    let point = Coordinates::new(6.5, 3.38);
    let viewport = Viewport {
        width: 400.0,
        height: 400.0,
    };

    let camera = Camera::fit(&[point, point], EdgePadding::uniform(0.0), viewport).unwrap();

    assert_eq!(camera.center, point);
    assert_eq!(camera.latitude_delta, MIN_DELTA);
    assert_eq!(camera.longitude_delta, MIN_DELTA);
}

#[test]
fn fit_of_nothing_is_none() {
    let viewport = Viewport {
        width: 400.0,
        height: 400.0,
    };

    assert!(Camera::fit(&[], EdgePadding::default(), viewport).is_none());
}
