//! Coordinate reference system for an image-backed map.
//!
//! The rendering engine works in `(lat, lng)` pairs. Map data is authored in
//! image pixels with `y` growing downward, so the image space simply swaps the
//! pair: `lng` carries `x` and `lat` carries `y`. No axis is flipped.

use serde::{Deserialize, Serialize};

use crate::models::Position;

/// The engine's native coordinate pair.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// Affine map from projected points to layer pixels at scale 1:
/// `(a * x + b, c * y + d)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transformation {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
}

impl Transformation {
    pub const IDENTITY: Transformation = Transformation { a: 1.0, b: 0.0, c: 1.0, d: 0.0 };

    pub fn transform(&self, p: Position, scale: f64) -> Position {
        Position::new(
            scale * (self.a * p.x + self.b),
            scale * (self.c * p.y + self.d),
        )
    }

    pub fn untransform(&self, p: Position, scale: f64) -> Position {
        Position::new(
            (p.x / scale - self.b) / self.a,
            (p.y / scale - self.d) / self.c,
        )
    }
}

pub trait CoordinateSpace {
    fn project(&self, latlng: LatLng) -> Position;

    fn unproject(&self, point: Position) -> LatLng;

    fn transformation(&self) -> Transformation {
        Transformation::IDENTITY
    }

    /// Image pixel to engine coordinate.
    fn to_world(&self, pixel: Position) -> LatLng {
        self.unproject(pixel)
    }

    /// Engine coordinate to image pixel.
    fn to_pixel(&self, world: LatLng) -> Position {
        self.project(world)
    }

    /// Linear scale for a zoom level. Each whole zoom step doubles it.
    fn scale(&self, zoom: f64) -> f64 {
        2f64.powf(zoom)
    }

    fn zoom(&self, scale: f64) -> f64 {
        scale.log2()
    }

    /// Layer pixel for `latlng` at `zoom`.
    fn latlng_to_point(&self, latlng: LatLng, zoom: f64) -> Position {
        self.transformation()
            .transform(self.project(latlng), self.scale(zoom))
    }

    fn point_to_latlng(&self, point: Position, zoom: f64) -> LatLng {
        self.unproject(self.transformation().untransform(point, self.scale(zoom)))
    }
}

/// Image pixels map 1:1 onto engine coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ImagePixelSpace;

impl CoordinateSpace for ImagePixelSpace {
    fn project(&self, latlng: LatLng) -> Position {
        Position::new(latlng.lng, latlng.lat)
    }

    fn unproject(&self, point: Position) -> LatLng {
        LatLng::new(point.y, point.x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLES: [(f64, f64); 5] = [
        (0.0, 0.0),
        (2400.0, 1600.0),
        (1200.5, 17.25),
        (3.0, 1599.0),
        (-64.0, 320.0),
    ];

    #[test]
    fn test_pixel_world_roundtrip() {
        let crs = ImagePixelSpace;
        for (x, y) in SAMPLES {
            let p = Position::new(x, y);
            assert_eq!(crs.to_pixel(crs.to_world(p)), p);
        }
    }

    #[test]
    fn test_world_pixel_roundtrip() {
        let crs = ImagePixelSpace;
        for (lat, lng) in SAMPLES {
            let ll = LatLng::new(lat, lng);
            assert_eq!(crs.to_world(crs.to_pixel(ll)), ll);
        }
    }

    #[test]
    fn test_axes_swap_without_flip() {
        let crs = ImagePixelSpace;
        let ll = crs.to_world(Position::new(100.0, 40.0));
        assert_eq!(ll.lng, 100.0);
        assert_eq!(ll.lat, 40.0);
        // Larger image y stays larger: no inversion.
        let lower = crs.to_world(Position::new(100.0, 900.0));
        assert!(lower.lat > ll.lat);
    }

    #[test]
    fn test_scale_doubles_per_zoom() {
        let crs = ImagePixelSpace;
        assert!((crs.scale(0.0) - 1.0).abs() < 1e-12);
        assert!((crs.scale(1.0) - 2.0).abs() < 1e-12);
        assert!((crs.scale(-1.0) - 0.5).abs() < 1e-12);
        assert!((crs.zoom(crs.scale(2.3)) - 2.3).abs() < 1e-12);
    }

    #[test]
    fn test_point_roundtrip_at_zoom() {
        let crs = ImagePixelSpace;
        for zoom in [-2.0, -0.7, 0.0, 1.3, 5.0] {
            for (x, y) in SAMPLES {
                let ll = crs.to_world(Position::new(x, y));
                let back = crs.point_to_latlng(crs.latlng_to_point(ll, zoom), zoom);
                assert!((back.lat - ll.lat).abs() < 1e-9);
                assert!((back.lng - ll.lng).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn test_latlng_to_point_scales() {
        let crs = ImagePixelSpace;
        let p = crs.latlng_to_point(LatLng::new(50.0, 100.0), 1.0);
        assert!((p.x - 200.0).abs() < 1e-9);
        assert!((p.y - 100.0).abs() < 1e-9);
    }
}
