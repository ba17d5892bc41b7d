use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::config::MapOptions;
use crate::error::DataLoadError;

/// A point in world-pixel space (the space the map image is authored in).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Nearest whole pixel, as shown in the coordinate readout.
    pub fn rounded(self) -> (i64, i64) {
        (self.x.round() as i64, self.y.round() as i64)
    }
}

/// Width and height in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Both sides finite and strictly positive.
    pub fn is_usable(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

/// Rectangle in world-pixel units covering the source image.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorldBounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl WorldBounds {
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn center(&self) -> Position {
        Position::new(
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    pub fn contains(&self, p: Position) -> bool {
        p.x >= self.min_x && p.x <= self.max_x && p.y >= self.min_y && p.y <= self.max_y
    }

    fn validate(&self) -> Result<(), DataLoadError> {
        let finite = [self.min_x, self.min_y, self.max_x, self.max_y]
            .iter()
            .all(|v| v.is_finite());
        if !finite || self.width() <= 0.0 || self.height() <= 0.0 {
            return Err(DataLoadError::InvalidBounds(*self));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GalleryImage {
    pub src: String,
    #[serde(default)]
    pub caption: String,
}

/// A point of interest placed on the map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub coordinates: Position,
    #[serde(default)]
    pub gallery: Vec<GalleryImage>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapImage {
    pub src: String,
    pub coordinates: WorldBounds,
}

/// The static map document: one image, its markers and optional view settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapDocument {
    pub image: MapImage,
    #[serde(default)]
    pub markers: Vec<Marker>,
    #[serde(default)]
    pub view: MapOptions,
}

impl MapDocument {
    /// Parse and validate a document. Any failure here is fatal for the map.
    pub fn from_json(json: &str) -> Result<Self, DataLoadError> {
        let doc: MapDocument = serde_json::from_str(json)?;
        doc.validate()?;
        Ok(doc)
    }

    fn validate(&self) -> Result<(), DataLoadError> {
        if self.image.src.trim().is_empty() {
            return Err(DataLoadError::MissingImage);
        }
        let bounds = self.bounds();
        bounds.validate()?;

        let mut seen = HashSet::new();
        for marker in &self.markers {
            if !seen.insert(marker.id.as_str()) {
                return Err(DataLoadError::DuplicateMarker(marker.id.clone()));
            }
            if !bounds.contains(marker.coordinates) {
                log::warn!(
                    "marker {} at ({}, {}) lies outside the image bounds",
                    marker.id,
                    marker.coordinates.x,
                    marker.coordinates.y
                );
            }
        }
        Ok(())
    }

    pub fn bounds(&self) -> WorldBounds {
        self.image.coordinates
    }

    pub fn find_marker(&self, id: &str) -> Option<&Marker> {
        self.markers.iter().find(|m| m.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = r#"{
        "image": {
            "src": "/maps/world.svg",
            "coordinates": { "minX": 0, "minY": 0, "maxX": 2400, "maxY": 1600 }
        },
        "markers": [
            {
                "id": "spawn",
                "title": "Spawn",
                "description": "Where everyone starts",
                "coordinates": { "x": 1200, "y": 800 },
                "gallery": [{ "src": "/img/spawn.webp", "caption": "Town square" }]
            },
            {
                "id": "farm",
                "title": "Farm",
                "coordinates": { "x": 300.5, "y": 1400 }
            }
        ]
    }"#;

    #[test]
    fn test_parse_document() {
        let doc = MapDocument::from_json(DOC).unwrap();
        assert_eq!(doc.markers.len(), 2);
        assert_eq!(doc.bounds().width(), 2400.0);
        assert_eq!(doc.bounds().height(), 1600.0);
        assert_eq!(doc.markers[0].gallery[0].caption, "Town square");
        assert!(doc.markers[1].gallery.is_empty());
        assert_eq!(doc.markers[1].description, "");
        assert_eq!(doc.view, MapOptions::default());
    }

    #[test]
    fn test_find_marker() {
        let doc = MapDocument::from_json(DOC).unwrap();
        assert_eq!(doc.find_marker("farm").unwrap().title, "Farm");
        assert!(doc.find_marker("nether").is_none());
    }

    #[test]
    fn test_missing_coordinates_is_fatal() {
        let json = r#"{ "image": { "src": "/m.png" }, "markers": [] }"#;
        assert!(matches!(
            MapDocument::from_json(json),
            Err(DataLoadError::Parse(_))
        ));
    }

    #[test]
    fn test_non_numeric_bounds_is_fatal() {
        let json = r#"{
            "image": { "src": "/m.png", "coordinates": { "minX": "a", "minY": 0, "maxX": 1, "maxY": 1 } }
        }"#;
        assert!(matches!(
            MapDocument::from_json(json),
            Err(DataLoadError::Parse(_))
        ));
    }

    #[test]
    fn test_inverted_bounds_is_fatal() {
        let json = r#"{
            "image": { "src": "/m.png", "coordinates": { "minX": 10, "minY": 0, "maxX": 5, "maxY": 8 } }
        }"#;
        assert!(matches!(
            MapDocument::from_json(json),
            Err(DataLoadError::InvalidBounds(_))
        ));
    }

    #[test]
    fn test_empty_image_source_is_fatal() {
        let json = r#"{
            "image": { "src": "  ", "coordinates": { "minX": 0, "minY": 0, "maxX": 5, "maxY": 8 } }
        }"#;
        assert!(matches!(
            MapDocument::from_json(json),
            Err(DataLoadError::MissingImage)
        ));
    }

    #[test]
    fn test_duplicate_marker_id_is_fatal() {
        let json = r#"{
            "image": { "src": "/m.png", "coordinates": { "minX": 0, "minY": 0, "maxX": 5, "maxY": 8 } },
            "markers": [
                { "id": "a", "title": "A", "coordinates": { "x": 1, "y": 1 } },
                { "id": "a", "title": "A again", "coordinates": { "x": 2, "y": 2 } }
            ]
        }"#;
        match MapDocument::from_json(json) {
            Err(DataLoadError::DuplicateMarker(id)) => assert_eq!(id, "a"),
            other => panic!("expected duplicate marker error, got {other:?}"),
        }
    }

    #[test]
    fn test_marker_outside_bounds_still_loads() {
        let json = r#"{
            "image": { "src": "/m.png", "coordinates": { "minX": 0, "minY": 0, "maxX": 5, "maxY": 8 } },
            "markers": [{ "id": "far", "title": "Far", "coordinates": { "x": 50, "y": 1 } }]
        }"#;
        assert!(MapDocument::from_json(json).is_ok());
    }

    #[test]
    fn test_position_rounding() {
        assert_eq!(Position::new(10.4, 20.6).rounded(), (10, 21));
        assert_eq!(Position::new(-3.5, 2.5).rounded(), (-4, 3));
    }

    #[test]
    fn test_bounds_center_and_contains() {
        let b = WorldBounds { min_x: -100.0, min_y: 0.0, max_x: 100.0, max_y: 50.0 };
        assert_eq!(b.center(), Position::new(0.0, 25.0));
        assert!(b.contains(Position::new(100.0, 50.0)));
        assert!(!b.contains(Position::new(100.1, 50.0)));
    }

    #[test]
    fn test_size_usable() {
        assert!(Size::new(10.0, 1.0).is_usable());
        assert!(!Size::new(0.0, 10.0).is_usable());
        assert!(!Size::new(f64::NAN, 10.0).is_usable());
    }
}
