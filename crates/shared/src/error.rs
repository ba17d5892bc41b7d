//! Error types for loading, mounting and laying out the map.

use thiserror::Error;

use crate::models::WorldBounds;

/// The static map document could not be used. Nothing renders when this happens.
#[derive(Debug, Error)]
pub enum DataLoadError {
    #[error("malformed map document: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("image bounds {0:?} are empty, inverted or not finite")]
    InvalidBounds(WorldBounds),

    #[error("map document has no image source")]
    MissingImage,

    #[error("marker id `{0}` appears more than once")]
    DuplicateMarker(String),
}

/// Recoverable map surface conditions. Neither is ever shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SurfaceError {
    /// Mount was attempted before the container element had a usable size.
    #[error("map container is not available yet")]
    MountRace,

    /// An event arrived for an engine instance that has been released.
    #[error("event for a released map surface was discarded")]
    StaleCallback,
}

/// A layout or zoom computation produced unusable numbers, usually during a
/// transient zero-size resize.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum LayoutError {
    #[error("window size {width}x{height} cannot be laid out")]
    InvalidWindow { width: f64, height: f64 },

    #[error("{name} came out as {value}")]
    InvalidDimension { name: &'static str, value: f64 },
}
