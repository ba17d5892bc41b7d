//! View configuration, read from the optional `view` section of the map document.
//!
//! Every field has a default so an absent or partial section is valid.

use serde::{Deserialize, Serialize};

pub const DEFAULT_MAX_ZOOM: f64 = 20.0;
pub const DEFAULT_ZOOM_SNAP: f64 = 0.1;
pub const DEFAULT_ZOOM_DELTA: f64 = 0.1;

pub const DEFAULT_BREAKPOINT: f64 = 768.0;
pub const DEFAULT_HEADER_HEIGHT: f64 = 64.0;
pub const DEFAULT_PADDING: f64 = 32.0;

/// An exact fraction, applied as `value * num / den` so that e.g. 960 * 2/3
/// lands on 640 instead of 639.999...
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ratio {
    pub num: f64,
    pub den: f64,
}

impl Ratio {
    pub const fn new(num: f64, den: f64) -> Self {
        Self { num, den }
    }

    pub fn apply(self, value: f64) -> f64 {
        value * self.num / self.den
    }
}

/// How the zoom is chosen when the map first mounts.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum InitialZoom {
    /// Start at the computed minimum zoom so the whole image is visible.
    #[default]
    FitToScreen,
    /// Start at a fixed zoom; the computed minimum still acts as the floor.
    Fixed { zoom: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutConfig {
    /// Window widths at or above this use the side-by-side layout.
    pub breakpoint: f64,
    pub header_height: f64,
    /// Padding on each side of the content area.
    pub padding: f64,
    /// Share of the available width the map keeps while the panel is open.
    pub wide_map_share: Ratio,
    /// Height / width of the map in the stacked layout.
    pub narrow_aspect: Ratio,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            breakpoint: DEFAULT_BREAKPOINT,
            header_height: DEFAULT_HEADER_HEIGHT,
            padding: DEFAULT_PADDING,
            wide_map_share: Ratio::new(2.0, 3.0),
            narrow_aspect: Ratio::new(9.0, 16.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MapOptions {
    pub max_zoom: f64,
    pub zoom_snap: f64,
    pub zoom_delta: f64,
    pub initial_zoom: InitialZoom,
    pub layout: LayoutConfig,
}

impl Default for MapOptions {
    fn default() -> Self {
        Self {
            max_zoom: DEFAULT_MAX_ZOOM,
            zoom_snap: DEFAULT_ZOOM_SNAP,
            zoom_delta: DEFAULT_ZOOM_DELTA,
            initial_zoom: InitialZoom::default(),
            layout: LayoutConfig::default(),
        }
    }
}
