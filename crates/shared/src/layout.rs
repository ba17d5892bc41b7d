//! Two-pane responsive layout: the map plus the marker detail panel.
//!
//! Wide windows put the panel beside the map, narrow ones stack it below.

use crate::config::LayoutConfig;
use crate::error::LayoutError;
use crate::models::Size;
use crate::selection::SelectionStore;
use crate::surface::SurfaceControl;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutMode {
    Wide,
    Narrow,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layout {
    pub mode: LayoutMode,
    pub detail_visible: bool,
    pub map_width: f64,
    pub map_height: f64,
    /// Zero while the panel is hidden.
    pub detail_width: f64,
    /// `None` lets the panel take its natural content height.
    pub detail_height: Option<f64>,
}

impl Layout {
    pub fn is_wide_screen(&self) -> bool {
        self.mode == LayoutMode::Wide
    }

    pub fn map_size(&self) -> Size {
        Size::new(self.map_width, self.map_height)
    }
}

pub fn compute_layout(
    config: &LayoutConfig,
    window: Size,
    detail_visible: bool,
) -> Result<Layout, LayoutError> {
    if !window.is_usable() {
        return Err(LayoutError::InvalidWindow {
            width: window.width,
            height: window.height,
        });
    }

    let available_width = window.width - 2.0 * config.padding;
    let layout = if window.width >= config.breakpoint {
        let available_height = window.height - config.header_height - 2.0 * config.padding;
        let map_width = if detail_visible {
            config.wide_map_share.apply(available_width).floor()
        } else {
            available_width
        };
        Layout {
            mode: LayoutMode::Wide,
            detail_visible,
            map_width,
            map_height: available_height,
            detail_width: if detail_visible { available_width - map_width } else { 0.0 },
            detail_height: Some(available_height),
        }
    } else {
        Layout {
            mode: LayoutMode::Narrow,
            detail_visible,
            map_width: available_width,
            map_height: config.narrow_aspect.apply(available_width),
            detail_width: if detail_visible { available_width } else { 0.0 },
            detail_height: None,
        }
    };

    check_dimension("map width", layout.map_width)?;
    check_dimension("map height", layout.map_height)?;
    Ok(layout)
}

fn check_dimension(name: &'static str, value: f64) -> Result<(), LayoutError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(LayoutError::InvalidDimension { name, value })
    }
}

/// Recomputes the layout on every resize or selection toggle and keeps the
/// map surface in step.
#[derive(Debug, Clone, Default)]
pub struct LayoutController {
    config: LayoutConfig,
    current: Option<Layout>,
}

impl LayoutController {
    pub fn new(config: LayoutConfig) -> Self {
        Self {
            config,
            current: None,
        }
    }

    /// Last layout that computed cleanly.
    pub fn current(&self) -> Option<&Layout> {
        self.current.as_ref()
    }

    /// Recompute, resize the surface, then issue any pending pan, in that order.
    ///
    /// An unusable window skips the cycle: the previous layout stays in force
    /// and the pending pan waits for the next good cycle. Returns the new
    /// layout, or `None` when the cycle was skipped.
    pub fn update<S: SurfaceControl>(
        &mut self,
        window: Size,
        selection: &mut SelectionStore,
        surface: &mut S,
    ) -> Option<Layout> {
        let layout = match compute_layout(&self.config, window, selection.is_detail_visible()) {
            Ok(layout) => layout,
            Err(err) => {
                log::debug!("skipping layout pass: {err}");
                return None;
            }
        };
        self.current = Some(layout);

        surface.invalidate_size(layout.map_size());
        if let Some(target) = selection.take_pending_center() {
            surface.pan_to(target);
        }
        Some(layout)
    }
}
