//! Zoom bounds and view clamping.
//!
//! Zoom follows the doubling convention: each whole step doubles the linear
//! scale, so zoom 0 shows one screen pixel per image pixel and zoom -1 shows
//! the image at half size.

use crate::config::{InitialZoom, MapOptions};
use crate::crs::LatLng;
use crate::error::LayoutError;
use crate::models::{Position, Size, WorldBounds};

/// Smallest zoom at which the whole image fits inside the container.
///
/// The tighter of the two axes wins, so the image is letterboxed on the other.
pub fn compute_min_zoom(
    container_width: f64,
    container_height: f64,
    bounds: &WorldBounds,
) -> Result<f64, LayoutError> {
    let image_width = bounds.width();
    let image_height = bounds.height();
    if !(image_width > 0.0 && image_height > 0.0) {
        return Err(LayoutError::InvalidDimension {
            name: "image size",
            value: image_width.min(image_height),
        });
    }
    if !Size::new(container_width, container_height).is_usable() {
        return Err(LayoutError::InvalidDimension {
            name: "container size",
            value: container_width.min(container_height),
        });
    }

    let zoom_x = (container_width / image_width).log2();
    let zoom_y = (container_height / image_height).log2();
    let zoom = zoom_x.min(zoom_y);
    if !zoom.is_finite() {
        return Err(LayoutError::InvalidDimension { name: "min zoom", value: zoom });
    }
    Ok(zoom)
}

/// Zoom range and starting zoom for one mount.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomPlan {
    pub min: f64,
    pub max: f64,
    pub initial: f64,
}

pub fn fit_zoom(
    container: Size,
    bounds: &WorldBounds,
    options: &MapOptions,
) -> Result<ZoomPlan, LayoutError> {
    let min = compute_min_zoom(container.width, container.height, bounds)?;
    // A tiny image in a huge container can fit above the configured ceiling.
    let max = options.max_zoom.max(min);
    let initial = match options.initial_zoom {
        InitialZoom::FitToScreen => min,
        InitialZoom::Fixed { zoom } => zoom.clamp(min, max),
    };
    Ok(ZoomPlan { min, max, initial })
}

/// Snap `zoom` to the nearest multiple of `snap`, then clamp it to the range.
pub fn limit_zoom(zoom: f64, snap: f64, min: f64, max: f64) -> f64 {
    let snapped = if snap > 0.0 {
        (zoom / snap).round() * snap
    } else {
        zoom
    };
    snapped.clamp(min, max)
}

/// Hard-clamp a view center so the visible area stays inside `bounds`.
///
/// On an axis where the viewport is larger than the image, the center is
/// pinned to the image midline. The result always lies inside `bounds`.
pub fn clamp_center(center: Position, viewport: Size, scale: f64, bounds: &WorldBounds) -> Position {
    let half_w = viewport.width / 2.0 / scale;
    let half_h = viewport.height / 2.0 / scale;
    Position::new(
        clamp_axis(center.x, bounds.min_x, bounds.max_x, half_w),
        clamp_axis(center.y, bounds.min_y, bounds.max_y, half_h),
    )
}

fn clamp_axis(value: f64, lo: f64, hi: f64, half: f64) -> f64 {
    if !half.is_finite() || hi - lo <= 2.0 * half {
        (lo + hi) / 2.0
    } else {
        value.clamp(lo + half, hi - half)
    }
}

/// Current viewport parameters. `zoom` always lies within `[min_zoom, max_zoom]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewState {
    pub zoom: f64,
    pub center: LatLng,
    pub min_zoom: f64,
    pub max_zoom: f64,
}

impl ViewState {
    pub fn new(center: LatLng, plan: ZoomPlan) -> Self {
        Self {
            zoom: plan.initial.clamp(plan.min, plan.max),
            center,
            min_zoom: plan.min,
            max_zoom: plan.max,
        }
    }

    /// Set the zoom, clamped to the allowed range. Returns whether it changed.
    pub fn set_zoom(&mut self, zoom: f64) -> bool {
        let next = zoom.clamp(self.min_zoom, self.max_zoom);
        let changed = (next - self.zoom).abs() > 1e-9;
        self.zoom = next;
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds(w: f64, h: f64) -> WorldBounds {
        WorldBounds { min_x: 0.0, min_y: 0.0, max_x: w, max_y: h }
    }

    #[test]
    fn test_min_zoom_scenario() {
        let zoom = compute_min_zoom(1200.0, 800.0, &bounds(2400.0, 1600.0)).unwrap();
        assert!((zoom - (-1.0)).abs() < 1e-12);
    }

    #[test]
    fn test_min_zoom_uses_binding_axis() {
        // Wide image in a square container: width is the constraint.
        let zoom = compute_min_zoom(1000.0, 1000.0, &bounds(4000.0, 1000.0)).unwrap();
        assert!((zoom - (-2.0)).abs() < 1e-12);
    }

    #[test]
    fn test_min_zoom_monotone_in_image_size() {
        let mut last = f64::INFINITY;
        for w in [100.0, 500.0, 1200.0, 2400.0, 9000.0] {
            let z = compute_min_zoom(1200.0, 800.0, &bounds(w, 800.0)).unwrap();
            assert!(z <= last, "zoom grew from {last} to {z} at width {w}");
            last = z;
        }
        let mut last = f64::INFINITY;
        for h in [50.0, 400.0, 1600.0, 6400.0] {
            let z = compute_min_zoom(1200.0, 800.0, &bounds(1200.0, h)).unwrap();
            assert!(z <= last, "zoom grew from {last} to {z} at height {h}");
            last = z;
        }
    }

    #[test]
    fn test_min_zoom_rejects_empty_container() {
        assert!(compute_min_zoom(0.0, 800.0, &bounds(10.0, 10.0)).is_err());
        assert!(compute_min_zoom(800.0, f64::NAN, &bounds(10.0, 10.0)).is_err());
        assert!(compute_min_zoom(-5.0, 800.0, &bounds(10.0, 10.0)).is_err());
    }

    #[test]
    fn test_fit_zoom_defaults_to_fit_screen() {
        let plan = fit_zoom(Size::new(1200.0, 800.0), &bounds(2400.0, 1600.0), &MapOptions::default())
            .unwrap();
        assert_eq!(plan.initial, plan.min);
        assert_eq!(plan.max, 20.0);
    }

    #[test]
    fn test_fit_zoom_fixed_initial_is_clamped() {
        let mut opts = MapOptions::default();
        opts.initial_zoom = InitialZoom::Fixed { zoom: -5.0 };
        let plan = fit_zoom(Size::new(1200.0, 800.0), &bounds(2400.0, 1600.0), &opts).unwrap();
        assert!((plan.initial - (-1.0)).abs() < 1e-12);

        opts.initial_zoom = InitialZoom::Fixed { zoom: 2.0 };
        let plan = fit_zoom(Size::new(1200.0, 800.0), &bounds(2400.0, 1600.0), &opts).unwrap();
        assert_eq!(plan.initial, 2.0);
    }

    #[test]
    fn test_fit_zoom_raises_ceiling_for_tiny_images() {
        let mut opts = MapOptions::default();
        opts.max_zoom = 1.0;
        let plan = fit_zoom(Size::new(1024.0, 1024.0), &bounds(16.0, 16.0), &opts).unwrap();
        assert!((plan.min - 6.0).abs() < 1e-12);
        assert_eq!(plan.max, plan.min);
    }

    #[test]
    fn test_limit_zoom_snaps_and_clamps() {
        assert!((limit_zoom(1.234, 0.1, -1.0, 20.0) - 1.2).abs() < 1e-9);
        assert_eq!(limit_zoom(25.0, 0.1, -1.0, 20.0), 20.0);
        assert_eq!(limit_zoom(-3.0, 0.1, -1.0, 20.0), -1.0);
        assert_eq!(limit_zoom(1.234, 0.0, -1.0, 20.0), 1.234);
    }

    #[test]
    fn test_clamp_center_keeps_viewport_inside() {
        let b = bounds(2400.0, 1600.0);
        // Viewport covers 600x400 world pixels at scale 2.
        let c = clamp_center(Position::new(-500.0, 5000.0), Size::new(1200.0, 800.0), 2.0, &b);
        assert!((c.x - 300.0).abs() < 1e-9);
        assert!((c.y - 1400.0).abs() < 1e-9);
        let inside = Position::new(1000.0, 700.0);
        assert_eq!(clamp_center(inside, Size::new(1200.0, 800.0), 2.0, &b), inside);
    }

    #[test]
    fn test_clamp_center_pins_small_axis_to_midline() {
        let b = bounds(2400.0, 1600.0);
        // At scale 0.25 the viewport is 4800x3200 world pixels.
        let c = clamp_center(Position::new(10.0, 10.0), Size::new(1200.0, 800.0), 0.25, &b);
        assert_eq!(c, b.center());
        assert!(b.contains(c));
    }

    #[test]
    fn test_view_state_zoom_stays_in_range() {
        let plan = ZoomPlan { min: -1.0, max: 3.0, initial: 0.0 };
        let mut view = ViewState::new(LatLng::default(), plan);
        assert!(view.set_zoom(10.0));
        assert_eq!(view.zoom, 3.0);
        assert!(!view.set_zoom(4.0));
        view.set_zoom(-9.0);
        assert_eq!(view.zoom, -1.0);
    }
}
