//! Reference rendering engine: pan/zoom math for a single image overlay.
//!
//! The engine keeps the view in engine coordinates and renders through a
//! pixel origin, the layer point that sits at the container's top-left corner.
//! The host draws the image and markers at the screen rects this engine
//! reports and feeds pointer gestures back through the surface.

use crate::crs::{CoordinateSpace, ImagePixelSpace, LatLng};
use crate::models::{Position, Size, WorldBounds};
use crate::surface::{EngineSetup, RenderEngine};
use crate::viewport::{clamp_center, limit_zoom, ViewState};

#[derive(Debug, Clone, PartialEq)]
pub struct ImageLayer {
    pub src: String,
    pub bounds: WorldBounds,
    pub loaded: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlacedMarker {
    pub id: String,
    pub at: LatLng,
}

/// Axis-aligned rectangle in container-relative screen pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone)]
pub struct ViewportEngine<C: CoordinateSpace = ImagePixelSpace> {
    space: C,
    size: Size,
    view: ViewState,
    max_bounds: WorldBounds,
    zoom_snap: f64,
    zoom_delta: f64,
    image: Option<ImageLayer>,
    markers: Vec<PlacedMarker>,
    pan_animated: bool,
    released: bool,
}

impl ViewportEngine<ImagePixelSpace> {
    pub fn new(setup: EngineSetup) -> Self {
        Self::with_space(ImagePixelSpace, setup)
    }
}

impl<C: CoordinateSpace> ViewportEngine<C> {
    /// Start centered on the image at the planned initial zoom.
    pub fn with_space(space: C, setup: EngineSetup) -> Self {
        let center = space.to_world(setup.image_bounds.center());
        let mut engine = Self {
            space,
            size: setup.container,
            view: ViewState::new(center, setup.zoom),
            max_bounds: setup.image_bounds,
            zoom_snap: setup.zoom_snap,
            zoom_delta: setup.zoom_delta,
            image: None,
            markers: Vec::new(),
            pan_animated: false,
            released: false,
        };
        engine.clamp_view();
        engine
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn image(&self) -> Option<&ImageLayer> {
        self.image.as_ref()
    }

    pub fn markers(&self) -> &[PlacedMarker] {
        &self.markers
    }

    /// True while the latest view change came from `pan_to`, so the host
    /// should animate the move.
    pub fn is_pan_animated(&self) -> bool {
        self.pan_animated
    }

    pub fn is_released(&self) -> bool {
        self.released
    }

    fn pixel_origin(&self) -> Position {
        let center = self.space.latlng_to_point(self.view.center, self.view.zoom);
        Position::new(
            center.x - self.size.width / 2.0,
            center.y - self.size.height / 2.0,
        )
    }

    pub fn world_to_screen(&self, at: LatLng) -> Position {
        let point = self.space.latlng_to_point(at, self.view.zoom);
        let origin = self.pixel_origin();
        Position::new(point.x - origin.x, point.y - origin.y)
    }

    pub fn screen_to_world(&self, screen: Position) -> LatLng {
        let origin = self.pixel_origin();
        self.space.point_to_latlng(
            Position::new(screen.x + origin.x, screen.y + origin.y),
            self.view.zoom,
        )
    }

    /// Where the image overlay currently sits on screen.
    pub fn image_rect(&self) -> Option<ScreenRect> {
        let layer = self.image.as_ref()?;
        let b = layer.bounds;
        let top_left = self
            .world_to_screen(self.space.to_world(Position::new(b.min_x, b.min_y)));
        let bottom_right = self
            .world_to_screen(self.space.to_world(Position::new(b.max_x, b.max_y)));
        Some(ScreenRect {
            left: top_left.x.min(bottom_right.x),
            top: top_left.y.min(bottom_right.y),
            width: (bottom_right.x - top_left.x).abs(),
            height: (bottom_right.y - top_left.y).abs(),
        })
    }

    pub fn marker_screen_positions(&self) -> impl Iterator<Item = (&str, Position)> + '_ {
        self.markers
            .iter()
            .map(|m| (m.id.as_str(), self.world_to_screen(m.at)))
    }

    fn clamp_view(&mut self) {
        let center = self.space.project(self.view.center);
        let scale = self.space.scale(self.view.zoom);
        let clamped = clamp_center(center, self.size, scale, &self.max_bounds);
        self.view.center = self.space.unproject(clamped);
    }
}

impl<C: CoordinateSpace> RenderEngine for ViewportEngine<C> {
    type Space = C;

    fn space(&self) -> &C {
        &self.space
    }

    fn add_image_layer(&mut self, src: &str, bounds: WorldBounds) {
        self.image = Some(ImageLayer {
            src: src.to_string(),
            bounds,
            loaded: false,
        });
    }

    fn add_marker(&mut self, id: &str, at: LatLng) {
        self.markers.push(PlacedMarker {
            id: id.to_string(),
            at,
        });
    }

    fn locate(&self, screen: Position) -> LatLng {
        self.screen_to_world(screen)
    }

    fn pan_to(&mut self, target: LatLng) {
        self.view.center = target;
        self.clamp_view();
        self.pan_animated = true;
    }

    fn pan_by(&mut self, dx: f64, dy: f64) {
        let center = self.space.latlng_to_point(self.view.center, self.view.zoom);
        self.view.center = self
            .space
            .point_to_latlng(Position::new(center.x - dx, center.y - dy), self.view.zoom);
        self.clamp_view();
        self.pan_animated = false;
    }

    fn zoom_around(&mut self, anchor: Position, steps: f64) -> bool {
        if steps == 0.0 || !steps.is_finite() {
            return false;
        }
        let target = limit_zoom(
            self.view.zoom + steps * self.zoom_delta,
            self.zoom_snap,
            self.view.min_zoom,
            self.view.max_zoom,
        );
        if (target - self.view.zoom).abs() < 1e-9 {
            return false;
        }

        // Keep the point under the anchor fixed across the zoom change.
        let under_anchor = self.screen_to_world(anchor);
        let anchored = self.space.latlng_to_point(under_anchor, target);
        let center = Position::new(
            anchored.x - (anchor.x - self.size.width / 2.0),
            anchored.y - (anchor.y - self.size.height / 2.0),
        );
        self.view.set_zoom(target);
        self.view.center = self.space.point_to_latlng(center, self.view.zoom);
        self.clamp_view();
        self.pan_animated = false;
        true
    }

    fn invalidate_size(&mut self, size: Size) {
        // An unchanged size leaves an in-flight pan running.
        if !size.is_usable() || size == self.size {
            return;
        }
        self.size = size;
        self.clamp_view();
        self.pan_animated = false;
    }

    fn mark_image_loaded(&mut self) {
        if let Some(layer) = self.image.as_mut() {
            layer.loaded = true;
        }
    }

    fn destroy(&mut self) {
        self.image = None;
        self.markers.clear();
        self.released = true;
    }
}
