//! The map surface: owns one rendering engine instance per mount and routes
//! engine events to listeners.
//!
//! Every mount hands out a fresh [`SurfaceToken`]. Event handlers capture the
//! token they were created with; once the surface is unmounted (or remounted)
//! those tokens go stale and their events are dropped instead of reaching a
//! destroyed engine.

use crate::config::MapOptions;
use crate::crs::{CoordinateSpace, LatLng};
use crate::error::SurfaceError;
use crate::models::{MapImage, Marker, Position, Size, WorldBounds};
use crate::viewport::{fit_zoom, ZoomPlan};

/// What the map needs from a rendering engine.
pub trait RenderEngine {
    type Space: CoordinateSpace;

    fn space(&self) -> &Self::Space;

    /// Show the map image stretched over `bounds` (image pixel space).
    fn add_image_layer(&mut self, src: &str, bounds: WorldBounds);

    fn add_marker(&mut self, id: &str, at: LatLng);

    /// Engine coordinate under a container-relative screen point.
    fn locate(&self, screen: Position) -> LatLng;

    /// Animated, clamped pan. A later pan replaces one still in flight.
    fn pan_to(&mut self, target: LatLng);

    /// Move the content by a screen-space drag delta.
    fn pan_by(&mut self, dx: f64, dy: f64);

    /// Zoom by `steps` zoom deltas, keeping `anchor` over the same point.
    /// Returns false when the zoom is already at the limit.
    fn zoom_around(&mut self, anchor: Position, steps: f64) -> bool;

    /// The container changed size; drop any cached measurements.
    fn invalidate_size(&mut self, size: Size);

    fn mark_image_loaded(&mut self);

    fn destroy(&mut self);
}

/// Everything an engine needs at construction time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineSetup {
    pub container: Size,
    pub image_bounds: WorldBounds,
    pub zoom: ZoomPlan,
    pub zoom_snap: f64,
    pub zoom_delta: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SurfaceToken(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MountStatus {
    Mounted(SurfaceToken),
    /// The surface was already mounted; nothing was created.
    AlreadyMounted(SurfaceToken),
}

impl MountStatus {
    pub fn token(&self) -> SurfaceToken {
        match self {
            MountStatus::Mounted(t) | MountStatus::AlreadyMounted(t) => *t,
        }
    }
}

/// Input forwarded from the host into the surface.
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceEvent {
    PointerMove { screen: Position },
    /// Click on the map outside any marker.
    Click { screen: Position },
    MarkerClick { id: String },
    Drag { dx: f64, dy: f64 },
    Wheel { anchor: Position, steps: f64 },
    ImageLoaded,
}

/// Hooks a layout pass uses to keep the surface in step with its container.
pub trait SurfaceControl {
    fn invalidate_size(&mut self, size: Size);

    /// Pan to a point in image pixel space.
    fn pan_to(&mut self, target: Position);
}

type PointerListener = Box<dyn FnMut(i64, i64)>;
type MarkerListener = Box<dyn FnMut(&Marker)>;

pub struct MapSurface<E: RenderEngine> {
    engine: Option<E>,
    generation: u64,
    markers: Vec<Marker>,
    pointer_listener: Option<PointerListener>,
    marker_listener: Option<MarkerListener>,
}

impl<E: RenderEngine> Default for MapSurface<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: RenderEngine> MapSurface<E> {
    pub fn new() -> Self {
        Self {
            engine: None,
            generation: 0,
            markers: Vec::new(),
            pointer_listener: None,
            marker_listener: None,
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.engine.is_some()
    }

    /// Token for the current mount. Stale once the surface unmounts.
    pub fn token(&self) -> SurfaceToken {
        SurfaceToken(self.generation)
    }

    pub fn engine(&self) -> Option<&E> {
        self.engine.as_ref()
    }

    /// Create the engine, add the image layer and place every marker.
    ///
    /// `container` is `None` while the host element does not exist yet; that
    /// and a zero-size container both report [`SurfaceError::MountRace`] so
    /// the caller can retry once layout has settled.
    pub fn mount<F>(
        &mut self,
        container: Option<Size>,
        image: &MapImage,
        markers: &[Marker],
        options: &MapOptions,
        create: F,
    ) -> Result<MountStatus, SurfaceError>
    where
        F: FnOnce(EngineSetup) -> E,
    {
        if self.engine.is_some() {
            return Ok(MountStatus::AlreadyMounted(self.token()));
        }
        let container = container
            .filter(Size::is_usable)
            .ok_or(SurfaceError::MountRace)?;
        let zoom = fit_zoom(container, &image.coordinates, options).map_err(|err| {
            log::debug!("cannot fit map yet: {err}");
            SurfaceError::MountRace
        })?;

        let mut engine = create(EngineSetup {
            container,
            image_bounds: image.coordinates,
            zoom,
            zoom_snap: options.zoom_snap,
            zoom_delta: options.zoom_delta,
        });
        engine.add_image_layer(&image.src, image.coordinates);
        for marker in markers {
            let at = engine.space().to_world(marker.coordinates);
            engine.add_marker(&marker.id, at);
        }

        self.generation += 1;
        self.markers = markers.to_vec();
        self.engine = Some(engine);
        log::debug!(
            "map surface mounted: {}x{} container, zoom {:.2} in [{:.2}, {:.2}], {} markers",
            container.width,
            container.height,
            zoom.initial,
            zoom.min,
            zoom.max,
            markers.len()
        );
        Ok(MountStatus::Mounted(self.token()))
    }

    /// Release the engine and detach all listeners. Returns whether anything
    /// was mounted.
    pub fn unmount(&mut self) -> bool {
        self.pointer_listener = None;
        self.marker_listener = None;
        let Some(mut engine) = self.engine.take() else {
            return false;
        };
        engine.destroy();
        self.generation += 1;
        self.markers.clear();
        log::debug!("map surface unmounted");
        true
    }

    /// Receive the rounded image-pixel position under the pointer on every move.
    pub fn on_pointer_move(&mut self, listener: impl FnMut(i64, i64) + 'static) {
        self.pointer_listener = Some(Box::new(listener));
    }

    pub fn on_marker_click(&mut self, listener: impl FnMut(&Marker) + 'static) {
        self.marker_listener = Some(Box::new(listener));
    }

    /// Route one event to the engine and listeners.
    ///
    /// Events bound to an earlier mount, or arriving while nothing is mounted,
    /// return [`SurfaceError::StaleCallback`] and have no effect.
    pub fn dispatch(&mut self, token: SurfaceToken, event: SurfaceEvent) -> Result<(), SurfaceError> {
        if token.0 != self.generation {
            return Err(SurfaceError::StaleCallback);
        }
        let Some(engine) = self.engine.as_mut() else {
            return Err(SurfaceError::StaleCallback);
        };

        match event {
            SurfaceEvent::PointerMove { screen } => {
                let world = engine.locate(screen);
                let (x, y) = engine.space().to_pixel(world).rounded();
                if let Some(listener) = self.pointer_listener.as_mut() {
                    listener(x, y);
                }
            }
            SurfaceEvent::Click { .. } => {}
            SurfaceEvent::MarkerClick { id } => match self.markers.iter().find(|m| m.id == id) {
                Some(marker) => {
                    if let Some(listener) = self.marker_listener.as_mut() {
                        listener(marker);
                    }
                }
                None => log::debug!("click on unknown marker {id}"),
            },
            SurfaceEvent::Drag { dx, dy } => engine.pan_by(dx, dy),
            SurfaceEvent::Wheel { anchor, steps } => {
                engine.zoom_around(anchor, steps);
            }
            SurfaceEvent::ImageLoaded => engine.mark_image_loaded(),
        }
        Ok(())
    }
}

impl<E: RenderEngine> SurfaceControl for MapSurface<E> {
    fn invalidate_size(&mut self, size: Size) {
        if let Some(engine) = self.engine.as_mut() {
            engine.invalidate_size(size);
        }
    }

    fn pan_to(&mut self, target: Position) {
        if let Some(engine) = self.engine.as_mut() {
            let at = engine.space().to_world(target);
            engine.pan_to(at);
        }
    }
}

impl<E: RenderEngine> Drop for MapSurface<E> {
    fn drop(&mut self) {
        self.unmount();
    }
}
