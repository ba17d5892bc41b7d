use std::rc::Rc;

use dioxus::html::geometry::WheelDelta;
use dioxus::html::input_data::MouseButton;
use dioxus::html::TouchPoint;
use dioxus::prelude::*;
use gloo_timers::future::TimeoutFuture;
use pixelmap_shared::engine::ViewportEngine;
use pixelmap_shared::error::SurfaceError;
use pixelmap_shared::models::{MapDocument, Position};
use pixelmap_shared::selection::SelectionStore;
use pixelmap_shared::surface::{MapSurface, MountStatus, SurfaceEvent, SurfaceToken};

use crate::coords;

pub const MAP_CONTAINER_ID: &str = "image-map-container";

pub type Surface = MapSurface<ViewportEngine>;

/// A marker as drawn this frame.
struct Pin {
    id: String,
    title: String,
    style: String,
    selected: bool,
}

/// Drag threshold in pixels. Movement below this is treated as a click.
const DRAG_THRESHOLD: f64 = 3.0;

/// Wheel distance that zooms one whole level.
const WHEEL_PX_PER_ZOOM_LEVEL: f64 = 60.0;

/// Touch drag threshold. Larger than mouse because touch is less precise.
const TOUCH_DRAG_THRESHOLD: f64 = 8.0;

/// Pinches closer than this are too noisy to measure a scale from.
const MIN_PINCH_DISTANCE: f64 = 1.0;

const MOUNT_RETRY_MS: u32 = 50;
const MOUNT_RETRY_MAX_MS: u32 = 1000;

/// Deferral attempts before the wait is reported once at warn level.
const MOUNT_WARN_AFTER: u32 = 40;

// ---------------------------------------------------------------------------
// Gesture math (pure functions, easily testable)
// ---------------------------------------------------------------------------

/// Convert a wheel delta (pixels / lines / pages) to a uniform pixel-like value.
fn wheel_delta_y(delta: WheelDelta) -> f64 {
    match delta {
        WheelDelta::Pixels(d) => d.y,
        WheelDelta::Lines(d) => d.y * 40.0,
        WheelDelta::Pages(d) => d.y * 400.0,
    }
}

/// Number of zoom deltas a wheel movement is worth. Scrolling up zooms in.
fn wheel_steps(delta_y: f64, zoom_delta: f64) -> f64 {
    if delta_y == 0.0 || zoom_delta <= 0.0 {
        return 0.0;
    }
    -(delta_y / WHEEL_PX_PER_ZOOM_LEVEL) / zoom_delta
}

fn exceeds_drag_threshold(start: Position, current: Position) -> bool {
    (current.x - start.x).abs() > DRAG_THRESHOLD || (current.y - start.y).abs() > DRAG_THRESHOLD
}

fn point_distance(a: Position, b: Position) -> f64 {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    (dx * dx + dy * dy).sqrt()
}

fn midpoint(a: Position, b: Position) -> Position {
    Position::new((a.x + b.x) / 2.0, (a.y + b.y) / 2.0)
}

fn exceeds_touch_threshold(start: Position, current: Position) -> bool {
    point_distance(start, current) > TOUCH_DRAG_THRESHOLD
}

/// Zoom deltas covered by a pinch from `start_distance` to `distance`.
/// Doubling the finger spread zooms in one whole level.
fn pinch_steps(start_distance: f64, distance: f64, zoom_delta: f64) -> f64 {
    if start_distance < MIN_PINCH_DISTANCE || distance < MIN_PINCH_DISTANCE || zoom_delta <= 0.0 {
        return 0.0;
    }
    (distance / start_distance).log2() / zoom_delta
}

/// Whole steps of a pinch not yet sent to the surface. The engine snaps zoom,
/// so fractions stay pending until they add up.
fn unapplied_pinch_steps(total: f64, applied: f64) -> f64 {
    (total - applied).trunc()
}

/// Delay before deferred mount attempt `attempt` (1-based): doubles up to a ceiling.
fn mount_retry_delay_ms(attempt: u32) -> u32 {
    let shift = attempt.saturating_sub(1).min(5);
    (MOUNT_RETRY_MS << shift).min(MOUNT_RETRY_MAX_MS)
}

fn touch_positions(touches: &[TouchPoint]) -> Vec<Position> {
    touches
        .iter()
        .map(|t| {
            let client = t.client_coordinates();
            Position::new(client.x, client.y)
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Surface plumbing
// ---------------------------------------------------------------------------

/// Forward one host event to the surface under the token it was bound with.
fn forward(mut surface: Signal<Surface>, token: Option<SurfaceToken>, event: SurfaceEvent) {
    let Some(token) = token else { return };
    if let Err(err) = surface.write().dispatch(token, event) {
        log::trace!("dropped map event: {err}");
    }
}

/// Mount once the container has a real size, polling while layout settles.
///
/// Keeps waiting for as long as the component lives; the task is cancelled
/// with its scope.
async fn mount_when_ready(
    mut surface: Signal<Surface>,
    mut selection: Signal<SelectionStore>,
    mut readout: Signal<Option<(i64, i64)>>,
    mut token: Signal<Option<SurfaceToken>>,
    document: Rc<MapDocument>,
) {
    let mut attempt = 0u32;
    loop {
        attempt = attempt.saturating_add(1);
        let container = coords::element_size(MAP_CONTAINER_ID);
        let result = surface.write().mount(
            container,
            &document.image,
            &document.markers,
            &document.view,
            ViewportEngine::new,
        );
        match result {
            Ok(MountStatus::Mounted(mounted)) => {
                let mut guard = surface.write();
                guard.on_pointer_move(move |x, y| readout.set(Some((x, y))));
                guard.on_marker_click(move |marker| selection.write().select(marker.clone()));
                drop(guard);
                token.set(Some(mounted));
                return;
            }
            Ok(MountStatus::AlreadyMounted(current)) => {
                token.set(Some(current));
                return;
            }
            Err(SurfaceError::MountRace) => {
                if attempt == MOUNT_WARN_AFTER {
                    log::warn!("map container still has no usable size, waiting for layout");
                } else {
                    log::debug!("map container not ready, deferring mount (attempt {attempt})");
                }
                TimeoutFuture::new(mount_retry_delay_ms(attempt)).await;
            }
            Err(err) => {
                log::warn!("map mount failed: {err}");
                return;
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Component
// ---------------------------------------------------------------------------

#[component]
pub fn MapView(
    document: Rc<MapDocument>,
    surface: Signal<Surface>,
    selection: Signal<SelectionStore>,
    readout: Signal<Option<(i64, i64)>>,
) -> Element {
    let mut token = use_signal(|| None::<SurfaceToken>);
    let mut is_dragging = use_signal(|| false);
    let mut did_drag = use_signal(|| false);
    let mut drag_start = use_signal(Position::default);
    let mut last_pointer = use_signal(Position::default);

    // Touch state
    let mut touch_start = use_signal(|| None::<Position>);
    let mut touch_last = use_signal(Position::default);
    let mut touch_did_pan = use_signal(|| false);
    let mut is_pinching = use_signal(|| false);
    let mut pinch_start_distance = use_signal(|| 0.0_f64);
    let mut pinch_applied = use_signal(|| 0.0_f64);
    let mut pinch_anchor = use_signal(Position::default);

    use_drop(move || {
        if let Ok(mut surface) = surface.try_write() {
            surface.unmount();
        }
    });

    let zoom_delta = document.view.zoom_delta;
    let mount_document = document.clone();

    let state = surface.read();
    let engine = state.engine();
    let animated = engine.is_some_and(|e| e.is_pan_animated());
    let image_style = engine
        .and_then(|e| e.image_rect())
        .map(|r| {
            format!(
                "left:{}px;top:{}px;width:{}px;height:{}px;",
                r.left, r.top, r.width, r.height
            )
        })
        .unwrap_or_else(|| "display:none;".to_string());
    let image_loaded = engine
        .and_then(|e| e.image())
        .is_some_and(|layer| layer.loaded);
    let selected_id = selection.read().selected().map(|m| m.id.clone());

    let pins: Vec<Pin> = engine
        .map(|e| {
            e.marker_screen_positions()
                .filter_map(|(id, at)| {
                    let marker = document.find_marker(id)?;
                    Some(Pin {
                        id: id.to_string(),
                        title: marker.title.clone(),
                        style: format!("left:{}px;top:{}px;", at.x, at.y),
                        selected: selected_id.as_deref() == Some(id),
                    })
                })
                .collect()
        })
        .unwrap_or_default();
    let popup = pins
        .iter()
        .find(|pin| pin.selected)
        .and_then(|pin| Some((document.find_marker(&pin.id)?.clone(), pin.style.clone())));
    drop(state);

    let pane_class = if animated { "map-pane animated" } else { "map-pane" };
    let container_class = if *is_dragging.read() && *did_drag.read() {
        "map-container dragging"
    } else {
        "map-container"
    };
    let image_class = if image_loaded { "map-image" } else { "map-image loading" };

    rsx! {
        div {
            id: MAP_CONTAINER_ID,
            class: "{container_class}",

            onmounted: move |_| {
                let document = mount_document.clone();
                spawn(mount_when_ready(surface, selection, readout, token, document));
            },

            onwheel: move |evt: Event<WheelData>| {
                evt.prevent_default();
                let steps = wheel_steps(wheel_delta_y(evt.data().delta()), zoom_delta);
                if steps == 0.0 {
                    return;
                }
                let client = evt.data().client_coordinates();
                let Some(anchor) = coords::client_to_element(client.x, client.y, MAP_CONTAINER_ID) else {
                    return;
                };
                forward(surface, *token.peek(), SurfaceEvent::Wheel { anchor, steps });
            },

            onmousedown: move |evt: Event<MouseData>| {
                if evt.trigger_button() != Some(MouseButton::Primary) {
                    return;
                }
                let client = evt.client_coordinates();
                let at = Position::new(client.x, client.y);
                is_dragging.set(true);
                did_drag.set(false);
                drag_start.set(at);
                last_pointer.set(at);
            },

            onmousemove: move |evt: Event<MouseData>| {
                let client = evt.client_coordinates();
                if let Some(screen) = coords::client_to_element(client.x, client.y, MAP_CONTAINER_ID) {
                    forward(surface, *token.peek(), SurfaceEvent::PointerMove { screen });
                }

                if !*is_dragging.peek() {
                    return;
                }
                let at = Position::new(client.x, client.y);
                if !*did_drag.peek() && exceeds_drag_threshold(*drag_start.peek(), at) {
                    did_drag.set(true);
                }
                if *did_drag.peek() {
                    let last = *last_pointer.peek();
                    forward(
                        surface,
                        *token.peek(),
                        SurfaceEvent::Drag { dx: at.x - last.x, dy: at.y - last.y },
                    );
                }
                last_pointer.set(at);
            },

            onmouseup: move |evt: Event<MouseData>| {
                let was_dragging = *is_dragging.peek();
                let was_drag = *did_drag.peek();
                is_dragging.set(false);
                did_drag.set(false);

                // A mouseup without drag movement = a click
                if was_dragging && !was_drag {
                    let client = evt.client_coordinates();
                    if let Some(screen) = coords::client_to_element(client.x, client.y, MAP_CONTAINER_ID) {
                        forward(surface, *token.peek(), SurfaceEvent::Click { screen });
                    }
                }
            },

            onmouseleave: move |_| {
                is_dragging.set(false);
                did_drag.set(false);
            },

            // --- Touch event handlers ---

            ontouchstart: move |evt: Event<TouchData>| {
                evt.prevent_default();
                let touches = touch_positions(&evt.data().touches());
                if touches.len() == 1 {
                    // Single finger: record start position for tap detection and panning
                    touch_start.set(Some(touches[0]));
                    touch_last.set(touches[0]);
                    touch_did_pan.set(false);
                } else if touches.len() >= 2 {
                    let mid = midpoint(touches[0], touches[1]);
                    let Some(anchor) = coords::client_to_element(mid.x, mid.y, MAP_CONTAINER_ID) else {
                        return;
                    };
                    is_pinching.set(true);
                    pinch_start_distance.set(point_distance(touches[0], touches[1]));
                    pinch_applied.set(0.0);
                    pinch_anchor.set(anchor);
                    // Cancel any tap tracking
                    touch_start.set(None);
                    touch_did_pan.set(true);
                }
            },

            ontouchmove: move |evt: Event<TouchData>| {
                evt.prevent_default();
                let touches = touch_positions(&evt.data().touches());

                if *is_pinching.peek() && touches.len() >= 2 {
                    let total = pinch_steps(
                        *pinch_start_distance.peek(),
                        point_distance(touches[0], touches[1]),
                        zoom_delta,
                    );
                    let steps = unapplied_pinch_steps(total, *pinch_applied.peek());
                    if steps != 0.0 {
                        let applied = *pinch_applied.peek() + steps;
                        pinch_applied.set(applied);
                        let anchor = *pinch_anchor.peek();
                        forward(surface, *token.peek(), SurfaceEvent::Wheel { anchor, steps });
                    }
                } else if touches.len() == 1 {
                    let Some(start) = *touch_start.peek() else { return };
                    let at = touches[0];
                    if !*touch_did_pan.peek() && exceeds_touch_threshold(start, at) {
                        touch_did_pan.set(true);
                    }
                    if *touch_did_pan.peek() {
                        let last = *touch_last.peek();
                        forward(
                            surface,
                            *token.peek(),
                            SurfaceEvent::Drag { dx: at.x - last.x, dy: at.y - last.y },
                        );
                    }
                    touch_last.set(at);
                }
            },

            ontouchend: move |evt: Event<TouchData>| {
                evt.prevent_default();
                let remaining = evt.data().touches().len();

                if *is_pinching.peek() {
                    // Wait for all fingers to lift before resetting pinch state
                    if remaining == 0 {
                        is_pinching.set(false);
                        touch_start.set(None);
                    }
                    return;
                }

                // Single-finger tap: no pan and all fingers up
                if remaining == 0 && !*touch_did_pan.peek() {
                    if let Some(start) = *touch_start.peek() {
                        if let Some(screen) = coords::client_to_element(start.x, start.y, MAP_CONTAINER_ID) {
                            forward(surface, *token.peek(), SurfaceEvent::Click { screen });
                        }
                    }
                }
                if remaining == 0 {
                    touch_start.set(None);
                }
            },

            ontouchcancel: move |_evt: Event<TouchData>| {
                touch_start.set(None);
                touch_did_pan.set(false);
                is_pinching.set(false);
            },

            div { class: "{pane_class}",
                img {
                    class: "{image_class}",
                    src: "{document.image.src}",
                    alt: "",
                    draggable: "false",
                    style: "{image_style}",
                    onload: move |_| forward(surface, *token.peek(), SurfaceEvent::ImageLoaded),
                }

                {pins.into_iter().map(|pin| {
                    let class = if pin.selected { "map-marker selected" } else { "map-marker" };
                    let id = pin.id.clone();
                    rsx! {
                        button {
                            key: "{pin.id}",
                            class: "{class}",
                            title: "{pin.title}",
                            style: "{pin.style}",
                            onmousedown: move |evt: Event<MouseData>| evt.stop_propagation(),
                            onmouseup: move |evt: Event<MouseData>| evt.stop_propagation(),
                            ontouchstart: move |evt: Event<TouchData>| evt.stop_propagation(),
                            ontouchend: move |evt: Event<TouchData>| evt.stop_propagation(),
                            onclick: move |evt: Event<MouseData>| {
                                evt.stop_propagation();
                                forward(surface, *token.peek(), SurfaceEvent::MarkerClick { id: id.clone() });
                            },
                        }
                    }
                })}

                if let Some((marker, style)) = popup {
                    div {
                        class: "map-popup",
                        style: "{style}",
                        onmousedown: move |evt: Event<MouseData>| evt.stop_propagation(),
                        ontouchstart: move |evt: Event<TouchData>| evt.stop_propagation(),
                        h3 { "{marker.title}" }
                        if !marker.description.is_empty() {
                            p { "{marker.description}" }
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wheel_delta_units() {
        assert!((wheel_delta_y(WheelDelta::pixels(0.0, 30.0, 0.0)) - 30.0).abs() < 1e-9);
        assert!((wheel_delta_y(WheelDelta::lines(0.0, 3.0, 0.0)) - 120.0).abs() < 1e-9);
        assert!((wheel_delta_y(WheelDelta::pages(0.0, -1.0, 0.0)) + 400.0).abs() < 1e-9);
    }

    #[test]
    fn test_wheel_up_zooms_in() {
        // One full level at a 0.1 zoom delta is ten steps.
        assert!((wheel_steps(-60.0, 0.1) - 10.0).abs() < 1e-9);
        assert!((wheel_steps(120.0, 0.1) + 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_wheel_steps_ignore_degenerate_input() {
        assert_eq!(wheel_steps(0.0, 0.1), 0.0);
        assert_eq!(wheel_steps(60.0, 0.0), 0.0);
    }

    #[test]
    fn test_touch_threshold() {
        let start = Position::new(50.0, 50.0);
        // 6 px diagonal: past the mouse threshold on one axis but still a tap.
        assert!(!exceeds_touch_threshold(start, Position::new(54.0, 54.0)));
        assert!(exceeds_touch_threshold(start, Position::new(57.0, 55.0)));
        assert!(exceeds_drag_threshold(start, Position::new(54.0, 54.0)));
    }

    #[test]
    fn test_point_distance_and_midpoint() {
        let a = Position::new(0.0, 0.0);
        let b = Position::new(30.0, 40.0);
        assert!((point_distance(a, b) - 50.0).abs() < 1e-9);
        assert_eq!(midpoint(a, b), Position::new(15.0, 20.0));
    }

    #[test]
    fn test_pinch_spread_zooms_in() {
        // Doubling the spread is one level, ten steps at a 0.1 delta.
        assert!((pinch_steps(100.0, 200.0, 0.1) - 10.0).abs() < 1e-9);
        assert!((pinch_steps(200.0, 100.0, 0.1) + 10.0).abs() < 1e-9);
        assert_eq!(pinch_steps(100.0, 100.0, 0.1), 0.0);
    }

    #[test]
    fn test_pinch_ignores_degenerate_input() {
        assert_eq!(pinch_steps(0.5, 200.0, 0.1), 0.0);
        assert_eq!(pinch_steps(100.0, 0.0, 0.1), 0.0);
        assert_eq!(pinch_steps(100.0, 200.0, 0.0), 0.0);
    }

    #[test]
    fn test_pinch_steps_accumulate() {
        assert_eq!(unapplied_pinch_steps(0.7, 0.0), 0.0);
        assert_eq!(unapplied_pinch_steps(2.4, 0.0), 2.0);
        assert_eq!(unapplied_pinch_steps(2.4, 2.0), 0.0);
        assert_eq!(unapplied_pinch_steps(3.1, 2.0), 1.0);
        assert_eq!(unapplied_pinch_steps(-1.5, 0.0), -1.0);
    }

    #[test]
    fn test_mount_retry_never_gives_up() {
        assert_eq!(mount_retry_delay_ms(1), 50);
        assert_eq!(mount_retry_delay_ms(2), 100);
        assert_eq!(mount_retry_delay_ms(5), 800);
        assert_eq!(mount_retry_delay_ms(6), 1000);
        // Far past the warning point the task still schedules another attempt.
        assert_eq!(mount_retry_delay_ms(MOUNT_WARN_AFTER * 100), 1000);
        assert_eq!(mount_retry_delay_ms(u32::MAX), 1000);
    }

    #[test]
    fn test_drag_threshold() {
        let start = Position::new(100.0, 100.0);
        assert!(!exceeds_drag_threshold(start, Position::new(102.0, 98.0)));
        assert!(exceeds_drag_threshold(start, Position::new(104.0, 100.0)));
        assert!(exceeds_drag_threshold(start, Position::new(100.0, 96.5)));
    }
}
