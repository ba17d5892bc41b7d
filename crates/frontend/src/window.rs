//! Host window size as a reactive signal.
//!
//! The browser `resize` listener lives outside the Dioxus runtime, so it only
//! forwards sizes through a channel; a task inside the runtime applies them.

use std::rc::Rc;

use dioxus::prelude::*;
use futures::channel::mpsc;
use futures::StreamExt;
use pixelmap_shared::models::Size;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;

/// Current inner size of the browser window.
pub fn inner_size() -> Option<Size> {
    let window = web_sys::window()?;
    let width = window.inner_width().ok()?.as_f64()?;
    let height = window.inner_height().ok()?.as_f64()?;
    Some(Size::new(width, height))
}

/// A `resize` subscription on the window. Dropping it unsubscribes.
pub struct ResizeListener {
    closure: Closure<dyn FnMut(web_sys::Event)>,
}

impl ResizeListener {
    pub fn attach(mut on_resize: impl FnMut(Size) + 'static) -> Option<Self> {
        let window = web_sys::window()?;
        let closure = Closure::wrap(Box::new(move |_: web_sys::Event| {
            if let Some(size) = inner_size() {
                on_resize(size);
            }
        }) as Box<dyn FnMut(_)>);
        window
            .add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())
            .ok()?;
        Some(Self { closure })
    }
}

impl Drop for ResizeListener {
    fn drop(&mut self) {
        if let Some(window) = web_sys::window() {
            let _ = window
                .remove_event_listener_with_callback("resize", self.closure.as_ref().unchecked_ref());
        }
    }
}

/// Window size that follows browser resizes for as long as the calling
/// component is mounted.
pub fn use_window_size() -> Signal<Size> {
    let mut size = use_signal(|| inner_size().unwrap_or_default());

    use_hook(move || {
        let (tx, mut rx) = mpsc::unbounded::<Size>();
        spawn(async move {
            while let Some(next) = rx.next().await {
                if *size.peek() != next {
                    size.set(next);
                }
            }
        });
        let listener = ResizeListener::attach(move |next| {
            let _ = tx.unbounded_send(next);
        });
        if listener.is_none() {
            log::warn!("window resize events are unavailable; layout will not reflow");
        }
        Rc::new(listener)
    });

    size
}
