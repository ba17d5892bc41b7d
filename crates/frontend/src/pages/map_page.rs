use std::rc::Rc;

use dioxus::prelude::*;
use pixelmap_shared::layout::{Layout, LayoutController, LayoutMode};
use pixelmap_shared::models::MapDocument;
use pixelmap_shared::selection::SelectionStore;

use crate::components::coord_readout::CoordReadout;
use crate::components::detail_panel::DetailPanel;
use crate::components::map_view::{MapView, Surface};
use crate::window::use_window_size;

fn map_style(layout: Option<&Layout>) -> String {
    match layout {
        Some(l) => format!("width:{}px;height:{}px;", l.map_width, l.map_height),
        None => String::new(),
    }
}

fn detail_style(layout: Option<&Layout>) -> String {
    match layout {
        Some(l) => match l.detail_height {
            Some(height) => format!("width:{}px;height:{}px;", l.detail_width, height),
            None => format!("width:{}px;", l.detail_width),
        },
        None => String::new(),
    }
}

#[component]
pub fn MapPage(document: Rc<MapDocument>) -> Element {
    let window_size = use_window_size();
    let mut selection = use_signal(SelectionStore::default);
    let mut surface = use_signal(Surface::new);
    let readout = use_signal(|| None::<(i64, i64)>);
    let layout_config = document.view.layout;
    let mut controller = use_signal(move || LayoutController::new(layout_config));
    let mut layout = use_signal(|| None::<Layout>);

    // Resize or selection change: recompute the layout, resize the surface,
    // then pan to a freshly selected marker.
    use_effect(move || {
        let window = *window_size.read();
        let mut store = selection.read().clone();
        let next = controller.write().update(window, &mut store, &mut *surface.write());
        if store != *selection.peek() {
            selection.set(store);
        }
        if next.is_some() && next != *layout.peek() {
            layout.set(next);
        }
    });

    let current = *layout.read();
    let page_class = match current.map(|l| l.mode) {
        Some(LayoutMode::Narrow) => "map-page narrow",
        _ => "map-page wide",
    };
    let map_style = map_style(current.as_ref());
    let detail_style = detail_style(current.as_ref());

    rsx! {
        main { class: "{page_class}",
            div { class: "map-frame", style: "{map_style}",
                MapView { document: document.clone(), surface, selection, readout }
                CoordReadout { position: readout }
            }
            DetailPanel { selection, style: detail_style }
        }
    }
}

/// Shown instead of the map when the bundled document cannot be used.
#[component]
pub fn LoadFailure(message: String) -> Element {
    rsx! {
        main { class: "load-failure",
            h2 { "The map could not be loaded" }
            p { class: "error", "{message}" }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pixelmap_shared::config::LayoutConfig;
    use pixelmap_shared::layout::compute_layout;
    use pixelmap_shared::models::Size;

    #[test]
    fn test_styles_follow_wide_layout() {
        let layout = compute_layout(&LayoutConfig::default(), Size::new(1024.0, 768.0), true).unwrap();
        assert_eq!(map_style(Some(&layout)), "width:640px;height:640px;");
        assert_eq!(detail_style(Some(&layout)), "width:320px;height:640px;");
    }

    #[test]
    fn test_narrow_detail_takes_natural_height() {
        let layout = compute_layout(&LayoutConfig::default(), Size::new(500.0, 900.0), true).unwrap();
        assert_eq!(detail_style(Some(&layout)), "width:436px;");
    }

    #[test]
    fn test_no_layout_yet() {
        assert_eq!(map_style(None), "");
        assert_eq!(detail_style(None), "");
    }
}
