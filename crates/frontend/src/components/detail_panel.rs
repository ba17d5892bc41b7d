use dioxus::prelude::*;
use pixelmap_shared::selection::SelectionStore;

#[component]
pub fn DetailPanel(selection: Signal<SelectionStore>, style: String) -> Element {
    let store = selection.read();
    let Some(marker) = store.selected().cloned() else {
        return rsx! {};
    };
    drop(store);

    rsx! {
        aside { class: "detail-panel", style: "{style}",
            div { class: "detail-header",
                h2 { "{marker.title}" }
                button {
                    class: "secondary",
                    title: "Close the panel and restore the full map",
                    onclick: move |_| selection.write().clear(),
                    "Restore"
                }
            }
            if !marker.description.is_empty() {
                p { class: "detail-description", "{marker.description}" }
            }
            if !marker.gallery.is_empty() {
                div { class: "detail-gallery",
                    for image in marker.gallery.iter() {
                        figure { key: "{image.src}",
                            img { src: "{image.src}", alt: "{image.caption}", loading: "lazy" }
                            if !image.caption.is_empty() {
                                figcaption { "{image.caption}" }
                            }
                        }
                    }
                }
            }
        }
    }
}
