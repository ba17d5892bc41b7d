use dioxus::prelude::*;

/// Readout text for a pointer position. The map's vertical axis is the
/// game's Z axis.
pub fn format_readout(position: Option<(i64, i64)>) -> String {
    match position {
        Some((x, z)) => format!("X: {x}, Z: {z}"),
        None => "X: -, Z: -".to_string(),
    }
}

#[component]
pub fn CoordReadout(position: Signal<Option<(i64, i64)>>) -> Element {
    let text = format_readout(*position.read());
    rsx! {
        div { class: "coord-readout",
            span { class: "coord-tag", "{text}" }
        }
    }
}
