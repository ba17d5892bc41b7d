use dioxus::prelude::*;

use crate::Route;

#[component]
pub fn Welcome() -> Element {
    rsx! {
        main { class: "welcome",
            h1 { "Welcome" }
            p { "Browse the world map, hover to read coordinates and pick a marker to see its details." }
            Link { class: "button", to: Route::WorldMap {}, "Open the map" }
        }
    }
}
