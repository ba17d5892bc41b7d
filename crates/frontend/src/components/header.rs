use dioxus::prelude::*;

use crate::Route;

pub const SITE_TITLE: &str = "NormHub";

#[component]
pub fn Header() -> Element {
    rsx! {
        header { class: "site-header",
            Link { class: "site-title", to: Route::Home {}, "{SITE_TITLE}" }
            nav { class: "site-nav",
                Link { to: Route::Home {}, active_class: "active", "Home" }
                Link { to: Route::WorldMap {}, active_class: "active", "Map" }
            }
        }
    }
}
