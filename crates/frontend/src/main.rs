mod components;
mod coords;
mod data;
mod pages;
mod window;

use std::rc::Rc;

use dioxus::prelude::*;

use crate::components::header::Header;
use crate::data::LoadedDocument;

#[derive(Routable, Clone, PartialEq)]
enum Route {
    #[layout(Shell)]
    #[route("/")]
    Home {},
    #[route("/map")]
    WorldMap {},
}

#[component]
fn Shell() -> Element {
    rsx! {
        Header {}
        Outlet::<Route> {}
    }
}

#[component]
fn Home() -> Element {
    rsx! {
        pages::welcome::Welcome {}
    }
}

#[component]
fn WorldMap() -> Element {
    match use_context::<LoadedDocument>() {
        Ok(document) => rsx! {
            pages::map_page::MapPage { document }
        },
        Err(err) => rsx! {
            pages::map_page::LoadFailure { message: err.to_string() }
        },
    }
}

const CSS: Asset = asset!("/assets/main.css");
const FAVICON: Asset = asset!("/assets/favicon.svg");

#[allow(non_snake_case)]
fn App() -> Element {
    // Parsed once for the whole session; every page reads the same copy.
    use_context_provider(|| -> LoadedDocument { data::load_document().map(Rc::new).map_err(Rc::new) });

    rsx! {
        document::Link { rel: "icon", r#type: "image/svg+xml", href: FAVICON }
        document::Stylesheet { href: CSS }
        Router::<Route> {}
    }
}

fn main() {
    console_error_panic_hook::set_once();
    if let Err(err) = console_log::init_with_level(log::Level::Info) {
        // No logger to report through, so write to the console directly.
        web_sys::console::warn_1(&format!("logging disabled: {err}").into());
    }
    launch(App);
}
