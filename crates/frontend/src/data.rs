use std::rc::Rc;

use pixelmap_shared::error::DataLoadError;
use pixelmap_shared::models::MapDocument;

/// The map document is compiled into the bundle and never changes at runtime.
const MAP_DOCUMENT: &str = include_str!("../assets/data.json");

pub type LoadedDocument = Result<Rc<MapDocument>, Rc<DataLoadError>>;

pub fn load_document() -> Result<MapDocument, DataLoadError> {
    parse_document(MAP_DOCUMENT)
}

fn parse_document(json: &str) -> Result<MapDocument, DataLoadError> {
    match MapDocument::from_json(json) {
        Ok(doc) => {
            log::info!(
                "loaded map {} with {} markers",
                doc.image.src,
                doc.markers.len()
            );
            Ok(doc)
        }
        Err(err) => {
            log::error!("map data is unusable: {err}");
            Err(err)
        }
    }
}
