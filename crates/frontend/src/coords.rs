use pixelmap_shared::models::{Position, Size};

/// Convert client (viewport) coordinates to container-relative pixel coordinates.
pub fn client_to_container(client_x: f64, client_y: f64, rect_left: f64, rect_top: f64) -> Position {
    Position::new(client_x - rect_left, client_y - rect_top)
}

/// Bounding client rect of an element, if it is in the document.
pub fn element_rect(element_id: &str) -> Option<web_sys::DomRect> {
    let document = web_sys::window()?.document()?;
    let element = document.get_element_by_id(element_id)?;
    Some(element.get_bounding_client_rect())
}

/// Rendered size of an element. `None` until the element exists.
pub fn element_size(element_id: &str) -> Option<Size> {
    element_rect(element_id).map(|rect| Size::new(rect.width(), rect.height()))
}

/// Client coordinates relative to an element's top-left corner.
pub fn client_to_element(client_x: f64, client_y: f64, element_id: &str) -> Option<Position> {
    let rect = element_rect(element_id)?;
    Some(client_to_container(client_x, client_y, rect.left(), rect.top()))
}
