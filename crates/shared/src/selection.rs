use crate::models::{Marker, Position};

/// Which marker is selected, and whether the map still owes a pan to it.
///
/// The detail panel is visible exactly while a marker is selected.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectionStore {
    selected: Option<Marker>,
    pending_center: Option<Position>,
    detail_visible: bool,
}

impl SelectionStore {
    /// Select `marker`, replacing any previous selection in one step.
    pub fn select(&mut self, marker: Marker) {
        self.pending_center = Some(marker.coordinates);
        self.selected = Some(marker);
        self.detail_visible = true;
    }

    pub fn clear(&mut self) {
        self.selected = None;
        self.pending_center = None;
        self.detail_visible = false;
    }

    pub fn selected(&self) -> Option<&Marker> {
        self.selected.as_ref()
    }

    pub fn is_detail_visible(&self) -> bool {
        self.detail_visible
    }

    pub fn pending_center(&self) -> Option<Position> {
        self.pending_center
    }

    /// Hand out the pending pan target once.
    pub fn take_pending_center(&mut self) -> Option<Position> {
        self.pending_center.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn marker(id: &str, x: f64, y: f64) -> Marker {
        Marker {
            id: id.to_string(),
            title: id.to_uppercase(),
            description: String::new(),
            coordinates: Position::new(x, y),
            gallery: vec![],
        }
    }

    #[test]
    fn test_starts_empty() {
        let store = SelectionStore::default();
        assert!(store.selected().is_none());
        assert!(store.pending_center().is_none());
        assert!(!store.is_detail_visible());
    }

    #[test]
    fn test_select_sets_target_and_panel() {
        let mut store = SelectionStore::default();
        store.select(marker("mine", 40.0, 90.0));
        assert_eq!(store.selected().unwrap().id, "mine");
        assert_eq!(store.pending_center(), Some(Position::new(40.0, 90.0)));
        assert!(store.is_detail_visible());
    }

    #[test]
    fn test_pending_center_taken_once() {
        let mut store = SelectionStore::default();
        store.select(marker("mine", 40.0, 90.0));
        assert_eq!(store.take_pending_center(), Some(Position::new(40.0, 90.0)));
        assert_eq!(store.take_pending_center(), None);
        // The selection itself survives the pan.
        assert!(store.selected().is_some());
        assert!(store.is_detail_visible());
    }

    #[test]
    fn test_reselect_replaces() {
        let mut store = SelectionStore::default();
        store.select(marker("a", 1.0, 2.0));
        store.take_pending_center();
        store.select(marker("b", 3.0, 4.0));
        assert_eq!(store.selected().unwrap().id, "b");
        assert_eq!(store.pending_center(), Some(Position::new(3.0, 4.0)));
        assert!(store.is_detail_visible());
    }

    #[test]
    fn test_clear_resets_everything() {
        let mut store = SelectionStore::default();
        store.select(marker("a", 1.0, 2.0));
        store.clear();
        assert_eq!(store, SelectionStore::default());
    }
}
