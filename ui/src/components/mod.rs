pub mod saved_segments;
pub mod segment_modal;
pub mod status_overlay;

use leptos::prelude::*;

/// Asks the segment form to open a saved segment for editing.
///
/// The list view writes an id here; the form picks it up and clears it.
#[derive(Debug, Clone, Copy)]
pub struct EditRequest(pub RwSignal<Option<String>>);

impl EditRequest {
    pub fn new() -> Self {
        Self(RwSignal::new(None))
    }

    pub fn request(&self, id: String) {
        self.0.set(Some(id));
    }
}

impl Default for EditRequest {
    fn default() -> Self {
        Self::new()
    }
}
