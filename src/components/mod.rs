pub mod campaigns;
pub mod control_panel;
pub mod home_page;
pub mod policy;
pub mod state;

use dioxus::prelude::*;

use state::{StatePatch, ViewState};

/// Context handle to the view-state store. Components read through `view`;
/// all writes go through [`AppState::patch`] so every update is one atomic
/// merge-patch and one re-render.
#[derive(Clone, Copy)]
pub struct AppState {
    pub view: Signal<ViewState>,
}

impl AppState {
    pub fn patch(&mut self, patch: StatePatch) {
        patch.apply(&mut self.view.write());
    }
}
