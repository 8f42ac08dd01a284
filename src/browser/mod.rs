//! Puzzle browsing session: state, transitions, view model and runtime.
//!
//! The state machine in [`model`] is pure. [`runtime::Browser`] owns a
//! backend and feeds its completions back through the same transitions.

pub mod model;
pub mod runtime;
pub mod view;


pub use model::{
    BackendRequest, BrowserAction, BrowserState, Completion, ImageSource, apply_completion,
    reduce_browser_state,
};
pub use runtime::Browser;
pub use view::{
    BrowserViewModel, FilterOptionViewModel, FilterPanelViewModel, FilterSectionViewModel,
    GalleryViewModel, RecommendationsViewModel, compute_view_model,
};
