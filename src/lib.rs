pub mod backend;
pub mod browser;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod filter;
pub mod packer;
pub mod paths;
pub mod types;
pub mod viewport;
pub mod windowing;

#[cfg(test)]
mod test_guards;

pub use backend::{Backend, Endpoints, FilterRequest, HttpBackend, Strategy, StrategyToggle};
pub use browser::{
    Browser, BrowserAction, BrowserState, BrowserViewModel, apply_completion, compute_view_model,
    reduce_browser_state,
};
pub use config::Config;
pub use error::{BrowserError, Result};
pub use filter::{ExpandedSections, FilterCategory, FilterSelection, FilterValue, GamePhase};
pub use packer::{BoxSize, PackConstraints, fit};
pub use types::{Image, ImageMetadata, PuzzleId};
pub use viewport::{Breakpoints, SizeClass, classify};
pub use windowing::{PageSlice, Pager, page_size, visible_slice};
