//! Browser state, actions and the pure transition functions over them.
//!
//! All mutable browsing state lives in one [`BrowserState`] value. User
//! actions go through [`reduce_browser_state`] and network completions go
//! through [`apply_completion`]. Both return the new state together with the
//! backend requests to issue, so the whole coordination logic is testable
//! without a runtime or a backend.

use serde::Serialize;
use tracing::{debug, warn};

use crate::backend::{Strategy, StrategyToggle};
use crate::config::LayoutSettings;
use crate::error::{BrowserError, Result};
use crate::filter::{ExpandedSections, FilterCategory, FilterSelection, FilterValue};
use crate::packer::BoxSize;
use crate::types::{Image, PuzzleId, ids_of};
use crate::viewport::SizeClass;
use crate::windowing::{PageSlice, Pager, visible_slice};

// ============================================================================
// State Types
// ============================================================================

/// Single source of truth for a browsing session
#[derive(Debug, Clone, Serialize)]
pub struct BrowserState {
    // Image sets
    /// Initial unfiltered listing, fetched once at startup
    pub original: Vec<Image>,
    /// Latest accepted search result
    pub search_result: Vec<Image>,
    /// What the gallery renders: the latest search or filter output, else `original`
    pub displayed: Vec<Image>,
    /// Latest accepted recommendation list
    pub recommendations: Vec<Image>,

    // Filter panel
    /// Pending filter selection, applied by [`BrowserAction::ApplyFilter`]
    pub selection: FilterSelection,
    pub expanded: ExpandedSections,

    // Layout
    pub pager: Pager,
    /// Observed viewport width in px
    pub viewport_width: f32,
    /// Measured box of the recommendation pane
    pub pane: BoxSize,
    pub layout: LayoutSettings,

    // Routing
    pub strategies: StrategyToggle,

    // Session flags
    pub search_performed: bool,
    pub filter_performed: bool,
    /// Query of the latest accepted search
    pub query: Option<String>,

    // In-flight tracking
    pub loading_images: bool,
    pub loading_recommendations: bool,
    /// Epoch of the latest issued image request (initial, search or filter)
    pub images_epoch: u64,
    /// Epoch of the latest recommendation-triggering event
    pub recommendation_epoch: u64,
    /// Visible id set the latest recommendation request was keyed on
    pub recommendation_key: Option<Vec<PuzzleId>>,

    /// Message of the most recent failed request
    pub last_error: Option<String>,
}

impl Default for BrowserState {
    fn default() -> Self {
        Self::new(LayoutSettings::default(), StrategyToggle::default())
    }
}

impl BrowserState {
    /// Fresh state. The viewport starts at the widest size class until the
    /// first measurement arrives.
    pub fn new(layout: LayoutSettings, strategies: StrategyToggle) -> Self {
        Self {
            original: Vec::new(),
            search_result: Vec::new(),
            displayed: Vec::new(),
            recommendations: Vec::new(),
            selection: FilterSelection::new(),
            expanded: ExpandedSections::default(),
            pager: Pager::default(),
            viewport_width: layout.breakpoints.lg,
            pane: BoxSize::default(),
            layout,
            strategies,
            search_performed: false,
            filter_performed: false,
            query: None,
            loading_images: false,
            loading_recommendations: false,
            images_epoch: 0,
            recommendation_epoch: 0,
            recommendation_key: None,
            last_error: None,
        }
    }

    pub fn with_viewport_width(mut self, width: f32) -> Self {
        self.viewport_width = width;
        self
    }

    pub fn with_pane(mut self, pane: BoxSize) -> Self {
        self.pane = pane;
        self
    }

    pub fn size_class(&self) -> SizeClass {
        self.layout.breakpoints.classify(self.viewport_width)
    }

    /// The active page of `displayed`
    pub fn visible(&self) -> PageSlice<'_> {
        visible_slice(&self.displayed, self.size_class(), self.pager.current_page())
    }

    /// Recommendations follow the visible page once the user has searched
    /// or filtered at least once. Browsing the initial listing never
    /// fetches them.
    pub fn recommendations_enabled(&self) -> bool {
        self.search_performed || self.filter_performed
    }

    /// Candidates a filter is applied against
    pub fn base_set(&self) -> &[Image] {
        if self.search_performed {
            &self.search_result
        } else {
            &self.original
        }
    }

    fn clamp_page(&mut self) {
        let total = self.visible().total_pages;
        self.pager.clamp(total);
    }
}

// ============================================================================
// Action Types
// ============================================================================

/// Discrete user and browser events
#[derive(Debug, Clone, PartialEq)]
pub enum BrowserAction {
    /// Fetch the initial listing
    Startup,
    /// Submit a search query
    Search(String),
    /// Apply the pending filter selection to the base set
    ApplyFilter,
    /// Jump to a 1-based page
    GoToPage(usize),
    NextPage,
    PreviousPage,
    /// The viewport width changed
    Resize { width: f32 },
    /// The recommendation pane was measured
    RecommendationPaneResized(BoxSize),
    ToggleFilterValue(FilterCategory, FilterValue),
    ToggleSection(FilterCategory),
    ToggleRecommendationStrategy,
    ToggleGameStateStrategy,
}

/// Which request produced an image list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    Initial,
    /// Search for the carried query
    Search(String),
    Filter,
}

/// A backend request the runtime must issue, tagged with its epoch
#[derive(Debug, Clone, PartialEq)]
pub enum BackendRequest {
    Initial {
        epoch: u64,
    },
    Search {
        epoch: u64,
        query: String,
    },
    Filter {
        epoch: u64,
        filters: FilterSelection,
        puzzle_ids: Vec<PuzzleId>,
        game_state: Strategy,
    },
    Recommendations {
        epoch: u64,
        strategy: Strategy,
        puzzle_ids: Vec<PuzzleId>,
    },
}

/// A finished backend request, carrying the epoch it was issued with
#[derive(Debug)]
pub enum Completion {
    Images {
        source: ImageSource,
        epoch: u64,
        result: Result<Vec<Image>>,
    },
    Recommendations {
        epoch: u64,
        result: Result<Vec<Image>>,
    },
}

// ============================================================================
// Transitions
// ============================================================================

/// Apply a user action.
///
/// Pure: returns the new state and the backend requests it implies. Requests
/// are never issued for out-of-range navigation, blank queries or filters
/// over an empty base set.
pub fn reduce_browser_state(
    mut state: BrowserState,
    action: BrowserAction,
) -> (BrowserState, Vec<BackendRequest>) {
    let mut requests = Vec::new();

    match action {
        BrowserAction::Startup => {
            state.images_epoch += 1;
            state.loading_images = true;
            requests.push(BackendRequest::Initial {
                epoch: state.images_epoch,
            });
        }
        BrowserAction::Search(query) => {
            let query = query.trim();
            if query.is_empty() {
                debug!("Ignoring blank search query");
            } else {
                state.images_epoch += 1;
                state.loading_images = true;
                requests.push(BackendRequest::Search {
                    epoch: state.images_epoch,
                    query: query.to_string(),
                });
            }
        }
        BrowserAction::ApplyFilter => {
            let puzzle_ids = ids_of(state.base_set());
            if puzzle_ids.is_empty() {
                debug!("{}; filter not sent", BrowserError::EmptyBaseSet);
            } else {
                state.images_epoch += 1;
                state.loading_images = true;
                requests.push(BackendRequest::Filter {
                    epoch: state.images_epoch,
                    filters: state.selection.clone(),
                    puzzle_ids,
                    game_state: state.strategies.game_state,
                });
            }
        }
        BrowserAction::GoToPage(page) => {
            navigate(&mut state, &mut requests, page);
        }
        BrowserAction::NextPage => {
            let page = state.visible().page + 1;
            navigate(&mut state, &mut requests, page);
        }
        BrowserAction::PreviousPage => {
            let page = state.visible().page.saturating_sub(1);
            navigate(&mut state, &mut requests, page);
        }
        BrowserAction::Resize { width } => {
            if width.is_finite() {
                state.viewport_width = width.max(0.0);
                state.clamp_page();
                let visible = state.visible().ids();
                if state.recommendations_enabled()
                    && state.recommendation_key.as_ref() != Some(&visible)
                {
                    requests.extend(request_recommendations(&mut state));
                }
            }
        }
        BrowserAction::RecommendationPaneResized(pane) => {
            state.pane = pane;
        }
        BrowserAction::ToggleFilterValue(category, value) => {
            if let Err(e) = state.selection.toggle_value(category, value) {
                warn!("{e}");
                state.last_error = Some(e.to_string());
            }
        }
        BrowserAction::ToggleSection(category) => {
            state.expanded.toggle(category);
        }
        BrowserAction::ToggleRecommendationStrategy => {
            state.strategies.recommendations = state.strategies.recommendations.toggle();
        }
        BrowserAction::ToggleGameStateStrategy => {
            state.strategies.game_state = state.strategies.game_state.toggle();
        }
    }

    (state, requests)
}

/// Apply a finished request.
///
/// Replies whose epoch is no longer current are dropped: the latest issued
/// request wins, not the latest to arrive. Failures clear the matching
/// loading flag and keep whatever was already displayed.
pub fn apply_completion(
    mut state: BrowserState,
    completion: Completion,
) -> (BrowserState, Vec<BackendRequest>) {
    let mut requests = Vec::new();

    match completion {
        Completion::Images {
            source,
            epoch,
            result,
        } => {
            let current = epoch == state.images_epoch;
            match result {
                Ok(images) => match source {
                    ImageSource::Initial => accept_initial(&mut state, images, current, epoch),
                    _ if !current => {
                        debug!(
                            "{}",
                            BrowserError::StaleResponse {
                                epoch,
                                current: state.images_epoch
                            }
                        );
                    }
                    ImageSource::Search(query) => {
                        debug!("Search returned {} images", images.len());
                        state.loading_images = false;
                        state.last_error = None;
                        state.query = Some(query);
                        state.search_result = images.clone();
                        state.displayed = images;
                        state.search_performed = true;
                        state.selection.clear();
                        state.expanded.collapse_all();
                        state.pager.reset();
                        requests.extend(request_recommendations(&mut state));
                    }
                    ImageSource::Filter => {
                        debug!("Filter returned {} images", images.len());
                        state.loading_images = false;
                        state.last_error = None;
                        state.displayed = images;
                        state.filter_performed = true;
                        state.pager.reset();
                        requests.extend(request_recommendations(&mut state));
                    }
                },
                Err(e) => {
                    warn!("Failed to load images: {e}");
                    if current {
                        state.loading_images = false;
                        state.last_error = Some(e.to_string());
                    }
                }
            }
        }
        Completion::Recommendations { epoch, result } => {
            if epoch != state.recommendation_epoch {
                debug!(
                    "{}",
                    BrowserError::StaleResponse {
                        epoch,
                        current: state.recommendation_epoch
                    }
                );
                return (state, requests);
            }

            state.loading_recommendations = false;
            match result {
                Ok(images) => {
                    debug!("Accepted {} recommendations", images.len());
                    state.recommendations = images;
                    state.last_error = None;
                }
                Err(e) => {
                    warn!("Failed to load recommendations: {e}");
                    state.last_error = Some(e.to_string());
                }
            }
        }
    }

    (state, requests)
}

/// Store the initial listing.
///
/// The listing is always kept as the filter fallback. It replaces the
/// gallery when it is the latest image request, or when no search or filter
/// has been accepted yet.
fn accept_initial(state: &mut BrowserState, images: Vec<Image>, current: bool, epoch: u64) {
    state.original = images.clone();
    if current {
        state.loading_images = false;
        state.last_error = None;
        state.search_performed = false;
    } else {
        debug!(
            "Initial listing {epoch} arrived after image request {}",
            state.images_epoch
        );
    }
    if current || !(state.search_performed || state.filter_performed) {
        state.displayed = images;
        state.clamp_page();
    }
}

fn navigate(state: &mut BrowserState, requests: &mut Vec<BackendRequest>, page: usize) {
    let total = state.visible().total_pages;
    if !state.pager.go_to_page(page, total) {
        debug!("Page {page} outside 1..={total}; ignored");
        return;
    }
    if state.recommendations_enabled() {
        requests.extend(request_recommendations(state));
    }
}

/// Start a recommendation fetch for the current visible page.
///
/// Every call advances the epoch. An empty page clears the list instead of
/// sending a request, which also fences off replies still in flight.
fn request_recommendations(state: &mut BrowserState) -> Option<BackendRequest> {
    let puzzle_ids = state.visible().ids();
    state.recommendation_epoch += 1;
    state.recommendation_key = Some(puzzle_ids.clone());

    if puzzle_ids.is_empty() {
        state.recommendations.clear();
        state.loading_recommendations = false;
        return None;
    }

    state.loading_recommendations = true;
    Some(BackendRequest::Recommendations {
        epoch: state.recommendation_epoch,
        strategy: state.strategies.recommendations,
        puzzle_ids,
    })
}
