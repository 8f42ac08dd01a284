//! View model derived from [`BrowserState`] for rendering.

use serde::Serialize;

use crate::backend::StrategyToggle;
use crate::filter::{FilterCategory, FilterValue};
use crate::packer::{card_size, fit};
use crate::types::Image;
use crate::viewport::SizeClass;
use crate::windowing::page_size;

use super::model::BrowserState;

// ============================================================================
// View Model Types
// ============================================================================

/// Everything a renderer needs, computed deterministically from state
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BrowserViewModel {
    pub size_class: SizeClass,
    pub gallery: GalleryViewModel,
    pub recommendations: RecommendationsViewModel,
    pub filters: FilterPanelViewModel,
    pub strategies: StrategyToggle,
    pub query: Option<String>,
    pub search_performed: bool,
    pub last_error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GalleryViewModel {
    /// Images on the active page
    pub images: Vec<Image>,
    pub page: usize,
    pub total_pages: usize,
    pub page_size: usize,
    pub has_previous: bool,
    pub has_next: bool,
    /// Zero pages render as "no results" rather than a pagination control
    pub show_pagination: bool,
    pub no_results: bool,
    pub loading: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecommendationsViewModel {
    /// The leading cards that fit in the measured pane
    pub cards: Vec<Image>,
    /// Square card edge in px
    pub card_size: f32,
    /// Accepted recommendations that did not fit
    pub hidden_count: usize,
    pub loading: bool,
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterPanelViewModel {
    pub sections: Vec<FilterSectionViewModel>,
    pub has_active_filters: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterSectionViewModel {
    pub category: FilterCategory,
    pub expanded: bool,
    pub options: Vec<FilterOptionViewModel>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterOptionViewModel {
    pub value: FilterValue,
    pub label: String,
    pub selected: bool,
}

// ============================================================================
// Computation
// ============================================================================

pub fn compute_view_model(state: &BrowserState) -> BrowserViewModel {
    let size_class = state.size_class();
    let slice = state.visible();

    let gallery = GalleryViewModel {
        images: slice.images.to_vec(),
        page: slice.page,
        total_pages: slice.total_pages,
        page_size: page_size(size_class),
        has_previous: slice.has_previous(),
        has_next: slice.has_next(),
        show_pagination: slice.total_pages > 0,
        no_results: state.displayed.is_empty() && !state.loading_images,
        loading: state.loading_images,
    };

    let cards = fit(state.pane, &state.recommendations, &state.layout.cards);
    let recommendations = RecommendationsViewModel {
        cards: cards.to_vec(),
        card_size: card_size(state.pane.width, &state.layout.cards),
        hidden_count: state.recommendations.len() - cards.len(),
        loading: state.loading_recommendations,
        enabled: state.recommendations_enabled(),
    };

    let sections = FilterCategory::ALL
        .into_iter()
        .map(|category| FilterSectionViewModel {
            category,
            expanded: state.expanded.is_expanded(category),
            options: category
                .options()
                .into_iter()
                .map(|value| FilterOptionViewModel {
                    value,
                    label: value.to_string(),
                    selected: state.selection.is_selected(category, value),
                })
                .collect(),
        })
        .collect();

    BrowserViewModel {
        size_class,
        gallery,
        recommendations,
        filters: FilterPanelViewModel {
            sections,
            has_active_filters: !state.selection.is_empty(),
        },
        strategies: state.strategies,
        query: state.query.clone(),
        search_performed: state.search_performed,
        last_error: state.last_error.clone(),
    }
}
