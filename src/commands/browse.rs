//! `browse`: run one browsing session against the backend and print the
//! resulting view.

use owo_colors::OwoColorize;
use url::Url;

use super::CommandOutput;
use crate::backend::{Backend, HttpBackend};
use crate::browser::{Browser, BrowserAction, BrowserState, BrowserViewModel};
use crate::cli::OutputOptions;
use crate::config::Config;
use crate::error::Result;
use crate::filter::{FilterCategory, FilterValue};
use crate::packer::BoxSize;
use crate::types::Image;

/// Steps to replay after startup, in order: search, filter, page
#[derive(Debug, Clone, Default)]
pub struct BrowseOptions {
    pub width: Option<f32>,
    pub search: Option<String>,
    pub filters: Vec<(FilterCategory, FilterValue)>,
    pub page: Option<usize>,
    pub pane: Option<BoxSize>,
}

pub async fn cmd_browse(options: BrowseOptions, output: OutputOptions) -> Result<()> {
    let config = Config::load()?;
    let backend = HttpBackend::from_config(&config)?;
    let images_base = backend.endpoints().images()?;
    tracing::info!("Browsing puzzles at {}", backend.endpoints().base());

    let mut state = BrowserState::new(config.layout, config.strategy);
    if let Some(width) = options.width {
        state = state.with_viewport_width(width);
    }
    if let Some(pane) = options.pane {
        state = state.with_pane(pane);
    }

    let mut browser = Browser::new(backend, state);
    run_session(&mut browser, options).await;

    let view = browser.view();
    let text = format_view(&view, &images_base);
    CommandOutput::new(serde_json::to_value(&view)?)
        .with_text(text)
        .print(output)
}

/// Replay the requested actions, letting every request finish before the
/// next step so each step sees the previous step's results.
async fn run_session<B: Backend>(browser: &mut Browser<B>, options: BrowseOptions) {
    browser.dispatch(BrowserAction::Startup);
    browser.settle().await;

    if let Some(query) = options.search {
        browser.dispatch(BrowserAction::Search(query));
        browser.settle().await;
    }

    if !options.filters.is_empty() {
        for (category, value) in options.filters {
            browser.dispatch(BrowserAction::ToggleFilterValue(category, value));
        }
        browser.dispatch(BrowserAction::ApplyFilter);
        browser.settle().await;
    }

    if let Some(page) = options.page {
        browser.dispatch(BrowserAction::GoToPage(page));
        browser.settle().await;
    }
}

fn image_line(image: &Image, images_base: &Url) -> String {
    let url = image
        .image_url(images_base)
        .map(|url| url.to_string())
        .unwrap_or_else(|_| image.display_ref.clone());
    let feature = image
        .metadata
        .as_ref()
        .and_then(|m| m.dominant_feature.as_deref())
        .map(|f| format!(" ({f})"))
        .unwrap_or_default();
    let id = format!("{:10}", image.id.as_str());
    format!("  {} {}{}", id.cyan(), url.dimmed(), feature)
}

/// Render a view model as text
pub fn format_view(view: &BrowserViewModel, images_base: &Url) -> String {
    let mut out = String::new();
    let gallery = &view.gallery;

    let heading = match &view.query {
        Some(query) => format!("Results for \"{query}\""),
        None => "All puzzles".to_string(),
    };
    out.push_str(&format!("{}\n", heading.cyan().bold()));

    if gallery.no_results {
        out.push_str(&format!("  {}\n", "No results".dimmed()));
    } else {
        for image in &gallery.images {
            out.push_str(&image_line(image, images_base));
            out.push('\n');
        }
    }
    if gallery.show_pagination {
        out.push_str(&format!(
            "{}\n",
            format!(
                "Page {}/{} ({}, {} per page)",
                gallery.page, gallery.total_pages, view.size_class, gallery.page_size
            )
            .dimmed()
        ));
    }

    let active: Vec<String> = view
        .filters
        .sections
        .iter()
        .filter_map(|section| {
            let selected: Vec<&str> = section
                .options
                .iter()
                .filter(|o| o.selected)
                .map(|o| o.label.as_str())
                .collect();
            (!selected.is_empty()).then(|| format!("{}={}", section.category, selected.join(",")))
        })
        .collect();
    if !active.is_empty() {
        out.push_str(&format!("\n{}: {}\n", "filters".cyan(), active.join(" ")));
    }

    let recs = &view.recommendations;
    if recs.enabled {
        out.push_str(&format!(
            "\n{} {}\n",
            "Recommended".cyan().bold(),
            format!("(via {})", view.strategies.recommendations).dimmed()
        ));
        if recs.cards.is_empty() {
            out.push_str(&format!("  {}\n", "No recommendations".dimmed()));
        }
        for image in &recs.cards {
            out.push_str(&image_line(image, images_base));
            out.push('\n');
        }
        if recs.hidden_count > 0 {
            out.push_str(&format!(
                "  {}\n",
                format!("{} more not shown", recs.hidden_count).dimmed()
            ));
        }
    }

    if let Some(error) = &view.last_error {
        out.push_str(&format!("\n{} {error}\n", "error:".red()));
    }

    out.trim_end().to_string()
}
