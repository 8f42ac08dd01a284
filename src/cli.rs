use clap::{Parser, Subcommand};

use crate::filter::{FilterCategory, FilterValue};
use crate::packer::BoxSize;

#[derive(Parser)]
#[command(name = "puzzle-browser")]
#[command(about = "Browse, filter and get recommendations for chess puzzles")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Load puzzles, optionally search, filter and page, then print the view
    #[command(visible_alias = "b")]
    Browse {
        /// Viewport width in px (selects the page size)
        #[arg(long, value_parser = parse_width)]
        width: Option<f32>,

        /// Search query
        #[arg(short, long)]
        search: Option<String>,

        /// Filter value as category=value (e.g. rooks=2, pawns=9+, game_state=endgame).
        /// Repeatable; applied after the search
        #[arg(short, long = "filter", value_parser = parse_filter_arg)]
        filters: Vec<(FilterCategory, FilterValue)>,

        /// Page to show (1-based)
        #[arg(short, long)]
        page: Option<usize>,

        /// Recommendation pane size as WIDTHxHEIGHT in px (e.g. 350x900)
        #[arg(long, value_parser = parse_pane)]
        pane: Option<BoxSize>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Get a configuration value
    Get {
        /// Key: backend.url, backend.timeout, strategy.recommendations, strategy.game_state
        key: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Set a configuration value
    Set {
        /// Key: backend.url, backend.timeout, strategy.recommendations, strategy.game_state
        key: String,

        /// Value to store
        value: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

/// How a command prints its result
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputOptions {
    pub json: bool,
}

/// Parse `category=value`, checking the value is offered by the category
pub fn parse_filter_arg(s: &str) -> Result<(FilterCategory, FilterValue), String> {
    let (category, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected category=value, got '{s}'"))?;
    let category: FilterCategory = category.parse().map_err(|e| format!("{e}"))?;
    let value: FilterValue = value.parse().map_err(|e| format!("{e}"))?;
    if !category.accepts(value) {
        let options: Vec<String> = category.options().iter().map(|o| o.to_string()).collect();
        return Err(format!(
            "'{value}' is not a {category} option. Valid: {}",
            options.join(", ")
        ));
    }
    Ok((category, value))
}

/// Parse `WIDTHxHEIGHT` into a pane size
pub fn parse_pane(s: &str) -> Result<BoxSize, String> {
    let (width, height) = s
        .to_lowercase()
        .split_once('x')
        .map(|(w, h)| (w.trim().to_string(), h.trim().to_string()))
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{s}'"))?;
    let width = parse_width(&width)?;
    let height = parse_width(&height)?;
    Ok(BoxSize::new(width, height))
}

fn parse_width(s: &str) -> Result<f32, String> {
    match s.parse::<f32>() {
        Ok(v) if v.is_finite() && v >= 0.0 => Ok(v),
        _ => Err(format!("expected a non-negative number of pixels, got '{s}'")),
    }
}
