//! Configuration commands for managing browser settings.
//!
//! - `config show`: Display current configuration
//! - `config get`: Print a single value
//! - `config set`: Set a configuration value

use owo_colors::OwoColorize;
use serde_json::json;

use super::CommandOutput;
use crate::cli::OutputOptions;
use crate::config::{BACKEND_URL_ENV_VAR, Config};
use crate::error::{BrowserError, Result};

/// Reject underscore notation for keys that use dots (e.g. `backend_url`)
fn validate_config_key(key: &str) -> Result<&str> {
    if key.contains('.') {
        return Ok(key);
    }
    if let Some(pos) = key.find('_') {
        let dot_version = format!("{}.{}", &key[..pos], &key[pos + 1..]);
        return Err(BrowserError::Config(format!(
            "invalid config key '{key}'. Use dot notation: '{dot_version}'"
        )));
    }
    Ok(key)
}

/// Show current configuration
pub fn cmd_config_show(output: OutputOptions) -> Result<()> {
    let config = Config::load()?;
    let effective_url = config.backend_url();
    let url_overridden = effective_url != config.backend.base_url;

    let json_output = json!({
        "backend": {
            "url": config.backend.base_url,
            "effective_url": effective_url,
            "timeout_secs": config.backend.timeout_secs,
            "connect_timeout_secs": config.backend.connect_timeout_secs,
        },
        "strategy": config.strategy,
        "layout": config.layout,
        "config_file": Config::config_path().to_string_lossy(),
    });

    let mut text_output = String::new();
    text_output.push_str(&format!("{}\n\n", "Configuration:".cyan().bold()));

    text_output.push_str(&format!("{}:\n", "backend".cyan()));
    text_output.push_str(&format!("  url: {}\n", config.backend.base_url));
    if url_overridden {
        text_output.push_str(&format!(
            "  {}\n",
            format!("overridden by {BACKEND_URL_ENV_VAR}: {effective_url}").yellow()
        ));
    }
    text_output.push_str(&format!("  timeout: {}s\n", config.backend.timeout_secs));
    text_output.push_str(&format!(
        "  connect_timeout: {}s\n",
        config.backend.connect_timeout_secs
    ));

    text_output.push('\n');
    text_output.push_str(&format!("{}:\n", "strategy".cyan()));
    text_output.push_str(&format!("  recommendations: {}\n", config.strategy.recommendations));
    text_output.push_str(&format!("  game_state: {}\n", config.strategy.game_state));

    text_output.push('\n');
    let breakpoints = config.layout.breakpoints;
    let cards = config.layout.cards;
    text_output.push_str(&format!("{}:\n", "layout".cyan()));
    text_output.push_str(&format!(
        "  breakpoints: sm {} / md {} / lg {}\n",
        breakpoints.sm, breakpoints.md, breakpoints.lg
    ));
    text_output.push_str(&format!(
        "  cards: {}-{}px, gap {}px, padding {}px\n",
        cards.min_size, cards.max_size, cards.gap, cards.padding
    ));

    text_output.push('\n');
    text_output.push_str(&format!(
        "{}",
        format!("Config file: {}", Config::config_path().display()).dimmed()
    ));

    CommandOutput::new(json_output)
        .with_text(text_output)
        .print(output)
}

/// Get a specific configuration value
pub fn cmd_config_get(key: &str, output: OutputOptions) -> Result<()> {
    validate_config_key(key)?;

    let config = Config::load()?;
    let value = config.get(key)?;

    let json_output = json!({
        "key": key,
        "value": value,
    });

    CommandOutput::new(json_output).with_text(value).print(output)
}

/// Set a configuration value
pub fn cmd_config_set(key: &str, value: &str, output: OutputOptions) -> Result<()> {
    validate_config_key(key)?;

    let mut config = Config::load()?;
    config.set(key, value)?;
    config.save()?;
    let stored = config.get(key)?;

    let json_output = json!({
        "action": "config_set",
        "key": key,
        "value": stored,
        "success": true,
    });
    let text_output = format!("Set {} to {}", key.cyan(), stored);

    CommandOutput::new(json_output)
        .with_text(text_output)
        .print(output)
}
