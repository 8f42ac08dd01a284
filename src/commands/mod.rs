mod browse;
mod config;

pub use browse::{BrowseOptions, cmd_browse, format_view};
pub use config::{cmd_config_get, cmd_config_set, cmd_config_show};

use serde_json::Value;

use crate::cli::OutputOptions;
use crate::error::Result;

/// Command result with a JSON form and an optional human-readable form
pub struct CommandOutput {
    json: Value,
    text: Option<String>,
}

impl CommandOutput {
    pub fn new(json: Value) -> Self {
        Self { json, text: None }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Print as JSON when requested, otherwise as text (falling back to
    /// pretty JSON when no text form was given).
    pub fn print(self, output: OutputOptions) -> Result<()> {
        match self.text {
            Some(text) if !output.json => println!("{text}"),
            _ => println!("{}", serde_json::to_string_pretty(&self.json)?),
        }
        Ok(())
    }
}
