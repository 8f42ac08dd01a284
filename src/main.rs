use clap::Parser;
use owo_colors::OwoColorize;
use std::process::ExitCode;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use puzzle_browser::cli::{Cli, Commands, ConfigAction, OutputOptions};
use puzzle_browser::commands::{
    BrowseOptions, cmd_browse, cmd_config_get, cmd_config_set, cmd_config_show,
};

/// Log to stderr so stdout carries only command output.
fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("puzzle_browser=info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Browse {
            width,
            search,
            filters,
            page,
            pane,
            json,
        } => {
            let options = BrowseOptions {
                width,
                search,
                filters,
                page,
                pane,
            };
            cmd_browse(options, OutputOptions { json }).await
        }
        Commands::Config { action } => match action {
            ConfigAction::Show { json } => cmd_config_show(OutputOptions { json }),
            ConfigAction::Get { key, json } => cmd_config_get(&key, OutputOptions { json }),
            ConfigAction::Set { key, value, json } => {
                cmd_config_set(&key, &value, OutputOptions { json })
            }
        },
    };

    match result {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", "error:".red(), e);
            ExitCode::FAILURE
        }
    }
}
