//! Scout CLI application
//!
//! Plans a research topic, gathers findings with web tools served by an MCP
//! server, and publishes a markdown report.
//!
//! # Installation
//!
//! ```bash
//! cargo install --path crates/scout-cli
//! ```
//!
//! # Usage
//!
//! - `scout "<topic>"` prints the report to stdout
//! - `scout "<topic>" --output report.md` writes it to a file
//! - `scout tools` lists the tools the MCP server exposes
//!
//! The tool server starts in the background on the first research turn.
//! Turns that find it not ready yet are retried (`--max-turns`,
//! `--retry-wait`) with the plan from the first turn.

mod args;
mod commands;
mod console;
mod logging;
mod signal_handler;

use anyhow::{Context, Result};
use args::{Cli, Commands};
use clap::Parser;
use commands::research::{ResearchArgs, TurnOptions};
use console::CLIConsole;
use scout_core::config::{ConfigLoader, LoggingConfig};
use signal_handler::SignalHandler;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    // A missing .env is fine
    let _ = dotenv::dotenv();

    let cli = Cli::parse();
    let verbose = cli.verbose;
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            CLIConsole::new(verbose).error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = ConfigLoader::new().with_file(&cli.config_file).load();
    let logging = config
        .as_ref()
        .map(|c| c.logging.clone())
        .unwrap_or_else(|_| LoggingConfig::default());
    logging::init(&logging, cli.verbose);

    let config = config
        .with_context(|| format!("Loading configuration from {}", cli.config_file.display()))?;
    let signals = SignalHandler::start().context("Installing signal handlers")?;

    let result = match (cli.command, cli.topic) {
        (Some(Commands::Tools), _) => {
            commands::tools::show_tools(&config, &signals, cli.verbose).await
        }
        (None, Some(topic)) => {
            let args = ResearchArgs {
                topic,
                output: cli.output,
                turns: TurnOptions {
                    max_turns: cli.max_turns,
                    retry_wait: cli.retry_wait,
                },
                verbose: cli.verbose,
            };
            commands::research::execute(args, config, &signals).await
        }
        (None, None) => Err(anyhow::anyhow!(
            "No research topic given. Usage: scout \"<topic>\" (see --help)"
        )),
    };

    let interrupted = signals.shutdown_requested();
    signals.stop();
    if interrupted {
        tracing::info!("Shutdown requested by signal");
    }
    result
}
