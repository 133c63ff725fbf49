//! CLI argument definitions using clap
//!
//! - scout "topic"             # Plan, research and publish a report
//! - scout "topic" -o out.md   # Write the report to a file
//! - scout tools               # Start the tool server and list its tools

use clap::{Parser, Subcommand};
use scout_core::config::DEFAULT_CONFIG_FILE;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "scout")]
#[command(about = "Scout - plan, research and publish web research reports")]
#[command(
    long_about = r#"Scout - plan, research and publish web research reports

USAGE:
  scout "your topic"             # Research a topic, print the report
  scout "your topic" -o out.md   # Write the report to a file
  scout tools                    # List the web tools the server exposes

The web tools come from an MCP server (Bright Data by default). Set
API_TOKEN, WEB_UNLOCKER_ZONE and BROWSER_AUTH for it, and GOOGLE_API_KEY
for the model. A .env file in the working directory is read first."#
)]
#[command(version)]
pub struct Cli {
    /// Research topic
    pub topic: Option<String>,

    /// Path to configuration file
    #[arg(long, default_value = DEFAULT_CONFIG_FILE, global = true)]
    pub config_file: PathBuf,

    /// Write the report to this file instead of stdout
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Maximum number of turns while tools are still initializing
    #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(u32).range(1..))]
    pub max_turns: u32,

    /// Wait between turns while tools are still initializing
    #[arg(long, default_value = "3s", value_parser = parse_duration)]
    pub retry_wait: Duration,

    /// Enable verbose output
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the tool server and list the tools it exposes
    Tools,
}

fn parse_duration(value: &str) -> Result<Duration, String> {
    humantime_serde::re::humantime::parse_duration(value).map_err(|e| e.to_string())
}
