//! Tools command implementation

use super::build_guard;
use crate::console::CLIConsole;
use crate::signal_handler::SignalHandler;
use anyhow::{Result, bail};
use scout_core::config::Config;
use scout_core::guard::ExitHook;

/// Start the tool server and list what it exposes
pub async fn show_tools(config: &Config, signals: &SignalHandler, verbose: bool) -> Result<()> {
    let console = CLIConsole::new(verbose);
    let guard = build_guard(config);
    let hook = ExitHook::register(&guard);

    console.status(&format!("Starting tool server `{}`", config.mcp.command));
    let result = tokio::select! {
        result = guard.ensure_initialized() => Some(result),
        _ = signals.wait() => None,
    };
    hook.run().await;

    let Some(result) = result else {
        bail!("Interrupted before the tool server was ready");
    };
    let tools = result?;

    console.print_header("Available Tools");
    for tool in tools.iter() {
        console.print_row(tool.name(), first_line(tool.description()));
    }
    console.success(&format!("Total tools available: {}", tools.len()));
    Ok(())
}

fn first_line(text: &str) -> &str {
    text.lines().next().unwrap_or_default().trim()
}
