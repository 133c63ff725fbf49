//! CLI console utilities

use colored::*;
use console::Term;

/// Formatted status output on stderr; the report itself goes to stdout
pub struct CLIConsole {
    verbose: bool,
    term: Term,
}

impl CLIConsole {
    pub fn new(verbose: bool) -> Self {
        Self {
            verbose,
            term: Term::stderr(),
        }
    }

    /// Print an info message (verbose only)
    pub fn info(&self, message: &str) {
        if self.verbose {
            self.line(format!("{} {}", "ℹ".blue().bold(), message));
        }
    }

    /// Print a progress message
    pub fn status(&self, message: &str) {
        self.line(format!("{} {}", "→".cyan().bold(), message));
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        self.line(format!("{} {}", "✓".green().bold(), message.green()));
    }

    /// Print a warning message
    pub fn warn(&self, message: &str) {
        self.line(format!("{} {}", "⚠".yellow().bold(), message.yellow()));
    }

    /// Print an error message
    pub fn error(&self, message: &str) {
        self.line(format!("{} {}", "✗".red().bold(), message.red()));
    }

    /// Print a header
    pub fn print_header(&self, title: &str) {
        self.line(String::new());
        self.line(title.bold().underline().to_string());
        self.line("=".repeat(title.len()).dimmed().to_string());
    }

    /// Print a two-column table row
    pub fn print_row(&self, name: &str, description: &str) {
        self.line(format!("  {:<28} {}", name.magenta().bold(), description.dimmed()));
    }

    fn line(&self, text: String) {
        // Nothing useful to do if stderr is gone
        let _ = self.term.write_line(&text);
    }
}
