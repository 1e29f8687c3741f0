//! Styled status output.
//!
//! Everything here goes to stderr; stdout is left to command results
//! (the current version, dry-run previews).

use crate::boundary::Warning;
use console::style;

/// How much the reporter prints
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verbosity {
    /// Warnings and errors only
    Quiet,
    /// Progress messages as well
    Normal,
    /// Debug traces and option summaries as well
    Verbose,
}

impl Verbosity {
    /// `--verbose` wins over `--quiet` when both are given.
    pub fn from_flags(verbose: bool, quiet: bool) -> Self {
        if verbose {
            Verbosity::Verbose
        } else if quiet {
            Verbosity::Quiet
        } else {
            Verbosity::Normal
        }
    }
}

/// Prints user-facing messages filtered by verbosity.
#[derive(Debug, Clone, Copy)]
pub struct Reporter {
    verbosity: Verbosity,
}

impl Reporter {
    pub fn new(verbosity: Verbosity) -> Self {
        Reporter { verbosity }
    }

    /// Format and print an error message in red.
    pub fn error(&self, message: &str) {
        eprintln!("{} {}", style("ERROR:").red().bold(), message);
    }

    /// Print a warning with a yellow marker. Shown at every verbosity.
    pub fn warn(&self, message: &str) {
        eprintln!("{} {}", style("⚠ WARNING:").yellow(), message);
    }

    pub fn warning(&self, warning: &Warning) {
        self.warn(&warning.to_string());
    }

    /// Headline of a command; kept visible in quiet mode.
    pub fn headline(&self, message: &str) {
        eprintln!("{}", style(format!("## {} ##", message)).blue().bold());
    }

    /// Format and print a success message with green checkmark.
    pub fn success(&self, message: &str) {
        if self.verbosity >= Verbosity::Normal {
            eprintln!("{} {}", style("✓").green(), message);
        }
    }

    /// Format and print a status message with yellow arrow.
    pub fn status(&self, message: &str) {
        if self.verbosity >= Verbosity::Normal {
            eprintln!("{} {}", style("→").yellow(), message);
        }
    }

    pub fn debug(&self, message: &str) {
        if self.verbosity >= Verbosity::Verbose {
            eprintln!("  {} {}", style("[DEBUG]").dim(), message);
        }
    }

    /// Dump a key/value summary in verbose mode.
    pub fn options(&self, header: &str, entries: &[(&str, String)]) {
        if self.verbosity < Verbosity::Verbose {
            return;
        }
        self.debug(header);
        for line in format_entries(entries) {
            eprintln!("  {} {}", style("[DEBUG]").dim(), line);
        }
    }
}

/// Render `key: value` lines with a tab indent.
pub fn format_entries(entries: &[(&str, String)]) -> Vec<String> {
    entries
        .iter()
        .map(|(key, value)| format!("\t{}: {}", key, value))
        .collect()
}
