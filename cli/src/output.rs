//! Terminal output utilities for styled CLI output.

use std::fmt::Display;

use console::{Term, style};
use corral_business::{Level, Notification};

/// Terminal output helper for consistent styled output.
pub struct Output {
    term: Term,
}

impl Default for Output {
    fn default() -> Self {
        Self::new()
    }
}

impl Output {
    /// Create a new output helper writing to stdout.
    pub fn new() -> Self {
        Self {
            term: Term::stdout(),
        }
    }

    /// Output helper writing to stderr, for messages that must not mix with data.
    pub fn stderr() -> Self {
        Self {
            term: Term::stderr(),
        }
    }

    /// Print a success message with a green checkmark.
    pub fn success(&self, message: impl Display) {
        drop(
            self.term
                .write_line(&format!("{} {}", style("✓").green().bold(), message)),
        );
    }

    /// Print an error message with a red X.
    pub fn error(&self, message: impl Display) {
        drop(
            self.term
                .write_line(&format!("{} {}", style("✗").red().bold(), message)),
        );
    }

    pub fn warning(&self, message: impl Display) {
        drop(
            self.term
                .write_line(&format!("{} {}", style("⚠").yellow().bold(), message)),
        );
    }

    pub fn info(&self, message: impl Display) {
        drop(
            self.term
                .write_line(&format!("{} {}", style("ℹ").blue().bold(), message)),
        );
    }

    /// Print a notification with the icon of its level.
    pub fn notification(&self, notification: &Notification) {
        let text = format!("{}: {}", notification.title, notification.message);
        match notification.level {
            Level::Success => self.success(text),
            Level::Error => self.error(text),
            Level::Warning => self.warning(text),
            Level::Info => self.info(text),
        }
    }

    /// Print a plain message without any prefix.
    pub fn print(&self, message: impl Display) {
        drop(self.term.write_line(&message.to_string()));
    }

    pub fn newline(&self) {
        drop(self.term.write_line(""));
    }

    /// Print a header with emphasis.
    pub fn header(&self, message: impl Display) {
        drop(
            self.term
                .write_line(&style(message).bold().cyan().to_string()),
        );
    }

    pub fn subheader(&self, message: impl Display) {
        drop(self.term.write_line(&style(message).bold().to_string()));
    }

    pub fn divider(&self, width: usize) {
        drop(
            self.term
                .write_line(&style("─".repeat(width)).dim().to_string()),
        );
    }

    /// Print a labeled value with indentation.
    pub fn labeled_indent(&self, label: impl Display, value: impl Display, indent: usize) {
        let spaces = " ".repeat(indent);
        drop(
            self.term
                .write_line(&format!("{spaces}{}: {}", style(label).dim(), value)),
        );
    }

    /// Print a dim/muted message.
    pub fn dim(&self, message: impl Display) {
        drop(self.term.write_line(&style(message).dim().to_string()));
    }

    /// Print a horizontal bar `percent` wide out of `width` cells, then `label`.
    pub fn bar(&self, percent: f64, width: usize, label: impl Display) {
        let filled = filled_cells(percent, width);
        drop(self.term.write_line(&format!(
            "{}{} {}",
            style("█".repeat(filled)).cyan(),
            style("░".repeat(width - filled)).dim(),
            label
        )));
    }
}

fn filled_cells(percent: f64, width: usize) -> usize {
    let cells = (percent.clamp(0.0, 100.0) / 100.0 * width as f64).round();
    (cells as usize).min(width)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filled_cells_is_clamped() {
        assert_eq!(filled_cells(0.0, 30), 0);
        assert_eq!(filled_cells(50.0, 30), 15);
        assert_eq!(filled_cells(100.0, 30), 30);
        assert_eq!(filled_cells(250.0, 30), 30);
        assert_eq!(filled_cells(-4.0, 30), 0);
    }
}
