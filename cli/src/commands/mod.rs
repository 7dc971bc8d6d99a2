//! Command implementations for the Corral CLI.
//!
//! Each subcommand is implemented in its own module. Runners drive the screen
//! controllers of `corral-business` and print notifications as they arrive.

pub mod categories;
pub mod completions;
pub mod costs;
pub mod dashboard;
pub mod login;
pub mod report;

pub use categories::run_categories;
pub use completions::generate_completions;
pub use costs::run_costs;
pub use dashboard::run_dashboard;
pub use login::{run_login, run_logout, run_whoami};
pub use report::run_report;

use std::fmt;
use std::io::IsTerminal as _;

use anyhow::{Context as _, Result, bail};
use corral_business::{ApiResult, DataTable, Locale, TableRow};
use inquire::{Confirm, Text};

use crate::cli::TableArgs;
use crate::context::AppContext;
use crate::output::Output;
use crate::render::{apply_args, page_footer, render_page};

/// A failure whose message has already been printed.
#[derive(Debug)]
pub struct Reported;

impl fmt::Display for Reported {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("command failed")
    }
}

impl std::error::Error for Reported {}

/// Publishes a failed direct API call the same way screens publish theirs.
fn notify_failure<T>(ctx: &AppContext, result: ApiResult<T>) -> ApiResult<T> {
    if let Err(err) = &result {
        tracing::warn!("request failed: {err}");
        ctx.services().notifier.error(err.user_message());
    }
    result
}

/// Asks before a destructive action. Without a terminal `--yes` is required.
fn confirm(message: &str, yes: bool) -> Result<bool> {
    if yes {
        return Ok(true);
    }
    if !std::io::stdin().is_terminal() {
        bail!("Refusing to delete without confirmation, pass --yes");
    }
    Confirm::new(message)
        .with_default(false)
        .prompt()
        .context("Failed to read confirmation")
}

/// Fills an empty required text field from a prompt when a terminal is attached.
fn prompt_if_empty(value: &mut String, label: &str) -> Result<()> {
    if !value.trim().is_empty() || !std::io::stdin().is_terminal() {
        return Ok(());
    }
    *value = Text::new(label)
        .prompt()
        .with_context(|| format!("Failed to read {label}"))?;
    Ok(())
}

/// Applies `args` to `table` and prints the resulting page with its footer.
fn print_table<R: TableRow + Clone>(
    table: &mut DataTable<R>,
    args: &TableArgs,
    locale: &Locale,
    empty: &str,
) -> Result<()> {
    let out = Output::new();
    if !apply_args(table, args)? {
        Output::stderr().warning(format!(
            "La página {} no existe, mostrando la página 1",
            args.page
        ));
    }
    match render_page(table, locale) {
        Some(rendered) => {
            out.print(rendered);
            out.dim(page_footer(table));
        }
        None => out.dim(empty),
    }
    Ok(())
}
