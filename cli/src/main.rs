//! `corral`: command-line client for the Corral cost ledger.

mod cli;
mod commands;
mod config;
mod context;
mod output;
mod render;
mod timing;

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser as _;
use corral_business::ApiError;
use corral_business::screens::SubmitError;
use tracing::debug;

use crate::cli::{Cli, Commands};
use crate::commands::Reported;
use crate::context::AppContext;
use crate::output::Output;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    timing::init_tracing(cli.verbose, cli.timing);

    if let Commands::Completions { shell } = cli.command {
        commands::generate_completions(shell);
        return ExitCode::SUCCESS;
    }

    let ctx = match AppContext::open(cli.api_url.as_deref()) {
        Ok(ctx) => ctx,
        Err(err) => {
            report_error(&err);
            return ExitCode::FAILURE;
        }
    };

    let result = dispatch(&ctx, cli.command).await;
    ctx.shutdown();

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report_error(&err);
            ExitCode::FAILURE
        }
    }
}

async fn dispatch(ctx: &AppContext, command: Commands) -> Result<()> {
    match command {
        Commands::Login {
            identifier,
            password_stdin,
        } => commands::run_login(ctx, identifier, password_stdin).await,
        Commands::Logout => {
            commands::run_logout(ctx);
            Ok(())
        }
        Commands::Whoami => commands::run_whoami(ctx),
        Commands::Categories(command) => commands::run_categories(ctx, command).await,
        Commands::Costs(command) => commands::run_costs(ctx, command).await,
        Commands::Dashboard { months_back } => commands::run_dashboard(ctx, months_back).await,
        Commands::Report(args) => commands::run_report(ctx, args).await,
        Commands::Completions { shell } => {
            commands::generate_completions(shell);
            Ok(())
        }
    }
}

/// Prints `err` unless a notification already told the user about it.
fn report_error(err: &anyhow::Error) {
    let out = Output::stderr();
    if err.downcast_ref::<Reported>().is_some() || err.downcast_ref::<ApiError>().is_some() {
        debug!("already reported: {err:#}");
        return;
    }
    match err.downcast_ref::<SubmitError>() {
        Some(SubmitError::Api(_)) => debug!("already reported: {err:#}"),
        Some(SubmitError::Invalid(errors)) => {
            for (field, problem) in errors.iter() {
                out.error(format!("{field}: {problem}"));
            }
        }
        Some(SubmitError::Unavailable(message)) => out.error(message),
        None => out.error(format!("{err:#}")),
    }
}
