//! Session commands: login, logout and whoami.

use std::io::BufRead as _;

use anyhow::{Context as _, Result, bail};
use corral_business::AuthStatus;
use corral_business::models::User;
use corral_business::screens::LoginScreen;
use inquire::{Password, Text};
use tracing::{info, instrument};

use crate::context::AppContext;
use crate::output::Output;

/// Asks for whatever credentials are missing and signs in.
pub async fn prompt_login(ctx: &AppContext, identifier: Option<String>) -> Result<User> {
    let identifier = match identifier {
        Some(identifier) => identifier,
        None => Text::new("Usuario o correo:")
            .prompt()
            .context("Failed to read username")?,
    };
    let password = Password::new("Contraseña:")
        .without_confirmation()
        .prompt()
        .context("Failed to read password")?;
    submit(ctx, identifier, password).await
}

async fn submit(ctx: &AppContext, identifier: String, password: String) -> Result<User> {
    let mut screen = LoginScreen::new(ctx.services().clone());
    let form = screen.form_mut();
    form.identifier = identifier;
    form.password = password;
    let result = screen.submit().await;
    ctx.flush_notifications();
    Ok(result?)
}

fn read_password_line() -> Result<String> {
    let mut line = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read password from stdin")?;
    Ok(line.trim_end_matches(['\r', '\n']).to_owned())
}

#[instrument(skip_all, name = "login")]
pub async fn run_login(
    ctx: &AppContext,
    identifier: Option<String>,
    password_stdin: bool,
) -> Result<()> {
    let out = Output::new();
    let user = if password_stdin {
        let Some(identifier) = identifier else {
            bail!("--password-stdin needs --identifier");
        };
        submit(ctx, identifier, read_password_line()?).await?
    } else {
        out.header("Corral");
        out.newline();
        prompt_login(ctx, identifier).await?
    };

    info!(username = %user.username, "signed in");
    out.labeled_indent("Usuario", user.display_name(), 0);
    Ok(())
}

#[instrument(skip_all, name = "logout")]
pub fn run_logout(ctx: &AppContext) {
    let out = Output::new();
    if !ctx.session().is_authenticated() {
        out.dim("No hay una sesión activa");
        return;
    }
    ctx.api().logout();
    out.success("Sesión cerrada");
}

#[instrument(skip_all, name = "whoami")]
pub fn run_whoami(ctx: &AppContext) -> Result<()> {
    let out = Output::new();
    match ctx.session().status() {
        AuthStatus::SignedOut => bail!("Not signed in, run 'corral login' first"),
        AuthStatus::SignedIn { user: None } => {
            out.warning("Sesión activa, pero el perfil guardado no se pudo leer");
        }
        AuthStatus::SignedIn { user: Some(user) } => {
            out.header(user.display_name());
            out.labeled_indent("Usuario", &user.username, 2);
            if !user.email.is_empty() {
                out.labeled_indent("Correo", &user.email, 2);
            }
        }
    }
    out.labeled_indent("API", &ctx.api().config().api_base_url, 2);
    Ok(())
}
