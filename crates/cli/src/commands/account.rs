//! Session commands.
//!
//! # Usage
//!
//! ```bash
//! pass login -e student@example.edu --password secret --next /student/study-plan
//! pass whoami
//! pass status
//! pass logout
//! ```

use std::io::Write;

use pass_client::{App, ClientError};
use pass_core::Route;
use secrecy::SecretString;

use super::CliError;
use crate::render;

/// Sign in, then print the page the session lands on.
pub async fn login(
    app: &mut App,
    out: &mut impl Write,
    email: &str,
    password: String,
    next: Option<&str>,
) -> Result<(), CliError> {
    let password = SecretString::from(password);
    app.set_return_to(next.map(Route::parse));

    let screen = app.login(email, &password).await?;
    if let Some(identity) = app.identity() {
        writeln!(out, "Signed in as {}", identity.display_name())?;
    }
    render::screen(out, &screen)?;
    Ok(())
}

/// Forget the stored token. Works offline.
pub fn logout(app: &mut App, out: &mut impl Write) -> Result<(), CliError> {
    app.logout()?;
    writeln!(out, "Signed out")?;
    Ok(())
}

/// Print configuration and the resolved session.
pub async fn status(app: &mut App, out: &mut impl Write) -> Result<(), CliError> {
    app.start().await?;
    let store = app.api().token_store();
    let has_token = store.get().map_err(ClientError::from)?.is_some();
    let role_hint = store.role_hint().map_err(ClientError::from)?;

    writeln!(out, "API base:    {}", app.api().base_url())?;
    writeln!(out, "Token:       {}", if has_token { "stored" } else { "none" })?;
    if let Some(role) = role_hint {
        writeln!(out, "Last role:   {role}")?;
    }
    writeln!(out, "Session:     {}", app.session().state())?;
    Ok(())
}

/// Print the signed-in user, if any.
pub async fn whoami(app: &mut App, out: &mut impl Write) -> Result<(), CliError> {
    app.start().await?;
    match app.identity() {
        Some(identity) => render::identity(out, identity)?,
        None => writeln!(out, "Not signed in")?,
    }
    Ok(())
}
