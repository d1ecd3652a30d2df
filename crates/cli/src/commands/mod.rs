//! Command implementations.

use std::io::{self, Write};

use pass_client::{ApiError, App, ClientConfig, ClientError, ConfigError};
use pass_core::{Navigation, Route};
use thiserror::Error;

use crate::render;

pub mod account;
pub mod advisor;
pub mod student;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CliError {
    /// Client failure (configuration, network, session).
    #[error(transparent)]
    Client(#[from] ClientError),

    /// Output could not be written.
    #[error("Output error: {0}")]
    Io(#[from] io::Error),
}

impl From<ApiError> for CliError {
    fn from(e: ApiError) -> Self {
        Self::Client(e.into())
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        Self::Client(e.into())
    }
}

/// Build the app from the environment, with an optional base URL override.
///
/// The session is not resolved yet; commands that need it call
/// [`App::start`].
pub fn connect(api_base: Option<&str>) -> Result<App, CliError> {
    let mut config = ClientConfig::from_env()?;
    if let Some(api_base) = api_base {
        config = config.with_api_base(api_base)?;
    }
    tracing::debug!(api_base = %config.api_base, token_path = %config.token_path.display(), "configured");
    Ok(App::from_config(&config)?)
}

/// Open a route and print whatever page it lands on.
pub async fn open(app: &mut App, out: &mut impl Write, location: &str) -> Result<(), CliError> {
    app.start().await?;
    let screen = app.open(location).await?;
    render::screen(out, &screen)?;
    Ok(())
}

/// Check that `location` renders for the session before acting on it.
///
/// When the guard sends the user elsewhere, the landed page is printed
/// instead and `false` is returned.
pub async fn authorize(
    app: &mut App,
    out: &mut impl Write,
    location: &str,
) -> Result<bool, CliError> {
    app.start().await?;
    match app.navigate(location) {
        Navigation::Landed(landing) if !landing.was_redirected() => Ok(true),
        Navigation::Landed(landing) => {
            let screen = app.open(&landing.route.to_string()).await?;
            render::redirect(out, &Route::parse(location), &landing.route)?;
            render::page(out, &screen.page)?;
            Ok(false)
        }
        Navigation::Pending => {
            render::page(out, &pass_client::Page::Loading)?;
            Ok(false)
        }
    }
}
