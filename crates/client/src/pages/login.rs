//! Login page controller.
//!
//! Exchanges email and password for a credential, resolves the identity with
//! that credential, and only then commits both to the token store and the
//! session. A failed attempt leaves both untouched.

use pass_core::{Email, EmailError, Identity, Role};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::api::{ApiClient, ApiError, Auth, RequestOptions};
use crate::session::{IDENTITY_PATH, Session, SessionError};
use crate::token_store::Credential;

/// Credential exchange endpoint.
pub const LOGIN_PATH: &str = "/login";

/// Errors shown inline on the login page.
#[derive(Debug, Error)]
pub enum LoginError {
    #[error(transparent)]
    InvalidEmail(#[from] EmailError),

    #[error("password cannot be empty")]
    EmptyPassword,

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Session(#[from] SessionError),
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    access_token: String,
    #[serde(default)]
    role: Option<Role>,
}

/// Sign in and move the session to `Authenticated`.
///
/// # Errors
///
/// Returns [`LoginError`] when the input is invalid, the backend rejects the
/// credentials or the identity call, or the token store fails.
#[instrument(skip(session, password))]
pub async fn login(
    session: &mut Session,
    email: &str,
    password: &SecretString,
) -> Result<Identity, LoginError> {
    let email = Email::parse(email)?;
    if password.expose_secret().is_empty() {
        return Err(LoginError::EmptyPassword);
    }

    let api = session.api().clone();
    let (credential, role_hint) = exchange(&api, &email, password).await?;

    let options = RequestOptions::get().with_auth(Auth::Bearer(credential.clone()));
    let identity = api.fetch::<Identity>(IDENTITY_PATH, options).await?;

    session.sign_in(credential, identity.clone())?;
    if let Err(e) = api.token_store().set_role_hint(role_hint.unwrap_or(identity.role)) {
        warn!(error = %e, "could not remember role hint");
    }

    info!(user_id = %identity.id, role = %identity.role, "login succeeded");
    Ok(identity)
}

async fn exchange(
    api: &ApiClient,
    email: &Email,
    password: &SecretString,
) -> Result<(Credential, Option<Role>), ApiError> {
    let body = serde_json::to_value(LoginRequest {
        email: email.as_str(),
        password: password.expose_secret(),
    })
    .map_err(|e| ApiError::Decode {
        path: LOGIN_PATH.to_owned(),
        message: e.to_string(),
    })?;

    let options = RequestOptions::post(Some(body)).with_auth(Auth::Anonymous);
    let response: LoginResponse = api.fetch(LOGIN_PATH, options).await?;

    if response.access_token.trim().is_empty() {
        return Err(ApiError::Decode {
            path: LOGIN_PATH.to_owned(),
            message: "missing access token".to_owned(),
        });
    }
    Ok((Credential::new(response.access_token), response.role))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use pass_core::SessionState;

    use super::*;
    use crate::token_store::MemoryTokenStore;

    fn session() -> Session {
        let api = ApiClient::new("http://127.0.0.1:9", Arc::new(MemoryTokenStore::new())).unwrap();
        Session::new(api)
    }

    #[tokio::test]
    async fn test_invalid_email_fails_before_network() {
        let mut session = session();
        let err = login(&mut session, "not-an-email", &SecretString::from("pw"))
            .await
            .unwrap_err();
        assert!(matches!(err, LoginError::InvalidEmail(EmailError::MissingAtSymbol)));
        assert_eq!(session.state(), &SessionState::Unknown);
    }

    #[tokio::test]
    async fn test_empty_password_is_rejected() {
        let mut session = session();
        let err = login(&mut session, "advisor@pass.local", &SecretString::from(""))
            .await
            .unwrap_err();
        assert!(matches!(err, LoginError::EmptyPassword));
    }

    #[tokio::test]
    async fn test_network_failure_leaves_store_untouched() {
        let mut session = session();
        let err = login(&mut session, "advisor@pass.local", &SecretString::from("pw"))
            .await
            .unwrap_err();
        assert!(matches!(err, LoginError::Api(ApiError::Transport(_))));
        assert!(session.api().token_store().get().unwrap().is_none());
        assert_eq!(session.state(), &SessionState::Unknown);
    }
}
