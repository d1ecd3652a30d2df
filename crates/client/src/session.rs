//! Session state machine.
//!
//! `Unknown` → `Authenticated` | `Unauthenticated`. Transitions take
//! `&mut self`, so at most one of them is in flight for a given session.

use pass_core::{Identity, SessionState};
use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::api::{ApiClient, Auth, RequestOptions};
use crate::token_store::{Credential, TokenStore, TokenStoreError};

/// Identity endpoint.
pub const IDENTITY_PATH: &str = "/me";

/// Errors raised by session transitions.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The token store failed.
    #[error(transparent)]
    Storage(#[from] TokenStoreError),

    /// An identity was supplied while no credential is stored.
    #[error("cannot start an authenticated session without a stored credential")]
    MissingCredential,
}

/// Owner of the client's authentication state.
#[derive(Debug)]
pub struct Session {
    api: ApiClient,
    state: SessionState,
}

impl Session {
    /// Create an unresolved session.
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            state: SessionState::Unknown,
        }
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> &SessionState {
        &self.state
    }

    /// Current identity, if authenticated.
    #[must_use]
    pub const fn identity(&self) -> Option<&Identity> {
        self.state.identity()
    }

    /// API client used for identity checks.
    #[must_use]
    pub const fn api(&self) -> &ApiClient {
        &self.api
    }

    fn store(&self) -> &dyn TokenStore {
        self.api.token_store()
    }

    /// Resolve the stored credential into an identity.
    ///
    /// Without a credential this settles `Unauthenticated` without touching
    /// the network. Any failure of the identity call, whatever its cause,
    /// discards the credential.
    ///
    /// # Errors
    ///
    /// Returns an error only if the token store fails; the state is settled
    /// either way.
    #[instrument(skip(self))]
    pub async fn refresh(&mut self) -> Result<&SessionState, SessionError> {
        let credential = match self.store().get() {
            Ok(Some(credential)) => credential,
            Ok(None) => {
                self.state = SessionState::Unauthenticated;
                return Ok(&self.state);
            }
            Err(e) => {
                self.state = SessionState::Unauthenticated;
                return Err(e.into());
            }
        };

        let options = RequestOptions::get().with_auth(Auth::Bearer(credential));
        match self.api.fetch::<Identity>(IDENTITY_PATH, options).await {
            Ok(identity) => {
                info!(user_id = %identity.id, role = %identity.role, "session resolved");
                self.state = SessionState::Authenticated(identity);
            }
            Err(e) => {
                warn!(error = %e, "identity check failed, discarding stored credential");
                self.state = SessionState::Unauthenticated;
                self.store().clear()?;
            }
        }
        Ok(&self.state)
    }

    /// Run [`Session::refresh`] unless the session has already settled.
    ///
    /// # Errors
    ///
    /// See [`Session::refresh`].
    pub async fn ensure_resolved(&mut self) -> Result<&SessionState, SessionError> {
        if self.state.is_resolved() {
            return Ok(&self.state);
        }
        self.refresh().await
    }

    /// Store a verified credential and enter `Authenticated` with its identity.
    ///
    /// # Errors
    ///
    /// Returns an error if the credential cannot be stored; the state is left
    /// as it was.
    pub fn sign_in(&mut self, credential: Credential, identity: Identity) -> Result<(), SessionError> {
        self.store().set(credential)?;
        info!(user_id = %identity.id, role = %identity.role, "signed in");
        self.state = SessionState::Authenticated(identity);
        Ok(())
    }

    /// Enter `Authenticated` directly, after a login exchange has already
    /// fetched the identity.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::MissingCredential`] (and settles
    /// `Unauthenticated`) if no credential is stored.
    pub fn set_identity(&mut self, identity: Identity) -> Result<(), SessionError> {
        if self.store().get()?.is_none() {
            self.state = SessionState::Unauthenticated;
            return Err(SessionError::MissingCredential);
        }
        info!(user_id = %identity.id, role = %identity.role, "signed in");
        self.state = SessionState::Authenticated(identity);
        Ok(())
    }

    /// Discard the credential and settle `Unauthenticated`. No network call.
    ///
    /// # Errors
    ///
    /// Returns an error if the token store cannot be cleared; the state is
    /// `Unauthenticated` regardless.
    pub fn logout(&mut self) -> Result<(), SessionError> {
        self.state = SessionState::Unauthenticated;
        self.store().clear()?;
        info!("signed out");
        Ok(())
    }
}
