//! PASS Client - session, API access and page controllers.
//!
//! # Modules
//!
//! - [`token_store`] - Durable storage for the bearer credential
//! - [`api`] - JSON-over-HTTP client for the PASS backend
//! - [`session`] - Session state machine (`Unknown` → `Authenticated` | `Unauthenticated`)
//! - [`pages`] - Page controllers (login, advisor, student, study plan)
//! - [`app`] - Shell wiring the session, route guard and pages together
//! - [`config`] - Environment-based configuration
//!
//! Route authorization itself is pure and lives in `pass-core`.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod pages;
pub mod session;
pub mod token_store;

pub use api::{ApiClient, ApiError, Auth, RequestOptions};
pub use app::{App, Page, Screen};
pub use config::{ClientConfig, ConfigError};
pub use error::ClientError;
pub use session::{Session, SessionError};
pub use token_store::{Credential, FileTokenStore, MemoryTokenStore, TokenStore, TokenStoreError};
