//! PASS Core - Shared types and authorization rules.
//!
//! This crate provides what the PASS client needs without doing any I/O:
//! - [`types`] - Typed IDs, roles, identities and the backend's JSON payloads
//! - [`session`] - The tri-state session value
//! - [`route`] - Client-side routes and their access requirements
//! - [`guard`] - The authorization decision and redirect resolution
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no HTTP clients,
//! no storage. The stateful parts (token store, API client, session state
//! machine) live in `pass-client`.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod guard;
pub mod route;
pub mod session;
pub mod types;

pub use guard::{Decision, Landing, Navigation, Requirement, authorize, navigate};
pub use route::Route;
pub use session::SessionState;
pub use types::*;
