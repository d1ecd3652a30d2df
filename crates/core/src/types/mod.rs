//! Core types for the PASS client.
//!
//! Type-safe wrappers for identifiers and the JSON payloads the backend
//! returns.

pub mod advising;
pub mod email;
pub mod id;
pub mod identity;
pub mod role;
pub mod study;
pub mod timestamp;

pub use advising::*;
pub use email::{Email, EmailError};
pub use id::*;
pub use identity::Identity;
pub use role::Role;
pub use study::*;
pub use timestamp::{Timestamp, TimestampError};
