//! Page controllers.
//!
//! Each page fetches its own data through the [`ApiClient`](crate::api::ApiClient)
//! and hands back the decoded payload for display.

pub mod advisor;
pub mod login;
pub mod student;
pub mod study_plan;

pub use login::{LoginError, login};
pub use study_plan::{DEFAULT_EXAM_ID, StudyPlanView};
