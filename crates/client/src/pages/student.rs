//! Student dashboard controller.

use pass_core::StudentProgress;
use tracing::instrument;

use crate::api::{ApiClient, ApiError};

/// This week's engagement snapshot.
///
/// # Errors
///
/// Returns an error if the request fails or the payload does not decode.
#[instrument(skip(api))]
pub async fn progress(api: &ApiClient) -> Result<StudentProgress, ApiError> {
    api.get("/student/progress").await
}
