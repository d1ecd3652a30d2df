//! Study plan controller.
//!
//! Load failures are part of the page: the plan view carries the error text
//! instead of failing the navigation.

use pass_core::{ExamId, StudyPlan, StudyPlanFeedback};
use tracing::{instrument, warn};

use crate::api::{ApiClient, ApiError};

/// Exam shown when the route does not name one.
pub const DEFAULT_EXAM_ID: ExamId = ExamId::new(1);

/// Study plan page content.
#[derive(Debug, Clone, PartialEq)]
pub struct StudyPlanView {
    /// Exam the plan was requested for.
    pub exam_id: ExamId,
    /// The plan, or the error text to show in its place.
    pub plan: Result<StudyPlan, String>,
}

/// Fetch the diagnostic plan for an exam.
///
/// # Errors
///
/// Returns an error if the request fails or the payload does not decode.
#[instrument(skip(api))]
pub async fn study_plan(api: &ApiClient, exam_id: ExamId) -> Result<StudyPlan, ApiError> {
    api.get(&format!("/student/study-plan?exam_id={exam_id}"))
        .await
}

/// Load the page for `exam_id` (or the default exam), folding failures into
/// the view.
pub async fn load(api: &ApiClient, exam_id: Option<ExamId>) -> StudyPlanView {
    let exam_id = exam_id.unwrap_or(DEFAULT_EXAM_ID);
    let plan = study_plan(api, exam_id).await.map_err(|e| {
        warn!(exam_id = %exam_id, error = %e, "study plan failed to load");
        e.to_string()
    });
    StudyPlanView { exam_id, plan }
}

/// Tell the backend whether a plan was helpful.
///
/// # Errors
///
/// Returns an error if the request fails.
#[instrument(skip(api, feedback), fields(exam_id = %feedback.exam_id))]
pub async fn submit_feedback(api: &ApiClient, feedback: &StudyPlanFeedback) -> Result<(), ApiError> {
    let _: serde_json::Value = api
        .post("/student/study-plan/feedback", Some(feedback))
        .await?;
    Ok(())
}
