//! Student dashboard commands.

use std::io::Write;

use pass_client::App;
use pass_client::pages::{DEFAULT_EXAM_ID, study_plan};
use pass_core::{ExamId, Route, StudyPlanFeedback};

use super::{CliError, authorize, open};

/// Open the study plan page for an exam.
pub async fn plan(
    app: &mut App,
    out: &mut impl Write,
    exam_id: Option<ExamId>,
) -> Result<(), CliError> {
    open(app, out, &Route::StudyPlan { exam_id }.to_string()).await
}

/// Send feedback on a study plan.
pub async fn feedback(
    app: &mut App,
    out: &mut impl Write,
    exam_id: Option<ExamId>,
    helpful: bool,
    comment: Option<String>,
) -> Result<(), CliError> {
    let exam_id = exam_id.unwrap_or(DEFAULT_EXAM_ID);
    let location = Route::StudyPlan {
        exam_id: Some(exam_id),
    }
    .to_string();
    if !authorize(app, out, &location).await? {
        return Ok(());
    }

    let feedback = StudyPlanFeedback {
        exam_id,
        helpful,
        comment: comment.filter(|c| !c.trim().is_empty()),
    };
    study_plan::submit_feedback(app.api(), &feedback).await?;
    writeln!(out, "Thanks, feedback recorded for exam {exam_id}")?;
    Ok(())
}
