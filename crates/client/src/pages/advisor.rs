//! Advisor dashboard controller.

use pass_core::{NewIntervention, PredictRiskOutcome, StudentDetail, StudentId, StudentList};
use tracing::{info, instrument};

use crate::api::{ApiClient, ApiError};
use crate::error::ClientError;

/// At-risk list, highest risk first and unscored students last.
///
/// # Errors
///
/// Returns an error if the request fails or the payload does not decode.
#[instrument(skip(api))]
pub async fn students(api: &ApiClient) -> Result<StudentList, ApiError> {
    let mut list: StudentList = api.get("/advisor/students").await?;
    list.sort_by_risk();
    Ok(list)
}

/// Detail panel for one student: profile, explanation factors, interventions.
///
/// # Errors
///
/// Returns an error if the request fails or the payload does not decode.
#[instrument(skip(api))]
pub async fn student(api: &ApiClient, id: StudentId) -> Result<StudentDetail, ApiError> {
    api.get(&format!("/advisor/students/{id}")).await
}

/// Trigger batch risk scoring for the advisor's students.
///
/// # Errors
///
/// Returns an error if the request fails.
#[instrument(skip(api))]
pub async fn predict_risk(api: &ApiClient) -> Result<PredictRiskOutcome, ApiError> {
    let outcome: PredictRiskOutcome = api
        .post("/advisor/predict-risk", None::<&serde_json::Value>)
        .await?;
    info!(generated = ?outcome.generated, "risk scoring finished");
    Ok(outcome)
}

/// Log an intervention and return the refreshed detail panel.
///
/// # Errors
///
/// Returns [`ClientError::InvalidInput`] for a blank note, otherwise any
/// error from the create or re-fetch requests.
#[instrument(skip(api, note))]
pub async fn add_intervention(
    api: &ApiClient,
    id: StudentId,
    note: &str,
) -> Result<StudentDetail, ClientError> {
    let note = note.trim();
    if note.is_empty() {
        return Err(ClientError::InvalidInput("note is required".to_owned()));
    }

    let body = NewIntervention {
        note: note.to_owned(),
    };
    let _: serde_json::Value = api
        .post(&format!("/advisor/students/{id}/interventions"), Some(&body))
        .await?;
    info!(student_id = %id, "intervention logged");

    Ok(student(api, id).await?)
}
