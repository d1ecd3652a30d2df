//! Advisor dashboard payloads.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::{InterventionId, StudentId, Timestamp};

/// Response of the advisor student list endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StudentList {
    /// Students assigned to the advisor.
    #[serde(default)]
    pub students: Vec<StudentSummary>,
}

impl StudentList {
    /// Order by latest risk probability, highest first, unscored students last.
    ///
    /// The sort is stable, so students with equal scores keep server order.
    pub fn sort_by_risk(&mut self) {
        self.students.sort_by(|a, b| match (a.risk_probability, b.risk_probability) {
            (Some(x), Some(y)) => y.partial_cmp(&x).unwrap_or(Ordering::Equal),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        });
    }
}

/// One row of the at-risk list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentSummary {
    pub student_id: StudentId,
    pub name: String,
    #[serde(default)]
    pub department: Option<String>,
    /// Probability from the latest scoring run, if the student was ever scored.
    #[serde(default)]
    pub risk_probability: Option<f64>,
    #[serde(default)]
    pub risk_generated_at: Option<Timestamp>,
}

/// Response of the advisor student detail endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentDetail {
    pub student: StudentProfile,
    #[serde(default)]
    pub latest_risk: Option<LatestRisk>,
    /// Most recent interventions first.
    #[serde(default)]
    pub interventions: Vec<Intervention>,
}

impl StudentDetail {
    /// Explanation factors of the latest score; empty when none exist yet.
    #[must_use]
    pub fn top_factors(&self) -> &[RiskFactor] {
        self.latest_risk
            .as_ref()
            .and_then(|risk| risk.top_factors.as_deref())
            .unwrap_or_default()
    }
}

/// Student profile fields shown on the detail panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentProfile {
    pub student_id: StudentId,
    pub name: String,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub cohort_year: Option<i32>,
}

/// Latest risk score with its explanation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatestRisk {
    #[serde(default)]
    pub risk_probability: Option<f64>,
    #[serde(default)]
    pub generated_at: Option<Timestamp>,
    #[serde(default)]
    pub top_factors: Option<Vec<RiskFactor>>,
}

/// A feature and its importance in the risk model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskFactor {
    pub feature: String,
    pub importance: f64,
}

/// A logged advisor intervention.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Intervention {
    pub id: InterventionId,
    pub note: String,
    pub created_at: Timestamp,
}

/// Body of the create-intervention request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewIntervention {
    pub note: String,
}

/// Response of the batch risk scoring trigger.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictRiskOutcome {
    #[serde(default)]
    pub ok: bool,
    /// Number of scores created or updated, when reported.
    #[serde(default)]
    pub generated: Option<u64>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn summary(id: i64, risk: Option<f64>) -> StudentSummary {
        StudentSummary {
            student_id: StudentId::new(id),
            name: format!("Student {id}"),
            department: None,
            risk_probability: risk,
            risk_generated_at: None,
        }
    }

    #[test]
    fn test_sort_by_risk_puts_unscored_last() {
        let mut list = StudentList {
            students: vec![
                summary(1, None),
                summary(2, Some(0.2)),
                summary(3, Some(0.9)),
                summary(4, None),
                summary(5, Some(0.5)),
            ],
        };
        list.sort_by_risk();
        let order: Vec<i64> = list.students.iter().map(|s| s.student_id.as_i64()).collect();
        assert_eq!(order, vec![3, 5, 2, 1, 4]);
    }

    #[test]
    fn test_detail_with_null_factors() {
        let json = r#"{
            "student": {"student_id": 1, "name": "Ana", "department": null, "cohort_year": 2023},
            "latest_risk": {"risk_probability": null, "generated_at": null, "top_factors": null},
            "interventions": [
                {"id": 9, "note": "Suggested tutoring", "created_at": "2025-02-01T10:00:00"}
            ]
        }"#;
        let detail: StudentDetail = serde_json::from_str(json).unwrap();
        assert!(detail.top_factors().is_empty());
        assert_eq!(detail.interventions.len(), 1);
        assert_eq!(detail.student.cohort_year, Some(2023));
    }

    #[test]
    fn test_detail_with_factors() {
        let json = r#"{
            "student": {"student_id": 1, "name": "Ana"},
            "latest_risk": {"top_factors": [{"feature": "attendance", "importance": 0.42}]}
        }"#;
        let detail: StudentDetail = serde_json::from_str(json).unwrap();
        assert_eq!(detail.top_factors().len(), 1);
        assert!(detail.interventions.is_empty());
    }

    #[test]
    fn test_predict_outcome_tolerates_empty_body() {
        let outcome: PredictRiskOutcome = serde_json::from_str("{}").unwrap();
        assert_eq!(outcome, PredictRiskOutcome::default());
    }
}
