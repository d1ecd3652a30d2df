//! Student dashboard and study plan payloads.

use serde::{Deserialize, Serialize};

use super::ExamId;

/// Response of the student progress endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentProgress {
    pub progress: ProgressSnapshot,
}

/// Weekly engagement snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressSnapshot {
    pub assignments_completed_pct: f64,
    pub attendance_pct: f64,
    pub lms_logins_last_7d: u32,
}

/// Diagnostic study plan for one exam.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudyPlan {
    pub exam_id: ExamId,
    pub summary: StudyPlanSummary,
    /// Every topic, best score first.
    #[serde(default)]
    pub all_topics: Vec<TopicScore>,
}

/// Highlights of a study plan.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StudyPlanSummary {
    #[serde(default)]
    pub strengths: Vec<TopicScore>,
    #[serde(default)]
    pub areas_for_focus: Vec<FocusArea>,
}

/// Score on one exam topic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicScore {
    pub topic: String,
    pub score_pct: f64,
    pub correct: u32,
    pub total: u32,
}

/// A weak topic with recommended resources.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FocusArea {
    #[serde(flatten)]
    pub score: TopicScore,
    #[serde(default)]
    pub resources: Vec<StudyResource>,
}

/// A learning resource mapped to a topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudyResource {
    pub title: String,
    pub url: String,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
}

impl StudyResource {
    /// Resource kind label, `"resource"` when untyped.
    #[must_use]
    pub fn kind_label(&self) -> &str {
        self.kind.as_deref().unwrap_or("resource")
    }
}

/// Body of the study plan feedback request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudyPlanFeedback {
    pub exam_id: ExamId,
    pub helpful: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_study_plan_flattened_focus_areas() {
        let json = r#"{
            "exam_id": 1,
            "summary": {
                "strengths": [{"topic": "Limits", "score_pct": 90.0, "correct": 9, "total": 10}],
                "areas_for_focus": [{
                    "topic": "Integrals", "score_pct": 40.0, "correct": 2, "total": 5,
                    "resources": [{"title": "Khan: Integrals", "url": "https://example.org/i", "type": "video"},
                                  {"title": "Notes", "url": "https://example.org/n"}]
                }]
            },
            "all_topics": [
                {"topic": "Limits", "score_pct": 90.0, "correct": 9, "total": 10},
                {"topic": "Integrals", "score_pct": 40.0, "correct": 2, "total": 5}
            ]
        }"#;
        let plan: StudyPlan = serde_json::from_str(json).unwrap();
        let focus = &plan.summary.areas_for_focus[0];
        assert_eq!(focus.score.topic, "Integrals");
        assert_eq!(focus.resources[0].kind_label(), "video");
        assert_eq!(focus.resources[1].kind_label(), "resource");
        assert_eq!(plan.all_topics.len(), 2);
    }

    #[test]
    fn test_feedback_omits_missing_comment() {
        let feedback = StudyPlanFeedback {
            exam_id: ExamId::new(1),
            helpful: true,
            comment: None,
        };
        assert_eq!(
            serde_json::to_string(&feedback).unwrap(),
            r#"{"exam_id":1,"helpful":true}"#
        );
    }
}
