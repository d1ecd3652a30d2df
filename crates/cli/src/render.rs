//! Plain-text rendering of pages.

use std::io::{self, Write};

use pass_client::{Page, Screen};
use pass_client::pages::StudyPlanView;
use pass_core::{Identity, Route, StudentDetail, StudentList, StudentProgress, TopicScore};

/// Print a screen, noting any redirect on the way.
pub fn screen(out: &mut impl Write, screen: &Screen) -> io::Result<()> {
    if let Some(landing) = screen.landing() {
        // `/` always forwards to a dashboard; only report real detours.
        if let Some(requested) = landing.redirected_from.first().filter(|r| **r != Route::Home) {
            redirect(out, requested, &landing.route)?;
        }
    }
    page(out, &screen.page)
}

/// Note that `requested` was not rendered.
pub fn redirect(out: &mut impl Write, requested: &Route, landed: &Route) -> io::Result<()> {
    writeln!(out, "{requested} is not available, showing {landed}")?;
    writeln!(out)
}

/// Print page content.
pub fn page(out: &mut impl Write, page: &Page) -> io::Result<()> {
    match page {
        Page::Loading => writeln!(out, "Loading..."),
        Page::Login { return_to } => {
            writeln!(out, "Sign in required.")?;
            match return_to {
                Some(route) => writeln!(out, "Run: pass login -e <email> --next '{route}'"),
                None => writeln!(out, "Run: pass login -e <email>"),
            }
        }
        Page::Advisor(list) => student_list(out, list),
        Page::Student(progress) => student_progress(out, progress),
        Page::StudyPlan(view) => study_plan(out, view),
    }
}

pub fn identity(out: &mut impl Write, identity: &Identity) -> io::Result<()> {
    writeln!(out, "{} ({})", identity.display_name(), identity.role)?;
    writeln!(out, "User ID: {}", identity.id)?;
    if let Some(email) = &identity.email {
        writeln!(out, "Email:   {email}")?;
    }
    Ok(())
}

/// At-risk list, one student per line.
pub fn student_list(out: &mut impl Write, list: &StudentList) -> io::Result<()> {
    writeln!(out, "Students at risk")?;
    if list.students.is_empty() {
        return writeln!(out, "  (no students)");
    }
    for s in &list.students {
        writeln!(
            out,
            "  {:>6}  {:<28} {:<20} {}",
            s.student_id,
            s.name,
            s.department.as_deref().unwrap_or("-"),
            risk(s.risk_probability),
        )?;
    }
    Ok(())
}

pub fn student_detail(out: &mut impl Write, detail: &StudentDetail) -> io::Result<()> {
    let student = &detail.student;
    writeln!(out, "{} (#{})", student.name, student.student_id)?;
    if let Some(department) = &student.department {
        writeln!(out, "Department: {department}")?;
    }
    if let Some(cohort) = student.cohort_year {
        writeln!(out, "Cohort:     {cohort}")?;
    }

    writeln!(out)?;
    match &detail.latest_risk {
        Some(latest) => {
            write!(out, "Latest risk: {}", risk(latest.risk_probability))?;
            match &latest.generated_at {
                Some(at) => writeln!(out, " (scored {at})")?,
                None => writeln!(out)?,
            }
        }
        None => writeln!(out, "Latest risk: not scored yet")?,
    }
    let factors = detail.top_factors();
    if !factors.is_empty() {
        writeln!(out, "Top factors:")?;
        for factor in factors {
            writeln!(out, "  {}: {:.2}", factor.feature, factor.importance)?;
        }
    }

    writeln!(out)?;
    writeln!(out, "Interventions:")?;
    if detail.interventions.is_empty() {
        writeln!(out, "  (none)")?;
    }
    for intervention in &detail.interventions {
        writeln!(out, "  [{}] {}", intervention.created_at, intervention.note)?;
    }
    Ok(())
}

fn student_progress(out: &mut impl Write, progress: &StudentProgress) -> io::Result<()> {
    let p = &progress.progress;
    writeln!(out, "My progress")?;
    writeln!(out, "  Assignments completed: {}%", p.assignments_completed_pct)?;
    writeln!(out, "  Attendance:            {}%", p.attendance_pct)?;
    writeln!(out, "  LMS logins (7 days):   {}", p.lms_logins_last_7d)
}

fn study_plan(out: &mut impl Write, view: &StudyPlanView) -> io::Result<()> {
    writeln!(out, "Study plan for exam {}", view.exam_id)?;
    let plan = match &view.plan {
        Ok(plan) => plan,
        Err(message) => return writeln!(out, "Error: {message}"),
    };

    writeln!(out)?;
    writeln!(out, "Strengths:")?;
    for topic in &plan.summary.strengths {
        topic_line(out, topic)?;
    }

    writeln!(out)?;
    writeln!(out, "Areas for focus:")?;
    for area in &plan.summary.areas_for_focus {
        topic_line(out, &area.score)?;
        for resource in &area.resources {
            writeln!(
                out,
                "      - {} [{}] {}",
                resource.title,
                resource.kind_label(),
                resource.url
            )?;
        }
    }

    writeln!(out)?;
    writeln!(out, "All topics:")?;
    for topic in &plan.all_topics {
        topic_line(out, topic)?;
    }
    Ok(())
}

fn topic_line(out: &mut impl Write, topic: &TopicScore) -> io::Result<()> {
    writeln!(
        out,
        "  {:<32} {}% ({}/{})",
        topic.topic, topic.score_pct, topic.correct, topic.total
    )
}

fn risk(probability: Option<f64>) -> String {
    probability.map_or_else(|| "-".to_owned(), |p| format!("{p:.2}"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pass_core::{ExamId, StudentId, StudentSummary};

    use super::*;

    fn render(f: impl FnOnce(&mut Vec<u8>) -> io::Result<()>) -> String {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_student_list_shows_unscored_as_dash() {
        let list = StudentList {
            students: vec![StudentSummary {
                student_id: StudentId::new(7),
                name: "Ada".to_owned(),
                department: None,
                risk_probability: None,
                risk_generated_at: None,
            }],
        };
        let text = render(|out| student_list(out, &list));
        assert!(text.contains("Ada"));
        assert!(text.trim_end().ends_with('-'));
    }

    #[test]
    fn test_study_plan_error_is_inline() {
        let view = StudyPlanView {
            exam_id: ExamId::new(3),
            plan: Err("No attempt found".to_owned()),
        };
        let text = render(|out| page(out, &Page::StudyPlan(view)));
        assert_eq!(text, "Study plan for exam 3\nError: No attempt found\n");
    }

    #[test]
    fn test_login_page_suggests_next() {
        let text = render(|out| {
            page(
                out,
                &Page::Login {
                    return_to: Some(Route::AdvisorDashboard),
                },
            )
        });
        assert!(text.contains("--next '/advisor'"));
    }
}
