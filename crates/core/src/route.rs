//! Client-side routes.

use core::fmt;

use crate::guard::Requirement;
use crate::types::{ExamId, Role};

/// A location in the client.
///
/// Unknown paths parse to [`Route::NotFound`], which always redirects home.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Route {
    /// `/login`
    Login,
    /// `/`, which forwards to the dashboard of the signed-in role.
    Home,
    /// `/advisor`
    AdvisorDashboard,
    /// `/student`
    StudentDashboard,
    /// `/student/study-plan?exam_id=<id>`
    StudyPlan {
        /// Exam to diagnose; the page falls back to a default when absent.
        exam_id: Option<ExamId>,
    },
    /// Any other path.
    NotFound(String),
}

impl Route {
    /// Parse a location (path plus optional query string).
    ///
    /// Trailing slashes are ignored. A malformed `exam_id` is treated as absent.
    #[must_use]
    pub fn parse(location: &str) -> Self {
        let location = location.trim();
        let (path, query) = location
            .split_once('?')
            .map_or((location, None), |(path, query)| (path, Some(query)));
        let path = match path.trim_end_matches('/') {
            "" => "/",
            trimmed => trimmed,
        };

        match path {
            "/" => Self::Home,
            "/login" => Self::Login,
            "/advisor" => Self::AdvisorDashboard,
            "/student" => Self::StudentDashboard,
            "/student/study-plan" => Self::StudyPlan {
                exam_id: query.and_then(|q| query_param(q, "exam_id")?.parse().ok()),
            },
            _ => Self::NotFound(location.to_owned()),
        }
    }

    /// Who may render this route. `None` means the route is public (login)
    /// or is itself a redirect (not found).
    #[must_use]
    pub const fn requirement(&self) -> Option<Requirement> {
        match self {
            Self::Login | Self::NotFound(_) => None,
            Self::Home => Some(Requirement::Any),
            Self::AdvisorDashboard => Some(Requirement::Role(Role::Advisor)),
            Self::StudentDashboard | Self::StudyPlan { .. } => Some(Requirement::Role(Role::Student)),
        }
    }

    /// The landing dashboard for a role.
    #[must_use]
    pub const fn home_for(role: Role) -> Self {
        match role {
            Role::Advisor => Self::AdvisorDashboard,
            Role::Student => Self::StudentDashboard,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Login => f.write_str("/login"),
            Self::Home => f.write_str("/"),
            Self::AdvisorDashboard => f.write_str("/advisor"),
            Self::StudentDashboard => f.write_str("/student"),
            Self::StudyPlan { exam_id: Some(id) } => write!(f, "/student/study-plan?exam_id={id}"),
            Self::StudyPlan { exam_id: None } => f.write_str("/student/study-plan"),
            Self::NotFound(location) => f.write_str(location),
        }
    }
}

fn query_param<'a>(query: &'a str, key: &str) -> Option<&'a str> {
    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find_map(|(k, v)| (k == key).then_some(v))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_paths() {
        assert_eq!(Route::parse("/"), Route::Home);
        assert_eq!(Route::parse(""), Route::Home);
        assert_eq!(Route::parse("/login"), Route::Login);
        assert_eq!(Route::parse("/advisor/"), Route::AdvisorDashboard);
        assert_eq!(Route::parse("/student"), Route::StudentDashboard);
    }

    #[test]
    fn test_parse_study_plan_query() {
        assert_eq!(
            Route::parse("/student/study-plan?exam_id=3"),
            Route::StudyPlan {
                exam_id: Some(ExamId::new(3))
            }
        );
        assert_eq!(
            Route::parse("/student/study-plan?foo=1&exam_id=x"),
            Route::StudyPlan { exam_id: None }
        );
        assert_eq!(
            Route::parse("/student/study-plan"),
            Route::StudyPlan { exam_id: None }
        );
    }

    #[test]
    fn test_unknown_path_is_not_found() {
        assert_eq!(
            Route::parse("/nope?x=1"),
            Route::NotFound("/nope?x=1".to_owned())
        );
        assert_eq!(Route::parse("/nope").requirement(), None);
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        let routes = [
            Route::Login,
            Route::Home,
            Route::AdvisorDashboard,
            Route::StudentDashboard,
            Route::StudyPlan {
                exam_id: Some(ExamId::new(1)),
            },
        ];
        for route in routes {
            assert_eq!(Route::parse(&route.to_string()), route);
        }
    }

    #[test]
    fn test_home_for_role() {
        assert_eq!(Route::home_for(Role::Advisor), Route::AdvisorDashboard);
        assert_eq!(Route::home_for(Role::Student), Route::StudentDashboard);
    }
}
