//! Application shell.
//!
//! Ties the session, the route guard and the page controllers together: a
//! location goes in, the guard settles where it lands, and the landed page's
//! data comes back.

use std::sync::Arc;

use pass_core::{
    Identity, Landing, Navigation, Route, SessionState, StudentList, StudentProgress, navigate,
};
use secrecy::SecretString;
use tracing::{debug, instrument};

use crate::api::ApiClient;
use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::pages::{self, StudyPlanView, advisor, student, study_plan};
use crate::session::Session;
use crate::token_store::FileTokenStore;

/// Content of a landed page.
#[derive(Debug, Clone, PartialEq)]
pub enum Page {
    /// Session still resolving.
    Loading,
    /// Sign-in form.
    Login {
        /// Route to resume after signing in.
        return_to: Option<Route>,
    },
    /// Advisor dashboard with the at-risk list.
    Advisor(StudentList),
    /// Student dashboard.
    Student(StudentProgress),
    /// Study plan for one exam.
    StudyPlan(StudyPlanView),
}

/// A navigation together with the page it produced.
#[derive(Debug, Clone, PartialEq)]
pub struct Screen {
    /// How the guard resolved the requested location.
    pub navigation: Navigation,
    /// What to display.
    pub page: Page,
}

impl Screen {
    /// The landing, unless the session was still resolving.
    #[must_use]
    pub const fn landing(&self) -> Option<&Landing> {
        match &self.navigation {
            Navigation::Landed(landing) => Some(landing),
            Navigation::Pending => None,
        }
    }
}

/// The PASS client application.
#[derive(Debug)]
pub struct App {
    session: Session,
    return_to: Option<Route>,
}

impl App {
    /// Create an app whose session has not been resolved yet.
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self {
            session: Session::new(api),
            return_to: None,
        }
    }

    /// Create an app persisting its credential at the configured path.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn from_config(config: &ClientConfig) -> Result<Self, ClientError> {
        let store = Arc::new(FileTokenStore::new(&config.token_path));
        Ok(Self::new(ApiClient::from_config(config, store)?))
    }

    /// The session.
    #[must_use]
    pub const fn session(&self) -> &Session {
        &self.session
    }

    /// The API client.
    #[must_use]
    pub const fn api(&self) -> &ApiClient {
        self.session.api()
    }

    /// The signed-in identity, if any.
    #[must_use]
    pub const fn identity(&self) -> Option<&Identity> {
        self.session.identity()
    }

    /// Route to resume after the next successful sign-in.
    pub fn set_return_to(&mut self, route: Option<Route>) {
        self.return_to = route;
    }

    /// Resolve the stored credential, once.
    ///
    /// # Errors
    ///
    /// Returns an error if the token store fails.
    pub async fn start(&mut self) -> Result<&SessionState, ClientError> {
        Ok(self.session.ensure_resolved().await?)
    }

    /// Run the guard for `location` without loading any data.
    ///
    /// Landing on the login page remembers where the user was headed, and
    /// forgets any earlier destination when the latest navigation had none.
    pub fn navigate(&mut self, location: &str) -> Navigation {
        let navigation = navigate(self.session.state(), Route::parse(location));
        if let Navigation::Landed(landing) = &navigation {
            if landing.route == Route::Login {
                self.return_to.clone_from(&landing.return_to);
            }
        }
        navigation
    }

    /// Navigate to `location` and load the landed page.
    ///
    /// # Errors
    ///
    /// Returns an error if a dashboard's data cannot be loaded. Study plan
    /// failures are reported inside the page instead.
    #[instrument(skip(self))]
    pub async fn open(&mut self, location: &str) -> Result<Screen, ClientError> {
        let navigation = self.navigate(location);
        self.render(navigation).await
    }

    /// Sign in, then land on the remembered route or the role's dashboard.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Login`] if signing in fails (nothing is changed
    /// in that case), or an error loading the landed page.
    pub async fn login(
        &mut self,
        email: &str,
        password: &SecretString,
    ) -> Result<Screen, ClientError> {
        pages::login(&mut self.session, email, password).await?;
        let target = self.return_to.take().unwrap_or(Route::Home);
        debug!(target = %target, "post-login navigation");
        let navigation = navigate(self.session.state(), target);
        self.render(navigation).await
    }

    /// Sign out and land on the login page.
    ///
    /// # Errors
    ///
    /// Returns an error if the token store cannot be cleared.
    pub fn logout(&mut self) -> Result<Screen, ClientError> {
        self.session.logout()?;
        self.return_to = None;
        Ok(Screen {
            navigation: navigate(self.session.state(), Route::Login),
            page: Page::Login { return_to: None },
        })
    }

    async fn render(&self, navigation: Navigation) -> Result<Screen, ClientError> {
        let page = match &navigation {
            Navigation::Pending => Page::Loading,
            Navigation::Landed(landing) => self.load(landing).await?,
        };
        Ok(Screen { navigation, page })
    }

    async fn load(&self, landing: &Landing) -> Result<Page, ClientError> {
        let api = self.api();
        let page = match &landing.route {
            Route::Login => Page::Login {
                return_to: self.return_to.clone(),
            },
            Route::AdvisorDashboard => Page::Advisor(advisor::students(api).await?),
            Route::StudentDashboard => Page::Student(student::progress(api).await?),
            Route::StudyPlan { exam_id } => Page::StudyPlan(study_plan::load(api, *exam_id).await),
            route @ (Route::Home | Route::NotFound(_)) => {
                return Err(ClientError::Unroutable(route.clone()));
            }
        };
        Ok(page)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pass_core::{Role, UserId};

    use super::*;
    use crate::token_store::MemoryTokenStore;

    fn app(store: MemoryTokenStore) -> App {
        App::new(ApiClient::new("http://127.0.0.1:9", Arc::new(store)).unwrap())
    }

    #[tokio::test]
    async fn test_open_before_start_shows_loading() {
        let mut app = app(MemoryTokenStore::with_token("T1"));
        let screen = app.open("/advisor").await.unwrap();
        assert_eq!(screen.page, Page::Loading);
        assert!(screen.landing().is_none());
    }

    #[tokio::test]
    async fn test_signed_out_visit_remembers_return_to() {
        let mut app = app(MemoryTokenStore::new());
        app.start().await.unwrap();

        let screen = app.open("/student/study-plan?exam_id=4").await.unwrap();
        let expected = Route::parse("/student/study-plan?exam_id=4");
        assert_eq!(
            screen.page,
            Page::Login {
                return_to: Some(expected)
            }
        );
    }

    #[tokio::test]
    async fn test_later_login_landing_replaces_return_to() {
        let mut app = app(MemoryTokenStore::new());
        app.start().await.unwrap();

        app.open("/advisor").await.unwrap();
        let screen = app.open("/").await.unwrap();
        assert_eq!(screen.page, Page::Login { return_to: None });

        app.open("/advisor").await.unwrap();
        let screen = app.open("/login").await.unwrap();
        assert_eq!(screen.page, Page::Login { return_to: None });

        app.open("/advisor").await.unwrap();
        let screen = app.open("/student").await.unwrap();
        assert_eq!(
            screen.page,
            Page::Login {
                return_to: Some(Route::StudentDashboard)
            }
        );
    }

    #[tokio::test]
    async fn test_logout_lands_on_login() {
        let store = MemoryTokenStore::with_token("T1");
        let mut app = app(store);
        app.session
            .set_identity(Identity::new(UserId::new(1), "A", Role::Advisor))
            .unwrap();

        let screen = app.logout().unwrap();
        assert_eq!(screen.page, Page::Login { return_to: None });
        assert_eq!(app.session().state(), &SessionState::Unauthenticated);
    }
}
