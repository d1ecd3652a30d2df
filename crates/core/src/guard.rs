//! Route authorization.
//!
//! [`authorize`] is the per-route decision. [`navigate`] applies it to a
//! requested route and follows the resulting redirects to the route that
//! actually renders. Both are pure and are re-evaluated on every navigation.

use crate::route::Route;
use crate::session::SessionState;
use crate::types::Role;

/// Who may render a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Requirement {
    /// Any authenticated user.
    Any,
    /// Only users holding this role.
    Role(Role),
}

/// Outcome of checking one route against the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Decision {
    /// Resolution is still in flight: show a placeholder, do not redirect.
    Pending,
    /// Render the route.
    Render,
    /// Send the user to the login page.
    RedirectLogin,
    /// Send the user to the dashboard of their own role.
    RedirectHome,
}

/// Decide whether a route with `requirement` may render for `state`.
#[must_use]
pub fn authorize(state: &SessionState, requirement: Requirement) -> Decision {
    match (state, requirement) {
        (SessionState::Unknown, _) => Decision::Pending,
        (SessionState::Unauthenticated, _) => Decision::RedirectLogin,
        (SessionState::Authenticated(_), Requirement::Any) => Decision::Render,
        (SessionState::Authenticated(identity), Requirement::Role(role)) => {
            if identity.role == role {
                Decision::Render
            } else {
                Decision::RedirectHome
            }
        }
    }
}

/// Result of a navigation attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    /// The session is still resolving; show the loading placeholder.
    Pending,
    /// Navigation settled on a route that renders.
    Landed(Landing),
}

impl Navigation {
    /// The landed route, if navigation settled.
    #[must_use]
    pub const fn route(&self) -> Option<&Route> {
        match self {
            Self::Pending => None,
            Self::Landed(landing) => Some(&landing.route),
        }
    }
}

/// Where a navigation ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Landing {
    /// Route that renders.
    pub route: Route,
    /// Routes redirected away from, in order.
    pub redirected_from: Vec<Route>,
    /// Protected route to resume after login, when the user was sent to login.
    pub return_to: Option<Route>,
}

impl Landing {
    fn direct(route: Route) -> Self {
        Self {
            route,
            redirected_from: Vec::new(),
            return_to: None,
        }
    }

    /// Whether any redirect happened.
    #[must_use]
    pub fn was_redirected(&self) -> bool {
        !self.redirected_from.is_empty()
    }
}

/// Resolve a navigation to `requested` under `state`.
///
/// Every chain terminates: the home redirect always lands on the dashboard of
/// the identity's own role, which that identity is authorized to render.
#[must_use]
pub fn navigate(state: &SessionState, requested: Route) -> Navigation {
    let mut redirected_from = Vec::new();
    let target = match requested {
        Route::NotFound(_) => {
            redirected_from.push(requested);
            Route::Home
        }
        route => route,
    };

    let Some(requirement) = target.requirement() else {
        return Navigation::Landed(Landing {
            redirected_from,
            ..Landing::direct(target)
        });
    };

    let identity = match authorize(state, requirement) {
        Decision::Pending => return Navigation::Pending,
        Decision::RedirectLogin => {
            let return_to = (target != Route::Home).then(|| target.clone());
            redirected_from.push(target);
            return Navigation::Landed(Landing {
                route: Route::Login,
                redirected_from,
                return_to,
            });
        }
        Decision::Render if target != Route::Home => {
            return Navigation::Landed(Landing {
                redirected_from,
                ..Landing::direct(target)
            });
        }
        Decision::Render | Decision::RedirectHome => match state.identity() {
            Some(identity) => identity,
            None => return Navigation::Pending,
        },
    };

    if target != Route::Home {
        redirected_from.push(target);
    }
    redirected_from.push(Route::Home);
    Navigation::Landed(Landing {
        route: Route::home_for(identity.role),
        redirected_from,
        return_to: None,
    })
}
