//! Navigation guard and route tracking.

use crate::session_state::SessionState;
use roster_core::error::{Result, RosterError};
use roster_core::route::Route;
use roster_core::session::AuthStatus;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock, watch};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationDecision {
    Proceed,
    Redirect(Route),
}

/// Without a token only the login route is reachable.
pub fn guard(authenticated: bool, target: &Route) -> NavigationDecision {
    if authenticated || target.is_login() {
        NavigationDecision::Proceed
    } else {
        NavigationDecision::Redirect(Route::Login)
    }
}

/// Applies [`guard`] to the live session.
pub struct NavigationGuard {
    session: Arc<SessionState>,
}

impl NavigationGuard {
    pub fn new(session: Arc<SessionState>) -> Self {
        Self { session }
    }

    pub fn before_each(&self, target: &Route) -> NavigationDecision {
        guard(self.session.is_authenticated(), target)
    }
}

/// Tracks the current route and sends the user to login once the session ends.
pub struct Navigator {
    guard: NavigationGuard,
    current: RwLock<Route>,
    status: Mutex<watch::Receiver<AuthStatus>>,
}

impl Navigator {
    pub fn new(session: Arc<SessionState>) -> Self {
        let status = session.subscribe();
        Self {
            guard: NavigationGuard::new(session),
            current: RwLock::new(Route::Login),
            status: Mutex::new(status),
        }
    }

    pub async fn current(&self) -> Route {
        *self.current.read().await
    }

    /// Navigates to `target` and returns the route that was actually entered.
    pub async fn navigate(&self, target: Route) -> Route {
        let target = match target {
            Route::Root => Route::Calendar,
            other => other,
        };
        let entered = match self.guard.before_each(&target) {
            NavigationDecision::Proceed => target,
            NavigationDecision::Redirect(route) => {
                tracing::debug!(from = %target, to = %route, "Navigation redirected");
                route
            }
        };
        *self.current.write().await = entered;
        entered
    }

    /// Re-applies the guard to the current route.
    pub async fn sync(&self) -> Route {
        let current = self.current().await;
        self.navigate(current).await
    }

    /// Waits for the next session status change, then re-applies the guard.
    pub async fn changed(&self) -> Result<Route> {
        self.status
            .lock()
            .await
            .changed()
            .await
            .map_err(|_| RosterError::internal("session state dropped"))?;
        Ok(self.sync().await)
    }
}
