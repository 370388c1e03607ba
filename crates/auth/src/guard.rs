use std::sync::Arc;

use crate::CredentialProvider;

/// Where the guard sends a caller that may not see an authenticated route.
pub const LOGIN_ROUTE: &str = "/login";

/// Access class of a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouteAccess {
    Public,
    Authenticated,
}

/// What the guard knows about the current session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Session {
    pub authenticated: bool,
    /// Set once a profile fetch has been rejected for the current token.
    pub profile_failed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteDecision {
    Render,
    Redirect(String),
}

impl RouteDecision {
    pub fn is_render(&self) -> bool {
        matches!(self, RouteDecision::Render)
    }
}

/// Route access policy.
///
/// - No IO
/// - Public routes always render
///
/// This only decides what to show; the server still enforces authorization.
pub fn authorize_route(access: RouteAccess, session: Session) -> RouteDecision {
    match access {
        RouteAccess::Public => RouteDecision::Render,
        RouteAccess::Authenticated if session.authenticated && !session.profile_failed => {
            RouteDecision::Render
        }
        RouteAccess::Authenticated => RouteDecision::Redirect(LOGIN_ROUTE.to_string()),
    }
}

const PUBLIC_ROUTES: [&str; 5] = [
    "/landing",
    "/login",
    "/signup",
    "/forgot-password",
    "/reset-password/:token",
];

/// Route guard bound to the shared credential.
#[derive(Debug, Clone)]
pub struct AccessGuard {
    credentials: Arc<CredentialProvider>,
    public: Vec<String>,
}

impl AccessGuard {
    pub fn new(credentials: Arc<CredentialProvider>) -> Self {
        Self {
            credentials,
            public: PUBLIC_ROUTES.iter().map(|r| r.to_string()).collect(),
        }
    }

    /// Anything not registered as public requires a credential.
    pub fn access_for(&self, path: &str) -> RouteAccess {
        if self.public.iter().any(|p| route_matches(p, path)) {
            RouteAccess::Public
        } else {
            RouteAccess::Authenticated
        }
    }

    pub fn session(&self, profile_failed: bool) -> Session {
        Session {
            authenticated: self.credentials.is_authenticated(),
            profile_failed,
        }
    }

    pub fn decide(&self, path: &str, profile_failed: bool) -> RouteDecision {
        let decision = authorize_route(self.access_for(path), self.session(profile_failed));
        if !decision.is_render() {
            tracing::debug!(path, "redirecting unauthenticated navigation");
        }
        decision
    }
}

fn route_matches(pattern: &str, path: &str) -> bool {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    let mut want = pattern.trim_matches('/').split('/');
    let mut got = path.trim_matches('/').split('/');

    loop {
        match (want.next(), got.next()) {
            (None, None) => return true,
            (Some(w), Some(g)) if w.starts_with(':') && !g.is_empty() => {}
            (Some(w), Some(g)) if w == g => {}
            _ => return false,
        }
    }
}
