// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session guard and the per-session context handed to controllers.

use crate::db::FootprintGateway;
use crate::error::AuthError;
use crate::models::Session;
use std::sync::Arc;

/// What is known about the visitor's session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// Auth state has not been resolved yet.
    Loading,
    SignedIn(Session),
    SignedOut,
}

impl SessionState {
    /// Fold a token lookup into a state. Rejected tokens count as signed out.
    pub fn from_resolution(resolved: Result<Session, AuthError>) -> Self {
        match resolved {
            Ok(session) => SessionState::SignedIn(session),
            Err(AuthError::Provider(msg)) => {
                tracing::warn!(error = %msg, "Auth provider error, treating as signed out");
                SessionState::SignedOut
            }
            Err(_) => SessionState::SignedOut,
        }
    }
}

/// What the view should do for a given session state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    ShowLoading,
    Render(Session),
    Redirect(String),
}

/// Gates the map view on authentication.
#[derive(Debug, Clone)]
pub struct SessionGuard {
    login_path: String,
}

impl SessionGuard {
    pub fn new(login_path: impl Into<String>) -> Self {
        Self {
            login_path: login_path.into(),
        }
    }

    pub fn login_path(&self) -> &str {
        &self.login_path
    }

    /// Single check, no retry.
    pub fn check(&self, state: &SessionState) -> GuardDecision {
        match state {
            SessionState::Loading => GuardDecision::ShowLoading,
            SessionState::SignedIn(session) => GuardDecision::Render(session.clone()),
            SessionState::SignedOut => GuardDecision::Redirect(self.login_path.clone()),
        }
    }
}

/// Everything a controller needs to talk to the backend for one user.
#[derive(Clone)]
pub struct SessionContext {
    session: Session,
    gateway: Arc<dyn FootprintGateway>,
}

impl SessionContext {
    pub fn new(session: Session, gateway: Arc<dyn FootprintGateway>) -> Self {
        Self { session, gateway }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn gateway(&self) -> &dyn FootprintGateway {
        self.gateway.as_ref()
    }

    /// Swap in a refreshed access token for the same user.
    ///
    /// Returns `false` (and keeps the old session) if `session` belongs to
    /// someone else.
    pub fn refresh(&mut self, session: Session) -> bool {
        if session.user_id != self.session.user_id {
            return false;
        }
        self.session = session;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(user_id: &str) -> Session {
        Session {
            user_id: user_id.to_string(),
            email: Some("hiker@example.com".to_string()),
            access_token: "token".to_string(),
        }
    }

    #[test]
    fn test_guard_decisions() {
        let guard = SessionGuard::new("/login");

        assert_eq!(
            guard.check(&SessionState::Loading),
            GuardDecision::ShowLoading
        );
        assert_eq!(
            guard.check(&SessionState::SignedOut),
            GuardDecision::Redirect("/login".to_string())
        );
        assert_eq!(
            guard.check(&SessionState::SignedIn(session("user-1"))),
            GuardDecision::Render(session("user-1"))
        );
    }

    #[test]
    fn test_rejected_tokens_are_signed_out() {
        assert_eq!(
            SessionState::from_resolution(Err(AuthError::InvalidToken)),
            SessionState::SignedOut
        );
        assert_eq!(
            SessionState::from_resolution(Err(AuthError::Provider("down".to_string()))),
            SessionState::SignedOut
        );
    }

    #[test]
    fn test_refresh_keeps_owner() {
        let gateway = Arc::new(crate::db::InMemoryGateway::new());
        let mut ctx = SessionContext::new(session("user-1"), gateway);

        let mut rotated = session("user-1");
        rotated.access_token = "rotated".to_string();
        assert!(ctx.refresh(rotated));
        assert_eq!(ctx.session().access_token, "rotated");

        assert!(!ctx.refresh(session("user-2")));
        assert_eq!(ctx.session().user_id, "user-1");
    }
}
