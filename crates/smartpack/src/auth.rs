//! Session resolution for API requests.

use crate::domain::UserId;
use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;
use std::collections::HashMap;

/// Resolves a bearer token to the user it belongs to.
pub trait SessionAuthenticator: Send + Sync {
    fn resolve(&self, token: &str) -> Option<UserId>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("missing bearer token")]
    MissingToken,
    #[error("unknown session token")]
    UnknownToken,
}

/// Fixed token table, usually loaded from `APP_API_TOKENS`.
#[derive(Clone, Default)]
pub struct StaticTokenAuthenticator {
    tokens: HashMap<String, UserId>,
}

impl StaticTokenAuthenticator {
    pub fn new(tokens: HashMap<String, UserId>) -> Self {
        Self { tokens }
    }

    pub fn with_token(mut self, token: impl Into<String>, user: UserId) -> Self {
        self.tokens.insert(token.into(), user);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

impl SessionAuthenticator for StaticTokenAuthenticator {
    fn resolve(&self, token: &str) -> Option<UserId> {
        self.tokens.get(token).cloned()
    }
}

pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.trim().split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

pub fn authenticate(
    sessions: &dyn SessionAuthenticator,
    headers: &HeaderMap,
) -> Result<UserId, AuthError> {
    let token = bearer_token(headers).ok_or(AuthError::MissingToken)?;
    sessions.resolve(token).ok_or(AuthError::UnknownToken)
}
