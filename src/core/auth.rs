//! Authorization gate for session-protected routes
//!
//! Session and login mechanics live outside this crate. The gate only
//! needs an [`AuthProvider`] that turns request metadata into an
//! [`AuthContext`], and an [`AuthPolicy`] per route group. Rejected
//! requests never reach a handler.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use axum::extract::{Request, State};
use axum::http::header::{AUTHORIZATION, COOKIE};
use axum::http::request::Parts;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::core::error::AdminError;

/// Name of the cookie carrying a session token
pub const SESSION_COOKIE: &str = "access_token";

/// Authorization context extracted from a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthContext {
    /// Logged-in administrator session
    Session { subject: String },

    /// No session
    Anonymous,
}

impl AuthContext {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, AuthContext::Session { .. })
    }
}

/// Authorization policy for a route group
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthPolicy {
    /// Public access (no session required)
    Public,

    /// Any logged-in session
    Authenticated,
}

impl AuthPolicy {
    /// Check if auth context satisfies this policy
    pub fn check(&self, context: &AuthContext) -> bool {
        match self {
            AuthPolicy::Public => true,
            AuthPolicy::Authenticated => context.is_authenticated(),
        }
    }
}

/// Trait for auth providers
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Extract auth context from request metadata
    async fn extract_context(&self, parts: &Parts) -> AuthContext;
}

/// Provider that treats every request as logged in (for development)
pub struct NoAuthProvider;

#[async_trait]
impl AuthProvider for NoAuthProvider {
    async fn extract_context(&self, _parts: &Parts) -> AuthContext {
        AuthContext::Session {
            subject: "development".to_string(),
        }
    }
}

/// Provider accepting a fixed set of session tokens
///
/// The token is read from `Authorization: Bearer <token>` or from the
/// `access_token` cookie.
pub struct TokenAuthProvider {
    tokens: HashSet<String>,
}

impl TokenAuthProvider {
    pub fn new<I, T>(tokens: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self {
            tokens: tokens.into_iter().map(Into::into).collect(),
        }
    }

    fn token_from_parts(parts: &Parts) -> Option<String> {
        let bearer = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(|t| t.trim().to_string());
        if bearer.is_some() {
            return bearer;
        }

        parts
            .headers
            .get_all(COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .flat_map(|v| v.split(';'))
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(name, _)| *name == SESSION_COOKIE)
            .map(|(_, value)| value.to_string())
    }
}

#[async_trait]
impl AuthProvider for TokenAuthProvider {
    async fn extract_context(&self, parts: &Parts) -> AuthContext {
        match Self::token_from_parts(parts) {
            Some(token) if self.tokens.contains(&token) => AuthContext::Session {
                subject: "admin".to_string(),
            },
            _ => AuthContext::Anonymous,
        }
    }
}

/// State for the [`require_session`] middleware
#[derive(Clone)]
pub struct AuthGate {
    pub provider: Arc<dyn AuthProvider>,
    pub policy: AuthPolicy,
}

/// Middleware rejecting requests that fail the gate's policy
///
/// The resolved [`AuthContext`] is inserted into request extensions for
/// handlers that want it.
pub async fn require_session(
    State(gate): State<AuthGate>,
    req: Request,
    next: Next,
) -> Response {
    let (mut parts, body) = req.into_parts();
    let context = gate.provider.extract_context(&parts).await;

    if !gate.policy.check(&context) {
        tracing::debug!(path = %parts.uri.path(), "request rejected by session gate");
        return AdminError::Unauthorized {
            message: "login required".to_string(),
        }
        .into_response();
    }

    parts.extensions.insert(context);
    next.run(Request::from_parts(parts, body)).await
}
