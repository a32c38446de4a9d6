//! Session resolution for form actions.
//!
//! Actions never read the session from ambient request state; they are handed
//! a [`SessionResolver`] and ask it for the caller's identity.

use async_trait::async_trait;
use axum::http::HeaderMap;
use axum_extra::extract::{PrivateCookieJar, cookie::Key};
use uuid::Uuid;

use super::jwt::{AUTH_COOKIE, verify_jwt_token};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionUser {
    pub id: Uuid,
    pub email: String,
}

/// An active session; `user` is `None` when the session carries no usable identity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user: Option<SessionUser>,
}

#[async_trait]
pub trait SessionResolver: Send + Sync {
    /// Resolve the session for a request, `None` if the caller has none
    async fn resolve(&self, headers: &HeaderMap) -> Option<Session>;
}

/// Resolves sessions from the encrypted `auth_token` cookie holding a signed JWT
#[derive(Clone)]
pub struct JwtCookieSessionResolver {
    jwt_secret: String,
    cookie_key: Key,
}

impl JwtCookieSessionResolver {
    pub const fn new(jwt_secret: String, cookie_key: Key) -> Self {
        Self {
            jwt_secret,
            cookie_key,
        }
    }
}

impl std::fmt::Debug for JwtCookieSessionResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtCookieSessionResolver")
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl SessionResolver for JwtCookieSessionResolver {
    async fn resolve(&self, headers: &HeaderMap) -> Option<Session> {
        let jar = PrivateCookieJar::from_headers(headers, self.cookie_key.clone());
        let cookie = jar.get(AUTH_COOKIE)?;

        let claims = match verify_jwt_token(cookie.value(), &self.jwt_secret) {
            Ok(claims) => claims,
            Err(e) => {
                tracing::debug!(error = %e, "Ignoring invalid session token");
                return None;
            }
        };

        // A verified token whose subject is not a user id is a session without identity
        let user = Uuid::parse_str(&claims.sub)
            .ok()
            .map(|id| SessionUser {
                id,
                email: claims.email,
            });

        Some(Session { user })
    }
}
