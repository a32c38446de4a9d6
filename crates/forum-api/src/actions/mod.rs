//! The topic and post form actions.
//!
//! Each action runs the same sequential pipeline: parse the form, resolve
//! the session, (for posts) find the parent topic, insert one row, then
//! revalidate the parent listing page. Every failure is reported as a
//! [`FormState`]; success yields the page to redirect to.

mod create_post;
mod create_topic;

use std::sync::Arc;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};

use crate::{
    auth::{Session, SessionResolver, SessionUser},
    cache::PathRevalidator,
    form_state::FormState,
    store::ForumStore,
};

pub use create_post::{CANNOT_FIND_TOPIC, POST_FALLBACK_MESSAGE, create_post};
pub use create_topic::{TOPIC_FALLBACK_MESSAGE, create_topic};

pub const SIGN_IN_REQUIRED: &str = "You must be signed in to do this.";

/// Collaborators injected into every action
#[derive(Clone)]
pub struct ActionContext {
    pub store: Arc<dyn ForumStore>,
    pub sessions: Arc<dyn SessionResolver>,
    pub revalidator: Arc<dyn PathRevalidator>,
}

impl std::fmt::Debug for ActionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionContext").finish_non_exhaustive()
    }
}

/// Result of one action invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    AuthFailed(FormState),
    ValidationFailed(FormState),
    NotFound(FormState),
    PersistFailed(FormState),
    /// The row was written and its parent page revalidated
    Created { entity: T, redirect: String },
}

impl<T> Outcome<T> {
    /// The error report, `None` on success
    pub const fn form_state(&self) -> Option<&FormState> {
        match self {
            Self::AuthFailed(state)
            | Self::ValidationFailed(state)
            | Self::NotFound(state)
            | Self::PersistFailed(state) => Some(state),
            Self::Created { .. } => None,
        }
    }

    /// Short name used as a metrics label
    pub const fn label(&self) -> &'static str {
        match self {
            Self::AuthFailed(_) => "auth_failed",
            Self::ValidationFailed(_) => "validation_failed",
            Self::NotFound(_) => "not_found",
            Self::PersistFailed(_) => "persist_failed",
            Self::Created { .. } => "created",
        }
    }

    pub const fn is_created(&self) -> bool {
        matches!(self, Self::Created { .. })
    }
}

impl<T> IntoResponse for Outcome<T> {
    fn into_response(self) -> Response {
        let (status, state) = match self {
            Self::Created { redirect, .. } => return Redirect::to(&redirect).into_response(),
            Self::AuthFailed(state) => (StatusCode::UNAUTHORIZED, state),
            Self::ValidationFailed(state) => (StatusCode::UNPROCESSABLE_ENTITY, state),
            Self::NotFound(state) => (StatusCode::NOT_FOUND, state),
            Self::PersistFailed(state) => (StatusCode::BAD_REQUEST, state),
        };

        (status, Json(state)).into_response()
    }
}

/// The signed-in user, if the session has one
async fn signed_in_user(
    sessions: &dyn SessionResolver,
    headers: &axum::http::HeaderMap,
) -> Option<SessionUser> {
    sessions
        .resolve(headers)
        .await
        .and_then(|Session { user }| user)
}

#[cfg(test)]
mod test_support;
