//! Lenient form body extraction for the form actions.
//!
//! Form actions always answer with a [`FormState`](crate::form_state::FormState)
//! or a redirect, so the body extractor never rejects. An unreadable body
//! (wrong content type, malformed encoding) is read as a form with no fields.

use axum::{
    Form,
    extract::{FromRequest, Request},
};
use std::convert::Infallible;

/// Submitted `application/x-www-form-urlencoded` fields, in body order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormFields(Vec<(String, String)>);

impl FormFields {
    /// The first value submitted for `name`; later repeats are ignored
    pub fn get(&self, name: &str) -> Option<String> {
        self.0
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.clone())
    }
}

impl<const N: usize> From<[(&str, &str); N]> for FormFields {
    fn from(pairs: [(&str, &str); N]) -> Self {
        Self(
            pairs
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }
}

impl<S> FromRequest<S> for FormFields
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Form::<Vec<(String, String)>>::from_request(req, state).await {
            Ok(Form(pairs)) => Ok(Self(pairs)),
            Err(rejection) => {
                tracing::debug!(error = %rejection, "Unreadable form body, treating it as empty");
                Ok(Self::default())
            }
        }
    }
}
