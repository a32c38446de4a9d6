use axum::http::HeaderMap;
use forum_db::models::Topic;

use super::{ActionContext, Outcome, SIGN_IN_REQUIRED, signed_in_user};
use crate::{form_state::FormState, paths, topic::model::CreateTopicForm};

pub const TOPIC_FALLBACK_MESSAGE: &str = "Something went wrong";

/// Create a topic from the submitted form
///
/// On success the home page is revalidated and the caller is sent to the
/// new topic's page.
pub async fn create_topic(
    ctx: &ActionContext,
    headers: &HeaderMap,
    form: CreateTopicForm,
) -> Outcome<Topic> {
    // Parse before resolving the session; an auth failure still wins
    let parsed = form.parse();

    let Some(user) = signed_in_user(ctx.sessions.as_ref(), headers).await else {
        tracing::warn!("Rejected topic creation without a signed-in user");
        return Outcome::AuthFailed(FormState::form_error(SIGN_IN_REQUIRED));
    };

    let new_topic = match parsed {
        Ok(new_topic) => new_topic,
        Err(errors) => {
            tracing::debug!(user_id = %user.id, fields = ?errors.fields().collect::<Vec<_>>(), "Topic form failed validation");
            return Outcome::ValidationFailed(errors.into());
        }
    };

    let topic = match ctx.store.create_topic(new_topic).await {
        Ok(topic) => topic,
        Err(failure) => {
            tracing::error!(user_id = %user.id, error = %failure, "Failed to create topic");
            return Outcome::PersistFailed(FormState::form_error(
                failure.message_or(TOPIC_FALLBACK_MESSAGE),
            ));
        }
    };

    ctx.revalidator.revalidate_path(paths::home());

    tracing::info!(topic_id = %topic.id, slug = %topic.slug, user_id = %user.id, "Topic created");

    let redirect = paths::topic_show(&topic.slug);
    Outcome::Created {
        entity: topic,
        redirect,
    }
}
