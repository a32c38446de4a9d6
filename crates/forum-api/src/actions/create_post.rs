use axum::http::HeaderMap;
use forum_db::models::{NewPost, Post};

use super::{ActionContext, Outcome, SIGN_IN_REQUIRED, signed_in_user};
use crate::{form_state::FormState, paths, post::model::CreatePostForm, validation};

pub const CANNOT_FIND_TOPIC: &str = "Cannot find topic";
pub const POST_FALLBACK_MESSAGE: &str = "Failed to create post";

/// Create a post in the topic identified by `slug`
///
/// `slug` comes from the route, never from the form body. On success the
/// topic page is revalidated and the caller is sent to the new post.
pub async fn create_post(
    ctx: &ActionContext,
    headers: &HeaderMap,
    slug: &str,
    form: CreatePostForm,
) -> Outcome<Post> {
    let parsed = form.parse();

    let Some(user) = signed_in_user(ctx.sessions.as_ref(), headers).await else {
        tracing::warn!(slug, "Rejected post creation without a signed-in user");
        return Outcome::AuthFailed(FormState::form_error(SIGN_IN_REQUIRED));
    };

    let input = match parsed {
        Ok(input) => input,
        Err(errors) => {
            tracing::debug!(slug, user_id = %user.id, fields = ?errors.fields().collect::<Vec<_>>(), "Post form failed validation");
            return Outcome::ValidationFailed(errors.into());
        }
    };

    // A malformed slug can never name a stored topic
    let lookup = if validation::is_valid_slug(slug) {
        ctx.store.find_topic_by_slug(slug).await
    } else {
        Ok(None)
    };

    let topic = match lookup {
        Ok(Some(topic)) => topic,
        Ok(None) => {
            tracing::warn!(slug, user_id = %user.id, "Post submitted to unknown topic");
            return Outcome::NotFound(FormState::form_error(CANNOT_FIND_TOPIC));
        }
        Err(failure) => {
            tracing::error!(slug, error = %failure, "Failed to look up topic");
            return Outcome::PersistFailed(FormState::form_error(
                failure.message_or(POST_FALLBACK_MESSAGE),
            ));
        }
    };

    let new_post = NewPost {
        title: input.title,
        content: input.content,
        topic_id: topic.id,
        user_id: user.id,
    };

    // A topic deleted since the lookup fails here on the foreign key
    let post = match ctx.store.create_post(new_post).await {
        Ok(post) => post,
        Err(failure) => {
            tracing::error!(slug, user_id = %user.id, error = %failure, "Failed to create post");
            return Outcome::PersistFailed(FormState::form_error(
                failure.message_or(POST_FALLBACK_MESSAGE),
            ));
        }
    };

    ctx.revalidator.revalidate_path(&paths::topic_show(slug));

    tracing::info!(post_id = %post.id, topic_id = %topic.id, user_id = %user.id, "Post created");

    let redirect = paths::post_show(slug, post.id);
    Outcome::Created {
        entity: post,
        redirect,
    }
}
