use axum::{
    Router,
    extract::{Path, State},
    http::HeaderMap,
    response::Response,
    routing::{get, post},
};
use forum_db::models::Post;
use uuid::Uuid;

use crate::{
    ApiState, actions, actions::Outcome, error::ApiError, form_fields::FormFields, metrics, paths,
    validation,
};

use super::model::CreatePostForm;

/// Create the post routes
pub fn routes() -> Router<ApiState> {
    Router::new()
        .route("/topics/{slug}/posts", post(create_post))
        .route("/topics/{slug}/posts/{post_id}", get(show_post))
}

async fn create_post(
    State(state): State<ApiState>,
    Path(slug): Path<String>,
    headers: HeaderMap,
    fields: FormFields,
) -> Outcome<Post> {
    let form = CreatePostForm::from(fields);
    let outcome = actions::create_post(&state.actions, &headers, &slug, form).await;
    metrics::record_action("create_post", outcome.label());
    outcome
}

/// Single post page; posts never change once written
async fn show_post(
    State(state): State<ApiState>,
    Path((slug, post_id)): Path<(String, Uuid)>,
) -> Result<Response, ApiError> {
    if !validation::is_valid_slug(&slug) {
        return Err(ApiError::NotFound("Post".to_string()));
    }

    let store = state.actions.store.clone();
    let path = paths::post_show(&slug, post_id);

    state
        .page_cache
        .cached_json(&path, || async move {
            let topic = store
                .find_topic_by_slug(&slug)
                .await?
                .ok_or_else(|| ApiError::NotFound("Topic".to_string()))?;

            store
                .find_post(topic.id, post_id)
                .await?
                .ok_or_else(|| ApiError::NotFound("Post".to_string()))
        })
        .await
}
