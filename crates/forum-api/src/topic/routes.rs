use axum::{
    Router,
    extract::{Path, State},
    http::HeaderMap,
    response::Response,
    routing::{get, post},
};
use forum_db::models::{Post, Topic};
use serde::Serialize;

use crate::{
    ApiState, actions, actions::Outcome, error::ApiError, form_fields::FormFields, metrics, paths,
    validation,
};

use super::model::CreateTopicForm;

/// Topic page payload: the topic and its posts, newest first
#[derive(Debug, Serialize)]
pub struct TopicPage {
    pub topic: Topic,
    pub posts: Vec<Post>,
}

/// Create the topic routes
pub fn routes() -> Router<ApiState> {
    Router::new()
        .route(paths::home(), get(list_topics))
        .route("/topics", post(create_topic))
        .route("/topics/{slug}", get(show_topic))
}

/// Home page: every topic
async fn list_topics(State(state): State<ApiState>) -> Result<Response, ApiError> {
    let store = state.actions.store.clone();

    state
        .page_cache
        .cached_json(paths::home(), || async move {
            Ok::<_, ApiError>(store.list_topics().await?)
        })
        .await
}

/// Topic page, cached until a post is added to the topic
async fn show_topic(
    State(state): State<ApiState>,
    Path(slug): Path<String>,
) -> Result<Response, ApiError> {
    if !validation::is_valid_slug(&slug) {
        return Err(ApiError::NotFound("Topic".to_string()));
    }

    let store = state.actions.store.clone();
    let path = paths::topic_show(&slug);

    state
        .page_cache
        .cached_json(&path, || async move {
            let topic = store
                .find_topic_by_slug(&slug)
                .await?
                .ok_or_else(|| ApiError::NotFound("Topic".to_string()))?;
            let posts = store.list_posts(topic.id).await?;

            Ok::<_, ApiError>(TopicPage { topic, posts })
        })
        .await
}

async fn create_topic(
    State(state): State<ApiState>,
    headers: HeaderMap,
    fields: FormFields,
) -> Outcome<Topic> {
    let form = CreateTopicForm::from(fields);
    let outcome = actions::create_topic(&state.actions, &headers, form).await;
    metrics::record_action("create_topic", outcome.label());
    outcome
}
