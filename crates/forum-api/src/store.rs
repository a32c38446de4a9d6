//! Storage port used by the form actions and read routes.

use async_trait::async_trait;
use forum_db::{
    models::{NewPost, NewTopic, Post, Topic},
    repositories::{post, topic},
};
use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

/// A storage operation that did not complete.
///
/// `message` is the database's own description when it reported one.
/// Connection, pool and protocol failures carry none so their details
/// never reach a form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
#[error("{}", .message.as_deref().unwrap_or("storage operation failed"))]
pub struct PersistFailure {
    pub message: Option<String>,
}

impl PersistFailure {
    pub fn with_message(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
        }
    }

    /// The message to show on a form, `fallback` when the failure has none
    pub fn message_or(&self, fallback: &str) -> String {
        self.message
            .clone()
            .unwrap_or_else(|| fallback.to_string())
    }
}

impl From<sqlx::Error> for PersistFailure {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::Database(db_err) => Self::with_message(db_err.message()),
            other => {
                tracing::error!(error = %other, "Database driver error");
                Self::default()
            }
        }
    }
}

#[async_trait]
pub trait ForumStore: Send + Sync {
    async fn create_topic(&self, topic: NewTopic) -> Result<Topic, PersistFailure>;

    async fn find_topic_by_slug(&self, slug: &str) -> Result<Option<Topic>, PersistFailure>;

    async fn list_topics(&self) -> Result<Vec<Topic>, PersistFailure>;

    async fn create_post(&self, post: NewPost) -> Result<Post, PersistFailure>;

    async fn find_post(
        &self,
        topic_id: Uuid,
        post_id: Uuid,
    ) -> Result<Option<Post>, PersistFailure>;

    async fn list_posts(&self, topic_id: Uuid) -> Result<Vec<Post>, PersistFailure>;
}

/// PostgreSQL-backed store
#[derive(Debug, Clone)]
pub struct PgForumStore {
    pool: PgPool,
}

impl PgForumStore {
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ForumStore for PgForumStore {
    async fn create_topic(&self, new_topic: NewTopic) -> Result<Topic, PersistFailure> {
        Ok(topic::create(&self.pool, &new_topic).await?)
    }

    async fn find_topic_by_slug(&self, slug: &str) -> Result<Option<Topic>, PersistFailure> {
        Ok(topic::find_by_slug(&self.pool, slug).await?)
    }

    async fn list_topics(&self) -> Result<Vec<Topic>, PersistFailure> {
        Ok(topic::list_all(&self.pool).await?)
    }

    async fn create_post(&self, new_post: NewPost) -> Result<Post, PersistFailure> {
        Ok(post::create(&self.pool, &new_post).await?)
    }

    async fn find_post(
        &self,
        topic_id: Uuid,
        post_id: Uuid,
    ) -> Result<Option<Post>, PersistFailure> {
        Ok(post::find_by_id_in_topic(&self.pool, topic_id, post_id).await?)
    }

    async fn list_posts(&self, topic_id: Uuid) -> Result<Vec<Post>, PersistFailure> {
        Ok(post::list_by_topic(&self.pool, topic_id).await?)
    }
}
