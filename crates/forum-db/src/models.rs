use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Topic model - a discussion category addressed by its slug
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Topic {
    /// Unique topic identifier
    pub id: Uuid,
    /// Unique slug (lowercase letters and dashes)
    pub slug: String,
    /// Topic description
    pub description: String,
    /// When the topic was created
    pub created_at: DateTime<Utc>,
    /// When the topic was last updated
    pub updated_at: DateTime<Utc>,
}

/// Post model - a user-authored message inside a topic
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Post {
    /// Unique post identifier
    pub id: Uuid,
    /// Post title
    pub title: String,
    /// Post body
    pub content: String,
    /// Topic this post belongs to (indexed together with created_at)
    pub topic_id: Uuid,
    /// Author, taken from the session identity
    pub user_id: Uuid,
    /// When the post was created
    pub created_at: DateTime<Utc>,
    /// When the post was last updated
    pub updated_at: DateTime<Utc>,
}

/// Insert struct for Topic
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTopic {
    pub slug: String,
    pub description: String,
}

/// Insert struct for Post
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPost {
    pub title: String,
    pub content: String,
    pub topic_id: Uuid,
    pub user_id: Uuid,
}
