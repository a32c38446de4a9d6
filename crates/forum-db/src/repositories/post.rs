use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::models::{NewPost, Post};

pub async fn create<'e, E>(executor: E, post: &NewPost) -> Result<Post, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            INSERT INTO posts (title, content, topic_id, user_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, title, content, topic_id, user_id, created_at, updated_at
        "#,
    )
    .bind(&post.title)
    .bind(&post.content)
    .bind(post.topic_id)
    .bind(post.user_id)
    .fetch_one(executor)
    .await
}

/// Fetch a post only if it belongs to the given topic
pub async fn find_by_id_in_topic<'e, E>(
    executor: E,
    topic_id: Uuid,
    post_id: Uuid,
) -> Result<Option<Post>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT id, title, content, topic_id, user_id, created_at, updated_at
            FROM posts
            WHERE id = $1 AND topic_id = $2
        "#,
    )
    .bind(post_id)
    .bind(topic_id)
    .fetch_optional(executor)
    .await
}

pub async fn list_by_topic<'e, E>(executor: E, topic_id: Uuid) -> Result<Vec<Post>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT id, title, content, topic_id, user_id, created_at, updated_at
            FROM posts
            WHERE topic_id = $1
            ORDER BY created_at DESC
        "#,
    )
    .bind(topic_id)
    .fetch_all(executor)
    .await
}
