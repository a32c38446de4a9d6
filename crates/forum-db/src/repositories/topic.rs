use sqlx::{Executor, Postgres};

use crate::models::{NewTopic, Topic};

pub async fn create<'e, E>(executor: E, topic: &NewTopic) -> Result<Topic, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            INSERT INTO topics (slug, description)
            VALUES ($1, $2)
            RETURNING id, slug, description, created_at, updated_at
        "#,
    )
    .bind(&topic.slug)
    .bind(&topic.description)
    .fetch_one(executor)
    .await
}

pub async fn find_by_slug<'e, E>(executor: E, slug: &str) -> Result<Option<Topic>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT id, slug, description, created_at, updated_at
            FROM topics
            WHERE slug = $1
        "#,
    )
    .bind(slug)
    .fetch_optional(executor)
    .await
}

pub async fn list_all<'e, E>(executor: E) -> Result<Vec<Topic>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT id, slug, description, created_at, updated_at
            FROM topics
            ORDER BY created_at DESC
        "#,
    )
    .fetch_all(executor)
    .await
}
