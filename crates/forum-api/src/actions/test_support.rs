//! In-memory collaborators for exercising the actions.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::http::HeaderMap;
use chrono::Utc;
use forum_db::models::{NewPost, NewTopic, Post, Topic};
use uuid::Uuid;

use super::ActionContext;
use crate::{
    auth::{Session, SessionResolver, SessionUser},
    cache::PathRevalidator,
    store::{ForumStore, PersistFailure},
};

pub(crate) const TEST_USER_ID: Uuid = Uuid::from_u128(0x5a1d_0000_0000_4000_8000_0000_0000_0001);

pub(crate) fn signed_in() -> Option<Session> {
    Some(Session {
        user: Some(SessionUser {
            id: TEST_USER_ID,
            email: "test@example.com".to_string(),
        }),
    })
}

pub(crate) struct FixedSession(Option<Session>);

#[async_trait]
impl SessionResolver for FixedSession {
    async fn resolve(&self, _headers: &HeaderMap) -> Option<Session> {
        self.0.clone()
    }
}

#[derive(Default)]
pub(crate) struct RecordingRevalidator(Mutex<Vec<String>>);

impl RecordingRevalidator {
    pub(crate) fn paths(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

impl PathRevalidator for RecordingRevalidator {
    fn revalidate_path(&self, path: &str) {
        self.0.lock().unwrap().push(path.to_string());
    }
}

#[derive(Default)]
pub(crate) struct MockStore {
    topics: Mutex<Vec<Topic>>,
    posts: Mutex<Vec<Post>>,
    write_failure: Mutex<Option<PersistFailure>>,
    lookups: Mutex<usize>,
}

impl MockStore {
    pub(crate) fn seed_topic(&self, slug: &str) -> Topic {
        let now = Utc::now();
        let topic = Topic {
            id: Uuid::new_v4(),
            slug: slug.to_string(),
            description: "Seeded topic description".to_string(),
            created_at: now,
            updated_at: now,
        };
        self.topics.lock().unwrap().push(topic.clone());
        topic
    }

    pub(crate) fn fail_writes_with(&self, failure: PersistFailure) {
        *self.write_failure.lock().unwrap() = Some(failure);
    }

    pub(crate) fn topic_count(&self) -> usize {
        self.topics.lock().unwrap().len()
    }

    pub(crate) fn post_count(&self) -> usize {
        self.posts.lock().unwrap().len()
    }

    pub(crate) fn lookups(&self) -> usize {
        *self.lookups.lock().unwrap()
    }

    fn check_write(&self) -> Result<(), PersistFailure> {
        match self.write_failure.lock().unwrap().clone() {
            Some(failure) => Err(failure),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl ForumStore for MockStore {
    async fn create_topic(&self, new_topic: NewTopic) -> Result<Topic, PersistFailure> {
        self.check_write()?;

        let mut topics = self.topics.lock().unwrap();
        if topics.iter().any(|t| t.slug == new_topic.slug) {
            return Err(PersistFailure::with_message(
                "Unique constraint failed on the fields: (`slug`)",
            ));
        }

        let now = Utc::now();
        let topic = Topic {
            id: Uuid::new_v4(),
            slug: new_topic.slug,
            description: new_topic.description,
            created_at: now,
            updated_at: now,
        };
        topics.push(topic.clone());
        Ok(topic)
    }

    async fn find_topic_by_slug(&self, slug: &str) -> Result<Option<Topic>, PersistFailure> {
        *self.lookups.lock().unwrap() += 1;
        Ok(self
            .topics
            .lock()
            .unwrap()
            .iter()
            .find(|t| t.slug == slug)
            .cloned())
    }

    async fn list_topics(&self) -> Result<Vec<Topic>, PersistFailure> {
        Ok(self.topics.lock().unwrap().clone())
    }

    async fn create_post(&self, new_post: NewPost) -> Result<Post, PersistFailure> {
        self.check_write()?;

        let now = Utc::now();
        let post = Post {
            id: Uuid::new_v4(),
            title: new_post.title,
            content: new_post.content,
            topic_id: new_post.topic_id,
            user_id: new_post.user_id,
            created_at: now,
            updated_at: now,
        };
        self.posts.lock().unwrap().push(post.clone());
        Ok(post)
    }

    async fn find_post(
        &self,
        topic_id: Uuid,
        post_id: Uuid,
    ) -> Result<Option<Post>, PersistFailure> {
        Ok(self
            .posts
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.topic_id == topic_id && p.id == post_id)
            .cloned())
    }

    async fn list_posts(&self, topic_id: Uuid) -> Result<Vec<Post>, PersistFailure> {
        Ok(self
            .posts
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.topic_id == topic_id)
            .cloned()
            .collect())
    }
}

pub(crate) struct Harness {
    pub(crate) store: Arc<MockStore>,
    pub(crate) revalidator: Arc<RecordingRevalidator>,
    session: Option<Session>,
}

impl Harness {
    pub(crate) fn new(session: Option<Session>) -> Self {
        Self {
            store: Arc::new(MockStore::default()),
            revalidator: Arc::new(RecordingRevalidator::default()),
            session,
        }
    }

    pub(crate) fn ctx(&self) -> ActionContext {
        ActionContext {
            store: self.store.clone(),
            sessions: Arc::new(FixedSession(self.session.clone())),
            revalidator: self.revalidator.clone(),
        }
    }
}
