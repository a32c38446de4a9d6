#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use axum_extra::extract::cookie::Key;
use chrono::Utc;
use forum_api::{
    auth::JwtCookieSessionResolver,
    config::Environment,
    router,
    state::ApiState,
    store::{ForumStore, PersistFailure},
};
use forum_db::models::{NewPost, NewTopic, Post, Topic};
use http_body_util::BodyExt;
use serde::Deserialize;
use tower::ServiceExt;
use uuid::Uuid;

pub const JWT_SECRET: &str = "test_jwt_secret_minimum_32_characters_long";
pub const COOKIE_SECRET: &str =
    "test_cookie_secret_minimum_64_characters_long_for_secure_encryption";

/// Test application: router, state and a handle on the in-memory store
pub struct TestApp {
    pub state: ApiState,
    pub store: Arc<InMemoryStore>,
    pub client: TestClient,
}

impl TestApp {
    pub fn new() -> Self {
        let store = Arc::new(InMemoryStore::default());
        let sessions = JwtCookieSessionResolver::new(JWT_SECRET.to_string(), cookie_key());
        let state =
            ApiState::from_parts(store.clone(), Arc::new(sessions), Environment::Development);

        let client = TestClient::new(router::router().with_state(state.clone()));

        Self {
            state,
            store,
            client,
        }
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

pub fn cookie_key() -> Key {
    Key::from(COOKIE_SECRET.as_bytes())
}

/// Helper to make requests to the test app
pub struct TestClient {
    router: Router,
}

impl TestClient {
    pub fn new(router: Router) -> Self {
        Self { router }
    }

    /// Send a request and get the response
    pub async fn request(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to execute request");

        let status = response.status();
        let headers = response.headers().clone();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to read response body")
            .to_bytes();

        TestResponse {
            status,
            body: body_bytes.to_vec(),
            headers,
        }
    }

    /// Send a GET request
    pub async fn get(&self, uri: &str) -> TestResponse {
        let request = Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .expect("Failed to build request");

        self.request(request).await
    }

    /// Submit a urlencoded form without a session
    pub async fn post_form(&self, uri: &str, fields: &[(&str, &str)]) -> TestResponse {
        let request = form_request(uri)
            .body(Body::from(encode_form(fields)))
            .expect("Failed to build request");

        self.request(request).await
    }

    /// Submit a urlencoded form with an encrypted session cookie
    pub async fn post_form_with_auth(
        &self,
        uri: &str,
        fields: &[(&str, &str)],
        token: &str,
    ) -> TestResponse {
        let request = form_request(uri)
            .header("cookie", session_cookie(token))
            .body(Body::from(encode_form(fields)))
            .expect("Failed to build authenticated request");

        self.request(request).await
    }

    /// POST an arbitrary body, optionally with a session
    pub async fn post_raw(
        &self,
        uri: &str,
        content_type: &str,
        body: &str,
        token: Option<&str>,
    ) -> TestResponse {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", content_type);
        if let Some(token) = token {
            builder = builder.header("cookie", session_cookie(token));
        }

        let request = builder
            .body(Body::from(body.to_string()))
            .expect("Failed to build request");

        self.request(request).await
    }
}

/// `Cookie` header value carrying `token` in the encrypted `auth_token` cookie
fn session_cookie(token: &str) -> String {
    use cookie::{CookieJar as RawCookieJar, Key as RawKey};

    let raw_key = RawKey::try_from(cookie_key().master()).expect("Invalid key");
    let mut raw_jar = RawCookieJar::new();
    raw_jar
        .private_mut(&raw_key)
        .add(cookie::Cookie::new("auth_token", token.to_string()));

    let encrypted = raw_jar.get("auth_token").expect("Cookie should exist");
    format!("{}={}", encrypted.name(), encrypted.value())
}

fn form_request(uri: &str) -> axum::http::request::Builder {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/x-www-form-urlencoded")
}

/// Minimal urlencoding for test form bodies
fn encode_form(fields: &[(&str, &str)]) -> String {
    fields
        .iter()
        .map(|(k, v)| format!("{}={}", encode(k), encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

fn encode(value: &str) -> String {
    value
        .bytes()
        .map(|b| match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                (b as char).to_string()
            }
            b' ' => "+".to_string(),
            _ => format!("%{b:02X}"),
        })
        .collect()
}

/// Test response wrapper
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Vec<u8>,
    pub headers: axum::http::HeaderMap,
}

impl TestResponse {
    /// Get response body as string
    pub fn text(&self) -> String {
        String::from_utf8(self.body.clone()).expect("Response body is not valid UTF-8")
    }

    /// Parse response body as JSON
    pub fn json<T: for<'de> Deserialize<'de>>(&self) -> T {
        serde_json::from_slice(&self.body).expect("Failed to parse JSON response")
    }

    /// Assert status code
    pub fn assert_status(&self, expected: StatusCode) {
        assert_eq!(
            self.status,
            expected,
            "Expected status {}, got {}. Body: {}",
            expected,
            self.status,
            self.text()
        );
    }

    /// The redirect target of a 303 response
    pub fn location(&self) -> Option<&str> {
        self.headers.get("location")?.to_str().ok()
    }
}

/// JWT helpers for tests
pub mod jwt {
    use forum_api::auth::jwt::Claims;
    use jsonwebtoken::{EncodingKey, Header};
    use uuid::Uuid;

    /// Create a session token for `user_id` valid for one hour
    pub fn create_test_token(user_id: Uuid, email: &str) -> String {
        create_token_with_subject(&user_id.to_string(), email, 1)
    }

    pub fn create_expired_token(user_id: Uuid, email: &str) -> String {
        create_token_with_subject(&user_id.to_string(), email, -2)
    }

    pub fn create_token_with_subject(sub: &str, email: &str, expires_in_hours: i64) -> String {
        let now = chrono::Utc::now();
        let claims = Claims {
            sub: sub.to_string(),
            email: email.to_string(),
            iat: now.timestamp() as usize,
            exp: (now + chrono::Duration::hours(expires_in_hours)).timestamp() as usize,
        };

        jsonwebtoken::encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(super::JWT_SECRET.as_bytes()),
        )
        .expect("Failed to create test token")
    }
}

pub const FK_VIOLATION_MESSAGE: &str =
    "insert or update on table \"posts\" violates foreign key constraint \"fk_posts_topic\"";

/// Store with the same uniqueness and foreign key rules as the PostgreSQL schema
#[derive(Default)]
pub struct InMemoryStore {
    topics: Mutex<Vec<Topic>>,
    posts: Mutex<Vec<Post>>,
    next_write_failure: Mutex<Option<PersistFailure>>,
    delete_before_next_post: Mutex<Option<String>>,
}

impl InMemoryStore {
    pub fn topics(&self) -> Vec<Topic> {
        self.topics.lock().unwrap().clone()
    }

    pub fn posts(&self) -> Vec<Post> {
        self.posts.lock().unwrap().clone()
    }

    /// Make the next insert fail with `failure`
    pub fn fail_next_write(&self, failure: PersistFailure) {
        *self.next_write_failure.lock().unwrap() = Some(failure);
    }

    /// Delete topic `slug` right before the next post insert, after the action has looked it up
    pub fn delete_topic_before_next_post(&self, slug: &str) {
        *self.delete_before_next_post.lock().unwrap() = Some(slug.to_string());
    }

    /// Delete a topic and its posts, as `ON DELETE CASCADE` would
    pub fn delete_topic(&self, slug: &str) {
        let mut topics = self.topics.lock().unwrap();
        let removed: Vec<Uuid> = topics
            .iter()
            .filter(|t| t.slug == slug)
            .map(|t| t.id)
            .collect();
        topics.retain(|t| t.slug != slug);
        self.posts
            .lock()
            .unwrap()
            .retain(|p| !removed.contains(&p.topic_id));
    }

    fn take_write_failure(&self) -> Result<(), PersistFailure> {
        match self.next_write_failure.lock().unwrap().take() {
            Some(failure) => Err(failure),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl ForumStore for InMemoryStore {
    async fn create_topic(&self, new_topic: NewTopic) -> Result<Topic, PersistFailure> {
        self.take_write_failure()?;

        let mut topics = self.topics.lock().unwrap();
        if topics.iter().any(|t| t.slug == new_topic.slug) {
            return Err(PersistFailure::with_message(
                "duplicate key value violates unique constraint \"topics_slug_key\"",
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
        Ok(self
            .topics
            .lock()
            .unwrap()
            .iter()
            .find(|t| t.slug == slug)
            .cloned())
    }

    async fn list_topics(&self) -> Result<Vec<Topic>, PersistFailure> {
        let mut topics = self.topics();
        topics.reverse();
        Ok(topics)
    }

    async fn create_post(&self, new_post: NewPost) -> Result<Post, PersistFailure> {
        self.take_write_failure()?;

        let doomed = self.delete_before_next_post.lock().unwrap().take();
        if let Some(slug) = doomed {
            self.delete_topic(&slug);
        }

        if !self
            .topics
            .lock()
            .unwrap()
            .iter()
            .any(|t| t.id == new_post.topic_id)
        {
            return Err(PersistFailure::with_message(
                FK_VIOLATION_MESSAGE,
            ));
        }

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
            .posts()
            .into_iter()
            .find(|p| p.topic_id == topic_id && p.id == post_id))
    }

    async fn list_posts(&self, topic_id: Uuid) -> Result<Vec<Post>, PersistFailure> {
        let mut posts: Vec<Post> = self
            .posts()
            .into_iter()
            .filter(|p| p.topic_id == topic_id)
            .collect();
        posts.reverse();
        Ok(posts)
    }
}
