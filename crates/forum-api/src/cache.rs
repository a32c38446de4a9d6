//! In-process cache of rendered pages, keyed by page path.
//!
//! Read routes fill the cache on a miss; form actions drop the entries
//! whose content a successful write makes stale.

use std::{
    collections::HashMap,
    future::Future,
    sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use axum::{
    http::header,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::error::ApiError;

/// Drops cached renderings of a page path
pub trait PathRevalidator: Send + Sync {
    fn revalidate_path(&self, path: &str);
}

#[derive(Debug, Default)]
pub struct PageCache {
    inner: RwLock<Pages>,
}

#[derive(Debug, Default)]
struct Pages {
    bodies: HashMap<String, String>,
    /// Bumped on every revalidation of a path
    generations: HashMap<String, u64>,
}

impl Pages {
    fn generation(&self, path: &str) -> u64 {
        self.generations.get(path).copied().unwrap_or_default()
    }
}

impl PageCache {
    fn read(&self) -> RwLockReadGuard<'_, Pages> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Pages> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn get(&self, path: &str) -> Option<String> {
        self.read().bodies.get(path).cloned()
    }

    pub fn insert(&self, path: impl Into<String>, body: String) {
        self.write().bodies.insert(path.into(), body);
    }

    pub fn contains(&self, path: &str) -> bool {
        self.read().bodies.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.read().bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Store `body` only if `path` was not revalidated since `generation` was read
    fn insert_if_current(&self, path: &str, body: String, generation: u64) -> bool {
        let mut pages = self.write();
        if pages.generation(path) != generation {
            return false;
        }
        pages.bodies.insert(path.to_string(), body);
        true
    }

    /// Serve `path` from the cache, or render it with `load` and remember the result.
    ///
    /// Failed loads are not cached, nor are loads overtaken by a revalidation of `path`.
    pub async fn cached_json<T, F, Fut>(&self, path: &str, load: F) -> Result<Response, ApiError>
    where
        T: Serialize,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, ApiError>>,
    {
        let generation = {
            let pages = self.read();
            if let Some(body) = pages.bodies.get(path) {
                tracing::debug!(path, "Page cache hit");
                return Ok(json_page(body.clone()));
            }
            pages.generation(path)
        };

        let body = serde_json::to_string(&load().await?)?;
        if !self.insert_if_current(path, body.clone(), generation) {
            tracing::debug!(path, "Page revalidated during load, not caching");
        }

        Ok(json_page(body))
    }
}

impl PathRevalidator for PageCache {
    fn revalidate_path(&self, path: &str) {
        let mut pages = self.write();
        let removed = pages.bodies.remove(path).is_some();
        *pages.generations.entry(path.to_string()).or_default() += 1;

        tracing::debug!(path, removed, "Revalidated page path");
    }
}

fn json_page(body: String) -> Response {
    ([(header::CONTENT_TYPE, "application/json")], body).into_response()
}
