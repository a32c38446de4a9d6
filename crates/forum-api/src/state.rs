use std::sync::Arc;

use axum_extra::extract::cookie::Key;
use metrics_exporter_prometheus::PrometheusHandle;
use sqlx::PgPool;

use crate::{
    ApiConfig,
    actions::ActionContext,
    auth::{JwtCookieSessionResolver, SessionResolver},
    cache::PageCache,
    config::Environment,
    store::{ForumStore, PgForumStore},
};

#[derive(Clone)]
pub struct ApiState {
    pub actions: ActionContext,
    pub page_cache: Arc<PageCache>,
    pub environment: Environment,
    pub metrics: Option<PrometheusHandle>,
}

impl ApiState {
    /// Production wiring: PostgreSQL storage and cookie sessions
    pub fn new(config: &ApiConfig, pool: PgPool) -> Self {
        // Length checked when the config was loaded; `Key::from` panics below 64 bytes
        let cookie_key = Key::from(config.cookie_secret.as_bytes());
        let sessions = JwtCookieSessionResolver::new(config.jwt_secret.clone(), cookie_key);

        Self::from_parts(
            Arc::new(PgForumStore::new(pool)),
            Arc::new(sessions),
            config.env,
        )
    }

    /// Assemble a state from any storage and session implementation
    ///
    /// The page cache created here is also the actions' revalidator.
    pub fn from_parts(
        store: Arc<dyn ForumStore>,
        sessions: Arc<dyn SessionResolver>,
        environment: Environment,
    ) -> Self {
        let page_cache = Arc::new(PageCache::default());

        Self {
            actions: ActionContext {
                store,
                sessions,
                revalidator: page_cache.clone(),
            },
            page_cache,
            environment,
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}

impl std::fmt::Debug for ApiState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiState")
            .field("environment", &self.environment)
            .field("cached_pages", &self.page_cache.len())
            .finish_non_exhaustive()
    }
}
