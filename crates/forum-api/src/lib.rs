pub mod actions;
pub mod auth;
pub mod cache;
pub mod config;
pub mod error;
pub mod form_fields;
pub mod form_state;
pub mod metrics;
pub mod middleware;
pub mod paths;
pub mod post;
pub mod router;
pub mod state;
pub mod store;
pub mod topic;
pub mod tracing;
pub mod validation;

pub use config::ApiConfig;
pub use state::ApiState;
