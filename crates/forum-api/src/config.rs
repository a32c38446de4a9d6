use serde::Deserialize;
use thiserror::Error;

/// Minimum length accepted for `COOKIE_SECRET`; the private cookie key needs 64 bytes
pub const MIN_COOKIE_SECRET_LEN: usize = 64;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    pub const fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }

    pub const fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid environment configuration: {0}")]
    Env(#[from] envy::Error),
    #[error("COOKIE_SECRET must be at least {MIN_COOKIE_SECRET_LEN} bytes, got {0}")]
    CookieSecretTooShort(usize),
}

#[derive(Clone, Debug, Deserialize)]
pub struct ApiConfig {
    pub database_url: String,
    pub jwt_secret: String,
    pub cookie_secret: String,
    #[serde(default)]
    pub env: Environment,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_db_max_connections")]
    pub db_max_connections: u32,
    /// Comma-separated list of origins allowed by CORS
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: String,
}

const fn default_port() -> u16 {
    3000
}

const fn default_db_max_connections() -> u32 {
    10
}

fn default_allowed_origins() -> String {
    "http://localhost:3000".to_string()
}

impl ApiConfig {
    /// Load the configuration from the process environment, reading `.env` first if present
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_vars(std::env::vars())
    }

    /// Load the configuration from explicit key/value pairs
    pub fn from_vars<I>(vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let config: Self = envy::from_iter(vars)?;

        if config.cookie_secret.len() < MIN_COOKIE_SECRET_LEN {
            return Err(ConfigError::CookieSecretTooShort(config.cookie_secret.len()));
        }

        Ok(config)
    }

    /// Allowed CORS origins, trimmed and without empty entries
    pub fn origins(&self) -> Vec<String> {
        self.allowed_origins
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect()
    }
}
