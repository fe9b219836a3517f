//! Configuration loading and management
//!
//! Configuration comes from an optional YAML file named by
//! `ADMIN_RECORDS_CONFIG`, then a few environment overrides:
//!
//! | Variable                       | Field                  |
//! |--------------------------------|------------------------|
//! | `ADMIN_RECORDS_BIND`           | `server.bind`          |
//! | `ADMIN_RECORDS_LOG`            | `log_filter`           |
//! | `ADMIN_RECORDS_MONGODB_URI`    | `storage.mongodb_uri`  |
//! | `ADMIN_RECORDS_SESSION_TOKENS` | `auth.session_tokens`  |
//!
//! ```yaml
//! server:
//!   bind: 0.0.0.0:3000
//!   trust_forwarded_headers: true
//!   cors: false
//! auth:
//!   mode: token
//!   session_tokens: [change-me]
//! storage:
//!   backend: mongodb
//!   mongodb_uri: mongodb://localhost:27017
//!   database: admin
//! log_filter: admin_records=info,tower_http=info
//! ```

use std::sync::Arc;

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};

use crate::core::auth::{AuthPolicy, AuthProvider, NoAuthProvider, TokenAuthProvider};

/// Environment variable naming the YAML configuration file
pub const CONFIG_PATH_ENV: &str = "ADMIN_RECORDS_CONFIG";

const BIND_ENV: &str = "ADMIN_RECORDS_BIND";
const LOG_ENV: &str = "ADMIN_RECORDS_LOG";
const MONGODB_URI_ENV: &str = "ADMIN_RECORDS_MONGODB_URI";
const SESSION_TOKENS_ENV: &str = "ADMIN_RECORDS_SESSION_TOKENS";

/// HTTP listener settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Socket address to listen on
    pub bind: String,

    /// Read the client address from `X-Forwarded-For` / `X-Real-IP`.
    /// Enable only behind a reverse proxy that sets them.
    pub trust_forwarded_headers: bool,

    /// Add a permissive CORS layer
    pub cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:3000".to_string(),
            trust_forwarded_headers: false,
            cors: false,
        }
    }
}

/// How sessions are recognized
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthMode {
    /// Every request counts as logged in (development only)
    None,

    /// Requests must present one of the configured session tokens
    #[default]
    Token,
}

/// Session gate settings
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    pub mode: AuthMode,
    pub session_tokens: Vec<String>,
}

impl AuthConfig {
    /// Build the provider this configuration describes
    pub fn build_provider(&self) -> Arc<dyn AuthProvider> {
        match self.mode {
            AuthMode::None => Arc::new(NoAuthProvider),
            AuthMode::Token => Arc::new(TokenAuthProvider::new(self.session_tokens.clone())),
        }
    }

    /// Policy applied to the gated routes
    pub fn policy(&self) -> AuthPolicy {
        match self.mode {
            AuthMode::None => AuthPolicy::Public,
            AuthMode::Token => AuthPolicy::Authenticated,
        }
    }
}

/// Storage backend selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Memory,
    Mongodb,
}

/// Store settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub mongodb_uri: Option<String>,
    pub database: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::Memory,
            mongodb_uri: None,
            database: "admin".to_string(),
        }
    }
}

/// Complete application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub auth: AuthConfig,
    pub storage: StorageConfig,

    /// `tracing_subscriber::EnvFilter` directives, used when `RUST_LOG` is unset
    pub log_filter: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            auth: AuthConfig::default(),
            storage: StorageConfig::default(),
            log_filter: "admin_records=info,tower_http=info".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    /// Load the file named by `ADMIN_RECORDS_CONFIG` (defaults when unset),
    /// apply environment overrides and validate
    pub fn load() -> Result<Self> {
        let mut config = match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) => Self::from_yaml_file(&path)?,
            Err(_) => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from a variable lookup
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(bind) = lookup(BIND_ENV) {
            self.server.bind = bind;
        }
        if let Some(filter) = lookup(LOG_ENV) {
            self.log_filter = filter;
        }
        if let Some(uri) = lookup(MONGODB_URI_ENV) {
            self.storage.mongodb_uri = Some(uri);
        }
        if let Some(tokens) = lookup(SESSION_TOKENS_ENV) {
            self.auth.session_tokens = tokens
                .split(',')
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_string)
                .collect();
        }
    }

    /// Reject combinations the server cannot start with
    pub fn validate(&self) -> Result<()> {
        if self.auth.mode == AuthMode::Token && self.auth.session_tokens.is_empty() {
            bail!("auth mode 'token' needs at least one session token ({SESSION_TOKENS_ENV})");
        }

        if self.storage.backend == StorageBackend::Mongodb {
            if !cfg!(feature = "mongodb_backend") {
                bail!("storage backend 'mongodb' needs the 'mongodb_backend' feature");
            }
            if self.storage.mongodb_uri.is_none() {
                bail!("storage backend 'mongodb' needs a connection uri ({MONGODB_URI_ENV})");
            }
        }

        Ok(())
    }
}
