//! TOML-based configuration for the notes server
//!
//! The configuration is read once from `notes.toml` at startup and is
//! immutable for the lifetime of the process. Secrets are not stored in the
//! file itself: the `[auth]` section names the environment variable that
//! holds the signing key.

use crate::auth::jwt::TokenSettings;
use crate::db::DatabaseProvider;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Root configuration structure loaded from notes.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NotesConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub auth: AuthConfig,

    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub cors: CorsConfig,
}

// ============= Server Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Emit logs as JSON lines instead of human-readable text
    #[serde(default)]
    pub json_logs: bool,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5011
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
            json_logs: false,
        }
    }
}

// ============= Authentication Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Environment variable name containing the JWT signing key
    #[serde(default = "default_jwt_secret_env")]
    pub jwt_secret_env: String,

    #[serde(default = "default_issuer")]
    pub issuer: String,

    #[serde(default = "default_audience")]
    pub audience: String,

    /// Token lifetime in minutes
    #[serde(default = "default_expires_minutes")]
    pub expires_minutes: i64,
}

fn default_jwt_secret_env() -> String {
    "JWT_SECRET".to_string()
}

fn default_issuer() -> String {
    "notes-server".to_string()
}

fn default_audience() -> String {
    "notes-client".to_string()
}

fn default_expires_minutes() -> i64 {
    60
}

/// Upper bound on token lifetime: one year.
pub const MAX_EXPIRES_MINUTES: i64 = 525_600;

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret_env: default_jwt_secret_env(),
            issuer: default_issuer(),
            audience: default_audience(),
            expires_minutes: default_expires_minutes(),
        }
    }
}

// ============= Database Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Local database path, or `:memory:` for an ephemeral database
    #[serde(default = "default_database_url")]
    pub url: String,

    /// Environment variable for Turso URL (optional cloud config)
    pub turso_url_env: Option<String>,

    /// Environment variable for Turso auth token
    pub turso_token_env: Option<String>,
}

fn default_database_url() -> String {
    "./data/notes.db".to_string()
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
            turso_url_env: None,
            turso_token_env: None,
        }
    }
}

// ============= CORS Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    /// Browser origins allowed to call the API
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,
}

fn default_allowed_origins() -> Vec<String> {
    vec!["http://localhost:5173".to_string()]
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: default_allowed_origins(),
        }
    }
}

// ============= Configuration Loading & Validation =============

/// Errors that can occur during configuration loading
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read configuration file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Environment variable '{0}' referenced in config is not set")]
    MissingEnvVar(String),
}

impl NotesConfig {
    /// Load configuration from a TOML file and validate it.
    ///
    /// The server cannot run without a valid config, so callers treat any
    /// error here as fatal.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;

        config.validate()?;

        Ok(config)
    }

    /// Parse configuration without touching the environment.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Validate the configuration for internal consistency and env var availability
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.auth.issuer.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "auth.issuer must not be empty".to_string(),
            ));
        }
        if self.auth.audience.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "auth.audience must not be empty".to_string(),
            ));
        }
        if self.auth.expires_minutes <= 0 || self.auth.expires_minutes > MAX_EXPIRES_MINUTES {
            return Err(ConfigError::ValidationError(format!(
                "auth.expires_minutes must be between 1 and {}, got {}",
                MAX_EXPIRES_MINUTES, self.auth.expires_minutes
            )));
        }

        // Resolving the secret checks both presence and non-emptiness
        self.jwt_secret()?;

        if self.database.url.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "database.url must not be empty".to_string(),
            ));
        }
        if let Some(ref env) = self.database.turso_url_env {
            self.validate_env_var(env)?;
        }
        if let Some(ref env) = self.database.turso_token_env {
            self.validate_env_var(env)?;
        }

        Ok(())
    }

    fn validate_env_var(&self, name: &str) -> Result<(), ConfigError> {
        std::env::var(name).map_err(|_| ConfigError::MissingEnvVar(name.to_string()))?;
        Ok(())
    }

    /// Get a resolved value from an env var reference
    pub fn resolve_env(&self, env_name: &str) -> Option<String> {
        std::env::var(env_name).ok()
    }

    /// Get the JWT signing key from the environment
    pub fn jwt_secret(&self) -> Result<String, ConfigError> {
        let secret = self
            .resolve_env(&self.auth.jwt_secret_env)
            .ok_or_else(|| ConfigError::MissingEnvVar(self.auth.jwt_secret_env.clone()))?;

        if secret.trim().is_empty() {
            return Err(ConfigError::ValidationError(format!(
                "JWT secret in '{}' must not be empty",
                self.auth.jwt_secret_env
            )));
        }

        Ok(secret)
    }

    /// Token signing parameters for [`TokenService`](crate::auth::jwt::TokenService)
    pub fn token_settings(&self) -> Result<TokenSettings, ConfigError> {
        Ok(TokenSettings {
            secret: self.jwt_secret()?,
            issuer: self.auth.issuer.clone(),
            audience: self.auth.audience.clone(),
            expires_minutes: self.auth.expires_minutes,
        })
    }

    /// Which database backend to use.
    ///
    /// A remote Turso database is used when both Turso env vars are configured
    /// and set (requires the `turso` feature); otherwise `database.url`.
    pub fn database_provider(&self) -> DatabaseProvider {
        #[cfg(feature = "turso")]
        {
            if let (Some(url_env), Some(token_env)) =
                (&self.database.turso_url_env, &self.database.turso_token_env)
                && let (Some(url), Some(token)) =
                    (self.resolve_env(url_env), self.resolve_env(token_env))
                && !url.is_empty()
                && !token.is_empty()
            {
                return DatabaseProvider::Turso {
                    url,
                    auth_token: token,
                };
            }
        }

        match self.database.url.trim() {
            ":memory:" => DatabaseProvider::Memory,
            path => DatabaseProvider::SQLite {
                path: path.to_string(),
            },
        }
    }

    /// Socket address string the server binds to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
