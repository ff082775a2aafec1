// ABOUTME: Environment configuration management for deployment-specific settings
// ABOUTME: Parses environment variables into a typed ServerConfig with defaults
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Environment-based configuration management

use super::credential::LlmCredential;
use crate::constants::{defaults, env_vars};
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::{info, warn};

/// Environment type for security and other configurations
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Local development
    #[default]
    Development,
    /// Production deployment
    Production,
    /// Test runs
    Testing,
}

impl Environment {
    /// Parse from string with fallback
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "testing" | "test" => Self::Testing,
            _ => Self::Development,
        }
    }

    /// Check if this is a production environment
    #[must_use]
    pub const fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
            Self::Testing => write!(f, "testing"),
        }
    }
}

/// HTTP listener settings
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Bind address
    pub host: String,
    /// Bind port
    pub port: u16,
}

/// Dataset file settings
#[derive(Debug, Clone)]
pub struct DatasetConfig {
    /// Path of the delimited dataset file
    pub path: PathBuf,
    /// Field delimiter byte
    pub delimiter: u8,
    /// Column holding the player name
    pub player_column: String,
    /// Column holding the match outcome
    pub target_column: String,
}

/// Directories served to the browser
#[derive(Debug, Clone)]
pub struct AssetsConfig {
    /// Files offered by `/download/*`
    pub notebooks_dir: PathBuf,
    /// Files served under `/static`
    pub static_dir: PathBuf,
}

/// Session cookie and store settings
#[derive(Clone)]
pub struct SessionConfig {
    /// HMAC key for signing session identifiers
    pub secret: String,
    /// Lifetime of a session (cookie `Max-Age` and store TTL)
    pub ttl: Duration,
    /// Upper bound on live sessions held in memory
    pub max_entries: usize,
    /// Add the `Secure` attribute to the cookie
    pub cookie_secure: bool,
}

impl std::fmt::Debug for SessionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionConfig")
            .field("secret", &"<redacted>")
            .field("ttl", &self.ttl)
            .field("max_entries", &self.max_entries)
            .field("cookie_secure", &self.cookie_secure)
            .finish()
    }
}

/// Reasoning provider settings
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// Credential state read from `OPENAI_API_KEY`
    pub credential: LlmCredential,
    /// API base URL
    pub base_url: String,
    /// Model identifier
    pub model: String,
    /// Sampling temperature
    pub temperature: f32,
    /// Whole-request timeout enforced by the HTTP client
    pub timeout: Duration,
}

/// CORS settings
#[derive(Debug, Clone)]
pub struct CorsConfig {
    /// `*` or a comma separated origin list
    pub allowed_origins: String,
}

/// Complete server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Deployment environment
    pub environment: Environment,
    /// Listener
    pub http: HttpConfig,
    /// Dataset source
    pub dataset: DatasetConfig,
    /// Served directories
    pub assets: AssetsConfig,
    /// Sessions
    pub session: SessionConfig,
    /// Reasoning provider
    pub llm: LlmConfig,
    /// Cross-origin policy
    pub cors: CorsConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// A `.env` file in the working directory is loaded first when present.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is present but cannot be parsed
    pub fn from_env() -> Result<Self> {
        info!("Loading configuration from environment variables");

        if let Err(e) = dotenvy::dotenv() {
            warn!("No .env file found or failed to load: {}", e);
        }

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is present but cannot be parsed, or if production
    /// runs without a session secret
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let environment = var(env_vars::ENVIRONMENT)
            .map_or_else(Environment::default, |v| Environment::from_str_or_default(&v));

        let port = match var(env_vars::HTTP_PORT) {
            Some(value) => parse_value(env_vars::HTTP_PORT, &value)?,
            None => parse_or(var(env_vars::PORT), env_vars::PORT, defaults::HTTP_PORT)?,
        };

        let secret = match var(env_vars::SESSION_SECRET).or_else(|| var(env_vars::LEGACY_SESSION_SECRET)) {
            Some(secret) => secret,
            None if environment.is_production() => {
                bail!("{} must be set in production", env_vars::SESSION_SECRET)
            }
            None => {
                warn!(
                    "{} not set, using the development session secret",
                    env_vars::SESSION_SECRET
                );
                defaults::DEV_SESSION_SECRET.to_owned()
            }
        };

        let credential = LlmCredential::classify(
            lookup(env_vars::OPENAI_API_KEY).as_deref(),
            env_vars::OPENAI_API_KEY,
        );

        Ok(Self {
            environment,
            http: HttpConfig {
                host: var(env_vars::HOST).unwrap_or_else(|| defaults::HOST.to_owned()),
                port,
            },
            dataset: DatasetConfig {
                path: PathBuf::from(
                    var(env_vars::DATASET_PATH).unwrap_or_else(|| defaults::DATASET_PATH.to_owned()),
                ),
                delimiter: var(env_vars::DATASET_DELIMITER)
                    .map(|v| parse_delimiter(&v))
                    .transpose()?
                    .unwrap_or(defaults::DATASET_DELIMITER),
                player_column: var(env_vars::PLAYER_COLUMN)
                    .unwrap_or_else(|| defaults::PLAYER_COLUMN.to_owned()),
                target_column: var(env_vars::TARGET_COLUMN)
                    .unwrap_or_else(|| defaults::TARGET_COLUMN.to_owned()),
            },
            assets: AssetsConfig {
                notebooks_dir: PathBuf::from(
                    var(env_vars::NOTEBOOKS_DIR).unwrap_or_else(|| defaults::NOTEBOOKS_DIR.to_owned()),
                ),
                static_dir: PathBuf::from(
                    var(env_vars::STATIC_DIR).unwrap_or_else(|| defaults::STATIC_DIR.to_owned()),
                ),
            },
            session: SessionConfig {
                secret,
                ttl: Duration::from_secs(parse_or(
                    var(env_vars::SESSION_TTL_SECS),
                    env_vars::SESSION_TTL_SECS,
                    defaults::SESSION_TTL_SECS,
                )?),
                max_entries: parse_or(
                    var(env_vars::SESSION_MAX_ENTRIES),
                    env_vars::SESSION_MAX_ENTRIES,
                    defaults::SESSION_MAX_ENTRIES,
                )?,
                cookie_secure: parse_or(
                    var(env_vars::SESSION_COOKIE_SECURE),
                    env_vars::SESSION_COOKIE_SECURE,
                    environment.is_production(),
                )?,
            },
            llm: LlmConfig {
                credential,
                base_url: var(env_vars::OPENAI_BASE_URL)
                    .unwrap_or_else(|| defaults::OPENAI_BASE_URL.to_owned()),
                model: var(env_vars::LLM_MODEL).unwrap_or_else(|| defaults::LLM_MODEL.to_owned()),
                temperature: parse_or(
                    var(env_vars::LLM_TEMPERATURE),
                    env_vars::LLM_TEMPERATURE,
                    defaults::LLM_TEMPERATURE,
                )?,
                timeout: Duration::from_secs(parse_or(
                    var(env_vars::LLM_TIMEOUT_SECS),
                    env_vars::LLM_TIMEOUT_SECS,
                    defaults::LLM_TIMEOUT_SECS,
                )?),
            },
            cors: CorsConfig {
                allowed_origins: var(env_vars::CORS_ALLOWED_ORIGINS).unwrap_or_else(|| "*".to_owned()),
            },
        })
    }

    /// Socket address string the listener binds to
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.http.host, self.http.port)
    }

    /// One-line-per-setting summary safe to log (no secrets)
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "EVA Server Configuration:\n\
             - Environment: {}\n\
             - Listen: {}\n\
             - Dataset: {}\n\
             - Notebooks: {}\n\
             - Session TTL: {}s (max {} sessions)\n\
             - LLM: {} via {} (credential {})",
            self.environment,
            self.bind_address(),
            self.dataset.path.display(),
            self.assets.notebooks_dir.display(),
            self.session.ttl.as_secs(),
            self.session.max_entries,
            self.llm.model,
            self.llm.base_url,
            self.llm.credential,
        )
    }
}

fn parse_value<T>(key: &str, value: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    value
        .trim()
        .parse()
        .with_context(|| format!("Invalid {key} value: {value}"))
}

fn parse_or<T>(value: Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    value.map_or(Ok(default), |v| parse_value(key, &v))
}

fn parse_delimiter(value: &str) -> Result<u8> {
    match value {
        "\\t" | "tab" => Ok(b'\t'),
        v if v.len() == 1 && v.is_ascii() => Ok(v.as_bytes()[0]),
        v => bail!(
            "Invalid {} value: {v} (expected a single ASCII character)",
            env_vars::DATASET_DELIMITER
        ),
    }
}
