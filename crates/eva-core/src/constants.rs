// ABOUTME: Application constants organized by domain
// ABOUTME: Environment variable names, defaults, session and chat message constants
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Constants module
//!
//! Constants are grouped into small domain modules rather than one flat list.

/// Environment variable names
pub mod env_vars {
    /// Bind address
    pub const HOST: &str = "HOST";
    /// HTTP port (platform convention)
    pub const PORT: &str = "PORT";
    /// HTTP port (explicit override, wins over `PORT`)
    pub const HTTP_PORT: &str = "HTTP_PORT";
    /// Deployment environment
    pub const ENVIRONMENT: &str = "ENVIRONMENT";
    /// Dataset file path
    pub const DATASET_PATH: &str = "EVA_DATASET_PATH";
    /// Dataset field delimiter
    pub const DATASET_DELIMITER: &str = "EVA_DATASET_DELIMITER";
    /// Player name column
    pub const PLAYER_COLUMN: &str = "EVA_PLAYER_COLUMN";
    /// Match outcome column
    pub const TARGET_COLUMN: &str = "EVA_TARGET_COLUMN";
    /// Downloadable notebooks directory
    pub const NOTEBOOKS_DIR: &str = "EVA_NOTEBOOKS_DIR";
    /// Static assets directory
    pub const STATIC_DIR: &str = "EVA_STATIC_DIR";
    /// Session cookie signing secret
    pub const SESSION_SECRET: &str = "EVA_SESSION_SECRET";
    /// Legacy name for the session secret
    pub const LEGACY_SESSION_SECRET: &str = "FLASK_SECRET_KEY";
    /// Session lifetime in seconds
    pub const SESSION_TTL_SECS: &str = "EVA_SESSION_TTL_SECS";
    /// Maximum number of live sessions
    pub const SESSION_MAX_ENTRIES: &str = "EVA_SESSION_MAX_ENTRIES";
    /// Mark the session cookie `Secure`
    pub const SESSION_COOKIE_SECURE: &str = "EVA_SESSION_COOKIE_SECURE";
    /// Reasoning provider credential
    pub const OPENAI_API_KEY: &str = "OPENAI_API_KEY";
    /// Reasoning provider base URL
    pub const OPENAI_BASE_URL: &str = "OPENAI_BASE_URL";
    /// Reasoning model
    pub const LLM_MODEL: &str = "EVA_LLM_MODEL";
    /// Sampling temperature
    pub const LLM_TEMPERATURE: &str = "EVA_LLM_TEMPERATURE";
    /// Provider request timeout in seconds
    pub const LLM_TIMEOUT_SECS: &str = "EVA_LLM_TIMEOUT_SECS";
    /// Comma separated CORS origins
    pub const CORS_ALLOWED_ORIGINS: &str = "CORS_ALLOWED_ORIGINS";
}

/// Default configuration values
pub mod defaults {
    /// Default bind address
    pub const HOST: &str = "0.0.0.0";
    /// Default HTTP port
    pub const HTTP_PORT: u16 = 5000;
    /// Default dataset location
    pub const DATASET_PATH: &str = "data/Final_Dataset_MVP.csv";
    /// Default dataset delimiter
    pub const DATASET_DELIMITER: u8 = b';';
    /// Default player column
    pub const PLAYER_COLUMN: &str = "player name";
    /// Default outcome column
    pub const TARGET_COLUMN: &str = "result";
    /// Default notebooks directory
    pub const NOTEBOOKS_DIR: &str = "notebooks";
    /// Default static assets directory
    pub const STATIC_DIR: &str = "static";
    /// Development-only session secret
    pub const DEV_SESSION_SECRET: &str = "dev-secret-change-me";
    /// Session lifetime (24 hours)
    pub const SESSION_TTL_SECS: u64 = 86_400;
    /// Live session bound
    pub const SESSION_MAX_ENTRIES: usize = 10_000;
    /// Interval of the expired-session sweeper
    pub const SESSION_CLEANUP_INTERVAL_SECS: u64 = 300;
    /// `OpenAI` API base URL
    pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
    /// Reasoning model
    pub const LLM_MODEL: &str = "gpt-4o-mini";
    /// Sampling temperature
    pub const LLM_TEMPERATURE: f32 = 0.4;
    /// Provider request timeout
    pub const LLM_TIMEOUT_SECS: u64 = 60;
    /// Provider connect timeout
    pub const LLM_CONNECT_TIMEOUT_SECS: u64 = 10;
    /// Default `/api/players` limit
    pub const PLAYERS_LIMIT: usize = 300;
    /// Request body limit for JSON endpoints
    pub const MAX_REQUEST_BODY_BYTES: usize = 64 * 1024;
}

/// Session cookie constants
pub mod session {
    /// Cookie name carrying the signed session identifier
    pub const COOKIE_NAME: &str = "eva_session";
}

/// Credential validation
pub mod credentials {
    /// Lowercase prefixes of template values that are never real keys
    pub const PLACEHOLDER_PREFIXES: &[&str] = &["ta_cle", "your_", "your-", "changeme", "<"];
}

/// Coach chat answers for the non-provider branches
pub mod chat_messages {
    /// Empty or whitespace-only question
    pub const EMPTY_QUESTION: &str = "Ask me something 🙂";
    /// No cached analysis in the session
    pub const NO_ANALYSIS: &str = "Analyze a match first (choose an index).";
    /// Prefix of converted provider/prompt failures
    pub const SERVER_ERROR_PREFIX: &str = "EVA server error";
}

/// Analytics engine constants
pub mod analytics {
    /// Number of ranked statistics kept in `top_statistics`
    pub const TOP_STATISTICS: usize = 3;
    /// Maximum number of improvement areas
    pub const MAX_IMPROVEMENTS: usize = 3;
    /// Maximum number of strengths
    pub const MAX_STRENGTHS: usize = 18;
    /// Outcome label of a won match
    pub const WIN: &str = "Win";
    /// Outcome label of a lost match
    pub const LOSS: &str = "Loss";
}

/// Service identifiers
pub mod service_names {
    /// Server name used in logs
    pub const EVA_SERVER: &str = "eva-server";
    /// Reasoning provider name used in error messages
    pub const REASONING_PROVIDER: &str = "OpenAI";
}
