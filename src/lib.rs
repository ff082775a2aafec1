// ABOUTME: Main library entry point for the EVA match analysis and coaching server
// ABOUTME: Wires analytics, session state, the coach orchestrator and HTTP routes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # EVA Server
//!
//! A small web server in front of a Rocket League match dataset. A browser picks a
//! match, `/api/analyze` explains it, and `/api/chat` answers follow-up questions about
//! that explanation through an external LLM.
//!
//! ## Architecture
//!
//! - **Analytics**: dataset loading and the match-analysis engine behind `AnalyticsProvider`
//! - **Session**: per-client cached report (`CachedReport`) behind `SessionStore`
//! - **Coach**: prompt building and the chat-turn orchestrator
//! - **LLM**: reasoning provider abstraction and the `OpenAI`-compatible client
//! - **Routes**: thin axum handlers over an explicit `AppContext`
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use eva_server::config::environment::ServerConfig;
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = ServerConfig::from_env()?;
//!     println!("{}", config.summary());
//!     Ok(())
//! }
//! ```

/// Dataset store and match analysis engine
pub mod analytics;

/// Configuration management from the process environment
pub mod config;

/// Application constants
pub mod constants;

/// Explicit application context shared by all handlers
pub mod context;

/// Coaching chat: prompt building and the chat-turn orchestrator
pub mod coach;

/// Unified error handling system with standard error codes and HTTP responses
pub mod errors;

/// LLM provider abstraction for the coaching chat
pub mod llm;

/// Production logging and structured output
pub mod logging;

/// HTTP middleware (CORS)
pub mod middleware;

/// `HTTP` routes grouped by domain
pub mod routes;

/// Session cookie signing and parsing
pub mod security;

/// HTTP server assembly and lifecycle
pub mod server;

/// Per-client session state holding the last analysis report
pub mod session;
