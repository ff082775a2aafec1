// ABOUTME: Per-client session state holding the last analysed match
// ABOUTME: Defines the cached report projection and the pluggable session store contract
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Sessions
//!
//! A session holds at most one [`CachedReport`]: the five fields of the last
//! [`AnalysisReport`] that follow-up questions are answered from. Writing a new report
//! replaces the old one whole. An expired session reads exactly like one that never
//! analysed anything.

/// In-memory store with LRU eviction and TTL
pub mod memory;

pub use memory::InMemorySessionStore;

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::analytics::AnalysisReport;
use crate::errors::AppResult;

/// Opaque per-client session identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(Uuid);

impl SessionId {
    /// Fresh random identifier
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SessionId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// Report fields retained between analyze and chat
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedReport {
    /// Index of the analysed match
    pub match_index: u64,
    /// Prediction payload as produced by the analytics provider
    pub prediction: Value,
    /// Ranked `(statistic, value)` pairs
    pub top_statistics: Vec<(String, f64)>,
    /// Findings to work on
    pub to_improve: Vec<String>,
    /// Findings done well
    pub strengths: Vec<String>,
}

impl From<&AnalysisReport> for CachedReport {
    fn from(report: &AnalysisReport) -> Self {
        Self {
            match_index: report.match_index,
            prediction: report.prediction.clone(),
            top_statistics: report.top_statistics.clone(),
            to_improve: report.to_improve.clone(),
            strengths: report.strengths.clone(),
        }
    }
}

/// Storage of one [`CachedReport`] per session
///
/// Each call is atomic on its own; nothing orders a `get` against a concurrent `set` of the
/// same session.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Current report of `session`, `None` when absent or expired
    ///
    /// # Errors
    ///
    /// Returns a storage error if the backend cannot be read
    async fn get(&self, session: &SessionId) -> AppResult<Option<CachedReport>>;

    /// Replace the report of `session`
    ///
    /// # Errors
    ///
    /// Returns a storage error if the backend cannot be written
    async fn set(&self, session: &SessionId, report: CachedReport) -> AppResult<()>;
}

/// Project `report` and make it the current report of `session`
///
/// # Errors
///
/// Propagates the store's write error
pub async fn cache_report(
    store: &dyn SessionStore,
    session: &SessionId,
    report: &AnalysisReport,
) -> AppResult<CachedReport> {
    let cached = CachedReport::from(report);
    store.set(session, cached.clone()).await?;
    Ok(cached)
}
