// ABOUTME: Match analytics abstraction over the loaded dataset
// ABOUTME: Defines the report shape and the provider trait consumed by the HTTP routes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Match Analytics
//!
//! An [`AnalyticsProvider`] turns a match index into an [`AnalysisReport`] and answers the
//! player/match lookups that drive the match picker. [`BaselineAnalytics`] is the bundled
//! implementation; anything else (a trained model, a remote scoring service) plugs in behind
//! the same trait.

/// Explainable statistical scoring engine
pub mod baseline;
/// Delimited dataset loading
pub mod dataset;

pub use baseline::BaselineAnalytics;
pub use dataset::Dataset;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::AppResult;

/// Full analysis of one match
///
/// The five named fields are the ones kept for follow-up questions; everything else a
/// provider wants to show the browser goes into `details` and is flattened into the JSON body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Row index of the analysed match
    pub match_index: u64,
    /// Prediction payload, opaque to the server
    pub prediction: Value,
    /// Most influential statistics, most influential first
    pub top_statistics: Vec<(String, f64)>,
    /// Statistics to work on, most urgent first
    pub to_improve: Vec<String>,
    /// Statistics the player did well, best first
    pub strengths: Vec<String>,
    /// Provider-specific fields
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

/// One match row of a player
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerMatch {
    /// Row index, usable as `match_index`
    pub index: u64,
    /// `Win` or `Loss`
    pub result: String,
}

/// Matches played by one player
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchList {
    /// Player name as requested
    pub player: String,
    /// Matches in dataset order
    pub matches: Vec<PlayerMatch>,
}

/// Source of match analyses and dataset lookups
#[async_trait]
pub trait AnalyticsProvider: Send + Sync {
    /// Short identifier used in logs and readiness output
    fn name(&self) -> &'static str;

    /// Analyse the match at `match_index`
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` when the index is outside the dataset
    async fn analyze_match(&self, match_index: u64) -> AppResult<AnalysisReport>;

    /// Distinct player names, most frequent first, ties alphabetical
    async fn players(&self, limit: usize) -> AppResult<Vec<String>>;

    /// Matches of `player` (case-insensitive exact name)
    async fn matches(&self, player: &str) -> AppResult<MatchList>;
}
