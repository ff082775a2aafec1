// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: Provides fixture datasets, configuration, and scripted analytics and LLM providers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(
    dead_code,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate
)]
//! Shared test utilities for `eva_server`

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, Once};
use std::time::Duration;

use async_trait::async_trait;
use eva_server::analytics::{
    AnalysisReport, AnalyticsProvider, Dataset, MatchList, PlayerMatch,
};
use eva_server::coach::PromptBuilder;
use eva_server::config::environment::ServerConfig;
use eva_server::config::LlmCredential;
use eva_server::context::{AppContext, AppContextBuilder};
use eva_server::errors::{AppError, AppResult};
use eva_server::llm::{ChatRequest, ChatResponse, LlmProvider};
use eva_server::session::CachedReport;
use serde_json::{json, Map, Value};

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            Ok("WARN" | "ERROR") | _ => tracing::Level::WARN,
        };

        let _ = tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .try_init();
    });
}

/// Six matches of three players; `flat` never varies
pub const FIXTURE_CSV: &str = "player name;result;goals;saves;demos;flat\n\
                               Zen;1;4;1;2;7\n\
                               Zen;1;3;2;0;7\n\
                               Vatira;0;0;3;1;7\n\
                               Vatira;0;1;4;1;7\n\
                               Rise;1;2;0;3;7\n\
                               Rise;0;0;5;0;7\n";

/// Configuration pointing at nothing on disk, with the given credential value
pub fn test_config(api_key: Option<&str>) -> ServerConfig {
    let api_key = api_key.map(str::to_owned);
    let mut config = ServerConfig::from_lookup(|key| match key {
        "ENVIRONMENT" => Some("testing".to_owned()),
        "EVA_SESSION_SECRET" => Some("integration-test-secret".to_owned()),
        "OPENAI_API_KEY" => api_key.clone(),
        _ => None,
    })
    .expect("test configuration");
    config.dataset.path = PathBuf::from("fixture.csv");
    config
}

/// Parse [`FIXTURE_CSV`] with the configured layout
pub fn fixture_dataset(config: &ServerConfig) -> Dataset {
    Dataset::from_reader(FIXTURE_CSV.as_bytes(), &config.dataset).expect("fixture dataset")
}

/// Context over the fixture dataset with the baseline analytics and a scripted provider
pub fn baseline_context(api_key: Option<&str>, provider: Arc<ScriptedProvider>) -> AppContext {
    init_test_logging();
    let config = test_config(api_key);
    let dataset = fixture_dataset(&config);
    AppContextBuilder::new(config, dataset)
        .llm_provider(provider)
        .build()
        .expect("context")
}

/// Context whose analytics always return the match 42 report
pub fn fixed_context(api_key: Option<&str>, provider: Arc<ScriptedProvider>) -> AppContext {
    init_test_logging();
    let config = test_config(api_key);
    let dataset = fixture_dataset(&config);
    AppContextBuilder::new(config, dataset)
        .analytics(Arc::new(FixedAnalytics))
        .llm_provider(provider)
        .build()
        .expect("context")
}

// ============================================================================
// Analytics fake
// ============================================================================

/// Analytics returning the same report for match 42 and `not found` otherwise
pub struct FixedAnalytics;

impl FixedAnalytics {
    pub fn report() -> AnalysisReport {
        let mut details = Map::new();
        details.insert("player_name".to_owned(), json!("Zen"));
        AnalysisReport {
            match_index: 42,
            prediction: json!("Win"),
            top_statistics: vec![("boost_usage".to_owned(), 78.0)],
            to_improve: vec!["positioning".to_owned()],
            strengths: vec!["rotation".to_owned()],
            details,
        }
    }

    pub fn cached() -> CachedReport {
        CachedReport::from(&Self::report())
    }
}

#[async_trait]
impl AnalyticsProvider for FixedAnalytics {
    fn name(&self) -> &'static str {
        "fixed"
    }

    async fn analyze_match(&self, match_index: u64) -> AppResult<AnalysisReport> {
        if match_index == 42 {
            Ok(Self::report())
        } else {
            Err(AppError::not_found(format!("Match {match_index}")))
        }
    }

    async fn players(&self, _limit: usize) -> AppResult<Vec<String>> {
        Ok(vec!["Zen".to_owned()])
    }

    async fn matches(&self, player: &str) -> AppResult<MatchList> {
        Ok(MatchList {
            player: player.to_owned(),
            matches: vec![PlayerMatch {
                index: 42,
                result: "Win".to_owned(),
            }],
        })
    }
}

// ============================================================================
// Reasoning provider fake
// ============================================================================

/// Provider that records every request and replies with a fixed text or error
pub struct ScriptedProvider {
    reply: Result<String, AppError>,
    calls: AtomicUsize,
    last_request: Mutex<Option<ChatRequest>>,
}

impl ScriptedProvider {
    pub fn replying(text: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Ok(text.to_owned()),
            calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        })
    }

    pub fn failing(error: AppError) -> Arc<Self> {
        Arc::new(Self {
            reply: Err(error),
            calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<ChatRequest> {
        self.last_request.lock().expect("request lock").clone()
    }

    /// Text of the last user message sent
    pub fn last_prompt(&self) -> Option<String> {
        self.last_request()
            .and_then(|request| request.messages.last().map(|m| m.content.clone()))
    }
}

#[async_trait]
impl LlmProvider for ScriptedProvider {
    fn name(&self) -> &'static str {
        "scripted"
    }

    fn default_model(&self) -> &str {
        "scripted-model"
    }

    async fn complete(&self, request: &ChatRequest) -> AppResult<ChatResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock().expect("request lock") = Some(request.clone());
        // Keep concurrent tests interleaving like a real network call
        tokio::time::sleep(Duration::from_millis(1)).await;
        match &self.reply {
            Ok(text) => Ok(ChatResponse {
                content: text.clone(),
                model: "scripted-model".to_owned(),
                usage: None,
                finish_reason: Some("stop".to_owned()),
            }),
            Err(error) => Err(AppError::new(error.code, error.message.clone())),
        }
    }
}

/// Prompt builder that always fails
pub struct FailingPromptBuilder;

impl PromptBuilder for FailingPromptBuilder {
    fn build(&self, _report: &CachedReport, _question: &str) -> AppResult<String> {
        Err(AppError::internal("prompt template unavailable"))
    }
}

/// Configured credential used by tests that reach the provider
pub fn live_credential() -> LlmCredential {
    LlmCredential::Configured("sk-test-live".to_owned())
}

/// Extract the `name=value` pair of a `Set-Cookie` header
pub fn cookie_pair(set_cookie: &str) -> String {
    set_cookie
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_owned()
}

/// Parse a JSON body, panicking with the raw text on failure
pub fn json_body(bytes: &[u8]) -> Value {
    serde_json::from_slice(bytes)
        .unwrap_or_else(|e| panic!("invalid JSON ({e}): {}", String::from_utf8_lossy(bytes)))
}
