// ABOUTME: Application context shared by every request handler
// ABOUTME: Holds configuration, dataset, analytics, sessions and the coach built once at startup
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Explicit dependency container passed to the routers as axum state
//!
//! Nothing is held in process-wide statics: the binary builds one [`AppContext`] from the
//! environment and tests build theirs from fixtures with [`AppContextBuilder`].

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::analytics::{AnalyticsProvider, BaselineAnalytics, Dataset};
use crate::coach::{CoachOrchestrator, PromptBuilder, ReportPromptBuilder};
use crate::config::ServerConfig;
use crate::errors::AppResult;
use crate::llm::{LlmProvider, OpenAiCompatibleConfig, OpenAiCompatibleProvider};
use crate::security::SessionCookies;
use crate::session::memory::SessionStoreConfig;
use crate::session::{InMemorySessionStore, SessionStore};

/// Shared state of the running server
#[derive(Clone)]
pub struct AppContext {
    config: Arc<ServerConfig>,
    dataset: Arc<Dataset>,
    analytics: Arc<dyn AnalyticsProvider>,
    sessions: Arc<dyn SessionStore>,
    cookies: Arc<SessionCookies>,
    coach: Arc<CoachOrchestrator>,
    started_at: DateTime<Utc>,
}

impl AppContext {
    /// Load the dataset and wire the default components
    ///
    /// # Errors
    ///
    /// Returns an error if the dataset cannot be loaded or the HTTP client cannot be built
    pub fn from_config(config: ServerConfig) -> AppResult<Self> {
        let dataset = Dataset::load(&config.dataset)?;
        AppContextBuilder::new(config, dataset).build()
    }

    /// Server configuration
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Loaded dataset
    #[must_use]
    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// Match analytics
    #[must_use]
    pub fn analytics(&self) -> &dyn AnalyticsProvider {
        self.analytics.as_ref()
    }

    /// Session storage
    #[must_use]
    pub fn sessions(&self) -> &dyn SessionStore {
        self.sessions.as_ref()
    }

    /// Session cookie signer
    #[must_use]
    pub fn cookies(&self) -> &SessionCookies {
        &self.cookies
    }

    /// Chat coach
    #[must_use]
    pub fn coach(&self) -> &CoachOrchestrator {
        &self.coach
    }

    /// Time the context was built
    #[must_use]
    pub const fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }
}

/// Assembles an [`AppContext`], defaulting every component that is not supplied
pub struct AppContextBuilder {
    config: ServerConfig,
    dataset: Arc<Dataset>,
    analytics: Option<Arc<dyn AnalyticsProvider>>,
    sessions: Option<Arc<dyn SessionStore>>,
    llm_provider: Option<Arc<dyn LlmProvider>>,
    prompts: Option<Arc<dyn PromptBuilder>>,
}

impl AppContextBuilder {
    /// Start from a configuration and an already loaded dataset
    #[must_use]
    pub fn new(config: ServerConfig, dataset: Dataset) -> Self {
        Self {
            config,
            dataset: Arc::new(dataset),
            analytics: None,
            sessions: None,
            llm_provider: None,
            prompts: None,
        }
    }

    /// Use a specific analytics provider instead of [`BaselineAnalytics`]
    #[must_use]
    pub fn analytics(mut self, analytics: Arc<dyn AnalyticsProvider>) -> Self {
        self.analytics = Some(analytics);
        self
    }

    /// Use a specific session store instead of [`InMemorySessionStore`]
    #[must_use]
    pub fn sessions(mut self, sessions: Arc<dyn SessionStore>) -> Self {
        self.sessions = Some(sessions);
        self
    }

    /// Use a specific reasoning provider instead of [`OpenAiCompatibleProvider`]
    #[must_use]
    pub fn llm_provider(mut self, provider: Arc<dyn LlmProvider>) -> Self {
        self.llm_provider = Some(provider);
        self
    }

    /// Use a specific prompt builder instead of [`ReportPromptBuilder`]
    #[must_use]
    pub fn prompt_builder(mut self, prompts: Arc<dyn PromptBuilder>) -> Self {
        self.prompts = Some(prompts);
        self
    }

    /// Build the context
    ///
    /// # Errors
    ///
    /// Returns an error if the default reasoning provider cannot be created
    pub fn build(self) -> AppResult<AppContext> {
        let analytics = self
            .analytics
            .unwrap_or_else(|| Arc::new(BaselineAnalytics::new(self.dataset.clone())));

        let sessions = self.sessions.unwrap_or_else(|| {
            Arc::new(InMemorySessionStore::new(&SessionStoreConfig::from(
                &self.config.session,
            )))
        });

        let llm_provider: Arc<dyn LlmProvider> = match self.llm_provider {
            Some(provider) => provider,
            None => Arc::new(OpenAiCompatibleProvider::new(
                OpenAiCompatibleConfig::from(&self.config.llm),
            )?),
        };

        let prompts = self
            .prompts
            .unwrap_or_else(|| Arc::new(ReportPromptBuilder));

        let coach = CoachOrchestrator::new(
            self.config.llm.credential.clone(),
            llm_provider,
            prompts,
            self.config.llm.temperature,
        );

        Ok(AppContext {
            cookies: Arc::new(SessionCookies::new(&self.config.session)),
            config: Arc::new(self.config),
            dataset: self.dataset,
            analytics,
            sessions,
            coach: Arc::new(coach),
            started_at: Utc::now(),
        })
    }
}
