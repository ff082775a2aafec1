// ABOUTME: Chat turn state machine answering questions about the session's last analysis
// ABOUTME: Short-circuits on empty input, missing analysis or credential before calling the LLM
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;
use std::time::Instant;

use thiserror::Error;
use tracing::warn;

use super::prompt::PromptBuilder;
use crate::config::LlmCredential;
use crate::constants::{chat_messages, env_vars};
use crate::errors::AppError;
use crate::llm::{ChatMessage, ChatRequest, LlmProvider};
use crate::logging::AppLogger;
use crate::session::{CachedReport, SessionId, SessionStore};

/// Why a chat turn ended without a provider answer
#[derive(Debug, Error)]
pub enum ChatTurnError {
    /// Question was empty after trimming
    #[error("empty question")]
    EmptyQuestion,
    /// Session holds no analysed match
    #[error("no analysis in session")]
    NoAnalysis,
    /// Reasoning credential absent or a placeholder
    #[error("{variable} is missing or invalid")]
    CredentialMissing {
        /// Environment variable that must be set
        variable: &'static str,
    },
    /// Prompt construction, session read or provider call failed
    #[error(transparent)]
    Fault(#[from] AppError),
}

impl ChatTurnError {
    /// Short branch name for logs
    #[must_use]
    pub const fn branch(&self) -> &'static str {
        match self {
            Self::EmptyQuestion => "empty_question",
            Self::NoAnalysis => "no_analysis",
            Self::CredentialMissing { .. } => "credential_missing",
            Self::Fault(_) => "fault",
        }
    }

    /// Text shown to the player in place of a coach answer
    #[must_use]
    pub fn to_answer(&self) -> String {
        match self {
            Self::EmptyQuestion => chat_messages::EMPTY_QUESTION.to_owned(),
            Self::NoAnalysis => chat_messages::NO_ANALYSIS.to_owned(),
            Self::CredentialMissing { variable } => format!(
                "{variable} is missing or invalid on the server. \
                 Set it in your environment and restart the server."
            ),
            Self::Fault(error) => format!(
                "{}: {} - {}",
                chat_messages::SERVER_ERROR_PREFIX,
                error.category(),
                error.message
            ),
        }
    }
}

/// Answers follow-up questions from the cached report of a session
pub struct CoachOrchestrator {
    credential: LlmCredential,
    provider: Arc<dyn LlmProvider>,
    prompts: Arc<dyn PromptBuilder>,
    system_prompt: String,
    model: String,
    temperature: f32,
}

impl CoachOrchestrator {
    /// Create an orchestrator using the provider's default model
    #[must_use]
    pub fn new(
        credential: LlmCredential,
        provider: Arc<dyn LlmProvider>,
        prompts: Arc<dyn PromptBuilder>,
        temperature: f32,
    ) -> Self {
        let model = provider.default_model().to_owned();
        Self {
            credential,
            provider,
            prompts,
            system_prompt: crate::llm::prompts::get_eva_system_prompt().to_owned(),
            model,
            temperature,
        }
    }

    /// Replace the system prompt
    #[must_use]
    pub fn with_system_prompt(mut self, system_prompt: impl Into<String>) -> Self {
        self.system_prompt = system_prompt.into();
        self
    }

    /// Run one chat turn against an already loaded session report
    ///
    /// # Errors
    ///
    /// Returns the [`ChatTurnError`] of the first branch that short-circuits
    pub async fn answer(
        &self,
        report: Option<&CachedReport>,
        question: &str,
    ) -> Result<String, ChatTurnError> {
        let question = question.trim();
        if question.is_empty() {
            return Err(ChatTurnError::EmptyQuestion);
        }

        let report = report.ok_or(ChatTurnError::NoAnalysis)?;

        if !self.credential.is_configured() {
            return Err(ChatTurnError::CredentialMissing {
                variable: env_vars::OPENAI_API_KEY,
            });
        }

        let prompt = self.prompts.build(report, question)?;
        let request = ChatRequest::new(vec![
            ChatMessage::system(self.system_prompt.clone()),
            ChatMessage::user(prompt),
        ])
        .with_model(self.model.clone())
        .with_temperature(self.temperature);

        let response = self.provider.complete(&request).await?;
        Ok(response.content)
    }

    /// Run one chat turn for a session, reading its report from `sessions`
    ///
    /// # Errors
    ///
    /// See [`CoachOrchestrator::answer`]; a failed session read is a `Fault`
    pub async fn answer_for_session(
        &self,
        sessions: &dyn SessionStore,
        session: Option<&SessionId>,
        question: &str,
    ) -> Result<String, ChatTurnError> {
        self.turn(sessions, session, question).await.1
    }

    /// Run a chat turn and flatten every outcome into the answer text
    pub async fn respond(
        &self,
        sessions: &dyn SessionStore,
        session: Option<&SessionId>,
        question: &str,
    ) -> String {
        let started = Instant::now();
        let (match_index, outcome) = self.turn(sessions, session, question).await;
        let elapsed = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

        match outcome {
            Ok(answer) => {
                AppLogger::log_chat_turn("answered", match_index, elapsed);
                answer
            }
            Err(error) => {
                match &error {
                    ChatTurnError::CredentialMissing { variable } => {
                        warn!(variable = %variable, "Chat refused: reasoning credential not configured");
                    }
                    ChatTurnError::Fault(fault) => {
                        warn!(
                            category = fault.category(),
                            match_index = ?match_index,
                            error = %fault,
                            "Chat turn failed"
                        );
                    }
                    ChatTurnError::EmptyQuestion | ChatTurnError::NoAnalysis => {}
                }
                AppLogger::log_chat_turn(error.branch(), match_index, elapsed);
                error.to_answer()
            }
        }
    }

    async fn turn(
        &self,
        sessions: &dyn SessionStore,
        session: Option<&SessionId>,
        question: &str,
    ) -> (Option<u64>, Result<String, ChatTurnError>) {
        if question.trim().is_empty() {
            return (None, Err(ChatTurnError::EmptyQuestion));
        }
        let report = match session {
            Some(id) => match sessions.get(id).await {
                Ok(report) => report,
                Err(e) => return (None, Err(e.into())),
            },
            None => None,
        };
        let match_index = report.as_ref().map(|r| r.match_index);
        (match_index, self.answer(report.as_ref(), question).await)
    }

    /// Model requested from the provider
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Whether a usable credential is configured
    #[must_use]
    pub const fn is_configured(&self) -> bool {
        self.credential.is_configured()
    }
}

impl std::fmt::Debug for CoachOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoachOrchestrator")
            .field("credential", &self.credential)
            .field("provider", &self.provider.name())
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .finish_non_exhaustive()
    }
}
