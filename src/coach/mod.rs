// ABOUTME: Conversational coach answering questions about the last analysed match
// ABOUTME: Combines the session report, prompt construction and the reasoning provider
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Coach
//!
//! Every question goes through [`CoachOrchestrator`], which checks, in order: the question
//! is non-empty, the session has an analysed match, a reasoning credential is configured.
//! Only then is a prompt built and the provider called once. Each early exit and each
//! failure is a [`ChatTurnError`] that renders to a displayable answer.

/// Chat turn state machine
pub mod orchestrator;
/// Prompt construction from cached reports
pub mod prompt;

pub use orchestrator::{ChatTurnError, CoachOrchestrator};
pub use prompt::{PromptBuilder, ReportPromptBuilder};
