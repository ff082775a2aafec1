// ABOUTME: System prompts for LLM interactions loaded at compile time
// ABOUTME: Provides the EVA coach persona used for every chat turn
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # System Prompts
//!
//! Prompts live in markdown files next to this module and are embedded at compile time.

/// EVA coach system prompt
pub const EVA_SYSTEM_PROMPT: &str = include_str!("eva_system.md");

/// Get the system prompt for the EVA coach
#[must_use]
pub const fn get_eva_system_prompt() -> &'static str {
    EVA_SYSTEM_PROMPT
}
