// ABOUTME: Configuration module organization
// ABOUTME: Environment-only configuration with typed sections
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Reasoning-provider credential classification
pub mod credential;
/// Environment-based server configuration
pub mod environment;

pub use credential::LlmCredential;
pub use environment::ServerConfig;
