// ABOUTME: Core types and constants for the EVA match analysis server
// ABOUTME: Foundation crate with error handling and constants
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # EVA Core
//!
//! Shared types that change rarely: the unified `AppError` and application constants.

/// Unified error handling system with standard error codes and HTTP responses
pub mod errors;

/// Application constants organized by domain
pub mod constants;
