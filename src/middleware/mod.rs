// ABOUTME: HTTP middleware configuration
// ABOUTME: Cross-origin policy applied around every router
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// CORS layer built from configuration
pub mod cors;

pub use cors::setup_cors;
