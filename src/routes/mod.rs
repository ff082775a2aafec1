// ABOUTME: Route module organization for the EVA HTTP endpoints
// ABOUTME: One router per domain, merged by the server
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! HTTP routes organised by domain
//!
//! Each module holds route definitions and thin handlers that delegate to the analytics,
//! session and coach layers held by [`crate::context::AppContext`].

/// Match analysis routes
pub mod analysis;
/// Coaching chat routes
pub mod chat;
/// Dataset browsing routes
pub mod dataset;
/// Notebook download routes
pub mod downloads;
/// Health check and readiness routes
pub mod health;

pub use analysis::AnalysisRoutes;
pub use chat::{ChatAnswer, ChatRoutes};
pub use dataset::DatasetRoutes;
pub use downloads::DownloadRoutes;
pub use health::HealthRoutes;
