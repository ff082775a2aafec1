// ABOUTME: Health check route handlers for service monitoring and status endpoints
// ABOUTME: Provides liveness and readiness endpoints for load balancers and operators
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Health check routes for service monitoring

use crate::context::AppContext;

/// Health routes implementation
pub struct HealthRoutes;

impl HealthRoutes {
    /// Create all health check routes
    pub fn routes(context: AppContext) -> axum::Router {
        use axum::{extract::State, routing::get, Json, Router};

        async fn health_handler() -> Json<serde_json::Value> {
            Json(serde_json::json!({
                "status": "healthy",
                "timestamp": chrono::Utc::now().to_rfc3339()
            }))
        }

        async fn ready_handler(State(context): State<AppContext>) -> Json<serde_json::Value> {
            let now = chrono::Utc::now();
            Json(serde_json::json!({
                "status": "ready",
                "timestamp": now.to_rfc3339(),
                "uptime_secs": (now - context.started_at()).num_seconds(),
                "dataset": {
                    "rows": context.dataset().len(),
                    "statistics": context.dataset().numeric_columns().len()
                },
                "analytics": context.analytics().name(),
                "llm": {
                    "model": context.coach().model(),
                    "configured": context.coach().is_configured()
                }
            }))
        }

        Router::new()
            .route("/health", get(health_handler))
            .route("/ready", get(ready_handler))
            .with_state(context)
    }
}
