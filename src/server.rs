// ABOUTME: HTTP server assembly and lifecycle for the EVA API
// ABOUTME: Merges the domain routers, applies middleware layers and serves with graceful shutdown
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use anyhow::{Context, Result};
use axum::{http::Uri, Router};
use tokio::net::TcpListener;
use tower_http::{limit::RequestBodyLimitLayer, services::ServeDir, trace::TraceLayer};
use tracing::info;

use crate::constants::defaults;
use crate::context::AppContext;
use crate::errors::AppError;
use crate::middleware::setup_cors;
use crate::routes::{AnalysisRoutes, ChatRoutes, DatasetRoutes, DownloadRoutes, HealthRoutes};

/// Build the complete application router
#[must_use]
pub fn build_router(context: &AppContext) -> Router {
    let static_dir = context.config().assets.static_dir.clone();

    // Chat applies its own body limit and never answers 413
    let limited = Router::new()
        .merge(HealthRoutes::routes(context.clone()))
        .merge(DatasetRoutes::routes(context.clone()))
        .merge(AnalysisRoutes::routes(context.clone()))
        .merge(DownloadRoutes::routes(context.clone()))
        .layer(RequestBodyLimitLayer::new(defaults::MAX_REQUEST_BODY_BYTES));

    Router::new()
        .merge(limited)
        .merge(ChatRoutes::routes(context.clone()))
        .nest_service("/static", ServeDir::new(static_dir))
        .fallback(not_found)
        .layer(setup_cors(&context.config().cors))
        .layer(TraceLayer::new_for_http())
}

async fn not_found(uri: Uri) -> AppError {
    AppError::not_found(format!("Path {}", uri.path()))
}

/// Bind the configured address and serve until Ctrl-C or SIGTERM
///
/// # Errors
///
/// Returns an error if the address cannot be bound or the server fails
pub async fn run(context: AppContext) -> Result<()> {
    let address = context.config().bind_address();
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {address}"))?;

    display_available_endpoints(&address);

    axum::serve(listener, build_router(&context))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    info!("EVA server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("Failed to listen for Ctrl-C: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("Shutdown signal received, draining connections");
}

#[allow(clippy::cognitive_complexity)]
fn display_available_endpoints(address: &str) {
    info!("=== Available API Endpoints ===");
    info!("   Analyze match:   POST http://{address}/api/analyze");
    info!("   Coach chat:      POST http://{address}/api/chat");
    info!("   Players:         GET  http://{address}/api/players?limit=N");
    info!("   Matches:         GET  http://{address}/api/matches?player=NAME");
    info!("   Dataset:         GET  http://{address}/data");
    info!("   Downloads:       GET  http://{address}/download/{{path}}");
    info!("   Health:          GET  http://{address}/health");
    info!("   Readiness:       GET  http://{address}/ready");
    info!("=== End of Endpoint List ===");
}
