// ABOUTME: Dataset browsing route handlers
// ABOUTME: Serves the raw records, the player list and the matches of one player
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use axum::{
    extract::{Query, State},
    http::header,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use crate::analytics::MatchList;
use crate::constants::defaults;
use crate::context::AppContext;
use crate::errors::{AppError, AppResult};

/// Query of `/api/players`
#[derive(Debug, Deserialize)]
pub struct PlayersQuery {
    /// Maximum number of names
    pub limit: Option<String>,
}

impl PlayersQuery {
    fn limit(&self) -> AppResult<usize> {
        self.limit.as_deref().map_or(Ok(defaults::PLAYERS_LIMIT), |raw| {
            raw.trim()
                .parse()
                .map_err(|_| AppError::invalid_input(format!("Invalid limit: {raw}")))
        })
    }
}

/// Query of `/api/matches`
#[derive(Debug, Deserialize)]
pub struct MatchesQuery {
    /// Player name, matched case-insensitively
    #[serde(default)]
    pub player: String,
}

/// Dataset routes
pub struct DatasetRoutes;

impl DatasetRoutes {
    /// Create the dataset routes
    pub fn routes(context: AppContext) -> Router {
        Router::new()
            .route("/data", get(Self::records))
            .route("/api/players", get(Self::players))
            .route("/api/matches", get(Self::matches))
            .with_state(context)
    }

    async fn records(State(context): State<AppContext>) -> impl IntoResponse {
        (
            [(header::CONTENT_TYPE, "application/json")],
            context.dataset().records_json(),
        )
    }

    async fn players(
        State(context): State<AppContext>,
        Query(query): Query<PlayersQuery>,
    ) -> Result<Json<Vec<String>>, AppError> {
        let players = context.analytics().players(query.limit()?).await?;
        Ok(Json(players))
    }

    async fn matches(
        State(context): State<AppContext>,
        Query(query): Query<MatchesQuery>,
    ) -> Result<Json<MatchList>, AppError> {
        Ok(Json(context.analytics().matches(&query.player).await?))
    }
}
