// ABOUTME: Integration tests for the dataset browsing routes
// ABOUTME: Covers /data records, player ranking and per-player match listing
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;
mod helpers;

use axum::http::StatusCode;
use common::{baseline_context, ScriptedProvider};
use eva_server::analytics::MatchList;
use eva_server::context::AppContext;
use eva_server::routes::DatasetRoutes;
use helpers::axum_test::AxumTestRequest;
use serde_json::Value;

fn context() -> AppContext {
    baseline_context(None, ScriptedProvider::replying("unused"))
}

#[tokio::test]
async fn test_data_returns_every_record_with_typed_cells() {
    let context = context();

    let response = AxumTestRequest::get("/data")
        .send(DatasetRoutes::routes(context))
        .await
        .assert_status(StatusCode::OK);
    assert_eq!(
        response.header("content-type").as_deref(),
        Some("application/json")
    );

    let records: Vec<Value> = response.json();
    assert_eq!(records.len(), 6);
    assert_eq!(records[0]["player name"], "Zen");
    assert_eq!(records[0]["goals"], 4.0);
    assert_eq!(records[5]["saves"], 5.0);
    // The outcome column is served as written
    assert_eq!(records[2]["result"], "0");
}

#[tokio::test]
async fn test_players_ranked_by_frequency_then_name() {
    let context = context();

    let all: Vec<String> = AxumTestRequest::get("/api/players")
        .send(DatasetRoutes::routes(context.clone()))
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(all, vec!["Rise", "Vatira", "Zen"]);

    let limited: Vec<String> = AxumTestRequest::get("/api/players?limit=2")
        .send(DatasetRoutes::routes(context))
        .await
        .json();
    assert_eq!(limited, vec!["Rise", "Vatira"]);
}

#[tokio::test]
async fn test_players_rejects_invalid_limit() {
    let response = AxumTestRequest::get("/api/players?limit=many")
        .send(DatasetRoutes::routes(context()))
        .await
        .assert_status(StatusCode::BAD_REQUEST);
    let error: Value = response.json();
    assert_eq!(error["error"]["code"], "INVALID_INPUT");
}

#[tokio::test]
async fn test_matches_are_case_insensitive_with_normalised_results() {
    let list: MatchList = AxumTestRequest::get("/api/matches?player=%20rISE%20")
        .send(DatasetRoutes::routes(context()))
        .await
        .assert_status(StatusCode::OK)
        .json();

    assert_eq!(list.player, "rISE");
    let summary: Vec<(u64, &str)> = list
        .matches
        .iter()
        .map(|m| (m.index, m.result.as_str()))
        .collect();
    assert_eq!(summary, vec![(4, "Win"), (5, "Loss")]);
}

#[tokio::test]
async fn test_matches_for_unknown_or_missing_player_are_empty() {
    let context = context();

    let unknown: MatchList = AxumTestRequest::get("/api/matches?player=Nobody")
        .send(DatasetRoutes::routes(context.clone()))
        .await
        .json();
    assert!(unknown.matches.is_empty());

    let missing: MatchList = AxumTestRequest::get("/api/matches")
        .send(DatasetRoutes::routes(context))
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(missing.player, "");
    assert!(missing.matches.is_empty());
}
