// ABOUTME: Match analysis route handler
// ABOUTME: Analyses one match, caches the report in the caller's session and issues the session cookie
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! `POST /api/analyze`
//!
//! The body is read as JSON whatever its content type. `match_index` (or `matchIndex`) may
//! be a non-negative integer or a string holding one; anything else is rejected with 400
//! before the analytics provider or the session store is touched.

use std::time::Instant;

use axum::{
    body::Bytes,
    extract::State,
    http::HeaderMap,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde::Deserialize;
use serde_json::Value;

use crate::context::AppContext;
use crate::errors::{AppError, AppResult};
use crate::logging::AppLogger;
use crate::session::cache_report;

/// Request body of `/api/analyze`
#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    /// Match to analyse
    #[serde(default, alias = "matchIndex")]
    pub match_index: Option<Value>,
}

impl AnalyzeRequest {
    /// Parse a raw body and coerce the match index
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for malformed JSON or a non-integer index and
    /// `MissingRequiredField` when no index is given
    pub fn parse(body: &[u8]) -> AppResult<u64> {
        let request: Self = serde_json::from_slice(body)
            .map_err(|e| AppError::invalid_input(format!("Invalid JSON body: {e}")))?;
        request.match_index()
    }

    /// Coerce the match index to a non-negative integer
    ///
    /// # Errors
    ///
    /// See [`AnalyzeRequest::parse`]
    pub fn match_index(&self) -> AppResult<u64> {
        let invalid = || AppError::invalid_input("match_index must be a non-negative integer");
        match &self.match_index {
            None | Some(Value::Null) => Err(AppError::missing_field("match_index")),
            Some(Value::Number(number)) => number.as_u64().ok_or_else(invalid),
            Some(Value::String(text)) => text.trim().parse::<u64>().map_err(|_| invalid()),
            Some(_) => Err(invalid()),
        }
    }
}

/// Analysis routes
pub struct AnalysisRoutes;

impl AnalysisRoutes {
    /// Create the analysis routes
    pub fn routes(context: AppContext) -> Router {
        Router::new()
            .route("/api/analyze", post(Self::analyze))
            .with_state(context)
    }

    async fn analyze(
        State(context): State<AppContext>,
        headers: HeaderMap,
        body: Bytes,
    ) -> Result<Response, AppError> {
        let started = Instant::now();
        let match_index = AnalyzeRequest::parse(&body)?;

        let report = context.analytics().analyze_match(match_index).await?;

        let (session, new_cookie) = match context.cookies().session_from_headers(&headers) {
            Some(session) => (session, None),
            None => {
                let (session, cookie) = context.cookies().issue();
                (session, Some(cookie))
            }
        };

        cache_report(context.sessions(), &session, &report).await?;

        AppLogger::log_analysis(
            match_index,
            new_cookie.is_some(),
            u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
        );

        let mut response = Json(report).into_response();
        if let Some(cookie) = new_cookie {
            cookie.apply(response.headers_mut());
        }
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorCode;

    #[test]
    fn test_match_index_coercion() {
        assert_eq!(AnalyzeRequest::parse(br#"{"match_index": 42}"#).unwrap(), 42);
        assert_eq!(AnalyzeRequest::parse(br#"{"matchIndex": 7}"#).unwrap(), 7);
        assert_eq!(AnalyzeRequest::parse(br#"{"match_index": " 12 "}"#).unwrap(), 12);
    }

    #[test]
    fn test_invalid_match_index_rejected() {
        let bodies: [&[u8]; 5] = [
            br#"{"match_index": -1}"#,
            br#"{"match_index": 1.5}"#,
            br#"{"match_index": "abc"}"#,
            br#"{"match_index": [1]}"#,
            b"not json",
        ];
        for body in bodies {
            let err = AnalyzeRequest::parse(body).unwrap_err();
            assert_eq!(err.code, ErrorCode::InvalidInput, "body {body:?}");
        }

        let missing = AnalyzeRequest::parse(b"{}").unwrap_err();
        assert_eq!(missing.code, ErrorCode::MissingRequiredField);
    }
}
