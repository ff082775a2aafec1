// ABOUTME: Coaching chat route handler
// ABOUTME: Always answers 200 with an {answer} body, whatever branch the chat turn ends in
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! `POST /api/chat`
//!
//! Clients read the outcome from the answer text only. Even a body that is not JSON, or one
//! larger than the request body limit, yields a 200 with an `EVA server error` answer.

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, DefaultBodyLimit, State},
    http::HeaderMap,
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::coach::ChatTurnError;
use crate::constants::defaults;
use crate::context::AppContext;
use crate::errors::{AppError, AppResult, ErrorCode};

/// Response body of `/api/chat`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatAnswer {
    /// Coach answer or explanation of why there is none
    pub answer: String,
}

/// Extract the question from a buffered body; a missing or null question reads as empty
fn question_from_body(body: Result<Bytes, BytesRejection>) -> AppResult<String> {
    let body = body.map_err(|rejection| {
        AppError::invalid_input(format!("Unreadable request body: {}", rejection.body_text()))
    })?;
    parse_question(&body)
}

fn parse_question(body: &[u8]) -> AppResult<String> {
    let payload: Value = serde_json::from_slice(body).map_err(|e| {
        AppError::new(ErrorCode::InvalidFormat, format!("Invalid JSON body: {e}"))
    })?;
    let Value::Object(fields) = payload else {
        return Err(AppError::new(
            ErrorCode::InvalidFormat,
            "Request body must be a JSON object",
        ));
    };
    match fields.get("question") {
        None | Some(Value::Null) => Ok(String::new()),
        Some(Value::String(question)) => Ok(question.clone()),
        Some(_) => Err(AppError::invalid_input("question must be a string")),
    }
}

/// Chat routes
pub struct ChatRoutes;

impl ChatRoutes {
    /// Create the chat routes
    pub fn routes(context: AppContext) -> Router {
        Router::new()
            .route("/api/chat", post(Self::chat))
            .layer(DefaultBodyLimit::max(defaults::MAX_REQUEST_BODY_BYTES))
            .with_state(context)
    }

    async fn chat(
        State(context): State<AppContext>,
        headers: HeaderMap,
        body: Result<Bytes, BytesRejection>,
    ) -> Json<ChatAnswer> {
        let session = context.cookies().session_from_headers(&headers);

        let answer = match question_from_body(body) {
            Ok(question) => {
                context
                    .coach()
                    .respond(context.sessions(), session.as_ref(), &question)
                    .await
            }
            Err(error) => {
                warn!(category = error.category(), "Rejected chat body: {}", error.message);
                ChatTurnError::Fault(error).to_answer()
            }
        };

        Json(ChatAnswer { answer })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_question_shapes() {
        assert_eq!(parse_question(br#"{"question":" hi "}"#).unwrap(), " hi ");
        assert_eq!(parse_question(br#"{"question":null}"#).unwrap(), "");
        assert_eq!(parse_question(b"{}").unwrap(), "");
        assert_eq!(
            parse_question(br#"{"question":5}"#).unwrap_err().code,
            ErrorCode::InvalidInput
        );
        assert_eq!(
            parse_question(b"[1,2]").unwrap_err().code,
            ErrorCode::InvalidFormat
        );
        assert_eq!(
            parse_question(b"").unwrap_err().code,
            ErrorCode::InvalidFormat
        );
    }
}
