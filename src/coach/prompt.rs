// ABOUTME: Prompt construction for coaching questions about an analysed match
// ABOUTME: Renders the cached report and the player's question into one user message
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::fmt::Write;

use serde_json::Value;

use crate::errors::{AppError, AppResult};
use crate::session::CachedReport;

/// Turns a cached report and a question into the user prompt
pub trait PromptBuilder: Send + Sync {
    /// Build the prompt
    ///
    /// # Errors
    ///
    /// Returns an error if the report cannot be rendered
    fn build(&self, report: &CachedReport, question: &str) -> AppResult<String>;
}

/// Plain-text prompt listing every cached field followed by the question
#[derive(Debug, Clone, Copy, Default)]
pub struct ReportPromptBuilder;

impl ReportPromptBuilder {
    fn prediction_text(prediction: &Value) -> AppResult<String> {
        match prediction {
            Value::String(text) => Ok(text.clone()),
            Value::Null => Ok("unknown".to_owned()),
            other => Ok(serde_json::to_string(other)?),
        }
    }

    fn bullet_list(out: &mut String, title: &str, items: &[String]) -> std::fmt::Result {
        writeln!(out, "{title}:")?;
        if items.is_empty() {
            writeln!(out, "- none")?;
        }
        for item in items {
            writeln!(out, "- {item}")?;
        }
        Ok(())
    }

    fn render(report: &CachedReport, prediction: &str, question: &str) -> Result<String, std::fmt::Error> {
        let mut out = String::new();
        writeln!(out, "Here is the analysis of match #{}.", report.match_index)?;
        writeln!(out, "Prediction: {prediction}")?;
        writeln!(out)?;

        writeln!(out, "Most influential statistics (ranked):")?;
        if report.top_statistics.is_empty() {
            writeln!(out, "- none")?;
        }
        for (rank, (name, value)) in report.top_statistics.iter().enumerate() {
            writeln!(out, "{}. {name}: {value}", rank + 1)?;
        }
        writeln!(out)?;

        Self::bullet_list(&mut out, "Statistics to improve", &report.to_improve)?;
        writeln!(out)?;
        Self::bullet_list(&mut out, "Strengths", &report.strengths)?;
        writeln!(out)?;

        writeln!(out, "Player question: {question}")?;
        write!(
            out,
            "Answer using only this match analysis. Give concrete, actionable advice."
        )?;
        Ok(out)
    }
}

impl PromptBuilder for ReportPromptBuilder {
    fn build(&self, report: &CachedReport, question: &str) -> AppResult<String> {
        let prediction = Self::prediction_text(&report.prediction)?;
        Self::render(report, &prediction, question)
            .map_err(|e| AppError::internal(format!("Prompt rendering failed: {e}")))
    }
}
