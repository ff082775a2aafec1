// ABOUTME: Explainable win-probability engine built from dataset statistics
// ABOUTME: Scores a match with standardized per-statistic contributions against winners and losers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(clippy::cast_precision_loss)] // Safe: row counts stay far below 2^52

//! # Baseline Analytics
//!
//! For each numeric statistic the engine keeps the global mean and standard deviation plus
//! the winners' and losers' means. A statistic's weight is the standardized gap between
//! winners and losers; its contribution to one match is `weight * z` where `z` is the
//! player's standardized value. The win probability is
//! `sigmoid(logit(base_rate) + sum(contributions) / sqrt(n))`.
//!
//! Statistics with zero spread carry no signal and are ignored.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Map, Value};
use tracing::debug;

use super::{AnalysisReport, AnalyticsProvider, Dataset, MatchList, PlayerMatch};
use crate::constants::analytics::{LOSS, MAX_IMPROVEMENTS, MAX_STRENGTHS, TOP_STATISTICS, WIN};
use crate::errors::{AppError, AppResult};

/// Model identifier reported in every analysis
const MODEL_NAME: &str = "baseline-zscore-logistic";

/// Base rates are clamped away from 0 and 1 so the logit stays finite
const BASE_RATE_BOUNDS: (f64, f64) = (0.01, 0.99);

/// Per-statistic summary
#[derive(Debug, Clone)]
struct StatProfile {
    name: String,
    column: usize,
    mean: f64,
    std_dev: f64,
    winners_mean: f64,
    weight: f64,
}

impl StatProfile {
    fn z_score(&self, value: f64) -> f64 {
        (value - self.mean) / self.std_dev
    }

    /// Standardized distance to the winners' average, positive when the player trails it
    fn gap_to_winners(&self, value: f64) -> f64 {
        (self.winners_mean - value) * self.weight.signum() / self.std_dev
    }
}

/// Scored statistic of one match
struct StatScore<'a> {
    profile: &'a StatProfile,
    value: f64,
    contribution: f64,
    gap: f64,
}

/// Deterministic analytics over a loaded [`Dataset`]
pub struct BaselineAnalytics {
    dataset: Arc<Dataset>,
    profiles: Vec<StatProfile>,
    base_rate: f64,
}

impl BaselineAnalytics {
    /// Fit the statistic profiles of `dataset`
    #[must_use]
    pub fn new(dataset: Arc<Dataset>) -> Self {
        let rows = dataset.len();
        let wins = (0..rows).filter(|&r| dataset.is_win(r)).count();
        let base_rate = if rows == 0 {
            0.5
        } else {
            wins as f64 / rows as f64
        };

        let profiles = dataset
            .numeric_columns()
            .iter()
            .filter_map(|&column| Self::profile(&dataset, column))
            .collect::<Vec<_>>();

        debug!(
            statistics = profiles.len(),
            base_rate, "Baseline analytics fitted"
        );

        Self {
            dataset,
            profiles,
            base_rate,
        }
    }

    fn profile(dataset: &Dataset, column: usize) -> Option<StatProfile> {
        let mut all = Vec::new();
        let mut winners = Vec::new();
        let mut losers = Vec::new();
        for row in 0..dataset.len() {
            if let Some(value) = dataset.value(row, column) {
                all.push(value);
                if dataset.is_win(row) {
                    winners.push(value);
                } else {
                    losers.push(value);
                }
            }
        }

        let average = mean(&all)?;
        let spread = std_dev(&all, average);
        if spread <= f64::EPSILON {
            return None;
        }
        let winners_mean = mean(&winners).unwrap_or(average);
        let losers_mean = mean(&losers).unwrap_or(average);

        Some(StatProfile {
            name: dataset.headers().get(column)?.clone(),
            column,
            mean: average,
            std_dev: spread,
            winners_mean,
            weight: (winners_mean - losers_mean) / spread,
        })
    }

    fn win_probability(&self, contributions: f64) -> f64 {
        let (low, high) = BASE_RATE_BOUNDS;
        let base = self.base_rate.clamp(low, high);
        let logit = (base / (1.0 - base)).ln();
        let n = self.profiles.len().max(1) as f64;
        sigmoid(logit + contributions / n.sqrt())
    }

    fn score_row(&self, row: usize) -> Vec<StatScore<'_>> {
        self.profiles
            .iter()
            .filter_map(|profile| {
                let value = self.dataset.value(row, profile.column)?;
                Some(StatScore {
                    profile,
                    value,
                    contribution: profile.weight * profile.z_score(value),
                    gap: profile.gap_to_winners(value),
                })
            })
            .collect()
    }

    fn row_index(&self, match_index: u64) -> AppResult<usize> {
        usize::try_from(match_index)
            .ok()
            .filter(|&row| row < self.dataset.len())
            .ok_or_else(|| AppError::not_found(format!("Match {match_index}")))
    }
}

#[async_trait]
impl AnalyticsProvider for BaselineAnalytics {
    fn name(&self) -> &'static str {
        "baseline"
    }

    async fn analyze_match(&self, match_index: u64) -> AppResult<AnalysisReport> {
        let row = self.row_index(match_index)?;
        let mut scores = self.score_row(row);

        let total: f64 = scores.iter().map(|s| s.contribution).sum();
        let probability = self.win_probability(total);
        let predicted = if probability >= 0.5 { WIN } else { LOSS };
        let real = if self.dataset.is_win(row) { WIN } else { LOSS };
        let prediction = json!({
            "predicted": predicted,
            "probability": round3(probability),
            "real": real,
        });

        scores.sort_by(|a, b| descending(a.contribution.abs(), b.contribution.abs()));
        let top_statistics = scores
            .iter()
            .take(TOP_STATISTICS)
            .map(|s| (s.profile.name.clone(), round3(s.contribution)))
            .collect();

        scores.sort_by(|a, b| descending(a.gap, b.gap));
        let weaknesses = scores
            .iter()
            .filter(|s| s.gap > 0.0)
            .take(MAX_IMPROVEMENTS)
            .collect::<Vec<_>>();
        let to_improve = weaknesses.iter().map(|s| s.profile.name.clone()).collect();
        let improvement_details = weaknesses
            .iter()
            .map(|s| {
                json!({
                    "statistics": s.profile.name,
                    "player_value": s.value,
                    "winner_avg": round3(s.profile.winners_mean),
                })
            })
            .collect::<Vec<_>>();

        let strengths = scores
            .iter()
            .rev()
            .filter(|s| s.gap < 0.0)
            .take(MAX_STRENGTHS)
            .map(|s| s.profile.name.clone())
            .collect();

        let mut details = Map::new();
        details.insert(
            "player_name".to_owned(),
            self.dataset
                .player(row)
                .map_or(Value::Null, |p| Value::String(p.to_owned())),
        );
        details.insert(
            "improvement_details".to_owned(),
            Value::Array(improvement_details),
        );
        details.insert("model".to_owned(), Value::String(MODEL_NAME.to_owned()));

        Ok(AnalysisReport {
            match_index,
            prediction,
            top_statistics,
            to_improve,
            strengths,
            details,
        })
    }

    async fn players(&self, limit: usize) -> AppResult<Vec<String>> {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for name in (0..self.dataset.len())
            .filter_map(|row| self.dataset.player(row))
            .filter(|name| !name.is_empty())
        {
            *counts.entry(name).or_insert(0) += 1;
        }

        let mut ranked: Vec<(&str, usize)> = counts.into_iter().collect();
        ranked.sort_unstable_by(|(name_a, count_a), (name_b, count_b)| {
            count_b.cmp(count_a).then_with(|| name_a.cmp(name_b))
        });
        Ok(ranked
            .into_iter()
            .take(limit)
            .map(|(name, _)| name.to_owned())
            .collect())
    }

    async fn matches(&self, player: &str) -> AppResult<MatchList> {
        let wanted = player.trim().to_lowercase();
        let matches = if wanted.is_empty() {
            Vec::new()
        } else {
            (0..self.dataset.len())
                .filter(|&row| {
                    self.dataset
                        .player(row)
                        .is_some_and(|name| name.to_lowercase() == wanted)
                })
                .map(|row| PlayerMatch {
                    index: row as u64,
                    result: if self.dataset.is_win(row) { WIN } else { LOSS }.to_owned(),
                })
                .collect()
        };

        Ok(MatchList {
            player: player.trim().to_owned(),
            matches,
        })
    }
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

fn std_dev(values: &[f64], mean: f64) -> f64 {
    let variance =
        values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len().max(1) as f64;
    variance.sqrt()
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

fn round3(x: f64) -> f64 {
    (x * 1000.0).round() / 1000.0
}

fn descending(a: f64, b: f64) -> Ordering {
    b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::environment::DatasetConfig;
    use std::path::PathBuf;

    const SAMPLE: &str = "player name;result;goals;saves;demos;flat\n\
                          Zen;1;4;1;2;7\n\
                          Zen;1;3;2;0;7\n\
                          Vatira;0;0;3;1;7\n\
                          Vatira;0;1;4;1;7\n\
                          Rise;1;2;0;3;7\n\
                          Rise;0;0;5;0;7\n";

    fn engine() -> BaselineAnalytics {
        engine_from(SAMPLE)
    }

    fn engine_from(csv: &str) -> BaselineAnalytics {
        let config = DatasetConfig {
            path: PathBuf::from("unused.csv"),
            delimiter: b';',
            player_column: "player name".to_owned(),
            target_column: "result".to_owned(),
        };
        let dataset = Dataset::from_reader(csv.as_bytes(), &config).unwrap();
        BaselineAnalytics::new(Arc::new(dataset))
    }

    #[test]
    fn test_constant_statistics_are_ignored() {
        let engine = engine();
        assert!(engine.profiles.iter().all(|p| p.name != "flat"));
        assert_eq!(engine.profiles.len(), 3);
    }

    #[tokio::test]
    async fn test_strong_winner_row_predicts_win() {
        let report = engine().analyze_match(0).await.unwrap();
        assert_eq!(report.match_index, 0);
        assert_eq!(report.prediction["predicted"], "Win");
        assert_eq!(report.prediction["real"], "Win");
        assert!(report.prediction["probability"].as_f64().unwrap() > 0.5);
        assert_eq!(report.top_statistics.len(), 3);
        assert_eq!(report.details["player_name"], "Zen");
        assert_eq!(report.details["model"], MODEL_NAME);
        assert!(report.strengths.contains(&"goals".to_owned()));
    }

    #[tokio::test]
    async fn test_top_statistics_ranked_by_absolute_contribution() {
        let report = engine().analyze_match(3).await.unwrap();
        let magnitudes = report
            .top_statistics
            .iter()
            .map(|(_, v)| v.abs())
            .collect::<Vec<_>>();
        assert!(magnitudes.windows(2).all(|w| w[0] >= w[1]));
    }

    #[tokio::test]
    async fn test_losing_row_lists_goals_to_improve() {
        let report = engine().analyze_match(2).await.unwrap();
        assert_eq!(report.prediction["real"], "Loss");
        assert!(report.to_improve.contains(&"goals".to_owned()));
        assert!(report.to_improve.len() <= MAX_IMPROVEMENTS);
        let details = report.details["improvement_details"].as_array().unwrap();
        assert_eq!(details.len(), report.to_improve.len());
    }

    #[tokio::test]
    async fn test_out_of_range_index_is_not_found() {
        let err = engine().analyze_match(6).await.unwrap_err();
        assert_eq!(err.code, crate::errors::ErrorCode::ResourceNotFound);
        assert_eq!(err.message, "Match 6 not found");
    }

    #[tokio::test]
    async fn test_players_by_frequency_then_name() {
        let players = engine().players(2).await.unwrap();
        assert_eq!(players, vec!["Rise".to_owned(), "Vatira".to_owned()]);
    }

    #[tokio::test]
    async fn test_players_ranking_over_many_players() {
        let mut csv = String::from("player name;result;goals\n");
        let mut row = 0_usize;
        for player in 0..300_usize {
            for _ in 0..=(player % 4) {
                csv.push_str(&format!("p{player:03};{};{}\n", row % 2, row % 7));
                row += 1;
            }
        }
        let engine = engine_from(&csv);

        let top = engine.players(3).await.unwrap();
        assert_eq!(top, vec!["p003".to_owned(), "p007".to_owned(), "p011".to_owned()]);

        let all = engine.players(1000).await.unwrap();
        assert_eq!(all.len(), 300);
        assert_eq!(all.last().map(String::as_str), Some("p296"));
    }

    #[tokio::test]
    async fn test_matches_case_insensitive() {
        let list = engine().matches("  vatira ").await.unwrap();
        assert_eq!(list.player, "vatira");
        assert_eq!(
            list.matches,
            vec![
                PlayerMatch { index: 2, result: "Loss".to_owned() },
                PlayerMatch { index: 3, result: "Loss".to_owned() },
            ]
        );
        assert!(engine().matches("").await.unwrap().matches.is_empty());
    }
}
