// ABOUTME: Delimited match dataset loaded once at startup
// ABOUTME: Detects numeric statistic columns and pre-renders the records JSON
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::fs::File;
use std::io::Read;

use bytes::Bytes;
use serde_json::{Map, Number, Value};
use tracing::info;

use crate::config::environment::DatasetConfig;
use crate::errors::{AppError, AppResult};

/// In-memory copy of the match dataset
#[derive(Debug)]
pub struct Dataset {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    player_column: usize,
    target_column: usize,
    numeric_columns: Vec<usize>,
    records_json: Bytes,
}

impl Dataset {
    /// Load the dataset file named by `config`
    ///
    /// # Errors
    ///
    /// Returns a storage error if the file cannot be opened or parsed, and a configuration
    /// error if the player or target column is missing
    pub fn load(config: &DatasetConfig) -> AppResult<Self> {
        let file = File::open(&config.path).map_err(|e| {
            AppError::storage(format!(
                "Cannot open dataset {}: {e}",
                config.path.display()
            ))
            .with_source(e)
        })?;

        let dataset = Self::from_reader(file, config)?;
        info!(
            path = %config.path.display(),
            rows = dataset.len(),
            statistics = dataset.numeric_columns.len(),
            "Dataset loaded"
        );
        Ok(dataset)
    }

    /// Parse a dataset from any reader using the delimiter and column names of `config`
    ///
    /// # Errors
    ///
    /// See [`Dataset::load`]
    pub fn from_reader<R: Read>(reader: R, config: &DatasetConfig) -> AppResult<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .delimiter(config.delimiter)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers: Vec<String> = csv_reader
            .headers()
            .map_err(|e| AppError::storage(format!("Invalid dataset header: {e}")))?
            .iter()
            .map(str::to_owned)
            .collect();

        let column = |name: &str| {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| AppError::config(format!("Dataset has no '{name}' column")))
        };
        let player_column = column(&config.player_column)?;
        let target_column = column(&config.target_column)?;

        let mut rows = Vec::new();
        for (line, record) in csv_reader.records().enumerate() {
            let record = record.map_err(|e| {
                AppError::storage(format!("Invalid dataset row {}: {e}", line + 1))
            })?;
            rows.push(record.iter().map(str::to_owned).collect::<Vec<_>>());
        }

        let numeric_columns = (0..headers.len())
            .filter(|&c| c != player_column && c != target_column)
            .filter(|&c| is_numeric_column(&rows, c))
            .collect::<Vec<_>>();

        let records_json = render_records(&headers, &rows, &numeric_columns)?;

        Ok(Self {
            headers,
            rows,
            player_column,
            target_column,
            numeric_columns,
            records_json,
        })
    }

    /// Number of match rows
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the dataset has no rows
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Column names in file order
    #[must_use]
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Positions of the numeric statistic columns
    #[must_use]
    pub fn numeric_columns(&self) -> &[usize] {
        &self.numeric_columns
    }

    /// Player name of a row
    #[must_use]
    pub fn player(&self, row: usize) -> Option<&str> {
        self.cell(row, self.player_column)
    }

    /// Whether the row records a win
    #[must_use]
    pub fn is_win(&self, row: usize) -> bool {
        self.cell(row, self.target_column).is_some_and(is_win)
    }

    /// Numeric value of a cell, `None` when empty or non-numeric
    #[must_use]
    pub fn value(&self, row: usize, column: usize) -> Option<f64> {
        self.cell(row, column)
            .filter(|v| !v.is_empty())
            .and_then(|v| v.parse::<f64>().ok())
            .filter(|v| v.is_finite())
    }

    /// Whole dataset as a JSON array of records
    #[must_use]
    pub fn records_json(&self) -> Bytes {
        self.records_json.clone()
    }

    fn cell(&self, row: usize, column: usize) -> Option<&str> {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .map(String::as_str)
    }
}

/// Interpret an outcome cell: `1`, `win`, `w`, `true`, `victory` (any case) are wins
#[must_use]
pub fn is_win(raw: &str) -> bool {
    let value = raw.trim();
    if let Ok(number) = value.parse::<f64>() {
        return number >= 0.5;
    }
    matches!(
        value.to_lowercase().as_str(),
        "win" | "w" | "true" | "victory"
    )
}

fn is_numeric_column(rows: &[Vec<String>], column: usize) -> bool {
    let mut seen = false;
    for cell in rows.iter().filter_map(|r| r.get(column)) {
        if cell.is_empty() {
            continue;
        }
        if cell.parse::<f64>().is_err() {
            return false;
        }
        seen = true;
    }
    seen
}

fn render_records(
    headers: &[String],
    rows: &[Vec<String>],
    numeric_columns: &[usize],
) -> AppResult<Bytes> {
    let records = rows
        .iter()
        .map(|row| {
            let record = headers
                .iter()
                .enumerate()
                .map(|(c, name)| {
                    let cell = row.get(c).map_or("", String::as_str);
                    let value = if cell.is_empty() {
                        Value::Null
                    } else if numeric_columns.contains(&c) {
                        cell.parse::<f64>()
                            .ok()
                            .and_then(Number::from_f64)
                            .map_or(Value::Null, Value::Number)
                    } else {
                        Value::String(cell.to_owned())
                    };
                    (name.clone(), value)
                })
                .collect::<Map<_, _>>();
            Value::Object(record)
        })
        .collect::<Vec<_>>();

    Ok(Bytes::from(serde_json::to_vec(&records)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn config() -> DatasetConfig {
        DatasetConfig {
            path: PathBuf::from("unused.csv"),
            delimiter: b';',
            player_column: "player name".to_owned(),
            target_column: "result".to_owned(),
        }
    }

    const SAMPLE: &str = "player name;result;goals;team\n\
                          Zen;1;3;blue\n\
                          Vatira;0;;orange\n\
                          zen;win;1;blue\n";

    #[test]
    fn test_numeric_columns_skip_player_target_and_text() {
        let dataset = Dataset::from_reader(SAMPLE.as_bytes(), &config()).unwrap();
        assert_eq!(dataset.len(), 3);
        assert_eq!(dataset.numeric_columns(), &[2]);
        assert_eq!(dataset.value(0, 2), Some(3.0));
        assert_eq!(dataset.value(1, 2), None);
        assert!(dataset.is_win(0));
        assert!(!dataset.is_win(1));
        assert!(dataset.is_win(2));
    }

    #[test]
    fn test_records_json_uses_numbers_and_nulls() {
        let dataset = Dataset::from_reader(SAMPLE.as_bytes(), &config()).unwrap();
        let records: Vec<Value> = serde_json::from_slice(&dataset.records_json()).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0]["goals"], serde_json::json!(3.0));
        assert_eq!(records[0]["team"], "blue");
        assert!(records[1]["goals"].is_null());
    }

    #[test]
    fn test_missing_required_column_is_config_error() {
        let err = Dataset::from_reader("name;result\nZen;1\n".as_bytes(), &config()).unwrap_err();
        assert_eq!(err.code, crate::errors::ErrorCode::ConfigError);
        assert!(err.message.contains("player name"));
    }

    #[test]
    fn test_outcome_parsing() {
        assert!(is_win("Win"));
        assert!(is_win(" 1 "));
        assert!(is_win("TRUE"));
        assert!(!is_win("loss"));
        assert!(!is_win("0"));
        assert!(!is_win(""));
    }
}
