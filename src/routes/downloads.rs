// ABOUTME: Notebook download route handler
// ABOUTME: Serves files of the notebooks directory as attachments and 404s anything outside it
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::path::{Component, Path as FsPath, PathBuf};

use axum::{
    extract::{Path, State},
    http::{header, HeaderValue},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use tracing::debug;

use crate::context::AppContext;
use crate::errors::{AppError, AppResult};

/// Download routes
pub struct DownloadRoutes;

impl DownloadRoutes {
    /// Create the download routes
    pub fn routes(context: AppContext) -> Router {
        Router::new()
            .route("/download/*filename", get(Self::download))
            .with_state(context)
    }

    async fn download(
        State(context): State<AppContext>,
        Path(filename): Path<String>,
    ) -> Result<Response, AppError> {
        let path = resolve(&context.config().assets.notebooks_dir, &filename).await?;
        let contents = tokio::fs::read(&path).await?;

        let name = path
            .file_name()
            .map_or_else(|| "download".to_owned(), |n| n.to_string_lossy().replace('"', "_"));
        let disposition = HeaderValue::from_str(&format!("attachment; filename=\"{name}\""))
            .unwrap_or_else(|_| HeaderValue::from_static("attachment"));

        Ok((
            [
                (header::CONTENT_TYPE, HeaderValue::from_static("application/octet-stream")),
                (header::CONTENT_DISPOSITION, disposition),
            ],
            contents,
        )
            .into_response())
    }
}

/// Resolve `filename` inside `root`, refusing anything that is not a regular file below it
async fn resolve(root: &FsPath, filename: &str) -> AppResult<PathBuf> {
    let not_found = || AppError::not_found(format!("File {filename}"));

    let relative = FsPath::new(filename);
    if relative
        .components()
        .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir))
    {
        debug!(filename, "Rejected download path outside the notebooks directory");
        return Err(not_found());
    }

    let root = tokio::fs::canonicalize(root).await.map_err(|_| not_found())?;
    let candidate = tokio::fs::canonicalize(root.join(relative))
        .await
        .map_err(|_| not_found())?;

    if !candidate.starts_with(&root) {
        debug!(filename, "Rejected download resolving outside the notebooks directory");
        return Err(not_found());
    }

    let metadata = tokio::fs::metadata(&candidate).await.map_err(|_| not_found())?;
    if metadata.is_file() {
        Ok(candidate)
    } else {
        Err(not_found())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorCode;

    #[tokio::test]
    async fn test_resolve_accepts_nested_files_only() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("week1")).unwrap();
        std::fs::write(dir.path().join("week1/eda.ipynb"), "{}").unwrap();

        let found = resolve(dir.path(), "week1/eda.ipynb").await.unwrap();
        assert!(found.ends_with("week1/eda.ipynb"));

        for bad in ["week1", "missing.ipynb", "../etc/passwd", "/etc/passwd", "week1/../../x"] {
            let err = resolve(dir.path(), bad).await.unwrap_err();
            assert_eq!(err.code, ErrorCode::ResourceNotFound, "path {bad}");
        }
    }
}
