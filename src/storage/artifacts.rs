// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! On-disk artifacts for a processed request
//!
//! Two artifacts per request id: the decoded source image and the grouped
//! transcript (one paragraph per line). `tokio::fs::write` creates, writes
//! and closes in one step, so handles are flushed on every exit path.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

/// Errors from artifact storage
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to write artifact {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to read artifact {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// File store for per-request artifacts, keyed by the caller-supplied id
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    image_dir: PathBuf,
    transcript_dir: PathBuf,
}

impl ArtifactStore {
    pub fn new(image_dir: impl Into<PathBuf>, transcript_dir: impl Into<PathBuf>) -> Self {
        Self {
            image_dir: image_dir.into(),
            transcript_dir: transcript_dir.into(),
        }
    }

    /// Write decoded image bytes as `<image_dir>/<id>.<ext>`.
    pub async fn save_image(
        &self,
        id: &str,
        bytes: &[u8],
        extension: &str,
    ) -> Result<PathBuf, StoreError> {
        let path = self.image_dir.join(format!("{}.{}", id, extension));
        write_all(&self.image_dir, &path, bytes).await?;
        debug!("saved image artifact: {} ({} bytes)", path.display(), bytes.len());
        Ok(path)
    }

    /// Write grouped transcript lines as `<transcript_dir>/<id>.txt`,
    /// one paragraph per line. An empty transcript produces an empty file.
    pub async fn write_transcript(
        &self,
        id: &str,
        lines: &[String],
    ) -> Result<PathBuf, StoreError> {
        let path = self.transcript_dir.join(format!("{}.txt", id));
        let body = lines.join("\n");
        write_all(&self.transcript_dir, &path, body.as_bytes()).await?;
        debug!("saved transcript artifact: {} ({} lines)", path.display(), lines.len());
        Ok(path)
    }

    /// Read a transcript back as its non-empty trimmed paragraphs.
    pub async fn read_transcript(&self, path: &Path) -> Result<Vec<String>, StoreError> {
        let body = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| StoreError::Read {
                path: path.to_path_buf(),
                source,
            })?;

        Ok(body
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect())
    }
}

async fn write_all(dir: &Path, path: &Path, bytes: &[u8]) -> Result<(), StoreError> {
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|source| StoreError::Write {
            path: dir.to_path_buf(),
            source,
        })?;

    tokio::fs::write(path, bytes)
        .await
        .map_err(|source| StoreError::Write {
            path: path.to_path_buf(),
            source,
        })
}
