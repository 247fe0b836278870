//! File-backed resume store: one UTF-8 text file per resume, named
//! `{uuid}.txt`, under a configured directory.
//!
//! Files are written once at upload time and never mutated, so concurrent
//! reads need no coordination. Retention is opt-in: the store itself keeps
//! everything until `sweep_older_than` is called.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use tokio::fs;
use tracing::{debug, info};
use uuid::Uuid;

use crate::errors::AppError;

#[derive(Debug, Clone)]
pub struct ResumeStore {
    dir: PathBuf,
}

impl ResumeStore {
    /// Opens the store, creating the directory if needed.
    pub async fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .await
            .with_context(|| format!("Failed to create resume directory {}", dir.display()))?;
        Ok(Self { dir })
    }

    fn path_for(&self, id: Uuid) -> PathBuf {
        self.dir.join(format!("{id}.txt"))
    }

    /// Stores resume text under a freshly generated id.
    pub async fn put(&self, text: &str) -> Result<Uuid> {
        let id = Uuid::new_v4();
        let path = self.path_for(id);
        fs::write(&path, text)
            .await
            .with_context(|| format!("Failed to write resume {}", path.display()))?;
        debug!("Stored resume {id} ({} bytes)", text.len());
        Ok(id)
    }

    /// Reads a stored resume; `None` when the id was never stored (or has
    /// been swept).
    pub async fn get(&self, id: Uuid) -> Result<Option<String>> {
        match fs::read_to_string(self.path_for(id)).await {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("Failed to read resume {id}")),
        }
    }

    /// Deletes resumes last written before `cutoff` and returns how many
    /// were removed. Files that are not `{uuid}.txt` are left alone.
    pub async fn sweep_older_than(&self, cutoff: DateTime<Utc>) -> Result<usize> {
        let mut removed = 0;
        let mut entries = fs::read_dir(&self.dir)
            .await
            .with_context(|| format!("Failed to list resume directory {}", self.dir.display()))?;

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if !is_resume_file(&path) {
                continue;
            }
            let Ok(metadata) = entry.metadata().await else {
                continue;
            };
            let Ok(modified) = metadata.modified() else {
                continue;
            };
            if DateTime::<Utc>::from(modified) < cutoff {
                fs::remove_file(&path)
                    .await
                    .with_context(|| format!("Failed to remove resume {}", path.display()))?;
                removed += 1;
            }
        }

        if removed > 0 {
            info!("Retention sweep removed {removed} resumes");
        }
        Ok(removed)
    }
}

fn is_resume_file(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "txt")
        && path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .is_some_and(|stem| Uuid::parse_str(stem).is_ok())
}

/// Resolves the resume text for an analysis request. An id takes precedence
/// over inline text; blank values count as absent. `Ok(None)` means the
/// request carried neither, which each handler turns into its own
/// validation message.
///
/// Ids must be well-formed UUIDs: anything else cannot name a stored resume
/// and never reaches the filesystem, so it resolves to NotFound.
pub async fn resolve_resume_text(
    store: &ResumeStore,
    resume_id: Option<&str>,
    resume_text: Option<&str>,
) -> Result<Option<String>, AppError> {
    if let Some(id) = resume_id.map(str::trim).filter(|id| !id.is_empty()) {
        let id = Uuid::parse_str(id)
            .map_err(|_| AppError::NotFound("Resume not found".to_string()))?;
        return match store.get(id).await.map_err(AppError::Internal)? {
            Some(text) => Ok(Some(text)),
            None => Err(AppError::NotFound("Resume not found".to_string())),
        };
    }

    if let Some(text) = resume_text.map(str::trim).filter(|text| !text.is_empty()) {
        return Ok(Some(text.to_string()));
    }

    Ok(None)
}
