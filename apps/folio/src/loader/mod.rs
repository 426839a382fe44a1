//! Data loader: one read of `data/resume.json`, parsed into a `ResumeDocument`.
//!
//! Failures never escape `load_resume`: they are logged and the caller keeps the page's static
//! markup. There is no retry and no timeout.

use std::path::PathBuf;

use async_trait::async_trait;
use reqwest::{Client, Url};
use thiserror::Error;
use tracing::{debug, error};

use crate::models::ResumeDocument;

/// Location of the resume data relative to the site root (or base URL).
pub const RESUME_DATA_PATH: &str = "data/resume.json";

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Failed to load resume data (status {status})")]
    Status { status: u16 },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid data URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
}

/// Where the resume JSON comes from. Implementations perform exactly one read per call.
#[async_trait]
pub trait DataSource: Send + Sync {
    async fn fetch(&self) -> Result<String, LoadError>;

    /// Human-readable origin for log lines.
    fn describe(&self) -> String;
}

// ────────────────────────────────────────────────────────────────────────────
// Sources
// ────────────────────────────────────────────────────────────────────────────

/// Reads `<root>/data/resume.json` from disk.
#[derive(Debug, Clone)]
pub struct FileSource {
    root: PathBuf,
}

impl FileSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path(&self) -> PathBuf {
        self.root.join(RESUME_DATA_PATH)
    }
}

#[async_trait]
impl DataSource for FileSource {
    async fn fetch(&self) -> Result<String, LoadError> {
        Ok(tokio::fs::read_to_string(self.path()).await?)
    }

    fn describe(&self) -> String {
        self.path().display().to_string()
    }
}

/// Fetches `<base_url>/data/resume.json` with a single GET.
#[derive(Clone)]
pub struct HttpSource {
    client: Client,
    url: Url,
}

impl HttpSource {
    pub fn new(base_url: &str) -> Result<Self, LoadError> {
        let invalid = |reason: String| LoadError::InvalidUrl {
            url: base_url.to_string(),
            reason,
        };
        // Without a trailing slash `Url::join` would replace the last path segment.
        let normalized = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{base_url}/")
        };
        let url = Url::parse(&normalized)
            .and_then(|base| base.join(RESUME_DATA_PATH))
            .map_err(|e| invalid(e.to_string()))?;

        Ok(Self {
            client: Client::new(),
            url,
        })
    }
}

#[async_trait]
impl DataSource for HttpSource {
    async fn fetch(&self) -> Result<String, LoadError> {
        let response = self.client.get(self.url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(LoadError::Status {
                status: status.as_u16(),
            });
        }
        Ok(response.text().await?)
    }

    fn describe(&self) -> String {
        self.url.to_string()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Loading
// ────────────────────────────────────────────────────────────────────────────

/// Reads and parses the resume document, surfacing the failure to the caller.
pub async fn try_load_resume(source: &dyn DataSource) -> Result<ResumeDocument, LoadError> {
    let body = source.fetch().await?;
    let document = serde_json::from_str(&body)?;
    debug!("Loaded resume data from {}", source.describe());
    Ok(document)
}

/// Reads and parses the resume document. Any failure is logged and yields `None`, in which case
/// the page's static markup stays as the presentation.
pub async fn load_resume(source: &dyn DataSource) -> Option<ResumeDocument> {
    match try_load_resume(source).await {
        Ok(document) => Some(document),
        Err(e) => {
            error!("Error loading resume data from {}: {e}", source.describe());
            None
        }
    }
}
