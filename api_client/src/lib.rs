//! API client module for the media analysis backend.

mod models;
pub mod urls;

pub use models::{BackendMedia, MediaKind, MediaRecord};

use reqwest::header::CONTENT_TYPE;
use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_API_URL: &str = "http://localhost:5001/api";
pub const DEFAULT_INITIAL_LIMIT: usize = 9;

/// File extensions the backend accepts for upload.
pub const UPLOAD_EXTENSIONS: [&str; 18] = [
    "jpg", "jpeg", "png", "bmp", "gif", "webp", "tiff", "tif", "mp4", "avi", "mov", "mkv",
    "flv", "wmv", "webm", "m4v", "heic", "heif",
];

#[derive(Debug, Error)]
pub enum ApiClientError {
    #[error("Request Error: {0}")]
    RequestError(String),
    #[error("Backend Error: {0}")]
    BackendError(String),
    #[error("File Error: {0}")]
    FileError(String),
    #[error("Other Error: {0}")]
    Other(String),
}

/// Tuning knobs sent along with a search query.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SearchOptions {
    pub top_k: usize,
    pub use_query_expansion: bool,
    pub auto_translate: bool,
    pub use_dynamic_threshold: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fixed_threshold: Option<f32>,
    pub always_rerank: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rerank_if_below: Option<f32>,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            top_k: 12,
            use_query_expansion: true,
            auto_translate: false,
            use_dynamic_threshold: false,
            fixed_threshold: None,
            always_rerank: false,
            rerank_if_below: None,
        }
    }
}

#[derive(Debug, Serialize)]
struct SearchRequest<'a> {
    query: &'a str,
    #[serde(flatten)]
    options: &'a SearchOptions,
}

#[derive(Debug, Deserialize)]
struct InitialMediaResponse {
    #[serde(default)]
    media: Vec<BackendMedia>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<BackendMedia>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: Option<String>,
    details: Option<Vec<String>>,
}

/// Outcome of an upload request.
#[derive(Debug, Clone, Deserialize, PartialEq, Default)]
pub struct UploadSummary {
    #[serde(default)]
    pub uploaded: usize,
    #[serde(default)]
    pub files: Vec<String>,
    #[serde(default)]
    pub errors: Option<Vec<String>>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub index_loaded: bool,
    #[serde(default)]
    pub media_count: usize,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct AnalyseStatus {
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
}

pub fn is_supported_upload(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| UPLOAD_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl Default for ApiClient {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL.to_string())
    }
}

impl ApiClient {
    pub fn new(base_url: String) -> Self {
        ApiClient {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn thumbnail_url(&self, locator: &str, kind: MediaKind) -> String {
        urls::thumbnail_url(&self.base_url, locator, kind)
    }

    pub fn media_file_url(&self, locator: &str) -> String {
        urls::media_file_url(&self.base_url, locator)
    }

    fn normalize(&self, items: Vec<BackendMedia>) -> Vec<MediaRecord> {
        items
            .into_iter()
            .map(|item| MediaRecord::from_backend(item, &self.base_url))
            .collect()
    }

    async fn error_from(response: reqwest::Response) -> ApiClientError {
        let status = response.status();
        let text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        match serde_json::from_str::<ErrorResponse>(&text) {
            Ok(ErrorResponse { error: Some(msg), details }) => {
                let msg = match details {
                    Some(d) if !d.is_empty() => format!("{} ({})", msg, d.join("; ")),
                    _ => msg,
                };
                ApiClientError::BackendError(msg)
            }
            _ => ApiClientError::BackendError(format!("{}: {}", status, text)),
        }
    }

    /// Fetch the first `limit` media items for the browse grid.
    /// Failures are logged and reported as an empty list.
    #[cfg_attr(feature = "trace-spans", tracing::instrument(skip(self)))]
    pub async fn fetch_initial_media(&self, limit: usize) -> Vec<MediaRecord> {
        match self.try_fetch_initial_media(limit).await {
            Ok(items) => items,
            Err(e) => {
                tracing::error!("Failed to load initial media: {}", e);
                Vec::new()
            }
        }
    }

    pub async fn try_fetch_initial_media(
        &self,
        limit: usize,
    ) -> Result<Vec<MediaRecord>, ApiClientError> {
        let url = format!("{}/media/initial?limit={}", self.base_url, limit);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ApiClientError::RequestError(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }

        let body = response
            .json::<InitialMediaResponse>()
            .await
            .map_err(|e| ApiClientError::RequestError(e.to_string()))?;
        tracing::debug!("Loaded {} initial media items", body.media.len());
        Ok(self.normalize(body.media))
    }

    /// Free-text search. Failures are logged and reported as an empty list.
    #[cfg_attr(feature = "trace-spans", tracing::instrument(skip(self, options)))]
    pub async fn search_media(&self, query: &str, options: &SearchOptions) -> Vec<MediaRecord> {
        match self.try_search_media(query, options).await {
            Ok(items) => items,
            Err(e) => {
                tracing::error!("Search for {:?} failed: {}", query, e);
                Vec::new()
            }
        }
    }

    pub async fn try_search_media(
        &self,
        query: &str,
        options: &SearchOptions,
    ) -> Result<Vec<MediaRecord>, ApiClientError> {
        let url = format!("{}/search", self.base_url);
        let response = self
            .client
            .post(&url)
            .header(CONTENT_TYPE, "application/json")
            .json(&SearchRequest { query, options })
            .send()
            .await
            .map_err(|e| ApiClientError::RequestError(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }

        let body = response
            .json::<SearchResponse>()
            .await
            .map_err(|e| ApiClientError::RequestError(e.to_string()))?;
        tracing::debug!("Search {:?} returned {} results", query, body.results.len());
        Ok(self.normalize(body.results))
    }

    /// Upload local files. Unsupported extensions are skipped and listed in
    /// the summary's errors; if nothing is left to send the call fails.
    #[cfg_attr(feature = "trace-spans", tracing::instrument(skip(self)))]
    pub async fn upload_media(&self, paths: &[PathBuf]) -> Result<UploadSummary, ApiClientError> {
        let mut form = Form::new();
        let mut rejected = Vec::new();
        let mut accepted = 0usize;

        for path in paths {
            let file_name = path
                .file_name()
                .and_then(|f| f.to_str())
                .ok_or_else(|| ApiClientError::FileError(format!("Invalid file name: {}", path.display())))?
                .to_string();
            if !is_supported_upload(path) {
                rejected.push(format!("{}: unsupported format", file_name));
                continue;
            }
            let bytes = tokio::fs::read(path)
                .await
                .map_err(|e| ApiClientError::FileError(format!("{}: {}", path.display(), e)))?;
            form = form.part("files", Part::bytes(bytes).file_name(file_name));
            accepted += 1;
        }

        if accepted == 0 {
            let msg = if rejected.is_empty() {
                "No files selected".to_string()
            } else {
                format!("No file could be uploaded ({})", rejected.join("; "))
            };
            return Err(ApiClientError::FileError(msg));
        }

        let url = format!("{}/upload", self.base_url);
        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| ApiClientError::RequestError(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }

        let mut summary = response
            .json::<UploadSummary>()
            .await
            .map_err(|e| ApiClientError::RequestError(e.to_string()))?;
        if !rejected.is_empty() {
            summary.errors.get_or_insert_with(Vec::new).extend(rejected);
        }
        tracing::info!("Uploaded {} file(s)", summary.uploaded);
        Ok(summary)
    }

    pub async fn health(&self) -> Result<HealthStatus, ApiClientError> {
        let url = format!("{}/health", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ApiClientError::RequestError(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }

        response
            .json::<HealthStatus>()
            .await
            .map_err(|e| ApiClientError::RequestError(e.to_string()))
    }

    /// Ask the backend to (re)index its media folder.
    pub async fn analyse(&self) -> Result<AnalyseStatus, ApiClientError> {
        let url = format!("{}/analyse", self.base_url);
        let response = self
            .client
            .post(&url)
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await
            .map_err(|e| ApiClientError::RequestError(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }

        response
            .json::<AnalyseStatus>()
            .await
            .map_err(|e| ApiClientError::RequestError(e.to_string()))
    }
}
