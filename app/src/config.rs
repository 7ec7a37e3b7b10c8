use api_client::{SearchOptions, DEFAULT_API_URL, DEFAULT_INITIAL_LIMIT};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;
use tokio::time::Duration;
use viewer::{ViewerConfig, SWIPE_THRESHOLD};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization Error: {0}")]
    Serialize(#[from] toml::ser::Error),
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AppConfig {
    pub log_level: String,
    pub api_url: String,
    pub initial_limit: usize,
    pub search_top_k: usize,
    pub use_query_expansion: bool,
    pub hide_after_ms: u64,
    pub swipe_threshold: f32,
    pub dark_mode: bool,
    pub data_dir: PathBuf,
}

#[derive(Debug, Default)]
pub struct AppConfigOverrides {
    pub log_level: Option<String>,
    pub api_url: Option<String>,
    pub initial_limit: Option<usize>,
    pub search_top_k: Option<usize>,
    pub no_query_expansion: bool,
}

fn default_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".medialens")
}

fn default_path() -> PathBuf {
    default_dir().join("config")
}

impl AppConfig {
    pub fn load_from(path: Option<PathBuf>) -> Self {
        let path = path.unwrap_or_else(default_path);
        let cfg = config::Config::builder()
            .add_source(
                config::File::from(path)
                    .format(config::FileFormat::Toml)
                    .required(false),
            )
            .build()
            .unwrap_or_default();

        let count = |key: &str, default: usize| {
            cfg.get_int(key)
                .ok()
                .and_then(|v| usize::try_from(v).ok())
                .unwrap_or(default)
        };

        let log_level = cfg
            .get_string("log_level")
            .unwrap_or_else(|_| "info".to_string());
        let api_url = cfg
            .get_string("api_url")
            .unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        let initial_limit = count("initial_limit", DEFAULT_INITIAL_LIMIT);
        let search_top_k = count("search_top_k", SearchOptions::default().top_k);
        let use_query_expansion = cfg.get_bool("use_query_expansion").unwrap_or(true);
        let hide_after_ms = cfg
            .get_int("hide_after_ms")
            .ok()
            .and_then(|v| u64::try_from(v).ok())
            .unwrap_or(3000);
        let swipe_threshold = cfg
            .get_float("swipe_threshold")
            .map(|v| v as f32)
            .unwrap_or(SWIPE_THRESHOLD);
        let dark_mode = cfg.get_bool("dark_mode").unwrap_or(false);
        let data_dir = cfg
            .get_string("data_dir")
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_dir());

        Self {
            log_level,
            api_url,
            initial_limit,
            search_top_k,
            use_query_expansion,
            hide_after_ms,
            swipe_threshold,
            dark_mode,
            data_dir,
        }
    }

    pub fn apply_overrides(mut self, ov: &AppConfigOverrides) -> Self {
        if let Some(l) = &ov.log_level {
            self.log_level = l.clone();
        }
        if let Some(u) = &ov.api_url {
            self.api_url = u.clone();
        }
        if let Some(n) = ov.initial_limit {
            self.initial_limit = n;
        }
        if let Some(k) = ov.search_top_k {
            self.search_top_k = k;
        }
        if ov.no_query_expansion {
            self.use_query_expansion = false;
        }
        self
    }

    pub fn save_to(&self, path: Option<PathBuf>) -> Result<(), ConfigError> {
        let path = path.unwrap_or_else(default_path);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let data = toml::to_string(self)?;
        std::fs::write(path, data)?;
        Ok(())
    }

    pub fn viewer_config(&self) -> ViewerConfig {
        ViewerConfig {
            hide_after: Duration::from_millis(self.hide_after_ms),
            swipe_threshold: self.swipe_threshold,
        }
    }

    pub fn search_options(&self) -> SearchOptions {
        SearchOptions {
            top_k: self.search_top_k,
            use_query_expansion: self.use_query_expansion,
            ..SearchOptions::default()
        }
    }
}
