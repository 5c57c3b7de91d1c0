// src/utils/api_config.rs
use log::{info, warn};
use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

use crate::utils::constants::{CLASSIFIER_FILE, FEATURE_NAMES_FILE, SCALER_FILE};

const DEFAULT_MAX_REQUEST_SIZE: usize = 1024 * 1024;

/// Runtime settings for the prediction API.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub api_title: String,
    pub api_version: String,
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub cors_origins: Vec<String>,
    pub max_request_size: usize,
    pub worker_threads: usize,
    /// Exit when the artifacts cannot be loaded instead of serving unhealthy.
    pub require_model: bool,
    pub model_dir: PathBuf,
    pub model_path: PathBuf,
    pub scaler_path: PathBuf,
    pub features_path: PathBuf,
    pub model_name: String,
    pub model_version: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::from_source(|_| None)
    }
}

impl ApiConfig {
    /// Create configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_source(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key lookup; missing or unparsable
    /// values fall back to their defaults.
    pub fn from_source<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let text = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let model_dir = PathBuf::from(text("MODEL_DIR", "models"));
        let artifact = |key: &str, file: &str| {
            lookup(key)
                .map(PathBuf::from)
                .unwrap_or_else(|| model_dir.join(file))
        };

        let cors_origins: Vec<String> = text("CORS_ORIGINS", "*")
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Self {
            api_title: text("API_TITLE", "Alzheimer's Disease Risk Prediction API"),
            api_version: text("API_VERSION", "1.0.0"),
            host: text("HOST", "0.0.0.0"),
            port: lookup("PORT").and_then(|s| s.parse().ok()).unwrap_or(8000),
            log_level: text("LOG_LEVEL", "info"),
            cors_origins: if cors_origins.is_empty() {
                vec!["*".to_string()]
            } else {
                cors_origins
            },
            max_request_size: lookup("MAX_REQUEST_SIZE")
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_MAX_REQUEST_SIZE),
            worker_threads: lookup("WORKER_THREADS")
                .and_then(|s| s.parse::<usize>().ok())
                .filter(|n| *n > 0)
                .unwrap_or_else(num_cpus::get),
            require_model: lookup("REQUIRE_MODEL")
                .and_then(|s| s.parse().ok())
                .unwrap_or(true),
            model_path: artifact("MODEL_PATH", CLASSIFIER_FILE),
            scaler_path: artifact("SCALER_PATH", SCALER_FILE),
            features_path: artifact("FEATURES_PATH", FEATURE_NAMES_FILE),
            model_dir,
            model_name: text("MODEL_NAME", "Tuned Gradient Boosting"),
            model_version: text("MODEL_VERSION", "1.0.0"),
        }
    }

    /// Points all three artifact paths at files inside `dir`.
    pub fn with_model_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        self.model_path = dir.join(CLASSIFIER_FILE);
        self.scaler_path = dir.join(SCALER_FILE);
        self.features_path = dir.join(FEATURE_NAMES_FILE);
        self.model_dir = dir;
        self
    }

    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        let addr = format!("{}:{}", self.host, self.port);
        addr.parse()
            .map_err(|e| anyhow::anyhow!("Invalid listen address '{}': {}", addr, e))
    }

    pub fn allows_any_origin(&self) -> bool {
        self.cors_origins.iter().any(|o| o == "*")
    }

    /// Log the current configuration
    pub fn log_config(&self) {
        info!("{} v{}", self.api_title, self.api_version);
        info!("   Listening on {}:{}", self.host, self.port);
        info!("   Model: {} v{}", self.model_name, self.model_version);
        info!("   Classifier: {}", self.model_path.display());
        info!("   Scaler: {}", self.scaler_path.display());
        info!("   Feature names: {}", self.features_path.display());
        info!("   Worker threads: {}", self.worker_threads);
        info!("   Max request size: {} bytes", self.max_request_size);
        if self.allows_any_origin() {
            warn!("   CORS allows any origin; restrict CORS_ORIGINS in production");
        } else {
            info!("   CORS origins: {:?}", self.cors_origins);
        }
        if !self.require_model {
            warn!("   REQUIRE_MODEL=false: the API keeps serving if artifacts fail to load");
        }
    }
}
