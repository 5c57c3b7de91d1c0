// src/api/mod.rs
pub mod handlers;
pub mod responses;
pub mod server;

use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderValue, Method};
use axum::routing::{get, post};
use axum::Router;
use log::warn;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use crate::prediction::PredictionService;
use crate::utils::api_config::ApiConfig;

/// Shared, read-only state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<PredictionService>,
    pub config: Arc<ApiConfig>,
}

impl AppState {
    pub fn new(service: Arc<PredictionService>, config: ApiConfig) -> Self {
        Self {
            service,
            config: Arc::new(config),
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config);
    let body_limit = DefaultBodyLimit::max(state.config.max_request_size);

    Router::new()
        .route("/", get(handlers::api_info_handler))
        .route("/api", get(handlers::api_info_handler))
        .route("/health", get(handlers::health_handler))
        .route("/features", get(handlers::features_handler))
        .route("/predict", post(handlers::predict_handler))
        .fallback(handlers::fallback_handler)
        .layer(body_limit)
        .layer(cors)
        .with_state(state)
}

fn cors_layer(config: &ApiConfig) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    if config.allows_any_origin() {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin '{}'", origin);
                None
            }
        })
        .collect();
    layer.allow_origin(AllowOrigin::list(origins))
}
