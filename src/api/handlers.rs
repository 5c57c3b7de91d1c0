// src/api/handlers.rs
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::Uri;
use axum::Json;
use log::info;
use uuid::Uuid;

use crate::api::responses::{
    ApiError, ApiInfoResponse, FeaturesResponse, HealthResponse, PredictRequest, PredictResponse,
};
use crate::api::AppState;
use crate::models::features::describe;

pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let health = state.service.health();
    Json(HealthResponse {
        status: if health.loaded { "healthy" } else { "unhealthy" }.to_string(),
        model_loaded: health.loaded,
        model_version: state.config.model_version.clone(),
        api_version: state.config.api_version.clone(),
    })
}

pub async fn features_handler(
    State(state): State<AppState>,
) -> Result<Json<FeaturesResponse>, ApiError> {
    let features = state.service.feature_schema()?.to_vec();
    Ok(Json(FeaturesResponse {
        count: features.len(),
        description: describe(&features),
        features,
    }))
}

pub async fn predict_handler(
    State(state): State<AppState>,
    payload: Result<Json<PredictRequest>, JsonRejection>,
) -> Result<Json<PredictResponse>, ApiError> {
    let Json(request) = payload?;
    let request_id = Uuid::new_v4();

    let result = state
        .service
        .predict(request.features, request.patient_id)?;

    info!(
        "[{}] Prediction made - Patient: {}, Probability: {:.3}, Risk: {}",
        request_id,
        result.patient_id.as_deref().unwrap_or("N/A"),
        result.probability,
        result.risk_level
    );

    Ok(Json(PredictResponse::from_result(
        result,
        &state.config.model_version,
    )))
}

pub async fn api_info_handler(State(state): State<AppState>) -> Json<ApiInfoResponse> {
    Json(ApiInfoResponse {
        message: state.config.api_title.clone(),
        version: state.config.api_version.clone(),
        model: state.config.model_name.clone(),
        model_version: state.config.model_version.clone(),
        health: "/health".to_string(),
        features: "/features".to_string(),
        predict: "/predict".to_string(),
    })
}

pub async fn fallback_handler(uri: Uri) -> ApiError {
    ApiError::not_found(uri.path())
}
