// src/api/responses.rs
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use log::{error, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::prediction::{ErrorKind, PredictionError, PredictionResult, RiskLevel};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct HealthResponse {
    pub status: String,
    pub model_loaded: bool,
    pub model_version: String,
    pub api_version: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct FeaturesResponse {
    pub features: Vec<String>,
    pub count: usize,
    pub description: BTreeMap<String, String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PredictRequest {
    pub features: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patient_id: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PredictResponse {
    pub prediction: u8,
    pub probability: f64,
    pub risk_level: RiskLevel,
    pub confidence: String,
    pub model_version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patient_id: Option<String>,
}

impl PredictResponse {
    pub fn from_result(result: PredictionResult, model_version: &str) -> Self {
        Self {
            prediction: result.prediction,
            probability: result.probability,
            risk_level: result.risk_level,
            confidence: result.confidence,
            model_version: model_version.to_string(),
            patient_id: result.patient_id,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ApiInfoResponse {
    pub message: String,
    pub version: String,
    pub model: String,
    pub model_version: String,
    pub health: String,
    pub features: String,
    pub predict: String,
}

/// Body returned for every non-2xx response.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ErrorResponse {
    pub error: String,
    pub detail: String,
    pub status_code: u16,
}

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub detail: String,
}

impl ApiError {
    pub fn new(status: StatusCode, detail: impl Into<String>) -> Self {
        Self {
            status,
            detail: detail.into(),
        }
    }

    pub fn not_found(path: &str) -> Self {
        Self::new(StatusCode::NOT_FOUND, format!("No route for {}", path))
    }
}

impl From<PredictionError> for ApiError {
    fn from(err: PredictionError) -> Self {
        let status = match err.kind() {
            ErrorKind::InvalidInput => StatusCode::BAD_REQUEST,
            ErrorKind::ModelUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self::new(status, err.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            return Self::new(StatusCode::PAYLOAD_TOO_LARGE, rejection.body_text());
        }
        PredictionError::MalformedRequest(rejection.body_text()).into()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!("{} - {}", self.status, self.detail);
        } else {
            warn!("{} - {}", self.status, self.detail);
        }
        let body = ErrorResponse {
            error: self
                .status
                .canonical_reason()
                .unwrap_or("Error")
                .to_string(),
            detail: self.detail,
            status_code: self.status.as_u16(),
        };
        (self.status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_mapping() {
        let invalid: ApiError = PredictionError::WrongFeatureCount {
            expected: 32,
            actual: 3,
        }
        .into();
        assert_eq!(invalid.status, StatusCode::BAD_REQUEST);

        let unavailable: ApiError = PredictionError::ModelUnavailable.into();
        assert_eq!(unavailable.status, StatusCode::SERVICE_UNAVAILABLE);

        let internal: ApiError = PredictionError::Internal("nan".into()).into();
        assert_eq!(internal.status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_request_accepts_integers_and_missing_id() {
        let req: PredictRequest = serde_json::from_str(r#"{"features": [1, 2.5, 3]}"#).unwrap();
        assert_eq!(req.features, vec![1.0, 2.5, 3.0]);
        assert!(req.patient_id.is_none());
    }

    #[test]
    fn test_request_rejects_strings() {
        let parsed: Result<PredictRequest, _> =
            serde_json::from_str(r#"{"features": [1, "two", 3]}"#);
        assert!(parsed.is_err());
    }
}
