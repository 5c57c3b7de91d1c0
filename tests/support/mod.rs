// tests/support/mod.rs
#![allow(dead_code)]

use serde_json::{json, Value};
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;
use tokio::net::TcpListener;

use risk_lib::api::{build_router, AppState};
use risk_lib::models::artifacts::{ArtifactPaths, ModelArtifacts};
use risk_lib::models::features::CANONICAL_FEATURES;
use risk_lib::prediction::PredictionService;
use risk_lib::utils::api_config::ApiConfig;

pub const EXAMPLE_PATIENT: [f64; 32] = [
    75.0, 1.0, 2.0, 12.0, 28.5, 0.0, 3.0, 2.5, 6.0, 5.0, 1.0, 0.0, 1.0, 0.0, 0.0, 1.0, 145.0,
    88.0, 220.0, 140.0, 50.0, 180.0, 22.0, 6.5, 1.0, 0.0, 7.0, 1.0, 0.0, 0.0, 1.0, 1.0,
];

/// Column means roughly matching the training population.
fn means() -> Vec<f64> {
    vec![
        75.0, 0.5, 0.7, 1.3, 27.0, 0.3, 10.0, 5.0, 5.0, 7.0, 0.25, 0.15, 0.15, 0.15, 0.3, 0.1,
        135.0, 90.0, 225.0, 125.0, 60.0, 230.0, 15.0, 5.0, 0.2, 0.2, 5.0, 0.2, 0.2, 0.15, 0.15,
        0.15,
    ]
}

/// Small two-tree gradient boosting model splitting on MMSE (index 22) and
/// ADL (index 26), the two strongest signals.
pub fn boosting_classifier() -> Value {
    json!({
        "kind": "gradient_boosting",
        "init_raw": -0.6,
        "learning_rate": 0.5,
        "trees": [
            {
                "children_left": [1, -1, -1],
                "children_right": [2, -1, -1],
                "feature": [22, -2, -2],
                "threshold": [0.0, -2.0, -2.0],
                "value": [0.0, 1.8, -1.2]
            },
            {
                "children_left": [1, -1, -1],
                "children_right": [2, -1, -1],
                "feature": [26, -2, -2],
                "threshold": [0.0, -2.0, -2.0],
                "value": [0.0, 0.9, -0.7]
            }
        ]
    })
}

pub fn logistic_classifier() -> Value {
    let mut coef = vec![0.05; 32];
    coef[22] = -1.1;
    coef[26] = -0.8;
    json!({
        "kind": "logistic_regression",
        "coef": coef,
        "intercept": -0.4
    })
}

/// Writes the three artifact files into `dir`.
pub fn write_artifacts(dir: &Path, classifier: &Value) -> ArtifactPaths {
    let scale: Vec<f64> = means().iter().map(|m| (m.abs() / 4.0).max(0.5)).collect();
    let names: Vec<&str> = CANONICAL_FEATURES.to_vec();

    let paths = ArtifactPaths {
        classifier: dir.join("classifier.json"),
        scaler: dir.join("scaler.json"),
        feature_names: dir.join("feature_names.json"),
    };
    std::fs::write(&paths.classifier, classifier.to_string()).unwrap();
    std::fs::write(
        &paths.scaler,
        json!({ "mean": means(), "scale": scale }).to_string(),
    )
    .unwrap();
    std::fs::write(&paths.feature_names, json!(names).to_string()).unwrap();
    paths
}

pub fn load_artifacts(classifier: &Value) -> (TempDir, ModelArtifacts) {
    let dir = tempfile::tempdir().unwrap();
    let paths = write_artifacts(dir.path(), classifier);
    let artifacts = ModelArtifacts::load(&paths).unwrap();
    (dir, artifacts)
}

pub struct TestServer {
    pub base_url: String,
    pub service: Arc<PredictionService>,
    pub client: reqwest::Client,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Serves the router on an ephemeral port.
pub async fn spawn_server(service: PredictionService, config: ApiConfig) -> TestServer {
    let service = Arc::new(service);
    let app = build_router(AppState::new(service.clone(), config));
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    TestServer {
        base_url: format!("http://{}", addr),
        service,
        client: reqwest::Client::new(),
    }
}

pub async fn spawn_ready_server() -> TestServer {
    let (_dir, artifacts) = load_artifacts(&boosting_classifier());
    spawn_server(PredictionService::ready(artifacts), ApiConfig::default()).await
}
