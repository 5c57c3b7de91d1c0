// src/api/server.rs
use anyhow::{Context, Result};
use log::{error, info, warn};
use std::sync::Arc;
use std::time::Instant;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

use crate::api::{build_router, AppState};
use crate::models::artifacts::{ArtifactPaths, ModelArtifacts};
use crate::prediction::PredictionService;
use crate::utils::api_config::ApiConfig;
use crate::utils::get_memory_usage;

/// Binds the listener, starts serving in the `Unready` state and loads the
/// artifacts in the background. With `require_model` a failed load stops the
/// server and is returned as the error.
pub async fn run(config: ApiConfig) -> Result<()> {
    let addr = config.socket_addr()?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    let service = Arc::new(PredictionService::unready());
    let paths = ArtifactPaths::from_config(&config);
    let require_model = config.require_model;
    let app = build_router(AppState::new(service.clone(), config));

    info!("Server starting on http://{}", listener.local_addr()?);
    info!("Health check: http://{}/health", listener.local_addr()?);

    let (fatal_tx, fatal_rx) = oneshot::channel::<anyhow::Error>();
    tokio::spawn(async move {
        match load_into(&service, paths).await {
            Ok(()) => {}
            Err(e) if require_model => {
                let _ = fatal_tx.send(e);
            }
            Err(e) => {
                warn!("Serving without a model: {:#}", e);
            }
        }
    });

    let server = async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
    };

    tokio::select! {
        served = server => {
            served.context("Server error")?;
            info!("Server stopped");
            Ok(())
        }
        Ok(e) = fatal_rx => {
            Err(e.context("Model loading failed"))
        }
    }
}

/// Loads the artifacts off the async workers and installs them into `service`.
pub async fn load_into(service: &PredictionService, paths: ArtifactPaths) -> Result<()> {
    info!("Loading ML model artifacts...");
    let start = Instant::now();

    let loaded = tokio::task::spawn_blocking(move || ModelArtifacts::load(&paths))
        .await
        .context("Artifact loading task panicked")?;

    match loaded {
        Ok(artifacts) => {
            let features = artifacts.feature_names.len();
            service.install(artifacts);
            info!(
                "Model ready in {:.2?}: {} features, resident memory {} MB",
                start.elapsed(),
                features,
                get_memory_usage().await
            );
            Ok(())
        }
        Err(e) => {
            error!("Failed to load model artifacts: {:#}", e);
            Err(e)
        }
    }
}

/// Loads and validates the artifacts without serving.
pub fn check_artifacts(config: &ApiConfig) -> Result<ModelArtifacts> {
    let paths = ArtifactPaths::from_config(config);
    for path in paths.missing() {
        error!("Missing model file: {}", path.display());
    }
    ModelArtifacts::load(&paths)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received, draining connections");
}
