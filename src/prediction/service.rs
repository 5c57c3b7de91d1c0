// src/prediction/service.rs
use log::{debug, info, warn};
use once_cell::sync::OnceCell;
use std::sync::Arc;

use crate::models::artifacts::ModelArtifacts;
use crate::prediction::error::PredictionError;
use crate::prediction::risk::{label_for, round_probability, Confidence, RiskLevel};
use crate::prediction::types::{FeatureVector, PredictionResult};

/// Lifecycle of the service. The only transition is `Unready -> Ready`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceState {
    Unready,
    Ready,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Health {
    pub loaded: bool,
}

/// Holds the artifact bundle behind a set-once cell. Reads never lock.
#[derive(Debug, Default)]
pub struct PredictionService {
    artifacts: OnceCell<Arc<ModelArtifacts>>,
}

impl PredictionService {
    /// A service with nothing loaded; every prediction is refused until
    /// [`PredictionService::install`] succeeds.
    pub fn unready() -> Self {
        Self::default()
    }

    pub fn ready(artifacts: ModelArtifacts) -> Self {
        let service = Self::default();
        // a fresh cell is always empty
        let _ = service.artifacts.set(Arc::new(artifacts));
        service
    }

    /// Moves the service to `Ready`. Returns `false` when artifacts were
    /// already installed; a loaded bundle is never replaced.
    pub fn install(&self, artifacts: ModelArtifacts) -> bool {
        if self.artifacts.set(Arc::new(artifacts)).is_ok() {
            info!("Prediction service is ready");
            true
        } else {
            warn!("Artifacts already installed; ignoring second bundle");
            false
        }
    }

    pub fn state(&self) -> ServiceState {
        if self.artifacts.get().is_some() {
            ServiceState::Ready
        } else {
            ServiceState::Unready
        }
    }

    pub fn health(&self) -> Health {
        Health {
            loaded: self.state() == ServiceState::Ready,
        }
    }

    pub fn artifacts(&self) -> Result<&Arc<ModelArtifacts>, PredictionError> {
        self.artifacts.get().ok_or(PredictionError::ModelUnavailable)
    }

    /// Canonical ordered feature names of the loaded model.
    pub fn feature_schema(&self) -> Result<&[String], PredictionError> {
        Ok(self.artifacts()?.feature_names.as_slice())
    }

    /// Validates the raw values, then predicts. Input errors are reported
    /// before the artifacts are consulted.
    pub fn predict(
        &self,
        features: Vec<f64>,
        patient_id: Option<String>,
    ) -> Result<PredictionResult, PredictionError> {
        let vector = FeatureVector::new(features).map_err(|e| self.name_feature(e))?;
        self.predict_vector(&vector, patient_id)
    }

    /// Fills in the feature name from the loaded list, when there is one.
    fn name_feature(&self, err: PredictionError) -> PredictionError {
        match (err, self.artifacts.get()) {
            (PredictionError::NonFiniteFeature { index, name: None }, Some(artifacts)) => {
                PredictionError::NonFiniteFeature {
                    index,
                    name: artifacts.feature_names.get(index).cloned(),
                }
            }
            (err, _) => err,
        }
    }

    pub fn predict_vector(
        &self,
        features: &FeatureVector,
        patient_id: Option<String>,
    ) -> Result<PredictionResult, PredictionError> {
        let artifacts = self.artifacts()?;

        let scaled = artifacts.scaler.transform(features.view());
        let raw = artifacts.classifier.predict_proba(scaled.view());
        if !(0.0..=1.0).contains(&raw) {
            return Err(PredictionError::Internal(format!(
                "classifier returned probability {}",
                raw
            )));
        }

        // Every derived field comes from the rounded value so the response
        // never disagrees with itself at a band edge.
        let probability = round_probability(raw);
        let result = PredictionResult {
            prediction: label_for(probability),
            probability,
            risk_level: RiskLevel::from_probability(probability),
            confidence: Confidence::from_probability(probability).label().to_string(),
            patient_id,
        };

        debug!(
            "Scored patient {}: raw={:.6}, probability={:.4}, risk={}",
            result.patient_id.as_deref().unwrap_or("N/A"),
            raw,
            result.probability,
            result.risk_level
        );
        Ok(result)
    }
}
