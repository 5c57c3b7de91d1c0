// src/models/artifacts.rs
use anyhow::{bail, Context, Result};
use log::{debug, info};
use serde::de::DeserializeOwned;
use sha2::{Digest, Sha256};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::models::classifier::Classifier;
use crate::models::scaler::{ScalerParams, StandardScaler};
use crate::utils::api_config::ApiConfig;
use crate::utils::constants::EXPECTED_FEATURES;

/// Locations of the three persisted artifacts.
#[derive(Debug, Clone)]
pub struct ArtifactPaths {
    pub classifier: PathBuf,
    pub scaler: PathBuf,
    pub feature_names: PathBuf,
}

impl ArtifactPaths {
    pub fn from_config(config: &ApiConfig) -> Self {
        Self {
            classifier: config.model_path.clone(),
            scaler: config.scaler_path.clone(),
            feature_names: config.features_path.clone(),
        }
    }

    /// Paths that do not exist on disk.
    pub fn missing(&self) -> Vec<&Path> {
        [&self.classifier, &self.scaler, &self.feature_names]
            .into_iter()
            .map(PathBuf::as_path)
            .filter(|p| !p.exists())
            .collect()
    }
}

/// Classifier, scaler and feature order, immutable once loaded.
#[derive(Debug)]
pub struct ModelArtifacts {
    pub classifier: Classifier,
    pub scaler: StandardScaler,
    pub feature_names: Vec<String>,
    /// SHA-256 over the raw artifact bytes, in load order.
    pub fingerprint: String,
}

impl ModelArtifacts {
    /// Reads and cross-validates all three artifacts. Any missing file, parse
    /// error or dimension mismatch fails the whole load.
    pub fn load(paths: &ArtifactPaths) -> Result<Self> {
        let missing = paths.missing();
        if !missing.is_empty() {
            bail!("Missing model artifact(s): {:?}", missing);
        }

        let mut hasher = Sha256::new();
        let classifier: Classifier = read_json(&paths.classifier, &mut hasher)?;
        let scaler_params: ScalerParams = read_json(&paths.scaler, &mut hasher)?;
        let feature_names: Vec<String> = read_json(&paths.feature_names, &mut hasher)?;
        let fingerprint = hex::encode(hasher.finalize());

        let artifacts = Self::from_parts(classifier, scaler_params, feature_names, fingerprint)?;
        info!(
            "Model artifacts loaded: {} classifier, {} features (sha256 {})",
            artifacts.classifier.name(),
            artifacts.feature_names.len(),
            &artifacts.fingerprint[..12]
        );
        Ok(artifacts)
    }

    pub fn from_parts(
        classifier: Classifier,
        scaler_params: ScalerParams,
        feature_names: Vec<String>,
        fingerprint: String,
    ) -> Result<Self> {
        if feature_names.len() != EXPECTED_FEATURES {
            bail!(
                "Feature list has {} names, expected {}",
                feature_names.len(),
                EXPECTED_FEATURES
            );
        }
        let unique: HashSet<&String> = feature_names.iter().collect();
        if unique.len() != feature_names.len() {
            bail!("Feature list contains duplicate names");
        }

        let scaler = StandardScaler::from_params(scaler_params).context("Invalid scaler")?;
        if scaler.n_features() != EXPECTED_FEATURES {
            bail!(
                "Scaler was fitted on {} features, expected {}",
                scaler.n_features(),
                EXPECTED_FEATURES
            );
        }
        classifier
            .validate(EXPECTED_FEATURES)
            .context("Invalid classifier")?;

        Ok(Self {
            classifier,
            scaler,
            feature_names,
            fingerprint,
        })
    }
}

fn read_json<T: DeserializeOwned>(path: &Path, hasher: &mut Sha256) -> Result<T> {
    let bytes = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    debug!("Read {} bytes from {}", bytes.len(), path.display());
    hasher.update(&bytes);
    serde_json::from_slice(&bytes)
        .with_context(|| format!("Failed to deserialize {}", path.display()))
}
