// src/models/mod.rs
pub mod artifacts;
pub mod classifier;
pub mod features;
pub mod scaler;

pub use artifacts::{ArtifactPaths, ModelArtifacts};
pub use classifier::{Classifier, RegressionTree};
pub use scaler::{ScalerParams, StandardScaler};
