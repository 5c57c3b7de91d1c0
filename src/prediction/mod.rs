// src/prediction/mod.rs
pub mod error;
pub mod risk;
pub mod service;
pub mod types;

pub use error::{ErrorKind, PredictionError};
pub use risk::{Confidence, RiskLevel};
pub use service::{Health, PredictionService, ServiceState};
pub use types::{FeatureVector, PredictionResult};
