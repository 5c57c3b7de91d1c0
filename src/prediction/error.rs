// src/prediction/error.rs

/// Failures surfaced by the prediction service.
#[derive(Debug, Clone, PartialEq)]
pub enum PredictionError {
    /// Wrong feature count.
    WrongFeatureCount { expected: usize, actual: usize },
    /// A feature that is NaN or infinite.
    NonFiniteFeature { index: usize, name: Option<String> },
    /// The request could not be decoded into the expected shape.
    MalformedRequest(String),
    /// Artifacts are not loaded; every prediction is refused.
    ModelUnavailable,
    /// The classifier produced a value outside [0, 1].
    Internal(String),
}

/// Coarse classification used by the HTTP layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidInput,
    ModelUnavailable,
    Internal,
}

impl PredictionError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PredictionError::WrongFeatureCount { .. }
            | PredictionError::NonFiniteFeature { .. }
            | PredictionError::MalformedRequest(_) => ErrorKind::InvalidInput,
            PredictionError::ModelUnavailable => ErrorKind::ModelUnavailable,
            PredictionError::Internal(_) => ErrorKind::Internal,
        }
    }

    pub fn is_invalid_input(&self) -> bool {
        self.kind() == ErrorKind::InvalidInput
    }
}

impl std::fmt::Display for PredictionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PredictionError::WrongFeatureCount { expected, actual } => {
                write!(f, "Expected {} features, got {}", expected, actual)
            }
            PredictionError::NonFiniteFeature { index, name } => match name {
                Some(name) => write!(
                    f,
                    "Feature {} ({}) must be a finite number",
                    index, name
                ),
                None => write!(f, "Feature {} must be a finite number", index),
            },
            PredictionError::MalformedRequest(detail) => write!(
                f,
                "Request must be a JSON object with 'features' (list of numbers) and optional 'patient_id' (string): {}",
                detail
            ),
            PredictionError::ModelUnavailable => {
                write!(f, "Model not loaded. Please check server logs.")
            }
            PredictionError::Internal(detail) => write!(f, "Prediction failed: {}", detail),
        }
    }
}

impl std::error::Error for PredictionError {}
