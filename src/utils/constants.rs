// src/utils/constants.rs

/// Number of clinical features the classifier was trained on.
pub const EXPECTED_FEATURES: usize = 32;

/// Probability at or above which the binary label is 1.
pub const DECISION_THRESHOLD: f64 = 0.5;

/// Lower bounds of the Moderate, High and Critical risk bands.
pub const MODERATE_RISK_FLOOR: f64 = 0.40;
pub const HIGH_RISK_FLOOR: f64 = 0.65;
pub const CRITICAL_RISK_FLOOR: f64 = 0.80;

/// Distance from the decision threshold needed for each confidence label.
pub const HIGH_CONFIDENCE_DISTANCE: f64 = 0.30;
pub const MODERATE_CONFIDENCE_DISTANCE: f64 = 0.15;

/// Decimal places kept on the probability returned to clients.
pub const PROBABILITY_DECIMALS: i32 = 4;

pub const CLASSIFIER_FILE: &str = "classifier.json";
pub const SCALER_FILE: &str = "scaler.json";
pub const FEATURE_NAMES_FILE: &str = "feature_names.json";
