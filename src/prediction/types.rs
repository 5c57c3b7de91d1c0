// src/prediction/types.rs
use ndarray::ArrayView1;
use serde::{Deserialize, Serialize};

use crate::prediction::error::PredictionError;
use crate::prediction::risk::RiskLevel;
use crate::utils::constants::EXPECTED_FEATURES;

/// Exactly 32 finite values in training column order.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector(Vec<f64>);

impl FeatureVector {
    pub fn new(values: Vec<f64>) -> Result<Self, PredictionError> {
        if values.len() != EXPECTED_FEATURES {
            return Err(PredictionError::WrongFeatureCount {
                expected: EXPECTED_FEATURES,
                actual: values.len(),
            });
        }
        if let Some(index) = values.iter().position(|v| !v.is_finite()) {
            return Err(PredictionError::NonFiniteFeature { index, name: None });
        }
        Ok(Self(values))
    }

    pub fn view(&self) -> ArrayView1<'_, f64> {
        ArrayView1::from(self.0.as_slice())
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }
}

impl TryFrom<Vec<f64>> for FeatureVector {
    type Error = PredictionError;

    fn try_from(values: Vec<f64>) -> Result<Self, Self::Error> {
        Self::new(values)
    }
}

impl TryFrom<&[f64]> for FeatureVector {
    type Error = PredictionError;

    fn try_from(values: &[f64]) -> Result<Self, Self::Error> {
        Self::new(values.to_vec())
    }
}

/// Outcome of a single prediction.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PredictionResult {
    pub prediction: u8,
    pub probability: f64,
    pub risk_level: RiskLevel,
    pub confidence: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patient_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_wrong_length() {
        for len in [0, 31, 33] {
            let err = FeatureVector::new(vec![1.0; len]).unwrap_err();
            assert_eq!(
                err,
                PredictionError::WrongFeatureCount {
                    expected: 32,
                    actual: len
                }
            );
        }
    }

    #[test]
    fn test_rejects_non_finite_values() {
        let mut values = vec![1.0; 32];
        values[4] = f64::NAN;
        let err = FeatureVector::new(values.clone()).unwrap_err();
        assert_eq!(
            err,
            PredictionError::NonFiniteFeature {
                index: 4,
                name: None
            }
        );

        values[4] = f64::INFINITY;
        assert!(FeatureVector::try_from(values.as_slice()).is_err());
    }

    #[test]
    fn test_keeps_order() {
        let values: Vec<f64> = (0..32).map(|i| i as f64).collect();
        let vector = FeatureVector::try_from(values.clone()).unwrap();
        assert_eq!(vector.as_slice(), values.as_slice());
    }

    #[test]
    fn test_result_omits_missing_patient_id() {
        let result = PredictionResult {
            prediction: 0,
            probability: 0.1,
            risk_level: RiskLevel::Low,
            confidence: "High confidence".to_string(),
            patient_id: None,
        };
        let json = serde_json::to_value(&result).unwrap();
        assert!(json.get("patient_id").is_none());
        assert_eq!(json["risk_level"], "Low");
    }
}
