// src/models/scaler.rs
use anyhow::{bail, Result};
use ndarray::{Array1, ArrayView1};
use serde::{Deserialize, Serialize};

/// Scaled values are clamped to this magnitude so extreme but finite inputs
/// never reach the classifier as infinities.
const MAX_ABS_SCALED: f64 = 1e6;

/// On-disk form of a fitted standard scaler (`mean_`, `scale_` / `var_`).
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ScalerParams {
    pub mean: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub var: Option<Vec<f64>>,
}

/// Per-feature standardisation using parameters captured at training time.
#[derive(Debug, Clone)]
pub struct StandardScaler {
    mean: Array1<f64>,
    scale: Array1<f64>,
}

impl StandardScaler {
    pub fn from_params(params: ScalerParams) -> Result<Self> {
        let scale = match (params.scale, params.var) {
            (Some(scale), _) => scale,
            (None, Some(var)) => {
                if let Some(v) = var.iter().find(|v| **v < 0.0) {
                    bail!("Scaler variance must be non-negative, found {}", v);
                }
                var.iter().map(|v| v.sqrt()).collect()
            }
            (None, None) => bail!("Scaler must provide either 'scale' or 'var'"),
        };

        if scale.len() != params.mean.len() {
            bail!(
                "Scaler mean has {} entries but scale has {}",
                params.mean.len(),
                scale.len()
            );
        }
        if params.mean.iter().chain(scale.iter()).any(|v| !v.is_finite()) {
            bail!("Scaler parameters must all be finite");
        }
        if let Some(s) = scale.iter().find(|s| **s < 0.0) {
            bail!("Scaler scale must be non-negative, found {}", s);
        }

        // Constant training columns were left unscaled.
        let scale: Array1<f64> = scale
            .into_iter()
            .map(|s| if s == 0.0 { 1.0 } else { s })
            .collect();

        Ok(Self {
            mean: Array1::from(params.mean),
            scale,
        })
    }

    pub fn n_features(&self) -> usize {
        self.mean.len()
    }

    /// `(x - mean) / scale`, clamped to `±MAX_ABS_SCALED`. Callers guarantee
    /// `values.len() == n_features()`.
    pub fn transform(&self, values: ArrayView1<f64>) -> Array1<f64> {
        ((&values - &self.mean) / &self.scale)
            .mapv(|v| v.clamp(-MAX_ABS_SCALED, MAX_ABS_SCALED))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_transform_uses_stored_parameters() {
        let scaler = StandardScaler::from_params(ScalerParams {
            mean: vec![10.0, 0.0, 5.0],
            scale: Some(vec![2.0, 1.0, 0.5]),
            var: None,
        })
        .unwrap();

        let out = scaler.transform(array![12.0, -3.0, 5.0].view());
        assert_eq!(out, array![1.0, -3.0, 0.0]);
    }

    #[test]
    fn test_variance_converted_to_scale() {
        let scaler = StandardScaler::from_params(ScalerParams {
            mean: vec![0.0, 0.0],
            scale: None,
            var: Some(vec![4.0, 0.0]),
        })
        .unwrap();

        // zero variance keeps the centred value
        let out = scaler.transform(array![6.0, 3.0].view());
        assert_eq!(out, array![3.0, 3.0]);
    }

    #[test]
    fn test_rejects_bad_parameters() {
        assert!(StandardScaler::from_params(ScalerParams {
            mean: vec![0.0, 1.0],
            scale: Some(vec![1.0]),
            var: None,
        })
        .is_err());
        assert!(StandardScaler::from_params(ScalerParams {
            mean: vec![0.0],
            scale: None,
            var: None,
        })
        .is_err());
        assert!(StandardScaler::from_params(ScalerParams {
            mean: vec![f64::NAN],
            scale: Some(vec![1.0]),
            var: None,
        })
        .is_err());
    }

    #[test]
    fn test_rejects_negative_scale() {
        let err = StandardScaler::from_params(ScalerParams {
            mean: vec![0.0, 0.0],
            scale: Some(vec![1.0, -2.0]),
            var: None,
        })
        .unwrap_err();
        assert!(err.to_string().contains("non-negative"));
    }

    #[test]
    fn test_overflowing_inputs_stay_finite() {
        let scaler = StandardScaler::from_params(ScalerParams {
            mean: vec![-1e308, 1e308, 0.0],
            scale: Some(vec![0.5, 0.5, 1.0]),
            var: None,
        })
        .unwrap();

        let out = scaler.transform(array![1e308, -1e308, 3.0].view());
        assert!(out.iter().all(|v| v.is_finite()));
        assert_eq!(out, array![MAX_ABS_SCALED, -MAX_ABS_SCALED, 3.0]);
    }
}
