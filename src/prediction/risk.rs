// src/prediction/risk.rs
use serde::{Deserialize, Serialize};

use crate::utils::constants::{
    CRITICAL_RISK_FLOOR, DECISION_THRESHOLD, HIGH_CONFIDENCE_DISTANCE, HIGH_RISK_FLOOR,
    MODERATE_CONFIDENCE_DISTANCE, MODERATE_RISK_FLOOR, PROBABILITY_DECIMALS,
};

/// Risk tier over half-open probability bands:
/// `[0, 0.40)` Low, `[0.40, 0.65)` Moderate, `[0.65, 0.80)` High, `[0.80, 1.0]` Critical.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
    Critical,
}

impl RiskLevel {
    pub fn from_probability(probability: f64) -> Self {
        if probability < MODERATE_RISK_FLOOR {
            RiskLevel::Low
        } else if probability < HIGH_RISK_FLOOR {
            RiskLevel::Moderate
        } else if probability < CRITICAL_RISK_FLOOR {
            RiskLevel::High
        } else {
            RiskLevel::Critical
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Moderate => "Moderate",
            RiskLevel::High => "High",
            RiskLevel::Critical => "Critical",
        }
    }

    pub fn all() -> [RiskLevel; 4] {
        [
            RiskLevel::Low,
            RiskLevel::Moderate,
            RiskLevel::High,
            RiskLevel::Critical,
        ]
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Qualitative confidence, ordered by distance of the probability from the
/// decision threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Confidence {
    Low,
    Moderate,
    High,
}

impl Confidence {
    pub fn from_probability(probability: f64) -> Self {
        let distance = (probability - DECISION_THRESHOLD).abs();
        if distance >= HIGH_CONFIDENCE_DISTANCE {
            Confidence::High
        } else if distance >= MODERATE_CONFIDENCE_DISTANCE {
            Confidence::Moderate
        } else {
            Confidence::Low
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Confidence::High => "High confidence",
            Confidence::Moderate => "Moderate confidence",
            Confidence::Low => "Low confidence (borderline case)",
        }
    }
}

/// Binary label; a tie at the threshold counts as positive.
pub fn label_for(probability: f64) -> u8 {
    u8::from(probability >= DECISION_THRESHOLD)
}

pub fn round_probability(probability: f64) -> f64 {
    let factor = 10f64.powi(PROBABILITY_DECIMALS);
    ((probability * factor).round() / factor).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_band_boundaries_are_exact() {
        let cases = [
            (0.0, RiskLevel::Low),
            (0.39999, RiskLevel::Low),
            (0.40, RiskLevel::Moderate),
            (0.64999, RiskLevel::Moderate),
            (0.65, RiskLevel::High),
            (0.79999, RiskLevel::High),
            (0.80, RiskLevel::Critical),
            (1.0, RiskLevel::Critical),
        ];
        for (p, expected) in cases {
            assert_eq!(RiskLevel::from_probability(p), expected, "probability {}", p);
        }
    }

    #[test]
    fn test_bands_are_monotonic_without_gaps() {
        let mut previous = RiskLevel::Low;
        for i in 0..=10_000 {
            let level = RiskLevel::from_probability(i as f64 / 10_000.0);
            assert!(level >= previous);
            previous = level;
        }
        assert_eq!(previous, RiskLevel::Critical);
    }

    #[test]
    fn test_label_threshold_tie_is_positive() {
        assert_eq!(label_for(0.5), 1);
        assert_eq!(label_for(0.49999), 0);
        assert_eq!(label_for(1.0), 1);
        assert_eq!(label_for(0.0), 0);
    }

    #[test]
    fn test_confidence_labels() {
        assert_eq!(Confidence::from_probability(0.95).label(), "High confidence");
        assert_eq!(Confidence::from_probability(0.05).label(), "High confidence");
        assert_eq!(Confidence::from_probability(0.7).label(), "Moderate confidence");
        assert_eq!(
            Confidence::from_probability(0.55).label(),
            "Low confidence (borderline case)"
        );
        assert_eq!(Confidence::from_probability(0.3), Confidence::from_probability(0.7));
    }

    #[test]
    fn test_confidence_monotonic_in_distance() {
        let mut previous = Confidence::Low;
        for i in 0..=500 {
            let p = 0.5 + i as f64 / 1000.0;
            let level = Confidence::from_probability(p);
            assert!(level >= previous);
            previous = level;
        }
    }

    #[test]
    fn test_round_probability() {
        assert_eq!(round_probability(0.873_456), 0.8735);
        assert_eq!(round_probability(0.399_96), 0.4);
        assert_eq!(round_probability(1.0), 1.0);
    }

    #[test]
    fn test_serializes_as_plain_names() {
        let json = serde_json::to_string(&RiskLevel::Critical).unwrap();
        assert_eq!(json, "\"Critical\"");
    }
}
