// src/models/features.rs
//! Clinical feature catalogue. The loaded `feature_names.json` is the source of
//! truth for ordering; this table only supplies human-readable descriptions.

use once_cell::sync::Lazy;
use std::collections::{BTreeMap, HashMap};

use crate::utils::constants::EXPECTED_FEATURES;

/// Training column order of the reference model.
pub const CANONICAL_FEATURES: [&str; EXPECTED_FEATURES] = [
    "Age",
    "Gender",
    "Ethnicity",
    "EducationLevel",
    "BMI",
    "Smoking",
    "AlcoholConsumption",
    "PhysicalActivity",
    "DietQuality",
    "SleepQuality",
    "FamilyHistoryAlzheimers",
    "CardiovascularDisease",
    "Diabetes",
    "Depression",
    "HeadInjury",
    "Hypertension",
    "SystolicBP",
    "DiastolicBP",
    "CholesterolTotal",
    "CholesterolLDL",
    "CholesterolHDL",
    "CholesterolTriglycerides",
    "MMSE",
    "FunctionalAssessment",
    "MemoryComplaints",
    "BehavioralProblems",
    "ADL",
    "Confusion",
    "Disorientation",
    "PersonalityChanges",
    "DifficultyCompletingTasks",
    "Forgetfulness",
];

static FEATURE_DESCRIPTIONS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    [
        ("Age", "Patient age (60-90 years)"),
        ("Gender", "0=Female, 1=Male"),
        ("Ethnicity", "Categorical (0-3)"),
        ("EducationLevel", "Years of education"),
        ("BMI", "Body Mass Index"),
        ("Smoking", "0=No, 1=Yes"),
        ("AlcoholConsumption", "Weekly units"),
        ("PhysicalActivity", "Weekly hours"),
        ("DietQuality", "Score 0-10"),
        ("SleepQuality", "Score 0-10"),
        ("FamilyHistoryAlzheimers", "0=No, 1=Yes"),
        ("CardiovascularDisease", "0=No, 1=Yes"),
        ("Diabetes", "0=No, 1=Yes"),
        ("Depression", "0=No, 1=Yes"),
        ("HeadInjury", "0=No, 1=Yes"),
        ("Hypertension", "0=No, 1=Yes"),
        ("SystolicBP", "Systolic blood pressure (mmHg)"),
        ("DiastolicBP", "Diastolic blood pressure (mmHg)"),
        ("CholesterolTotal", "Total cholesterol (mg/dL)"),
        ("CholesterolLDL", "LDL cholesterol (mg/dL)"),
        ("CholesterolHDL", "HDL cholesterol (mg/dL)"),
        ("CholesterolTriglycerides", "Triglycerides (mg/dL)"),
        ("MMSE", "Mini-Mental State Examination score (0-30)"),
        ("FunctionalAssessment", "Functional ability score (0-10)"),
        ("MemoryComplaints", "0=No, 1=Yes"),
        ("BehavioralProblems", "0=No, 1=Yes"),
        ("ADL", "Activities of Daily Living score (0-10)"),
        ("Confusion", "0=No, 1=Yes"),
        ("Disorientation", "0=No, 1=Yes"),
        ("PersonalityChanges", "0=No, 1=Yes"),
        ("DifficultyCompletingTasks", "0=No, 1=Yes"),
        ("Forgetfulness", "0=No, 1=Yes"),
    ]
    .iter()
    .cloned()
    .collect()
});

pub fn description_for(name: &str) -> Option<&'static str> {
    FEATURE_DESCRIPTIONS.get(name).copied()
}

/// Descriptions for the given feature names. Names without a catalogue entry
/// are left out rather than invented.
pub fn describe(names: &[String]) -> BTreeMap<String, String> {
    names
        .iter()
        .filter_map(|name| description_for(name).map(|d| (name.clone(), d.to_string())))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_canonical_names_unique_and_described() {
        let unique: HashSet<&str> = CANONICAL_FEATURES.iter().copied().collect();
        assert_eq!(unique.len(), EXPECTED_FEATURES);
        for name in CANONICAL_FEATURES {
            assert!(description_for(name).is_some(), "missing description for {}", name);
        }
    }

    #[test]
    fn test_describe_skips_unknown_names() {
        let names = vec!["Age".to_string(), "ShoeSize".to_string()];
        let described = describe(&names);
        assert_eq!(described.len(), 1);
        assert_eq!(described["Age"], "Patient age (60-90 years)");
    }
}
