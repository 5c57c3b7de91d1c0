// src/batch/report.rs
use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::path::Path;

use crate::api::responses::PredictResponse;
use crate::prediction::RiskLevel;

const CSV_HEADER: &str =
    "row_index,patient_id,prediction,probability,risk_level,confidence,model_version,error";

/// One output line of a batch run.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchRecord {
    pub row_index: usize,
    pub patient_id: String,
    pub outcome: Result<PredictResponse, String>,
}

impl BatchRecord {
    pub fn success(row_index: usize, fallback_id: String, response: PredictResponse) -> Self {
        Self {
            row_index,
            patient_id: response.patient_id.clone().unwrap_or(fallback_id),
            outcome: Ok(response),
        }
    }

    pub fn failure(row_index: usize, patient_id: String, error: impl Into<String>) -> Self {
        Self {
            row_index,
            patient_id,
            outcome: Err(error.into()),
        }
    }

    fn to_csv_line(&self) -> String {
        let fields: Vec<String> = match &self.outcome {
            Ok(r) => vec![
                self.row_index.to_string(),
                escape(&self.patient_id),
                r.prediction.to_string(),
                r.probability.to_string(),
                r.risk_level.to_string(),
                escape(&r.confidence),
                escape(&r.model_version),
                String::new(),
            ],
            Err(e) => vec![
                self.row_index.to_string(),
                escape(&self.patient_id),
                String::new(),
                String::new(),
                String::new(),
                String::new(),
                String::new(),
                escape(e),
            ],
        };
        fields.join(",")
    }
}

fn escape(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

pub fn render_csv(records: &[BatchRecord]) -> String {
    let mut out = String::from(CSV_HEADER);
    out.push('\n');
    for record in records {
        out.push_str(&record.to_csv_line());
        out.push('\n');
    }
    out
}

pub fn write_csv(path: &Path, records: &[BatchRecord]) -> Result<()> {
    std::fs::write(path, render_csv(records))
        .with_context(|| format!("Error saving results to {}", path.display()))
}

#[derive(Debug, Clone, PartialEq)]
pub struct BatchSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub risk_distribution: BTreeMap<RiskLevel, usize>,
}

impl BatchSummary {
    pub fn from_records(records: &[BatchRecord]) -> Self {
        let mut risk_distribution = BTreeMap::new();
        let mut succeeded = 0;
        for record in records {
            if let Ok(response) = &record.outcome {
                succeeded += 1;
                *risk_distribution.entry(response.risk_level).or_insert(0) += 1;
            }
        }
        Self {
            total: records.len(),
            succeeded,
            failed: records.len() - succeeded,
            risk_distribution,
        }
    }

    /// Share of all rows (including failed ones) at `level`, in percent.
    pub fn percentage(&self, level: RiskLevel) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        let count = self.risk_distribution.get(&level).copied().unwrap_or(0);
        count as f64 * 100.0 / self.total as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(risk_level: RiskLevel, patient_id: Option<&str>) -> PredictResponse {
        PredictResponse {
            prediction: 1,
            probability: 0.8123,
            risk_level,
            confidence: "High confidence".to_string(),
            model_version: "1.0.0".to_string(),
            patient_id: patient_id.map(str::to_string),
        }
    }

    #[test]
    fn test_render_csv() {
        let records = vec![
            BatchRecord::success(0, "ROW-0".into(), response(RiskLevel::Critical, Some("PT-1"))),
            BatchRecord::failure(1, "ROW-1".into(), "Expected 32 features, got 3"),
        ];
        let csv = render_csv(&records);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], CSV_HEADER);
        assert_eq!(lines[1], "0,PT-1,1,0.8123,Critical,High confidence,1.0.0,");
        assert_eq!(lines[2], "1,ROW-1,,,,,,\"Expected 32 features, got 3\"");
    }

    #[test]
    fn test_success_without_id_uses_fallback() {
        let record = BatchRecord::success(4, "ROW-4".into(), response(RiskLevel::Low, None));
        assert_eq!(record.patient_id, "ROW-4");
    }

    #[test]
    fn test_summary_counts() {
        let records = vec![
            BatchRecord::success(0, "a".into(), response(RiskLevel::High, None)),
            BatchRecord::success(1, "b".into(), response(RiskLevel::High, None)),
            BatchRecord::success(2, "c".into(), response(RiskLevel::Low, None)),
            BatchRecord::failure(3, "d".into(), "boom"),
        ];
        let summary = BatchSummary::from_records(&records);
        assert_eq!(summary.total, 4);
        assert_eq!(summary.succeeded, 3);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.risk_distribution[&RiskLevel::High], 2);
        assert_eq!(summary.percentage(RiskLevel::High), 50.0);
        assert_eq!(summary.percentage(RiskLevel::Critical), 0.0);
    }
}
