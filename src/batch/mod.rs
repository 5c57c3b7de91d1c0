// src/batch/mod.rs
//! Batch scoring of a patient file against a running prediction API.

pub mod client;
pub mod csv_input;
pub mod report;

use futures::stream::{self, StreamExt};
use indicatif::ProgressBar;
use log::warn;

use crate::api::responses::PredictRequest;
use client::RiskApiClient;
use csv_input::PatientRow;
use report::BatchRecord;

/// Scores every row with at most `concurrency` requests in flight. Records
/// come back in row order; rows that fail locally never reach the API.
pub async fn run_batch(
    client: &RiskApiClient,
    rows: Vec<PatientRow>,
    concurrency: usize,
    progress: Option<&ProgressBar>,
) -> Vec<BatchRecord> {
    let mut records: Vec<BatchRecord> = stream::iter(rows)
        .map(|row| async move {
            let fallback_id = row
                .patient_id
                .clone()
                .unwrap_or_else(|| format!("ROW-{}", row.row_index));
            let record = match row.features {
                Err(e) => BatchRecord::failure(row.row_index, fallback_id, e),
                Ok(features) => {
                    let request = PredictRequest {
                        features,
                        patient_id: row.patient_id,
                    };
                    match client.predict(&request).await {
                        Ok(response) => BatchRecord::success(row.row_index, fallback_id, response),
                        Err(e) => BatchRecord::failure(row.row_index, fallback_id, e.to_string()),
                    }
                }
            };
            if let Err(e) = &record.outcome {
                warn!("Row {}: {}", record.row_index, e);
            }
            if let Some(pb) = progress {
                pb.inc(1);
            }
            record
        })
        .buffer_unordered(concurrency.max(1))
        .collect()
        .await;

    records.sort_by_key(|r| r.row_index);
    records
}
