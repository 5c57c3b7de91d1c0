// src/bin/batch_predict.rs
use anyhow::{bail, Context, Result};
use chrono::Local;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info, warn};
use std::path::PathBuf;
use std::time::Instant;

use risk_lib::batch::client::RiskApiClient;
use risk_lib::batch::csv_input::read_patient_file;
use risk_lib::batch::report::{write_csv, BatchSummary};
use risk_lib::batch::run_batch;
use risk_lib::prediction::RiskLevel;
use risk_lib::utils::env::load_env;
use risk_lib::utils::logging::{init_logging, log_banner};

#[derive(Parser)]
#[command(author, version, about = "Batch prediction for Alzheimer's risk using the API", long_about = None)]
struct BatchArgs {
    /// Input CSV file with patient data
    #[arg(short, long)]
    input: PathBuf,

    /// Output CSV file for predictions
    #[arg(short, long)]
    output: PathBuf,

    /// Column name for patient IDs
    #[arg(short, long)]
    patient_id_col: Option<String>,

    /// API base URL
    #[arg(long, default_value = "http://localhost:8000")]
    api_url: String,

    /// Maximum concurrent prediction requests
    #[arg(long, default_value_t = 4)]
    concurrency: usize,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging("info");
    load_env();
    let args = BatchArgs::parse();

    log_banner("ALZHEIMER'S RISK PREDICTION - BATCH PROCESSOR");
    info!("API: {}", args.api_url);
    info!("Input: {}", args.input.display());
    info!("Output: {}", args.output.display());
    if let Some(col) = &args.patient_id_col {
        info!("Patient ID column: {}", col);
    }

    if !args.input.exists() {
        bail!("Input file not found: {}", args.input.display());
    }

    let client = RiskApiClient::new(&args.api_url)?;
    let health = client.health().await.context(
        "API health check failed. Make sure the API is running: cargo run --bin risk_api",
    )?;
    if !health.model_loaded {
        bail!("API at {} is up but its model is not loaded", client.base_url());
    }
    info!("API is healthy (model: {})", health.model_version);

    let table = read_patient_file(&args.input, args.patient_id_col.as_deref())?;
    info!("Loaded {} patients from {}", table.rows.len(), args.input.display());

    match client.features().await {
        Ok(features) if features.features != table.feature_columns => warn!(
            "Input columns differ from the model's feature names; values are sent by position"
        ),
        Ok(_) => {}
        Err(e) => warn!("Could not fetch feature names, using column order: {}", e),
    }
    info!(
        "Using columns: {}... ({} features)",
        table.feature_columns[..3].join(", "),
        table.feature_columns.len()
    );

    let pb = ProgressBar::new(table.rows.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} ({per_sec}) {msg}")
            .context("Invalid progress bar template")?
            .progress_chars("█▉▊▋▌▍▎▏  "),
    );

    let started = Instant::now();
    let records = run_batch(&client, table.rows, args.concurrency, Some(&pb)).await;
    pb.finish_with_message("done");
    let elapsed = started.elapsed();

    write_csv(&args.output, &records)?;
    info!("Results saved to {}", args.output.display());

    let summary = BatchSummary::from_records(&records);
    info!("=== Batch Summary ({}) ===", Local::now().format("%Y-%m-%d %H:%M:%S"));
    info!("Total time: {:.2?}", elapsed);
    info!("Success: {}/{}", summary.succeeded, summary.total);
    info!("Errors: {}/{}", summary.failed, summary.total);
    if elapsed.as_secs_f64() > 0.0 {
        info!(
            "Average: {:.1} predictions/sec",
            summary.total as f64 / elapsed.as_secs_f64()
        );
    }

    info!("=== Risk Level Distribution ===");
    for level in RiskLevel::all() {
        if let Some(count) = summary.risk_distribution.get(&level) {
            info!("{}: {} ({:.1}%)", level, count, summary.percentage(level));
        }
    }
    if summary.failed > 0 {
        error!(
            "{} predictions had errors (see 'error' column)",
            summary.failed
        );
    }

    Ok(())
}
