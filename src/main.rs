use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use std::path::PathBuf;

use risk_lib::api::server::{check_artifacts, run};
use risk_lib::utils::api_config::ApiConfig;
use risk_lib::utils::env::load_env;
use risk_lib::utils::logging::{init_logging, log_banner};

#[derive(Parser)]
#[command(author, version, about = "Alzheimer's disease risk prediction API", long_about = None)]
struct ServerArgs {
    /// Interface to bind (overrides HOST)
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on (overrides PORT)
    #[arg(short, long)]
    port: Option<u16>,

    /// Directory holding classifier.json, scaler.json and feature_names.json
    #[arg(long)]
    model_dir: Option<PathBuf>,

    /// Load and verify the model artifacts, then exit
    #[arg(long)]
    check: bool,
}

fn main() -> Result<()> {
    let args = ServerArgs::parse();

    // Initialize logging and environment
    init_logging(&std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()));
    load_env();

    let mut config = ApiConfig::from_env();
    if let Some(host) = args.host {
        config.host = host;
    }
    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(dir) = args.model_dir {
        config = config.with_model_dir(dir);
    }

    log_banner("ALZHEIMER'S RISK PREDICTION API");
    config.log_config();

    if args.check {
        let artifacts = check_artifacts(&config).context("Model artifact check failed")?;
        info!(
            "All model files present and valid ({} classifier, {} features, sha256 {})",
            artifacts.classifier.name(),
            artifacts.feature_names.len(),
            artifacts.fingerprint
        );
        return Ok(());
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(config.worker_threads)
        .enable_all()
        .build()
        .context("Failed to build tokio runtime")?;

    runtime.block_on(run(config))
}
