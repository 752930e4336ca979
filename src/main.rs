mod config;
mod elements;
mod jobs;
mod predict;

use std::process::ExitCode;
use std::time::Duration as StdDuration;

use chrono::{Duration, Utc};
use clap::{Parser, Subcommand};
use log::{error, info, warn};

use crate::config::Config;
use crate::elements::ElementsSource;
use crate::jobs::{DryRunSink, JobDescriptorBuilder, JobSink, KubernetesSink};
use crate::predict::{build_catalog, Catalog};

#[derive(Parser)]
#[command(name = "overpass")]
#[command(about = "Satellite pass prediction and recording job scheduling")]
struct Cli {
    /// Path to the YAML configuration
    #[arg(short, long, default_value = "config.yml")]
    config: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Predict passes and submit a recording job for each
    Run,
    /// Predict passes and print them as JSON, submitting nothing
    Predict,
    /// Check the configuration file
    Validate,
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = match Config::from_file(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            error!("failed to load config from {}: {}", cli.config, e);
            return ExitCode::FAILURE;
        }
    };

    match cli.command {
        Commands::Validate => validate(&config),
        Commands::Predict => predict(&config).await,
        Commands::Run => run(&config).await,
    }
}

fn validate(config: &Config) -> ExitCode {
    println!(
        "configuration is valid: {} ground stations, {} satellites, {} day horizon",
        config.ground_stations.len(),
        config.satellites.len(),
        config.prediction.prediction_days
    );
    for station in &config.ground_stations {
        println!(
            "  {}: {} tracked satellites, minimum elevation {}°",
            station.name,
            station.satellites.len(),
            station.minimum_elevation
        );
    }
    ExitCode::SUCCESS
}

async fn predict(config: &Config) -> ExitCode {
    let catalog = match predict_catalog(config).await {
        Ok(catalog) => catalog,
        Err(code) => return code,
    };

    match serde_json::to_string_pretty(&catalog.passes) {
        Ok(out) => {
            println!("{}", out);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("failed to serialize passes: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(config: &Config) -> ExitCode {
    let catalog = match predict_catalog(config).await {
        Ok(catalog) => catalog,
        Err(code) => return code,
    };

    if catalog.passes.is_empty() {
        warn!("no passes predicted this cycle");
    }

    let sink: Box<dyn JobSink> = match &config.jobs.api_url {
        Some(url) => match KubernetesSink::new(
            url.clone(),
            config.jobs.image.clone(),
            config.jobs.recordings_claim.clone(),
        ) {
            Ok(sink) => Box::new(sink),
            Err(e) => {
                error!("failed to build job sink: {}", e);
                return ExitCode::FAILURE;
            }
        },
        None => {
            info!("no jobs.api_url configured, running in dry-run mode");
            Box::new(DryRunSink)
        }
    };

    let builder = JobDescriptorBuilder::new(config.jobs.namespace.clone(), Utc::now());
    let mut submitted = 0usize;
    let mut failed = 0usize;

    for (index, window) in catalog.passes.iter().enumerate() {
        let job = builder.build(window, index + 1);
        match sink.submit(&job).await {
            Ok(()) => submitted += 1,
            Err(e) => {
                warn!("failed to submit {}: {}", job.name, e);
                failed += 1;
            }
        }
    }

    info!(
        "summary: {} passes predicted, {} jobs submitted, {} submissions failed, \
         {} pair failures, {} ground stations, {} satellites",
        catalog.passes.len(),
        submitted,
        failed,
        catalog.failures.len(),
        config.ground_stations.len(),
        config.satellites.len()
    );

    ExitCode::SUCCESS
}

async fn predict_catalog(config: &Config) -> Result<Catalog, ExitCode> {
    let source = match ElementsSource::new(
        config.elements.urls.clone(),
        StdDuration::from_secs(config.elements.timeout_seconds),
        config.elements.cache_path.clone(),
    ) {
        Ok(source) => source,
        Err(e) => {
            error!("failed to set up elements source: {}", e);
            return Err(ExitCode::FAILURE);
        }
    };

    let elements = match source.load().await {
        Ok(elements) => elements,
        Err(e) => {
            error!("no orbital elements available: {}", e);
            return Err(ExitCode::FAILURE);
        }
    };
    info!("element sets available for {} satellites", elements.len());

    let start = Utc::now();
    let end = start + Duration::days(config.prediction.prediction_days);
    info!(
        "predicting passes over the next {} days for {} ground stations",
        config.prediction.prediction_days,
        config.ground_stations.len()
    );

    let catalog = build_catalog(
        &config.ground_stations,
        &config.satellites,
        &elements,
        start,
        end,
        Duration::seconds(config.prediction.sample_step_seconds),
        Duration::seconds(config.prediction.refine_tolerance_seconds),
    )
    .await;

    info!(
        "predicted {} passes ({} pair failures)",
        catalog.passes.len(),
        catalog.failures.len()
    );

    Ok(catalog)
}
