use clap::Parser;
use review_digest::{PipelineConfig, ReviewDigest};
use std::process::ExitCode;

mod args;
use args::Args;

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging
    env_logger::init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => match PipelineConfig::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                ::log::error!("Failed to load config {}: {}", path.display(), e);
                return ExitCode::FAILURE;
            }
        },
        None => PipelineConfig::default(),
    };

    let mut digest = ReviewDigest::new(&args.product).with_config(config.apply_env());
    if let Some(max_results) = args.max_results {
        digest = digest.with_max_results(max_results);
    }
    if let Some(webdriver_url) = args.webdriver_url {
        digest = digest.with_webdriver_url(webdriver_url);
    }
    if let Some(model_url) = args.model_url {
        digest = digest.with_model_url(model_url);
    }

    ::log::info!("Starting review digest for: {}", args.product);
    ::log::info!(
        "Using WebDriver at {} and model server at {}",
        digest.config().fetch.webdriver_url,
        digest.config().analysis.model.server_url
    );

    let start_time = std::time::Instant::now();
    let report = match digest.run().await {
        Ok(report) => report,
        Err(e) => {
            ::log::error!("Review digest failed: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if args.json {
        match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                ::log::error!("Failed to serialize report: {}", e);
                return ExitCode::FAILURE;
            }
        }
    } else {
        println!("{}", report);
    }

    ::log::info!(
        "Analyzed {} sources in {:.2} seconds",
        report.records.len(),
        start_time.elapsed().as_secs_f64()
    );
    ExitCode::SUCCESS
}
