//! watchtime CLI entry point

use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Instant;
use tokio_util::sync::CancellationToken;
use watchtime::config::cli::{Cli, ExecutionMode};
use watchtime::config::toml::load_config;
use watchtime::config::validator::{require_api_key, validate_config};
use watchtime::config::Config;
use watchtime::coordinator::Estimator;
use watchtime::fetch::youtube::YouTubeClient;
use watchtime::fetch::MetadataSource;
use watchtime::history::load_history;
use watchtime::output::{json, text};
use watchtime::util::time::format_number;

fn main() -> Result<()> {
    let cli = Cli::parse_args();
    cli.validate()?;

    init_logging(cli.debug);

    let config = load_config(&cli)?;
    validate_config(&config).context("Configuration validation failed")?;

    if !config.output.json {
        println!("watchtime v{}", env!("CARGO_PKG_VERSION"));
        println!("Watch-history watch time estimator");
        println!();
    }

    match cli.mode {
        ExecutionMode::Estimate => run_estimate(&cli, config),
        ExecutionMode::Serve => run_service(config),
    }
}

fn init_logging(debug: bool) {
    let default_level = if debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp_millis()
        .init();
}

fn build_source(config: &Config) -> Result<Arc<dyn MetadataSource>> {
    let api_key = require_api_key(&config.fetch)?;
    let client = YouTubeClient::new(&config.fetch.endpoint, api_key, config.fetch.timeout())?;
    Ok(Arc::new(client))
}

/// Estimate watch time for a single history file
fn run_estimate(cli: &Cli, config: Config) -> Result<()> {
    let path = cli
        .history
        .as_deref()
        .context("a HISTORY file is required in estimate mode")?;

    let entries = load_history(path)?;

    if cli.dry_run {
        let policy = config.sampling.policy();
        let sample_size = policy.sample_size(entries.len());
        let requests = sample_size.div_ceil(config.sampling.batch_size);

        println!("Entries:     {}", format_number(entries.len() as u64));
        println!("Sample size: {}", format_number(sample_size as u64));
        println!("Requests:    at most {}", requests);
        println!();
        println!("Dry run mode - configuration validated successfully");
        return Ok(());
    }

    let source = build_source(&config)?;

    let runtime = tokio::runtime::Runtime::new().context("Failed to create tokio runtime")?;

    let start = Instant::now();
    let report = runtime.block_on(async {
        let cancel = CancellationToken::new();
        let on_interrupt = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                log::warn!("Interrupted, cancelling outstanding requests");
                on_interrupt.cancel();
            }
        });

        let mut estimator = Estimator::from_config(&config, source, cancel);
        estimator.estimate(entries).await
    })?;
    log::debug!("Estimation took {:.3}s", start.elapsed().as_secs_f64());

    if config.output.json {
        println!("{}", json::to_json_string(&report, true)?);
    } else {
        text::print_report(&report);
    }

    if let Some(ref path) = config.output.json_output {
        json::write_json_output(path, &report, true)?;
    }

    Ok(())
}

/// Serve the upload endpoint until interrupted
fn run_service(config: Config) -> Result<()> {
    let source = build_source(&config)?;

    let runtime = tokio::runtime::Runtime::new().context("Failed to create tokio runtime")?;
    runtime.block_on(watchtime::service::serve(Arc::new(config), source))
}
