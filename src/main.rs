//! CLI entry point for the bin fleet insight pipeline.
//!
//! Provides subcommands for generating and persisting insights once or on an
//! interval, previewing them without persisting, inspecting the fleet
//! summary, and reading back stored records.

use anyhow::{Context, Result};
use binpulse_insights::{
    analyzers::compute_summary,
    config::{BinSourceConfig, Config, StoreConfig},
    fetch::{BasicClient, HttpClient, auth::ApiKey},
    infra::{
        bins::{HttpBinSource, JsonFileBinSource},
        openrouter::ChatCompletionsClient,
        storage::{CsvInsightStore, S3InsightStore},
    },
    insights::{FallbackSynthesizer, InsightRequester, latest, load_recent},
    output::{log_payload, print_json},
    pipeline::InsightPipeline,
    services::{BinSource, InsightStore},
};
use clap::{Parser, Subcommand};
use std::ffi::OsStr;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "binpulse_insights")]
#[command(about = "Fleet analytics and AI insights for smart waste bins", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate insights once and append them to the insight store
    Run,
    /// Generate and store insights repeatedly
    Watch {
        /// Seconds between runs
        #[arg(short, long, default_value_t = 3600)]
        interval: u64,

        /// Number of runs (0 = infinite)
        #[arg(short = 'n', long, default_value_t = 0)]
        runs: usize,
    },
    /// Generate insights and print them without storing
    Preview,
    /// Print the current fleet summary
    Summary,
    /// Print the most recent stored insight records as-is
    Latest {
        /// Number of records
        #[arg(short = 'n', long, default_value_t = 1)]
        count: usize,
    },
    /// Print the decoded insight history used as prompt context
    History {
        /// Number of records (defaults to INSIGHT_HISTORY_DEPTH)
        #[arg(short = 'n', long)]
        count: Option<usize>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path = std::env::var("LOG_FILE_PATH")
        .unwrap_or_else(|_| "logs/binpulse_insights.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("binpulse_insights.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();
    let config = Config::from_env()?;

    match cli.command {
        Commands::Run => {
            let pipeline = build_pipeline(&config).await?;
            let record = pipeline.run_and_persist().await?;
            print_json(&record)?;
        }
        Commands::Watch { interval, runs } => {
            let pipeline = build_pipeline(&config).await?;
            watch(&pipeline, interval, runs).await;
        }
        Commands::Preview => {
            let pipeline = build_pipeline(&config).await?;
            let payload = pipeline.generate().await;
            log_payload(&payload);
            print_json(&payload)?;
        }
        Commands::Summary => {
            let bins = build_bin_source(&config)?;
            let summary = compute_summary(bins.as_ref()).await?;
            print_json(&summary)?;
        }
        Commands::Latest { count } => {
            let store = build_store(&config).await;
            let records = latest(store.as_ref(), count).await?;
            info!(records = records.len(), "Latest insight records fetched");
            print_json(&records)?;
        }
        Commands::History { count } => {
            let store = build_store(&config).await;
            let history = load_recent(store.as_ref(), count.unwrap_or(config.history_depth)).await;
            print_json(&history)?;
        }
    }

    Ok(())
}

/// Runs the pipeline every `interval` seconds. A failed run is logged and the
/// loop carries on.
#[tracing::instrument(skip(pipeline))]
async fn watch(pipeline: &InsightPipeline, interval: u64, runs: usize) {
    if runs == 0 {
        info!(interval, "Running indefinitely. Press Ctrl+C to stop.");
    } else {
        info!(runs, interval, "Starting scheduled runs");
    }

    let mut run_count = 0;
    loop {
        if runs > 0 && run_count >= runs {
            break;
        }
        run_count += 1;

        info!(run = run_count, "Starting insight run");
        match pipeline.run_and_persist().await {
            Ok(record) => info!(id = %record.id, zone = %record.related_zone, "Insight run stored"),
            Err(e) => error!(error = %e, "Insight run could not be stored"),
        }

        if runs == 0 || run_count < runs {
            info!(interval, "Waiting before next run");
            tokio::time::sleep(Duration::from_secs(interval)).await;
        }
    }

    info!(run_count, "Finished scheduled runs");
}

fn build_bin_source(config: &Config) -> Result<Arc<dyn BinSource>> {
    let source: Arc<dyn BinSource> = match &config.bins {
        BinSourceConfig::File(path) => Arc::new(JsonFileBinSource::new(path)),
        BinSourceConfig::Http { url, token } => {
            let client: Box<dyn HttpClient> = match token {
                Some(token) => Box::new(
                    ApiKey::bearer(BasicClient::new(), token)
                        .context("BINS_API_TOKEN is not a valid header value")?,
                ),
                None => Box::new(BasicClient::new()),
            };
            Arc::new(HttpBinSource::new(client, url.clone()))
        }
    };
    Ok(source)
}

async fn build_store(config: &Config) -> Arc<dyn InsightStore> {
    let store: Arc<dyn InsightStore> = match &config.store {
        StoreConfig::Csv(path) => Arc::new(CsvInsightStore::new(path)),
        StoreConfig::S3 { bucket, prefix } => {
            let sdk_config = aws_config::load_from_env().await;
            info!(bucket = %bucket, prefix = %prefix, "Using S3 insight store");
            Arc::new(S3InsightStore::new(
                aws_sdk_s3::Client::new(&sdk_config),
                bucket.clone(),
                prefix,
            ))
        }
    };
    store
}

async fn build_pipeline(config: &Config) -> Result<InsightPipeline> {
    let service = ChatCompletionsClient::new(
        &config.ai_base_url,
        config.require_api_key()?,
        config.request.timeout,
    )?;
    let requester = InsightRequester::new(Arc::new(service), config.request.clone());

    Ok(InsightPipeline::new(build_bin_source(config)?, build_store(config).await, requester)
        .with_fallback(FallbackSynthesizer::new(config.region.clone()))
        .with_history_depth(config.history_depth)
        .with_store_timeout(config.store_timeout))
}
