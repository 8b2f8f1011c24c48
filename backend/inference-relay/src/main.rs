//! Inference Relay - Main entry point
//!
//! Reads storage trigger events (one per file argument, or a single event on
//! stdin), runs each through the pipeline as an independent invocation, and
//! prints one completion line per event on stdout. Logs go to stderr.
//!
//! Environment variables:
//! - X_API_KEY, EMAIL, PASSWORD: inference platform credentials (required)
//! - AUTH_URL / PREDICT_URL: endpoint overrides
//! - THUMBNAIL_WIDTH: thumbnail width in pixels (default: 28)
//! - STAGING_DIR: directory for staging fetched objects (default: system temp dir)
//! - HTTP_TIMEOUT_SECS: per-request timeout (default: none)
//! - OBS_ENDPOINT, OBS_REGION, OBS_PATH_STYLE: object storage endpoint
//! - OBS_ACCESS_KEY_ID, OBS_SECRET_ACCESS_KEY: storage credentials
//! - LOG_FORMAT: `json` for JSON log lines

use anyhow::{Context, Result};
use inference_relay::{Config, Credentials, EventPipeline, ObjectStore, RunOutcome};
use s3_utils::{S3Client, S3Config};
use std::env;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::AsyncReadExt;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Where trigger payloads come from
#[derive(Debug)]
enum EventSource {
    Stdin,
    Files(Vec<PathBuf>),
}

impl EventSource {
    fn from_args() -> Self {
        let files: Vec<PathBuf> = env::args_os().skip(1).map(PathBuf::from).collect();
        if files.is_empty() {
            EventSource::Stdin
        } else {
            EventSource::Files(files)
        }
    }

    async fn run(self, pipeline: Arc<EventPipeline>) -> Result<Vec<RunOutcome>> {
        match self {
            EventSource::Stdin => {
                let mut buf = Vec::new();
                tokio::io::stdin()
                    .read_to_end(&mut buf)
                    .await
                    .context("Failed to read event from stdin")?;
                Ok(vec![pipeline.handle_payload(&buf).await])
            }
            EventSource::Files(paths) => Ok(pipeline.handle_files(paths).await),
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "inference_relay=info,s3_utils=info,warn".into());
    let json = env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry.with(fmt::layer().with_writer(std::io::stderr)).init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    info!("Starting Inference Relay");

    let config = Config::from_env().context("Failed to load relay configuration")?;
    let credentials =
        Credentials::from_env().context("X_API_KEY, EMAIL and PASSWORD must be set")?;
    let storage_config = S3Config::from_env();

    info!(
        thumbnail_width = config.thumbnail_width,
        staging_dir = %config.staging_dir.display(),
        "Configuration loaded"
    );

    let s3 = S3Client::with_config(storage_config).await;
    info!(
        storage_endpoint = %s3.config().endpoint,
        path_style = s3.config().path_style,
        "Object storage ready"
    );
    let store: Arc<dyn ObjectStore> = Arc::new(s3.operations());
    let pipeline = Arc::new(
        EventPipeline::new(&config, credentials, store).context("Failed to build pipeline")?,
    );

    let outcomes = EventSource::from_args().run(pipeline).await?;
    for outcome in outcomes {
        println!("{}", outcome.message());
    }

    Ok(())
}
