//! Event pipeline orchestrator
//!
//! Runs one storage event through fetch → normalize → authenticate → predict.
//!
//! Stage policy:
//! - empty objects finish immediately without touching the network
//! - fetch, decode and authentication failures abort the run
//! - inference failures are logged and the run still completes
//!
//! The caller always gets a short completion string back; only an
//! authentication failure produces a distinct one.

use crate::config::{Config, Credentials};
use crate::error::{RelayError, Result};
use crate::models::{PredictionResult, TriggerEvent};
use crate::services::{AuthClient, ImageNormalizer, InferenceClient};
use crate::storage::{ObjectStore, StagingArea};
use bytes::Bytes;
use reqwest::Client;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;
use tracing::{debug, error, info, info_span, warn, Instrument};
use uuid::Uuid;

pub const PROCESSED_MESSAGE: &str = "File processed.";
pub const AUTH_FAILED_MESSAGE: &str = "Failed to authorize with Christofari";

/// Pipeline states, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Received,
    Validated,
    Fetched,
    Normalized,
    Authenticated,
    Predicted,
    Done,
    Aborted,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Received => "received",
            Stage::Validated => "validated",
            Stage::Fetched => "fetched",
            Stage::Normalized => "normalized",
            Stage::Authenticated => "authenticated",
            Stage::Predicted => "predicted",
            Stage::Done => "done",
            Stage::Aborted => "aborted",
        };
        f.write_str(name)
    }
}

/// How a run ended
#[derive(Debug)]
pub enum RunStatus {
    /// Zero-size object, nothing fetched
    Skipped,
    /// All stages ran; the prediction may still have failed
    Completed(PredictionResult),
    /// `stage` is the state the run could not reach
    Aborted { stage: Stage, error: RelayError },
}

/// Result of one pipeline run
#[derive(Debug)]
pub struct RunOutcome {
    pub run_id: Uuid,
    pub status: RunStatus,
}

impl RunOutcome {
    /// Terminal state of the run
    pub fn terminal_stage(&self) -> Stage {
        match self.status {
            RunStatus::Aborted { .. } => Stage::Aborted,
            _ => Stage::Done,
        }
    }

    /// String handed back to the invoking platform
    pub fn message(&self) -> &'static str {
        match self.status {
            RunStatus::Aborted {
                stage: Stage::Authenticated,
                ..
            } => AUTH_FAILED_MESSAGE,
            _ => PROCESSED_MESSAGE,
        }
    }

    pub fn prediction(&self) -> Option<&PredictionResult> {
        match &self.status {
            RunStatus::Completed(result) => Some(result),
            _ => None,
        }
    }
}

/// Orchestrates one run per trigger event.
///
/// Holds only immutable clients and configuration; share it behind an `Arc`
/// to serve concurrent invocations.
pub struct EventPipeline {
    store: Arc<dyn ObjectStore>,
    normalizer: Arc<ImageNormalizer>,
    auth: AuthClient,
    inference: InferenceClient,
    credentials: Credentials,
    staging: StagingArea,
}

impl EventPipeline {
    pub fn new(config: &Config, credentials: Credentials, store: Arc<dyn ObjectStore>) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(secs) = config.http_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http_client = builder
            .build()
            .map_err(|e| RelayError::Config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            store,
            normalizer: Arc::new(ImageNormalizer::new(config.thumbnail_width)?),
            auth: AuthClient::new(http_client.clone(), config.auth_url.clone()),
            inference: InferenceClient::new(http_client, config.predict_url.clone()),
            credentials,
            staging: StagingArea::new(config.staging_dir.clone()),
        })
    }

    /// Read an event file and run it; an unreadable file aborts only its own run
    pub async fn handle_file(&self, path: &Path) -> RunOutcome {
        match tokio::fs::read(path).await {
            Ok(payload) => self.handle_payload(&payload).await,
            Err(e) => {
                let error = RelayError::InvalidEvent(format!(
                    "failed to read event file {}: {e}",
                    path.display()
                ));
                error!(path = %path.display(), error = %error, "Discarding unreadable trigger event");
                RunOutcome {
                    run_id: Uuid::new_v4(),
                    status: RunStatus::Aborted {
                        stage: Stage::Received,
                        error,
                    },
                }
            }
        }
    }

    /// Run every event file as its own concurrent invocation.
    ///
    /// Outcomes come back in input order.
    pub async fn handle_files(self: &Arc<Self>, paths: Vec<PathBuf>) -> Vec<RunOutcome> {
        let mut tasks = JoinSet::new();
        for (index, path) in paths.iter().cloned().enumerate() {
            let pipeline = Arc::clone(self);
            tasks.spawn(async move { (index, pipeline.handle_file(&path).await) });
        }

        let mut outcomes: Vec<Option<RunOutcome>> = paths.iter().map(|_| None).collect();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, outcome)) => outcomes[index] = Some(outcome),
                Err(e) => error!(error = %e, "Invocation task failed"),
            }
        }

        outcomes
            .into_iter()
            .map(|outcome| {
                outcome.unwrap_or_else(|| RunOutcome {
                    run_id: Uuid::new_v4(),
                    status: RunStatus::Aborted {
                        stage: Stage::Done,
                        error: RelayError::Internal("invocation task failed".to_string()),
                    },
                })
            })
            .collect()
    }

    /// Parse a raw notification payload and run it
    pub async fn handle_payload(&self, payload: &[u8]) -> RunOutcome {
        match TriggerEvent::from_slice(payload) {
            Ok(event) => self.handle(&event).await,
            Err(error) => {
                error!(error = %error, "Discarding unparseable trigger event");
                RunOutcome {
                    run_id: Uuid::new_v4(),
                    status: RunStatus::Aborted {
                        stage: Stage::Validated,
                        error,
                    },
                }
            }
        }
    }

    /// Run one event through every stage
    pub async fn handle(&self, event: &TriggerEvent) -> RunOutcome {
        let run_id = Uuid::new_v4();
        let span = info_span!(
            "pipeline_run",
            run_id = %run_id,
            bucket = %event.bucket,
            key = %event.key
        );

        let status = self.run(event).instrument(span.clone()).await;

        span.in_scope(|| match &status {
            RunStatus::Skipped => debug!("Empty object skipped"),
            RunStatus::Completed(_) => info!("Run completed"),
            RunStatus::Aborted { stage, error } => {
                error!(stage = %stage, error = %error, "Run aborted")
            }
        });

        RunOutcome { run_id, status }
    }

    async fn run(&self, event: &TriggerEvent) -> RunStatus {
        info!(size = event.size, "File {} received, size is {}", event.key, event.size);

        if event.is_empty_object() {
            return RunStatus::Skipped;
        }

        let raw = match self.fetch(event).await {
            Ok(raw) => raw,
            Err(error) => return aborted(Stage::Fetched, error),
        };

        let thumbnail = match Arc::clone(&self.normalizer)
            .normalize_async(Bytes::from(raw))
            .await
        {
            Ok(thumbnail) => thumbnail,
            Err(error) => return aborted(Stage::Normalized, error),
        };

        let token = match self.auth.authenticate(&self.credentials).await {
            Ok(token) => token,
            Err(error) => return aborted(Stage::Authenticated, error),
        };

        let result = match self
            .inference
            .predict(&thumbnail.data, &self.credentials.api_key, &token)
            .await
        {
            Ok(prediction) => {
                info!(prediction = %prediction, "Christofari thinks that it's {}", prediction);
                PredictionResult::Predicted(prediction)
            }
            Err(RelayError::Inference { status }) => {
                warn!(status, "Inference returned non-success status");
                PredictionResult::Failed {
                    status: Some(status),
                    reason: format!("status {status}"),
                }
            }
            Err(error) => {
                warn!(error = %error, "Inference request failed");
                PredictionResult::Failed {
                    status: None,
                    reason: error.to_string(),
                }
            }
        };

        RunStatus::Completed(result)
    }

    /// Download into a fresh staging file; the file is gone when this returns
    async fn fetch(&self, event: &TriggerEvent) -> Result<Vec<u8>> {
        let staged = self.staging.stage()?;

        let written = self
            .store
            .download_to_path(&event.bucket, &event.key, staged.path())
            .await?;
        debug!(bytes = written, "Object staged");

        staged.read().await
    }
}

fn aborted(stage: Stage, error: RelayError) -> RunStatus {
    RunStatus::Aborted { stage, error }
}
