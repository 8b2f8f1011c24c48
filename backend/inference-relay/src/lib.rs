//! Inference Relay - storage-triggered image inference
//!
//! This service provides:
//! - Trigger event parsing for object storage notifications
//! - Grayscale thumbnail normalization
//! - Access token exchange and prediction requests against the inference platform
//! - A per-event pipeline that ties the stages together

pub mod config;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod storage;

pub use config::{Config, Credentials};
pub use error::{RelayError, Result};
pub use models::{AccessToken, Prediction, PredictionResult, Thumbnail, TriggerEvent};
pub use pipeline::{
    EventPipeline, RunOutcome, RunStatus, Stage, AUTH_FAILED_MESSAGE, PROCESSED_MESSAGE,
};
pub use services::{AuthClient, ImageNormalizer, InferenceClient};
pub use storage::{ObjectStore, StagedObject, StagingArea};
