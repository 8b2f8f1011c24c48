//! Data model for one pipeline run

pub mod event;
pub mod prediction;

pub use event::TriggerEvent;
pub use prediction::{AccessToken, Prediction, PredictionResult, Thumbnail};
