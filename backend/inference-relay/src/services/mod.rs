//! Pipeline stage implementations
//!
//! - Image normalizer for model-ready thumbnails
//! - Auth client for the platform access token
//! - Inference client for the prediction endpoint

pub mod auth;
pub mod inference;
pub mod normalizer;

pub use auth::AuthClient;
pub use inference::{decode_prediction, InferenceClient, PredictRequest};
pub use normalizer::ImageNormalizer;
