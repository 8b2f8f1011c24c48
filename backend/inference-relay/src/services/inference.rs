//! Inference client - submits thumbnails to the prediction endpoint
//!
//! The endpoint wraps its answer twice: the HTTP body is a JSON object whose
//! `body` field is itself a JSON document encoded as a string. Decoding is
//! split into `decode_envelope` and `decode_prediction_body` so the wire
//! format can be exercised without a server.
use crate::error::{RelayError, Result};
use crate::models::{AccessToken, Prediction};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Instant;
use tracing::{debug, warn};

// ============================================
// Request types
// ============================================

#[derive(Debug, Serialize)]
pub struct PredictRequest {
    pub instances: Vec<Instance>,
}

#[derive(Debug, Serialize)]
pub struct Instance {
    pub image: ImagePayload,
}

#[derive(Debug, Serialize)]
pub struct ImagePayload {
    pub b64: String,
}

impl PredictRequest {
    /// Single-instance request carrying the base64-encoded image
    pub fn for_image(image: &[u8]) -> Self {
        Self {
            instances: vec![Instance {
                image: ImagePayload {
                    b64: STANDARD.encode(image),
                },
            }],
        }
    }
}

// ============================================
// Response types
// ============================================

/// Outer envelope: `{"body": "<json string>"}`
#[derive(Debug, Deserialize)]
pub struct PredictEnvelope {
    pub body: String,
}

/// Inner document carried in `PredictEnvelope::body`
#[derive(Debug, Deserialize)]
pub struct PredictionBody {
    #[serde(rename = "Prediction")]
    pub prediction: Value,
}

/// Stage one: HTTP body to envelope
pub fn decode_envelope(raw: &[u8]) -> Result<PredictEnvelope> {
    serde_json::from_slice(raw).map_err(|e| malformed(format!("envelope: {e}")))
}

/// Stage two: envelope's string payload to prediction
pub fn decode_prediction_body(body: &str) -> Result<Prediction> {
    let inner: PredictionBody =
        serde_json::from_str(body).map_err(|e| malformed(format!("body: {e}")))?;
    Ok(Prediction::new(inner.prediction))
}

/// Both stages in sequence
pub fn decode_prediction(raw: &[u8]) -> Result<Prediction> {
    let envelope = decode_envelope(raw)?;
    decode_prediction_body(&envelope.body)
}

fn malformed(reason: String) -> RelayError {
    RelayError::MalformedResponse {
        endpoint: "predict",
        reason,
    }
}

pub struct InferenceClient {
    client: Client,
    predict_url: String,
}

impl InferenceClient {
    pub fn new(client: Client, predict_url: impl Into<String>) -> Self {
        Self {
            client,
            predict_url: predict_url.into(),
        }
    }

    /// Submit one encoded thumbnail and return the model's prediction
    pub async fn predict(
        &self,
        thumbnail: &[u8],
        api_key: &str,
        token: &AccessToken,
    ) -> Result<Prediction> {
        let request = PredictRequest::for_image(thumbnail);
        let start = Instant::now();

        // Token goes out verbatim, without a scheme prefix
        let response = self
            .client
            .post(&self.predict_url)
            .header("X-Api-Key", api_key)
            .header("Authorization", token.as_str())
            .header(CONTENT_TYPE, "application/json")
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            warn!(status = status.as_u16(), "Prediction request rejected");
            return Err(RelayError::Inference {
                status: status.as_u16(),
            });
        }

        let raw = response.bytes().await?;
        debug!(
            elapsed_ms = start.elapsed().as_millis() as u64,
            size = raw.len(),
            "Prediction response received"
        );

        decode_prediction(&raw)
    }
}
