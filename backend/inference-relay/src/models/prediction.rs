//! Values passed between pipeline stages

use bytes::Bytes;
use serde_json::Value;
use std::fmt;

/// Normalized grayscale thumbnail, PNG-encoded
#[derive(Debug, Clone)]
pub struct Thumbnail {
    pub data: Bytes,
    pub width: u32,
    pub height: u32,
}

/// Short-lived access token for the inference endpoint.
///
/// Scoped to a single run; never cached or logged.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken([REDACTED])")
    }
}

/// Model output for one image
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction(Value);

impl Prediction {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn value(&self) -> &Value {
        &self.0
    }

    /// The label as plain text when the model returned a string
    pub fn label(&self) -> Option<&str> {
        self.0.as_str()
    }
}

impl fmt::Display for Prediction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Value::String(s) => f.write_str(s),
            other => write!(f, "{}", other),
        }
    }
}

/// Outcome of the inference stage
#[derive(Debug, Clone, PartialEq)]
pub enum PredictionResult {
    Predicted(Prediction),
    /// Inference did not yield a prediction; `status` is set when the endpoint answered
    Failed { status: Option<u16>, reason: String },
}

impl PredictionResult {
    pub fn prediction(&self) -> Option<&Prediction> {
        match self {
            PredictionResult::Predicted(p) => Some(p),
            PredictionResult::Failed { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_string_prediction_displays_unquoted() {
        let p = Prediction::new(json!("cat"));
        assert_eq!(p.to_string(), "cat");
        assert_eq!(p.label(), Some("cat"));
    }

    #[test]
    fn test_numeric_prediction_displays_as_json() {
        let p = Prediction::new(json!(7));
        assert_eq!(p.to_string(), "7");
        assert_eq!(p.label(), None);
    }

    #[test]
    fn test_access_token_debug_is_redacted() {
        let token = AccessToken::new("tok123");
        assert!(!format!("{:?}", token).contains("tok123"));
        assert_eq!(token.as_str(), "tok123");
    }
}
