//! Configuration for the inference relay
use serde::Deserialize;
use std::fmt;
use std::path::PathBuf;

pub const DEFAULT_AUTH_URL: &str = "https://api.aicloud.sbercloud.ru/public/v1/auth";
pub const DEFAULT_PREDICT_URL: &str = "https://api.aicloud.sbercloud.ru/public/v1/inference/v1/predict/kfserving-1599815581/kfserving-1599815581/";
pub const DEFAULT_THUMBNAIL_WIDTH: u32 = 28;

/// Secrets for the remote inference platform.
///
/// Loaded once at startup and injected into the pipeline; nothing downstream
/// reads them from the environment.
#[derive(Clone, Deserialize)]
pub struct Credentials {
    /// Platform API key, sent as `X-Api-Key`
    #[serde(rename = "x_api_key")]
    pub api_key: String,
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(
        api_key: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            email: email.into(),
            password: password.into(),
        }
    }

    /// Load from `X_API_KEY`, `EMAIL` and `PASSWORD`
    pub fn from_env() -> Result<Self, envy::Error> {
        envy::from_env()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"[REDACTED]")
            .field("email", &"[REDACTED]")
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Relay settings, loaded from environment variables
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Authentication endpoint
    #[serde(default = "default_auth_url")]
    pub auth_url: String,

    /// Prediction endpoint
    #[serde(default = "default_predict_url")]
    pub predict_url: String,

    /// Thumbnail width in pixels
    #[serde(default = "default_thumbnail_width")]
    pub thumbnail_width: u32,

    /// Directory for per-invocation staging files
    #[serde(default = "default_staging_dir")]
    pub staging_dir: PathBuf,

    /// Per-request timeout; unset leaves the HTTP client's defaults in place
    #[serde(default)]
    pub http_timeout_secs: Option<u64>,
}

fn default_auth_url() -> String {
    DEFAULT_AUTH_URL.to_string()
}

fn default_predict_url() -> String {
    DEFAULT_PREDICT_URL.to_string()
}

fn default_thumbnail_width() -> u32 {
    DEFAULT_THUMBNAIL_WIDTH
}

fn default_staging_dir() -> PathBuf {
    std::env::temp_dir()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            auth_url: default_auth_url(),
            predict_url: default_predict_url(),
            thumbnail_width: default_thumbnail_width(),
            staging_dir: default_staging_dir(),
            http_timeout_secs: None,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, envy::Error> {
        envy::from_env()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_credentials_debug_is_redacted() {
        let creds = Credentials::new("key-123", "user@example.com", "hunter2");
        let printed = format!("{:?}", creds);

        assert!(!printed.contains("key-123"));
        assert!(!printed.contains("user@example.com"));
        assert!(!printed.contains("hunter2"));
    }

    #[test]
    #[serial]
    fn test_credentials_from_env() {
        std::env::set_var("X_API_KEY", "key-123");
        std::env::set_var("EMAIL", "user@example.com");
        std::env::set_var("PASSWORD", "hunter2");

        let creds = Credentials::from_env();

        std::env::remove_var("X_API_KEY");
        std::env::remove_var("EMAIL");
        std::env::remove_var("PASSWORD");

        let creds = creds.expect("credentials should load");
        assert_eq!(creds.api_key, "key-123");
        assert_eq!(creds.email, "user@example.com");
        assert_eq!(creds.password, "hunter2");
    }

    #[test]
    #[serial]
    fn test_credentials_missing_password() {
        std::env::set_var("X_API_KEY", "key-123");
        std::env::set_var("EMAIL", "user@example.com");
        std::env::remove_var("PASSWORD");

        let result = Credentials::from_env();

        std::env::remove_var("X_API_KEY");
        std::env::remove_var("EMAIL");

        assert!(result.is_err());
    }

    #[test]
    #[serial]
    fn test_config_defaults() {
        for var in [
            "AUTH_URL",
            "PREDICT_URL",
            "THUMBNAIL_WIDTH",
            "STAGING_DIR",
            "HTTP_TIMEOUT_SECS",
        ] {
            std::env::remove_var(var);
        }

        let config = Config::from_env().expect("defaults should apply");
        assert_eq!(config.auth_url, DEFAULT_AUTH_URL);
        assert_eq!(config.predict_url, DEFAULT_PREDICT_URL);
        assert_eq!(config.thumbnail_width, 28);
        assert_eq!(config.http_timeout_secs, None);
    }

    #[test]
    #[serial]
    fn test_config_overrides() {
        std::env::set_var("THUMBNAIL_WIDTH", "64");
        std::env::set_var("AUTH_URL", "http://localhost:8080/auth");
        std::env::set_var("HTTP_TIMEOUT_SECS", "12");

        let config = Config::from_env();

        std::env::remove_var("THUMBNAIL_WIDTH");
        std::env::remove_var("AUTH_URL");
        std::env::remove_var("HTTP_TIMEOUT_SECS");

        let config = config.expect("config should load");
        assert_eq!(config.thumbnail_width, 64);
        assert_eq!(config.http_timeout_secs, Some(12));
        assert_eq!(config.auth_url, "http://localhost:8080/auth");
    }
}
