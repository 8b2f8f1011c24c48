/// Object storage configuration for S3-compatible endpoints (OBS, MinIO, AWS)
use serde::{Deserialize, Serialize};
use std::fmt;

const DEFAULT_ENDPOINT: &str = "https://obs.ru-moscow-1.hc.sbercloud.ru";
const DEFAULT_REGION: &str = "ru-moscow-1";

#[derive(Clone, Serialize, Deserialize)]
pub struct S3Config {
    /// Storage endpoint URL
    pub endpoint: String,
    /// Storage region
    pub region: String,
    /// Whether to use path-style addressing (false = virtual-hosted-style)
    pub path_style: bool,
    /// Static access key; falls back to the default credential chain when unset
    pub access_key_id: Option<String>,
    /// Static secret key paired with `access_key_id`
    pub secret_access_key: Option<String>,
}

impl fmt::Debug for S3Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("S3Config")
            .field("endpoint", &self.endpoint)
            .field("region", &self.region)
            .field("path_style", &self.path_style)
            .field("access_key_id", &self.access_key_id.as_ref().map(|_| "[REDACTED]"))
            .field(
                "secret_access_key",
                &self.secret_access_key.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

impl Default for S3Config {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            region: DEFAULT_REGION.to_string(),
            path_style: true,
            access_key_id: None,
            secret_access_key: None,
        }
    }
}

impl S3Config {
    /// Load storage configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            endpoint: std::env::var("OBS_ENDPOINT").unwrap_or_else(|_| DEFAULT_ENDPOINT.to_string()),
            region: std::env::var("OBS_REGION").unwrap_or_else(|_| DEFAULT_REGION.to_string()),
            path_style: std::env::var("OBS_PATH_STYLE")
                .unwrap_or_else(|_| "true".to_string())
                .parse()
                .unwrap_or(true),
            access_key_id: std::env::var("OBS_ACCESS_KEY_ID").ok(),
            secret_access_key: std::env::var("OBS_SECRET_ACCESS_KEY").ok(),
        }
    }

    /// Static credentials, only when both halves are present
    pub fn static_credentials(&self) -> Option<(&str, &str)> {
        match (&self.access_key_id, &self.secret_access_key) {
            (Some(ak), Some(sk)) if !ak.is_empty() && !sk.is_empty() => Some((ak, sk)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_static_credentials_require_both_keys() {
        let mut config = S3Config {
            access_key_id: Some("ak".to_string()),
            ..S3Config::default()
        };
        assert!(config.static_credentials().is_none());

        config.secret_access_key = Some("sk".to_string());
        assert_eq!(config.static_credentials(), Some(("ak", "sk")));
    }

    #[test]
    fn test_debug_redacts_keys() {
        let config = S3Config {
            access_key_id: Some("AKIDEXAMPLE".to_string()),
            secret_access_key: Some("very-secret".to_string()),
            ..S3Config::default()
        };

        let printed = format!("{:?}", config);
        assert!(!printed.contains("AKIDEXAMPLE"));
        assert!(!printed.contains("very-secret"));
        assert!(printed.contains("[REDACTED]"));
    }

    #[test]
    #[serial]
    fn test_from_env_defaults() {
        for var in [
            "OBS_ENDPOINT",
            "OBS_REGION",
            "OBS_PATH_STYLE",
            "OBS_ACCESS_KEY_ID",
            "OBS_SECRET_ACCESS_KEY",
        ] {
            std::env::remove_var(var);
        }

        let config = S3Config::from_env();
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.region, DEFAULT_REGION);
        assert!(config.path_style);
        assert!(config.static_credentials().is_none());
    }

    #[test]
    #[serial]
    fn test_from_env_overrides() {
        std::env::set_var("OBS_ENDPOINT", "http://localhost:9000");
        std::env::set_var("OBS_PATH_STYLE", "false");
        std::env::set_var("OBS_ACCESS_KEY_ID", "ak");
        std::env::set_var("OBS_SECRET_ACCESS_KEY", "sk");

        let config = S3Config::from_env();

        std::env::remove_var("OBS_ENDPOINT");
        std::env::remove_var("OBS_PATH_STYLE");
        std::env::remove_var("OBS_ACCESS_KEY_ID");
        std::env::remove_var("OBS_SECRET_ACCESS_KEY");

        assert_eq!(config.endpoint, "http://localhost:9000");
        assert!(!config.path_style);
        assert_eq!(config.static_credentials(), Some(("ak", "sk")));
    }
}
