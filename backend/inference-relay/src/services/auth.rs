//! Authentication client for the inference platform
//!
//! Exchanges the API key, email and password for a short-lived access token.
use crate::config::Credentials;
use crate::error::{RelayError, Result};
use crate::models::AccessToken;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

#[derive(Debug, Serialize)]
struct AuthRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct AuthResponse {
    token: TokenSection,
}

#[derive(Debug, Deserialize)]
struct TokenSection {
    access_token: String,
}

pub struct AuthClient {
    client: Client,
    auth_url: String,
}

impl AuthClient {
    pub fn new(client: Client, auth_url: impl Into<String>) -> Self {
        Self {
            client,
            auth_url: auth_url.into(),
        }
    }

    /// Request an access token. Any status other than 200 is an authentication failure.
    pub async fn authenticate(&self, credentials: &Credentials) -> Result<AccessToken> {
        let response = self
            .client
            .post(&self.auth_url)
            .header("X-Api-Key", &credentials.api_key)
            .json(&AuthRequest {
                email: &credentials.email,
                password: &credentials.password,
            })
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            error!(status = status.as_u16(), "Authentication request rejected");
            return Err(RelayError::Authentication {
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await?;
        let token = parse_auth_response(&body)?;

        debug!("Access token obtained");
        Ok(token)
    }
}

/// Extract `token.access_token` from a successful auth response body
pub fn parse_auth_response(body: &[u8]) -> Result<AccessToken> {
    let parsed: AuthResponse =
        serde_json::from_slice(body).map_err(|e| RelayError::MalformedResponse {
            endpoint: "auth",
            reason: e.to_string(),
        })?;

    Ok(AccessToken::new(parsed.token.access_token))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_nested_token() {
        let token =
            parse_auth_response(br#"{"token": {"access_token": "tok123", "expires_in": 3600}}"#)
                .unwrap();
        assert_eq!(token.as_str(), "tok123");
    }

    #[test]
    fn test_parse_missing_token_is_malformed() {
        let err = parse_auth_response(br#"{"access_token": "tok123"}"#).unwrap_err();
        assert!(matches!(
            err,
            RelayError::MalformedResponse {
                endpoint: "auth",
                ..
            }
        ));
    }
}
