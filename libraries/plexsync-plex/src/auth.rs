//! plex.tv account sign-in.

use crate::error::{PlexClientError, Result};
use crate::types::{PlexUser, SignInResponse, PRODUCT_NAME};
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::{debug, info, warn};

/// plex.tv API base URL
pub const PLEX_TV_URL: &str = "https://plex.tv";

/// Exchanges plex.tv credentials for an `X-Plex-Token`.
#[derive(Debug, Clone)]
pub struct PlexAuthClient {
    http: Client,
    base_url: String,
    client_identifier: String,
}

impl PlexAuthClient {
    /// Client against plex.tv.
    pub fn new(client_identifier: impl Into<String>) -> Result<Self> {
        Self::with_base_url(PLEX_TV_URL, client_identifier)
    }

    /// Client against another account server.
    pub fn with_base_url(base_url: &str, client_identifier: impl Into<String>) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(format!("{}/{}", PRODUCT_NAME, env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            client_identifier: client_identifier.into(),
        })
    }

    /// Sign in with username and password.
    ///
    /// Returns the account with its token on success.
    pub async fn sign_in(&self, username: &str, password: &str) -> Result<PlexUser> {
        let url = format!("{}/users/sign_in.json", self.base_url);
        debug!(url = %url, username = %username, "Signing in to plex.tv");

        let response = self
            .http
            .post(&url)
            .basic_auth(username, Some(password))
            .header("X-Plex-Client-Identifier", &self.client_identifier)
            .header("X-Plex-Product", PRODUCT_NAME)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() {
                    PlexClientError::ServerUnreachable(e.to_string())
                } else {
                    PlexClientError::Request(e)
                }
            })?;

        let status = response.status();

        if status.is_success() {
            let sign_in: SignInResponse = response.json().await.map_err(|e| {
                PlexClientError::ParseError(format!("Failed to parse sign-in response: {e}"))
            })?;

            info!(username = ?sign_in.user.username, "Signed in to plex.tv");
            Ok(sign_in.user)
        } else if status == StatusCode::UNAUTHORIZED {
            let error_text = response.text().await.unwrap_or_default();
            warn!(status = %status, error = %error_text, "Sign-in failed: invalid credentials");
            Err(PlexClientError::AuthFailed(
                "Invalid username or password".to_string(),
            ))
        } else {
            let error_text = response.text().await.unwrap_or_default();
            Err(PlexClientError::ServerError {
                status: status.as_u16(),
                message: error_text,
            })
        }
    }
}
