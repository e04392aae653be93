//! Login-with-Amazon token client.
//!
//! Exchanges the long-lived refresh token for short-lived SP-API access
//! tokens and caches the result for the token's lifetime. The cache lock is
//! held across the refresh so concurrent callers wait for one exchange
//! instead of each issuing their own (single-flight refresh).

use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use badgewatch_core::LwaCredentials;

use crate::error::SpapiError;
use crate::types::TokenResponse;

const DEFAULT_TOKEN_URL: &str = "https://api.amazon.com/auth/o2/token";

/// Refresh the cached token when less than this much life remains, so a
/// token never expires between being handed out and being used.
const EXPIRY_MARGIN_SECS: i64 = 60;

#[derive(Debug, Clone)]
struct CachedToken {
    token: String,
    expires_at: DateTime<Utc>,
}

impl CachedToken {
    fn is_fresh(&self) -> bool {
        Utc::now() + chrono::Duration::seconds(EXPIRY_MARGIN_SECS) < self.expires_at
    }
}

/// Client for the LWA `refresh_token` grant.
///
/// Use [`LwaClient::new`] for production or [`LwaClient::with_token_url`] to
/// point at a mock server in tests.
pub struct LwaClient {
    client: reqwest::Client,
    credentials: LwaCredentials,
    token_url: String,
    cache: Mutex<Option<CachedToken>>,
}

impl LwaClient {
    /// Creates a client pointed at the production LWA token endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`SpapiError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(credentials: LwaCredentials, timeout_secs: u64) -> Result<Self, SpapiError> {
        Self::with_token_url(credentials, timeout_secs, DEFAULT_TOKEN_URL)
    }

    /// Creates a client with a custom token endpoint (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`SpapiError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn with_token_url(
        credentials: LwaCredentials,
        timeout_secs: u64,
        token_url: &str,
    ) -> Result<Self, SpapiError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("badgewatch/0.1 (badge-monitoring)")
            .build()?;

        Ok(Self {
            client,
            credentials,
            token_url: token_url.to_owned(),
            cache: Mutex::new(None),
        })
    }

    /// Returns a valid access token, exchanging the refresh token if the
    /// cached one is missing or close to expiry.
    ///
    /// The cache lock is held for the duration of a refresh, so at most one
    /// exchange is in flight at a time; waiting callers observe the fresh
    /// token without issuing their own request.
    ///
    /// # Errors
    ///
    /// - [`SpapiError::TokenRejected`] if the endpoint returns non-2xx.
    /// - [`SpapiError::Http`] on network failure.
    /// - [`SpapiError::Deserialize`] if the response is not a token document.
    pub async fn access_token(&self) -> Result<String, SpapiError> {
        let mut cache = self.cache.lock().await;
        if let Some(cached) = cache.as_ref() {
            if cached.is_fresh() {
                return Ok(cached.token.clone());
            }
        }

        let refreshed = self.exchange_refresh_token().await?;
        let token = refreshed.token.clone();
        *cache = Some(refreshed);
        Ok(token)
    }

    async fn exchange_refresh_token(&self) -> Result<CachedToken, SpapiError> {
        tracing::debug!("exchanging LWA refresh token for access token");

        let params = [
            ("grant_type", "refresh_token"),
            ("refresh_token", self.credentials.refresh_token.as_str()),
            ("client_id", self.credentials.client_id.as_str()),
            ("client_secret", self.credentials.client_secret.as_str()),
        ];

        let response = self
            .client
            .post(&self.token_url)
            .form(&params)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(SpapiError::TokenRejected {
                status: status.as_u16(),
                body: crate::catalog::summarize_body(&body),
            });
        }

        let parsed: TokenResponse =
            serde_json::from_str(&body).map_err(|e| SpapiError::Deserialize {
                context: "LWA token response".to_string(),
                source: e,
            })?;

        Ok(CachedToken {
            token: parsed.access_token,
            expires_at: Utc::now() + chrono::Duration::seconds(parsed.expires_in),
        })
    }
}
