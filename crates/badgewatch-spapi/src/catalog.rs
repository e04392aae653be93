//! HTTP client for the SP-API catalog items endpoint.
//!
//! One lookup per ASIN. Failure is a value at this boundary: every non-2xx
//! response and every transport error is folded into
//! [`StatusSignal::Error`] so a single bad identifier can never abort a
//! batch (the run-level contract lives in the scheduler).

use std::time::Duration;

use badgewatch_core::StatusSignal;

use crate::badges::{classify, BadgeRule, DEFAULT_BADGE_RULES};
use crate::error::SpapiError;

const DEFAULT_API_HOST: &str = "https://sellingpartnerapi-na.amazon.com";

/// Cap on how much of an upstream error body is kept in an error reason.
const BODY_SUMMARY_MAX: usize = 200;

/// Client for catalog item lookups.
///
/// Use [`CatalogClient::new`] for production or
/// [`CatalogClient::with_base_url`] to point at a mock server in tests.
pub struct CatalogClient {
    client: reqwest::Client,
    base_url: String,
    rules: &'static [BadgeRule],
}

impl CatalogClient {
    /// Creates a client pointed at the production SP-API host.
    ///
    /// # Errors
    ///
    /// Returns [`SpapiError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(timeout_secs: u64) -> Result<Self, SpapiError> {
        Self::with_base_url(timeout_secs, DEFAULT_API_HOST)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`SpapiError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn with_base_url(timeout_secs: u64, base_url: &str) -> Result<Self, SpapiError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("badgewatch/0.1 (badge-monitoring)")
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_owned(),
            rules: DEFAULT_BADGE_RULES,
        })
    }

    /// Replaces the default badge rule table.
    #[must_use]
    pub fn with_rules(mut self, rules: &'static [BadgeRule]) -> Self {
        self.rules = rules;
        self
    }

    /// Looks up one catalog item and classifies the outcome.
    ///
    /// Returns `BadgeAdded` for the first matching badge rule, `NoChange`
    /// for a clean payload, and `Error` for any non-2xx response, transport
    /// failure, or unparseable body. The per-call timeout configured on the
    /// client bounds how long a stuck call can hold up its batch slot.
    pub async fn check_item(
        &self,
        asin: &str,
        access_token: &str,
        marketplace_id: &str,
    ) -> StatusSignal {
        let url = format!(
            "{}/catalog/v0/items/{asin}?marketplaceIds={marketplace_id}",
            self.base_url
        );

        let response = match self
            .client
            .get(&url)
            .header("x-amz-access-token", access_token)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                let reason = transport_reason(&e);
                tracing::warn!(asin = %asin, error = %e, "catalog lookup transport failure");
                return StatusSignal::Error(reason);
            }
        };

        let status = response.status();
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!(asin = %asin, error = %e, "catalog response body unreadable");
                return StatusSignal::Error(transport_reason(&e));
            }
        };

        if !status.is_success() {
            tracing::warn!(asin = %asin, status = status.as_u16(), "catalog lookup rejected");
            return StatusSignal::Error(format!(
                "HTTP {}: {}",
                status.as_u16(),
                summarize_body(&body)
            ));
        }

        let payload: serde_json::Value = match serde_json::from_str(&body) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::warn!(asin = %asin, error = %e, "catalog response is not JSON");
                return StatusSignal::Error(format!("unparseable response body: {e}"));
            }
        };

        match classify(self.rules, &payload) {
            Some(kind) => StatusSignal::BadgeAdded(kind),
            None => StatusSignal::NoChange,
        }
    }
}

fn transport_reason(e: &reqwest::Error) -> String {
    if e.is_timeout() {
        "request timed out".to_string()
    } else if e.is_connect() {
        format!("connection failed: {e}")
    } else {
        format!("transport error: {e}")
    }
}

/// Trims and truncates an upstream body for inclusion in an error reason.
pub(crate) fn summarize_body(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.len() <= BODY_SUMMARY_MAX {
        trimmed.to_string()
    } else {
        let mut cut = BODY_SUMMARY_MAX;
        while !trimmed.is_char_boundary(cut) {
            cut -= 1;
        }
        format!("{}…", &trimmed[..cut])
    }
}
