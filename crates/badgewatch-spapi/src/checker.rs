//! SP-API-backed implementation of the [`StatusCheck`] seam.

use async_trait::async_trait;

use badgewatch_core::{StatusCheck, StatusSignal};

use crate::auth::LwaClient;
use crate::catalog::CatalogClient;

/// Combines the LWA token client and the catalog client into one checker.
///
/// The access token is resolved per call through the shared single-flight
/// cache, so all concurrent checks within a run reuse one token and an
/// expiry mid-run triggers exactly one refresh. A refresh failure mid-run
/// degrades to an `Error` signal for the affected identifier only; run-level
/// auth failure is caught by the coordinator's up-front token prefetch.
pub struct SpApiChecker {
    auth: LwaClient,
    catalog: CatalogClient,
    marketplace_id: String,
}

impl SpApiChecker {
    #[must_use]
    pub fn new(auth: LwaClient, catalog: CatalogClient, marketplace_id: String) -> Self {
        Self {
            auth,
            catalog,
            marketplace_id,
        }
    }

    /// Exchanges the refresh token eagerly, surfacing run-level auth failure
    /// before any catalog call is made.
    ///
    /// # Errors
    ///
    /// Propagates [`crate::SpapiError`] from the token exchange.
    pub async fn prefetch_token(&self) -> Result<(), crate::SpapiError> {
        self.auth.access_token().await.map(|_| ())
    }
}

#[async_trait]
impl StatusCheck for SpApiChecker {
    async fn prepare(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.prefetch_token().await?;
        Ok(())
    }

    async fn check(&self, asin: &str) -> StatusSignal {
        let token = match self.auth.access_token().await {
            Ok(token) => token,
            Err(e) => {
                tracing::warn!(asin = %asin, error = %e, "token refresh failed mid-run");
                return StatusSignal::Error(format!("token refresh failed: {e}"));
            }
        };

        self.catalog
            .check_item(asin, &token, &self.marketplace_id)
            .await
    }
}
