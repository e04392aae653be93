use async_trait::async_trait;

use crate::report::StatusSignal;

/// Seam between the batch scheduler and the upstream catalog API.
///
/// `check` must be infallible at the call boundary: any upstream or
/// transport problem is reported as [`StatusSignal::Error`], never as a
/// panic or a propagated error. Tests substitute scripted implementations.
#[async_trait]
pub trait StatusCheck: Send + Sync {
    /// Run-level preparation, called once before any `check` of a run.
    ///
    /// The SP-API implementation exchanges the refresh token here so that a
    /// rejected credential fails the whole run up front instead of surfacing
    /// as N identical per-identifier errors.
    ///
    /// # Errors
    ///
    /// An error here aborts the run before any catalog call is made.
    async fn prepare(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        Ok(())
    }

    async fn check(&self, asin: &str) -> StatusSignal;
}
