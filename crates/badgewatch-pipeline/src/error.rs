use thiserror::Error;

use crate::store::StoreError;

/// Run-level pipeline failures.
///
/// Per-identifier failures never appear here — they are folded into
/// `StatusSignal::Error` by the checker. Everything in this enum aborts the
/// whole run with no partial results.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The source sheet could not be fetched from the file store.
    #[error("source file unavailable: {0}")]
    SourceUnavailable(StoreError),

    /// The source sheet could not be read or parsed as CSV.
    #[error("failed to parse catalogue sheet: {0}")]
    SourceParse(#[from] csv::Error),

    /// The source sheet lacks `Amazon ASIN` or `Amazon URL`.
    #[error("missing required columns in catalogue sheet")]
    MissingColumns,

    /// The credential exchange was rejected before the run started.
    #[error("authentication failed: {0}")]
    Auth(String),
}
