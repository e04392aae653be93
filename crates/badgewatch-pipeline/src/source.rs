//! Master catalogue sheet parsing.
//!
//! The catalogue is a CSV export with one row per tracked product. Only two
//! columns matter here: `Amazon ASIN` and `Amazon URL`. A sheet missing
//! either column is a run-level failure; a row with a blank ASIN is skipped
//! with a warning.

use std::path::Path;

use crate::error::PipelineError;

const ASIN_COLUMN: &str = "Amazon ASIN";
const URL_COLUMN: &str = "Amazon URL";

/// One product row from the master catalogue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogueRow {
    pub asin: String,
    pub url: String,
}

/// Reads and validates the catalogue sheet at `path`.
///
/// Duplicate ASINs are kept — they only cost redundant upstream calls and
/// the sheet is not ours to dedupe.
///
/// # Errors
///
/// - [`PipelineError::SourceParse`] if the file cannot be read as CSV.
/// - [`PipelineError::MissingColumns`] if a required header is absent.
pub fn parse_catalogue(path: &Path) -> Result<Vec<CatalogueRow>, PipelineError> {
    let mut reader = csv::Reader::from_path(path)?;

    let headers = reader.headers()?.clone();
    let asin_idx = headers.iter().position(|h| h.trim() == ASIN_COLUMN);
    let url_idx = headers.iter().position(|h| h.trim() == URL_COLUMN);

    let (Some(asin_idx), Some(url_idx)) = (asin_idx, url_idx) else {
        return Err(PipelineError::MissingColumns);
    };

    let mut rows = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record = record?;
        let asin = record.get(asin_idx).unwrap_or("").trim();
        if asin.is_empty() {
            // +2: 1-based, counting the header line.
            tracing::warn!(row = index + 2, "skipping catalogue row with blank ASIN");
            continue;
        }
        let url = record.get(url_idx).unwrap_or("").trim();
        rows.push(CatalogueRow {
            asin: asin.to_string(),
            url: url.to_string(),
        });
    }

    Ok(rows)
}
