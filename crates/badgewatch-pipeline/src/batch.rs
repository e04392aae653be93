//! Batched status checking with bounded concurrency.
//!
//! Identifiers are processed in consecutive chunks; within a chunk up to
//! `concurrency_per_batch` checks run at once, and the next chunk starts
//! only after the current one has fully drained. The upstream API therefore
//! never sees more than `concurrency_per_batch` in-flight requests.

use futures::stream::{self, StreamExt};

use badgewatch_core::{StatusCheck, UpdateRecord};

use crate::source::CatalogueRow;

/// Runs status checks for every row and returns one record per row.
///
/// `batch_size` and `concurrency_per_batch` are clamped to at least 1.
/// The returned records preserve the input row order regardless of the
/// order in which individual checks complete, and a per-identifier error
/// signal never aborts the batch — it is just another record.
pub async fn run_batches(
    checker: &dyn StatusCheck,
    rows: &[CatalogueRow],
    batch_size: usize,
    concurrency_per_batch: usize,
) -> Vec<UpdateRecord> {
    let batch_size = batch_size.max(1);
    let concurrency = concurrency_per_batch.max(1);

    let mut records = Vec::with_capacity(rows.len());

    for (chunk_index, chunk) in rows.chunks(batch_size).enumerate() {
        tracing::debug!(
            chunk = chunk_index,
            size = chunk.len(),
            "checking catalogue chunk"
        );

        let indexed: Vec<(usize, String, String)> = chunk
            .iter()
            .enumerate()
            .map(|(offset, row)| (offset, row.asin.clone(), row.url.clone()))
            .collect();
        let mut outcomes: Vec<(usize, UpdateRecord)> = stream::iter(indexed)
            .map(|(offset, asin, source_url)| async move {
                let signal = checker.check(&asin).await;
                let record = UpdateRecord {
                    asin,
                    source_url,
                    signal,
                };
                (offset, record)
            })
            .buffer_unordered(concurrency)
            .collect()
            .await;

        // Completion order is arbitrary; the report order is the sheet order.
        outcomes.sort_unstable_by_key(|(offset, _)| *offset);
        records.extend(outcomes.into_iter().map(|(_, record)| record));
    }

    records
}
