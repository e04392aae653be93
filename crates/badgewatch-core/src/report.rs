//! Domain types shared across the badge-monitoring pipeline.
//!
//! A run turns a list of ASINs into one [`RunReport`]: every checked
//! identifier yields exactly one [`StatusSignal`], and only badge changes
//! (plus isolated per-identifier errors) survive into the report.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Marketplace badge kinds this service watches for.
///
/// Variant order is the detection priority: `BestSeller` is checked before
/// `AmazonChoice`, and the first match wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgeKind {
    BestSeller,
    AmazonChoice,
}

impl BadgeKind {
    /// User-facing update string reported for a newly detected badge.
    #[must_use]
    pub fn describe(self) -> &'static str {
        match self {
            BadgeKind::BestSeller => "New Best Seller Badge Added",
            BadgeKind::AmazonChoice => "New Amazon Choice Badge Added",
        }
    }
}

/// Outcome of one status check for one identifier.
///
/// Failure is a value here: upstream rejections and transport errors become
/// `Error(reason)` rather than propagating, so one bad identifier can never
/// abort a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusSignal {
    NoChange,
    BadgeAdded(BadgeKind),
    Error(String),
}

/// One checked identifier with its source URL and resulting signal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateRecord {
    pub asin: String,
    pub source_url: String,
    pub signal: StatusSignal,
}

/// A reported badge change, serialized with the field names the original
/// report consumers expect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductUpdate {
    pub asin: String,
    pub url: String,
    pub update: String,
}

/// A per-identifier check failure kept out of the `products` list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckFailure {
    pub asin: String,
    pub reason: String,
}

/// Consolidated outcome of one completed run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReport {
    pub products: Vec<ProductUpdate>,
    pub errors: Vec<CheckFailure>,
    /// Total identifiers checked, including unchanged ones.
    pub checked: usize,
    pub completed_at: DateTime<Utc>,
}

impl RunReport {
    /// Build a report from per-identifier records, preserving record order.
    ///
    /// Badge changes populate `products`; error signals populate `errors`;
    /// `NoChange` records are dropped unless `report_unchanged` is set, in
    /// which case they appear in `products` with the "No updates" marker.
    #[must_use]
    pub fn from_records(records: &[UpdateRecord], report_unchanged: bool) -> Self {
        let mut products = Vec::new();
        let mut errors = Vec::new();

        for record in records {
            match &record.signal {
                StatusSignal::BadgeAdded(kind) => products.push(ProductUpdate {
                    asin: record.asin.clone(),
                    url: record.source_url.clone(),
                    update: kind.describe().to_string(),
                }),
                StatusSignal::NoChange if report_unchanged => products.push(ProductUpdate {
                    asin: record.asin.clone(),
                    url: record.source_url.clone(),
                    update: "No updates".to_string(),
                }),
                StatusSignal::NoChange => {}
                StatusSignal::Error(reason) => errors.push(CheckFailure {
                    asin: record.asin.clone(),
                    reason: reason.clone(),
                }),
            }
        }

        Self {
            products,
            errors,
            checked: records.len(),
            completed_at: Utc::now(),
        }
    }
}

/// The single persisted outcome slot: a completed report or a whole-run
/// failure. Serialized untagged so the stored document is either
/// `{"products": [...], ...}` or `{"error": "<reason>"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RunResult {
    Completed(RunReport),
    Failed { error: String },
}
