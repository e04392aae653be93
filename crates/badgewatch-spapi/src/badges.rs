//! Badge detection rules.
//!
//! The upstream catalog schema is not stable enough to pin exact field
//! paths, so detection is a case-insensitive substring match over the
//! stringified payload. The matched phrases and their priority order live
//! in this table rather than inline in the client; the first rule whose
//! phrase appears in the payload wins.

use badgewatch_core::BadgeKind;

/// One detection rule: a lowercase phrase and the badge it signals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BadgeRule {
    pub phrase: &'static str,
    pub kind: BadgeKind,
}

/// Default rule table. Order is the tie-break: Best Seller before
/// Amazon's Choice.
pub const DEFAULT_BADGE_RULES: &[BadgeRule] = &[
    BadgeRule {
        phrase: "bestseller",
        kind: BadgeKind::BestSeller,
    },
    BadgeRule {
        phrase: "amazon choice",
        kind: BadgeKind::AmazonChoice,
    },
];

/// Returns the first rule whose phrase occurs in `payload`, compared
/// case-insensitively.
#[must_use]
pub fn classify(rules: &[BadgeRule], payload: &serde_json::Value) -> Option<BadgeKind> {
    let haystack = payload.to_string().to_lowercase();
    rules
        .iter()
        .find(|rule| haystack.contains(rule.phrase))
        .map(|rule| rule.kind)
}
