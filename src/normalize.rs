// SPDX-License-Identifier: PMPL-1.0-or-later
//! Violation normalizer.
//!
//! Flattens an audit result document into one [`NormalizedViolation`] per
//! raw violation. Only the first affected node is represented; the node
//! count is collapsed on purpose. Nothing is dropped here: unknown impacts
//! are classified as unclassified and flagged downstream.

use crate::model::{AuditResultDocument, ImpactClass, NormalizedViolation, RawViolation};
use tracing::warn;

/// Snippet used when the first node has no usable HTML.
pub const NO_ELEMENT_SENTINEL: &str = "No HTML element found";

/// Trimmed HTML of the first affected node, or the sentinel.
pub fn representative_html(violation: &RawViolation) -> String {
    violation
        .nodes
        .first()
        .and_then(|node| node.html.as_deref())
        .map(str::trim)
        .filter(|html| !html.is_empty())
        .unwrap_or(NO_ELEMENT_SENTINEL)
        .to_string()
}

/// Normalize every violation in `document`.
pub fn normalize(document: &AuditResultDocument) -> Vec<NormalizedViolation> {
    document
        .violations
        .iter()
        .map(|violation| {
            let impact = ImpactClass::classify(violation.impact.as_deref());
            if let ImpactClass::Unclassified(_) = impact {
                warn!(
                    "Unrecognized impact {:?} for rule {} (level {}) on {}",
                    violation.impact, violation.id, document.level, document.page_url
                );
            }

            NormalizedViolation {
                rule_id: violation.id.clone(),
                level: document.level,
                impact,
                html: representative_html(violation),
                page_url: document.page_url.clone(),
            }
        })
        .collect()
}

/// Normalize a set of documents, preserving document then violation order.
pub fn normalize_all<'a>(
    documents: impl IntoIterator<Item = &'a AuditResultDocument>,
) -> Vec<NormalizedViolation> {
    documents.into_iter().flat_map(normalize).collect()
}
