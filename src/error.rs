// SPDX-License-Identifier: PMPL-1.0-or-later
//! Error types for wcagbot

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ReportError>;

/// Fatal failures of a report run.
///
/// Impact values outside the recognised set are not errors; they travel
/// with the violation as [`crate::model::ImpactClass::Unclassified`].
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("audit result not found: {reference}")]
    ResultNotFound { reference: String },

    #[error("audit result malformed: {reference}: {reason}")]
    ResultMalformed { reference: String, reason: String },

    #[error("chart rendering failed ({chart}): {reason}")]
    ChartRender { chart: String, reason: String },

    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ReportError {
    /// Whether the error concerns a single result document, which a
    /// partial-report run may skip.
    pub fn is_document_error(&self) -> bool {
        matches!(
            self,
            ReportError::ResultNotFound { .. } | ReportError::ResultMalformed { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_failing_item() {
        let err = ReportError::ResultNotFound {
            reference: "accessibility_report_wcag2a_x.json".to_string(),
        };
        assert!(err.to_string().contains("accessibility_report_wcag2a_x.json"));

        let err = ReportError::ChartRender {
            chart: "bar".to_string(),
            reason: "disk full".to_string(),
        };
        assert!(err.to_string().contains("bar"));
    }

    #[test]
    fn test_document_errors() {
        assert!(ReportError::ResultMalformed {
            reference: "a".to_string(),
            reason: "b".to_string(),
        }
        .is_document_error());
        assert!(!ReportError::Config("x".to_string()).is_document_error());
    }
}
