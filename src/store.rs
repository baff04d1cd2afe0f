// SPDX-License-Identifier: PMPL-1.0-or-later
//! Result store adapter.
//!
//! Isolates the report pipeline from how axe-core results are persisted.
//! A [`DocumentRef`] carries the WCAG level explicitly from ingestion; the
//! generated file name is only an address and is never parsed back.

use crate::error::{ReportError, Result};
use crate::model::{null_as_empty, AuditResultDocument, RawViolation, WcagLevel};
use serde::Deserialize;
use std::path::PathBuf;
use tracing::debug;

/// Characters replaced by `_` when turning a page URL into a file name.
const UNSAFE_NAME_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Replace characters that are unsafe in file names with `_`.
pub fn sanitize_page_id(page_url: &str) -> String {
    page_url
        .chars()
        .map(|c| if UNSAFE_NAME_CHARS.contains(&c) { '_' } else { c })
        .collect()
}

/// Stable result document name for a (level, page) pair.
pub fn document_name(level: WcagLevel, page_url: &str) -> String {
    format!(
        "accessibility_report_{}_{}.json",
        level.axe_tag(),
        sanitize_page_id(page_url)
    )
}

/// Address of one audit result document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentRef {
    pub level: WcagLevel,
    /// Audited page; empty means "take it from the document"
    pub page_url: String,
    /// Location relative to the store root
    pub name: String,
}

impl DocumentRef {
    /// Reference using the generated document name.
    pub fn new(level: WcagLevel, page_url: &str) -> Self {
        Self {
            level,
            page_url: page_url.to_string(),
            name: document_name(level, page_url),
        }
    }

    /// Override the stored location.
    pub fn with_name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }
}

impl std::fmt::Display for DocumentRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (level {})", self.name, self.level)
    }
}

/// Source of audit result documents
pub trait ResultStore {
    /// Load and parse the referenced document.
    fn load(&self, reference: &DocumentRef) -> Result<AuditResultDocument>;
}

/// On-disk shape of an axe-core result file (only the fields we read).
#[derive(Debug, Deserialize)]
struct AxeResults {
    #[serde(default)]
    url: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    violations: Vec<RawViolation>,
}

/// Parse axe-core JSON into an [`AuditResultDocument`] for `reference`.
pub fn parse_document(reference: &DocumentRef, json: &str) -> Result<AuditResultDocument> {
    let results: AxeResults =
        serde_json::from_str(json).map_err(|e| ReportError::ResultMalformed {
            reference: reference.name.clone(),
            reason: e.to_string(),
        })?;

    let page_url = if reference.page_url.is_empty() {
        results.url.unwrap_or_default()
    } else {
        reference.page_url.clone()
    };

    Ok(AuditResultDocument {
        level: reference.level,
        page_url,
        violations: results.violations,
    })
}

/// Reads result documents from a directory
#[derive(Debug, Clone)]
pub struct FsResultStore {
    root: PathBuf,
}

impl FsResultStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path_for(&self, reference: &DocumentRef) -> PathBuf {
        self.root.join(&reference.name)
    }
}

impl ResultStore for FsResultStore {
    fn load(&self, reference: &DocumentRef) -> Result<AuditResultDocument> {
        let path = self.path_for(reference);
        debug!("Loading audit result {}", path.display());

        let content = match std::fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ReportError::ResultNotFound {
                    reference: path.display().to_string(),
                });
            }
            Err(e) => {
                return Err(ReportError::ResultMalformed {
                    reference: path.display().to_string(),
                    reason: e.to_string(),
                });
            }
        };

        parse_document(reference, &content)
    }
}
