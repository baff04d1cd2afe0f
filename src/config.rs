// SPDX-License-Identifier: PMPL-1.0-or-later
//! Run manifest for a report generation.
//!
//! The manifest lists the audit result documents (each tagged with its
//! WCAG level) plus report metadata and output locations. It never holds
//! credentials: logging in and driving the browser happen upstream.

use crate::error::{ReportError, Result};
use crate::model::WcagLevel;
use crate::report::BrandingImage;
use crate::store::DocumentRef;
use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// One audit result document to include
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct DocumentEntry {
    pub level: WcagLevel,
    pub page_url: String,
    /// Location relative to `results_dir`; generated from level and page when unset
    #[serde(default)]
    pub path: Option<String>,
}

impl DocumentEntry {
    pub fn to_ref(&self) -> DocumentRef {
        let reference = DocumentRef::new(self.level, &self.page_url);
        match &self.path {
            Some(path) => reference.with_name(path),
            None => reference,
        }
    }
}

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct ReportConfig {
    #[serde(default = "default_title")]
    pub title: String,

    /// Domain label; defaults to the host of the first page
    #[serde(default)]
    pub domain: Option<String>,

    /// Page count; defaults to the number of distinct pages
    #[serde(default)]
    pub page_count: Option<usize>,

    /// Report date; defaults to today
    #[serde(default)]
    pub date: Option<NaiveDate>,

    #[serde(default = "default_dir")]
    pub results_dir: PathBuf,

    #[serde(default = "default_dir")]
    pub output_dir: PathBuf,

    #[serde(default = "default_report_file")]
    pub report_file: String,

    #[serde(default = "default_bar_chart_file")]
    pub bar_chart_file: String,

    #[serde(default = "default_pie_chart_file")]
    pub pie_chart_file: String,

    /// Skip missing or malformed documents instead of aborting
    #[serde(default)]
    pub allow_partial: bool,

    #[serde(default)]
    pub branding: Vec<BrandingImage>,

    #[serde(default)]
    pub documents: Vec<DocumentEntry>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            domain: None,
            page_count: None,
            date: None,
            results_dir: default_dir(),
            output_dir: default_dir(),
            report_file: default_report_file(),
            bar_chart_file: default_bar_chart_file(),
            pie_chart_file: default_pie_chart_file(),
            allow_partial: false,
            branding: Vec::new(),
            documents: Vec::new(),
        }
    }
}

fn default_title() -> String {
    "Web Accessibility Report".to_string()
}

fn default_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_report_file() -> String {
    "accessibility_report.html".to_string()
}

fn default_bar_chart_file() -> String {
    "violation_summary_chart.svg".to_string()
}

fn default_pie_chart_file() -> String {
    "wcag_levels_chart.svg".to_string()
}

impl ReportConfig {
    /// Load a TOML manifest. Relative directories resolve against the
    /// manifest's own directory.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ReportError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        let mut config = Self::from_toml(&content)?;

        if let Some(base) = path.parent() {
            config.results_dir = base.join(&config.results_dir);
            config.output_dir = base.join(&config.output_dir);
        }
        Ok(config)
    }

    /// Parse and validate a TOML manifest.
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(content).map_err(|e| ReportError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject manifests that would produce an ambiguous report.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        let mut names = HashSet::new();
        for entry in &self.documents {
            if !seen.insert((entry.level, entry.page_url.as_str())) {
                return Err(ReportError::Config(format!(
                    "duplicate document for level {} on {}",
                    entry.level, entry.page_url
                )));
            }
            let reference = entry.to_ref();
            if !names.insert(reference.name.clone()) {
                return Err(ReportError::Config(format!(
                    "result document {} is listed more than once",
                    reference.name
                )));
            }
        }

        let outputs = [
            ("report_file", &self.report_file),
            ("bar_chart_file", &self.bar_chart_file),
            ("pie_chart_file", &self.pie_chart_file),
        ];
        for (i, (name, file)) in outputs.iter().enumerate() {
            if file.trim().is_empty() {
                return Err(ReportError::Config(format!("{} must not be empty", name)));
            }
            let clash = outputs[..i].iter().find(|(_, f)| f.trim() == file.trim());
            if let Some((other, _)) = clash {
                return Err(ReportError::Config(format!(
                    "{} and {} both write to {}",
                    other, name, file
                )));
            }
        }
        Ok(())
    }

    pub fn document_refs(&self) -> Vec<DocumentRef> {
        self.documents.iter().map(DocumentEntry::to_ref).collect()
    }

    /// Distinct page URLs in manifest order.
    pub fn pages(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.documents
            .iter()
            .map(|d| d.page_url.as_str())
            .filter(|url| seen.insert(*url))
            .collect()
    }

    /// Configured domain, or the host of the first page URL.
    pub fn resolved_domain(&self) -> String {
        if let Some(domain) = &self.domain {
            return domain.clone();
        }
        self.pages()
            .first()
            .and_then(|page| url::Url::parse(page).ok())
            .and_then(|u| u.host_str().map(str::to_string))
            .unwrap_or_default()
    }

    pub fn resolved_page_count(&self) -> usize {
        self.page_count.unwrap_or_else(|| self.pages().len())
    }

    pub fn report_path(&self) -> PathBuf {
        self.output_dir.join(&self.report_file)
    }

    pub fn bar_chart_path(&self) -> PathBuf {
        self.output_dir.join(&self.bar_chart_file)
    }

    pub fn pie_chart_path(&self) -> PathBuf {
        self.output_dir.join(&self.pie_chart_file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MANIFEST: &str = r#"
title = "Quarterly Audit"
date = "2024-06-01"
allow_partial = true

[[branding]]
src = "https://cdn.example.org/logo.png"
alt = "Example Logo"

[[documents]]
level = "wcag2a"
page_url = "https://www.example.org/home"

[[documents]]
level = "AA"
page_url = "https://www.example.org/home"
path = "home-aa.json"

[[documents]]
level = "aaa"
page_url = "https://www.example.org/profile"
"#;

    #[test]
    fn test_defaults() {
        let config = ReportConfig::from_toml("").unwrap();
        assert_eq!(config.title, "Web Accessibility Report");
        assert_eq!(config.report_file, "accessibility_report.html");
        assert_eq!(config.bar_chart_file, "violation_summary_chart.svg");
        assert!(!config.allow_partial);
        assert!(config.documents.is_empty());
        assert_eq!(config.resolved_page_count(), 0);
        assert_eq!(config.resolved_domain(), "");
    }

    #[test]
    fn test_parse_manifest() {
        let config = ReportConfig::from_toml(MANIFEST).unwrap();
        assert_eq!(config.title, "Quarterly Audit");
        assert_eq!(config.date, NaiveDate::from_ymd_opt(2024, 6, 1));
        assert!(config.allow_partial);
        assert_eq!(config.branding.len(), 1);
        assert_eq!(config.documents[0].level, WcagLevel::A);
        assert_eq!(config.documents[2].level, WcagLevel::AAA);
        assert_eq!(config.resolved_page_count(), 2);
        assert_eq!(config.resolved_domain(), "www.example.org");
    }

    #[test]
    fn test_document_refs() {
        let config = ReportConfig::from_toml(MANIFEST).unwrap();
        let refs = config.document_refs();
        assert_eq!(
            refs[0].name,
            "accessibility_report_wcag2a_https___www.example.org_home.json"
        );
        assert_eq!(refs[1].name, "home-aa.json");
        assert_eq!(refs[1].level, WcagLevel::AA);
    }

    #[test]
    fn test_duplicate_documents_rejected() {
        let manifest = r#"
[[documents]]
level = "A"
page_url = "https://example.org/"

[[documents]]
level = "wcag2a"
page_url = "https://example.org/"
"#;
        let err = ReportConfig::from_toml(manifest).unwrap_err();
        assert!(err.to_string().contains("duplicate document"));
    }

    #[test]
    fn test_shared_result_document_rejected() {
        let manifest = r#"
[[documents]]
level = "AA"
page_url = "https://example.org/home"
path = "home.json"

[[documents]]
level = "AA"
page_url = "https://example.org/home/"
path = "home.json"
"#;
        let err = ReportConfig::from_toml(manifest).unwrap_err();
        assert!(err.to_string().contains("home.json is listed more than once"));
    }

    #[test]
    fn test_colliding_generated_names_rejected() {
        let manifest = r#"
[[documents]]
level = "A"
page_url = "https://example.org/a?b"

[[documents]]
level = "A"
page_url = "https://example.org/a_b"
"#;
        assert!(matches!(
            ReportConfig::from_toml(manifest),
            Err(ReportError::Config(_))
        ));
    }

    #[test]
    fn test_output_names_must_differ() {
        let err = ReportConfig::from_toml("bar_chart_file = \"accessibility_report.html\"\n")
            .unwrap_err();
        assert!(err.to_string().contains("report_file and bar_chart_file"));

        let err = ReportConfig::from_toml(
            "bar_chart_file = \"chart.svg\"\npie_chart_file = \"chart.svg\"\n",
        )
        .unwrap_err();
        assert!(err.to_string().contains("bar_chart_file and pie_chart_file"));

        let err = ReportConfig::from_toml(
            "report_file = \"out.html\"\n\
             bar_chart_file = \"out.html\"\n\
             pie_chart_file = \"out.html\"\n",
        );
        assert!(matches!(err, Err(ReportError::Config(_))));
    }

    #[test]
    fn test_invalid_level_rejected() {
        let manifest = r#"
[[documents]]
level = "wcag21aa"
page_url = "https://example.org/"
"#;
        assert!(matches!(
            ReportConfig::from_toml(manifest),
            Err(ReportError::Config(_))
        ));
    }

    #[test]
    fn test_explicit_overrides() {
        let config = ReportConfig::from_toml(
            "domain = \"keystone.example\"\npage_count = 10\n",
        )
        .unwrap();
        assert_eq!(config.resolved_domain(), "keystone.example");
        assert_eq!(config.resolved_page_count(), 10);
    }
}
