// SPDX-License-Identifier: PMPL-1.0-or-later
//! Report generation pipeline.
//!
//! Load every result document, normalize, aggregate, render the charts,
//! compose and write the report. The run is synchronous and each call owns
//! its documents, summary and output files. Failures abort fast and name
//! the document or stage involved; a chart failure aborts before the
//! report file is written.

use crate::aggregate::{aggregate, AggregateSummary};
use crate::chart::ChartRenderer;
use crate::config::ReportConfig;
use crate::error::{ReportError, Result};
use crate::model::{AuditResultDocument, NormalizedViolation};
use crate::normalize::normalize_all;
use crate::report::{compose, ChartRefs, ReportMetadata};
use crate::store::{DocumentRef, ResultStore};
use std::path::PathBuf;
use tracing::{info, warn};

/// Documents that loaded, and those skipped under `allow_partial`.
#[derive(Debug, Default)]
pub struct LoadedDocuments {
    pub documents: Vec<AuditResultDocument>,
    pub skipped: Vec<DocumentRef>,
}

/// Load every referenced document before anything is aggregated.
pub fn load_documents(
    store: &dyn ResultStore,
    references: &[DocumentRef],
    allow_partial: bool,
) -> Result<LoadedDocuments> {
    let mut loaded = LoadedDocuments::default();

    for reference in references {
        match store.load(reference) {
            Ok(document) => {
                info!(
                    "Number of accessibility violations for {} on {}: {}",
                    document.level.axe_tag(),
                    document.page_url,
                    document.violations.len()
                );
                loaded.documents.push(document);
            }
            Err(e) if allow_partial && e.is_document_error() => {
                warn!("Skipping {}: {}", reference, e);
                loaded.skipped.push(reference.clone());
            }
            Err(e) => return Err(e),
        }
    }

    Ok(loaded)
}

/// Normalized violations and their summary
#[derive(Debug)]
pub struct Analysis {
    pub violations: Vec<NormalizedViolation>,
    pub summary: AggregateSummary,
    pub skipped: Vec<DocumentRef>,
}

/// Load, normalize and aggregate without writing anything.
pub fn analyze(config: &ReportConfig, store: &dyn ResultStore) -> Result<Analysis> {
    config.validate()?;
    let loaded = load_documents(store, &config.document_refs(), config.allow_partial)?;
    let violations = normalize_all(&loaded.documents);
    let summary = aggregate(&violations);

    if summary.unclassified_total() > 0 {
        warn!(
            "{} violation(s) have an unrecognized impact and are counted as unclassified",
            summary.unclassified_total()
        );
    }

    Ok(Analysis {
        violations,
        summary,
        skipped: loaded.skipped,
    })
}

/// What a successful run wrote
#[derive(Debug)]
pub struct GeneratedReport {
    pub report_path: PathBuf,
    pub bar_chart_path: PathBuf,
    pub pie_chart_path: PathBuf,
    pub summary: AggregateSummary,
    pub violation_count: usize,
    pub skipped: Vec<DocumentRef>,
}

/// Metadata for the header, filling defaults from the manifest.
pub fn report_metadata(config: &ReportConfig) -> ReportMetadata {
    ReportMetadata {
        title: config.title.clone(),
        date: config
            .date
            .unwrap_or_else(|| chrono::Local::now().date_naive()),
        domain: config.resolved_domain(),
        page_count: config.resolved_page_count(),
        branding: config.branding.clone(),
    }
}

/// Run the full pipeline and write the report with its charts.
pub fn generate_report(
    config: &ReportConfig,
    store: &dyn ResultStore,
    renderer: &dyn ChartRenderer,
) -> Result<GeneratedReport> {
    let analysis = analyze(config, store)?;

    std::fs::create_dir_all(&config.output_dir).map_err(|e| ReportError::Write {
        path: config.output_dir.clone(),
        source: e,
    })?;

    let bar_chart_path = config.bar_chart_path();
    let pie_chart_path = config.pie_chart_path();
    renderer.render_bar(&analysis.summary, &bar_chart_path)?;
    renderer.render_pie(&analysis.summary, &pie_chart_path)?;

    let charts = ChartRefs {
        bar: config.bar_chart_file.clone(),
        pie: config.pie_chart_file.clone(),
    };
    let report = compose(
        &analysis.violations,
        analysis.summary,
        charts,
        report_metadata(config),
    );

    let report_path = config.report_path();
    std::fs::write(&report_path, report.to_html()).map_err(|e| ReportError::Write {
        path: report_path.clone(),
        source: e,
    })?;

    info!(
        "Summary HTML report generated: {} ({} violations)",
        report_path.display(),
        report.rows().len()
    );

    Ok(GeneratedReport {
        report_path,
        bar_chart_path,
        pie_chart_path,
        summary: analysis.summary,
        violation_count: analysis.violations.len(),
        skipped: analysis.skipped,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::SvgChartRenderer;
    use crate::model::{Impact, RawNode, RawViolation, WcagLevel};
    use std::collections::HashMap;
    use std::path::Path;
    use tempfile::TempDir;

    /// In-memory store keyed by document name
    #[derive(Default)]
    struct MemoryStore {
        documents: HashMap<String, Vec<RawViolation>>,
    }

    impl ResultStore for MemoryStore {
        fn load(&self, reference: &DocumentRef) -> Result<AuditResultDocument> {
            let violations = self.documents.get(&reference.name).ok_or_else(|| {
                ReportError::ResultNotFound {
                    reference: reference.name.clone(),
                }
            })?;
            Ok(AuditResultDocument {
                level: reference.level,
                page_url: reference.page_url.clone(),
                violations: violations.clone(),
            })
        }
    }

    struct FailingRenderer;

    impl ChartRenderer for FailingRenderer {
        fn render_bar(&self, _summary: &AggregateSummary, path: &Path) -> Result<()> {
            Err(ReportError::ChartRender {
                chart: path.display().to_string(),
                reason: "backend unavailable".to_string(),
            })
        }

        fn render_pie(&self, _summary: &AggregateSummary, _path: &Path) -> Result<()> {
            Ok(())
        }
    }

    fn config_for(output_dir: &Path, manifest: &str) -> ReportConfig {
        let mut config = ReportConfig::from_toml(manifest).unwrap();
        config.output_dir = output_dir.to_path_buf();
        config
    }

    const TWO_PAGES: &str = r#"
date = "2024-01-15"

[[documents]]
level = "AA"
page_url = "https://example.org/a"
path = "doc1"

[[documents]]
level = "A"
page_url = "https://example.org/b"
path = "doc2"
"#;

    fn store() -> MemoryStore {
        let mut store = MemoryStore::default();
        store.documents.insert(
            "doc1".to_string(),
            vec![RawViolation {
                id: "image-alt".to_string(),
                impact: Some("serious".to_string()),
                nodes: vec![RawNode { html: Some("<img>".to_string()) }],
            }],
        );
        store.documents.insert(
            "doc2".to_string(),
            vec![RawViolation {
                id: "html-has-lang".to_string(),
                impact: Some("critical".to_string()),
                nodes: Vec::new(),
            }],
        );
        store
    }

    #[test]
    fn test_analyze() {
        let tmp = TempDir::new().unwrap();
        let analysis = analyze(&config_for(tmp.path(), TWO_PAGES), &store()).unwrap();
        assert_eq!(analysis.violations.len(), 2);
        assert_eq!(analysis.summary.get(WcagLevel::AA, Impact::Serious), 1);
        assert_eq!(analysis.summary.get(WcagLevel::A, Impact::Critical), 1);
        assert!(analysis.skipped.is_empty());
    }

    #[test]
    fn test_missing_document_aborts() {
        let tmp = TempDir::new().unwrap();
        let mut store = store();
        store.documents.remove("doc2");
        let err = analyze(&config_for(tmp.path(), TWO_PAGES), &store).unwrap_err();
        assert!(err.to_string().contains("doc2"));
    }

    #[test]
    fn test_partial_run_skips_missing() {
        let tmp = TempDir::new().unwrap();
        let mut store = store();
        store.documents.remove("doc2");
        let mut config = config_for(tmp.path(), TWO_PAGES);
        config.allow_partial = true;

        let analysis = analyze(&config, &store).unwrap();
        assert_eq!(analysis.violations.len(), 1);
        assert_eq!(analysis.skipped.len(), 1);
        assert_eq!(analysis.skipped[0].name, "doc2");
    }

    #[test]
    fn test_chart_failure_writes_no_report() {
        let tmp = TempDir::new().unwrap();
        let config = config_for(tmp.path(), TWO_PAGES);
        let err = generate_report(&config, &store(), &FailingRenderer).unwrap_err();
        assert!(matches!(err, ReportError::ChartRender { .. }));
        assert!(!config.report_path().exists());
    }

    #[test]
    fn test_generate_writes_all_artifacts() {
        let tmp = TempDir::new().unwrap();
        let config = config_for(tmp.path(), TWO_PAGES);
        let generated = generate_report(&config, &store(), &SvgChartRenderer).unwrap();

        assert!(generated.report_path.exists());
        assert!(generated.bar_chart_path.exists());
        assert!(generated.pie_chart_path.exists());
        assert_eq!(generated.violation_count, 2);

        let html = std::fs::read_to_string(&generated.report_path).unwrap();
        assert!(html.contains("Date Run: January 15, 2024"));
        assert!(html.contains("<strong>Domain:</strong> example.org"));
        assert!(html.contains("<strong>Page Count:</strong> 2"));
    }

    #[test]
    fn test_shared_output_name_writes_nothing() {
        let tmp = TempDir::new().unwrap();
        let mut config = config_for(tmp.path(), TWO_PAGES);
        config.pie_chart_file = config.report_file.clone();

        let err = generate_report(&config, &store(), &SvgChartRenderer).unwrap_err();
        assert!(matches!(err, ReportError::Config(_)));
        assert!(!config.report_path().exists());
        assert!(!config.bar_chart_path().exists());
    }

    #[test]
    fn test_metadata_defaults_to_today() {
        let config = ReportConfig::default();
        let metadata = report_metadata(&config);
        let today = chrono::Local::now().date_naive();
        assert!(metadata.date <= today);
        assert!(Some(metadata.date) >= today.pred_opt());
        assert_eq!(metadata.page_count, 0);
    }
}
