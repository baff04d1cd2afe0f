// SPDX-License-Identifier: PMPL-1.0-or-later
//! Report composition and rendering.
//!
//! [`compose`] orders the normalized violations (AAA first, then AA, then
//! A; stable within a level), builds the detail rows and pairs them with
//! the summary, chart references and metadata. The resulting [`Report`]
//! renders to a self-contained HTML document.
//!
//! Summaries can also be rendered on their own:
//! - Text: a level-by-impact table for terminals
//! - JSON: the aggregate counts for programmatic consumption

mod html;

pub use html::{escape_html, unescape_html};

use crate::aggregate::AggregateSummary;
use crate::model::{Impact, NormalizedViolation, WcagLevel};
use chrono::NaiveDate;
use serde::Serialize;

/// Output format for standalone summaries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryFormat {
    /// Human-readable text table
    Text,
    /// Structured JSON
    Json,
}

impl std::fmt::Display for SummaryFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SummaryFormat::Text => write!(f, "text"),
            SummaryFormat::Json => write!(f, "json"),
        }
    }
}

impl std::str::FromStr for SummaryFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(SummaryFormat::Text),
            "json" => Ok(SummaryFormat::Json),
            other => Err(format!("Unknown summary format: {}", other)),
        }
    }
}

/// A branding image shown in the report header
#[derive(Debug, Clone, PartialEq, Eq, Serialize, serde::Deserialize)]
pub struct BrandingImage {
    pub src: String,
    #[serde(default)]
    pub alt: String,
}

/// Fixed metadata printed above the summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportMetadata {
    pub title: String,
    pub date: NaiveDate,
    pub domain: String,
    pub page_count: usize,
    pub branding: Vec<BrandingImage>,
}

impl ReportMetadata {
    /// Date in the "Month DD, YYYY" form used in the header.
    pub fn date_display(&self) -> String {
        self.date.format("%B %d, %Y").to_string()
    }
}

/// Names of the chart images, relative to the report
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartRefs {
    pub bar: String,
    pub pie: String,
}

/// One row of the detail table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetailRow {
    pub rule_id: String,
    /// Upper-cased level
    pub level: String,
    pub impact: String,
    /// Snippet with HTML metacharacters escaped
    pub html_escaped: String,
    pub page_url: String,
    /// Impact outside the recognised set
    pub unclassified: bool,
}

impl DetailRow {
    fn from_violation(violation: &NormalizedViolation) -> Self {
        Self {
            rule_id: violation.rule_id.clone(),
            level: violation.level.to_string().to_uppercase(),
            impact: violation.impact.to_string(),
            html_escaped: escape_html(&violation.html),
            page_url: violation.page_url.clone(),
            unclassified: violation.impact.recognized().is_none(),
        }
    }
}

/// The composed report. Immutable once built.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    rows: Vec<DetailRow>,
    summary: AggregateSummary,
    charts: ChartRefs,
    metadata: ReportMetadata,
}

impl Report {
    pub fn rows(&self) -> &[DetailRow] {
        &self.rows
    }

    pub fn summary(&self) -> &AggregateSummary {
        &self.summary
    }

    pub fn charts(&self) -> &ChartRefs {
        &self.charts
    }

    pub fn metadata(&self) -> &ReportMetadata {
        &self.metadata
    }

    /// Render the full HTML document.
    pub fn to_html(&self) -> String {
        html::render_document(self)
    }
}

/// Sort violations into review order without disturbing encounter order
/// inside a level.
pub fn review_order(violations: &[NormalizedViolation]) -> Vec<&NormalizedViolation> {
    let mut ordered: Vec<&NormalizedViolation> = violations.iter().collect();
    ordered.sort_by_key(|v| v.level.review_rank());
    ordered
}

/// Build the report from its parts.
pub fn compose(
    violations: &[NormalizedViolation],
    summary: AggregateSummary,
    charts: ChartRefs,
    metadata: ReportMetadata,
) -> Report {
    let rows = review_order(violations)
        .into_iter()
        .map(DetailRow::from_violation)
        .collect();

    Report {
        rows,
        summary,
        charts,
        metadata,
    }
}

/// Render a summary on its own.
pub fn generate_summary(summary: &AggregateSummary, format: SummaryFormat) -> String {
    match format {
        SummaryFormat::Text => generate_text_summary(summary),
        SummaryFormat::Json => serde_json::to_string_pretty(summary).unwrap_or_else(|e| {
            format!("{{\"error\": \"Failed to serialize summary: {}\"}}", e)
        }),
    }
}

fn generate_text_summary(summary: &AggregateSummary) -> String {
    let mut output = String::new();

    output.push_str("=== WCAG Violation Summary ===\n\n");
    output.push_str(&format!("{:<6}", "Level"));
    for impact in Impact::ALL {
        output.push_str(&format!("{:>10}", impact.as_str()));
    }
    output.push_str(&format!("{:>14}{:>8}\n", "Unclassified", "Total"));

    for level in WcagLevel::ALL {
        let counts = summary.level(level);
        output.push_str(&format!("{:<6}", level.to_string()));
        for impact in Impact::ALL {
            output.push_str(&format!("{:>10}", counts.get(impact)));
        }
        output.push_str(&format!(
            "{:>14}{:>8}\n",
            counts.unclassified(),
            counts.total()
        ));
    }

    output.push_str(&format!("{:<6}", "Total"));
    for impact in Impact::ALL {
        output.push_str(&format!("{:>10}", summary.impact_total(impact)));
    }
    output.push_str(&format!(
        "{:>14}{:>8}\n",
        summary.unclassified_total(),
        summary.grand_total()
    ));

    if summary.unclassified_total() > 0 {
        output.push_str(&format!(
            "\nWARNING: {} violation(s) with an unrecognized impact\n",
            summary.unclassified_total()
        ));
    }

    output
}
