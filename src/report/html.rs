// SPDX-License-Identifier: PMPL-1.0-or-later
//! HTML rendering of a composed report.

use super::{DetailRow, Report};
use crate::aggregate::AggregateSummary;
use crate::model::{Impact, WcagLevel};

/// Escape `&`, `<`, `>` and `"` for embedding in HTML text or attributes.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

/// Inverse of [`escape_html`].
pub fn unescape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(pos) = rest.find('&') {
        out.push_str(&rest[..pos]);
        rest = &rest[pos..];
        let entity = [("&amp;", '&'), ("&lt;", '<'), ("&gt;", '>'), ("&quot;", '"')]
            .into_iter()
            .find(|(name, _)| rest.starts_with(name));
        match entity {
            Some((name, c)) => {
                out.push(c);
                rest = &rest[name.len()..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

const STYLE: &str = r#"        body { font-family: Arial, sans-serif; margin: 20px; background-color: #f0f4f7; }
        h1 { color: #333; text-align: left; font-size: 36px; margin-bottom: 5px; }
        table { width: 100%; border-collapse: collapse; margin-top: 20px; }
        th, td { border: 1px solid #ddd; padding: 8px; text-align: center; }
        th { background-color: #0056b3; color: white; }
        .summary-table td.total, .summary-table tr.total td { font-weight: bold; }
        .chart-container { display: flex; justify-content: space-between; margin-top: 20px; }
        .chart-container img { width: 48%; }
        .logo-container { display: flex; justify-content: space-between; align-items: center; margin-bottom: 20px; }
        .logo { width: 200px; }
        .violations-table { margin-top: 40px; }
        tr.unclassified td { background-color: #fff4e5; }
        pre { background-color: #f8f8f8; padding: 8px 12px; border-radius: 4px; white-space: pre-wrap; word-wrap: break-word; font-family: Consolas, 'Courier New', monospace; }
"#;

fn summary_table(summary: &AggregateSummary) -> String {
    let mut out = String::new();
    out.push_str("<table class=\"summary-table\">\n<thead>\n<tr><th>WCAG Level</th>");
    for impact in Impact::ALL {
        out.push_str(&format!("<th>{}</th>", impact));
    }
    out.push_str("<th>Unclassified</th><th>Total</th></tr>\n</thead>\n<tbody>\n");

    for level in WcagLevel::ALL {
        let counts = summary.level(level);
        out.push_str(&format!("<tr><th>{}</th>", level));
        for impact in Impact::ALL {
            out.push_str(&format!("<td>{}</td>", counts.get(impact)));
        }
        out.push_str(&format!(
            "<td>{}</td><td class=\"total\">{}</td></tr>\n",
            counts.unclassified(),
            counts.total()
        ));
    }

    out.push_str("<tr class=\"total\"><th>Total</th>");
    for impact in Impact::ALL {
        out.push_str(&format!("<td>{}</td>", summary.impact_total(impact)));
    }
    out.push_str(&format!(
        "<td>{}</td><td>{}</td></tr>\n</tbody>\n</table>",
        summary.unclassified_total(),
        summary.grand_total()
    ));
    out
}

fn detail_row(row: &DetailRow) -> String {
    let url = escape_html(&row.page_url);
    format!(
        "<tr{}>\n    <td>{}</td>\n    <td>{}</td>\n    <td>{}</td>\n    <td><pre>{}</pre></td>\n    <td><a href=\"{}\" target=\"_blank\">{}</a></td>\n</tr>\n",
        if row.unclassified { " class=\"unclassified\"" } else { "" },
        escape_html(&row.rule_id),
        row.level,
        escape_html(&row.impact),
        row.html_escaped,
        url,
        url,
    )
}

pub(super) fn render_document(report: &Report) -> String {
    let metadata = report.metadata();

    let logos: String = metadata
        .branding
        .iter()
        .map(|logo| {
            format!(
                "    <img src=\"{}\" alt=\"{}\" class=\"logo\">\n",
                escape_html(&logo.src),
                escape_html(&logo.alt)
            )
        })
        .collect();

    let rows: String = report.rows().iter().map(detail_row).collect();
    let title = escape_html(&metadata.title);

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <style>
{style}    </style>
</head>
<body>
<div class="logo-container">
{logos}</div>

<h1>{title}</h1>
<p>Date Run: {date}</p>
<p><strong>Domain:</strong> {domain}</p>
<p><strong>Page Count:</strong> {page_count}</p>

<h2>Summary</h2>
{summary}
<div class="chart-container">
    <img src="{bar}" alt="Violation Summary Bar Chart">
    <img src="{pie}" alt="WCAG Levels Pie Chart">
</div>

<h2>Detailed Violations</h2>
<table class="violations-table">
<thead>
<tr>
    <th>Violation Type</th>
    <th>WCAG Level</th>
    <th>Impact</th>
    <th>HTML Element</th>
    <th>Page URL</th>
</tr>
</thead>
<tbody>
{rows}</tbody>
</table>
</body>
</html>
"#,
        title = title,
        style = STYLE,
        logos = logos,
        date = metadata.date_display(),
        domain = escape_html(&metadata.domain),
        page_count = metadata.page_count,
        summary = summary_table(report.summary()),
        bar = escape_html(&report.charts().bar),
        pie = escape_html(&report.charts().pie),
        rows = rows,
    )
}
