// SPDX-License-Identifier: PMPL-1.0-or-later
//! Chart rendering for the summary section.
//!
//! Two charts are produced for every report, including all-zero ones:
//! - a stacked bar chart of impacts per WCAG level
//! - a pie chart of level totals with one-decimal percentage labels
//!
//! Colours and label order are fixed, so identical counts render to
//! byte-identical SVG.

use crate::aggregate::AggregateSummary;
use crate::error::{ReportError, Result};
use crate::model::{Impact, WcagLevel};
use std::f64::consts::PI;
use std::fmt::Write as _;
use std::path::Path;
use tracing::debug;

const WIDTH: f64 = 640.0;
const HEIGHT: f64 = 480.0;

/// Segment colour for each impact category
pub fn impact_color(impact: Impact) -> &'static str {
    match impact {
        Impact::Critical => "#DB4437",
        Impact::Serious => "#F4B400",
        Impact::Moderate => "#FF7043",
        Impact::Minor => "#4285F4",
    }
}

/// Slice colour for each WCAG level
pub fn level_color(level: WcagLevel) -> &'static str {
    match level {
        WcagLevel::A => "#3366cc",
        WcagLevel::AA => "#dc3912",
        WcagLevel::AAA => "#ff9900",
    }
}

/// Produces the two summary charts
pub trait ChartRenderer {
    /// Stacked bar chart: x = level, segments = impact, y = count.
    fn render_bar(&self, summary: &AggregateSummary, path: &Path) -> Result<()>;

    /// Pie chart of per-level totals.
    fn render_pie(&self, summary: &AggregateSummary, path: &Path) -> Result<()>;
}

/// Writes charts as standalone SVG files
#[derive(Debug, Clone, Copy, Default)]
pub struct SvgChartRenderer;

impl ChartRenderer for SvgChartRenderer {
    fn render_bar(&self, summary: &AggregateSummary, path: &Path) -> Result<()> {
        write_chart(path, &bar_chart_svg(summary))
    }

    fn render_pie(&self, summary: &AggregateSummary, path: &Path) -> Result<()> {
        write_chart(path, &pie_chart_svg(summary))
    }
}

fn write_chart(path: &Path, svg: &str) -> Result<()> {
    debug!("Writing chart {}", path.display());
    std::fs::write(path, svg).map_err(|e| ReportError::ChartRender {
        chart: path.display().to_string(),
        reason: e.to_string(),
    })
}

fn svg_open(out: &mut String, title: &str) {
    let _ = write!(
        out,
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\" font-family=\"Arial, sans-serif\">\n\
         <rect width=\"{w}\" height=\"{h}\" fill=\"#ffffff\"/>\n\
         <text x=\"{cx}\" y=\"28\" font-size=\"16\" text-anchor=\"middle\">{title}</text>\n",
        w = WIDTH,
        h = HEIGHT,
        cx = WIDTH / 2.0,
        title = title,
    );
}

/// Axis maximum and tick step for a bar chart whose tallest bar is `max`.
fn axis_scale(max: usize) -> (usize, usize) {
    let step = max.div_ceil(5).max(1);
    (step * 5, step)
}

/// SVG source of the stacked bar chart.
pub fn bar_chart_svg(summary: &AggregateSummary) -> String {
    let (left, right, top, bottom) = (70.0, WIDTH - 150.0, 50.0, HEIGHT - 60.0);
    let plot_h = bottom - top;
    let group_w = (right - left) / WcagLevel::ALL.len() as f64;
    let bar_w = group_w * 0.5;

    let max = WcagLevel::ALL
        .iter()
        .map(|l| summary.level(*l).classified_total())
        .max()
        .unwrap_or(0);
    let (axis_max, step) = axis_scale(max);
    let scale = plot_h / axis_max as f64;

    let mut out = String::new();
    svg_open(&mut out, "Violation Summary by WCAG Level and Impact");

    // y axis with ticks
    let mut tick = 0;
    while tick <= axis_max {
        let y = bottom - tick as f64 * scale;
        let _ = writeln!(
            out,
            "<line x1=\"{:.1}\" y1=\"{y:.1}\" x2=\"{:.1}\" y2=\"{y:.1}\" stroke=\"#dddddd\"/>\n\
             <text x=\"{:.1}\" y=\"{:.1}\" font-size=\"11\" text-anchor=\"end\">{}</text>",
            left,
            right,
            left - 6.0,
            y + 4.0,
            tick,
        );
        tick += step;
    }
    let _ = writeln!(
        out,
        "<line x1=\"{left:.1}\" y1=\"{top:.1}\" x2=\"{left:.1}\" y2=\"{bottom:.1}\" stroke=\"#333333\"/>\n\
         <line x1=\"{left:.1}\" y1=\"{bottom:.1}\" x2=\"{right:.1}\" y2=\"{bottom:.1}\" stroke=\"#333333\"/>"
    );

    for (i, level) in WcagLevel::ALL.iter().enumerate() {
        let x = left + group_w * i as f64 + (group_w - bar_w) / 2.0;
        let mut y = bottom;
        for impact in Impact::ALL {
            let count = summary.get(*level, impact);
            if count == 0 {
                continue;
            }
            let h = count as f64 * scale;
            y -= h;
            let _ = writeln!(
                out,
                "<rect x=\"{x:.1}\" y=\"{y:.1}\" width=\"{bar_w:.1}\" height=\"{h:.1}\" fill=\"{}\"><title>{} {}: {}</title></rect>",
                impact_color(impact),
                level,
                impact,
                count,
            );
        }
        let _ = writeln!(
            out,
            "<text x=\"{:.1}\" y=\"{:.1}\" font-size=\"12\" text-anchor=\"middle\">{}</text>",
            x + bar_w / 2.0,
            bottom + 18.0,
            level,
        );
    }

    let _ = writeln!(
        out,
        "<text x=\"{:.1}\" y=\"{:.1}\" font-size=\"12\" text-anchor=\"middle\">WCAG Level</text>\n\
         <text x=\"18\" y=\"{:.1}\" font-size=\"12\" text-anchor=\"middle\" transform=\"rotate(-90 18 {:.1})\">Number of Violations</text>",
        (left + right) / 2.0,
        bottom + 42.0,
        (top + bottom) / 2.0,
        (top + bottom) / 2.0,
    );

    for (i, impact) in Impact::ALL.iter().enumerate() {
        let y = top + 10.0 + i as f64 * 22.0;
        let _ = writeln!(
            out,
            "<rect x=\"{:.1}\" y=\"{y:.1}\" width=\"14\" height=\"14\" fill=\"{}\"/>\n\
             <text x=\"{:.1}\" y=\"{:.1}\" font-size=\"12\">{}</text>",
            right + 20.0,
            impact_color(*impact),
            right + 40.0,
            y + 12.0,
            impact,
        );
    }

    out.push_str("</svg>\n");
    out
}

/// Percentage of `part` in `whole`, one decimal place; 0.0 for an empty whole.
pub fn percent_label(part: usize, whole: usize) -> String {
    if whole == 0 {
        return "0.0%".to_string();
    }
    format!("{:.1}%", part as f64 * 100.0 / whole as f64)
}

fn polar(cx: f64, cy: f64, r: f64, theta: f64) -> (f64, f64) {
    (cx + r * theta.cos(), cy - r * theta.sin())
}

/// SVG source of the level distribution pie chart.
pub fn pie_chart_svg(summary: &AggregateSummary) -> String {
    let (cx, cy, r) = (260.0, 255.0, 170.0);
    let totals: Vec<(WcagLevel, usize)> = WcagLevel::ALL
        .iter()
        .map(|l| (*l, summary.level(*l).classified_total()))
        .collect();
    let sum: usize = totals.iter().map(|(_, n)| n).sum();

    let mut out = String::new();
    svg_open(&mut out, "WCAG Levels Distribution");

    if sum == 0 {
        let _ = writeln!(
            out,
            "<circle cx=\"{cx:.1}\" cy=\"{cy:.1}\" r=\"{r:.1}\" fill=\"none\" stroke=\"#999999\" stroke-dasharray=\"4 4\"/>"
        );
    } else {
        // counter-clockwise from twelve o'clock
        let mut theta = PI / 2.0;
        for (level, count) in &totals {
            if *count == 0 {
                continue;
            }
            let fraction = *count as f64 / sum as f64;
            let sweep = 2.0 * PI * fraction;
            if *count == sum {
                let _ = writeln!(
                    out,
                    "<circle cx=\"{cx:.1}\" cy=\"{cy:.1}\" r=\"{r:.1}\" fill=\"{}\"/>",
                    level_color(*level)
                );
            } else {
                let (x0, y0) = polar(cx, cy, r, theta);
                let (x1, y1) = polar(cx, cy, r, theta + sweep);
                let large_arc = if sweep > PI { 1 } else { 0 };
                let _ = writeln!(
                    out,
                    "<path d=\"M {cx:.1} {cy:.1} L {x0:.1} {y0:.1} A {r:.1} {r:.1} 0 {large_arc} 0 {x1:.1} {y1:.1} Z\" fill=\"{}\" stroke=\"#ffffff\"/>",
                    level_color(*level)
                );
            }
            let (lx, ly) = polar(cx, cy, r * 0.6, theta + sweep / 2.0);
            let _ = writeln!(
                out,
                "<text x=\"{lx:.1}\" y=\"{:.1}\" font-size=\"13\" text-anchor=\"middle\" fill=\"#ffffff\">{}</text>",
                ly + 4.0,
                percent_label(*count, sum),
            );
            theta += sweep;
        }
    }

    for (i, (level, count)) in totals.iter().enumerate() {
        let y = 80.0 + i as f64 * 24.0;
        let _ = writeln!(
            out,
            "<rect x=\"480\" y=\"{y:.1}\" width=\"14\" height=\"14\" fill=\"{}\"/>\n\
             <text x=\"500\" y=\"{:.1}\" font-size=\"12\">{} ({})</text>",
            level_color(*level),
            y + 12.0,
            level,
            percent_label(*count, sum),
        );
    }

    out.push_str("</svg>\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ImpactClass;

    fn summary(cells: &[(WcagLevel, &str, usize)]) -> AggregateSummary {
        let mut summary = AggregateSummary::new();
        for (level, impact, n) in cells {
            for _ in 0..*n {
                summary.record(*level, &ImpactClass::classify(Some(*impact)));
            }
        }
        summary
    }

    #[test]
    fn test_percent_label() {
        assert_eq!(percent_label(1, 3), "33.3%");
        assert_eq!(percent_label(2, 3), "66.7%");
        assert_eq!(percent_label(0, 0), "0.0%");
    }

    #[test]
    fn test_axis_scale() {
        assert_eq!(axis_scale(0), (5, 1));
        assert_eq!(axis_scale(7), (10, 2));
        assert_eq!(axis_scale(25), (25, 5));
    }

    #[test]
    fn test_zero_counts_still_render() {
        let empty = AggregateSummary::new();
        let bar = bar_chart_svg(&empty);
        let pie = pie_chart_svg(&empty);
        assert!(bar.starts_with("<svg") && bar.ends_with("</svg>\n"));
        assert!(pie.contains("<circle"));
        assert!(pie.contains("A (0.0%)"));
        assert!(!pie.contains("<path"));
    }

    #[test]
    fn test_bar_uses_fixed_colors() {
        let s = summary(&[(WcagLevel::AA, "serious", 2), (WcagLevel::A, "critical", 1)]);
        let bar = bar_chart_svg(&s);
        assert!(bar.contains("fill=\"#F4B400\"><title>AA Serious: 2</title>"));
        assert!(bar.contains("fill=\"#DB4437\"><title>A Critical: 1</title>"));
    }

    #[test]
    fn test_pie_labels() {
        let s = summary(&[(WcagLevel::A, "minor", 1), (WcagLevel::AAA, "minor", 3)]);
        let pie = pie_chart_svg(&s);
        assert!(pie.contains("A (25.0%)"));
        assert!(pie.contains("AA (0.0%)"));
        assert!(pie.contains("AAA (75.0%)"));
        assert_eq!(pie.matches("<path").count(), 2);
    }

    #[test]
    fn test_single_level_pie_is_full_circle() {
        let s = summary(&[(WcagLevel::AA, "moderate", 4)]);
        let pie = pie_chart_svg(&s);
        assert!(pie.contains("fill=\"#dc3912\"/>"));
        assert!(pie.contains(">100.0%<"));
    }

    #[test]
    fn test_deterministic_output() {
        let s = summary(&[(WcagLevel::AAA, "minor", 5), (WcagLevel::A, "serious", 2)]);
        assert_eq!(bar_chart_svg(&s), bar_chart_svg(&s.clone()));
        assert_eq!(pie_chart_svg(&s), pie_chart_svg(&s.clone()));
    }

    #[test]
    fn test_render_to_missing_dir_fails() {
        let err = SvgChartRenderer
            .render_bar(&AggregateSummary::new(), Path::new("/nonexistent/dir/bar.svg"))
            .unwrap_err();
        assert!(matches!(err, ReportError::ChartRender { .. }));
    }
}
