//! Report formatting utilities for audit views.

use std::fmt::Write;

use serde::Serialize;

use crate::charts::{BarPoint, LinePoint, PieSlice};
use crate::issues::ElementIssues;
use crate::view::AuditView;

/// Render an audit view as Markdown.
pub fn render_view_markdown(view: &AuditView) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "# Elevora Audit Report\n");
    append_overview(&mut output, view);
    append_categories(&mut output, &view.pie_series);
    append_pages(&mut output, &view.bar_series);
    append_trend(&mut output, &view.line_series);
    append_issues(&mut output, view);
    output
}

/// Render any serializable report payload as JSON.
pub fn render_json<T: Serialize + ?Sized>(payload: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(payload)
}

fn append_overview(output: &mut String, view: &AuditView) {
    let _ = writeln!(output, "## Overview\n");
    let _ = writeln!(
        output,
        "- Overall score: {}% (grade {}, {})",
        view.overall_score,
        view.grade,
        view.grade.description()
    );
    let _ = writeln!(
        output,
        "- Best category: {} ({}%)",
        view.best_category.category, view.best_category.percentage
    );
    let _ = writeln!(output, "- Issues found: {}", view.total_issues);
    let _ = writeln!(output, "- Pages audited: {}", view.pages_audited);
    if let Some(url) = &view.primary_url {
        let _ = writeln!(output, "- Primary URL: {url}");
    }
    if !view.last_updated.is_empty() {
        let _ = writeln!(output, "- Last updated: {}", view.last_updated);
    }
    let _ = writeln!(output);
}

fn append_categories(output: &mut String, slices: &[PieSlice]) {
    let _ = writeln!(output, "## Category Scores\n");
    for slice in slices {
        let _ = writeln!(output, "- {}: {}%", slice.label, slice.value);
    }
    let _ = writeln!(output);
}

fn append_pages(output: &mut String, bars: &[BarPoint]) {
    if bars.is_empty() {
        let _ = writeln!(output, "## Page Scores\nNo pages audited.\n");
        return;
    }
    let _ = writeln!(output, "## Page Scores\n");
    let _ = writeln!(output, "| Page | Score | Grade |");
    let _ = writeln!(output, "|------|-------|-------|");
    for bar in bars {
        let label = if bar.label.is_empty() {
            "(untitled)"
        } else {
            bar.label.as_str()
        };
        let _ = writeln!(output, "| {label} | {}% | {} |", bar.value, bar.grade);
    }
    let _ = writeln!(output);
}

fn append_trend(output: &mut String, points: &[LinePoint]) {
    if points.is_empty() {
        let _ = writeln!(output, "## Score Trend\nNo samples.\n");
        return;
    }
    let _ = writeln!(output, "## Score Trend\n");
    for point in points {
        let _ = writeln!(output, "- {}: {}%", point.label, point.value);
    }
    let _ = writeln!(output);
}

fn append_issues(output: &mut String, view: &AuditView) {
    let _ = writeln!(output, "## Issues & Recommendations\n");
    if view.category_issue_counts.is_empty() {
        let _ = writeln!(output, "No issues found.\n");
        return;
    }
    for count in &view.category_issue_counts {
        let marker = if view.active_category() == Some(count.category.as_str()) {
            " (selected)"
        } else {
            ""
        };
        let _ = writeln!(output, "- {}: {}{marker}", count.category, count.total);
    }
    let _ = writeln!(output);
    if let (Some(active), Some(elements)) = (view.active_category(), view.active_issues()) {
        let _ = writeln!(output, "### {active}\n");
        append_elements(output, &elements);
    }
}

fn append_elements(output: &mut String, elements: &[ElementIssues]) {
    for element in elements {
        let _ = writeln!(output, "#### {}", element.element);
        for item in &element.recommendations {
            let _ = writeln!(
                output,
                "- {}x {}: {}",
                item.count, item.recommendation, item.explanation
            );
        }
        let _ = writeln!(output);
    }
}
