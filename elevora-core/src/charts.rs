//! Chart series builders for the audit dashboard.
//!
//! Builders never fail: a malformed entry degrades to a blank label or a zero
//! value on its own, and the rest of the series is unaffected.

use chrono::DateTime;
use serde::{Deserialize, Serialize};
use url::Url;
use utoipa::ToSchema;

use crate::domain::{CategoryScore, PageScore, TimeSeries};
use crate::error::{AuditError, Result};
use crate::grade::Grade;

/// Known audit categories with a fixed chart color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CategoryKind {
    /// "Performance"
    Performance,
    /// "SEO"
    Seo,
    /// "Accessibility"
    Accessibility,
    /// "Best Practices"
    BestPractices,
    /// "Content"
    Content,
    /// Any other category name.
    Unknown,
}

impl CategoryKind {
    /// Exact, case-sensitive match on the category name.
    pub fn from_name(name: &str) -> Self {
        match name {
            "Performance" => Self::Performance,
            "SEO" => Self::Seo,
            "Accessibility" => Self::Accessibility,
            "Best Practices" => Self::BestPractices,
            "Content" => Self::Content,
            _ => Self::Unknown,
        }
    }

    /// Pie slice color as a hex string.
    pub const fn color(&self) -> &'static str {
        match self {
            Self::Performance => "#4ade80",
            Self::Seo => "#60a5fa",
            Self::Accessibility => "#f97316",
            Self::BestPractices => "#8b5cf6",
            Self::Content => "#f59e0b",
            Self::Unknown => "#94a3b8",
        }
    }
}

/// One slice of the category pie chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PieSlice {
    /// Category name.
    pub label: String,
    /// Category percentage.
    pub value: f64,
    /// Fill color.
    pub color: String,
}

/// One bar of the page comparison chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct BarPoint {
    /// Page label derived from the URL, empty when underivable.
    pub label: String,
    /// Page percentage.
    pub value: f64,
    /// Grade of the page percentage.
    pub grade: Grade,
    /// Fill color for the grade.
    pub color: String,
}

/// One point of the score trend line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct LinePoint {
    /// X-axis label.
    pub label: String,
    /// Score value.
    pub value: f64,
}

impl LinePoint {
    /// Create a new line point.
    pub fn new(label: impl Into<String>, value: f64) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}

/// Fixed historical points drawn ahead of a single live sample.
///
/// Producers only report the latest score, so the trend line is a display
/// fabrication: these points are not measurements.
#[derive(Debug, Clone, PartialEq)]
pub struct TrendBaseline {
    points: Vec<LinePoint>,
}

impl Default for TrendBaseline {
    fn default() -> Self {
        Self {
            points: vec![
                LinePoint::new("Jan", 52.0),
                LinePoint::new("Feb", 58.0),
                LinePoint::new("Mar", 61.0),
                LinePoint::new("Apr", 67.0),
            ],
        }
    }
}

impl TrendBaseline {
    /// Build a baseline from explicit points.
    pub fn new(points: Vec<LinePoint>) -> Self {
        Self { points }
    }

    /// Parse a `Label:score,Label:score` list.
    pub fn parse(raw: &str) -> Result<Self> {
        let mut points = Vec::new();
        for entry in raw.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            let (label, value) = entry
                .rsplit_once(':')
                .ok_or_else(|| AuditError::Other(format!("baseline entry `{entry}` lacks `:`")))?;
            let value: f64 = value.trim().parse().map_err(|_| {
                AuditError::Other(format!("baseline entry `{entry}` has a non-numeric score"))
            })?;
            points.push(LinePoint::new(label.trim(), value));
        }
        Ok(Self { points })
    }

    /// Baseline points, oldest first.
    pub fn points(&self) -> &[LinePoint] {
        &self.points
    }
}

/// Start, end and change of the displayed trend.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TrendSummary {
    /// First value on the line.
    pub starting_score: f64,
    /// Last value on the line.
    pub current_score: f64,
    /// `current_score - starting_score`.
    pub change: f64,
}

/// One slice per category, colored by [`CategoryKind`].
pub fn pie_series(scores: &[CategoryScore]) -> Vec<PieSlice> {
    scores
        .iter()
        .map(|item| {
            let value = if item.percentage.is_finite() && item.percentage >= 0.0 {
                item.percentage
            } else {
                log::warn!(
                    "category `{}` has unusable percentage {}; drawing an empty slice",
                    item.category,
                    item.percentage
                );
                0.0
            };
            PieSlice {
                label: item.category.clone(),
                value,
                color: CategoryKind::from_name(&item.category).color().to_string(),
            }
        })
        .collect()
}

/// One bar per page, colored by the grade of its percentage.
pub fn bar_series(pages: &[PageScore]) -> Vec<BarPoint> {
    pages
        .iter()
        .map(|page| {
            let grade = Grade::from_percentage(page.percentage);
            BarPoint {
                label: page_label(&page.url),
                value: page.percentage,
                grade,
                color: grade.color().to_string(),
            }
        })
        .collect()
}

/// Last non-empty path segment of `url` with underscores as spaces.
///
/// Unparseable URLs and URLs without a path segment yield an empty label.
pub fn page_label(url: &str) -> String {
    let parsed = match Url::parse(url) {
        Ok(parsed) => parsed,
        Err(err) => {
            log::warn!("invalid page url `{url}`: {err}");
            return String::new();
        }
    };
    parsed
        .path_segments()
        .and_then(|segments| segments.filter(|segment| !segment.is_empty()).last())
        .map(|segment| segment.replace('_', " "))
        .unwrap_or_default()
}

/// Render a Unix timestamp as a UTC calendar date, e.g. `3 May 2024`.
///
/// Timestamps outside chrono's range yield an empty label.
pub fn format_timestamp(timestamp: i64) -> String {
    match DateTime::from_timestamp(timestamp, 0) {
        Some(moment) => moment.format("%-d %b %Y").to_string(),
        None => {
            log::warn!("timestamp {timestamp} is out of range");
            String::new()
        }
    }
}

/// Trend line points.
///
/// A single sample is drawn after the baseline. Two or more samples are a
/// real trend and are drawn on their own.
pub fn line_series(series: &TimeSeries, baseline: &TrendBaseline) -> Vec<LinePoint> {
    let samples = series.samples();
    let live = samples
        .iter()
        .map(|sample| LinePoint::new(format_timestamp(sample.timestamp), sample.score));
    if samples.len() > 1 {
        return live.collect();
    }
    baseline.points().iter().cloned().chain(live).collect()
}

/// Summarize a line from its first and last points.
pub fn trend_summary(points: &[LinePoint]) -> Option<TrendSummary> {
    let first = points.first()?;
    let last = points.last()?;
    Some(TrendSummary {
        starting_score: first.value,
        current_score: last.value,
        change: last.value - first.value,
    })
}
