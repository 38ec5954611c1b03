#![deny(missing_docs)]
//! Elevora core library.
//!
//! Turns a raw website audit document into the derived values the dashboard
//! displays: overall grade, chart series, issue totals and the active issue
//! category.

pub mod charts;
pub mod domain;
pub mod error;
pub mod fs;
pub mod grade;
pub mod issues;
pub mod report;
pub mod selector;
pub mod view;

pub use charts::{
    BarPoint, CategoryKind, LinePoint, PieSlice, TrendBaseline, TrendSummary, format_timestamp,
    page_label,
};
pub use domain::{
    AuditDocument, AuditEnvelope, AuditRequest, CategoryScore, IssuesByCategory, IssuesByElement,
    PageScore, RecommendationEntry, TimeSeries, TimeSeriesSample,
};
pub use error::{AuditError, Result};
pub use fs::{FileSystem, StdFileSystem, load_document};
pub use grade::{Grade, ScoreSummary, best_category, overall_score, summarize};
pub use issues::{
    CategoryIssueCount, ElementIssues, ExplainedRecommendation, FALLBACK_EXPLANATION, explain,
    explain_category, total_issues,
};
pub use report::{render_json, render_view_markdown};
pub use selector::CategorySelector;
pub use view::{AuditView, derive_view, derive_view_with};
