//! Display-ready summary of an audit document.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::charts::{
    BarPoint, LinePoint, PieSlice, TrendBaseline, TrendSummary, bar_series, format_timestamp,
    line_series, pie_series, trend_summary,
};
use crate::domain::{AuditDocument, CategoryScore, IssuesByCategory};
use crate::error::Result;
use crate::grade::{Grade, summarize};
use crate::issues::{
    CategoryIssueCount, ElementIssues, category_issue_counts, explain_category, total_issues,
};
use crate::selector::CategorySelector;

/// Everything the dashboard renders for one document.
///
/// Built once per document by [`derive_view`]; afterwards only the active
/// category changes, through [`AuditView::select_category`].
///
/// Deserializing checks the active category against the issue tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", try_from = "ViewFields")]
pub struct AuditView {
    /// Rounded mean of the category percentages.
    pub overall_score: u8,
    /// Grade of the overall score.
    pub grade: Grade,
    /// Highest scoring category, earliest on ties.
    pub best_category: CategoryScore,
    /// Sum of every recommendation count.
    pub total_issues: u64,
    /// Number of audited pages.
    pub pages_audited: usize,
    /// First audited page URL.
    pub primary_url: Option<String>,
    /// Date label of the latest sample.
    pub last_updated: String,
    /// Category pie chart.
    pub pie_series: Vec<PieSlice>,
    /// Page comparison bar chart.
    pub bar_series: Vec<BarPoint>,
    /// Score trend line, including any baseline points.
    pub line_series: Vec<LinePoint>,
    /// Start, end and change of the trend line.
    pub trend: Option<TrendSummary>,
    /// Issue totals per category tab.
    pub category_issue_counts: Vec<CategoryIssueCount>,
    /// The document's issue tree, unchanged.
    #[schema(value_type = Object)]
    pub issue_tree: IssuesByCategory,
    #[schema(value_type = Option<String>)]
    active_category: CategorySelector,
}

impl AuditView {
    /// Selected issue category key.
    pub fn active_category(&self) -> Option<&str> {
        self.active_category.active()
    }

    /// Select an issue category; stale or unknown keys are ignored.
    ///
    /// Returns whether the selection was applied.
    pub fn select_category(&mut self, category: &str) -> bool {
        self.active_category.select(&self.issue_tree, category)
    }

    /// Explained issues of the active category.
    pub fn active_issues(&self) -> Option<Vec<ElementIssues>> {
        explain_category(&self.issue_tree, self.active_category()?)
    }
}

/// Wire form of [`AuditView`] before the selection is checked.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ViewFields {
    overall_score: u8,
    grade: Grade,
    best_category: CategoryScore,
    total_issues: u64,
    pages_audited: usize,
    primary_url: Option<String>,
    last_updated: String,
    pie_series: Vec<PieSlice>,
    bar_series: Vec<BarPoint>,
    line_series: Vec<LinePoint>,
    trend: Option<TrendSummary>,
    category_issue_counts: Vec<CategoryIssueCount>,
    issue_tree: IssuesByCategory,
    active_category: CategorySelector,
}

impl TryFrom<ViewFields> for AuditView {
    type Error = String;

    fn try_from(fields: ViewFields) -> std::result::Result<Self, Self::Error> {
        match fields.active_category.active() {
            Some(category) if !fields.issue_tree.contains_key(category) => {
                return Err(format!(
                    "active category `{category}` is not in the issue tree"
                ));
            }
            None if !fields.issue_tree.is_empty() => {
                return Err("active category missing for a non-empty issue tree".to_string());
            }
            _ => {}
        }
        Ok(Self {
            overall_score: fields.overall_score,
            grade: fields.grade,
            best_category: fields.best_category,
            total_issues: fields.total_issues,
            pages_audited: fields.pages_audited,
            primary_url: fields.primary_url,
            last_updated: fields.last_updated,
            pie_series: fields.pie_series,
            bar_series: fields.bar_series,
            line_series: fields.line_series,
            trend: fields.trend,
            category_issue_counts: fields.category_issue_counts,
            issue_tree: fields.issue_tree,
            active_category: fields.active_category,
        })
    }
}

/// Derive a view using the default trend baseline.
pub fn derive_view(doc: &AuditDocument) -> Result<AuditView> {
    derive_view_with(doc, &TrendBaseline::default())
}

/// Derive a view with an explicit trend baseline.
///
/// Fails only when the document has no category scores.
pub fn derive_view_with(doc: &AuditDocument, baseline: &TrendBaseline) -> Result<AuditView> {
    let summary = summarize(&doc.category_scores)?;
    let line = line_series(&doc.time_series, baseline);
    let view = AuditView {
        overall_score: summary.overall_score,
        grade: summary.grade,
        best_category: summary.best_category,
        total_issues: total_issues(&doc.issues_by_category),
        pages_audited: doc.page_scores.len(),
        primary_url: doc.primary_url().map(str::to_string),
        last_updated: doc
            .time_series
            .latest()
            .map(|sample| format_timestamp(sample.timestamp))
            .unwrap_or_default(),
        pie_series: pie_series(&doc.category_scores),
        bar_series: bar_series(&doc.page_scores),
        trend: trend_summary(&line),
        line_series: line,
        category_issue_counts: category_issue_counts(&doc.issues_by_category),
        issue_tree: doc.issues_by_category.clone(),
        active_category: CategorySelector::for_document(&doc.issues_by_category),
    };
    log::debug!(
        "derived view: score {} ({}), {} issues",
        view.overall_score,
        view.grade,
        view.total_issues
    );
    Ok(view)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AuditError;

    const DOC: &str = r#"{
        "category_scores": [
            {"category": "Performance", "percentage": 85},
            {"category": "SEO", "percentage": 72},
            {"category": "Accessibility", "percentage": 64},
            {"category": "Best Practices", "percentage": 91},
            {"category": "Content", "percentage": 78}
        ],
        "page_scores": [
            {"url": "https://en.wikipedia.org/wiki/Muhammad_Ali_Jinnah", "percentage": 86},
            {"url": "https://en.wikipedia.org/wiki/Pakistan_Movement", "percentage": 74},
            {"url": "https://en.wikipedia.org/wiki/Partition_of_India", "percentage": 68}
        ],
        "time_series": {"timestamp": 1714918308, "score": 76},
        "issues_by_category": {
            "performance": {
                "images": [
                    {"count": 3, "recommendation": "Optimize image size and format"},
                    {"count": 2, "recommendation": "Implement lazy loading for below-the-fold images"}
                ],
                "scripts": [{"count": 4, "recommendation": "Defer non-critical JavaScript"}]
            },
            "seo": {
                "meta": [
                    {"count": 1, "recommendation": "Missing meta description"},
                    {"count": 2, "recommendation": "Improve title tags with primary keywords"}
                ],
                "content": [{"count": 3, "recommendation": "Add alt text to images"}]
            },
            "accessibility": {
                "contrast": [{"count": 5, "recommendation": "Improve text contrast ratios"}],
                "structure": [
                    {"count": 2, "recommendation": "Use proper heading hierarchy"},
                    {"count": 1, "recommendation": "Add ARIA labels to interactive elements"}
                ]
            }
        }
    }"#;

    fn sample_doc() -> AuditDocument {
        AuditDocument::from_json(DOC).expect("sample document")
    }

    #[test]
    fn derives_summary_values() {
        let view = derive_view(&sample_doc()).expect("view");
        assert_eq!(view.overall_score, 78);
        assert_eq!(view.grade, Grade::C);
        assert_eq!(view.best_category.category, "Best Practices");
        assert_eq!(view.total_issues, 23);
        assert_eq!(view.pages_audited, 3);
        assert_eq!(
            view.primary_url.as_deref(),
            Some("https://en.wikipedia.org/wiki/Muhammad_Ali_Jinnah")
        );
        assert_eq!(view.last_updated, "5 May 2024");
    }

    #[test]
    fn derives_chart_series() {
        let view = derive_view(&sample_doc()).expect("view");
        assert_eq!(view.pie_series.len(), 5);
        assert_eq!(view.bar_series[1].label, "Pakistan Movement");
        assert_eq!(view.bar_series[2].grade, Grade::D);
        assert_eq!(view.line_series.len(), 5);
        assert_eq!(view.line_series[4], LinePoint::new("5 May 2024", 76.0));
        assert_eq!(view.trend.map(|t| t.change), Some(24.0));
    }

    #[test]
    fn custom_baseline_is_used() {
        let baseline = TrendBaseline::new(vec![LinePoint::new("Last", 70.0)]);
        let view = derive_view_with(&sample_doc(), &baseline).expect("view");
        assert_eq!(view.line_series[0], LinePoint::new("Last", 70.0));
        assert_eq!(view.trend.map(|t| t.change), Some(6.0));
    }

    #[test]
    fn selects_first_category_and_switches() {
        let mut view = derive_view(&sample_doc()).expect("view");
        assert_eq!(view.active_category(), Some("performance"));
        assert!(view.select_category("seo"));
        assert_eq!(view.active_category(), Some("seo"));
        assert!(!view.select_category("nonexistent"));
        assert_eq!(view.active_category(), Some("seo"));

        let issues = view.active_issues().expect("issues");
        assert_eq!(issues[0].element, "meta");
        assert_eq!(issues[1].recommendations[0].count, 3);
    }

    #[test]
    fn selection_leaves_other_outputs_alone() {
        let mut view = derive_view(&sample_doc()).expect("view");
        let before = view.clone();
        view.select_category("accessibility");
        assert_eq!(view.overall_score, before.overall_score);
        assert_eq!(view.pie_series, before.pie_series);
        assert_eq!(view.issue_tree, before.issue_tree);
        assert_ne!(view, before);
    }

    #[test]
    fn empty_issue_tree_has_no_active_category() {
        let mut doc = sample_doc();
        doc.issues_by_category.clear();
        let view = derive_view(&doc).expect("view");
        assert_eq!(view.total_issues, 0);
        assert_eq!(view.active_category(), None);
        assert!(view.active_issues().is_none());
    }

    #[test]
    fn empty_categories_fail() {
        let mut doc = sample_doc();
        doc.category_scores.clear();
        assert!(matches!(derive_view(&doc), Err(AuditError::EmptyInput)));
    }

    #[test]
    fn serializes_camel_case_with_active_category() {
        let view = derive_view(&sample_doc()).expect("view");
        let json = serde_json::to_value(&view).expect("json");
        assert_eq!(json["overallScore"], 78);
        assert_eq!(json["grade"], "C");
        assert_eq!(json["activeCategory"], "performance");
        assert_eq!(json["bestCategory"]["category"], "Best Practices");

        let back: AuditView = serde_json::from_value(json).expect("round trip");
        assert_eq!(back.active_category(), Some("performance"));
    }

    #[test]
    fn deserializing_rejects_category_outside_issue_tree() {
        let view = derive_view(&sample_doc()).expect("view");
        let mut json = serde_json::to_value(&view).expect("json");
        json["activeCategory"] = serde_json::json!("nonexistent");

        let err = serde_json::from_value::<AuditView>(json).expect_err("unknown category");
        assert!(err.to_string().contains("`nonexistent`"), "{err}");
    }

    #[test]
    fn deserializing_requires_selection_for_non_empty_tree() {
        let view = derive_view(&sample_doc()).expect("view");
        let mut json = serde_json::to_value(&view).expect("json");
        json["activeCategory"] = serde_json::Value::Null;
        assert!(serde_json::from_value::<AuditView>(json).is_err());

        let mut doc = sample_doc();
        doc.issues_by_category.clear();
        let empty = derive_view(&doc).expect("view");
        let json = serde_json::to_value(&empty).expect("json");
        let back: AuditView = serde_json::from_value(json).expect("empty tree");
        assert_eq!(back.active_category(), None);
    }
}
