//! Domain entities for Elevora audit documents.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::Result;

/// Recommendations grouped by element, in document order.
pub type IssuesByElement = IndexMap<String, Vec<RecommendationEntry>>;

/// Issue tree keyed by category, then element.
///
/// Iteration order is the insertion order of the JSON object the producer
/// sent, which is what "first category" refers to.
pub type IssuesByCategory = IndexMap<String, IssuesByElement>;

/// Score for a single audit category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CategoryScore {
    /// Category name, e.g. "Performance".
    pub category: String,
    /// Score percentage, 0-100.
    pub percentage: f64,
}

/// Score for a single audited page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PageScore {
    /// Absolute page URL.
    pub url: String,
    /// Score percentage, 0-100.
    pub percentage: f64,
}

/// A single scored point in time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TimeSeriesSample {
    /// Unix timestamp in seconds.
    pub timestamp: i64,
    /// Overall score at that time.
    pub score: f64,
}

/// Time series payload.
///
/// Current producers send exactly one sample object; an array of samples is
/// accepted as a real trend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TimeSeries {
    /// A lone sample.
    Single(TimeSeriesSample),
    /// Samples ordered oldest first.
    Series(Vec<TimeSeriesSample>),
}

impl TimeSeries {
    /// All samples, oldest first.
    pub fn samples(&self) -> &[TimeSeriesSample] {
        match self {
            Self::Single(sample) => std::slice::from_ref(sample),
            Self::Series(samples) => samples,
        }
    }

    /// The most recent sample, if any.
    pub fn latest(&self) -> Option<&TimeSeriesSample> {
        self.samples().last()
    }
}

/// A remediation suggestion and how often it was observed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct RecommendationEntry {
    /// Occurrence count.
    pub count: u32,
    /// Suggestion text.
    pub recommendation: String,
}

/// Raw scoring result for one audited site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AuditDocument {
    /// Per-category scores in display order.
    pub category_scores: Vec<CategoryScore>,
    /// Per-page scores; the first entry is the primary URL.
    pub page_scores: Vec<PageScore>,
    /// Score sample(s) over time.
    #[schema(value_type = Object)]
    pub time_series: TimeSeries,
    /// Issue tree keyed by category and element.
    #[schema(value_type = Object)]
    pub issues_by_category: IssuesByCategory,
}

impl AuditDocument {
    /// Parse a document from its JSON wire form.
    pub fn from_json(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    /// The primary URL, by convention the first page score.
    pub fn primary_url(&self) -> Option<&str> {
        self.page_scores.first().map(|page| page.url.as_str())
    }
}

/// Producer response wrapper around an audit document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEnvelope {
    /// The audit document.
    pub message: AuditDocument,
}

/// Request body accepted by the audit producer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AuditRequest {
    /// Site URL to audit.
    pub url: String,
    /// Crawl fan-out per domain.
    #[serde(default = "default_max_urls_per_domain")]
    pub max_urls_per_domain: u32,
    /// Maximum number of pages to audit.
    #[serde(default = "default_max_pages")]
    pub max_pages: u32,
}

impl AuditRequest {
    /// Build a request with the producer's default crawl limits.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_urls_per_domain: default_max_urls_per_domain(),
            max_pages: default_max_pages(),
        }
    }
}

fn default_max_urls_per_domain() -> u32 {
    3
}

fn default_max_pages() -> u32 {
    2
}
