//! Issue totals and recommendation explanations.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::IssuesByCategory;

/// Explanation used for recommendations missing from the dictionary.
pub const FALLBACK_EXPLANATION: &str = "Fix this issue to improve overall performance.";

/// Total occurrence count across every category, element and recommendation.
pub fn total_issues(tree: &IssuesByCategory) -> u64 {
    tree.keys().map(|category| category_total(tree, category)).sum()
}

/// Occurrence count for one category; zero for unknown keys.
pub fn category_total(tree: &IssuesByCategory, category: &str) -> u64 {
    tree.get(category)
        .map(|elements| {
            elements
                .values()
                .flatten()
                .map(|entry| u64::from(entry.count))
                .sum()
        })
        .unwrap_or(0)
}

/// Issue count for one category tab.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CategoryIssueCount {
    /// Category key.
    pub category: String,
    /// Summed occurrence count.
    pub total: u64,
}

/// Per-category totals in tree order.
pub fn category_issue_counts(tree: &IssuesByCategory) -> Vec<CategoryIssueCount> {
    tree.keys()
        .map(|category| CategoryIssueCount {
            category: category.clone(),
            total: category_total(tree, category),
        })
        .collect()
}

/// Explanation for a known recommendation, matched exactly.
pub fn known_explanation(recommendation: &str) -> Option<&'static str> {
    let text = match recommendation {
        "Optimize image size and format" => {
            "Large images increase page load time. Compress and convert to WebP format."
        }
        "Implement lazy loading for below-the-fold images" => {
            "Only load images when they enter the viewport to improve initial load time."
        }
        "Defer non-critical JavaScript" => {
            "Move non-essential scripts to load after critical content."
        }
        "Missing meta description" => {
            "Add descriptive meta descriptions to improve click-through rates from search results."
        }
        "Improve title tags with primary keywords" => {
            "Include target keywords near the beginning of your title tags."
        }
        "Add alt text to images" => {
            "Descriptive alt text helps search engines understand image content and improves accessibility."
        }
        "Improve text contrast ratios" => {
            "Ensure text is readable against its background for all users."
        }
        "Use proper heading hierarchy" => {
            "Follow H1-H6 structure to improve page semantics and accessibility."
        }
        "Add ARIA labels to interactive elements" => {
            "Make interactive elements accessible to screen readers."
        }
        _ => return None,
    };
    Some(text)
}

/// Explanation for any recommendation, falling back to a generic hint.
pub fn explain(recommendation: &str) -> &'static str {
    known_explanation(recommendation).unwrap_or(FALLBACK_EXPLANATION)
}

/// A recommendation with its explanation attached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ExplainedRecommendation {
    /// Occurrence count.
    pub count: u32,
    /// Suggestion text.
    pub recommendation: String,
    /// Human-readable explanation.
    pub explanation: String,
}

/// Recommendations for one element of a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ElementIssues {
    /// Element key, e.g. "images".
    pub element: String,
    /// Explained recommendations in document order.
    pub recommendations: Vec<ExplainedRecommendation>,
}

/// Explained issues of one category, or `None` when the key is absent.
pub fn explain_category(tree: &IssuesByCategory, category: &str) -> Option<Vec<ElementIssues>> {
    let elements = tree.get(category)?;
    Some(
        elements
            .iter()
            .map(|(element, entries)| ElementIssues {
                element: element.clone(),
                recommendations: entries
                    .iter()
                    .map(|entry| ExplainedRecommendation {
                        count: entry.count,
                        recommendation: entry.recommendation.clone(),
                        explanation: explain(&entry.recommendation).to_string(),
                    })
                    .collect(),
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{IssuesByElement, RecommendationEntry};

    fn entry(count: u32, recommendation: &str) -> RecommendationEntry {
        RecommendationEntry {
            count,
            recommendation: recommendation.to_string(),
        }
    }

    fn sample_tree() -> IssuesByCategory {
        let mut perf = IssuesByElement::new();
        perf.insert(
            "images".to_string(),
            vec![
                entry(3, "Optimize image size and format"),
                entry(2, "Implement lazy loading for below-the-fold images"),
            ],
        );
        perf.insert(
            "scripts".to_string(),
            vec![entry(4, "Defer non-critical JavaScript")],
        );
        let mut seo = IssuesByElement::new();
        seo.insert("meta".to_string(), vec![entry(1, "Write better copy")]);
        let mut tree = IssuesByCategory::new();
        tree.insert("performance".to_string(), perf);
        tree.insert("seo".to_string(), seo);
        tree
    }

    #[test]
    fn totals_fold_all_levels() {
        let tree = sample_tree();
        assert_eq!(total_issues(&tree), 10);
        assert_eq!(category_total(&tree, "performance"), 9);
        assert_eq!(category_total(&tree, "missing"), 0);
    }

    #[test]
    fn single_element_total() {
        let mut elements = IssuesByElement::new();
        elements.insert("y".to_string(), vec![entry(3, "a"), entry(2, "b")]);
        let mut tree = IssuesByCategory::new();
        tree.insert("x".to_string(), elements);
        assert_eq!(total_issues(&tree), 5);
    }

    #[test]
    fn empty_tree_totals_zero() {
        assert_eq!(total_issues(&IssuesByCategory::new()), 0);
        assert!(category_issue_counts(&IssuesByCategory::new()).is_empty());
    }

    #[test]
    fn category_counts_follow_tree_order() {
        let counts = category_issue_counts(&sample_tree());
        assert_eq!(
            counts,
            vec![
                CategoryIssueCount {
                    category: "performance".to_string(),
                    total: 9
                },
                CategoryIssueCount {
                    category: "seo".to_string(),
                    total: 1
                },
            ]
        );
    }

    #[test]
    fn explanations_match_exactly() {
        assert_eq!(
            explain("Add alt text to images"),
            "Descriptive alt text helps search engines understand image content and improves accessibility."
        );
        assert_eq!(explain("add alt text to images"), FALLBACK_EXPLANATION);
        assert_eq!(explain("Add alt text to images "), FALLBACK_EXPLANATION);
        assert!(known_explanation("Unheard of").is_none());
    }

    #[test]
    fn explain_category_enriches_entries() {
        let tree = sample_tree();
        let elements = explain_category(&tree, "performance").expect("category");
        assert_eq!(elements.len(), 2);
        assert_eq!(elements[0].element, "images");
        assert_eq!(elements[0].recommendations[1].count, 2);
        assert!(elements[1].recommendations[0]
            .explanation
            .starts_with("Move non-essential scripts"));

        let seo = explain_category(&tree, "seo").expect("category");
        assert_eq!(seo[0].recommendations[0].explanation, FALLBACK_EXPLANATION);
        assert!(explain_category(&tree, "Performance").is_none());
    }
}
