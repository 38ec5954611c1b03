//! Active issue category selection.

use serde::{Deserialize, Serialize};

use crate::domain::IssuesByCategory;

/// Which issue category the dashboard is showing.
///
/// Serializes as the selected key or `null`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "Option<String>")]
pub enum CategorySelector {
    /// No document loaded, or the loaded document has no issues.
    #[default]
    Unselected,
    /// A category key of the current document.
    Selected(String),
}

impl CategorySelector {
    /// Initial state for a freshly loaded document.
    pub fn for_document(tree: &IssuesByCategory) -> Self {
        let mut selector = Self::Unselected;
        selector.on_document_loaded(tree);
        selector
    }

    /// Reset to the first category of a new document.
    ///
    /// The previous selection is dropped even if the key still exists.
    pub fn on_document_loaded(&mut self, tree: &IssuesByCategory) {
        *self = match tree.keys().next() {
            Some(first) => Self::Selected(first.clone()),
            None => Self::Unselected,
        };
    }

    /// Select `category` if it belongs to `tree`.
    ///
    /// Unknown keys leave the state untouched and return `false`.
    pub fn select(&mut self, tree: &IssuesByCategory, category: &str) -> bool {
        if !tree.contains_key(category) {
            log::debug!("ignoring selection of unknown category `{category}`");
            return false;
        }
        *self = Self::Selected(category.to_string());
        true
    }

    /// The selected category key, if any.
    pub fn active(&self) -> Option<&str> {
        match self {
            Self::Unselected => None,
            Self::Selected(category) => Some(category),
        }
    }
}

impl From<Option<String>> for CategorySelector {
    fn from(value: Option<String>) -> Self {
        value.map_or(Self::Unselected, Self::Selected)
    }
}

impl From<CategorySelector> for Option<String> {
    fn from(value: CategorySelector) -> Self {
        match value {
            CategorySelector::Unselected => None,
            CategorySelector::Selected(category) => Some(category),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::IssuesByElement;

    fn tree(keys: &[&str]) -> IssuesByCategory {
        keys.iter()
            .map(|key| (key.to_string(), IssuesByElement::new()))
            .collect()
    }

    #[test]
    fn starts_unselected() {
        assert_eq!(CategorySelector::default(), CategorySelector::Unselected);
        assert_eq!(CategorySelector::default().active(), None);
    }

    #[test]
    fn loading_selects_first_key() {
        let selector = CategorySelector::for_document(&tree(&["perf", "seo"]));
        assert_eq!(selector.active(), Some("perf"));
    }

    #[test]
    fn loading_empty_tree_stays_unselected() {
        let selector = CategorySelector::for_document(&IssuesByCategory::new());
        assert_eq!(selector, CategorySelector::Unselected);
    }

    #[test]
    fn selection_ignores_unknown_keys() {
        let issues = tree(&["perf", "seo"]);
        let mut selector = CategorySelector::for_document(&issues);
        assert!(selector.select(&issues, "seo"));
        assert_eq!(selector.active(), Some("seo"));
        assert!(!selector.select(&issues, "nonexistent"));
        assert_eq!(selector.active(), Some("seo"));
    }

    #[test]
    fn new_document_resets_selection() {
        let first = tree(&["perf", "seo"]);
        let mut selector = CategorySelector::for_document(&first);
        selector.select(&first, "seo");

        let second = tree(&["content", "seo"]);
        selector.on_document_loaded(&second);
        assert_eq!(selector.active(), Some("content"));

        selector.on_document_loaded(&IssuesByCategory::new());
        assert_eq!(selector, CategorySelector::Unselected);
    }

    #[test]
    fn stale_click_after_reload_is_ignored() {
        let first = tree(&["perf", "seo"]);
        let mut selector = CategorySelector::for_document(&first);
        let second = tree(&["content"]);
        selector.on_document_loaded(&second);
        assert!(!selector.select(&second, "perf"));
        assert_eq!(selector.active(), Some("content"));
    }
}
