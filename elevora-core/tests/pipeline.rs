//! End-to-end checks of the audit view derivation.

use elevora_core::{
    AuditDocument, AuditError, CategoryScore, Grade, TimeSeries, TimeSeriesSample, derive_view,
    overall_score,
};
use proptest::prelude::*;

fn document(categories: &[(&str, f64)], issues: &str) -> AuditDocument {
    let category_scores = categories
        .iter()
        .map(|(name, percentage)| serde_json::json!({"category": name, "percentage": percentage}))
        .collect::<Vec<_>>();
    let raw = serde_json::json!({
        "category_scores": category_scores,
        "page_scores": [
            {"url": "https://example.com/foo/bar_baz", "percentage": 81},
            {"url": "definitely not a url", "percentage": 42.5}
        ],
        "time_series": {"timestamp": 1714694400, "score": 64},
        "issues_by_category": serde_json::from_str::<serde_json::Value>(issues).expect("issues"),
    });
    AuditDocument::from_json(&raw.to_string()).expect("document")
}

fn scores(values: &[f64]) -> Vec<CategoryScore> {
    values
        .iter()
        .enumerate()
        .map(|(index, percentage)| CategoryScore {
            category: format!("c{index}"),
            percentage: *percentage,
        })
        .collect()
}

/// Percentages with two decimals, in hundredths, paired with a shuffled copy.
fn hundredths_and_shuffle() -> impl Strategy<Value = (Vec<u32>, Vec<u32>)> {
    prop::collection::vec(0u32..=10_000, 1..12)
        .prop_flat_map(|values| (Just(values.clone()), Just(values).prop_shuffle()))
}

fn percentages(hundredths: &[u32]) -> Vec<f64> {
    hundredths
        .iter()
        .map(|value| f64::from(*value) / 100.0)
        .collect()
}

#[test]
fn tied_best_category_keeps_input_order() {
    let doc = document(&[("A", 90.0), ("B", 90.0)], "{}");
    let view = derive_view(&doc).expect("view");
    assert_eq!(view.best_category.category, "A");
    assert_eq!(view.overall_score, 90);
    assert_eq!(view.grade, Grade::A);
}

#[test]
fn total_issues_sums_counts() {
    let doc = document(
        &[("SEO", 70.0)],
        r#"{"x": {"y": [{"count": 3, "recommendation": "a"}, {"count": 2, "recommendation": "b"}]}}"#,
    );
    assert_eq!(derive_view(&doc).expect("view").total_issues, 5);
}

#[test]
fn bar_labels_degrade_per_item() {
    let view = derive_view(&document(&[("SEO", 70.0)], "{}")).expect("view");
    assert_eq!(view.bar_series[0].label, "bar baz");
    assert_eq!(view.bar_series[1].label, "");
    assert_eq!(view.bar_series[1].value, 42.5);
    assert_eq!(view.bar_series[1].grade, Grade::F);
}

#[test]
fn selector_follows_clicks_and_ignores_unknown_keys() {
    let doc = document(
        &[("SEO", 70.0)],
        r#"{"perf": {"images": []}, "seo": {"meta": []}}"#,
    );
    let mut view = derive_view(&doc).expect("view");
    assert_eq!(view.active_category(), Some("perf"));
    view.select_category("seo");
    assert_eq!(view.active_category(), Some("seo"));
    view.select_category("nonexistent");
    assert_eq!(view.active_category(), Some("seo"));
}

#[test]
fn reloading_selects_new_first_category() {
    let first = document(&[("SEO", 70.0)], r#"{"perf": {}, "seo": {}}"#);
    let mut view = derive_view(&first).expect("view");
    view.select_category("seo");

    let second = document(&[("SEO", 70.0)], r#"{"content": {}, "seo": {}}"#);
    let view = derive_view(&second).expect("view");
    assert_eq!(view.active_category(), Some("content"));
}

#[test]
fn half_point_mean_rounds_up_in_any_order() {
    let values = [3.88, 0.6, 54.52, 78.7, 59.8];
    let shuffled = [54.52, 78.7, 59.8, 3.88, 0.6];
    assert_eq!(overall_score(&scores(&values)).expect("score"), 40);
    assert_eq!(overall_score(&scores(&shuffled)).expect("score"), 40);

    let doc = document(
        &[("a", 54.52), ("b", 78.7), ("c", 59.8), ("d", 3.88), ("e", 0.6)],
        "{}",
    );
    assert_eq!(derive_view(&doc).expect("view").overall_score, 40);
}

#[test]
fn empty_categories_raise_empty_input() {
    let doc = document(&[], r#"{"perf": {}}"#);
    assert!(matches!(derive_view(&doc), Err(AuditError::EmptyInput)));
}

#[test]
fn real_series_replaces_baseline() {
    let mut doc = document(&[("SEO", 70.0)], "{}");
    doc.time_series = TimeSeries::Series(vec![
        TimeSeriesSample {
            timestamp: 1714694400,
            score: 50.0,
        },
        TimeSeriesSample {
            timestamp: 1714918308,
            score: 64.0,
        },
    ]);
    let view = derive_view(&doc).expect("view");
    assert_eq!(view.line_series.len(), 2);
    assert_eq!(view.last_updated, "5 May 2024");
    assert_eq!(view.trend.map(|t| t.change), Some(14.0));
}

proptest! {
    #[test]
    fn overall_score_ignores_order((values, shuffled) in hundredths_and_shuffle()) {
        let expected = overall_score(&scores(&percentages(&values))).expect("score");
        prop_assert_eq!(overall_score(&scores(&percentages(&shuffled))).expect("score"), expected);
    }

    #[test]
    fn overall_score_matches_exact_half_up_mean(values in prop::collection::vec(0u32..=10_000, 1..12)) {
        let sum: u64 = values.iter().map(|value| u64::from(*value)).sum();
        let count = values.len() as u64;
        // mean = sum / (100 * count), rounded half up in integer arithmetic
        let exact = (2 * sum + 100 * count) / (200 * count);
        let score = overall_score(&scores(&percentages(&values))).expect("score");
        prop_assert_eq!(u64::from(score), exact);
    }

    #[test]
    fn overall_score_is_rounded_mean(values in prop::collection::vec(0.0f64..=100.0, 1..12)) {
        let mean = values.iter().sum::<f64>() / values.len() as f64;
        let score = overall_score(&scores(&values)).expect("score");
        prop_assert!(score <= 100);
        prop_assert!((f64::from(score) - mean).abs() <= 0.5 + 1e-9);
    }

    #[test]
    fn empty_input_only_for_empty_lists(values in prop::collection::vec(-50.0f64..=150.0, 0..6)) {
        let result = overall_score(&scores(&values));
        prop_assert_eq!(result.is_err(), values.is_empty());
    }

    #[test]
    fn every_integer_score_has_a_grade(score in 0u8..=100) {
        let grade = Grade::from_score(score);
        let expected = match score {
            90..=100 => Grade::A,
            80..=89 => Grade::B,
            70..=79 => Grade::C,
            60..=69 => Grade::D,
            _ => Grade::F,
        };
        prop_assert_eq!(grade, expected);
    }
}
