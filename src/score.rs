// src/score.rs
// =============================================================================
// Overall score: weighted mean of the category scores. Categories without a
// listed weight contribute nothing, so the crawl category stays out of the
// single-page score.
// =============================================================================

use crate::analyzers::CategoryResult;

const CATEGORY_WEIGHTS: &[(&str, f64)] = &[
    ("meta_tags", 0.10),
    ("performance", 0.09),
    ("tracking", 0.07),
    ("images", 0.07),
    ("links", 0.07),
    ("headings", 0.05),
    ("mobile", 0.06),
    ("semantic", 0.05),
    ("structured_data", 0.07),
    ("sitemap", 0.05),
    ("robots", 0.04),
    ("ads_quality", 0.08),
    ("serp_features", 0.07),
    ("accessibility", 0.13),
];

fn weight_for(category: &str) -> Option<f64> {
    CATEGORY_WEIGHTS
        .iter()
        .find(|(name, _)| *name == category)
        .map(|(_, weight)| *weight)
}

/// Weighted mean over the categories that carry a weight, rounded to the
/// nearest integer.
pub fn overall_score(categories: &[CategoryResult]) -> u8 {
    let mut weighted_sum = 0.0;
    let mut total_weight = 0.0;
    for category in categories {
        if let Some(weight) = weight_for(&category.name) {
            weighted_sum += category.score as f64 * weight;
            total_weight += weight;
        }
    }
    if total_weight == 0.0 {
        return 0;
    }
    (weighted_sum / total_weight).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn category(name: &str, score: i32) -> CategoryResult {
        CategoryResult::new(name, score, Vec::new())
    }

    #[test]
    fn test_uniform_scores_average_to_same() {
        let categories: Vec<CategoryResult> = CATEGORY_WEIGHTS
            .iter()
            .map(|(name, _)| category(name, 80))
            .collect();
        assert_eq!(overall_score(&categories), 80);
    }

    #[test]
    fn test_weights_sum_to_one() {
        let total: f64 = CATEGORY_WEIGHTS.iter().map(|(_, w)| w).sum();
        assert!((total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_unknown_category_ignored() {
        let categories = vec![category("meta_tags", 100), category("crawl", 0)];
        assert_eq!(overall_score(&categories), 100);
    }

    #[test]
    fn test_empty_input_is_zero() {
        assert_eq!(overall_score(&[]), 0);
    }

    #[test]
    fn test_heavier_categories_pull_harder() {
        // accessibility (0.13) at 0 vs robots (0.04) at 0 against a perfect rest
        let mut with_bad_accessibility: Vec<CategoryResult> = CATEGORY_WEIGHTS
            .iter()
            .map(|(name, _)| category(name, 100))
            .collect();
        let mut with_bad_robots = with_bad_accessibility.clone();
        if let Some(c) = with_bad_accessibility.iter_mut().find(|c| c.name == "accessibility") {
            c.score = 0;
        }
        if let Some(c) = with_bad_robots.iter_mut().find(|c| c.name == "robots") {
            c.score = 0;
        }
        assert!(overall_score(&with_bad_accessibility) < overall_score(&with_bad_robots));
    }
}
