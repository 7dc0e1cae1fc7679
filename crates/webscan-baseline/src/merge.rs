//! Resolver merge step
//!
//! First-write-wins deduplication by feature name over the concatenated
//! HTML-origin and CSS-origin lists, then a lexicographic sort by name.
//! The concatenation order matters: when both origins detect a feature
//! with the same name, the HTML-origin record (with its selector) wins.

use crate::feature::BaselineFeature;
use std::collections::HashSet;

/// Merge the two origin lists into the final resolved feature list.
pub fn merge_features(
    html_features: Vec<BaselineFeature>,
    css_features: Vec<BaselineFeature>,
) -> Vec<BaselineFeature> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut merged = Vec::with_capacity(html_features.len() + css_features.len());

    for feature in html_features.into_iter().chain(css_features) {
        if seen.insert(feature.name.clone()) {
            merged.push(feature);
        }
    }

    merged.sort_by(|a, b| a.name.cmp(&b.name));
    merged
}
