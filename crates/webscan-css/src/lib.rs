//! WebScan CSS Scanner
//!
//! Walks stylesheet text and resolves the constructs it finds against
//! the Baseline support database. Parsing is tolerant: a malformed rule
//! never aborts the rest of the input, and a scan never fails — garbage
//! input degrades to an empty feature list.

mod walk;

pub use walk::{CssNode, walk_declarations, walk_stylesheet};

use std::collections::HashSet;
use webscan_baseline::{BaselineFeature, SupportDb};

/// CSS feature scanner.
pub struct CssScanner<'db> {
    db: &'db SupportDb,
}

impl<'db> CssScanner<'db> {
    pub fn new(db: &'db SupportDb) -> Self {
        Self { db }
    }

    /// Scan concatenated stylesheet text and return the resolved
    /// CSS-origin features.
    ///
    /// Only the first occurrence of any lookup key contributes, so a
    /// property used by a hundred rules yields one feature. Keys absent
    /// from the database are expected and skipped silently.
    pub fn scan(&self, css: &str) -> Vec<BaselineFeature> {
        if css.trim().is_empty() {
            return Vec::new();
        }

        let mut seen: HashSet<String> = HashSet::new();
        let mut features = Vec::new();
        walk_stylesheet(css, &mut |node| {
            let key = node.lookup_key();
            if !seen.insert(key.clone()) {
                return;
            }
            if let Some(feature) = self.db.resolve_css_key(&key) {
                features.push(feature);
            }
        });

        tracing::debug!(
            "css scan: {} keys attempted, {} features resolved",
            seen.len(),
            features.len()
        );
        features
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use webscan_baseline::BaselineStatus;

    const FIXTURE: &str = r#"{
        "css.properties.display": { "status": { "baseline": "high" } },
        "css.properties.display.grid": { "status": { "baseline": "high" } },
        "css.properties.gap": { "status": { "baseline": "high" } },
        "css.properties.backdrop-filter": { "status": { "baseline": "low" } },
        "css.at-rules.container": { "status": { "baseline": "low" } },
        "css.selectors.pseudo-classes.has": { "status": { "baseline": "low" } }
    }"#;

    fn db() -> SupportDb {
        SupportDb::from_json(FIXTURE).unwrap()
    }

    #[test]
    fn test_scan_empty_input() {
        let db = db();
        assert!(CssScanner::new(&db).scan("").is_empty());
        assert!(CssScanner::new(&db).scan("   \n  ").is_empty());
    }

    #[test]
    fn test_scan_resolves_property_and_value_keys_independently() {
        let db = db();
        let features = CssScanner::new(&db).scan("a{display:grid;gap:1rem}");

        let names: Vec<&str> = features.iter().map(|f| f.name.as_str()).collect();
        assert!(names.contains(&"Display"));
        assert!(names.contains(&"Grid"));
        assert!(names.contains(&"Gap"));
    }

    #[test]
    fn test_scan_suppresses_repeat_keys() {
        let db = db();
        let features = CssScanner::new(&db).scan("a{gap:1px} b{gap:2px} c{gap:3px}");
        assert_eq!(features.len(), 1);
        assert_eq!(features[0].name, "Gap");
    }

    #[test]
    fn test_scan_garbage_returns_empty() {
        let db = db();
        assert!(CssScanner::new(&db).scan("a{invalid!!!#%}").is_empty());
    }

    #[test]
    fn test_scan_feature_shape() {
        let db = db();
        let features = CssScanner::new(&db).scan("a{backdrop-filter:blur(4px)}");
        assert_eq!(features.len(), 1);

        let feature = &features[0];
        assert_eq!(feature.name, "Backdrop filter");
        assert_eq!(feature.status, BaselineStatus::NewlyAvailable);
        assert_eq!(
            feature.description.as_deref(),
            Some("CSS feature: css.properties.backdrop-filter")
        );
        assert_eq!(feature.selector, None);
        assert_eq!(
            feature.highlight_class.as_deref(),
            Some("highlight-newly-available")
        );
    }

    #[test]
    fn test_scan_at_rules_and_pseudo_classes() {
        let db = db();
        let css = "@container (min-width: 10px) { a:has(b) { gap: 0; } }";
        let features = CssScanner::new(&db).scan(css);

        let names: Vec<&str> = features.iter().map(|f| f.name.as_str()).collect();
        assert!(names.contains(&"Container"));
        assert!(names.contains(&"Has"));
        assert!(names.contains(&"Gap"));
    }
}
