//! WebScan HTML Scanner
//!
//! Probes a permissively parsed HTML document for the elements and
//! attributes in the static catalog and resolves each hit against the
//! Baseline support database. Malformed input never fails: html5ever
//! builds a best-effort tree and unmatched selectors simply yield
//! nothing.

mod catalog;

pub use catalog::{CatalogEntry, HTML_FEATURES};

use scraper::{Html, Selector};
use webscan_baseline::{BaselineFeature, SupportDb};

/// HTML feature scanner.
pub struct HtmlScanner<'db> {
    db: &'db SupportDb,
}

impl<'db> HtmlScanner<'db> {
    pub fn new(db: &'db SupportDb) -> Self {
        Self { db }
    }

    /// Scan raw HTML and return the resolved HTML-origin features, each
    /// carrying the catalog selector that matched.
    pub fn scan(&self, html: &str) -> Vec<BaselineFeature> {
        let document = Html::parse_document(html);
        let mut features = Vec::new();

        for entry in HTML_FEATURES {
            let selector = match Selector::parse(entry.selector) {
                Ok(selector) => selector,
                Err(e) => {
                    tracing::warn!("invalid catalog selector {:?}: {e}", entry.selector);
                    continue;
                }
            };
            if document.select(&selector).next().is_none() {
                continue;
            }
            if let Some(feature) = self
                .db
                .resolve_feature_key(entry.feature_key, Some(entry.selector))
            {
                features.push(feature);
            }
        }

        tracing::debug!("html scan resolved {} features", features.len());
        features
    }
}
