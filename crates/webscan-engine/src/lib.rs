//! WebScan Engine
//!
//! End-to-end Baseline feature scanning for web pages.
//!
//! # Example
//! ```rust,ignore
//! use webscan_engine::Scanner;
//!
//! let scanner = Scanner::embedded();
//! let result = scanner.scan_url("https://example.com")?;
//! println!("{}", serde_json::to_string_pretty(&result)?);
//! ```

use serde::Serialize;
use webscan_annotate::Annotator;
use webscan_css::CssScanner;
use webscan_html::HtmlScanner;

pub use webscan_baseline::{
    BaselineFeature, BaselineStatus, BaselineSummary, SupportDb, merge_features, summarize,
};
pub use webscan_net::NetError;

// Re-export sub-crates for advanced usage
pub use webscan_annotate as annotate;
pub use webscan_baseline as baseline;
pub use webscan_css as css;
pub use webscan_html as html;
pub use webscan_net as net;

/// Engine version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Length of the markup and CSS previews in a [`ScanResult`].
const SNIPPET_CHARS: usize = 400;

/// Full scan output for one page.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanResult {
    pub html_length: usize,
    pub css_length: usize,
    pub stylesheets: usize,
    pub inline_blocks: usize,
    pub snippet: String,
    pub css_snippet: String,
    pub baseline_features: Vec<BaselineFeature>,
    pub baseline_summary: BaselineSummary,
    pub highlighted_html_content: String,
}

/// Baseline feature scanner.
pub struct Scanner<'db> {
    db: &'db SupportDb,
}

impl<'db> Scanner<'db> {
    /// Scanner backed by the embedded support database.
    pub fn embedded() -> Scanner<'static> {
        Scanner {
            db: SupportDb::embedded(),
        }
    }

    /// Scanner backed by a caller-supplied database.
    pub fn with_db(db: &'db SupportDb) -> Self {
        Self { db }
    }

    /// Detect Baseline features in markup and CSS, deduplicated and
    /// sorted by name.
    pub fn detect(&self, html: &str, css: &str) -> Vec<BaselineFeature> {
        let html_features = HtmlScanner::new(self.db).scan(html);
        let css_features = CssScanner::new(self.db).scan(css);
        merge_features(html_features, css_features)
    }

    /// Run the full pipeline over already-fetched content.
    pub fn scan_document(
        &self,
        html: &str,
        css: &str,
        stylesheets: usize,
        inline_blocks: usize,
    ) -> ScanResult {
        let features = self.detect(html, css);
        let summary = summarize(&features);
        let highlighted = Annotator::new(self.db).annotate(html, &features);

        tracing::info!(
            "scan complete: {} features ({} widely, {} newly, {} limited)",
            summary.total,
            summary.widely_available,
            summary.newly_available,
            summary.limited_availability,
        );

        ScanResult {
            html_length: html.len(),
            css_length: css.len(),
            stylesheets,
            inline_blocks,
            snippet: snippet(html),
            css_snippet: snippet(css),
            baseline_features: features,
            baseline_summary: summary,
            highlighted_html_content: highlighted,
        }
    }

    /// Fetch a page plus its stylesheets and scan it.
    pub fn scan_url(&self, url: &str) -> Result<ScanResult, NetError> {
        let assets = webscan_net::fetch_page_assets(url)?;
        Ok(self.scan_document(
            &assets.html,
            &assets.css,
            assets.stylesheets_fetched,
            assets.inline_blocks,
        ))
    }
}

fn snippet(content: &str) -> String {
    content.chars().take(SNIPPET_CHARS).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snippet_caps_at_400_chars() {
        let long = "x".repeat(1000);
        assert_eq!(snippet(&long).len(), 400);
        assert_eq!(snippet("short"), "short");
    }

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
