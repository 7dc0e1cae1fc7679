//! WebScan Networking
//!
//! Blocking HTTP fetching for pages and stylesheets, plus stylesheet
//! discovery and assembly of everything the scanners need from a live
//! page.

mod assets;
mod fetch;

pub use assets::{PageAssets, discover_stylesheet_urls, fetch_page_assets, inline_style_blocks};
pub use fetch::{FetchOptions, fetch_text};
pub use url::Url;

/// User agent sent with every request.
pub const USER_AGENT: &str = "Mozilla/5.0 (compatible; WebScan/0.1)";

/// Network error
#[derive(Debug, thiserror::Error)]
pub enum NetError {
    #[error("HTTP error: {status}")]
    HttpError { status: u16 },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl From<reqwest::Error> for NetError {
    fn from(e: reqwest::Error) -> Self {
        NetError::Network(e.to_string())
    }
}
