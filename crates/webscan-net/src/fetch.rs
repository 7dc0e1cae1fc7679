//! Text Fetching
//!
//! Single blocking GET with a timeout and a response size cap.

use std::time::Duration;

use crate::{NetError, USER_AGENT};

/// Fetch configuration
#[derive(Debug, Clone, Copy)]
pub struct FetchOptions {
    pub timeout: Duration,
    pub max_bytes: usize,
}

impl FetchOptions {
    /// Options for fetching the page itself.
    pub fn page() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            max_bytes: 5 * 1024 * 1024,
        }
    }

    /// Options for fetching a linked stylesheet.
    pub fn stylesheet() -> Self {
        Self {
            timeout: Duration::from_secs(5),
            max_bytes: 2 * 1024 * 1024,
        }
    }
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self::page()
    }
}

/// Fetch a URL with GET and return its body as text, truncated to the
/// configured cap on a character boundary.
pub fn fetch_text(url: &str, options: FetchOptions) -> Result<String, NetError> {
    tracing::info!("HTTP GET {url}");

    let client = reqwest::blocking::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(options.timeout)
        .build()?;

    let response = client.get(url).send()?;
    let status = response.status();
    if !status.is_success() {
        return Err(NetError::HttpError {
            status: status.as_u16(),
        });
    }

    let body = response.text()?;
    Ok(truncate_to_cap(body, options.max_bytes))
}

/// Truncate to at most `max_bytes`, backing up to a char boundary.
fn truncate_to_cap(mut body: String, max_bytes: usize) -> String {
    if body.len() <= max_bytes {
        return body;
    }
    let mut cut = max_bytes;
    while cut > 0 && !body.is_char_boundary(cut) {
        cut -= 1;
    }
    tracing::warn!("response truncated from {} to {cut} bytes", body.len());
    body.truncate(cut);
    body
}
