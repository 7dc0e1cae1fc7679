//! Page Assets
//!
//! Fetches a page and assembles everything the scanners consume: the
//! raw HTML, and all CSS reachable from it (inline `<style>` blocks
//! first, then each linked stylesheet, joined with newlines). Linked
//! stylesheets are fetched concurrently; a stylesheet that fails to
//! download contributes an empty string instead of failing the scan.

use scraper::{Html, Selector};
use url::Url;

use crate::{FetchOptions, NetError, fetch_text};

/// Everything fetched for a single page.
#[derive(Debug)]
pub struct PageAssets {
    /// Raw page markup.
    pub html: String,
    /// Inline and linked CSS, newline joined.
    pub css: String,
    /// Number of inline `<style>` blocks found.
    pub inline_blocks: usize,
    /// Number of linked stylesheets fetched successfully.
    pub stylesheets_fetched: usize,
}

/// Resolve the page's `<link rel="stylesheet">` hrefs against the page
/// URL. Unresolvable hrefs are skipped with a warning.
pub fn discover_stylesheet_urls(html: &str, base: &Url) -> Vec<Url> {
    let selector = Selector::parse(r#"link[rel="stylesheet"]"#).expect("link selector is valid");
    let document = Html::parse_document(html);

    let mut urls = Vec::new();
    for link in document.select(&selector) {
        let Some(href) = link.value().attr("href") else {
            continue;
        };
        match base.join(href) {
            Ok(url) => urls.push(url),
            Err(e) => tracing::warn!("skipping unresolvable stylesheet href {href:?}: {e}"),
        }
    }
    urls
}

/// Extract the text of every `<style>` block, in document order.
pub fn inline_style_blocks(html: &str) -> Vec<String> {
    let selector = Selector::parse("style").expect("style selector is valid");
    Html::parse_document(html)
        .select(&selector)
        .map(|el| el.text().collect::<String>())
        .collect()
}

/// Fetch a page and all CSS reachable from it.
pub fn fetch_page_assets(url: &str) -> Result<PageAssets, NetError> {
    let base = Url::parse(url).map_err(|e| NetError::InvalidUrl(e.to_string()))?;
    let html = fetch_text(base.as_str(), FetchOptions::page())?;

    let inline = inline_style_blocks(&html);
    let stylesheet_urls = discover_stylesheet_urls(&html, &base);
    tracing::info!(
        "found {} inline style blocks, {} linked stylesheets",
        inline.len(),
        stylesheet_urls.len()
    );

    // One thread per stylesheet; results stay in document order. A
    // failed fetch contributes an empty string instead of aborting.
    let fetched: Vec<Option<String>> = std::thread::scope(|scope| {
        let handles: Vec<_> = stylesheet_urls
            .iter()
            .map(|sheet_url| {
                scope.spawn(move || {
                    match fetch_text(sheet_url.as_str(), FetchOptions::stylesheet()) {
                        Ok(css) => Some(css),
                        Err(e) => {
                            tracing::warn!("failed to fetch stylesheet {sheet_url}: {e}");
                            None
                        }
                    }
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|h| h.join().unwrap_or_default())
            .collect()
    });
    let stylesheets_fetched = fetched.iter().filter(|r| r.is_some()).count();

    let css = inline
        .iter()
        .map(String::as_str)
        .chain(fetched.iter().map(|r| r.as_deref().unwrap_or("")))
        .collect::<Vec<_>>()
        .join("\n");

    Ok(PageAssets {
        html,
        css,
        inline_blocks: inline.len(),
        stylesheets_fetched,
    })
}
