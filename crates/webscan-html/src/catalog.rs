//! HTML feature catalog
//!
//! Static table mapping structural selectors to support-database feature
//! keys. Several selectors may map to the same key (`details` and
//! `summary` are one feature); the resolver's dedup collapses them.

/// One catalog entry: a selector to probe and the feature key it detects.
#[derive(Debug, Clone, Copy)]
pub struct CatalogEntry {
    pub selector: &'static str,
    pub feature_key: &'static str,
}

const fn entry(selector: &'static str, feature_key: &'static str) -> CatalogEntry {
    CatalogEntry {
        selector,
        feature_key,
    }
}

/// Detectable HTML elements and attributes.
pub const HTML_FEATURES: &[CatalogEntry] = &[
    entry("dialog", "dialog-element"),
    entry("details", "details-element"),
    entry("summary", "details-element"),
    entry("picture", "picture-element"),
    entry("source", "picture-element"),
    entry("video", "video"),
    entry("audio", "audio"),
    entry("canvas", "canvas"),
    entry("svg", "svg"),
    entry("template", "template"),
    entry(r#"input[type="date"]"#, "input-date"),
    entry(r#"input[type="color"]"#, "input-color"),
    entry(r#"input[type="range"]"#, "input-range"),
    entry("[popover]", "popover"),
    entry("[draggable]", "draggable"),
];
