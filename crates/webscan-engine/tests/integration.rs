//! Integration tests - Full pipeline from page content to scan output
//!
//! Tests the complete workflow: HTML + CSS → detection → merge →
//! summary → annotated markup → JSON.

use webscan_engine::{BaselineStatus, Scanner};

// ============================================================================
// FULL PIPELINE TESTS
// ============================================================================

const PAGE: &str = r#"
    <!DOCTYPE html>
    <html>
    <head>
        <title>Demo</title>
        <style>
            .card { gap: 1rem; backdrop-filter: blur(4px); }
            @container (min-width: 400px) { .card { padding: 2rem; } }
        </style>
    </head>
    <body>
        <dialog open>Hello</dialog>
        <details><summary>More</summary><p>Text</p></details>
        <div style="backdrop-filter: blur(2px)">Frosted</div>
    </body>
    </html>
"#;

const CSS: &str = r#"
    .card { gap: 1rem; backdrop-filter: blur(4px); }
    @container (min-width: 400px) { .card { padding: 2rem; } }
    a:hover { color: red; }
"#;

#[test]
fn test_full_scan_detects_both_origins() {
    let result = Scanner::embedded().scan_document(PAGE, CSS, 0, 1);

    let names: Vec<&str> = result
        .baseline_features
        .iter()
        .map(|f| f.name.as_str())
        .collect();
    assert!(names.contains(&"<dialog>"));
    assert!(names.contains(&"<details> and <summary>"));
    assert!(names.contains(&"Gap"));
    assert!(names.contains(&"Backdrop filter"));
    assert!(names.contains(&"Hover"));
}

#[test]
fn test_features_are_sorted_and_unique() {
    let result = Scanner::embedded().scan_document(PAGE, CSS, 0, 1);
    let names: Vec<&str> = result
        .baseline_features
        .iter()
        .map(|f| f.name.as_str())
        .collect();

    let mut sorted = names.clone();
    sorted.sort();
    sorted.dedup();
    assert_eq!(names, sorted);
}

#[test]
fn test_summary_partitions_features() {
    let result = Scanner::embedded().scan_document(PAGE, CSS, 0, 1);
    let summary = &result.baseline_summary;

    assert_eq!(summary.total, result.baseline_features.len());

    let unknown = result
        .baseline_features
        .iter()
        .filter(|f| f.status == BaselineStatus::Unknown)
        .count();
    assert_eq!(
        summary.widely_available + summary.newly_available + summary.limited_availability + unknown,
        summary.total
    );
}

#[test]
fn test_highlighted_markup_carries_annotations() {
    let result = Scanner::embedded().scan_document(PAGE, CSS, 0, 1);
    let highlighted = &result.highlighted_html_content;

    assert!(highlighted.contains("highlight-widely-available"));
    assert!(highlighted.contains(r#"data-baseline-feature="<dialog>""#));
    // The style block matches Gap and Backdrop filter.
    assert!(highlighted.contains("data-baseline-css-features"));
    // The inline style matches Backdrop filter.
    assert!(highlighted.contains(r#"data-baseline-inline-features="1""#));
}

#[test]
fn test_lengths_and_snippets() {
    let result = Scanner::embedded().scan_document(PAGE, CSS, 2, 1);

    assert_eq!(result.html_length, PAGE.len());
    assert_eq!(result.css_length, CSS.len());
    assert_eq!(result.stylesheets, 2);
    assert_eq!(result.inline_blocks, 1);
    assert!(result.snippet.chars().count() <= 400);
    assert!(PAGE.starts_with(&result.snippet));
}

#[test]
fn test_json_output_is_camel_case() {
    let result = Scanner::embedded().scan_document("<dialog></dialog>", "", 0, 0);
    let json = serde_json::to_value(&result).unwrap();

    assert!(json.get("htmlLength").is_some());
    assert!(json.get("cssLength").is_some());
    assert!(json.get("baselineFeatures").is_some());
    assert!(json.get("baselineSummary").is_some());
    assert!(json.get("highlightedHtmlContent").is_some());
    assert!(json["baselineSummary"].get("widelyAvailable").is_some());

    let feature = &json["baselineFeatures"][0];
    assert!(feature.get("highlightClass").is_some());
    assert_eq!(feature["status"], "Widely available");
}

#[test]
fn test_empty_page_yields_empty_scan() {
    let result = Scanner::embedded().scan_document("", "", 0, 0);

    assert!(result.baseline_features.is_empty());
    assert_eq!(result.baseline_summary.total, 0);
    assert_eq!(result.html_length, 0);
}
