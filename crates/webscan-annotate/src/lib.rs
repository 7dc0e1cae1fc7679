//! WebScan Markup Annotator
//!
//! Re-walks the original HTML and injects highlight metadata for the
//! resolved feature list: highlight classes and identification
//! attributes on matching elements, plus aggregate markers on `<style>`
//! blocks and elements with inline `style` attributes whose CSS matches
//! detected features. Each pass is independent and additive; the output
//! is the full re-serialized document.

use ego_tree::NodeId;
use html5ever::tendril::StrTendril;
use html5ever::{LocalName, QualName, namespace_url, ns};
use scraper::{Html, Node, Selector};
use webscan_baseline::{BaselineFeature, SupportDb};
use webscan_css::{CssNode, walk_declarations, walk_stylesheet};

/// Attribute identifying the feature an element was highlighted for.
pub const FEATURE_ATTR: &str = "data-baseline-feature";
/// Attribute carrying the feature's status label.
pub const STATUS_ATTR: &str = "data-baseline-status";
/// Count of distinct highlight classes applied to a `<style>` block.
pub const STYLE_COUNT_ATTR: &str = "data-baseline-css-features";
/// Count of distinct highlight classes applied for an inline `style`.
pub const INLINE_COUNT_ATTR: &str = "data-baseline-inline-features";

/// Markup annotator.
pub struct Annotator<'db> {
    db: &'db SupportDb,
}

impl<'db> Annotator<'db> {
    pub fn new(db: &'db SupportDb) -> Self {
        Self { db }
    }

    /// Annotate `html` with highlight metadata for `features` and return
    /// the re-serialized document.
    pub fn annotate(&self, html: &str, features: &[BaselineFeature]) -> String {
        let mut document = Html::parse_document(html);
        self.highlight_elements(&mut document, features);
        self.highlight_style_blocks(&mut document, features);
        self.highlight_inline_styles(&mut document, features);
        document.html()
    }

    /// Pass 1: add highlight class and identification attributes to every
    /// node matching a feature's selector. The first feature using a
    /// selector wins; invalid selectors are skipped without aborting the
    /// rest.
    fn highlight_elements(&self, document: &mut Html, features: &[BaselineFeature]) {
        let mut selector_map: Vec<(&str, &BaselineFeature)> = Vec::new();
        for feature in features {
            if feature.highlight_class.is_none() {
                continue;
            }
            if let Some(selector) = feature.selector.as_deref() {
                if !selector_map.iter().any(|(s, _)| *s == selector) {
                    selector_map.push((selector, feature));
                }
            }
        }

        for (selector_str, feature) in selector_map {
            let selector = match Selector::parse(selector_str) {
                Ok(selector) => selector,
                Err(e) => {
                    tracing::warn!("skipping invalid selector {selector_str:?}: {e}");
                    continue;
                }
            };
            let Some(class) = feature.highlight_class.as_deref() else {
                continue;
            };

            let ids: Vec<NodeId> = document.select(&selector).map(|el| el.id()).collect();
            for id in ids {
                append_classes(document, id, class);
                set_attr(document, id, FEATURE_ATTR, &feature.name);
                set_attr(document, id, STATUS_ATTR, feature.status.label());
            }
        }
    }

    /// Pass 2: re-walk every non-empty `<style>` block and mark it with
    /// the highlight classes of the resolved features its CSS matches.
    fn highlight_style_blocks(&self, document: &mut Html, features: &[BaselineFeature]) {
        let selector = Selector::parse("style").expect("style selector is valid");
        let blocks: Vec<(NodeId, String)> = document
            .select(&selector)
            .map(|el| (el.id(), el.text().collect::<String>()))
            .collect();

        for (id, css) in blocks {
            if css.trim().is_empty() {
                continue;
            }
            let classes = self.matched_classes(features, |sink| walk_stylesheet(&css, sink));
            if classes.is_empty() {
                continue;
            }
            append_classes(document, id, &classes.join(" "));
            set_attr(document, id, STYLE_COUNT_ATTR, &classes.len().to_string());
        }
    }

    /// Pass 3: same matching for inline `style` attributes, parsed as
    /// bare declaration lists.
    fn highlight_inline_styles(&self, document: &mut Html, features: &[BaselineFeature]) {
        let selector = Selector::parse("[style]").expect("style-attribute selector is valid");
        let nodes: Vec<(NodeId, String)> = document
            .select(&selector)
            .filter_map(|el| el.value().attr("style").map(|s| (el.id(), s.to_string())))
            .collect();

        for (id, css) in nodes {
            if css.trim().is_empty() {
                continue;
            }
            let classes = self.matched_classes(features, |sink| walk_declarations(&css, sink));
            if classes.is_empty() {
                continue;
            }
            append_classes(document, id, &classes.join(" "));
            set_attr(document, id, INLINE_COUNT_ATTR, &classes.len().to_string());
        }
    }

    /// Run a CSS walk and collect the distinct highlight classes of the
    /// resolved features it matches, by feature name, preserving first
    /// encounter order.
    fn matched_classes<F>(&self, features: &[BaselineFeature], walk: F) -> Vec<String>
    where
        F: FnOnce(&mut dyn FnMut(&CssNode)),
    {
        let mut classes: Vec<String> = Vec::new();
        walk(&mut |node| {
            let key = node.lookup_key();
            let Some(candidate) = self.db.resolve_css_key(&key) else {
                return;
            };
            let Some(matching) = features.iter().find(|f| f.name == candidate.name) else {
                return;
            };
            if let Some(class) = matching.highlight_class.as_deref() {
                if !classes.iter().any(|c| c == class) {
                    classes.push(class.to_string());
                }
            }
        });
        classes
    }
}

fn attr_name(local: &str) -> QualName {
    QualName::new(None, ns!(), LocalName::from(local))
}

/// Append space-joined classes to a node's class attribute, creating the
/// attribute if absent.
fn append_classes(document: &mut Html, id: NodeId, classes: &str) {
    let Some(mut node) = document.tree.get_mut(id) else {
        return;
    };
    if let Node::Element(element) = node.value() {
        let name = attr_name("class");
        let value = match element.attrs.get(&name) {
            Some(existing) if !existing.is_empty() => format!("{existing} {classes}"),
            _ => classes.to_string(),
        };
        element.attrs.insert(name, StrTendril::from(value.as_str()));
    }
}

fn set_attr(document: &mut Html, id: NodeId, name: &str, value: &str) {
    let Some(mut node) = document.tree.get_mut(id) else {
        return;
    };
    if let Node::Element(element) = node.value() {
        element.attrs.insert(attr_name(name), StrTendril::from(value));
    }
}
