//! Tolerant CSS walk
//!
//! Tokenizes CSS and visits the node kinds the scanner cares about:
//! declarations, bare value identifiers, at-rules and pseudo-selectors.
//! A malformed rule is skipped without aborting the rest of the input,
//! and nested at-rule bodies (`@media`, `@supports`, ...) are walked
//! recursively.

use cssparser::{Delimiter, ParseError, Parser, ParserInput, Token};

/// A visited syntax node, carrying just enough context to build its
/// lookup key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CssNode {
    Declaration { property: String },
    ValueIdentifier { property: String, ident: String },
    AtRule { name: String },
    PseudoClass { name: String },
    PseudoElement { name: String },
}

impl CssNode {
    /// BCD-style dotted lookup key for this node.
    pub fn lookup_key(&self) -> String {
        match self {
            CssNode::Declaration { property } => format!("css.properties.{property}"),
            CssNode::ValueIdentifier { property, ident } => {
                format!("css.properties.{property}.{ident}")
            }
            CssNode::AtRule { name } => format!("css.at-rules.{name}"),
            CssNode::PseudoClass { name } => format!("css.selectors.pseudo-classes.{name}"),
            CssNode::PseudoElement { name } => format!("css.selectors.pseudo-elements.{name}"),
        }
    }
}

/// Walk a full stylesheet.
pub fn walk_stylesheet(css: &str, sink: &mut dyn FnMut(&CssNode)) {
    let mut input = ParserInput::new(css);
    let mut parser = Parser::new(&mut input);
    walk_rule_list(&mut parser, sink);
}

/// Walk a bare declaration list, as found in an inline `style` attribute.
pub fn walk_declarations(css: &str, sink: &mut dyn FnMut(&CssNode)) {
    let mut input = ParserInput::new(css);
    let mut parser = Parser::new(&mut input);
    walk_declaration_list(&mut parser, sink);
}

fn walk_rule_list<'i>(parser: &mut Parser<'i, '_>, sink: &mut dyn FnMut(&CssNode)) {
    loop {
        parser.skip_whitespace();
        if parser.is_exhausted() {
            break;
        }
        if let Err(e) = walk_rule(parser, sink) {
            tracing::warn!("skipping unparseable CSS rule: {e:?}");
            skip_to_next_rule(parser);
        }
    }
}

fn walk_rule<'i>(
    parser: &mut Parser<'i, '_>,
    sink: &mut dyn FnMut(&CssNode),
) -> Result<(), ParseError<'i, ()>> {
    let start = parser.state();
    match parser.next()?.clone() {
        Token::AtKeyword(name) => {
            sink(&CssNode::AtRule {
                name: name.to_string(),
            });
            walk_at_rule(parser, &name, sink)
        }
        _ => {
            parser.reset(&start);
            walk_qualified_rule(parser, sink)
        }
    }
}

fn walk_at_rule<'i>(
    parser: &mut Parser<'i, '_>,
    name: &str,
    sink: &mut dyn FnMut(&CssNode),
) -> Result<(), ParseError<'i, ()>> {
    let in_supports = name.eq_ignore_ascii_case("supports");
    parser.parse_until_before(
        Delimiter::CurlyBracketBlock | Delimiter::Semicolon,
        |prelude| {
            walk_at_rule_prelude(prelude, in_supports, sink);
            Ok::<(), ParseError<'i, ()>>(())
        },
    )?;
    match parser.next() {
        Ok(&Token::CurlyBracketBlock) => parser.parse_nested_block(|block| {
            walk_block(block, sink);
            Ok::<(), ParseError<'i, ()>>(())
        }),
        // Block-less at-rule (@import, @layer names;) or end of input.
        _ => Ok(()),
    }
}

fn walk_qualified_rule<'i>(
    parser: &mut Parser<'i, '_>,
    sink: &mut dyn FnMut(&CssNode),
) -> Result<(), ParseError<'i, ()>> {
    parser.parse_until_before(Delimiter::CurlyBracketBlock, |prelude| {
        walk_prelude(prelude, sink);
        Ok::<(), ParseError<'i, ()>>(())
    })?;
    match parser.next()? {
        &Token::CurlyBracketBlock => parser.parse_nested_block(|block| {
            walk_block(block, sink);
            Ok::<(), ParseError<'i, ()>>(())
        }),
        _ => Err(parser.new_custom_error(())),
    }
}

/// Scan a selector-list prelude for pseudo-classes and
/// pseudo-elements, recursing into functional arguments like
/// `:is(...)`. Only qualified-rule preludes and `selector(...)`
/// arguments are selector context; at-rule queries go through
/// [`walk_at_rule_prelude`].
fn walk_prelude<'i>(parser: &mut Parser<'i, '_>, sink: &mut dyn FnMut(&CssNode)) {
    loop {
        let token = match parser.next() {
            Ok(t) => t.clone(),
            Err(_) => break,
        };
        match token {
            Token::Colon => walk_pseudo(parser, sink),
            Token::Function(_) | Token::ParenthesisBlock | Token::SquareBracketBlock => {
                let _ = parser.parse_nested_block(|inner| {
                    walk_prelude(inner, sink);
                    Ok::<(), ParseError<'i, ()>>(())
                });
            }
            _ => {}
        }
    }
}

/// Scan an at-rule prelude. An `ident: value` pair here is a feature
/// or declaration test, never a pseudo-class, so media/import/layer
/// preludes emit nothing. `@supports` preludes emit the declarations
/// they test, and their `selector(...)` arguments are walked as
/// selector lists.
fn walk_at_rule_prelude<'i>(
    parser: &mut Parser<'i, '_>,
    in_supports: bool,
    sink: &mut dyn FnMut(&CssNode),
) {
    loop {
        let token = match parser.next() {
            Ok(t) => t.clone(),
            Err(_) => break,
        };
        match token {
            Token::Function(name) if in_supports && name.eq_ignore_ascii_case("selector") => {
                let _ = parser.parse_nested_block(|inner| {
                    walk_prelude(inner, sink);
                    Ok::<(), ParseError<'i, ()>>(())
                });
            }
            Token::ParenthesisBlock if in_supports => {
                let _ = parser.parse_nested_block(|inner| {
                    walk_supports_condition(inner, sink);
                    Ok::<(), ParseError<'i, ()>>(())
                });
            }
            Token::Function(_) | Token::ParenthesisBlock | Token::SquareBracketBlock => {
                let _ = parser.parse_nested_block(|inner| {
                    walk_at_rule_prelude(inner, in_supports, sink);
                    Ok::<(), ParseError<'i, ()>>(())
                });
            }
            _ => {}
        }
    }
}

/// Inside `@supports (...)`: either a tested declaration or a nested
/// boolean condition.
fn walk_supports_condition<'i>(parser: &mut Parser<'i, '_>, sink: &mut dyn FnMut(&CssNode)) {
    let start = parser.state();
    let mut pending = Vec::new();
    if try_walk_declaration(parser, &mut pending) {
        for node in &pending {
            sink(node);
        }
        return;
    }
    parser.reset(&start);
    loop {
        let token = match parser.next() {
            Ok(t) => t.clone(),
            Err(_) => break,
        };
        match token {
            Token::Function(name) if name.eq_ignore_ascii_case("selector") => {
                let _ = parser.parse_nested_block(|inner| {
                    walk_prelude(inner, sink);
                    Ok::<(), ParseError<'i, ()>>(())
                });
            }
            Token::ParenthesisBlock | Token::Function(_) | Token::SquareBracketBlock => {
                let _ = parser.parse_nested_block(|inner| {
                    walk_supports_condition(inner, sink);
                    Ok::<(), ParseError<'i, ()>>(())
                });
            }
            _ => {}
        }
    }
}

fn walk_pseudo<'i>(parser: &mut Parser<'i, '_>, sink: &mut dyn FnMut(&CssNode)) {
    let token = match parser.next() {
        Ok(t) => t.clone(),
        Err(_) => return,
    };
    match token {
        Token::Ident(name) => sink(&CssNode::PseudoClass {
            name: name.to_string(),
        }),
        Token::Function(name) => {
            sink(&CssNode::PseudoClass {
                name: name.to_string(),
            });
            let _ = parser.parse_nested_block(|inner| {
                walk_prelude(inner, sink);
                Ok::<(), ParseError<'i, ()>>(())
            });
        }
        Token::Colon => {
            // Second colon: pseudo-element.
            let token = match parser.next() {
                Ok(t) => t.clone(),
                Err(_) => return,
            };
            match token {
                Token::Ident(name) => sink(&CssNode::PseudoElement {
                    name: name.to_string(),
                }),
                Token::Function(name) => {
                    sink(&CssNode::PseudoElement {
                        name: name.to_string(),
                    });
                    let _ = parser.parse_nested_block(|inner| {
                        walk_prelude(inner, sink);
                        Ok::<(), ParseError<'i, ()>>(())
                    });
                }
                _ => {}
            }
        }
        _ => {}
    }
}

/// Walk a `{ ... }` body that may mix declarations with nested rules
/// (style rule bodies, `@media` bodies, keyframe blocks).
fn walk_block<'i>(parser: &mut Parser<'i, '_>, sink: &mut dyn FnMut(&CssNode)) {
    let mut pending = Vec::new();
    loop {
        parser.skip_whitespace();
        if parser.is_exhausted() {
            break;
        }
        let start = parser.state();
        pending.clear();
        if try_walk_declaration(parser, &mut pending) {
            for node in &pending {
                sink(node);
            }
        } else {
            // Not a declaration; re-walk as a nested rule.
            parser.reset(&start);
            if let Err(e) = walk_rule(parser, sink) {
                tracing::warn!("skipping unparseable nested CSS: {e:?}");
                skip_to_next_rule(parser);
            }
        }
    }
}

fn walk_declaration_list<'i>(parser: &mut Parser<'i, '_>, sink: &mut dyn FnMut(&CssNode)) {
    let mut pending = Vec::new();
    loop {
        parser.skip_whitespace();
        if parser.is_exhausted() {
            break;
        }
        pending.clear();
        if try_walk_declaration(parser, &mut pending) {
            for node in &pending {
                sink(node);
            }
        } else {
            skip_declaration(parser);
        }
    }
}

/// Attempt to consume one declaration, buffering its nodes into `out`.
/// Returns false (with `out` to be discarded) when the input turns out
/// not to be a declaration, e.g. a nested rule prelude.
fn try_walk_declaration<'i>(parser: &mut Parser<'i, '_>, out: &mut Vec<CssNode>) -> bool {
    let property = match parser.next() {
        Ok(&Token::Ident(ref name)) => name.to_string(),
        _ => return false,
    };
    if parser.try_parse(|p| p.expect_colon()).is_err() {
        return false;
    }
    out.push(CssNode::Declaration {
        property: property.clone(),
    });
    loop {
        match parser.next() {
            Err(_) => break,
            Ok(&Token::Semicolon) => break,
            // A block in value position means this was a rule prelude.
            Ok(&Token::CurlyBracketBlock) => return false,
            Ok(&Token::Ident(ref name)) => out.push(CssNode::ValueIdentifier {
                property: property.clone(),
                ident: name.to_string(),
            }),
            Ok(&Token::Function(_))
            | Ok(&Token::ParenthesisBlock)
            | Ok(&Token::SquareBracketBlock) => {
                collect_nested_idents(parser, &property, out);
            }
            Ok(_) => {}
        }
    }
    true
}

fn collect_nested_idents<'i>(parser: &mut Parser<'i, '_>, property: &str, out: &mut Vec<CssNode>) {
    let _ = parser.parse_nested_block(|inner| {
        loop {
            match inner.next() {
                Err(_) => break,
                Ok(&Token::Ident(ref name)) => out.push(CssNode::ValueIdentifier {
                    property: property.to_string(),
                    ident: name.to_string(),
                }),
                Ok(&Token::Function(_))
                | Ok(&Token::ParenthesisBlock)
                | Ok(&Token::SquareBracketBlock) => {
                    collect_nested_idents(inner, property, out);
                }
                Ok(_) => {}
            }
        }
        Ok::<(), ParseError<'i, ()>>(())
    });
}

/// Skip to the next rule (error recovery).
fn skip_to_next_rule<'i>(parser: &mut Parser<'i, '_>) {
    loop {
        match parser.next() {
            Ok(&Token::CurlyBracketBlock) => {
                let _ = parser.parse_nested_block(|p| {
                    while p.next().is_ok() {}
                    Ok::<(), ParseError<'i, ()>>(())
                });
                return;
            }
            Ok(&Token::Semicolon) | Err(_) => return,
            Ok(_) => {}
        }
    }
}

/// Skip to the end of the current declaration (error recovery).
fn skip_declaration<'i>(parser: &mut Parser<'i, '_>) {
    loop {
        match parser.next() {
            Ok(&Token::Semicolon) | Err(_) => return,
            Ok(_) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(css: &str) -> Vec<String> {
        let mut out = Vec::new();
        walk_stylesheet(css, &mut |node| out.push(node.lookup_key()));
        out
    }

    fn declaration_keys(css: &str) -> Vec<String> {
        let mut out = Vec::new();
        walk_declarations(css, &mut |node| out.push(node.lookup_key()));
        out
    }

    #[test]
    fn test_declaration_emits_property_and_value_keys() {
        assert_eq!(
            keys("a { display: grid; }"),
            vec!["css.properties.display", "css.properties.display.grid"]
        );
    }

    #[test]
    fn test_dimension_values_emit_no_value_key() {
        assert_eq!(keys("a { gap: 1rem; }"), vec!["css.properties.gap"]);
    }

    #[test]
    fn test_at_rule_key_and_nested_rules() {
        let keys = keys("@media (min-width: 10px) { a { gap: 0; } }");
        assert!(keys.contains(&"css.at-rules.media".to_string()));
        assert!(keys.contains(&"css.properties.gap".to_string()));
    }

    #[test]
    fn test_blockless_at_rule() {
        assert_eq!(keys("@import url(x.css);"), vec!["css.at-rules.import"]);
    }

    #[test]
    fn test_pseudo_class_and_element() {
        let keys = keys("a:hover { color: red; } p::before { content: ''; }");
        assert!(keys.contains(&"css.selectors.pseudo-classes.hover".to_string()));
        assert!(keys.contains(&"css.selectors.pseudo-elements.before".to_string()));
    }

    #[test]
    fn test_functional_pseudo_recurses() {
        let keys = keys(":is(a:focus-visible) { color: red; }");
        assert!(keys.contains(&"css.selectors.pseudo-classes.is".to_string()));
        assert!(keys.contains(&"css.selectors.pseudo-classes.focus-visible".to_string()));
    }

    #[test]
    fn test_identifiers_inside_functions() {
        let keys = keys("a { width: min(100px, max-content); }");
        assert!(keys.contains(&"css.properties.width.max-content".to_string()));
    }

    #[test]
    fn test_malformed_rule_does_not_abort_rest() {
        let keys = keys("a { color red } b { gap: 0; }");
        assert!(keys.contains(&"css.properties.gap".to_string()));
    }

    #[test]
    fn test_garbage_block_yields_nothing_after_recovery() {
        assert!(keys("a{invalid!!!#%}").is_empty());
    }

    #[test]
    fn test_declaration_list_walk() {
        assert_eq!(
            declaration_keys("backdrop-filter: blur(4px); display: flex"),
            vec![
                "css.properties.backdrop-filter",
                "css.properties.display",
                "css.properties.display.flex"
            ]
        );
    }

    #[test]
    fn test_media_feature_tests_are_not_pseudo_classes() {
        let keys = keys("@media (hover: hover) and (any-hover: hover) { a { color: red; } }");
        assert!(keys.contains(&"css.at-rules.media".to_string()));
        assert!(keys.contains(&"css.properties.color".to_string()));
        assert!(!keys.iter().any(|k| k.starts_with("css.selectors.")));
    }

    #[test]
    fn test_supports_condition_emits_tested_declaration() {
        let keys = keys("@supports (display: grid) and (not (gap: 0)) { b { color: red; } }");
        assert!(keys.contains(&"css.properties.display".to_string()));
        assert!(keys.contains(&"css.properties.display.grid".to_string()));
        assert!(keys.contains(&"css.properties.gap".to_string()));
        assert!(!keys.iter().any(|k| k.starts_with("css.selectors.")));
    }

    #[test]
    fn test_supports_selector_function_is_selector_context() {
        let keys = keys("@supports selector(:has(a)) { b { color: red; } }");
        assert!(keys.contains(&"css.selectors.pseudo-classes.has".to_string()));
    }

    #[test]
    fn test_keyframes_body() {
        let keys = keys("@keyframes spin { from { transform: none; } to { transform: none; } }");
        assert!(keys.contains(&"css.at-rules.keyframes".to_string()));
        assert!(keys.contains(&"css.properties.transform".to_string()));
    }
}
