//! Code generation from the document tree.
//!
//! Code segments are emitted byte-for-byte; markup blocks are regenerated
//! from their trees. Whitespace lives in the tree as text nodes, so an
//! unmutated document serializes back to its original source.

use crate::ast::*;
use std::fmt::Write;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GenerateError {
    #[error("Self-closing element <{tag_name} /> cannot have children")]
    SelfClosingWithChildren { tag_name: String },

    #[error("Void element <{tag_name}> cannot have children")]
    VoidElementWithChildren { tag_name: String },

    #[error("Element has an empty tag name")]
    EmptyTagName,
}

/// Generate source for a whole document
pub fn generate(document: &Document) -> Result<String, GenerateError> {
    let mut out = String::with_capacity(document.source.len());
    for segment in &document.segments {
        match segment {
            Segment::Code { text } => out.push_str(text),
            Segment::Markup(block) => generate_node_into(&block.root, &mut out)?,
        }
    }
    Ok(out)
}

/// Generate source for a single node, e.g. a snippet root
pub fn generate_node(node: &Node) -> Result<String, GenerateError> {
    let mut out = String::new();
    generate_node_into(node, &mut out)?;
    Ok(out)
}

fn generate_node_into(node: &Node, out: &mut String) -> Result<(), GenerateError> {
    match node {
        Node::Element(el) => generate_element(el, out),
        Node::Text(text) => {
            generate_text(&text.value, out);
            Ok(())
        }
        Node::Expression(slot) => {
            out.push('{');
            generate_expression_into(&slot.expression, out);
            out.push('}');
            Ok(())
        }
        Node::Fragment(frag) => {
            out.push_str("<>");
            for child in &frag.children {
                generate_node_into(child, out)?;
            }
            out.push_str("</>");
            Ok(())
        }
    }
}

fn generate_element(el: &Element, out: &mut String) -> Result<(), GenerateError> {
    if el.tag_name.is_empty() {
        return Err(GenerateError::EmptyTagName);
    }
    if el.self_closing && !el.children.is_empty() {
        return Err(GenerateError::SelfClosingWithChildren {
            tag_name: el.tag_name.clone(),
        });
    }
    if is_void_element(&el.tag_name) && el.children.iter().any(|c| !c.is_whitespace_text()) {
        return Err(GenerateError::VoidElementWithChildren {
            tag_name: el.tag_name.clone(),
        });
    }

    out.push('<');
    out.push_str(&el.tag_name);
    for attr in &el.attributes {
        out.push(' ');
        generate_attribute(attr, out);
    }

    if el.self_closing {
        out.push_str(" />");
        return Ok(());
    }

    out.push('>');
    for child in &el.children {
        generate_node_into(child, out)?;
    }
    out.push_str("</");
    out.push_str(&el.tag_name);
    out.push('>');
    Ok(())
}

fn generate_attribute(attr: &Attribute, out: &mut String) {
    out.push_str(&attr.name);
    match &attr.value {
        AttributeValue::Bare => {}
        AttributeValue::String { value } => {
            out.push_str("=\"");
            // parsed values never contain a quote; mutation-built values can
            for ch in value.chars() {
                match ch {
                    '"' => out.push_str("&quot;"),
                    _ => out.push(ch),
                }
            }
            out.push('"');
        }
        AttributeValue::Expression { expression } => {
            out.push_str("={");
            generate_expression_into(expression, out);
            out.push('}');
        }
    }
}

/// Text content. Parsed text never contains `<` or `{`; text built by
/// mutations gets those escaped so it cannot reopen markup. Preserved
/// `{/* ... */}` comments pass through verbatim.
fn generate_text(value: &str, out: &mut String) {
    if value.trim_start().starts_with("{/*") {
        out.push_str(value);
        return;
    }
    for ch in value.chars() {
        match ch {
            '<' => out.push_str("&lt;"),
            '{' => out.push_str("&#123;"),
            _ => out.push(ch),
        }
    }
}

/// Render an expression as it appears inside a `{ ... }` slot
pub fn generate_expression(expression: &Expression) -> String {
    let mut out = String::new();
    generate_expression_into(expression, &mut out);
    out
}

fn generate_expression_into(expression: &Expression, out: &mut String) {
    match expression {
        Expression::Identifier { name } => out.push_str(name),
        Expression::Member { object, property } => {
            generate_expression_into(object, out);
            out.push('.');
            out.push_str(property);
        }
        Expression::StringLiteral { value } => {
            out.push('\'');
            for ch in value.chars() {
                match ch {
                    '\\' => out.push_str("\\\\"),
                    '\'' => out.push_str("\\'"),
                    '\n' => out.push_str("\\n"),
                    _ => out.push(ch),
                }
            }
            out.push('\'');
        }
        Expression::Template { parts } => {
            out.push('`');
            for part in parts {
                match part {
                    TemplatePart::Literal(text) => out.push_str(text),
                    TemplatePart::Expression(expr) => {
                        out.push_str("${");
                        generate_expression_into(expr, out);
                        out.push('}');
                    }
                }
            }
            out.push('`');
        }
        Expression::NumberLiteral { value } => {
            if value.fract() == 0.0 && value.is_finite() && value.abs() < 1e15 {
                let _ = write!(out, "{}", *value as i64);
            } else {
                let _ = write!(out, "{}", value);
            }
        }
        Expression::BooleanLiteral { value } => {
            let _ = write!(out, "{}", value);
        }
        Expression::Object { entries } => {
            out.push('{');
            for (i, entry) in entries.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                if is_plain_key(&entry.key) {
                    out.push_str(&entry.key);
                } else {
                    out.push('\'');
                    out.push_str(&entry.key);
                    out.push('\'');
                }
                out.push_str(": ");
                generate_expression_into(&entry.value, out);
            }
            out.push('}');
        }
        Expression::Raw { source } => out.push_str(source),
    }
}

fn is_plain_key(key: &str) -> bool {
    let mut chars = key.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    fn roundtrip(source: &str) {
        let doc = parse(source).unwrap();
        assert_eq!(generate(&doc).unwrap(), source);
    }

    #[test]
    fn test_roundtrip_plain_markup() {
        roundtrip(r#"<div><h1 data-editable="t">Old</h1></div>"#);
    }

    #[test]
    fn test_roundtrip_whole_file() {
        roundtrip(
            "import React from 'react';\n\nexport default function Hero() {\n    return (\n        <section data-editable=\"hero\">\n            <h1>Welcome</h1>\n            <img src=\"/a.png\" alt=\"\" />\n        </section>\n    );\n}\n",
        );
    }

    #[test]
    fn test_roundtrip_expressions_and_comments() {
        roundtrip("<p>{user.name} has {count} items {/* badge */}</p>");
    }

    #[test]
    fn test_roundtrip_style_object() {
        roundtrip("<div style={{marginTop: '10px', color: 'red'}}>x</div>");
    }

    #[test]
    fn test_roundtrip_raw_expression() {
        roundtrip("<ul>{items.map(item => <li>{item}</li>)}</ul>");
    }

    #[test]
    fn test_roundtrip_fragment_and_bare_attr() {
        roundtrip("<><input disabled type=\"text\" /><br /></>");
    }

    #[test]
    fn test_roundtrip_template_literal() {
        roundtrip("<span className={`tag ${kind}`}>x</span>");
    }

    #[test]
    fn test_new_text_is_escaped() {
        let node = Node::Text(TextNode {
            value: "a < b {c}".to_string(),
            span: Span::synthetic(),
        });
        assert_eq!(generate_node(&node).unwrap(), "a &lt; b &#123;c}");
    }

    #[test]
    fn test_attribute_value_quotes_escaped() {
        let node = Node::Element(Element {
            tag_name: "img".to_string(),
            attributes: vec![Attribute::new(
                "alt",
                AttributeValue::String {
                    value: "say \"hi\" loudly".to_string(),
                },
            )],
            children: vec![],
            self_closing: true,
            span: Span::synthetic(),
        });

        let out = generate_node(&node).unwrap();
        assert_eq!(out, "<img alt=\"say &quot;hi&quot; loudly\" />");
        // the output must stay parseable
        parse(&out).unwrap();
    }

    #[test]
    fn test_self_closing_with_children_rejected() {
        let node = Node::Element(Element {
            tag_name: "img".to_string(),
            attributes: vec![],
            children: vec![Node::Text(TextNode {
                value: "x".to_string(),
                span: Span::synthetic(),
            })],
            self_closing: true,
            span: Span::synthetic(),
        });
        assert!(matches!(
            generate_node(&node),
            Err(GenerateError::SelfClosingWithChildren { .. })
        ));
    }
}
