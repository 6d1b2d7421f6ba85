//! # Update Operations
//!
//! In-place edits of a single element: its text content, attributes, tag
//! name, or entire child list. Each returns the previous state in the
//! outcome so the caller can offer undo.

use crate::mutations::{element_at_mut, located, MutationError, MutationOutcome};
use serde::{Deserialize, Serialize};
use weave_parser::ast::{
    is_void_element, AttributeValue, Attribute, Document, Expression, Node, Span, TextNode,
};
use weave_parser::{generate_expression, parse_expression};

/// New value for an attribute. Untagged: a JSON string, number, boolean,
/// `null`, or `{"expression": "..."}` each map to a distinct behavior.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeUpdate {
    /// `null`: remove the attribute
    Remove,
    /// `true` becomes a bare attribute, `false` removes it
    Bool(bool),
    /// Numeric expression value: `count={3}`
    Number(f64),
    /// Expression source, parsed (or carried raw): `value={draft.title}`
    Expression { expression: String },
    /// Plain string attribute: `alt="..."`
    String(String),
}

/// A replacement child: plain text or a fully formed node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NewChild {
    Text(String),
    Node(Node),
}

/// Replace the element's visible text.
///
/// Resolution order: the first non-whitespace text child; else the first
/// expression slot holding a string or template literal (the literal is
/// replaced); else an identifier/member slot, whose dynamic binding is
/// detached in favor of a literal text node; else a new text child is
/// appended.
pub fn update_text(
    doc: &mut Document,
    target_id: &str,
    text: &str,
) -> Result<MutationOutcome, MutationError> {
    let path = located(doc, target_id)?;
    let element = element_at_mut(doc, &path, target_id)?;

    for child in element.children.iter_mut() {
        if let Node::Text(existing) = child {
            if !existing.value.trim().is_empty() {
                // keep the surrounding formatting run intact
                let previous = existing.value.clone();
                let leading = &previous[..previous.len() - previous.trim_start().len()];
                let trailing = &previous[previous.trim_end().len()..];
                existing.value = format!("{}{}{}", leading, text, trailing);
                return Ok(MutationOutcome {
                    message: format!("Updated text of \"{}\"", target_id),
                    previous_text: Some(previous.trim().to_string()),
                    ..Default::default()
                });
            }
        }
    }

    for child in element.children.iter_mut() {
        if let Node::Expression(slot) = child {
            match &slot.expression {
                Expression::StringLiteral { .. } | Expression::Template { .. } => {
                    let previous = generate_expression(&slot.expression);
                    slot.expression = Expression::StringLiteral {
                        value: text.to_string(),
                    };
                    return Ok(MutationOutcome {
                        message: format!("Updated text literal of \"{}\"", target_id),
                        previous_text: Some(previous),
                        ..Default::default()
                    });
                }
                Expression::Identifier { .. } | Expression::Member { .. } => {
                    let previous = generate_expression(&slot.expression);
                    *child = Node::Text(TextNode {
                        value: text.to_string(),
                        span: Span::synthetic(),
                    });
                    return Ok(MutationOutcome {
                        message: format!(
                            "Replaced dynamic binding {{{}}} of \"{}\" with literal text",
                            previous, target_id
                        ),
                        previous_text: Some(previous),
                        ..Default::default()
                    });
                }
                _ => {}
            }
        }
    }

    element.self_closing = false;
    element.children.push(Node::Text(TextNode {
        value: text.to_string(),
        span: Span::synthetic(),
    }));
    Ok(MutationOutcome::new(format!(
        "Added text to \"{}\"",
        target_id
    )))
}

/// Set, rewrite, or remove a single attribute
pub fn update_attribute(
    doc: &mut Document,
    target_id: &str,
    name: &str,
    value: &AttributeUpdate,
) -> Result<MutationOutcome, MutationError> {
    let path = located(doc, target_id)?;
    let element = element_at_mut(doc, &path, target_id)?;
    let previous_value = element.attribute(name).map(|attr| attr.value.clone());

    let new_value = match value {
        AttributeUpdate::Remove | AttributeUpdate::Bool(false) => {
            element.remove_attribute(name);
            return Ok(MutationOutcome {
                message: format!("Removed attribute \"{}\" from \"{}\"", name, target_id),
                previous_value,
                ..Default::default()
            });
        }
        AttributeUpdate::Bool(true) => AttributeValue::Bare,
        AttributeUpdate::Number(n) => AttributeValue::Expression {
            expression: Expression::NumberLiteral { value: *n },
        },
        AttributeUpdate::String(s) => AttributeValue::String { value: s.clone() },
        AttributeUpdate::Expression { expression } => AttributeValue::Expression {
            expression: parse_expression(expression).unwrap_or(Expression::Raw {
                source: expression.clone(),
            }),
        },
    };

    match element.attribute_mut(name) {
        Some(attr) => attr.value = new_value,
        None => element.attributes.push(Attribute::new(name, new_value)),
    }

    Ok(MutationOutcome {
        message: format!("Set attribute \"{}\" on \"{}\"", name, target_id),
        previous_value,
        ..Default::default()
    })
}

/// Rename the element. The tag name is stored once, so open and close
/// forms always rename together.
pub fn update_tag_name(
    doc: &mut Document,
    target_id: &str,
    tag_name: &str,
) -> Result<MutationOutcome, MutationError> {
    if !is_valid_tag_name(tag_name) {
        return Err(MutationError::InvalidPayload(format!(
            "\"{}\" is not a valid tag name",
            tag_name
        )));
    }

    let path = located(doc, target_id)?;
    let element = element_at_mut(doc, &path, target_id)?;

    if is_void_element(tag_name) && element.children.iter().any(|c| !c.is_whitespace_text()) {
        return Err(MutationError::VoidElement(tag_name.to_string()));
    }

    let previous = std::mem::replace(&mut element.tag_name, tag_name.to_string());
    if is_void_element(tag_name) {
        element.children.clear();
        element.self_closing = true;
    }

    Ok(MutationOutcome {
        message: format!("Renamed <{}> to <{}>", previous, tag_name),
        previous_tag: Some(previous),
        ..Default::default()
    })
}

/// Replace the element's entire child list
pub fn replace_children(
    doc: &mut Document,
    target_id: &str,
    children: &[NewChild],
) -> Result<MutationOutcome, MutationError> {
    let path = located(doc, target_id)?;
    let element = element_at_mut(doc, &path, target_id)?;

    let new_children: Vec<Node> = children
        .iter()
        .map(|child| match child {
            NewChild::Text(value) => Node::Text(TextNode {
                value: value.clone(),
                span: Span::synthetic(),
            }),
            NewChild::Node(node) => node.clone(),
        })
        .collect();

    if !new_children.is_empty() && is_void_element(&element.tag_name) {
        return Err(MutationError::VoidElement(element.tag_name.clone()));
    }

    let previous = std::mem::replace(&mut element.children, new_children);
    if !element.children.is_empty() {
        element.self_closing = false;
    }

    Ok(MutationOutcome {
        message: format!(
            "Replaced children of \"{}\" with {} node(s)",
            target_id,
            element.children.len()
        ),
        removed: Some(Node::Fragment(weave_parser::ast::Fragment {
            children: previous,
            span: Span::synthetic(),
        })),
        ..Default::default()
    })
}

fn is_valid_tag_name(tag: &str) -> bool {
    let mut chars = tag.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '$' | '.' | '-'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use weave_parser::{generate, parse};

    #[test]
    fn test_update_text_literal_child() {
        let mut doc = parse("<div><h1 data-editable=\"t\">Old</h1></div>").unwrap();

        let outcome = update_text(&mut doc, "t", "New").unwrap();
        assert_eq!(
            generate(&doc).unwrap(),
            "<div><h1 data-editable=\"t\">New</h1></div>"
        );
        assert_eq!(outcome.previous_text.as_deref(), Some("Old"));
    }

    #[test]
    fn test_update_text_skips_whitespace_filler() {
        let mut doc =
            parse("<h1 data-editable=\"t\">\n  Old\n</h1>").unwrap();

        update_text(&mut doc, "t", "New").unwrap();
        assert_eq!(generate(&doc).unwrap(), "<h1 data-editable=\"t\">\n  New\n</h1>");
    }

    #[test]
    fn test_update_text_rewrites_string_literal_slot() {
        let mut doc = parse("<h1 data-editable=\"t\">{'Old'}</h1>").unwrap();

        update_text(&mut doc, "t", "New").unwrap();
        assert_eq!(generate(&doc).unwrap(), "<h1 data-editable=\"t\">{'New'}</h1>");
    }

    #[test]
    fn test_update_text_detaches_identifier_binding() {
        let mut doc = parse("<h1 data-editable=\"t\">{title}</h1>").unwrap();

        let outcome = update_text(&mut doc, "t", "Fixed").unwrap();
        assert_eq!(generate(&doc).unwrap(), "<h1 data-editable=\"t\">Fixed</h1>");
        assert_eq!(outcome.previous_text.as_deref(), Some("title"));
    }

    #[test]
    fn test_update_text_detaches_member_binding() {
        let mut doc = parse("<p data-editable=\"t\">{user.name}</p>").unwrap();

        update_text(&mut doc, "t", "Anon").unwrap();
        assert_eq!(generate(&doc).unwrap(), "<p data-editable=\"t\">Anon</p>");
    }

    #[test]
    fn test_update_text_appends_when_no_text_child() {
        let mut doc = parse("<div><span data-editable=\"t\" /></div>").unwrap();

        update_text(&mut doc, "t", "Hi").unwrap();
        assert_eq!(
            generate(&doc).unwrap(),
            "<div><span data-editable=\"t\">Hi</span></div>"
        );
    }

    #[test]
    fn test_update_attribute_kinds() {
        let mut doc = parse("<a data-editable=\"l\" href=\"#\">x</a>").unwrap();

        update_attribute(
            &mut doc,
            "l",
            "href",
            &AttributeUpdate::String("/docs".to_string()),
        )
        .unwrap();
        update_attribute(&mut doc, "l", "tabIndex", &AttributeUpdate::Number(3.0)).unwrap();
        update_attribute(&mut doc, "l", "download", &AttributeUpdate::Bool(true)).unwrap();
        update_attribute(
            &mut doc,
            "l",
            "title",
            &AttributeUpdate::Expression {
                expression: "user.name".to_string(),
            },
        )
        .unwrap();

        assert_eq!(
            generate(&doc).unwrap(),
            "<a data-editable=\"l\" href=\"/docs\" tabIndex={3} download title={user.name}>x</a>"
        );
    }

    #[test]
    fn test_update_attribute_remove_variants() {
        let mut doc =
            parse("<input data-editable=\"i\" disabled type=\"text\" />").unwrap();

        let outcome =
            update_attribute(&mut doc, "i", "disabled", &AttributeUpdate::Bool(false)).unwrap();
        assert_eq!(outcome.previous_value, Some(AttributeValue::Bare));
        update_attribute(&mut doc, "i", "type", &AttributeUpdate::Remove).unwrap();

        assert_eq!(generate(&doc).unwrap(), "<input data-editable=\"i\" />");
    }

    #[test]
    fn test_update_attribute_with_quotes_stays_parseable() {
        let mut doc = parse("<div><img data-editable=\"pic\" src=\"/a.png\" /></div>").unwrap();

        update_attribute(
            &mut doc,
            "pic",
            "alt",
            &AttributeUpdate::String("say \"hi\" loudly".to_string()),
        )
        .unwrap();

        let out = generate(&doc).unwrap();
        assert!(out.contains("alt=\"say &quot;hi&quot; loudly\""), "got {}", out);
        parse(&out).unwrap();
    }

    #[test]
    fn test_attribute_update_json_shapes() {
        assert_eq!(
            serde_json::from_str::<AttributeUpdate>("null").unwrap(),
            AttributeUpdate::Remove
        );
        assert_eq!(
            serde_json::from_str::<AttributeUpdate>("true").unwrap(),
            AttributeUpdate::Bool(true)
        );
        assert_eq!(
            serde_json::from_str::<AttributeUpdate>("4").unwrap(),
            AttributeUpdate::Number(4.0)
        );
        assert_eq!(
            serde_json::from_str::<AttributeUpdate>("\"x\"").unwrap(),
            AttributeUpdate::String("x".to_string())
        );
        assert_eq!(
            serde_json::from_str::<AttributeUpdate>("{\"expression\": \"a.b\"}").unwrap(),
            AttributeUpdate::Expression {
                expression: "a.b".to_string()
            }
        );
    }

    #[test]
    fn test_update_tag_name() {
        let mut doc = parse("<div data-editable=\"box\"><p>x</p></div>").unwrap();

        let outcome = update_tag_name(&mut doc, "box", "section").unwrap();
        assert_eq!(
            generate(&doc).unwrap(),
            "<section data-editable=\"box\"><p>x</p></section>"
        );
        assert_eq!(outcome.previous_tag.as_deref(), Some("div"));
    }

    #[test]
    fn test_update_tag_name_rejects_void_with_children() {
        let source = "<div data-editable=\"box\"><p>x</p></div>";
        let mut doc = parse(source).unwrap();

        let err = update_tag_name(&mut doc, "box", "img").unwrap_err();
        assert_eq!(err, MutationError::VoidElement("img".to_string()));
        assert_eq!(generate(&doc).unwrap(), source);
    }

    #[test]
    fn test_update_tag_name_rejects_garbage() {
        let mut doc = parse("<div data-editable=\"box\">x</div>").unwrap();
        assert!(matches!(
            update_tag_name(&mut doc, "box", "not a tag"),
            Err(MutationError::InvalidPayload(_))
        ));
    }

    #[test]
    fn test_replace_children() {
        let mut doc = parse("<ul data-editable=\"list\"><li>old</li></ul>").unwrap();

        let li = parse_snippet_node("<li>new</li>");
        replace_children(
            &mut doc,
            "list",
            &[NewChild::Node(li), NewChild::Text("tail".to_string())],
        )
        .unwrap();

        assert_eq!(
            generate(&doc).unwrap(),
            "<ul data-editable=\"list\"><li>new</li>tail</ul>"
        );
    }

    fn parse_snippet_node(source: &str) -> Node {
        weave_parser::parse_snippet(source).unwrap().remove(0)
    }
}
