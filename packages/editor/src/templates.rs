//! # Node Builder / Template Resolver
//!
//! Turns an [`ElementSpec`] — a literal node, a named template, or a raw
//! markup snippet — into a tree ready for insertion. Templates take a named
//! parameter record rather than positional arguments, so callers never guess
//! which string lands where. Fresh identities are assigned against the
//! document's existing `data-editable` values.

use crate::locator;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;
use weave_common::visitor::{walk_element_mut, VisitorMut};
use weave_parser::ast::{
    Attribute, AttributeValue, Element, Node, Span, TextNode, EDITABLE_ATTR,
};
use weave_parser::{parse_snippet, ParseError};

/// What to build
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ElementSpec {
    /// A fully formed node, used as-is
    Node(Node),

    /// A registered template instantiated with named parameters
    Template {
        name: String,
        #[serde(default)]
        params: TemplateParams,
    },

    /// Raw markup parsed standalone; must have exactly one root
    Snippet {
        source: String,
        #[serde(default)]
        editable_prefix: Option<String>,
    },
}

/// Named template parameters. Unset fields fall back to per-template
/// defaults.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TemplateParams {
    pub text: Option<String>,
    /// Heading level, clamped to 1..=6
    pub level: Option<u8>,
    pub src: Option<String>,
    pub alt: Option<String>,
    pub href: Option<String>,
    pub class_name: Option<String>,
    /// Identity assigned verbatim
    pub editable_id: Option<String>,
    /// Assign a fresh identity unique in the document: `prefix-1`, ...
    pub editable_prefix: Option<String>,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TemplateError {
    #[error("Unknown template \"{0}\"")]
    UnknownTemplate(String),

    #[error("Snippet contains no markup")]
    EmptySnippet,

    #[error("Snippet must have a single root element")]
    MultipleRoots,

    #[error("Snippet parse failed: {0}")]
    Snippet(#[from] ParseError),
}

/// Resolve a spec into an insertable node
pub fn resolve(
    doc: &weave_parser::ast::Document,
    spec: &ElementSpec,
) -> Result<Node, TemplateError> {
    match spec {
        ElementSpec::Node(node) => Ok(node.clone()),
        ElementSpec::Template { name, params } => build_template(doc, name, params),
        ElementSpec::Snippet {
            source,
            editable_prefix,
        } => resolve_snippet(doc, source, editable_prefix.as_deref()),
    }
}

fn build_template(
    doc: &weave_parser::ast::Document,
    name: &str,
    params: &TemplateParams,
) -> Result<Node, TemplateError> {
    let text = |default: &str| params.text.clone().unwrap_or_else(|| default.to_string());

    let mut element = match name {
        "heading" => {
            let level = params.level.unwrap_or(2).clamp(1, 6);
            element(format!("h{}", level), vec![], vec![text_node(&text("Heading"))])
        }
        "paragraph" => element("p", vec![], vec![text_node(&text("Paragraph"))]),
        "button" => element("button", vec![], vec![text_node(&text("Button"))]),
        "link" => element(
            "a",
            vec![string_attr("href", params.href.as_deref().unwrap_or("#"))],
            vec![text_node(&text("Link"))],
        ),
        "image" => {
            let mut el = element(
                "img",
                vec![
                    string_attr("src", params.src.as_deref().unwrap_or("")),
                    string_attr("alt", params.alt.as_deref().unwrap_or("")),
                ],
                vec![],
            );
            el.self_closing = true;
            el
        }
        "container" => element("div", vec![], vec![]),
        "section" => element("section", vec![], vec![]),
        "heroSection" => element(
            "section",
            vec![string_attr("className", "hero")],
            vec![
                Node::Element(element("h1", vec![], vec![text_node(&text("Welcome"))])),
                Node::Element(element(
                    "p",
                    vec![],
                    vec![text_node("Start editing this section.")],
                )),
            ],
        ),
        other => return Err(TemplateError::UnknownTemplate(other.to_string())),
    };

    if let Some(class_name) = &params.class_name {
        set_string_attr(&mut element, "className", class_name);
    }

    if let Some(id) = &params.editable_id {
        set_string_attr(&mut element, EDITABLE_ATTR, id);
    } else if let Some(prefix) = &params.editable_prefix {
        let mut used = existing_ids(doc);
        let id = fresh_id(&mut used, prefix);
        set_string_attr(&mut element, EDITABLE_ATTR, &id);
    }

    Ok(Node::Element(element))
}

fn resolve_snippet(
    doc: &weave_parser::ast::Document,
    source: &str,
    editable_prefix: Option<&str>,
) -> Result<Node, TemplateError> {
    let mut roots: Vec<Node> = parse_snippet(source)?
        .into_iter()
        .filter(|node| !node.is_whitespace_text())
        .collect();

    let mut root = match roots.len() {
        0 => return Err(TemplateError::EmptySnippet),
        1 => roots.remove(0),
        _ => return Err(TemplateError::MultipleRoots),
    };

    if let Some(prefix) = editable_prefix {
        let mut assigner = IdentityAssigner {
            used: existing_ids(doc),
            prefix,
        };
        assigner.visit_node_mut(&mut root);
    }

    Ok(root)
}

/// Gives every element lacking a `data-editable` attribute a fresh one
struct IdentityAssigner<'a> {
    used: HashSet<String>,
    prefix: &'a str,
}

impl VisitorMut for IdentityAssigner<'_> {
    fn visit_element_mut(&mut self, element: &mut Element) {
        if element.attribute(EDITABLE_ATTR).is_none() {
            let id = fresh_id(&mut self.used, self.prefix);
            element
                .attributes
                .push(string_attr(EDITABLE_ATTR, &id));
        }
        walk_element_mut(self, element);
    }
}

fn existing_ids(doc: &weave_parser::ast::Document) -> HashSet<String> {
    locator::find_all_editable(doc)
        .into_iter()
        .map(|entry| entry.id)
        .collect()
}

fn fresh_id(used: &mut HashSet<String>, prefix: &str) -> String {
    let mut n = 1usize;
    loop {
        let candidate = format!("{}-{}", prefix, n);
        if used.insert(candidate.clone()) {
            return candidate;
        }
        n += 1;
    }
}

fn element(tag: impl Into<String>, attributes: Vec<Attribute>, children: Vec<Node>) -> Element {
    Element {
        tag_name: tag.into(),
        attributes,
        children,
        self_closing: false,
        span: Span::synthetic(),
    }
}

fn text_node(value: &str) -> Node {
    Node::Text(TextNode {
        value: value.to_string(),
        span: Span::synthetic(),
    })
}

fn string_attr(name: &str, value: &str) -> Attribute {
    Attribute::new(
        name,
        AttributeValue::String {
            value: value.to_string(),
        },
    )
}

fn set_string_attr(element: &mut Element, name: &str, value: &str) {
    match element.attribute_mut(name) {
        Some(attr) => {
            attr.value = AttributeValue::String {
                value: value.to_string(),
            }
        }
        None => element.attributes.push(string_attr(name, value)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use weave_parser::{generate_node, parse};

    fn empty_doc() -> weave_parser::ast::Document {
        parse("").unwrap()
    }

    #[test]
    fn test_paragraph_template() {
        let node = resolve(
            &empty_doc(),
            &ElementSpec::Template {
                name: "paragraph".to_string(),
                params: TemplateParams {
                    text: Some("Hi".to_string()),
                    ..Default::default()
                },
            },
        )
        .unwrap();

        assert_eq!(generate_node(&node).unwrap(), "<p>Hi</p>");
    }

    #[test]
    fn test_heading_level_clamped() {
        let node = resolve(
            &empty_doc(),
            &ElementSpec::Template {
                name: "heading".to_string(),
                params: TemplateParams {
                    level: Some(9),
                    text: Some("Big".to_string()),
                    ..Default::default()
                },
            },
        )
        .unwrap();

        assert_eq!(node.tag_name(), Some("h6"));
    }

    #[test]
    fn test_image_is_self_closing() {
        let node = resolve(
            &empty_doc(),
            &ElementSpec::Template {
                name: "image".to_string(),
                params: TemplateParams {
                    src: Some("/a.png".to_string()),
                    ..Default::default()
                },
            },
        )
        .unwrap();

        assert_eq!(
            generate_node(&node).unwrap(),
            "<img src=\"/a.png\" alt=\"\" />"
        );
    }

    #[test]
    fn test_unknown_template() {
        let err = resolve(
            &empty_doc(),
            &ElementSpec::Template {
                name: "carousel".to_string(),
                params: TemplateParams::default(),
            },
        )
        .unwrap_err();

        assert_eq!(err, TemplateError::UnknownTemplate("carousel".to_string()));
    }

    #[test]
    fn test_fresh_identity_skips_existing() {
        let doc = parse("<div data-editable=\"card-1\">x</div>").unwrap();
        let node = resolve(
            &doc,
            &ElementSpec::Template {
                name: "container".to_string(),
                params: TemplateParams {
                    editable_prefix: Some("card".to_string()),
                    ..Default::default()
                },
            },
        )
        .unwrap();

        assert_eq!(node.editable_id(), Some("card-2"));
    }

    #[test]
    fn test_snippet_single_root() {
        let node = resolve(
            &empty_doc(),
            &ElementSpec::Snippet {
                source: "<ul><li>a</li></ul>".to_string(),
                editable_prefix: None,
            },
        )
        .unwrap();

        assert_eq!(node.tag_name(), Some("ul"));
    }

    #[test]
    fn test_snippet_rejects_multiple_roots_and_empty() {
        let multi = resolve(
            &empty_doc(),
            &ElementSpec::Snippet {
                source: "<p>a</p><p>b</p>".to_string(),
                editable_prefix: None,
            },
        );
        assert_eq!(multi.unwrap_err(), TemplateError::MultipleRoots);

        let empty = resolve(
            &empty_doc(),
            &ElementSpec::Snippet {
                source: "   ".to_string(),
                editable_prefix: None,
            },
        );
        assert_eq!(empty.unwrap_err(), TemplateError::EmptySnippet);
    }

    #[test]
    fn test_snippet_assigns_identities_to_every_element() {
        let doc = parse("<div data-editable=\"item-1\">x</div>").unwrap();
        let node = resolve(
            &doc,
            &ElementSpec::Snippet {
                source: "<ul><li>a</li><li data-editable=\"keep\">b</li></ul>".to_string(),
                editable_prefix: Some("item".to_string()),
            },
        )
        .unwrap();

        let ul = node.as_element().unwrap();
        assert_eq!(ul.editable_id(), Some("item-2"));
        let first_li = ul.children[0].as_element().unwrap();
        assert_eq!(first_li.editable_id(), Some("item-3"));
        let second_li = ul.children[1].as_element().unwrap();
        assert_eq!(second_li.editable_id(), Some("keep"));
    }
}
