//! # Element Locator
//!
//! Identity-based lookups over a parsed document. Elements are addressed by
//! the string value of their `data-editable` attribute; lookups walk the
//! markup blocks in document order, depth-first, and the first match wins.
//! Lookup misses are `None`, never errors — callers decide what a miss means.

use serde::{Deserialize, Serialize};
use weave_common::visitor::{walk_element, Visitor};
use weave_parser::ast::{Document, Element, Node, NodePath, Position, Span};

/// One entry of the identity → source location map consumed by the
/// visual editor overlay
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditableElement {
    pub id: String,
    pub tag_name: String,
    pub span: Span,
    pub location: Position,
}

/// A located node with its derived parent context
#[derive(Debug, Clone, Copy)]
pub struct SearchResult<'a> {
    pub node: &'a Node,
    /// `None` for markup block roots
    pub parent: Option<&'a Node>,
    /// Index among the parent's children, `None` for roots
    pub index: Option<usize>,
}

/// First element carrying `data-editable="id"`, pre-order across blocks
pub fn find_by_editable_id(doc: &Document, id: &str) -> Option<NodePath> {
    search_blocks(doc, &|node| node.editable_id() == Some(id))
}

/// First element with the given tag name
pub fn find_by_tag_name(doc: &Document, tag: &str) -> Option<NodePath> {
    search_blocks(doc, &|node| node.tag_name() == Some(tag))
}

/// Root node of the named component's markup block, or of the first block
pub fn component_root(doc: &Document, name: Option<&str>) -> Option<NodePath> {
    doc.markup_blocks()
        .find(|(_, block)| match name {
            Some(wanted) => block.component.as_deref() == Some(wanted),
            None => true,
        })
        .map(|(index, _)| NodePath::root(index))
}

/// Every identity-carrying element in document order
pub fn find_all_editable(doc: &Document) -> Vec<EditableElement> {
    struct Collector<'a> {
        source: &'a str,
        found: Vec<EditableElement>,
    }

    impl Visitor for Collector<'_> {
        fn visit_element(&mut self, element: &Element) {
            if let Some(id) = element.editable_id() {
                self.found.push(EditableElement {
                    id: id.to_string(),
                    tag_name: element.tag_name.clone(),
                    span: element.span,
                    location: Position::from_offset(self.source, element.span.start),
                });
            }
            walk_element(self, element);
        }
    }

    let mut collector = Collector {
        source: &doc.source,
        found: Vec::new(),
    };
    collector.visit_document(doc);
    collector.found
}

/// Dereference a path into the node plus its parent context
pub fn resolve<'a>(doc: &'a Document, path: &NodePath) -> Option<SearchResult<'a>> {
    let node = doc.node_at(path)?;
    let parent = path.parent().and_then(|parent| doc.node_at(&parent));
    Some(SearchResult {
        node,
        parent,
        index: path.index(),
    })
}

fn search_blocks(doc: &Document, matches: &dyn Fn(&Node) -> bool) -> Option<NodePath> {
    for (block_index, block) in doc.markup_blocks() {
        if let Some(path) = search(&block.root, NodePath::root(block_index), matches) {
            return Some(path);
        }
    }
    None
}

fn search(node: &Node, path: NodePath, matches: &dyn Fn(&Node) -> bool) -> Option<NodePath> {
    if matches(node) {
        return Some(path);
    }
    let children = node.children()?;
    for (index, child) in children.iter().enumerate() {
        if let Some(found) = search(child, path.child(index), matches) {
            return Some(found);
        }
    }
    None
}
