//! AST definitions for Weave component files
//!
//! The AST preserves source spans for:
//! 1. Error reporting with precise locations
//! 2. Roundtrip serialization (edit AST → regenerate source)
//! 3. Designer click-to-source mapping
//!
//! A parsed file is a sequence of segments: verbatim code text interleaved
//! with markup blocks. Everything outside markup is kept byte-for-byte, so
//! regenerating an unmutated document reproduces the original source.

use serde::{Deserialize, Serialize};

/// The attribute whose string value is the stable external handle for an
/// element across mutation calls.
pub const EDITABLE_ATTR: &str = "data-editable";

/// Tags that never hold children. Clearing the children of one of these
/// converts it back to self-closing form.
pub const VOID_ELEMENTS: [&str; 6] = ["img", "br", "hr", "input", "meta", "link"];

pub fn is_void_element(tag: &str) -> bool {
    VOID_ELEMENTS.contains(&tag)
}

/// Source location span (byte offsets)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Span for nodes built by mutations rather than the parser.
    /// Refreshed on the next parse of generated source.
    pub fn synthetic() -> Self {
        Self { start: 0, end: 0 }
    }

    pub fn merge(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

/// Line/column position (1-based) derived from a byte offset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn from_offset(source: &str, offset: usize) -> Self {
        let mut line = 1;
        let mut column = 1;
        for (i, ch) in source.char_indices() {
            if i >= offset {
                break;
            }
            if ch == '\n' {
                line += 1;
                column = 1;
            } else {
                column += 1;
            }
        }
        Self { line, column }
    }
}

/// Root of a parsed source file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Original source text, retained for span → line/column resolution
    pub source: String,
    pub segments: Vec<Segment>,
}

/// A slice of the file: verbatim code or a parsed markup block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Segment {
    Code { text: String },
    Markup(MarkupBlock),
}

/// A markup region found inside the file, attributed to the nearest
/// enclosing function-like construct
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkupBlock {
    pub component: Option<String>,
    pub root: Node,
    pub span: Span,
}

/// Markup tree node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Node {
    Element(Element),
    Text(TextNode),
    Expression(ExpressionSlot),
    Fragment(Fragment),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    pub tag_name: String,
    pub attributes: Vec<Attribute>,
    pub children: Vec<Node>,
    pub self_closing: bool,
    pub span: Span,
}

/// Text between elements, including pure-whitespace formatting filler
/// and preserved `{/* ... */}` comments
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextNode {
    pub value: String,
    pub span: Span,
}

/// An embedded dynamic value: `{expression}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpressionSlot {
    pub expression: Expression,
    pub span: Span,
}

/// `<> ... </>`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fragment {
    pub children: Vec<Node>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    pub name: String,
    pub value: AttributeValue,
    pub span: Span,
}

impl Attribute {
    pub fn new(name: impl Into<String>, value: AttributeValue) -> Self {
        Self {
            name: name.into(),
            value,
            span: Span::synthetic(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum AttributeValue {
    /// Presence-only attribute: `disabled`
    Bare,
    /// `name="value"`
    String { value: String },
    /// `name={expression}`
    Expression { expression: Expression },
}

/// Expression sublanguage inside `{ ... }` slots.
///
/// Only the shapes the mutation engine understands are modeled; anything
/// else is carried verbatim as `Raw` so generation stays lossless.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Expression {
    Identifier { name: String },
    Member { object: Box<Expression>, property: String },
    StringLiteral { value: String },
    Template { parts: Vec<TemplatePart> },
    NumberLiteral { value: f64 },
    BooleanLiteral { value: bool },
    Object { entries: Vec<ObjectEntry> },
    Raw { source: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TemplatePart {
    Literal(String),
    Expression(Expression),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectEntry {
    pub key: String,
    pub value: Expression,
}

/// Index path from a markup block root down to a node.
///
/// Parent/sibling context is derived from paths during traversal rather
/// than stored on nodes, so the tree has single ownership and no cycles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodePath {
    /// Segment index of the owning markup block
    pub block: usize,
    /// Child indices from the block root
    pub steps: Vec<usize>,
}

impl NodePath {
    pub fn root(block: usize) -> Self {
        Self {
            block,
            steps: Vec::new(),
        }
    }

    pub fn child(&self, index: usize) -> Self {
        let mut steps = self.steps.clone();
        steps.push(index);
        Self {
            block: self.block,
            steps,
        }
    }

    pub fn parent(&self) -> Option<NodePath> {
        if self.steps.is_empty() {
            return None;
        }
        Some(Self {
            block: self.block,
            steps: self.steps[..self.steps.len() - 1].to_vec(),
        })
    }

    /// Index among the parent's children, if not a block root
    pub fn index(&self) -> Option<usize> {
        self.steps.last().copied()
    }

    pub fn is_root(&self) -> bool {
        self.steps.is_empty()
    }

    /// True when `other` is this node or one of its descendants
    pub fn contains(&self, other: &NodePath) -> bool {
        self.block == other.block && other.steps.starts_with(&self.steps)
    }
}

impl Node {
    pub fn span(&self) -> Span {
        match self {
            Node::Element(el) => el.span,
            Node::Text(text) => text.span,
            Node::Expression(slot) => slot.span,
            Node::Fragment(frag) => frag.span,
        }
    }

    /// Children list for container nodes; `None` for text and expressions
    pub fn children(&self) -> Option<&Vec<Node>> {
        match self {
            Node::Element(el) => Some(&el.children),
            Node::Fragment(frag) => Some(&frag.children),
            Node::Text(_) | Node::Expression(_) => None,
        }
    }

    pub fn children_mut(&mut self) -> Option<&mut Vec<Node>> {
        match self {
            Node::Element(el) => Some(&mut el.children),
            Node::Fragment(frag) => Some(&mut frag.children),
            Node::Text(_) | Node::Expression(_) => None,
        }
    }

    pub fn tag_name(&self) -> Option<&str> {
        match self {
            Node::Element(el) => Some(&el.tag_name),
            _ => None,
        }
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(el) => Some(el),
            _ => None,
        }
    }

    pub fn as_element_mut(&mut self) -> Option<&mut Element> {
        match self {
            Node::Element(el) => Some(el),
            _ => None,
        }
    }

    /// Pure formatting filler between siblings
    pub fn is_whitespace_text(&self) -> bool {
        match self {
            Node::Text(text) => text.value.trim().is_empty(),
            _ => false,
        }
    }

    pub fn editable_id(&self) -> Option<&str> {
        self.as_element().and_then(Element::editable_id)
    }
}

impl Element {
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|attr| attr.name == name)
    }

    pub fn attribute_mut(&mut self, name: &str) -> Option<&mut Attribute> {
        self.attributes.iter_mut().find(|attr| attr.name == name)
    }

    pub fn remove_attribute(&mut self, name: &str) -> Option<Attribute> {
        let index = self.attributes.iter().position(|attr| attr.name == name)?;
        Some(self.attributes.remove(index))
    }

    /// Identity handle, present only as a string-literal `data-editable`
    pub fn editable_id(&self) -> Option<&str> {
        match &self.attribute(EDITABLE_ATTR)?.value {
            AttributeValue::String { value } => Some(value.as_str()),
            _ => None,
        }
    }
}

impl Document {
    /// Markup blocks in document order, with their segment indices
    pub fn markup_blocks(&self) -> impl Iterator<Item = (usize, &MarkupBlock)> {
        self.segments
            .iter()
            .enumerate()
            .filter_map(|(index, segment)| match segment {
                Segment::Markup(block) => Some((index, block)),
                Segment::Code { .. } => None,
            })
    }

    pub fn block(&self, index: usize) -> Option<&MarkupBlock> {
        match self.segments.get(index)? {
            Segment::Markup(block) => Some(block),
            Segment::Code { .. } => None,
        }
    }

    pub fn block_mut(&mut self, index: usize) -> Option<&mut MarkupBlock> {
        match self.segments.get_mut(index)? {
            Segment::Markup(block) => Some(block),
            Segment::Code { .. } => None,
        }
    }

    pub fn node_at(&self, path: &NodePath) -> Option<&Node> {
        let mut node = &self.block(path.block)?.root;
        for &step in &path.steps {
            node = node.children()?.get(step)?;
        }
        Some(node)
    }

    pub fn node_at_mut(&mut self, path: &NodePath) -> Option<&mut Node> {
        let mut node = &mut self.block_mut(path.block)?.root;
        for &step in &path.steps {
            node = node.children_mut()?.get_mut(step)?;
        }
        Some(node)
    }

    /// The children list owning the node at `path`, plus its index in that
    /// list. `None` for block roots, which have no siblings.
    pub fn siblings_mut(&mut self, path: &NodePath) -> Option<(&mut Vec<Node>, usize)> {
        let index = path.index()?;
        let parent_path = path.parent()?;
        let children = self.node_at_mut(&parent_path)?.children_mut()?;
        if index >= children.len() {
            return None;
        }
        Some((children, index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn element(tag: &str, children: Vec<Node>) -> Node {
        Node::Element(Element {
            tag_name: tag.to_string(),
            attributes: vec![],
            children,
            self_closing: false,
            span: Span::synthetic(),
        })
    }

    #[test]
    fn test_path_containment() {
        let outer = NodePath {
            block: 0,
            steps: vec![1],
        };
        let inner = NodePath {
            block: 0,
            steps: vec![1, 0, 2],
        };
        let other = NodePath {
            block: 0,
            steps: vec![2],
        };

        assert!(outer.contains(&inner));
        assert!(outer.contains(&outer));
        assert!(!outer.contains(&other));
        assert!(!inner.contains(&outer));
    }

    #[test]
    fn test_node_navigation() {
        let doc = Document {
            source: String::new(),
            segments: vec![Segment::Markup(MarkupBlock {
                component: None,
                root: element("div", vec![element("span", vec![])]),
                span: Span::synthetic(),
            })],
        };

        let path = NodePath::root(0).child(0);
        assert_eq!(doc.node_at(&path).and_then(Node::tag_name), Some("span"));
        assert!(doc.node_at(&path.child(0)).is_none());
    }

    #[test]
    fn test_position_from_offset() {
        let source = "ab\ncd\nef";
        assert_eq!(Position::from_offset(source, 0), Position { line: 1, column: 1 });
        assert_eq!(Position::from_offset(source, 4), Position { line: 2, column: 2 });
        assert_eq!(Position::from_offset(source, 6), Position { line: 3, column: 1 });
    }
}
