use weave_parser::ast::*;

/// Visitor pattern for traversing document trees immutably
///
/// This trait provides default implementations that walk the entire tree.
/// Override specific visit_* methods to perform custom actions on nodes.
pub trait Visitor: Sized {
    fn visit_document(&mut self, doc: &Document) {
        walk_document(self, doc);
    }

    fn visit_block(&mut self, block: &MarkupBlock) {
        self.visit_node(&block.root);
    }

    fn visit_node(&mut self, node: &Node) {
        walk_node(self, node);
    }

    fn visit_element(&mut self, element: &Element) {
        walk_element(self, element);
    }

    fn visit_text(&mut self, _text: &TextNode) {
        // Leaf node, no children to walk
    }

    fn visit_attribute(&mut self, attribute: &Attribute) {
        walk_attribute(self, attribute);
    }

    fn visit_expression(&mut self, expr: &Expression) {
        walk_expression(self, expr);
    }
}

/// Mutable visitor pattern for transforming document trees
///
/// Similar to Visitor, but provides mutable access to nodes.
/// Use this when you need to modify the tree during traversal.
pub trait VisitorMut: Sized {
    fn visit_document_mut(&mut self, doc: &mut Document) {
        walk_document_mut(self, doc);
    }

    fn visit_block_mut(&mut self, block: &mut MarkupBlock) {
        self.visit_node_mut(&mut block.root);
    }

    fn visit_node_mut(&mut self, node: &mut Node) {
        walk_node_mut(self, node);
    }

    fn visit_element_mut(&mut self, element: &mut Element) {
        walk_element_mut(self, element);
    }

    fn visit_text_mut(&mut self, _text: &mut TextNode) {
        // Leaf node, no children to walk
    }

    fn visit_attribute_mut(&mut self, attribute: &mut Attribute) {
        walk_attribute_mut(self, attribute);
    }

    fn visit_expression_mut(&mut self, expr: &mut Expression) {
        walk_expression_mut(self, expr);
    }
}

// Default walk implementations for immutable visitor

pub fn walk_document<V: Visitor>(visitor: &mut V, doc: &Document) {
    for (_, block) in doc.markup_blocks() {
        visitor.visit_block(block);
    }
}

pub fn walk_node<V: Visitor>(visitor: &mut V, node: &Node) {
    match node {
        Node::Element(element) => visitor.visit_element(element),
        Node::Text(text) => visitor.visit_text(text),
        Node::Expression(slot) => visitor.visit_expression(&slot.expression),
        Node::Fragment(frag) => {
            for child in &frag.children {
                visitor.visit_node(child);
            }
        }
    }
}

pub fn walk_element<V: Visitor>(visitor: &mut V, element: &Element) {
    for attribute in &element.attributes {
        visitor.visit_attribute(attribute);
    }
    for child in &element.children {
        visitor.visit_node(child);
    }
}

pub fn walk_attribute<V: Visitor>(visitor: &mut V, attribute: &Attribute) {
    if let AttributeValue::Expression { expression } = &attribute.value {
        visitor.visit_expression(expression);
    }
}

pub fn walk_expression<V: Visitor>(visitor: &mut V, expr: &Expression) {
    match expr {
        Expression::Identifier { .. }
        | Expression::StringLiteral { .. }
        | Expression::NumberLiteral { .. }
        | Expression::BooleanLiteral { .. }
        | Expression::Raw { .. } => {
            // Leaf nodes
        }
        Expression::Member { object, .. } => {
            visitor.visit_expression(object);
        }
        Expression::Template { parts } => {
            for part in parts {
                if let TemplatePart::Expression(expr) = part {
                    visitor.visit_expression(expr);
                }
            }
        }
        Expression::Object { entries } => {
            for entry in entries {
                visitor.visit_expression(&entry.value);
            }
        }
    }
}

// Default walk implementations for mutable visitor

pub fn walk_document_mut<V: VisitorMut>(visitor: &mut V, doc: &mut Document) {
    for segment in &mut doc.segments {
        if let Segment::Markup(block) = segment {
            visitor.visit_block_mut(block);
        }
    }
}

pub fn walk_node_mut<V: VisitorMut>(visitor: &mut V, node: &mut Node) {
    match node {
        Node::Element(element) => visitor.visit_element_mut(element),
        Node::Text(text) => visitor.visit_text_mut(text),
        Node::Expression(slot) => visitor.visit_expression_mut(&mut slot.expression),
        Node::Fragment(frag) => {
            for child in &mut frag.children {
                visitor.visit_node_mut(child);
            }
        }
    }
}

pub fn walk_element_mut<V: VisitorMut>(visitor: &mut V, element: &mut Element) {
    for attribute in &mut element.attributes {
        visitor.visit_attribute_mut(attribute);
    }
    for child in &mut element.children {
        visitor.visit_node_mut(child);
    }
}

pub fn walk_attribute_mut<V: VisitorMut>(visitor: &mut V, attribute: &mut Attribute) {
    if let AttributeValue::Expression { expression } = &mut attribute.value {
        visitor.visit_expression_mut(expression);
    }
}

pub fn walk_expression_mut<V: VisitorMut>(visitor: &mut V, expr: &mut Expression) {
    match expr {
        Expression::Identifier { .. }
        | Expression::StringLiteral { .. }
        | Expression::NumberLiteral { .. }
        | Expression::BooleanLiteral { .. }
        | Expression::Raw { .. } => {
            // Leaf nodes
        }
        Expression::Member { object, .. } => {
            visitor.visit_expression_mut(object);
        }
        Expression::Template { parts } => {
            for part in parts {
                if let TemplatePart::Expression(expr) = part {
                    visitor.visit_expression_mut(expr);
                }
            }
        }
        Expression::Object { entries } => {
            for entry in entries {
                visitor.visit_expression_mut(&mut entry.value);
            }
        }
    }
}
