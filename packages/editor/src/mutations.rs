//! # Document Mutations
//!
//! High-level semantic operations on parsed component documents.
//!
//! ## Design Principles
//!
//! 1. **Intent-preserving**: Each mutation represents a semantic operation
//! 2. **Validated**: Every mutation checks its preconditions before touching
//!    the tree; on `Err` the document is exactly as it was
//! 3. **Identity-addressed**: Targets are named by their `data-editable`
//!    attribute value, stable across regeneration
//! 4. **Transport-agnostic**: The enum serializes to tagged JSON, so the
//!    same operations work over any protocol the host chooses

use crate::insert::{self, RootPosition};
use crate::movement;
use crate::remove;
use crate::styles::{self, Sides, StyleInput};
use crate::templates::{ElementSpec, TemplateError};
use crate::update::{self, AttributeUpdate, NewChild};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;
use weave_parser::ast::{AttributeValue, Document, Element, Node, NodePath, EDITABLE_ATTR};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MutationError {
    #[error("No element found with {EDITABLE_ATTR}=\"{0}\"")]
    NodeNotFound(String),

    #[error("Document contains no markup block")]
    NoMarkup,

    #[error("No markup block found for component \"{0}\"")]
    ComponentNotFound(String),

    #[error("Element \"{0}\" is a markup root and has no siblings")]
    RootElement(String),

    #[error("Element \"{0}\" is already at the top")]
    AlreadyAtTop(String),

    #[error("Element \"{0}\" is already at the bottom")]
    AlreadyAtBottom(String),

    #[error("Index {index} is out of range: {count} element(s)")]
    IndexOutOfRange { index: usize, count: usize },

    #[error("Cannot move \"{target}\" into \"{destination}\": destination is inside the target")]
    CycleDetected { target: String, destination: String },

    #[error("<{0}> is a void element and cannot contain children")]
    VoidElement(String),

    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    #[error(transparent)]
    Template(#[from] TemplateError),
}

/// What a successful mutation did, with enough context for an undo layer
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MutationOutcome {
    pub message: String,

    /// Subtree detached by remove/clear/replace operations
    #[serde(skip_serializing_if = "Option::is_none")]
    pub removed: Option<Node>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_text: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_value: Option<AttributeValue>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_tag: Option<String>,

    /// Identity assigned to a freshly inserted element
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_id: Option<String>,
}

impl MutationOutcome {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Default::default()
        }
    }
}

/// Semantic mutations (intent-preserving operations)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Mutation {
    InsertAfter {
        target_id: String,
        element: ElementSpec,
    },

    InsertBefore {
        target_id: String,
        element: ElementSpec,
    },

    InsertAsFirstChild {
        parent_id: String,
        element: ElementSpec,
    },

    InsertAsLastChild {
        parent_id: String,
        element: ElementSpec,
    },

    InsertAtRoot {
        element: ElementSpec,
        position: RootPosition,
        #[serde(default)]
        component: Option<String>,
    },

    RemoveElement {
        target_id: String,
        #[serde(default)]
        preserve_children: bool,
    },

    ClearChildren {
        target_id: String,
    },

    UpdateText {
        target_id: String,
        text: String,
    },

    UpdateAttribute {
        target_id: String,
        name: String,
        value: AttributeUpdate,
    },

    UpdateTagName {
        target_id: String,
        tag_name: String,
    },

    ReplaceChildren {
        target_id: String,
        children: Vec<NewChild>,
    },

    MoveUp {
        target_id: String,
    },

    MoveDown {
        target_id: String,
    },

    MoveToIndex {
        target_id: String,
        index: usize,
    },

    MoveInto {
        target_id: String,
        destination_id: String,
    },

    SwapElements {
        first_id: String,
        second_id: String,
    },

    UpdateStyles {
        target_id: String,
        styles: BTreeMap<String, Option<StyleInput>>,
    },

    SetSpacing {
        target_id: String,
        spacing: BTreeMap<String, Option<StyleInput>>,
    },

    SetMargin {
        target_id: String,
        sides: Sides,
    },

    SetPadding {
        target_id: String,
        sides: Sides,
    },

    ClearStyles {
        target_id: String,
    },

    AddClassName {
        target_id: String,
        class_name: String,
    },

    RemoveClassName {
        target_id: String,
        class_name: String,
    },
}

impl Mutation {
    /// Apply the mutation with validation. The document is untouched when
    /// the result is `Err`.
    pub fn apply(&self, doc: &mut Document) -> Result<MutationOutcome, MutationError> {
        match self {
            Mutation::InsertAfter { target_id, element } => {
                insert::insert_after(doc, target_id, element)
            }
            Mutation::InsertBefore { target_id, element } => {
                insert::insert_before(doc, target_id, element)
            }
            Mutation::InsertAsFirstChild { parent_id, element } => {
                insert::insert_as_first_child(doc, parent_id, element)
            }
            Mutation::InsertAsLastChild { parent_id, element } => {
                insert::insert_as_last_child(doc, parent_id, element)
            }
            Mutation::InsertAtRoot {
                element,
                position,
                component,
            } => insert::insert_at_root(doc, element, *position, component.as_deref()),
            Mutation::RemoveElement {
                target_id,
                preserve_children,
            } => remove::remove_element(doc, target_id, *preserve_children),
            Mutation::ClearChildren { target_id } => remove::clear_children(doc, target_id),
            Mutation::UpdateText { target_id, text } => update::update_text(doc, target_id, text),
            Mutation::UpdateAttribute {
                target_id,
                name,
                value,
            } => update::update_attribute(doc, target_id, name, value),
            Mutation::UpdateTagName {
                target_id,
                tag_name,
            } => update::update_tag_name(doc, target_id, tag_name),
            Mutation::ReplaceChildren {
                target_id,
                children,
            } => update::replace_children(doc, target_id, children),
            Mutation::MoveUp { target_id } => movement::move_up(doc, target_id),
            Mutation::MoveDown { target_id } => movement::move_down(doc, target_id),
            Mutation::MoveToIndex { target_id, index } => {
                movement::move_to_index(doc, target_id, *index)
            }
            Mutation::MoveInto {
                target_id,
                destination_id,
            } => movement::move_into(doc, target_id, destination_id),
            Mutation::SwapElements {
                first_id,
                second_id,
            } => movement::swap_elements(doc, first_id, second_id),
            Mutation::UpdateStyles { target_id, styles } => {
                styles::update_styles(doc, target_id, styles)
            }
            Mutation::SetSpacing { target_id, spacing } => {
                styles::set_spacing(doc, target_id, spacing)
            }
            Mutation::SetMargin { target_id, sides } => {
                styles::set_margin(doc, target_id, sides)
            }
            Mutation::SetPadding { target_id, sides } => {
                styles::set_padding(doc, target_id, sides)
            }
            Mutation::ClearStyles { target_id } => styles::clear_styles(doc, target_id),
            Mutation::AddClassName {
                target_id,
                class_name,
            } => styles::add_class_name(doc, target_id, class_name),
            Mutation::RemoveClassName {
                target_id,
                class_name,
            } => styles::remove_class_name(doc, target_id, class_name),
        }
    }
}

/// Path of the element carrying the given identity, or `NodeNotFound`
pub(crate) fn located(doc: &Document, id: &str) -> Result<NodePath, MutationError> {
    crate::locator::find_by_editable_id(doc, id)
        .ok_or_else(|| MutationError::NodeNotFound(id.to_string()))
}

/// Mutable element access for an already-located path. Identity lookups
/// only ever match elements, so a non-element here is a stale path.
pub(crate) fn element_at_mut<'a>(
    doc: &'a mut Document,
    path: &NodePath,
    id: &str,
) -> Result<&'a mut Element, MutationError> {
    doc.node_at_mut(path)
        .and_then(Node::as_element_mut)
        .ok_or_else(|| MutationError::NodeNotFound(id.to_string()))
}

/// Short human-readable label for outcome messages
pub(crate) fn describe(node: &Node) -> String {
    match node {
        Node::Element(el) => format!("<{}>", el.tag_name),
        Node::Text(_) => "text".to_string(),
        Node::Expression(_) => "expression".to_string(),
        Node::Fragment(_) => "fragment".to_string(),
    }
}
