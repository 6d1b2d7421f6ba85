//! # Insert Operations
//!
//! All insertions resolve their [`ElementSpec`] first, then locate the
//! reference element, then splice — so a failed template or a missing target
//! leaves the tree untouched. Whitespace text siblings are synthesized by
//! cloning the reference sibling's preceding indentation run; when no such
//! run exists the new node is placed inline.

use crate::locator;
use crate::mutations::{describe, element_at_mut, located, MutationError, MutationOutcome};
use crate::templates::{self, ElementSpec};
use serde::{Deserialize, Serialize};
use weave_parser::ast::{is_void_element, Document, Node};

/// Where an at-root insertion lands among the root's children
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RootPosition {
    First,
    Last,
}

/// Insert immediately after the element with `target_id`
pub fn insert_after(
    doc: &mut Document,
    target_id: &str,
    spec: &ElementSpec,
) -> Result<MutationOutcome, MutationError> {
    let node = templates::resolve(doc, spec)?;
    let path = located(doc, target_id)?;
    if path.is_root() {
        return Err(MutationError::RootElement(target_id.to_string()));
    }

    let label = describe(&node);
    let assigned_id = node.editable_id().map(str::to_string);
    let (siblings, index) = doc
        .siblings_mut(&path)
        .ok_or_else(|| MutationError::NodeNotFound(target_id.to_string()))?;

    let indent = preceding_whitespace(siblings, index);
    let mut at = index + 1;
    if let Some(ws) = indent {
        siblings.insert(at, ws);
        at += 1;
    }
    siblings.insert(at, node);

    Ok(MutationOutcome {
        message: format!("Inserted {} after \"{}\"", label, target_id),
        assigned_id,
        ..Default::default()
    })
}

/// Insert immediately before the element with `target_id`
pub fn insert_before(
    doc: &mut Document,
    target_id: &str,
    spec: &ElementSpec,
) -> Result<MutationOutcome, MutationError> {
    let node = templates::resolve(doc, spec)?;
    let path = located(doc, target_id)?;
    if path.is_root() {
        return Err(MutationError::RootElement(target_id.to_string()));
    }

    let label = describe(&node);
    let assigned_id = node.editable_id().map(str::to_string);
    let (siblings, index) = doc
        .siblings_mut(&path)
        .ok_or_else(|| MutationError::NodeNotFound(target_id.to_string()))?;

    let indent = preceding_whitespace(siblings, index);
    siblings.insert(index, node);
    if let Some(ws) = indent {
        // keep the target on its own line, matching the new node's indent
        siblings.insert(index + 1, ws);
    }

    Ok(MutationOutcome {
        message: format!("Inserted {} before \"{}\"", label, target_id),
        assigned_id,
        ..Default::default()
    })
}

pub fn insert_as_first_child(
    doc: &mut Document,
    parent_id: &str,
    spec: &ElementSpec,
) -> Result<MutationOutcome, MutationError> {
    let node = templates::resolve(doc, spec)?;
    let path = located(doc, parent_id)?;

    let label = describe(&node);
    let assigned_id = node.editable_id().map(str::to_string);
    let parent = element_at_mut(doc, &path, parent_id)?;
    if is_void_element(&parent.tag_name) {
        return Err(MutationError::VoidElement(parent.tag_name.clone()));
    }
    parent.self_closing = false;
    insert_first(&mut parent.children, node);

    Ok(MutationOutcome {
        message: format!("Inserted {} as first child of \"{}\"", label, parent_id),
        assigned_id,
        ..Default::default()
    })
}

pub fn insert_as_last_child(
    doc: &mut Document,
    parent_id: &str,
    spec: &ElementSpec,
) -> Result<MutationOutcome, MutationError> {
    let node = templates::resolve(doc, spec)?;
    let path = located(doc, parent_id)?;

    let label = describe(&node);
    let assigned_id = node.editable_id().map(str::to_string);
    let parent = element_at_mut(doc, &path, parent_id)?;
    if is_void_element(&parent.tag_name) {
        return Err(MutationError::VoidElement(parent.tag_name.clone()));
    }
    parent.self_closing = false;
    insert_last(&mut parent.children, node);

    Ok(MutationOutcome {
        message: format!("Inserted {} as last child of \"{}\"", label, parent_id),
        assigned_id,
        ..Default::default()
    })
}

/// Insert among the children of a markup block's root element, optionally
/// selecting the block by component name
pub fn insert_at_root(
    doc: &mut Document,
    spec: &ElementSpec,
    position: RootPosition,
    component: Option<&str>,
) -> Result<MutationOutcome, MutationError> {
    let node = templates::resolve(doc, spec)?;
    let path = locator::component_root(doc, component).ok_or_else(|| match component {
        Some(name) => MutationError::ComponentNotFound(name.to_string()),
        None => MutationError::NoMarkup,
    })?;

    let label = describe(&node);
    let assigned_id = node.editable_id().map(str::to_string);
    let root = doc
        .node_at_mut(&path)
        .ok_or(MutationError::NoMarkup)?;
    if let Some(el) = root.as_element_mut() {
        if is_void_element(&el.tag_name) {
            return Err(MutationError::VoidElement(el.tag_name.clone()));
        }
        el.self_closing = false;
    }
    let children = root
        .children_mut()
        .ok_or_else(|| MutationError::InvalidPayload("markup root is not a container".to_string()))?;

    match position {
        RootPosition::First => insert_first(children, node),
        RootPosition::Last => insert_last(children, node),
    }

    Ok(MutationOutcome {
        message: format!("Inserted {} at root", label),
        assigned_id,
        ..Default::default()
    })
}

/// The whitespace run preceding `index`, cloned for reuse as indentation
fn preceding_whitespace(siblings: &[Node], index: usize) -> Option<Node> {
    (index > 0 && siblings[index - 1].is_whitespace_text()).then(|| siblings[index - 1].clone())
}

/// Place `node` before the first non-whitespace child, reusing the
/// indentation run that precedes it
pub(crate) fn insert_first(children: &mut Vec<Node>, node: Node) {
    match children.iter().position(|c| !c.is_whitespace_text()) {
        Some(i) => {
            let indent = preceding_whitespace(children, i);
            children.insert(i, node);
            if let Some(ws) = indent {
                children.insert(i + 1, ws);
            }
        }
        None => children.insert(0, node),
    }
}

/// Place `node` after the last non-whitespace child, before any trailing
/// closing-indentation run
pub(crate) fn insert_last(children: &mut Vec<Node>, node: Node) {
    match children.iter().rposition(|c| !c.is_whitespace_text()) {
        Some(i) => {
            let indent = preceding_whitespace(children, i);
            let mut at = i + 1;
            if let Some(ws) = indent {
                children.insert(at, ws);
                at += 1;
            }
            children.insert(at, node);
        }
        None => children.push(node),
    }
}
