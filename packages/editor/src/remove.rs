//! # Remove Operations
//!
//! Removal takes at most one adjacent pure-whitespace text sibling with it,
//! so deleting an element does not leave a blank line behind. The detached
//! subtree is returned in the outcome for undo support.

use crate::mutations::{element_at_mut, located, MutationError, MutationOutcome};
use weave_parser::ast::{is_void_element, Document, Fragment, Node, Span};

/// Remove the element with `target_id`. With `preserve_children` the
/// element is unwrapped instead: its children take its place in the
/// parent's child list.
pub fn remove_element(
    doc: &mut Document,
    target_id: &str,
    preserve_children: bool,
) -> Result<MutationOutcome, MutationError> {
    let path = located(doc, target_id)?;
    if path.is_root() {
        return Err(MutationError::RootElement(target_id.to_string()));
    }

    let (siblings, index) = doc
        .siblings_mut(&path)
        .ok_or_else(|| MutationError::NodeNotFound(target_id.to_string()))?;

    if preserve_children {
        let mut shell = siblings.remove(index);
        let children = shell
            .children_mut()
            .map(std::mem::take)
            .unwrap_or_default();
        let count = children.len();
        siblings.splice(index..index, children);

        return Ok(MutationOutcome {
            message: format!(
                "Unwrapped \"{}\", promoting {} child node(s)",
                target_id, count
            ),
            removed: Some(shell),
            ..Default::default()
        });
    }

    let removed = siblings.remove(index);
    // take the blank line with it
    if index > 0 && siblings[index - 1].is_whitespace_text() {
        siblings.remove(index - 1);
    } else if siblings.get(index).map(Node::is_whitespace_text) == Some(true) {
        siblings.remove(index);
    }

    Ok(MutationOutcome {
        message: format!("Removed \"{}\"", target_id),
        removed: Some(removed),
        ..Default::default()
    })
}

/// Empty the children of the element with `target_id`. Void elements
/// convert back to self-closing form.
pub fn clear_children(
    doc: &mut Document,
    target_id: &str,
) -> Result<MutationOutcome, MutationError> {
    let path = located(doc, target_id)?;
    let element = element_at_mut(doc, &path, target_id)?;

    let children = std::mem::take(&mut element.children);
    if is_void_element(&element.tag_name) {
        element.self_closing = true;
    }

    let count = children.iter().filter(|c| !c.is_whitespace_text()).count();
    Ok(MutationOutcome {
        message: format!("Cleared {} child node(s) from \"{}\"", count, target_id),
        removed: Some(Node::Fragment(Fragment {
            children,
            span: Span::synthetic(),
        })),
        ..Default::default()
    })
}
