//! # Move Operations
//!
//! Reordering and reparenting. Positions are always counted among
//! non-whitespace siblings, so formatting filler never shifts what "up",
//! "down", or "index 2" mean. Cycle checks run on paths before anything
//! is detached.

use crate::insert::insert_last;
use crate::mutations::{located, MutationError, MutationOutcome};
use weave_parser::ast::{is_void_element, Document, Node, NodePath};

/// Swap the element with its nearest preceding non-whitespace sibling
pub fn move_up(doc: &mut Document, target_id: &str) -> Result<MutationOutcome, MutationError> {
    let path = located(doc, target_id)?;
    if path.is_root() {
        return Err(MutationError::AlreadyAtTop(target_id.to_string()));
    }

    let (siblings, index) = doc
        .siblings_mut(&path)
        .ok_or_else(|| MutationError::NodeNotFound(target_id.to_string()))?;

    let previous = (0..index)
        .rev()
        .find(|&i| !siblings[i].is_whitespace_text())
        .ok_or_else(|| MutationError::AlreadyAtTop(target_id.to_string()))?;

    siblings.swap(index, previous);
    Ok(MutationOutcome::new(format!("Moved \"{}\" up", target_id)))
}

/// Swap the element with its nearest following non-whitespace sibling
pub fn move_down(doc: &mut Document, target_id: &str) -> Result<MutationOutcome, MutationError> {
    let path = located(doc, target_id)?;
    if path.is_root() {
        return Err(MutationError::AlreadyAtBottom(target_id.to_string()));
    }

    let (siblings, index) = doc
        .siblings_mut(&path)
        .ok_or_else(|| MutationError::NodeNotFound(target_id.to_string()))?;

    let next = (index + 1..siblings.len())
        .find(|&i| !siblings[i].is_whitespace_text())
        .ok_or_else(|| MutationError::AlreadyAtBottom(target_id.to_string()))?;

    siblings.swap(index, next);
    Ok(MutationOutcome::new(format!("Moved \"{}\" down", target_id)))
}

/// Move the element to `new_index` among its non-whitespace siblings
pub fn move_to_index(
    doc: &mut Document,
    target_id: &str,
    new_index: usize,
) -> Result<MutationOutcome, MutationError> {
    let path = located(doc, target_id)?;
    if path.is_root() {
        return Err(MutationError::RootElement(target_id.to_string()));
    }

    let (siblings, index) = doc
        .siblings_mut(&path)
        .ok_or_else(|| MutationError::NodeNotFound(target_id.to_string()))?;

    let count = siblings.iter().filter(|s| !s.is_whitespace_text()).count();
    if new_index >= count {
        return Err(MutationError::IndexOutOfRange {
            index: new_index,
            count,
        });
    }

    let node = siblings.remove(index);
    let positions: Vec<usize> = siblings
        .iter()
        .enumerate()
        .filter(|(_, s)| !s.is_whitespace_text())
        .map(|(i, _)| i)
        .collect();
    let at = match positions.get(new_index) {
        Some(&i) => i,
        None => positions.last().map(|&i| i + 1).unwrap_or(siblings.len()),
    };
    siblings.insert(at, node);

    Ok(MutationOutcome::new(format!(
        "Moved \"{}\" to index {}",
        target_id, new_index
    )))
}

/// Detach the element and append it as the last child of `destination_id`
pub fn move_into(
    doc: &mut Document,
    target_id: &str,
    destination_id: &str,
) -> Result<MutationOutcome, MutationError> {
    let target_path = located(doc, target_id)?;
    let destination_path = located(doc, destination_id)?;

    if target_path.contains(&destination_path) {
        return Err(MutationError::CycleDetected {
            target: target_id.to_string(),
            destination: destination_id.to_string(),
        });
    }
    if target_path.is_root() {
        return Err(MutationError::RootElement(target_id.to_string()));
    }
    let destination_tag = doc
        .node_at(&destination_path)
        .and_then(Node::tag_name)
        .unwrap_or_default()
        .to_string();
    if is_void_element(&destination_tag) {
        return Err(MutationError::VoidElement(destination_tag));
    }

    // detach, then re-locate the destination: its path may have shifted
    // when the target (and its blank line) left a shared ancestor
    let (siblings, index) = doc
        .siblings_mut(&target_path)
        .ok_or_else(|| MutationError::NodeNotFound(target_id.to_string()))?;
    let node = siblings.remove(index);
    if index > 0 && siblings[index - 1].is_whitespace_text() {
        siblings.remove(index - 1);
    } else if siblings.get(index).map(Node::is_whitespace_text) == Some(true) {
        siblings.remove(index);
    }

    let destination_path = located(doc, destination_id)?;
    let destination = crate::mutations::element_at_mut(doc, &destination_path, destination_id)?;
    destination.self_closing = false;
    insert_last(&mut destination.children, node);

    Ok(MutationOutcome::new(format!(
        "Moved \"{}\" into \"{}\"",
        target_id, destination_id
    )))
}

/// Exchange the positions of two elements, same-parent or cross-parent
pub fn swap_elements(
    doc: &mut Document,
    first_id: &str,
    second_id: &str,
) -> Result<MutationOutcome, MutationError> {
    let first_path = located(doc, first_id)?;
    let second_path = located(doc, second_id)?;

    if first_path.contains(&second_path) || second_path.contains(&first_path) {
        return Err(MutationError::CycleDetected {
            target: first_id.to_string(),
            destination: second_id.to_string(),
        });
    }

    // neither path lies inside the other, so replacing the two nodes in
    // place keeps every other path stable
    let first_node = clone_at(doc, &first_path, first_id)?;
    let second_node = clone_at(doc, &second_path, second_id)?;
    replace_at(doc, &first_path, second_node, first_id)?;
    replace_at(doc, &second_path, first_node, second_id)?;

    Ok(MutationOutcome::new(format!(
        "Swapped \"{}\" and \"{}\"",
        first_id, second_id
    )))
}

fn clone_at(doc: &Document, path: &NodePath, id: &str) -> Result<Node, MutationError> {
    doc.node_at(path)
        .cloned()
        .ok_or_else(|| MutationError::NodeNotFound(id.to_string()))
}

fn replace_at(
    doc: &mut Document,
    path: &NodePath,
    node: Node,
    id: &str,
) -> Result<(), MutationError> {
    let slot = doc
        .node_at_mut(path)
        .ok_or_else(|| MutationError::NodeNotFound(id.to_string()))?;
    *slot = node;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use weave_parser::{generate, parse};

    const ROW: &str = "<section><p data-editable=\"a\">A</p><p data-editable=\"b\">B</p><p data-editable=\"c\">C</p></section>";

    fn order(doc: &Document) -> Vec<String> {
        crate::locator::find_all_editable(doc)
            .into_iter()
            .map(|e| e.id)
            .collect()
    }

    #[test]
    fn test_move_down_swaps_order() {
        let mut doc = parse(
            "<section><p data-editable=\"a\">A</p><p data-editable=\"b\">B</p></section>",
        )
        .unwrap();

        move_down(&mut doc, "a").unwrap();
        assert_eq!(order(&doc), vec!["b", "a"]);
        assert_eq!(
            generate(&doc).unwrap(),
            "<section><p data-editable=\"b\">B</p><p data-editable=\"a\">A</p></section>"
        );
    }

    #[test]
    fn test_move_up_skips_whitespace_filler() {
        let mut doc = parse(
            "<div>\n  <p data-editable=\"a\">A</p>\n  <p data-editable=\"b\">B</p>\n</div>",
        )
        .unwrap();

        move_up(&mut doc, "b").unwrap();
        assert_eq!(
            generate(&doc).unwrap(),
            "<div>\n  <p data-editable=\"b\">B</p>\n  <p data-editable=\"a\">A</p>\n</div>"
        );
    }

    #[test]
    fn test_move_boundaries_fail_without_change() {
        let mut doc = parse(ROW).unwrap();
        let before = generate(&doc).unwrap();

        assert_eq!(
            move_up(&mut doc, "a").unwrap_err(),
            MutationError::AlreadyAtTop("a".to_string())
        );
        assert_eq!(
            move_down(&mut doc, "c").unwrap_err(),
            MutationError::AlreadyAtBottom("c".to_string())
        );
        assert_eq!(generate(&doc).unwrap(), before);
    }

    #[test]
    fn test_move_to_index() {
        let mut doc = parse(ROW).unwrap();

        move_to_index(&mut doc, "c", 0).unwrap();
        assert_eq!(order(&doc), vec!["c", "a", "b"]);

        move_to_index(&mut doc, "c", 2).unwrap();
        assert_eq!(order(&doc), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_move_to_index_out_of_range() {
        let mut doc = parse(ROW).unwrap();
        assert_eq!(
            move_to_index(&mut doc, "a", 3).unwrap_err(),
            MutationError::IndexOutOfRange { index: 3, count: 3 }
        );
    }

    #[test]
    fn test_move_to_index_counts_non_whitespace_only() {
        let mut doc = parse(
            "<div>\n  <p data-editable=\"a\">A</p>\n  <p data-editable=\"b\">B</p>\n  <p data-editable=\"c\">C</p>\n</div>",
        )
        .unwrap();

        move_to_index(&mut doc, "a", 2).unwrap();
        assert_eq!(order(&doc), vec!["b", "c", "a"]);
    }

    #[test]
    fn test_move_into() {
        let mut doc = parse(
            "<main><div data-editable=\"box\"></div><p data-editable=\"item\">X</p></main>",
        )
        .unwrap();

        move_into(&mut doc, "item", "box").unwrap();
        assert_eq!(
            generate(&doc).unwrap(),
            "<main><div data-editable=\"box\"><p data-editable=\"item\">X</p></div></main>"
        );
    }

    #[test]
    fn test_move_into_own_subtree_rejected() {
        let source =
            "<div data-editable=\"outer\"><div data-editable=\"inner\"></div></div>";
        let mut doc = parse(source).unwrap();

        let err = move_into(&mut doc, "outer", "inner").unwrap_err();
        assert!(matches!(err, MutationError::CycleDetected { .. }));
        assert_eq!(generate(&doc).unwrap(), source);
    }

    #[test]
    fn test_move_into_itself_rejected() {
        let mut doc = parse("<main><div data-editable=\"box\"></div></main>").unwrap();
        assert!(matches!(
            move_into(&mut doc, "box", "box").unwrap_err(),
            MutationError::CycleDetected { .. }
        ));
    }

    #[test]
    fn test_swap_same_parent() {
        let mut doc = parse(ROW).unwrap();
        swap_elements(&mut doc, "a", "c").unwrap();
        assert_eq!(order(&doc), vec!["c", "b", "a"]);
    }

    #[test]
    fn test_swap_cross_parent() {
        let mut doc = parse(
            "<main><header><h1 data-editable=\"x\">X</h1></header><footer><p data-editable=\"y\">Y</p></footer></main>",
        )
        .unwrap();

        swap_elements(&mut doc, "x", "y").unwrap();
        assert_eq!(
            generate(&doc).unwrap(),
            "<main><header><p data-editable=\"y\">Y</p></header><footer><h1 data-editable=\"x\">X</h1></footer></main>"
        );
    }

    #[test]
    fn test_swap_nested_rejected() {
        let mut doc = parse(
            "<div data-editable=\"outer\"><span data-editable=\"inner\">x</span></div>",
        )
        .unwrap();
        assert!(matches!(
            swap_elements(&mut doc, "inner", "outer").unwrap_err(),
            MutationError::CycleDetected { .. }
        ));
    }
}
