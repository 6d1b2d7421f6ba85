//! # Style Operations
//!
//! The `style` attribute is treated as a structural object expression
//! (`style={{marginTop: '10px'}}`), never as string concatenation. Merges
//! keep the existing key order; deleted keys (explicit `null` or empty
//! string) drop out; bare numbers normalize to pixel strings. `className`
//! is maintained as a space-delimited token set.

use crate::mutations::{element_at_mut, located, MutationError, MutationOutcome};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use weave_parser::ast::{
    Attribute, AttributeValue, Document, Element, Expression, ObjectEntry,
};
use weave_parser::generate_expression;

const STYLE_ATTR: &str = "style";
const CLASS_ATTR: &str = "className";

/// One style value from the caller: a bare number (normalized to `Npx`)
/// or a CSS string
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StyleInput {
    Number(f64),
    String(String),
}

/// Per-side spacing values for `set_margin` / `set_padding`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Sides {
    pub top: Option<StyleInput>,
    pub right: Option<StyleInput>,
    pub bottom: Option<StyleInput>,
    pub left: Option<StyleInput>,
}

/// Merge a partial style map into the element's `style` object.
/// `None` or an empty string deletes the key.
pub fn update_styles(
    doc: &mut Document,
    target_id: &str,
    updates: &BTreeMap<String, Option<StyleInput>>,
) -> Result<MutationOutcome, MutationError> {
    let path = located(doc, target_id)?;
    let element = element_at_mut(doc, &path, target_id)?;
    let previous_value = element.attribute(STYLE_ATTR).map(|attr| attr.value.clone());

    let mut entries = match &previous_value {
        Some(AttributeValue::Expression {
            expression: Expression::Object { entries },
        }) => entries.clone(),
        // a string or dynamic style is replaced wholesale; the old value
        // is still reported in the outcome
        _ => Vec::new(),
    };

    for (key, value) in updates {
        match normalized(value.as_ref()) {
            Some(css) => {
                let expr = Expression::StringLiteral { value: css };
                match entries.iter_mut().find(|entry| &entry.key == key) {
                    Some(entry) => entry.value = expr,
                    None => entries.push(ObjectEntry {
                        key: key.clone(),
                        value: expr,
                    }),
                }
            }
            None => entries.retain(|entry| &entry.key != key),
        }
    }

    if entries.is_empty() {
        element.remove_attribute(STYLE_ATTR);
    } else {
        let value = AttributeValue::Expression {
            expression: Expression::Object { entries },
        };
        match element.attribute_mut(STYLE_ATTR) {
            Some(attr) => attr.value = value,
            None => element.attributes.push(Attribute::new(STYLE_ATTR, value)),
        }
    }

    Ok(MutationOutcome {
        message: format!("Updated styles on \"{}\"", target_id),
        previous_value,
        ..Default::default()
    })
}

/// Spacing-only style update: every key must be a margin or padding
/// property
pub fn set_spacing(
    doc: &mut Document,
    target_id: &str,
    spacing: &BTreeMap<String, Option<StyleInput>>,
) -> Result<MutationOutcome, MutationError> {
    for key in spacing.keys() {
        if !key.starts_with("margin") && !key.starts_with("padding") {
            return Err(MutationError::InvalidPayload(format!(
                "\"{}\" is not a spacing property",
                key
            )));
        }
    }
    update_styles(doc, target_id, spacing)
}

pub fn set_margin(
    doc: &mut Document,
    target_id: &str,
    sides: &Sides,
) -> Result<MutationOutcome, MutationError> {
    update_styles(doc, target_id, &side_map("margin", sides))
}

pub fn set_padding(
    doc: &mut Document,
    target_id: &str,
    sides: &Sides,
) -> Result<MutationOutcome, MutationError> {
    update_styles(doc, target_id, &side_map("padding", sides))
}

/// Drop the `style` attribute entirely
pub fn clear_styles(
    doc: &mut Document,
    target_id: &str,
) -> Result<MutationOutcome, MutationError> {
    let path = located(doc, target_id)?;
    let element = element_at_mut(doc, &path, target_id)?;
    let previous_value = element.remove_attribute(STYLE_ATTR).map(|attr| attr.value);

    Ok(MutationOutcome {
        message: format!("Cleared styles on \"{}\"", target_id),
        previous_value,
        ..Default::default()
    })
}

/// Read-only projection of the element's style object
pub fn get_styles(
    doc: &Document,
    target_id: &str,
) -> Result<BTreeMap<String, String>, MutationError> {
    let path = located(doc, target_id)?;
    let element = doc
        .node_at(&path)
        .and_then(|node| node.as_element())
        .ok_or_else(|| MutationError::NodeNotFound(target_id.to_string()))?;

    let mut styles = BTreeMap::new();
    if let Some(AttributeValue::Expression {
        expression: Expression::Object { entries },
    }) = element.attribute(STYLE_ATTR).map(|attr| &attr.value)
    {
        for entry in entries {
            let value = match &entry.value {
                Expression::StringLiteral { value } => value.clone(),
                other => generate_expression(other),
            };
            styles.insert(entry.key.clone(), value);
        }
    }
    Ok(styles)
}

/// Add a token to `className`; a no-op when already present
pub fn add_class_name(
    doc: &mut Document,
    target_id: &str,
    class_name: &str,
) -> Result<MutationOutcome, MutationError> {
    let path = located(doc, target_id)?;
    let element = element_at_mut(doc, &path, target_id)?;
    let mut tokens = class_tokens(element)?;

    if tokens.iter().any(|token| token == class_name) {
        return Ok(MutationOutcome::new(format!(
            "\"{}\" already has class \"{}\"",
            target_id, class_name
        )));
    }
    tokens.push(class_name.to_string());
    set_class_tokens(element, &tokens);

    Ok(MutationOutcome::new(format!(
        "Added class \"{}\" to \"{}\"",
        class_name, target_id
    )))
}

/// Remove a token from `className`; a no-op when absent. The attribute
/// disappears with its last token.
pub fn remove_class_name(
    doc: &mut Document,
    target_id: &str,
    class_name: &str,
) -> Result<MutationOutcome, MutationError> {
    let path = located(doc, target_id)?;
    let element = element_at_mut(doc, &path, target_id)?;
    let mut tokens = class_tokens(element)?;

    let before = tokens.len();
    tokens.retain(|token| token != class_name);
    if tokens.len() == before {
        return Ok(MutationOutcome::new(format!(
            "\"{}\" does not have class \"{}\"",
            target_id, class_name
        )));
    }

    if tokens.is_empty() {
        element.remove_attribute(CLASS_ATTR);
    } else {
        set_class_tokens(element, &tokens);
    }

    Ok(MutationOutcome::new(format!(
        "Removed class \"{}\" from \"{}\"",
        class_name, target_id
    )))
}

fn class_tokens(element: &Element) -> Result<Vec<String>, MutationError> {
    match element.attribute(CLASS_ATTR).map(|attr| &attr.value) {
        None => Ok(Vec::new()),
        Some(AttributeValue::String { value }) => {
            Ok(value.split_whitespace().map(str::to_string).collect())
        }
        Some(_) => Err(MutationError::InvalidPayload(format!(
            "{} is not a static string",
            CLASS_ATTR
        ))),
    }
}

fn set_class_tokens(element: &mut Element, tokens: &[String]) {
    let value = AttributeValue::String {
        value: tokens.join(" "),
    };
    match element.attribute_mut(CLASS_ATTR) {
        Some(attr) => attr.value = value,
        None => element.attributes.push(Attribute::new(CLASS_ATTR, value)),
    }
}

/// `None` / empty string delete; numbers (and numeric strings) become
/// `Npx`; everything else passes through
fn normalized(value: Option<&StyleInput>) -> Option<String> {
    match value {
        None => None,
        Some(StyleInput::Number(n)) => Some(px(*n)),
        Some(StyleInput::String(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else if let Ok(n) = trimmed.parse::<f64>() {
                Some(px(n))
            } else {
                Some(trimmed.to_string())
            }
        }
    }
}

fn px(n: f64) -> String {
    if n.fract() == 0.0 && n.is_finite() && n.abs() < 1e15 {
        format!("{}px", n as i64)
    } else {
        format!("{}px", n)
    }
}

fn side_map(prefix: &str, sides: &Sides) -> BTreeMap<String, Option<StyleInput>> {
    let mut map = BTreeMap::new();
    let pairs = [
        ("Top", &sides.top),
        ("Right", &sides.right),
        ("Bottom", &sides.bottom),
        ("Left", &sides.left),
    ];
    for (suffix, value) in pairs {
        if let Some(value) = value {
            map.insert(format!("{}{}", prefix, suffix), Some(value.clone()));
        }
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;
    use weave_parser::{generate, parse};

    fn updates(pairs: &[(&str, Option<StyleInput>)]) -> BTreeMap<String, Option<StyleInput>> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_set_spacing_numeric_shorthand() {
        let mut doc = parse("<div data-editable=\"box\">x</div>").unwrap();

        set_spacing(
            &mut doc,
            "box",
            &updates(&[("marginTop", Some(StyleInput::Number(10.0)))]),
        )
        .unwrap();

        assert_eq!(
            generate(&doc).unwrap(),
            "<div data-editable=\"box\" style={{marginTop: '10px'}}>x</div>"
        );
    }

    #[test]
    fn test_set_spacing_rejects_non_spacing_keys() {
        let mut doc = parse("<div data-editable=\"box\">x</div>").unwrap();
        assert!(matches!(
            set_spacing(
                &mut doc,
                "box",
                &updates(&[("color", Some(StyleInput::String("red".to_string())))]),
            )
            .unwrap_err(),
            MutationError::InvalidPayload(_)
        ));
    }

    #[test]
    fn test_update_styles_merges_and_deletes() {
        let mut doc = parse(
            "<div data-editable=\"box\" style={{color: 'red', padding: '4px'}}>x</div>",
        )
        .unwrap();

        update_styles(
            &mut doc,
            "box",
            &updates(&[
                ("color", Some(StyleInput::String("blue".to_string()))),
                ("padding", None),
                ("gap", Some(StyleInput::Number(8.0))),
            ]),
        )
        .unwrap();

        assert_eq!(
            generate(&doc).unwrap(),
            "<div data-editable=\"box\" style={{color: 'blue', gap: '8px'}}>x</div>"
        );
    }

    #[test]
    fn test_update_styles_drops_empty_object() {
        let mut doc =
            parse("<div data-editable=\"box\" style={{color: 'red'}}>x</div>").unwrap();

        update_styles(&mut doc, "box", &updates(&[("color", None)])).unwrap();
        assert_eq!(
            generate(&doc).unwrap(),
            "<div data-editable=\"box\">x</div>"
        );
    }

    #[test]
    fn test_set_margin_sides() {
        let mut doc = parse("<div data-editable=\"box\">x</div>").unwrap();

        set_margin(
            &mut doc,
            "box",
            &Sides {
                top: Some(StyleInput::Number(4.0)),
                left: Some(StyleInput::String("auto".to_string())),
                ..Default::default()
            },
        )
        .unwrap();

        let styles = get_styles(&doc, "box").unwrap();
        assert_eq!(styles.get("marginTop").map(String::as_str), Some("4px"));
        assert_eq!(styles.get("marginLeft").map(String::as_str), Some("auto"));
        assert!(!styles.contains_key("marginRight"));
    }

    #[test]
    fn test_clear_styles() {
        let mut doc =
            parse("<div data-editable=\"box\" style={{color: 'red'}} id=\"k\">x</div>").unwrap();

        let outcome = clear_styles(&mut doc, "box").unwrap();
        assert!(outcome.previous_value.is_some());
        assert_eq!(
            generate(&doc).unwrap(),
            "<div data-editable=\"box\" id=\"k\">x</div>"
        );
    }

    #[test]
    fn test_class_name_token_set() {
        let mut doc =
            parse("<div data-editable=\"box\" className=\"card\">x</div>").unwrap();

        add_class_name(&mut doc, "box", "active").unwrap();
        // idempotent
        add_class_name(&mut doc, "box", "active").unwrap();
        assert_eq!(
            generate(&doc).unwrap(),
            "<div data-editable=\"box\" className=\"card active\">x</div>"
        );

        remove_class_name(&mut doc, "box", "card").unwrap();
        remove_class_name(&mut doc, "box", "card").unwrap();
        assert_eq!(
            generate(&doc).unwrap(),
            "<div data-editable=\"box\" className=\"active\">x</div>"
        );

        remove_class_name(&mut doc, "box", "active").unwrap();
        assert_eq!(generate(&doc).unwrap(), "<div data-editable=\"box\">x</div>");
    }

    #[test]
    fn test_add_class_creates_attribute() {
        let mut doc = parse("<div data-editable=\"box\">x</div>").unwrap();
        add_class_name(&mut doc, "box", "hero").unwrap();
        assert_eq!(
            generate(&doc).unwrap(),
            "<div data-editable=\"box\" className=\"hero\">x</div>"
        );
    }

    #[test]
    fn test_dynamic_class_rejected() {
        let mut doc =
            parse("<div data-editable=\"box\" className={theme}>x</div>").unwrap();
        assert!(matches!(
            add_class_name(&mut doc, "box", "x").unwrap_err(),
            MutationError::InvalidPayload(_)
        ));
    }
}
