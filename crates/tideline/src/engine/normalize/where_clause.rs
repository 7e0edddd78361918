use tideline_core::query::Where;
use tideline_core::schema::Model;
use tideline_core::{Error, Result};

use serde_json::{Map, Value};

const MODIFIERS: &[&str] = &[
    "in", "nin", "<", "<=", ">", ">=", "!=", "like", "contains", "startsWith", "endsWith",
];

/// Normalize a `where` dictionary. Fails with `E_NOOP` when the clause can
/// match nothing.
pub(super) fn normalize(model: &Model, clause: Where) -> Result<Where> {
    let mut normalized = Where::new();

    for (key, value) in clause {
        if key == "and" {
            let mut conjuncts = vec![];

            for branch in branches(&key, value)? {
                // One impossible conjunct makes the whole `and` impossible.
                conjuncts.push(Value::Object(normalize(model, branch)?));
            }

            normalized.insert(key, Value::Array(conjuncts));
        } else if key == "or" {
            let mut disjuncts = vec![];

            for branch in branches(&key, value)? {
                match normalize(model, branch) {
                    Ok(branch) => disjuncts.push(Value::Object(branch)),
                    Err(err) if err.is_noop() => {}
                    Err(err) => return Err(err),
                }
            }

            if disjuncts.is_empty() {
                return Err(Error::noop("every `or` branch matches nothing"));
            }

            normalized.insert(key, Value::Array(disjuncts));
        } else {
            let Some(attr) = model.attribute(&key) else {
                return Err(Error::invalid_criteria(format!(
                    "`{key}` is not a known attribute of `{}`",
                    model.identity
                )));
            };

            if attr.is_plural() {
                return Err(Error::invalid_criteria(format!(
                    "cannot filter by plural association `{key}`"
                )));
            }

            if let Some(constraint) = constraint(&key, value)? {
                normalized.insert(key, constraint);
            }
        }
    }

    Ok(normalized)
}

fn branches(key: &str, value: Value) -> Result<Vec<Where>> {
    let Value::Array(items) = value else {
        return Err(Error::invalid_criteria(format!("`{key}` must be an array")));
    };

    if items.is_empty() {
        return Err(Error::invalid_criteria(format!("`{key}` must not be empty")));
    }

    items
        .into_iter()
        .map(|item| match item {
            Value::Object(branch) => Ok(branch),
            other => Err(Error::invalid_criteria(format!(
                "`{key}` branches must be dictionaries, got `{other}`"
            ))),
        })
        .collect()
}

/// Normalize the constraint on one attribute. `None` means the constraint
/// was vacuous and can be dropped.
fn constraint(attr: &str, value: Value) -> Result<Option<Value>> {
    match value {
        // Shorthand for `in`
        Value::Array(items) => {
            let mut modifiers = Map::new();
            modifiers.insert("in".to_string(), Value::Array(items));
            constraint(attr, Value::Object(modifiers))
        }
        Value::Object(modifiers) => {
            if modifiers.is_empty() {
                return Err(Error::invalid_criteria(format!(
                    "constraint on `{attr}` is an empty dictionary"
                )));
            }

            let mut normalized = Map::new();

            for (modifier, operand) in modifiers {
                if let Some(operand) = modifier_operand(attr, &modifier, operand)? {
                    normalized.insert(modifier, operand);
                }
            }

            if normalized.is_empty() {
                Ok(None)
            } else {
                Ok(Some(Value::Object(normalized)))
            }
        }
        primitive => Ok(Some(primitive)),
    }
}

fn modifier_operand(attr: &str, modifier: &str, operand: Value) -> Result<Option<Value>> {
    if !MODIFIERS.contains(&modifier) {
        return Err(Error::invalid_criteria(format!(
            "unrecognized modifier `{modifier}` on `{attr}`"
        )));
    }

    match (modifier, operand) {
        ("in" | "nin", Value::Array(items)) => {
            if let Some(item) = items.iter().find(|item| item.is_array() || item.is_object()) {
                return Err(Error::invalid_criteria(format!(
                    "`{modifier}` on `{attr}` may only contain primitives, got `{item}`"
                )));
            }

            match (modifier, items.is_empty()) {
                ("in", true) => Err(Error::noop(format!("`in` list for `{attr}` is empty"))),
                ("nin", true) => Ok(None),
                _ => Ok(Some(Value::Array(items))),
            }
        }
        ("in" | "nin", other) => Err(Error::invalid_criteria(format!(
            "`{modifier}` on `{attr}` expects an array, got `{other}`"
        ))),
        ("like" | "contains" | "startsWith" | "endsWith", operand @ Value::String(_)) => {
            Ok(Some(operand))
        }
        ("like" | "contains" | "startsWith" | "endsWith", other) => {
            Err(Error::invalid_criteria(format!(
                "`{modifier}` on `{attr}` expects a string, got `{other}`"
            )))
        }
        ("<" | "<=" | ">" | ">=", operand @ (Value::String(_) | Value::Number(_))) => {
            Ok(Some(operand))
        }
        ("<" | "<=" | ">" | ">=", other) => Err(Error::invalid_criteria(format!(
            "`{modifier}` on `{attr}` expects a string or a number, got `{other}`"
        ))),
        (_, operand @ (Value::Array(_) | Value::Object(_))) => {
            Err(Error::invalid_criteria(format!(
                "`{modifier}` on `{attr}` expects a primitive, got `{operand}`"
            )))
        }
        (_, operand) => Ok(Some(operand)),
    }
}
