use tideline_core::query::Criteria;
use tideline_core::schema::Model;
use tideline_core::{Error, Result};

use serde_json::Value;

pub(super) fn normalize_select(model: &Model, raw: Value) -> Result<Vec<String>> {
    let names = names("select", raw)?;

    if names.is_empty() {
        return Err(Error::invalid_criteria("`select` must not be empty"));
    }

    if names.iter().any(|name| name == Criteria::SELECT_ALL) {
        if names.len() > 1 {
            return Err(Error::invalid_criteria("`*` must be the only `select` entry"));
        }
        return Ok(names);
    }

    for name in &names {
        stored_attribute(model, "select", name)?;
    }

    Ok(names)
}

pub(super) fn normalize_omit(model: &Model, raw: Value) -> Result<Vec<String>> {
    let names = names("omit", raw)?;

    for name in &names {
        stored_attribute(model, "omit", name)?;

        if *name == model.primary_key {
            return Err(Error::invalid_criteria(format!(
                "cannot omit the primary key `{name}`"
            )));
        }
    }

    Ok(names)
}

/// Parse an array of attribute names, dropping duplicates.
fn names(clause: &str, raw: Value) -> Result<Vec<String>> {
    let Value::Array(items) = raw else {
        return Err(Error::invalid_criteria(format!(
            "`{clause}` must be an array of attribute names"
        )));
    };

    let mut names: Vec<String> = vec![];

    for item in items {
        let name = match item {
            Value::String(name) => name,
            other => {
                return Err(Error::invalid_criteria(format!(
                    "`{clause}` entries must be strings, got `{other}`"
                )))
            }
        };

        if !names.contains(&name) {
            names.push(name);
        }
    }

    Ok(names)
}

fn stored_attribute(model: &Model, clause: &str, name: &str) -> Result<()> {
    match model.attribute(name) {
        Some(attr) if attr.is_plural() => Err(Error::invalid_criteria(format!(
            "`{clause}` cannot name plural association `{name}`; populate it instead"
        ))),
        Some(_) => Ok(()),
        None => Err(Error::invalid_criteria(format!(
            "`{clause}` names `{name}`, which is not a known attribute of `{}`",
            model.identity
        ))),
    }
}
