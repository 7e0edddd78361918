use super::{select, sort, where_clause};

use tideline_core::query::{Criteria, Method, Where};
use tideline_core::schema::Model;
use tideline_core::{Error, Result};

use serde_json::{json, Value};

/// Top-level keys recognised as clauses. A dictionary with none of them is
/// shorthand for a `where` clause.
const CLAUSES: &[&str] = &["where", "limit", "skip", "sort", "select", "omit"];

pub(super) fn normalize(model: &Model, raw: Value, method: Method) -> Result<Criteria> {
    let mut clauses = match raw {
        Value::Null | Value::Bool(true) => return Ok(Criteria::default()),
        Value::Bool(false) => return Err(Error::noop("criteria is `false`")),
        Value::String(_) | Value::Number(_) => {
            let mut clause = Where::new();
            clause.insert(model.primary_key.clone(), raw);
            wrap_where(clause)
        }
        Value::Array(ids) => {
            let mut clause = Where::new();
            clause.insert(model.primary_key.clone(), json!({ "in": ids }));
            wrap_where(clause)
        }
        Value::Object(map) if !map.keys().any(|key| CLAUSES.contains(&&key[..])) => wrap_where(map),
        Value::Object(map) => map,
    };

    if let Some(key) = clauses.keys().find(|key| !CLAUSES.contains(&&key[..])) {
        return Err(Error::invalid_criteria(format!(
            "unrecognized clause `{key}` mixed with `where`/`limit`/`skip`/`sort`/`select`/`omit`"
        )));
    }

    if !method.is_read() {
        if let Some(key) = clauses.keys().find(|key| *key != "where") {
            return Err(Error::invalid_criteria(format!(
                "`{method}` only supports a `where` clause, got `{key}`"
            )));
        }
    }

    let mut criteria = Criteria::default();

    match clauses.remove("where") {
        None | Some(Value::Null) => {}
        Some(Value::Object(clause)) => criteria.where_clause = where_clause::normalize(model, clause)?,
        Some(other) => {
            return Err(Error::invalid_criteria(format!(
                "`where` must be a dictionary, got `{other}`"
            )))
        }
    }

    if let Some(limit) = clauses.remove("limit") {
        criteria.limit = non_negative("limit", limit)?;

        if criteria.limit == Some(0) {
            return Err(Error::noop("`limit` is zero"));
        }
    }

    if let Some(skip) = clauses.remove("skip") {
        criteria.skip = non_negative("skip", skip)?.unwrap_or(0);
    }

    if let Some(raw) = clauses.remove("sort") {
        criteria.sort = sort::normalize(model, raw)?;
    }

    if let Some(raw) = clauses.remove("select") {
        criteria.select = select::normalize_select(model, raw)?;
    }

    if let Some(raw) = clauses.remove("omit") {
        criteria.omit = select::normalize_omit(model, raw)?;

        if !criteria.omit.is_empty() && !criteria.is_select_all() {
            return Err(Error::invalid_criteria(
                "`omit` cannot be combined with an explicit `select`",
            ));
        }
    }

    Ok(criteria)
}

fn wrap_where(clause: Where) -> serde_json::Map<String, Value> {
    let mut clauses = serde_json::Map::new();
    clauses.insert("where".to_string(), Value::Object(clause));
    clauses
}

fn non_negative(clause: &str, value: Value) -> Result<Option<u64>> {
    match value {
        Value::Null => Ok(None),
        Value::Number(n) => match n.as_u64() {
            Some(n) => Ok(Some(n)),
            None => Err(Error::invalid_criteria(format!(
                "`{clause}` must be a non-negative integer, got `{n}`"
            ))),
        },
        other => Err(Error::invalid_criteria(format!(
            "`{clause}` must be a non-negative integer, got `{other}`"
        ))),
    }
}
