use tideline_core::query::{Direction, SortClause};
use tideline_core::schema::Model;
use tideline_core::{Error, Result};

use serde_json::Value;

/// Accepts `"name"`, `"name DESC"`, `{ name: -1 }`, `{ name: "ASC" }` and
/// arrays of any of those.
pub(super) fn normalize(model: &Model, raw: Value) -> Result<Vec<SortClause>> {
    let mut clauses = vec![];

    match raw {
        Value::Null => {}
        Value::Array(items) => {
            for item in items {
                parse_item(item, &mut clauses)?;
            }
        }
        item => parse_item(item, &mut clauses)?,
    }

    for clause in &clauses {
        match model.attribute(clause.head()) {
            Some(attr) if attr.is_plural() => {
                return Err(Error::invalid_criteria(format!(
                    "cannot sort by plural association `{}`",
                    clause.head()
                )))
            }
            Some(_) => {}
            None => {
                return Err(Error::invalid_criteria(format!(
                    "cannot sort by `{}`: not a known attribute of `{}`",
                    clause.key, model.identity
                )))
            }
        }
    }

    Ok(clauses)
}

fn parse_item(item: Value, clauses: &mut Vec<SortClause>) -> Result<()> {
    match item {
        Value::String(s) => clauses.push(parse_str(&s)?),
        Value::Object(map) => {
            if map.is_empty() {
                return Err(Error::invalid_criteria("empty `sort` dictionary"));
            }

            for (key, direction) in map {
                let direction = match &direction {
                    Value::String(token) => Direction::parse(token),
                    Value::Number(n) => n.as_i64().and_then(Direction::from_i64),
                    _ => None,
                };

                let Some(direction) = direction else {
                    return Err(Error::invalid_criteria(format!(
                        "invalid sort direction for `{key}`; expected `ASC`, `DESC`, 1 or -1"
                    )));
                };

                clauses.push(SortClause::new(key, direction));
            }
        }
        other => {
            return Err(Error::invalid_criteria(format!(
                "`sort` entries must be strings or dictionaries, got `{other}`"
            )))
        }
    }

    Ok(())
}

fn parse_str(s: &str) -> Result<SortClause> {
    let mut tokens = s.split_whitespace();

    let (Some(key), direction, None) = (tokens.next(), tokens.next(), tokens.next()) else {
        return Err(Error::invalid_criteria(format!("cannot parse sort clause `{s}`")));
    };

    let direction = match direction {
        None => Direction::Asc,
        Some(token) => match Direction::parse(token) {
            Some(direction) => direction,
            None => {
                return Err(Error::invalid_criteria(format!(
                    "unrecognized sort direction `{token}` in `{s}`"
                )))
            }
        },
    };

    Ok(SortClause::new(key, direction))
}
