use super::ids;

use tideline_core::query::NewRecord;
use tideline_core::schema::Model;
use tideline_core::{Error, Record, Result, Schema};

use indexmap::IndexMap;
use serde_json::Value;

pub(super) fn new_record(schema: &Schema, model: &Model, raw: Value) -> Result<NewRecord> {
    let values = match raw {
        Value::Object(values) => values,
        other => {
            return Err(Error::invalid_new_records(format!(
                "a new record must be a dictionary, got `{other}`"
            )))
        }
    };

    let (values, collections) = split(schema, model, values, Error::invalid_new_records)?;

    Ok(NewRecord {
        values,
        collections,
    })
}

pub(super) fn values_to_set(
    schema: &Schema,
    model: &Model,
    raw: Value,
) -> Result<(Record, IndexMap<String, Vec<Value>>)> {
    let values = match raw {
        Value::Object(values) => values,
        other => {
            return Err(Error::invalid_values_to_set(format!(
                "values to set must be a dictionary, got `{other}`"
            )))
        }
    };

    if let Some(Value::Null) = values.get(&model.primary_key) {
        return Err(Error::invalid_values_to_set(format!(
            "cannot set primary key `{}` to null",
            model.primary_key
        )));
    }

    split(schema, model, values, Error::invalid_values_to_set)
}

/// Separate plural association values, which are not stored on the record
/// itself, from everything else.
fn split(
    schema: &Schema,
    model: &Model,
    values: Record,
    invalid: fn(String) -> Error,
) -> Result<(Record, IndexMap<String, Vec<Value>>)> {
    let mut stored = Record::new();
    let mut collections = IndexMap::new();

    for (name, value) in values {
        let Some(attr) = model.attribute(&name) else {
            return Err(invalid(format!(
                "`{name}` is not a known attribute of `{}`",
                model.identity
            )));
        };

        let Some(has_many) = attr.as_has_many() else {
            stored.insert(name, value);
            continue;
        };

        let ids = match value {
            Value::Null => vec![],
            value => ids::normalize(schema.model(&has_many.target)?, value, invalid)?,
        };

        collections.insert(name, ids);
    }

    Ok((stored, collections))
}
