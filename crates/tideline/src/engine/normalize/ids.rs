use tideline_core::schema::{Model, Type};
use tideline_core::{Error, Result};

use serde_json::Value;

/// Normalize primary key values of `model`: a single value or an array of
/// them, deduplicated in order.
pub(super) fn normalize(model: &Model, raw: Value, invalid: fn(String) -> Error) -> Result<Vec<Value>> {
    let pk_ty = model.primary_key_attribute()?.primitive_ty();

    let items = match raw {
        Value::Array(items) => items,
        Value::Null => return Err(invalid("ids are required".to_string())),
        single => vec![single],
    };

    let mut ids: Vec<Value> = vec![];

    for id in items {
        let valid = match (&id, pk_ty) {
            (Value::Number(_), Some(Type::Number)) => true,
            (Value::String(s), Some(Type::String)) => !s.is_empty(),
            (Value::String(_), Some(Type::Number)) | (Value::Number(_), Some(Type::String)) => false,
            (Value::Number(_), _) => true,
            (Value::String(s), _) => !s.is_empty(),
            _ => false,
        };

        if !valid {
            return Err(invalid(format!(
                "`{id}` is not a valid primary key value for `{}`",
                model.identity
            )));
        }

        if !ids.contains(&id) {
            ids.push(id);
        }
    }

    Ok(ids)
}
