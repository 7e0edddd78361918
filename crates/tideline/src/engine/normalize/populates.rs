use super::criteria;

use tideline_core::query::{Criteria, Method, Populates};
use tideline_core::schema::{AttributeTy, Model};
use tideline_core::{Error, Result, Schema};

use serde_json::Value;

pub(super) fn normalize(schema: &Schema, model: &Model, raw: Value) -> Result<Populates> {
    let entries = match raw {
        Value::Null => return Ok(Populates::new()),
        Value::Object(entries) => entries,
        other => {
            return Err(Error::invalid_populates(format!(
                "populates must be a dictionary, got `{other}`"
            )))
        }
    };

    let mut populates = Populates::new();

    for (name, subcriteria) in entries {
        let Some(attr) = model.attribute(&name) else {
            return Err(Error::invalid_populates(format!(
                "`{name}` is not a known attribute of `{}`",
                model.identity
            )));
        };

        let criteria = match (&attr.ty, subcriteria) {
            (_, Value::Null | Value::Bool(false)) => continue,
            (AttributeTy::Primitive(_), _) => {
                return Err(Error::invalid_populates(format!(
                    "`{name}` is not an association"
                )))
            }
            (_, Value::Bool(true)) => Criteria::default(),
            (AttributeTy::BelongsTo(_), Value::Object(subcriteria)) if subcriteria.is_empty() => {
                Criteria::default()
            }
            (AttributeTy::BelongsTo(_), _) => {
                return Err(Error::invalid_populates(format!(
                    "cannot use subcriteria to populate singular association `{name}`"
                )))
            }
            (AttributeTy::HasMany(has_many), subcriteria @ Value::Object(_)) => {
                let child = schema.model(&has_many.target)?;

                match criteria::normalize(child, subcriteria, Method::Find) {
                    Ok(criteria) => criteria,
                    // Nothing can match; the join still runs but yields no
                    // children.
                    Err(err) if err.is_noop() => Criteria {
                        limit: Some(0),
                        ..Criteria::default()
                    },
                    Err(err) => {
                        return Err(err.context(Error::invalid_populates(format!(
                            "invalid subcriteria for `{name}`"
                        ))))
                    }
                }
            }
            (AttributeTy::HasMany(_), other) => {
                return Err(Error::invalid_populates(format!(
                    "`{name}` must be populated with `true` or a subcriteria dictionary, got `{other}`"
                )))
            }
        };

        populates.insert(name, criteria);
    }

    Ok(populates)
}
