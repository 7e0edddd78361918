//! Stage two: validate a caller's request against the schema and put it in
//! canonical form.
//!
//! A request that provably matches nothing fails with `E_NOOP`. Callers
//! catch it and answer with the method's empty result.

mod criteria;
mod ids;
mod meta;
mod populates;
mod select;
mod sort;
mod values;
mod where_clause;

use tideline_core::query::{CollectionChange, Method, QueryBody, Request, StageTwoQuery};
use tideline_core::schema::{Model, Type};
use tideline_core::{Error, Result, Schema};

use serde_json::Value;

pub(crate) fn normalize(schema: &Schema, method: Method, request: Request) -> Result<StageTwoQuery> {
    let model = schema.model(&request.using)?;
    let meta = meta::normalize(request.meta, request.lease)?;

    if !method.is_read() && !is_absent(&request.populates) {
        return Err(Error::invalid_populates(format!(
            "`{method}` does not support populates"
        )));
    }

    let body = match method {
        Method::Find | Method::FindOne | Method::Stream => QueryBody::Find {
            criteria: criteria::normalize(model, request.criteria, method)?,
            populates: populates::normalize(schema, model, request.populates)?,
        },
        Method::Count => QueryBody::Count {
            criteria: criteria::normalize(model, request.criteria, method)?,
        },
        Method::Sum | Method::Avg => {
            let numeric_attr_name = numeric_attr_name(model, request.numeric_attr_name)?;

            QueryBody::Aggregate {
                criteria: criteria::normalize(model, request.criteria, method)?,
                numeric_attr_name,
            }
        }
        Method::Create => QueryBody::Create {
            new_records: vec![values::new_record(schema, model, request.new_records)?],
        },
        Method::CreateEach => {
            let Value::Array(items) = request.new_records else {
                return Err(Error::invalid_new_records(
                    "`createEach` expects an array of dictionaries",
                ));
            };

            if items.is_empty() {
                return Err(Error::noop("no records to create"));
            }

            QueryBody::Create {
                new_records: items
                    .into_iter()
                    .map(|item| values::new_record(schema, model, item))
                    .collect::<Result<_>>()?,
            }
        }
        Method::Update => {
            let criteria = criteria::normalize(model, request.criteria, method)?;
            let (values_to_set, collections) =
                values::values_to_set(schema, model, request.values_to_set)?;

            QueryBody::Update {
                criteria,
                values_to_set,
                collections,
            }
        }
        Method::Destroy => QueryBody::Destroy {
            criteria: criteria::normalize(model, request.criteria, method)?,
        },
        Method::AddToCollection | Method::RemoveFromCollection | Method::ReplaceCollection => {
            let Some(collection_attr_name) = request.collection_attr_name else {
                return Err(Error::invalid_collection_attr_name(
                    "a collection attribute name is required",
                ));
            };

            let Some(has_many) = model.has_many(&collection_attr_name) else {
                return Err(Error::invalid_collection_attr_name(format!(
                    "`{collection_attr_name}` is not a plural association of `{}`",
                    model.identity
                )));
            };

            let target_record_ids =
                ids::normalize(model, request.target_record_ids, Error::invalid_target_record_ids)?;

            if target_record_ids.is_empty() {
                return Err(Error::noop("no target records"));
            }

            let child = schema.model(&has_many.target)?;
            let associated_ids =
                ids::normalize(child, request.associated_ids, Error::invalid_associated_ids)?;

            if associated_ids.is_empty() && method != Method::ReplaceCollection {
                return Err(Error::noop("no associated records"));
            }

            QueryBody::Collection(CollectionChange {
                target_record_ids,
                collection_attr_name,
                associated_ids,
            })
        }
    };

    Ok(StageTwoQuery {
        method,
        using: model.identity.clone(),
        meta,
        body,
    })
}

fn numeric_attr_name(model: &Model, name: Option<String>) -> Result<String> {
    let Some(name) = name else {
        return Err(Error::invalid_numeric_attr_name(
            "a numeric attribute name is required",
        ));
    };

    match model.attribute(&name).and_then(|attr| attr.primitive_ty()) {
        Some(Type::Number) => Ok(name),
        Some(_) => Err(Error::invalid_numeric_attr_name(format!(
            "`{name}` is not a number attribute"
        ))),
        None => Err(Error::invalid_numeric_attr_name(format!(
            "`{name}` is not a known attribute of `{}`",
            model.identity
        ))),
    }
}

/// Loose inputs treat `null` and `false` alike.
fn is_absent(value: &Value) -> bool {
    matches!(value, Value::Null | Value::Bool(false))
}
