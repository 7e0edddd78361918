//! Stage three: turn a normalized query into the column-named operation the
//! adapter runs.

mod join;

use tideline_core::adapter::operation::{
    Aggregate, Count, Create, CreateEach, Destroy, Find, Update,
};
use tideline_core::adapter::Operation;
use tideline_core::query::{Criteria, Method, PhysicalCriteria, QueryBody, StageTwoQuery, Where};
use tideline_core::schema::Model;
use tideline_core::{bail, Result, Schema};

/// Compile a stage-two query. The query is consumed; nothing of it can be
/// observed after compilation.
pub(crate) fn compile(schema: &Schema, query: StageTwoQuery) -> Result<Operation> {
    let StageTwoQuery {
        method,
        using,
        meta,
        body,
    } = query;

    let model = schema.model(&using)?;
    let using = model.table_name.clone();

    let operation = match body {
        QueryBody::Find {
            criteria,
            populates,
        } => {
            let mut joins = vec![];

            for (alias, subcriteria) in populates {
                joins.extend(join::build(schema, model, alias, subcriteria)?);
            }

            let mut select = expand_select(model, &criteria);

            // A singular join matches on the parent's foreign key, so it has
            // to come back from the adapter.
            for join in joins.iter().filter(|join| join.model) {
                push_unique(&mut select, &join.alias);
            }

            let mut criteria = PhysicalCriteria {
                where_clause: criteria.where_clause,
                limit: criteria.limit,
                skip: criteria.skip,
                sort: criteria.sort,
                select,
            };
            model.transformer.serialize_criteria(&mut criteria);

            Operation::Find(Find {
                using,
                criteria,
                joins,
                meta,
            })
        }
        QueryBody::Count { criteria } => Operation::Count(Count {
            using,
            criteria: physical_where(model, criteria),
            meta,
        }),
        QueryBody::Aggregate {
            criteria,
            numeric_attr_name,
        } => {
            let Some(attr) = model.attribute(&numeric_attr_name) else {
                bail!("`{}` has no attribute `{numeric_attr_name}`", model.identity);
            };

            let aggregate = Aggregate {
                using,
                criteria: physical_where(model, criteria),
                numeric_column: attr.column()?.to_string(),
                meta,
            };

            match method {
                Method::Avg => Operation::Avg(aggregate),
                _ => Operation::Sum(aggregate),
            }
        }
        QueryBody::Create { new_records } => {
            let mut new_records: Vec<_> = new_records
                .into_iter()
                .map(|new_record| {
                    let mut values = new_record.values;
                    model.transformer.serialize_values(&mut values);
                    values
                })
                .collect();

            if method == Method::Create {
                if new_records.len() != 1 {
                    bail!("`create` expects exactly one record, got {}", new_records.len());
                }

                Operation::Create(Create {
                    using,
                    new_record: new_records.remove(0),
                    meta,
                })
            } else {
                Operation::CreateEach(CreateEach {
                    using,
                    new_records,
                    meta,
                })
            }
        }
        QueryBody::Update {
            criteria,
            mut values_to_set,
            ..
        } => {
            model.transformer.serialize_values(&mut values_to_set);

            Operation::Update(Update {
                using,
                criteria: physical_where(model, criteria),
                values_to_set,
                meta,
            })
        }
        QueryBody::Destroy { criteria } => Operation::Destroy(Destroy {
            using,
            criteria: physical_where(model, criteria),
            meta,
        }),
        QueryBody::Collection(_) => {
            bail!("`{method}` is carried out as a sequence of operations and has no single compiled form")
        }
    };

    Ok(operation)
}

/// Expand `*`, drop omitted attributes and make sure the primary key is
/// selected. Plural associations are never part of the result.
fn expand_select(model: &Model, criteria: &Criteria) -> Vec<String> {
    let candidates: Vec<String> = if criteria.is_select_all() {
        model
            .stored_attributes()
            .map(|attr| attr.name.clone())
            .collect()
    } else {
        criteria.select.clone()
    };

    let mut select = vec![];

    for name in candidates {
        if !criteria.omit.contains(&name) {
            push_unique(&mut select, &name);
        }
    }

    push_unique(&mut select, &model.primary_key);
    select
}

fn physical_where(model: &Model, criteria: Criteria) -> Where {
    let mut clause = criteria.where_clause;
    model.transformer.serialize_where(&mut clause);
    clause
}

fn push_unique(select: &mut Vec<String>, name: &str) {
    if !select.iter().any(|existing| existing == name) {
        select.push(name.to_string());
    }
}
