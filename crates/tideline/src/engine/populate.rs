//! In-memory join resolution for adapters without native join support.
//!
//! The parent records are fetched first, then one query per join hop. The
//! children are grouped under their parents exactly as a native join would
//! return them, with `skip`/`limit` applied per parent.

use super::Engine;

use tideline_core::adapter::operation::Find;
use tideline_core::adapter::Operation;
use tideline_core::query::{Join, Meta, PhysicalCriteria, Where};
use tideline_core::schema::Model;
use tideline_core::{bail, Omen, Record, Result};

use serde_json::{json, Value};

impl Engine {
    pub(super) async fn find_with_polyfill(
        &self,
        model: &Model,
        find: Find,
        omen: Omen,
    ) -> Result<Vec<Record>> {
        let Find {
            using,
            criteria,
            joins,
            meta,
        } = find;

        let mut parents = self
            .exec_operation(
                model,
                Operation::Find(Find {
                    using,
                    criteria,
                    joins: vec![],
                    meta: meta.clone(),
                }),
                omen,
            )
            .await?
            .into_records()?;

        let mut joins = joins.iter();

        while let Some(join) = joins.next() {
            if join.select {
                self.populate_direct(&mut parents, join, &meta, omen).await?;
            } else {
                let Some(to_child) = joins.next() else {
                    bail!("join into `{}` is not followed by a join out of it", join.child);
                };

                self.populate_via_mediator(&mut parents, join, to_child, &meta, omen)
                    .await?;
            }
        }

        Ok(parents)
    }

    async fn populate_direct(
        &self,
        parents: &mut [Record],
        join: &Join,
        meta: &Meta,
        omen: Omen,
    ) -> Result<()> {
        let keys = distinct(parents.iter().filter_map(|parent| parent.get(&join.parent_key)));

        let children = if keys.is_empty() {
            vec![]
        } else {
            let criteria = join.criteria.clone().unwrap_or_default();
            self.find_children(join, criteria, &join.child_key, keys, meta, omen)
                .await?
        };

        for parent in parents.iter_mut() {
            let key = parent.get(&join.parent_key).cloned().unwrap_or(Value::Null);
            let matching = children
                .iter()
                .filter(|child| !key.is_null() && child.get(&join.child_key) == Some(&key));

            let value = if join.collection {
                Value::Array(page(matching, join.criteria.as_ref()))
            } else {
                matching
                    .cloned()
                    .map(Value::Object)
                    .next()
                    .unwrap_or(Value::Null)
            };

            if join.remove_parent_key {
                parent.remove(&join.parent_key);
            }

            parent.insert(join.alias.clone(), value);
        }

        Ok(())
    }

    async fn populate_via_mediator(
        &self,
        parents: &mut [Record],
        to_mediator: &Join,
        to_child: &Join,
        meta: &Meta,
        omen: Omen,
    ) -> Result<()> {
        let keys = distinct(
            parents
                .iter()
                .filter_map(|parent| parent.get(&to_mediator.parent_key)),
        );

        let links = if keys.is_empty() {
            vec![]
        } else {
            let criteria = PhysicalCriteria {
                select: vec![to_mediator.child_key.clone(), to_child.parent_key.clone()],
                ..PhysicalCriteria::default()
            };

            self.find_children(to_mediator, criteria, &to_mediator.child_key, keys, meta, omen)
                .await?
        };

        let child_ids = distinct(links.iter().filter_map(|link| link.get(&to_child.parent_key)));

        let children = if child_ids.is_empty() {
            vec![]
        } else {
            let criteria = to_child.criteria.clone().unwrap_or_default();
            self.find_children(to_child, criteria, &to_child.child_key, child_ids, meta, omen)
                .await?
        };

        for parent in parents.iter_mut() {
            let key = parent
                .get(&to_mediator.parent_key)
                .cloned()
                .unwrap_or(Value::Null);

            let linked: Vec<&Value> = links
                .iter()
                .filter(|link| !key.is_null() && link.get(&to_mediator.child_key) == Some(&key))
                .filter_map(|link| link.get(&to_child.parent_key))
                .collect();

            let matching = children.iter().filter(|child| {
                child
                    .get(&to_child.child_key)
                    .is_some_and(|id| linked.contains(&id))
            });

            parent.insert(
                to_child.alias.clone(),
                Value::Array(page(matching, to_child.criteria.as_ref())),
            );
        }

        Ok(())
    }

    /// Fetch the child side of one join hop, restricted to `column IN keys`.
    /// `skip` and `limit` are dropped here and applied per parent instead.
    async fn find_children(
        &self,
        join: &Join,
        mut criteria: PhysicalCriteria,
        column: &str,
        keys: Vec<Value>,
        meta: &Meta,
        omen: Omen,
    ) -> Result<Vec<Record>> {
        let child = self.schema.model(&join.child_identity)?;

        criteria.where_clause = restrict(criteria.where_clause, column, keys);
        criteria.skip = 0;
        criteria.limit = None;

        if !criteria.select.is_empty() && !criteria.select.iter().any(|name| name == column) {
            criteria.select.push(column.to_string());
        }

        let find = Find {
            using: join.child.clone(),
            criteria,
            joins: vec![],
            meta: meta.clone(),
        };

        self.exec_operation(child, Operation::Find(find), omen)
            .await?
            .into_records()
    }
}

fn restrict(clause: Where, column: &str, keys: Vec<Value>) -> Where {
    let mut restriction = Where::new();
    restriction.insert(column.to_string(), json!({ "in": keys }));

    if clause.is_empty() {
        return restriction;
    }

    let mut combined = Where::new();
    combined.insert(
        "and".to_string(),
        Value::Array(vec![Value::Object(clause), Value::Object(restriction)]),
    );
    combined
}

fn distinct<'a>(values: impl Iterator<Item = &'a Value>) -> Vec<Value> {
    let mut distinct: Vec<Value> = vec![];

    for value in values {
        if !value.is_null() && !distinct.contains(value) {
            distinct.push(value.clone());
        }
    }

    distinct
}

/// Apply a join's `skip`/`limit` to the children of a single parent.
fn page<'a>(
    children: impl Iterator<Item = &'a Record>,
    criteria: Option<&PhysicalCriteria>,
) -> Vec<Value> {
    let (skip, limit) = match criteria {
        Some(criteria) => (criteria.skip, criteria.limit),
        None => (0, None),
    };

    children
        .skip(skip as usize)
        .take(limit.map_or(usize::MAX, |limit| limit as usize))
        .cloned()
        .map(Value::Object)
        .collect()
}
