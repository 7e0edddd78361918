use super::{normalize, Engine};

use tideline_core::adapter::Rows;
use tideline_core::query::{
    CollectionChange, Criteria, Method, QueryBody, Request, StageTwoQuery,
};
use tideline_core::schema::Model;
use tideline_core::{bail, Error, Omen, Record, Result};

use indexmap::IndexMap;
use serde_json::Value;
use tracing::warn;

impl Engine {
    /// `create` or `createEach`. Plural association values are applied with
    /// `replaceCollection` once the records exist.
    pub(crate) async fn create(
        &self,
        method: Method,
        request: Request,
        omen: Omen,
    ) -> Result<Vec<Record>> {
        let mut query = match normalize(&self.schema, method, request) {
            Ok(query) => query,
            Err(err) if err.is_noop() => return Ok(vec![]),
            Err(err) => return Err(err),
        };

        let model = self.schema.model(&query.using)?;

        let QueryBody::Create { new_records } = &mut query.body else {
            bail!("`{method}` was normalized into a non-create body");
        };

        let collections: Vec<IndexMap<String, Vec<Value>>> = new_records
            .iter_mut()
            .map(|new_record| std::mem::take(&mut new_record.collections))
            .collect();

        let has_collections = collections.iter().any(|collections| !collections.is_empty());

        // The created primary keys are needed to attach collections
        let meta = query.meta.clone();
        query.meta.fetch |= has_collections;

        let fetched = query.meta.fetch;
        let rows = self.exec_query(query, omen).await?;
        let mut records = self.written_records(model, rows, fetched)?;

        if has_collections {
            if records.len() != collections.len() {
                bail!(
                    "adapter returned {} records for {} created on `{}`",
                    records.len(),
                    collections.len(),
                    model.identity
                );
            }

            for (record, collections) in records.iter().zip(collections) {
                let id = primary_key_value(model, record)?;

                for (collection_attr_name, associated_ids) in collections {
                    let change = CollectionChange {
                        target_record_ids: vec![id.clone()],
                        collection_attr_name,
                        associated_ids,
                    };

                    self.change_collection(
                        Method::ReplaceCollection,
                        model,
                        change,
                        meta.clone(),
                        omen,
                    )
                    .await?;
                }
            }
        }

        if !meta.fetch {
            records.clear();
        }

        Ok(records)
    }

    /// Update every match. Plural association values replace the collections
    /// of every updated record.
    pub(crate) async fn update(&self, request: Request, omen: Omen) -> Result<Vec<Record>> {
        let mut query = match normalize(&self.schema, Method::Update, request) {
            Ok(query) => query,
            Err(err) if err.is_noop() => return Ok(vec![]),
            Err(err) => return Err(err),
        };

        let model = self.schema.model(&query.using)?;

        let QueryBody::Update { collections, .. } = &mut query.body else {
            bail!("`update` was normalized into a non-update body");
        };

        let collections = std::mem::take(collections);

        let meta = query.meta.clone();
        query.meta.fetch |= !collections.is_empty();

        let fetched = query.meta.fetch;
        let rows = self.exec_query(query, omen).await?;
        let mut records = self.written_records(model, rows, fetched)?;

        if !collections.is_empty() && !records.is_empty() {
            let ids = records
                .iter()
                .map(|record| primary_key_value(model, record))
                .collect::<Result<Vec<_>>>()?;

            for (collection_attr_name, associated_ids) in collections {
                let change = CollectionChange {
                    target_record_ids: ids.clone(),
                    collection_attr_name,
                    associated_ids,
                };

                self.change_collection(
                    Method::ReplaceCollection,
                    model,
                    change,
                    meta.clone(),
                    omen,
                )
                .await?;
            }
        }

        if !meta.fetch {
            records.clear();
        }

        Ok(records)
    }

    /// Destroy every match. With `meta.cascade` the plural associations of
    /// the destroyed records are emptied afterwards.
    pub(crate) async fn destroy(&self, request: Request, omen: Omen) -> Result<Vec<Record>> {
        let query = match normalize(&self.schema, Method::Destroy, request) {
            Ok(query) => query,
            Err(err) if err.is_noop() => return Ok(vec![]),
            Err(err) => return Err(err),
        };

        let model = self.schema.model(&query.using)?;
        let meta = query.meta.clone();

        let cascade_ids = if meta.cascade && model.plural_associations().next().is_some() {
            let Some(criteria) = query.body.criteria() else {
                bail!("`destroy` was normalized into a body without criteria");
            };

            Some(self.find_primary_keys(model, criteria, &query, omen).await?)
        } else {
            None
        };

        let rows = self.exec_query(query, omen).await?;
        let records = self.written_records(model, rows, meta.fetch)?;

        if let Some(ids) = cascade_ids.filter(|ids| !ids.is_empty()) {
            for (attr, _) in model.plural_associations() {
                let change = CollectionChange {
                    target_record_ids: ids.clone(),
                    collection_attr_name: attr.name.clone(),
                    associated_ids: vec![],
                };

                self.change_collection(
                    Method::ReplaceCollection,
                    model,
                    change,
                    meta.clone(),
                    omen,
                )
                .await
                .map_err(Error::propagation)?;
            }
        }

        Ok(records)
    }

    /// Primary keys of every record matching the `where` clause of `criteria`.
    async fn find_primary_keys(
        &self,
        model: &Model,
        criteria: &Criteria,
        query: &StageTwoQuery,
        omen: Omen,
    ) -> Result<Vec<Value>> {
        let find = StageTwoQuery {
            method: Method::Find,
            using: model.identity.clone(),
            meta: query.meta.clone(),
            body: QueryBody::Find {
                criteria: Criteria {
                    where_clause: criteria.where_clause.clone(),
                    select: vec![model.primary_key.clone()],
                    ..Criteria::default()
                },
                populates: Default::default(),
            },
        };

        self.find_records(find, omen)
            .await?
            .iter()
            .map(|record| primary_key_value(model, record))
            .collect()
    }

    /// Unserialize the records a write returned. Records are only expected
    /// when `fetch` was requested.
    fn written_records(&self, model: &Model, rows: Rows, fetch: bool) -> Result<Vec<Record>> {
        if !fetch {
            if matches!(&rows, Rows::Records(records) if !records.is_empty()) {
                warn!(
                    model = %model.identity,
                    "adapter returned records for a write that did not ask for them"
                );
            }

            return Ok(vec![]);
        }

        let mut records = match rows {
            Rows::Empty => vec![],
            rows => rows.into_records()?,
        };

        self.unserialize_records(model, &[], &mut records)?;
        Ok(records)
    }
}

fn primary_key_value(model: &Model, record: &Record) -> Result<Value> {
    match record.get(&model.primary_key) {
        Some(value) if !value.is_null() => Ok(value.clone()),
        _ => Err(Error::consistency(format!(
            "a written `{}` record has no primary key value",
            model.identity
        ))),
    }
}
