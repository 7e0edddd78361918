//! Relationship maintenance for plural associations.
//!
//! A change to a collection is classified once, then carried out as a
//! sequence of ordinary attribute-named writes on either the child model
//! (one-to-many) or the junction/through model (many-to-many). Nothing is
//! rolled back if a later step fails.

mod add;
mod remove;
mod replace;

use super::{normalize, Engine};

use tideline_core::query::{
    CollectionChange, Criteria, Meta, Method, NewRecord, QueryBody, Request, StageTwoQuery, Where,
};
use tideline_core::schema::Model;
use tideline_core::{bail, Omen, Record, Result};

/// Where the links of a plural association physically live.
#[derive(Debug)]
enum Link<'a> {
    /// Children hold the parent's primary key in `via`.
    ForeignKey { child: &'a Model, via: &'a str },

    /// One mediator row per link.
    Mediated {
        mediator: &'a Model,
        parent_reference: &'a str,
        child_reference: &'a str,
    },
}

impl Engine {
    /// `addToCollection`, `removeFromCollection` or `replaceCollection`.
    pub(crate) async fn collection(&self, method: Method, request: Request, omen: Omen) -> Result<()> {
        let query = match normalize(&self.schema, method, request) {
            Ok(query) => query,
            Err(err) if err.is_noop() => return Ok(()),
            Err(err) => return Err(err),
        };

        let model = self.schema.model(&query.using)?;

        let QueryBody::Collection(change) = query.body else {
            bail!("`{method}` was normalized into a non-collection body");
        };

        self.change_collection(method, model, change, query.meta, omen)
            .await
    }

    /// Carry out a normalized collection change. Every write issued skips
    /// lifecycle callbacks.
    pub(super) async fn change_collection(
        &self,
        method: Method,
        model: &Model,
        change: CollectionChange,
        meta: Meta,
        omen: Omen,
    ) -> Result<()> {
        let link = self.link(model, &change.collection_attr_name)?;
        let meta = meta.for_relationship();

        tracing::debug!(
            model = %model.identity,
            collection = %change.collection_attr_name,
            method = %method,
            targets = change.target_record_ids.len(),
            associated = change.associated_ids.len(),
            "changing collection"
        );

        match method {
            Method::ReplaceCollection => self.replace(link, change, meta, omen).await,
            Method::RemoveFromCollection => self.remove(link, change, meta, omen).await,
            Method::AddToCollection => self.add(link, change, meta, omen).await,
            _ => bail!("`{method}` is not a collection method"),
        }
    }

    fn link<'a>(&'a self, model: &'a Model, collection_attr_name: &str) -> Result<Link<'a>> {
        let Some(has_many) = model.has_many(collection_attr_name) else {
            bail!(
                "`{collection_attr_name}` is not a plural association of `{}`",
                model.identity
            );
        };

        let referenced = self.schema.model(&has_many.reference_identity)?;

        if let Some((parent_reference, child_reference)) = has_many.association.references() {
            return Ok(Link::Mediated {
                mediator: referenced,
                parent_reference,
                child_reference,
            });
        }

        let Some(via) = has_many.via.as_deref() else {
            bail!(
                "one-to-many association `{}.{collection_attr_name}` has no `via`",
                model.identity
            );
        };

        Ok(Link::ForeignKey {
            child: referenced,
            via,
        })
    }

    /// Compile and run one relationship write, discarding whatever the
    /// adapter returns.
    async fn write(&self, query: StageTwoQuery, omen: Omen) -> Result<()> {
        self.exec_query(query, omen).await?;
        Ok(())
    }
}

fn destroy(model: &Model, where_clause: Where, meta: Meta) -> StageTwoQuery {
    StageTwoQuery {
        method: Method::Destroy,
        using: model.identity.clone(),
        meta,
        body: QueryBody::Destroy {
            criteria: matching(where_clause),
        },
    }
}

fn update(model: &Model, where_clause: Where, values_to_set: Record, meta: Meta) -> StageTwoQuery {
    StageTwoQuery {
        method: Method::Update,
        using: model.identity.clone(),
        meta,
        body: QueryBody::Update {
            criteria: matching(where_clause),
            values_to_set,
            collections: Default::default(),
        },
    }
}

fn create_each(model: &Model, new_records: Vec<Record>, meta: Meta) -> StageTwoQuery {
    StageTwoQuery {
        method: Method::CreateEach,
        using: model.identity.clone(),
        meta,
        body: QueryBody::Create {
            new_records: new_records
                .into_iter()
                .map(|values| NewRecord {
                    values,
                    collections: Default::default(),
                })
                .collect(),
        },
    }
}

/// One mediator row per (target, associated) pair.
fn cross_product(
    change: &CollectionChange,
    parent_reference: &str,
    child_reference: &str,
) -> Vec<Record> {
    let mut rows = vec![];

    for target in &change.target_record_ids {
        for associated in &change.associated_ids {
            let mut row = Record::new();
            row.insert(parent_reference.to_string(), target.clone());
            row.insert(child_reference.to_string(), associated.clone());
            rows.push(row);
        }
    }

    rows
}

fn matching(where_clause: Where) -> Criteria {
    Criteria {
        where_clause,
        ..Criteria::default()
    }
}
