use super::{Criteria, Meta, Method};
use crate::Record;

use indexmap::IndexMap;
use serde_json::Value;

/// Populate requests keyed by association name. Every value is a normalized
/// subcriteria; a bare `true` has been widened to the default criteria.
pub type Populates = IndexMap<String, Criteria>;

/// A validated, attribute-named query.
///
/// Compilation consumes it: the value is moved into the compiler and cannot
/// be reused afterwards.
#[derive(Debug)]
pub struct StageTwoQuery {
    pub method: Method,

    /// Identity of the model being queried.
    pub using: String,
    pub meta: Meta,
    pub body: QueryBody,
}

#[derive(Debug)]
pub enum QueryBody {
    /// `find`, `findOne` and `stream`.
    Find {
        criteria: Criteria,
        populates: Populates,
    },
    Count {
        criteria: Criteria,
    },
    /// `sum` and `avg`.
    Aggregate {
        criteria: Criteria,
        numeric_attr_name: String,
    },
    /// `create` and `createEach`.
    Create {
        new_records: Vec<NewRecord>,
    },
    Update {
        criteria: Criteria,
        values_to_set: Record,

        /// Plural associations to reset on every updated record.
        collections: IndexMap<String, Vec<Value>>,
    },
    Destroy {
        criteria: Criteria,
    },
    /// `addToCollection`, `removeFromCollection` and `replaceCollection`.
    Collection(CollectionChange),
}

/// A record to insert, with its plural association values split off.
#[derive(Debug, Clone, PartialEq)]
pub struct NewRecord {
    pub values: Record,
    pub collections: IndexMap<String, Vec<Value>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CollectionChange {
    pub target_record_ids: Vec<Value>,
    pub collection_attr_name: String,
    pub associated_ids: Vec<Value>,
}

impl QueryBody {
    pub fn criteria(&self) -> Option<&Criteria> {
        match self {
            QueryBody::Find { criteria, .. }
            | QueryBody::Count { criteria }
            | QueryBody::Aggregate { criteria, .. }
            | QueryBody::Update { criteria, .. }
            | QueryBody::Destroy { criteria } => Some(criteria),
            QueryBody::Create { .. } | QueryBody::Collection(_) => None,
        }
    }

    pub fn populates(&self) -> Option<&Populates> {
        match self {
            QueryBody::Find { populates, .. } => Some(populates),
            _ => None,
        }
    }
}
