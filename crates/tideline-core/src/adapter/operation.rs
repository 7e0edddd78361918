//! Stage-three operations handed to an [`Adapter`](super::Adapter).
//!
//! Every name inside an operation is a table or column name. Attribute
//! names never cross this boundary.

use super::AdapterMethod;
use crate::query::{Join, Meta, PhysicalCriteria, Where};
use crate::Record;

#[derive(Debug, Clone)]
pub enum Operation {
    /// Read records, optionally joined with associated records.
    Find(Find),

    /// Insert a single record.
    Create(Create),

    /// Insert a batch of records.
    CreateEach(CreateEach),

    /// Update every record matching a filter.
    Update(Update),

    /// Delete every record matching a filter.
    Destroy(Destroy),

    /// Count matching records.
    Count(Count),

    /// Sum a numeric column over matching records.
    Sum(Aggregate),

    /// Average a numeric column over matching records.
    Avg(Aggregate),
}

#[derive(Debug, Clone)]
pub struct Find {
    /// Table to read from
    pub using: String,
    pub criteria: PhysicalCriteria,

    /// Ordered join descriptors; empty when nothing is populated.
    pub joins: Vec<Join>,
    pub meta: Meta,
}

#[derive(Debug, Clone)]
pub struct Create {
    pub using: String,
    pub new_record: Record,
    pub meta: Meta,
}

#[derive(Debug, Clone)]
pub struct CreateEach {
    pub using: String,
    pub new_records: Vec<Record>,
    pub meta: Meta,
}

#[derive(Debug, Clone)]
pub struct Update {
    pub using: String,
    pub criteria: Where,
    pub values_to_set: Record,
    pub meta: Meta,
}

#[derive(Debug, Clone)]
pub struct Destroy {
    pub using: String,
    pub criteria: Where,
    pub meta: Meta,
}

#[derive(Debug, Clone)]
pub struct Count {
    pub using: String,
    pub criteria: Where,
    pub meta: Meta,
}

#[derive(Debug, Clone)]
pub struct Aggregate {
    pub using: String,
    pub criteria: Where,

    /// Column to aggregate.
    pub numeric_column: String,
    pub meta: Meta,
}

impl Operation {
    /// The adapter method required to run this operation.
    pub fn method(&self) -> AdapterMethod {
        match self {
            Operation::Find(_) => AdapterMethod::Find,
            Operation::Create(_) => AdapterMethod::Create,
            Operation::CreateEach(_) => AdapterMethod::CreateEach,
            Operation::Update(_) => AdapterMethod::Update,
            Operation::Destroy(_) => AdapterMethod::Destroy,
            Operation::Count(_) => AdapterMethod::Count,
            Operation::Sum(_) => AdapterMethod::Sum,
            Operation::Avg(_) => AdapterMethod::Avg,
        }
    }

    pub fn using(&self) -> &str {
        match self {
            Operation::Find(op) => &op.using,
            Operation::Create(op) => &op.using,
            Operation::CreateEach(op) => &op.using,
            Operation::Update(op) => &op.using,
            Operation::Destroy(op) => &op.using,
            Operation::Count(op) => &op.using,
            Operation::Sum(op) | Operation::Avg(op) => &op.using,
        }
    }

    pub fn meta(&self) -> &Meta {
        match self {
            Operation::Find(op) => &op.meta,
            Operation::Create(op) => &op.meta,
            Operation::CreateEach(op) => &op.meta,
            Operation::Update(op) => &op.meta,
            Operation::Destroy(op) => &op.meta,
            Operation::Count(op) => &op.meta,
            Operation::Sum(op) | Operation::Avg(op) => &op.meta,
        }
    }

    pub fn is_destroy(&self) -> bool {
        matches!(self, Operation::Destroy(_))
    }

    pub fn is_update(&self) -> bool {
        matches!(self, Operation::Update(_))
    }

    pub fn is_create_each(&self) -> bool {
        matches!(self, Operation::CreateEach(_))
    }

    pub fn as_find(&self) -> Option<&Find> {
        match self {
            Operation::Find(op) => Some(op),
            _ => None,
        }
    }

    pub fn as_update(&self) -> Option<&Update> {
        match self {
            Operation::Update(op) => Some(op),
            _ => None,
        }
    }

    pub fn as_destroy(&self) -> Option<&Destroy> {
        match self {
            Operation::Destroy(op) => Some(op),
            _ => None,
        }
    }

    pub fn as_create_each(&self) -> Option<&CreateEach> {
        match self {
            Operation::CreateEach(op) => Some(op),
            _ => None,
        }
    }
}
