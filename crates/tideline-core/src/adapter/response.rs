use crate::{Record, Result};

#[derive(Debug)]
pub struct Response {
    pub rows: Rows,
}

#[derive(Debug, PartialEq)]
pub enum Rows {
    /// Physical records, keyed by column name.
    Records(Vec<Record>),

    /// Number of matching records.
    Count(u64),

    /// Result of an aggregate.
    Number(f64),

    /// The operation produced nothing to return.
    Empty,
}

impl Response {
    pub fn records(records: Vec<Record>) -> Self {
        Self {
            rows: Rows::Records(records),
        }
    }

    pub fn count(count: u64) -> Self {
        Self {
            rows: Rows::Count(count),
        }
    }

    pub fn number(number: f64) -> Self {
        Self {
            rows: Rows::Number(number),
        }
    }

    pub fn empty() -> Self {
        Self { rows: Rows::Empty }
    }
}

impl Rows {
    pub fn is_records(&self) -> bool {
        matches!(self, Self::Records(_))
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    pub fn into_records(self) -> Result<Vec<Record>> {
        match self {
            Rows::Records(records) => Ok(records),
            rows => crate::bail!("adapter was expected to return records, got {rows:?}"),
        }
    }

    pub fn into_count(self) -> Result<u64> {
        match self {
            Rows::Count(count) => Ok(count),
            rows => crate::bail!("adapter was expected to return a count, got {rows:?}"),
        }
    }

    pub fn into_number(self) -> Result<f64> {
        match self {
            Rows::Number(number) => Ok(number),
            Rows::Count(count) => Ok(count as f64),
            rows => crate::bail!("adapter was expected to return a number, got {rows:?}"),
        }
    }
}
