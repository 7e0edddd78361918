use super::Lease;

use serde_json::Value;

/// A query as the caller describes it, before any validation.
///
/// Fields hold loosely typed JSON; the criteria normalizer decides what is
/// acceptable. Which fields matter depends on the method it is run with.
#[derive(Debug, Clone, Default)]
pub struct Request {
    /// Identity of the model to operate on.
    pub using: String,
    pub criteria: Value,
    pub populates: Value,
    pub meta: Value,
    pub lease: Option<Lease>,

    /// A dictionary for `create`, an array of dictionaries for `createEach`.
    pub new_records: Value,
    pub values_to_set: Value,
    pub target_record_ids: Value,
    pub collection_attr_name: Option<String>,
    pub associated_ids: Value,
    pub numeric_attr_name: Option<String>,
}

impl Request {
    pub fn new(using: impl Into<String>) -> Request {
        Request {
            using: using.into(),
            ..Request::default()
        }
    }

    pub fn criteria(mut self, criteria: impl Into<Value>) -> Request {
        self.criteria = criteria.into();
        self
    }

    /// Request an association to be populated. `true` populates everything,
    /// a dictionary is used as subcriteria.
    pub fn populate(mut self, attr_name: impl Into<String>, subcriteria: impl Into<Value>) -> Request {
        if !self.populates.is_object() {
            self.populates = Value::Object(Default::default());
        }

        if let Value::Object(populates) = &mut self.populates {
            populates.insert(attr_name.into(), subcriteria.into());
        }

        self
    }

    pub fn populates(mut self, populates: impl Into<Value>) -> Request {
        self.populates = populates.into();
        self
    }

    pub fn meta(mut self, meta: impl Into<Value>) -> Request {
        self.meta = meta.into();
        self
    }

    pub fn lease(mut self, lease: Lease) -> Request {
        self.lease = Some(lease);
        self
    }

    pub fn new_record(mut self, record: impl Into<Value>) -> Request {
        self.new_records = record.into();
        self
    }

    pub fn new_records(mut self, records: impl Into<Value>) -> Request {
        self.new_records = records.into();
        self
    }

    pub fn values_to_set(mut self, values: impl Into<Value>) -> Request {
        self.values_to_set = values.into();
        self
    }

    pub fn target_record_ids(mut self, ids: impl Into<Value>) -> Request {
        self.target_record_ids = ids.into();
        self
    }

    pub fn collection_attr_name(mut self, attr_name: impl Into<String>) -> Request {
        self.collection_attr_name = Some(attr_name.into());
        self
    }

    pub fn associated_ids(mut self, ids: impl Into<Value>) -> Request {
        self.associated_ids = ids.into();
        self
    }

    pub fn numeric_attr_name(mut self, attr_name: impl Into<String>) -> Request {
        self.numeric_attr_name = Some(attr_name.into());
        self
    }
}
