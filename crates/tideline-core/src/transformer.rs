use crate::query::{PhysicalCriteria, Where};
use crate::schema::Attribute;
use crate::Record;

use indexmap::IndexMap;
use serde_json::Value;

/// Rewrites records and criteria between attribute names and column names.
///
/// Built once per model from its stored attributes and never mutated
/// afterwards. Plural associations have no column and are not part of the
/// table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Transformer {
    /// attribute name -> column name
    columns: IndexMap<String, String>,
}

impl Transformer {
    pub fn new<I, A, C>(pairs: I) -> Transformer
    where
        I: IntoIterator<Item = (A, C)>,
        A: Into<String>,
        C: Into<String>,
    {
        Transformer {
            columns: pairs
                .into_iter()
                .map(|(attr, column)| (attr.into(), column.into()))
                .collect(),
        }
    }

    pub fn from_attributes<'a>(attributes: impl IntoIterator<Item = &'a Attribute>) -> Transformer {
        Transformer::new(attributes.into_iter().filter_map(|attr| {
            let column = attr.column_name.as_ref()?;
            Some((attr.name.clone(), column.clone()))
        }))
    }

    pub fn column_name(&self, attr_name: &str) -> Option<&str> {
        self.columns.get(attr_name).map(String::as_str)
    }

    pub fn attribute_name(&self, column_name: &str) -> Option<&str> {
        self.columns
            .iter()
            .find(|(_, column)| *column == column_name)
            .map(|(attr, _)| attr.as_str())
    }

    pub fn is_column(&self, name: &str) -> bool {
        self.columns.values().any(|column| column == name)
    }

    /// Rename every attribute key of a flat value dictionary to its column.
    /// Unknown keys are kept as they are.
    pub fn serialize_values(&self, values: &mut Record) {
        let attrs = std::mem::take(values);

        for (key, value) in attrs {
            let key = match self.columns.get(&key) {
                Some(column) => column.clone(),
                None => key,
            };
            values.insert(key, value);
        }
    }

    /// Rewrite every name in physical criteria: the `where` tree, `select`
    /// entries and the head of each `sort` key.
    pub fn serialize_criteria(&self, criteria: &mut PhysicalCriteria) {
        self.serialize_where(&mut criteria.where_clause);

        for name in &mut criteria.select {
            if let Some(column) = self.columns.get(name) {
                *name = column.clone();
            }
        }

        for clause in &mut criteria.sort {
            if let Some(column) = self.columns.get(clause.head()) {
                let column = column.clone();
                clause.rename_head(&column);
            }
        }
    }

    /// Rewrite a `where` tree. `and`/`or` branches are rewritten
    /// recursively; nested dictionaries are rewritten before their key is
    /// renamed.
    pub fn serialize_where(&self, clause: &mut Where) {
        let entries = std::mem::take(clause);

        for (key, mut value) in entries {
            let logical = key == "and" || key == "or";

            match &mut value {
                Value::Array(branches) if logical => {
                    for branch in branches {
                        if let Value::Object(branch) = branch {
                            self.serialize_where(branch);
                        }
                    }
                }
                Value::Object(nested) if !logical => self.serialize_where(nested),
                _ => {}
            }

            let key = match self.columns.get(&key) {
                Some(column) if !logical => column.clone(),
                _ => key,
            };
            clause.insert(key, value);
        }
    }

    /// Rename the columns of a physical record back to attribute names.
    ///
    /// Keys that are not known columns are left alone. When an attribute's
    /// name equals another attribute's column name, both keys survive.
    pub fn unserialize(&self, record: &mut Record) {
        let physical = record.clone();

        record.retain(|key, _| !self.is_column(key));

        for (attr, column) in &self.columns {
            if let Some(value) = physical.get(column) {
                record.insert(attr.clone(), value.clone());
            }
        }
    }
}
