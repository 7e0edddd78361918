use super::{Attribute, HasMany};
use crate::{Error, Result, Transformer};

use indexmap::IndexMap;

#[derive(Debug)]
pub struct Model {
    /// Identity the model is registered under.
    pub identity: String,

    /// Physical table name, with any configured prefix applied.
    pub table_name: String,

    /// Datastore the model lives in. `None` uses the default.
    pub datastore: Option<String>,

    /// Name of the primary key attribute.
    pub primary_key: String,

    pub attributes: IndexMap<String, Attribute>,

    pub kind: ModelKind,

    /// Attribute/column rewriting for this model's records.
    pub transformer: Transformer,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelKind {
    Standard,

    /// Generated to link two models in a many-to-many association.
    Junction,

    /// User-defined link model. Maps `"<model>.<association>"` to the
    /// attribute on this model referencing that association's child.
    Through(IndexMap<String, String>),
}

impl Model {
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.get(name)
    }

    pub fn primary_key_attribute(&self) -> Result<&Attribute> {
        self.attributes.get(&self.primary_key).ok_or_else(|| {
            Error::consistency(format!(
                "primary key `{}` of `{}` is not an attribute",
                self.primary_key, self.identity
            ))
        })
    }

    pub fn primary_key_column(&self) -> Result<&str> {
        self.primary_key_attribute()?.column()
    }

    /// Look up a plural association by name.
    pub fn has_many(&self, name: &str) -> Option<&HasMany> {
        self.attributes.get(name)?.as_has_many()
    }

    /// Attributes backed by a column, in declaration order.
    pub fn stored_attributes(&self) -> impl Iterator<Item = &Attribute> {
        self.attributes.values().filter(|attr| !attr.is_plural())
    }

    pub fn plural_associations(&self) -> impl Iterator<Item = (&Attribute, &HasMany)> {
        self.attributes
            .values()
            .filter_map(|attr| Some((attr, attr.as_has_many()?)))
    }

    pub fn is_junction(&self) -> bool {
        matches!(self.kind, ModelKind::Junction)
    }

    pub fn through_table(&self) -> Option<&IndexMap<String, String>> {
        match &self.kind {
            ModelKind::Through(table) if !table.is_empty() => Some(table),
            _ => None,
        }
    }
}
