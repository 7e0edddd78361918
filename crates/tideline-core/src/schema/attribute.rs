use super::Association;

use serde::Deserialize;

#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    /// The attribute name, as callers see it.
    pub name: String,

    /// Column the attribute is stored in. Plural associations have none.
    pub column_name: Option<String>,

    pub primary_key: bool,

    pub ty: AttributeTy,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AttributeTy {
    Primitive(Type),
    BelongsTo(BelongsTo),
    HasMany(HasMany),
}

/// Logical attribute types. Values are not coerced here; the type only
/// gates which attributes `sum`/`avg` accept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Type {
    String,
    Number,
    Boolean,
    Json,
    Ref,
}

/// A singular association: the attribute's column holds the target's
/// primary key.
#[derive(Debug, Clone, PartialEq)]
pub struct BelongsTo {
    /// Identity of the referenced model.
    pub target: String,

    /// Column on the target the foreign key matches.
    pub on: String,
}

/// A plural association.
#[derive(Debug, Clone, PartialEq)]
pub struct HasMany {
    /// Identity of the model whose records make up the collection.
    pub target: String,

    /// Attribute on the child (or on the through model) pointing back.
    pub via: Option<String>,

    /// Model the association physically references. Differs from `target`
    /// when links are stored in a junction model.
    pub reference_identity: String,

    /// Column on the referenced model matched against the parent's primary
    /// key.
    pub on: String,

    pub association: Association,
}

impl Attribute {
    pub fn is_plural(&self) -> bool {
        matches!(self.ty, AttributeTy::HasMany(_))
    }

    pub fn is_singular(&self) -> bool {
        matches!(self.ty, AttributeTy::BelongsTo(_))
    }

    pub fn is_association(&self) -> bool {
        self.is_plural() || self.is_singular()
    }

    /// The column name. Errors for plural associations, which are never
    /// stored.
    pub fn column(&self) -> crate::Result<&str> {
        match &self.column_name {
            Some(column) => Ok(column),
            None => crate::bail!("attribute `{}` has no column", self.name),
        }
    }

    pub fn primitive_ty(&self) -> Option<Type> {
        match self.ty {
            AttributeTy::Primitive(ty) => Some(ty),
            _ => None,
        }
    }

    pub fn as_belongs_to(&self) -> Option<&BelongsTo> {
        match &self.ty {
            AttributeTy::BelongsTo(belongs_to) => Some(belongs_to),
            _ => None,
        }
    }

    pub fn as_has_many(&self) -> Option<&HasMany> {
        match &self.ty {
            AttributeTy::HasMany(has_many) => Some(has_many),
            _ => None,
        }
    }
}
