use super::Type;

use indexmap::IndexMap;
use serde::Deserialize;

/// A model definition as produced by the schema-builder collaborator.
///
/// Deserializes from the camelCase JSON shape that collaborator emits:
///
/// ```
/// # use tideline_core::schema::ModelDef;
/// let def: ModelDef = serde_json::from_str(r#"{
///     "identity": "user",
///     "attributes": {
///         "id": { "type": "number", "primaryKey": true },
///         "username": { "type": "string", "columnName": "login" },
///         "pets": { "collection": "pet", "via": "owner" }
///     }
/// }"#).unwrap();
///
/// assert_eq!(def.attributes["username"].column_name.as_deref(), Some("login"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelDef {
    pub identity: String,

    #[serde(default)]
    pub table_name: Option<String>,

    /// Name of the primary key attribute. When absent, the attribute flagged
    /// `primaryKey` is used, then `id`.
    #[serde(default)]
    pub primary_key: Option<String>,

    #[serde(default)]
    pub datastore: Option<String>,

    pub attributes: IndexMap<String, AttributeDef>,

    #[serde(default)]
    pub junction_table: bool,

    #[serde(default)]
    pub through_table: IndexMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeDef {
    #[serde(default, rename = "type")]
    pub ty: Option<Type>,

    #[serde(default)]
    pub column_name: Option<String>,

    #[serde(default)]
    pub primary_key: bool,

    /// Singular association target.
    #[serde(default)]
    pub model: Option<String>,

    /// Plural association target.
    #[serde(default)]
    pub collection: Option<String>,

    #[serde(default)]
    pub via: Option<String>,

    #[serde(default)]
    pub on: Option<String>,

    #[serde(default)]
    pub reference_identity: Option<String>,
}

impl ModelDef {
    pub fn new(identity: impl Into<String>) -> ModelDef {
        ModelDef {
            identity: identity.into(),
            ..ModelDef::default()
        }
    }

    pub fn table_name(mut self, table_name: impl Into<String>) -> ModelDef {
        self.table_name = Some(table_name.into());
        self
    }

    pub fn datastore(mut self, datastore: impl Into<String>) -> ModelDef {
        self.datastore = Some(datastore.into());
        self
    }

    pub fn attribute(mut self, name: impl Into<String>, def: AttributeDef) -> ModelDef {
        self.attributes.insert(name.into(), def);
        self
    }

    pub fn junction_table(mut self) -> ModelDef {
        self.junction_table = true;
        self
    }

    pub fn through(mut self, key: impl Into<String>, attr_name: impl Into<String>) -> ModelDef {
        self.through_table.insert(key.into(), attr_name.into());
        self
    }
}

impl AttributeDef {
    pub fn primitive(ty: Type) -> AttributeDef {
        AttributeDef {
            ty: Some(ty),
            ..AttributeDef::default()
        }
    }

    pub fn string() -> AttributeDef {
        AttributeDef::primitive(Type::String)
    }

    pub fn number() -> AttributeDef {
        AttributeDef::primitive(Type::Number)
    }

    pub fn boolean() -> AttributeDef {
        AttributeDef::primitive(Type::Boolean)
    }

    pub fn json() -> AttributeDef {
        AttributeDef::primitive(Type::Json)
    }

    pub fn belongs_to(model: impl Into<String>) -> AttributeDef {
        AttributeDef {
            model: Some(model.into()),
            ..AttributeDef::default()
        }
    }

    pub fn has_many(collection: impl Into<String>, via: impl Into<String>) -> AttributeDef {
        AttributeDef {
            collection: Some(collection.into()),
            via: Some(via.into()),
            ..AttributeDef::default()
        }
    }

    pub fn primary_key(mut self) -> AttributeDef {
        self.primary_key = true;
        self
    }

    pub fn column_name(mut self, column_name: impl Into<String>) -> AttributeDef {
        self.column_name = Some(column_name.into());
        self
    }

    pub fn on(mut self, on: impl Into<String>) -> AttributeDef {
        self.on = Some(on.into());
        self
    }

    pub fn reference_identity(mut self, identity: impl Into<String>) -> AttributeDef {
        self.reference_identity = Some(identity.into());
        self
    }
}
