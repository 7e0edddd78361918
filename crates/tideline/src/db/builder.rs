use super::Db;
use crate::engine::Engine;

use tideline_core::schema::{self, ModelDef};
use tideline_core::{Adapter, Result};

use serde_json::Value;
use std::sync::Arc;

#[derive(Debug, Default)]
pub struct Builder {
    /// Schema builder
    core: schema::Builder,

    /// Datastore used by models that don't name one
    datastore: Option<String>,
}

impl Builder {
    pub fn register(&mut self, def: ModelDef) -> &mut Self {
        self.core.register(def);
        self
    }

    /// Register definitions from JSON: either one model definition or an
    /// array of them.
    pub fn register_json(&mut self, json: &str) -> Result<&mut Self> {
        let defs = match serde_json::from_str::<Value>(json)? {
            Value::Array(items) => items
                .into_iter()
                .map(serde_json::from_value)
                .collect::<std::result::Result<Vec<ModelDef>, serde_json::Error>>()?,
            value => vec![serde_json::from_value(value)?],
        };

        for def in defs {
            self.core.register(def);
        }

        Ok(self)
    }

    /// Set the table name prefix for all tables
    pub fn table_name_prefix(&mut self, prefix: &str) -> &mut Self {
        self.core.table_name_prefix(prefix);
        self
    }

    pub fn datastore(&mut self, name: &str) -> &mut Self {
        self.datastore = Some(name.to_string());
        self
    }

    pub fn build(&mut self, adapter: impl Adapter) -> Result<Db> {
        let schema = self.core.build()?;

        Ok(Db {
            engine: Arc::new(Engine {
                schema: Arc::new(schema),
                adapter: Arc::new(adapter),
                datastore: self.datastore.clone().unwrap_or_else(|| "default".to_string()),
            }),
        })
    }
}
