mod association;
pub use association::Association;

mod attribute;
pub use attribute::{Attribute, AttributeTy, BelongsTo, HasMany, Type};

mod builder;
pub use builder::Builder;

mod def;
pub use def::{AttributeDef, ModelDef};

mod model;
pub use model::{Model, ModelKind};

use crate::{Error, Result};
use indexmap::IndexMap;

/// Every registered model, keyed by identity.
#[derive(Debug, Default)]
pub struct Schema {
    pub models: IndexMap<String, Model>,
}

impl Schema {
    pub fn builder() -> Builder {
        Builder::default()
    }

    pub fn models(&self) -> impl Iterator<Item = &Model> {
        self.models.values()
    }

    /// Get a model by identity.
    ///
    /// Identities come from already validated definitions, so a miss is a
    /// consistency violation rather than a usage error.
    pub fn model(&self, identity: &str) -> Result<&Model> {
        self.models
            .get(identity)
            .ok_or_else(|| Error::consistency(format!("no model with identity `{identity}`")))
    }

    pub fn contains(&self, identity: &str) -> bool {
        self.models.contains_key(identity)
    }
}
