mod adapter_error;

mod compile;
pub(crate) use compile::compile;

mod exec;
mod find;

mod normalize;
pub(crate) use normalize::normalize;

mod populate;
mod relation;
mod write;

use tideline_core::{Adapter, Schema};

use std::sync::Arc;

/// Shared state behind every `Db` clone.
#[derive(Debug)]
pub(crate) struct Engine {
    /// Schema the engine was built with
    pub(crate) schema: Arc<Schema>,

    /// Storage adapter handling all operations
    pub(crate) adapter: Arc<dyn Adapter>,

    /// Datastore used by models that don't name one
    pub(crate) datastore: String,
}
