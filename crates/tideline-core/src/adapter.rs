mod capability;
pub use capability::{AdapterMethod, Capability};

mod error;
pub use error::{AdapterError, Footprint};

pub mod operation;
pub use operation::Operation;

mod response;
pub use response::{Response, Rows};

use crate::async_trait;

use std::fmt::Debug;

/// A storage backend.
///
/// The engine hands the adapter fully compiled, column-named operations and
/// expects column-named records back. Everything the adapter reports as a
/// failure is passed through the adapter error normalizer before it reaches
/// the caller, so adapters should attach a [`Footprint`] whenever they can
/// classify a failure.
#[async_trait]
pub trait Adapter: Debug + Send + Sync + 'static {
    /// Name used in diagnostics.
    fn identity(&self) -> &str;

    /// Describes the methods the adapter implements. The engine checks it
    /// before dispatching any operation.
    fn capability(&self) -> &Capability;

    /// Execute a compiled operation against the named datastore.
    async fn exec(&self, datastore: &str, operation: Operation) -> Result<Response, AdapterError>;
}
