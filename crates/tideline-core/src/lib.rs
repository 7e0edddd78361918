pub mod adapter;
pub use adapter::Adapter;

mod error;
pub use error::{Error, ErrorCode, IntoError, Omen};

pub mod query;

pub mod schema;
pub use schema::Schema;

mod transformer;
pub use transformer::Transformer;

/// A Result type alias that uses Tideline's [`Error`] type.
pub type Result<T> = core::result::Result<T, Error>;

/// A logical or physical record. Keys are attribute names on the logical
/// side and column names on the physical side.
pub type Record = serde_json::Map<String, serde_json::Value>;

pub use async_trait::async_trait;
