//! Query representations.
//!
//! A query moves through three stages:
//!
//! 1. [`Request`]: what the caller typed, loosely shaped.
//! 2. [`StageTwoQuery`]: validated and canonicalized, still attribute-named.
//! 3. [`Operation`](crate::adapter::Operation): column-named, with populates
//!    expanded into [`Join`] descriptors, ready for the adapter.

mod criteria;
pub use criteria::{Criteria, PhysicalCriteria, Where};

mod join;
pub use join::Join;

mod meta;
pub use meta::{Lease, Meta};

mod method;
pub use method::Method;

mod request;
pub use request::Request;

mod sort;
pub use sort::{Direction, SortClause};

mod stage_two;
pub use stage_two::{CollectionChange, NewRecord, Populates, QueryBody, StageTwoQuery};
