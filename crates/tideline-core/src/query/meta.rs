use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Opaque handle an adapter can use to pin a sequence of operations to one
/// connection or transaction.
pub type Lease = Arc<dyn Any + Send + Sync>;

/// Per-call options, forwarded to every adapter operation the call issues.
/// Relationship maintenance gets the variant from [`Meta::for_relationship`].
#[derive(Clone, Default)]
pub struct Meta {
    /// Return affected records from writes.
    pub fetch: bool,

    /// Clear plural associations of destroyed records.
    pub cascade: bool,

    pub skip_all_lifecycle_callbacks: bool,

    /// Keys Tideline does not interpret.
    pub extras: serde_json::Map<String, serde_json::Value>,

    pub lease: Option<Lease>,
}

impl Meta {
    pub fn with_lease(mut self, lease: Lease) -> Meta {
        self.lease = Some(lease);
        self
    }

    /// Downcast the lease to the adapter's concrete handle type.
    pub fn lease_as<T: Any + Send + Sync>(&self) -> Option<&T> {
        self.lease.as_ref()?.downcast_ref::<T>()
    }

    /// Meta used for relationship maintenance: lifecycle callbacks are never
    /// re-triggered and affected rows are never fetched.
    pub fn for_relationship(&self) -> Meta {
        Meta {
            fetch: false,
            skip_all_lifecycle_callbacks: true,
            ..self.clone()
        }
    }
}

impl fmt::Debug for Meta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Meta")
            .field("fetch", &self.fetch)
            .field("cascade", &self.cascade)
            .field(
                "skip_all_lifecycle_callbacks",
                &self.skip_all_lifecycle_callbacks,
            )
            .field("extras", &self.extras)
            .field("lease", &self.lease.is_some())
            .finish()
    }
}
