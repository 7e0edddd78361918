use super::{Error, ErrorKind};

/// Signal that a query provably matches nothing.
///
/// Not a failure: the engine catches it and answers with the method's empty
/// result without contacting the adapter.
#[derive(Debug)]
pub(super) struct NoopError {
    reason: Box<str>,
}

impl std::error::Error for NoopError {}

impl core::fmt::Display for NoopError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "query would match nothing: {}", self.reason)
    }
}

impl Error {
    pub fn noop(reason: impl Into<String>) -> Error {
        Error::from(ErrorKind::Noop(NoopError {
            reason: reason.into().into(),
        }))
    }

    pub fn is_noop(&self) -> bool {
        matches!(self.kind(), ErrorKind::Noop(_))
    }
}
