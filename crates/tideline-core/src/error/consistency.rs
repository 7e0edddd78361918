use super::{Error, ErrorKind};

/// Error when an internal invariant does not hold.
///
/// This occurs when:
/// - A model has no resolvable primary key column
/// - An association references a model that does not exist
/// - An adapter answers with a result of the wrong shape
///
/// These are integration bugs. They are never retried.
#[derive(Debug)]
pub(super) struct ConsistencyError {
    message: Box<str>,
}

impl ConsistencyError {
    pub(super) fn new(message: impl Into<String>) -> ConsistencyError {
        ConsistencyError {
            message: message.into().into(),
        }
    }
}

impl std::error::Error for ConsistencyError {}

impl core::fmt::Display for ConsistencyError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "consistency violation: {}", self.message)
    }
}

impl Error {
    pub fn consistency(message: impl Into<String>) -> Error {
        Error::from(ErrorKind::Consistency(ConsistencyError::new(message)))
    }

    pub fn is_consistency(&self) -> bool {
        matches!(self.kind(), ErrorKind::Consistency(_))
    }
}
