use super::{Error, ErrorKind};

/// Error when a cascading relationship update, issued as a side effect of a
/// primary destroy, fails.
///
/// The primary operation already succeeded at that point.
#[derive(Debug)]
pub(super) struct PropagationError;

impl std::error::Error for PropagationError {}

impl core::fmt::Display for PropagationError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        f.write_str("cascade propagation failed")
    }
}

impl Error {
    pub fn propagation(cause: Error) -> Error {
        cause.context(Error::from(ErrorKind::Propagation(PropagationError)))
    }

    pub fn is_propagation(&self) -> bool {
        matches!(self.kind(), ErrorKind::Propagation(_))
    }
}
