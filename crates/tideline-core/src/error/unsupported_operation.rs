use super::{Error, ErrorKind};
use crate::adapter::AdapterMethod;

/// Error when the configured adapter lacks a method the operation needs.
#[derive(Debug)]
pub(super) struct UnsupportedOperationError {
    adapter: Box<str>,
    method: AdapterMethod,
}

impl std::error::Error for UnsupportedOperationError {}

impl core::fmt::Display for UnsupportedOperationError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "adapter `{}` doesn't support method `{}`",
            self.adapter, self.method
        )
    }
}

impl Error {
    pub fn unsupported_operation(adapter: impl Into<String>, method: AdapterMethod) -> Error {
        Error::from(ErrorKind::UnsupportedOperation(UnsupportedOperationError {
            adapter: adapter.into().into(),
            method,
        }))
    }

    pub fn is_unsupported_operation(&self) -> bool {
        matches!(self.kind(), ErrorKind::UnsupportedOperation(_))
    }
}
