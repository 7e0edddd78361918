use super::{Error, ErrorKind, Omen};
use crate::adapter::AdapterError;

/// Error reported by a storage adapter that could not be classified further.
///
/// Two flavours exist:
/// - the adapter attached no footprint, so the failure is simply unexpected
/// - the adapter attached a footprint Tideline does not understand, which
///   points at a bug in the adapter itself
#[derive(Debug)]
pub(super) struct AdapterFailure {
    pub(super) model: String,
    pub(super) raw: AdapterError,
    pub(super) malformed: bool,
    pub(super) omen: Omen,
}

impl std::error::Error for AdapterFailure {}

impl core::fmt::Display for AdapterFailure {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        if self.malformed {
            write!(
                f,
                "malformed error from adapter while operating on `{}` (issued at {}): {}",
                self.model, self.omen, self.raw
            )
        } else {
            write!(
                f,
                "unexpected error from adapter while operating on `{}` (issued at {}): {}",
                self.model, self.omen, self.raw
            )
        }
    }
}

impl Error {
    /// Wraps an adapter error that carried no footprint.
    pub fn adapter_unexpected(model: impl Into<String>, raw: AdapterError, omen: Omen) -> Error {
        Error::from(ErrorKind::Adapter(AdapterFailure {
            model: model.into(),
            raw,
            malformed: false,
            omen,
        }))
    }

    /// Wraps an adapter error whose footprint could not be interpreted.
    pub fn adapter_malformed(model: impl Into<String>, raw: AdapterError, omen: Omen) -> Error {
        Error::from(ErrorKind::Adapter(AdapterFailure {
            model: model.into(),
            raw,
            malformed: true,
            omen,
        }))
    }

    pub fn is_adapter(&self) -> bool {
        matches!(self.kind(), ErrorKind::Adapter(_))
    }
}
