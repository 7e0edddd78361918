use super::{Error, ErrorKind, Omen};
use crate::adapter::AdapterError;

/// Error when a write violated a uniqueness constraint.
///
/// The adapter reports the offending columns; they are translated back to
/// attribute names before the error reaches the caller.
#[derive(Debug)]
pub(super) struct UniqueError {
    pub(super) model: String,
    pub(super) attr_names: Vec<String>,
    pub(super) raw: AdapterError,
    pub(super) omen: Omen,
}

impl std::error::Error for UniqueError {}

impl core::fmt::Display for UniqueError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "would violate uniqueness constraint of `{}` on [{}]",
            self.model,
            self.attr_names.join(", ")
        )
    }
}

impl Error {
    pub fn unique(
        model: impl Into<String>,
        attr_names: Vec<String>,
        raw: AdapterError,
        omen: Omen,
    ) -> Error {
        Error::from(ErrorKind::Unique(UniqueError {
            model: model.into(),
            attr_names,
            raw,
            omen,
        }))
    }

    pub fn is_unique(&self) -> bool {
        matches!(self.kind(), ErrorKind::Unique(_))
    }

    /// Attribute names that collided, for uniqueness errors.
    pub fn attr_names(&self) -> Option<&[String]> {
        self.chain().find_map(|err| match err.kind() {
            ErrorKind::Unique(err) => Some(&err.attr_names[..]),
            _ => None,
        })
    }
}
