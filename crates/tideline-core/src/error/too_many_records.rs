use super::{Error, ErrorKind};

/// Error when a single-record query matched more than one record.
#[derive(Debug)]
pub(super) struct TooManyRecordsError {
    context: Box<str>,
}

impl std::error::Error for TooManyRecordsError {}

impl core::fmt::Display for TooManyRecordsError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "too many records: {}", self.context)
    }
}

impl Error {
    pub fn too_many_records(context: impl Into<String>) -> Error {
        Error::from(ErrorKind::TooManyRecords(TooManyRecordsError {
            context: context.into().into(),
        }))
    }

    pub fn is_too_many_records(&self) -> bool {
        matches!(self.kind(), ErrorKind::TooManyRecords(_))
    }
}
