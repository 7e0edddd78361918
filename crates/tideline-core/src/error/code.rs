use std::fmt;

/// Machine readable classification of an [`Error`](super::Error).
///
/// Callers switch on the code rather than on the error's type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    InvalidCriteria,
    InvalidPopulates,
    InvalidMeta,
    InvalidNewRecords,
    InvalidValuesToSet,
    InvalidTargetRecordIds,
    InvalidAssociatedIds,
    InvalidCollectionAttrName,
    InvalidNumericAttrName,
    Noop,
    Unique,
    UnsupportedOperation,
    UnexpectedAdapterError,
    MalformedAdapterError,
    Consistency,
    Propagation,
    TooManyRecords,
}

impl ErrorCode {
    pub fn as_str(self) -> &'static str {
        use ErrorCode::*;

        match self {
            InvalidCriteria => "E_INVALID_CRITERIA",
            InvalidPopulates => "E_INVALID_POPULATES",
            InvalidMeta => "E_INVALID_META",
            InvalidNewRecords => "E_INVALID_NEW_RECORDS",
            InvalidValuesToSet => "E_INVALID_VALUES_TO_SET",
            InvalidTargetRecordIds => "E_INVALID_TARGET_RECORD_IDS",
            InvalidAssociatedIds => "E_INVALID_ASSOCIATED_IDS",
            InvalidCollectionAttrName => "E_INVALID_COLLECTION_ATTR_NAME",
            InvalidNumericAttrName => "E_INVALID_NUMERIC_ATTR_NAME",
            Noop => "E_NOOP",
            Unique => "E_UNIQUE",
            UnsupportedOperation => "E_UNSUPPORTED_OPERATION",
            UnexpectedAdapterError => "E_UNEXPECTED_ADAPTER_ERROR",
            MalformedAdapterError => "E_MALFORMED_ADAPTER_ERROR",
            Consistency => "E_CONSISTENCY",
            Propagation => "E_PROPAGATION",
            TooManyRecords => "E_TOO_MANY_RECORDS",
        }
    }

    /// Usage errors are caused by what the caller passed in.
    pub fn is_usage(self) -> bool {
        use ErrorCode::*;

        matches!(
            self,
            InvalidCriteria
                | InvalidPopulates
                | InvalidMeta
                | InvalidNewRecords
                | InvalidValuesToSet
                | InvalidTargetRecordIds
                | InvalidAssociatedIds
                | InvalidCollectionAttrName
                | InvalidNumericAttrName
        )
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
