use super::{Error, ErrorCode, ErrorKind};

/// Error when the caller supplied a malformed query.
///
/// This covers everything the criteria normalizer rejects:
/// - criteria, populates or meta of the wrong shape
/// - unknown attribute names
/// - ids that are not primary key values
///
/// The code tells which part of the query was at fault.
#[derive(Debug)]
pub(super) struct UsageError {
    pub(super) code: ErrorCode,
    message: Box<str>,
}

impl std::error::Error for UsageError {}

impl core::fmt::Display for UsageError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        let what = match self.code {
            ErrorCode::InvalidCriteria => "invalid criteria",
            ErrorCode::InvalidPopulates => "invalid populates",
            ErrorCode::InvalidMeta => "invalid meta",
            ErrorCode::InvalidNewRecords => "invalid new record",
            ErrorCode::InvalidValuesToSet => "invalid values to set",
            ErrorCode::InvalidTargetRecordIds => "invalid target record ids",
            ErrorCode::InvalidAssociatedIds => "invalid associated ids",
            ErrorCode::InvalidCollectionAttrName => "invalid collection attribute name",
            ErrorCode::InvalidNumericAttrName => "invalid numeric attribute name",
            _ => "invalid usage",
        };
        write!(f, "{what}: {}", self.message)
    }
}

macro_rules! usage_constructors {
    ( $( $(#[$doc:meta])* $name:ident => $code:ident; )+ ) => {
        impl Error {
            $(
                $(#[$doc])*
                pub fn $name(message: impl Into<String>) -> Error {
                    Error::usage(ErrorCode::$code, message)
                }
            )+
        }
    };
}

usage_constructors! {
    /// The criteria could not be normalized.
    invalid_criteria => InvalidCriteria;
    /// A populate key or its subcriteria is invalid.
    invalid_populates => InvalidPopulates;
    /// The meta bag is not a dictionary or a recognised key has the wrong type.
    invalid_meta => InvalidMeta;
    invalid_new_records => InvalidNewRecords;
    invalid_values_to_set => InvalidValuesToSet;
    invalid_target_record_ids => InvalidTargetRecordIds;
    invalid_associated_ids => InvalidAssociatedIds;
    invalid_collection_attr_name => InvalidCollectionAttrName;
    invalid_numeric_attr_name => InvalidNumericAttrName;
}

impl Error {
    pub(crate) fn usage(code: ErrorCode, message: impl Into<String>) -> Error {
        debug_assert!(code.is_usage());
        Error::from(ErrorKind::Usage(UsageError {
            code,
            message: message.into().into(),
        }))
    }

    /// Returns `true` if the outermost error was caused by the caller's input.
    pub fn is_usage(&self) -> bool {
        matches!(self.kind(), ErrorKind::Usage(_))
    }
}
