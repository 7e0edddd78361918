mod adapter;
mod code;
mod consistency;
mod noop;
mod omen;
mod propagation;
mod too_many_records;
mod unique;
mod unsupported_operation;
mod usage;

pub use code::ErrorCode;
pub use omen::Omen;

use adapter::AdapterFailure;
use consistency::ConsistencyError;
use noop::NoopError;
use propagation::PropagationError;
use std::sync::Arc;
use too_many_records::TooManyRecordsError;
use unique::UniqueError;
use unsupported_operation::UnsupportedOperationError;
use usage::UsageError;

use crate::adapter::AdapterError;

/// Returns early with a consistency error built from a format string.
///
/// Consistency errors describe broken internal invariants: a schema that
/// points nowhere, an adapter that answered with the wrong shape. They are
/// never recoverable by the caller.
#[macro_export]
macro_rules! bail {
    ($($arg:tt)*) => {
        return Err($crate::Error::from_args(format_args!($($arg)*)))
    };
}

/// Builds a consistency error from a format string.
#[macro_export]
macro_rules! err {
    ($($arg:tt)*) => {
        $crate::Error::from_args(format_args!($($arg)*))
    };
}

/// An error that can occur in Tideline.
#[derive(Clone)]
pub struct Error {
    inner: Option<Arc<ErrorInner>>,
}

#[derive(Debug)]
struct ErrorInner {
    kind: ErrorKind,
    cause: Option<Error>,
}

impl Error {
    /// Wrap `self` as the cause of `consequent`.
    ///
    /// The outermost error decides `code()`. Display walks outward in, so
    /// `"updating tags: adapter failed"` reads from the newest context down
    /// to the root cause.
    #[inline(always)]
    pub fn context(self, consequent: impl IntoError) -> Error {
        self.context_impl(consequent.into_error())
    }

    #[inline(never)]
    #[cold]
    fn context_impl(self, consequent: Error) -> Error {
        let kind = match consequent.inner {
            // A consequent keeps only its own kind; a chain of its own is
            // flattened into its message
            Some(inner) => match Arc::try_unwrap(inner) {
                Ok(ErrorInner { kind, cause: None }) => kind,
                Ok(inner) => ErrorKind::Consistency(ConsistencyError::new(
                    Error { inner: Some(Arc::new(inner)) }.to_string(),
                )),
                Err(shared) => ErrorKind::Consistency(ConsistencyError::new(shared.kind.to_string())),
            },
            None => ErrorKind::Unknown,
        };

        Error {
            inner: Some(Arc::new(ErrorInner {
                kind,
                cause: Some(self),
            })),
        }
    }

    pub fn from_args(args: core::fmt::Arguments<'_>) -> Error {
        Error::consistency(args.to_string())
    }

    /// The wire code of the outermost error.
    pub fn code(&self) -> ErrorCode {
        match self.kind() {
            ErrorKind::Usage(err) => err.code,
            ErrorKind::Noop(_) => ErrorCode::Noop,
            ErrorKind::Unique(_) => ErrorCode::Unique,
            ErrorKind::Adapter(err) if err.malformed => ErrorCode::MalformedAdapterError,
            ErrorKind::Adapter(_) => ErrorCode::UnexpectedAdapterError,
            ErrorKind::UnsupportedOperation(_) => ErrorCode::UnsupportedOperation,
            ErrorKind::Propagation(_) => ErrorCode::Propagation,
            ErrorKind::TooManyRecords(_) => ErrorCode::TooManyRecords,
            ErrorKind::Consistency(_) | ErrorKind::Anyhow(_) | ErrorKind::Unknown => {
                ErrorCode::Consistency
            }
        }
    }

    /// Human readable description of the whole chain.
    pub fn details(&self) -> String {
        self.to_string()
    }

    /// Identity of the model whose adapter call produced this error.
    pub fn model_identity(&self) -> Option<&str> {
        self.chain().find_map(|err| match err.kind() {
            ErrorKind::Unique(err) => Some(&err.model[..]),
            ErrorKind::Adapter(err) => Some(&err.model[..]),
            _ => None,
        })
    }

    /// The untouched error the adapter reported.
    pub fn raw(&self) -> Option<&AdapterError> {
        self.chain().find_map(|err| match err.kind() {
            ErrorKind::Unique(err) => Some(&err.raw),
            ErrorKind::Adapter(err) => Some(&err.raw),
            _ => None,
        })
    }

    /// Call site that issued the operation which failed in the adapter.
    pub fn omen(&self) -> Option<Omen> {
        self.chain().find_map(|err| match err.kind() {
            ErrorKind::Unique(err) => Some(err.omen),
            ErrorKind::Adapter(err) => Some(err.omen),
            _ => None,
        })
    }

    fn chain(&self) -> impl Iterator<Item = &Error> {
        let mut err = self;
        core::iter::once(err).chain(core::iter::from_fn(move || {
            err = err.inner.as_ref().and_then(|inner| inner.cause.as_ref())?;
            Some(err)
        }))
    }

    fn kind(&self) -> &ErrorKind {
        self.inner
            .as_ref()
            .map(|inner| &inner.kind)
            .unwrap_or(&ErrorKind::Unknown)
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self.kind() {
            ErrorKind::Unique(err) => Some(&err.raw),
            ErrorKind::Adapter(err) => Some(&err.raw),
            ErrorKind::Anyhow(err) => Some(err.as_ref()),
            _ => self
                .inner
                .as_ref()
                .and_then(|inner| inner.cause.as_ref())
                .map(|cause| cause as &(dyn std::error::Error + 'static)),
        }
    }
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        let mut it = self.chain().peekable();
        while let Some(err) = it.next() {
            core::fmt::Display::fmt(err.kind(), f)?;
            if it.peek().is_some() {
                f.write_str(": ")?;
            }
        }
        Ok(())
    }
}

impl core::fmt::Debug for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        match (&self.inner, f.alternate()) {
            (Some(inner), true) => f
                .debug_struct("Error")
                .field("code", &self.code())
                .field("kind", &inner.kind)
                .field("cause", &inner.cause)
                .finish(),
            _ => write!(f, "[{}] {self}", self.code()),
        }
    }
}

#[derive(Debug)]
enum ErrorKind {
    Anyhow(anyhow::Error),
    Usage(UsageError),
    Noop(NoopError),
    Unique(UniqueError),
    Adapter(AdapterFailure),
    UnsupportedOperation(UnsupportedOperationError),
    Consistency(ConsistencyError),
    Propagation(PropagationError),
    TooManyRecords(TooManyRecordsError),
    Unknown,
}

impl core::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        use self::ErrorKind::*;

        match self {
            Anyhow(err) => core::fmt::Display::fmt(err, f),
            Usage(err) => core::fmt::Display::fmt(err, f),
            Noop(err) => core::fmt::Display::fmt(err, f),
            Unique(err) => core::fmt::Display::fmt(err, f),
            Adapter(err) => core::fmt::Display::fmt(err, f),
            UnsupportedOperation(err) => core::fmt::Display::fmt(err, f),
            Consistency(err) => core::fmt::Display::fmt(err, f),
            Propagation(err) => core::fmt::Display::fmt(err, f),
            TooManyRecords(err) => core::fmt::Display::fmt(err, f),
            Unknown => f.write_str("unknown tideline error"),
        }
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Error {
        Error {
            inner: Some(Arc::new(ErrorInner { kind, cause: None })),
        }
    }
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Error {
        Error::from(ErrorKind::Anyhow(err))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Error {
        Error::from(anyhow::Error::from(err))
    }
}

/// Anything usable as context for an [`Error`].
pub trait IntoError {
    fn into_error(self) -> Error;
}

impl IntoError for Error {
    #[inline(always)]
    fn into_error(self) -> Error {
        self
    }
}
