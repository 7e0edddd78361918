use std::fmt;

/// Structured classification an adapter attaches to a failure.
///
/// `identity` comes from a closed vocabulary. Only [`Footprint::NOT_UNIQUE`]
/// is understood today; anything else is reported as a malformed adapter
/// error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Footprint {
    pub identity: String,

    /// Column names involved in the failure.
    pub keys: Option<Vec<String>>,
}

impl Footprint {
    pub const NOT_UNIQUE: &'static str = "notUnique";

    pub fn new(identity: impl Into<String>) -> Footprint {
        Footprint {
            identity: identity.into(),
            keys: None,
        }
    }

    pub fn not_unique<I, S>(keys: I) -> Footprint
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Footprint {
            identity: Self::NOT_UNIQUE.to_string(),
            keys: Some(keys.into_iter().map(Into::into).collect()),
        }
    }

    pub fn is_not_unique(&self) -> bool {
        self.identity == Self::NOT_UNIQUE
    }
}

/// An error exactly as the adapter reported it.
pub struct AdapterError {
    footprint: Option<Footprint>,
    source: Box<dyn std::error::Error + Send + Sync>,
}

impl AdapterError {
    pub fn new(err: impl std::error::Error + Send + Sync + 'static) -> AdapterError {
        AdapterError {
            footprint: None,
            source: Box::new(err),
        }
    }

    pub fn msg(message: impl Into<String>) -> AdapterError {
        AdapterError {
            footprint: None,
            source: message.into().into(),
        }
    }

    pub fn with_footprint(mut self, footprint: Footprint) -> AdapterError {
        self.footprint = Some(footprint);
        self
    }

    pub fn footprint(&self) -> Option<&Footprint> {
        self.footprint.as_ref()
    }
}

impl std::error::Error for AdapterError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source.source()
    }
}

impl fmt::Display for AdapterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.source, f)
    }
}

impl fmt::Debug for AdapterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdapterError")
            .field("footprint", &self.footprint)
            .field("source", &self.source)
            .finish()
    }
}
