use std::fmt;
use std::panic::Location;

/// Call-site carrier captured when a public operation is invoked.
///
/// Adapter failures surface long after the caller's frame is gone. The omen
/// remembers where the operation was issued so the reported error points at
/// user code instead of at the engine.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Omen {
    location: &'static Location<'static>,
}

impl Omen {
    #[track_caller]
    pub fn capture() -> Omen {
        Omen {
            location: Location::caller(),
        }
    }

    pub fn file(&self) -> &'static str {
        self.location.file()
    }

    pub fn line(&self) -> u32 {
        self.location.line()
    }
}

impl fmt::Debug for Omen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Omen({})", self.location)
    }
}

impl fmt::Display for Omen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.location, f)
    }
}
