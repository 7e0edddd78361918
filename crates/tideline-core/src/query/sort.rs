use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Asc,
    Desc,
}

/// One `sort` entry. `key` may be compound (`"meta.rank"`); only its first
/// segment names an attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortClause {
    pub key: String,
    pub direction: Direction,
}

impl Direction {
    /// Parses `ASC`/`DESC` in any case.
    pub fn parse(token: &str) -> Option<Direction> {
        if token.eq_ignore_ascii_case("asc") {
            Some(Direction::Asc)
        } else if token.eq_ignore_ascii_case("desc") {
            Some(Direction::Desc)
        } else {
            None
        }
    }

    /// `1` for ascending, `-1` for descending.
    pub fn as_i8(self) -> i8 {
        match self {
            Direction::Asc => 1,
            Direction::Desc => -1,
        }
    }

    pub fn from_i64(n: i64) -> Option<Direction> {
        match n {
            1 => Some(Direction::Asc),
            -1 => Some(Direction::Desc),
            _ => None,
        }
    }
}

impl SortClause {
    pub fn new(key: impl Into<String>, direction: Direction) -> SortClause {
        SortClause {
            key: key.into(),
            direction,
        }
    }

    pub fn asc(key: impl Into<String>) -> SortClause {
        SortClause::new(key, Direction::Asc)
    }

    pub fn desc(key: impl Into<String>) -> SortClause {
        SortClause::new(key, Direction::Desc)
    }

    /// The attribute (or column) the clause sorts by.
    pub fn head(&self) -> &str {
        self.key.split('.').next().unwrap_or(&self.key)
    }

    /// Replaces the first segment, keeping any nested path.
    pub fn rename_head(&mut self, head: &str) {
        self.key = match self.key.split_once('.') {
            Some((_, rest)) => format!("{head}.{rest}"),
            None => head.to_string(),
        };
    }
}

impl fmt::Display for SortClause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.key, self.direction.as_i8())
    }
}
