use std::cmp::Ordering;
use std::fmt;

/// Identifier of a node or an edge.
///
/// Identifiers are either integers or strings. The ordering is total:
/// every integer compares less than every string, and values of the same
/// kind compare naturally. Equality and hashing discriminate on the kind,
/// so `Id::Int(1)` and `Id::Str("1")` are distinct map keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Id {
    Int(i64),
    Str(String),
}

impl Ord for Id {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Id::Int(a), Id::Int(b)) => a.cmp(b),
            (Id::Str(a), Id::Str(b)) => a.cmp(b),
            (Id::Int(_), Id::Str(_)) => Ordering::Less,
            (Id::Str(_), Id::Int(_)) => Ordering::Greater,
        }
    }
}

impl PartialOrd for Id {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Id::Int(value) => write!(f, "{value}"),
            Id::Str(value) => write!(f, "{value}"),
        }
    }
}

impl From<i64> for Id {
    fn from(value: i64) -> Self {
        Id::Int(value)
    }
}

impl From<&str> for Id {
    fn from(value: &str) -> Self {
        Id::Str(value.to_string())
    }
}

impl From<String> for Id {
    fn from(value: String) -> Self {
        Id::Str(value)
    }
}
