//! Access paths: the route from the input root to a predicate's subject.

use std::fmt;

use serde::Serialize;

use crate::symbol::SymbolKey;
use crate::value::{RecordKey, Value};

/// One step of an [`AccessPath`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PathSegment {
    /// A string key into a record.
    Key(String),
    /// A positional index into a list.
    Index(usize),
    /// A symbolic key into a record.
    Symbol(SymbolKey),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key(key) => write!(f, ".{key}"),
            Self::Index(index) => write!(f, "[{index}]"),
            Self::Symbol(key) => write!(f, ".{key}"),
        }
    }
}

impl From<&str> for PathSegment {
    fn from(key: &str) -> Self {
        Self::Key(key.to_string())
    }
}

impl From<String> for PathSegment {
    fn from(key: String) -> Self {
        Self::Key(key)
    }
}

impl From<usize> for PathSegment {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

impl From<SymbolKey> for PathSegment {
    fn from(key: SymbolKey) -> Self {
        Self::Symbol(key)
    }
}

impl From<RecordKey> for PathSegment {
    fn from(key: RecordKey) -> Self {
        match key {
            RecordKey::Str(key) => Self::Key(key),
            RecordKey::Sym(key) => Self::Symbol(key),
        }
    }
}

/// An ordered route of keys and indices locating a leaf predicate's subject
/// inside the input.
///
/// # Examples
///
/// ```
/// use morphic::{AccessPath, Value};
///
/// let path = AccessPath::root().child(0usize).child("author");
/// let input = Value::list([Value::record([("author", "George Orwell")])]);
///
/// assert_eq!(path.walk(&input), Some(&Value::from("George Orwell")));
/// assert_eq!(path.walk(&Value::from(123)), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct AccessPath(Vec<PathSegment>);

impl AccessPath {
    /// The empty path, pointing at the input itself.
    #[must_use]
    pub const fn root() -> Self {
        Self(Vec::new())
    }

    /// Builds a path from segments.
    #[must_use]
    pub fn new(segments: Vec<PathSegment>) -> Self {
        Self(segments)
    }

    /// Returns the segments in order.
    #[must_use]
    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    /// Returns the number of segments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true for the root path.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns this path extended by one segment.
    #[must_use]
    pub fn child(&self, segment: impl Into<PathSegment>) -> Self {
        let mut segments = self.0.clone();
        segments.push(segment.into());
        Self(segments)
    }

    /// Walks this path into `input`.
    ///
    /// Returns `None` when any intermediate step cannot be followed — a
    /// destructuring miss, not an error.
    #[must_use]
    pub fn walk<'a>(&self, input: &'a Value) -> Option<&'a Value> {
        let mut current = input;
        for segment in &self.0 {
            current = match segment {
                PathSegment::Key(key) => current.get_key(key)?,
                PathSegment::Index(index) => current.get_index(*index)?,
                PathSegment::Symbol(key) => current.get_symbol(*key)?,
            };
        }
        Some(current)
    }
}

impl fmt::Display for AccessPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "$")?;
        for segment in &self.0 {
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}

impl FromIterator<PathSegment> for AccessPath {
    fn from_iter<I: IntoIterator<Item = PathSegment>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
