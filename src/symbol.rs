//! Symbolic record keys and the process-wide symbol table.
//!
//! A [`SymbolKey`] is an opaque key with creation identity: every call to
//! [`SymbolKey::new`] produces a distinct key, even for an identical
//! description. A symbolic key never aliases a string key with the same
//! display text.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, OnceLock, PoisonError};

use serde::Serialize;

/// An opaque symbolic record key.
///
/// # Examples
///
/// ```
/// use morphic::SymbolKey;
///
/// let a = SymbolKey::new("kind");
/// let b = SymbolKey::new("kind");
///
/// // Same description, distinct identity.
/// assert_ne!(a, b);
/// assert_eq!(a.description().as_deref(), Some("kind"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct SymbolKey(u64);

impl SymbolKey {
    /// Creates a fresh symbolic key carrying a diagnostic description.
    #[must_use]
    pub fn new(description: impl Into<String>) -> Self {
        SymbolTable::global().create(Some(description.into()))
    }

    /// Creates a fresh symbolic key without a description.
    #[must_use]
    pub fn anonymous() -> Self {
        SymbolTable::global().create(None)
    }

    /// Returns the description this key was created with, if any.
    #[must_use]
    pub fn description(&self) -> Option<String> {
        SymbolTable::global().description(*self)
    }
}

impl fmt::Display for SymbolKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.description() {
            Some(description) => write!(f, "Symbol({description})"),
            None => write!(f, "Symbol(#{})", self.0),
        }
    }
}

/// Process-wide registry backing symbolic keys.
///
/// The table owns two mappings: key descriptions, and the surrogate ordinals
/// substituted for symbolic path segments during canonical hashing. A
/// surrogate is assigned the first time a key is hashed and the table is
/// never reset during a process's lifetime, which keeps canonical hashes
/// stable across repeated hashing calls.
#[derive(Debug, Default)]
pub struct SymbolTable {
    inner: Mutex<TableInner>,
}

#[derive(Debug, Default)]
struct TableInner {
    descriptions: HashMap<u64, String>,
    surrogates: HashMap<u64, u64>,
}

static NEXT_KEY: AtomicU64 = AtomicU64::new(0);
static GLOBAL: OnceLock<SymbolTable> = OnceLock::new();

impl SymbolTable {
    /// Returns the shared process-wide table.
    #[must_use]
    pub fn global() -> &'static Self {
        GLOBAL.get_or_init(Self::default)
    }

    /// Returns the stable surrogate ordinal for `key`, assigning the next
    /// ordinal on first sight.
    #[must_use]
    pub fn surrogate_id(&self, key: SymbolKey) -> u64 {
        let mut inner = self.lock();
        let next = inner.surrogates.len() as u64;
        *inner.surrogates.entry(key.0).or_insert(next)
    }

    fn create(&self, description: Option<String>) -> SymbolKey {
        let id = NEXT_KEY.fetch_add(1, Ordering::Relaxed);
        if let Some(description) = description {
            self.lock().descriptions.insert(id, description);
        }
        SymbolKey(id)
    }

    fn description(&self, key: SymbolKey) -> Option<String> {
        self.lock().descriptions.get(&key.0).cloned()
    }

    fn lock(&self) -> MutexGuard<'_, TableInner> {
        // The table holds no invariant that a panicked writer could break.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_keys_are_distinct() {
        let a = SymbolKey::new("same");
        let b = SymbolKey::new("same");
        assert_ne!(a, b);
    }

    #[test]
    fn test_symbol_description() {
        let key = SymbolKey::new("version");
        assert_eq!(key.description().as_deref(), Some("version"));

        let anon = SymbolKey::anonymous();
        assert_eq!(anon.description(), None);
    }

    #[test]
    fn test_surrogate_is_stable() {
        let key = SymbolKey::new("stable");
        let first = SymbolTable::global().surrogate_id(key);
        let second = SymbolTable::global().surrogate_id(key);
        assert_eq!(first, second);
    }

    #[test]
    fn test_surrogates_are_distinct_per_key() {
        let a = SymbolKey::anonymous();
        let b = SymbolKey::anonymous();
        let table = SymbolTable::global();
        assert_ne!(table.surrogate_id(a), table.surrogate_id(b));
    }

    #[test]
    fn test_display() {
        let named = SymbolKey::new("tag");
        assert_eq!(format!("{named}"), "Symbol(tag)");

        let anon = SymbolKey::anonymous();
        assert!(format!("{anon}").starts_with("Symbol(#"));
    }
}
