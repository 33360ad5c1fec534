//! The dynamic value universe that dispatch inputs and pattern literals
//! live in.
//!
//! Values cover the primitive families the predicate kinds reason about
//! plus two containers: ordered lists and records. Records carry both
//! string keys and opaque symbolic keys.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::symbol::SymbolKey;

/// Key of a [`Value::Record`] field.
///
/// String keys order before symbolic keys; record iteration and pattern
/// flattening rely on this.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(untagged)]
pub enum RecordKey {
    /// A plain string key.
    Str(String),
    /// An opaque symbolic key. Never aliases a string key with the same
    /// display text.
    Sym(SymbolKey),
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(key) => write!(f, "{key}"),
            Self::Sym(key) => write!(f, "{key}"),
        }
    }
}

impl From<&str> for RecordKey {
    fn from(key: &str) -> Self {
        Self::Str(key.to_string())
    }
}

impl From<String> for RecordKey {
    fn from(key: String) -> Self {
        Self::Str(key)
    }
}

impl From<SymbolKey> for RecordKey {
    fn from(key: SymbolKey) -> Self {
        Self::Sym(key)
    }
}

/// A dynamically typed value.
///
/// Numbers are uniformly `f64`, mirroring the numeric model the coercion
/// table is defined over.
///
/// # Examples
///
/// ```
/// use morphic::Value;
///
/// let title = Value::from("1984");
/// let year = Value::from(1949);
///
/// assert!(title.is_string());
/// assert_eq!(year.as_number(), Some(1949.0));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Value {
    /// The absent value.
    Null,
    /// A boolean.
    Bool(bool),
    /// A number.
    Number(f64),
    /// A string.
    String(String),
    /// An ordered sequence of values.
    List(Vec<Value>),
    /// A keyed mapping with string and symbolic keys.
    Record(BTreeMap<RecordKey, Value>),
}

impl Value {
    /// Builds a record value from `(key, value)` entries.
    #[must_use]
    pub fn record<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<RecordKey>,
        V: Into<Value>,
    {
        Self::Record(
            entries
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }

    /// Builds a list value.
    #[must_use]
    pub fn list<V: Into<Value>>(items: impl IntoIterator<Item = V>) -> Self {
        Self::List(items.into_iter().map(Into::into).collect())
    }

    /// Returns true if this value is null.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns true if this value is a boolean.
    #[must_use]
    pub const fn is_bool(&self) -> bool {
        matches!(self, Self::Bool(_))
    }

    /// Returns true if this value is a number.
    #[must_use]
    pub const fn is_number(&self) -> bool {
        matches!(self, Self::Number(_))
    }

    /// Returns true if this value is a string.
    #[must_use]
    pub const fn is_string(&self) -> bool {
        matches!(self, Self::String(_))
    }

    /// Returns true if this value is a list.
    #[must_use]
    pub const fn is_list(&self) -> bool {
        matches!(self, Self::List(_))
    }

    /// Returns true if this value is a record.
    #[must_use]
    pub const fn is_record(&self) -> bool {
        matches!(self, Self::Record(_))
    }

    /// Returns the boolean payload, if any.
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the numeric payload, if any.
    #[must_use]
    pub const fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the string payload, if any.
    #[must_use]
    pub fn as_string(&self) -> Option<&str> {
        match self {
            Self::String(v) => Some(v),
            _ => None,
        }
    }

    /// Returns the list payload, if any.
    #[must_use]
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(v) => Some(v),
            _ => None,
        }
    }

    /// Returns the record payload, if any.
    #[must_use]
    pub const fn as_record(&self) -> Option<&BTreeMap<RecordKey, Value>> {
        match self {
            Self::Record(v) => Some(v),
            _ => None,
        }
    }

    /// Looks up a record field by string key.
    #[must_use]
    pub fn get_key(&self, key: &str) -> Option<&Value> {
        match self {
            Self::Record(fields) => fields
                .iter()
                .find_map(|(k, v)| matches!(k, RecordKey::Str(s) if s == key).then_some(v)),
            _ => None,
        }
    }

    /// Looks up a record field by symbolic key.
    #[must_use]
    pub fn get_symbol(&self, key: SymbolKey) -> Option<&Value> {
        match self {
            Self::Record(fields) => fields.get(&RecordKey::Sym(key)),
            _ => None,
        }
    }

    /// Looks up a list element by index.
    #[must_use]
    pub fn get_index(&self, index: usize) -> Option<&Value> {
        match self {
            Self::List(items) => items.get(index),
            _ => None,
        }
    }

    /// Returns a human-readable type name.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Number(_) => "number",
            Self::String(_) => "string",
            Self::List(_) => "list",
            Self::Record(_) => "record",
        }
    }
}

impl Default for Value {
    fn default() -> Self {
        Self::Null
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Bool(v) => write!(f, "{v}"),
            Self::Number(v) => write!(f, "{v}"),
            Self::String(v) => write!(f, "{v:?}"),
            Self::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            Self::Record(fields) => {
                write!(f, "{{")?;
                for (i, (key, value)) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{key}: {value}")?;
                }
                write!(f, "}}")
            }
        }
    }
}

// Convenient From implementations
impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Number(f64::from(v))
    }
}

impl From<i64> for Value {
    #[allow(clippy::cast_precision_loss)]
    fn from(v: i64) -> Self {
        Self::Number(v as f64)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Self::Number(f64::from(v))
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Self::List(v)
    }
}

impl From<BTreeMap<RecordKey, Value>> for Value {
    fn from(v: BTreeMap<RecordKey, Value>) -> Self {
        Self::Record(v)
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(b),
            serde_json::Value::Number(n) => Self::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => Self::String(s),
            serde_json::Value::Array(items) => {
                Self::List(items.into_iter().map(Into::into).collect())
            }
            serde_json::Value::Object(fields) => Self::Record(
                fields
                    .into_iter()
                    .map(|(key, value)| (RecordKey::Str(key), value.into()))
                    .collect(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbol::SymbolKey;

    #[test]
    fn test_value_accessors() {
        assert!(Value::Null.is_null());
        assert_eq!(Value::Bool(true).as_bool(), Some(true));
        assert_eq!(Value::Number(42.0).as_number(), Some(42.0));
        assert_eq!(Value::from("hi").as_string(), Some("hi"));
        assert!(Value::list([1, 2]).is_list());
        assert!(Value::record([("a", 1)]).is_record());
    }

    #[test]
    fn test_value_type_name() {
        assert_eq!(Value::Null.type_name(), "null");
        assert_eq!(Value::Bool(false).type_name(), "bool");
        assert_eq!(Value::Number(1.0).type_name(), "number");
        assert_eq!(Value::from("s").type_name(), "string");
        assert_eq!(Value::list([0]).type_name(), "list");
        assert_eq!(Value::record([("k", 0)]).type_name(), "record");
    }

    #[test]
    fn test_record_lookup() {
        let sym = SymbolKey::new("hidden");
        let mut fields = BTreeMap::new();
        fields.insert(RecordKey::from("a"), Value::from(1));
        fields.insert(RecordKey::from(sym), Value::from(2));
        let record = Value::Record(fields);

        assert_eq!(record.get_key("a"), Some(&Value::from(1)));
        assert_eq!(record.get_symbol(sym), Some(&Value::from(2)));
        assert_eq!(record.get_key("missing"), None);
        // A symbolic key is invisible to string lookup of its description.
        assert_eq!(record.get_key("hidden"), None);
    }

    #[test]
    fn test_list_lookup() {
        let list = Value::list(["a", "b"]);
        assert_eq!(list.get_index(1), Some(&Value::from("b")));
        assert_eq!(list.get_index(2), None);
        assert_eq!(Value::from(5).get_index(0), None);
    }

    #[test]
    fn test_string_keys_order_before_symbolic_keys() {
        let sym = SymbolKey::new("aaa");
        let record = Value::record([
            (RecordKey::from(sym), Value::from(1)),
            (RecordKey::from("zzz"), Value::from(2)),
        ]);
        let keys: Vec<RecordKey> = record
            .as_record()
            .map(|fields| fields.keys().cloned().collect())
            .unwrap_or_default();
        assert_eq!(keys, vec![RecordKey::from("zzz"), RecordKey::from(sym)]);
    }

    #[test]
    fn test_value_display() {
        assert_eq!(format!("{}", Value::Null), "null");
        assert_eq!(format!("{}", Value::Number(1.0)), "1");
        assert_eq!(format!("{}", Value::from("hi")), "\"hi\"");
        assert_eq!(format!("{}", Value::list([1, 2])), "[1, 2]");
        assert_eq!(format!("{}", Value::record([("a", 1)])), "{a: 1}");
    }

    #[test]
    fn test_from_json() {
        let json = serde_json::json!({"title": "1984", "tags": ["novel", 3], "ok": true});
        let value = Value::from(json);
        assert_eq!(value.get_key("title"), Some(&Value::from("1984")));
        assert_eq!(
            value.get_key("tags"),
            Some(&Value::List(vec![Value::from("novel"), Value::from(3)]))
        );
        assert_eq!(value.get_key("ok"), Some(&Value::Bool(true)));
    }

    #[test]
    fn test_from_conversions() {
        let _: Value = true.into();
        let _: Value = 42i32.into();
        let _: Value = 42i64.into();
        let _: Value = 3.5f32.into();
        let _: Value = 3.5f64.into();
        let _: Value = "hello".into();
        let _: Value = String::from("hello").into();
        let _: Value = vec![Value::Null].into();
    }
}
