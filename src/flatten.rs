//! Flattens a nested pattern specification into leaf predicates with
//! access paths.

use std::collections::BTreeMap;

use crate::error::RegistrationError;
use crate::path::AccessPath;
use crate::predicate::Predicate;
use crate::value::{RecordKey, Value};

/// A caller-supplied nested pattern specification.
///
/// Containers decompose structurally; a pre-built predicate is rebased to
/// wherever it sits; any other value matches literally.
///
/// # Examples
///
/// ```
/// use morphic::{flatten, PatternSpec, Predicate};
///
/// let spec = PatternSpec::record([("author", Predicate::string().named("name"))]);
/// let predicates = flatten(&spec);
///
/// assert_eq!(predicates.len(), 1);
/// assert_eq!(predicates[0].binding(), Some("name"));
/// assert_eq!(format!("{}", predicates[0].path()), "$.author");
/// ```
#[derive(Debug, Clone)]
pub enum PatternSpec {
    /// A pre-built predicate, rebased to its position in the spec.
    Predicate(Predicate),
    /// An ordered sequence; elements match at their index.
    Seq(Vec<PatternSpec>),
    /// A mapping; entries match at their key, string keys before symbolic
    /// keys.
    Map(BTreeMap<RecordKey, PatternSpec>),
    /// A plain value; containers decompose, scalars match literally.
    Value(Value),
}

impl PatternSpec {
    /// Builds a mapping spec from `(key, spec)` entries.
    #[must_use]
    pub fn record<K, S>(entries: impl IntoIterator<Item = (K, S)>) -> Self
    where
        K: Into<RecordKey>,
        S: Into<PatternSpec>,
    {
        Self::Map(
            entries
                .into_iter()
                .map(|(key, spec)| (key.into(), spec.into()))
                .collect(),
        )
    }

    /// Builds a sequence spec.
    #[must_use]
    pub fn seq<S: Into<PatternSpec>>(items: impl IntoIterator<Item = S>) -> Self {
        Self::Seq(items.into_iter().map(Into::into).collect())
    }
}

impl From<Predicate> for PatternSpec {
    fn from(predicate: Predicate) -> Self {
        Self::Predicate(predicate)
    }
}

impl From<Value> for PatternSpec {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

impl From<&str> for PatternSpec {
    fn from(value: &str) -> Self {
        Self::Value(value.into())
    }
}

impl From<i32> for PatternSpec {
    fn from(value: i32) -> Self {
        Self::Value(value.into())
    }
}

impl From<f64> for PatternSpec {
    fn from(value: f64) -> Self {
        Self::Value(value.into())
    }
}

impl From<bool> for PatternSpec {
    fn from(value: bool) -> Self {
        Self::Value(value.into())
    }
}

/// Flattens `spec` into an ordered sequence of leaf predicates.
///
/// Total: every spec produces at least one predicate. The order is traversal
/// order and has no effect on matching.
#[must_use]
pub fn flatten(spec: &PatternSpec) -> Vec<Predicate> {
    let mut out = Vec::new();
    flatten_into(spec, &AccessPath::root(), &mut out);
    out
}

fn flatten_into(spec: &PatternSpec, path: &AccessPath, out: &mut Vec<Predicate>) {
    match spec {
        PatternSpec::Predicate(predicate) => out.push(predicate.rebased(path.clone())),
        PatternSpec::Seq(items) => {
            for (index, item) in items.iter().enumerate() {
                flatten_into(item, &path.child(index), out);
            }
        }
        PatternSpec::Map(entries) => {
            // BTreeMap iteration yields string keys before symbolic keys.
            for (key, entry) in entries {
                flatten_into(entry, &path.child(key.clone()), out);
            }
        }
        PatternSpec::Value(value) => flatten_value(value, path, out),
    }
}

fn flatten_value(value: &Value, path: &AccessPath, out: &mut Vec<Predicate>) {
    match value {
        Value::List(items) => {
            for (index, item) in items.iter().enumerate() {
                flatten_value(item, &path.child(index), out);
            }
        }
        Value::Record(fields) => {
            for (key, field) in fields {
                flatten_value(field, &path.child(key.clone()), out);
            }
        }
        scalar => out.push(Predicate::literal(scalar.clone()).at(path.clone())),
    }
}

/// Collects the predicates carrying a binding name, rejecting duplicates
/// within one flattened sequence.
///
/// # Errors
///
/// Returns [`RegistrationError::DuplicateNamedField`] when two predicates
/// share a binding name.
pub fn named_fields(predicates: &[Predicate]) -> Result<Vec<Predicate>, RegistrationError> {
    let mut named: Vec<Predicate> = Vec::new();
    for predicate in predicates {
        let Some(name) = predicate.binding() else {
            continue;
        };
        if named.iter().any(|seen| seen.binding() == Some(name)) {
            return Err(RegistrationError::DuplicateNamedField {
                name: name.to_string(),
            });
        }
        named.push(predicate.clone());
    }
    Ok(named)
}
