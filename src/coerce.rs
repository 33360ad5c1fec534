//! The conversion-attempt table behind coercive type matching, plus loose
//! (coercing) equality.
//!
//! Coercive matching follows JavaScript-style conversion rules, defined
//! here as an explicit table:
//!
//! - **to number**: null is 0; booleans are 0/1; strings parse as trimmed
//!   decimals (empty is 0, non-numeric is NaN); a list converts through its
//!   joined string form; a record is NaN.
//! - **to string**: `"null"`, `"true"`/`"false"`, shortest numeric form,
//!   list elements joined with `,` (null elements join as empty), records as
//!   `"[object Object]"`.
//! - **to boolean**: false for null, `false`, `0`, NaN and the empty string;
//!   true otherwise.
//! - **object family**: every value except null belongs — wrapper equality
//!   for primitives, identity for containers.
//!
//! Conversion edge cases beyond this table are out of scope. Containers
//! compare structurally; there is no reference identity.

use std::fmt;

use serde::Serialize;

use crate::value::Value;

/// Primitive family a coercive-type predicate converts toward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeFamily {
    /// The numeric family.
    Number,
    /// The string family.
    String,
    /// The boolean family.
    Boolean,
    /// The object family (everything except null).
    Object,
}

impl TypeFamily {
    /// Returns the family name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Number => "number",
            Self::String => "string",
            Self::Boolean => "boolean",
            Self::Object => "object",
        }
    }
}

impl fmt::Display for TypeFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Runtime type tag, as exact-type predicates compare it.
///
/// Null, lists and records all carry the `object` tag, as in a
/// JavaScript-style `typeof`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeTag {
    /// A number.
    Number,
    /// A string.
    String,
    /// A boolean.
    Boolean,
    /// Null or a container.
    Object,
}

impl TypeTag {
    /// Returns the tag of `value`.
    #[must_use]
    pub const fn of(value: &Value) -> Self {
        match value {
            Value::Number(_) => Self::Number,
            Value::String(_) => Self::String,
            Value::Bool(_) => Self::Boolean,
            Value::Null | Value::List(_) | Value::Record(_) => Self::Object,
        }
    }

    /// Returns the tag name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Number => "number",
            Self::String => "string",
            Self::Boolean => "boolean",
            Self::Object => "object",
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Converts `value` to the numeric family. Non-convertible values are NaN.
#[must_use]
pub fn to_number(value: &Value) -> f64 {
    match value {
        Value::Null => 0.0,
        Value::Bool(b) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        Value::Number(n) => *n,
        Value::String(s) => parse_number(s),
        Value::List(_) => parse_number(&to_string(value)),
        Value::Record(_) => f64::NAN,
    }
}

/// Converts `value` to the string family.
#[must_use]
pub fn to_string(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => number_to_string(*n),
        Value::String(s) => s.clone(),
        Value::List(items) => items
            .iter()
            .map(|item| match item {
                // Null elements join as empty strings.
                Value::Null => String::new(),
                other => to_string(other),
            })
            .collect::<Vec<_>>()
            .join(","),
        Value::Record(_) => "[object Object]".to_string(),
    }
}

/// Converts `value` to the boolean family (truthiness).
#[must_use]
pub fn to_boolean(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => *n != 0.0 && !n.is_nan(),
        Value::String(s) => !s.is_empty(),
        Value::List(_) | Value::Record(_) => true,
    }
}

/// True when `value` loose-compares equal to its own conversion to `family`.
///
/// This is the coercive-type evaluation rule, and it is intentionally
/// permissive: coercion can make unrelated values compare equal, so the same
/// subject may satisfy several families at once. `1` round-trips through both
/// the number and the object family, and `[1]` joins to `"1"` and therefore
/// also round-trips through both.
#[must_use]
pub fn coerces_to(value: &Value, family: TypeFamily) -> bool {
    match family {
        TypeFamily::Number => loose_eq(&Value::Number(to_number(value)), value),
        TypeFamily::String => loose_eq(&Value::String(to_string(value)), value),
        TypeFamily::Boolean => loose_eq(&Value::Bool(to_boolean(value)), value),
        TypeFamily::Object => !value.is_null(),
    }
}

/// The coerced projection of `value` under `family`, as the named-field
/// extractor hands it to actions.
#[must_use]
pub fn project(value: &Value, family: TypeFamily) -> Value {
    match family {
        TypeFamily::Number => Value::Number(to_number(value)),
        TypeFamily::String => Value::String(to_string(value)),
        TypeFamily::Boolean => Value::Bool(to_boolean(value)),
        TypeFamily::Object => value.clone(),
    }
}

/// Loose (coercing) equality.
///
/// Same-type operands compare structurally (NaN is unequal to itself);
/// numbers and strings compare after numeric conversion; booleans convert to
/// numbers first; a container against a primitive compares through the
/// container's string form; null equals only null.
#[must_use]
pub fn loose_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Null, Value::Null) => true,
        (Value::Null, _) | (_, Value::Null) => false,
        (Value::Number(x), Value::Number(y)) => x == y,
        (Value::String(x), Value::String(y)) => x == y,
        (Value::Bool(_), _) => loose_eq(&Value::Number(to_number(a)), b),
        (_, Value::Bool(_)) => loose_eq(a, &Value::Number(to_number(b))),
        (Value::Number(x), Value::String(s)) => *x == parse_number(s),
        (Value::String(s), Value::Number(y)) => parse_number(s) == *y,
        (Value::List(_) | Value::Record(_), Value::Number(_) | Value::String(_)) => {
            loose_eq(&Value::String(to_string(a)), b)
        }
        (Value::Number(_) | Value::String(_), Value::List(_) | Value::Record(_)) => {
            loose_eq(a, &Value::String(to_string(b)))
        }
        _ => a == b,
    }
}

fn parse_number(s: &str) -> f64 {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    trimmed.parse::<f64>().unwrap_or(f64::NAN)
}

fn number_to_string(n: f64) -> String {
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    format!("{n}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_number_table() {
        assert_eq!(to_number(&Value::Null), 0.0);
        assert_eq!(to_number(&Value::Bool(true)), 1.0);
        assert_eq!(to_number(&Value::from("5")), 5.0);
        assert_eq!(to_number(&Value::from(" 5 ")), 5.0);
        assert_eq!(to_number(&Value::from("")), 0.0);
        assert!(to_number(&Value::from("five")).is_nan());
        // Lists convert through their joined string form.
        assert_eq!(to_number(&Value::list([1])), 1.0);
        assert_eq!(to_number(&Value::List(vec![])), 0.0);
        assert!(to_number(&Value::list([1, 2])).is_nan());
        assert!(to_number(&Value::record([("a", 1)])).is_nan());
    }

    #[test]
    fn test_to_string_table() {
        assert_eq!(to_string(&Value::Null), "null");
        assert_eq!(to_string(&Value::Bool(false)), "false");
        assert_eq!(to_string(&Value::Number(1.0)), "1");
        assert_eq!(to_string(&Value::Number(1.5)), "1.5");
        assert_eq!(to_string(&Value::list([1, 2, 3])), "1,2,3");
        assert_eq!(to_string(&Value::list([Value::Null, Value::from(2)])), ",2");
        assert_eq!(to_string(&Value::record([("a", 1)])), "[object Object]");
    }

    #[test]
    fn test_to_boolean_table() {
        assert!(!to_boolean(&Value::Null));
        assert!(!to_boolean(&Value::Number(0.0)));
        assert!(!to_boolean(&Value::Number(f64::NAN)));
        assert!(!to_boolean(&Value::from("")));
        assert!(to_boolean(&Value::from("x")));
        assert!(to_boolean(&Value::List(vec![])));
        assert!(to_boolean(&Value::Number(2.0)));
    }

    #[test]
    fn test_type_tag_of() {
        assert_eq!(TypeTag::of(&Value::Number(1.0)), TypeTag::Number);
        assert_eq!(TypeTag::of(&Value::from("s")), TypeTag::String);
        assert_eq!(TypeTag::of(&Value::Bool(true)), TypeTag::Boolean);
        assert_eq!(TypeTag::of(&Value::list([0])), TypeTag::Object);
        assert_eq!(TypeTag::of(&Value::record([("a", 0)])), TypeTag::Object);
        // Null carries the object tag.
        assert_eq!(TypeTag::of(&Value::Null), TypeTag::Object);
    }

    #[test]
    fn test_loose_eq() {
        assert!(loose_eq(&Value::from(5), &Value::from("5")));
        assert!(loose_eq(&Value::from("5"), &Value::from(5)));
        assert!(loose_eq(&Value::Null, &Value::Null));
        assert!(!loose_eq(&Value::Null, &Value::from(0)));
        assert!(!loose_eq(
            &Value::Number(f64::NAN),
            &Value::Number(f64::NAN)
        ));
        assert!(loose_eq(&Value::Bool(false), &Value::from("")));
        assert!(loose_eq(&Value::Bool(true), &Value::from(1)));
        assert!(!loose_eq(&Value::Bool(true), &Value::from(2)));
        // A one-element list equals the number it joins to.
        assert!(loose_eq(&Value::list([1]), &Value::from(1)));
        assert!(loose_eq(&Value::record([("a", 1)]), &Value::from("[object Object]")));
        assert!(loose_eq(&Value::list([1, 2]), &Value::from("1,2")));
        assert!(!loose_eq(&Value::list([1, 2]), &Value::from(12)));
    }

    #[test]
    fn test_coerces_to_number() {
        assert!(coerces_to(&Value::from(1), TypeFamily::Number));
        assert!(coerces_to(&Value::from("5"), TypeFamily::Number));
        assert!(coerces_to(&Value::list([1]), TypeFamily::Number));
        assert!(!coerces_to(&Value::from("five"), TypeFamily::Number));
        assert!(!coerces_to(&Value::record([("a", 1)]), TypeFamily::Number));
    }

    #[test]
    fn test_coerces_to_string() {
        assert!(coerces_to(&Value::from("x"), TypeFamily::String));
        assert!(coerces_to(&Value::from(5), TypeFamily::String));
        assert!(coerces_to(&Value::list([1]), TypeFamily::String));
    }

    #[test]
    fn test_coerces_to_boolean() {
        assert!(coerces_to(&Value::Bool(true), TypeFamily::Boolean));
        assert!(coerces_to(&Value::from(1), TypeFamily::Boolean));
        assert!(coerces_to(&Value::from(0), TypeFamily::Boolean));
        assert!(!coerces_to(&Value::from(2), TypeFamily::Boolean));
        assert!(!coerces_to(&Value::from("x"), TypeFamily::Boolean));
    }

    #[test]
    fn test_coerces_to_object() {
        assert!(coerces_to(&Value::from(1), TypeFamily::Object));
        assert!(coerces_to(&Value::list([1]), TypeFamily::Object));
        assert!(coerces_to(&Value::record([("a", 1)]), TypeFamily::Object));
        assert!(!coerces_to(&Value::Null, TypeFamily::Object));
    }

    #[test]
    fn test_overlapping_families() {
        // The documented footgun: one input satisfying several families.
        assert!(coerces_to(&Value::from(1), TypeFamily::Number));
        assert!(coerces_to(&Value::from(1), TypeFamily::Object));
        assert!(coerces_to(&Value::list([1]), TypeFamily::Number));
        assert!(coerces_to(&Value::list([1]), TypeFamily::Object));
    }

    #[test]
    fn test_project() {
        assert_eq!(
            project(&Value::from("5"), TypeFamily::Number),
            Value::Number(5.0)
        );
        assert_eq!(
            project(&Value::from(5), TypeFamily::String),
            Value::from("5")
        );
        assert_eq!(
            project(&Value::from(0), TypeFamily::Boolean),
            Value::Bool(false)
        );
        let list = Value::list([1]);
        assert_eq!(project(&list, TypeFamily::Object), list);
    }
}
