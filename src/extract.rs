//! Projects named bindings out of an input that already matched a clause.

use std::collections::BTreeMap;

use crate::coerce;
use crate::error::{MorphicError, MorphicResult};
use crate::predicate::{Predicate, PredicateKind};
use crate::value::Value;

/// Name-to-value record handed to a winning clause's action.
pub type Bindings = BTreeMap<String, Value>;

/// Extracts the named bindings of `fields` from `input`.
///
/// Predicates without a binding name are skipped. Projection is
/// kind-specific: a coercive-type predicate binds the coerced value, a
/// literal predicate binds its stored value, every other kind binds the raw
/// subject.
///
/// # Errors
///
/// Walking a named predicate's path must succeed here — this is only called
/// on inputs proven to satisfy the owning clause — so a miss is surfaced as
/// an internal error, not as a no-match.
pub fn extract_named(fields: &[Predicate], input: &Value) -> MorphicResult<Bindings> {
    let mut bindings = Bindings::new();
    for field in fields {
        let Some(name) = field.binding() else {
            continue;
        };
        let subject = field.path().walk(input).ok_or_else(|| {
            MorphicError::internal(format!(
                "bound field '{name}' missing from matched input at {}",
                field.path()
            ))
        })?;
        let value = match field.kind() {
            PredicateKind::CoerciveType(family) => coerce::project(subject, *family),
            PredicateKind::Literal(stored) => stored.clone(),
            _ => subject.clone(),
        };
        bindings.insert(name.to_string(), value);
    }
    Ok(bindings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::AccessPath;

    fn at(key: &str) -> AccessPath {
        AccessPath::root().child(key)
    }

    #[test]
    fn test_extracts_raw_subject() {
        let fields = vec![Predicate::wildcard().named("anything").at(at("x"))];
        let input = Value::record([("x", Value::list([1, 2]))]);
        let bindings = extract_named(&fields, &input).expect("walkable");
        assert_eq!(bindings.get("anything"), Some(&Value::list([1, 2])));
    }

    #[test]
    fn test_coercive_projects_coerced_value() {
        let fields = vec![Predicate::number().named("n").at(at("x"))];
        let input = Value::record([("x", "5")]);
        let bindings = extract_named(&fields, &input).expect("walkable");
        assert_eq!(bindings.get("n"), Some(&Value::Number(5.0)));
    }

    #[test]
    fn test_literal_projects_stored_value() {
        let fields = vec![Predicate::literal(5).named("n").at(at("x"))];
        // The subject "5" matched under loose equality; the binding carries
        // the stored literal, not the raw subject.
        let input = Value::record([("x", "5")]);
        let bindings = extract_named(&fields, &input).expect("walkable");
        assert_eq!(bindings.get("n"), Some(&Value::Number(5.0)));
    }

    #[test]
    fn test_skips_unnamed_predicates() {
        let fields = vec![
            Predicate::wildcard().at(at("a")),
            Predicate::wildcard().named("b").at(at("b")),
        ];
        let input = Value::record([("a", 1), ("b", 2)]);
        let bindings = extract_named(&fields, &input).expect("walkable");
        assert_eq!(bindings.len(), 1);
        assert_eq!(bindings.get("b"), Some(&Value::from(2)));
    }

    #[test]
    fn test_unwalkable_path_is_loud() {
        let fields = vec![Predicate::wildcard().named("x").at(at("missing"))];
        let err = extract_named(&fields, &Value::record([("present", 1)]))
            .expect_err("missing field");
        assert!(err.is_internal());
    }

    #[test]
    fn test_naming_round_trip() {
        let fields = vec![
            Predicate::string().named("name").at(at("author")),
            Predicate::number().named("year").at(at("year")),
        ];
        let input = Value::record([
            ("author", Value::from("George Orwell")),
            ("year", Value::from("1949")),
        ]);
        let bindings = extract_named(&fields, &input).expect("walkable");
        let names: Vec<&str> = bindings.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["name", "year"]);
        assert_eq!(bindings.get("name"), Some(&Value::from("George Orwell")));
        assert_eq!(bindings.get("year"), Some(&Value::Number(1949.0)));
    }
}
