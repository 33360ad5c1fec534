//! Error types for morphic.
//!
//! All errors are strongly typed using thiserror. Ambiguity and no-match are
//! legitimate terminal outcomes of the dispatch algorithm, not engine
//! failures; the engine performs no recovery.

use thiserror::Error;

use crate::engine::ClauseRef;

/// Errors raised while registering a clause.
#[derive(Debug, Error)]
pub enum RegistrationError {
    /// Two leaf predicates in one clause share a binding name. Fatal to that
    /// registration; the engine's clause list is left untouched.
    #[error("duplicate named field '{name}'")]
    DuplicateNamedField {
        /// The offending binding name.
        name: String,
    },
}

/// Terminal dispatch outcomes surfaced to the caller.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// More than one clause's full predicate set held for the input. Never
    /// silently resolved by registration order.
    #[error("{count} clauses match the same input: {}", clause_list(.clauses))]
    AmbiguousMatch {
        /// Surviving candidate cardinality.
        count: usize,
        /// Provenance of each surviving clause.
        clauses: Vec<ClauseRef>,
    },

    /// No clause held and no fallback is registered.
    #[error("unrecognised input {input}")]
    NoMatch {
        /// Display form of the offending input.
        input: String,
    },
}

fn clause_list(clauses: &[ClauseRef]) -> String {
    clauses
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Top-level error type for morphic.
#[derive(Debug, Error)]
pub enum MorphicError {
    /// Registration error.
    #[error("registration error: {0}")]
    Registration(#[from] RegistrationError),

    /// Dispatch error.
    #[error("dispatch error: {0}")]
    Dispatch(#[from] DispatchError),

    /// Raised by a clause registered with a fixed failure action.
    #[error("{message}")]
    Raised {
        /// The registered failure message.
        message: String,
    },

    /// Internal error; indicates a broken invariant, such as a bound field
    /// missing from an input that already matched.
    #[error("internal error: {message}")]
    Internal {
        /// What went wrong.
        message: String,
    },
}

impl MorphicError {
    /// Creates a raised error.
    #[must_use]
    pub fn raised(message: impl Into<String>) -> Self {
        Self::Raised {
            message: message.into(),
        }
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Returns true if this is a registration error.
    #[must_use]
    pub const fn is_registration(&self) -> bool {
        matches!(self, Self::Registration(_))
    }

    /// Returns true if this is a dispatch error.
    #[must_use]
    pub const fn is_dispatch(&self) -> bool {
        matches!(self, Self::Dispatch(_))
    }

    /// Returns true if this is an ambiguity error.
    #[must_use]
    pub const fn is_ambiguous(&self) -> bool {
        matches!(self, Self::Dispatch(DispatchError::AmbiguousMatch { .. }))
    }

    /// Returns true if this is a no-match error.
    #[must_use]
    pub const fn is_no_match(&self) -> bool {
        matches!(self, Self::Dispatch(DispatchError::NoMatch { .. }))
    }

    /// Returns true if this is a raised error.
    #[must_use]
    pub const fn is_raised(&self) -> bool {
        matches!(self, Self::Raised { .. })
    }

    /// Returns true if this is an internal error.
    #[must_use]
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal { .. })
    }
}

/// Result type alias for morphic operations.
pub type MorphicResult<T> = Result<T, MorphicError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn reference(engine: &mut crate::engine::Engine<u8>, label: Option<&str>) -> ClauseRef {
        let id = match label {
            Some(label) => engine.add_labeled_clause(label, vec![], 0),
            None => engine.add_clause(vec![], 0),
        };
        engine
            .clause(id)
            .map(crate::engine::Clause::reference)
            .expect("just registered")
    }

    #[test]
    fn test_duplicate_named_field_message() {
        let err = RegistrationError::DuplicateNamedField {
            name: "name".to_string(),
        };
        assert_eq!(format!("{err}"), "duplicate named field 'name'");
    }

    #[test]
    fn test_ambiguous_match_message() {
        let mut engine = crate::engine::Engine::new();
        let first = reference(&mut engine, None);
        let second = reference(&mut engine, Some("string clause"));
        let err = DispatchError::AmbiguousMatch {
            count: 2,
            clauses: vec![first, second],
        };
        let msg = format!("{err}");
        assert!(msg.contains("2 clauses match"));
        assert!(msg.contains("#0"));
        assert!(msg.contains("#1 (string clause)"));
    }

    #[test]
    fn test_no_match_message() {
        let err = DispatchError::NoMatch {
            input: "[123]".to_string(),
        };
        let msg = format!("{err}");
        assert!(msg.contains("unrecognised input"));
        assert!(msg.contains("[123]"));
    }

    #[test]
    fn test_morphic_error_from_registration() {
        let err: MorphicError = RegistrationError::DuplicateNamedField {
            name: "x".to_string(),
        }
        .into();
        assert!(err.is_registration());
        assert!(!err.is_dispatch());
    }

    #[test]
    fn test_morphic_error_from_dispatch() {
        let err: MorphicError = DispatchError::NoMatch {
            input: "null".to_string(),
        }
        .into();
        assert!(err.is_dispatch());
        assert!(err.is_no_match());
        assert!(!err.is_ambiguous());
    }

    #[test]
    fn test_morphic_error_helpers() {
        let raised = MorphicError::raised("boom");
        assert!(raised.is_raised());
        assert_eq!(format!("{raised}"), "boom");

        let internal = MorphicError::internal("broken invariant");
        assert!(internal.is_internal());
        assert!(format!("{internal}").contains("broken invariant"));
    }
}
