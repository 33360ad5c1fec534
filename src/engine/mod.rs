//! The candidate-elimination dispatch engine.
//!
//! Clauses are registered with a flattened predicate sequence and an opaque
//! action. Structurally identical predicates are pooled by canonical hash,
//! each pool entry carrying the bitset of clauses that depend on it; a shared
//! predicate is evaluated once per resolution and eliminates all its
//! dependents in one step.
//!
//! Registration takes `&mut self` and dispatch takes `&self`, so the
//! build-then-dispatch phase discipline is enforced by the borrow checker: a
//! sealed engine behind a shared reference may be dispatched from many
//! threads concurrently.

mod bitset;

pub use bitset::ClauseSet;

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

use crate::error::DispatchError;
use crate::predicate::{CanonicalHash, Predicate};
use crate::value::Value;

/// Dense 0-based clause identifier, assigned in registration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct ClauseId(usize);

impl ClauseId {
    /// Returns the dense index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for ClauseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Registration-time provenance of a clause, surfaced in ambiguity errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClauseRef {
    /// The clause's dense id.
    pub id: ClauseId,
    /// The caller-supplied label, if any.
    pub label: Option<String>,
}

impl fmt::Display for ClauseRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.label {
            Some(label) => write!(f, "#{} ({label})", self.id),
            None => write!(f, "#{}", self.id),
        }
    }
}

/// One registered (predicate set, action) clause. Append-only; never removed
/// or mutated after registration.
#[derive(Debug)]
pub struct Clause<A> {
    id: ClauseId,
    label: Option<String>,
    predicates: Vec<Predicate>,
    action: A,
}

impl<A> Clause<A> {
    /// Returns the clause id.
    #[must_use]
    pub const fn id(&self) -> ClauseId {
        self.id
    }

    /// Returns the caller-supplied label, if any.
    #[must_use]
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Returns the clause's predicate sequence.
    #[must_use]
    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    /// Returns the registered action.
    #[must_use]
    pub const fn action(&self) -> &A {
        &self.action
    }

    /// Returns this clause's provenance reference.
    #[must_use]
    pub fn reference(&self) -> ClauseRef {
        ClauseRef {
            id: self.id,
            label: self.label.clone(),
        }
    }
}

#[derive(Debug)]
struct PoolEntry {
    predicate: Predicate,
    dependents: ClauseSet,
}

/// Outcome of a successful resolution.
#[derive(Debug)]
pub enum Resolution<'a, A> {
    /// Exactly one clause's full predicate set held.
    Clause(&'a Clause<A>),
    /// No clause held; the registered fallback applies.
    Fallback(&'a A),
}

/// The dispatch engine: an append-only clause list plus the canonicalized
/// predicate pool.
///
/// # Examples
///
/// ```
/// use morphic::{Engine, Predicate, Resolution, Value};
///
/// let mut engine = Engine::new();
/// engine.add_clause(vec![Predicate::literal("hello")], "greeting");
/// engine.use_fallback("unknown");
///
/// match engine.resolve(&Value::from("hello")) {
///     Ok(Resolution::Clause(clause)) => assert_eq!(*clause.action(), "greeting"),
///     other => panic!("expected a clause match, got {other:?}"),
/// }
/// ```
#[derive(Debug, Default)]
pub struct Engine<A> {
    clauses: Vec<Clause<A>>,
    pool: HashMap<CanonicalHash, PoolEntry>,
    fallback: Option<A>,
}

impl<A> Engine<A> {
    /// Creates an empty engine.
    #[must_use]
    pub fn new() -> Self {
        Self {
            clauses: Vec::new(),
            pool: HashMap::new(),
            fallback: None,
        }
    }

    /// Registers a clause and returns its dense id.
    ///
    /// Every predicate is canonicalized into the pool; an existing entry
    /// gains this clause as a dependent, a missing one is created with the
    /// predicate as representative.
    pub fn add_clause(&mut self, predicates: Vec<Predicate>, action: A) -> ClauseId {
        self.insert_clause(None, predicates, action)
    }

    /// Registers a clause with a provenance label for ambiguity diagnostics.
    pub fn add_labeled_clause(
        &mut self,
        label: impl Into<String>,
        predicates: Vec<Predicate>,
        action: A,
    ) -> ClauseId {
        self.insert_clause(Some(label.into()), predicates, action)
    }

    fn insert_clause(
        &mut self,
        label: Option<String>,
        predicates: Vec<Predicate>,
        action: A,
    ) -> ClauseId {
        let id = ClauseId(self.clauses.len());
        for predicate in &predicates {
            let entry = self
                .pool
                .entry(predicate.canonical_hash())
                .or_insert_with(|| PoolEntry {
                    predicate: predicate.clone(),
                    dependents: ClauseSet::new(),
                });
            entry.dependents.insert(id.index());
        }
        self.clauses.push(Clause {
            id,
            label,
            predicates,
            action,
        });
        id
    }

    /// Records the action to run when zero clauses match. Re-registering
    /// replaces the previous fallback.
    pub fn use_fallback(&mut self, action: A) {
        self.fallback = Some(action);
    }

    /// Returns true if a fallback is registered.
    #[must_use]
    pub const fn has_fallback(&self) -> bool {
        self.fallback.is_some()
    }

    /// Returns the number of registered clauses.
    #[must_use]
    pub fn clause_count(&self) -> usize {
        self.clauses.len()
    }

    /// Returns the number of pooled predicates.
    #[must_use]
    pub fn pool_size(&self) -> usize {
        self.pool.len()
    }

    /// Returns a registered clause by id.
    #[must_use]
    pub fn clause(&self, id: ClauseId) -> Option<&Clause<A>> {
        self.clauses.get(id.index())
    }

    /// Iterates registered clauses in registration order.
    pub fn clauses(&self) -> impl Iterator<Item = &Clause<A>> {
        self.clauses.iter()
    }

    /// Resolves `input` to the unique satisfying clause, or to the fallback
    /// when no clause holds.
    ///
    /// Candidate elimination: starting from all registered clauses, each pool
    /// entry whose dependents still intersect the candidates is evaluated
    /// once; a false predicate eliminates every dependent clause in one step.
    /// Pool order never changes the final candidate set, only how much gets
    /// evaluated. A path that cannot be walked counts as predicate-false.
    ///
    /// # Errors
    ///
    /// [`DispatchError::AmbiguousMatch`] when more than one clause survives,
    /// [`DispatchError::NoMatch`] when none does and no fallback is
    /// registered.
    pub fn resolve(&self, input: &Value) -> Result<Resolution<'_, A>, DispatchError> {
        let mut candidates = ClauseSet::full(self.clauses.len());
        for entry in self.pool.values() {
            // Eliminating an already-eliminated set changes nothing.
            if entry.dependents.is_disjoint(&candidates) {
                continue;
            }
            if !entry.predicate.evaluate(input) {
                candidates.subtract(&entry.dependents);
                if candidates.is_empty() {
                    break;
                }
            }
        }

        let survivors: Vec<usize> = candidates.iter().collect();
        match survivors.as_slice() {
            [index] => Ok(Resolution::Clause(&self.clauses[*index])),
            [] => match &self.fallback {
                Some(action) => Ok(Resolution::Fallback(action)),
                None => Err(DispatchError::NoMatch {
                    input: input.to_string(),
                }),
            },
            _ => Err(DispatchError::AmbiguousMatch {
                count: survivors.len(),
                clauses: survivors
                    .iter()
                    .map(|&index| self.clauses[index].reference())
                    .collect(),
            }),
        }
    }
}
