//! # morphic — multi-clause structural dispatch functions
//!
//! A caller registers several (structural pattern, action) clauses plus an
//! optional fallback; invoking the built function evaluates the call's
//! arguments against every registered pattern and runs the action of the
//! single clause whose full pattern is satisfied, passing it the values
//! bound by named sub-patterns.
//!
//! ## Core Concepts
//!
//! - **Predicate**: an atomic test (coercive type, exact type, literal,
//!   union, user function, wildcard) over the value at an access path
//! - **Flattening**: a nested pattern spec compiles into leaf predicates
//!   tagged with access paths
//! - **Pooling**: structurally identical predicates across clauses share one
//!   pool entry and are evaluated once per call
//! - **Elimination**: resolution starts from all clauses and removes every
//!   dependent of each failing predicate in one bitset step; exactly one
//!   survivor wins, zero means fallback, several is an ambiguity error
//!
//! ## Usage
//!
//! ```
//! use morphic::{Morphic, PatternSpec, Predicate, Value};
//!
//! # fn main() -> morphic::MorphicResult<()> {
//! let mut name_of = Morphic::new();
//! name_of
//!     .with([PatternSpec::record([("author", Predicate::string().named("name"))])])?
//!     .returns_named("name");
//! name_of
//!     .with([PatternSpec::record([("owner", Predicate::string().named("name"))])])?
//!     .returns_named("name");
//! name_of.otherwise().returns("unknown");
//!
//! let book = Value::record([("title", "1984"), ("author", "George Orwell")]);
//! assert_eq!(name_of.call([book])?, Value::from("George Orwell"));
//! assert_eq!(name_of.call([Value::from(123)])?, Value::from("unknown"));
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

// Core types
pub mod coerce;
pub mod error;
pub mod path;
pub mod predicate;
pub mod symbol;
pub mod value;

// Compilation and dispatch
pub mod engine;
pub mod extract;
pub mod flatten;

// Builder layer
pub mod dispatch;

// Re-export primary types at crate root for convenience
pub use coerce::{TypeFamily, TypeTag};
pub use dispatch::{
    ActionFn, ClauseBuilder, ExtractFn, FallbackBuilder, FlattenFn, Morphic, MorphicConfig,
    UnmatchedFn,
};
pub use engine::{Clause, ClauseId, ClauseRef, ClauseSet, Engine, Resolution};
pub use error::{DispatchError, MorphicError, MorphicResult, RegistrationError};
pub use extract::{extract_named, Bindings};
pub use flatten::{flatten, named_fields, PatternSpec};
pub use path::{AccessPath, PathSegment};
pub use predicate::{CanonicalHash, Predicate, PredicateKind, UserFn};
pub use symbol::{SymbolKey, SymbolTable};
pub use value::{RecordKey, Value};
