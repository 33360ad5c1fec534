//! Builder sugar over the core engine: register clauses with
//! `with(...).then(...)`, a fallback with `otherwise()`, and invoke the
//! built function with `call(...)`.
//!
//! This layer has no algorithmic content. Registration flattens each
//! positional pattern spec, concatenates the results, runs the
//! duplicate-name check and hands the predicates to the engine; a call
//! resolves, extracts named bindings and invokes the winning action with
//! the bindings followed by the original positional arguments.

use std::sync::Arc;

use crate::engine::{ClauseId, Engine, Resolution};
use crate::error::{DispatchError, MorphicError, MorphicResult};
use crate::extract::{self, Bindings};
use crate::flatten::{self, PatternSpec};
use crate::predicate::Predicate;
use crate::value::Value;

/// Action closure: receives the named bindings and the original positional
/// arguments.
pub type ActionFn = Arc<dyn Fn(&Bindings, &[Value]) -> MorphicResult<Value> + Send + Sync>;

/// Pluggable flattener (testing seam).
pub type FlattenFn = fn(&PatternSpec) -> Vec<Predicate>;

/// Pluggable named-field extractor (testing seam).
pub type ExtractFn = fn(&[Predicate], &Value) -> MorphicResult<Bindings>;

/// Handler invoked when no clause matches and no fallback is registered.
pub type UnmatchedFn = Arc<dyn Fn(&[Value]) -> MorphicError + Send + Sync>;

/// Constructor-time configuration for a [`Morphic`] function.
#[derive(Clone)]
pub struct MorphicConfig {
    /// Flattens a pattern spec into leaf predicates.
    pub flatten: FlattenFn,
    /// Extracts named bindings from a matched input.
    pub extract: ExtractFn,
    /// Produces the error for an unmatched call without a fallback.
    pub on_unmatched: UnmatchedFn,
}

impl Default for MorphicConfig {
    fn default() -> Self {
        Self {
            flatten: flatten::flatten,
            extract: extract::extract_named,
            on_unmatched: Arc::new(default_unmatched),
        }
    }
}

fn default_unmatched(args: &[Value]) -> MorphicError {
    MorphicError::Dispatch(DispatchError::NoMatch {
        input: Value::List(args.to_vec()).to_string(),
    })
}

struct ClauseAction {
    named: Vec<Predicate>,
    run: ActionFn,
}

/// A buildable multi-clause dispatch function.
///
/// # Examples
///
/// ```
/// use morphic::{Morphic, PatternSpec, Predicate, Value};
///
/// # fn main() -> morphic::MorphicResult<()> {
/// let mut describe = Morphic::new();
/// describe
///     .with([PatternSpec::record([("author", Predicate::string().named("name"))])])?
///     .returns_named("name");
/// describe.otherwise().returns("unknown");
///
/// let book = Value::record([("title", "1984"), ("author", "George Orwell")]);
/// assert_eq!(describe.call([book])?, Value::from("George Orwell"));
/// assert_eq!(describe.call([Value::from(123)])?, Value::from("unknown"));
/// # Ok(())
/// # }
/// ```
pub struct Morphic {
    engine: Engine<ClauseAction>,
    config: MorphicConfig,
}

impl Default for Morphic {
    fn default() -> Self {
        Self::new()
    }
}

impl Morphic {
    /// Creates an empty dispatch function with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(MorphicConfig::default())
    }

    /// Creates an empty dispatch function with `config`.
    #[must_use]
    pub fn with_config(config: MorphicConfig) -> Self {
        Self {
            engine: Engine::new(),
            config,
        }
    }

    /// Starts a clause over the given positional pattern specs.
    ///
    /// Each spec constrains the argument at its position; the flattened
    /// predicates are checked for duplicate binding names before any state
    /// changes.
    ///
    /// # Errors
    ///
    /// [`RegistrationError::DuplicateNamedField`] when two predicates of the
    /// clause share a binding name; the engine is left untouched.
    ///
    /// [`RegistrationError::DuplicateNamedField`]: crate::RegistrationError::DuplicateNamedField
    pub fn with<S: Into<PatternSpec>>(
        &mut self,
        specs: impl IntoIterator<Item = S>,
    ) -> MorphicResult<ClauseBuilder<'_>> {
        let spec = PatternSpec::Seq(specs.into_iter().map(Into::into).collect());
        let predicates = (self.config.flatten)(&spec);
        let named = flatten::named_fields(&predicates)?;
        Ok(ClauseBuilder {
            morphic: self,
            predicates,
            named,
            label: None,
        })
    }

    /// Starts the fallback registration, run when no clause matches.
    pub fn otherwise(&mut self) -> FallbackBuilder<'_> {
        FallbackBuilder { morphic: self }
    }

    /// Invokes the built function on positional arguments.
    ///
    /// # Errors
    ///
    /// [`DispatchError::AmbiguousMatch`] when several clauses hold, the
    /// configured unmatched error when none does and no fallback is
    /// registered, and whatever the winning action returns.
    pub fn call(&self, args: impl IntoIterator<Item = Value>) -> MorphicResult<Value> {
        let args: Vec<Value> = args.into_iter().collect();
        let input = Value::List(args.clone());
        match self.engine.resolve(&input) {
            Ok(Resolution::Clause(clause)) => {
                let action = clause.action();
                let bindings = (self.config.extract)(&action.named, &input)?;
                (action.run)(&bindings, &args)
            }
            Ok(Resolution::Fallback(action)) => (action.run)(&Bindings::new(), &args),
            Err(DispatchError::NoMatch { .. }) => Err((self.config.on_unmatched)(&args)),
            Err(err) => Err(err.into()),
        }
    }

    /// Returns the number of registered clauses.
    #[must_use]
    pub fn clause_count(&self) -> usize {
        self.engine.clause_count()
    }

    /// Returns the number of pooled predicates.
    #[must_use]
    pub fn pool_size(&self) -> usize {
        self.engine.pool_size()
    }

    /// Returns true if a fallback is registered.
    #[must_use]
    pub const fn has_fallback(&self) -> bool {
        self.engine.has_fallback()
    }
}

/// Pending clause registration; a terminal method registers the clause and
/// returns its id.
pub struct ClauseBuilder<'m> {
    morphic: &'m mut Morphic,
    predicates: Vec<Predicate>,
    named: Vec<Predicate>,
    label: Option<String>,
}

impl std::fmt::Debug for ClauseBuilder<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClauseBuilder")
            .field("predicates", &self.predicates)
            .field("named", &self.named)
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

impl ClauseBuilder<'_> {
    /// Attaches a provenance label, surfaced in ambiguity errors.
    #[must_use]
    pub fn labeled(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Registers the clause with an action closure.
    pub fn then(
        self,
        action: impl Fn(&Bindings, &[Value]) -> MorphicResult<Value> + Send + Sync + 'static,
    ) -> ClauseId {
        self.register(Arc::new(action))
    }

    /// Registers the clause to return a fixed value.
    pub fn returns(self, value: impl Into<Value>) -> ClauseId {
        let value = value.into();
        self.register(Arc::new(move |_, _| Ok(value.clone())))
    }

    /// Registers the clause to return a named binding. A missing binding
    /// yields null.
    pub fn returns_named(self, name: impl Into<String>) -> ClauseId {
        let name = name.into();
        self.register(Arc::new(move |bindings: &Bindings, _: &[Value]| {
            Ok(bindings.get(&name).cloned().unwrap_or(Value::Null))
        }))
    }

    /// Registers the clause to return the positional argument at `index`.
    /// A missing argument yields null.
    pub fn returns_argument(self, index: usize) -> ClauseId {
        self.register(Arc::new(move |_: &Bindings, args: &[Value]| {
            Ok(args.get(index).cloned().unwrap_or(Value::Null))
        }))
    }

    /// Registers the clause to fail with a fixed error message.
    pub fn fails_with(self, message: impl Into<String>) -> ClauseId {
        let message = message.into();
        self.register(Arc::new(move |_, _| Err(MorphicError::raised(message.clone()))))
    }

    fn register(self, run: ActionFn) -> ClauseId {
        let Self {
            morphic,
            predicates,
            named,
            label,
        } = self;
        let action = ClauseAction { named, run };
        match label {
            Some(label) => morphic.engine.add_labeled_clause(label, predicates, action),
            None => morphic.engine.add_clause(predicates, action),
        }
    }
}

/// Pending fallback registration; a terminal method wires the action to
/// the engine's fallback slot.
pub struct FallbackBuilder<'m> {
    morphic: &'m mut Morphic,
}

impl FallbackBuilder<'_> {
    /// Registers an action closure as the fallback.
    pub fn then(
        self,
        action: impl Fn(&Bindings, &[Value]) -> MorphicResult<Value> + Send + Sync + 'static,
    ) {
        self.register(Arc::new(action));
    }

    /// Registers a fallback returning a fixed value.
    pub fn returns(self, value: impl Into<Value>) {
        let value = value.into();
        self.register(Arc::new(move |_, _| Ok(value.clone())));
    }

    /// Registers a fallback returning a named binding. The fallback has no
    /// predicates, so this always yields null; it exists for vocabulary
    /// parity with clause registration.
    pub fn returns_named(self, name: impl Into<String>) {
        let name = name.into();
        self.register(Arc::new(move |bindings: &Bindings, _: &[Value]| {
            Ok(bindings.get(&name).cloned().unwrap_or(Value::Null))
        }));
    }

    /// Registers a fallback returning the positional argument at `index`.
    pub fn returns_argument(self, index: usize) {
        self.register(Arc::new(move |_: &Bindings, args: &[Value]| {
            Ok(args.get(index).cloned().unwrap_or(Value::Null))
        }));
    }

    /// Registers a fallback failing with a fixed error message.
    pub fn fails_with(self, message: impl Into<String>) {
        let message = message.into();
        self.register(Arc::new(move |_, _| Err(MorphicError::raised(message.clone()))));
    }

    fn register(self, run: ActionFn) {
        self.morphic.engine.use_fallback(ClauseAction {
            named: Vec::new(),
            run,
        });
    }
}
