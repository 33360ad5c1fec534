//! Leaf predicates: the atomic tests a clause's pattern is compiled into.
//!
//! Each predicate pairs a kind-specific test with the access path of its
//! subject and an optional binding name. Structural identity for pooling
//! comes from [`Predicate::canonical_hash`].

use std::fmt;
use std::sync::Arc;

use blake3::Hasher;
use uuid::Uuid;

use crate::coerce::{self, TypeFamily, TypeTag};
use crate::path::{AccessPath, PathSegment};
use crate::symbol::SymbolTable;
use crate::value::{RecordKey, Value};

/// Canonical structural identity of a predicate.
///
/// The digest covers kind, payload and access path; the binding name is
/// excluded, so identically shaped predicates with different names pool
/// together. Distinct predicates are assumed never to collide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CanonicalHash([u8; 32]);

impl fmt::Display for CanonicalHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

/// A caller-supplied predicate function with creation identity.
///
/// Every construction gets a fresh UUID, so behaviorally identical user
/// functions from different registrations are never pooled — evaluation
/// purity cannot be assumed for opaque functions.
#[derive(Clone)]
pub struct UserFn {
    id: Uuid,
    func: Arc<dyn Fn(&Value) -> bool + Send + Sync>,
}

impl UserFn {
    fn new(func: impl Fn(&Value) -> bool + Send + Sync + 'static) -> Self {
        Self {
            id: Uuid::new_v4(),
            func: Arc::new(func),
        }
    }

    /// Returns the identity assigned at construction.
    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// Calls the underlying function. Panics inside it propagate to the
    /// caller of dispatch unmodified.
    #[must_use]
    pub fn call(&self, subject: &Value) -> bool {
        (self.func)(subject)
    }
}

impl fmt::Debug for UserFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserFn").field("id", &self.id).finish()
    }
}

/// The six predicate kinds.
#[derive(Debug, Clone)]
pub enum PredicateKind {
    /// Converts the subject to the named family and loose-compares the
    /// result back to the subject. Intentionally permissive; see
    /// [`coerce::coerces_to`].
    CoerciveType(TypeFamily),
    /// Compares the subject's runtime type tag exactly, no conversion.
    ExactType(TypeTag),
    /// Loose equality against a fixed stored value.
    Literal(Value),
    /// True if any sub-predicate holds for the subject. Sub-predicates are
    /// evaluated directly against the subject — their own paths are ignored
    /// and they never enter the shared pool.
    Union(Vec<Predicate>),
    /// An opaque caller closure.
    UserFunction(UserFn),
    /// Always true; accepts and binds any value.
    Wildcard,
}

/// An atomic test over the value found at an access path.
///
/// # Examples
///
/// ```
/// use morphic::{Predicate, Value};
///
/// let pred = Predicate::string().named("name");
/// assert!(pred.matches(&Value::from("George Orwell")));
/// assert_eq!(pred.binding(), Some("name"));
/// ```
#[derive(Debug, Clone)]
pub struct Predicate {
    kind: PredicateKind,
    path: AccessPath,
    binding: Option<String>,
}

impl Predicate {
    const fn with_kind(kind: PredicateKind) -> Self {
        Self {
            kind,
            path: AccessPath::root(),
            binding: None,
        }
    }

    /// A coercive-type predicate for `family`.
    #[must_use]
    pub const fn coercive(family: TypeFamily) -> Self {
        Self::with_kind(PredicateKind::CoerciveType(family))
    }

    /// Coercive number predicate.
    #[must_use]
    pub const fn number() -> Self {
        Self::coercive(TypeFamily::Number)
    }

    /// Coercive string predicate.
    #[must_use]
    pub const fn string() -> Self {
        Self::coercive(TypeFamily::String)
    }

    /// Coercive boolean predicate.
    #[must_use]
    pub const fn boolean() -> Self {
        Self::coercive(TypeFamily::Boolean)
    }

    /// Coercive object predicate.
    #[must_use]
    pub const fn object() -> Self {
        Self::coercive(TypeFamily::Object)
    }

    /// An exact-type predicate for `tag`.
    #[must_use]
    pub const fn exactly(tag: TypeTag) -> Self {
        Self::with_kind(PredicateKind::ExactType(tag))
    }

    /// A literal predicate matching `value` under loose equality.
    #[must_use]
    pub fn literal(value: impl Into<Value>) -> Self {
        Self::with_kind(PredicateKind::Literal(value.into()))
    }

    /// A literal predicate for null.
    #[must_use]
    pub const fn null() -> Self {
        Self::with_kind(PredicateKind::Literal(Value::Null))
    }

    /// A union over `options`, true when any of them holds.
    #[must_use]
    pub fn any_of(options: impl IntoIterator<Item = Predicate>) -> Self {
        Self::with_kind(PredicateKind::Union(options.into_iter().collect()))
    }

    /// A user-function predicate. Gets a fresh identity; two constructions
    /// from the same closure are never pooled together.
    #[must_use]
    pub fn from_fn(func: impl Fn(&Value) -> bool + Send + Sync + 'static) -> Self {
        Self::with_kind(PredicateKind::UserFunction(UserFn::new(func)))
    }

    /// The always-true predicate.
    #[must_use]
    pub const fn wildcard() -> Self {
        Self::with_kind(PredicateKind::Wildcard)
    }

    /// Attaches a binding name.
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.binding = Some(name.into());
        self
    }

    /// Moves this predicate to `path`.
    #[must_use]
    pub fn at(mut self, path: AccessPath) -> Self {
        self.path = path;
        self
    }

    /// Returns a copy rebased to `path`, with identical kind, payload and
    /// binding name.
    #[must_use]
    pub fn rebased(&self, path: AccessPath) -> Self {
        Self {
            kind: self.kind.clone(),
            path,
            binding: self.binding.clone(),
        }
    }

    /// Returns the predicate kind.
    #[must_use]
    pub const fn kind(&self) -> &PredicateKind {
        &self.kind
    }

    /// Returns the access path.
    #[must_use]
    pub const fn path(&self) -> &AccessPath {
        &self.path
    }

    /// Returns the binding name, if any.
    #[must_use]
    pub fn binding(&self) -> Option<&str> {
        self.binding.as_deref()
    }

    /// Evaluates against an already-located subject value.
    #[must_use]
    pub fn matches(&self, subject: &Value) -> bool {
        match &self.kind {
            PredicateKind::CoerciveType(family) => coerce::coerces_to(subject, *family),
            PredicateKind::ExactType(tag) => TypeTag::of(subject) == *tag,
            PredicateKind::Literal(stored) => coerce::loose_eq(subject, stored),
            PredicateKind::Union(options) => options.iter().any(|option| option.matches(subject)),
            PredicateKind::UserFunction(func) => func.call(subject),
            PredicateKind::Wildcard => true,
        }
    }

    /// Walks this predicate's path into `input` and evaluates the subject.
    /// A destructuring miss is false, not an error.
    #[must_use]
    pub fn evaluate(&self, input: &Value) -> bool {
        self.path
            .walk(input)
            .is_some_and(|subject| self.matches(subject))
    }

    /// Computes the canonical structural hash of this predicate.
    ///
    /// Symbolic path segments hash through their process-wide surrogate id,
    /// so the digest is stable across repeated calls within a process.
    #[must_use]
    pub fn canonical_hash(&self) -> CanonicalHash {
        let mut hasher = Hasher::new();
        hash_path(&mut hasher, &self.path);
        hash_kind(&mut hasher, &self.kind);
        CanonicalHash(*hasher.finalize().as_bytes())
    }
}

fn hash_path(hasher: &mut Hasher, path: &AccessPath) {
    hasher.update(&(path.len() as u64).to_le_bytes());
    for segment in path.segments() {
        match segment {
            PathSegment::Key(key) => {
                hasher.update(&[0]);
                hash_str(hasher, key);
            }
            PathSegment::Index(index) => {
                hasher.update(&[1]);
                hasher.update(&(*index as u64).to_le_bytes());
            }
            PathSegment::Symbol(key) => {
                hasher.update(&[2]);
                hasher.update(&SymbolTable::global().surrogate_id(*key).to_le_bytes());
            }
        }
    }
}

fn hash_kind(hasher: &mut Hasher, kind: &PredicateKind) {
    match kind {
        PredicateKind::CoerciveType(family) => {
            hasher.update(&[0]);
            hash_str(hasher, family.name());
        }
        PredicateKind::ExactType(tag) => {
            hasher.update(&[1]);
            hash_str(hasher, tag.name());
        }
        PredicateKind::Literal(value) => {
            hasher.update(&[2]);
            hash_value(hasher, value);
        }
        PredicateKind::Union(options) => {
            hasher.update(&[3]);
            hasher.update(&(options.len() as u64).to_le_bytes());
            for option in options {
                hash_path(hasher, &option.path);
                hash_kind(hasher, &option.kind);
            }
        }
        PredicateKind::UserFunction(func) => {
            hasher.update(&[4]);
            hasher.update(func.id().as_bytes());
        }
        PredicateKind::Wildcard => {
            hasher.update(&[5]);
        }
    }
}

fn hash_value(hasher: &mut Hasher, value: &Value) {
    match value {
        Value::Null => {
            hasher.update(&[0]);
        }
        Value::Bool(b) => {
            hasher.update(&[1, u8::from(*b)]);
        }
        Value::Number(n) => {
            hasher.update(&[2]);
            hasher.update(&n.to_bits().to_le_bytes());
        }
        Value::String(s) => {
            hasher.update(&[3]);
            hash_str(hasher, s);
        }
        Value::List(items) => {
            hasher.update(&[4]);
            hasher.update(&(items.len() as u64).to_le_bytes());
            for item in items {
                hash_value(hasher, item);
            }
        }
        Value::Record(fields) => {
            hasher.update(&[5]);
            hasher.update(&(fields.len() as u64).to_le_bytes());
            for (key, field) in fields {
                match key {
                    RecordKey::Str(key) => {
                        hasher.update(&[0]);
                        hash_str(hasher, key);
                    }
                    RecordKey::Sym(key) => {
                        hasher.update(&[1]);
                        hasher.update(&SymbolTable::global().surrogate_id(*key).to_le_bytes());
                    }
                }
                hash_value(hasher, field);
            }
        }
    }
}

fn hash_str(hasher: &mut Hasher, s: &str) {
    hasher.update(&(s.len() as u64).to_le_bytes());
    hasher.update(s.as_bytes());
}
