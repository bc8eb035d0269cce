//! Runtime errors.
//!
//! Every condition here is recoverable: construction, resolution,
//! conformance and foreign conversion report failure through
//! [`RuntimeResult`] rather than aborting. Calling a variant-specific
//! accessor on the wrong kind of type is a caller bug and is not part of
//! this taxonomy (accessors return `None` instead).

use thiserror::Error;

use crate::TypeId;

/// Result alias used by every fallible runtime operation.
pub type RuntimeResult<T> = Result<T, RuntimeError>;

/// A recoverable runtime failure.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum RuntimeError {
    /// `bind_named` on a Named type that already has a target.
    #[error("named type `{name}` is already bound")]
    AlreadyBound { name: &'static str },

    /// `unbind_named` on a Named type with no target.
    #[error("named type `{name}` is not bound")]
    NotBound { name: &'static str },

    /// `unbind_named` on a builtin Named type.
    #[error("named type `{name}` is built in and cannot be unbound")]
    PermanentBinding { name: &'static str },

    /// Resolution reached a Named type with no target.
    #[error("type `{name}` is used before it is bound")]
    UnboundType { name: &'static str },

    /// A numeric conversion would lose range or precision.
    #[error("numeric value does not fit in `{target}`")]
    NumericOverflow { target: &'static str },

    /// Record or handler shape violation.
    #[error("structural mismatch: {0}")]
    StructuralMismatch(#[from] Mismatch),

    /// An allocation could not be satisfied.
    #[error("out of memory")]
    OutOfMemory,

    /// A foreign descriptor whose size and layout disagree.
    #[error("invalid foreign descriptor: {reason}")]
    InvalidForeignDescriptor { reason: &'static str },

    /// A foreign operation applied to a type that does not resolve to a
    /// foreign type.
    #[error("type {ty:?} is not a foreign type")]
    NotForeign { ty: TypeId },

    /// Import or export through a foreign type without a bridge.
    #[error("foreign type `{name}` has no bridge type")]
    NotBridgeable { name: &'static str },

    /// Mutation of an immutable value.
    #[error("value is immutable")]
    Immutable,

    /// A chain of aliases, names or base types exceeded the configured
    /// depth (usually a cyclic binding).
    #[error("type resolution exceeded depth {depth}")]
    RecursionLimit { depth: usize },
}

/// Why a structural operation was rejected.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum Mismatch {
    /// Two record fields share a name, ignoring case.
    #[error("duplicate field `{field}`")]
    DuplicateField { field: &'static str },

    /// A variadic handler parameter that is not the last one.
    #[error("variadic parameter {index} is not last")]
    VariadicNotLast { index: usize },

    /// A stored value does not conform to its field's type.
    #[error("value for field `{field}` does not conform to its type")]
    FieldTypeMismatch { field: &'static str },

    /// Record decode found no key for a field.
    #[error("missing field `{field}`")]
    MissingField { field: &'static str },

    /// Record decode found keys that are not fields.
    #[error("expected {expected} keys, found {found}")]
    KeyCountMismatch { expected: usize, found: usize },

    /// Field access by a name the record type does not declare.
    #[error("no field named `{field}`")]
    UnknownField { field: String },

    /// Record construction with the wrong number of values.
    #[error("expected {expected} field values, found {found}")]
    FieldCountMismatch { expected: usize, found: usize },

    /// A type of the wrong kind (e.g. a record operation on a handler type).
    #[error("expected a {expected} type")]
    WrongTypeKind { expected: &'static str },

    /// A value of the wrong kind for a foreign export.
    #[error("expected a {expected} value, found {found}")]
    WrongValueKind {
        expected: &'static str,
        found: &'static str,
    },
}
