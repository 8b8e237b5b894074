use nova_types::{ClassId, MemberId, ModelError, TypeKind, TypeVarId};
use thiserror::Error;

/// Failures reported by [`crate::TypeRelations`] entry points.
///
/// Relations never fail on the error type itself: `Type::Error` is compatible with everything so
/// one unresolved reference does not cascade.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypeError {
    #[error("`{operation}` is not defined for {found} types")]
    IllegalArgument {
        operation: &'static str,
        found: TypeKind,
    },
    #[error("unknown class id {0:?}")]
    UnknownClass(ClassId),
    #[error("unknown member {0:?}")]
    UnknownMember(MemberId),
    #[error("unknown type variable {0:?}")]
    UnknownTypeVar(TypeVarId),
    #[error("`{operation}` exceeded the recursion limit of {limit}")]
    RecursionLimit { operation: &'static str, limit: u32 },
    #[error(transparent)]
    Model(#[from] ModelError),
}

/// Configuration parse and validation failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("failed to parse toml config: {0}")]
    Toml(String),
    #[error("invalid config: {0}")]
    Invalid(String),
}
