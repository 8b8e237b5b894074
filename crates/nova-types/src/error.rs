use thiserror::Error;

use crate::{ClassId, TypeKind};

/// Errors raised while constructing types against a [`crate::TypeEnv`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("unknown class id {0:?}")]
    UnknownClass(ClassId),
    #[error("wrong number of type arguments for {class}: expected {expected}, found {found}")]
    ArityMismatch {
        class: String,
        expected: usize,
        found: usize,
    },
    #[error("{0} types cannot be used as type arguments")]
    InvalidTypeArgument(TypeKind),
}
