//! Relations over Java types: subtyping, same-type, erasure, capture conversion, substitution,
//! member types, supertype closures and the boxing conversions built on them.
//!
//! The engine operates on the model in [`nova_types`]. Declarations are read through a
//! [`nova_types::TypeEnv`]; type variables synthesized while answering a query (capture variables,
//! renamed method type parameters) are allocated in a [`nova_types::TyContext`].
//!
//! ```
//! use nova_type_relations::TypeRelations;
//! use nova_types::{Type, TypeEnv, TypeStore};
//!
//! let store = TypeStore::with_minimal_jdk();
//! let relations = TypeRelations::new();
//!
//! let string = Type::class(store.well_known().string, vec![]);
//! let object = Type::class(store.well_known().object, vec![]);
//! assert!(relations.is_subtype(&store, &string, &object).unwrap());
//! ```

mod as_super;
mod capture;
mod closure;
mod config;
mod contains;
mod convert;
mod cx;
mod erase;
mod error;
mod mapping;
mod member_type;
mod root;
mod same_type;
mod substitute;
mod subtype;
mod supertype;
mod validate;

pub use config::{json_schema, RelationsConfig};
pub use error::{ConfigError, TypeError};
pub use mapping::Mapped;
pub use root::{TypeRelations, TypeRelationsBuilder};

pub(crate) use cx::RelationCx;
