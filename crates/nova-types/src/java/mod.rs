//! Java-specific pieces of the model.
//!
//! The formatter here is "Java-like" and stable, intended for diagnostics and log output rather
//! than for round-tripping source.

pub mod env;
pub mod format;
pub(crate) mod minimal_jdk;
