use schemars::schema::RootSchema;
use schemars::{schema_for, JsonSchema};
use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Settings for [`crate::TypeRelations`].
///
/// Typically embedded in a larger TOML document:
///
/// ```toml
/// include_annotations = false
/// max_depth = 512
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
#[schemars(deny_unknown_fields)]
pub struct RelationsConfig {
    /// Whether type-use annotations participate in the public same-type relation and in
    /// de-duplication of supertype closures.
    #[serde(default = "RelationsConfig::default_include_annotations")]
    pub include_annotations: bool,

    /// Whether the public same-type relation compares wildcards structurally.
    ///
    /// When `false`, a wildcard is never the same type as anything, itself included.
    #[serde(default)]
    pub wildcards_comparable: bool,

    /// Maximum nesting of relation calls before a query gives up with a recursion-limit error.
    #[serde(default = "RelationsConfig::default_max_depth")]
    #[schemars(range(min = 1))]
    pub max_depth: u32,

    /// Number of memoized supertype closures kept before the cache is flushed; `0` disables it.
    #[serde(default = "RelationsConfig::default_closure_cache_capacity")]
    pub closure_cache_capacity: usize,
}

impl RelationsConfig {
    fn default_include_annotations() -> bool {
        true
    }

    fn default_max_depth() -> u32 {
        256
    }

    fn default_closure_cache_capacity() -> usize {
        4096
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: RelationsConfig =
            toml::from_str(text).map_err(|err| ConfigError::Toml(err.message().to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_depth == 0 {
            return Err(ConfigError::Invalid(
                "max_depth must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for RelationsConfig {
    fn default() -> Self {
        Self {
            include_annotations: Self::default_include_annotations(),
            wildcards_comparable: false,
            max_depth: Self::default_max_depth(),
            closure_cache_capacity: Self::default_closure_cache_capacity(),
        }
    }
}

/// JSON schema for [`RelationsConfig`], for editor tooling and CI validation.
#[must_use]
pub fn json_schema() -> RootSchema {
    schema_for!(RelationsConfig)
}
