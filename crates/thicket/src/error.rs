//! Error types for Thicket.
//!
//! Navigation itself never fails: out-of-range positions are clamped or
//! ignored. Errors only come from structural edits on the tree and from
//! loading configuration.

use std::path::PathBuf;

use thiserror::Error;

use crate::model::NodeId;

/// Errors raised by [`TreeArena`](crate::model::TreeArena) mutations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    /// The node ID is unknown or refers to a removed node.
    #[error("node {0:?} not found")]
    NodeNotFound(NodeId),

    /// The root is owned by the arena and cannot be removed.
    #[error("the root node cannot be removed")]
    CannotRemoveRoot,

    /// A child insertion index was past the end of the child list.
    #[error("child index {index} out of range for a parent with {len} children")]
    ChildIndexOutOfRange {
        /// Requested index.
        index: usize,
        /// Current number of children.
        len: usize,
    },
}

/// Errors raised while loading or validating a
/// [`NavigationConfig`](crate::config::NavigationConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("failed to read config file '{path}': {source}")]
    Io {
        /// Path of the file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid TOML or does not match the schema.
    #[error("failed to parse navigation config: {0}")]
    Parse(#[from] toml::de::Error),

    /// The configuration could not be written as TOML.
    #[error("failed to serialize navigation config: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// A value parsed correctly but is not allowed.
    #[error("invalid value for '{field}': {reason}")]
    InvalidValue {
        /// Name of the offending field.
        field: &'static str,
        /// Why the value was rejected.
        reason: String,
    },
}

impl ConfigError {
    /// Create an invalid value error.
    pub fn invalid_value(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            field,
            reason: reason.into(),
        }
    }
}

/// Umbrella error for the crate.
#[derive(Debug, Error)]
pub enum Error {
    /// Tree mutation failed.
    #[error(transparent)]
    Tree(#[from] TreeError),

    /// Configuration failed to load.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Result type alias for crate operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NavigationConfig;
    use crate::model::TreeArena;

    fn remove_root() -> Result<()> {
        let mut tree = TreeArena::new(());
        let root = tree.root();
        tree.remove(root)?;
        Ok(())
    }

    fn parse_bad_config() -> Result<NavigationConfig> {
        Ok(NavigationConfig::from_toml_str("page_size = \"many\"")?)
    }

    #[test]
    fn test_question_mark_wraps_sources() {
        assert!(matches!(
            remove_root(),
            Err(Error::Tree(TreeError::CannotRemoveRoot))
        ));
        let err = parse_bad_config().unwrap_err();
        assert!(matches!(err, Error::Config(ConfigError::Parse(_))));
        assert!(err.to_string().starts_with("failed to parse navigation config"));
    }
}
