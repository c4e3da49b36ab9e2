//! Navigation settings.
//!
//! [`NavigationConfig`] collects every knob that changes how key presses are
//! interpreted. It can be built in code with the `with_*` methods or loaded
//! from TOML; missing keys take their defaults.
//!
//! ```toml
//! shortcut = "meta"
//! page_size = 20
//! asterisk_scope = "focused"
//! leaf_right_arrow = "ignore"
//! show_root = false
//! selection_mode = "multiple"
//! cell_selection = true
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use thicket_core::logging::targets;

use crate::error::ConfigError;
use crate::model::SelectionMode;
use crate::navigation::ShortcutModifier;

/// Which subtree the asterisk key expands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpandScope {
    /// Every branch in the tree.
    #[default]
    Root,
    /// Every branch below the focused node.
    Focused,
}

/// What an unmodified Right arrow does on a leaf row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeafRightArrow {
    /// Move to the next row, like Down.
    #[default]
    Advance,
    /// Stay on the leaf.
    Ignore,
}

/// Settings for a [`TreeGridView`](crate::TreeGridView).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationConfig {
    /// Physical key that acts as the shortcut modifier.
    pub shortcut: ShortcutModifier,
    /// Rows moved by PageUp and PageDown.
    pub page_size: usize,
    /// Subtree expanded by the asterisk key.
    pub asterisk_scope: ExpandScope,
    /// Behavior of Right on a leaf row.
    pub leaf_right_arrow: LeafRightArrow,
    /// Whether the root occupies row 0.
    pub show_root: bool,
    /// Initial selection mode.
    pub selection_mode: SelectionMode,
    /// Initial selection granularity.
    pub cell_selection: bool,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            shortcut: ShortcutModifier::default(),
            page_size: 10,
            asterisk_scope: ExpandScope::default(),
            leaf_right_arrow: LeafRightArrow::default(),
            show_root: true,
            selection_mode: SelectionMode::Multiple,
            cell_selection: false,
        }
    }
}

impl NavigationConfig {
    /// Parse from a TOML string and validate.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&content)?;
        tracing::debug!(target: targets::CONFIG, path = %path.display(), ?config, "loaded navigation config");
        Ok(config)
    }

    /// Serialize to pretty-printed TOML.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Check values serde cannot rule out.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.page_size == 0 {
            return Err(ConfigError::invalid_value("page_size", "must be at least 1"));
        }
        Ok(())
    }

    // =========================================================================
    // Builder
    // =========================================================================

    /// Set the shortcut modifier.
    pub fn with_shortcut(mut self, shortcut: ShortcutModifier) -> Self {
        self.shortcut = shortcut;
        self
    }

    /// Set the page size.
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Set the asterisk scope.
    pub fn with_asterisk_scope(mut self, scope: ExpandScope) -> Self {
        self.asterisk_scope = scope;
        self
    }

    /// Set the leaf Right-arrow behavior.
    pub fn with_leaf_right_arrow(mut self, behavior: LeafRightArrow) -> Self {
        self.leaf_right_arrow = behavior;
        self
    }

    /// Show or hide the root row.
    pub fn with_show_root(mut self, show_root: bool) -> Self {
        self.show_root = show_root;
        self
    }

    /// Set the selection mode.
    pub fn with_selection_mode(mut self, mode: SelectionMode) -> Self {
        self.selection_mode = mode;
        self
    }

    /// Enable or disable cell selection.
    pub fn with_cell_selection(mut self, enabled: bool) -> Self {
        self.cell_selection = enabled;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = NavigationConfig::default();
        assert_eq!(config.page_size, 10);
        assert_eq!(config.shortcut, ShortcutModifier::Control);
        assert_eq!(config.selection_mode, SelectionMode::Multiple);
        assert!(config.show_root);
        assert!(!config.cell_selection);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = NavigationConfig::from_toml_str("shortcut = \"meta\"\npage_size = 3\n").unwrap();
        assert_eq!(config.shortcut, ShortcutModifier::Meta);
        assert_eq!(config.page_size, 3);
        assert_eq!(config.asterisk_scope, ExpandScope::Root);
        assert_eq!(config.leaf_right_arrow, LeafRightArrow::Advance);
    }

    #[test]
    fn test_full_toml() {
        let config = NavigationConfig::from_toml_str(
            r#"
            shortcut = "control"
            page_size = 20
            asterisk_scope = "focused"
            leaf_right_arrow = "ignore"
            show_root = false
            selection_mode = "single"
            cell_selection = true
            "#,
        )
        .unwrap();
        assert_eq!(
            config,
            NavigationConfig::default()
                .with_page_size(20)
                .with_asterisk_scope(ExpandScope::Focused)
                .with_leaf_right_arrow(LeafRightArrow::Ignore)
                .with_show_root(false)
                .with_selection_mode(SelectionMode::Single)
                .with_cell_selection(true)
        );
    }

    #[test]
    fn test_rejects_zero_page_size() {
        let err = NavigationConfig::from_toml_str("page_size = 0").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { field: "page_size", .. }));
    }

    #[test]
    fn test_rejects_unknown_shortcut() {
        let err = NavigationConfig::from_toml_str("shortcut = \"hyper\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_toml_round_trip() {
        let config = NavigationConfig::default().with_shortcut(ShortcutModifier::Meta);
        let text = config.to_toml_string().unwrap();
        assert_eq!(NavigationConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "page_size = 5").unwrap();
        let config = NavigationConfig::load(file.path()).unwrap();
        assert_eq!(config.page_size, 5);

        let missing = NavigationConfig::load("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(missing, ConfigError::Io { .. }));
    }
}
