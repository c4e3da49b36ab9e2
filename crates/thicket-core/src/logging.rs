//! Logging and debugging facilities for Thicket.
//!
//! This module provides:
//! - Target and span names for filtering `tracing` output by subsystem
//! - Shared options for indented tree visualizations
//! - A performance span guard for profiling expensive rebuilds
//!
//! # Tracing Integration
//!
//! Thicket uses the `tracing` crate for instrumentation. To see logs,
//! install a tracing subscriber in your application:
//!
//! ```ignore
//! tracing_subscriber::fmt()
//!     .with_env_filter("thicket::navigation=trace")
//!     .init();
//! ```

/// Span names used throughout Thicket for tracing.
pub mod span_names {
    /// Visible-row rebuild span.
    pub const ROW_INDEX: &str = "thicket::row_index";
    /// Key command dispatch span.
    pub const NAVIGATION: &str = "thicket::navigation";
}

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Core crate target.
    pub const CORE: &str = "thicket_core";
    /// Signal/slot system target.
    pub const SIGNAL: &str = "thicket_core::signal";
    /// Performance spans.
    pub const PERF: &str = "thicket::perf";
    /// Tree arena mutations.
    pub const TREE: &str = "thicket::tree";
    /// Visible-row index rebuilds.
    pub const ROW_INDEX: &str = "thicket::row_index";
    /// Selection, focus and anchor models.
    pub const SELECTION: &str = "thicket::selection";
    /// Key normalization and command dispatch.
    pub const NAVIGATION: &str = "thicket::navigation";
    /// View host: effect application and re-validation.
    pub const VIEW: &str = "thicket::view";
    /// Configuration loading.
    pub const CONFIG: &str = "thicket::config";
}

/// Style options for tree visualization.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TreeStyle {
    /// ASCII characters for tree branches.
    Ascii,
    /// Unicode box-drawing characters.
    #[default]
    Unicode,
    /// Compact single-line representation.
    Compact,
}

/// Configuration for tree debug output.
#[derive(Debug, Clone)]
pub struct TreeFormatOptions {
    /// The style of tree visualization.
    pub style: TreeStyle,
    /// Whether to prefix each line with its visible row number.
    pub show_rows: bool,
    /// Whether to show selection, focus and anchor markers.
    pub show_markers: bool,
    /// Maximum depth to print (None for unlimited).
    pub max_depth: Option<usize>,
    /// Indent size for each level.
    pub indent_size: usize,
}

impl Default for TreeFormatOptions {
    fn default() -> Self {
        Self {
            style: TreeStyle::default(),
            show_rows: true,
            show_markers: true,
            max_depth: None,
            indent_size: 2,
        }
    }
}

impl TreeFormatOptions {
    /// Create options for minimal output.
    pub fn minimal() -> Self {
        Self {
            show_rows: false,
            show_markers: false,
            ..Default::default()
        }
    }

    /// Build the prefix string for a line at `depth`.
    ///
    /// `open_levels[d]` tells whether the ancestor at depth `d + 1` still has
    /// siblings below it, which decides between a vertical bar and blank space.
    pub fn build_prefix(&self, depth: usize, is_last: bool, open_levels: &[bool]) -> String {
        if depth == 0 {
            return String::new();
        }

        let (branch, tee, corner) = match self.style {
            TreeStyle::Ascii => ("|", "+--", "`--"),
            TreeStyle::Unicode => ("\u{2502}", "\u{251c}\u{2500}\u{2500}", "\u{2514}\u{2500}\u{2500}"),
            TreeStyle::Compact => return format!("{}- ", " ".repeat(depth - 1)),
        };

        let mut prefix = String::new();
        for level in 0..(depth - 1) {
            if open_levels.get(level).copied().unwrap_or(false) {
                prefix.push_str(branch);
            } else {
                prefix.push(' ');
            }
            prefix.push_str(&" ".repeat(self.indent_size));
        }

        prefix.push_str(if is_last { corner } else { tee });
        prefix.push(' ');
        prefix
    }
}

/// A guard that keeps a tracing span entered until dropped.
///
/// This is useful for tracking the duration of operations.
#[derive(Debug)]
pub struct PerfSpan {
    _span: tracing::span::EnteredSpan,
}

impl PerfSpan {
    /// Create a new performance span.
    pub fn new(name: &'static str) -> Self {
        let span = tracing::info_span!(target: targets::PERF, "perf", operation = name);
        Self {
            _span: span.entered(),
        }
    }
}

/// Warn under the core target.
///
/// A thin wrapper around `tracing::warn!` for failures that are logged and
/// then dropped rather than returned.
#[macro_export]
macro_rules! thicket_warn {
    ($($arg:tt)*) => {
        tracing::warn!(target: $crate::logging::targets::CORE, $($arg)*)
    };
}
