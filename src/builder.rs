//! Fluent builder API for ctxpick.
//!
//! Wires root validation, ignore compilation, scanning and compaction
//! into one call, with a functional shortcut for the default pipeline.

use std::path::{Path, PathBuf};

use crate::errors::CtxpickError;
use crate::filter::ExtensionFilter;
use crate::matcher::IgnoreMatcher;
use crate::tree::{collect_leaves, compact, TreeNode};
use crate::walker::{root_name, scan_with_options, validate_root, ScanOptions};

/// Builder for scanning a project into a presentable tree.
///
/// # Examples
///
/// ```no_run
/// use ctxpick::builder::ContextScan;
/// use ctxpick::filter::ExtensionFilter;
///
/// let result = ContextScan::new("./project")
///     .search("auth")
///     .extensions(ExtensionFilter::parse(".py, .md", false))
///     .ignore_patterns("*.log, fixtures/")
///     .run()
///     .unwrap();
///
/// for leaf in result.leaves() {
///     println!("{}", leaf);
/// }
/// ```
pub struct ContextScan {
    root: PathBuf,
    options: ScanOptions,
    ignore_patterns: String,
    compact: bool,
}

impl ContextScan {
    /// Create a new builder for the given root path.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            options: ScanOptions::default(),
            ignore_patterns: String::new(),
            compact: true,
        }
    }

    /// Filter names by a case-insensitive substring.
    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.options = self.options.search(term);
        self
    }

    /// Restrict files to an extension set.
    pub fn extensions(mut self, filter: ExtensionFilter) -> Self {
        self.options = self.options.extensions(filter);
        self
    }

    /// Extra comma-separated ignore patterns, applied after `.gitignore`.
    pub fn ignore_patterns(mut self, patterns: impl Into<String>) -> Self {
        self.ignore_patterns = patterns.into();
        self
    }

    /// Keep search-matching directories with no surviving children
    /// (default: true).
    pub fn keep_matching_dirs(mut self, keep: bool) -> Self {
        self.options = self.options.keep_matching_dirs(keep);
        self
    }

    /// Collapse single-child directory chains (default: true).
    pub fn compact(mut self, compact: bool) -> Self {
        self.compact = compact;
        self
    }

    /// Run the scan.
    pub fn run(self) -> Result<ScanResult, CtxpickError> {
        validate_root(&self.root)?;

        let matcher = IgnoreMatcher::compile(&self.root, &self.ignore_patterns);
        let nodes = scan_with_options(&self.root, &self.options, &matcher)?;
        let nodes = if self.compact { compact(nodes) } else { nodes };

        Ok(ScanResult {
            root: self.root,
            nodes,
        })
    }
}

/// Result of a scan.
#[derive(Debug, Clone)]
pub struct ScanResult {
    /// Root that was scanned, as given.
    pub root: PathBuf,
    /// Top-level nodes under the root.
    pub nodes: Vec<TreeNode>,
}

impl ScanResult {
    /// All leaf identifiers in tree order.
    pub fn leaves(&self) -> Vec<String> {
        collect_leaves(&self.nodes)
    }

    /// Number of file nodes.
    pub fn file_count(&self) -> usize {
        self.nodes.iter().map(TreeNode::file_count).sum()
    }

    /// Whether nothing survived filtering.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Display name of the root directory.
    pub fn root_name(&self) -> String {
        root_name(&self.root)
    }
}

// ============================================================================
// Functional API
// ============================================================================

/// Scan a path with default options and compaction.
///
/// # Examples
///
/// ```no_run
/// use ctxpick::builder::scan_path;
///
/// let result = scan_path("./project").unwrap();
/// println!("{} files", result.file_count());
/// ```
pub fn scan_path(root: impl AsRef<Path>) -> Result<ScanResult, CtxpickError> {
    ContextScan::new(root.as_ref()).run()
}
