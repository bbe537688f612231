//! ctxpick - Pick files from a source tree and bundle them as LLM context.
//!
//! ctxpick scans a project directory through a layered ignore policy and an
//! extension filter, compacts the result into a browsable tree, and turns a
//! selection of its leaves into one markdown document grouped by category,
//! with token estimates.
//!
//! # Quick Start
//!
//! ```no_run
//! use ctxpick::builder::ContextScan;
//! use ctxpick::bundle::{build_bundle, BundleOptions};
//!
//! let scan = ContextScan::new("./my-project")
//!     .ignore_patterns("*.lock, fixtures/")
//!     .run()
//!     .unwrap();
//!
//! let bundle = build_bundle(&scan.root, &scan.leaves(), &BundleOptions::default());
//! println!("~{} tokens ({})", bundle.stats.estimated_tokens, bundle.stats.level);
//! ```
//!
//! # Modules
//!
//! - [`matcher`] - Ignore rules: built-ins, `.gitignore`, user patterns, whitelist
//! - [`filter`] - Extension filtering
//! - [`walker`] - Recursive scanning into a filtered tree
//! - [`tree`] - Tree nodes, compaction, leaf collection and rendering
//! - [`category`] - Path classification into presentation groups
//! - [`builder`] - Fluent scan pipeline
//! - [`clean`] - Comment and import stripping
//! - [`bundle`] - Context document assembly
//! - [`tokens`] - Token estimates and counts
//! - [`state`] - Last used root persistence
//! - [`output`] - Text and JSON output

pub mod matcher;
pub mod filter;
pub mod walker;
pub mod tree;
pub mod category;
pub mod builder;
pub mod clean;
pub mod bundle;
pub mod tokens;
pub mod state;
pub mod output;
pub mod errors;

// Re-export key types at crate root for convenience
pub use builder::{scan_path, ContextScan, ScanResult};
pub use bundle::{build_bundle, Bundle, BundleOptions, BundleStats};
pub use category::{classify, group_by_category, Category};
pub use clean::{clean_code, CleanMode};
pub use errors::CtxpickError;
pub use filter::ExtensionFilter;
pub use matcher::IgnoreMatcher;
pub use output::OutputError;
pub use state::{JsonStateStore, MemoryStateStore, StateStore};
pub use tokens::{count_tokens, estimate_tokens, Encoding, TokenLevel};
pub use tree::{collect_leaves, compact, NodeKind, RenderOptions, TreeNode};
pub use walker::{scan, ScanOptions, WalkError};
