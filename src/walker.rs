//! Recursive directory scanning into a filtered tree.
//!
//! Directories are listed one level at a time with the `ignore` crate's
//! walker (its own filters disabled) so that ignored directories are pruned
//! before recursion and unreadable directories simply come back empty.

use std::path::{Path, PathBuf};

use ignore::WalkBuilder;
use thiserror::Error;

use crate::filter::{extension_of, ExtensionFilter};
use crate::matcher::{relative_slash_path, IgnoreMatcher};
use crate::tree::{file_label, TreeNode};

/// Errors that prevent a scan from starting.
#[derive(Debug, Error)]
pub enum WalkError {
    #[error("path not found: {path}")]
    NotFound { path: PathBuf },

    #[error("not a directory: {path}")]
    NotADirectory { path: PathBuf },
}

/// Options for scanning.
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// Case-insensitive substring filter on names (empty = no filtering).
    pub search: String,
    /// Extension filter applied to files.
    pub extensions: ExtensionFilter,
    /// Keep directories whose own name matches the search term even when
    /// nothing below them survives filtering.
    pub keep_matching_dirs: bool,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            search: String::new(),
            extensions: ExtensionFilter::default(),
            keep_matching_dirs: true,
        }
    }
}

impl ScanOptions {
    /// Set the search term.
    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = term.into();
        self
    }

    /// Set the extension filter.
    pub fn extensions(mut self, filter: ExtensionFilter) -> Self {
        self.extensions = filter;
        self
    }

    /// Keep or drop empty directories whose name matches the search.
    pub fn keep_matching_dirs(mut self, keep: bool) -> Self {
        self.keep_matching_dirs = keep;
        self
    }
}

/// Entry from a single-level directory listing.
#[derive(Debug, Clone)]
struct ListedEntry {
    path: PathBuf,
    name: String,
    is_dir: bool,
}

/// Check that `root` exists and is a directory.
pub fn validate_root(root: &Path) -> Result<(), WalkError> {
    if !root.exists() {
        return Err(WalkError::NotFound {
            path: root.to_path_buf(),
        });
    }
    if !root.is_dir() {
        return Err(WalkError::NotADirectory {
            path: root.to_path_buf(),
        });
    }
    Ok(())
}

/// Display name of a root directory: the last component of its canonical
/// form, or the path as given when it cannot be resolved.
pub fn root_name(root: &Path) -> String {
    root.canonicalize()
        .ok()
        .as_deref()
        .and_then(Path::file_name)
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| root.display().to_string())
}

/// Scan `root` and return its filtered children.
///
/// # Examples
///
/// ```no_run
/// use ctxpick::filter::ExtensionFilter;
/// use ctxpick::matcher::IgnoreMatcher;
/// use ctxpick::walker::scan;
/// use std::path::Path;
///
/// let root = Path::new("./project");
/// let matcher = IgnoreMatcher::compile(root, "");
/// let nodes = scan(root, "", &ExtensionFilter::parse(".rs", false), &matcher).unwrap();
/// println!("{} top-level entries", nodes.len());
/// ```
pub fn scan(
    root: &Path,
    search: &str,
    extensions: &ExtensionFilter,
    matcher: &IgnoreMatcher,
) -> Result<Vec<TreeNode>, WalkError> {
    let options = ScanOptions {
        search: search.to_string(),
        extensions: extensions.clone(),
        ..Default::default()
    };
    scan_with_options(root, &options, matcher)
}

/// Scan `root` with custom options.
pub fn scan_with_options(
    root: &Path,
    options: &ScanOptions,
    matcher: &IgnoreMatcher,
) -> Result<Vec<TreeNode>, WalkError> {
    validate_root(root)?;

    let search = options.search.to_lowercase();
    log::debug!("scanning {} (search: {:?})", root.display(), search);

    let nodes = scan_dir(root, root, &search, options, matcher, &list_dir);
    log::debug!("scan of {} produced {} top-level nodes", root.display(), nodes.len());
    Ok(nodes)
}

/// Scan one directory; `list` supplies its entries. A directory that
/// fails to list contributes no children.
fn scan_dir<L>(
    root: &Path,
    dir: &Path,
    search: &str,
    options: &ScanOptions,
    matcher: &IgnoreMatcher,
    list: &L,
) -> Vec<TreeNode>
where
    L: Fn(&Path) -> Result<Vec<ListedEntry>, ignore::Error>,
{
    let entries = match list(dir) {
        Ok(entries) => entries,
        Err(e) => {
            log::warn!("could not list {}: {}", dir.display(), e);
            return Vec::new();
        }
    };

    let mut nodes = Vec::new();
    for entry in entries {
        if matcher.is_ignored(&entry.path, entry.is_dir) {
            log::trace!("ignored: {}", entry.path.display());
            continue;
        }

        let Some(relative) = relative_slash_path(root, &entry.path) else {
            continue;
        };

        if entry.is_dir {
            let children = scan_dir(root, &entry.path, search, options, matcher, list);
            let name_matches = options.keep_matching_dirs
                && !search.is_empty()
                && entry.name.to_lowercase().contains(search);

            if !children.is_empty() || name_matches {
                nodes.push(TreeNode::directory_with(&entry.name, relative, children));
            }
        } else {
            if !options.extensions.allows(&entry.name) {
                continue;
            }
            if !search.is_empty() && !entry.name.to_lowercase().contains(search) {
                continue;
            }

            let label = file_label(&entry.name, extension_of(&entry.name).as_deref());
            nodes.push(TreeNode::file(label, relative));
        }
    }

    nodes
}

/// List the direct children of `dir`, directories first, then files, each
/// group ordered case-insensitively by name.
fn list_dir(dir: &Path) -> Result<Vec<ListedEntry>, ignore::Error> {
    let walker = WalkBuilder::new(dir)
        .standard_filters(false)
        .follow_links(false)
        .max_depth(Some(1))
        .build();

    let mut entries = Vec::new();
    for result in walker {
        let entry = result?;
        if entry.depth() == 0 {
            continue;
        }
        let Some(file_type) = entry.file_type() else {
            continue;
        };
        let path = entry.path().to_path_buf();

        // Linked directories are not descended into.
        if file_type.is_symlink() && path.is_dir() {
            log::trace!("skipping directory symlink: {}", path.display());
            continue;
        }

        entries.push(ListedEntry {
            name: entry.file_name().to_string_lossy().into_owned(),
            is_dir: file_type.is_dir(),
            path,
        });
    }

    entries.sort_by(|a, b| {
        b.is_dir
            .cmp(&a.is_dir)
            .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
            .then_with(|| a.name.cmp(&b.name))
    });
    Ok(entries)
}
