//! Ignore-rule compilation and matching.
//!
//! Combines the built-in ignore list, the project's `.gitignore` and
//! user-supplied patterns into a single gitignore-dialect matcher, with a
//! fixed whitelist of build-output directory names that can never be
//! ignored.

use std::fs;
use std::path::{Path, PathBuf};

use ignore::gitignore::{Gitignore, GitignoreBuilder};

/// Patterns that are always ignored, ahead of any project or user rule.
pub const BUILTIN_IGNORES: &[&str] = &[
    ".git/",
    "node_modules/",
    "__pycache__/",
    "dist/",
    "build/",
    ".env",
    ".venv",
];

/// User ignore text the CLI starts from when `--ignore` is not given.
pub const DEFAULT_USER_IGNORES: &str = "test/, configuration/, config/, logs/, *.lock";

/// Directory names that stay visible regardless of ignore rules.
///
/// A relative path is whitelisted when it equals one of these names or
/// starts with `name/`.
pub const WHITELIST: &[&str] = &["target", "generated", "build", "generated-sources"];

/// Name of the project-local ignore file read from the scan root.
pub const PROJECT_IGNORE_FILE: &str = ".gitignore";

/// Compiled ignore rules for one scan root.
///
/// Built once per scan and never mutated afterwards.
#[derive(Debug)]
pub struct IgnoreMatcher {
    root: PathBuf,
    gitignore: Gitignore,
    patterns: Vec<String>,
}

impl IgnoreMatcher {
    /// Compile the effective rule set for `root`.
    ///
    /// `user_patterns` is comma-separated; entries are trimmed and empty
    /// ones dropped. Order is built-ins, then every non-empty line of
    /// `<root>/.gitignore`, then user patterns, so later rules (including
    /// `!` negations) win over earlier ones.
    ///
    /// Malformed patterns are skipped with a warning rather than failing
    /// the whole compilation.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use ctxpick::matcher::IgnoreMatcher;
    /// use std::path::Path;
    ///
    /// let matcher = IgnoreMatcher::compile(Path::new("./project"), "*.lock, logs/");
    /// assert!(matcher.is_ignored(Path::new("./project/Cargo.lock"), false));
    /// ```
    pub fn compile(root: &Path, user_patterns: &str) -> Self {
        let mut patterns: Vec<String> = BUILTIN_IGNORES.iter().map(|p| p.to_string()).collect();
        patterns.extend(read_project_ignore(root));
        patterns.extend(split_patterns(user_patterns));

        let mut builder = GitignoreBuilder::new(root);
        for pattern in &patterns {
            if let Err(e) = builder.add_line(None, pattern) {
                log::warn!("skipping invalid ignore pattern {:?}: {}", pattern, e);
            }
        }

        let gitignore = builder.build().unwrap_or_else(|e| {
            log::warn!("failed to build ignore rules for {}: {}", root.display(), e);
            Gitignore::empty()
        });

        log::debug!(
            "compiled {} ignore patterns for {}",
            patterns.len(),
            root.display()
        );

        Self {
            root: root.to_path_buf(),
            gitignore,
            patterns,
        }
    }

    /// Patterns in evaluation order.
    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    /// Decide whether `path` (under the root) is ignored.
    ///
    /// Whitelisted paths are never ignored. A path that cannot be made
    /// relative to the root is always ignored.
    pub fn is_ignored(&self, path: &Path, is_dir: bool) -> bool {
        let Some(relative) = relative_slash_path(&self.root, path) else {
            log::trace!("outside scan root, ignoring: {}", path.display());
            return true;
        };

        if is_whitelisted(&relative) {
            return false;
        }

        // The gitignore strips its root as a byte prefix, so it must see the
        // root spelled exactly as compiled.
        self.gitignore
            .matched_path_or_any_parents(self.root.join(&relative), is_dir)
            .is_ignore()
    }
}

/// Check a forward-slash relative path against [`WHITELIST`].
pub fn is_whitelisted(relative: &str) -> bool {
    WHITELIST.iter().any(|name| {
        relative == *name
            || relative
                .strip_prefix(name)
                .is_some_and(|rest| rest.starts_with('/'))
    })
}

/// Split comma-separated user patterns, trimming and dropping empties.
pub fn split_patterns(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(String::from)
        .collect()
}

/// Express `path` relative to `root` with `/` separators.
///
/// Returns `None` for paths outside the root and for the root itself.
pub fn relative_slash_path(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let parts: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();

    if parts.is_empty() {
        None
    } else {
        Some(parts.join("/"))
    }
}

fn read_project_ignore(root: &Path) -> Vec<String> {
    let path = root.join(PROJECT_IGNORE_FILE);
    if !path.is_file() {
        return Vec::new();
    }

    match fs::read_to_string(&path) {
        Ok(content) => content
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(String::from)
            .collect(),
        Err(e) => {
            log::warn!("could not read {}: {}", path.display(), e);
            Vec::new()
        }
    }
}
