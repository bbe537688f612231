//! Extension-based file filtering.

use std::collections::BTreeSet;
use std::path::Path;

/// Extensions offered when the caller does not supply any.
pub const DEFAULT_EXTENSIONS: &str = ".java, .md, .txt, .py, .js, .ts, .kt, .json, .xml, .yaml";

/// Set of allowed file extensions.
///
/// Extensions are stored lower-case with a leading dot. Files without an
/// extension pass only when `allow_no_extension` is set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionFilter {
    extensions: BTreeSet<String>,
    allow_no_extension: bool,
}

impl Default for ExtensionFilter {
    fn default() -> Self {
        Self::parse(DEFAULT_EXTENSIONS, true)
    }
}

impl ExtensionFilter {
    /// Build a filter from already-split extension strings.
    pub fn new<I, S>(extensions: I, allow_no_extension: bool) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            extensions: extensions
                .into_iter()
                .filter_map(|e| normalize_extension(e.as_ref()))
                .collect(),
            allow_no_extension,
        }
    }

    /// Parse a comma-separated list such as `".rs, toml,MD"`.
    ///
    /// # Examples
    ///
    /// ```
    /// use ctxpick::filter::ExtensionFilter;
    ///
    /// let filter = ExtensionFilter::parse("rs, .TOML", false);
    /// assert!(filter.allows("main.rs"));
    /// assert!(filter.allows("Cargo.toml"));
    /// assert!(!filter.allows("Makefile"));
    /// ```
    pub fn parse(list: &str, allow_no_extension: bool) -> Self {
        Self::new(list.split(','), allow_no_extension)
    }

    /// Normalized extensions, sorted.
    pub fn extensions(&self) -> impl Iterator<Item = &str> {
        self.extensions.iter().map(String::as_str)
    }

    /// Check a file name against the filter.
    pub fn allows(&self, file_name: &str) -> bool {
        match extension_of(file_name) {
            Some(ext) => self.extensions.contains(&ext),
            None => self.allow_no_extension,
        }
    }
}

/// Lower-cased extension of a file name, with its leading dot.
///
/// Dotfiles such as `.gitignore` and names ending in a bare dot have no
/// extension.
pub fn extension_of(file_name: &str) -> Option<String> {
    Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .filter(|e| !e.is_empty())
        .map(|e| format!(".{}", e.to_lowercase()))
}

fn normalize_extension(raw: &str) -> Option<String> {
    let ext = raw.trim().to_lowercase();
    if ext.is_empty() || ext == "." {
        return None;
    }
    if ext.starts_with('.') {
        Some(ext)
    } else {
        Some(format!(".{}", ext))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_normalizes() {
        let filter = ExtensionFilter::parse(" .Py, js ,, .", false);
        let exts: Vec<_> = filter.extensions().collect();
        assert_eq!(exts, vec![".js", ".py"]);
    }

    #[test]
    fn test_no_extension_sentinel_absent() {
        let filter = ExtensionFilter::parse(".py", false);
        assert!(filter.allows("main.py"));
        assert!(!filter.allows("README"));
        assert!(!filter.allows("script.js"));
    }

    #[test]
    fn test_no_extension_sentinel_present() {
        let filter = ExtensionFilter::parse(".py", true);
        assert!(filter.allows("README"));
        assert!(filter.allows("Makefile"));
        assert!(!filter.allows("script.js"));
    }

    #[test]
    fn test_case_insensitive_match() {
        let filter = ExtensionFilter::parse(".md", false);
        assert!(filter.allows("NOTES.MD"));
    }

    #[test]
    fn test_extension_of() {
        assert_eq!(extension_of("lib.RS"), Some(".rs".to_string()));
        assert_eq!(extension_of("archive.tar.gz"), Some(".gz".to_string()));
        assert_eq!(extension_of(".gitignore"), None);
        assert_eq!(extension_of("trailing."), None);
        assert_eq!(extension_of("Dockerfile"), None);
    }

    #[test]
    fn test_default_filter() {
        let filter = ExtensionFilter::default();
        assert!(filter.allows("App.java"));
        assert!(filter.allows("config.yaml"));
        assert!(filter.allows("LICENSE"));
        assert!(!filter.allows("main.rs"));
    }
}
