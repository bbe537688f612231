//! Line-based cleanup of file contents before bundling.

use std::fmt;
use std::str::FromStr;

/// How aggressively file contents are trimmed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CleanMode {
    /// Content is passed through untouched.
    Full,
    /// Blank lines and comment-only lines are dropped.
    Light,
    /// Light, plus import and logging lines.
    #[default]
    Smart,
}

impl fmt::Display for CleanMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CleanMode::Full => write!(f, "full"),
            CleanMode::Light => write!(f, "light"),
            CleanMode::Smart => write!(f, "smart"),
        }
    }
}

impl FromStr for CleanMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "full" => Ok(CleanMode::Full),
            "light" => Ok(CleanMode::Light),
            "smart" => Ok(CleanMode::Smart),
            _ => Err(format!("unknown clean mode: {}", s)),
        }
    }
}

const COMMENT_PREFIXES: &[&str] = &["#", "//"];
const NOISE_PREFIXES: &[&str] = &["import ", "from ", "package ", "console.", "print("];

/// Clean `text` according to `mode`.
///
/// Kept lines retain their original indentation and are joined with `\n`.
///
/// # Examples
///
/// ```
/// use ctxpick::clean::{clean_code, CleanMode};
///
/// let src = "import os\n\n# setup\nx = 1\n";
/// assert_eq!(clean_code(src, CleanMode::Light), "import os\nx = 1");
/// assert_eq!(clean_code(src, CleanMode::Smart), "x = 1");
/// ```
pub fn clean_code(text: &str, mode: CleanMode) -> String {
    if mode == CleanMode::Full {
        return text.to_string();
    }

    text.lines()
        .filter(|line| keep_line(line.trim(), mode))
        .collect::<Vec<_>>()
        .join("\n")
}

fn keep_line(trimmed: &str, mode: CleanMode) -> bool {
    if trimmed.is_empty() {
        return false;
    }

    let is_comment = COMMENT_PREFIXES.iter().any(|p| trimmed.starts_with(p));
    if is_comment && !trimmed.starts_with("#!") {
        return false;
    }

    !(mode == CleanMode::Smart && NOISE_PREFIXES.iter().any(|p| trimmed.starts_with(p)))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "#!/usr/bin/env python\n\
                          import sys\n\
                          from os import path\n\
                          \n\
                          # a comment\n\
                          def main():\n\
                          \x20   // not python but dropped\n\
                          \x20   print(\"hi\")\n\
                          \x20   return 0\n";

    #[test]
    fn test_full_is_identity() {
        assert_eq!(clean_code(SAMPLE, CleanMode::Full), SAMPLE);
    }

    #[test]
    fn test_light_drops_blank_and_comments() {
        let cleaned = clean_code(SAMPLE, CleanMode::Light);
        assert_eq!(
            cleaned,
            "#!/usr/bin/env python\nimport sys\nfrom os import path\ndef main():\n    print(\"hi\")\n    return 0"
        );
    }

    #[test]
    fn test_smart_drops_imports_and_prints() {
        let cleaned = clean_code(SAMPLE, CleanMode::Smart);
        assert_eq!(cleaned, "#!/usr/bin/env python\ndef main():\n    return 0");
    }

    #[test]
    fn test_smart_keeps_lookalikes() {
        let src = "imports = 1\nconsole_log = 2\nfromage = 3";
        assert_eq!(clean_code(src, CleanMode::Smart), src);
    }

    #[test]
    fn test_mode_from_str() {
        assert_eq!("SMART".parse::<CleanMode>().unwrap(), CleanMode::Smart);
        assert_eq!("light".parse::<CleanMode>().unwrap(), CleanMode::Light);
        assert!("aggressive".parse::<CleanMode>().is_err());
        assert_eq!(CleanMode::default(), CleanMode::Smart);
    }
}
