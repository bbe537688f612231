//! Token accounting for context bundles.
//!
//! Two measures are kept side by side: a cheap character estimate
//! (`ceil(chars / 4)`) that drives the budget level, and an exact
//! tiktoken count for OpenAI-compatible encodings.

use std::fmt;
use std::sync::OnceLock;

use serde::Serialize;
use tiktoken_rs::CoreBPE;

/// Estimates below this are [`TokenLevel::Low`].
pub const LOW_TOKEN_LIMIT: usize = 8_000;
/// Estimates below this (and at or above the low limit) are [`TokenLevel::Medium`].
pub const HIGH_TOKEN_LIMIT: usize = 100_000;

/// Token encoding to use for counting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Encoding {
    /// cl100k_base: GPT-4, GPT-3.5-turbo, ChatGPT
    #[default]
    Cl100kBase,
    /// o200k_base: GPT-4o
    O200kBase,
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Encoding::Cl100kBase => write!(f, "cl100k_base"),
            Encoding::O200kBase => write!(f, "o200k_base"),
        }
    }
}

impl std::str::FromStr for Encoding {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "cl100k" | "cl100k_base" => Ok(Encoding::Cl100kBase),
            "o200k" | "o200k_base" => Ok(Encoding::O200kBase),
            _ => Err(format!("unknown encoding: {}", s)),
        }
    }
}

/// Rough size class of a bundle, by estimated tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenLevel {
    Low,
    Medium,
    High,
}

impl TokenLevel {
    /// Classify an estimated token count.
    ///
    /// # Examples
    ///
    /// ```
    /// use ctxpick::tokens::TokenLevel;
    ///
    /// assert_eq!(TokenLevel::from_estimate(7_999), TokenLevel::Low);
    /// assert_eq!(TokenLevel::from_estimate(8_000), TokenLevel::Medium);
    /// assert_eq!(TokenLevel::from_estimate(100_000), TokenLevel::High);
    /// ```
    pub fn from_estimate(tokens: usize) -> Self {
        if tokens < LOW_TOKEN_LIMIT {
            TokenLevel::Low
        } else if tokens < HIGH_TOKEN_LIMIT {
            TokenLevel::Medium
        } else {
            TokenLevel::High
        }
    }

    /// Display color for the level.
    pub fn color(&self) -> &'static str {
        match self {
            TokenLevel::Low => "green",
            TokenLevel::Medium => "orange",
            TokenLevel::High => "red",
        }
    }
}

impl fmt::Display for TokenLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.color())
    }
}

/// Character-based estimate: one token per four characters, rounded up.
///
/// Characters are Unicode scalar values, not bytes.
pub fn estimate_tokens(text: &str) -> usize {
    text.chars().count().div_ceil(4)
}

static CL100K: OnceLock<Option<CoreBPE>> = OnceLock::new();
static O200K: OnceLock<Option<CoreBPE>> = OnceLock::new();

fn get_tokenizer(encoding: Encoding) -> Option<&'static CoreBPE> {
    match encoding {
        Encoding::Cl100kBase => CL100K
            .get_or_init(|| tiktoken_rs::cl100k_base().ok())
            .as_ref(),
        Encoding::O200kBase => O200K
            .get_or_init(|| tiktoken_rs::o200k_base().ok())
            .as_ref(),
    }
}

fn tiktoken_count(text: &str, encoding: Encoding) -> Option<usize> {
    let bpe = get_tokenizer(encoding)?;
    Some(bpe.encode_ordinary(text).len())
}

/// Byte heuristic used when no tokenizer could be loaded.
fn fallback_count(text: &str) -> usize {
    text.len().div_ceil(4)
}

/// Count tokens in text using the default encoding (cl100k_base).
///
/// # Examples
///
/// ```
/// use ctxpick::tokens::count_tokens;
///
/// let count = count_tokens("Hello, world!");
/// assert!(count > 0);
/// ```
pub fn count_tokens(text: &str) -> usize {
    count_tokens_with_encoding(text, Encoding::default())
}

/// Count tokens in text using the specified encoding.
///
/// Never fails; falls back to a byte heuristic if the tokenizer
/// cannot be loaded.
pub fn count_tokens_with_encoding(text: &str, encoding: Encoding) -> usize {
    tiktoken_count(text, encoding).unwrap_or_else(|| {
        log::debug!("{} tokenizer unavailable, using heuristic", encoding);
        fallback_count(text)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_string() {
        assert_eq!(count_tokens(""), 0);
        assert_eq!(estimate_tokens(""), 0);
    }

    #[test]
    fn test_simple_text() {
        let count = count_tokens("Hello, world!");
        assert!(count > 0 && count < 10);
    }

    #[test]
    fn test_estimate_rounds_up() {
        assert_eq!(estimate_tokens("a"), 1);
        assert_eq!(estimate_tokens("abcd"), 1);
        assert_eq!(estimate_tokens("abcde"), 2);
        assert_eq!(estimate_tokens(&"x".repeat(32_000)), 8_000);
    }

    #[test]
    fn test_estimate_counts_chars_not_bytes() {
        // four scalar values, twelve bytes
        assert_eq!(estimate_tokens("ééé€"), 1);
    }

    #[test]
    fn test_fallback_approximation() {
        assert_eq!(fallback_count(""), 0);
        assert_eq!(fallback_count("a"), 1);
        assert_eq!(fallback_count("abcdefgh"), 2);
    }

    #[test]
    fn test_level_boundaries() {
        assert_eq!(TokenLevel::from_estimate(0), TokenLevel::Low);
        assert_eq!(TokenLevel::from_estimate(LOW_TOKEN_LIMIT - 1), TokenLevel::Low);
        assert_eq!(TokenLevel::from_estimate(LOW_TOKEN_LIMIT), TokenLevel::Medium);
        assert_eq!(TokenLevel::from_estimate(HIGH_TOKEN_LIMIT - 1), TokenLevel::Medium);
        assert_eq!(TokenLevel::from_estimate(HIGH_TOKEN_LIMIT), TokenLevel::High);
        assert_eq!(TokenLevel::High.to_string(), "red");
    }

    #[test]
    fn test_encoding_from_str() {
        assert_eq!("cl100k".parse::<Encoding>().unwrap(), Encoding::Cl100kBase);
        assert_eq!("O200K_BASE".parse::<Encoding>().unwrap(), Encoding::O200kBase);
        assert!("p50k".parse::<Encoding>().is_err());
    }
}
