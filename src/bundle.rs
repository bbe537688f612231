//! Context bundle assembly.
//!
//! A bundle is one markdown document holding an optional documentation
//! section followed by the selected files, cleaned and grouped by
//! [`Category`]. Files that cannot be read are skipped; the bundle is
//! always produced.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Component, Path, PathBuf};

use rayon::prelude::*;
use serde::Serialize;

use crate::category::{group_by_category, Category};
use crate::clean::{clean_code, CleanMode};
use crate::tokens::{count_tokens_with_encoding, estimate_tokens, Encoding, TokenLevel};
use crate::walker::root_name;

/// Heading placed before the documentation section.
pub const DOCS_HEADING: &str = "\n## 📚 DOCUMENTATION\n";

/// Options for [`build_bundle`].
#[derive(Debug, Clone, Default)]
pub struct BundleOptions {
    /// Cleaning applied to every selected file.
    pub mode: CleanMode,
    /// Documentation file or directory to prepend.
    pub docs: Option<PathBuf>,
    /// Encoding for the exact token count.
    pub encoding: Encoding,
}

/// A selected file that made it into the bundle.
#[derive(Debug, Clone, Serialize)]
pub struct BundledFile {
    pub path: String,
    pub category: Category,
    pub lines: usize,
    pub chars: usize,
    pub estimated_tokens: usize,
}

/// Size figures for a finished bundle.
#[derive(Debug, Clone, Serialize)]
pub struct BundleStats {
    /// Paths the caller selected.
    pub selected: usize,
    /// Files actually read into the bundle.
    pub included: usize,
    pub chars: usize,
    pub estimated_tokens: usize,
    pub tokens: usize,
    pub encoding: String,
    pub level: TokenLevel,
}

/// The assembled context document.
#[derive(Debug, Clone)]
pub struct Bundle {
    pub text: String,
    pub files: Vec<BundledFile>,
    pub groups: BTreeMap<Category, Vec<String>>,
    pub stats: BundleStats,
}

/// Assemble a bundle from `selected` leaf identifiers under `root`.
///
/// Selection order is kept within each category group; groups are
/// emitted in heading order.
///
/// # Examples
///
/// ```no_run
/// use ctxpick::bundle::{build_bundle, BundleOptions};
///
/// let selected = vec!["src/main.py".to_string()];
/// let bundle = build_bundle("./project".as_ref(), &selected, &BundleOptions::default());
/// println!("~{} tokens", bundle.stats.estimated_tokens);
/// ```
pub fn build_bundle(root: &Path, selected: &[String], options: &BundleOptions) -> Bundle {
    let mut parts = vec![format!("# CONTEXT: {}\n", root_name(root))];

    if let Some(docs) = options.docs.as_deref() {
        if docs.exists() {
            parts.push(DOCS_HEADING.to_string());
            for doc in doc_files(docs) {
                match read_lossy(&doc) {
                    Some(content) => {
                        let name = doc
                            .file_name()
                            .map(|n| n.to_string_lossy().into_owned())
                            .unwrap_or_default();
                        parts.push(format!("### {}\n{}\n---", name, content));
                    }
                    None => log::warn!("skipping unreadable doc {}", doc.display()),
                }
            }
        } else {
            log::warn!("docs path {} does not exist", docs.display());
        }
    }

    let groups = group_by_category(selected);

    let ordered: Vec<(Category, &str)> = groups
        .iter()
        .flat_map(|(cat, paths)| paths.iter().map(move |p| (*cat, p.as_str())))
        .collect();

    // Read and clean in parallel; collect keeps input order.
    let cleaned: Vec<Option<String>> = ordered
        .par_iter()
        .map(|(_, rel)| read_selected(root, rel).map(|raw| clean_code(&raw, options.mode)))
        .collect();

    let mut files = Vec::new();
    let mut cleaned = cleaned.into_iter();
    for (category, paths) in &groups {
        parts.push(format!("\n## === {} ===\n", category.heading()));
        for (rel, content) in paths.iter().zip(cleaned.by_ref()) {
            let Some(content) = content else {
                continue;
            };
            files.push(BundledFile {
                path: rel.clone(),
                category: *category,
                lines: bytecount::count(content.as_bytes(), b'\n') + 1,
                chars: content.chars().count(),
                estimated_tokens: estimate_tokens(&content),
            });
            parts.push(format!("### File: {}\n```\n{}\n```\n", rel, content));
        }
    }

    let text = parts.join("\n");
    let estimated = estimate_tokens(&text);
    let stats = BundleStats {
        selected: selected.len(),
        included: files.len(),
        chars: text.chars().count(),
        estimated_tokens: estimated,
        tokens: count_tokens_with_encoding(&text, options.encoding),
        encoding: options.encoding.to_string(),
        level: TokenLevel::from_estimate(estimated),
    };

    log::debug!(
        "bundled {}/{} files, ~{} tokens",
        stats.included,
        stats.selected,
        stats.estimated_tokens
    );

    Bundle {
        text,
        files,
        groups,
        stats,
    }
}

/// Documentation files for `docs`: the path itself when it is a file,
/// otherwise every markdown file followed by every text file below it.
pub fn doc_files(docs: &Path) -> Vec<PathBuf> {
    if docs.is_file() {
        return vec![docs.to_path_buf()];
    }

    let Some(base) = docs.to_str() else {
        log::warn!("docs path {} is not valid UTF-8", docs.display());
        return Vec::new();
    };
    let base = glob::Pattern::escape(base);

    ["md", "txt"]
        .iter()
        .flat_map(|ext| {
            let pattern = format!("{}/**/*.{}", base, ext);
            match glob::glob(&pattern) {
                Ok(paths) => paths
                    .filter_map(|entry| match entry {
                        Ok(path) => Some(path),
                        Err(e) => {
                            log::warn!("docs glob error: {}", e);
                            None
                        }
                    })
                    .filter(|p| p.is_file())
                    .collect::<Vec<_>>(),
                Err(e) => {
                    log::warn!("invalid docs pattern {}: {}", pattern, e);
                    Vec::new()
                }
            }
        })
        .collect()
}

fn read_selected(root: &Path, rel: &str) -> Option<String> {
    let rel_path = Path::new(rel);
    if !rel_path
        .components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
    {
        log::warn!("skipping {}: not a path below the root", rel);
        return None;
    }

    let path = root.join(rel_path);
    if !path.is_file() {
        log::warn!("skipping {}: not a file", rel);
        return None;
    }
    read_lossy(&path)
}

fn read_lossy(path: &Path) -> Option<String> {
    match fs::read(path) {
        Ok(bytes) => Some(String::from_utf8_lossy(&bytes).into_owned()),
        Err(e) => {
            log::warn!("cannot read {}: {}", path.display(), e);
            None
        }
    }
}
