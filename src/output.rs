//! Output formatting for ctxpick.
//!
//! Scan results are emitted either as a box-drawn text tree or as JSON in
//! the `{"label", "value", "children"}` shape consumed by checkbox-tree
//! widgets. Bundles are emitted as raw markdown or as JSON with stats.

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::Path;

use serde::Serialize;
use thiserror::Error;

use crate::bundle::{Bundle, BundleStats, BundledFile};
use crate::category::Category;
use crate::tree::{format_number, TreeNode};

/// Errors that can occur during output formatting.
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

// ============================================================================
// JSON Formatting
// ============================================================================

#[derive(Serialize)]
struct JsonNode {
    label: String,
    value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    children: Option<Vec<JsonNode>>,
}

#[derive(Serialize)]
struct JsonScan<'a> {
    root: &'a str,
    nodes: Vec<JsonNode>,
    leaves: Vec<String>,
}

#[derive(Serialize)]
struct JsonGroup<'a> {
    category: Category,
    label: &'static str,
    icon: &'static str,
    paths: &'a [String],
}

#[derive(Serialize)]
struct JsonGroups<'a> {
    groups: Vec<JsonGroup<'a>>,
}

#[derive(Serialize)]
struct JsonBundle<'a> {
    stats: &'a BundleStats,
    groups: Vec<JsonGroup<'a>>,
    files: &'a [BundledFile],
    content: &'a str,
}

#[derive(Serialize)]
struct JsonError<'a> {
    error: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    path: Option<String>,
}

fn node_to_json(node: &TreeNode) -> JsonNode {
    JsonNode {
        label: node.label.clone(),
        value: node.path.clone(),
        children: node
            .is_directory()
            .then(|| node.children().iter().map(node_to_json).collect()),
    }
}

fn groups_to_json(groups: &BTreeMap<Category, Vec<String>>) -> Vec<JsonGroup<'_>> {
    groups
        .iter()
        .map(|(category, paths)| JsonGroup {
            category: *category,
            label: category.label(),
            icon: category.icon(),
            paths,
        })
        .collect()
}

/// Scan result as JSON: `{"root", "nodes", "leaves"}`.
///
/// Directory nodes always carry a `children` array (possibly empty);
/// file nodes never do.
pub fn format_scan_json(
    root_name: &str,
    nodes: &[TreeNode],
    leaves: Vec<String>,
) -> Result<String, OutputError> {
    let scan = JsonScan {
        root: root_name,
        nodes: nodes.iter().map(node_to_json).collect(),
        leaves,
    };
    Ok(serde_json::to_string_pretty(&scan)?)
}

/// Category groups as JSON, in heading order.
pub fn format_groups_json(groups: &BTreeMap<Category, Vec<String>>) -> Result<String, OutputError> {
    let out = JsonGroups {
        groups: groups_to_json(groups),
    };
    Ok(serde_json::to_string_pretty(&out)?)
}

/// Bundle as JSON with stats, groups, per-file figures and content.
pub fn format_bundle_json(bundle: &Bundle) -> Result<String, OutputError> {
    let out = JsonBundle {
        stats: &bundle.stats,
        groups: groups_to_json(&bundle.groups),
        files: &bundle.files,
        content: &bundle.text,
    };
    Ok(serde_json::to_string_pretty(&out)?)
}

/// Error object for `--json` mode.
pub fn format_error_json(message: &str, path: Option<&Path>) -> String {
    let out = JsonError {
        error: message,
        path: path.map(|p| p.display().to_string()),
    };
    serde_json::to_string(&out).unwrap_or_else(|_| format!("{{\"error\": {:?}}}", message))
}

// ============================================================================
// Text Formatting
// ============================================================================

/// Category groups as text: a heading per group and one path per line.
pub fn format_groups_text(groups: &BTreeMap<Category, Vec<String>>) -> String {
    let mut output = String::new();
    for (category, paths) in groups {
        output.push_str(&format!("=== {} ===\n", category.heading()));
        for path in paths {
            output.push_str(&format!("  {}\n", path));
        }
    }
    output
}

/// One-line-per-figure summary of bundle stats.
pub fn format_stats(stats: &BundleStats) -> String {
    format!(
        "📂 Files: {} selected, {} included\n🧮 Tokens: ~{} ({}), {} {}\n",
        format_number(stats.selected),
        format_number(stats.included),
        format_number(stats.estimated_tokens),
        stats.level,
        format_number(stats.tokens),
        stats.encoding,
    )
}

/// Write `content` to `path`, or to stdout when no path is given.
pub fn write_output(path: Option<&Path>, content: &str) -> Result<(), OutputError> {
    match path {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            fs::write(path, content)?;
            log::info!("wrote {} bytes to {}", content.len(), path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(content.as_bytes())?;
            if !content.ends_with('\n') {
                stdout.write_all(b"\n")?;
            }
            stdout.flush()?;
        }
    }
    Ok(())
}
