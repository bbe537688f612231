//! Scan tree representation, compaction and rendering.
//!
//! Nodes are addressed by their path relative to the scan root, always
//! `/`-separated. Directory chains with a single child directory can be
//! collapsed with [`compact`], and [`collect_leaves`] flattens a tree into
//! its file identifiers.

use std::collections::HashSet;

/// The type of a tree node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Directory,
    File,
}

impl NodeKind {
    /// Check if this is a directory.
    pub fn is_directory(&self) -> bool {
        matches!(self, NodeKind::Directory)
    }

    /// Check if this is a file.
    pub fn is_file(&self) -> bool {
        matches!(self, NodeKind::File)
    }
}

/// A node in the scan tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode {
    /// Display label (file labels carry an icon prefix).
    pub label: String,
    /// Path relative to the scan root, `/`-separated.
    pub path: String,
    /// Type of node (file or directory).
    pub kind: NodeKind,
    /// Child nodes (empty for files).
    children: Vec<TreeNode>,
}

impl TreeNode {
    /// Create a new directory node.
    pub fn directory(label: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            path: path.into(),
            kind: NodeKind::Directory,
            children: Vec::new(),
        }
    }

    /// Create a directory node with the given children.
    pub fn directory_with(
        label: impl Into<String>,
        path: impl Into<String>,
        children: Vec<TreeNode>,
    ) -> Self {
        Self {
            children,
            ..Self::directory(label, path)
        }
    }

    /// Create a new file node.
    pub fn file(label: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            path: path.into(),
            kind: NodeKind::File,
            children: Vec::new(),
        }
    }

    /// Check if this is a directory.
    pub fn is_directory(&self) -> bool {
        self.kind.is_directory()
    }

    /// Check if this is a file.
    pub fn is_file(&self) -> bool {
        self.kind.is_file()
    }

    /// Get child nodes.
    pub fn children(&self) -> &[TreeNode] {
        &self.children
    }

    /// Count total files in this tree.
    pub fn file_count(&self) -> usize {
        match &self.kind {
            NodeKind::File => 1,
            NodeKind::Directory => self.children.iter().map(|c| c.file_count()).sum(),
        }
    }
}

/// Icon shown in front of a file name, chosen by extension.
pub fn file_icon(extension: Option<&str>) -> &'static str {
    match extension {
        Some(".py") => "🐍",
        Some(".js" | ".ts" | ".tsx") => "🟨",
        Some(".rs") => "🦀",
        Some(".md") => "📝",
        Some(".java" | ".kt" | ".class") => "☕",
        Some(".xml") => "📜",
        Some(".json" | ".yml" | ".yaml") => "⚙️",
        _ => "📄",
    }
}

/// Display label for a file: icon, a space, then the file name.
pub fn file_label(file_name: &str, extension: Option<&str>) -> String {
    format!("{} {}", file_icon(extension), file_name)
}

/// Collapse chains of single-child directories.
///
/// A directory whose only child is a directory absorbs it: labels are
/// joined with `" / "`, the deepest path is kept and the child's children
/// are adopted. Merging repeats until the node no longer has a single
/// directory child, then recurses into the children. Files are untouched
/// and the transform is idempotent.
///
/// # Examples
///
/// ```
/// use ctxpick::tree::{compact, TreeNode};
///
/// let c = TreeNode::directory_with("c", "a/b/c", vec![TreeNode::file("x", "a/b/c/x")]);
/// let b = TreeNode::directory_with("b", "a/b", vec![c]);
/// let a = TreeNode::directory_with("a", "a", vec![b]);
///
/// let compacted = compact(vec![a]);
/// assert_eq!(compacted[0].label, "a / b / c");
/// assert_eq!(compacted[0].path, "a/b/c");
/// ```
pub fn compact(nodes: Vec<TreeNode>) -> Vec<TreeNode> {
    nodes.into_iter().map(compact_node).collect()
}

fn compact_node(mut node: TreeNode) -> TreeNode {
    if node.is_file() {
        return node;
    }

    while node.children.len() == 1 && node.children[0].is_directory() {
        let Some(child) = node.children.pop() else {
            break;
        };
        node.label = format!("{} / {}", node.label, child.label);
        node.path = child.path;
        node.children = child.children;
    }

    node.children = compact(std::mem::take(&mut node.children));
    node
}

/// Flatten a tree into its file paths, depth-first and in tree order.
pub fn collect_leaves(nodes: &[TreeNode]) -> Vec<String> {
    let mut leaves = Vec::new();
    push_leaves(nodes, &mut leaves);
    leaves
}

fn push_leaves(nodes: &[TreeNode], leaves: &mut Vec<String>) {
    for node in nodes {
        match node.kind {
            NodeKind::Directory => push_leaves(&node.children, leaves),
            NodeKind::File => leaves.push(node.path.clone()),
        }
    }
}

/// Options for rendering the tree.
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    /// Append each node's path identifier.
    pub show_paths: bool,
    /// Leaf paths that are selected (marked with *).
    pub selected: HashSet<String>,
}

/// Box-drawing characters for tree rendering.
const BRANCH: &str = "├── ";
const LAST_BRANCH: &str = "└── ";
const VERTICAL: &str = "│   ";
const SPACE: &str = "    ";

/// Render a forest under a root label with box-drawing characters.
///
/// # Examples
///
/// ```
/// use ctxpick::tree::{render_tree, RenderOptions, TreeNode};
///
/// let nodes = vec![TreeNode::file("📄 main.rs", "main.rs")];
/// let output = render_tree("project", &nodes, &RenderOptions::default());
/// assert!(output.contains("└── 📄 main.rs"));
/// ```
pub fn render_tree(root_label: &str, nodes: &[TreeNode], options: &RenderOptions) -> String {
    // Pre-allocate for typical tree size
    let mut output = String::with_capacity(4096);
    output.push_str(root_label);
    output.push_str("/\n");

    let count = nodes.len();
    for (i, node) in nodes.iter().enumerate() {
        render_node(&mut output, node, "", i == count - 1, options);
    }
    output
}

fn render_node(
    output: &mut String,
    node: &TreeNode,
    prefix: &str,
    is_last: bool,
    options: &RenderOptions,
) {
    output.push_str(prefix);
    output.push_str(if is_last { LAST_BRANCH } else { BRANCH });
    output.push_str(&node.label);

    if node.is_directory() {
        output.push('/');
    }

    if options.show_paths {
        output.push_str(" (");
        output.push_str(&node.path);
        output.push(')');
    }

    if node.is_file() && options.selected.contains(&node.path) {
        output.push_str(" *");
    }

    output.push('\n');

    let continuation = if is_last { SPACE } else { VERTICAL };
    let new_prefix = format!("{}{}", prefix, continuation);
    let child_count = node.children.len();
    for (i, child) in node.children.iter().enumerate() {
        render_node(output, child, &new_prefix, i == child_count - 1, options);
    }
}

/// Format number with thousands separators.
pub fn format_number(n: usize) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result.chars().rev().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(path: &str) -> TreeNode {
        let name = path.rsplit('/').next().unwrap();
        TreeNode::file(file_label(name, None), path)
    }

    fn dir(path: &str, children: Vec<TreeNode>) -> TreeNode {
        let name = path.rsplit('/').next().unwrap();
        TreeNode::directory_with(name, path, children)
    }

    #[test]
    fn test_directory_node() {
        let node = TreeNode::directory("src", "src");
        assert!(node.is_directory());
        assert!(!node.is_file());
        assert!(node.children().is_empty());
    }

    #[test]
    fn test_file_node() {
        let node = TreeNode::file("🦀 main.rs", "src/main.rs");
        assert!(node.is_file());
        assert!(!node.is_directory());
        assert!(node.children().is_empty());
    }

    #[test]
    fn test_file_icons() {
        assert_eq!(file_icon(Some(".py")), "🐍");
        assert_eq!(file_icon(Some(".tsx")), "🟨");
        assert_eq!(file_icon(Some(".kt")), "☕");
        assert_eq!(file_icon(Some(".yml")), "⚙️");
        assert_eq!(file_icon(Some(".csv")), "📄");
        assert_eq!(file_icon(None), "📄");
        assert_eq!(file_label("App.java", Some(".java")), "☕ App.java");
    }

    #[test]
    fn test_counts() {
        let root = dir("root", vec![file("root/a"), dir("root/sub", vec![file("root/sub/b")])]);
        assert_eq!(root.file_count(), 2);
        assert_eq!(dir("empty", vec![]).file_count(), 0);
    }

    #[test]
    fn test_compact_chain() {
        let tree = vec![dir(
            "a",
            vec![dir("a/b", vec![dir("a/b/c", vec![file("a/b/c/x.txt")])])],
        )];

        let compacted = compact(tree);

        assert_eq!(compacted.len(), 1);
        assert_eq!(compacted[0].label, "a / b / c");
        assert_eq!(compacted[0].path, "a/b/c");
        assert_eq!(compacted[0].children(), &[file("a/b/c/x.txt")]);
    }

    #[test]
    fn test_compact_stops_at_branching() {
        let tree = vec![dir(
            "a",
            vec![dir(
                "a/b",
                vec![
                    dir("a/b/c", vec![dir("a/b/c/d", vec![file("a/b/c/d/x")])]),
                    file("a/b/y"),
                ],
            )],
        )];

        let compacted = compact(tree);

        assert_eq!(compacted[0].label, "a / b");
        assert_eq!(compacted[0].path, "a/b");
        let children = compacted[0].children();
        assert_eq!(children.len(), 2);
        assert_eq!(children[0].label, "c / d");
        assert_eq!(children[0].path, "a/b/c/d");
        assert_eq!(children[1].path, "a/b/y");
    }

    #[test]
    fn test_compact_leaves_single_file_child() {
        let tree = vec![dir("a", vec![file("a/only.txt")])];
        let compacted = compact(tree.clone());
        assert_eq!(compacted, tree);
    }

    #[test]
    fn test_compact_empty_directory_chain() {
        let tree = vec![dir("auth", vec![dir("auth/empty", vec![])])];
        let compacted = compact(tree);
        assert_eq!(compacted[0].label, "auth / empty");
        assert!(compacted[0].children().is_empty());
    }

    #[test]
    fn test_compact_is_idempotent() {
        let tree = vec![
            dir(
                "a",
                vec![dir(
                    "a/b",
                    vec![dir(
                        "a/b/c",
                        vec![
                            file("a/b/c/1"),
                            dir("a/b/c/d", vec![dir("a/b/c/d/e", vec![file("a/b/c/d/e/2")])]),
                        ],
                    )],
                )],
            ),
            file("top"),
        ];

        let once = compact(tree);
        let twice = compact(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_collect_leaves_order() {
        let tree = vec![
            dir("a", vec![dir("a/b", vec![file("a/b/1")]), file("a/2")]),
            dir("c", vec![]),
            file("3"),
        ];

        assert_eq!(collect_leaves(&tree), vec!["a/b/1", "a/2", "3"]);
    }

    #[test]
    fn test_collect_leaves_survives_compaction() {
        let tree = vec![dir("a", vec![dir("a/b", vec![file("a/b/1"), file("a/b/2")])])];
        let before = collect_leaves(&tree);
        let after = collect_leaves(&compact(tree));
        assert_eq!(before, after);
    }

    #[test]
    fn test_render_nested() {
        let tree = vec![
            dir("src", vec![file("src/lib.rs"), file("src/main.rs")]),
            file("Cargo.toml"),
        ];

        let output = render_tree("project", &tree, &RenderOptions::default());

        assert!(output.starts_with("project/\n"));
        assert!(output.contains("├── src/\n"));
        assert!(output.contains("│   ├── 📄 lib.rs\n"));
        assert!(output.contains("│   └── 📄 main.rs\n"));
        assert!(output.contains("└── 📄 Cargo.toml\n"));
    }

    #[test]
    fn test_render_with_markers_and_paths() {
        let tree = vec![dir("src", vec![file("src/lib.rs")])];
        let options = RenderOptions {
            show_paths: true,
            selected: ["src/lib.rs".to_string()].into_iter().collect(),
        };

        let output = render_tree("project", &tree, &options);
        assert!(output.contains("src/ (src)"));
        assert!(output.contains("📄 lib.rs (src/lib.rs) *"));
    }

    #[test]
    fn test_render_empty() {
        let output = render_tree("project", &[], &RenderOptions::default());
        assert_eq!(output, "project/\n");
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1234567), "1,234,567");
    }
}
