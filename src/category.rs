//! Heuristic grouping of file paths into presentation categories.
//!
//! Classification is a first-match walk over [`RULES`], an ordered list of
//! (category, markers) pairs matched as substrings of the lower-cased,
//! `/`-normalized path.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

/// Semantic bucket for a file path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Generated,
    Documentation,
    Config,
    Tests,
    ApiLayer,
    Models,
    BusinessLogic,
    Shared,
    Frontend,
    Core,
}

impl Category {
    /// All categories in rule priority order.
    pub fn all() -> &'static [Category] {
        &[
            Category::Generated,
            Category::Documentation,
            Category::Config,
            Category::Tests,
            Category::ApiLayer,
            Category::Models,
            Category::BusinessLogic,
            Category::Shared,
            Category::Frontend,
            Category::Core,
        ]
    }

    /// Presentation label, without the icon.
    pub fn label(&self) -> &'static str {
        match self {
            Category::Generated => "GENERATED / OPENAPI",
            Category::Documentation => "DOCS",
            Category::Config => "CONFIG & INFRA",
            Category::Tests => "TESTS",
            Category::ApiLayer => "API LAYER",
            Category::Models => "MODELS & DATA",
            Category::BusinessLogic => "BUSINESS LOGIC",
            Category::Shared => "SHARED / UTILS",
            Category::Frontend => "FRONTEND",
            Category::Core => "CORE / OTHER",
        }
    }

    /// Icon shown next to the label in bundle headings.
    pub fn icon(&self) -> &'static str {
        match self {
            Category::Generated => "🤖",
            Category::Documentation => "📚",
            Category::Config => "🛠️",
            Category::Tests => "🧪",
            Category::ApiLayer => "🔌",
            Category::Models => "📐",
            Category::BusinessLogic => "⚙️",
            Category::Shared => "🧱",
            Category::Frontend => "🎨",
            Category::Core => "📦",
        }
    }
}

impl Category {
    /// Icon and label, e.g. `🧪 TESTS`. Groups are ordered by this string.
    pub fn heading(&self) -> String {
        format!("{} {}", self.icon(), self.label())
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl PartialOrd for Category {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Category {
    fn cmp(&self, other: &Self) -> Ordering {
        self.heading().cmp(&other.heading())
    }
}

/// Ordered classification rules; the first rule with a matching marker wins.
/// Paths matching none fall into [`Category::Core`].
pub const RULES: &[(Category, &[&str])] = &[
    (
        Category::Generated,
        &["target/", "build/", "generated-sources", "generated", "openapi"],
    ),
    (
        Category::Documentation,
        &["readme", "doc", "license", "changelog", ".md"],
    ),
    (
        Category::Config,
        &[
            "config",
            ".env",
            "docker",
            ".json",
            ".xml",
            ".yml",
            ".yaml",
            ".toml",
            ".properties",
            "pom.xml",
            "build.gradle",
        ],
    ),
    (
        Category::Tests,
        &["test", "spec", "__tests__", "junit", "mock"],
    ),
    (
        Category::ApiLayer,
        &["controller", "api", "resource", "route", "handler", "endpoint"],
    ),
    (
        Category::Models,
        &["model", "dto", "entity", "schema", "interface", "type", "domain", "enum"],
    ),
    (
        Category::BusinessLogic,
        &["service", "logic", "usecase", "impl", "business"],
    ),
    (
        Category::Shared,
        &["util", "helper", "common", "shared", "exception", "mapper"],
    ),
    (
        Category::Frontend,
        &[
            "ui", "component", "view", "page", "css", "html", "react", "angular", "vue",
        ],
    ),
];

/// Classify a path.
///
/// # Examples
///
/// ```
/// use ctxpick::category::{classify, Category};
///
/// assert_eq!(classify("src/util/ServiceTest.java"), Category::Tests);
/// assert_eq!(classify("src\\api\\UserController.java"), Category::ApiLayer);
/// ```
pub fn classify(path: &str) -> Category {
    classify_with(RULES, path)
}

/// Classify a path against a custom ordered rule list.
pub fn classify_with(rules: &[(Category, &[&str])], path: &str) -> Category {
    let normalized = path.to_lowercase().replace('\\', "/");

    rules
        .iter()
        .find(|(_, markers)| markers.iter().any(|m| normalized.contains(m)))
        .map_or(Category::Core, |(category, _)| *category)
}

/// Group paths by category.
///
/// Groups iterate in heading order (icon first, by code point); paths keep
/// their input order.
pub fn group_by_category<I, S>(paths: I) -> BTreeMap<Category, Vec<String>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut groups: BTreeMap<Category, Vec<String>> = BTreeMap::new();
    for path in paths {
        let path = path.as_ref();
        groups
            .entry(classify(path))
            .or_default()
            .push(path.to_string());
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_each_bucket() {
        assert_eq!(classify("target/classes/App.class"), Category::Generated);
        assert_eq!(classify("src/openapi/Client.java"), Category::Generated);
        assert_eq!(classify("README"), Category::Documentation);
        assert_eq!(classify("notes/intro.md"), Category::Documentation);
        assert_eq!(classify("pom.xml"), Category::Config);
        assert_eq!(classify("deploy/.env.production"), Category::Config);
        // "docker" contains the "doc" marker, so docs win
        assert_eq!(classify("deploy/Dockerfile"), Category::Documentation);
        assert_eq!(classify("Cargo.toml"), Category::Config);
        assert_eq!(classify("src/__tests__/app.js"), Category::Tests);
        assert_eq!(classify("src/routes/users.js"), Category::ApiLayer);
        assert_eq!(classify("src/entity/User.java"), Category::Models);
        assert_eq!(classify("src/billing/usecase.py"), Category::BusinessLogic);
        assert_eq!(classify("src/helpers/strings.py"), Category::Shared);
        assert_eq!(classify("src/components/Button.jsx"), Category::Frontend);
        assert_eq!(classify("src/main.py"), Category::Core);
    }

    #[test]
    fn test_priority_order() {
        // test marker beats utility marker
        assert_eq!(classify("src/util/ServiceTest.java"), Category::Tests);
        // generated beats api layer
        assert_eq!(
            classify("target/generated-sources/api/UserController.java"),
            Category::Generated
        );
        // docs beat config
        assert_eq!(classify("docs/config.json"), Category::Documentation);
    }

    #[test]
    fn test_case_and_separator_normalization() {
        assert_eq!(classify("SRC\\CONTROLLERS\\Home.java"), Category::ApiLayer);
        assert_eq!(classify("Build\\out.txt"), Category::Generated);
    }

    #[test]
    fn test_classify_is_pure() {
        let path = "src/domain/Order.java";
        assert_eq!(classify(path), classify(path));
        assert_eq!(classify(path), Category::Models);
    }

    #[test]
    fn test_custom_rules() {
        let rules: &[(Category, &[&str])] = &[(Category::Frontend, &["main"])];
        assert_eq!(classify_with(rules, "src/main.rs"), Category::Frontend);
        assert_eq!(classify_with(rules, "src/lib.rs"), Category::Core);
        assert_eq!(classify_with(&[], "README.md"), Category::Core);
    }

    #[test]
    fn test_rules_cover_all_but_core() {
        let ruled: Vec<Category> = RULES.iter().map(|(c, _)| *c).collect();
        assert_eq!(&ruled[..], &Category::all()[..Category::all().len() - 1]);
    }

    #[test]
    fn test_group_by_category_sorted_by_heading() {
        let groups = group_by_category([
            "src/main.py",
            "tests/test_main.py",
            "README.md",
            "src/app.py",
            "src/api/routes.py",
        ]);

        let labels: Vec<&str> = groups.keys().map(|c| c.label()).collect();
        assert_eq!(labels, vec!["DOCS", "CORE / OTHER", "API LAYER", "TESTS"]);
        assert_eq!(groups[&Category::Core], vec!["src/main.py", "src/app.py"]);
    }

    #[test]
    fn test_heading_order_puts_icons_first() {
        let mut all = Category::all().to_vec();
        all.sort();
        let headings: Vec<String> = all.iter().map(Category::heading).collect();
        assert_eq!(headings[0], "⚙️ BUSINESS LOGIC");
        assert_eq!(headings[1], "🎨 FRONTEND");
        assert_eq!(headings[headings.len() - 1], "🧱 SHARED / UTILS");
        assert!(headings.windows(2).all(|w| w[0] < w[1]));
    }
}
