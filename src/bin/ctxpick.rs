//! ctxpick CLI - Pick files from a source tree and bundle them as LLM context.

use std::path::{Path, PathBuf};

use clap::{ArgAction, Args, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use ctxpick::builder::{ContextScan, ScanResult};
use ctxpick::bundle::{build_bundle, BundleOptions};
use ctxpick::category::group_by_category;
use ctxpick::clean::CleanMode;
use ctxpick::errors::{exit_code, CtxpickError};
use ctxpick::filter::{ExtensionFilter, DEFAULT_EXTENSIONS};
use ctxpick::matcher::DEFAULT_USER_IGNORES;
use ctxpick::output::{
    format_bundle_json, format_error_json, format_groups_json, format_groups_text,
    format_scan_json, format_stats, write_output,
};
use ctxpick::state::{remember_root, resolve_root, JsonStateStore, StateStore};
use ctxpick::tokens::Encoding;
use ctxpick::tree::{render_tree, RenderOptions};
use glob::Pattern;

#[derive(Parser)]
#[command(name = "ctxpick")]
#[command(about = "Pick files from a source tree and bundle them as LLM context")]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Silence all logging
    #[arg(short, long, global = true)]
    quiet: bool,

    /// File holding the last used root
    #[arg(long, global = true)]
    state_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Clone)]
struct ScanArgs {
    /// Root directory to scan (defaults to the last used root).
    /// Directory symlinks below it are skipped, not followed.
    path: Option<PathBuf>,

    /// Case-insensitive name filter
    #[arg(short, long, default_value = "")]
    search: String,

    /// Comma-separated extensions to keep
    #[arg(long, default_value = DEFAULT_EXTENSIONS)]
    ext: String,

    /// Drop files without an extension
    #[arg(long)]
    no_ext_less: bool,

    /// Extra comma-separated ignore patterns (pass "" to clear)
    #[arg(long, default_value = DEFAULT_USER_IGNORES)]
    ignore: String,

    /// Keep single-child directory chains expanded
    #[arg(long)]
    no_compact: bool,

    /// Drop search-matching directories that have no matching files
    #[arg(long)]
    hide_empty_matches: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Display the filtered, compacted tree
    Tree {
        #[command(flatten)]
        scan: ScanArgs,

        /// Output as JSON
        #[arg(long)]
        json: bool,

        /// Show each node's path identifier
        #[arg(long)]
        paths: bool,

        /// Mark leaves matching a glob with `*` (repeatable)
        #[arg(long)]
        select: Vec<String>,
    },

    /// List every selectable file
    Leaves {
        #[command(flatten)]
        scan: ScanArgs,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Group relative paths by category
    Categorize {
        /// Relative paths to classify
        #[arg(required = true)]
        paths: Vec<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Build a context bundle from selected files
    Bundle {
        #[command(flatten)]
        scan: ScanArgs,

        /// Select leaves matching a glob (repeatable)
        #[arg(long)]
        select: Vec<String>,

        /// Select every leaf
        #[arg(long)]
        all: bool,

        /// Content cleaning mode
        #[arg(long, value_enum, default_value = "smart")]
        mode: ModeArg,

        /// Documentation file or directory to prepend
        #[arg(long)]
        docs: Option<PathBuf>,

        /// Write the bundle to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,

        /// Token encoding for the exact count
        #[arg(long, default_value = "cl100k")]
        encoding: EncodingArg,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Clone, ValueEnum)]
enum EncodingArg {
    Cl100k,
    O200k,
}

impl From<EncodingArg> for Encoding {
    fn from(arg: EncodingArg) -> Self {
        match arg {
            EncodingArg::Cl100k => Encoding::Cl100kBase,
            EncodingArg::O200k => Encoding::O200kBase,
        }
    }
}

#[derive(Clone, ValueEnum)]
enum ModeArg {
    Full,
    Light,
    Smart,
}

impl From<ModeArg> for CleanMode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Full => CleanMode::Full,
            ModeArg::Light => CleanMode::Light,
            ModeArg::Smart => CleanMode::Smart,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    setup_logging(cli.quiet, cli.verbose);

    let json_output = json_flag(&cli.command);
    let store = cli
        .state_file
        .map(JsonStateStore::new)
        .unwrap_or_else(JsonStateStore::default_location);
    log::debug!("state file: {}", store.path().display());

    let result = match cli.command {
        Commands::Tree {
            scan,
            json,
            paths,
            select,
        } => run_tree(&store, scan, json, paths, &select),
        Commands::Leaves { scan, json } => run_leaves(&store, scan, json),
        Commands::Categorize { paths, json } => run_categorize(&paths, json),
        Commands::Bundle {
            scan,
            select,
            all,
            mode,
            docs,
            output,
            json,
            encoding,
        } => {
            let options = BundleOptions {
                mode: mode.into(),
                docs,
                encoding: encoding.into(),
            };
            run_bundle(&store, scan, &select, all, &options, output.as_deref(), json)
        }
        Commands::Completions { shell } => {
            generate(shell, &mut Cli::command(), "ctxpick", &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        if json_output {
            let path = match &e {
                CtxpickError::InvalidRoot(p) | CtxpickError::NoFilesFound(p) => Some(p.as_path()),
                _ => None,
            };
            eprintln!("{}", format_error_json(&e.to_string(), path));
        } else {
            eprintln!("error: {}", e);
        }
        std::process::exit(exit_code(&e));
    }
}

fn setup_logging(quiet: bool, verbose: u8) {
    let level = if quiet {
        log::LevelFilter::Off
    } else {
        match verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    };
    env_logger::Builder::new()
        .filter_level(level)
        .format_timestamp(None)
        .init();
}

fn json_flag(cmd: &Commands) -> bool {
    match cmd {
        Commands::Tree { json, .. } => *json,
        Commands::Leaves { json, .. } => *json,
        Commands::Categorize { json, .. } => *json,
        Commands::Bundle { json, .. } => *json,
        Commands::Completions { .. } => false,
    }
}

/// Resolve the root through the state store, scan it, and remember it.
fn scan_project(store: &dyn StateStore, args: ScanArgs) -> Result<ScanResult, CtxpickError> {
    let previous = store.load();
    let root = resolve_root(args.path, store);
    log::info!("scanning {}", root.display());

    let absolute = root.canonicalize().unwrap_or_else(|_| root.clone());
    remember_root(store, &absolute, previous.as_deref());

    ContextScan::new(root)
        .search(args.search)
        .extensions(ExtensionFilter::parse(&args.ext, !args.no_ext_less))
        .ignore_patterns(args.ignore)
        .keep_matching_dirs(!args.hide_empty_matches)
        .compact(!args.no_compact)
        .run()
}

/// Keep the leaves matching any of the glob patterns; invalid globs are skipped.
fn select_leaves(leaves: Vec<String>, patterns: &[String]) -> Vec<String> {
    let patterns: Vec<Pattern> = patterns
        .iter()
        .filter_map(|p| match Pattern::new(p) {
            Ok(pattern) => Some(pattern),
            Err(e) => {
                log::warn!("ignoring invalid selection pattern {:?}: {}", p, e);
                None
            }
        })
        .collect();

    leaves
        .into_iter()
        .filter(|leaf| patterns.iter().any(|p| p.matches(leaf)))
        .collect()
}

// --- Tree command ---

fn run_tree(
    store: &dyn StateStore,
    args: ScanArgs,
    json: bool,
    show_paths: bool,
    select_patterns: &[String],
) -> Result<(), CtxpickError> {
    let result = scan_project(store, args)?;
    let root_name = result.root_name();

    let output = if json {
        format_scan_json(&root_name, &result.nodes, result.leaves())?
    } else {
        let options = RenderOptions {
            show_paths,
            selected: select_leaves(result.leaves(), select_patterns)
                .into_iter()
                .collect(),
        };
        render_tree(&root_name, &result.nodes, &options)
    };

    write_output(None, &output)?;
    Ok(())
}

// --- Leaves command ---

fn run_leaves(store: &dyn StateStore, args: ScanArgs, json: bool) -> Result<(), CtxpickError> {
    let result = scan_project(store, args)?;
    let leaves = result.leaves();

    if json {
        let json = serde_json::to_string_pretty(&leaves).map_err(ctxpick::OutputError::from)?;
        write_output(None, &json)?;
    } else {
        for leaf in &leaves {
            println!("{}", leaf);
        }
    }
    Ok(())
}

// --- Categorize command ---

fn run_categorize(paths: &[String], json: bool) -> Result<(), CtxpickError> {
    let groups = group_by_category(paths);
    let output = if json {
        format_groups_json(&groups)?
    } else {
        format_groups_text(&groups)
    };
    write_output(None, &output)?;
    Ok(())
}

// --- Bundle command ---

fn run_bundle(
    store: &dyn StateStore,
    args: ScanArgs,
    select_patterns: &[String],
    all: bool,
    options: &BundleOptions,
    output: Option<&Path>,
    json: bool,
) -> Result<(), CtxpickError> {
    let result = scan_project(store, args)?;
    let leaves = result.leaves();

    let selected = if all {
        leaves
    } else {
        select_leaves(leaves, select_patterns)
    };

    if selected.is_empty() {
        return Err(CtxpickError::NoFilesFound(result.root));
    }
    log::info!("selected {} files", selected.len());

    let bundle = build_bundle(&result.root, &selected, options);

    if json {
        write_output(output, &format_bundle_json(&bundle)?)?;
    } else {
        write_output(output, &bundle.text)?;
        eprint!("{}", format_stats(&bundle.stats));
    }
    Ok(())
}
