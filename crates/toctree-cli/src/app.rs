//! CLI Application logic
//!
//! Contains the command-line interface implementation. Each command returns
//! its report as a `String`; `run_cli` prints it.

use std::fmt::Write;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing::{debug, info};

use toctree_core::{to_string_with_config, PrettyConfig, SequenceExt, Tree};

/// Output format for listings
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output
    #[default]
    Text,
    /// JSON output for tool consumption
    Json,
}

#[derive(Parser)]
#[command(name = "toctree")]
#[command(author, version, about = "Walk and restructure XML document trees", long_about = None)]
struct Cli {
    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List elements in pre-order
    Walk {
        /// Input XML file
        input: PathBuf,

        /// Element name whose children are not visited (repeatable)
        #[arg(short, long)]
        trim: Vec<String>,

        /// Only list elements with this name
        #[arg(short, long)]
        select: Option<String>,

        /// Output format (text or json)
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Group the root's child elements into runs of the same name
    Runs {
        /// Input XML file
        input: PathBuf,
    },

    /// List the elements before a child of the root, nearest first
    Siblings {
        /// Input XML file
        input: PathBuf,

        /// Zero-based position among the root's child elements
        #[arg(short, long)]
        index: usize,
    },

    /// Pretty-print a document
    Pretty {
        /// Input XML file
        input: PathBuf,

        /// Keep attributes on the element line
        #[arg(long)]
        inline_attributes: bool,

        /// Spaces per indentation level
        #[arg(long, default_value_t = 2)]
        indent: usize,

        /// Write an XML declaration first
        #[arg(long)]
        declaration: bool,
    },
}

/// One element of a `walk` listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WalkEntry {
    /// Distance from the root (children of the root are at depth 1)
    pub depth: usize,
    /// Element name
    pub name: String,
    /// Concatenated text content
    pub text: String,
}

/// Run the CLI application
///
/// This is the main entry point for the command-line interface.
/// It parses arguments and dispatches to the appropriate command.
pub fn run_cli() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let report = match cli.command {
        Commands::Walk {
            input,
            trim,
            select,
            format,
        } => walk_command(&input, &trim, select.as_deref(), format)?,
        Commands::Runs { input } => runs_command(&input)?,
        Commands::Siblings { input, index } => siblings_command(&input, index)?,
        Commands::Pretty {
            input,
            inline_attributes,
            indent,
            declaration,
        } => {
            let config = PrettyConfig {
                indent: " ".repeat(indent),
                new_line_on_attributes: !inline_attributes,
                omit_declaration: !declaration,
            };
            pretty_command(&input, config)?
        }
    };

    println!("{}", report.trim_end());
    Ok(())
}

fn init_tracing(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    // try_init: a global subscriber may already be installed
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .with_writer(std::io::stderr)
        .try_init();
}

fn load_tree(input: &Path) -> Result<Tree> {
    if !input.exists() {
        anyhow::bail!("Input file not found: {}", input.display());
    }
    let xml = fs::read(input)
        .with_context(|| format!("Failed to read input file: {}", input.display()))?;
    let tree = Tree::parse(&xml)
        .with_context(|| format!("Failed to parse XML: {}", input.display()))?;
    info!(path = %input.display(), nodes = tree.node_count(), "loaded document");
    Ok(tree)
}

/// Pre-order listing of the elements below the root
///
/// Depths are carried forward from each parent, which the traversal always
/// visits before its children.
fn walk_entries(tree: &Tree, trim: &[String], select: Option<&str>) -> Vec<WalkEntry> {
    let mut depths = vec![0usize; tree.node_count()];
    tree.root()
        .descendants_trimmed(|e| e.name().is_some_and(|n| trim.iter().any(|t| t == n)))
        .filter_map(|e| {
            let depth = e.parent().map_or(0, |p| depths[p.id().index()]) + 1;
            depths[e.id().index()] = depth;
            (select.is_none() || e.name() == select).then(|| WalkEntry {
                depth,
                name: e.name().unwrap_or_default().to_string(),
                text: e.text(),
            })
        })
        .collect()
}

/// Execute the walk command
pub fn walk_command(
    input: &Path,
    trim: &[String],
    select: Option<&str>,
    format: OutputFormat,
) -> Result<String> {
    let tree = load_tree(input)?;
    let entries = walk_entries(&tree, trim, select);
    debug!(entries = entries.len(), "walk finished");

    match format {
        OutputFormat::Json => {
            serde_json::to_string_pretty(&entries).context("Failed to serialize walk entries")
        }
        OutputFormat::Text => Ok(entries.iter().string_concatenate_by(|e| {
            let indent = "  ".repeat(e.depth.saturating_sub(1));
            if e.text.is_empty() {
                format!("{}{}\n", indent, e.name)
            } else {
                format!("{}{}  {:?}\n", indent, e.name, e.text)
            }
        })),
    }
}

/// Execute the runs command
pub fn runs_command(input: &Path) -> Result<String> {
    let tree = load_tree(input)?;
    let mut output = String::new();
    for group in tree.root().elements().group_adjacent(|e| e.name()) {
        writeln!(
            output,
            "{} ×{}",
            group.key().unwrap_or_default(),
            group.len()
        )?;
    }
    Ok(output)
}

/// Execute the siblings command
pub fn siblings_command(input: &Path, index: usize) -> Result<String> {
    let tree = load_tree(input)?;
    let root = tree.root();
    let Some(target) = root.elements().nth(index) else {
        anyhow::bail!(
            "Root element <{}> has {} child elements, index {} is out of range",
            root.name().unwrap_or_default(),
            root.elements().count(),
            index
        );
    };
    let before = target
        .elements_before_self_reverse_order()
        .context("Failed to determine sibling order")?;

    let mut output = String::new();
    for (distance, sibling) in before.enumerate() {
        writeln!(
            output,
            "-{} {}  {:?}",
            distance + 1,
            sibling.name().unwrap_or_default(),
            sibling.text()
        )?;
    }
    Ok(output)
}

/// Execute the pretty command
pub fn pretty_command(input: &Path, config: PrettyConfig) -> Result<String> {
    let tree = load_tree(input)?;
    Ok(to_string_with_config(tree.root(), config))
}
