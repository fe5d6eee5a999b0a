//! toctree CLI - Command-line interface library
//!
//! This library provides the CLI functionality for toctree, including:
//! - Walk: List elements in pre-order, skipping pruned subtrees
//! - Runs: Group the root's children into runs of equal names
//! - Siblings: Show the elements preceding a child of the root
//! - Pretty: Re-indent a document with one attribute per line
//!
//! # Binary Usage
//!
//! ```bash
//! # List paragraphs outside tables as JSON
//! toctree walk document.xml --trim w:tbl --trim w:p --select w:p --format json
//!
//! # Pretty-print a document
//! toctree pretty document.xml
//! ```

pub mod app;

pub use app::{
    pretty_command, runs_command, run_cli, siblings_command, walk_command, OutputFormat,
    WalkEntry,
};
