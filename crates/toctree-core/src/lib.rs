//! # toctree-core
//!
//! Tree walking helpers for structural analysis of XML-like documents, such
//! as collecting the heading paragraphs of a word-processing document to
//! build a table of contents.
//!
//! This crate provides:
//! - An arena [`Tree`] of elements, text leaves and raw markup leaves
//! - Pruned pre-order traversal without recursion ([`NodeRef::descendants_trimmed`])
//! - Cached reverse sibling lookup ([`NodeRef::elements_before_self_reverse_order`])
//! - Lazy sequence adapters: adjacent grouping, running folds, zipping
//!   ([`SequenceExt`])
//! - Indented serialization with one attribute per line
//!
//! ## Example: Collecting headings
//!
//! ```
//! use toctree_core::{SequenceExt, Tree};
//!
//! let xml = br#"<w:body>
//!   <w:p><w:pPr><w:pStyle w:val="Heading1"/></w:pPr><w:r><w:t>Intro</w:t></w:r></w:p>
//!   <w:tbl><w:tr><w:tc><w:p><w:r><w:t>cell</w:t></w:r></w:p></w:tc></w:tr></w:tbl>
//!   <w:p><w:pPr><w:pStyle w:val="Heading2"/></w:pPr><w:r><w:t>Details</w:t></w:r></w:p>
//! </w:body>"#;
//! let tree = Tree::parse(xml)?;
//!
//! // Skip tables; paragraphs never nest so there is no need to look inside them
//! let headings: Vec<String> = tree
//!     .root()
//!     .descendants_trimmed(|e| matches!(e.name(), Some("w:tbl" | "w:p")))
//!     .filter(|e| e.name() == Some("w:p"))
//!     .filter(|p| {
//!         p.descendants_trimmed(|_| false)
//!             .any(|s| s.attribute("w:val").is_some_and(|v| v.starts_with("Heading")))
//!     })
//!     .map(|p| p.text())
//!     .collect();
//! assert_eq!(headings, vec!["Intro", "Details"]);
//!
//! let toc = headings.iter().string_concatenate_by(|h| format!("{}\n", h));
//! assert_eq!(toc, "Intro\nDetails\n");
//! # Ok::<(), toctree_core::TreeError>(())
//! ```

pub mod error;
pub mod group;
pub mod parse;
pub mod seq;
pub mod serialize;
pub mod siblings;
pub mod traverse;
pub mod tree;

pub use error::{Result, TreeError};
pub use group::{Group, GroupAdjacent};
pub use parse::ParseConfig;
pub use seq::{sequence_at, Rollup, SequenceExt, ZipWith};
pub use serialize::{
    to_string_new_line_on_attributes, to_string_with_config, PrettyConfig, PrettyPrinter,
};
pub use siblings::ElementsBeforeSelf;
pub use traverse::DescendantsTrimmed;
pub use tree::{Attribute, Elements, NodeId, NodeKind, NodeRef, ReverseSiblingInfo, Tree};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert_eq!(VERSION, "0.1.0");
    }
}
