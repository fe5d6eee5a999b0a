//! Error types for tree operations

use thiserror::Error;

/// Errors that can occur while building, loading or querying a tree
#[derive(Error, Debug)]
pub enum TreeError {
    /// The operation is not valid for the node it was called on
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    /// Error parsing XML content
    #[error("XML parsing error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// Malformed attribute in a start tag
    #[error("XML attribute error: {0}")]
    Attribute(#[from] quick_xml::events::attributes::AttrError),

    /// Names or character data that are not valid UTF-8
    #[error("Invalid UTF-8: {0}")]
    Encoding(#[from] std::str::Utf8Error),

    /// Well-formed XML events that do not make up a single rooted document
    #[error("Malformed document: {0}")]
    MalformedDocument(String),
}

/// Result type for tree operations
pub type Result<T> = std::result::Result<T, TreeError>;
