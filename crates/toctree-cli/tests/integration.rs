//! Integration tests for the toctree CLI commands
//!
//! Each test writes a small WordprocessingML body to a temporary file and
//! runs a command against it.

use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;
use toctree_cli::{
    pretty_command, runs_command, siblings_command, walk_command, OutputFormat, WalkEntry,
};
use toctree_core::PrettyConfig;

const BODY: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<w:body xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:p><w:pPr><w:pStyle w:val="Heading1"/></w:pPr><w:r><w:t>Overview</w:t></w:r></w:p>
  <w:p><w:r><w:t>First paragraph.</w:t></w:r></w:p>
  <w:p><w:r><w:t>Second paragraph.</w:t></w:r></w:p>
  <w:tbl><w:tr><w:tc><w:p><w:r><w:t>Cell</w:t></w:r></w:p></w:tc></w:tr></w:tbl>
  <w:p><w:pPr><w:pStyle w:val="Heading1"/></w:pPr><w:r><w:t>Install</w:t></w:r></w:p>
</w:body>"#;

fn write_body(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("document.xml");
    fs::write(&path, BODY).unwrap();
    path
}

#[test]
fn test_walk_lists_paragraphs_outside_tables() {
    let dir = TempDir::new().unwrap();
    let input = write_body(&dir);
    let trim = vec!["w:p".to_string(), "w:tbl".to_string()];

    let output = walk_command(&input, &trim, Some("w:p"), OutputFormat::Text).unwrap();
    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(
        lines,
        vec![
            "w:p  \"Overview\"",
            "w:p  \"First paragraph.\"",
            "w:p  \"Second paragraph.\"",
            "w:p  \"Install\"",
        ]
    );
}

#[test]
fn test_walk_json_output() {
    let dir = TempDir::new().unwrap();
    let input = write_body(&dir);

    let output = walk_command(&input, &[], Some("w:t"), OutputFormat::Json).unwrap();
    let entries: Vec<serde_json::Value> = serde_json::from_str(&output).unwrap();
    assert_eq!(entries.len(), 5);
    assert_eq!(entries[3]["text"], "Cell");
    assert_eq!(entries[3]["depth"], 6);
    assert_eq!(entries[0]["name"], "w:t");
}

#[test]
fn test_walk_entry_serializes_fields() {
    let entry = WalkEntry {
        depth: 1,
        name: "w:p".to_string(),
        text: "x".to_string(),
    };
    let json = serde_json::to_value(&entry).unwrap();
    assert_eq!(json, serde_json::json!({"depth": 1, "name": "w:p", "text": "x"}));
}

#[test]
fn test_walk_text_indents_by_depth() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("nested.xml");
    fs::write(&input, "<a><b><c/></b><d/></a>").unwrap();

    let output = walk_command(&input, &[], None, OutputFormat::Text).unwrap();
    assert_eq!(output, "b\n  c\nd\n");
}

#[test]
fn test_runs_groups_adjacent_names() {
    let dir = TempDir::new().unwrap();
    let input = write_body(&dir);

    let output = runs_command(&input).unwrap();
    assert_eq!(output, "w:p ×3\nw:tbl ×1\nw:p ×1\n");
}

#[test]
fn test_siblings_nearest_first() {
    let dir = TempDir::new().unwrap();
    let input = write_body(&dir);

    let output = siblings_command(&input, 2).unwrap();
    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(
        lines,
        vec!["-1 w:p  \"First paragraph.\"", "-2 w:p  \"Overview\""]
    );
}

#[test]
fn test_siblings_index_out_of_range() {
    let dir = TempDir::new().unwrap();
    let input = write_body(&dir);

    let err = siblings_command(&input, 10).unwrap_err();
    assert!(err.to_string().contains("out of range"));
}

#[test]
fn test_pretty_default_layout() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("small.xml");
    fs::write(&input, r#"<w:p w:rsidR="01"><w:r><w:t>Hi</w:t></w:r></w:p>"#).unwrap();

    let output = pretty_command(&input, PrettyConfig::default()).unwrap();
    assert_eq!(
        output,
        "<w:p\n  w:rsidR=\"01\">\n  <w:r>\n    <w:t>Hi</w:t>\n  </w:r>\n</w:p>"
    );
}

#[test]
fn test_missing_input_file() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("nope.xml");

    let err = runs_command(&missing).unwrap_err();
    assert!(err.to_string().contains("Input file not found"));
}

#[test]
fn test_malformed_input_reports_path() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("broken.xml");
    fs::write(&input, "<a><b></a>").unwrap();

    let err = pretty_command(&input, PrettyConfig::default()).unwrap_err();
    assert!(err.to_string().contains("Failed to parse XML"));
}
