//! Loading a tree from XML text
//!
//! Builds a [`Tree`] from a single XML document using `quick_xml`'s pull
//! reader. Declarations, comments, processing instructions and doctypes are
//! skipped; CDATA sections become ordinary text.
//!
//! Predefined entities and character references are expanded into text. Any
//! other entity reference in character data cannot be resolved without a DTD
//! and is kept as a raw markup leaf, so printed trees load back unchanged.

use quick_xml::escape::{resolve_predefined_entity, unescape};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use tracing::trace;

use crate::error::{Result, TreeError};
use crate::tree::{NodeId, Tree};

/// Loader configuration
#[derive(Debug, Clone, Default)]
pub struct ParseConfig {
    /// Keep text nodes that consist only of whitespace (indentation between
    /// elements is dropped otherwise)
    pub keep_whitespace: bool,
}

impl Tree {
    /// Parse a document from XML bytes
    pub fn parse(xml: &[u8]) -> Result<Self> {
        Self::parse_with_config(xml, &ParseConfig::default())
    }

    /// Parse a document from XML bytes with custom configuration
    pub fn parse_with_config(xml: &[u8], config: &ParseConfig) -> Result<Self> {
        let mut reader = Reader::from_reader(xml);
        // Whitespace handling is decided per text node below
        reader.config_mut().trim_text(false);

        let mut builder = TreeBuilder::default();
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf)? {
                Event::Start(ref e) => {
                    let id = builder.open_element(e)?;
                    builder.stack.push(id);
                }
                Event::Empty(ref e) => {
                    builder.open_element(e)?;
                }
                Event::End(ref e) => {
                    if builder.stack.pop().is_none() {
                        return Err(TreeError::MalformedDocument(format!(
                            "unexpected end tag </{}>",
                            std::str::from_utf8(e.name().as_ref())?
                        )));
                    }
                }
                Event::Text(ref e) => {
                    let raw = std::str::from_utf8(e)?;
                    builder.add_character_data(split_character_data(raw)?, config)?;
                }
                Event::CData(ref e) => {
                    let text = std::str::from_utf8(e)?;
                    builder.add_text(text, config)?;
                }
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        builder.finish()
    }
}

#[derive(Default)]
struct TreeBuilder {
    tree: Option<Tree>,
    stack: Vec<NodeId>,
}

impl TreeBuilder {
    fn open_element(&mut self, e: &BytesStart) -> Result<NodeId> {
        let name = std::str::from_utf8(e.name().as_ref())?.to_string();
        trace!(element = %name, depth = self.stack.len(), "open element");

        let parent = self.stack.last().copied();
        let id = match (self.tree.as_mut(), parent) {
            (Some(tree), Some(parent)) => tree.append_element(parent, name)?,
            (Some(_), None) => {
                return Err(TreeError::MalformedDocument(format!(
                    "second root element <{}>",
                    name
                )))
            }
            (None, _) => {
                let tree = Tree::new(name);
                let root = tree.root_id();
                self.tree = Some(tree);
                root
            }
        };

        if let Some(tree) = self.tree.as_mut() {
            for attr in e.attributes() {
                let attr = attr?;
                let key = std::str::from_utf8(attr.key.as_ref())?;
                let value = attr.unescape_value()?;
                tree.set_attribute(id, key, value.as_ref())?;
            }
        }
        Ok(id)
    }

    fn add_text(&mut self, text: &str, config: &ParseConfig) -> Result<()> {
        let blank = text.trim().is_empty();
        let parent = self.stack.last().copied();
        match (self.tree.as_mut(), parent) {
            (Some(tree), Some(parent)) => {
                if !blank || config.keep_whitespace {
                    tree.append_text(parent, text)?;
                }
                Ok(())
            }
            _ if blank => Ok(()),
            _ => Err(TreeError::MalformedDocument(
                "text outside the root element".to_string(),
            )),
        }
    }

    fn add_character_data(
        &mut self,
        parts: Vec<CharacterData>,
        config: &ParseConfig,
    ) -> Result<()> {
        if let [CharacterData::Text(text)] = parts.as_slice() {
            return self.add_text(text, config);
        }
        let (Some(tree), Some(&parent)) = (self.tree.as_mut(), self.stack.last()) else {
            return Err(TreeError::MalformedDocument(
                "entity reference outside the root element".to_string(),
            ));
        };
        for part in parts {
            match part {
                CharacterData::Text(text) => tree.append_text(parent, text)?,
                CharacterData::Entity(name) => tree.append_raw_markup(parent, name)?,
            };
        }
        Ok(())
    }

    fn finish(self) -> Result<Tree> {
        if let Some(&open) = self.stack.last() {
            let name = self
                .tree
                .as_ref()
                .and_then(|t| t.node(open).name().map(str::to_string))
                .unwrap_or_default();
            return Err(TreeError::MalformedDocument(format!(
                "missing end tag for <{}>",
                name
            )));
        }
        self.tree
            .ok_or_else(|| TreeError::MalformedDocument("no root element".to_string()))
    }
}

/// A run of character data, or an entity reference left unexpanded
#[derive(Debug, PartialEq)]
enum CharacterData {
    Text(String),
    Entity(String),
}

/// Expand predefined entities and character references in raw text
///
/// Adjacent expanded text is merged into one run; each unknown entity splits
/// the runs around it.
fn split_character_data(raw: &str) -> Result<Vec<CharacterData>> {
    let mut parts = Vec::new();
    let mut text = String::new();
    let mut rest = raw;

    while let Some(amp) = rest.find('&') {
        text.push_str(&rest[..amp]);
        let reference = &rest[amp..];
        let end = reference.find(';').ok_or_else(|| {
            TreeError::MalformedDocument(format!("unterminated entity reference in {:?}", raw))
        })?;
        let name = &reference[1..end];
        if name.is_empty() || name.contains(|c: char| c.is_whitespace() || c == '&') {
            return Err(TreeError::MalformedDocument(format!(
                "invalid entity reference {:?}",
                &reference[..=end]
            )));
        }

        if name.starts_with('#') {
            text.push_str(&unescape(&reference[..=end]).map_err(quick_xml::Error::from)?);
        } else if let Some(value) = resolve_predefined_entity(name) {
            text.push_str(value);
        } else {
            if !text.is_empty() {
                parts.push(CharacterData::Text(std::mem::take(&mut text)));
            }
            parts.push(CharacterData::Entity(name.to_string()));
        }
        rest = &reference[end + 1..];
    }

    text.push_str(rest);
    if !text.is_empty() || parts.is_empty() {
        parts.push(CharacterData::Text(text));
    }
    Ok(parts)
}
