//! Markup serialization
//!
//! Writes a subtree back out as indented markup. The default layout puts
//! every attribute on its own line and omits the XML declaration:
//!
//! ```text
//! <w:p
//!   w:rsidR="00A1">
//!   <w:r>
//!     <w:t>Heading</w:t>
//!   </w:r>
//! </w:p>
//! ```
//!
//! Elements whose children include character data are written inline, with
//! no indentation inside them, so whitespace in mixed content is preserved.
//! Text leaves are escaped; raw markup leaves are written verbatim as entity
//! references.

use std::fmt::Write;

use quick_xml::escape::{escape, partial_escape};

use crate::tree::{NodeKind, NodeRef};

/// Serializer configuration
#[derive(Debug, Clone)]
pub struct PrettyConfig {
    /// Indentation added per nesting level
    pub indent: String,
    /// Put each attribute on a separate line
    pub new_line_on_attributes: bool,
    /// Leave out the `<?xml ...?>` declaration
    pub omit_declaration: bool,
}

impl Default for PrettyConfig {
    fn default() -> Self {
        Self {
            indent: "  ".to_string(),
            new_line_on_attributes: true,
            omit_declaration: true,
        }
    }
}

/// Pending work of [`PrettyPrinter::print`]
enum Frame<'a> {
    /// Write a node; `inline` suppresses line breaks before it
    Open {
        node: NodeRef<'a>,
        depth: usize,
        inline: bool,
    },
    /// Write the end tag of an element whose children are done
    Close {
        name: &'a str,
        depth: usize,
        inline: bool,
    },
}

/// Indenting markup writer
///
/// Works from an explicit stack of frames, so nesting depth is bounded only
/// by memory.
pub struct PrettyPrinter {
    config: PrettyConfig,
    output: String,
}

impl PrettyPrinter {
    /// Create a printer with the default configuration
    pub fn new() -> Self {
        Self::with_config(PrettyConfig::default())
    }

    /// Create a printer with custom configuration
    pub fn with_config(config: PrettyConfig) -> Self {
        Self {
            config,
            output: String::new(),
        }
    }

    /// Serialize `node` and everything below it
    pub fn print(&mut self, node: NodeRef<'_>) -> String {
        self.output.clear();
        if !self.config.omit_declaration {
            self.output
                .push_str("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n");
        }

        let mut stack = vec![Frame::Open {
            node,
            depth: 0,
            inline: false,
        }];
        while let Some(frame) = stack.pop() {
            match frame {
                Frame::Open {
                    node,
                    depth,
                    inline,
                } => {
                    if !inline && depth > 0 {
                        self.newline(depth);
                    }
                    match node.kind() {
                        NodeKind::Text(text) => {
                            self.output.push_str(&partial_escape(text.as_str()))
                        }
                        NodeKind::RawMarkup(entity) => {
                            write!(self.output, "&{};", entity).unwrap();
                        }
                        NodeKind::Element { name, .. } => {
                            self.open_element(node, name, depth, inline, &mut stack)
                        }
                    }
                }
                Frame::Close {
                    name,
                    depth,
                    inline,
                } => {
                    if !inline {
                        self.newline(depth);
                    }
                    write!(self.output, "</{}>", name).unwrap();
                }
            }
        }
        std::mem::take(&mut self.output)
    }

    fn open_element<'a>(
        &mut self,
        node: NodeRef<'a>,
        name: &'a str,
        depth: usize,
        inline: bool,
        stack: &mut Vec<Frame<'a>>,
    ) {
        self.output.push('<');
        self.output.push_str(name);
        for attr in node.attributes() {
            if self.config.new_line_on_attributes && !inline {
                self.newline(depth + 1);
            } else {
                self.output.push(' ');
            }
            write!(self.output, "{}=\"{}\"", attr.name, escape(attr.value.as_str())).unwrap();
        }

        if node.children().next().is_none() {
            self.output.push_str(" />");
            return;
        }
        self.output.push('>');

        // Character data anywhere among the children keeps the whole subtree inline
        let mixed = inline || node.children().any(|c| !c.is_element());
        stack.push(Frame::Close {
            name,
            depth,
            inline: mixed,
        });
        let children: Vec<_> = node.children().collect();
        stack.extend(children.into_iter().rev().map(|child| Frame::Open {
            node: child,
            depth: depth + 1,
            inline: mixed,
        }));
    }

    fn newline(&mut self, depth: usize) {
        self.output.push('\n');
        for _ in 0..depth {
            self.output.push_str(&self.config.indent);
        }
    }
}

impl Default for PrettyPrinter {
    fn default() -> Self {
        Self::new()
    }
}

/// Serialize a subtree: indented, one attribute per line, no declaration
pub fn to_string_new_line_on_attributes(node: NodeRef<'_>) -> String {
    PrettyPrinter::new().print(node)
}

/// Serialize a subtree with custom configuration
pub fn to_string_with_config(node: NodeRef<'_>, config: PrettyConfig) -> String {
    PrettyPrinter::with_config(config).print(node)
}
