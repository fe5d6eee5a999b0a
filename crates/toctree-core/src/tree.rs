//! Document tree (arena storage)
//!
//! Nodes live in a single `Vec` owned by [`Tree`] and refer to each other by
//! [`NodeId`]. A node is one of three kinds: an element with a name,
//! attributes and ordered children, an ordinary text leaf, or a raw markup
//! leaf that serializes as an entity reference instead of escaped text.
//!
//! Read access goes through the copyable [`NodeRef`] handle.
//!
//! # Example
//!
//! ```
//! use toctree_core::Tree;
//!
//! let mut tree = Tree::new("w:body");
//! let root = tree.root_id();
//! let para = tree.append_element(root, "w:p")?;
//! tree.set_attribute(para, "w:rsidR", "00A1")?;
//! tree.append_text(para, "Introduction")?;
//!
//! let para = tree.node(para);
//! assert_eq!(para.name(), Some("w:p"));
//! assert_eq!(para.attribute("w:rsidR"), Some("00A1"));
//! assert_eq!(para.text(), "Introduction");
//! # Ok::<(), toctree_core::TreeError>(())
//! ```

use std::borrow::Cow;
use std::cell::Cell;
use std::fmt;

use crate::error::{Result, TreeError};
use crate::seq::SequenceExt;

/// Index of a node inside its [`Tree`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// Position of the node in the arena
    pub fn index(self) -> usize {
        self.0
    }
}

/// A single `name="value"` pair on an element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// Qualified attribute name (e.g. `w:val`)
    pub name: String,
    /// Unescaped attribute value
    pub value: String,
}

/// What a node is
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// An element with a qualified name and attributes in document order
    Element {
        name: String,
        attributes: Vec<Attribute>,
    },
    /// Character data, escaped on output
    Text(String),
    /// An entity name, written verbatim as `&name;` on output
    RawMarkup(String),
}

/// Cached link from an element to the element sibling right before it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReverseSiblingInfo {
    /// `None` for the first element child of its parent
    pub previous_sibling: Option<NodeId>,
}

#[derive(Debug)]
struct NodeData {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    reverse_sibling: Cell<Option<ReverseSiblingInfo>>,
}

impl NodeData {
    fn new(kind: NodeKind, parent: Option<NodeId>) -> Self {
        Self {
            kind,
            parent,
            children: Vec::new(),
            reverse_sibling: Cell::new(None),
        }
    }
}

/// A rooted document tree
///
/// The root is always an element. Nodes are only ever attached as new
/// children of an existing element, so the tree cannot contain cycles.
///
/// The reverse sibling cache lives inside the nodes behind a [`Cell`], which
/// makes `Tree` `!Sync`. Mutating a tree after the cache has been built does
/// not invalidate it: lookups keep returning the sibling order that was
/// current when the cache was filled.
#[derive(Debug)]
pub struct Tree {
    nodes: Vec<NodeData>,
    sibling_index_builds: Cell<usize>,
}

impl Tree {
    /// Create a tree holding a single root element
    pub fn new(root_name: impl Into<String>) -> Self {
        let root = NodeData::new(
            NodeKind::Element {
                name: root_name.into(),
                attributes: Vec::new(),
            },
            None,
        );
        Self {
            nodes: vec![root],
            sibling_index_builds: Cell::new(0),
        }
    }

    /// Id of the root element
    pub fn root_id(&self) -> NodeId {
        NodeId(0)
    }

    /// Handle to the root element
    pub fn root(&self) -> NodeRef<'_> {
        self.node(self.root_id())
    }

    /// Handle to a node
    ///
    /// # Panics
    ///
    /// Panics if `id` was not handed out by this tree.
    pub fn node(&self, id: NodeId) -> NodeRef<'_> {
        assert!(id.0 < self.nodes.len(), "node {} is not in this tree", id.0);
        NodeRef { tree: self, id }
    }

    /// Handle to a node, or `None` for an id from another tree
    pub fn get(&self, id: NodeId) -> Option<NodeRef<'_>> {
        (id.0 < self.nodes.len()).then_some(NodeRef { tree: self, id })
    }

    /// Total number of nodes, the root included
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// How many times a parent's reverse sibling cache has been computed
    pub fn sibling_index_builds(&self) -> usize {
        self.sibling_index_builds.get()
    }

    /// Append a new element as the last child of `parent`
    pub fn append_element(&mut self, parent: NodeId, name: impl Into<String>) -> Result<NodeId> {
        let index = self.element_data(parent)?.children.len();
        self.insert_element(parent, index, name)
    }

    /// Insert a new element at `index` in the child list of `parent`
    ///
    /// `index` counts all children, text leaves included.
    pub fn insert_element(
        &mut self,
        parent: NodeId,
        index: usize,
        name: impl Into<String>,
    ) -> Result<NodeId> {
        let kind = NodeKind::Element {
            name: name.into(),
            attributes: Vec::new(),
        };
        self.insert_child(parent, index, kind)
    }

    /// Append a text leaf as the last child of `parent`
    pub fn append_text(&mut self, parent: NodeId, text: impl Into<String>) -> Result<NodeId> {
        let index = self.element_data(parent)?.children.len();
        self.insert_child(parent, index, NodeKind::Text(text.into()))
    }

    /// Append a raw markup leaf (an entity reference such as `nbsp`)
    pub fn append_raw_markup(
        &mut self,
        parent: NodeId,
        entity: impl Into<String>,
    ) -> Result<NodeId> {
        let index = self.element_data(parent)?.children.len();
        self.insert_child(parent, index, NodeKind::RawMarkup(entity.into()))
    }

    /// Set an attribute on an element, replacing any previous value
    pub fn set_attribute(
        &mut self,
        element: NodeId,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<()> {
        let name = name.into();
        let value = value.into();
        let data = self.data_mut(element)?;
        let NodeKind::Element { attributes, .. } = &mut data.kind else {
            return Err(TreeError::InvalidOperation(
                "attributes can only be set on elements".to_string(),
            ));
        };
        match attributes.iter_mut().find(|a| a.name == name) {
            Some(existing) => existing.value = value,
            None => attributes.push(Attribute { name, value }),
        }
        Ok(())
    }

    fn insert_child(&mut self, parent: NodeId, index: usize, kind: NodeKind) -> Result<NodeId> {
        let child_count = self.element_data(parent)?.children.len();
        if index > child_count {
            return Err(TreeError::InvalidOperation(format!(
                "child index {} out of range for a node with {} children",
                index, child_count
            )));
        }
        let id = NodeId(self.nodes.len());
        self.nodes.push(NodeData::new(kind, Some(parent)));
        self.nodes[parent.0].children.insert(index, id);
        Ok(id)
    }

    fn element_data(&self, id: NodeId) -> Result<&NodeData> {
        let data = self
            .nodes
            .get(id.0)
            .ok_or_else(|| TreeError::InvalidOperation(format!("node {} is not in this tree", id.0)))?;
        match data.kind {
            NodeKind::Element { .. } => Ok(data),
            _ => Err(TreeError::InvalidOperation(
                "only elements can have children".to_string(),
            )),
        }
    }

    fn data_mut(&mut self, id: NodeId) -> Result<&mut NodeData> {
        self.nodes
            .get_mut(id.0)
            .ok_or_else(|| TreeError::InvalidOperation(format!("node {} is not in this tree", id.0)))
    }

    pub(crate) fn set_reverse_sibling_info(&self, id: NodeId, info: ReverseSiblingInfo) {
        self.nodes[id.0].reverse_sibling.set(Some(info));
    }

    pub(crate) fn record_sibling_index_build(&self) {
        self.sibling_index_builds
            .set(self.sibling_index_builds.get() + 1);
    }
}

/// Borrowed handle to one node of a [`Tree`]
#[derive(Clone, Copy)]
pub struct NodeRef<'a> {
    tree: &'a Tree,
    id: NodeId,
}

impl<'a> NodeRef<'a> {
    fn data(self) -> &'a NodeData {
        &self.tree.nodes[self.id.0]
    }

    /// Id of this node
    pub fn id(self) -> NodeId {
        self.id
    }

    /// The tree this node belongs to
    pub fn tree(self) -> &'a Tree {
        self.tree
    }

    /// Node variant
    pub fn kind(self) -> &'a NodeKind {
        &self.data().kind
    }

    /// Whether this node is an element
    pub fn is_element(self) -> bool {
        matches!(self.kind(), NodeKind::Element { .. })
    }

    /// Element name, `None` for leaves
    pub fn name(self) -> Option<&'a str> {
        match self.kind() {
            NodeKind::Element { name, .. } => Some(name),
            _ => None,
        }
    }

    /// Attributes in document order (empty for leaves)
    pub fn attributes(self) -> &'a [Attribute] {
        match self.kind() {
            NodeKind::Element { attributes, .. } => attributes,
            _ => &[],
        }
    }

    /// Value of the attribute with the given qualified name
    pub fn attribute(self, name: &str) -> Option<&'a str> {
        self.attributes()
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }

    /// Parent element, `None` for the root
    pub fn parent(self) -> Option<NodeRef<'a>> {
        self.data().parent.map(|id| self.tree.node(id))
    }

    /// All children in order, leaves included
    pub fn children(self) -> impl Iterator<Item = NodeRef<'a>> + 'a {
        let tree = self.tree;
        self.data()
            .children
            .iter()
            .map(move |&id| NodeRef { tree, id })
    }

    /// Element children in order
    pub fn elements(self) -> Elements<'a> {
        Elements {
            tree: self.tree,
            ids: self.data().children.iter(),
        }
    }

    /// The cached previous-sibling link, if it has been computed
    pub fn reverse_sibling_info(self) -> Option<ReverseSiblingInfo> {
        self.data().reverse_sibling.get()
    }

    /// Concatenated character data of this node and its descendants
    ///
    /// Raw markup leaves contribute their entity reference (`&name;`).
    pub fn text(self) -> String {
        let tree = self.tree;
        let mut pending = vec![self.id];
        std::iter::from_fn(move || loop {
            let node = tree.node(pending.pop()?);
            match node.kind() {
                NodeKind::Text(text) => return Some(Cow::Borrowed(text.as_str())),
                NodeKind::RawMarkup(entity) => return Some(Cow::Owned(format!("&{};", entity))),
                // reversed so the first child is popped first
                NodeKind::Element { .. } => pending.extend(node.data().children.iter().rev()),
            }
        })
        .string_concatenate()
    }
}

impl PartialEq for NodeRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.tree, other.tree) && self.id == other.id
    }
}

impl Eq for NodeRef<'_> {}

impl fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind() {
            NodeKind::Element { name, .. } => write!(f, "<{}>#{}", name, self.id.0),
            NodeKind::Text(text) => write!(f, "{:?}#{}", text, self.id.0),
            NodeKind::RawMarkup(entity) => write!(f, "&{};#{}", entity, self.id.0),
        }
    }
}

/// Iterator over the element children of a node
///
/// Also serves as the per-level cursor of the pruned traversal.
#[derive(Debug, Clone)]
pub struct Elements<'a> {
    tree: &'a Tree,
    ids: std::slice::Iter<'a, NodeId>,
}

impl<'a> Iterator for Elements<'a> {
    type Item = NodeRef<'a>;

    fn next(&mut self) -> Option<NodeRef<'a>> {
        let tree = self.tree;
        self.ids
            .by_ref()
            .map(|&id| NodeRef { tree, id })
            .find(|node| node.is_element())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, self.ids.size_hint().1)
    }
}
