//! Reverse sibling lookup
//!
//! Walking backwards over preceding siblings is answered from a cache kept on
//! each element. The first query against any child of a parent fills the
//! cache for all of that parent's element children in a single pass; every
//! later query on those siblings reuses it.
//!
//! The cache is never invalidated. Adding or inserting children after it has
//! been built leaves earlier siblings pointing at the old order. Querying a
//! new child builds the parent again, but only children without an entry
//! receive one.

use tracing::debug;

use crate::error::{Result, TreeError};
use crate::tree::{NodeId, NodeRef, ReverseSiblingInfo, Tree};

impl Tree {
    fn initialize_reverse_sibling_order(&self, parent: NodeRef<'_>) {
        let mut previous = None;
        let mut count = 0usize;
        for child in parent.elements() {
            // Entries from an earlier build are kept, even if stale
            if child.reverse_sibling_info().is_none() {
                self.set_reverse_sibling_info(
                    child.id(),
                    ReverseSiblingInfo {
                        previous_sibling: previous,
                    },
                );
            }
            previous = Some(child.id());
            count += 1;
        }
        self.record_sibling_index_build();
        debug!(
            parent = parent.id().index(),
            siblings = count,
            "built reverse sibling index"
        );
    }
}

impl<'a> NodeRef<'a> {
    /// Preceding element siblings, nearest first
    ///
    /// Fails with [`TreeError::InvalidOperation`] when the sibling order
    /// cannot be determined: the node has no parent and no cached order, or
    /// it is a text or raw markup leaf.
    ///
    /// ```
    /// use toctree_core::Tree;
    ///
    /// let tree = Tree::parse(b"<body><h1/><p/><p/></body>")?;
    /// let last = tree.root().elements().last().unwrap();
    /// let before: Vec<_> = last
    ///     .elements_before_self_reverse_order()?
    ///     .map(|e| e.name().unwrap())
    ///     .collect();
    /// assert_eq!(before, vec!["p", "h1"]);
    /// # Ok::<(), toctree_core::TreeError>(())
    /// ```
    pub fn elements_before_self_reverse_order(self) -> Result<ElementsBeforeSelf<'a>> {
        if self.reverse_sibling_info().is_none() {
            let parent = self.parent().ok_or_else(|| {
                TreeError::InvalidOperation(
                    "cannot determine sibling order for a node without a parent".to_string(),
                )
            })?;
            self.tree().initialize_reverse_sibling_order(parent);
        }
        let info = self.reverse_sibling_info().ok_or_else(|| {
            TreeError::InvalidOperation(
                "cannot determine sibling order for a node that is not an element".to_string(),
            )
        })?;
        Ok(ElementsBeforeSelf {
            tree: self.tree(),
            next: info.previous_sibling,
        })
    }
}

/// Iterator returned by [`NodeRef::elements_before_self_reverse_order`]
#[derive(Debug, Clone)]
pub struct ElementsBeforeSelf<'a> {
    tree: &'a Tree,
    next: Option<NodeId>,
}

impl<'a> Iterator for ElementsBeforeSelf<'a> {
    type Item = NodeRef<'a>;

    fn next(&mut self) -> Option<NodeRef<'a>> {
        let node = self.tree.node(self.next?);
        self.next = node
            .reverse_sibling_info()
            .and_then(|info| info.previous_sibling);
        Some(node)
    }
}
